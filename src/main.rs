use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use anyhow::Result;

use clubhub::database::init_pool;
use clubhub::middleware::correlation_id;
use clubhub::services::{Backend, session};
use clubhub::{AppState, Config, routes};

#[actix_web::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "Starting clubhub API (environment: {})",
        config.environment
    );

    if config.demo_mode && config.is_production() {
        log::warn!("DEMO_MODE is set in production; serving the static demo dataset");
    }

    let backend = if config.demo_mode {
        Backend::demo()
    } else {
        Backend::remote(init_pool(&config.database_url, config.bootstrap_timeout())?)
    };

    let state = AppState::new(&config, backend)?;
    let mode = session::bootstrap(&state, config.bootstrap_timeout()).await;
    log::info!("Running in {:?} mode", mode);

    let _listener = state.session.spawn_refresh_on_sign_in();

    let state_data = web::Data::new(state);
    let config_data = web::Data::new(config.clone());
    let allowed_origin = config.client_base_url.clone();

    let server_address = config.server_address();
    log::info!("Listening on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(state_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&allowed_origin)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(from_fn(correlation_id))
            .wrap(Logger::new(
                r#"%a "%r" %s %b %T correlation_id=%{x-correlation-id}o"#,
            ))
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
