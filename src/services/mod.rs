pub mod backend;
pub mod demo;
pub mod event_board;
pub mod helper_tasks;
pub mod mirror;
pub mod session;
pub mod team_roster;
pub mod user_context;
pub mod user_directory;

pub use backend::{Backend, ConnectionMode};
pub use event_board::EventBoard;
pub use helper_tasks::HelperTaskBoard;
pub use session::SessionService;
pub use team_roster::TeamRoster;
pub use user_context::UserContext;
pub use user_directory::UserDirectory;
