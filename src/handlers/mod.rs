pub mod auth;
pub mod events;
pub mod health;
pub mod helper_tasks;
pub mod permissions;
pub mod shared;
pub mod teams;
pub mod users;
