pub(crate) mod macros;

pub mod event;
pub mod helper_task;
pub mod role;
pub mod team;
pub mod user;

// Re-export all models for easy importing
pub use event::*;
pub use helper_task::*;
pub use role::*;
pub use team::*;
pub use user::*;
