pub mod event;
pub mod helper_task;
pub mod profile;
pub mod team;
