pub mod admin;
pub mod delivery;
pub mod send_history;
pub mod template;
pub mod user;
