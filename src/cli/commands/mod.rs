mod history;
mod maintenance;
mod password;
mod templates;
mod users;

pub use history::cmd_history;
pub use maintenance::{cmd_reset, cmd_seed};
pub use password::cmd_hash_password;
pub use templates::cmd_list_templates;
pub use users::cmd_list_users;
