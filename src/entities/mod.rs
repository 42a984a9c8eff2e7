pub mod prelude;

pub mod admins;
pub mod sent_emails;
pub mod templates;
pub mod user_templates;
pub mod users;
