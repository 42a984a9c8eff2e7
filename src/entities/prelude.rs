pub use super::admins::Entity as Admins;
pub use super::sent_emails::Entity as SentEmails;
pub use super::templates::Entity as Templates;
pub use super::user_templates::Entity as UserTemplates;
pub use super::users::Entity as Users;
