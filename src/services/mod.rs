pub mod mailer;
pub use mailer::{ConsoleMailer, MailError, MailTransport, OutgoingMail, SmtpMailer};

pub mod token;
pub use token::{Claims, TokenIssuer};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult};
pub use auth_service_impl::SeaOrmAuthService;

pub mod dispatch_service;
pub mod dispatch_service_impl;
pub use dispatch_service::{
    DeliveryDetails, DeliveryFailure, DeliverySuccess, DispatchError, DispatchReport,
    DispatchService,
};
pub use dispatch_service_impl::SeaOrmDispatchService;
