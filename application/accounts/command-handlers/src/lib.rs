mod authenticator;
mod handlers;

pub use authenticator::{Authenticator, Credential};
pub use handlers::{ExternalLoginHandler, LoginHandler, RegisterHandler};
