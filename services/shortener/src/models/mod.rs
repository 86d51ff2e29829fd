//! Shortener service models

pub mod link;
pub mod session;
pub mod user;

pub use link::{Link, LinkView, ShortenForm, ShortenedLink};
pub use session::SessionContext;
pub use user::{LoginCredentials, LoginForm, RegisterForm, User};
