//! Repositories for database operations

pub mod link;
pub mod user;

pub use link::LinkRepository;
pub use user::UserRepository;
