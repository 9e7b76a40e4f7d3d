pub mod repositories;

pub use repositories::{MySqlUserRepository, UserRepository};
