pub mod models;
pub mod repositories;

pub use models::Structure;
pub use repositories::{MySqlStructureRepository, StructureRepository};
