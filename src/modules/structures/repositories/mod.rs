mod structure_repository;

pub use structure_repository::{MySqlStructureRepository, StructureRepository};
