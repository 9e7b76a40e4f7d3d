mod structure;

pub use structure::Structure;
