pub mod stats;
pub mod structures;
pub mod transactions;
pub mod users;
