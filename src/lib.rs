//! Structura Back Office Library
//!
//! Reporting and statistics core for the Structura multi-tenant back
//! office: aggregation engine, result cache and data-access contracts
//! over the transaction store.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::stats;
pub use modules::structures;
pub use modules::transactions;
pub use modules::users;
