pub mod repositories;

pub use repositories::{MySqlTransactionRepository, TransactionStatsRepository};
