pub mod stats_controller;

pub use stats_controller::configure;
