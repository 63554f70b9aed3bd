pub mod balance;
pub mod config;
pub mod logging;
pub mod output;
pub mod roster;
pub mod store;
