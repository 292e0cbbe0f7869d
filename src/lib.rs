pub mod bindings;
pub mod chain;
pub mod config;
pub mod deposit;
pub mod endpoint;
pub mod error;
pub mod logging;
pub mod menu;
pub mod orchestrator;
pub mod report;
#[cfg(test)]
mod testing;
pub mod units;
pub mod wallet;
