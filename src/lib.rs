pub mod analysis;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod extract;
pub mod metrics;
pub mod model;
pub mod parser;
pub mod resolver;
