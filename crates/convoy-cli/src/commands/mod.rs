pub mod config;
pub mod links;
pub mod migrate;
