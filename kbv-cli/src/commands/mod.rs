pub mod config;
pub mod fetch;
pub mod purge;
pub mod serve;
