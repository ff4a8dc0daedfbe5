pub mod dataset;
pub mod models;
pub mod query;
pub mod server;
