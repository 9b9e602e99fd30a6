pub mod config;
pub mod corpus;
pub mod errors;
pub mod extraction;
pub mod graph;
pub mod report;
pub mod resolution;
pub mod triggers;
pub mod types;
pub mod validator;
