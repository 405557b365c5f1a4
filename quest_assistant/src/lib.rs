pub mod account;
pub mod api;
pub mod config;
pub mod json;
pub mod report;
pub mod scheduler;
pub mod store;
pub mod token;
