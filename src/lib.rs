pub mod api;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod db;
pub mod demo;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod notifications;
pub mod selectors;
pub mod session;
pub mod store;
