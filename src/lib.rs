pub mod advise;
pub mod catalog;
pub mod client;
pub mod config;
pub mod course;
pub mod metrics;
pub mod output;
pub mod profile;
pub mod server;
pub mod session;
