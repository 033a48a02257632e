pub mod config;
pub mod controller;
pub mod loader;
pub mod protocol;
pub mod session;
pub mod tables;
pub mod transport;
pub mod types;
pub mod verifier;
