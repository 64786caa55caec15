pub mod classifier;
pub mod config;
pub mod controller;
pub mod detection;
pub mod error;
pub mod notify;
pub mod push;
pub mod server;
pub mod status;

pub use error::{Result, SentryError};
