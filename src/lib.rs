// src/lib.rs

#[macro_use]
pub mod macros;

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod fetch;
pub mod format;
pub mod log;
pub mod notify;
pub mod progress;
pub mod runner;
pub mod store;

pub use error::{Error, Result};
