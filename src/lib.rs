//! Personal task scheduler library.
//!
//! This module exports the core components for testing and integration.

pub mod config;
pub mod db;
pub mod error;
pub mod nextdate;
pub mod server;
pub mod service;
pub mod types;
