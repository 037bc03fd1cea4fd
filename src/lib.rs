//! quemepongo library
//!
//! Forecast and historical-projection pipelines, the upstream clients they
//! rely on, and the terminal views. The binary in `main.rs` is thin glue;
//! integration tests drive these modules directly.

pub mod cli;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod recommendations;
pub mod summary;
pub mod ui;
