//! HTTP front end for the weather lookup service.
//!
//! Routes:
//! - `GET /health` returns `ok`
//! - `GET /weather?lat=<f64>&lon=<f64>` returns a plain-text report

pub mod app;
pub mod cli;
pub mod error;
pub mod logging;

pub use app::{AppState, router, serve};
pub use error::AppError;
