//! # varspec
//!
//! The application half of the variant specification system: the HTTP API,
//! the CLI, the KDP client and the order store built around `varspec-core`.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod kdp;
pub mod store;

pub use config::VarspecConfig;
pub use error::{AppError, KdpError};
pub use kdp::KdpService;
pub use store::OrderStore;
