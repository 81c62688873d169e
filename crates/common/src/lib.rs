//! Common utilities and shared types for love8.
//!
//! This crate provides foundational components used across all love8 crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Formatting**: Relative timestamps and username derivation
//!
//! # Example
//!
//! ```no_run
//! use love8_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod util;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use util::{format_time_ago, generate_username};
