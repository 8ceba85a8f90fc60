//! # portrait-conf
//!
//! Serialization settings for Portrait.
//!
//! - [`Config`]: immutable settings (camelize, root and namespace wrapping,
//!   nesting level, type system) with validation and override-merging
//! - [`Options`]: per-call overrides, typed or parsed from untyped JSON
//! - [`configure`], [`configure_with`], [`current`]: the process-wide defaults
//!
//! ## Example
//!
//! ```rust
//! use portrait_conf::{Config, Options};
//!
//! let call = Config::default()
//!     .merge(&Options::new().camelize(true).namespaces_nesting_level(1))
//!     .unwrap();
//! assert!(call.is_namespaced());
//! ```

pub mod config;
pub mod global;

pub use config::{Config, DEFAULT_NESTING_LEVEL, Options};
pub use global::{configure, configure_with, current, merged};
