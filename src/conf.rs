//! Serialization settings and process-wide defaults.
//!
//! # Examples
//!
//! ```rust
//! use portrait::conf::{Config, Options};
//!
//! let merged = Config::default()
//!     .with_camelize(true)
//!     .merge(&Options::new().root("kitten"))
//!     .unwrap();
//! assert!(merged.camelize());
//! assert_eq!(merged.root(), Some("kitten"));
//! ```

pub use portrait_conf::*;
