//! Schemas, type systems, the class registry and the shared error taxonomy.
//!
//! # Examples
//!
//! ```rust
//! use portrait::core::casing::camelize;
//! use portrait::core::types::{BuiltinTypes, TypeDescriptor, TypeSystem};
//! use portrait::core::value::Value;
//!
//! assert_eq!(camelize("favourite_food", false), "favouriteFood");
//! assert!(BuiltinTypes.check_type(&Value::Null, &TypeDescriptor::String).is_ok());
//! ```

pub use portrait_core::*;
