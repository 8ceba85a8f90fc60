//! The serialization engine: schema walking, value assignment and wrapping.

pub use portrait_serializers::*;
