//! Per-call serialization state.

use portrait_conf::Config;
use std::collections::HashSet;

/// State of one top-level serialization call.
///
/// Holds the merged configuration and the skip-set: the classes whose
/// instances are currently being expanded as nested records or collections.
/// A nested value whose class is already in the set serializes as `null`,
/// which breaks self-referencing object graphs.
///
/// A fresh context is created for every call and dropped when it returns.
#[derive(Debug)]
pub struct SerializationContext<'a> {
	config: &'a Config,
	skip: HashSet<String>,
}

impl<'a> SerializationContext<'a> {
	/// Create a context with an empty skip-set.
	///
	/// # Examples
	///
	/// ```
	/// use portrait_conf::Config;
	/// use portrait_serializers::context::SerializationContext;
	///
	/// let config = Config::default();
	/// let context = SerializationContext::new(&config);
	/// assert!(!context.is_skipped("Note"));
	/// ```
	pub fn new(config: &'a Config) -> Self {
		Self {
			config,
			skip: HashSet::new(),
		}
	}

	pub fn config(&self) -> &'a Config {
		self.config
	}

	pub fn is_skipped(&self, class: &str) -> bool {
		self.skip.contains(class)
	}

	/// Run `f` with `class` in the skip-set.
	///
	/// The class is removed again afterwards, whatever `f` returns, unless it
	/// was already present on entry.
	///
	/// # Examples
	///
	/// ```
	/// use portrait_conf::Config;
	/// use portrait_serializers::context::SerializationContext;
	///
	/// let config = Config::default();
	/// let mut context = SerializationContext::new(&config);
	///
	/// let inside = context.with_skip_set("User", |ctx| ctx.is_skipped("User"));
	/// assert!(inside);
	/// assert!(!context.is_skipped("User"));
	/// ```
	pub fn with_skip_set<R>(&mut self, class: &str, f: impl FnOnce(&mut Self) -> R) -> R {
		let inserted = self.skip.insert(class.to_string());
		let result = f(self);
		if inserted {
			self.skip.remove(class);
		}
		result
	}
}
