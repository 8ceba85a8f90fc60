//! Process-wide default configuration.
//!
//! The engine never reads this holder: the public API resolves the defaults
//! once per call and passes the merged [`Config`] down explicitly.

use crate::config::{Config, Options};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use portrait_core::ArgumentError;
use std::sync::Arc;

static DEFAULTS: Lazy<RwLock<Arc<Config>>> = Lazy::new(|| RwLock::new(Arc::new(Config::default())));

/// Replace the process-wide defaults; `None` restores the built-in defaults.
///
/// # Errors
///
/// Returns an [`ArgumentError`] if `config` fails [`Config::validate`]; the
/// previous defaults stay in place.
pub fn configure(config: Option<Config>) -> Result<(), ArgumentError> {
	let config = config.unwrap_or_default();
	config.validate()?;
	tracing::debug!(?config, "portrait defaults configured");
	*DEFAULTS.write() = Arc::new(config);
	Ok(())
}

/// Derive new process-wide defaults from the current ones.
///
/// `update` runs without any lock held, so it may read [`current`] or
/// [`merged`] itself.
///
/// # Examples
///
/// ```
/// use portrait_conf::{configure, configure_with, current};
///
/// configure_with(|config| config.with_camelize(true)).unwrap();
/// assert!(current().camelize());
/// configure(None).unwrap();
/// assert!(!current().camelize());
/// ```
pub fn configure_with<F>(update: F) -> Result<(), ArgumentError>
where
	F: FnOnce(Config) -> Config,
{
	let base = Config::clone(&DEFAULTS.read());
	let next = update(base);
	next.validate()?;
	tracing::debug!(config = ?next, "portrait defaults updated");
	*DEFAULTS.write() = Arc::new(next);
	Ok(())
}

/// The active process-wide defaults.
pub fn current() -> Arc<Config> {
	DEFAULTS.read().clone()
}

/// The active defaults with `options` merged over them.
pub fn merged(options: &Options) -> Result<Config, ArgumentError> {
	current().merge(options)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	#[serial(portrait_defaults)]
	fn test_configure_and_reset() {
		// Arrange
		configure(Some(Config::default().with_include_root(true))).unwrap();

		// Act
		let during = current();
		configure(None).unwrap();
		let after = current();

		// Assert
		assert!(during.include_root());
		assert!(!after.include_root());
	}

	#[rstest]
	#[serial(portrait_defaults)]
	fn test_invalid_update_keeps_previous_defaults() {
		// Arrange
		configure(None).unwrap();

		// Act
		let result = configure_with(|config| config.with_namespaces_nesting_level(0));

		// Assert
		assert!(result.is_err());
		assert_eq!(*current(), Config::default());
	}

	#[rstest]
	#[serial(portrait_defaults)]
	fn test_update_may_read_current_defaults() {
		// Arrange
		configure(Some(Config::default().with_root("pet"))).unwrap();

		// Act
		let result = configure_with(|config| {
			let active = current();
			let call = merged(&Options::new().include_root(true)).unwrap();
			config
				.with_camelize(!active.camelize())
				.with_include_root(call.include_root())
		});

		// Assert
		assert!(result.is_ok());
		let defaults = current();
		assert!(defaults.camelize());
		assert!(defaults.include_root());
		assert_eq!(defaults.root(), Some("pet"));
		configure(None).unwrap();
	}

	#[rstest]
	#[serial(portrait_defaults)]
	fn test_merged_applies_call_options_over_defaults() {
		configure_with(|config| config.with_camelize(true)).unwrap();

		let config = merged(&Options::new().root("kitten")).unwrap();

		assert!(config.camelize());
		assert_eq!(config.root(), Some("kitten"));
		configure(None).unwrap();
	}
}
