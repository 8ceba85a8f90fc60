//! String casing helpers for output keys, root keys and namespaces.

use crate::error::ArgumentError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Separator between the segments of a qualified class name.
pub const NAMESPACE_SEPARATOR: &str = "::";

static UNDERSCORE_WORD: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"(?:^|_)([^_\s]+)").expect("Invalid camelize regex pattern"));

static ACRONYM_BOUNDARY: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").expect("Invalid underscore regex pattern"));

static WORD_BOUNDARY: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("Invalid underscore regex pattern"));

/// Convert a snake_case string to CamelCase.
///
/// With `capitalize_first` unset only the words after the first underscore
/// are capitalized, producing lowerCamel keys.
///
/// # Examples
///
/// ```
/// use portrait_core::casing::camelize;
///
/// assert_eq!(camelize("created_at", true), "CreatedAt");
/// assert_eq!(camelize("created_at", false), "createdAt");
/// assert_eq!(camelize("name", false), "name");
/// ```
pub fn camelize(snake: &str, capitalize_first: bool) -> String {
	if capitalize_first {
		return UNDERSCORE_WORD
			.replace_all(snake, |caps: &Captures<'_>| capitalize(&caps[1]))
			.into_owned();
	}
	match snake.split_once('_') {
		Some((head, rest)) => format!("{head}{}", camelize(rest, true)),
		None => snake.to_string(),
	}
}

/// Convert a CamelCase (possibly qualified) name to snake_case.
///
/// # Examples
///
/// ```
/// use portrait_core::casing::underscore;
///
/// assert_eq!(underscore("BigCat"), "big_cat");
/// assert_eq!(underscore("Animals::HTTPCat"), "animals_http_cat");
/// assert_eq!(underscore("kebab-case"), "kebab_case");
/// ```
pub fn underscore(camel: &str) -> String {
	let joined = camel.replace(NAMESPACE_SEPARATOR, "_");
	let split = ACRONYM_BOUNDARY.replace_all(&joined, "${1}_${2}");
	let split = WORD_BOUNDARY.replace_all(&split, "${1}_${2}");
	split.replace('-', "_").to_lowercase()
}

/// Lowercase the first character, leaving the rest untouched.
pub fn uncapitalize(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
		None => String::new(),
	}
}

/// The unqualified, uncapitalized class name: `Animals::BigCat` -> `bigCat`.
pub fn extract_class(qualified: &str) -> String {
	let last = qualified
		.rsplit(NAMESPACE_SEPARATOR)
		.next()
		.unwrap_or(qualified);
	uncapitalize(last)
}

/// Wrapper keys for namespace wrapping, outermost first.
///
/// Takes the last `nesting_level` segments of `qualified` (all of them when
/// the class is nested less deeply) and transforms each with the same casing
/// rule as other keys.
///
/// # Examples
///
/// ```
/// use portrait_core::casing::namespace_keys;
///
/// let keys = namespace_keys("Zoo::BigAnimals::Cat", false, 2).unwrap();
/// assert_eq!(keys, vec!["big_animals", "cat"]);
///
/// let keys = namespace_keys("Zoo::BigAnimals::Cat", true, 10).unwrap();
/// assert_eq!(keys, vec!["zoo", "bigAnimals", "cat"]);
///
/// assert!(namespace_keys("Zoo::Cat", false, 0).is_err());
/// ```
pub fn namespace_keys(
	qualified: &str,
	camelize_keys: bool,
	nesting_level: usize,
) -> Result<Vec<String>, ArgumentError> {
	if nesting_level == 0 {
		return Err(ArgumentError::InvalidNestingLevel {
			found: nesting_level.to_string(),
		});
	}
	let segments: Vec<&str> = qualified.split(NAMESPACE_SEPARATOR).collect();
	let skip = segments.len().saturating_sub(nesting_level);
	Ok(segments[skip..]
		.iter()
		.map(|segment| {
			if camelize_keys {
				camelize(&uncapitalize(segment), false)
			} else {
				underscore(segment)
			}
		})
		.collect())
}

fn capitalize(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	#[case("foo", "foo")]
	#[case("foo_bar", "fooBar")]
	#[case("foo_bar_baz", "fooBarBaz")]
	#[case("created_at_utc", "createdAtUtc")]
	#[case("already", "already")]
	fn test_camelize_lower(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(camelize(input, false), expected);
	}

	#[rstest]
	#[case("foo_bar", "FooBar")]
	#[case("kitten", "Kitten")]
	#[case("with__double", "With_Double")]
	fn test_camelize_upper(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(camelize(input, true), expected);
	}

	#[rstest]
	#[case("Cat", "cat")]
	#[case("BigCat", "big_cat")]
	#[case("HTTPServer", "http_server")]
	#[case("Version2Api", "version2_api")]
	#[case("Zoo::BigCat", "zoo_big_cat")]
	#[case("snake_case", "snake_case")]
	fn test_underscore(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(underscore(input), expected);
	}

	#[rstest]
	#[case("Animals::Cat", "cat")]
	#[case("BigCat", "bigCat")]
	#[case("", "")]
	fn test_extract_class(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(extract_class(input), expected);
	}

	#[rstest]
	#[case(1, vec!["little_cat"])]
	#[case(2, vec!["big_animals", "little_cat"])]
	#[case(3, vec!["zoo", "big_animals", "little_cat"])]
	#[case(4, vec!["zoo", "big_animals", "little_cat"])]
	fn test_namespace_keys_saturate(#[case] level: usize, #[case] expected: Vec<&str>) {
		// Act
		let keys = namespace_keys("Zoo::BigAnimals::LittleCat", false, level).unwrap();

		// Assert
		assert_eq!(keys, expected);
	}

	#[rstest]
	fn test_namespace_keys_camelized() {
		let keys = namespace_keys("Zoo::BigAnimals::LittleCat", true, 666).unwrap();
		assert_eq!(keys, vec!["zoo", "bigAnimals", "littleCat"]);
	}

	#[rstest]
	fn test_namespace_keys_rejects_zero() {
		let err = namespace_keys("Zoo::Cat", true, 0).unwrap_err();
		assert!(matches!(err, ArgumentError::InvalidNestingLevel { .. }));
	}

	proptest! {
		#[test]
		fn prop_camelized_snake_keys_have_no_underscores(
			words in prop::collection::vec("[a-z][a-z0-9]{0,6}", 1..5)
		) {
			let snake = words.join("_");
			let camel = camelize(&snake, false);

			prop_assert!(!camel.contains('_'));
			prop_assert!(camel.starts_with(&words[0]));
			prop_assert_eq!(underscore(&camel).replace('_', ""), snake.replace('_', ""));
		}
	}
}
