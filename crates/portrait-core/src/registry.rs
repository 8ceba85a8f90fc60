//! Per-class schema registry.
//!
//! A [`ClassDef`] records, once, everything the engine needs to know about a
//! class: its declared schema, key aliases, delegation target, tagged
//! serializers and the accessors bound to each method name. Entries are
//! written when the class is built and only read afterwards.
//!
//! Rust has no reflection, so accessors are closures bound at declaration
//! time through [`ClassBuilder::method`]. Inheritance is modelled by
//! embedding: a class that [`extends`](ClassBuilder::extends) a parent
//! supplies a projection to the embedded parent value, and parent methods
//! are reached through it.

mod builder;
mod object;
mod serializer;

pub use builder::ClassBuilder;
pub use object::Object;
pub use serializer::{Serializer, SerializerBuilder, SerializerDef, SerializerMethod, SerializerScope};

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::value::Value;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Tag under which a class's primary serializer is registered.
pub const DEFAULT_TAG: &str = "default";

/// An accessor bound to a method name.
///
/// Returns `None` when handed data of a different type.
pub type Accessor = Arc<dyn Fn(&dyn Any) -> Option<Value> + Send + Sync>;

pub(crate) type Projection = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;

pub(crate) type Iteration = Arc<dyn Fn(&dyn Any) -> Option<Vec<Value>> + Send + Sync>;

/// Where a class keeps its schema.
///
/// Adapters whose generated types share one class across unrelated rows can
/// ask for instance-scoped storage, which lets each [`Object`] carry its own
/// schema through [`Object::with_schema`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaStorage {
	#[default]
	Class,
	Instance,
}

pub(crate) struct Superclass {
	pub(crate) class: Arc<ClassDef>,
	pub(crate) project: Projection,
}

/// Registry entry of a declared class.
pub struct ClassDef {
	pub(crate) name: String,
	pub(crate) superclass: Option<Superclass>,
	pub(crate) schema: Option<Arc<Schema>>,
	pub(crate) aliases: IndexMap<String, String>,
	pub(crate) delegate: Option<Arc<ClassDef>>,
	pub(crate) serializers: IndexMap<String, Arc<SerializerDef>>,
	pub(crate) methods: IndexMap<String, Accessor>,
	pub(crate) iteration: Option<Iteration>,
	pub(crate) storage: SchemaStorage,
}

impl ClassDef {
	/// Fully qualified class name, segments separated by `::`.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The directly declared schema, if any.
	pub fn declared_schema(&self) -> Option<&Arc<Schema>> {
		self.schema.as_ref()
	}

	pub fn aliases(&self) -> &IndexMap<String, String> {
		&self.aliases
	}

	pub fn delegate(&self) -> Option<&Arc<ClassDef>> {
		self.delegate.as_ref()
	}

	pub fn superclass(&self) -> Option<&Arc<ClassDef>> {
		self.superclass.as_ref().map(|parent| &parent.class)
	}

	pub fn storage(&self) -> SchemaStorage {
		self.storage
	}

	/// Superclasses, nearest first.
	pub fn ancestors(&self) -> impl Iterator<Item = &Arc<ClassDef>> {
		std::iter::successors(self.superclass(), |class| class.superclass())
	}

	/// Whether this class is `name` or inherits from it.
	pub fn is_a(&self, name: &str) -> bool {
		self.name == name || self.ancestors().any(|class| class.name == name)
	}

	/// Whether `method` is bound on this class or an ancestor.
	pub fn has_method(&self, method: &str) -> bool {
		self.methods.contains_key(method) || self.ancestors().any(|class| class.methods.contains_key(method))
	}

	pub fn is_iterable(&self) -> bool {
		self.iteration.is_some() || self.ancestors().any(|class| class.iteration.is_some())
	}

	/// The effective schema of this class.
	///
	/// Precedence: the directly declared schema, then the delegation
	/// target's schema, then the first schema declared by an ancestor.
	/// Delegation is not inherited: a subclass of a delegating class that
	/// declares nothing itself fails with [`Error::UnknownSchema`].
	pub fn resolve_schema(&self) -> Result<Arc<Schema>> {
		if let Some(schema) = &self.schema {
			return Ok(Arc::clone(schema));
		}
		if let Some(target) = &self.delegate {
			return target.resolve_schema().map_err(|_| self.unknown_schema());
		}
		self.ancestors()
			.find_map(|class| class.schema.clone())
			.ok_or_else(|| self.unknown_schema())
	}

	/// Whether instances of this class can build their own schema.
	pub fn has_schema_capability(&self) -> bool {
		self.schema.is_some()
			|| self.delegate.is_some()
			|| self.serializers.contains_key(DEFAULT_TAG)
			|| self.ancestors().any(|class| class.schema.is_some())
	}

	/// The serializer registered under `tag`.
	///
	/// A missing default serializer is not an error; the class schema is used
	/// instead. Any other missing tag is [`Error::UnknownTag`].
	pub fn find_serializer(&self, tag: &str) -> Result<Option<Arc<SerializerDef>>> {
		match self.serializers.get(tag) {
			Some(serializer) => Ok(Some(Arc::clone(serializer))),
			None if tag == DEFAULT_TAG => Ok(None),
			None => Err(Error::UnknownTag {
				tag: tag.to_string(),
			}),
		}
	}

	pub fn serializer_tags(&self) -> impl Iterator<Item = &str> {
		self.serializers.keys().map(String::as_str)
	}

	fn unknown_schema(&self) -> Error {
		Error::UnknownSchema {
			class: self.name.clone(),
		}
	}

	/// Run `f` against this class and its ancestors, each with the data it
	/// owns, until one returns `Some`.
	pub(crate) fn find_in_chain<R>(
		&self,
		data: &dyn Any,
		f: &dyn Fn(&ClassDef, &dyn Any) -> Option<R>,
	) -> Option<R> {
		if let Some(found) = f(self, data) {
			return Some(found);
		}
		let parent = self.superclass.as_ref()?;
		let inner = (parent.project)(data)?;
		parent.class.find_in_chain(inner, f)
	}
}

impl fmt::Debug for ClassDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClassDef")
			.field("name", &self.name)
			.field("superclass", &self.superclass().map(|class| class.name()))
			.field("schema", &self.schema)
			.field("aliases", &self.aliases)
			.field("delegate", &self.delegate.as_ref().map(|class| class.name()))
			.field("serializers", &self.serializers.keys().collect::<Vec<_>>())
			.field("methods", &self.methods.keys().collect::<Vec<_>>())
			.field("storage", &self.storage)
			.finish()
	}
}

/// Typed handle to a declared class.
///
/// # Examples
///
/// ```
/// use portrait_core::registry::Class;
/// use portrait_core::schema;
/// use portrait_core::types::TypeDescriptor as T;
///
/// struct Animal {
///     name: String,
/// }
///
/// struct Cat {
///     animal: Animal,
/// }
///
/// let animals = Class::<Animal>::builder("Animal")
///     .schema(schema! { name: T::String })
///     .method("name", |animal: &Animal| animal.name.clone())
///     .build()
///     .unwrap();
///
/// let cats = Class::<Cat>::builder("Zoo::Cat")
///     .extends(&animals, |cat: &Cat| &cat.animal)
///     .build()
///     .unwrap();
///
/// let cat = cats.instance(Cat { animal: Animal { name: "Tom".into() } });
/// assert!(cat.is_a("Animal"));
/// assert_eq!(cat.call("name").unwrap(), "Tom".into());
/// assert!(cats.def().resolve_schema().is_ok());
/// ```
pub struct Class<T> {
	def: Arc<ClassDef>,
	_marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> Class<T> {
	/// Start declaring a class with a fully qualified name.
	pub fn builder(name: impl Into<String>) -> ClassBuilder<T> {
		ClassBuilder::new(name)
	}

	pub(crate) fn from_def(def: ClassDef) -> Self {
		Self {
			def: Arc::new(def),
			_marker: PhantomData,
		}
	}

	/// Wrap a value as an instance of this class.
	pub fn instance(&self, value: T) -> Object {
		Object::new(Arc::clone(&self.def), Arc::new(value))
	}

	pub fn def(&self) -> &Arc<ClassDef> {
		&self.def
	}

	pub fn name(&self) -> &str {
		self.def.name()
	}
}

impl<T> Clone for Class<T> {
	fn clone(&self) -> Self {
		Self {
			def: Arc::clone(&self.def),
			_marker: PhantomData,
		}
	}
}

impl<T> fmt::Debug for Class<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Class").field(&self.def.name).finish()
	}
}
