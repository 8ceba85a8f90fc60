//! Schema resolution and value assignment tests
//!
//! End-to-end builds covering nested schemas, type validation, cycles,
//! delegation, inheritance and aliases.

use portrait_conf::Options;
use portrait_core::registry::{Class, Object, SchemaStorage};
use portrait_core::schema;
use portrait_core::types::{ComposableTypes, TypeDescriptor as T, compose};
use portrait_core::value::Value;
use portrait_core::{Error, Schema};
use portrait_serializers::{Serializable, build_schema, serialize};
use rstest::*;
use serde_json::json;
use std::sync::OnceLock;

struct Note {
	foo: i64,
}

#[fixture]
fn notes() -> Class<Note> {
	Class::<Note>::builder("Note")
		.schema(schema! {
			foo: T::Integer,
			bar: T::Array,
			nested: { left: T::String, right: T::Bool },
		})
		.method("foo", |note: &Note| note.foo)
		.method("bar", |_: &Note| vec![1, 3, 5])
		.method("left", |_: &Note| "left")
		.method("right", |_: &Note| true)
		.build()
		.unwrap()
}

// ============================================================================
// Building
// ============================================================================

#[rstest]
fn test_build_schema_end_to_end(notes: Class<Note>) {
	// Arrange
	let note = notes.instance(Note { foo: 4 });

	// Act
	let json = build_schema(&note, &Options::new()).unwrap();

	// Assert
	assert_eq!(
		json,
		json!({"foo": 4, "bar": [1, 3, 5], "nested": {"left": "left", "right": true}})
	);
}

#[rstest]
fn test_serialize_preserves_declaration_order(notes: Class<Note>) {
	let note = notes.instance(Note { foo: 4 });

	let text = serialize(&note, &Options::new()).unwrap();

	assert_eq!(
		text,
		r#"{"foo":4,"bar":[1,3,5],"nested":{"left":"left","right":true}}"#
	);
	assert_eq!(note.serialize(&Options::new()).unwrap(), text);
}

#[rstest]
fn test_build_is_idempotent_and_leaves_schema_untouched(notes: Class<Note>) {
	// Arrange
	let note = notes.instance(Note { foo: 4 });
	let schema_before: Schema = (*notes.def().resolve_schema().unwrap()).clone();

	// Act
	let mut first = build_schema(&note, &Options::new()).unwrap();
	let second = build_schema(&note, &Options::new()).unwrap();
	first["nested"]["left"] = json!("mutated");
	let third = build_schema(&note, &Options::new()).unwrap();

	// Assert
	assert_eq!(second, third);
	assert_eq!(third["nested"]["left"], json!("left"));
	assert_eq!(*notes.def().resolve_schema().unwrap(), schema_before);
}

// ============================================================================
// Type validation
// ============================================================================

#[rstest]
fn test_wrong_type_names_key_expected_and_actual() {
	// Arrange
	struct Broken;
	let broken = Class::<Broken>::builder("Broken")
		.schema(schema! { foo: T::Integer })
		.method("foo", |_: &Broken| "string")
		.build()
		.unwrap();

	// Act
	let err = build_schema(&broken.instance(Broken), &Options::new()).unwrap_err();

	// Assert
	assert!(err.is_invalid_type());
	let message = err.to_string();
	assert!(message.contains("`foo`"));
	assert!(message.contains("Integer"));
	assert!(message.contains("String"));
}

#[rstest]
#[case(json!(true), true)]
#[case(json!(false), true)]
#[case(json!(null), true)]
#[case(json!(1), false)]
#[case(json!("true"), false)]
fn test_bool_leaves(#[case] returned: serde_json::Value, #[case] accepted: bool) {
	struct Flag(serde_json::Value);
	let flags = Class::<Flag>::builder("Flag")
		.schema(schema! { enabled: T::Bool })
		.method("enabled", |flag: &Flag| flag.0.clone())
		.build()
		.unwrap();

	let result = build_schema(&flags.instance(Flag(returned)), &Options::new());

	assert_eq!(result.is_ok(), accepted);
}

#[rstest]
fn test_instance_descriptor_accepts_subclasses() {
	// Arrange
	struct Person {
		name: &'static str,
	}
	struct Admin {
		person: Person,
	}
	struct Group {
		owner: Object,
	}
	let people = Class::<Person>::builder("Person")
		.schema(schema! { name: T::String })
		.method("name", |p: &Person| p.name)
		.build()
		.unwrap();
	let admins = Class::<Admin>::builder("Admin")
		.extends(&people, |a: &Admin| &a.person)
		.build()
		.unwrap();
	let groups = Class::<Group>::builder("Group")
		.schema(schema! { owner: T::instance("Person") })
		.method("owner", |g: &Group| g.owner.clone())
		.build()
		.unwrap();
	let group = groups.instance(Group {
		owner: admins.instance(Admin {
			person: Person { name: "root" },
		}),
	});

	// Act
	let json = build_schema(&group, &Options::new()).unwrap();

	// Assert
	assert_eq!(json, json!({"owner": {"name": "root"}}));
}

#[rstest]
fn test_composable_type_system_coerces_and_is_strict() {
	// Arrange
	struct Form {
		age: &'static str,
		nickname: Option<&'static str>,
	}
	let forms = Class::<Form>::builder("Form")
		.schema(schema! {
			age: compose::coercible_integer(),
			nickname: compose::optional(T::String),
		})
		.method("age", |f: &Form| f.age)
		.method("nickname", |f: &Form| f.nickname)
		.build()
		.unwrap();
	let strict = Class::<Form>::builder("StrictForm")
		.schema(schema! { nickname: T::String })
		.method("nickname", |f: &Form| f.nickname)
		.build()
		.unwrap();
	let options = Options::new().type_system(ComposableTypes);
	let form = Form {
		age: "42",
		nickname: None,
	};

	// Act
	let json = build_schema(&forms.instance(form), &options).unwrap();
	let err = build_schema(
		&strict.instance(Form {
			age: "1",
			nickname: None,
		}),
		&options,
	)
	.unwrap_err();

	// Assert
	assert_eq!(json, json!({"age": 42, "nickname": null}));
	assert_eq!(
		err.to_string(),
		"Wrong type for key `nickname`. Expected String, got Null."
	);
}

// ============================================================================
// Cycles
// ============================================================================

struct User {
	name: &'static str,
	friend: OnceLock<Object>,
}

#[fixture]
fn users() -> Class<User> {
	Class::<User>::builder("User")
		.schema(schema! { name: T::String, friend: T::instance("User") })
		.method("name", |u: &User| u.name)
		.method("friend", |u: &User| u.friend.get().cloned())
		.build()
		.unwrap()
}

#[rstest]
fn test_self_reference_breaks_cycle(users: Class<User>) {
	// Arrange
	let narcissus = users.instance(User {
		name: "narcissus",
		friend: OnceLock::new(),
	});
	let _ = narcissus
		.downcast_ref::<User>()
		.unwrap()
		.friend
		.set(narcissus.clone());

	// Act
	let json = build_schema(&narcissus, &Options::new()).unwrap();

	// Assert
	assert_eq!(
		json,
		json!({"name": "narcissus", "friend": {"name": "narcissus", "friend": null}})
	);
}

#[rstest]
fn test_skip_set_does_not_leak_between_calls(users: Class<User>) {
	// Arrange
	let alice = users.instance(User {
		name: "alice",
		friend: OnceLock::new(),
	});
	let bob = users.instance(User {
		name: "bob",
		friend: OnceLock::new(),
	});
	let _ = bob.downcast_ref::<User>().unwrap().friend.set(alice.clone());

	// Act
	let first = build_schema(&bob, &Options::new()).unwrap();
	let second = build_schema(&bob, &Options::new()).unwrap();

	// Assert
	let expected = json!({"name": "bob", "friend": {"name": "alice", "friend": null}});
	assert_eq!(first, expected);
	assert_eq!(second, expected);
}

#[rstest]
fn test_self_referencing_collection_is_null() {
	// Arrange
	struct Category {
		name: &'static str,
		children: OnceLock<Vec<Object>>,
	}
	let categories = Class::<Category>::builder("Category")
		.schema(schema! { name: T::String, children: T::Array })
		.method("name", |c: &Category| c.name)
		.method("children", |c: &Category| c.children.get().cloned().unwrap_or_default())
		.build()
		.unwrap();
	let leaf = categories.instance(Category {
		name: "leaf",
		children: OnceLock::new(),
	});
	let _ = leaf.downcast_ref::<Category>().unwrap().children.set(Vec::new());
	let root = categories.instance(Category {
		name: "root",
		children: OnceLock::new(),
	});
	let _ = root
		.downcast_ref::<Category>()
		.unwrap()
		.children
		.set(vec![leaf.clone(), root.clone()]);

	// Act
	let json = build_schema(&root, &Options::new()).unwrap();

	// Assert
	assert_eq!(
		json,
		json!({
			"name": "root",
			"children": [
				{"name": "leaf", "children": []},
				{"name": "root", "children": null}
			]
		})
	);
}

// ============================================================================
// Delegation, inheritance and aliases
// ============================================================================

struct Parent;
struct Child;
struct GrandChild {
	child: Child,
}

#[rstest]
fn test_delegation_uses_target_schema_with_own_methods() {
	// Arrange
	let parents = Class::<Parent>::builder("Parent")
		.schema(schema! { name: T::String })
		.method("name", |_: &Parent| "parent")
		.build()
		.unwrap();
	let children = Class::<Child>::builder("Child")
		.delegate_to(&parents)
		.method("name", |_: &Child| "child")
		.build()
		.unwrap();
	let grand_children = Class::<GrandChild>::builder("GrandChild")
		.extends(&children, |g: &GrandChild| &g.child)
		.build()
		.unwrap();

	// Act
	let child = build_schema(&children.instance(Child), &Options::new());
	let grand_child = build_schema(
		&grand_children.instance(GrandChild { child: Child }),
		&Options::new(),
	);

	// Assert
	assert_eq!(child.unwrap(), json!({"name": "child"}));
	let err = grand_child.unwrap_err();
	assert!(matches!(err, Error::UnknownSchema { ref class } if class == "GrandChild"));
}

#[rstest]
fn test_inherited_schema_and_methods() {
	// Arrange
	struct Animal {
		name: &'static str,
	}
	struct Cat {
		animal: Animal,
		lives: i64,
	}
	let animals = Class::<Animal>::builder("Animal")
		.schema(schema! { name: T::String })
		.method("name", |a: &Animal| a.name)
		.build()
		.unwrap();
	let cats = Class::<Cat>::builder("Cat")
		.extends(&animals, |c: &Cat| &c.animal)
		.method("lives", |c: &Cat| c.lives)
		.build()
		.unwrap();
	let cat = cats.instance(Cat {
		animal: Animal { name: "Tom" },
		lives: 9,
	});

	// Act
	let inherited = build_schema(&cat, &Options::new()).unwrap();

	// Assert
	assert_eq!(inherited, json!({"name": "Tom"}));
	assert_eq!(cat.call("lives").unwrap(), Value::from(9));
}

#[rstest]
fn test_unknown_schema() {
	struct Bare;
	let bare = Class::<Bare>::builder("Bare").build().unwrap();

	let err = build_schema(&bare.instance(Bare), &Options::new()).unwrap_err();

	assert_eq!(err.to_string(), "Can't serialize Bare - no schema was provided");
}

#[rstest]
fn test_alias_resolution() {
	// Arrange
	struct Account {
		login: &'static str,
	}
	let accounts = Class::<Account>::builder("Account")
		.schema(schema! { username: T::String, nested: { username: T::String } })
		.method("login", |a: &Account| a.login)
		.aliases_from_json(&json!({"username": "login"}))
		.unwrap()
		.build()
		.unwrap();

	// Act
	let json = build_schema(&accounts.instance(Account { login: "ada" }), &Options::new()).unwrap();

	// Assert
	assert_eq!(json, json!({"username": "ada", "nested": {"username": "ada"}}));
}

#[rstest]
fn test_missing_method_is_undefined_method() {
	let partial = Class::<Note>::builder("Partial")
		.schema(schema! { foo: T::Integer, baz: T::String })
		.method("foo", |n: &Note| n.foo)
		.build()
		.unwrap();

	let err = build_schema(&partial.instance(Note { foo: 1 }), &Options::new()).unwrap_err();

	assert!(err.is_undefined_method());
	assert_eq!(err.key(), Some("baz"));
}

// ============================================================================
// Dynamic and instance-scoped schemas
// ============================================================================

#[rstest]
fn test_schema_declared_from_json() {
	struct Row {
		id: i64,
	}
	let rows = Class::<Row>::builder("Row")
		.schema_from_json(&json!({"id": "Integer", "meta": {"kind": "String"}}))
		.unwrap()
		.method("id", |r: &Row| r.id)
		.method("kind", |_: &Row| "row")
		.build()
		.unwrap();

	let json = build_schema(&rows.instance(Row { id: 3 }), &Options::new()).unwrap();

	assert_eq!(json, json!({"id": 3, "meta": {"kind": "row"}}));
}

#[rstest]
fn test_instance_scoped_schema() {
	// Arrange
	struct Record {
		id: i64,
		title: &'static str,
	}
	let records = Class::<Record>::builder("Orm::Record")
		.schema(schema! { id: T::Integer })
		.method("id", |r: &Record| r.id)
		.method("title", |r: &Record| r.title)
		.storage(SchemaStorage::Instance)
		.build()
		.unwrap();
	let plain = records.instance(Record { id: 1, title: "a" });
	let custom = records
		.instance(Record { id: 2, title: "b" })
		.with_schema(schema! { title: T::String })
		.unwrap();

	// Act / Assert
	assert_eq!(build_schema(&plain, &Options::new()).unwrap(), json!({"id": 1}));
	assert_eq!(build_schema(&custom, &Options::new()).unwrap(), json!({"title": "b"}));
}
