//! Per-type field metadata used in place of runtime reflection.
//!
//! A validated struct exposes a [`StructDescriptor`] listing its fields in
//! declaration order. Each [`FieldDescriptor`] records the document key
//! (`yaml`), the rule tag (`validate`), the rules parsed from that tag, and
//! an accessor returning the field as a [`FieldAccess`] trait object.
//!
//! Descriptors are usually produced by [`validated_struct!`](crate::validated_struct),
//! which builds them once per type and caches them in a static.

use crate::error::ValidationFailure;
use crate::rule::{ValidationRule, parse_tag};
use crate::validator::{DynValidate, validate_struct};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use tagval_yaml::YamlWithSourceInfo;

/// A struct whose fields can be checked against a parsed document.
pub trait Validate: Sized + 'static {
    fn descriptor() -> &'static StructDescriptor<Self>;

    /// Validate against `node` using the process-wide registry.
    fn validate(&self, node: &YamlWithSourceInfo) -> Vec<ValidationFailure> {
        validate_struct(self, node)
    }
}

/// Field list of one struct type, in declaration order.
pub struct StructDescriptor<T> {
    name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> StructDescriptor<T> {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor<T>>) -> Self {
        Self { name, fields }
    }

    /// Start a descriptor and add fields one at a time.
    pub fn builder(name: &'static str) -> StructDescriptorBuilder<T> {
        StructDescriptorBuilder {
            name,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Incremental construction of a [`StructDescriptor`].
pub struct StructDescriptorBuilder<T> {
    name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> StructDescriptorBuilder<T> {
    pub fn field(mut self, field: FieldDescriptor<T>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> StructDescriptor<T> {
        StructDescriptor::new(self.name, self.fields)
    }
}

impl<T> fmt::Debug for StructDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Metadata for one field: names, rule tag and accessor.
pub struct FieldDescriptor<T> {
    name: &'static str,
    yaml: Option<String>,
    validate: Option<String>,
    rules: Vec<ValidationRule>,
    get: for<'a> fn(&'a T) -> &'a dyn FieldAccess,
}

impl<T> FieldDescriptor<T> {
    pub fn new(name: &'static str, get: for<'a> fn(&'a T) -> &'a dyn FieldAccess) -> Self {
        Self {
            name,
            yaml: None,
            validate: None,
            rules: Vec::new(),
            get,
        }
    }

    /// Set the document key this field is read from.
    pub fn yaml(mut self, key: impl Into<String>) -> Self {
        self.yaml = Some(key.into());
        self
    }

    /// Set the rule tag; it is parsed here, once.
    pub fn validate(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.rules = parse_tag(&tag);
        self.validate = Some(tag);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The document key: the `yaml` key when set and non-empty, else the field name.
    pub fn yaml_key(&self) -> &str {
        match self.yaml.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => self.name,
        }
    }

    /// The rule tag, or None when the field is not validated.
    pub fn validate_tag(&self) -> Option<&str> {
        self.validate.as_deref().filter(|tag| !tag.is_empty())
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    pub fn access<'a>(&self, target: &'a T) -> &'a dyn FieldAccess {
        (self.get)(target)
    }

    pub fn value<'a>(&self, target: &'a T) -> FieldValue<'a> {
        self.access(target).field_value()
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("yaml", &self.yaml)
            .field("validate", &self.validate)
            .finish_non_exhaustive()
    }
}

/// A borrowed view of a field's value, classified by kind.
///
/// Validators inspect this instead of the concrete field type.
#[derive(Clone, Copy)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    /// Sequence-like container, by length
    Seq(usize),
    /// Map-like container, by length
    Map(usize),
    /// `Option<T>` or another nullable indirection
    Optional(Option<&'a dyn FieldAccess>),
    /// A nested struct; never considered empty
    Struct,
    /// A [`YamlValue`] wrapper around the real value
    Wrapped(&'a dyn FieldAccess),
}

impl<'a> FieldValue<'a> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Str(_) => "string",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Uint(_) => "uint",
            FieldValue::Float(_) => "float",
            FieldValue::Seq(_) => "sequence",
            FieldValue::Map(_) => "map",
            FieldValue::Optional(_) => "optional",
            FieldValue::Struct => "struct",
            FieldValue::Wrapped(_) => "wrapped",
        }
    }

    /// Whether this is the zero value of its kind.
    ///
    /// Empty string or container, `false`, numeric zero, and `None` are
    /// empty. Structs and present optionals are not, whatever they contain.
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Str(s) => s.is_empty(),
            FieldValue::Bool(b) => !b,
            FieldValue::Int(n) => *n == 0,
            FieldValue::Uint(n) => *n == 0,
            FieldValue::Float(n) => *n == 0.0,
            FieldValue::Seq(len) | FieldValue::Map(len) => *len == 0,
            FieldValue::Optional(inner) => inner.is_none(),
            FieldValue::Struct => false,
            FieldValue::Wrapped(inner) => inner.field_value().is_zero(),
        }
    }

    /// Strip one [`FieldValue::Wrapped`] layer, if present.
    pub fn unwrapped(self) -> FieldValue<'a> {
        match self {
            FieldValue::Wrapped(inner) => inner.field_value(),
            other => other,
        }
    }

    /// Follow present optionals and wrappers down to the underlying value.
    ///
    /// An absent optional resolves to `Optional(None)`.
    pub fn resolved(self) -> FieldValue<'a> {
        let mut value = self;
        loop {
            match value {
                FieldValue::Optional(Some(inner)) | FieldValue::Wrapped(inner) => {
                    value = inner.field_value();
                }
                other => return other,
            }
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value widened so signed and unsigned compare exactly.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            FieldValue::Int(n) => Some(i128::from(*n)),
            FieldValue::Uint(n) => Some(i128::from(*n)),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.debug_tuple("Str").field(s).finish(),
            FieldValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            FieldValue::Int(n) => f.debug_tuple("Int").field(n).finish(),
            FieldValue::Uint(n) => f.debug_tuple("Uint").field(n).finish(),
            FieldValue::Float(n) => f.debug_tuple("Float").field(n).finish(),
            FieldValue::Seq(len) => f.debug_tuple("Seq").field(len).finish(),
            FieldValue::Map(len) => f.debug_tuple("Map").field(len).finish(),
            FieldValue::Optional(None) => f.write_str("Optional(None)"),
            FieldValue::Optional(Some(inner)) => f
                .debug_tuple("Optional")
                .field(&inner.field_value())
                .finish(),
            FieldValue::Struct => f.write_str("Struct"),
            FieldValue::Wrapped(inner) => f
                .debug_tuple("Wrapped")
                .field(&inner.field_value())
                .finish(),
        }
    }
}

/// Types that can be read as a [`FieldValue`].
///
/// Implemented for std scalars, strings, containers, `Option`, `Box`,
/// [`YamlValue`] and `serde_yaml::Value`; structs declared with
/// [`validated_struct!`](crate::validated_struct) get an implementation
/// reporting [`FieldValue::Struct`].
pub trait FieldAccess {
    fn field_value(&self) -> FieldValue<'_>;

    /// The struct behind this field, when it is itself validatable.
    fn as_validatable(&self) -> Option<&dyn DynValidate> {
        None
    }
}

impl FieldAccess for str {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self)
    }
}

impl FieldAccess for String {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self)
    }
}

impl FieldAccess for &str {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self)
    }
}

impl FieldAccess for bool {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Bool(*self)
    }
}

macro_rules! int_field_access {
    ($variant:ident, $wide:ty: $($t:ty),*) => {
        $(
            impl FieldAccess for $t {
                fn field_value(&self) -> FieldValue<'_> {
                    FieldValue::$variant(*self as $wide)
                }
            }
        )*
    };
}

int_field_access!(Int, i64: i8, i16, i32, i64, isize);
int_field_access!(Uint, u64: u8, u16, u32, u64, usize);
int_field_access!(Float, f64: f32, f64);

impl<T> FieldAccess for Vec<T> {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<T> FieldAccess for VecDeque<T> {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<T> FieldAccess for [T] {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<T, const N: usize> FieldAccess for [T; N] {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(N)
    }
}

impl<T, S> FieldAccess for HashSet<T, S> {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<T> FieldAccess for BTreeSet<T> {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Seq(self.len())
    }
}

impl<K, V, S> FieldAccess for HashMap<K, V, S> {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Map(self.len())
    }
}

impl<K, V> FieldAccess for BTreeMap<K, V> {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Map(self.len())
    }
}

impl<T: FieldAccess> FieldAccess for Option<T> {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Optional(self.as_ref().map(|v| v as &dyn FieldAccess))
    }
}

impl<T: FieldAccess + ?Sized> FieldAccess for Box<T> {
    fn field_value(&self) -> FieldValue<'_> {
        (**self).field_value()
    }

    fn as_validatable(&self) -> Option<&dyn DynValidate> {
        (**self).as_validatable()
    }
}

impl FieldAccess for serde_yaml::Value {
    fn field_value(&self) -> FieldValue<'_> {
        use serde_yaml::Value;
        match self {
            Value::Null => FieldValue::Optional(None),
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    FieldValue::Uint(u)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => FieldValue::Str(s),
            Value::Sequence(items) => FieldValue::Seq(items.len()),
            Value::Mapping(map) => FieldValue::Map(map.len()),
            Value::Tagged(tagged) => FieldValue::Wrapped(&tagged.value),
        }
    }
}

/// A decoded scalar kept behind one level of indirection.
///
/// Validation looks through the wrapper: rules see `value`, not the
/// wrapper itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YamlValue<T> {
    pub value: T,
}

impl<T> YamlValue<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T> From<T> for YamlValue<T> {
    fn from(value: T) -> Self {
        Self { value }
    }
}

impl<T: FieldAccess> FieldAccess for YamlValue<T> {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Wrapped(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values_per_kind() {
        assert!(String::new().field_value().is_zero());
        assert!(false.field_value().is_zero());
        assert!(0i32.field_value().is_zero());
        assert!(0u8.field_value().is_zero());
        assert!(0.0f64.field_value().is_zero());
        assert!(Vec::<u8>::new().field_value().is_zero());
        assert!(HashMap::<String, u8>::new().field_value().is_zero());
        assert!(None::<String>.field_value().is_zero());
    }

    #[test]
    fn test_non_zero_values() {
        assert!(!"x".field_value().is_zero());
        assert!(!true.field_value().is_zero());
        assert!(!(-1i64).field_value().is_zero());
        assert!(!vec![1].field_value().is_zero());
        // a present optional is not empty even if its content is
        assert!(!Some(String::new()).field_value().is_zero());
        assert!(!FieldValue::Struct.is_zero());
    }

    #[test]
    fn test_wrapper_unwraps_one_level() {
        let wrapped = YamlValue::new(30i64);
        assert!(matches!(wrapped.field_value(), FieldValue::Wrapped(_)));
        assert!(matches!(wrapped.field_value().unwrapped(), FieldValue::Int(30)));
    }

    #[test]
    fn test_resolved_follows_options() {
        let value = Some(YamlValue::new(String::from("a")));
        assert_eq!(value.field_value().resolved().as_str(), Some("a"));
        assert!(matches!(
            None::<i32>.field_value().resolved(),
            FieldValue::Optional(None)
        ));
    }

    #[test]
    fn test_unsigned_widening() {
        assert_eq!(u64::MAX.field_value().as_i128(), Some(i128::from(u64::MAX)));
        assert_eq!("1".field_value().as_i128(), None);
    }

    #[test]
    fn test_serde_yaml_value() {
        let value: serde_yaml::Value = serde_yaml::from_str("[1, 2]").unwrap();
        assert!(matches!(value.field_value(), FieldValue::Seq(2)));
        assert!(serde_yaml::Value::Null.field_value().is_zero());
    }

    struct Sample {
        name: String,
        age: u32,
    }

    #[test]
    fn test_descriptor_defaults_key_to_field_name() {
        let descriptor = StructDescriptor::builder("Sample")
            .field(
                FieldDescriptor::<Sample>::new("name", |s| &s.name)
                    .yaml("full_name")
                    .validate("required"),
            )
            .field(FieldDescriptor::<Sample>::new("age", |s| &s.age).yaml(""))
            .build();

        let name = descriptor.field("name").unwrap();
        assert_eq!(name.yaml_key(), "full_name");
        assert_eq!(name.rules().len(), 1);

        let age = descriptor.field("age").unwrap();
        assert_eq!(age.yaml_key(), "age");
        assert_eq!(age.validate_tag(), None);

        let sample = Sample {
            name: "x".into(),
            age: 3,
        };
        assert!(matches!(age.value(&sample), FieldValue::Uint(3)));
    }
}
