use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::catalogs::{DEFAULT_DELIMITER_CHARS, DEFAULT_NAME_PATTERN, DEFAULT_PREFIX_CHARS};

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// Declared type of a switch member. Selects the parser used for its raw value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    Bool,
    Int,
    UInt,
    Float,
    Char,
    Str,
    Array(Box<ValueType>),
    Enum(Arc<EnumType>),
    /// A type resolved by name through the type catalog.
    TypeName,
    /// Caller-defined type; needs a parser registered under the same name.
    Custom(String),
}

impl ValueType {
    pub fn array_of(element: ValueType) -> Self {
        ValueType::Array(Box::new(element))
    }

    pub fn enumeration<E: SwitchEnum>() -> Self {
        ValueType::Enum(E::enum_type())
    }

    pub fn custom(name: impl Into<String>) -> Self {
        ValueType::Custom(name.into())
    }

    pub fn element(&self) -> Option<&ValueType> {
        match self {
            ValueType::Array(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_flags_enum(&self) -> bool {
        matches!(self, ValueType::Enum(e) if e.flags)
    }

    /// Registry key. Enum and custom names are namespaced so they cannot
    /// shadow the primitive keys.
    pub fn key(&self) -> String {
        match self {
            ValueType::Array(element) => format!("{}[]", element.key()),
            ValueType::Enum(e) => format!("enum:{}", e.name),
            ValueType::Custom(name) => format!("custom:{name}"),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Bool => f.write_str("bool"),
            ValueType::Int => f.write_str("int"),
            ValueType::UInt => f.write_str("uint"),
            ValueType::Float => f.write_str("float"),
            ValueType::Char => f.write_str("char"),
            ValueType::Str => f.write_str("string"),
            ValueType::Array(element) => write!(f, "{element}[]"),
            ValueType::Enum(e) => f.write_str(&e.name),
            ValueType::TypeName => f.write_str("type"),
            ValueType::Custom(name) => f.write_str(name),
        }
    }
}

impl Serialize for ValueType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

/// Name table of an enumeration. `flags` marks members meant to be OR-combined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumType {
    pub name: String,
    pub flags: bool,
    pub members: Vec<EnumMember>,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: false,
            members: Vec::new(),
        }
    }

    pub fn flags(mut self) -> Self {
        self.flags = true;
        self
    }

    pub fn member(mut self, name: impl Into<String>, value: i64) -> Self {
        self.members.push(EnumMember {
            name: name.into(),
            value,
        });
        self
    }

    /// Case-insensitive lookup by member name.
    pub fn lookup(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| eq_ignore_case(&m.name, name))
    }

    pub fn names(&self) -> Vec<String> {
        self.members.iter().map(|m| m.name.clone()).collect()
    }

    /// Render a value the way it reads back: a member name, the set flag
    /// names joined by ", ", or the number when no member covers it.
    pub fn format_bits(&self, bits: i64) -> String {
        if let Some(exact) = self.members.iter().find(|m| m.value == bits) {
            return exact.name.clone();
        }
        if !self.flags || bits == 0 {
            return bits.to_string();
        }

        let mut covered = 0;
        let mut names = Vec::new();
        for m in &self.members {
            if m.value != 0 && (bits & m.value) == m.value && (covered & m.value) != m.value {
                covered |= m.value;
                names.push(m.name.as_str());
            }
        }
        if covered == bits {
            names.join(", ")
        } else {
            bits.to_string()
        }
    }
}

/// Implemented by Rust enums that can be bound to switches.
pub trait SwitchEnum: Sized {
    fn enum_type() -> Arc<EnumType>;

    /// Map a (possibly combined) numeric value back to `Self`.
    fn from_bits(bits: i64) -> Option<Self>;
}

// ---------------------------------------------------------------------------
// Type catalog entries
// ---------------------------------------------------------------------------

/// A type the program knows about, resolvable by name from a switch value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeHandle {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ignored: bool,
    #[serde(skip)]
    type_id: Option<TypeId>,
}

impl TypeHandle {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            friendly_name: None,
            ignored: false,
            type_id: None,
        }
    }

    /// Handle for a Rust type, named after the last path segment of its type name.
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: Some(TypeId::of::<T>()),
            ..Self::named(short_type_name::<T>())
        }
    }

    pub fn friendly(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = Some(friendly_name.into());
        self
    }

    /// Exclude this type from name matching.
    pub fn ignore(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Name used for matching: the friendly name when declared, else the raw name.
    pub fn match_name(&self) -> &str {
        match self.friendly_name.as_deref() {
            Some(friendly) if !friendly.trim().is_empty() => friendly,
            _ => &self.name,
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        eq_ignore_case(self.match_name(), candidate)
    }

    pub fn type_id(&self) -> Option<TypeId> {
        self.type_id
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == Some(TypeId::of::<T>())
    }
}

// ---------------------------------------------------------------------------
// Switch definitions and tokens
// ---------------------------------------------------------------------------

/// One bindable member of a target object, with its declared constraints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchDefinition {
    pub name: String,
    pub member: String,
    pub owner: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub required: bool,
    #[serde(rename = "allowedValues")]
    pub allowed_values: Vec<String>,
    #[serde(rename = "isFlagsEnum")]
    pub is_flags_enum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub name: String,
    pub raw_value: String,
    pub position: usize,
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Serializable form of the switch syntax. Each character of `prefix_chars`
/// and `delimiter_chars` is accepted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxConfig {
    #[serde(default = "default_prefix_chars")]
    pub prefix_chars: String,
    #[serde(default = "default_delimiter_chars")]
    pub delimiter_chars: String,
    #[serde(default = "default_name_pattern")]
    pub name_pattern: String,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            prefix_chars: default_prefix_chars(),
            delimiter_chars: default_delimiter_chars(),
            name_pattern: default_name_pattern(),
        }
    }
}

fn default_prefix_chars() -> String {
    DEFAULT_PREFIX_CHARS.iter().collect()
}

fn default_delimiter_chars() -> String {
    DEFAULT_DELIMITER_CHARS.iter().collect()
}

fn default_name_pattern() -> String {
    DEFAULT_NAME_PATTERN.to_string()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

pub(crate) fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
