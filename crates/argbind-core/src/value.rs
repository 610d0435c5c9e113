use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::ConversionError;
use crate::types::{EnumType, SwitchEnum, TypeHandle};

/// A parsed switch value, handed to the target object for assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent result, e.g. a type name with no catalog match.
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(String),
    Array(Vec<Value>),
    Enum(EnumValue),
    Type(TypeHandle),
    /// Produced by caller-registered parsers.
    Other(OtherValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Enum(_) => "enum",
            Value::Type(_) => "type",
            Value::Other(_) => "other",
        }
    }

    pub fn into_typed<T: FromValue>(self) -> Result<T, ConversionError> {
        T::from_value(self)
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::from(*n),
            Value::UInt(n) => serde_json::Value::from(*n),
            Value::Float(n) => serde_json::Value::from(*n),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Type(handle) => serde_json::Value::String(handle.match_name().to_string()),
            other => serde_json::Value::String(other.to_string()),
        }
    }

    fn mismatch(&self, expected: &str) -> ConversionError {
        ConversionError::Mismatch {
            expected: expected.to_string(),
            found: self.kind().to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::UInt(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Str(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Enum(e) => f.write_str(&e.name()),
            Value::Type(handle) => f.write_str(&handle.name),
            Value::Other(other) => f.write_str(&other.display),
        }
    }
}

// ---------------------------------------------------------------------------
// Enum values
// ---------------------------------------------------------------------------

/// An enumeration value; `bits` may combine several members of a flags enum.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub enum_type: Arc<EnumType>,
    pub bits: i64,
}

impl EnumValue {
    pub fn new(enum_type: Arc<EnumType>, bits: i64) -> Self {
        Self { enum_type, bits }
    }

    pub fn name(&self) -> String {
        self.enum_type.format_bits(self.bits)
    }

    pub fn contains(&self, bits: i64) -> bool {
        (self.bits & bits) == bits
    }

    pub fn to_enum<E: SwitchEnum>(&self) -> Result<E, ConversionError> {
        E::from_bits(self.bits).ok_or_else(|| ConversionError::OutOfRange {
            value: self.bits.to_string(),
            target: self.enum_type.name.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Caller-defined values
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct OtherValue {
    type_name: String,
    display: String,
    payload: Arc<dyn Any + Send + Sync>,
}

impl OtherValue {
    pub fn new<T>(type_name: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync + fmt::Display,
    {
        Self {
            type_name: type_name.into(),
            display: value.to_string(),
            payload: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

impl fmt::Debug for OtherValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtherValue")
            .field("type_name", &self.type_name)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

impl PartialEq for OtherValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && (Arc::ptr_eq(&self.payload, &other.payload) || self.display == other.display)
    }
}

// ---------------------------------------------------------------------------
// Typed conversion
// ---------------------------------------------------------------------------

/// Conversion from a bound [`Value`] into a target member's Rust type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(other.mismatch("bool")),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Str(s) => Ok(s),
            Value::Null => Err(Value::Null.mismatch("string")),
            other => Ok(other.to_string()),
        }
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Char(c) => Ok(c),
            other => Err(other.mismatch("char")),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Float(n) => Ok(n),
            Value::Int(n) => Ok(n as f64),
            Value::UInt(n) => Ok(n as f64),
            other => Err(other.mismatch("float")),
        }
    }
}

macro_rules! integer_from_value {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    let out_of_range = |v: String| ConversionError::OutOfRange {
                        value: v,
                        target: stringify!($t).to_string(),
                    };
                    match value {
                        Value::Int(n) => <$t>::try_from(n).map_err(|_| out_of_range(n.to_string())),
                        Value::UInt(n) => <$t>::try_from(n).map_err(|_| out_of_range(n.to_string())),
                        Value::Enum(e) => <$t>::try_from(e.bits).map_err(|_| out_of_range(e.bits.to_string())),
                        other => Err(other.mismatch(stringify!($t))),
                    }
                }
            }
        )*
    };
}

integer_from_value!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl FromValue for EnumValue {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Enum(e) => Ok(e),
            other => Err(other.mismatch("enum")),
        }
    }
}

impl FromValue for TypeHandle {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Type(handle) => Ok(handle),
            other => Err(other.mismatch("type")),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Array(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(other.mismatch("array")),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
