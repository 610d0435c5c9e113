use std::sync::Arc;

use super::{TypeParser, TypeParserRegistry};
use crate::error::ConversionError;
use crate::types::{EnumType, ValueType};
use crate::value::{EnumValue, Value};

/// Parser for enumerations.
///
/// Plain enums are a case-insensitive name lookup. For flags enums a value
/// holding several separated names is parsed as an array of the same enum and
/// the members are OR-ed into one value.
pub struct EnumParser;

impl TypeParser for EnumParser {
    fn parse(
        &self,
        raw: &str,
        target: &ValueType,
        registry: &TypeParserRegistry,
    ) -> Result<Value, ConversionError> {
        let enum_type = match target {
            ValueType::Enum(enum_type) => enum_type,
            other => {
                return Err(ConversionError::Mismatch {
                    expected: "enumeration".into(),
                    found: other.to_string(),
                })
            }
        };

        if enum_type.flags && raw.contains(registry.array_separator()) {
            let array_type = ValueType::array_of(target.clone());
            let items = match registry.parse(raw, &array_type)? {
                Value::Array(items) => items,
                other => {
                    return Err(ConversionError::Mismatch {
                        expected: array_type.to_string(),
                        found: other.kind().to_string(),
                    })
                }
            };
            let bits = combine(&items, enum_type)?;
            return Ok(Value::Enum(EnumValue::new(Arc::clone(enum_type), bits)));
        }

        let name = raw.trim();
        enum_type
            .lookup(name)
            .map(|member| Value::Enum(EnumValue::new(Arc::clone(enum_type), member.value)))
            .ok_or_else(|| ConversionError::UnknownMember {
                raw: name.to_string(),
                enum_name: enum_type.name.clone(),
            })
    }

    fn accepted_values(&self, target: &ValueType, _registry: &TypeParserRegistry) -> Vec<String> {
        match target {
            ValueType::Enum(enum_type) => enum_type.names(),
            _ => Vec::new(),
        }
    }
}

/// The first element seeds the accumulator, the rest are OR-ed in.
fn combine(items: &[Value], enum_type: &EnumType) -> Result<i64, ConversionError> {
    let mut total = 0;
    for (i, item) in items.iter().enumerate() {
        let bits = match item {
            Value::Enum(e) => e.bits,
            other => {
                return Err(ConversionError::Mismatch {
                    expected: enum_type.name.clone(),
                    found: other.kind().to_string(),
                })
            }
        };
        total = if i == 0 { bits } else { total | bits };
    }
    Ok(total)
}
