use std::collections::BTreeMap;

use crate::error::ConversionError;
use crate::schema::SwitchTarget;
use crate::value::Value;

/// A target with no fixed members: every bound value lands in a map keyed by
/// member name. Used when the switch set is only known at runtime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicTarget {
    values: BTreeMap<String, Value>,
}

impl DynamicTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, member: &str) -> Option<&Value> {
        self.values.get(member)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl SwitchTarget for DynamicTarget {
    fn assign(&mut self, member: &str, value: Value) -> Result<(), ConversionError> {
        // Null leaves the member unset.
        if value.is_null() {
            self.values.remove(member);
        } else {
            self.values.insert(member.to_string(), value);
        }
        Ok(())
    }

    fn current(&self, member: &str) -> Option<Value> {
        self.values.get(member).cloned()
    }
}
