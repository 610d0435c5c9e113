use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock, Mutex};

use serde::Serialize;
use tracing::debug;

use crate::error::{ConversionError, SchemaError};
use crate::types::{short_type_name, SwitchDefinition, ValueType};
use crate::validator::AdditionalCheck;
use crate::value::Value;

// ---------------------------------------------------------------------------
// Target objects
// ---------------------------------------------------------------------------

/// An object whose members receive bound switch values.
pub trait SwitchTarget {
    /// Store a parsed value on `member`. [`Value::Null`] means "unset".
    fn assign(&mut self, member: &str, value: Value) -> Result<(), ConversionError>;

    /// Current value of `member`; `None` (or [`Value::Null`]) when unset.
    fn current(&self, member: &str) -> Option<Value>;

    /// Checks evaluated after the built-in ones, in order.
    fn additional_checks(&self) -> Vec<AdditionalCheck<'_>> {
        Vec::new()
    }
}

/// A target type with a statically declared switch set.
pub trait Params: SwitchTarget + 'static {
    fn declare(schema: &mut SchemaBuilder);
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Ordered switch definitions of one target type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    owner: String,
    switches: Vec<SwitchDefinition>,
}

impl Schema {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn switches(&self) -> &[SwitchDefinition] {
        &self.switches
    }

    /// Case-insensitive lookup by switch name.
    pub fn find(&self, name: &str) -> Option<&SwitchDefinition> {
        let lower = name.to_lowercase();
        self.switches
            .iter()
            .find(|s| s.name == name || s.name.to_lowercase() == lower)
    }

    pub fn len(&self) -> usize {
        self.switches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.switches.is_empty()
    }
}

/// One switch declaration, configured fluently from [`SchemaBuilder::switch`].
#[derive(Debug, Clone)]
pub struct SwitchDecl {
    member: String,
    name: Option<String>,
    value_type: ValueType,
    required: bool,
    allowed_values: Vec<String>,
    help: Option<String>,
}

impl SwitchDecl {
    /// Switch name when it differs from the member name.
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn required(&mut self) -> &mut Self {
        self.required = true;
        self
    }

    pub fn allowed_values<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn help(&mut self, help: impl Into<String>) -> &mut Self {
        self.help = Some(help.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    owner: String,
    decls: Vec<SwitchDecl>,
}

impl SchemaBuilder {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            decls: Vec::new(),
        }
    }

    /// Declare `member` as a switch. The switch name defaults to the member name.
    pub fn switch(&mut self, member: impl Into<String>, value_type: ValueType) -> &mut SwitchDecl {
        self.decls.push(SwitchDecl {
            member: member.into(),
            name: None,
            value_type,
            required: false,
            allowed_values: Vec::new(),
            help: None,
        });
        let last = self.decls.len() - 1;
        &mut self.decls[last]
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut switches = Vec::with_capacity(self.decls.len());

        for decl in self.decls {
            let name = decl.name.unwrap_or_else(|| decl.member.clone());
            if name.trim().is_empty() {
                return Err(SchemaError::EmptyName {
                    owner: self.owner,
                    member: decl.member,
                });
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(SchemaError::DuplicateSwitch {
                    owner: self.owner,
                    name,
                });
            }

            switches.push(SwitchDefinition {
                is_flags_enum: decl.value_type.is_flags_enum(),
                name,
                member: decl.member,
                owner: self.owner.clone(),
                value_type: decl.value_type,
                required: decl.required,
                allowed_values: decl.allowed_values,
                help: decl.help,
            });
        }

        Ok(Schema {
            owner: self.owner,
            switches,
        })
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

static SCHEMA_CACHE: LazyLock<Mutex<HashMap<TypeId, Arc<Schema>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Build the switch schema of `T`, once per type.
pub fn extract_schema<T: Params>() -> Result<Arc<Schema>, SchemaError> {
    let key = TypeId::of::<T>();
    if let Some(schema) = cache().get(&key) {
        return Ok(Arc::clone(schema));
    }

    let mut builder = SchemaBuilder::new(short_type_name::<T>());
    T::declare(&mut builder);
    let schema = Arc::new(builder.build()?);
    debug!(owner = schema.owner(), switches = schema.len(), "extracted switch schema");

    Ok(Arc::clone(cache().entry(key).or_insert(schema)))
}

fn cache() -> std::sync::MutexGuard<'static, HashMap<TypeId, Arc<Schema>>> {
    SCHEMA_CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
