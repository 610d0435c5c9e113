//! Type parsers: conversion of raw switch values into typed [`Value`]s.
//!
//! The registry resolves a parser for a [`ValueType`] in a fixed order:
//! exact registration, array element type, enumeration, catalog type name,
//! then the registered fallback.

pub mod array;
pub mod enumeration;
pub mod primitive;
pub mod type_name;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::catalogs::{TypeCatalog, DEFAULT_ARRAY_SEPARATOR};
use crate::error::{ConversionError, NoParserFound};
use crate::types::ValueType;
use crate::value::Value;

pub use array::ArrayParser;
pub use enumeration::EnumParser;
pub use primitive::PrimitiveParser;
pub use type_name::CatalogTypeParser;

/// Converts a raw switch value into a value of the requested type.
pub trait TypeParser: Send + Sync {
    fn parse(
        &self,
        raw: &str,
        target: &ValueType,
        registry: &TypeParserRegistry,
    ) -> Result<Value, ConversionError>;

    /// Values this parser accepts for `target`; empty when unconstrained.
    fn accepted_values(&self, _target: &ValueType, _registry: &TypeParserRegistry) -> Vec<String> {
        Vec::new()
    }
}

pub struct TypeParserRegistry {
    parsers: HashMap<String, Arc<dyn TypeParser>>,
    fallback: Option<Arc<dyn TypeParser>>,
    array: Arc<dyn TypeParser>,
    enumeration: Arc<dyn TypeParser>,
    type_name: Arc<dyn TypeParser>,
    catalog: TypeCatalog,
    array_separator: char,
}

impl TypeParserRegistry {
    /// Registry with the primitive parsers and the built-in compound parsers.
    pub fn new() -> Self {
        let mut registry = Self {
            parsers: HashMap::new(),
            fallback: None,
            array: Arc::new(ArrayParser),
            enumeration: Arc::new(EnumParser),
            type_name: Arc::new(CatalogTypeParser),
            catalog: TypeCatalog::new(),
            array_separator: DEFAULT_ARRAY_SEPARATOR,
        };

        let primitive: Arc<dyn TypeParser> = Arc::new(PrimitiveParser);
        for ty in [
            ValueType::Bool,
            ValueType::Int,
            ValueType::UInt,
            ValueType::Float,
            ValueType::Char,
            ValueType::Str,
        ] {
            registry.parsers.insert(ty.key(), Arc::clone(&primitive));
        }
        registry
    }

    pub fn with_catalog(mut self, catalog: TypeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_array_separator(mut self, separator: char) -> Self {
        self.array_separator = separator;
        self
    }

    /// Register a parser for exactly `ty`, replacing any previous one.
    pub fn register<P: TypeParser + 'static>(&mut self, ty: &ValueType, parser: P) -> &mut Self {
        self.parsers.insert(ty.key(), Arc::new(parser));
        self
    }

    /// Parser consulted when nothing else matches.
    pub fn set_fallback<P: TypeParser + 'static>(&mut self, parser: P) -> &mut Self {
        self.fallback = Some(Arc::new(parser));
        self
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut TypeCatalog {
        &mut self.catalog
    }

    pub fn array_separator(&self) -> char {
        self.array_separator
    }

    pub fn get_parser(&self, ty: &ValueType) -> Result<Arc<dyn TypeParser>, NoParserFound> {
        if let Some(parser) = self.parsers.get(&ty.key()) {
            return Ok(Arc::clone(parser));
        }
        let builtin = match ty {
            ValueType::Array(_) => Some(&self.array),
            ValueType::Enum(_) => Some(&self.enumeration),
            ValueType::TypeName => Some(&self.type_name),
            _ => self.fallback.as_ref(),
        };
        builtin.map(Arc::clone).ok_or_else(|| NoParserFound {
            type_name: ty.to_string(),
        })
    }

    /// Resolve the parser for `ty` and run it on `raw`.
    pub fn parse(&self, raw: &str, ty: &ValueType) -> Result<Value, ConversionError> {
        self.get_parser(ty)?.parse(raw, ty, self)
    }

    pub fn accepted_values(&self, ty: &ValueType) -> Vec<String> {
        self.get_parser(ty)
            .map(|parser| parser.accepted_values(ty, self))
            .unwrap_or_default()
    }
}

impl Default for TypeParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.parsers.keys().collect();
        keys.sort();
        f.debug_struct("TypeParserRegistry")
            .field("parsers", &keys)
            .field("fallback", &self.fallback.is_some())
            .field("catalog", &self.catalog)
            .field("array_separator", &self.array_separator)
            .finish()
    }
}
