use tracing::debug;

use super::{TypeParser, TypeParserRegistry};
use crate::error::ConversionError;
use crate::types::ValueType;
use crate::value::Value;

/// Resolves a type name against the registry's [`TypeCatalog`].
///
/// A name with no match yields [`Value::Null`], leaving the member unset.
///
/// [`TypeCatalog`]: crate::catalogs::TypeCatalog
pub struct CatalogTypeParser;

impl TypeParser for CatalogTypeParser {
    fn parse(
        &self,
        raw: &str,
        _target: &ValueType,
        registry: &TypeParserRegistry,
    ) -> Result<Value, ConversionError> {
        match registry.catalog().find(raw) {
            Some(handle) => Ok(Value::Type(handle.clone())),
            None => {
                debug!(name = raw, "no catalog type matches");
                Ok(Value::Null)
            }
        }
    }

    fn accepted_values(&self, _target: &ValueType, registry: &TypeParserRegistry) -> Vec<String> {
        registry.catalog().match_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::TypeCatalog;
    use crate::types::TypeHandle;

    struct CsvWriter;

    fn registry() -> TypeParserRegistry {
        let mut catalog = TypeCatalog::new();
        catalog.register(TypeHandle::of::<CsvWriter>().friendly("csv")).unwrap();
        catalog.register(TypeHandle::named("TsvWriter")).unwrap();
        catalog.register(TypeHandle::named("DebugWriter").ignore()).unwrap();
        TypeParserRegistry::new().with_catalog(catalog)
    }

    #[test]
    fn resolves_friendly_name() {
        match registry().parse("CSV", &ValueType::TypeName).unwrap() {
            Value::Type(handle) => assert!(handle.is::<CsvWriter>()),
            other => panic!("expected type, got {other:?}"),
        }
    }

    #[test]
    fn resolves_raw_name_without_friendly_name() {
        let v = registry().parse("tsvwriter", &ValueType::TypeName).unwrap();
        assert_eq!(v.to_string(), "TsvWriter");
    }

    #[test]
    fn no_match_is_null() {
        assert_eq!(registry().parse("DebugWriter", &ValueType::TypeName), Ok(Value::Null));
        assert_eq!(registry().parse("xml", &ValueType::TypeName), Ok(Value::Null));
    }

    #[test]
    fn accepted_values_are_match_names() {
        assert_eq!(
            registry().accepted_values(&ValueType::TypeName),
            vec!["csv", "TsvWriter"]
        );
    }

    #[test]
    fn array_of_type_names() {
        let v = registry()
            .parse("csv,tsvwriter", &ValueType::array_of(ValueType::TypeName))
            .unwrap();
        assert_eq!(v.to_json(), serde_json::json!(["csv", "TsvWriter"]));
    }
}
