use std::sync::LazyLock;

use regex::Regex;

use crate::error::CatalogError;
use crate::types::{eq_ignore_case, TypeHandle};

/// Characters that introduce a switch, e.g. `/name:value`.
pub const DEFAULT_PREFIX_CHARS: &[char] = &['/'];

/// Characters separating a switch name from its value.
pub const DEFAULT_DELIMITER_CHARS: &[char] = &[':'];

/// Pattern the name portion of a switch must match in full.
pub const DEFAULT_NAME_PATTERN: &str = "[_A-Za-z]+[_A-Za-z0-9]*";

/// Separator between array elements and between combined flag names.
pub const DEFAULT_ARRAY_SEPARATOR: char = ',';

/// Arguments that request help instead of binding.
pub const DEFAULT_HELP_COMMANDS: &[&str] = &["/?", "help", "/help", "/h"];

pub static DEFAULT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&anchored(DEFAULT_NAME_PATTERN)).unwrap());

/// Wrap a name pattern so it has to match the whole switch name.
pub fn anchored(pattern: &str) -> String {
    format!("^(?:{pattern})$")
}

// ---------------------------------------------------------------------------
// Type catalog
// ---------------------------------------------------------------------------

/// Caller-populated set of types that type-valued switches can name.
///
/// Registration order is lookup order. Two matchable entries may not share
/// a match name (compared case-insensitively); ignored entries are kept but
/// never matched.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: Vec<TypeHandle>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handle: TypeHandle) -> Result<(), CatalogError> {
        if !handle.ignored {
            if let Some(existing) = self.matchable().find(|t| t.matches(handle.match_name())) {
                return Err(CatalogError::DuplicateName {
                    name: handle.match_name().to_string(),
                    existing: existing.name.clone(),
                    added: handle.name.clone(),
                });
            }
        }
        self.types.push(handle);
        Ok(())
    }

    /// First matchable type whose match name equals `name`, ignoring case.
    pub fn find(&self, name: &str) -> Option<&TypeHandle> {
        let name = name.trim();
        self.matchable()
            .find(|t| eq_ignore_case(t.match_name(), name))
    }

    /// Match names of every matchable type, in registration order.
    pub fn match_names(&self) -> Vec<String> {
        self.matchable().map(|t| t.match_name().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeHandle> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn matchable(&self) -> impl Iterator<Item = &TypeHandle> {
        self.types.iter().filter(|t| !t.ignored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        catalog.register(TypeHandle::named("Hidden").friendly("json").ignore()).unwrap();
        catalog.register(TypeHandle::named("JsonFormatter").friendly("json")).unwrap();
        catalog.register(TypeHandle::named("XmlFormatter")).unwrap();
        catalog
    }

    #[test]
    fn find_skips_ignored_types() {
        let catalog = catalog();
        assert_eq!(catalog.find("JSON").map(|t| t.name.as_str()), Some("JsonFormatter"));
        assert_eq!(catalog.find("xmlformatter").map(|t| t.name.as_str()), Some("XmlFormatter"));
        assert!(catalog.find("Hidden").is_none());
        assert!(catalog.find("yaml").is_none());
    }

    #[test]
    fn friendly_name_hides_raw_name() {
        assert!(catalog().find("JsonFormatter").is_none());
    }

    #[test]
    fn duplicate_match_name_rejected() {
        let mut catalog = catalog();
        let err = catalog
            .register(TypeHandle::named("OtherJson").friendly("Json"))
            .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateName {
                name: "Json".into(),
                existing: "JsonFormatter".into(),
                added: "OtherJson".into(),
            }
        );
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn ignored_duplicates_are_allowed() {
        let mut catalog = catalog();
        assert!(catalog.register(TypeHandle::named("Json2").friendly("json").ignore()).is_ok());
        assert_eq!(catalog.match_names(), vec!["json", "XmlFormatter"]);
    }

    #[test]
    fn default_name_pattern_is_anchored() {
        assert!(DEFAULT_NAME_RE.is_match("_level2"));
        assert!(!DEFAULT_NAME_RE.is_match("2level"));
        assert!(!DEFAULT_NAME_RE.is_match("level-two"));
    }
}
