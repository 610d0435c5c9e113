use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::debug;

use argbind_core::{
    ArgParser, EnumType, HelpOptions, Schema, SchemaBuilder, SwitchSyntax, SyntaxConfig,
    TypeCatalog, TypeHandle, TypeParserRegistry, ValueType,
};

/// Switch schema file (YAML).
#[derive(Debug, Deserialize)]
pub struct SchemaFile {
    /// Owner name reported in schema output.
    #[serde(default = "default_owner")]
    pub name: String,
    #[serde(default)]
    pub syntax: SyntaxConfig,
    pub help_commands: Option<Vec<String>>,
    #[serde(default)]
    pub enums: Vec<EnumDecl>,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub switches: Vec<SwitchEntry>,
}

#[derive(Debug, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    #[serde(default)]
    pub flags: bool,
    pub members: Vec<EnumMemberDecl>,
}

#[derive(Debug, Deserialize)]
pub struct EnumMemberDecl {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub ignored: bool,
}

#[derive(Debug, Deserialize)]
pub struct SwitchEntry {
    pub name: String,
    /// Member the value is stored under; defaults to the switch name.
    pub member: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub allowed: Vec<String>,
    pub help: Option<String>,
}

fn default_owner() -> String {
    "Arguments".to_string()
}

/// Everything needed to bind against a schema file.
pub struct Loaded {
    pub schema: Arc<Schema>,
    pub parser: ArgParser,
}

pub fn read_schema_file(path: &Path) -> Result<SchemaFile> {
    if !path.exists() {
        bail!("Path does not exist: {}", path.display());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("Invalid schema file {}", path.display()))
}

pub fn load(path: &Path) -> Result<Loaded> {
    let file = read_schema_file(path)?;
    let loaded = build(&file)?;
    debug!(
        path = %path.display(),
        owner = loaded.schema.owner(),
        switches = loaded.schema.len(),
        catalog_types = loaded.parser.registry().catalog().len(),
        "loaded schema file"
    );
    Ok(loaded)
}

pub fn build(file: &SchemaFile) -> Result<Loaded> {
    let syntax = SwitchSyntax::from_config(&file.syntax)?;

    let mut catalog = TypeCatalog::new();
    for decl in &file.types {
        let mut handle = TypeHandle::named(&decl.name);
        if let Some(friendly) = &decl.friendly_name {
            handle = handle.friendly(friendly);
        }
        if decl.ignored {
            handle = handle.ignore();
        }
        catalog.register(handle)?;
    }

    let enums: Vec<Arc<EnumType>> = file.enums.iter().map(enum_type).collect();

    let mut builder = SchemaBuilder::new(&file.name);
    for entry in &file.switches {
        let value_type = parse_type(&entry.type_name, &enums)?;
        let member = entry.member.clone().unwrap_or_else(|| entry.name.clone());
        let decl = builder.switch(member, value_type).name(&entry.name);
        if entry.required {
            decl.required();
        }
        if !entry.allowed.is_empty() {
            decl.allowed_values(entry.allowed.iter().cloned());
        }
        if let Some(help) = &entry.help {
            decl.help(help);
        }
    }
    let schema = Arc::new(builder.build()?);

    let help = match &file.help_commands {
        Some(commands) => HelpOptions::new(commands.iter().cloned()),
        None => HelpOptions::default(),
    };
    let parser = ArgParser::new()
        .with_syntax(syntax)
        .with_registry(TypeParserRegistry::new().with_catalog(catalog))
        .with_help(help);

    Ok(Loaded { schema, parser })
}

fn enum_type(decl: &EnumDecl) -> Arc<EnumType> {
    let mut enum_type = EnumType::new(&decl.name);
    if decl.flags {
        enum_type = enum_type.flags();
    }
    for member in &decl.members {
        enum_type = enum_type.member(member.name.trim(), member.value);
    }
    Arc::new(enum_type)
}

/// Resolve a type name from the schema file. `X[]` is an array of `X`.
pub fn parse_type(name: &str, enums: &[Arc<EnumType>]) -> Result<ValueType> {
    let name = name.trim();
    if let Some(element) = name.strip_suffix("[]") {
        return Ok(ValueType::array_of(parse_type(element, enums)?));
    }

    let ty = match name.to_lowercase().as_str() {
        "bool" | "boolean" => ValueType::Bool,
        "int" | "integer" => ValueType::Int,
        "uint" => ValueType::UInt,
        "float" | "double" => ValueType::Float,
        "char" => ValueType::Char,
        "string" | "str" => ValueType::Str,
        "type" => ValueType::TypeName,
        _ => match enums.iter().find(|e| e.name == name) {
            Some(e) => ValueType::Enum(Arc::clone(e)),
            None => bail!("Unknown switch type \"{name}\""),
        },
    };
    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
name: Render
enums:
  - name: Color
    flags: true
    members:
      - { name: Red, value: 1 }
      - { name: Blue, value: 4 }
types:
  - { name: CsvWriter, friendly_name: csv }
switches:
  - { name: Mode, type: Color, required: true }
  - { name: sizes, type: "uint[]" }
  - { name: writer, type: type, help: Output writer }
"#;

    #[test]
    fn builds_schema_from_yaml() {
        let file: SchemaFile = serde_yaml::from_str(YAML).unwrap();
        let loaded = build(&file).unwrap();
        let schema = &loaded.schema;
        assert_eq!(schema.owner(), "Render");
        assert_eq!(schema.len(), 3);
        assert!(schema.switches()[0].is_flags_enum);
        assert_eq!(schema.switches()[1].value_type.to_string(), "uint[]");
        assert_eq!(schema.switches()[2].help.as_deref(), Some("Output writer"));
        assert!(loaded.parser.registry().catalog().find("CSV").is_some());
    }

    #[test]
    fn type_names() {
        let color = Arc::new(EnumType::new("Color"));
        let enums = vec![color];
        assert_eq!(parse_type("Boolean", &enums).unwrap(), ValueType::Bool);
        assert_eq!(
            parse_type("Color[]", &enums).unwrap().to_string(),
            "Color[]"
        );
        assert!(parse_type("Colour", &enums).is_err());
    }

    #[test]
    fn duplicate_catalog_names_fail() {
        let file: SchemaFile = serde_yaml::from_str(
            "types:\n  - { name: A, friendly_name: x }\n  - { name: B, friendly_name: X }\n",
        )
        .unwrap();
        assert!(build(&file).is_err());
    }
}
