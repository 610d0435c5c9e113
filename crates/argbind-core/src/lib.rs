pub mod binder;
pub mod catalogs;
pub mod dynamic;
pub mod error;
pub mod help;
pub mod lexer;
pub mod parsers;
pub mod schema;
pub mod session;
pub mod types;
pub mod validator;
pub mod value;

pub use binder::bind;
pub use catalogs::TypeCatalog;
pub use dynamic::DynamicTarget;
pub use error::{
    ArgError, CatalogError, ConversionError, NoParserFound, ParseError, SchemaError, SyntaxError,
    Violation,
};
pub use help::{describe, HelpOptions, SwitchHelp};
pub use lexer::{lex, lex_arg, SwitchSyntax};
pub use parsers::{TypeParser, TypeParserRegistry};
pub use schema::{extract_schema, Params, Schema, SchemaBuilder, SwitchTarget};
pub use session::{ArgParser, Outcome, Parsed};
pub use types::*;
pub use validator::{validate, AdditionalCheck};
pub use value::{EnumValue, FromValue, OtherValue, Value};
