//! Error taxonomy.
//!
//! Schema, syntax and catalog errors are configuration defects and stop the
//! session. Parse errors are collected per argument. Violations come out of
//! validation, first one only.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Duplicate switch name \"{name}\" in {owner}")]
    DuplicateSwitch { owner: String, name: String },

    #[error("Switch for member \"{member}\" of {owner} has an empty name")]
    EmptyName { owner: String, member: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("At least one switch prefix character is required")]
    NoPrefix,

    #[error("At least one name/value delimiter character is required")]
    NoDelimiter,

    #[error("Character '{0}' cannot be both a prefix and a delimiter")]
    Overlap(char),

    #[error("Invalid switch name pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Type name \"{name}\" is already used by {existing}; cannot register {added}")]
    DuplicateName {
        name: String,
        existing: String,
        added: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No type parser registered for {type_name}")]
pub struct NoParserFound {
    pub type_name: String,
}

/// Failure to turn a raw string, or a bound value, into the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("\"{raw}\" is not a valid {expected}")]
    Invalid { raw: String, expected: String },

    #[error("\"{raw}\" is not a member of {enum_name}")]
    UnknownMember { raw: String, enum_name: String },

    #[error("expected {expected}, found {found}")]
    Mismatch { expected: String, found: String },

    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: String },

    #[error("no member named \"{member}\"")]
    UnboundMember { member: String },

    #[error(transparent)]
    NoParser(#[from] NoParserFound),
}

/// Recoverable failure for one raw argument. Collected, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown parameter {name}!")]
    UnknownSwitch { name: String, position: usize },

    #[error("Invalid value \"{raw}\" for parameter {switch}: {source}")]
    TypeConversion {
        switch: String,
        raw: String,
        position: usize,
        #[source]
        source: ConversionError,
    },

    #[error("Malformed argument \"{arg}\"")]
    MalformedArgument { arg: String, position: usize },
}

impl ParseError {
    /// Index of the offending argument in the raw argument list.
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnknownSwitch { position, .. }
            | ParseError::TypeConversion { position, .. }
            | ParseError::MalformedArgument { position, .. } => *position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("Parameter {0} is required!")]
    RequiredMissing(String),

    #[error("Invalid value for parameter {0}!")]
    DisallowedValue(String),

    #[error("{0}")]
    Custom(String),
}

/// The one failure surfaced for an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    NoParser(#[from] NoParserFound),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Violation(#[from] Violation),
}
