//! Top-level pipeline: help detection, binding, then checking.

use std::sync::Arc;

use tracing::debug;

use crate::binder::bind;
use crate::error::{ArgError, ParseError};
use crate::help::{describe, HelpOptions, SwitchHelp};
use crate::lexer::SwitchSyntax;
use crate::parsers::TypeParserRegistry;
use crate::schema::{extract_schema, Params, Schema, SwitchTarget};
use crate::validator::validate;

/// Syntax, parsers and help commands shared by binding sessions.
#[derive(Debug, Default)]
pub struct ArgParser {
    syntax: SwitchSyntax,
    registry: TypeParserRegistry,
    help: HelpOptions,
}

impl ArgParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_syntax(mut self, syntax: SwitchSyntax) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn with_registry(mut self, registry: TypeParserRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_help(mut self, help: HelpOptions) -> Self {
        self.help = help;
        self
    }

    pub fn syntax(&self) -> &SwitchSyntax {
        &self.syntax
    }

    pub fn registry(&self) -> &TypeParserRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeParserRegistry {
        &mut self.registry
    }

    pub fn help(&self) -> &HelpOptions {
        &self.help
    }

    /// Bind `args` onto `target` using the declared schema of `T`.
    pub fn parse<T, S>(&self, args: &[S], target: T) -> Result<Parsed<T>, ArgError>
    where
        T: Params,
        S: AsRef<str>,
    {
        let schema = extract_schema::<T>()?;
        self.parse_with_schema(schema, args, target)
    }

    /// Bind `args` onto `target` using a schema built at runtime.
    pub fn parse_with_schema<T, S>(
        &self,
        schema: Arc<Schema>,
        args: &[S],
        mut target: T,
    ) -> Result<Parsed<T>, ArgError>
    where
        T: SwitchTarget,
        S: AsRef<str>,
    {
        if self.help.is_help_request(args) {
            debug!(owner = schema.owner(), "help requested, binding skipped");
            return Ok(Parsed {
                target,
                schema,
                exceptions: Vec::new(),
                help_requested: true,
            });
        }

        let exceptions = bind(args, &schema, &self.syntax, &self.registry, &mut target)?;
        debug!(
            owner = schema.owner(),
            args = args.len(),
            failures = exceptions.len(),
            "arguments bound"
        );
        Ok(Parsed {
            target,
            schema,
            exceptions,
            help_requested: false,
        })
    }

    pub fn describe(&self, schema: &Schema) -> Vec<SwitchHelp> {
        describe(schema, &self.registry)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    HelpRequested,
}

/// A bound target together with what went wrong while binding it.
#[derive(Debug)]
pub struct Parsed<T> {
    target: T,
    schema: Arc<Schema>,
    exceptions: Vec<ParseError>,
    help_requested: bool,
}

impl<T: SwitchTarget> Parsed<T> {
    /// Surface the first parse exception, else the first violation.
    pub fn check(&self) -> Result<Outcome, ArgError> {
        if self.help_requested {
            return Ok(Outcome::HelpRequested);
        }
        if let Some(first) = self.exceptions.first() {
            return Err(first.clone().into());
        }
        match validate(&self.schema, &self.target) {
            Some(violation) => Err(violation.into()),
            None => Ok(Outcome::Pass),
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    pub fn exceptions(&self) -> &[ParseError] {
        &self.exceptions
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn help_requested(&self) -> bool {
        self.help_requested
    }
}
