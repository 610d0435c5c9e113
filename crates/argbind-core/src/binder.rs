use tracing::debug;

use crate::error::{ConversionError, NoParserFound, ParseError};
use crate::lexer::{lex_arg, SwitchSyntax};
use crate::parsers::TypeParserRegistry;
use crate::schema::{Schema, SwitchTarget};
use crate::types::RawToken;

/// Bind raw arguments onto `target`.
///
/// Every argument is handled on its own: failures are collected in argument
/// order and never stop the remaining arguments from binding. A switch that
/// appears more than once keeps its last value. The only fatal outcome is a
/// switch type with no parser at all.
pub fn bind<S, T>(
    args: &[S],
    schema: &Schema,
    syntax: &SwitchSyntax,
    registry: &TypeParserRegistry,
    target: &mut T,
) -> Result<Vec<ParseError>, NoParserFound>
where
    S: AsRef<str>,
    T: SwitchTarget + ?Sized,
{
    let mut errors = Vec::new();

    for (position, arg) in args.iter().enumerate() {
        let token = match lex_arg(arg.as_ref(), position, syntax) {
            Ok(token) => token,
            Err(err) => {
                debug!(position, error = %err, "argument rejected");
                errors.push(err);
                continue;
            }
        };

        if let Err(err) = bind_token(&token, schema, registry, target)? {
            debug!(position, error = %err, "argument rejected");
            errors.push(err);
        }
    }

    Ok(errors)
}

fn bind_token<T: SwitchTarget + ?Sized>(
    token: &RawToken,
    schema: &Schema,
    registry: &TypeParserRegistry,
    target: &mut T,
) -> Result<Result<(), ParseError>, NoParserFound> {
    let Some(def) = schema.find(&token.name) else {
        return Ok(Err(ParseError::UnknownSwitch {
            name: token.name.clone(),
            position: token.position,
        }));
    };

    let parser = registry.get_parser(&def.value_type)?;
    let converted = parser
        .parse(&token.raw_value, &def.value_type, registry)
        .and_then(|value| {
            debug!(switch = %def.name, member = %def.member, %value, "bound switch");
            target.assign(&def.member, value)
        });

    match converted {
        Ok(()) => Ok(Ok(())),
        Err(ConversionError::NoParser(missing)) => Err(missing),
        Err(source) => Ok(Err(ParseError::TypeConversion {
            switch: def.name.clone(),
            raw: token.raw_value.clone(),
            position: token.position,
            source,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    use crate::dynamic::DynamicTarget;
    use crate::schema::SchemaBuilder;
    use crate::types::{EnumType, ValueType};
    use crate::value::Value;

    fn schema() -> Schema {
        let color = EnumType::new("Color")
            .flags()
            .member("Red", 1)
            .member("Green", 2)
            .member("Blue", 4);
        let mut builder = SchemaBuilder::new("Render");
        builder.switch("level", ValueType::Int).name("Level");
        builder.switch("mode", ValueType::Enum(Arc::new(color))).name("Mode");
        builder.switch("verbose", ValueType::Bool);
        builder.switch("tags", ValueType::array_of(ValueType::Str));
        builder.build().unwrap()
    }

    fn run(args: &[&str]) -> (DynamicTarget, Vec<ParseError>) {
        let mut target = DynamicTarget::new();
        let errors = bind(
            args,
            &schema(),
            &SwitchSyntax::default(),
            &TypeParserRegistry::new(),
            &mut target,
        )
        .unwrap();
        (target, errors)
    }

    #[test]
    fn binds_known_switches() {
        let (target, errors) = run(&["/level:3", "/Mode:Red,Blue", "/verbose", "/tags:a, b"]);
        assert!(errors.is_empty());
        assert_eq!(target.get("level"), Some(&Value::Int(3)));
        assert_eq!(target.get("mode").map(Value::to_string).as_deref(), Some("Red, Blue"));
        assert_eq!(target.get("verbose"), Some(&Value::Bool(true)));
        assert_eq!(
            target.get("tags"),
            Some(&Value::Array(vec![Value::Str("a".into()), Value::Str("b".into())]))
        );
    }

    #[test]
    fn collects_errors_and_keeps_going() {
        let (target, errors) = run(&["/bogus:1", "/level:x", "stray", "/verbose:false"]);
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors[0],
            ParseError::UnknownSwitch {
                name: "bogus".into(),
                position: 0
            }
        );
        assert!(matches!(
            &errors[1],
            ParseError::TypeConversion { switch, position: 1, .. } if switch == "Level"
        ));
        assert!(matches!(errors[2], ParseError::MalformedArgument { position: 2, .. }));
        assert_eq!(target.get("verbose"), Some(&Value::Bool(false)));
        assert!(target.get("level").is_none());
    }

    #[test]
    fn last_occurrence_wins() {
        let (target, errors) = run(&["/level:1", "/LEVEL:2"]);
        assert!(errors.is_empty());
        assert_eq!(target.get("level"), Some(&Value::Int(2)));
    }

    #[test]
    fn missing_parser_is_fatal() {
        let mut builder = SchemaBuilder::new("Net");
        builder.switch("port", ValueType::custom("Port"));
        let schema = builder.build().unwrap();

        let mut target = DynamicTarget::new();
        let err = bind(
            &["/port:80"],
            &schema,
            &SwitchSyntax::default(),
            &TypeParserRegistry::new(),
            &mut target,
        )
        .unwrap_err();
        assert_eq!(err.type_name, "Port");
    }

    #[test]
    fn missing_element_parser_is_fatal() {
        let mut builder = SchemaBuilder::new("Net");
        builder.switch("ports", ValueType::array_of(ValueType::custom("Port")));
        let schema = builder.build().unwrap();

        let mut target = DynamicTarget::new();
        let result = bind(
            &["/ports:80,443"],
            &schema,
            &SwitchSyntax::default(),
            &TypeParserRegistry::new(),
            &mut target,
        );
        assert!(result.is_err());
    }
}
