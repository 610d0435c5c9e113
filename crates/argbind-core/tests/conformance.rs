use std::sync::{Arc, LazyLock};

use argbind_core::{
    AdditionalCheck, ArgError, ArgParser, ConversionError, EnumType, EnumValue, Outcome, Params,
    ParseError, SchemaBuilder, SwitchEnum, SwitchTarget, TypeCatalog, TypeHandle,
    TypeParserRegistry, Value, ValueType, Violation,
};
use pretty_assertions::assert_eq;

// ---------------------------------------------------------------------------
// Target types
// ---------------------------------------------------------------------------

static COLOR: LazyLock<Arc<EnumType>> = LazyLock::new(|| {
    Arc::new(
        EnumType::new("Color")
            .flags()
            .member("Red", 1)
            .member("Green", 2)
            .member("Blue", 4),
    )
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Circle,
    Square,
}

impl SwitchEnum for Shape {
    fn enum_type() -> Arc<EnumType> {
        static SHAPE: LazyLock<Arc<EnumType>> = LazyLock::new(|| {
            Arc::new(EnumType::new("Shape").member("Circle", 0).member("Square", 1))
        });
        Arc::clone(&SHAPE)
    }

    fn from_bits(bits: i64) -> Option<Self> {
        match bits {
            0 => Some(Shape::Circle),
            1 => Some(Shape::Square),
            _ => None,
        }
    }
}

struct CsvWriter;
struct TsvWriter;

#[derive(Debug, Default)]
struct Render {
    mode: Option<EnumValue>,
    shape: Option<Shape>,
    scale: Option<f64>,
    writer: Option<TypeHandle>,
    tags: Vec<String>,
    quiet: bool,
    verbose: bool,
}

impl SwitchTarget for Render {
    fn assign(&mut self, member: &str, value: Value) -> Result<(), ConversionError> {
        match member {
            "mode" => self.mode = value.into_typed()?,
            "shape" => {
                self.shape = value
                    .into_typed::<Option<EnumValue>>()?
                    .map(|e| e.to_enum::<Shape>())
                    .transpose()?
            }
            "scale" => self.scale = value.into_typed()?,
            "writer" => self.writer = value.into_typed()?,
            "tags" => self.tags = value.into_typed()?,
            "quiet" => self.quiet = value.into_typed()?,
            "verbose" => self.verbose = value.into_typed()?,
            _ => {
                return Err(ConversionError::UnboundMember {
                    member: member.to_string(),
                })
            }
        }
        Ok(())
    }

    fn current(&self, member: &str) -> Option<Value> {
        match member {
            "mode" => self.mode.clone().map(Value::Enum),
            "shape" => self
                .shape
                .map(|s| Value::Enum(EnumValue::new(Shape::enum_type(), s as i64))),
            "scale" => self.scale.map(Value::Float),
            "writer" => self.writer.clone().map(Value::Type),
            "tags" => Some(Value::Array(self.tags.iter().cloned().map(Value::Str).collect())),
            "quiet" => Some(Value::Bool(self.quiet)),
            "verbose" => Some(Value::Bool(self.verbose)),
            _ => None,
        }
    }

    fn additional_checks(&self) -> Vec<AdditionalCheck<'_>> {
        vec![AdditionalCheck::new(
            "/quiet and /verbose cannot be combined",
            || self.quiet && self.verbose,
        )]
    }
}

impl Params for Render {
    fn declare(schema: &mut SchemaBuilder) {
        schema
            .switch("mode", ValueType::Enum(Arc::clone(&COLOR)))
            .name("Mode")
            .required()
            .help("Colors to render with");
        schema.switch("shape", ValueType::enumeration::<Shape>());
        schema.switch("scale", ValueType::Float);
        schema.switch("writer", ValueType::TypeName);
        schema.switch("tags", ValueType::array_of(ValueType::Str));
        schema.switch("quiet", ValueType::Bool);
        schema.switch("verbose", ValueType::Bool);
    }
}

#[derive(Debug, Default)]
struct Levels {
    level: Option<i64>,
}

impl SwitchTarget for Levels {
    fn assign(&mut self, member: &str, value: Value) -> Result<(), ConversionError> {
        match member {
            "level" => self.level = value.into_typed()?,
            _ => {
                return Err(ConversionError::UnboundMember {
                    member: member.to_string(),
                })
            }
        }
        Ok(())
    }

    fn current(&self, member: &str) -> Option<Value> {
        match member {
            "level" => self.level.map(Value::Int),
            _ => None,
        }
    }
}

impl Params for Levels {
    fn declare(schema: &mut SchemaBuilder) {
        schema
            .switch("level", ValueType::Int)
            .name("Level")
            .required()
            .allowed_values(["1", "2", "3"]);
    }
}

fn parser() -> ArgParser {
    let mut catalog = TypeCatalog::new();
    catalog.register(TypeHandle::of::<CsvWriter>().friendly("csv")).unwrap();
    catalog.register(TypeHandle::of::<TsvWriter>()).unwrap();
    ArgParser::new().with_registry(TypeParserRegistry::new().with_catalog(catalog))
}

fn render(args: &[&str]) -> (Render, Result<Outcome, ArgError>) {
    let parsed = parser().parse(args, Render::default()).unwrap();
    let outcome = parsed.check();
    (parsed.into_target(), outcome)
}

// ===========================================================================
// End-to-end scenarios
// ===========================================================================

#[test]
fn flags_enum_combines_members() {
    let (target, outcome) = render(&["/Mode:Red,Blue"]);
    assert_eq!(outcome, Ok(Outcome::Pass));
    let mode = target.mode.unwrap();
    assert_eq!(mode.bits, 5);
    assert!(mode.contains(1) && mode.contains(4));
    assert_eq!(mode.name(), "Red, Blue");
}

#[test]
fn flags_enum_ignores_order_and_case() {
    let (a, _) = render(&["/mode:blue, GREEN,red"]);
    let (b, _) = render(&["/Mode:Red,Green,Blue"]);
    assert_eq!(a.mode.map(|m| m.bits), Some(7));
    assert_eq!(b.mode.map(|m| m.bits), Some(7));
}

#[test]
fn flags_enum_single_member() {
    let (target, outcome) = render(&["/Mode:green"]);
    assert_eq!(outcome, Ok(Outcome::Pass));
    assert_eq!(target.mode.map(|m| m.bits), Some(2));
}

#[test]
fn flags_enum_bad_member_is_conversion_error() {
    let (target, outcome) = render(&["/Mode:Red,Purple"]);
    assert!(target.mode.is_none());
    match outcome {
        Err(ArgError::Parse(ParseError::TypeConversion { switch, raw, position, .. })) => {
            assert_eq!(switch, "Mode");
            assert_eq!(raw, "Red,Purple");
            assert_eq!(position, 0);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn plain_enum_maps_to_rust_enum() {
    let (target, outcome) = render(&["/Mode:Red", "/shape:SQUARE"]);
    assert_eq!(outcome, Ok(Outcome::Pass));
    assert_eq!(target.shape, Some(Shape::Square));
}

#[test]
fn plain_enum_does_not_combine() {
    let (_, outcome) = render(&["/Mode:Red", "/shape:Circle,Square"]);
    assert!(matches!(
        outcome,
        Err(ArgError::Parse(ParseError::TypeConversion { ref switch, .. })) if switch == "shape"
    ));
}

#[test]
fn required_missing() {
    let parsed = parser().parse::<Levels, &str>(&[], Levels::default()).unwrap();
    assert_eq!(
        parsed.check(),
        Err(ArgError::Violation(Violation::RequiredMissing("Level".into())))
    );
    assert_eq!(
        parsed.check().unwrap_err().to_string(),
        "Parameter Level is required!"
    );
}

#[test]
fn disallowed_value() {
    let parsed = parser().parse(&["/Level:5"], Levels::default()).unwrap();
    let err = parsed.check().unwrap_err();
    assert_eq!(err, ArgError::Violation(Violation::DisallowedValue("Level".into())));
    assert_eq!(err.to_string(), "Invalid value for parameter Level!");
}

#[test]
fn allowed_value_passes() {
    let parsed = parser().parse(&["/level:2"], Levels::default()).unwrap();
    assert_eq!(parsed.check(), Ok(Outcome::Pass));
    assert_eq!(parsed.target().level, Some(2));
}

#[test]
fn unknown_switch_does_not_abort() {
    let (target, outcome) = render(&["/bogus:1", "/Mode:Blue", "/scale:1.5"]);
    assert_eq!(
        outcome,
        Err(ArgError::Parse(ParseError::UnknownSwitch {
            name: "bogus".into(),
            position: 0
        }))
    );
    assert_eq!(target.mode.map(|m| m.bits), Some(4));
    assert_eq!(target.scale, Some(1.5));
}

#[test]
fn every_failure_is_collected_in_order() {
    let parsed = parser()
        .parse(&["/scale:big", "loose", "/bogus", "/Mode:Red"], Render::default())
        .unwrap();
    let positions: Vec<usize> = parsed.exceptions().iter().map(ParseError::position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
    assert!(matches!(parsed.exceptions()[1], ParseError::MalformedArgument { .. }));
}

#[test]
fn type_name_resolves_through_catalog() {
    let (target, outcome) = render(&["/Mode:Red", "/writer:CSV"]);
    assert_eq!(outcome, Ok(Outcome::Pass));
    assert!(target.writer.unwrap().is::<CsvWriter>());

    let (target, _) = render(&["/Mode:Red", "/writer:tsvwriter"]);
    assert!(target.writer.unwrap().is::<TsvWriter>());
}

#[test]
fn unknown_type_name_leaves_member_unset() {
    let (target, outcome) = render(&["/Mode:Red", "/writer:yaml"]);
    assert_eq!(outcome, Ok(Outcome::Pass));
    assert!(target.writer.is_none());
}

#[test]
fn arrays_and_presence_switches() {
    let (target, outcome) = render(&["/Mode:Red", "/tags:a,b , c", "/quiet"]);
    assert_eq!(outcome, Ok(Outcome::Pass));
    assert_eq!(target.tags, vec!["a", "b", "c"]);
    assert!(target.quiet);
}

#[test]
fn additional_check_runs_after_built_in_checks() {
    let (_, outcome) = render(&["/quiet", "/verbose"]);
    assert_eq!(
        outcome,
        Err(ArgError::Violation(Violation::RequiredMissing("Mode".into())))
    );

    let (_, outcome) = render(&["/Mode:Red", "/quiet", "/verbose"]);
    assert_eq!(
        outcome,
        Err(ArgError::Violation(Violation::Custom(
            "/quiet and /verbose cannot be combined".into()
        )))
    );
}

#[test]
fn help_request_skips_everything() {
    let (target, outcome) = render(&["/Mode:Red", "/bogus", "/help"]);
    assert_eq!(outcome, Ok(Outcome::HelpRequested));
    assert!(target.mode.is_none());
}

#[test]
fn describe_reports_switches() {
    let parser = parser();
    let schema = argbind_core::extract_schema::<Render>().unwrap();
    let help = parser.describe(&schema);

    assert_eq!(help.len(), 7);
    assert_eq!(help[0].name, "Mode");
    assert_eq!(help[0].type_name, "Color");
    assert!(help[0].required);
    assert_eq!(help[0].accepted_values, vec!["Red", "Green", "Blue"]);
    assert_eq!(help[0].help.as_deref(), Some("Colors to render with"));
    assert_eq!(help[3].accepted_values, vec!["csv", "TsvWriter"]);
    assert_eq!(help[5].accepted_values, vec!["true", "false"]);
}
