use regex::Regex;
use tracing::trace;

use crate::catalogs::{
    anchored, DEFAULT_DELIMITER_CHARS, DEFAULT_NAME_PATTERN, DEFAULT_NAME_RE, DEFAULT_PREFIX_CHARS,
};
use crate::error::{ParseError, SyntaxError};
use crate::types::{RawToken, SyntaxConfig};

/// Compiled switch syntax: prefix characters, name/value delimiters and the
/// pattern a switch name has to match.
#[derive(Debug, Clone)]
pub struct SwitchSyntax {
    prefix_chars: Vec<char>,
    delimiter_chars: Vec<char>,
    name_pattern: String,
    name_re: Regex,
}

impl SwitchSyntax {
    pub fn new(
        prefix_chars: &[char],
        delimiter_chars: &[char],
        name_pattern: &str,
    ) -> Result<Self, SyntaxError> {
        if prefix_chars.is_empty() {
            return Err(SyntaxError::NoPrefix);
        }
        if delimiter_chars.is_empty() {
            return Err(SyntaxError::NoDelimiter);
        }
        if let Some(c) = prefix_chars.iter().find(|c| delimiter_chars.contains(c)) {
            return Err(SyntaxError::Overlap(*c));
        }
        let name_re = Regex::new(&anchored(name_pattern)).map_err(|e| SyntaxError::InvalidPattern {
            pattern: name_pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            prefix_chars: prefix_chars.to_vec(),
            delimiter_chars: delimiter_chars.to_vec(),
            name_pattern: name_pattern.to_string(),
            name_re,
        })
    }

    pub fn from_config(config: &SyntaxConfig) -> Result<Self, SyntaxError> {
        let prefix: Vec<char> = config.prefix_chars.chars().collect();
        let delimiter: Vec<char> = config.delimiter_chars.chars().collect();
        Self::new(&prefix, &delimiter, &config.name_pattern)
    }

    pub fn prefix_chars(&self) -> &[char] {
        &self.prefix_chars
    }

    pub fn delimiter_chars(&self) -> &[char] {
        &self.delimiter_chars
    }

    pub fn name_pattern(&self) -> &str {
        &self.name_pattern
    }

    pub fn is_valid_name(&self, name: &str) -> bool {
        self.name_re.is_match(name)
    }
}

impl Default for SwitchSyntax {
    fn default() -> Self {
        Self {
            prefix_chars: DEFAULT_PREFIX_CHARS.to_vec(),
            delimiter_chars: DEFAULT_DELIMITER_CHARS.to_vec(),
            name_pattern: DEFAULT_NAME_PATTERN.to_string(),
            name_re: DEFAULT_NAME_RE.clone(),
        }
    }
}

/// Split one raw argument into a switch name and raw value.
///
/// One prefix character is stripped, then the argument is split at the first
/// delimiter character. Without a delimiter the raw value is empty, which
/// marks a presence switch.
pub fn lex_arg(arg: &str, position: usize, syntax: &SwitchSyntax) -> Result<RawToken, ParseError> {
    let malformed = || ParseError::MalformedArgument {
        arg: arg.to_string(),
        position,
    };

    let mut chars = arg.chars();
    let body = match chars.next() {
        Some(c) if syntax.prefix_chars.contains(&c) => chars.as_str(),
        _ => return Err(malformed()),
    };

    let (name, raw_value) = match body.find(|c: char| syntax.delimiter_chars.contains(&c)) {
        Some(idx) => {
            let delimiter_len = body[idx..].chars().next().map_or(1, char::len_utf8);
            (&body[..idx], &body[idx + delimiter_len..])
        }
        None => (body, ""),
    };

    if !syntax.is_valid_name(name) {
        return Err(malformed());
    }

    trace!(position, switch = name, raw_value, "lexed switch");
    Ok(RawToken {
        name: name.to_string(),
        raw_value: raw_value.to_string(),
        position,
    })
}

/// Tokenize a whole argument list, keeping failures in argument order.
pub fn lex<S: AsRef<str>>(args: &[S], syntax: &SwitchSyntax) -> Vec<Result<RawToken, ParseError>> {
    args.iter()
        .enumerate()
        .map(|(position, arg)| lex_arg(arg.as_ref(), position, syntax))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token(name: &str, raw_value: &str, position: usize) -> RawToken {
        RawToken {
            name: name.into(),
            raw_value: raw_value.into(),
            position,
        }
    }

    #[test]
    fn lex_name_value() {
        let t = lex_arg("/name:value", 0, &SwitchSyntax::default()).unwrap();
        assert_eq!(t, token("name", "value", 0));
    }

    #[test]
    fn lex_presence_switch() {
        let t = lex_arg("/flag", 3, &SwitchSyntax::default()).unwrap();
        assert_eq!(t, token("flag", "", 3));
    }

    #[test]
    fn lex_splits_at_first_delimiter_only() {
        let t = lex_arg("/path:C:\\temp", 0, &SwitchSyntax::default()).unwrap();
        assert_eq!(t, token("path", "C:\\temp", 0));
    }

    #[test]
    fn lex_empty_value_after_delimiter() {
        let t = lex_arg("/name:", 0, &SwitchSyntax::default()).unwrap();
        assert_eq!(t, token("name", "", 0));
    }

    #[test]
    fn lex_rejects_missing_prefix() {
        let err = lex_arg("name:value", 1, &SwitchSyntax::default()).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedArgument {
                arg: "name:value".into(),
                position: 1
            }
        );
    }

    #[test]
    fn lex_rejects_bad_name() {
        let syntax = SwitchSyntax::default();
        assert!(lex_arg("/9lives", 0, &syntax).is_err());
        assert!(lex_arg("/", 0, &syntax).is_err());
        assert!(lex_arg("/a-b:1", 0, &syntax).is_err());
    }

    #[test]
    fn lex_custom_syntax() {
        let syntax = SwitchSyntax::new(&['-', '/'], &['=', ':'], "[a-z-]+").unwrap();
        assert_eq!(lex_arg("-out-dir=/tmp", 0, &syntax).unwrap(), token("out-dir", "/tmp", 0));
        assert_eq!(lex_arg("/mode:fast", 1, &syntax).unwrap(), token("mode", "fast", 1));
    }

    #[test]
    fn lex_keeps_order_of_failures() {
        let results = lex(&["/a:1", "oops", "/b"], &SwitchSyntax::default());
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().position(), 1);
        assert_eq!(results[2].as_ref().unwrap(), &token("b", "", 2));
    }

    #[test]
    fn syntax_validation() {
        assert_eq!(SwitchSyntax::new(&[], &[':'], "x").unwrap_err(), SyntaxError::NoPrefix);
        assert_eq!(SwitchSyntax::new(&['/'], &[], "x").unwrap_err(), SyntaxError::NoDelimiter);
        assert_eq!(
            SwitchSyntax::new(&['/', ':'], &[':'], "x").unwrap_err(),
            SyntaxError::Overlap(':')
        );
        assert!(matches!(
            SwitchSyntax::new(&['/'], &[':'], "[unclosed").unwrap_err(),
            SyntaxError::InvalidPattern { .. }
        ));
    }

    #[test]
    fn syntax_from_config() {
        let config = SyntaxConfig {
            prefix_chars: "-".into(),
            delimiter_chars: "=".into(),
            ..Default::default()
        };
        let syntax = SwitchSyntax::from_config(&config).unwrap();
        assert_eq!(syntax.prefix_chars(), &['-']);
        assert_eq!(syntax.name_pattern(), DEFAULT_NAME_PATTERN);
    }
}
