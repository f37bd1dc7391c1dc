//! Record parsers backed by conformant tree grammars

use super::Parser;
use crate::error::{ParseError, ParseResult, Position};
use crate::model::Intermediate;
use serde_json::Value;

/// JSON parser (`serde_json`, key order preserved)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl JsonParser {
    pub fn parse_value(&self, text: &str) -> ParseResult<Value> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        serde_json::from_str(text).map_err(|e| {
            ParseError::malformed("JSON", json_error_position(&e), e.to_string())
        })
    }
}

impl Parser for JsonParser {
    fn parse(&self, text: &str) -> ParseResult<Intermediate> {
        self.parse_value(text).map(Intermediate::Structured)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// YAML parser (`serde_yaml`) producing the same tree as JSON
///
/// Anchors, tags and block scalars are handled by the grammar. Mapping keys
/// must be strings since the tree only has string-keyed maps.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl YamlParser {
    pub fn parse_value(&self, text: &str) -> ParseResult<Value> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        serde_yaml::from_str(text).map_err(|e| {
            let position = e
                .location()
                .map_or(Position::new(1, 1), |l| Position::new(l.line(), l.column()));
            ParseError::malformed("YAML", position, e.to_string())
        })
    }
}

impl Parser for YamlParser {
    fn parse(&self, text: &str) -> ParseResult<Intermediate> {
        self.parse_value(text).map(Intermediate::Structured)
    }

    fn name(&self) -> &'static str {
        "yaml"
    }
}

/// serde_json reports line 0 for errors not tied to a position
fn json_error_position(error: &serde_json::Error) -> Position {
    Position::new(error.line().max(1), error.column().max(1))
}
