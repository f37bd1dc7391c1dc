//! JSON and YAML output

use super::Serializer;
use crate::conversion::ConversionOptions;
use crate::error::{SerializeError, SerializeResult};
use crate::model::shape::to_structured;
use crate::model::Intermediate;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Render any serializable value as JSON honouring `pretty` and `indent_size`
pub fn to_json_text<T: Serialize + ?Sized>(
    value: &T,
    options: &ConversionOptions,
) -> SerializeResult<String> {
    if !options.pretty {
        return serde_json::to_string(value).map_err(|e| SerializeError::render(e.to_string()));
    }

    let indent = options.indent();
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| SerializeError::render(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| SerializeError::render(e.to_string()))
}

/// JSON output (`serde_json`)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, value: &Intermediate, options: &ConversionOptions) -> SerializeResult<String> {
        let tree = to_structured(value)?;
        to_json_text(&*tree, options)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// YAML output (`serde_yaml`)
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlSerializer;

impl YamlSerializer {
    pub fn render_value(&self, value: &Value) -> SerializeResult<String> {
        serde_yaml::to_string(value).map_err(|e| SerializeError::render(e.to_string()))
    }
}

impl Serializer for YamlSerializer {
    fn serialize(&self, value: &Intermediate, _options: &ConversionOptions) -> SerializeResult<String> {
        let tree = to_structured(value)?;
        self.render_value(&tree)
    }

    fn name(&self) -> &'static str {
        "yaml"
    }
}
