//! XML output
//!
//! The inverse of the XML parser's mapping: `@name` keys become attributes,
//! `#text` becomes element text, list values repeat their element, and
//! list entries without a key of their own are wrapped in the item element.

use super::Serializer;
use crate::conversion::ConversionOptions;
use crate::error::{SerializeError, SerializeResult};
use crate::model::shape::{cell_text, to_structured};
use crate::model::Intermediate;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::Value;
use std::io::Write;

/// XML output (`quick-xml` writer)
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlSerializer;

impl XmlSerializer {
    pub fn render_value(&self, value: &Value, options: &ConversionOptions) -> SerializeResult<String> {
        let mut writer = new_writer(options)?;
        let root = element_name(&options.root_element);
        write_element(&mut writer, &root, value, options)?;
        finish(writer)
    }
}

impl Serializer for XmlSerializer {
    fn serialize(&self, value: &Intermediate, options: &ConversionOptions) -> SerializeResult<String> {
        let tree = to_structured(value)?;
        self.render_value(&tree, options)
    }

    fn name(&self) -> &'static str {
        "xml"
    }
}

/// Writer with the XML declaration already written; indents when pretty
pub(crate) fn new_writer(options: &ConversionOptions) -> SerializeResult<Writer<Vec<u8>>> {
    let mut writer = if options.pretty && options.indent_size > 0 {
        Writer::new_with_indent(Vec::new(), b' ', options.indent_size as usize)
    } else {
        Writer::new(Vec::new())
    };
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;
    Ok(writer)
}

pub(crate) fn finish(writer: Writer<Vec<u8>>) -> SerializeResult<String> {
    String::from_utf8(writer.into_inner()).map_err(|e| SerializeError::render(e.to_string()))
}

/// Valid XML element or attribute name for an arbitrary key
pub fn element_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if !name.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        name.insert(0, '_');
    }
    name
}

/// Write a keyed value; a list repeats the element once per entry
fn write_keyed<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &Value,
    options: &ConversionOptions,
) -> SerializeResult<()> {
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item, options)?;
            }
            Ok(())
        }
        other => write_element(writer, name, other, options),
    }
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &Value,
    options: &ConversionOptions,
) -> SerializeResult<()> {
    match value {
        Value::Object(map) => {
            let mut start = BytesStart::new(name);
            let mut text = None;
            let mut children = Vec::new();
            for (key, child) in map {
                if let Some(attribute) = key.strip_prefix('@') {
                    start.push_attribute((element_name(attribute).as_str(), cell_text(child).as_str()));
                } else if key == "#text" {
                    text = Some(cell_text(child));
                } else {
                    children.push((element_name(key), child));
                }
            }

            if text.is_none() && children.is_empty() {
                return writer.write_event(Event::Empty(start)).map_err(write_error);
            }

            writer.write_event(Event::Start(start)).map_err(write_error)?;
            if let Some(text) = text {
                writer
                    .write_event(Event::Text(BytesText::new(&text)))
                    .map_err(write_error)?;
            }
            for (child_name, child) in children {
                write_keyed(writer, &child_name, child, options)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(write_error)
        }
        Value::Array(items) => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(write_error)?;
            let item_name = element_name(&options.item_element);
            for item in items {
                write_element(writer, &item_name, item, options)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(write_error)
        }
        Value::Null => writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(write_error),
        scalar => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(write_error)?;
            writer
                .write_event(Event::Text(BytesText::new(&cell_text(scalar))))
                .map_err(write_error)?;
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(write_error)
        }
    }
}

pub(crate) fn write_error(error: quick_xml::Error) -> SerializeError {
    SerializeError::render(format!("Failed to write XML: {}", error))
}
