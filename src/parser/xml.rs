//! XML parser producing the structured tree
//!
//! Mapping rules:
//! - an element with children or attributes becomes a key map
//! - attributes are stored under `@name`, text next to children under `#text`
//! - repeated child names collapse into a list
//! - text-only elements become strings, empty elements null
//! - the root element name is dropped; a root whose children all share one
//!   name (two or more of them, or a single `item`) becomes a list

use super::Parser;
use crate::error::{ParseError, ParseResult, Position};
use crate::model::Intermediate;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

const LIST_ITEM: &str = "item";

/// XML parser (`quick-xml` pull reader)
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser;

#[derive(Debug, Default)]
struct Frame {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<(String, Value)>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, content: &str, offset: usize) -> ParseResult<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute =
                attribute.map_err(|e| malformed(content, offset, e.to_string()))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| malformed(content, offset, e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            ..Default::default()
        })
    }

    fn into_value(self) -> Value {
        let text = self.text.trim();
        if self.attributes.is_empty() && self.children.is_empty() {
            return if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            };
        }

        let mut map = Map::new();
        for (key, value) in self.attributes {
            map.insert(format!("@{}", key), Value::String(value));
        }
        for (key, value) in self.children {
            match map.get_mut(&key) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(key, value);
                }
            }
        }
        if !text.is_empty() {
            map.insert("#text".to_string(), Value::String(text.to_string()));
        }
        Value::Object(map)
    }

    /// Root handling: a homogeneous child list becomes a list
    fn into_root_value(self) -> Value {
        let homogeneous = self.attributes.is_empty()
            && self.text.trim().is_empty()
            && !self.children.is_empty()
            && self.children.iter().all(|(name, _)| name == &self.children[0].0)
            && (self.children.len() > 1 || self.children[0].0 == LIST_ITEM);

        if homogeneous {
            Value::Array(self.children.into_iter().map(|(_, value)| value).collect())
        } else {
            self.into_value()
        }
    }
}

impl XmlParser {
    pub fn parse_value(&self, text: &str) -> ParseResult<Value> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let mut reader = Reader::from_str(text);
        reader.trim_text(true);

        let mut stack: Vec<Frame> = Vec::new();
        let mut root: Option<Frame> = None;

        loop {
            let offset = reader.buffer_position();
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    ensure_single_root(&root, text, offset)?;
                    stack.push(Frame::open(&start, text, offset)?);
                }
                Ok(Event::Empty(start)) => {
                    ensure_single_root(&root, text, offset)?;
                    let frame = Frame::open(&start, text, offset)?;
                    close_frame(frame, &mut stack, &mut root);
                }
                Ok(Event::End(_)) => {
                    // quick-xml has already checked that the end tag matches
                    let frame = stack
                        .pop()
                        .ok_or_else(|| malformed(text, offset, "unexpected closing tag"))?;
                    close_frame(frame, &mut stack, &mut root);
                }
                Ok(Event::Text(content)) => {
                    let unescaped = content
                        .unescape()
                        .map_err(|e| malformed(text, offset, e.to_string()))?;
                    push_text(&mut stack, &unescaped, text, offset)?;
                }
                Ok(Event::CData(content)) => {
                    let raw = String::from_utf8_lossy(&content).into_owned();
                    push_text(&mut stack, &raw, text, offset)?;
                }
                Ok(Event::Eof) => break,
                // Declarations, comments, processing instructions and doctypes carry no data
                Ok(_) => {}
                Err(e) => return Err(malformed(text, reader.buffer_position(), e.to_string())),
            }
        }

        if let Some(open) = stack.last() {
            return Err(malformed(
                text,
                text.len(),
                format!("unclosed element <{}>", open.name),
            ));
        }

        root.map(Frame::into_root_value)
            .ok_or_else(|| malformed(text, 0, "no root element"))
    }
}

impl Parser for XmlParser {
    fn parse(&self, text: &str) -> ParseResult<Intermediate> {
        self.parse_value(text).map(Intermediate::Structured)
    }

    fn name(&self) -> &'static str {
        "xml"
    }
}

fn close_frame(frame: Frame, stack: &mut Vec<Frame>, root: &mut Option<Frame>) {
    match stack.last_mut() {
        Some(parent) => {
            let name = frame.name.clone();
            parent.children.push((name, frame.into_value()));
        }
        None => *root = Some(frame),
    }
}

fn push_text(stack: &mut [Frame], chunk: &str, content: &str, offset: usize) -> ParseResult<()> {
    match stack.last_mut() {
        Some(frame) => {
            frame.text.push_str(chunk);
            Ok(())
        }
        None if chunk.trim().is_empty() => Ok(()),
        None => Err(malformed(content, offset, "text outside the root element")),
    }
}

fn ensure_single_root(root: &Option<Frame>, content: &str, offset: usize) -> ParseResult<()> {
    match root {
        Some(existing) => Err(malformed(
            content,
            offset,
            format!("second root element after <{}>", existing.name),
        )),
        None => Ok(()),
    }
}

fn malformed(content: &str, offset: usize, message: impl Into<String>) -> ParseError {
    ParseError::malformed("XML", Position::from_offset(content, offset), message)
}
