//! Format conversion engine
//!
//! Converts structured data and code artifacts between tabular, record,
//! markup, notebook and script formats. Parsers turn raw text into an
//! intermediate value, serializers render that value as target text, and the
//! engine checks every pair against a declared conversion graph first.

pub mod cli;
pub mod conversion;
pub mod error;
pub mod model;
pub mod parser;
pub mod registry;
pub mod serializer;

// Re-export commonly used types
pub use conversion::{ConversionEngine, ConversionOptions, ConversionRequest, Converted, Route};
pub use error::{ConversionError, ConversionResult, ErrorKind, ParseError, SerializeError};
pub use model::{Intermediate, Table, TextDocument};
pub use registry::{describe, detect, reachable_targets, CapabilityIndex, FormatDescriptor, FormatId};

/// Convert `input` from one format to another with default options
pub fn convert_text(input: &str, from: FormatId, to: FormatId) -> ConversionResult<String> {
    let request = ConversionRequest::new(input, from, to);
    Ok(conversion::convert(&request)?.content)
}

/// Convert `input` with custom options
pub fn convert_text_with_options(
    input: &str,
    from: FormatId,
    to: FormatId,
    options: &ConversionOptions,
) -> ConversionResult<String> {
    let request = ConversionRequest::new(input, from, to).with_options(options.clone());
    Ok(conversion::convert(&request)?.content)
}
