//! Core conversion engine
//!
//! A conversion is checked against the declared graph before anything else
//! runs, so an undeclared pair never triggers parse work. Declared pairs run
//! either a direct text transform or a parse-then-serialize pipeline.

use crate::conversion::config::ConversionOptions;
use crate::conversion::transform::{transform_for, DelimiterSwap};
use crate::conversion::ConversionResult;
use crate::error::{ConversionError, UnsupportedReason};
use crate::parser::{parser_for, Parser};
use crate::registry::{is_declared, FormatId};
use crate::serializer::{serializer_for, Serializer};
use std::fmt;
use std::time::Instant;

/// One conversion attempt
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input: String,
    pub from: FormatId,
    pub to: FormatId,
    pub options: ConversionOptions,
}

impl ConversionRequest {
    pub fn new(input: impl Into<String>, from: FormatId, to: FormatId) -> Self {
        Self {
            input: input.into(),
            from,
            to,
            options: ConversionOptions::default(),
        }
    }

    /// Build a request from format names, failing on names not in the registry
    pub fn from_names(input: impl Into<String>, from: &str, to: &str) -> ConversionResult<Self> {
        Ok(Self::new(input, from.parse()?, to.parse()?))
    }

    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.options = options;
        self
    }
}

/// How a declared pair is executed
#[derive(Clone, Copy)]
pub enum Route {
    DirectTransform(DelimiterSwap),
    Pipeline {
        parser: &'static dyn Parser,
        serializer: &'static dyn Serializer,
    },
}

impl Route {
    /// Short description, e.g. `comma-delimited -> xml`
    pub fn describe(&self) -> String {
        match self {
            Route::DirectTransform(swap) => {
                format!("delimiter swap {:?} -> {:?}", swap.from, swap.to)
            }
            Route::Pipeline { parser, serializer } => {
                format!("{} -> {}", parser.name(), serializer.name())
            }
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, Route::DirectTransform(_))
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::DirectTransform(swap) => f.debug_tuple("DirectTransform").field(swap).finish(),
            Route::Pipeline { parser, serializer } => f
                .debug_struct("Pipeline")
                .field("parser", &parser.name())
                .field("serializer", &serializer.name())
                .finish(),
        }
    }
}

/// Metadata about the conversion process
#[derive(Debug, Clone)]
pub struct ConversionMetadata {
    pub route: String,
    pub input_size: u64,
    pub output_size: u64,
    pub processing_time_ms: u64,
}

/// Successful conversion output
#[derive(Debug, Clone)]
pub struct Converted {
    pub content: String,
    pub metadata: ConversionMetadata,
}

impl Converted {
    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Main conversion engine
///
/// Stateless: every call reads the static registry and allocates its own
/// intermediate value, so one engine can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionEngine;

impl ConversionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the route for a pair without converting anything
    pub fn plan(&self, from: FormatId, to: FormatId) -> ConversionResult<Route> {
        let no_path = || ConversionError::unsupported(from, to, UnsupportedReason::NoPath);

        if !is_declared(from, to) {
            return Err(no_path());
        }
        if let Some(swap) = transform_for(from, to) {
            return Ok(Route::DirectTransform(swap));
        }

        let serializer = serializer_for(to).ok_or_else(no_path)?;
        Ok(Route::Pipeline {
            parser: parser_for(from),
            serializer,
        })
    }

    /// Run a conversion; all-or-nothing
    pub fn convert(&self, request: &ConversionRequest) -> ConversionResult<Converted> {
        let start_time = Instant::now();
        let route = self.plan(request.from, request.to)?;

        let content = match route {
            Route::DirectTransform(swap) => swap.apply(&request.input),
            Route::Pipeline { parser, serializer } => {
                let value = parser.parse(&request.input).map_err(ConversionError::failed)?;
                if !serializer.accepts(&value) {
                    return Err(ConversionError::unsupported(
                        request.from,
                        request.to,
                        UnsupportedReason::ShapeMismatch,
                    ));
                }
                serializer
                    .serialize_source(&value, &request.input, &request.options)
                    .map_err(ConversionError::failed)?
            }
        };

        let metadata = ConversionMetadata {
            route: route.describe(),
            input_size: request.input.len() as u64,
            output_size: content.len() as u64,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };
        Ok(Converted { content, metadata })
    }
}

/// Convert with a default engine
pub fn convert(request: &ConversionRequest) -> ConversionResult<Converted> {
    ConversionEngine::new().convert(request)
}
