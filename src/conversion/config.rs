//! Options passed to serializers

/// Default table name for generated SQL scaffolds
pub const DEFAULT_TABLE_NAME: &str = "data_table";

/// Default worksheet name for spreadsheet scaffolds
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Format-specific conversion options
///
/// Every field has a default, so a request without options is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    /// Naming hint for generated artifacts (SQL table, worksheet, model)
    pub name: Option<String>,
    /// Spaces per indentation level (0-8)
    pub indent_size: u8,
    /// Pretty-print output (vs compact)
    pub pretty: bool,
    /// Root element for XML output
    pub root_element: String,
    /// Element wrapping each list entry in XML output
    pub item_element: String,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            name: None,
            indent_size: 2,
            pretty: true,
            root_element: "root".to_string(),
            item_element: "item".to_string(),
        }
    }
}

impl ConversionOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the naming hint
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set indentation size
    pub fn with_indent_size(mut self, size: u8) -> Result<Self, String> {
        if size > 8 {
            return Err("Indent size must be 0-8 spaces".to_string());
        }
        self.indent_size = size;
        Ok(self)
    }

    /// Enable/disable pretty printing
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Set the XML root element name
    pub fn with_root_element(mut self, name: impl Into<String>) -> Self {
        self.root_element = name.into();
        self
    }

    /// Set the XML list item element name
    pub fn with_item_element(mut self, name: impl Into<String>) -> Self {
        self.item_element = name.into();
        self
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.indent_size > 8 {
            return Err("Indent size must be 0-8 spaces".to_string());
        }

        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("Name must not be blank".to_string());
            }
        }

        for (label, element) in [("Root", &self.root_element), ("Item", &self.item_element)] {
            if !is_xml_name(element) {
                return Err(format!("{} element '{}' is not a valid XML name", label, element));
            }
        }

        Ok(())
    }

    /// Table name for SQL scaffolds
    pub fn table_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_TABLE_NAME)
    }

    /// Worksheet name for spreadsheet scaffolds
    pub fn sheet_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_SHEET_NAME)
    }

    /// Indentation unit for pretty output
    pub fn indent(&self) -> String {
        " ".repeat(self.indent_size as usize)
    }
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
