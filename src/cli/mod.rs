//! Command-line interface module

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::conversion::ConversionOptions;
use crate::error::{ConversionError, ErrorKind};
use crate::registry::FormatId;

pub mod path_mapping;

/// Default bound on input file size (100MB)
pub const DEFAULT_MAX_INPUT_SIZE: u64 = 100 * 1024 * 1024;

/// Main CLI arguments
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "formatconv")]
#[command(about = "Convert data and code artifacts between tabular, record, markup and script formats")]
#[command(version)]
#[command(long_about = None)]
pub struct Args {
    /// Input source (file or directory)
    #[arg()]
    pub input: Option<String>,

    /// Target format (e.g. json, tabular-csv, markdown)
    #[arg(short, long)]
    pub to: Option<String>,

    /// Source format; detected from the file name when omitted
    #[arg(short, long)]
    pub from: Option<String>,

    /// Output file path (default: stdout), or output directory for directory input
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Read input from standard input (requires --from)
    #[arg(long)]
    pub stdin: bool,

    /// Recursively process directories
    #[arg(long)]
    pub recursive: bool,

    /// Naming hint for generated artifacts (SQL table, worksheet, model)
    #[arg(long)]
    pub name: Option<String>,

    /// Spaces per indentation level (0-8, default: 2)
    #[arg(long)]
    pub indent: Option<u8>,

    /// Disable pretty-printing
    #[arg(long)]
    pub plain: bool,

    /// Root element name for XML output (default: root)
    #[arg(long)]
    pub root_element: Option<String>,

    /// Element wrapping list entries in XML output (default: item)
    #[arg(long)]
    pub item_element: Option<String>,

    /// Largest input file to read (e.g., 10MB, default: 100MB)
    #[arg(long)]
    pub max_input_size: Option<String>,

    /// Output conversion statistics
    #[arg(long)]
    pub stats: bool,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(long)]
    pub quiet: bool,

    /// Continue converting other files when one file fails
    #[arg(long)]
    pub continue_on_error: bool,

    /// Subcommands for registry queries
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List every registered format
    Formats,
    /// List the targets reachable from a format
    Targets {
        /// Source format
        format: String,
    },
    /// Detect the format of a file from its name
    Detect {
        /// File name or path
        file: PathBuf,
    },
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub args: Args,
    pub options: ConversionOptions,
    pub source: Option<FormatId>,
    pub target: FormatId,
    pub max_input_size: u64,
}

impl CliConfig {
    /// Create CLI configuration from arguments for a conversion run
    pub fn from_args(args: Args) -> Result<Self> {
        let target = args
            .to
            .as_deref()
            .ok_or_else(|| anyhow!("No target format given. Use --to <FORMAT>"))?
            .parse::<FormatId>()?;
        let source = args.from.as_deref().map(str::parse::<FormatId>).transpose()?;
        if args.stdin && source.is_none() {
            bail!("--stdin requires --from <FORMAT>");
        }

        let options = Self::create_options(&args)?;
        let max_input_size = parse_size(&args.max_input_size)?;

        Ok(Self {
            args,
            options,
            source,
            target,
            max_input_size,
        })
    }

    /// Create conversion options from CLI arguments
    fn create_options(args: &Args) -> Result<ConversionOptions> {
        let mut options = ConversionOptions::new().with_pretty(!args.plain);
        if let Some(indent) = args.indent {
            options = options.with_indent_size(indent).map_err(|e| anyhow!(e))?;
        }
        if let Some(name) = &args.name {
            options = options.with_name(name.clone());
        }
        if let Some(root) = &args.root_element {
            options = options.with_root_element(root.clone());
        }
        if let Some(item) = &args.item_element {
            options = options.with_item_element(item.clone());
        }

        options.validate().map_err(|e| anyhow!(e))?;
        Ok(options)
    }

    /// Check if we should continue on error
    pub fn continue_on_error(&self) -> bool {
        self.args.continue_on_error
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.args.quiet
    }

    /// Check if stats output is requested
    pub fn want_stats(&self) -> bool {
        self.args.stats
    }

    /// Get input source description
    pub fn input_description(&self) -> String {
        if self.args.stdin {
            "standard input".to_string()
        } else if let Some(input) = &self.args.input {
            format!("'{}'", input)
        } else {
            "no input specified".to_string()
        }
    }

    /// Get output destination description
    pub fn output_description(&self) -> String {
        if let Some(output) = &self.args.output {
            format!("'{}'", output.display())
        } else {
            "standard output".to_string()
        }
    }
}

/// Parse a size string (e.g., "100MB", "1GB", "500KB"); `None` gives the default
pub fn parse_size(limit: &Option<String>) -> Result<u64> {
    let Some(limit_str) = limit else {
        return Ok(DEFAULT_MAX_INPUT_SIZE);
    };

    let limit_str = limit_str.trim().to_uppercase();
    let invalid = || anyhow!("Invalid size: {}", limit_str);
    let (number, multiplier) = if let Some(n) = limit_str.strip_suffix("GB") {
        (n, 1024.0 * 1024.0 * 1024.0)
    } else if let Some(n) = limit_str.strip_suffix("MB") {
        (n, 1024.0 * 1024.0)
    } else if let Some(n) = limit_str.strip_suffix("KB") {
        (n, 1024.0)
    } else if let Some(n) = limit_str.strip_suffix('B') {
        (n, 1.0)
    } else {
        (limit_str.as_str(), 1.0)
    };

    let value = number.trim().parse::<f64>().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok((value * multiplier) as u64)
}

/// CLI utilities and helpers
pub struct CliUtils;

impl CliUtils {
    /// Format a file size in human-readable format
    pub fn format_file_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    /// Format a duration in human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_millis = duration.as_millis();

        if total_millis < 1000 {
            format!("{}ms", total_millis)
        } else if total_millis < 60_000 {
            format!("{:.1}s", total_millis as f64 / 1000.0)
        } else {
            let minutes = total_millis / 60_000;
            let seconds = (total_millis % 60_000) / 1000;
            format!("{}m {}s", minutes, seconds)
        }
    }

    /// Create a progress bar for file processing
    pub fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
        let style = indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
            .progress_chars("#>-");
        let pb = indicatif::ProgressBar::new(total);
        pb.set_style(style);
        pb
    }

    /// Show a success message (if not in quiet mode)
    pub fn show_success(message: &str, quiet: bool) {
        if !quiet {
            eprintln!("✓ {}", message);
        }
    }

    /// Show an error message
    pub fn show_error(message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Show a warning message (if not in quiet mode)
    pub fn show_warning(message: &str, quiet: bool) {
        if !quiet {
            eprintln!("⚠ {}", message);
        }
    }
}

/// Handle conversion errors with user-friendly messages
pub fn handle_error(error: &ConversionError) {
    CliUtils::show_error(&error.user_message());

    // Provide helpful suggestions
    match error.kind() {
        ErrorKind::NoPath => {
            if let ConversionError::ConversionUnsupported { from, .. } = error {
                eprintln!(
                    "\nTip: Run 'formatconv targets {}' to list the supported targets",
                    from.short_name()
                );
            }
        }
        ErrorKind::UnknownFormat => {
            eprintln!("\nTip: Run 'formatconv formats' to list the registered formats");
        }
        _ => {}
    }

    eprintln!("\nTry 'formatconv --help' for usage information.");
}
