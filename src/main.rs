use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use formatconv::cli::path_mapping::map_input_to_output;
use formatconv::cli::{handle_error, Args, CliConfig, CliUtils, Commands};
use formatconv::conversion::{BatchStatistics, ConversionEngine, ConversionRequest, Converted};
use formatconv::error::ConversionError;
use formatconv::parser::directory::find_convertible_files;
use formatconv::parser::InputSource;
use formatconv::registry::{self, CapabilityIndex, FormatId, CATALOG};

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match error.downcast_ref::<ConversionError>() {
                Some(conversion_error) => handle_error(conversion_error),
                None => CliUtils::show_error(&format!("{:#}", error)),
            }
            ExitCode::FAILURE
        }
    }
}

/// Logging goes to stderr so converted output on stdout stays clean
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    if let Some(command) = &args.command {
        return run_command(command);
    }

    let config = CliConfig::from_args(args)?;
    debug!(
        input = %config.input_description(),
        output = %config.output_description(),
        target = %config.target,
        "Starting conversion"
    );

    if config.args.stdin {
        return convert_stdin(&config);
    }

    let input = config
        .args
        .input
        .as_deref()
        .ok_or_else(|| anyhow!("No input provided. Use --stdin or provide an input path"))?;
    let path = PathBuf::from(input);
    if path.is_file() {
        convert_file(&path, &config)
    } else if path.is_dir() {
        convert_directory(&path, &config)
    } else {
        bail!("Input path does not exist: {}", input)
    }
}

fn run_command(command: &Commands) -> Result<()> {
    match command {
        Commands::Formats => {
            for descriptor in CATALOG.iter() {
                println!(
                    "{:<18} {:<18} {:<14} {}",
                    descriptor.id.as_str(),
                    descriptor.name,
                    descriptor.category.as_str(),
                    descriptor.extensions.join(", ")
                );
            }
        }
        Commands::Targets { format } => {
            let source: FormatId = format.parse()?;
            let options = CapabilityIndex::new().options(source);
            if options.is_empty() {
                println!("{} has no declared conversions", source);
            }
            for option in options {
                println!("{:<18} {}", option.to.as_str(), option.label);
            }
        }
        Commands::Detect { file } => match registry::detect(file) {
            Some(format) => println!("{}", format),
            None => bail!("No registered format matches '{}'", file.display()),
        },
    }
    Ok(())
}

fn convert_stdin(config: &CliConfig) -> Result<()> {
    let source = config
        .source
        .ok_or_else(|| anyhow!("--stdin requires --from <FORMAT>"))?;
    let content = InputSource::Stdin
        .read_content()
        .context("Failed to read standard input")?;

    let converted = convert_content(content, source, config)?;
    write_output(&converted.content, config.args.output.as_deref(), config.is_quiet())?;
    if config.want_stats() {
        output_statistics(&converted);
    }
    Ok(())
}

fn convert_file(input_path: &Path, config: &CliConfig) -> Result<()> {
    let converted = convert_path(input_path, config.source, config)?;
    write_output(&converted.content, config.args.output.as_deref(), config.is_quiet())?;
    if config.want_stats() {
        output_statistics(&converted);
    }
    Ok(())
}

/// Read one file within the size bound and convert it
fn convert_path(input_path: &Path, source: Option<FormatId>, config: &CliConfig) -> Result<Converted> {
    let source = source
        .or_else(|| registry::detect(input_path))
        .ok_or_else(|| {
            anyhow!(
                "Cannot detect the format of {}. Use --from <FORMAT>",
                input_path.display()
            )
        })?;

    let input = InputSource::File(input_path.to_path_buf());
    // Check file size before reading to avoid exhausting memory
    if let Some(size) = input.estimated_size() {
        if size > config.max_input_size {
            bail!(
                "Input file too large: {} (limit: {})",
                CliUtils::format_file_size(size),
                CliUtils::format_file_size(config.max_input_size)
            );
        }
    }

    let content = input
        .read_content()
        .with_context(|| format!("Failed to read {}", input.description()))?;
    convert_content(content, source, config)
}

fn convert_content(content: String, source: FormatId, config: &CliConfig) -> Result<Converted> {
    let request = ConversionRequest::new(content, source, config.target).with_options(config.options.clone());
    let converted = ConversionEngine::new().convert(&request)?;
    debug!(route = %converted.metadata.route, bytes = converted.len(), "Converted");
    Ok(converted)
}

fn write_output(content: &str, output: Option<&Path>, quiet: bool) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            CliUtils::show_success(&format!("Converted to: {}", path.display()), quiet);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }
    Ok(())
}

fn convert_directory(input_dir: &Path, config: &CliConfig) -> Result<()> {
    let output_dir = config
        .args
        .output
        .as_ref()
        .ok_or_else(|| anyhow!("Output directory required for directory conversion"))?;
    std::fs::create_dir_all(output_dir)?;

    let mut files = find_convertible_files(input_dir, config.args.recursive, config.target)
        .with_context(|| format!("Failed to scan {}", input_dir.display()))?;
    if let Some(source) = config.source {
        files.retain(|(_, format)| *format == source);
    }
    info!(count = files.len(), directory = %input_dir.display(), "Found convertible files");

    if files.is_empty() {
        CliUtils::show_warning(
            &format!(
                "No files in {} can be converted to {}",
                input_dir.display(),
                config.target
            ),
            config.is_quiet(),
        );
        return Ok(());
    }

    let extension = config.target.descriptor().default_extension();
    let progress = (!config.is_quiet()).then(|| CliUtils::create_progress_bar(files.len() as u64));
    let started = Instant::now();
    let mut stats = BatchStatistics::new();

    for (file, format) in &files {
        let output_file = map_input_to_output(input_dir, file, output_dir, extension);
        let relative = file.strip_prefix(input_dir).unwrap_or(file);
        if let Some(pb) = &progress {
            pb.set_message(relative.display().to_string());
        }

        let result = convert_path(file, Some(*format), config).and_then(|converted| {
            write_output(&converted.content, Some(&output_file), true)?;
            Ok(converted)
        });

        match result {
            Ok(converted) => {
                debug!(file = %relative.display(), output = %output_file.display(), "Converted file");
                stats.record(&converted.metadata);
            }
            Err(error) => {
                warn!(file = %relative.display(), error = %format!("{:#}", error), "Conversion failed");
                stats.record_failure();
                if !config.continue_on_error() {
                    if let Some(pb) = &progress {
                        pb.abandon();
                    }
                    return Err(error.context(format!("Aborting at {}", relative.display())));
                }
            }
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    info!(
        converted = stats.converted,
        failed = stats.failed,
        elapsed = %CliUtils::format_duration(started.elapsed()),
        "Batch finished"
    );

    CliUtils::show_success(
        &format!("Converted {} of {} files into {}", stats.converted, stats.total(), output_dir.display()),
        config.is_quiet(),
    );
    if stats.failed > 0 {
        CliUtils::show_warning(&format!("{} files failed", stats.failed), config.is_quiet());
    }
    if config.want_stats() {
        eprintln!("\n{}", stats.summary());
        if config.args.verbose {
            eprintln!("{}", stats.to_json()?);
        }
    }
    Ok(())
}

fn output_statistics(converted: &Converted) {
    eprintln!("\nConversion Statistics:");
    eprintln!("Route: {}", converted.metadata.route);
    eprintln!(
        "Input size: {}",
        CliUtils::format_file_size(converted.metadata.input_size)
    );
    eprintln!(
        "Output size: {}",
        CliUtils::format_file_size(converted.metadata.output_size)
    );
    eprintln!("Processing time: {}ms", converted.metadata.processing_time_ms);
}
