//! CLI entry point for the documentation block parser.
//!
//! Provides commands for setting up a workspace, parsing files into
//! documentation data, and inspecting comment styles and annotations.

use anyhow::Context;
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use console::style;
use docblocks::annotation::AnnotationSet;
use docblocks::indexing::{DocGenerator, write_output};
use docblocks::io::{ExitCode, OutputFormat, OutputManager};
use docblocks::{DocError, DocParser, Settings};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Documentation block parser
#[derive(Parser)]
#[command(
    name = "docblocks",
    version = env!("CARGO_PKG_VERSION"),
    about = "Parse documentation comment blocks into structured data",
    long_about = "Extract `///` documentation blocks and their annotations from source files and sort them into pages.",
    next_line_help = true,
    styles = clap_cargo_style(),
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true, env = "DOCBLOCKS_CONFIG")]
    config: Option<PathBuf>,

    /// Log parser progress to stderr (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    #[command(about = "Set up .docblocks directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    #[command(about = "Display active settings")]
    Config,

    /// Parse files and write the documentation data
    #[command(
        about = "Parse documentation blocks into JSON",
        after_help = "Examples:\n  docblocks parse\n  docblocks parse src/components --raw\n  docblocks parse --out -            # print to stdout\n  docblocks parse --json | jq .warnings"
    )]
    Parse {
        /// Files or directories to parse (defaults to the workspace root)
        #[arg(num_args = 0..)]
        paths: Vec<PathBuf>,

        /// Output the data by file type instead of sorted pages
        #[arg(long)]
        raw: bool,

        /// Where to write the output, `-` for stdout (overrides config)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Number of threads to use (overrides config)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Print the result as a JSON envelope with warnings
        #[arg(long)]
        json: bool,

        /// Exit with a non-zero code when warnings were raised
        #[arg(long)]
        strict: bool,
    },

    #[command(about = "List annotations and their aliases")]
    Annotations {
        /// Show the annotations that apply to this file type
        #[arg(long)]
        filetype: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    #[command(about = "Show the raw comment blocks found in a file")]
    Blocks {
        file: PathBuf,

        /// Parse the blocks into annotations instead of showing raw lines
        #[arg(long)]
        parsed: bool,
    },
}

#[derive(Serialize)]
struct AnnotationEntry {
    name: String,
    aliases: Vec<String>,
    filetypes: Vec<String>,
}

impl fmt::Display for AnnotationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {:<14}", style(&self.name).green())?;
        if !self.aliases.is_empty() {
            write!(f, " aliases: {}", self.aliases.join(", "))?;
        }
        if !self.filetypes.is_empty() {
            write!(f, " [{}]", self.filetypes.join(", "))?;
        }
        Ok(())
    }
}

fn init_tracing(verbose: u8, debug: bool) {
    let level = match (verbose, debug) {
        (0, false) => Level::WARN,
        (1, false) => Level::INFO,
        (0 | 1, true) | (2, _) => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn load_settings(config: Option<&Path>) -> anyhow::Result<Settings> {
    match config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("Configuration error loading from {}", path.display())),
        None => Settings::load().context("Configuration error"),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Commands::Init { force } = &cli.command {
        init_tracing(cli.verbose, false);
        match Settings::init_config_file(*force) {
            Ok(path) => {
                println!("Created configuration file at: {}", path.display());
                println!("Edit this file to customize your settings.");
            }
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(ExitCode::ConfigError.into());
            }
        }
        return;
    }

    let config = match load_settings(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(ExitCode::ConfigError.into());
        }
    };
    init_tracing(cli.verbose, config.debug);
    let config_file = cli.config.clone().unwrap_or_else(Settings::config_file);
    Settings::warn_unknown_keys(&config_file);

    let code = match run(cli.command, config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", style("Error:").red().bold());
            ExitCode::GeneralError
        }
    };
    std::process::exit(code.into());
}

fn run(command: Commands, mut config: Settings) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Init { .. } => Ok(ExitCode::Success),

        Commands::Config => {
            println!("Current Configuration:");
            println!("{}", "=".repeat(50));
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(ExitCode::Success)
        }

        Commands::Parse {
            paths,
            raw,
            out,
            threads,
            json,
            strict,
        } => {
            config.raw |= raw;
            if let Some(threads) = threads {
                config.parallel_threads = threads;
            }
            let out = out.unwrap_or_else(|| config.output.clone());
            parse(Arc::new(config), &paths, &out, json, strict)
        }

        Commands::Annotations { filetype, json } => {
            let parser = match DocParser::new(Arc::new(config)) {
                Ok(parser) => parser,
                Err(e) => return report(&e, json),
            };
            let registry = parser.annotations();

            let entries: Vec<AnnotationEntry> = match filetype {
                Some(filetype) => entries_for(&registry.list(&filetype)),
                None => registry
                    .describe()
                    .into_iter()
                    .map(|(name, aliases, filetypes)| AnnotationEntry {
                        name,
                        aliases,
                        filetypes,
                    })
                    .collect(),
            };

            let mut output = OutputManager::new(OutputFormat::from_json_flag(json));
            Ok(output.collection(entries, "annotations")?)
        }

        Commands::Blocks { file, parsed } => {
            let parser = match DocParser::new(Arc::new(config)) {
                Ok(parser) => parser,
                Err(e) => return report(&e, false),
            };
            let source = match docblocks::parsing::read_source(&file) {
                Ok(source) => source,
                Err(e) => return report(&e, false),
            };

            let json = if parsed {
                let doc = parser.parse_source(&file, &source);
                print_warnings(&doc.diagnostics);
                serde_json::to_string_pretty(&doc)?
            } else {
                let blocks = parser.extract_blocks(&file, &source);
                print_warnings(&blocks.diagnostics);
                serde_json::to_string_pretty(&blocks)?
            };
            println!("{json}");
            Ok(ExitCode::Success)
        }
    }
}

fn parse(
    settings: Arc<Settings>,
    paths: &[PathBuf],
    out: &Path,
    json: bool,
    strict: bool,
) -> anyhow::Result<ExitCode> {
    let format = OutputFormat::from_json_flag(json);
    let mut output = OutputManager::new(format);

    let generator = match DocGenerator::new(settings) {
        Ok(generator) => generator,
        Err(e) => return Ok(output.error(&e)?),
    };
    let result = match generator.generate(paths) {
        Ok(result) => result,
        Err(e) => return Ok(output.error(&e)?),
    };

    let code = if strict && !result.diagnostics.is_empty() {
        ExitCode::Warnings
    } else {
        ExitCode::Success
    };

    if json || out == Path::new("-") {
        return Ok(output.documents(&result.output, &result.diagnostics, code)?);
    }

    if let Err(e) = write_output(&result.output, out) {
        return Ok(output.error(&e)?);
    }

    output.warnings(&result.diagnostics)?;
    if tracing::enabled!(Level::INFO) {
        result.stats.display();
    }
    output.progress(&format!(
        "Parsed {} files ({} blocks) into {}",
        result.stats.files_parsed,
        result.stats.blocks_found,
        out.display()
    ))?;
    Ok(code)
}

fn entries_for(set: &AnnotationSet) -> Vec<AnnotationEntry> {
    set.iter()
        .map(|(name, annotation)| AnnotationEntry {
            name: name.to_string(),
            aliases: annotation.aliases().iter().map(|a| a.to_string()).collect(),
            filetypes: Vec::new(),
        })
        .collect()
}

fn print_warnings(diagnostics: &[docblocks::Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{} {diagnostic}", style("warning:").yellow().bold());
    }
}

fn report(error: &DocError, json: bool) -> anyhow::Result<ExitCode> {
    let mut output = OutputManager::new(OutputFormat::from_json_flag(json));
    Ok(output.error(error)?)
}
