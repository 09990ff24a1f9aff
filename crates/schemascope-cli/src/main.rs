//! SchemaScope CLI - relational catalog introspection

use schemascope_cli::cli;
#[cfg(feature = "metadata-provider")]
use schemascope_cli::metadata;
use schemascope_cli::output;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::{Args, OutputFormat};

/// Missing tables reported.
const EXIT_FAILURE: u8 = 1;
/// Configuration or connection error.
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    if args.json_schema {
        return match print_json_schema(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("schemascope: error: {e:#}");
                ExitCode::from(EXIT_CONFIG_ERROR)
            }
        };
    }

    match run(args) {
        Ok(has_missing) => {
            if has_missing {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("schemascope: error: {e:#}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

/// Install a stderr subscriber; `RUST_LOG` takes precedence over `-v`/`-q`.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,schemascope_core={level},schemascope_cli={level},schemascope={level}",
            level = args.log_level()
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(args.verbose > 1)
        .init();
}

fn print_json_schema(args: &Args) -> Result<()> {
    let schema = output::format_json_schema(args.compact).context("Failed to render JSON schema")?;
    write_output(&args.output, &schema)
}

/// Run introspection. Returns true when requested tables were missing.
#[cfg(feature = "metadata-provider")]
fn run(args: Args) -> Result<bool> {
    use schemascope_core::{SchemaSnapshot, TableMetadataParser};

    let url = args.url.as_deref().context("--url is required")?;
    let target = metadata::Target::resolve(url, args.schema.clone())?;
    let max_connections = args.jobs.map(u32::from);

    tracing::info!(dialect = %target.kind, schema = %target.schema, "introspecting");
    let schema = metadata::connect_schema(url, &target, max_connections)
        .with_context(|| format!("Failed to open {url}"))?;
    let parser = TableMetadataParser::with_options(schema, args.parser_options())?;
    let colored = output::use_colors(!args.quiet);

    if args.list {
        let names = parser.list_all_table_names().context("Failed to list tables")?;
        let rendered = match args.format {
            OutputFormat::Table => output::format_names(&target.schema, &names, colored),
            OutputFormat::Json => output::format_names_json(&target.schema, &names, args.compact)?,
        };
        write_output(&args.output, &rendered)?;
        return Ok(false);
    }

    if args.exists {
        let results = args
            .tables
            .iter()
            .map(|name| Ok((name.clone(), parser.table_exists(name)?)))
            .collect::<Result<Vec<_>>>()
            .context("Failed to check table existence")?;
        let rendered = match args.format {
            OutputFormat::Table => output::format_existence(&target.schema, &results, colored),
            OutputFormat::Json => {
                output::format_existence_json(&target.schema, &results, args.compact)?
            }
        };
        write_output(&args.output, &rendered)?;
        return Ok(results.iter().any(|(_, exists)| !exists));
    }

    let mut missing = Vec::new();
    let tables = if args.tables.is_empty() {
        parser
            .parse_with(args.strategy.into())
            .with_context(|| format!("Failed to parse schema {}", target.schema))?
    } else {
        let mut tables = Vec::new();
        for name in &args.tables {
            match parser
                .parse_by_name(name)
                .with_context(|| format!("Failed to parse table {name}"))?
            {
                Some(table) => tables.push(table),
                None => missing.push(name.as_str()),
            }
        }
        tables
    };

    let snapshot = SchemaSnapshot::new(target.schema.as_str(), target.kind.as_str(), tables);
    let rendered = match args.format {
        OutputFormat::Table => output::format_table(&snapshot, colored),
        OutputFormat::Json => {
            output::format_json(&snapshot, args.compact).context("Failed to export JSON")?
        }
    };
    write_output(&args.output, &rendered)?;

    if !args.quiet {
        for name in &missing {
            eprintln!(
                "schemascope: warning: table {name} not found in schema {}",
                target.schema
            );
        }
    }

    Ok(!missing.is_empty())
}

#[cfg(not(feature = "metadata-provider"))]
fn run(_args: Args) -> Result<bool> {
    anyhow::bail!("this build has no database support; rebuild with the `metadata-provider` feature")
}

fn write_output(path: &Option<std::path::PathBuf>, content: &str) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, content)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    } else {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        // Ensure newline at end for terminal output
        if !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
