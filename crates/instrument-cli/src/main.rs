mod render;

use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand, ValueEnum};
use instrument_spec::{
    Parameters, RecordListMode, ResolveOptions, Resolver, TypedValue, identifiers,
    load_parameters, load_schema, load_value, schema_document,
};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Instrument identifier resolver",
    long_about = "Resolves expression identifiers against an instrument schema, a value tree and a parameter table"
)]
struct Cli {
    /// Log resolution decisions to stderr.
    #[arg(long, global = true, alias = "debug")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RecordLists {
    Expand,
    Opaque,
}

impl From<RecordLists> for RecordListMode {
    fn from(mode: RecordLists) -> Self {
        match mode {
            RecordLists::Expand => RecordListMode::Expand,
            RecordLists::Opaque => RecordListMode::Opaque,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Resolve one or more identifiers to typed values.
    Resolve {
        /// Path to the instrument schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
        /// Path to the value tree JSON (defaults to an empty object).
        #[arg(long, value_name = "VALUE")]
        value: Option<PathBuf>,
        /// Path to a flat JSON object of parameters.
        #[arg(long, value_name = "PARAMS")]
        params: Option<PathBuf>,
        /// Adds a date-time parameter, e.g. `now=2024-05-01T08:30:00Z`.
        #[arg(long = "instant", value_name = "NAME=RFC3339")]
        instants: Vec<String>,
        /// How record lists addressed by a sub-field are treated.
        #[arg(long, value_enum, default_value_t = RecordLists::Expand)]
        record_lists: RecordLists,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Identifiers to resolve, dotted.
        #[arg(required = true, value_name = "IDENTIFIER")]
        identifiers: Vec<String>,
    },
    /// List every addressable identifier of a schema.
    Fields {
        /// Path to the instrument schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
    },
    /// Print the JSON Schema of the instrument schema format.
    Schema,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Resolve {
            schema,
            value,
            params,
            instants,
            record_lists,
            format,
            identifiers,
        } => run_resolve(
            &schema,
            value.as_deref(),
            params.as_deref(),
            &instants,
            ResolveOptions {
                record_lists: record_lists.into(),
            },
            format,
            &identifiers,
        ),
        Command::Fields { schema } => run_fields(&schema),
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&schema_document())?);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_resolve(
    schema_path: &Path,
    value_path: Option<&Path>,
    params_path: Option<&Path>,
    instants: &[String],
    options: ResolveOptions,
    format: OutputFormat,
    names: &[String],
) -> CliResult<()> {
    let schema = load_schema(&fs::read_to_string(schema_path)?)?;
    debug!(path = %schema_path.display(), "loaded schema");
    let value = match value_path {
        Some(path) => load_value(&fs::read_to_string(path)?)?,
        None => Value::Object(Map::new()),
    };
    let mut parameters = match params_path {
        Some(path) => load_parameters(&fs::read_to_string(path)?)?,
        None => Parameters::new(),
    };
    for instant in instants {
        let (name, timestamp) = parse_instant(instant)?;
        parameters.insert(name, timestamp);
    }

    let resolver = Resolver::new(options);
    let results: Vec<(String, Option<TypedValue>)> = names
        .iter()
        .map(|name| {
            let resolved = resolver.resolve(name, &schema, &value, &parameters);
            (name.clone(), resolved)
        })
        .collect();

    match format {
        OutputFormat::Text => {
            for (name, resolved) in &results {
                println!("{}", render::describe_line(name, resolved.as_ref()));
            }
        }
        OutputFormat::Json => {
            let mut payload = Map::new();
            for (name, resolved) in &results {
                let entry = match resolved {
                    Some(typed) => typed.clone().into_json()?,
                    None => Value::Null,
                };
                payload.insert(name.clone(), entry);
            }
            println!("{}", serde_json::to_string_pretty(&Value::Object(payload))?);
        }
    }

    let missing = results
        .iter()
        .filter(|(_, resolved)| resolved.is_none())
        .count();
    if missing == 0 {
        Ok(())
    } else {
        Err(format!("{} identifier(s) not found", missing).into())
    }
}

fn parse_instant(raw: &str) -> CliResult<(String, DateTime<FixedOffset>)> {
    let (name, timestamp) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=RFC3339, got '{}'", raw))?;
    if name.is_empty() {
        return Err(format!("missing parameter name in '{}'", raw).into());
    }
    let instant = DateTime::parse_from_rfc3339(timestamp)
        .map_err(|err| format!("invalid timestamp for '{}': {}", name, err))?;
    Ok((name.to_string(), instant))
}

fn run_fields(schema_path: &Path) -> CliResult<()> {
    let schema = load_schema(&fs::read_to_string(schema_path)?)?;
    for identifier in identifiers(&schema) {
        println!("{}", identifier);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_flag_splits_name_and_timestamp() {
        let (name, instant) = parse_instant("now=2024-05-01T08:30:00Z").expect("instant");
        assert_eq!(name, "now");
        assert_eq!(instant.to_rfc3339(), "2024-05-01T08:30:00+00:00");
    }

    #[test]
    fn instant_flag_rejects_missing_separator() {
        assert!(parse_instant("2024-05-01T08:30:00Z").is_err());
        assert!(parse_instant("=2024-05-01T08:30:00Z").is_err());
        assert!(parse_instant("now=yesterday").is_err());
    }
}
