//! MongoDB JSON Schema CLI
//!
//! Command-line interface for inspecting ObjectId schemas and validating or
//! converting documents against them.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use mongo_json_schema::{load_document, load_schema_auto, Schema, ValidateError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mongo-json-schema")]
#[command(about = "Validate and convert documents against ObjectId schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the paths of every ObjectId declared by a schema
    Paths {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// Output paths as a JSON array of segment arrays
        #[arg(long)]
        json: bool,
    },

    /// Print the schema with ObjectIds rewritten to hex-pattern strings
    JsonSchema {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a document against a schema
    Validate {
        /// Document file to validate
        payload: PathBuf,

        /// Schema source: file path or URL
        #[arg(long)]
        schema: String,

        /// Ignore required properties
        #[arg(long)]
        partial: bool,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },

    /// Convert the ObjectId fields of a document
    Convert {
        /// Document file to convert
        payload: PathBuf,

        /// Schema source: file path or URL
        #[arg(long)]
        schema: String,

        /// Target representation of ObjectId fields
        #[arg(long, value_enum)]
        to: Target,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    /// Hex strings
    Strings,
    /// Native ObjectIds, printed as Extended JSON {"$oid": ...}
    Ids,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Paths { schema, json } => run_paths(&schema, json),
        Commands::JsonSchema {
            schema,
            output,
            pretty,
        } => run_json_schema(&schema, output, pretty),
        Commands::Validate {
            payload,
            schema,
            partial,
            json,
        } => run_validate(&payload, &schema, partial, json),
        Commands::Convert {
            payload,
            schema,
            to,
            pretty,
        } => run_convert(&payload, &schema, to, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn load(schema_source: &str) -> Result<Schema, u8> {
    load_schema_auto(schema_source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn to_json_string(value: &impl serde::Serialize, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

fn run_paths(schema_source: &str, json: bool) -> Result<(), u8> {
    let schema = load(schema_source)?;
    let paths = schema.object_id_paths();

    if json {
        println!("{}", to_json_string(&paths, false)?);
    } else {
        for path in &paths {
            println!("{}", path);
        }
    }
    Ok(())
}

fn run_json_schema(schema_source: &str, output: Option<PathBuf>, pretty: bool) -> Result<(), u8> {
    let schema = load(schema_source)?;
    let json_output = to_json_string(&schema.json_schema(), pretty)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_validate(
    payload_path: &Path,
    schema_source: &str,
    partial: bool,
    json_output: bool,
) -> Result<(), u8> {
    let payload = load_document(payload_path).map_err(|e| {
        report_error(json_output, &format!("loading payload: {}", e));
        e.exit_code() as u8
    })?;

    let schema = load_schema_auto(schema_source).map_err(|e| {
        report_error(json_output, &format!("loading schema: {}", e));
        e.exit_code() as u8
    })?;

    let result = if partial {
        schema.partial_validate(&payload)
    } else {
        schema.validate(&payload)
    };

    match result {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(ValidateError::Invalid { errors }) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                for error in errors {
                    eprintln!("  {}", error);
                }
            }
            Err(1)
        }
        Err(ValidateError::Schema(e)) => {
            report_error(json_output, &e.to_string());
            Err(e.exit_code() as u8)
        }
    }
}

fn run_convert(
    payload_path: &Path,
    schema_source: &str,
    to: Target,
    pretty: bool,
) -> Result<(), u8> {
    let payload = load_document(payload_path).map_err(|e| {
        eprintln!("Error: loading payload: {}", e);
        e.exit_code() as u8
    })?;
    let schema = load(schema_source)?;

    let converted = match to {
        Target::Strings => schema.ids_to_strings(&payload),
        Target::Ids => schema.strings_to_ids(&payload).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?,
    };

    println!("{}", to_json_string(&converted, pretty)?);
    Ok(())
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({ "valid": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}
