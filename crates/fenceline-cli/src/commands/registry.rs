//! Registry command implementation.
//!
//! Lists the supported registry types and their fields, and submits new
//! registry connectors to the console.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_yaml::Value;
use tracing::info;

use fenceline_core::{FieldSet, FlatFieldMap, RegistryType, SubmissionResult};
use fenceline_registry::{ConsoleClient, ConsoleConfig, RegistryConnectorForm, TlsConfig};

use super::OutputFormat;

/// Arguments for the registry command.
#[derive(Args)]
pub struct RegistryArgs {
    #[command(subcommand)]
    pub command: RegistryCommand,
}

/// Registry subcommands.
#[derive(Subcommand)]
pub enum RegistryCommand {
    /// List supported registry types
    Types(TypesArgs),

    /// Show the connector fields for a registry type
    Fields(FieldsArgs),

    /// Add a registry connector to the console
    Add(AddArgs),
}

/// Arguments for `registry types`.
#[derive(Args)]
pub struct TypesArgs {
    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for `registry fields`.
#[derive(Args)]
pub struct FieldsArgs {
    /// Registry type (e.g. `docker_hub`, `google_container_registry`)
    #[arg(short = 't', long = "type")]
    pub registry_type: RegistryType,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for `registry add`.
#[derive(Args)]
pub struct AddArgs {
    /// Registry type (e.g. `docker_hub`, `google_container_registry`)
    #[arg(short = 't', long = "type")]
    pub registry_type: RegistryType,

    /// Field value as `key=value`; may be repeated
    #[arg(short, long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// YAML or JSON file with field values
    #[arg(long)]
    pub from_file: Option<PathBuf>,

    /// Service account key file (Google Container Registry only)
    #[arg(long)]
    pub service_account_json: Option<PathBuf>,

    /// Console URL (e.g., `<https://console.example.com>`)
    #[arg(short, long, env = "FENCELINE_CONSOLE_URL")]
    pub url: String,

    /// API token for the console
    #[arg(long, env = "FENCELINE_CONSOLE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// CA certificate (PEM) for consoles with a private CA
    #[arg(long)]
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,
}

/// Runs the registry command.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded, the console cannot be
/// reached, or the console rejects the registry.
pub async fn run(args: RegistryArgs) -> Result<()> {
    match args.command {
        RegistryCommand::Types(args) => list_types(&args),
        RegistryCommand::Fields(args) => show_fields(&args),
        RegistryCommand::Add(args) => add(&args).await,
    }
}

#[derive(Debug, Serialize)]
struct TypeView {
    #[serde(rename = "type")]
    registry_type: RegistryType,
    label: &'static str,
}

#[derive(Debug, Serialize)]
struct FieldView {
    key: &'static str,
    label: &'static str,
    kind: String,
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    placeholder: Option<&'static str>,
}

fn field_views(field_set: &FieldSet) -> Vec<FieldView> {
    field_set
        .fields()
        .iter()
        .map(|f| FieldView {
            key: f.key,
            label: f.label,
            kind: f.kind.to_string(),
            required: f.required,
            placeholder: f.placeholder,
        })
        .collect()
}

fn list_types(args: &TypesArgs) -> Result<()> {
    match args.output {
        OutputFormat::Text => {
            for registry_type in RegistryType::ALL {
                println!("{:<28} {}", registry_type.as_str(), registry_type.label());
            }
        }
        OutputFormat::Json => {
            let views: Vec<TypeView> = RegistryType::ALL
                .into_iter()
                .map(|t| TypeView {
                    registry_type: t,
                    label: t.label(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
    }
    Ok(())
}

fn show_fields(args: &FieldsArgs) -> Result<()> {
    let field_set = FieldSet::for_registry(args.registry_type);

    match args.output {
        OutputFormat::Text => {
            println!("{}", args.registry_type.label());
            println!();
            for field in field_set.fields() {
                let required = if field.required { "required" } else { "optional" };
                println!(
                    "  {:<40} {:<9} {:<9} {}",
                    field.key, field.kind, required, field.label
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&field_views(&field_set))?);
        }
    }
    Ok(())
}

async fn add(args: &AddArgs) -> Result<()> {
    info!(registry_type = %args.registry_type, console = %args.url, "Adding registry");

    let values = collect_values(args.from_file.as_deref(), &args.fields)?;
    let files = collect_files(args.registry_type, args.service_account_json.as_deref())?;

    let client =
        ConsoleClient::new(console_config(args)).context("Failed to create console client")?;
    let mut form = RegistryConnectorForm::new(args.registry_type, || {});

    let output = args.output;
    let notifier = move |message: &str| {
        let _ = write_notice(output, message, &mut io::stdout().lock(), &mut io::stderr().lock());
    };

    let result = form
        .submit(&client, &notifier, values, files)
        .await
        .context("Failed to add registry")?;

    write_result(output, &result, &mut io::stdout().lock())?;

    if !result.success {
        bail!(
            "Console rejected registry: {}",
            result.message.as_deref().unwrap_or("no reason given")
        );
    }
    Ok(())
}

/// Prints a user notice. JSON mode keeps stdout for the result document.
fn write_notice(
    output: OutputFormat,
    message: &str,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> io::Result<()> {
    match output {
        OutputFormat::Text => writeln!(stdout, "✓ {message}"),
        OutputFormat::Json => writeln!(stderr, "✓ {message}"),
    }
}

fn write_result(
    output: OutputFormat,
    result: &SubmissionResult,
    stdout: &mut impl Write,
) -> Result<()> {
    if output == OutputFormat::Json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(result)?)?;
    }
    Ok(())
}

fn console_config(args: &AddArgs) -> ConsoleConfig {
    let mut config =
        ConsoleConfig::new(&args.url).with_timeout(Duration::from_secs(args.timeout));

    if let Some(ref token) = args.token {
        config = config.with_token(token);
    }

    if args.insecure || args.ca_cert.is_some() {
        let mut tls = TlsConfig::new();
        if args.insecure {
            tls = tls.insecure();
        }
        if let Some(ref ca_cert) = args.ca_cert {
            tls = tls.with_ca_cert(ca_cert);
        }
        config = config.with_tls(tls);
    }

    config
}

/// Parses a `key=value` pair.
fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Merges file values with `--field` flags; flags win.
fn collect_values(from_file: Option<&Path>, fields: &[(String, String)]) -> Result<FlatFieldMap> {
    let mut values = match from_file {
        Some(path) => load_values(path)?,
        None => FlatFieldMap::new(),
    };
    values.extend(fields.iter().cloned());
    Ok(values)
}

fn collect_files(
    registry_type: RegistryType,
    service_account_json: Option<&Path>,
) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut files = BTreeMap::new();
    let Some(path) = service_account_json else {
        return Ok(files);
    };

    if !registry_type.uses_credential_blob() {
        bail!("--service-account-json only applies to {}", RegistryType::GoogleContainerRegistry);
    }

    let key = std::fs::read(path)
        .with_context(|| format!("Failed to read service account key {}", path.display()))?;
    files.insert("service_account_json".to_string(), key);
    Ok(files)
}

/// Loads field values from a YAML or JSON file.
///
/// Top-level scalars become fields as-is. One level of nesting is
/// flattened into dotted keys, so `non_secret: {namespace: acme}` becomes
/// `non_secret.namespace`.
fn load_values(path: &Path) -> Result<FlatFieldMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document: BTreeMap<String, Value> = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let mut values = FlatFieldMap::new();
    for (key, value) in document {
        if let Value::Mapping(group) = value {
            for (child, value) in group {
                let child = scalar(&child)
                    .with_context(|| format!("Invalid key under '{key}'"))?;
                let value = scalar(&value)
                    .with_context(|| format!("Invalid value for '{key}.{child}'"))?;
                values.insert(format!("{key}.{child}"), value);
            }
        } else {
            let value = scalar(&value).with_context(|| format!("Invalid value for '{key}'"))?;
            values.insert(key, value);
        }
    }
    Ok(values)
}

fn scalar(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        _ => bail!("expected a string, number or boolean"),
    }
}
