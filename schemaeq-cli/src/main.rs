mod config;
mod fields;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{CompareOverrides, ConfigMerger, ReportFormat};
use schemaeq_core::adapters::{FsSchemaSource, FsWritePort};
use schemaeq_core::pipeline::{ToolError, run_compare, write_compare_artifacts};
use schemaeq_core::settings::CompareSettings;
use schemaeq_render::render_summary_text;
use schemaeq_types::report::ToolInfo;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "schemaeq",
    version,
    about = "Check that rebuilt resource schemas are structurally equivalent to their originals."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare authoritative schemas against candidate schemas.
    Compare(CompareArgs),
    /// Print a schema with every non-structural field reset.
    Normalize(NormalizeArgs),
    /// List schema node fields and whether they are compared.
    Fields(FieldsArgs),
}

#[derive(Debug, Parser)]
struct CompareArgs {
    /// Schema file or directory of the schemas being replaced.
    #[arg(long)]
    authoritative: Utf8PathBuf,

    /// Schema file or directory of the rebuilt schemas.
    #[arg(long)]
    candidate: Utf8PathBuf,

    /// Prefix for every reported attribute path.
    #[arg(long)]
    root_path: Option<String>,

    /// Allowlist glob patterns over resource names.
    #[arg(long)]
    allow: Vec<String>,

    /// Denylist glob patterns over resource names.
    #[arg(long)]
    deny: Vec<String>,

    /// Fail on candidate resources with no authoritative counterpart.
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Write report.json and report.md to this directory.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Stdout format (text, json).
    #[arg(long, value_enum)]
    format: Option<ReportFormat>,

    /// Config file (default: ./schemaeq.toml when present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct NormalizeArgs {
    /// Schema file (.json, .yaml or .yml).
    path: Utf8PathBuf,

    /// Output format (json, yaml).
    #[arg(long, value_enum, default_value = "json")]
    format: SchemaFormatArg,
}

#[derive(Debug, Parser)]
struct FieldsArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: ReportFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum SchemaFormatArg {
    Json,
    Yaml,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(()) => ExitCode::from(0),
        Err(ToolError::Mismatch) => ExitCode::from(2),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn real_main() -> Result<(), ToolError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compare(args) => cmd_compare(args),
        Command::Normalize(args) => Ok(cmd_normalize(args)?),
        Command::Fields(args) => Ok(cmd_fields(args)?),
    }
}

fn cmd_compare(args: CompareArgs) -> Result<(), ToolError> {
    for path in [&args.authoritative, &args.candidate] {
        if !path.exists() {
            return Err(anyhow::anyhow!("schema path {} does not exist", path).into());
        }
    }

    // Load config file and merge with CLI arguments
    let file_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => {
            config::load_or_default(Utf8Path::new(".")).context("load schemaeq.toml config")?
        }
    };
    let merged = ConfigMerger::new(file_config).merge_compare_args(&CompareOverrides {
        allow: &args.allow,
        deny: &args.deny,
        root_path: args.root_path.as_deref(),
        strict: args.strict,
        out_dir: args.out_dir.as_deref(),
        format: args.format,
    });

    debug!(
        "merged config: root_path={:?}, allow={:?}, deny={:?}, strict={}",
        merged.root_path, merged.allow, merged.deny, merged.strict
    );

    let settings = CompareSettings {
        authoritative: args.authoritative,
        candidate: args.candidate,
        out_dir: merged
            .out_dir
            .clone()
            .unwrap_or_else(|| CompareSettings::default().out_dir),
        root_path: merged.root_path,
        allow: merged.allow,
        deny: merged.deny,
        strict: merged.strict,
    };
    let source = FsSchemaSource::new(settings.authoritative.clone(), settings.candidate.clone());

    let outcome = run_compare(&settings, &source, tool_info())?;

    if merged.out_dir.is_some() {
        write_compare_artifacts(&outcome, &settings.out_dir, &FsWritePort)?;
        info!("wrote report to {}", settings.out_dir);
    }

    match merged.format {
        ReportFormat::Text => print!("{}", render_summary_text(&outcome.report)),
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
            println!("{}", json);
        }
    }

    outcome.into_result().map(|_| ())
}

fn cmd_normalize(args: NormalizeArgs) -> anyhow::Result<()> {
    let loaded = schemaeq_load::load_schema(&args.path);
    let mut schema = loaded
        .schema
        .with_context(|| format!("load schema {}", args.path))?;
    schemaeq_domain::normalize_all(&mut schema);

    let out = match args.format {
        SchemaFormatArg::Json => {
            serde_json::to_string_pretty(&schema).context("serialize schema as json")? + "\n"
        }
        SchemaFormatArg::Yaml => {
            serde_yaml::to_string(&schema).context("serialize schema as yaml")?
        }
    };
    print!("{}", out);
    Ok(())
}

fn cmd_fields(args: FieldsArgs) -> anyhow::Result<()> {
    use fields::{FIELD_REGISTRY, format_field_class};

    match args.format {
        ReportFormat::Text => {
            println!("Schema node fields:\n");
            println!("  {:<16} {:<11} DESCRIPTION", "KEY", "CLASS");
            println!("  {:<16} {:<11} -----------", "---", "-----");
            for field in FIELD_REGISTRY {
                println!(
                    "  {:<16} {:<11} {}",
                    field.key,
                    format_field_class(field.class),
                    field.description
                );
            }
            println!();
            println!("Fields marked 'reset' are cleared before schemas are compared.");
        }
        ReportFormat::Json => {
            let fields: Vec<_> = FIELD_REGISTRY
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "key": f.key,
                        "class": format_field_class(f.class),
                        "description": f.description,
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&fields).context("serialize fields")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "schemaeq".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: None,
    }
}
