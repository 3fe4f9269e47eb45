mod run;
mod settings;

use std::path::PathBuf;

use catalogen_core::{LocaleSpec, product_draft_schema};
use catalogen_generate::presets::Preset;
use catalogen_generate::{GeneratorOptions, IdPolicy, RecordGenerator};
use catalogen_sink::{BatchSink, FileSink, ImportApiConfig, ImportApiSink};
use clap::{Args, Parser, Subcommand, ValueEnum};
use run::{BatchPlan, RunError, execute_run, init_logging, progress_bar};
use settings::{ImportSettings, Settings, SettingsError, load_settings};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("run error: {0}")]
    Run(#[from] RunError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<catalogen_generate::GenerationError> for CliError {
    fn from(err: catalogen_generate::GenerationError) -> Self {
        Self::Run(RunError::from(err))
    }
}

impl From<catalogen_sink::SinkError> for CliError {
    fn from(err: catalogen_sink::SinkError) -> Self {
        Self::Run(RunError::from(err))
    }
}

#[derive(Parser, Debug)]
#[command(name = "catalogen", version, about = "Random product catalog generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create random product drafts and send them to a file or an import container.
    Generate(GenerateArgs),
    /// Print the JSON Schema of a generated product draft.
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of records to generate.
    #[arg(value_name = "NUM_RECORDS")]
    num_records: u64,
    /// Import container key, or the output path with `--file`.
    #[arg(value_name = "DESTINATION")]
    destination: String,
    /// Write to a file instead of the Import API.
    #[arg(short, long, default_value_t = false)]
    file: bool,
    /// Records per batch (max. 20, default 20).
    #[arg(short, long, value_name = "SIZE")]
    batch_size: Option<usize>,
    /// Product type key referenced by every record.
    #[arg(long)]
    category: Option<String>,
    /// Locale tag(s) to localize names, descriptions and slugs for.
    #[arg(long = "locale", value_name = "TAG")]
    locales: Vec<String>,
    /// Currency of the generated prices.
    #[arg(long, value_name = "CODE")]
    currency: Option<String>,
    /// Never reuse a record id within the run.
    #[arg(long, default_value_t = false)]
    unique_ids: bool,
    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
    /// Hook set applied to every record.
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,
    /// Settings file (defaults to ./catalogen.toml when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Append JSON logs to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Hide the progress bar.
    #[arg(long, default_value_t = false)]
    no_progress: bool,
    #[command(flatten)]
    import: ImportArgs,
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// OAuth host of the catalog service.
    #[arg(long, env = "AUTH_HOST")]
    auth_host: Option<String>,
    /// Import API host.
    #[arg(long, env = "IMPORT_API_HOST")]
    import_api_host: Option<String>,
    #[arg(long, env = "PROJECT_KEY")]
    project_key: Option<String>,
    #[arg(long, env = "CLIENT_ID")]
    client_id: Option<String>,
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,
    /// Space separated OAuth scopes.
    #[arg(long, env = "SCOPES", value_delimiter = ' ')]
    scopes: Vec<String>,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Write the schema to this path instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetArg {
    Default,
    Import,
}

impl From<PresetArg> for Preset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Default => Preset::Default,
            PresetArg::Import => Preset::Import,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args).await,
        Command::Schema(args) => run_schema(args),
    }
}

async fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    init_logging(args.log_file.as_deref())?;

    let result = generate(args).await;
    if let Err(err) = &result {
        tracing::error!(event = "run_failed", error = %err);
    }
    result
}

async fn generate(args: GenerateArgs) -> Result<(), CliError> {
    let settings = load_settings(args.config.as_deref())?;
    let plan = BatchPlan::new(
        args.num_records,
        args.batch_size.or(settings.generator.batch_size),
    )?;

    let mut generator = build_generator(&args, &settings)?;
    let preset = args
        .preset
        .map(Preset::from)
        .unwrap_or(settings.generator.preset);
    preset.apply(&mut generator);

    let mut sink: Box<dyn BatchSink> = if args.file {
        tracing::info!(event = "output_file", path = %args.destination);
        Box::new(FileSink::create(&args.destination)?)
    } else {
        let config = import_config(&args.import, &settings.import, &args.destination)?;
        tracing::info!(
            event = "import_target",
            api_url = %config.api_url,
            project_key = %config.project_key,
            container = %config.container_key
        );
        Box::new(ImportApiSink::new(config)?)
    };

    let run_id = Uuid::new_v4().to_string();
    tracing::info!(event = "generator_ready", run_id = %run_id, preset = preset.as_str(), generator = ?generator);

    let progress = progress_bar(&plan, !args.no_progress);
    let report = execute_run(&run_id, &mut generator, &plan, sink.as_mut(), &progress).await?;

    tracing::info!(
        event = "run_summary",
        run_id = %report.run_id,
        destination = %report.summary.destination,
        resources = report.summary.resources,
        sink = report.sink,
        started_at = %report.started_at,
        batches = report.batches,
        duration_ms = report.duration_ms,
        bytes_written = report.summary.bytes_written,
        operation_states = ?report.summary.operation_states
    );

    Ok(())
}

fn build_generator(args: &GenerateArgs, settings: &Settings) -> Result<RecordGenerator, CliError> {
    let defaults = &settings.generator;
    let category = args
        .category
        .clone()
        .unwrap_or_else(|| defaults.category_key.clone());
    let locales = if args.locales.is_empty() {
        defaults.locales.clone()
    } else {
        LocaleSpec::Many(args.locales.clone())
    };
    let options = GeneratorOptions {
        currency_code: args
            .currency
            .clone()
            .unwrap_or_else(|| defaults.currency_code.clone()),
        id_policy: if args.unique_ids {
            IdPolicy::Unique
        } else {
            defaults.id_policy
        },
        seed: args.seed.or(defaults.seed),
    };

    Ok(RecordGenerator::with_options(category, locales, options)?)
}

fn import_config(
    args: &ImportArgs,
    settings: &ImportSettings,
    container_key: &str,
) -> Result<ImportApiConfig, CliError> {
    let pick = |flag: &Option<String>, file: &Option<String>, name: &str| {
        let present = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        present(flag)
            .or_else(|| present(file))
            .ok_or_else(|| CliError::InvalidConfig(format!("{name} is required for imports")))
    };

    Ok(ImportApiConfig {
        auth_url: pick(&args.auth_host, &settings.auth_url, "AUTH_HOST")?,
        api_url: pick(&args.import_api_host, &settings.api_url, "IMPORT_API_HOST")?,
        project_key: pick(&args.project_key, &settings.project_key, "PROJECT_KEY")?,
        client_id: pick(&args.client_id, &settings.client_id, "CLIENT_ID")?,
        client_secret: pick(&args.client_secret, &settings.client_secret, "CLIENT_SECRET")?,
        scopes: if args.scopes.is_empty() {
            settings.scopes.clone()
        } else {
            args.scopes.clone()
        },
        container_key: container_key.to_string(),
    })
}

fn run_schema(args: SchemaArgs) -> Result<(), CliError> {
    let schema = serde_json::to_string_pretty(&product_draft_schema()?)?;
    match args.out {
        Some(path) => std::fs::write(path, schema)?,
        None => println!("{schema}"),
    }
    Ok(())
}
