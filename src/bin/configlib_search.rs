use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use configlib_search::app::{App, StdoutSink};
use configlib_search::config::{ConfigLoader, ResolvedConfig};
use configlib_search::credentials::CredentialPair;
use configlib_search::domain::IndexId;
use configlib_search::error::ConfigLibError;
use configlib_search::output::{JsonOutput, OutputMode};
use configlib_search::search::{SearchClient, SearchHttpClient};
use configlib_search::source::{HttpSheetSource, SheetSource};

#[derive(Parser)]
#[command(name = "configlib-search")]
#[command(about = "Operational tools for the ConfigLib metadata-search pipeline")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Delete a search index on the remote service (irreversible)")]
    DeleteIndex(DeleteArgs),
    #[command(about = "Build the ingestion payload from the library spreadsheet")]
    Ingest(IngestArgs),
}

#[derive(Args)]
struct DeleteArgs {
    #[arg(long)]
    index_id: Option<String>,

    #[arg(long)]
    credentials: Option<String>,
}

#[derive(Args)]
struct IngestArgs {
    #[arg(long)]
    source_url: Option<String>,

    #[arg(long)]
    sheet: Option<String>,

    #[arg(long)]
    output: Option<String>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<ConfigLibError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &ConfigLibError) -> u8 {
    match error {
        ConfigLibError::IndexNotFound(_)
        | ConfigLibError::CredentialsRead(_)
        | ConfigLibError::SheetNotFound(_)
        | ConfigLibError::MissingColumn(_) => 2,
        ConfigLibError::SearchHttp(_)
        | ConfigLibError::Authentication(_)
        | ConfigLibError::Service { .. }
        | ConfigLibError::Transfer(_)
        | ConfigLibError::TransferStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let config = ConfigLoader::resolve(cli.config.as_deref()).into_diagnostic()?;

    match cli.command {
        Commands::DeleteIndex(args) => run_delete(args, config, output_mode),
        Commands::Ingest(args) => run_ingest(args, config, output_mode),
    }
}

fn run_delete(
    args: DeleteArgs,
    mut config: ResolvedConfig,
    output_mode: OutputMode,
) -> miette::Result<()> {
    if let Some(path) = args.credentials {
        config.credential_path = path.into();
    }
    if let Some(index_id) = args.index_id {
        config.index_id = index_id;
    }

    let index_id = config.index_id.parse::<IndexId>().into_diagnostic()?;
    let credentials = CredentialPair::load(&config.credential_path).into_diagnostic()?;
    let search = SearchHttpClient::new(credentials).into_diagnostic()?;
    let app = App::new(search, NopSource);

    match output_mode {
        OutputMode::NonInteractive => {
            let result = app.delete_index(&index_id, &JsonOutput).into_diagnostic()?;
            JsonOutput::print_delete(&result).into_diagnostic()?;
        }
        OutputMode::Interactive => {
            app.delete_index(&index_id, &StdoutSink).into_diagnostic()?;
        }
    }
    Ok(())
}

fn run_ingest(
    args: IngestArgs,
    mut config: ResolvedConfig,
    output_mode: OutputMode,
) -> miette::Result<()> {
    if let Some(url) = args.source_url {
        config.source_url = url;
    }
    if let Some(sheet) = args.sheet {
        config.sheet_name = sheet;
    }
    if let Some(output) = args.output {
        config.output_path = output.into();
    }

    let source = HttpSheetSource::new(&config.source_url).into_diagnostic()?;
    let app = App::new(NopSearch, source);

    match output_mode {
        OutputMode::NonInteractive => {
            let result = app.ingest(&config, &JsonOutput).into_diagnostic()?;
            JsonOutput::print_ingest(&result).into_diagnostic()?;
        }
        OutputMode::Interactive => {
            app.ingest(&config, &StdoutSink).into_diagnostic()?;
        }
    }
    Ok(())
}

struct NopSearch;
struct NopSource;

impl SearchClient for NopSearch {
    fn delete_index(&self, _index_id: &IndexId) -> Result<(), ConfigLibError> {
        Err(ConfigLibError::SearchHttp(
            "search client not configured".to_string(),
        ))
    }
}

impl SheetSource for NopSource {
    fn fetch_workbook(&self) -> Result<Vec<u8>, ConfigLibError> {
        Err(ConfigLibError::Transfer(
            "sheet source not configured".to_string(),
        ))
    }
}
