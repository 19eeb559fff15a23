//! ReqForge CLI
//!
//! Turns a requirements document into a linked Epic/Story/Subtask
//! hierarchy in a Jira-compatible tracker.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqforge_core::hierarchy;
use reqforge_core::models::{Config, ImportFile, IssueType};
use reqforge_core::storage::{init_config_dir, init_data_dir, BundleStorage, ConfigStorage};
use reqforge_importer::{
    document, secrets, FixedDelay, GenerationPipeline, ImportScheduler, JiraCreator,
};
use reqforge_jira::auth::JiraAuth;
use reqforge_jira::JiraClient;
use reqforge_openai::OpenAiClient;

#[derive(Parser, Debug)]
#[command(name = "reqforge")]
#[command(about = "Requirement list to issue tracker importer", long_about = None)]
struct Cli {
    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a bundle from a document and import it in one pass
    Run(RunArgs),
    /// Generate an import bundle from a document and save the snapshot
    Generate(GenerateArgs),
    /// Import the saved (or a given) bundle into the tracker
    Import(ImportArgs),
    /// Manage the stored Jira API token
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Source requirements document (plain text or markdown)
    #[arg(short, long)]
    document: PathBuf,

    /// Project key; defaults to the configured one
    #[arg(short, long)]
    project_key: Option<String>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Also write the report as CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Source requirements document (plain text or markdown)
    #[arg(short, long)]
    document: PathBuf,

    /// Project key; defaults to the configured one
    #[arg(short, long)]
    project_key: Option<String>,
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// Import file to load instead of the saved snapshot
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Also write the report as CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Store a Jira API token in the OS keyring
    Set {
        /// Token value; falls back to JIRA_API_TOKEN
        #[arg(long)]
        token: Option<String>,
    },
    /// Remove the stored token
    Clear,
    /// Verify credentials against the tracker
    Verify,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the active configuration
    Show,
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Reports go to stdout; logs stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(&cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Run(args) => cmd_run(args).await,
        Command::Generate(args) => cmd_generate(args).await,
        Command::Import(args) => cmd_import(args).await,
        Command::Auth { command } => cmd_auth(command).await,
        Command::Config { command } => cmd_config(command),
    }
}

async fn cmd_run(args: RunArgs) -> Result<()> {
    let config = load_config()?;
    let project_key = args
        .project_key
        .unwrap_or_else(|| config.jira.project_key.clone());

    let text = document::read_document(&args.document)?;
    let pipeline = build_pipeline(&config)?;
    let storage = bundle_storage()?;
    let import = pipeline.generate(&text, &project_key, &storage).await?;

    warn_depth_mismatches(&import);
    run_import(&config, &import, args.json, args.csv.as_deref()).await
}

async fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let config = load_config()?;
    let project_key = args
        .project_key
        .unwrap_or_else(|| config.jira.project_key.clone());

    let text = document::read_document(&args.document)?;
    let pipeline = build_pipeline(&config)?;
    let storage = bundle_storage()?;
    let import = pipeline.generate(&text, &project_key, &storage).await?;

    warn_depth_mismatches(&import);
    print_bundle_overview(&import);
    println!("Snapshot saved to {}", storage.bundle_path().display());
    Ok(())
}

async fn cmd_import(args: ImportArgs) -> Result<()> {
    let config = load_config()?;

    let import = match &args.file {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read {}", path.display()))?;
            ImportFile::from_json(&json)?
        }
        None => bundle_storage()?.load()?,
    };

    run_import(&config, &import, args.json, args.csv.as_deref()).await
}

async fn cmd_auth(command: AuthCommand) -> Result<()> {
    let config = load_config()?;
    let email = &config.jira.email;

    match command {
        AuthCommand::Set { token } => {
            let token = token
                .or_else(secrets::jira_token_env)
                .context("Pass --token or set JIRA_API_TOKEN")?;
            JiraAuth::store_token(email, &token)?;
            println!("Token stored for {email}");
        }
        AuthCommand::Clear => {
            JiraAuth::clear_token(email)?;
            println!("Token cleared for {email}");
        }
        AuthCommand::Verify => {
            let auth = secrets::jira_auth(email)?;
            let client = JiraClient::new(&config.jira.base_url, auth);
            let me = client.myself().await?;
            println!("Authenticated as {}", me.display_name);
        }
    }
    Ok(())
}

fn cmd_config(command: ConfigCommand) -> Result<()> {
    let config_dir = init_config_dir()?;
    let storage = ConfigStorage::new(config_dir);

    match command {
        ConfigCommand::Show => {
            let config = storage.load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommand::Path => {
            println!("{}", storage.config_path().display());
        }
    }
    Ok(())
}

fn load_config() -> Result<Config> {
    let config_dir = init_config_dir()?;
    let config = ConfigStorage::new(config_dir).load()?;
    config.validate()?;
    Ok(config)
}

fn bundle_storage() -> Result<BundleStorage> {
    let data_dir = init_data_dir()?;
    Ok(BundleStorage::new(data_dir))
}

fn build_pipeline(config: &Config) -> Result<GenerationPipeline> {
    let api_key = secrets::openai_key().context("OPENAI_API_KEY is not set")?;
    let client = OpenAiClient::new(
        &config.openai.base_url,
        api_key,
        config.openai.model.clone(),
        config.openai.temperature,
    );
    Ok(GenerationPipeline::new(client))
}

/// Create every record of the import file and print the report.
/// Partial completion is a reported outcome, not a command failure.
async fn run_import(
    config: &Config,
    import: &ImportFile,
    json: bool,
    csv: Option<&Path>,
) -> Result<()> {
    let auth = secrets::jira_auth(&config.jira.email)?;
    let client = JiraClient::new(&config.jira.base_url, auth);
    let creator = Arc::new(JiraCreator::new(client, config.jira.type_names.clone()));
    let pacer = Arc::new(FixedDelay::from_millis(config.import.pacing_ms));

    let scheduler = ImportScheduler::new(creator, pacer);
    let report = scheduler.run(import).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }

    if let Some(path) = csv {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Cannot create {}", path.display()))?;
        report.write_csv(file)?;
        tracing::info!(path = %path.display(), "report written");
    }

    Ok(())
}

fn print_bundle_overview(import: &ImportFile) {
    for bundle in &import.projects {
        let mut epics = 0usize;
        let mut stories = 0usize;
        let mut subtasks = 0usize;
        for record in &bundle.issues {
            match record.canonical_type() {
                Some(IssueType::Epic) => epics += 1,
                Some(IssueType::Story) => stories += 1,
                Some(IssueType::Subtask) => subtasks += 1,
                None => {}
            }
        }
        println!(
            "{}: {} records ({} epics, {} stories, {} subtasks)",
            bundle.key,
            bundle.issues.len(),
            epics,
            stories,
            subtasks
        );
    }
}

/// Flag records whose summary numbering disagrees with their declared
/// type. They are still imported under the declared type.
fn warn_depth_mismatches(import: &ImportFile) {
    for bundle in &import.projects {
        for record in &bundle.issues {
            let Some(issue_type) = record.canonical_type() else {
                continue;
            };
            let depth = hierarchy::summary_depth(&record.summary);
            if depth != Some(issue_type.expected_depth()) {
                tracing::warn!(
                    project = %bundle.key,
                    external_id = %record.external_id,
                    summary = %record.summary,
                    issue_type = %issue_type,
                    "summary numbering does not match the declared type"
                );
            }
        }
    }
}
