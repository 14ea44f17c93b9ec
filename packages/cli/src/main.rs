#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for comparing hackathon surveys.
//!
//! Without a subcommand it starts an interactive session that edits
//! filter combinations and re-runs the comparison after every change.
//! The subcommands cover one-shot analysis, offline mapping of a saved
//! analysis payload, filter presets, account handling, and uploads.

mod interactive;
mod progress;
mod render;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use dialoguer::Password;
use hackathon_survey_analysis::request::parse_hackathon_ids;
use hackathon_survey_analysis::{AnalysisError, default_manifest, load_manifest};
use hackathon_survey_analysis_models::SectionManifest;
use hackathon_survey_client::config::token_from_env;
use hackathon_survey_client::{
    AnalysisSource, ClientConfig, ClientError, FileAnalysisSource, HttpClient,
};
use hackathon_survey_filters_models::FilterCombination;
use hackathon_survey_hackathon_models::{Credentials, HackathonInformation, RawHackathon};
use hackathon_survey_session::{AnalysisController, AnalysisView, RefreshOutcome, SessionError};
use indicatif::MultiProgress;

#[derive(Parser)]
#[command(
    name = "hackathon_survey",
    about = "Compare survey results across hackathons"
)]
struct Cli {
    /// Client config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and print the comparison for a set of hackathons
    Analyze {
        /// Comma-separated hackathon ids
        #[arg(long)]
        hackathons: String,

        /// JSON file with an array of filter combinations
        #[arg(long)]
        filters: Option<PathBuf>,

        /// Section manifest (TOML) replacing the built-in one
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Print the mapped sections as JSON
        #[arg(long)]
        json: bool,
    },

    /// Map a saved analyses response without contacting the backend
    Map {
        /// JSON file holding a `GET /analyses` response
        #[arg(long)]
        input: PathBuf,

        /// Section manifest (TOML) replacing the built-in one
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Print the mapped sections as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in sections and their questions
    Manifest,

    /// Manage saved filter presets
    Filters {
        #[command(subcommand)]
        action: FilterAction,
    },

    /// Log in and print an access token
    Login {
        #[arg(long)]
        username: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        username: String,
    },

    /// Upload a hackathon and its survey responses
    Upload {
        #[command(subcommand)]
        source: UploadSource,
    },
}

#[derive(Subcommand)]
enum FilterAction {
    /// List your saved presets
    List,
    /// Save a filter combination (JSON file) as a preset
    Save { file: PathBuf },
    /// Delete a preset
    Delete { id: String },
}

#[derive(Subcommand)]
enum UploadSource {
    /// Responses exported from a survey tool as CSV
    Csv {
        /// JSON file with the hackathon's information
        #[arg(long)]
        info: PathBuf,

        /// The `.csv` export
        #[arg(long)]
        file: PathBuf,
    },
    /// Hackathon information plus Google Forms responses (JSON)
    Google { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = progress::init_logger();
    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref())?;

    let Some(command) = cli.command else {
        return interactive::run(&multi, http_client(config)?).await;
    };

    match command {
        Commands::Analyze {
            hackathons,
            filters,
            manifest,
            json,
        } => {
            let filters = match filters {
                Some(path) => read_json::<Vec<FilterCombination>>(&path)?,
                None => Vec::new(),
            };
            let controller =
                AnalysisController::new(http_client(config)?, section_manifest(manifest)?);
            show_analysis(
                &multi,
                &controller,
                &parse_hackathon_ids(&hackathons),
                &filters,
                json,
            )
            .await?;
        }
        Commands::Map {
            input,
            manifest,
            json,
        } => {
            let controller =
                AnalysisController::new(FileAnalysisSource::new(input), section_manifest(manifest)?);
            show_analysis(&multi, &controller, &[], &[], json).await?;
        }
        Commands::Manifest => {
            for section in default_manifest()?.sections {
                println!("{}", section.section_title);
                for question in section.questions {
                    println!("  - {question}");
                }
            }
        }
        Commands::Filters { action } => run_filters(&http_client(config)?, action).await?,
        Commands::Login { username } => {
            let password = Password::new().with_prompt("Password").interact()?;
            let client = http_client(config)?;
            let token = client
                .login(&Credentials { username, password })
                .await?;
            println!("{}", token.access_token);
        }
        Commands::Register { username } => {
            let password = Password::new()
                .with_prompt("Password")
                .with_confirmation("Repeat password", "Passwords do not match")
                .interact()?;
            http_client(config)?
                .register(&Credentials {
                    username: username.clone(),
                    password,
                })
                .await?;
            println!("Registered {username}");
        }
        Commands::Upload { source } => {
            let client = http_client(config)?;
            let bar = progress::spinner(&multi, "Uploading...");
            let result = match source {
                UploadSource::Csv { info, file } => {
                    let information: HackathonInformation = read_json(&info)?;
                    client.upload_hackathon_csv(&information, &file).await
                }
                UploadSource::Google { file } => {
                    let hackathon: RawHackathon = read_json(&file)?;
                    client.upload_hackathon_google(&hackathon).await
                }
            };
            bar.finish_and_clear();
            result?;
            println!("Upload complete");
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Client for the configured backend, carrying the token from the
/// environment if one is set.
fn http_client(config: ClientConfig) -> Result<HttpClient, ClientError> {
    Ok(HttpClient::new(config)?.with_token(token_from_env()))
}

fn section_manifest(path: Option<PathBuf>) -> Result<SectionManifest, AnalysisError> {
    path.map_or_else(default_manifest, |path| load_manifest(&path))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ClientError> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

/// Refreshes `controller` behind a spinner and prints the resulting view,
/// whether the refresh succeeded or not.
async fn show_analysis<S: AnalysisSource>(
    multi: &MultiProgress,
    controller: &AnalysisController<S>,
    hackathon_ids: &[String],
    filters: &[FilterCombination],
    json: bool,
) -> Result<RefreshOutcome, SessionError> {
    let bar = progress::spinner(multi, "Loading analyses...");
    let result = controller.refresh(hackathon_ids, filters).await;
    bar.finish_and_clear();

    let view = controller.snapshot();
    if json {
        println!("{}", view_json(&view));
    } else {
        println!("{}", render::render_view(&view));
    }

    result
}

fn view_json(view: &AnalysisView) -> String {
    serde_json::json!({
        "state": view.state.to_string(),
        "message": view.message,
        "emptyFilters": view.empty_filters,
        "sections": view.sections,
    })
    .to_string()
}

async fn run_filters(client: &HttpClient, action: FilterAction) -> Result<(), ClientError> {
    match action {
        FilterAction::List => {
            for filter in client.list_filters().await? {
                println!(
                    "{}\t{}",
                    filter.id.as_deref().unwrap_or("-"),
                    filter.name
                );
            }
        }
        FilterAction::Save { file } => {
            let filter: FilterCombination = read_json(&file)?;
            client.save_filter(&filter).await?;
            println!("Saved {}", filter.name);
        }
        FilterAction::Delete { id } => {
            client.delete_filter(&id).await?;
            println!("Deleted {id}");
        }
    }
    Ok(())
}
