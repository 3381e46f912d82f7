// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::browser::JobBrowser;
use crate::core::{AppConfig, ServiceClient, SharedBackend};
use crate::list_view::JobListView;
use crate::settings::{PreferencesStore, TitleRejection};
use crate::suggestions::{OverlayMessage, RunOutcome, StartOutcome, SuggestionController};
use crate::types::preferences::{MAX_JOB_TITLES, OFFERED_COUNTRIES};
use crate::types::{AppliedFilter, Job};
use crate::web::start_web_server;

#[derive(Parser)]
#[command(name = "job-scout")]
#[command(about = "Browse job listings and scout AI-matched suggestions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Backend base URL, overriding config.yaml and JOB_SCOUT_API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search job listings
    Search {
        keywords: String,
        location: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search, then show the full description of one listing
    Details {
        keywords: String,
        location: String,
        linkedin_job_id: String,
    },
    /// List stored suggestions
    Suggestions {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
    /// Start a scouting run and follow it until it settles
    Scout {
        /// Return as soon as the run is started
        #[arg(long)]
        no_wait: bool,
    },
    /// Record that you applied to a job
    MarkApplied { linkedin_job_id: String },
    /// Read or change profile settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// Serve the JSON API locally
    Serve,
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print the stored profile
    Show,
    /// Replace the resume, from a file or inline text
    SetResume {
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        #[arg(long)]
        text: Option<String>,
    },
    SetInstructions { text: String },
    /// Add or remove a target country
    ToggleCountry { country: String },
    AddTitle { title: String },
    /// Remove a job title by its 1-based position
    RemoveTitle { position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    All,
    Applied,
    NotApplied,
}

impl From<FilterArg> for AppliedFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => AppliedFilter::All,
            FilterArg::Applied => AppliedFilter::Applied,
            FilterArg::NotApplied => AppliedFilter::NotApplied,
        }
    }
}

pub async fn handle_command(cli: Cli, mut config: AppConfig) -> Result<()> {
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    if let Command::Serve = cli.command {
        return start_web_server(config).await;
    }

    let client = ServiceClient::new(config.api_base_url.clone(), config.request_timeout_secs)
        .context("Failed to build backend client")?;
    let backend: SharedBackend = Arc::new(client);
    info!("Using backend at {}", config.api_base_url);

    match cli.command {
        Command::Search {
            keywords,
            location,
            page,
        } => {
            let mut browser = JobBrowser::new(backend, config.page_size);
            browser.search(&keywords, &location).await;
            if page > 1 {
                browser.goto_page(page).await;
            }
            if let Some(e) = browser.last_error() {
                anyhow::bail!("Search failed: {}", e);
            }
            print_list(browser.view());
        }

        Command::Details {
            keywords,
            location,
            linkedin_job_id,
        } => {
            let mut browser = JobBrowser::new(backend, config.page_size);
            browser.search(&keywords, &location).await;
            match browser.select(&linkedin_job_id).await {
                Some(job) => print_details(job),
                None => anyhow::bail!("Job {} is not on the first result page", linkedin_job_id),
            }
        }

        Command::Suggestions { page, filter } => {
            let controller = SuggestionController::new(backend, config.controller_settings());
            controller.set_filter(filter.into()).await;
            if page > 1 {
                controller.load_page(page).await;
            }
            let state = controller.snapshot();
            if let Some(e) = state.last_error {
                anyhow::bail!("Could not load suggestions: {}", e);
            }
            print_list(&state.list);
        }

        Command::Scout { no_wait } => {
            let controller = SuggestionController::new(backend, config.controller_settings());
            run_scout(&controller, no_wait).await?;
        }

        Command::MarkApplied { linkedin_job_id } => {
            backend
                .mark_applied(&linkedin_job_id, true)
                .await
                .with_context(|| format!("Failed to mark {} as applied", linkedin_job_id))?;
            println!("Marked {} as applied", linkedin_job_id);
        }

        Command::Settings { command } => {
            let mut store = PreferencesStore::new(backend);
            handle_settings_command(&mut store, command).await?;
        }

        Command::Serve => {}
    }

    Ok(())
}

async fn run_scout(controller: &SuggestionController, no_wait: bool) -> Result<()> {
    match controller.start().await {
        Ok(StartOutcome::Started { task_id }) => {
            println!(
                "Scouting started{}",
                task_id.map(|id| format!(" (task {})", id)).unwrap_or_default()
            );
        }
        Ok(StartOutcome::Attached) => println!("A scouting run is already in progress, following it"),
        Ok(StartOutcome::AlreadyPolling) => println!("Already following a scouting run"),
        Err(e) => {
            error!("Failed to start scouting: {}", e);
            return Err(e.into());
        }
    }

    if no_wait {
        controller.shutdown();
        return Ok(());
    }

    let mut updates = controller.subscribe();
    let mut last_attempts = 0;
    loop {
        let (attempts, settled, status) = {
            let state = updates.borrow_and_update();
            (
                state.attempts,
                !state.analyzing,
                state.status.status.to_string(),
            )
        };
        if attempts != last_attempts {
            println!("  poll {}: {}", attempts, status);
            last_attempts = attempts;
        }
        if settled || updates.changed().await.is_err() {
            break;
        }
    }

    let state = controller.snapshot();
    match state.last_outcome {
        Some(RunOutcome::Completed) if state.overlay_message == OverlayMessage::Complete => {
            println!("Scouting complete");
        }
        Some(RunOutcome::Completed) => println!("Scouting finished"),
        Some(RunOutcome::Failed) => println!("Scouting failed"),
        Some(RunOutcome::TimedOut) => println!("Gave up waiting for scouting to finish"),
        None => {}
    }
    print_list(&state.list);

    controller.wait_until_settled().await;
    Ok(())
}

async fn handle_settings_command(
    store: &mut PreferencesStore,
    command: SettingsCommand,
) -> Result<()> {
    if !store.load().await {
        anyhow::bail!("Failed to load settings");
    }

    match command {
        SettingsCommand::Show => {
            let preferences = store.preferences();
            println!("Resume ({} chars)", preferences.resume.trim().chars().count());
            println!("Instructions: {}", preferences.instructions);
            println!("Countries (offered: {}):", OFFERED_COUNTRIES.join(", "));
            for country in &preferences.countries {
                println!("  - {}", country);
            }
            println!("Job titles (max {}):", MAX_JOB_TITLES);
            for (i, title) in preferences.titles.iter().enumerate() {
                println!("  {}. {}", i + 1, title);
            }
            return Ok(());
        }
        SettingsCommand::SetResume { file, text } => {
            let resume = match (file, text) {
                (Some(path), _) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, Some(text)) => text,
                (None, None) => anyhow::bail!("Provide --file or --text"),
            };
            store.set_resume(resume);
        }
        SettingsCommand::SetInstructions { text } => store.set_instructions(text),
        SettingsCommand::ToggleCountry { country } => {
            let selected = store.toggle_country(&country);
            println!(
                "{} {}",
                country,
                if selected { "selected" } else { "removed" }
            );
        }
        SettingsCommand::AddTitle { title } => {
            if let Err(rejection) = store.add_title(&title) {
                let reason = match rejection {
                    TitleRejection::Empty => "title is empty".to_string(),
                    TitleRejection::Duplicate => format!("'{}' is already listed", title.trim()),
                    TitleRejection::LimitReached => {
                        format!("at most {} titles are allowed", MAX_JOB_TITLES)
                    }
                };
                anyhow::bail!("Cannot add title: {}", reason);
            }
        }
        SettingsCommand::RemoveTitle { position } => {
            let removed = position
                .checked_sub(1)
                .and_then(|index| store.remove_title(index));
            match removed {
                Some(title) => println!("Removed {}", title),
                None => anyhow::bail!("No title at position {}", position),
            }
        }
    }

    if !store.save().await {
        anyhow::bail!("Failed to save settings");
    }
    println!("Settings saved");
    Ok(())
}

fn print_list(view: &JobListView) {
    if view.jobs.is_empty() {
        println!("No jobs on page {}", view.page.number);
        return;
    }
    for job in &view.jobs {
        println!(
            "[{}] {} - {} ({}){}",
            job.linkedin_job_id,
            job.title,
            job.company_or_default(),
            job.location_or_default(),
            if job.applied { " [applied]" } else { "" }
        );
        if let Some(reason) = job.relevancy_reason.as_deref().filter(|_| job.relevant) {
            println!("    why: {}", reason);
        }
    }
    let mut nav = vec![format!("page {}", view.page.number)];
    if view.has_previous() {
        nav.push("previous available".to_string());
    }
    if view.has_next {
        nav.push("next available".to_string());
    }
    println!("-- {} --", nav.join(", "));
}

fn print_details(job: &Job) {
    println!("{}", job.title);
    println!("{} - {}", job.company_or_default(), job.location_or_default());
    println!("{}", job.url);
    println!();
    println!(
        "{}",
        job.description.as_deref().unwrap_or("No description available")
    );
}
