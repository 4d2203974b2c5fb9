use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use screener::auth::{Access, View};
use screener::{Config, HttpScreeningApi, SelectedFile, SessionStore, Workflow};

/// Message sent when the user does not provide one, matching what the
/// candidate-facing notification has always said.
const DEFAULT_NOTIFICATION: &str =
    "Your resume has been processed. Check your ranking in the system.";

#[derive(Parser, Debug)]
#[command(
    name = "screener",
    about = "Upload, rank and manage resumes against the screening service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in as an admin and persist the session
    Login {
        username: String,
        password: String,
    },
    /// Clear the persisted session
    Logout,
    /// Register a new admin account
    Signup {
        username: String,
        email: String,
        password: String,
    },
    /// Upload a resume file and show the extracted text
    Upload {
        /// Path to the resume file (pdf or docx)
        file: PathBuf,
    },
    /// Rank the stored resumes against a job description
    Rank {
        /// The job description text
        job_description: String,
    },
    /// List the resumes the service currently holds
    Resumes,
    /// Send an email notification to a candidate
    Notify {
        email: String,
        /// Message body; a processing update is sent when omitted
        message: Option<String>,
    },
    /// Show the admin view (requires a session)
    Admin,
    /// Toggle the persisted dark-mode preference
    Theme,
}

pub async fn run(config: Config) -> Result<()> {
    let cli = Cli::parse();

    let session = Arc::new(SessionStore::open(config.state_dir.as_deref())?);
    let api = Arc::new(HttpScreeningApi::new(
        config.api_url.clone(),
        config.request_timeout,
    ));
    let workflow = Workflow::new(api, session);

    match cli.command {
        Command::Login { username, password } => {
            workflow.login(&username, &password).await?;
            println!("Logged in as {username}.");
            println!("{} resume(s) on file.", workflow.repository().len());
        }
        Command::Logout => {
            workflow.logout()?;
            println!("Logged out.");
        }
        Command::Signup {
            username,
            email,
            password,
        } => {
            let response = workflow.signup(&username, &email, &password).await?;
            if response.success {
                println!("Admin account {username} registered. You can now log in.");
            } else {
                bail!(
                    "signup failed: {}",
                    response.error.as_deref().unwrap_or("unknown reason")
                );
            }
        }
        Command::Upload { file } => {
            let name = file
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .with_context(|| format!("{} has no usable file name", file.display()))?;
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;

            workflow.select_file(SelectedFile::new(name, bytes));
            let response = workflow.upload().await?;

            println!("{}", response.message);
            println!("--- extracted text ---");
            println!("{}", workflow.extracted_text());
        }
        Command::Rank { job_description } => {
            // The ranking request is built from the cached resume list, so
            // bring the cache up to date first.
            workflow.refresh().await?;
            workflow.rank(&job_description).await?;

            let ranking = workflow.ranking().display_ranking();
            if ranking.is_empty() {
                println!("No candidates ranked.");
                return Ok(());
            }
            println!("{:<6} {:<40} {:>7}", "Rank", "Candidate", "Score");
            for (index, candidate) in ranking.iter().enumerate() {
                println!(
                    "{:<6} {:<40} {:>7.2}",
                    index + 1,
                    candidate.name,
                    candidate.score
                );
            }
        }
        Command::Resumes => {
            workflow.refresh().await?;
            let records = workflow.repository().records();
            if records.is_empty() {
                println!("No resumes on file.");
                return Ok(());
            }
            for record in records {
                match record.id {
                    Some(id) => println!("[{id}] {}", record.name),
                    None => println!("{}", record.name),
                }
            }
        }
        Command::Notify { email, message } => {
            let message = message.as_deref().unwrap_or(DEFAULT_NOTIFICATION);
            workflow.notify(&email, message).await?;
            println!("Notification sent to {email}.");
        }
        Command::Admin => match workflow.authorize(View::Admin) {
            Access::Granted => {
                workflow.refresh().await?;
                let records = workflow.repository().records();
                println!("Admin dashboard");
                println!("{} resume(s) stored.", records.len());
                for record in records {
                    println!("  {}", record.name);
                }
            }
            Access::Redirect(target) => {
                bail!("not logged in; redirected to {target:?}. Run `screener login` first.");
            }
        },
        Command::Theme => {
            let enabled = workflow.toggle_dark_mode()?;
            println!("Dark mode {}.", if enabled { "on" } else { "off" });
        }
    }

    Ok(())
}
