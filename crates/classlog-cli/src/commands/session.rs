use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use classlog_core::session::{format_hms, Clock, SessionTimers};
use classlog_core::{Config, Database, ObserverSession};

use super::{load_session, print_json, save_session};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a new observation session
    Start {
        /// Subject or class under observation
        #[arg(long)]
        subject: String,
    },
    /// Stop the active session and archive it
    Stop,
    /// Print current session state as JSON
    Status,
    /// Host the session timers in-process until interrupted
    Watch,
    /// Export the session as plain text
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List archived observations
    List {
        #[arg(long, default_value = "10")]
        limit: u32,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let mut session = load_session(&db, &config);

    match action {
        SessionAction::Start { subject } => {
            let event = session.start(&subject, Utc::now());
            print_json(&event)?;
        }
        SessionAction::Stop => match session.stop(Utc::now()) {
            Some(event) => {
                db.record_observation(&session.snapshot())?;
                print_json(&event)?;
            }
            None => println!("no active session"),
        },
        SessionAction::Status => {
            print_json(&session.status(Utc::now()))?;
        }
        SessionAction::Watch => {
            watch(&db, &config, session)?;
            return Ok(());
        }
        SessionAction::Export { output } => {
            let text = session.snapshot().to_plain_text();
            match output {
                Some(path) => std::fs::write(&path, text)?,
                None => print!("{text}"),
            }
        }
        SessionAction::List { limit } => {
            print_json(&db.list_observations(limit)?)?;
        }
    }

    save_session(&db, &session)
}

/// Run the real timers over the loaded session until Ctrl-C, then persist
/// the final state.
fn watch(
    db: &Database,
    config: &Config,
    session: ObserverSession,
) -> Result<(), Box<dyn std::error::Error>> {
    if !session.is_active() {
        println!("no active session");
        return Ok(());
    }

    let session = Arc::new(Mutex::new(session));
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let mut timers = SessionTimers::start(
            Arc::clone(&session),
            Duration::from_secs(config.reminder.poll_secs),
        );

        let mut display = Clock::new();
        {
            let session = Arc::clone(&session);
            display.start(Duration::from_secs(1), move || {
                let status = {
                    let s = session.lock().unwrap_or_else(|e| e.into_inner());
                    s.status(Utc::now())
                };
                print!(
                    "\r{} | {} | engagement {} ({}){}   ",
                    status.subject,
                    format_hms(status.elapsed_secs),
                    status.engagement_score,
                    status.engagement_level,
                    if status.reminder_due {
                        " | score due"
                    } else {
                        ""
                    },
                );
                std::io::stdout().flush().ok();
            });
        }

        let result = tokio::signal::ctrl_c().await;
        timers.stop();
        display.stop();
        println!();
        result
    })?;

    let final_state = session.lock().unwrap_or_else(|e| e.into_inner());
    save_session(db, &final_state)
}
