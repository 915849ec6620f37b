use std::path::PathBuf;

use clap::Subcommand;
use classlog_core::{Config, Database};

use super::{load_session, report_client};

#[derive(Subcommand)]
pub enum ReportAction {
    /// Generate a narrative report for the current session
    Generate {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate a narrative report for an archived observation
    Archived {
        /// Observation id (see `session list`)
        id: i64,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub fn run(action: ReportAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;

    let (snapshot, output) = match action {
        ReportAction::Generate { output } => {
            let session = load_session(&db, &config);
            if session.started_at().is_none() {
                return Err("no observation to report on".into());
            }
            (session.snapshot(), output)
        }
        ReportAction::Archived { id, output } => {
            let snapshot = db
                .load_snapshot(id)?
                .ok_or_else(|| format!("no archived observation with id {id}"))?;
            (snapshot, output)
        }
    };

    let client = report_client(&config);
    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(client.generate_report(&snapshot))?;

    match output {
        Some(path) => std::fs::write(&path, report)?,
        None => println!("{report}"),
    }
    Ok(())
}
