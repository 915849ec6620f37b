use chrono::Utc;
use clap::Subcommand;
use classlog_core::{Config, Database};

use super::{load_session, print_json, save_session};

#[derive(Subcommand)]
pub enum EngageAction {
    /// Record an engagement score (0-100)
    Score {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        value: u8,
    },
    /// Show the current engagement state
    Status,
}

pub fn run(action: EngageAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let mut session = load_session(&db, &config);

    match action {
        EngageAction::Score { value } => match session.set_engagement(value, Utc::now()) {
            Some(event) => print_json(&event)?,
            None => println!("no active session"),
        },
        EngageAction::Status => {
            print_json(session.engagement())?;
        }
    }

    save_session(&db, &session)
}
