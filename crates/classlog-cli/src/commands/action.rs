use chrono::Utc;
use clap::Subcommand;
use classlog_core::{Config, Database};

use super::{load_session, print_json, save_session};

#[derive(Subcommand)]
pub enum ActionAction {
    /// Tally one observed teaching action
    Record {
        /// Action id from the catalog (see `action list`)
        id: String,
    },
    /// List action counters with current tallies
    List,
}

pub fn run(action: ActionAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let mut session = load_session(&db, &config);

    match action {
        ActionAction::Record { id } => {
            if session.actions().get(&id).is_none() {
                return Err(format!("unknown action '{id}'").into());
            }
            match session.record_action(&id, Utc::now()) {
                Some(event) => print_json(&event)?,
                None => println!("no active session"),
            }
        }
        ActionAction::List => {
            let actions: Vec<_> = session.actions().iter().collect();
            print_json(&actions)?;
        }
    }

    save_session(&db, &session)
}
