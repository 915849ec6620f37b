use chrono::Utc;
use clap::Subcommand;
use classlog_core::{Config, Database};

use super::{load_session, print_json, save_session};

#[derive(Subcommand)]
pub enum ModeAction {
    /// Toggle a mode timer on or off
    Toggle {
        /// Mode id from the catalog (see `mode list`)
        id: String,
    },
    /// List mode timers with accumulated time
    List,
}

pub fn run(action: ModeAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let mut session = load_session(&db, &config);

    match action {
        ModeAction::Toggle { id } => {
            if session.modes().get(&id).is_none() {
                return Err(format!("unknown mode '{id}'").into());
            }
            match session.toggle_mode(&id, Utc::now()) {
                Some(event) => print_json(&event)?,
                None => println!("no active session"),
            }
        }
        ModeAction::List => {
            let modes: Vec<_> = session.modes().iter().collect();
            print_json(&modes)?;
        }
    }

    save_session(&db, &session)
}
