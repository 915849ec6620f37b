use chrono::Utc;
use clap::Subcommand;
use classlog_core::{Config, Database};

use super::{load_session, print_json, report_client, save_session};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Record a qualitative note
    Add {
        text: String,
        /// Polish the note through the language model before recording
        #[arg(long)]
        polish: bool,
    },
}

pub fn run(action: NoteAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let mut session = load_session(&db, &config);

    match action {
        NoteAction::Add { text, polish } => {
            if !session.is_active() {
                println!("no active session");
                return save_session(&db, &session);
            }
            let text = if polish {
                let client = report_client(&config);
                let rt = tokio::runtime::Runtime::new()?;
                rt.block_on(client.polish(&text))?
            } else {
                text
            };
            if let Some(event) = session.add_note(&text, Utc::now()) {
                print_json(&event)?;
            }
        }
    }

    save_session(&db, &session)
}
