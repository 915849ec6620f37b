use clap::Subcommand;
use classlog_core::{CredentialStore, KeyringCredentialStore};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the API key (expires two hours after the last save)
    SetKey { key: String },
    /// Check whether a usable key is stored
    Status,
    /// Remove the stored key
    Clear,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = KeyringCredentialStore::new();
    match action {
        AuthAction::SetKey { key } => {
            store.set(&key)?;
            println!("API key stored");
        }
        AuthAction::Status => {
            println!(
                "{}",
                if store.get()?.is_some() {
                    "key configured"
                } else {
                    "no key configured (never set, or expired)"
                }
            );
        }
        AuthAction::Clear => {
            store.clear()?;
            println!("API key removed");
        }
    }
    Ok(())
}
