use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "classlog-cli", version, about = "Classlog CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Observation session control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Teaching mode timers
    Mode {
        #[command(subcommand)]
        action: commands::mode::ModeAction,
    },
    /// Teaching action counters
    Action {
        #[command(subcommand)]
        action: commands::action::ActionAction,
    },
    /// Engagement scoring
    Engage {
        #[command(subcommand)]
        action: commands::engage::EngageAction,
    },
    /// Qualitative notes
    Note {
        #[command(subcommand)]
        action: commands::note::NoteAction,
    },
    /// Narrative report generation
    Report {
        #[command(subcommand)]
        action: commands::report::ReportAction,
    },
    /// API key management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Mode { action } => commands::mode::run(action),
        Commands::Action { action } => commands::action::run(action),
        Commands::Engage { action } => commands::engage::run(action),
        Commands::Note { action } => commands::note::run(action),
        Commands::Report { action } => commands::report::run(action),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
