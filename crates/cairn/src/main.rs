mod cli;
mod commands;
mod pipeline;

use cairn_store::Paths;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Hook stdout carries injected context, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = Paths::new()?;

    match cli.command {
        Commands::Init => commands::init::run(&paths),
        Commands::Ingest { file, session } => {
            commands::ingest::run(&paths, file.as_deref(), session.as_deref())
        }
        Commands::Query {
            prompt,
            files,
            budget,
            backend,
        } => commands::query::run(&paths, prompt.as_deref().unwrap_or(""), &files, budget, backend),
        Commands::Rebuild { backend } => commands::rebuild::run(&paths, backend),
        Commands::Status => commands::status::run(&paths),
        Commands::Version => commands::version::run(),
        Commands::HookSessionStart => commands::hooks::run_session_start(&paths),
        Commands::HookUserPromptSubmit => commands::hooks::run_user_prompt_submit(&paths),
        Commands::HookStop => commands::hooks::run_stop(&paths),
    }
}
