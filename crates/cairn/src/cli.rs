use cairn_core::BackendKind;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cairn")]
#[command(version)]
#[command(about = "Reasoning capture and recall for AI coding assistants")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install cairn hooks in ~/.claude/settings.json
    Init,

    /// Extract, classify and index reasoning from session transcripts
    Ingest {
        /// Path to session JSONL (ingests every project transcript if omitted)
        #[arg(short, long)]
        file: Option<String>,

        /// Session id for --file (defaults to the file stem)
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Print the context block recalled for a prompt
    Query {
        /// Prompt text to match against
        prompt: Option<String>,

        /// File hint; may be repeated
        #[arg(short, long = "file")]
        files: Vec<String>,

        /// Retrieval budget override
        #[arg(long)]
        budget: Option<usize>,

        /// Backend override for this run
        #[arg(long)]
        backend: Option<BackendKind>,
    },

    /// Rebuild the index from the event log
    Rebuild {
        /// Switch to and persist this backend
        #[arg(long)]
        backend: Option<BackendKind>,
    },

    /// Show index status as JSON
    Status,

    /// Print version information
    Version,

    /// Hook: Recall recent reasoning at session start
    #[command(name = "hook:session-start")]
    HookSessionStart,

    /// Hook: Recall reasoning relevant to a prompt (stdin/stdout JSON)
    #[command(name = "hook:user-prompt-submit")]
    HookUserPromptSubmit,

    /// Hook: Capture the finished turn's transcript
    #[command(name = "hook:stop")]
    HookStop,
}
