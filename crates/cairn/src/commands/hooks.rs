use crate::pipeline::{self, IngestReport};
use cairn_classify::Classifier;
use cairn_core::ConfigError;
use cairn_store::Paths;
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
struct SessionStartInput {
    #[serde(default)]
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct PromptInput {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptOutput {
    hook_specific_output: HookSpecificOutput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HookSpecificOutput {
    hook_event_name: &'static str,
    additional_context: String,
}

#[derive(Debug, Deserialize)]
struct StopInput {
    #[serde(default)]
    session_id: String,
    #[serde(default)]
    transcript_path: Option<PathBuf>,
}

fn read_stdin() -> io::Result<String> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

fn emit(text: &str) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()
}

/// Only configuration errors reach the host; anything else is logged
fn settle(hook: &str, result: anyhow::Result<()>) -> anyhow::Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.downcast_ref::<ConfigError>().is_some() => Err(e),
        Err(e) => {
            tracing::warn!(hook, error = %e, "hook failed, continuing session");
            Ok(())
        }
    }
}

pub fn run_session_start(paths: &Paths) -> anyhow::Result<()> {
    settle("session-start", session_start_io(paths))
}

pub fn run_user_prompt_submit(paths: &Paths) -> anyhow::Result<()> {
    settle("user-prompt-submit", user_prompt_submit_io(paths))
}

pub fn run_stop(paths: &Paths) -> anyhow::Result<()> {
    settle("stop", stop_io(paths))
}

fn session_start_io(paths: &Paths) -> anyhow::Result<()> {
    let input = read_stdin()?;
    let block = session_start(paths, &input)?;
    emit(&block)?;
    Ok(())
}

fn user_prompt_submit_io(paths: &Paths) -> anyhow::Result<()> {
    let input = read_stdin()?;
    if let Some(output) = user_prompt_submit(paths, &input)? {
        emit(&output)?;
    }
    Ok(())
}

fn stop_io(paths: &Paths) -> anyhow::Result<()> {
    let input = read_stdin()?;
    if let Some(report) = stop(paths, &input)? {
        tracing::debug!(appended = report.appended, extracted = report.extracted, "stop hook ingest");
    }
    Ok(())
}

/// Recency block for a new session
fn session_start(paths: &Paths, input: &str) -> anyhow::Result<String> {
    let input: SessionStartInput = serde_json::from_str(input).unwrap_or_default();
    let config = pipeline::load_config(paths)?;
    let index = pipeline::load_index(paths, config.backend)?;

    let block = pipeline::recall(&index, "", &[], config.budget);
    tracing::debug!(session_id = %input.session_id, chars = block.len(), "session start recall");
    Ok(block)
}

/// Hook output JSON, or None when nothing relevant is recorded
fn user_prompt_submit(paths: &Paths, input: &str) -> anyhow::Result<Option<String>> {
    let input: PromptInput = serde_json::from_str(input)?;
    let config = pipeline::load_config(paths)?;
    let index = pipeline::load_index(paths, config.backend)?;

    let files = hinted_files(&input.prompt, &paths.project);
    let block = pipeline::recall(&index, &input.prompt, &files, config.budget);
    if block.is_empty() {
        return Ok(None);
    }

    let output = PromptOutput {
        hook_specific_output: HookSpecificOutput {
            hook_event_name: "UserPromptSubmit",
            additional_context: block,
        },
    };
    Ok(Some(serde_json::to_string(&output)?))
}

/// Ingest the transcript named by the host, if it exists
fn stop(paths: &Paths, input: &str) -> anyhow::Result<Option<IngestReport>> {
    let input: StopInput = serde_json::from_str(input)?;
    let Some(transcript) = input.transcript_path.filter(|p| p.is_file()) else {
        tracing::debug!(session_id = %input.session_id, "no transcript to ingest");
        return Ok(None);
    };

    let session_id = if input.session_id.is_empty() {
        transcript
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string()
    } else {
        input.session_id
    };

    let config = pipeline::load_config(paths)?;
    let classifier = Classifier::from_config(&config.summarizer);
    let mut index = pipeline::load_index(paths, config.backend)?;

    let report =
        pipeline::ingest_transcript(paths, &mut index, &classifier, &transcript, &session_id)?;
    if report.appended > 0 {
        pipeline::save_index(paths, &index)?;
    }
    Ok(Some(report))
}

/// Prompt tokens that look like file paths, plus their project-relative forms
fn hinted_files(prompt: &str, project: &Path) -> Vec<String> {
    let mut hints: Vec<String> = Vec::new();
    let mut push = |hint: String| {
        if !hints.contains(&hint) {
            hints.push(hint);
        }
    };

    for token in prompt.split_whitespace() {
        let token = token
            .trim_matches(|c: char| "`'\",;:()[]{}<>!?".contains(c))
            .trim_end_matches('.');
        let token = token.strip_prefix("./").unwrap_or(token);
        if !looks_like_path(token) {
            continue;
        }
        push(token.to_string());
        if Path::new(token).is_relative() {
            push(project.join(token).to_string_lossy().into_owned());
        }
    }
    hints
}

fn looks_like_path(token: &str) -> bool {
    if token.is_empty() || token.contains("://") {
        return false;
    }
    if token.contains('/') {
        return true;
    }
    Path::new(token)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            ext.len() <= 8
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
                && ext.chars().any(|c| c.is_ascii_alphabetic())
        })
}
