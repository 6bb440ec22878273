use crate::pipeline;
use cairn_classify::Classifier;
use cairn_index::Backend;
use cairn_store::Paths;
use std::path::{Path, PathBuf};

fn discover_session_files(project_dir: &Path) -> Vec<PathBuf> {
    let dir_entries = match std::fs::read_dir(project_dir) {
        Ok(e) => e,
        Err(_) => return Vec::new(),
    };

    let mut files: Vec<PathBuf> = dir_entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("jsonl") && path.is_file())
        .collect();
    files.sort();
    files
}

fn session_id_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

pub fn run(paths: &Paths, file: Option<&str>, session: Option<&str>) -> anyhow::Result<()> {
    let config = pipeline::load_config(paths)?;

    let sessions: Vec<(PathBuf, String)> = match file {
        Some(f) => {
            let path = PathBuf::from(f);
            let id = session.map(str::to_string).unwrap_or_else(|| session_id_for(&path));
            vec![(path, id)]
        }
        None => {
            let project_dir = paths.project_dir();
            let files = discover_session_files(&project_dir);
            if files.is_empty() {
                println!("No session files found in {}", project_dir.display());
                return Ok(());
            }
            println!("Discovered {} session files", files.len());
            files
                .into_iter()
                .map(|path| {
                    let id = session_id_for(&path);
                    (path, id)
                })
                .collect()
        }
    };

    let classifier = Classifier::from_config(&config.summarizer);
    let mut index = pipeline::load_index(paths, config.backend)?;

    let mut total_appended = 0;
    for (path, session_id) in &sessions {
        let report =
            match pipeline::ingest_transcript(paths, &mut index, &classifier, path, session_id) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(transcript = %path.display(), error = %e, "failed to ingest transcript");
                    continue;
                }
            };
        println!(
            "  {}: {} new of {} events from {} lines",
            session_id, report.appended, report.extracted, report.lines
        );
        total_appended += report.appended;
    }

    pipeline::save_index(paths, &index)?;

    println!(
        "Ingested {} new events from {} sessions ({} indexed by {})",
        total_appended,
        sessions.len(),
        index.len(),
        config.backend
    );
    Ok(())
}
