use crate::pipeline;
use cairn_core::BackendKind;
use cairn_index::EventIndex;
use cairn_store::Paths;

pub fn run(
    paths: &Paths,
    prompt: &str,
    files: &[String],
    budget: Option<usize>,
    backend: Option<BackendKind>,
) -> anyhow::Result<()> {
    let block = context_block(paths, prompt, files, budget, backend)?;
    if block.is_empty() {
        eprintln!("No matching reasoning recorded");
    } else {
        println!("{}", block);
    }
    Ok(())
}

fn context_block(
    paths: &Paths,
    prompt: &str,
    files: &[String],
    budget: Option<usize>,
    backend: Option<BackendKind>,
) -> anyhow::Result<String> {
    let config = pipeline::load_config(paths)?;
    let budget = budget.unwrap_or(config.budget);

    // A one-off backend is replayed in memory; the persisted state stays as configured
    let index = match backend {
        Some(kind) if kind != config.backend => {
            EventIndex::rebuild(kind, &pipeline::event_log(paths).read_all()?)
        }
        _ => pipeline::load_index(paths, config.backend)?,
    };

    Ok(pipeline::recall(&index, prompt, files, budget))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::*;

    fn ingested_paths(temp: &tempfile::TempDir) -> Paths {
        let paths = temp_paths(temp.path());
        write_offline_config(&paths, "file_index");
        let transcript = write_transcript(temp.path(), "s1.jsonl", &transcript_lines());
        crate::commands::ingest::run(&paths, transcript.to_str(), None).unwrap();
        paths
    }

    #[test]
    fn test_context_block_for_hinted_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = ingested_paths(&temp);

        let block =
            context_block(&paths, "", &["src/config.rs".to_string()], None, None).unwrap();
        assert_eq!(
            block,
            "### src/config.rs\n- [exploration] Let me check how the config is loaded"
        );
    }

    #[test]
    fn test_backend_override_leaves_state_alone() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = ingested_paths(&temp);
        let before = std::fs::read_to_string(paths.index_state()).unwrap();

        let block = context_block(&paths, "", &[], None, Some(BackendKind::DecisionSet)).unwrap();
        assert!(block.contains("[decision]"));
        assert!(block.contains("[tradeoff]"));
        assert!(!block.contains("[exploration]"));

        let after = std::fs::read_to_string(paths.index_state()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_empty_project_yields_empty_block() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = temp_paths(temp.path());
        assert_eq!(context_block(&paths, "anything", &[], None, None).unwrap(), "");
    }

    #[test]
    fn test_budget_override() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = ingested_paths(&temp);
        let block =
            context_block(&paths, "", &["src/cache.rs".to_string()], Some(0), None).unwrap();
        assert!(block.is_empty());
    }
}
