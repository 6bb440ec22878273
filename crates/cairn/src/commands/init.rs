use crate::pipeline;
use cairn_store::Paths;
use serde_json::Value;

const HOOKS: [(&str, &str); 3] = [
    ("SessionStart", "cairn hook:session-start"),
    ("UserPromptSubmit", "cairn hook:user-prompt-submit"),
    ("Stop", "cairn hook:stop"),
];

pub fn run(paths: &Paths) -> anyhow::Result<()> {
    if !paths.home_claude.exists() {
        anyhow::bail!(
            "~/.claude directory not found. Create it or ensure Claude Code is installed."
        );
    }

    let settings_path = paths.settings_file();
    let mut settings: Value = if settings_path.exists() {
        let content = std::fs::read_to_string(&settings_path)?;
        serde_json::from_str(&content)?
    } else {
        serde_json::json!({})
    };

    if settings.get("hooks").is_none() {
        settings["hooks"] = serde_json::json!({});
    }

    let mut added = Vec::new();
    for (event_name, command) in HOOKS {
        if add_hook_if_missing(&mut settings, event_name, command)? {
            added.push(event_name);
        }
    }

    let json = serde_json::to_string_pretty(&settings)?;
    cairn_store::atomic_write(&settings_path, json.as_bytes())?;

    // Materialize defaults so the active backend is visible and editable
    if !paths.config_file().exists() {
        pipeline::save_config(paths, &pipeline::load_config(paths)?)?;
    }

    if added.is_empty() {
        println!("cairn hooks already installed in ~/.claude/settings.json");
    } else {
        println!("✓ Installed cairn hooks in ~/.claude/settings.json");
        println!("\nHooks added:");
        for event_name in added {
            println!("  - {}", event_name);
        }
    }
    println!("Config: {}", paths.config_file().display());

    Ok(())
}

/// Returns whether a hook group was added
fn add_hook_if_missing(
    settings: &mut Value,
    event_name: &str,
    command: &str,
) -> anyhow::Result<bool> {
    let hooks = settings
        .get_mut("hooks")
        .and_then(|h| h.as_object_mut())
        .ok_or_else(|| anyhow::anyhow!("hooks is not an object"))?;

    let event_array = hooks
        .entry(event_name)
        .or_insert_with(|| serde_json::json!([]));

    let event_groups = event_array
        .as_array_mut()
        .ok_or_else(|| anyhow::anyhow!("event {} is not an array", event_name))?;

    let already_exists = event_groups.iter().any(|group| {
        group
            .get("hooks")
            .and_then(|h| h.as_array())
            .map(|hooks_array| {
                hooks_array.iter().any(|hook| {
                    hook.get("command")
                        .and_then(|c| c.as_str())
                        .map(|cmd| cmd.starts_with("cairn "))
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    });

    if already_exists {
        return Ok(false);
    }

    event_groups.push(serde_json::json!({
        "matcher": "",
        "hooks": [
            {
                "type": "command",
                "command": command
            }
        ]
    }));
    Ok(true)
}
