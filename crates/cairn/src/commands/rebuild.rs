use crate::pipeline;
use cairn_core::BackendKind;
use cairn_index::Backend;
use cairn_store::Paths;

pub fn run(paths: &Paths, backend: Option<BackendKind>) -> anyhow::Result<()> {
    let mut config = pipeline::load_config(paths)?;
    if let Some(kind) = backend {
        if kind != config.backend {
            tracing::info!(from = %config.backend, to = %kind, "switching index backend");
        }
        config.backend = kind;
        pipeline::save_config(paths, &config)?;
    }

    let logged = pipeline::event_log(paths).read_all()?.len();
    let index = pipeline::rebuild_index(paths, config.backend)?;

    println!(
        "Rebuilt {} index: {} of {} logged events indexed",
        config.backend,
        index.len(),
        logged
    );
    Ok(())
}
