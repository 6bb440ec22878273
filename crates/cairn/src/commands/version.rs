pub fn run() -> anyhow::Result<()> {
    println!("cairn {}", env!("CARGO_PKG_VERSION"));
    println!("Reasoning capture and recall for AI coding assistants");
    Ok(())
}
