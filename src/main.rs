use file_explorer::Interpreter;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so they never interleave with REPL output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Interpreter::default().repl()?;
    Ok(())
}
