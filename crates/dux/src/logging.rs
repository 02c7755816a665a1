use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. Standard output stays reserved for the
/// command's own output.
pub fn init(verbose: u8, quiet: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(directives(verbose, quiet))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;
    Ok(())
}

fn directives(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn,dux=info",
        (false, 1) => "warn,dux=debug",
        (false, _) => "trace",
    }
}
