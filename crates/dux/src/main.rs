//!
//! # Dux
//! Converts the output of `duplicacy -log list -files` into a JSON tree of the
//! snapshot, or picks random files from it to test a restore with.
//!
//! # Example
//! This command exports revision 45 to `revision_45.json`, indented by two spaces.
//! ```duplicacy -log list -r 45 -files | dux export-json - -o revision_45.json --indent 2```
//!
//! This command picks 5 files between 1 KB and 100 MB that are not backups.
//! ```dux select-random my_files.txt -n 5 --min-size 1024 --max-size 104857600 -e .bak```

mod cli;
mod logging;

use std::io;

use anyhow::Context;
use clap::Parser;

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet).context("unable to set up logging")?;
    match cli.command {
        Command::ExportJson(args) => {
            let config = args.into_config();
            let mut stdout = io::stdout().lock();
            dux::commands::export_json(&config, io::stdin().lock(), &mut stdout)
                .with_context(|| format!("unable to export `{}`", config.input))?;
        }
        Command::SelectRandom(args) => {
            let config = args.into_config();
            let mut stdout = io::stdout().lock();
            let mut rng = rand::rng();
            dux::commands::select_random_files(&config, io::stdin().lock(), &mut rng, &mut stdout)
                .with_context(|| format!("unable to select files from `{}`", config.input))?;
        }
    }
    Ok(())
}
