use chrono::Local;
use clap::{Args, Parser, Subcommand};
use dux::config::{ExportConfig, Input, Output, SampleConfig};
use dux::listing::MalformedSize;
use dux::sample::Filters;

const ABOUT: &str = "Convert the output of the duplicacy list command to JSON.";

const LONG_ABOUT: &str = "\
Convert the output of the duplicacy list command to JSON.

The output of the duplicacy list command can either be piped directly into dux
or into a file which can then be loaded by dux. Note: The \"-log\" and \"-files\"
options must be used in the duplicacy command.

Examples:

duplicacy -log list -r 45 -files | dux export-json -

duplicacy -log list -r 45 -files > my_files.txt && dux export-json my_files.txt";

#[derive(Debug, Parser)]
#[command(name = "dux", version, about = ABOUT, long_about = LONG_ABOUT)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the listing as a nested JSON object, leaves holding file sizes
    ExportJson(ExportArgs),
    /// Pick random files from the listing to test a restore with
    SelectRandom(SelectArgs),
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Fail on a file line whose size is not a number instead of skipping it
    #[arg(long)]
    pub strict: bool,
}

impl ParseArgs {
    fn malformed_size(&self) -> MalformedSize {
        if self.strict {
            MalformedSize::Abort
        } else {
            MalformedSize::Skip
        }
    }
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Listing to read, `-` for standard input
    pub input: Input,

    /// Output file, `-` for standard output. Defaults to 'dux_<timestamp>.json'
    #[arg(short, long)]
    pub output: Option<Output>,

    /// Number of spaces used to format JSON output. Defaults to unformatted
    #[arg(long)]
    pub indent: Option<usize>,

    #[command(flatten)]
    pub parse: ParseArgs,
}

impl ExportArgs {
    /// The default output name is stamped with the time of this call.
    pub fn into_config(self) -> ExportConfig {
        ExportConfig {
            malformed_size: self.parse.malformed_size(),
            input: self.input,
            output: self
                .output
                .unwrap_or_else(|| Output::default_at(Local::now().naive_local())),
            indent: self.indent,
        }
    }
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Listing to read, `-` for standard input
    pub input: Input,

    /// Number of files to select
    #[arg(short, long, default_value_t = 10)]
    pub num_files: usize,

    /// Minimum file size in bytes, inclusive
    #[arg(long)]
    pub min_size: Option<u64>,

    /// Maximum file size in bytes, inclusive
    #[arg(long)]
    pub max_size: Option<u64>,

    /// Never select files with this extension, e.g. `.bak`. Repeatable
    #[arg(short = 'e', long = "exclude-extension", value_name = "EXTENSION")]
    pub exclude_extensions: Vec<String>,

    #[command(flatten)]
    pub parse: ParseArgs,
}

impl SelectArgs {
    pub fn into_config(self) -> SampleConfig {
        let filters = self.exclude_extensions.iter().fold(
            Filters {
                min_size: self.min_size,
                max_size: self.max_size,
                ..Filters::default()
            },
            |filters, extension| filters.exclude_extension(extension),
        );
        SampleConfig {
            malformed_size: self.parse.malformed_size(),
            input: self.input,
            count: self.num_files,
            filters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn export_defaults() {
        let cli = parse(&["dux", "export-json", "-"]);
        let Command::ExportJson(args) = cli.command else {
            panic!("expected export-json");
        };
        let config = args.into_config();
        assert_eq!(config.input, Input::Stdin);
        assert_eq!(config.indent, None);
        assert_eq!(config.malformed_size, MalformedSize::Skip);
        match config.output {
            Output::File(path) => {
                let name = path.to_string_lossy().into_owned();
                assert!(name.starts_with("dux_") && name.ends_with(".json"), "{name}");
            }
            Output::Stdout => panic!("expected a default output file"),
        }
    }

    #[test]
    fn export_options() {
        let cli = parse(&[
            "dux",
            "export-json",
            "list.txt",
            "--output",
            "-",
            "--indent",
            "2",
            "--strict",
        ]);
        let Command::ExportJson(args) = cli.command else {
            panic!("expected export-json");
        };
        let config = args.into_config();
        assert_eq!(config.input, Input::File(PathBuf::from("list.txt")));
        assert_eq!(config.output, Output::Stdout);
        assert_eq!(config.indent, Some(2));
        assert_eq!(config.malformed_size, MalformedSize::Abort);
    }

    #[test]
    fn select_options() {
        let cli = parse(&[
            "dux",
            "-v",
            "select-random",
            "list.txt",
            "--num-files",
            "3",
            "--min-size",
            "10",
            "--max-size",
            "1000",
            "--exclude-extension",
            ".bak",
            "-e",
            "tmp",
        ]);
        assert_eq!(cli.verbose, 1);
        let Command::SelectRandom(args) = cli.command else {
            panic!("expected select-random");
        };
        let config = args.into_config();
        assert_eq!(config.count, 3);
        assert_eq!(
            config.filters,
            Filters {
                min_size: Some(10),
                max_size: Some(1000),
                excluded_extensions: vec![".bak".to_string(), ".tmp".to_string()],
            }
        );
    }

    #[test]
    fn select_defaults_to_ten_files() {
        let cli = parse(&["dux", "select-random", "list.txt"]);
        let Command::SelectRandom(args) = cli.command else {
            panic!("expected select-random");
        };
        assert_eq!(args.into_config().count, 10);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["dux"]).is_err());
        assert!(Cli::try_parse_from(["dux", "export-json"]).is_err());
        assert!(Cli::try_parse_from(["dux", "export-json", "x", "--indent", "two"]).is_err());
        assert!(Cli::try_parse_from(["dux", "select-random", "x", "--min-size", "-1"]).is_err());
        assert!(Cli::try_parse_from(["dux", "-q", "-v", "export-json", "x"]).is_err());
    }
}
