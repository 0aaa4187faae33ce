use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "translate-monitor",
    version,
    about = "Submit documents for translation and watch their progress"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Base URL of the translation service
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,
    /// Config file (defaults to ./translate-monitor.ron when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Status poll interval in milliseconds
    #[arg(long = "interval-ms", global = true, value_name = "MS")]
    pub interval_ms: Option<u64>,
    /// Where log output goes
    #[arg(long = "log-to", global = true, value_enum, default_value_t = LogTarget::File)]
    pub log_to: LogTarget,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Upload documents and watch them until every job finishes
    Submit {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
        /// Source language code
        #[arg(long, value_name = "LANG")]
        source: Option<String>,
        /// Target language code
        #[arg(long, value_name = "LANG")]
        target: Option<String>,
    },
    /// Show the job history
    History,
    /// Save the translated result of a completed job
    Download {
        job_id: u64,
        /// Directory to save into (overrides the configured download_dir)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Check that the service is up
    Health,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn submit_parses_files_and_languages() {
        let cli = Cli::try_parse_from([
            "translate-monitor",
            "submit",
            "doc.pdf",
            "notes.docx",
            "--source",
            "en",
            "--target",
            "fr",
            "--server",
            "http://localhost:8000",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.global.server.as_deref(), Some("http://localhost:8000"));
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.log_to, LogTarget::File);
        match cli.command {
            Command::Submit {
                files,
                source,
                target,
            } => {
                assert_eq!(files, vec![PathBuf::from("doc.pdf"), PathBuf::from("notes.docx")]);
                assert_eq!(source.as_deref(), Some("en"));
                assert_eq!(target.as_deref(), Some("fr"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn log_target_and_verbosity_are_global() {
        let cli = Cli::try_parse_from(["translate-monitor", "health", "--log-to", "both", "-v"])
            .unwrap();
        assert_eq!(cli.global.log_to, LogTarget::Both);
        assert_eq!(cli.global.verbose, 1);
        assert!(Cli::try_parse_from(["translate-monitor", "health", "--log-file", "x.log"]).is_err());
    }

    #[test]
    fn submit_requires_a_file() {
        assert!(Cli::try_parse_from(["translate-monitor", "submit"]).is_err());
    }

    #[test]
    fn download_takes_numeric_job_id() {
        let cli = Cli::try_parse_from(["translate-monitor", "download", "42", "--dir", "out"])
            .unwrap();
        match cli.command {
            Command::Download { job_id, dir } => {
                assert_eq!(job_id, 42);
                assert_eq!(dir, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["translate-monitor", "download", "abc"]).is_err());
    }
}
