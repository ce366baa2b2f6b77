//! CLI configuration and argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const COMMIT: &str = env!("BUILD_COMMIT");
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Rolling update plan builder.
///
/// Previews the phases a rolling update of the cluster runtime goes through:
/// configuration update, masters one at a time, then regular nodes.
#[derive(Parser, Debug, Clone)]
#[command(name = "rollplan")]
#[command(about = "Rolling update plan builder")]
#[command(version = const_format::formatcp!(
    "{} (commit: {}, build date: {})",
    VERSION, COMMIT, BUILD_DATE
))]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn", env = "ROLLPLAN_LOG_LEVEL")]
    pub log_level: String,

    /// Log output format
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = LogFormat::Text,
        env = "ROLLPLAN_LOG_FORMAT"
    )]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build the rolling update plan for a cluster description
    Build {
        /// Cluster description file (YAML)
        #[arg(short, long)]
        input: PathBuf,

        /// Rotate secrets packages along with the runtime configuration
        #[arg(long, default_value = "false")]
        with_secrets: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
    },
    /// Print the JSON schema of the plan format
    Schema,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Tree,
}

/// Log line format on stderr.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_defaults() {
        let args = Args::try_parse_from(["rollplan", "build", "-i", "cluster.yaml"]).unwrap();
        assert_eq!(args.log_level, "warn");
        assert_eq!(args.log_format, LogFormat::Text);
        match args.command {
            Command::Build {
                input,
                with_secrets,
                format,
            } => {
                assert_eq!(input, PathBuf::from("cluster.yaml"));
                assert!(!with_secrets);
                assert_eq!(format, OutputFormat::Tree);
            }
            Command::Schema => panic!("expected build"),
        }
    }

    #[test]
    fn test_parse_build_options() {
        let args = Args::try_parse_from([
            "rollplan",
            "build",
            "--input",
            "cluster.yaml",
            "--with-secrets",
            "--format",
            "json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.log_level, "debug");
        assert!(matches!(
            args.command,
            Command::Build {
                with_secrets: true,
                format: OutputFormat::Json,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_json_log_format() {
        let args =
            Args::try_parse_from(["rollplan", "schema", "--log-format", "json"]).unwrap();
        assert_eq!(args.log_format, LogFormat::Json);
        assert!(Args::try_parse_from(["rollplan", "schema", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn test_build_requires_input() {
        assert!(Args::try_parse_from(["rollplan", "build"]).is_err());
    }

    #[test]
    fn test_parse_schema() {
        let args = Args::try_parse_from(["rollplan", "schema"]).unwrap();
        assert!(matches!(args.command, Command::Schema));
    }
}
