use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format of the diagnostic log on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Replays a frame-time capture through one logging session and writes the
/// statistical report.
/// Reads `<elapsed>, <duration>` frame lines and `event, <timestamp>, <label>`
/// lines from stdin (or --input) and appends the report to a file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Capture file to read instead of stdin.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Report file to append to. Defaults to a timestamped file in --output-dir.
    #[arg(short, long, value_name = "PATH", conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Directory for timestamped report files.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// File name prefix for timestamped report files.
    #[arg(long, default_value = "frametimes")]
    pub prefix: String,

    /// Text written verbatim at the top of the report (build id, scene name, ...).
    #[arg(long, value_name = "TEXT")]
    pub extra_info: Option<String>,

    /// Pre-formatted environment description to embed instead of the detected host info.
    #[arg(long, value_name = "PATH", conflicts_with = "no_env")]
    pub env_file: Option<PathBuf>,

    /// Leave the environment block empty.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_env: bool,

    /// Compute and write the report on a background worker thread.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub deferred: bool,

    /// Also print the summary and threshold buckets as JSON to stdout.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub stats_json: bool,

    /// Enable verbose logging (targets and debug-level session events).
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub verbose: bool,

    /// Log filter directives (tracing EnvFilter syntax).
    #[arg(long, env = "RUST_LOG", default_value = "frametime_log=info")]
    pub log_filter: String,

    /// Diagnostic log format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Parses command line arguments using clap.
pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["frametime-log"]).unwrap();
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert_eq!(args.prefix, "frametimes");
        assert!(!args.deferred);
        assert_eq!(args.log_format, LogFormat::Text);
    }

    #[test]
    fn output_conflicts_with_output_dir() {
        let res = Args::try_parse_from(["frametime-log", "-o", "a.txt", "--output-dir", "logs"]);
        assert!(res.is_err());
    }
}
