use crate::cli::{Args, LogFormat};
use crate::sink::FileSink;
use std::path::PathBuf;

/// Where the environment block of the report comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnvironmentSource {
    /// Detect the host through sysinfo.
    Detect,
    /// Read a pre-formatted description from a file.
    File(PathBuf),
    /// Leave the block empty.
    None,
}

/// Runtime configuration derived from the command line.
#[derive(Clone, Debug)]
pub struct Config {
    pub input:       Option<PathBuf>,
    pub output:      Option<PathBuf>,
    pub output_dir:  PathBuf,
    pub prefix:      String,
    pub extra_info:  Option<String>,
    pub environment: EnvironmentSource,
    pub deferred:    bool,
    pub stats_json:  bool,
    pub verbose:     bool,
    pub log_filter:  String,
    pub log_format:  LogFormat,
}

impl Config {
    /// The sink the report is appended to.
    pub fn sink(&self) -> FileSink {
        match &self.output {
            Some(path) => FileSink::new(path),
            None => FileSink::timestamped(&self.output_dir, &self.prefix),
        }
    }
}

impl From<&Args> for Config {
    fn from(a: &Args) -> Self {
        let environment = match (&a.env_file, a.no_env) {
            (_, true) => EnvironmentSource::None,
            (Some(path), false) => EnvironmentSource::File(path.clone()),
            (None, false) => EnvironmentSource::Detect,
        };
        Self {
            input:       a.input.clone(),
            output:      a.output.clone(),
            output_dir:  a.output_dir.clone(),
            prefix:      a.prefix.clone(),
            extra_info:  a.extra_info.clone(),
            environment,
            deferred:    a.deferred,
            stats_json:  a.stats_json,
            verbose:     a.verbose,
            log_filter:  a.log_filter.clone(),
            log_format:  a.log_format,
        }
    }
}
