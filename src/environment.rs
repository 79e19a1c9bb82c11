//! Environment description embedded verbatim in the report.

use std::fs;
use std::io;
use std::path::Path;
use sysinfo::System;

/// Snapshot of the host the session ran on.
///
/// Capture it on the ingesting thread before a deferred dump; the report only
/// ever sees the rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    pub os: String,
    pub kernel: String,
    pub arch: String,
    pub host_name: String,
    pub cpu_brand: String,
    pub logical_cpus: usize,
    pub total_memory_bytes: u64,
}

impl HostEnvironment {
    /// Queries the host through `sysinfo`. Fields the platform does not
    /// expose are reported as `unknown`.
    pub fn detect() -> Self {
        let mut system = System::new_all();
        system.refresh_all();

        let cpus = system.cpus();
        let cpu_brand = cpus
            .first()
            .map(|c| c.brand().trim().to_string())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(unknown);

        HostEnvironment {
            os: System::long_os_version().unwrap_or_else(unknown),
            kernel: System::kernel_version().unwrap_or_else(unknown),
            arch: std::env::consts::ARCH.to_string(),
            host_name: System::host_name().unwrap_or_else(unknown),
            cpu_brand,
            logical_cpus: cpus.len(),
            total_memory_bytes: system.total_memory(),
        }
    }

    /// `Key: value` lines, one per field.
    pub fn render(&self) -> String {
        format!(
            "OS: {}\nKernel: {}\nArchitecture: {}\nHost: {}\nCPU: {} ({} logical cores)\nMemory: {} MiB",
            self.os,
            self.kernel,
            self.arch,
            self.host_name,
            self.cpu_brand,
            self.logical_cpus,
            self.total_memory_bytes / (1024 * 1024),
        )
    }
}

fn unknown() -> String {
    "unknown".to_string()
}

/// Reads a pre-formatted environment description. Trailing newlines are
/// trimmed so the report's own spacing stays fixed.
pub fn from_file(path: impl AsRef<Path>) -> io::Result<String> {
    let text = fs::read_to_string(path)?;
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}
