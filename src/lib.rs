// Module declarations for the library crate.

pub mod capture;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod report;
pub mod session;
pub mod sink;
pub mod telemetry;
pub mod util;

// Re-export the types a host needs to drive a session.
pub use error::{DumpError, SessionError};
pub use report::{Report, FPS_THRESHOLDS};
pub use session::clock::FrameClock;
pub use session::store::{CustomEvent, FrameSample, SampleStore};
pub use session::{DumpHandle, DumpResult, SessionController, SessionState};
pub use sink::{FileSink, ReportSink, WriterSink};
