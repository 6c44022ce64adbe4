//! Upload one audio file, get back a loudness report: total duration,
//! average signal RMS, and one RMS value per fixed-duration energy segment.
//!
//! The core is a single streaming decode pass (symphonia) fanned out to two
//! aggregators; [`analyze`] is the entry point. The HTTP layer in
//! [`server`] is thin glue around it.

pub mod audio;
pub mod error;
pub mod report;
pub mod server;

pub use audio::analysis::{analyze, analyze_with_segment_seconds, DEFAULT_SEGMENT_SECONDS};
pub use error::AnalysisError;
pub use report::Report;
