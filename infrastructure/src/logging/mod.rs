//! Logging infrastructure: structured event transcripts.
//!
//! Provides [`JsonlTranscriptReporter`], a JSONL file writer that implements
//! the [`BarrierReporter`](barrier_application::BarrierReporter) port.

mod jsonl_transcript;

pub use jsonl_transcript::JsonlTranscriptReporter;
