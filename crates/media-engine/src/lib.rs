//! Spotcut Media Engine
//!
//! Everything that touches media bytes or external tools:
//! - **exec:** The injected command-execution capability (ffmpeg/ffprobe run
//!   through it, never directly)
//! - **probe:** Duration and stream-composition inspection
//! - **fetch:** Streaming retrieval of remote footage
//! - **trim:** Trim a raw clip to its voice-over and mux the two
//! - **normalize:** Re-encode any clip to the canonical profile
//! - **concat:** Filter-graph concatenation with duration verification
//!
//! All operations are async; subprocess work runs on the blocking pool so a
//! slow tool never stalls unrelated pipeline tasks.

pub mod concat;
pub mod exec;
pub mod fetch;
pub mod normalize;
pub mod probe;
pub mod trim;

pub use concat::{ConcatReport, Concatenator};
pub use exec::{command_exists, SystemRunner, ToolOutput, ToolRunner, FFMPEG, FFPROBE};
pub use fetch::Fetcher;
pub use normalize::Normalizer;
pub use probe::{MediaInfo, Prober};
pub use trim::TrimMuxer;
