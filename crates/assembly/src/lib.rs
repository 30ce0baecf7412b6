//! Assembly orchestration on top of the media engine.
//!
//! Turns a validated script into a final video:
//! - resolves a source locator for every sub-unit
//! - assembles scenes concurrently, sub-units overlapped within each
//! - joins finished scene clips into the deliverable
//! - recovers a final video from leftover sub-unit clips (stitch pass)
//!
//! Speech synthesis and footage lookup are injected behind the traits in
//! [`boundary`]; nothing in this crate talks to a provider directly.

pub mod boundary;
pub mod context;
pub mod finalize;
pub mod naming;
pub mod pipeline;
pub mod scene;
pub mod stitch;

pub use boundary::{ClipLocator, SpeechSynthesizer};
pub use context::AssemblerContext;
pub use finalize::FinalAssembler;
pub use naming::FINAL_FILENAME;
pub use pipeline::Pipeline;
pub use scene::{SceneAssembler, SceneOutcome, ScenePolicy};
pub use stitch::Stitcher;
