//! Spotcut Script Model
//!
//! Defines the core data contracts for Spotcut runs:
//! - **Script:** The scene/sub-scene tree handed over by a script provider
//! - **Scene / SubUnit:** Working records enriched while the pipeline runs
//! - **CanonicalProfile:** The fixed target encoding all clips share
//! - **PipelineResult:** The externally observed output of a run
//!
//! Scene and sub-unit ordering is always the declared list order; ids are
//! labels for naming and reporting, never sort keys.

pub mod profile;
pub mod result;
pub mod scene;
pub mod script;

pub use profile::*;
pub use result::*;
pub use scene::*;
pub use script::*;
