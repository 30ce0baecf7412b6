//! Shared services and limits for one pipeline run.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;

use spotcut_common::AssemblyDefaults;
use spotcut_media_engine::{Concatenator, Fetcher, Normalizer, Prober, ToolRunner, TrimMuxer};
use spotcut_script_model::CanonicalProfile;

use crate::boundary::{ClipLocator, SpeechSynthesizer};

/// Everything scene assembly needs, wired once and shared across tasks.
pub struct AssemblerContext {
    pub prober: Prober,
    pub fetcher: Fetcher,
    pub trim_muxer: TrimMuxer,
    pub concatenator: Concatenator,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub locator: Arc<dyn ClipLocator>,

    /// Caps concurrent trims and re-encodes. Defaults to the core count.
    pub transcode_slots: Arc<Semaphore>,

    /// Caps concurrent footage downloads.
    pub fetch_slots: Arc<Semaphore>,

    /// Where sub-unit clips, scene clips, and the final video land.
    pub clips_dir: PathBuf,
}

impl AssemblerContext {
    pub fn new(
        runner: Arc<dyn ToolRunner>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        locator: Arc<dyn ClipLocator>,
        profile: CanonicalProfile,
        defaults: &AssemblyDefaults,
        clips_dir: PathBuf,
    ) -> Self {
        let prober = Prober::new(runner.clone());
        let normalizer = Normalizer::new(runner.clone(), profile.clone());
        let trim_muxer = TrimMuxer::new(runner.clone(), prober.clone(), profile);
        let concatenator = Concatenator::new(
            runner,
            prober.clone(),
            normalizer,
            defaults.duration_tolerance_secs,
        );

        let transcode_jobs = defaults.transcode_jobs.unwrap_or_else(num_cpus::get).max(1);
        let fetch_jobs = defaults.fetch_jobs.max(1);
        tracing::debug!(transcode_jobs, fetch_jobs, "Assembly limits set");

        Self {
            prober,
            fetcher: Fetcher::new(),
            trim_muxer,
            concatenator,
            synthesizer,
            locator,
            transcode_slots: Arc::new(Semaphore::new(transcode_jobs)),
            fetch_slots: Arc::new(Semaphore::new(fetch_jobs)),
            clips_dir,
        }
    }
}
