//! The injected command-execution capability.
//!
//! Every external tool invocation goes through [`ToolRunner`], so tests can
//! substitute a fake without spawning real subprocesses. The trait is
//! synchronous; async callers drive it through [`run_tool`], which moves the
//! call onto the blocking pool.

use std::process::{Command, Stdio};
use std::sync::Arc;

/// Default transcoding tool binary.
pub const FFMPEG: &str = "ffmpeg";

/// Default inspection tool binary.
pub const FFPROBE: &str = "ffprobe";

/// Captured result of one tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit code (-1 when terminated by signal).
    pub status: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the tool exited zero.
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// One-method command execution boundary.
pub trait ToolRunner: Send + Sync {
    /// Run `program` with `args`, wait for it, and capture its output.
    /// Errors only when the process cannot be started or waited on;
    /// a non-zero exit is a normal [`ToolOutput`].
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<ToolOutput>;
}

/// Runs tools as real subprocesses.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ToolRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<ToolOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        Ok(ToolOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Drive a runner from async code without blocking the runtime.
pub async fn run_tool(
    runner: Arc<dyn ToolRunner>,
    program: &str,
    args: Vec<String>,
) -> std::io::Result<ToolOutput> {
    let program = program.to_string();
    tracing::debug!(program = %program, args = ?args, "Running tool");
    tokio::task::spawn_blocking(move || runner.run(&program, &args))
        .await
        .map_err(std::io::Error::other)?
}

/// Check whether a binary is resolvable on PATH.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    type Responder = Box<dyn Fn(&str, &[String]) -> ToolOutput + Send + Sync>;

    /// Records every invocation and answers from a closure.
    pub struct FakeRunner {
        calls: Mutex<Vec<(String, Vec<String>)>>,
        responder: Responder,
    }

    impl FakeRunner {
        pub fn new(
            responder: impl Fn(&str, &[String]) -> ToolOutput + Send + Sync + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                responder: Box::new(responder),
            })
        }

        /// A runner that succeeds at everything and probes every file as
        /// `duration` seconds long.
        pub fn succeeding(duration: f64) -> Arc<Self> {
            Self::new(move |program, _args| {
                if program == FFPROBE {
                    probe_output(duration, true, true)
                } else {
                    ok_output()
                }
            })
        }

        pub fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ToolRunner for FakeRunner {
        fn run(&self, program: &str, args: &[String]) -> std::io::Result<ToolOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((program.to_string(), args.to_vec()));
            Ok((self.responder)(program, args))
        }
    }

    pub fn ok_output() -> ToolOutput {
        ToolOutput {
            status: 0,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn failed_output(stderr: &str) -> ToolOutput {
        ToolOutput {
            status: 1,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    /// A canned ffprobe JSON document.
    pub fn probe_output(duration: f64, has_video: bool, has_audio: bool) -> ToolOutput {
        let mut streams = Vec::new();
        if has_video {
            streams.push(serde_json::json!({"codec_type": "video"}));
        }
        if has_audio {
            streams.push(serde_json::json!({"codec_type": "audio"}));
        }
        let doc = serde_json::json!({
            "format": {"duration": format!("{duration:.6}")},
            "streams": streams,
        });
        ToolOutput {
            status: 0,
            stdout: doc.to_string(),
            stderr: String::new(),
        }
    }
}
