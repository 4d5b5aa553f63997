//! Speech output.
//!
//! The monitor and the input scripts only ever call [`Speaker::speak`]; which
//! voice actually reads the text is decided by `[speech] backend` in
//! config.toml.
use std::future::Future;
use std::process::Stdio;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::errors::{HudError, HudResult};

/// Fire-and-forget text output. Implementations must not block the caller on
/// the utterance finishing.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeechBackend {
    /// Platform speech command (SAPI via PowerShell, `say`, `spd-say`).
    #[default]
    System,
    /// Log the text only.
    Console,
}

/// Must be called inside a tokio runtime: the system backend starts its
/// utterance worker there.
pub fn build_speaker(backend: SpeechBackend) -> Arc<dyn Speaker> {
    match backend {
        SpeechBackend::System => Arc::new(SystemSpeaker::spawn()),
        SpeechBackend::Console => Arc::new(ConsoleSpeaker),
    }
}

/// Writes every utterance to the log at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSpeaker;

impl Speaker for ConsoleSpeaker {
    fn speak(&self, text: &str) {
        tracing::info!(text = %text, "speak");
    }
}

/// Delegates to the operating system's text-to-speech command.
///
/// Utterances go through a queue drained by a single task, so they are read
/// one at a time in the order they were spoken.
#[derive(Debug, Clone)]
pub struct SystemSpeaker {
    queue: mpsc::UnboundedSender<String>,
}

impl SystemSpeaker {
    pub fn spawn() -> Self {
        Self {
            queue: spawn_queue(say),
        }
    }
}

impl Speaker for SystemSpeaker {
    fn speak(&self, text: &str) {
        tracing::debug!(text = %text, "speak");
        if self.queue.send(text.to_string()).is_err() {
            tracing::warn!(text = %text, "speech worker gone, utterance dropped");
        }
    }
}

/// Starts the worker that plays queued utterances back to back. It exits once
/// every sender is dropped.
fn spawn_queue<F, Fut>(mut play: F) -> mpsc::UnboundedSender<String>
where
    F: FnMut(String) -> Fut + Send + 'static,
    Fut: Future<Output = HudResult<()>> + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if let Err(e) = play(text.clone()).await {
                tracing::warn!(error = %e, text = %text, "speech output failed");
            }
        }
        tracing::debug!("speech queue closed");
    });
    tx
}

/// Runs the platform speech command and waits for it to finish reading.
async fn say(text: String) -> HudResult<()> {
    let status = command_for(&text)?
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|e| HudError::Speech(format!("run speech command: {e}")))?;
    if !status.success() {
        return Err(HudError::Speech(format!("speech command exited with {status}")));
    }
    Ok(())
}

fn command_for(text: &str) -> HudResult<Command> {
    if cfg!(target_os = "windows") {
        let script = format!(
            "Add-Type -AssemblyName System.Speech; \
             (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak('{}')",
            escape_powershell(text)
        );
        let mut cmd = Command::new("powershell");
        cmd.args(["-NoProfile", "-NonInteractive", "-Command", &script]);
        Ok(cmd)
    } else if cfg!(target_os = "macos") {
        let mut cmd = Command::new("say");
        cmd.arg(text);
        Ok(cmd)
    } else if cfg!(target_os = "linux") {
        // --wait keeps spd-say alive until speech-dispatcher has read the text.
        let mut cmd = Command::new("spd-say");
        cmd.arg("--wait").arg(text);
        Ok(cmd)
    } else {
        Err(HudError::Speech("no speech command for this platform".into()))
    }
}

fn escape_powershell(text: &str) -> String {
    text.replace('\'', "''")
}
