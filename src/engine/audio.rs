use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

struct Output {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

/// Plays registered sound effects. Without an output device it stays muted
/// but still validates what gets registered.
pub struct AudioEngine {
    output: Option<Output>,
    sounds: HashMap<String, Arc<[u8]>>,
}

impl AudioEngine {
    pub fn new() -> Self {
        let output = match OutputStream::try_default() {
            Ok((stream, handle)) => Some(Output {
                _stream: stream,
                handle,
            }),
            Err(err) => {
                tracing::warn!(target: "audio", %err, "no audio output, running muted");
                None
            }
        };
        Self {
            output,
            sounds: HashMap::new(),
        }
    }

    /// An engine that never opens a device.
    pub fn muted() -> Self {
        Self {
            output: None,
            sounds: HashMap::new(),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.output.is_none()
    }

    /// Decodes `bytes` once up front so a broken file fails at startup.
    pub fn register(&mut self, key: impl Into<String>, bytes: Arc<[u8]>) -> Result<()> {
        let key = key.into();
        Decoder::new(Cursor::new(bytes.clone()))
            .with_context(|| format!("failed to decode sound '{key}'"))?;
        tracing::debug!(target: "audio", %key, "sound registered");
        self.sounds.insert(key, bytes);
        Ok(())
    }

    pub fn play(&self, key: &str) {
        let Some(bytes) = self.sounds.get(key) else {
            tracing::warn!(target: "audio", key, "unknown sound");
            return;
        };
        let Some(output) = self.output.as_ref() else {
            tracing::trace!(target: "audio", key, "muted, skipping sound");
            return;
        };
        let source = match Decoder::new(Cursor::new(bytes.clone())) {
            Ok(source) => source,
            Err(err) => {
                tracing::warn!(target: "audio", key, %err, "failed to decode sound");
                return;
            }
        };
        match Sink::try_new(&output.handle) {
            Ok(sink) => {
                sink.append(source);
                sink.detach();
            }
            Err(err) => tracing::warn!(target: "audio", key, %err, "failed to play sound"),
        }
    }
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}
