use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::debug;

use crate::player::{OutputError, SoundOutput};

use super::sink::{create_sink_at, open_decoder};

/// [`SoundOutput`] on the default audio device.
pub struct RodioOutput {
    stream: OutputStream,
    loaded: Option<PathBuf>,
    sink: Option<Sink>,
    volume: f32,
}

impl RodioOutput {
    pub fn open() -> Result<Self, OutputError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| OutputError::Device(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which garbles the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            loaded: None,
            sink: None,
            volume: 1.0,
        })
    }
}

impl SoundOutput for RodioOutput {
    fn load(&mut self, path: &Path) -> Result<(), OutputError> {
        self.stop();
        self.loaded = None;
        // Probe now so unplayable files fail here rather than mid-play.
        open_decoder(path)?;
        debug!(path = %path.display(), "loaded");
        self.loaded = Some(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self, start: Duration) -> Result<(), OutputError> {
        let path = self.loaded.as_deref().ok_or(OutputError::NothingLoaded)?;
        let sink = create_sink_at(&self.stream, path, start, self.volume)?;
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        sink.play();
        self.sink = Some(sink);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn unpause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }

    fn elapsed(&self) -> Option<Duration> {
        self.sink.as_ref().map(Sink::get_pos)
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }
}
