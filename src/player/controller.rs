use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::config::PlaybackSettings;
use crate::library::Track;

use super::output::{OutputError, SoundOutput};
use super::types::{PlaybackError, PlaybackState, PlayerEvent};

/// Playback policies that are product choices rather than invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Queueing a track while idle starts playback.
    pub auto_start_on_enqueue: bool,
    /// Past this position, "previous" restarts the current track instead.
    pub restart_threshold: Duration,
    /// Oldest history entries beyond this many are dropped.
    pub history_limit: Option<usize>,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            auto_start_on_enqueue: true,
            restart_threshold: Duration::from_secs(10),
            history_limit: None,
        }
    }
}

impl From<&PlaybackSettings> for ControllerOptions {
    fn from(settings: &PlaybackSettings) -> Self {
        Self {
            auto_start_on_enqueue: settings.auto_start_on_enqueue,
            restart_threshold: Duration::from_secs(settings.restart_threshold_secs),
            history_limit: settings.history_limit,
        }
    }
}

type Observer = Box<dyn FnMut(&PlayerEvent)>;

/// Queue, history and transport state over a [`SoundOutput`].
pub struct PlaybackController<O: SoundOutput> {
    output: O,
    options: ControllerOptions,

    queue: VecDeque<Track>,
    history: Vec<Track>,
    current: Option<Track>,
    state: PlaybackState,

    // Position of the last `play` call into the file.
    position_offset: Duration,
    // Position captured when pausing; reported until resumed.
    paused_at: Option<Duration>,
    volume: f32,
    // Set when a track starts during the running transition.
    started: bool,

    observers: Vec<Observer>,
}

impl<O: SoundOutput> PlaybackController<O> {
    pub fn new(output: O, options: ControllerOptions) -> Self {
        Self {
            output,
            options,
            queue: VecDeque::new(),
            history: Vec::new(),
            current: None,
            state: PlaybackState::Idle,
            position_offset: Duration::ZERO,
            paused_at: None,
            volume: 1.0,
            started: false,
            observers: Vec::new(),
        }
    }

    /// Register a callback for every [`PlayerEvent`].
    pub fn subscribe(&mut self, observer: impl FnMut(&PlayerEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn queue(&self) -> &VecDeque<Track> {
        &self.queue
    }

    /// Previously played tracks, oldest first.
    pub fn history(&self) -> &[Track] {
        &self.history
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Playback position within the current track.
    ///
    /// Zero without a current track. Falls back to the last seek offset when
    /// the output cannot report elapsed time.
    pub fn position(&self) -> Duration {
        if self.current.is_none() {
            return Duration::ZERO;
        }
        if let Some(p) = self.paused_at {
            return p;
        }
        match self.output.elapsed() {
            Some(elapsed) => self.position_offset + elapsed,
            None => self.position_offset,
        }
    }

    /// Start the next queued track if nothing is current.
    pub fn advance(&mut self) {
        self.transition(Self::advance_inner);
    }

    /// Append `track` to the queue, starting it right away when idle.
    pub fn enqueue(&mut self, track: Track) {
        self.enqueue_all(std::iter::once(track));
    }

    /// Append several tracks at once with a single queue notification.
    pub fn enqueue_all(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.transition(|c| {
            let before = c.queue.len();
            c.queue.extend(tracks);
            debug!(added = c.queue.len() - before, "queued tracks");
            if c.state == PlaybackState::Idle && c.options.auto_start_on_enqueue {
                c.advance_inner();
            }
        });
    }

    /// Drop the queue and whatever is playing, then play `track`.
    pub fn play_now(&mut self, track: Track) {
        self.play_all(vec![track]);
    }

    /// Replace the queue with `tracks` and start the first one.
    pub fn play_all(&mut self, tracks: Vec<Track>) {
        if tracks.is_empty() {
            return;
        }
        self.transition(|c| {
            c.halt();
            c.queue.clear();
            c.queue.extend(tracks);
            c.advance_inner();
        });
    }

    /// [`play_all`](Self::play_all) in random order.
    pub fn shuffle_all(&mut self, tracks: Vec<Track>) {
        self.shuffle_all_with(tracks, &mut rand::rng());
    }

    pub fn shuffle_all_with<R: Rng + ?Sized>(&mut self, mut tracks: Vec<Track>, rng: &mut R) {
        tracks.shuffle(rng);
        self.play_all(tracks);
    }

    /// Pause when playing, resume when paused, nothing when idle.
    pub fn toggle(&mut self) {
        self.transition(|c| match c.state {
            PlaybackState::Idle => {}
            PlaybackState::Playing => {
                let at = c.position();
                c.output.pause();
                c.paused_at = Some(at);
                c.state = PlaybackState::Paused;
            }
            PlaybackState::Paused => {
                c.output.unpause();
                c.paused_at = None;
                c.state = PlaybackState::Playing;
            }
        });
    }

    /// Poll the output; when the current track has run out, file it in the
    /// history and start the next one.
    pub fn check_status(&mut self) {
        if self.state != PlaybackState::Playing || self.output.is_busy() {
            return;
        }
        self.transition(|c| {
            if let Some(track) = c.current.take() {
                info!(title = %track.title, "finished");
                c.push_history(track);
            }
            c.state = PlaybackState::Idle;
            c.paused_at = None;
            c.advance_inner();
        });
    }

    /// Stop the current track, file it in the history and play the next one.
    pub fn skip_next(&mut self) {
        self.transition(|c| {
            if let Some(track) = c.halt() {
                c.push_history(track);
            }
            c.advance_inner();
        });
    }

    /// Restart the current track if it has played past the threshold,
    /// otherwise go back to the most recent history entry.
    ///
    /// The interrupted track is kept at the head of the queue.
    pub fn play_previous(&mut self) {
        if self.state == PlaybackState::Playing && self.position() > self.options.restart_threshold
        {
            debug!("restarting current track");
            self.transition(|c| c.seek_inner(Duration::ZERO));
            return;
        }
        if self.history.is_empty() {
            debug!("no previous track");
            return;
        }
        self.transition(|c| {
            if let Some(track) = c.halt() {
                c.queue.push_front(track);
            }
            if let Some(prev) = c.history.pop() {
                c.queue.push_front(prev);
            }
            c.advance_inner();
        });
    }

    /// Play the current track from `to`. Resumes if paused.
    pub fn seek(&mut self, to: Duration) -> Result<(), PlaybackError> {
        if self.current.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        self.transition(|c| c.seek_inner(to));
        Ok(())
    }

    /// Halt playback and forget the queue and history.
    pub fn stop(&mut self) {
        self.transition(|c| {
            c.halt();
            c.queue.clear();
            c.history.clear();
        });
        info!("stopped; queue and history cleared");
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.output.set_volume(self.volume);
    }

    /// Run `f` and notify observers of whatever it changed.
    fn transition<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let current = self.current.clone();
        let queue = self.queue.clone();
        let state = self.state;
        self.started = false;

        let out = f(self);

        // A repeat of an identical track is still a new start.
        if self.current != current || std::mem::take(&mut self.started) {
            self.emit(PlayerEvent::CurrentTrackChanged(self.current.clone()));
        }
        if self.queue != queue {
            self.emit(PlayerEvent::QueueChanged(self.queue.iter().cloned().collect()));
        }
        if self.state != state {
            self.emit(PlayerEvent::StateChanged(self.state));
        }
        out
    }

    fn emit(&mut self, event: PlayerEvent) {
        for observer in self.observers.iter_mut() {
            observer(&event);
        }
    }

    /// Silence the output and go idle. Returns the track that was current.
    fn halt(&mut self) -> Option<Track> {
        self.output.stop();
        self.state = PlaybackState::Idle;
        self.position_offset = Duration::ZERO;
        self.paused_at = None;
        self.current.take()
    }

    fn advance_inner(&mut self) {
        if self.current.is_some() {
            return;
        }
        // Every failure pops its track, so this gives up once the queue is exhausted.
        while let Some(mut track) = self.queue.pop_front() {
            match self.start(&track) {
                Ok(()) => {
                    track.record_play();
                    info!(title = %track.title, plays = track.play_count, "now playing");
                    self.current = Some(track);
                    self.state = PlaybackState::Playing;
                    self.position_offset = Duration::ZERO;
                    self.paused_at = None;
                    self.started = true;
                    return;
                }
                Err(e) => self.report_failure(track, e),
            }
        }
        self.state = PlaybackState::Idle;
    }

    fn start(&mut self, track: &Track) -> Result<(), OutputError> {
        self.output.load(&track.path)?;
        self.output.play(Duration::ZERO)
    }

    fn seek_inner(&mut self, to: Duration) {
        match self.output.play(to) {
            Ok(()) => {
                debug!(position = ?to, "seeked");
                self.position_offset = to;
                self.paused_at = None;
                self.state = PlaybackState::Playing;
            }
            Err(e) => {
                if let Some(track) = self.halt() {
                    self.report_failure(track, e);
                }
                self.advance_inner();
            }
        }
    }

    fn report_failure(&mut self, track: Track, e: OutputError) {
        warn!(title = %track.title, path = %track.path.display(), "cannot play track: {e}");
        self.emit(PlayerEvent::LoadFailed {
            title: track.title,
            reason: e.to_string(),
        });
    }

    fn push_history(&mut self, track: Track) {
        self.history.push(track);
        if let Some(limit) = self.options.history_limit {
            if self.history.len() > limit {
                let excess = self.history.len() - limit;
                self.history.drain(..excess);
            }
        }
    }
}
