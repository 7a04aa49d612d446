//! Playback controller - transport state machine
//!
//! Owns the host runtime, the effect graph, the sequencer and the session.
//!
//! ```text
//!            play / resume                  pause
//!  Stopped ───────────────▶ Playing ─────────────────▶ Paused
//!     ▲                      │  ▲                         │
//!     └──── stop / failure ──┘  └──── toggle / seek ──────┘
//! ```
//!
//! Every play and seek is a new playback span: the live source is torn down
//! and a fresh one is started at the requested offset. Elapsed time is always
//! `(now - start_instant) * rate`, read from the host clock.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    sequencer::{RefreshOutcome, Sequencer},
    session::PlaybackSession,
    types::{PlaybackConfig, PlaybackStatus},
};
use cadence_audio::{
    AudioError, AudioHost, BufferHandle, EffectGraph, EffectSettings, NodeId, SpectrumSnapshot,
};
use cadence_core::{LibraryStorage, Track, TrackId};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A track load that has been started but not yet decoded
///
/// Produced by [`PlaybackController::begin_play`]; hand it back to
/// [`PlaybackController::finish_play`] together with the decode result.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// Load generation; stale once another load or a stop happens
    pub generation: u64,
    /// Sequencer index when the load began
    ///
    /// A refresh may move the track; completion re-resolves it by id.
    pub index: usize,
    /// Track being loaded
    pub track_id: TrackId,
    /// Requested start offset (seconds)
    pub offset: f64,
    /// Encoded track bytes
    pub bytes: Arc<[u8]>,
}

/// Load handed out by `begin_play` and not yet finished
#[derive(Debug, Clone)]
struct PendingLoad {
    generation: u64,
    track_id: TrackId,
}

/// Playback controller
pub struct PlaybackController<H: AudioHost> {
    host: H,
    graph: EffectGraph,
    sequencer: Sequencer,
    session: PlaybackSession,
    autoplay: bool,

    // Generation of the newest load; bumped by every begin_play
    generation: u64,
    // Load still waiting for finish_play
    pending: Option<PendingLoad>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl<H: AudioHost> PlaybackController<H> {
    /// Create a controller, building and wiring the effect graph up front
    pub fn new(mut host: H, config: PlaybackConfig) -> Self {
        let graph = EffectGraph::new(&mut host, config.graph);
        Self {
            host,
            graph,
            sequencer: Sequencer::new(),
            session: PlaybackSession::default(),
            autoplay: config.autoplay,
            generation: 0,
            pending: None,
            pending_events: Vec::new(),
        }
    }

    // ===== Transport =====

    /// Play the track at `index`, starting `offset` seconds in
    ///
    /// Out-of-range indices are ignored. Decode and missing-data failures
    /// leave the controller Stopped with a status message and are returned.
    pub fn play(&mut self, index: usize, offset: f64) -> Result<()> {
        self.observe(|c| c.load_and_start(index, offset))
    }

    /// Start a load: tear down the live source and hand out the bytes to decode
    ///
    /// Returns `Ok(None)` for out-of-range indices. The controller stays
    /// Stopped until [`finish_play`](Self::finish_play) installs the buffer.
    pub fn begin_play(&mut self, index: usize, offset: f64) -> Result<Option<LoadRequest>> {
        self.observe(|c| c.begin_load(index, offset))
    }

    /// Complete a load started by [`begin_play`](Self::begin_play)
    ///
    /// A request superseded by another play or a stop, or whose track left
    /// the library, is dropped without touching any state. The current index
    /// only moves once the load completes.
    pub fn finish_play(
        &mut self,
        request: LoadRequest,
        decoded: std::result::Result<BufferHandle, AudioError>,
    ) -> Result<()> {
        self.observe(|c| c.complete_load(request, decoded))
    }

    /// Play/pause toggle
    ///
    /// Nothing current: play the first track. Playing: pause. Otherwise resume
    /// the held buffer from the paused offset without decoding again.
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        self.observe(|c| {
            if c.sequencer.current().is_none() && !c.sequencer.is_empty() {
                return c.load_and_start(0, 0.0);
            }
            match c.session.status {
                PlaybackStatus::Playing => c.suspend(),
                PlaybackStatus::Paused | PlaybackStatus::Stopped => c.resume(),
            }
            Ok(())
        })
    }

    /// Pause (only from Playing)
    pub fn pause(&mut self) {
        self.observe(|c| {
            if c.session.status == PlaybackStatus::Playing {
                c.suspend();
            }
        });
    }

    /// Stop playback
    ///
    /// Cancels any in-flight load. At end of track the paused offset and the
    /// label are cleared; otherwise the offset is kept so playback can resume.
    pub fn stop(&mut self, is_end_of_track: bool) {
        self.observe(|c| c.halt(is_end_of_track));
    }

    /// Restart the current track at `position` seconds (clamped to the duration)
    pub fn seek(&mut self, position: f64) -> Result<()> {
        let (index, duration) = self.seek_target()?;
        let position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, duration)
        };
        debug!(index, position, "seek");
        self.play(index, position)
    }

    /// Restart the current track at a fraction of its duration
    pub fn seek_fraction(&mut self, fraction: f64) -> Result<()> {
        let (_, duration) = self.seek_target()?;
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.seek(duration * fraction)
    }

    /// Play the next track (wrapping); no-op on an empty list
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        match self.sequencer.next_index() {
            Some(index) => self.play(index, 0.0),
            None => Ok(()),
        }
    }

    /// Play the previous track (wrapping); no-op on an empty list
    pub fn previous(&mut self) -> Result<()> {
        match self.sequencer.previous_index() {
            Some(index) => self.play(index, 0.0),
            None => Ok(()),
        }
    }

    /// Host signal that a source played to its end
    ///
    /// Signals from sources that were already replaced are ignored.
    pub fn on_source_ended(&mut self, node: NodeId) -> Result<()> {
        if self.graph.source() != Some(node) {
            debug!(source = node.raw(), "ignoring end of stale source");
            return Ok(());
        }

        self.observe(|c| {
            if let Some(track_id) = c.session.loaded.clone() {
                info!(track = %track_id, "track finished");
                c.pending_events.push(PlaybackEvent::TrackFinished { track_id });
            }

            if c.autoplay {
                if let Some(index) = c.sequencer.next_index() {
                    return c.load_and_start(index, 0.0);
                }
            }
            c.halt(true);
            Ok(())
        })
    }

    // ===== Library =====

    /// Replace the track list, re-resolving the current track by id
    ///
    /// If the current track disappeared, playback stops and the session is
    /// cleared. An in-flight load survives only while its track is listed
    /// and the current track was not removed.
    pub fn refresh_tracks(&mut self, tracks: Vec<Track>) -> RefreshOutcome {
        self.observe(|c| {
            let outcome = c.sequencer.refresh(tracks);
            let pending_gone = c
                .pending
                .as_ref()
                .is_some_and(|p| c.sequencer.position(&p.track_id).is_none());
            if pending_gone {
                debug!("track of in-flight load removed, cancelling");
                c.pending = None;
            }
            match outcome {
                RefreshOutcome::Removed => {
                    info!("current track removed from library, stopping");
                    c.halt(true);
                    c.session.clear();
                }
                RefreshOutcome::Retained(index) => debug!(index, "current track re-resolved"),
                RefreshOutcome::NoCurrent => {}
            }
            c.pending_events.push(PlaybackEvent::LibraryChanged {
                length: c.sequencer.len(),
            });
            outcome
        })
    }

    /// List tracks from `storage` and refresh
    pub async fn reload_from<S>(&mut self, storage: &S) -> cadence_core::Result<RefreshOutcome>
    where
        S: LibraryStorage + ?Sized,
    {
        let tracks = storage.list_tracks().await?;
        Ok(self.refresh_tracks(tracks))
    }

    // ===== Effects =====

    /// Set the playback rate of the live source and every later one
    pub fn set_rate(&mut self, rate: f32) {
        self.graph.set_rate(&mut self.host, rate);
    }

    /// Set the output volume, [0, 1]
    pub fn set_volume(&mut self, volume: f32) {
        self.graph.set_volume(&mut self.host, volume);
    }

    /// Set the dry/wet reverb balance
    pub fn set_reverb_mix(&mut self, mix: f32) {
        self.graph.set_reverb_mix(&mut self.host, mix);
    }

    /// Set the distortion amount
    pub fn set_distortion(&mut self, amount: f32) {
        self.graph.set_distortion(&mut self.host, amount);
    }

    /// Set the shelf gains in dB
    pub fn set_tone_gains(&mut self, low_db: f32, high_db: f32) {
        self.graph.set_tone_gains(&mut self.host, low_db, high_db);
    }

    /// Apply a whole settings block
    pub fn set_effects(&mut self, settings: EffectSettings) {
        self.graph.set_settings(&mut self.host, settings);
    }

    /// Restore every effect parameter to its default
    pub fn reset_effects(&mut self) {
        self.graph.reset_effects(&mut self.host);
    }

    /// Current effect parameters
    pub fn effects(&self) -> EffectSettings {
        self.graph.settings()
    }

    // ===== State Queries =====

    /// Transport status
    pub fn status(&self) -> PlaybackStatus {
        self.session.status
    }

    /// Session state
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// Current sequencer index (`None` = no track)
    pub fn current_index(&self) -> Option<usize> {
        self.sequencer.current()
    }

    /// Current track
    pub fn current_track(&self) -> Option<&Track> {
        self.sequencer.current_track()
    }

    /// Display label of the current track
    pub fn label(&self) -> Option<&str> {
        self.session.label()
    }

    /// Last user-visible error
    pub fn message(&self) -> Option<&str> {
        self.session.message()
    }

    /// Whether a load is waiting for [`finish_play`](Self::finish_play)
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Elapsed playback time in seconds
    ///
    /// While playing this is `(now - start_instant) * rate` with the current
    /// rate, so a mid-span rate change rescales the whole span.
    pub fn elapsed(&self) -> f64 {
        match self.session.status {
            PlaybackStatus::Playing => elapsed_seconds(
                self.session.start_instant,
                self.host.now(),
                f64::from(self.graph.settings().rate),
            ),
            PlaybackStatus::Paused | PlaybackStatus::Stopped => self.session.paused_offset,
        }
    }

    /// Duration of the held buffer
    pub fn duration(&self) -> Option<f64> {
        self.session.buffer.as_ref().map(BufferHandle::duration)
    }

    /// Elapsed fraction of the held buffer, clamped to [0, 1]
    pub fn progress(&self) -> f64 {
        match self.duration() {
            Some(duration) if duration > 0.0 => (self.elapsed() / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Current spectrum tap reading
    pub fn spectrum(&self) -> SpectrumSnapshot {
        self.graph.spectrum(&self.host)
    }

    /// Whether finishing a track advances to the next one
    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    /// Enable or disable autoplay
    pub fn set_autoplay(&mut self, enabled: bool) {
        self.autoplay = enabled;
    }

    /// Track list
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Effect graph
    pub fn graph(&self) -> &EffectGraph {
        &self.graph
    }

    /// Host runtime
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Host runtime (mutable), for decoding split loads and driving the clock
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // ===== Events =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Whether events are waiting
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    /// Run `op` and emit one `StateChanged` if the status differs afterwards
    fn observe<T>(&mut self, op: impl FnOnce(&mut Self) -> T) -> T {
        let before = self.session.status;
        let out = op(self);
        let after = self.session.status;
        if before != after {
            debug!(?before, ?after, "status changed");
            self.pending_events
                .push(PlaybackEvent::StateChanged { state: after });
        }
        out
    }

    fn seek_target(&self) -> Result<(usize, f64)> {
        match (self.sequencer.current(), self.session.buffer.as_ref()) {
            (Some(index), Some(buffer)) => Ok((index, buffer.duration())),
            _ => Err(PlaybackError::NoBufferLoaded),
        }
    }

    fn load_and_start(&mut self, index: usize, offset: f64) -> Result<()> {
        let Some(request) = self.begin_load(index, offset)? else {
            return Ok(());
        };
        let decoded = self.host.decode(&request.bytes);
        self.complete_load(request, decoded)
    }

    fn begin_load(&mut self, index: usize, offset: f64) -> Result<Option<LoadRequest>> {
        let track = match self.sequencer.track(index) {
            Ok(track) => track,
            Err(PlaybackError::IndexOutOfRange(index)) => {
                debug!(index, len = self.sequencer.len(), "play index out of range, ignoring");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        let track_id = track.id().clone();
        let bytes = track.shared_bytes();

        self.teardown_source();
        self.generation += 1;
        self.pending = None;

        let Some(bytes) = bytes else {
            self.sequencer.set_current(Some(index));
            self.drop_buffer();
            return Err(self.fail(PlaybackError::MissingData(track_id)));
        };

        debug!(track = %track_id, index, generation = self.generation, "load started");
        self.pending = Some(PendingLoad {
            generation: self.generation,
            track_id: track_id.clone(),
        });
        Ok(Some(LoadRequest {
            generation: self.generation,
            index,
            track_id,
            offset: if offset.is_nan() { 0.0 } else { offset.max(0.0) },
            bytes,
        }))
    }

    fn complete_load(
        &mut self,
        request: LoadRequest,
        decoded: std::result::Result<BufferHandle, AudioError>,
    ) -> Result<()> {
        if self.pending.as_ref().map(|p| p.generation) != Some(request.generation) {
            debug!(
                track = %request.track_id,
                generation = request.generation,
                "dropping superseded load"
            );
            return Ok(());
        }
        self.pending = None;

        let Some(index) = self.sequencer.position(&request.track_id) else {
            debug!(track = %request.track_id, "track of finished load no longer listed");
            return Ok(());
        };
        self.sequencer.set_current(Some(index));

        let buffer = match decoded {
            Ok(buffer) => buffer,
            Err(e) => {
                self.drop_buffer();
                let detail = match e {
                    AudioError::Decode(detail) => detail,
                    other => other.to_string(),
                };
                return Err(self.fail(PlaybackError::Decode(detail)));
            }
        };

        let offset = request.offset.min(buffer.duration());
        let previous = self.session.loaded.replace(request.track_id.clone());
        self.session.buffer = Some(buffer);
        self.session.label = Some(request.track_id.title().to_string());
        self.session.message = None;

        if previous.as_ref() != Some(&request.track_id) {
            self.pending_events.push(PlaybackEvent::TrackChanged {
                track_id: request.track_id.clone(),
                previous_track_id: previous,
            });
        }

        info!(track = %request.track_id, offset, "playing");
        self.start_span(offset);
        Ok(())
    }

    /// Attach a fresh source for the held buffer at `offset`
    fn start_span(&mut self, offset: f64) {
        let Some(buffer) = self.session.buffer.as_ref() else {
            return;
        };
        self.graph.attach_source(&mut self.host, buffer, offset);
        self.session.start_instant = self.host.now() - offset;
        self.session.paused_offset = 0.0;
        self.session.status = PlaybackStatus::Playing;
    }

    fn resume(&mut self) {
        if self.session.buffer.is_none() {
            return;
        }
        let offset = self.session.paused_offset;
        debug!(offset, "resuming");
        self.start_span(offset);
    }

    fn suspend(&mut self) {
        self.teardown_source();
        self.session.status = PlaybackStatus::Paused;
    }

    /// Tear down the live source, recording the offset if it was playing
    fn teardown_source(&mut self) {
        if self.session.status == PlaybackStatus::Playing {
            self.session.paused_offset = self.host.now() - self.session.start_instant;
            self.session.status = PlaybackStatus::Stopped;
        }
        self.graph.detach_source(&mut self.host);
    }

    /// Forget the held buffer so it never outlives a failed load
    fn drop_buffer(&mut self) {
        self.session.buffer = None;
        self.session.loaded = None;
    }

    fn halt(&mut self, is_end_of_track: bool) {
        self.pending = None;
        self.teardown_source();
        self.session.status = PlaybackStatus::Stopped;
        if is_end_of_track {
            self.session.paused_offset = 0.0;
            self.session.label = None;
        }
    }

    fn fail(&mut self, err: PlaybackError) -> PlaybackError {
        let message = err.to_string();
        warn!(%message, "playback failed");
        self.session.status = PlaybackStatus::Stopped;
        self.session.message = Some(message.clone());
        self.pending_events.push(PlaybackEvent::Error { message });
        err
    }
}

/// `(now - start) * rate`
pub fn elapsed_seconds(start_instant: f64, now: f64, rate: f64) -> f64 {
    (now - start_instant) * rate
}

impl<H: AudioHost + std::fmt::Debug> std::fmt::Debug for PlaybackController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("status", &self.session.status)
            .field("current", &self.sequencer.current())
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
