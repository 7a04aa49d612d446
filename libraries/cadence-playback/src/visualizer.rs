//! Per-frame visualizer sampling
//!
//! A cooperative task driven by the host display loop. Each tick reads the
//! progress fraction and the spectrum tap and hands both to a renderer. The
//! running flag is checked before every reschedule; the first tick that finds
//! the controller not Playing clears it and asks the loop to stop.

use crate::controller::PlaybackController;
use crate::events::PlaybackEvent;
use crate::types::PlaybackStatus;
use cadence_audio::{AudioHost, SpectrumSnapshot};

/// One rendered frame
#[derive(Debug, Clone, PartialEq)]
pub struct VisualFrame {
    /// Elapsed fraction of the track, [0, 1]
    pub progress: f64,
    /// Spectrum bin magnitudes
    pub spectrum: SpectrumSnapshot,
}

/// Rendering collaborator
pub trait FrameRenderer {
    /// Draw one frame
    fn render(&mut self, frame: &VisualFrame);
}

impl<F: FnMut(&VisualFrame)> FrameRenderer for F {
    fn render(&mut self, frame: &VisualFrame) {
        self(frame);
    }
}

/// What the display loop should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSchedule {
    /// Request another frame callback
    Continue,
    /// Do not reschedule
    Halt,
}

/// Visualizer sampler
#[derive(Debug, Default)]
pub struct VisualizerSampler {
    running: bool,
    last_frame: Option<VisualFrame>,
}

impl VisualizerSampler {
    /// Create an idle sampler
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the sampler; the caller schedules the first frame
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Disarm the sampler; the next tick halts
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the task is still scheduling frames
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Last frame handed to the renderer
    pub fn last_frame(&self) -> Option<&VisualFrame> {
        self.last_frame.as_ref()
    }

    /// Follow status changes: arm on Playing, disarm otherwise
    ///
    /// Returns true when the sampler was just armed and the caller should
    /// schedule a first frame.
    pub fn on_event(&mut self, event: &PlaybackEvent) -> bool {
        match event {
            PlaybackEvent::StateChanged { state } => {
                let was_running = self.running;
                self.running = *state == PlaybackStatus::Playing;
                self.running && !was_running
            }
            _ => false,
        }
    }

    /// One display-frame callback
    pub fn tick<H, R>(&mut self, controller: &PlaybackController<H>, renderer: &mut R) -> FrameSchedule
    where
        H: AudioHost,
        R: FrameRenderer + ?Sized,
    {
        if !self.running || controller.status() != PlaybackStatus::Playing {
            self.running = false;
            return FrameSchedule::Halt;
        }

        let frame = VisualFrame {
            progress: controller.progress(),
            spectrum: controller.spectrum(),
        };
        renderer.render(&frame);
        self.last_frame = Some(frame);
        FrameSchedule::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlaybackConfig;
    use cadence_audio::test_utils::{wav_bytes, RecordingHost};
    use cadence_core::Track;

    fn playing_controller() -> PlaybackController<RecordingHost> {
        let mut c = PlaybackController::new(RecordingHost::new(8_000), PlaybackConfig::default());
        c.refresh_tracks(vec![Track::new("a.mp3", wav_bytes(8_000, 1, 2.0))]);
        c.play(0, 0.0).unwrap();
        c
    }

    #[test]
    fn renders_progress_and_spectrum_while_playing() {
        let mut c = playing_controller();
        c.host_mut().set_spectrum(vec![10, 200, 30]);
        c.host_mut().advance(0.5);

        let mut sampler = VisualizerSampler::new();
        sampler.start();
        let mut frames = Vec::new();
        let schedule = sampler.tick(&c, &mut |f: &VisualFrame| frames.push(f.clone()));

        assert_eq!(schedule, FrameSchedule::Continue);
        assert_eq!(frames.len(), 1);
        assert!((frames[0].progress - 0.25).abs() < 1e-9);
        assert_eq!(frames[0].spectrum.len(), 128);
        assert_eq!(&frames[0].spectrum.bins()[..3], &[10, 200, 30]);
        assert_eq!(sampler.last_frame(), frames.first());
    }

    #[test]
    fn halts_once_not_playing() {
        let mut c = playing_controller();
        let mut sampler = VisualizerSampler::new();
        sampler.start();
        let mut count = 0;

        assert_eq!(sampler.tick(&c, &mut |_: &VisualFrame| count += 1), FrameSchedule::Continue);
        c.pause();
        assert_eq!(sampler.tick(&c, &mut |_: &VisualFrame| count += 1), FrameSchedule::Halt);
        assert!(!sampler.is_running());

        // Further ticks stay halted even after playback resumes
        c.toggle_play_pause().unwrap();
        assert_eq!(sampler.tick(&c, &mut |_: &VisualFrame| count += 1), FrameSchedule::Halt);
        assert_eq!(count, 1);
    }

    #[test]
    fn progress_clamped_to_one() {
        let mut c = playing_controller();
        c.set_rate(2.0);
        c.host_mut().advance(5.0);

        let mut sampler = VisualizerSampler::new();
        sampler.start();
        sampler.tick(&c, &mut |_: &VisualFrame| {});

        assert_eq!(sampler.last_frame().map(|f| f.progress), Some(1.0));
    }

    #[test]
    fn follows_state_events() {
        let mut c = PlaybackController::new(RecordingHost::new(8_000), PlaybackConfig::default());
        c.refresh_tracks(vec![Track::new("a.mp3", wav_bytes(8_000, 1, 1.0))]);
        let mut sampler = VisualizerSampler::new();

        c.play(0, 0.0).unwrap();
        let armed: Vec<bool> = c.drain_events().iter().map(|e| sampler.on_event(e)).collect();
        assert!(armed.contains(&true));
        assert!(sampler.is_running());

        c.pause();
        for e in c.drain_events() {
            sampler.on_event(&e);
        }
        assert!(!sampler.is_running());
    }
}
