//! End-to-end tests for the playback controller
//!
//! Drive the controller through the recording host the way a UI would and
//! check what the listener would observe.

use cadence_audio::test_utils::{wav_bytes, HostCall, RecordingHost};
use cadence_core::Track;
use cadence_playback::{
    PlaybackConfig, PlaybackController, PlaybackEvent, PlaybackStatus, RefreshOutcome,
};
use proptest::prelude::*;

// ===== Test Helpers =====

const SR: u32 = 8_000;

fn library(names: &[&str], seconds: f32) -> Vec<Track> {
    names
        .iter()
        .map(|n| Track::new(*n, wav_bytes(SR, 2, seconds)))
        .collect()
}

fn engine(names: &[&str], seconds: f32) -> PlaybackController<RecordingHost> {
    let mut controller = PlaybackController::new(RecordingHost::new(SR), PlaybackConfig::default());
    controller.refresh_tracks(library(names, seconds));
    controller.drain_events();
    controller
}

fn states(events: &[PlaybackEvent]) -> Vec<PlaybackStatus> {
    events
        .iter()
        .filter_map(|e| match e {
            PlaybackEvent::StateChanged { state } => Some(*state),
            _ => None,
        })
        .collect()
}

// ===== Autoplay =====

#[test]
fn test_autoplay_advances_without_intermediate_stop() {
    let mut engine = engine(&["a.mp3", "b.mp3", "c.mp3"], 1.0);
    engine.play(0, 0.0).unwrap();
    engine.drain_events();
    let finished = engine.graph().source().unwrap();
    engine.host_mut().advance(1.0);

    engine.on_source_ended(finished).unwrap();

    assert_eq!(engine.status(), PlaybackStatus::Playing);
    assert_eq!(engine.current_index(), Some(1));
    assert_eq!(engine.label(), Some("b"));

    let events = engine.drain_events();
    assert!(states(&events).is_empty(), "no state change expected: {events:?}");
    assert!(events.iter().any(|e| matches!(
        e,
        PlaybackEvent::TrackFinished { track_id } if track_id.as_str() == "a.mp3"
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        PlaybackEvent::TrackChanged { track_id, .. } if track_id.as_str() == "b.mp3"
    )));
}

#[test]
fn test_autoplay_wraps_from_last_track() {
    let mut engine = engine(&["a.mp3", "b.mp3", "c.mp3"], 1.0);
    engine.play(2, 0.0).unwrap();
    let node = engine.graph().source().unwrap();

    engine.on_source_ended(node).unwrap();

    assert_eq!(engine.current_index(), Some(0));
    assert_eq!(engine.status(), PlaybackStatus::Playing);
}

// ===== Pause / Resume =====

#[test]
fn test_resume_reuses_buffer_without_decoding() {
    let mut engine = engine(&["a.mp3", "b.mp3"], 3.0);
    engine.play(0, 0.0).unwrap();
    let buffer = engine.session().buffer().cloned().unwrap();
    engine.host_mut().advance(1.25);

    engine.pause();
    let offset = engine.session().paused_offset();
    engine.host_mut().advance(10.0);
    engine.toggle_play_pause().unwrap();

    assert_eq!(engine.status(), PlaybackStatus::Playing);
    assert_eq!(engine.session().buffer(), Some(&buffer));
    assert_eq!(engine.host().decode_count(), 1);
    assert!((offset - 1.25).abs() < 1e-9);
    assert!((engine.elapsed() - 1.25).abs() < 1e-9);

    let source = engine.graph().source().unwrap();
    assert_eq!(engine.host().source_buffer(source), Some(buffer.id()));
    assert!(engine.host().calls().contains(&HostCall::Start(source, offset)));
}

#[test]
fn test_toggle_with_nothing_current_plays_first_track() {
    let mut engine = engine(&["b.mp3", "a.mp3"], 1.0);

    engine.toggle_play_pause().unwrap();

    assert_eq!(engine.current_index(), Some(0));
    assert_eq!(engine.label(), Some("a"));
    assert_eq!(states(&engine.drain_events()), vec![PlaybackStatus::Playing]);
}

#[test]
fn test_toggle_on_empty_library_does_nothing() {
    let mut engine = engine(&[], 1.0);
    engine.toggle_play_pause().unwrap();
    assert_eq!(engine.status(), PlaybackStatus::Stopped);
    assert!(engine.drain_events().is_empty());
}

// ===== Navigation =====

#[test]
fn test_next_and_previous_wrap() {
    let mut engine = engine(&["a.mp3", "b.mp3", "c.mp3"], 1.0);
    engine.play(2, 0.0).unwrap();

    engine.next().unwrap();
    assert_eq!(engine.current_index(), Some(0));

    engine.previous().unwrap();
    assert_eq!(engine.current_index(), Some(2));
}

#[test]
fn test_only_one_source_ever_live() {
    let mut engine = engine(&["a.mp3", "b.mp3", "c.mp3"], 2.0);
    engine.play(0, 0.0).unwrap();
    engine.seek(1.0).unwrap();
    engine.next().unwrap();
    engine.pause();
    engine.toggle_play_pause().unwrap();
    engine.previous().unwrap();

    let live = engine.host().connected_sources();
    assert_eq!(live.len(), 1);
    assert_eq!(Some(live[0]), engine.graph().source());
}

// ===== Library refresh =====

#[test]
fn test_deleting_current_track_stops_and_clears() {
    let mut engine = engine(&["a.mp3", "b.mp3", "c.mp3"], 1.0);
    engine.play(1, 0.0).unwrap();
    engine.drain_events();

    let outcome = engine.refresh_tracks(library(&["a.mp3", "c.mp3"], 1.0));

    assert_eq!(outcome, RefreshOutcome::Removed);
    assert_eq!(engine.status(), PlaybackStatus::Stopped);
    assert_eq!(engine.current_index(), None);
    assert_eq!(engine.label(), None);
    assert!(engine.session().buffer().is_none());
    assert!(engine.graph().source().is_none());
    assert_eq!(
        engine.drain_events(),
        vec![
            PlaybackEvent::LibraryChanged { length: 2 },
            PlaybackEvent::StateChanged {
                state: PlaybackStatus::Stopped
            },
        ]
    );
}

#[test]
fn test_refresh_keeps_playing_track_at_new_index() {
    let mut engine = engine(&["b.mp3", "c.mp3"], 1.0);
    engine.play(1, 0.0).unwrap();

    let outcome = engine.refresh_tracks(library(&["a.mp3", "b.mp3", "c.mp3"], 1.0));

    assert_eq!(outcome, RefreshOutcome::Retained(2));
    assert_eq!(engine.status(), PlaybackStatus::Playing);
    assert_eq!(engine.current_track().map(|t| t.id().as_str()), Some("c.mp3"));

    engine.next().unwrap();
    assert_eq!(engine.current_index(), Some(0));
}

// ===== Seek =====

#[test]
fn test_seek_restarts_with_fresh_source() {
    let mut engine = engine(&["a.mp3"], 2.0);
    engine.play(0, 0.0).unwrap();
    let before = engine.graph().source().unwrap();

    engine.seek(1.5).unwrap();
    let after = engine.graph().source().unwrap();

    assert_ne!(before, after);
    assert!(!engine.host().is_running(before));
    assert!(engine.host().calls().contains(&HostCall::Start(after, 1.5)));
}

#[test]
fn test_seek_from_pause_starts_playing() {
    let mut engine = engine(&["a.mp3"], 2.0);
    engine.play(0, 0.0).unwrap();
    engine.pause();
    engine.drain_events();

    engine.seek(0.5).unwrap();

    assert_eq!(engine.status(), PlaybackStatus::Playing);
    assert_eq!(states(&engine.drain_events()), vec![PlaybackStatus::Playing]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn seek_reports_requested_position(fraction in 0.0f64..1.0, clock in 0.0f64..1_000.0) {
        let mut engine = engine(&["a.mp3"], 2.0);
        engine.host_mut().set_time(clock);
        engine.play(0, 0.0).unwrap();
        let position = fraction * 2.0;

        engine.seek(position).unwrap();

        prop_assert!((engine.elapsed() - position).abs() < 1e-3);
    }
}
