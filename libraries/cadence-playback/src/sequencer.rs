//! Ordered track list with wraparound navigation
//!
//! ```text
//! tracks (sorted by id):  a.mp3  b.mp3  c.mp3
//!                                  ▲
//!                               current
//! next()     = (current + 1) mod len
//! previous() = (current - 1 + len) mod len
//! ```
//!
//! Membership is identity-based: a refresh re-resolves the current track by
//! id because indices shift when tracks are added or removed.

use crate::error::{PlaybackError, Result};
use cadence_core::{Track, TrackId};

/// What a refresh did to the current track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Nothing was current
    NoCurrent,
    /// Current track still listed, now at this index
    Retained(usize),
    /// Current track no longer listed; current index cleared
    Removed,
}

/// Ordered track list plus current index
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl Sequencer {
    /// Create an empty sequencer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sequencer over `tracks` (sorted by id)
    pub fn from_tracks(mut tracks: Vec<Track>) -> Self {
        sort_tracks(&mut tracks);
        Self {
            tracks,
            current: None,
        }
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// All tracks, sorted
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track at `index`
    pub fn track(&self, index: usize) -> Result<&Track> {
        self.tracks
            .get(index)
            .ok_or(PlaybackError::IndexOutOfRange(index))
    }

    /// Current index (`None` = no track)
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Current track
    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Set the current index; out-of-range indices clear it
    pub fn set_current(&mut self, index: Option<usize>) {
        self.current = index.filter(|&i| i < self.tracks.len());
    }

    /// Index of the track with `id`
    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id() == id)
    }

    /// Index after the current one, wrapping; `None` on an empty list
    ///
    /// With nothing current this is index 0.
    pub fn next_index(&self) -> Option<usize> {
        self.step(1)
    }

    /// Index before the current one, wrapping; `None` on an empty list
    pub fn previous_index(&self) -> Option<usize> {
        self.step(-1)
    }

    fn step(&self, delta: i64) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        let len = self.tracks.len() as i64;
        let current = self.current.map_or(-1, |i| i as i64);
        Some((current + delta + len).rem_euclid(len) as usize)
    }

    /// Replace the list (sorted by id) and re-resolve the current track
    pub fn refresh(&mut self, mut tracks: Vec<Track>) -> RefreshOutcome {
        sort_tracks(&mut tracks);
        let previous = self.current_track().map(|t| t.id().clone());
        self.tracks = tracks;

        match previous {
            None => {
                self.current = None;
                RefreshOutcome::NoCurrent
            }
            Some(id) => match self.position(&id) {
                Some(index) => {
                    self.current = Some(index);
                    RefreshOutcome::Retained(index)
                }
                None => {
                    self.current = None;
                    RefreshOutcome::Removed
                }
            },
        }
    }

    /// Tracks whose id contains `query` (case-insensitive), with their indices
    pub fn filter(&self, query: &str) -> Vec<(usize, &Track)> {
        let needle = query.to_lowercase();
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.id().as_str().to_lowercase().contains(&needle))
            .collect()
    }
}

fn sort_tracks(tracks: &mut [Track]) {
    tracks.sort_by(|a, b| a.id().cmp(b.id()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tracks(names: &[&str]) -> Vec<Track> {
        names
            .iter()
            .map(|n| Track::new(*n, vec![0u8; 4]))
            .collect()
    }

    fn ids(seq: &Sequencer) -> Vec<&str> {
        seq.tracks().iter().map(|t| t.id().as_str()).collect()
    }

    #[test]
    fn sorts_by_identifier() {
        let seq = Sequencer::from_tracks(tracks(&["c.mp3", "a.mp3", "b.mp3"]));
        assert_eq!(ids(&seq), vec!["a.mp3", "b.mp3", "c.mp3"]);
        assert_eq!(seq.current(), None);
    }

    #[test]
    fn next_wraps_to_start() {
        let mut seq = Sequencer::from_tracks(tracks(&["a", "b", "c"]));
        seq.set_current(Some(2));
        assert_eq!(seq.next_index(), Some(0));
    }

    #[test]
    fn previous_wraps_to_end() {
        let mut seq = Sequencer::from_tracks(tracks(&["a", "b", "c"]));
        seq.set_current(Some(0));
        assert_eq!(seq.previous_index(), Some(2));
    }

    #[test]
    fn navigation_on_empty_list() {
        let seq = Sequencer::new();
        assert_eq!(seq.next_index(), None);
        assert_eq!(seq.previous_index(), None);
    }

    #[test]
    fn navigation_with_nothing_current() {
        let seq = Sequencer::from_tracks(tracks(&["a", "b", "c"]));
        assert_eq!(seq.next_index(), Some(0));
        assert_eq!(seq.previous_index(), Some(1));

        let single = Sequencer::from_tracks(tracks(&["a"]));
        assert_eq!(single.previous_index(), Some(0));
    }

    #[test]
    fn set_current_rejects_out_of_range() {
        let mut seq = Sequencer::from_tracks(tracks(&["a", "b"]));
        seq.set_current(Some(5));
        assert_eq!(seq.current(), None);
        assert!(matches!(seq.track(5), Err(PlaybackError::IndexOutOfRange(5))));
    }

    #[test]
    fn refresh_re_resolves_current_by_id() {
        let mut seq = Sequencer::from_tracks(tracks(&["b.mp3", "c.mp3"]));
        seq.set_current(Some(1));

        let outcome = seq.refresh(tracks(&["a.mp3", "b.mp3", "c.mp3"]));

        assert_eq!(outcome, RefreshOutcome::Retained(2));
        assert_eq!(seq.current_track().map(|t| t.id().as_str()), Some("c.mp3"));
    }

    #[test]
    fn refresh_clears_removed_current() {
        let mut seq = Sequencer::from_tracks(tracks(&["a.mp3", "b.mp3"]));
        seq.set_current(Some(0));

        let outcome = seq.refresh(tracks(&["b.mp3"]));

        assert_eq!(outcome, RefreshOutcome::Removed);
        assert_eq!(seq.current(), None);
    }

    #[test]
    fn refresh_without_current() {
        let mut seq = Sequencer::new();
        assert_eq!(seq.refresh(tracks(&["a"])), RefreshOutcome::NoCurrent);
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn filter_keeps_sequencer_indices() {
        let seq = Sequencer::from_tracks(tracks(&["Daft Punk.mp3", "abba.mp3", "Punk Rock.mp3"]));

        let hits: Vec<(usize, &str)> = seq
            .filter("PUNK")
            .into_iter()
            .map(|(i, t)| (i, t.id().as_str()))
            .collect();

        assert_eq!(hits, vec![(0, "Daft Punk.mp3"), (1, "Punk Rock.mp3")]);
        assert_eq!(seq.filter("").len(), 3);
    }

    proptest! {
        #[test]
        fn next_then_previous_returns_home(len in 1usize..50, start in 0usize..50) {
            let names: Vec<String> = (0..len).map(|i| format!("{i:03}.mp3")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let mut seq = Sequencer::from_tracks(tracks(&refs));
            let start = start % len;
            seq.set_current(Some(start));

            let next = seq.next_index().unwrap();
            prop_assert!(next < len);
            seq.set_current(Some(next));
            prop_assert_eq!(seq.previous_index(), Some(start));
        }
    }
}
