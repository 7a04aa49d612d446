//! Integration tests for CLI subcommands against a real directory

use async_trait::async_trait;
use cadence_audio::test_utils::wav_bytes;
use cadence_cli::commands;
use cadence_core::{DownloadService, DownloadSource};
use cadence_library::DirectoryLibrary;
use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;

fn library_with(files: &[(&str, Vec<u8>)]) -> (TempDir, DirectoryLibrary) {
    let dir = TempDir::new().unwrap();
    for (name, bytes) in files {
        fs::write(dir.path().join(name), bytes).unwrap();
    }
    let library = DirectoryLibrary::new(dir.path());
    (dir, library)
}

#[tokio::test]
async fn test_list_in_play_order_with_filter() {
    let (_dir, library) = library_with(&[
        ("Zebra.mp3", vec![0; 2048]),
        ("Alpha Beat.mp3", vec![0; 10]),
        ("beat it.mp3", vec![0; 10]),
    ]);

    let all = commands::list(&library, None).await.unwrap();
    let names: Vec<&str> = all.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(names, vec!["Alpha Beat.mp3", "Zebra.mp3", "beat it.mp3"]);
    assert_eq!(all[1].to_string(), "  1  Zebra  (2 KiB)");

    let beats = commands::list(&library, Some("BEAT")).await.unwrap();
    let hits: Vec<(usize, &str)> = beats.iter().map(|e| (e.index, e.id.as_str())).collect();
    assert_eq!(hits, vec![(0, "Alpha Beat.mp3"), (2, "beat it.mp3")]);
}

#[tokio::test]
async fn test_inspect_reports_decoded_shape() {
    let (_dir, library) = library_with(&[("tone.mp3", wav_bytes(16_000, 2, 1.5))]);

    let report = commands::inspect(&library, "tone.mp3").await.unwrap();

    assert_eq!(report.sample_rate, 16_000);
    assert_eq!(report.frames, 24_000);
    assert!((report.duration - 1.5).abs() < 1e-9);
    assert!(report.to_string().starts_with("tone\n"));
}

#[tokio::test]
async fn test_inspect_rejects_undecodable_file() {
    let (_dir, library) = library_with(&[("broken.mp3", vec![0x42; 256])]);
    assert!(commands::inspect(&library, "broken.mp3").await.is_err());
}

#[tokio::test]
async fn test_delete_then_list() {
    let (dir, library) = library_with(&[("a.mp3", vec![1]), ("b.mp3", vec![2])]);

    commands::delete(&library, "a.mp3").await.unwrap();

    assert!(!dir.path().join("a.mp3").exists());
    assert_eq!(commands::list(&library, None).await.unwrap().len(), 1);
    assert!(commands::delete(&library, "../b.mp3").await.is_err());
}

struct FakeDownloader {
    dir: std::path::PathBuf,
    calls: Mutex<Vec<(String, DownloadSource)>>,
}

#[async_trait]
impl DownloadService for FakeDownloader {
    async fn fetch_by_query(&self, query: &str, source: DownloadSource) -> cadence_core::Result<()> {
        self.calls.lock().unwrap().push((query.to_string(), source));
        fs::write(self.dir.join(format!("{query}.mp3")), b"mp3")?;
        Ok(())
    }
}

#[tokio::test]
async fn test_download_relists_library() {
    let (dir, library) = library_with(&[("old.mp3", vec![1])]);
    let downloader = FakeDownloader {
        dir: dir.path().to_path_buf(),
        calls: Mutex::new(Vec::new()),
    };

    let count = commands::download(&downloader, &library, "new", DownloadSource::SoundCloud)
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(
        downloader.calls.lock().unwrap().as_slice(),
        &[("new".to_string(), DownloadSource::SoundCloud)]
    );
}
