//! Integration tests for the directory library and downloader

use cadence_core::{CadenceError, DownloadService, DownloadSource, LibraryStorage, TrackId};
use cadence_library::{DirectoryLibrary, LibraryError, YtDlpDownloader};
use std::fs;
use tempfile::TempDir;

fn library_with(files: &[(&str, &[u8])]) -> (TempDir, DirectoryLibrary) {
    let dir = TempDir::new().unwrap();
    for (name, bytes) in files {
        fs::write(dir.path().join(name), bytes).unwrap();
    }
    let library = DirectoryLibrary::new(dir.path());
    (dir, library)
}

#[tokio::test]
async fn test_lists_only_mp3_files_sorted() {
    let (_dir, library) = library_with(&[
        ("b.mp3", b"bbb"),
        ("a.mp3", b"aa"),
        ("cover.jpg", b"jpg"),
        ("notes.txt", b"txt"),
    ]);
    fs::create_dir(library.dir().join("folder.mp3")).unwrap();

    let tracks = library.list_tracks().await.unwrap();

    let ids: Vec<&str> = tracks.iter().map(|t| t.id().as_str()).collect();
    assert_eq!(ids, vec!["a.mp3", "b.mp3"]);
    assert_eq!(tracks[0].bytes(), Some(&b"aa"[..]));
    assert_eq!(tracks[1].bytes(), Some(&b"bbb"[..]));
}

#[tokio::test]
async fn test_empty_directory_lists_nothing() {
    let (_dir, library) = library_with(&[]);
    assert!(library.list_tracks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    let library = DirectoryLibrary::new(dir.path().join("nope"));

    let err = library.list_tracks().await.unwrap_err();
    assert!(matches!(err, CadenceError::Io(_)));

    library.initialize().await.unwrap();
    assert!(library.list_tracks().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_removes_file() {
    let (dir, library) = library_with(&[("a.mp3", b"a"), ("b.mp3", b"b")]);

    library.delete_track(&TrackId::new("a.mp3")).await.unwrap();

    assert!(!dir.path().join("a.mp3").exists());
    let tracks = library.list_tracks().await.unwrap();
    assert_eq!(tracks.len(), 1);
}

#[tokio::test]
async fn test_delete_rejects_unsafe_ids() {
    let (dir, library) = library_with(&[("a.mp3", b"a"), ("keep.txt", b"k")]);

    for bad in ["../a.mp3", "keep.txt", "sub/a.mp3"] {
        let err = library.delete(&TrackId::new(bad)).await.unwrap_err();
        assert!(matches!(err, LibraryError::InvalidTrackId(_)), "{bad}");
    }
    assert!(dir.path().join("keep.txt").exists());
}

#[tokio::test]
async fn test_delete_missing_track() {
    let (_dir, library) = library_with(&[]);
    let err = library.delete_track(&TrackId::new("ghost.mp3")).await.unwrap_err();
    assert!(matches!(err, CadenceError::TrackNotFound(_)));
}

#[cfg(unix)]
mod fake_ytdlp {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_runs_in_library_directory_with_search_args() {
        let bin = TempDir::new().unwrap();
        let (dir, _library) = library_with(&[]);
        let program = script(
            bin.path(),
            "yt-dlp",
            r#"printf '%s\n' "$@" > args.txt; : > "Found Song.mp3""#,
        );
        let downloader = YtDlpDownloader::new(program, dir.path());

        downloader
            .fetch_by_query("found song", DownloadSource::SoundCloud)
            .await
            .unwrap();

        let args = fs::read_to_string(dir.path().join("args.txt")).unwrap();
        let args: Vec<&str> = args.lines().collect();
        assert_eq!(args.first(), Some(&"--extract-audio"));
        assert_eq!(args.last(), Some(&"scsearch:found song"));
        assert!(dir.path().join("Found Song.mp3").exists());
    }

    #[tokio::test]
    async fn test_failure_carries_combined_output() {
        let bin = TempDir::new().unwrap();
        let (dir, _library) = library_with(&[]);
        let program = script(bin.path(), "yt-dlp", "echo searching; echo 'no results' >&2; exit 3");
        let downloader = YtDlpDownloader::new(program, dir.path());

        let err = downloader.fetch("x", DownloadSource::YouTube).await.unwrap_err();

        match err {
            LibraryError::Download(output) => {
                assert!(output.contains("searching"), "{output}");
                assert!(output.contains("no results"), "{output}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
