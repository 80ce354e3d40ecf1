// Tests for the directory-backed frame source and the source factory

use signstream::{CameraSource, DirectoryFrameSource, FrameSource, FrameSourceFactory};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn frame_dir(names: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for name in names {
        fs::write(dir.path().join(name), format!("jpeg-{}", name)).expect("write frame");
    }
    dir
}

#[tokio::test]
async fn test_reads_frames_in_sorted_order_and_wraps() {
    let dir = frame_dir(&["b.jpg", "a.jpg", "c.jpg"]);
    let mut source = DirectoryFrameSource::new(dir.path().to_path_buf(), Duration::ZERO);

    source.open().await.unwrap();
    assert!(source.is_open());

    let first = source.read_frame().await.unwrap();
    assert_eq!(first.jpeg, b"jpeg-a.jpg");
    assert_eq!(first.sequence, 0);

    let second = source.read_frame().await.unwrap();
    assert_eq!(second.jpeg, b"jpeg-b.jpg");

    let third = source.read_frame().await.unwrap();
    assert_eq!(third.jpeg, b"jpeg-c.jpg");

    // Wraps back to the first file; sequence keeps counting
    let fourth = source.read_frame().await.unwrap();
    assert_eq!(fourth.jpeg, b"jpeg-a.jpg");
    assert_eq!(fourth.sequence, 3);
}

#[tokio::test]
async fn test_ignores_non_jpeg_files() {
    let dir = frame_dir(&["frame.jpg", "notes.txt", "image.png"]);
    let mut source = DirectoryFrameSource::new(dir.path().to_path_buf(), Duration::ZERO);

    source.open().await.unwrap();
    let frame = source.read_frame().await.unwrap();
    assert_eq!(frame.jpeg, b"jpeg-frame.jpg");

    // Only one eligible file, so reads wrap onto it
    let frame = source.read_frame().await.unwrap();
    assert_eq!(frame.jpeg, b"jpeg-frame.jpg");
}

#[tokio::test]
async fn test_open_fails_on_empty_directory() {
    let dir = TempDir::new().unwrap();
    let mut source = DirectoryFrameSource::new(dir.path().to_path_buf(), Duration::ZERO);

    assert!(source.open().await.is_err());
    assert!(!source.is_open());
}

#[tokio::test]
async fn test_open_fails_on_missing_directory() {
    let mut source =
        DirectoryFrameSource::new(PathBuf::from("/nonexistent/frames"), Duration::ZERO);
    assert!(source.open().await.is_err());
}

#[tokio::test]
async fn test_read_after_close_fails() {
    let dir = frame_dir(&["a.jpg"]);
    let mut source = DirectoryFrameSource::new(dir.path().to_path_buf(), Duration::ZERO);

    source.open().await.unwrap();
    source.close();
    assert!(!source.is_open());
    assert!(source.read_frame().await.is_err());
}

#[test]
fn test_factory_rejects_device_source_without_backend() {
    let result = FrameSourceFactory::create(CameraSource::Device(0), Duration::ZERO);
    assert!(result.is_err());
}

#[test]
fn test_factory_creates_directory_source() {
    let dir = TempDir::new().unwrap();
    let source =
        FrameSourceFactory::create(CameraSource::Directory(dir.path().to_path_buf()), Duration::ZERO)
            .unwrap();
    assert_eq!(source.name(), "directory");
}
