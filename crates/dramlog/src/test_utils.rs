use crate::cache::ImageCache;
use crate::store::sqlite::SqliteStore;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub store: SqliteStore,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let store = SqliteStore::open(root.join("diary.sqlite3")).expect("failed to open store");
        Self {
            _temp_dir: temp_dir,
            store,
            root,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join("diary.sqlite3")
    }
}

pub fn test_cache() -> Arc<ImageCache> {
    Arc::new(ImageCache::new(16, Duration::from_secs(5)).expect("failed to build image cache"))
}

/// A small 4x4 JPEG.
pub fn jpeg_bytes() -> Vec<u8> {
    encode(ImageFormat::Jpeg)
}

/// A small 4x4 PNG.
pub fn png_bytes() -> Vec<u8> {
    encode(ImageFormat::Png)
}

fn encode(format: ImageFormat) -> Vec<u8> {
    let pixels = RgbImage::from_pixel(4, 4, Rgb([180, 120, 40]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(pixels)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .expect("failed to encode test image");
    bytes
}
