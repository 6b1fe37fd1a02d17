// Test double for the asset service that counts every call

use crate::assets::collection::fixtures;
use crate::assets::{AssetCollection, AssetDownloadProgress, AssetImage, AssetVersion};
use crate::client::{AssetClient, ProgressCallback};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// PNG bytes of a `width` x `height` transparent image
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::RgbaImage::new(width, height)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

pub struct MockClient {
    version: Mutex<String>,
    payload: Mutex<Vec<u8>>,
    replaced: AtomicBool,
    fail_version: AtomicBool,
    fail_download: AtomicBool,
    fail_collect: AtomicBool,
    version_calls: AtomicUsize,
    download_calls: AtomicUsize,
    collect_calls: AtomicUsize,
}

impl MockClient {
    pub fn new(version: &str) -> Self {
        Self {
            version: Mutex::new(version.to_string()),
            payload: Mutex::new(png_bytes(2, 2)),
            replaced: AtomicBool::new(true),
            fail_version: AtomicBool::new(false),
            fail_download: AtomicBool::new(false),
            fail_collect: AtomicBool::new(false),
            version_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
            collect_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_version(&self, version: &str) {
        *self.version.lock() = version.to_string();
    }

    pub fn set_payload(&self, payload: Vec<u8>) {
        *self.payload.lock() = payload;
    }

    pub fn set_replaced(&self, replaced: bool) {
        self.replaced.store(replaced, Ordering::SeqCst);
    }

    pub fn fail_version(&self, fail: bool) {
        self.fail_version.store(fail, Ordering::SeqCst);
    }

    pub fn fail_download(&self, fail: bool) {
        self.fail_download.store(fail, Ordering::SeqCst);
    }

    pub fn fail_collect(&self, fail: bool) {
        self.fail_collect.store(fail, Ordering::SeqCst);
    }

    pub fn version_calls(&self) -> usize {
        self.version_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    pub fn collect_calls(&self) -> usize {
        self.collect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetClient for MockClient {
    async fn get_current_version(&self) -> anyhow::Result<AssetVersion> {
        self.version_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail_version.load(Ordering::SeqCst) {
            anyhow::bail!("version endpoint unavailable");
        }
        Ok(fixtures::version(&self.version.lock()))
    }

    async fn ensure_downloaded(&self, image: &AssetImage, path: &Path) -> anyhow::Result<bool> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.fail_download.load(Ordering::SeqCst) {
            anyhow::bail!("could not reach {}", image.url());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let payload = self.payload.lock().clone();
        std::fs::write(path, payload)?;
        Ok(self.replaced.load(Ordering::SeqCst))
    }

    async fn collect_assets(
        &self,
        version: &AssetVersion,
        on_progress: Option<ProgressCallback<'_>>,
    ) -> anyhow::Result<AssetCollection> {
        self.collect_calls.fetch_add(1, Ordering::SeqCst);
        for completed in 0..=2 {
            if let Some(callback) = on_progress {
                callback(AssetDownloadProgress::new(completed, 2));
            }
            tokio::task::yield_now().await;
        }
        if self.fail_collect.load(Ordering::SeqCst) {
            anyhow::bail!("catalogue download failed");
        }
        let mut collection = fixtures::collection(&version.riot_client_version);
        collection.version = version.clone();
        Ok(collection)
    }
}
