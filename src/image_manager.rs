// Image manager: per-image cache-aside over the local image directory

use crate::assets::{AssetImage, AssetVersion, ImageMetadata};
use crate::client::AssetClient;
use crate::version::VersionContext;
use futures::StreamExt;
use image::DynamicImage;
use log::{debug, error, warn};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// A decoded image shared between everyone who asked for it
pub type DecodedImage = Arc<DynamicImage>;

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum ImageState {
    Downloading,
    Available,
    Errored(Arc<anyhow::Error>),
}

impl ImageState {
    pub fn label(&self) -> &'static str {
        match self {
            ImageState::Downloading => "downloading",
            ImageState::Available => "available",
            ImageState::Errored(_) => "errored",
        }
    }
}

/// Published whenever an image's state changes.
#[derive(Debug, Clone)]
pub enum ImageEvent {
    Changed { image: AssetImage, state: ImageState },
    Cleared,
}

/// Result of a non-blocking image lookup.
#[derive(Debug, Default)]
pub struct ImageLookup {
    /// Best decoded image currently on hand, possibly stale
    pub image: Option<DecodedImage>,
    /// Download started by this lookup, if any
    pub download: Option<JoinHandle<()>>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchSummary {
    pub available: usize,
    pub errored: usize,
    /// Still downloading elsewhere when the batch finished
    pub pending: usize,
}

#[derive(Clone)]
pub struct ImageManager {
    inner: Arc<Inner>,
}

struct Inner {
    client: Arc<dyn AssetClient>,
    root: PathBuf,
    version: Arc<VersionContext>,
    states: Mutex<HashMap<AssetImage, ImageState>>,
    // None means decoding was attempted and failed
    cached: Mutex<HashMap<AssetImage, Option<DecodedImage>>>,
    in_progress: Mutex<HashSet<AssetImage>>,
    events: broadcast::Sender<ImageEvent>,
}

/// Marks an image as being downloaded until dropped.
struct InProgress<'a> {
    set: &'a Mutex<HashSet<AssetImage>>,
    image: AssetImage,
}

impl<'a> InProgress<'a> {
    fn acquire(set: &'a Mutex<HashSet<AssetImage>>, image: &AssetImage) -> Option<Self> {
        set.lock().insert(image.clone()).then(|| Self {
            set,
            image: image.clone(),
        })
    }
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.set.lock().remove(&self.image);
    }
}

impl ImageManager {
    pub fn new(
        client: Arc<dyn AssetClient>,
        root: impl Into<PathBuf>,
        version: Arc<VersionContext>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                client,
                root: root.into(),
                version,
                states: Mutex::new(HashMap::new()),
                cached: Mutex::new(HashMap::new()),
                in_progress: Mutex::new(HashSet::new()),
                events,
            }),
        }
    }

    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    pub fn version(&self) -> &VersionContext {
        &self.inner.version
    }

    /// Fetch the remote version and validate images against it from now on.
    pub async fn refresh_version(&self) -> anyhow::Result<AssetVersion> {
        self.inner.version.refresh(self.inner.client.as_ref()).await
    }

    pub fn set_version(&self, version: &AssetVersion) {
        self.inner.version.set_asset_version(version);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ImageEvent> {
        self.inner.events.subscribe()
    }

    pub fn state(&self, image: &AssetImage) -> Option<ImageState> {
        self.inner.states.lock().get(image).cloned()
    }

    /// Get an image without waiting, starting a download when it has never
    /// been requested or the last attempt failed.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn image(&self, image: Option<&AssetImage>) -> ImageLookup {
        let Some(image) = image else {
            return ImageLookup::default();
        };

        let download = match self.state(image) {
            Some(ImageState::Available | ImageState::Downloading) => None,
            None | Some(ImageState::Errored(_)) => {
                let manager = self.clone();
                let image = image.clone();
                Some(tokio::spawn(async move { manager.download(&image).await }))
            }
        };

        ImageLookup {
            image: self.cached_image(image),
            download,
        }
    }

    /// Decoded image from memory or disk. Never touches the network and
    /// may be outdated.
    pub fn cached_image(&self, image: &AssetImage) -> Option<DecodedImage> {
        if let Some(cached) = self.inner.cached.lock().get(image) {
            return cached.clone();
        }

        let path = image.local_path(&self.inner.root);
        let decoded = match image::open(&path) {
            Ok(decoded) => Some(Arc::new(decoded)),
            Err(e) => {
                debug!("Could not decode {}: {}", path.display(), e);
                None
            }
        };
        self.inner
            .cached
            .lock()
            .insert(image.clone(), decoded.clone());
        decoded
    }

    pub async fn download(&self, image: &AssetImage) {
        match self.state(image) {
            None | Some(ImageState::Errored(_)) => {}
            Some(ImageState::Downloading | ImageState::Available) => return,
        }

        let Some(_guard) = InProgress::acquire(&self.inner.in_progress, image) else {
            return;
        };

        let root = &self.inner.root;
        let version = self.inner.version.current();

        if image.has_metadata(root) {
            match image.load_metadata(root) {
                Ok(meta) if meta.last_version_checked_against == version => {
                    self.set_state(image, ImageState::Available);
                    return;
                }
                Ok(_) => {}
                Err(e) => warn!("Could not load metadata for {}: {:#}", image, e),
            }
        }

        self.set_state(image, ImageState::Downloading);
        let path = image.local_path(root);
        match self.inner.client.ensure_downloaded(image, &path).await {
            Ok(replaced) => {
                if replaced {
                    self.inner.cached.lock().remove(image);
                }
                self.set_state(image, ImageState::Available);
            }
            Err(e) => {
                error!(
                    "Error loading image from {} stored at {}: {:#}",
                    image,
                    path.display(),
                    e
                );
                self.set_state(image, ImageState::Errored(Arc::new(e)));
                return;
            }
        }

        let mut meta = image
            .load_metadata(root)
            .unwrap_or_else(|_| ImageMetadata::new(&version));
        meta.last_version_checked_against = version;
        if let Err(e) = image.save_metadata(root, &meta) {
            warn!("Could not save metadata for {}: {:#}", image, e);
        }
    }

    /// Download a batch of images, at most `jobs` at a time.
    pub async fn prefetch<I>(
        &self,
        images: I,
        jobs: usize,
        on_done: impl Fn(&AssetImage, Option<&ImageState>) + Sync,
    ) -> PrefetchSummary
    where
        I: IntoIterator<Item = AssetImage>,
    {
        let summary = Mutex::new(PrefetchSummary::default());
        futures::stream::iter(images)
            .for_each_concurrent(jobs.max(1), |image| {
                let summary = &summary;
                let on_done = &on_done;
                async move {
                    self.download(&image).await;
                    // another caller may hold the download, or a clear raced it
                    let state = self.state(&image);
                    match &state {
                        Some(ImageState::Available) => summary.lock().available += 1,
                        Some(ImageState::Errored(_)) => summary.lock().errored += 1,
                        Some(ImageState::Downloading) | None => summary.lock().pending += 1,
                    }
                    on_done(&image, state.as_ref());
                }
            })
            .await;
        summary.into_inner()
    }

    /// Forget every state and decoded image, and delete all cached files.
    pub fn clear(&self) {
        self.inner.states.lock().clear();
        self.inner.cached.lock().clear();
        match std::fs::remove_dir_all(&self.inner.root) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                warn!("Could not remove {}: {}", self.inner.root.display(), e);
            }
            _ => {}
        }
        let _ = self.inner.events.send(ImageEvent::Cleared);
        // in-flight downloads may still set a state right after this
    }

    fn set_state(&self, image: &AssetImage, state: ImageState) {
        self.inner
            .states
            .lock()
            .insert(image.clone(), state.clone());
        let _ = self.inner.events.send(ImageEvent::Changed {
            image: image.clone(),
            state,
        });
    }
}
