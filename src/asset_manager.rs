// Asset manager: keeps the whole collection in step with the remote version

use crate::assets::{AssetCollection, AssetDownloadProgress};
use crate::client::{AssetClient, ProgressCallback};
use crate::constants;
use crate::defaults::{Defaults, Slot};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Outcome every caller of a (possibly shared) load receives
pub type LoadOutcome = Result<Arc<AssetCollection>, Arc<anyhow::Error>>;

/// What observers of an [`AssetManager`] see.
#[derive(Debug, Clone, Default)]
pub struct AssetSnapshot {
    pub assets: Option<Arc<AssetCollection>>,
    pub progress: Option<AssetDownloadProgress>,
    pub error: Option<Arc<anyhow::Error>>,
}

#[derive(Clone)]
pub struct AssetManager {
    inner: Arc<Inner>,
}

struct Inner {
    client: Arc<dyn AssetClient>,
    stored: Slot<AssetCollection>,
    state: watch::Sender<AssetSnapshot>,
    in_flight: Mutex<Option<Shared<BoxFuture<'static, LoadOutcome>>>>,
}

impl AssetManager {
    pub fn new(client: Arc<dyn AssetClient>, defaults: &Defaults) -> Self {
        let (state, _) = watch::channel(AssetSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                client,
                stored: stored_slot(defaults),
                state,
                in_flight: Mutex::new(None),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AssetSnapshot> {
        self.inner.state.subscribe()
    }

    /// Load the collection, reusing the stored one when its version is
    /// still current.
    ///
    /// Calls made while a load is running join that load instead of
    /// starting another one.
    pub async fn load_assets(&self) -> LoadOutcome {
        let load = {
            let mut in_flight = self.inner.in_flight.lock();
            match in_flight.as_ref() {
                Some(load) => {
                    debug!("Joining asset load already in progress");
                    load.clone()
                }
                None => {
                    let inner = self.inner.clone();
                    let load = async move { inner.run_load().await }.boxed().shared();
                    *in_flight = Some(load.clone());
                    load
                }
            }
        };
        load.await
    }

    /// Run [`load_assets`](Self::load_assets) on the runtime and hand back
    /// its task.
    pub fn spawn_load(&self) -> JoinHandle<LoadOutcome> {
        let manager = self.clone();
        tokio::spawn(async move { manager.load_assets().await })
    }
}

impl Inner {
    async fn run_load(&self) -> LoadOutcome {
        let on_progress = |progress: AssetDownloadProgress| {
            debug!("Asset download progress: {}", progress);
            self.state.send_modify(|s| s.progress = Some(progress));
        };

        let outcome = fetch_assets(
            self.client.as_ref(),
            &self.stored,
            false,
            Some(&on_progress),
        )
        .await
        .map(Arc::new)
        .map_err(Arc::new);

        self.state.send_modify(|s| {
            match &outcome {
                Ok(assets) => {
                    s.assets = Some(assets.clone());
                    s.error = None;
                }
                Err(e) => s.error = Some(e.clone()),
            }
            s.progress = None;
        });
        self.in_flight.lock().take();
        outcome
    }
}

pub fn stored_slot(defaults: &Defaults) -> Slot<AssetCollection> {
    defaults.slot(constants::STORED_ASSETS_SLOT)
}

/// One-shot collection load without a manager.
///
/// Fetches the current version, returns the stored collection if it was
/// fetched under that version (unless `force_update`), and otherwise
/// downloads and stores a fresh one.
pub async fn fetch_assets(
    client: &dyn AssetClient,
    stored: &Slot<AssetCollection>,
    force_update: bool,
    on_progress: Option<ProgressCallback<'_>>,
) -> anyhow::Result<AssetCollection> {
    let version = client.get_current_version().await?;

    if !force_update {
        match stored.get() {
            Ok(Some(collection)) if collection.version == version => {
                debug!("Stored assets match version {}", version.version);
                return Ok(collection);
            }
            Ok(_) => {}
            Err(e) => warn!("Ignoring unreadable stored assets: {:#}", e),
        }
    }

    info!("Downloading assets for version {}", version.version);
    let collection = client
        .collect_assets(&version, on_progress)
        .await
        .inspect_err(|e| error!("Asset download failed: {:#}", e))?;

    if let Err(e) = stored.set(&collection) {
        warn!("Could not store downloaded assets: {:#}", e);
    }
    Ok(collection)
}
