// Load command for bringing the stored asset collection up to date

use crate::asset_manager::{self, AssetSnapshot, LoadOutcome};
use crate::assets::{AssetCollection, AssetDownloadProgress};
use crate::commands::Context;
use crate::ui;
use log::debug;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub async fn load(force: bool) -> anyhow::Result<()> {
    let ctx = Context::load()?;
    let pb = ui::progress_bar(0, "Loading assets");

    let result = if force {
        let on_progress = |progress| ui::show_progress(&pb, progress);
        asset_manager::fetch_assets(
            ctx.client.as_ref(),
            &asset_manager::stored_slot(&ctx.defaults),
            true,
            Some(&on_progress),
        )
        .await
    } else {
        let manager = ctx.asset_manager();
        let updates = manager.subscribe();
        let task = manager.spawn_load();
        follow_load(task, updates, |progress| ui::show_progress(&pb, progress))
            .await
            .map(|assets| AssetCollection::clone(&assets))
    };

    let collection = match result {
        Ok(collection) => collection,
        Err(e) => {
            ui::finish_error(&pb, "Could not load assets");
            return Err(e);
        }
    };

    // images are now validated against the version these assets came from
    ctx.image_manager().set_version(&collection.version);
    debug!("Image version set to {}", collection.version.riot_client_version);

    ui::finish_success(
        &pb,
        &format!(
            "Assets {} ({} maps, {} agents, {} missions, {} objectives)",
            collection.version.version,
            collection.maps.len(),
            collection.agents.len(),
            collection.missions.len(),
            collection.objectives.len()
        ),
    );
    Ok(())
}

/// Report progress of a spawned load until its task finishes.
async fn follow_load(
    mut task: JoinHandle<LoadOutcome>,
    mut updates: watch::Receiver<AssetSnapshot>,
    on_progress: impl Fn(AssetDownloadProgress),
) -> anyhow::Result<Arc<AssetCollection>> {
    let mut watching = true;
    let outcome = loop {
        tokio::select! {
            joined = &mut task => break joined?,
            changed = updates.changed(), if watching => {
                if changed.is_err() {
                    watching = false;
                    continue;
                }
                let progress = updates.borrow_and_update().progress;
                if let Some(progress) = progress {
                    on_progress(progress);
                }
            }
        }
    };
    outcome.map_err(|e| anyhow::anyhow!("{:#}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::collection::fixtures;
    use parking_lot::Mutex;

    #[tokio::test]
    async fn test_follow_load_reports_progress() {
        let (tx, rx) = watch::channel(AssetSnapshot::default());
        let (go, wait) = tokio::sync::oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            tx.send_modify(|s| s.progress = Some(AssetDownloadProgress::new(1, 2)));
            // finish only once the progress was seen
            let _ = wait.await;
            let outcome: LoadOutcome = Ok(Arc::new(fixtures::collection("v1")));
            outcome
        });

        let go = Mutex::new(Some(go));
        let seen = Mutex::new(Vec::new());
        let assets = follow_load(task, rx, |progress| {
            seen.lock().push(progress);
            if let Some(go) = go.lock().take() {
                let _ = go.send(());
            }
        })
        .await
        .unwrap();

        assert_eq!(assets.version.riot_client_version, "v1");
        assert_eq!(seen.into_inner(), [AssetDownloadProgress::new(1, 2)]);
    }

    #[tokio::test]
    async fn test_follow_load_returns_load_error() {
        let (_tx, rx) = watch::channel(AssetSnapshot::default());
        let task = tokio::spawn(async {
            let outcome: LoadOutcome = Err(Arc::new(anyhow::anyhow!("api offline")));
            outcome
        });

        let err = follow_load(task, rx, |_| {}).await.unwrap_err();
        assert!(err.to_string().contains("api offline"));
    }

    #[tokio::test]
    async fn test_follow_load_ends_when_task_panics() {
        // the sender stays alive, so updates alone would never end
        let (_tx, rx) = watch::channel(AssetSnapshot::default());
        let task: JoinHandle<LoadOutcome> = tokio::spawn(async { panic!("load task died") });

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            follow_load(task, rx, |_| {}),
        )
        .await
        .expect("follow_load should not hang");

        assert!(result.is_err());
    }
}
