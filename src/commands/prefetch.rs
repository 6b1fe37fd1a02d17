// Prefetch command for downloading every image of the stored collection

use crate::asset_manager;
use crate::commands::Context;
use crate::image_manager::ImageState;
use crate::ui;
use log::{debug, warn};

pub async fn prefetch(jobs: Option<usize>) -> anyhow::Result<i32> {
    let ctx = Context::load()?;
    let collection = asset_manager::stored_slot(&ctx.defaults)
        .get()?
        .ok_or_else(|| anyhow::anyhow!("No assets stored. Run 'ak load' first."))?;

    let manager = ctx.image_manager();
    if let Err(e) = manager.refresh_version().await {
        warn!("Using stored image version: {:#}", e);
    }

    let mut images: Vec<_> = collection.images().into_iter().collect();
    images.sort();
    let jobs = jobs.unwrap_or(ctx.settings.prefetch_jobs).max(1);
    debug!("Prefetching {} image(s) with {} job(s)", images.len(), jobs);

    let pb = ui::progress_bar(images.len() as u64, "Prefetching images");
    let summary = manager
        .prefetch(images, jobs, |image, state| {
            if let Some(ImageState::Errored(e)) = state {
                pb.suspend(|| ui::warning(&format!("{}: {:#}", image, e)));
            }
            pb.inc(1);
        })
        .await;

    if summary.errored > 0 || summary.pending > 0 {
        let mut message = format!(
            "{} image(s) available, {} failed",
            summary.available, summary.errored
        );
        if summary.pending > 0 {
            message.push_str(&format!(", {} still downloading", summary.pending));
        }
        ui::finish_error(&pb, &message);
        Ok(1)
    } else {
        ui::finish_success(&pb, &format!("{} image(s) available", summary.available));
        Ok(0)
    }
}
