// Image command for fetching a single image into the cache

use crate::assets::AssetImage;
use crate::commands::Context;
use crate::image_manager::{ImageEvent, ImageState};
use crate::ui;
use log::{debug, warn};

pub async fn image(url: String) -> anyhow::Result<i32> {
    let ctx = Context::load()?;
    let manager = ctx.image_manager();
    if let Err(e) = manager.refresh_version().await {
        warn!("Using stored image version: {:#}", e);
    }

    let image = AssetImage::new(url);
    let mut events = manager.subscribe();
    let lookup = manager.image(Some(&image));
    if lookup.image.is_some() {
        ui::dim("Cached copy on hand");
    }
    if let Some(download) = lookup.download {
        download.await?;
    }
    while let Ok(event) = events.try_recv() {
        match event {
            ImageEvent::Changed {
                image: changed,
                state,
            } if changed == image => debug!("{} is {}", changed, state.label()),
            ImageEvent::Changed { .. } => {}
            ImageEvent::Cleared => debug!("Image cache cleared"),
        }
    }

    let path = image.local_path(manager.root());
    match manager.state(&image) {
        Some(ImageState::Errored(e)) => {
            ui::error(&format!("{}: {:#}", image, e));
            Ok(1)
        }
        Some(state) => {
            ui::status("State", state.label());
            ui::status("Path", &path.display().to_string());
            match manager.cached_image(&image) {
                Some(decoded) => ui::success(&format!(
                    "{}x{} image",
                    decoded.width(),
                    decoded.height()
                )),
                None => ui::warning("File could not be decoded as an image"),
            }
            Ok(0)
        }
        None => {
            ui::error(&format!("{}: download did not start", image));
            Ok(1)
        }
    }
}
