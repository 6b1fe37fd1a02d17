// Clear command for removing cached images and, optionally, stored assets

use crate::asset_manager;
use crate::commands::Context;
use crate::ui;

pub fn clear(assets: bool) -> anyhow::Result<()> {
    let ctx = Context::load()?;
    let manager = ctx.image_manager();
    manager.clear();
    ui::success(&format!("Cleared {}", manager.root().display()));

    if assets {
        asset_manager::stored_slot(&ctx.defaults).remove()?;
        ui::success("Forgot stored assets");
    }
    Ok(())
}
