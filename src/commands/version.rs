// Version command for refreshing the image version

use crate::commands::Context;
use crate::ui;

pub async fn version() -> anyhow::Result<()> {
    let ctx = Context::load()?;
    let manager = ctx.image_manager();
    let previous = manager.version().current();

    let spinner = ui::spinner("Fetching current version");
    let version = match manager.refresh_version().await {
        Ok(version) => version,
        Err(e) => {
            ui::finish_error(&spinner, "Could not fetch current version");
            return Err(e);
        }
    };

    if previous == version.riot_client_version {
        ui::finish_success(&spinner, &format!("{} (unchanged)", version.version));
    } else {
        ui::finish_success(&spinner, &format!("{}", version.version));
        ui::dim(&format!("Images will be checked against {}", version.riot_client_version));
    }
    Ok(())
}
