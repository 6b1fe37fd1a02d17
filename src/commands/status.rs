// Status command for reporting what is cached locally

use crate::asset_manager;
use crate::commands::Context;
use crate::config;
use crate::constants;
use crate::ui;
use crate::version::VersionContext;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize)]
struct AssetsInfo {
    version: String,
    riot_client_version: String,
    maps: usize,
    agents: usize,
    missions: usize,
    objectives: usize,
    images: usize,
}

#[derive(Debug, Serialize)]
struct StatusOutput {
    schema_version: u32,
    data_dir: String,
    api_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    assets: Option<AssetsInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assets_error: Option<String>,
    image_version: String,
    cached_images: usize,
}

pub fn status(json: bool) -> anyhow::Result<()> {
    let ctx = Context::load()?;

    let (assets, assets_error) = match asset_manager::stored_slot(&ctx.defaults).get() {
        Ok(stored) => (
            stored.map(|c| AssetsInfo {
                version: c.version.version.clone(),
                riot_client_version: c.version.riot_client_version.clone(),
                maps: c.maps.len(),
                agents: c.agents.len(),
                missions: c.missions.len(),
                objectives: c.objectives.len(),
                images: c.images().len(),
            }),
            None,
        ),
        Err(e) => (None, Some(format!("{:#}", e))),
    };

    let output = StatusOutput {
        schema_version: constants::SCHEMA_VERSION,
        data_dir: config::data_dir().display().to_string(),
        api_url: ctx.settings.api_url.clone(),
        assets,
        assets_error,
        image_version: VersionContext::load(&ctx.defaults).current(),
        cached_images: count_cached_images(&config::images_dir()),
    };

    if json {
        ui::raw(&serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    ui::status("Data", &output.data_dir);
    ui::status("API", &output.api_url);
    match (&output.assets, &output.assets_error) {
        (Some(a), _) => ui::status(
            "Assets",
            &format!(
                "{} ({} maps, {} agents, {} missions, {} objectives, {} images)",
                a.version, a.maps, a.agents, a.missions, a.objectives, a.images
            ),
        ),
        (None, Some(e)) => ui::warning(&format!("Stored assets unreadable: {}", e)),
        (None, None) => ui::dim("No assets stored. Run 'ak load' to download them."),
    }
    if output.image_version.is_empty() {
        ui::status("Images", "version unknown");
    } else {
        ui::status("Images", &format!("checked against {}", output.image_version));
    }
    ui::status("Cached", &format!("{} image file(s)", output.cached_images));
    Ok(())
}

/// Count image files below `dir`, skipping sidecars and partial downloads
fn count_cached_images(dir: &Path) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .map(|path| {
            if path.is_dir() {
                count_cached_images(&path)
            } else {
                match path.extension().and_then(|e| e.to_str()) {
                    Some("json") | Some("download") => 0,
                    _ => 1,
                }
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_count_skips_sidecars() {
        let dir = TempDir::new().unwrap();
        let agents = dir.path().join("media.example/agents/jett");
        fs::create_dir_all(&agents).unwrap();
        fs::write(agents.join("icon.png"), b"png").unwrap();
        fs::write(agents.join("icon.png.json"), b"{}").unwrap();
        fs::write(agents.join("bust.png.download"), b"partial").unwrap();
        fs::write(dir.path().join("abc.img"), b"img").unwrap();

        assert_eq!(count_cached_images(dir.path()), 2);
        assert_eq!(count_cached_images(&dir.path().join("missing")), 0);
    }
}
