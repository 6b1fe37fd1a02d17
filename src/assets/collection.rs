// Versioned asset collection and the catalogue entries it holds

use super::AssetImage;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub type MapId = String;
pub type AgentId = String;
pub type MissionId = String;
pub type ObjectiveId = String;

/// Remote asset revision. Two collections are interchangeable only when
/// every field matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetVersion {
    pub manifest_id: String,
    pub branch: String,
    pub version: String,
    pub build_version: String,
    pub engine_version: String,
    pub riot_client_version: String,
    pub riot_client_build: String,
    pub build_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapInfo {
    pub uuid: String,
    pub display_name: String,
    /// In-game path, which is how match data refers to maps
    pub map_url: MapId,
    #[serde(default)]
    pub coordinates: Option<String>,
    #[serde(default)]
    pub display_icon: Option<AssetImage>,
    #[serde(default)]
    pub list_view_icon: Option<AssetImage>,
    #[serde(default)]
    pub splash: Option<AssetImage>,
}

impl MapInfo {
    pub fn images(&self) -> impl Iterator<Item = &AssetImage> {
        [&self.display_icon, &self.list_view_icon, &self.splash]
            .into_iter()
            .flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInfo {
    pub uuid: AgentId,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub developer_name: String,
    pub display_icon: AssetImage,
    #[serde(default)]
    pub bust_portrait: Option<AssetImage>,
    #[serde(default)]
    pub full_portrait: Option<AssetImage>,
    #[serde(default)]
    pub killfeed_portrait: Option<AssetImage>,
    #[serde(default)]
    pub role: Option<AgentRole>,
    #[serde(default)]
    pub abilities: Vec<AgentAbility>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRole {
    pub uuid: String,
    pub display_name: String,
    #[serde(default)]
    pub display_icon: Option<AssetImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAbility {
    pub slot: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub display_icon: Option<AssetImage>,
}

impl AgentInfo {
    pub fn images(&self) -> impl Iterator<Item = &AssetImage> {
        std::iter::once(&self.display_icon)
            .chain(
                [
                    &self.bust_portrait,
                    &self.full_portrait,
                    &self.killfeed_portrait,
                ]
                .into_iter()
                .flatten(),
            )
            .chain(self.role.iter().filter_map(|r| r.display_icon.as_ref()))
            .chain(self.abilities.iter().filter_map(|a| a.display_icon.as_ref()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionInfo {
    pub uuid: MissionId,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub xp_grant: u32,
    #[serde(default)]
    pub progress_to_complete: u32,
    #[serde(default)]
    pub activation_date: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub objectives: Option<Vec<MissionObjective>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionObjective {
    pub objective_uuid: ObjectiveId,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveInfo {
    pub uuid: ObjectiveId,
    #[serde(default)]
    pub directive: Option<String>,
    #[serde(default)]
    pub asset_path: String,
}

/// Everything downloaded for one remote version, keyed by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetCollection {
    pub version: AssetVersion,
    pub maps: BTreeMap<MapId, MapInfo>,
    pub agents: BTreeMap<AgentId, AgentInfo>,
    pub missions: BTreeMap<MissionId, MissionInfo>,
    pub objectives: BTreeMap<ObjectiveId, ObjectiveInfo>,
}

impl AssetCollection {
    pub fn from_parts(
        version: AssetVersion,
        maps: Vec<MapInfo>,
        agents: Vec<AgentInfo>,
        missions: Vec<MissionInfo>,
        objectives: Vec<ObjectiveInfo>,
    ) -> Self {
        Self {
            version,
            maps: maps.into_iter().map(|m| (m.map_url.clone(), m)).collect(),
            agents: agents.into_iter().map(|a| (a.uuid.clone(), a)).collect(),
            missions: missions.into_iter().map(|m| (m.uuid.clone(), m)).collect(),
            objectives: objectives.into_iter().map(|o| (o.uuid.clone(), o)).collect(),
        }
    }

    /// Every image referenced by maps and agents, for prefetching.
    pub fn images(&self) -> HashSet<AssetImage> {
        self.maps
            .values()
            .flat_map(|m| m.images())
            .chain(self.agents.values().flat_map(|a| a.images()))
            .cloned()
            .collect()
    }
}
