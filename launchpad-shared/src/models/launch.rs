use serde::{Deserialize, Serialize};

/// Provider flight number, also used as the listing cursor.
pub type LaunchId = i64;

/// A launch as published by the launch-data provider.
/// Read-only from the API's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Launch {
    pub id: LaunchId,
    pub site: Option<String>,
    pub mission: Option<Mission>,
    pub rocket: Option<Rocket>,
}

impl Launch {
    /// Opaque pagination marker for this launch.
    pub fn cursor(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub name: Option<String>,
    pub mission_patch_small: Option<String>,
    pub mission_patch_large: Option<String>,
}

impl Mission {
    pub fn patch(&self, size: PatchSize) -> Option<&str> {
        match size {
            PatchSize::Small => self.mission_patch_small.as_deref(),
            PatchSize::Large => self.mission_patch_large.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rocket {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub rocket_type: Option<String>,
}

/// Mission patch variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatchSize {
    Small,
    #[default]
    Large,
}
