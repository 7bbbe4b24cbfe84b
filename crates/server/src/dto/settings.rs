//! # Team Settings DTOs

use entity::team_settings;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::timestamp;

/// Partial update of the team settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(range(min = 2, max = 10, message = "Team size must be between 2 and 10"))]
    pub default_max_members: Option<i32>,
    pub team_creation_open:  Option<bool>,
    pub joining_open:        Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub success:             bool,
    pub default_max_members: i32,
    pub team_creation_open:  bool,
    pub joining_open:        bool,
    pub updated_at:          String,
}

impl From<team_settings::Model> for SettingsResponse {
    fn from(settings: team_settings::Model) -> Self {
        Self {
            success:             true,
            default_max_members: settings.default_max_members,
            team_creation_open:  settings.team_creation_open,
            joining_open:        settings.joining_open,
            updated_at:          timestamp(&settings.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_size_bounds() {
        let req = UpdateSettingsRequest {
            default_max_members: Some(1),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateSettingsRequest {
            default_max_members: Some(4),
            joining_open: Some(false),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }
}
