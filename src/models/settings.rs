use serde::{Deserialize, Serialize};

/// Per-user desktop preferences (one row per user)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSettings {
    pub id: i64,
    pub dark_mode: bool,
    pub wallpaper: Option<String>,
    pub user_id: i64,
}

/// Partial update accepted by `PUT /api/settings`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub dark_mode: Option<bool>,
    pub wallpaper: Option<String>,
}

/// Settings as returned to the client
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettingsResponse {
    pub dark_mode: bool,
    pub wallpaper: Option<String>,
}

impl SettingsResponse {
    /// Apply a partial update; absent fields keep their current value
    pub fn merged(mut self, update: &SettingsUpdate) -> Self {
        if let Some(dark_mode) = update.dark_mode {
            self.dark_mode = dark_mode;
        }
        if let Some(wallpaper) = &update.wallpaper {
            self.wallpaper = Some(wallpaper.clone()).filter(|w| !w.is_empty());
        }
        self
    }
}

impl From<UserSettings> for SettingsResponse {
    fn from(settings: UserSettings) -> Self {
        Self {
            dark_mode: settings.dark_mode,
            wallpaper: settings.wallpaper,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_keeps_absent_fields() {
        let current = SettingsResponse {
            dark_mode: true,
            wallpaper: Some("dunes.jpg".to_string()),
        };
        let merged = current.clone().merged(&SettingsUpdate::default());
        assert_eq!(merged, current);
    }

    #[test]
    fn test_merged_applies_fields() {
        let update = SettingsUpdate {
            dark_mode: Some(true),
            wallpaper: Some("forest.png".to_string()),
        };
        let merged = SettingsResponse::default().merged(&update);
        assert!(merged.dark_mode);
        assert_eq!(merged.wallpaper.as_deref(), Some("forest.png"));
    }

    #[test]
    fn test_merged_empty_wallpaper_clears() {
        let current = SettingsResponse {
            dark_mode: false,
            wallpaper: Some("dunes.jpg".to_string()),
        };
        let update = SettingsUpdate {
            dark_mode: None,
            wallpaper: Some(String::new()),
        };
        assert_eq!(current.merged(&update).wallpaper, None);
    }
}
