use serde::{Deserialize, Serialize};

use crate::constants::{PLACEHOLDER_HASHTAGS, PLACEHOLDER_SUGGESTED_TIME, UPLOADS_URL_PREFIX};

/// Result payload returned for an accepted caption upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionResult {
    pub caption: String,
    pub hashtags: Vec<String>,
    pub original_url: String,
    pub processed_url: String,
    pub suggested_time: String,
}

impl CaptionResult {
    /// Build the fixed placeholder result for a stored upload
    ///
    /// No media analysis happens: the caption only interpolates the form
    /// fields and the processed URL is the original file.
    pub fn placeholder(platform: &str, style: &str, stored_name: &str) -> Self {
        let url = format!("{}/{}", UPLOADS_URL_PREFIX, stored_name);
        Self {
            caption: format!("Sample caption for {} in {} style", platform, style),
            hashtags: PLACEHOLDER_HASHTAGS.iter().map(|t| t.to_string()).collect(),
            original_url: url.clone(),
            processed_url: url,
            suggested_time: PLACEHOLDER_SUGGESTED_TIME.to_string(),
        }
    }
}
