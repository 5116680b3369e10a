use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File metadata row owned by a desktop user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FileRecord {
    pub id: i64,
    pub filename: String,
    pub path: String,
    pub size: Option<i64>,
    #[sqlx(rename = "type")]
    pub file_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: i64,
}

/// Fields needed to record a file
#[derive(Debug, Clone)]
pub struct NewFile {
    pub filename: String,
    pub path: String,
    pub size: Option<i64>,
    pub file_type: Option<String>,
    pub user_id: i64,
}

/// File listing entry as returned by `GET /api/files`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResponse {
    pub id: i64,
    pub filename: String,
    pub path: String,
    pub size: Option<i64>,
    #[serde(rename = "type")]
    pub file_type: Option<String>,
    pub created_at: String,
}

impl From<FileRecord> for FileResponse {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            filename: record.filename,
            path: record.path,
            size: record.size,
            file_type: record.file_type,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_response_from_record() {
        let created_at = DateTime::from_timestamp(1_733_788_800, 0).unwrap();
        let record = FileRecord {
            id: 3,
            filename: "notes.txt".to_string(),
            path: "/home/alice/notes.txt".to_string(),
            size: Some(120),
            file_type: Some("text/plain".to_string()),
            created_at,
            user_id: 1,
        };

        let response = FileResponse::from(record);
        assert_eq!(response.created_at, "2024-12-10T00:00:00+00:00");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "text/plain");
        assert_eq!(json["size"], 120);
        assert!(json.get("user_id").is_none());
    }
}
