/// Default bind ports per service, used when neither `--port` nor
/// `SERVER_PORT` is given
pub const CAPTION_DEFAULT_PORT: u16 = 5000;
pub const LITE_DEFAULT_PORT: u16 = 5001;
pub const DESKTOP_DEFAULT_PORT: u16 = 5002;

/// File extensions accepted by the caption upload form (compared lower-cased)
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "mp4"];

/// Shared security code required by the desktop login form
/// Unrelated to the user's password
pub const SECURITY_CODE: &str = "12345";

/// Lifetime of tokens minted at desktop login (1 hour)
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Default multipart body limit (50MB, room for short mp4 clips)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 52_428_800;

/// Capacity of the realtime notification fan-out buffer
pub const NOTIFICATION_CHANNEL_CAPACITY: usize = 100;

// =============================================================================
// Session Keys
// =============================================================================

/// Desktop shell: authenticated user id
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Lite shell: authenticated username
pub const SESSION_USERNAME_KEY: &str = "username";

// =============================================================================
// Caption Placeholder
// =============================================================================

/// Hashtags returned for every processed upload
pub const PLACEHOLDER_HASHTAGS: [&str; 3] = ["#contentmuse", "#ai", "#socialmedia"];

/// Suggested posting time returned for every processed upload
pub const PLACEHOLDER_SUGGESTED_TIME: &str = "6PM";

/// Public prefix under which uploaded files are echoed back
pub const UPLOADS_URL_PREFIX: &str = "uploads";

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_NO_FILE_PART: &str = "No file part";

pub const ERR_NO_SELECTED_FILE: &str = "No selected file";

pub const ERR_FILE_TYPE_NOT_ALLOWED: &str = "File type not allowed";

pub const ERR_UPLOAD_TOO_LARGE: &str = "Upload too large";

pub const ERR_INVALID_FILENAME: &str = "Invalid filename";

pub const ERR_NO_FILE_PROVIDED: &str = "No file provided";

pub const ERR_NO_FILE_SELECTED: &str = "No file selected";

pub const ERR_MISSING_FIELDS: &str = "Missing required fields";

pub const ERR_INVALID_CREDENTIALS: &str = "Invalid credentials";
