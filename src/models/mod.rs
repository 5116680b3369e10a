pub mod caption;
pub mod file;
pub mod settings;
pub mod user;

pub use caption::CaptionResult;
pub use file::{FileRecord, FileResponse, NewFile};
pub use settings::{SettingsResponse, SettingsUpdate, UserSettings};
pub use user::{NewUser, User};
