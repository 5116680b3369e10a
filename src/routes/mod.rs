pub mod caption;
pub mod files;
pub mod health;
pub mod lite;
pub mod pages;
pub mod realtime;
pub mod session;
pub mod settings;
pub mod validation;

pub use health::{health_check, liveness};
pub use validation::{allowed_file, secure_filename};
