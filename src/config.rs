use std::env;
use std::path::PathBuf;

use crate::constants::DEFAULT_MAX_UPLOAD_BYTES;

/// One entry of the lite shell's credential table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteUser {
    pub username: String,
    pub password: String,
    pub name: String,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    /// Unset means "use the selected service's default port"
    pub server_port: Option<u16>,
    pub database_path: String,
    pub allowed_origins: Vec<String>,
    pub environment: String,
    /// Token signing key; the desktop service refuses to start without it
    pub secret_key: Option<String>,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub lite_users: Vec<LiteUser>,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = match env::var("SERVER_PORT") {
            Ok(port) => Some(port.parse().map_err(|_| "Invalid SERVER_PORT")?),
            Err(_) => None,
        };

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/webos.db".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let secret_key = env::var("SECRET_KEY").ok().filter(|k| !k.is_empty());

        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "static/uploads".to_string());
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());
        let assets_dir = env::var("ASSETS_DIR").unwrap_or_else(|_| "assets".to_string());

        let lite_users = parse_lite_users(
            &env::var("LITE_USERS").unwrap_or_else(|_| "admin:admin:Administrator".to_string()),
        )?;

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(value) => value.parse().map_err(|_| "Invalid MAX_UPLOAD_BYTES")?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Config {
            server_host,
            server_port,
            database_path,
            allowed_origins,
            environment,
            secret_key,
            upload_dir: upload_dir.into(),
            static_dir: static_dir.into(),
            assets_dir: assets_dir.into(),
            lite_users,
            max_upload_bytes,
        })
    }

    /// Get server address as string, falling back to the service's port
    pub fn server_address(&self, default_port: u16) -> String {
        format!(
            "{}:{}",
            self.server_host,
            self.server_port.unwrap_or(default_port)
        )
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// Parse `user:password:Display Name` entries separated by commas
///
/// The display name may itself contain colons; only the first two are split.
pub fn parse_lite_users(raw: &str) -> Result<Vec<LiteUser>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(username), Some(password), Some(name)) if !username.is_empty() => {
                    Ok(LiteUser {
                        username: username.to_string(),
                        password: password.to_string(),
                        name: name.to_string(),
                    })
                }
                _ => Err(format!("Invalid LITE_USERS entry: {}", entry)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lite_users_default() {
        let users = parse_lite_users("admin:admin:Administrator").unwrap();
        assert_eq!(
            users,
            vec![LiteUser {
                username: "admin".to_string(),
                password: "admin".to_string(),
                name: "Administrator".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_lite_users_multiple_and_colon_in_name() {
        let users = parse_lite_users("a:1:Alice, b:2:Bob: the builder").unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].username, "b");
        assert_eq!(users[1].name, "Bob: the builder");
    }

    #[test]
    fn test_parse_lite_users_rejects_malformed() {
        assert!(parse_lite_users("missing-parts").is_err());
        assert!(parse_lite_users(":pw:No Name").is_err());
    }

    #[test]
    fn test_parse_lite_users_empty() {
        assert!(parse_lite_users("").unwrap().is_empty());
    }
}
