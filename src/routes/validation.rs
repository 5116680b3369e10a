use axum::extract::{multipart::MultipartRejection, Multipart};
use unicode_normalization::UnicodeNormalization;

use crate::constants::ALLOWED_EXTENSIONS;
use crate::error::Result;

/// Whether `filename` carries one of the accepted upload extensions
///
/// Only the text after the last dot counts, compared case-insensitively.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Reduce a client-supplied filename to a safe, flat ASCII name
///
/// Characters are NFKD-decomposed first so accented letters keep their base
/// letter. Path separators become word breaks, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` stripped.
/// May return an empty string.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// A file part pulled out of a multipart body
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied filename, possibly empty
    pub filename: String,
    pub data: Vec<u8>,
}

/// Fields of an upload form: the `file` part plus any text fields
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: Vec<(String, String)>,
}

impl UploadForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Collect the `file` part and text fields of a multipart body
///
/// A request that is not multipart at all yields an empty form, so callers
/// report it the same way as a body without a file part.
pub async fn read_upload_form(
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!("Upload without multipart body: {}", rejection);
            return Ok(form);
        }
    };

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        // Only parts carrying a filename parameter count as files; the
        // parameter itself may be empty when the user picked nothing
        if name == "file" && field.file_name().is_some() {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?.to_vec();
            if form.file.is_none() {
                form.file = Some(UploadedFile {
                    filename,
                    data,
                });
            }
        } else {
            let value = field.text().await?;
            form.fields.push((name, value));
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("photo.png"));
        assert!(allowed_file("photo.JPG"));
        assert!(allowed_file("photo.jpeg"));
        assert!(allowed_file("clip.Mp4"));
        assert!(allowed_file("archive.tar.png"));

        assert!(!allowed_file("virus.exe"));
        assert!(!allowed_file("png"));
        assert!(!allowed_file("photo.png.exe"));
        assert!(!allowed_file("photo."));
        assert!(!allowed_file(""));
    }

    #[test]
    fn test_secure_filename_plain() {
        assert_eq!(secure_filename("photo.JPG"), "photo.JPG");
        assert_eq!(secure_filename("my cool movie.mp4"), "my_cool_movie.mp4");
    }

    #[test]
    fn test_secure_filename_strips_traversal() {
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("..\\..\\boot.ini"), "boot.ini");
        assert_eq!(secure_filename("/var/www/shell.png"), "var_www_shell.png");
    }

    #[test]
    fn test_secure_filename_drops_unsafe_characters() {
        assert_eq!(secure_filename("café<script>.png"), "cafescript.png");
        assert_eq!(secure_filename("  __.hidden.png"), "hidden.png");
    }

    #[test]
    fn test_secure_filename_keeps_base_letters() {
        assert_eq!(secure_filename("café.png"), "cafe.png");
        assert_eq!(secure_filename("naïve résumé.jpg"), "naive_resume.jpg");
        assert_eq!(secure_filename("ﬁle.mp4"), "file.mp4");
    }

    #[test]
    fn test_secure_filename_can_be_empty() {
        assert_eq!(secure_filename("..."), "");
        assert_eq!(secure_filename("日本語"), "");
    }

    #[test]
    fn test_upload_form_field_lookup() {
        let form = UploadForm {
            file: None,
            fields: vec![
                ("platform".to_string(), "instagram".to_string()),
                ("style".to_string(), "vivid".to_string()),
            ],
        };
        assert_eq!(form.field("style"), Some("vivid"));
        assert_eq!(form.field("missing"), None);
    }
}
