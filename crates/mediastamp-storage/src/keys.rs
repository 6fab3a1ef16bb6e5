//! Shared key construction for store backends and handlers.
//!
//! All store paths are built here so the layout stays consistent:
//! `organizations/{org}/{folder}/{filename}` for tenant media, and
//! `{scope}/logo{ext}` for logos. The admin logo lives under a singleton
//! scope outside the organizations tree.

/// Root prefix for all organization-scoped objects.
pub const ORGANIZATIONS_PREFIX: &str = "organizations";

/// Singleton scope for the admin logo.
pub const ADMIN_SCOPE: &str = "admin";

/// Scope prefix for one organization: `organizations/{org}`.
pub fn organization_scope(org: &str) -> String {
    format!("{}/{}", ORGANIZATIONS_PREFIX, org)
}

/// Key for a folder under an organization: `organizations/{org}/{folder}`.
pub fn folder_key(org: &str, folder: &str) -> String {
    format!("{}/{}/{}", ORGANIZATIONS_PREFIX, org, folder)
}

/// Key for a media file: `organizations/{org}/{folder}/{filename}`.
pub fn file_key(org: &str, folder: &str, filename: &str) -> String {
    format!("{}/{}/{}/{}", ORGANIZATIONS_PREFIX, org, folder, filename)
}

/// Key for a logo variant within a scope: `{scope}/logo{ext}`.
/// `ext` carries its leading dot (e.g. `.png`).
pub fn logo_key(scope: &str, ext: &str) -> String {
    format!("{}/logo{}", scope, ext)
}

/// Sanitize a client-supplied filename into a safe key segment.
///
/// Strips any path components, rejects traversal sequences, and replaces
/// characters outside `[A-Za-z0-9._-]`.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX: usize = 255;
    let path = std::path::Path::new(filename);
    let base = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    if base.contains("..") {
        return "invalid_filename".to_string();
    }
    let s: String = base
        .chars()
        .take(MAX)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.trim().is_empty() {
        "file".to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_key_layout() {
        assert_eq!(
            file_key("acme", "photos", "cat.jpg"),
            "organizations/acme/photos/cat.jpg"
        );
    }

    #[test]
    fn test_logo_key_carries_extension_dot() {
        assert_eq!(
            logo_key(&organization_scope("acme"), ".png"),
            "organizations/acme/logo.png"
        );
        assert_eq!(logo_key(ADMIN_SCOPE, ".webp"), "admin/logo.webp");
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("/etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("dir/sub/name.png"), "name.png");
    }

    #[test]
    fn test_sanitize_rejects_traversal() {
        assert_eq!(sanitize_filename("..%2f..%2fx"), "invalid_filename");
    }

    #[test]
    fn test_sanitize_replaces_odd_characters() {
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_filename("   "), "file");
    }
}
