//! Drive link normalization.
//!
//! Share links come in several shapes (`/file/d/<id>/view`, `open?id=<id>`,
//! bare ids); the visualization page needs one stable direct-view form.

use std::sync::OnceLock;

use tablekeep_domain::FileId;

static PATH_ID_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();
static QUERY_ID_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();

/// Extract the remote file id from a Drive/Docs URL or a bare id.
///
/// Bare ids are detected only by the absence of an `http` prefix; an http(s)
/// URL outside the Drive domains yields `None`.
pub fn extract_file_id(url_or_id: &str) -> Option<String> {
    if url_or_id.is_empty() {
        return None;
    }

    if url_or_id.contains("drive.google.com") || url_or_id.contains("docs.google.com") {
        // /d/<id> path segment first, ?id= / &id= query parameter second.
        let path_re = PATH_ID_REGEX.get_or_init(|| {
            regex_lite::Regex::new(r"/d/([a-zA-Z0-9_-]+)")
                .expect("PATH_ID_REGEX pattern is invalid")
        });
        if let Some(captures) = path_re.captures(url_or_id) {
            return captures.get(1).map(|m| m.as_str().to_string());
        }

        let query_re = QUERY_ID_REGEX.get_or_init(|| {
            regex_lite::Regex::new(r"[?&]id=([a-zA-Z0-9_-]+)")
                .expect("QUERY_ID_REGEX pattern is invalid")
        });
        return query_re
            .captures(url_or_id)
            .and_then(|captures| captures.get(1).map(|m| m.as_str().to_string()));
    }

    if !url_or_id.starts_with("http") {
        return Some(url_or_id.trim().to_string());
    }

    None
}

/// Canonical direct-view link for a file id.
///
/// The link answers with a redirect to the content, which image tags follow.
pub fn direct_view_link(id: &FileId) -> String {
    format!("https://drive.google.com/uc?export=view&id={id}")
}

/// Rewrite any Drive link (or bare id) into the direct-view form.
///
/// Inputs no id can be extracted from pass through unchanged.
pub fn normalize_link(url_or_id: &str) -> String {
    match extract_file_id(url_or_id) {
        Some(id) => direct_view_link(&FileId::new(id)),
        None => url_or_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_link_is_rewritten() {
        assert_eq!(
            normalize_link("https://drive.google.com/file/d/XYZ/view"),
            "https://drive.google.com/uc?export=view&id=XYZ"
        );
    }

    #[test]
    fn query_parameter_forms_are_rewritten() {
        assert_eq!(
            normalize_link("https://drive.google.com/open?id=XYZ"),
            "https://drive.google.com/uc?export=view&id=XYZ"
        );
        assert_eq!(
            normalize_link("https://drive.google.com/uc?export=download&id=XYZ"),
            "https://drive.google.com/uc?export=view&id=XYZ"
        );
    }

    #[test]
    fn bare_id_is_wrapped() {
        assert_eq!(
            normalize_link("XYZ"),
            "https://drive.google.com/uc?export=view&id=XYZ"
        );
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_link(""), "");
    }

    #[test]
    fn foreign_urls_pass_through() {
        assert_eq!(
            normalize_link("https://example.test/map.png"),
            "https://example.test/map.png"
        );
    }

    #[test]
    fn drive_url_without_id_passes_through() {
        assert_eq!(
            normalize_link("https://drive.google.com/drive/my-drive"),
            "https://drive.google.com/drive/my-drive"
        );
    }

    #[test]
    fn path_segment_wins_over_query_parameter() {
        assert_eq!(
            extract_file_id("https://docs.google.com/document/d/ABC/edit?id=XYZ"),
            Some("ABC".to_string())
        );
    }
}
