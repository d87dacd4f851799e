use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

/// Direct-view URL template; the file id is appended
pub const DIRECT_VIEW_PREFIX: &str = "https://drive.google.com/uc?export=view&id=";

/// Extraction patterns in priority order: path segment, query parameter,
/// then any bare token long enough to be a Drive file id.
static FILE_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"/d/([a-zA-Z0-9_-]+)").expect("valid path pattern"),
        Regex::new(r"id=([a-zA-Z0-9_-]+)").expect("valid query pattern"),
        Regex::new(r"([a-zA-Z0-9_-]{25,})").expect("valid fallback pattern"),
    ]
});

/// Result of converting a batch of links.
///
/// Both lists keep the relative order of the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Conversion {
    /// Direct-view URLs for the links that converted
    pub converted: Vec<String>,
    /// Links that did not convert, exactly as given
    pub failed: Vec<String>,
}

impl Conversion {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Extract the Drive file id from a share link, if any pattern matches
pub fn extract_file_id(link: &str) -> Option<&str> {
    FILE_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(link))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Build the direct-view URL for a file id
pub fn direct_view_url(file_id: &str) -> String {
    format!("{}{}", DIRECT_VIEW_PREFIX, file_id)
}

/// Convert one share link; `None` when no file id can be found
pub fn convert_link(link: &str) -> Option<String> {
    let converted = extract_file_id(link).map(direct_view_url);
    if converted.is_none() {
        debug!(link = %link, "No file id found in link");
    }
    converted
}

/// Convert many links, partitioning them into converted and failed
pub fn convert_links<I, S>(links: I) -> Conversion
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut conversion = Conversion::default();

    for link in links {
        let link = link.as_ref();
        match convert_link(link) {
            Some(url) => conversion.converted.push(url),
            None => conversion.failed.push(link.to_string()),
        }
    }

    conversion
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE_ID: &str = "18pMwmGDFxcC03z9XR8D48DUjY_yLxr78";

    #[test]
    fn test_standard_share_link() {
        let link = format!("https://drive.google.com/file/d/{}/view?usp=drive_link", FILE_ID);
        assert_eq!(extract_file_id(&link), Some(FILE_ID));
        assert_eq!(
            convert_link(&link),
            Some(format!("https://drive.google.com/uc?export=view&id={}", FILE_ID))
        );
    }

    #[test]
    fn test_query_parameter_link() {
        let link = "https://drive.google.com/open?id=1eWuHxr7kup1H_t5GmMM6TC6kMLbvyC2K";
        assert_eq!(extract_file_id(link), Some("1eWuHxr7kup1H_t5GmMM6TC6kMLbvyC2K"));
    }

    #[test]
    fn test_path_segment_wins_over_query() {
        let link = "https://drive.google.com/file/d/pathId/view?id=queryId";
        assert_eq!(extract_file_id(link), Some("pathId"));
    }

    #[test]
    fn test_short_ids_only_after_known_markers() {
        // `/d/` and `id=` accept any length
        assert_eq!(extract_file_id("https://drive.google.com/file/d/abc/view"), Some("abc"));
        assert_eq!(extract_file_id("uc?id=xyz"), Some("xyz"));
        // A bare token needs 25+ characters
        assert_eq!(extract_file_id("1D7sdyYxnENum6u60rWo0Mm4y"), Some("1D7sdyYxnENum6u60rWo0Mm4y"));
        assert_eq!(extract_file_id("1D7sdyYxnENum6u60rWo0Mm4"), None);
    }

    #[test]
    fn test_unrecognized_link() {
        assert_eq!(convert_link("https://example.com/images/bangle.png"), None);
        assert_eq!(convert_link(""), None);
    }

    #[test]
    fn test_batch_preserves_order() {
        let links = [
            "https://drive.google.com/file/d/1eWuHxr7kup1H_t5GmMM6TC6kMLbvyC2K/view",
            "not a link",
            "https://drive.google.com/file/d/1D7sdyYxnENum6u60rWo0Mm4yntN5o4jD/view",
            "https://example.com/x.png",
        ];

        let result = convert_links(links);
        assert_eq!(
            result.converted,
            vec![
                direct_view_url("1eWuHxr7kup1H_t5GmMM6TC6kMLbvyC2K"),
                direct_view_url("1D7sdyYxnENum6u60rWo0Mm4yntN5o4jD"),
            ]
        );
        assert_eq!(result.failed, vec!["not a link", "https://example.com/x.png"]);
        assert!(!result.is_complete());
    }

    #[test]
    fn test_empty_batch() {
        let result = convert_links(Vec::<String>::new());
        assert_eq!(result, Conversion::default());
        assert!(result.is_complete());
    }
}
