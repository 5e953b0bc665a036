//! Share link validation and share id extraction

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use crate::error::ResolveError;

/// Hosts accepted as Terabox share sources (substring match on the host)
pub const SUPPORTED_DOMAINS: [&str; 9] = [
    "terabox.com",
    "1024tera.com",
    "teraboxapp.com",
    "nephobox.com",
    "freeterabox.com",
    "momerybox.com",
    "tibibox.com",
    "dubox.com",
    "teraboxlink.com",
];

/// Tried in order against the whole URL, first capture wins:
/// - https://www.terabox.com/s/1abc2def
/// - https://www.terabox.com/sharing/link?surl=abc2def
/// - https://www.terabox.com/share/link?surl=abc2def
/// - https://www.terabox.com/web/share/link?surl=abc2def
const SHARE_ID_PATTERNS: [&str; 4] = [
    r"/s/([a-zA-Z0-9_-]+)",
    r"surl=([a-zA-Z0-9_-]+)",
    r"/share/link\?surl=([a-zA-Z0-9_-]+)",
    r"/web/share/link\?surl=([a-zA-Z0-9_-]+)",
];

fn share_id_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        SHARE_ID_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("share id pattern is valid"))
            .collect()
    })
}

/// Checks the URL parses and its host belongs to a supported domain.
pub fn validate_share_url(share_url: &str) -> Result<(), ResolveError> {
    let url = share_url.trim();
    let parsed = Url::parse(url).map_err(|e| ResolveError::InvalidUrl(format!("{}: {}", url, e)))?;

    let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();
    if !SUPPORTED_DOMAINS.iter().any(|d| host.contains(d)) {
        return Err(ResolveError::UnsupportedDomain(host));
    }

    Ok(())
}

pub fn is_supported_url(share_url: &str) -> bool {
    validate_share_url(share_url).is_ok()
}

/// Extracts the share id from any of the known link shapes.
pub fn extract_share_id(share_url: &str) -> Option<String> {
    let url = share_url.trim();
    share_id_patterns()
        .iter()
        .find_map(|re| re.captures(url).and_then(|c| c.get(1)))
        .map(|m| m.as_str().to_string())
}

pub fn validate_and_extract(share_url: &str) -> Result<String, ResolveError> {
    validate_share_url(share_url)?;
    extract_share_id(share_url)
        .ok_or_else(|| ResolveError::ShareIdNotFound(share_url.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_known_shapes() {
        let cases = vec![
            ("https://www.terabox.com/s/1abc_2-def", "1abc_2-def"),
            ("https://terabox.com/s/1xyz?pwd=1234", "1xyz"),
            ("https://www.terabox.com/sharing/link?surl=abc123", "abc123"),
            ("https://www.1024tera.com/share/link?surl=Q9_z", "Q9_z"),
            ("https://www.terabox.com/web/share/link?surl=web-id", "web-id"),
            ("https://dubox.com/wap/share/filelist?surl=X1&lang=en", "X1"),
        ];

        for (url, expected) in cases {
            assert_eq!(
                validate_and_extract(url).unwrap(),
                expected,
                "Failed for URL: {}",
                url
            );
        }
    }

    #[test]
    fn test_unsupported_domains() {
        let urls = vec![
            "https://example.com/s/1abc",
            "https://pan.baidu.com/s/1abc",
            "https://google.com/?surl=abc",
        ];

        for url in urls {
            assert!(
                matches!(validate_and_extract(url), Err(ResolveError::UnsupportedDomain(_))),
                "Should be unsupported: {}",
                url
            );
        }
    }

    #[test]
    fn test_host_substring_match() {
        assert!(is_supported_url("https://www.terabox.com/s/1a"));
        assert!(is_supported_url("https://m.teraboxapp.com/s/1a"));
        assert!(is_supported_url("https://TERABOX.COM/s/1a"));
    }

    #[test]
    fn test_invalid_url() {
        for url in ["", "not-a-url", "terabox.com/s/1abc"] {
            assert!(
                matches!(validate_and_extract(url), Err(ResolveError::InvalidUrl(_))),
                "Should be invalid: {}",
                url
            );
        }
    }

    #[test]
    fn test_share_id_not_found() {
        for url in ["https://www.terabox.com/", "https://www.terabox.com/main?category=all"] {
            assert!(
                matches!(validate_and_extract(url), Err(ResolveError::ShareIdNotFound(_))),
                "Should have no share id: {}",
                url
            );
        }
    }
}
