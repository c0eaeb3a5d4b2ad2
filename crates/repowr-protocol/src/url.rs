//! Syntactic shape check for the optional `link` field.

use regex::Regex;
use std::sync::OnceLock;

fn url_shape_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^https?://(?:(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}\.?|localhost|\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})(?::\d+)?(?:/?|[/?]\S+)$",
        )
        .expect("url shape regex must compile")
    })
}

/// True when `s` is an absolute http(s) URL with a plausible host.
///
/// Hosts: dotted hostname with an alphabetic final label of two or more
/// letters, `localhost`, or a dotted-quad IPv4 literal. An optional port and
/// a whitespace-free path/query may follow. No DNS or reachability check.
pub fn is_well_formed_url(s: &str) -> bool {
    url_shape_re().is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_links() {
        for url in [
            "https://t.me/x",
            "http://example.com",
            "https://example.com/",
            "https://sub.example.co.uk/path?q=1&r=2",
            "HTTPS://EXAMPLE.ORG/Path",
            "http://localhost:8080/health",
            "http://127.0.0.1",
            "https://10.0.0.1:443/x",
            "https://example.museum",
            "https://example.com.",
        ] {
            assert!(is_well_formed_url(url), "{url} should be accepted");
        }
    }

    #[test]
    fn rejects_non_http_or_hostless_values() {
        for url in [
            "",
            "t.me/x",
            "ftp://example.com",
            "https://",
            "https://example",
            "https://example.c",
            "https://-bad.com",
            "https://example.com/has space",
            "javascript:alert(1)",
            "https://exa mple.com",
        ] {
            assert!(!is_well_formed_url(url), "{url} should be rejected");
        }
    }
}
