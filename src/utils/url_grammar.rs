//! Syntactic URL checks and host extraction.
//!
//! Accepted shape:
//!
//! ```text
//! [http:// | https://] (domain | ipv4) [:port] [/path] [?query] [#fragment]
//! ```
//!
//! Scheme and host are matched case-insensitively. A domain is one or more
//! dot-separated labels ending in a TLD of at least two letters. Path, query
//! and fragment may only contain printable ASCII.

use regex::Regex;
use std::sync::LazyLock;

const OCTET: &str = r"(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])";

/// 1 through 65535, no leading zeros.
const PORT: &str =
    r"(?:6553[0-5]|655[0-2][0-9]|65[0-4][0-9]{2}|6[0-4][0-9]{3}|[1-5][0-9]{4}|[1-9][0-9]{0,3})";

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        concat!(
            r"^(?i:https?://)?",
            r"(?i:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{{2,}}|(?:{octet}\.){{3}}{octet})",
            r"(?::{port})?",
            r"(?:/[[:graph:]&&[^?#]]*)?",
            r"(?:\?[[:graph:]&&[^#]]*)?",
            r"(?:#[[:graph:]]*)?$",
        ),
        octet = OCTET,
        port = PORT
    );
    Regex::new(&pattern).expect("URL pattern must compile")
});

/// Returns true if `input` matches the accepted URL grammar.
///
/// # Examples
///
/// ```ignore
/// assert!(is_well_formed("https://www.example.com/path?q=1"));
/// assert!(is_well_formed("example.com"));
/// assert!(!is_well_formed("ftp:/bad url with spaces"));
/// ```
pub fn is_well_formed(input: &str) -> bool {
    URL_PATTERN.is_match(input)
}

/// Extracts the bare host from a submitted URL.
///
/// Strips an `http://`/`https://` prefix, then everything from the first
/// `/`, `?` or `#`, then a trailing numeric `:port`. The result may be empty
/// for degenerate input such as `"https:///path"`.
pub fn host_token(input: &str) -> &str {
    let rest = strip_scheme(input);
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];

    match authority.rsplit_once(':') {
        Some((host, port)) if port.bytes().all(|b| b.is_ascii_digit()) => host,
        _ => authority,
    }
}

fn strip_scheme(input: &str) -> &str {
    for scheme in ["https://", "http://"] {
        if input
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        {
            return &input[scheme.len()..];
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_domains() {
        assert!(is_well_formed("https://www.example.com"));
        assert!(is_well_formed("http://example.com"));
        assert!(is_well_formed("example.com"));
        assert!(is_well_formed("sub.domain-name.co.uk"));
    }

    #[test]
    fn test_accepts_full_shape() {
        assert!(is_well_formed(
            "https://example.com:8080/path/to/page.html?q=rust&lang=en#top"
        ));
        assert!(is_well_formed("https://example.com/"));
        assert!(is_well_formed("https://example.com?only=query"));
        assert!(is_well_formed("https://example.com#only-fragment"));
    }

    #[test]
    fn test_scheme_and_host_are_case_insensitive() {
        assert!(is_well_formed("HTTPS://EXAMPLE.COM/Path"));
        assert!(is_well_formed("HtTp://ExAmPlE.CoM"));
    }

    #[test]
    fn test_accepts_ipv4() {
        assert!(is_well_formed("http://192.168.1.1:8080/api"));
        assert!(is_well_formed("8.8.8.8"));
        assert!(is_well_formed("255.255.255.255"));
    }

    #[test]
    fn test_rejects_out_of_range_ipv4() {
        assert!(!is_well_formed("http://256.1.1.1"));
        assert!(!is_well_formed("http://1.2.3"));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(!is_well_formed("ftp:/bad url with spaces"));
        assert!(!is_well_formed("ftp://example.com/file.txt"));
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("not a url"));
        assert!(!is_well_formed("localhost"));
        assert!(!is_well_formed("http://localhost:3000"));
        assert!(!is_well_formed("https://example.c"));
        assert!(!is_well_formed("https://-example.com"));
        assert!(!is_well_formed("https://example.com/with space"));
        assert!(!is_well_formed("javascript:alert('xss')"));
        assert!(!is_well_formed("https://example.com:123456"));
    }

    #[test]
    fn test_port_range() {
        assert!(is_well_formed("https://example.com:1"));
        assert!(is_well_formed("https://example.com:443/x"));
        assert!(is_well_formed("https://example.com:65535"));
        assert!(!is_well_formed("https://example.com:0"));
        assert!(!is_well_formed("https://example.com:65536"));
        assert!(!is_well_formed("https://example.com:99999"));
        assert!(!is_well_formed("https://example.com:080"));
    }

    #[test]
    fn test_rejects_non_ascii_path() {
        assert!(!is_well_formed("https://example.com/café"));
    }

    #[test]
    fn test_accepts_reserved_tld_syntactically() {
        assert!(is_well_formed(
            "https://this-domain-should-not-exist-xyz123.invalid"
        ));
    }

    #[test]
    fn test_host_token_strips_scheme_and_path() {
        assert_eq!(host_token("https://www.example.com/a/b"), "www.example.com");
        assert_eq!(host_token("http://example.com"), "example.com");
        assert_eq!(host_token("HTTPS://Example.com/x"), "Example.com");
        assert_eq!(host_token("example.com/path"), "example.com");
    }

    #[test]
    fn test_host_token_strips_port_query_and_fragment() {
        assert_eq!(host_token("http://example.com:8080/api"), "example.com");
        assert_eq!(host_token("https://example.com?q=1"), "example.com");
        assert_eq!(host_token("https://example.com#frag"), "example.com");
        assert_eq!(host_token("10.0.0.1:80"), "10.0.0.1");
    }

    #[test]
    fn test_host_token_can_be_empty() {
        assert_eq!(host_token(""), "");
        assert_eq!(host_token("https://"), "");
        assert_eq!(host_token("https:///path"), "");
    }

    #[test]
    fn test_host_token_handles_multibyte_input() {
        assert_eq!(host_token("ü"), "ü");
        assert_eq!(host_token("https://münchen.de/x"), "münchen.de");
    }
}
