//! Share-link grammar check
//!
//! Accepts exactly `https://<host>/s/<token>` where `<host>` is one of the
//! configured hostnames and `<token>` is `[A-Za-z0-9_-]+`. Anything else,
//! including a trailing slash, query string or extra path segment, is rejected.

use regex::Regex;

use super::types::Link;
use crate::core::error::{AppError, AppResult};

/// Compiled matcher for the accepted share-link shapes
///
/// Hostnames are data: adding a mirror domain is a config change, the
/// matching algorithm stays the same. Matching is case-sensitive.
#[derive(Debug, Clone)]
pub struct PatternValidator {
    pattern: Regex,
    hosts: Vec<String>,
}

impl PatternValidator {
    /// Compiles a validator for the given hostnames.
    ///
    /// # Errors
    /// Returns `AppError::InvalidConfig` when `hosts` is empty or contains a
    /// blank entry.
    pub fn new<S: AsRef<str>>(hosts: &[S]) -> AppResult<Self> {
        let hosts: Vec<String> = hosts.iter().map(|h| h.as_ref().trim().to_string()).collect();
        if hosts.is_empty() || hosts.iter().any(String::is_empty) {
            return Err(AppError::invalid_config("at least one non-empty hostname is required"));
        }

        let alternatives = hosts.iter().map(|h| regex::escape(h)).collect::<Vec<_>>().join("|");
        let pattern = Regex::new(&format!(r"^https://(?:{})/s/[A-Za-z0-9_-]+$", alternatives))?;

        Ok(Self { pattern, hosts })
    }

    /// True when the trimmed input is an accepted share link.
    pub fn validate(&self, input: &str) -> bool {
        self.pattern.is_match(input.trim())
    }

    /// Validates and wraps the trimmed input.
    pub fn parse(&self, input: &str) -> Option<Link> {
        let trimmed = input.trim();
        self.pattern.is_match(trimmed).then(|| Link::new_unchecked(trimmed))
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_hosts;

    fn validator() -> PatternValidator {
        PatternValidator::new(&default_hosts()).unwrap()
    }

    #[test]
    fn test_accepts_token_with_hyphen_and_underscore() {
        assert!(validator().validate("https://terabox.com/s/AbC123-_"));
    }

    #[test]
    fn test_accepts_every_default_host() {
        let v = validator();
        for host in default_hosts() {
            let link = format!("https://{}/s/1abcDEF", host);
            assert!(v.validate(&link), "{} should be accepted", link);
        }
    }

    #[test]
    fn test_strips_surrounding_whitespace() {
        let v = validator();
        assert!(v.validate("  https://1024terabox.com/s/1xyz\n"));
        assert_eq!(v.parse(" https://terabox.com/s/abc ").unwrap().as_str(), "https://terabox.com/s/abc");
    }

    #[test]
    fn test_rejects_wrong_scheme() {
        assert!(!validator().validate("http://terabox.com/s/AbC123"));
        assert!(!validator().validate("ftp://terabox.com/s/AbC123"));
    }

    #[test]
    fn test_rejects_disallowed_characters() {
        let v = validator();
        assert!(!v.validate("https://terabox.com/s/AbC 123"));
        assert!(!v.validate("https://terabox.com/s/AbC.123"));
        assert!(!v.validate("https://terabox.com/s/AbC%20"));
    }

    #[test]
    fn test_rejects_extra_segments_and_trailing_slash() {
        let v = validator();
        assert!(!v.validate("https://terabox.com/s/AbC123/"));
        assert!(!v.validate("https://terabox.com/s/AbC123/more"));
        assert!(!v.validate("https://terabox.com/s/AbC123?x=1"));
        assert!(!v.validate("https://terabox.com/s/"));
        assert!(!v.validate("https://terabox.com/sharing/AbC123"));
    }

    #[test]
    fn test_rejects_partial_matches() {
        let v = validator();
        assert!(!v.validate("see https://terabox.com/s/AbC123"));
        assert!(!v.validate("https://www.terabox.com/s/AbC123"));
        assert!(!v.validate("https://terabox.com.evil.net/s/AbC123"));
        assert!(!v.validate("https://evilterabox.com/s/AbC123"));
    }

    #[test]
    fn test_host_dots_are_literal() {
        assert!(!validator().validate("https://teraboxXcom/s/AbC123"));
    }

    #[test]
    fn test_hostname_is_case_sensitive() {
        assert!(!validator().validate("https://TeraBox.com/s/AbC123"));
    }

    #[test]
    fn test_one_character_mutations_fail() {
        let v = validator();
        let valid = "https://terabox.com/s/AbC123";
        assert!(v.validate(valid));

        for bad in ['/', '.', '?', '#', '!', 'é'] {
            let mutated = format!("{}{}", valid, bad);
            assert!(!v.validate(&mutated), "{:?} should be rejected", mutated);
        }
    }

    #[test]
    fn test_inner_whitespace_is_rejected_but_outer_is_trimmed() {
        let v = validator();
        assert!(v.validate("https://terabox.com/s/AbC123 "));
        assert!(!v.validate("https://terabox.com/s/AbC12 3"));
        assert!(!v.validate("https://terabox.com/ s/AbC123"));
    }

    #[test]
    fn test_configured_mirror_is_accepted() {
        let v = PatternValidator::new(&["terabox.com", "mirrobox.com"]).unwrap();
        assert!(v.validate("https://mirrobox.com/s/abc"));
        assert!(!v.validate("https://teraboxapp.com/s/abc"));
        assert_eq!(v.hosts(), ["terabox.com", "mirrobox.com"]);
    }

    #[test]
    fn test_empty_host_list_is_an_error() {
        let hosts: [&str; 0] = [];
        assert!(PatternValidator::new(&hosts).is_err());
        assert!(PatternValidator::new(&["terabox.com", " "]).is_err());
    }
}
