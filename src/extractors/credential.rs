use once_cell::sync::Lazy;
use regex::Regex;

use crate::ExtractionError;

static API_KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([A-Za-z0-9_-]+)""#).expect("valid API key pattern")
});

/// Player API key scraped from a single watch page load.
///
/// Scoped to the page it came from; never stored or reused.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Find the first embedded `INNERTUBE_API_KEY` value in the page markup
pub fn locate_credential(page: &str) -> Result<ApiKey, ExtractionError> {
    API_KEY_PATTERN
        .captures(page)
        .and_then(|caps| caps.get(1))
        .map(|key| ApiKey(key.as_str().to_string()))
        .ok_or(ExtractionError::CredentialNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_credential() {
        let page =
            r#"<script>ytcfg.set({"INNERTUBE_API_KEY": "AIzaSy_abc-123","OTHER":1});</script>"#;
        assert_eq!(locate_credential(page).unwrap().as_str(), "AIzaSy_abc-123");
    }

    #[test]
    fn test_locate_credential_without_whitespace() {
        let page = r#"{"INNERTUBE_API_KEY":"KEY42"}"#;
        assert_eq!(locate_credential(page).unwrap().as_str(), "KEY42");
    }

    #[test]
    fn test_first_match_wins() {
        let page = r#"
            <script>var a = {"INNERTUBE_API_KEY": "first"};</script>
            <script>var b = {"INNERTUBE_API_KEY": "second"};</script>
        "#;
        assert_eq!(locate_credential(page).unwrap().as_str(), "first");
    }

    #[test]
    fn test_rejects_unexpected_charset() {
        let page = r#"{"INNERTUBE_API_KEY": "bad key!"}"#;
        assert_eq!(locate_credential(page), Err(ExtractionError::CredentialNotFound));
    }

    #[test]
    fn test_missing_credential() {
        assert_eq!(
            locate_credential("<html><body>nothing here</body></html>"),
            Err(ExtractionError::CredentialNotFound)
        );
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = locate_credential(r#""INNERTUBE_API_KEY":"secret""#).unwrap();
        assert!(!format!("{:?}", key).contains("secret"));
    }
}
