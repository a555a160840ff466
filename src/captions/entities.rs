use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ENTITY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(amp|lt|gt|quot|#39|apos);").expect("valid entity pattern"));

/// Decode the five HTML entities caption payloads use.
///
/// Runs as a single pass, so `&amp;lt;` becomes `&lt;` rather than `<`.
/// Numeric references other than `&#39;` and named entities outside this set
/// are left untouched.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY_PATTERN
        .replace_all(text, |caps: &Captures| match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            _ => "'",
        })
        .into_owned()
}
