use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, Deserialize, Deserializer};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w\.+-]+@[a-zA-Z0-9\.-]+\.[a-zA-Z]{2,}$").expect("email regex is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Accepts `5` as well as `"5"`; HTML form inputs hand numbers over as
/// strings.
pub fn deserialize_int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        String(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(n) => Ok(n),
        IntOrString::String(s) => s.trim().parse().map_err(de::Error::custom),
    }
}
