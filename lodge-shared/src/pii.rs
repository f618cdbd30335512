use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A wrapper for sensitive data (API keys, passwords, access tokens) that masks
/// its value in Debug and Display output.
///
/// Serialization passes the real value through: the session file and request
/// bodies need it. The wrapper only guards against leaking through `tracing`
/// and `{:?}`.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl From<String> for Masked<String> {
    fn from(value: String) -> Self {
        Masked(value)
    }
}

impl From<&str> for Masked<String> {
    fn from(value: &str) -> Self {
        Masked(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_hides_value_in_debug() {
        let key = Masked::from("service-secret");
        assert_eq!(format!("{:?}", key), "********");
        assert_eq!(key.to_string(), "********");
        assert_eq!(key.expose(), "service-secret");
    }

    #[test]
    fn test_masked_serializes_real_value() {
        let key = Masked::from("abc");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"abc\"");
        let back: Masked<String> = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, key);
    }
}
