/// Caller-supplied API key for one run.
///
/// Never logged: `Debug` prints a redacted placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for handing to the HTTP client.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey(<redacted>)")
    }
}

impl From<String> for ApiKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for ApiKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_does_not_leak_key() {
        let key = ApiKey::new("sk-ant-secret");
        assert!(!format!("{:?}", key).contains("secret"));
        assert_eq!(key.expose(), "sk-ant-secret");
    }

    #[test]
    fn test_blank_key() {
        assert!(ApiKey::new("   ").is_blank());
        assert!(!ApiKey::from("k").is_blank());
    }
}
