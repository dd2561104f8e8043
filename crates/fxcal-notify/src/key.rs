//! Webhook key handling.
//!
//! Security notes:
//! - The key is wiped from memory on drop.
//! - `Debug` is redacted; never log key material.

use zeroize::Zeroizing;

use crate::error::{NotifyError, NotifyResult};

/// Secret key embedded in the webhook URL.
pub struct SendKey(Zeroizing<String>);

impl SendKey {
    /// Wrap a key, trimming surrounding whitespace.
    pub fn new(key: &str) -> Self {
        Self(Zeroizing::new(key.trim().to_string()))
    }

    /// Resolve the key: environment variable `var_name` first, then the
    /// inline fallback from the config file.
    ///
    /// # Errors
    /// Returns `NotifyError::MissingKey` if neither source has a non-empty key.
    pub fn resolve(var_name: &str, inline: Option<&str>) -> NotifyResult<Self> {
        let from_env = std::env::var(var_name).ok().map(Zeroizing::new);
        // A set-but-blank variable (common in env files) does not shadow the inline key.
        let candidate = from_env
            .as_deref()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .or_else(|| inline.map(str::trim).filter(|k| !k.is_empty()));

        candidate
            .map(Self::new)
            .ok_or_else(|| NotifyError::MissingKey(var_name.to_string()))
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SendKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SendKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let key = SendKey::new("SCT0000TEST");
        assert_eq!(format!("{key:?}"), "SendKey(<redacted>)");
        assert_eq!(key.expose(), "SCT0000TEST");
    }

    #[test]
    fn test_resolve_prefers_env() {
        std::env::set_var("FXCAL_TEST_SENDKEY_ENV", " SCT-from-env \n");
        let key = SendKey::resolve("FXCAL_TEST_SENDKEY_ENV", Some("SCT-inline")).unwrap();
        assert_eq!(key.expose(), "SCT-from-env");
    }

    #[test]
    fn test_resolve_falls_back_to_inline() {
        let key = SendKey::resolve("FXCAL_TEST_SENDKEY_UNSET", Some("SCT-inline")).unwrap();
        assert_eq!(key.expose(), "SCT-inline");
    }

    #[test]
    fn test_resolve_blank_env_falls_back_to_inline() {
        std::env::set_var("FXCAL_TEST_SENDKEY_BLANK", "");
        let key = SendKey::resolve("FXCAL_TEST_SENDKEY_BLANK", Some("SCT-inline")).unwrap();
        assert_eq!(key.expose(), "SCT-inline");

        std::env::set_var("FXCAL_TEST_SENDKEY_SPACES", "  \n");
        let key = SendKey::resolve("FXCAL_TEST_SENDKEY_SPACES", Some(" SCT-inline ")).unwrap();
        assert_eq!(key.expose(), "SCT-inline");
    }

    #[test]
    fn test_resolve_missing() {
        let err = SendKey::resolve("FXCAL_TEST_SENDKEY_UNSET_2", Some("  ")).unwrap_err();
        assert!(matches!(err, NotifyError::MissingKey(ref v) if v == "FXCAL_TEST_SENDKEY_UNSET_2"));
    }
}
