//! Feature flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named on/off switches. Unknown flags read as disabled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags(pub BTreeMap<String, bool>);

impl Default for FeatureFlags {
    fn default() -> Self {
        let flags = [
            ("ALERT_REPORTS", true),
            ("ALLOW_IFRAME_EMBED", true),
            ("EMBEDDED_SUPERSET", true),
            ("ENABLE_EXPLORE_DRAG_AND_DROP", true),
            ("DASHBOARD_RBAC", true),
            ("PRESTO_EXPAND_DATA", false),
            ("ENABLE_BABEL_LOCALIZATION", true),
        ];
        Self(
            flags
                .into_iter()
                .map(|(name, enabled)| (name.to_string(), enabled))
                .collect(),
        )
    }
}

impl FeatureFlags {
    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags() {
        let flags = FeatureFlags::default();
        assert!(flags.is_enabled("EMBEDDED_SUPERSET"));
        assert!(!flags.is_enabled("PRESTO_EXPAND_DATA"));
        assert!(!flags.is_enabled("UNKNOWN_FLAG"));
        assert_eq!(flags.enabled().count(), 6);
    }
}
