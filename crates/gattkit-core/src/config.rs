//! Peripheral host configuration

// ----------------------------------------------------------------------------
// Configuration
// ----------------------------------------------------------------------------

/// Configuration for a peripheral host
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HostConfig {
    /// Local device name included in the advertisement, when set
    pub local_name: Option<String>,
    /// Identifier platform drivers hand to the OS radio stack to opt into
    /// state restoration after background teardown
    pub restore_identifier: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            local_name: None,
            restore_identifier: "gattkit.peripheral".to_string(),
        }
    }
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the advertised local device name
    pub fn with_local_name(mut self, name: String) -> Self {
        self.local_name = Some(name);
        self
    }

    /// Set the state-restoration identifier
    pub fn with_restore_identifier(mut self, identifier: String) -> Self {
        self.restore_identifier = identifier;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_local_name() {
        let config = HostConfig::default();
        assert!(config.local_name.is_none());
        assert_eq!(config.restore_identifier, "gattkit.peripheral");
    }

    #[test]
    fn builder_overrides_fields() {
        let config = HostConfig::new()
            .with_local_name("sensor-7".to_string())
            .with_restore_identifier("sensor.peripheral".to_string());
        assert_eq!(config.local_name.as_deref(), Some("sensor-7"));
        assert_eq!(config.restore_identifier, "sensor.peripheral");
    }
}
