#[derive(Debug, Clone)]
pub struct Config {
    pub open_registrations: bool,
    pub receive_random_device_id: bool,
    pub webhook_enabled: bool,
    pub webhook_url: String,
    pub db_connection_string: String,
}

const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://db.sqlite?mode=rwc";

/// Accepted truthy spellings, matching the sync clients' .env conventions.
pub fn str_to_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|value| str_to_bool(&value))
        .unwrap_or(default)
}

impl Config {
    pub fn load() -> Self {
        let open_registrations = env_bool("OPEN_REGISTRATIONS", true);
        let receive_random_device_id = env_bool("RECEIVE_RANDOM_DEVICE_ID", false);
        let webhook_enabled = env_bool("WEBHOOK_ENABLED", false);
        let webhook_url = std::env::var("WEBHOOK_URL").unwrap_or_default();
        let db_connection_string =
            std::env::var("DB_CONNECTION_STRING").unwrap_or(DEFAULT_DB_CONNECTION_STRING.into());
        Config {
            open_registrations,
            receive_random_device_id,
            webhook_enabled,
            webhook_url,
            db_connection_string,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.webhook_enabled && self.webhook_url.is_empty() {
            return Err("WEBHOOK_ENABLED is set but WEBHOOK_URL is missing".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_spellings() {
        for value in ["true", "True", "TRUE", "1", "yes", "Yes"] {
            assert!(str_to_bool(value), "{value} should parse as true");
        }
        for value in ["false", "0", "no", "", "on", "enabled"] {
            assert!(!str_to_bool(value), "{value} should parse as false");
        }
    }

    #[test]
    fn webhook_enabled_requires_url() {
        let config = Config {
            open_registrations: true,
            receive_random_device_id: false,
            webhook_enabled: true,
            webhook_url: String::new(),
            db_connection_string: DEFAULT_DB_CONNECTION_STRING.into(),
        };
        assert!(config.validate().is_err());

        let config = Config {
            webhook_url: "https://example.com/hook".into(),
            ..config
        };
        assert!(config.validate().is_ok());
    }
}
