use std::fs;
use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use vending_engine::{EngineSettings, HttpPriceSettings};
use vending_logging::{vending_info, vending_warn};

pub(crate) const CONFIG_FILENAME: &str = "vending.ron";

/// On-disk shape of `vending.ron`. Every field is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct PersistedConfig {
    poll_interval_ms: u64,
    grace_delay_ms: u64,
    gumballs_per_token: Decimal,
    member_cards_per_token: Decimal,
    gc_token_resource: String,
    member_card_resource: String,
    xrd_resource: String,
    price_url: Option<String>,
    price_timeout_ms: Option<u64>,
}

impl Default for PersistedConfig {
    fn default() -> Self {
        let settings = EngineSettings::default();
        Self {
            poll_interval_ms: millis(settings.poll_interval),
            grace_delay_ms: millis(settings.grace_delay),
            gumballs_per_token: settings.gumballs_per_token,
            member_cards_per_token: settings.member_cards_per_token,
            gc_token_resource: settings.gc_token_resource,
            member_card_resource: settings.member_card_resource,
            xrd_resource: settings.xrd_resource,
            price_url: None,
            price_timeout_ms: None,
        }
    }
}

impl From<PersistedConfig> for EngineSettings {
    fn from(config: PersistedConfig) -> Self {
        let price_http = config.price_url.map(|url| {
            let mut http = HttpPriceSettings::new(url);
            if let Some(timeout) = config.price_timeout_ms {
                http.request_timeout = Duration::from_millis(timeout);
            }
            http
        });
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
            grace_delay: Duration::from_millis(config.grace_delay_ms),
            gumballs_per_token: config.gumballs_per_token,
            member_cards_per_token: config.member_cards_per_token,
            gc_token_resource: config.gc_token_resource,
            member_card_resource: config.member_card_resource,
            xrd_resource: config.xrd_resource,
            price_http,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Loads engine settings from `{dir}/vending.ron`, falling back to defaults
/// when the file is missing or unusable.
pub(crate) fn load_settings(dir: &Path) -> EngineSettings {
    let path = dir.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            vending_info!("No config at {:?}; using defaults", path);
            return EngineSettings::default();
        }
        Err(err) => {
            vending_warn!("Failed to read config from {:?}: {}", path, err);
            return EngineSettings::default();
        }
    };

    let config: PersistedConfig = match ron::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            vending_warn!("Failed to parse config from {:?}: {}", path, err);
            return EngineSettings::default();
        }
    };

    if config.gumballs_per_token < Decimal::ZERO || config.member_cards_per_token < Decimal::ZERO {
        vending_warn!("Negative prices in {:?}; using defaults", path);
        return EngineSettings::default();
    }

    vending_info!("Loaded config from {:?}", path);
    config.into()
}

#[cfg(test)]
mod tests {
    use super::{load_settings, CONFIG_FILENAME};
    use rust_decimal_macros::dec;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;
    use vending_engine::EngineSettings;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = load_settings(temp.path());
        assert_eq!(settings.poll_interval, Duration::from_secs(10));
        assert_eq!(settings.grace_delay, Duration::from_secs(1));
        assert!(settings.price_http.is_none());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            r#"(
                poll_interval_ms: 2500,
                gumballs_per_token: "2",
                price_url: Some("http://localhost:9000/sugar"),
                price_timeout_ms: Some(300),
            )"#,
        )
        .unwrap();

        let settings = load_settings(temp.path());
        let defaults = EngineSettings::default();
        assert_eq!(settings.poll_interval, Duration::from_millis(2500));
        assert_eq!(settings.grace_delay, defaults.grace_delay);
        assert_eq!(settings.gumballs_per_token, dec!(2));
        assert_eq!(settings.member_cards_per_token, defaults.member_cards_per_token);
        let http = settings.price_http.expect("http price source");
        assert_eq!(http.url, "http://localhost:9000/sugar");
        assert_eq!(http.request_timeout, Duration::from_millis(300));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILENAME), "(poll_interval_ms: \"soon\")").unwrap();

        let settings = load_settings(temp.path());
        assert_eq!(settings.poll_interval, Duration::from_secs(10));
    }

    #[test]
    fn negative_price_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            r#"(gumballs_per_token: "-1")"#,
        )
        .unwrap();

        let settings = load_settings(temp.path());
        assert_eq!(settings.gumballs_per_token, dec!(1));
    }
}
