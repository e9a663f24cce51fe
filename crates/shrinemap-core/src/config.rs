use crate::app_config::{AppConfig, ClusterSettings, Environment, ViewDefaults};
use crate::geo::{LatLng, RegionBounds};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but its value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u8 = |var: &str, default: &str| -> Result<u8, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u8>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("SHRINEMAP_ENV", "development"));

    let bind_addr = parse("SHRINEMAP_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SHRINEMAP_LOG_LEVEL", "info");
    let data_source = or_default("SHRINEMAP_DATA_SOURCE", "./public/export.geojson");
    let places_api_key = lookup("SHRINEMAP_PLACES_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());

    let parse_timeout = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let secs = parse_u64(var, default)?;
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "timeout must be at least 1 second".to_string(),
            });
        }
        Ok(secs)
    };

    let request_timeout_secs = parse_timeout("SHRINEMAP_REQUEST_TIMEOUT_SECS", "30")?;
    let lookup_timeout_secs = parse_timeout("SHRINEMAP_LOOKUP_TIMEOUT_SECS", "10")?;
    let places_max_retries = parse_u32("SHRINEMAP_PLACES_MAX_RETRIES", "2")?;

    let region_raw = or_default("SHRINEMAP_REGION", "24,123,46,146");
    let region =
        region_raw
            .parse::<RegionBounds>()
            .map_err(|reason| ConfigError::InvalidEnvVar {
                var: "SHRINEMAP_REGION".to_string(),
                reason,
            })?;

    let min_cluster_size = parse_usize("SHRINEMAP_CLUSTER_MIN_SIZE", "2")?;
    if min_cluster_size < 2 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHRINEMAP_CLUSTER_MIN_SIZE".to_string(),
            reason: "a cluster needs at least 2 markers".to_string(),
        });
    }
    let cluster = ClusterSettings {
        grid_size_px: parse_u32("SHRINEMAP_CLUSTER_GRID_SIZE", "50")?,
        max_zoom: parse_u8("SHRINEMAP_CLUSTER_MAX_ZOOM", "15")?,
        min_cluster_size,
    };

    let center_raw = or_default("SHRINEMAP_DEFAULT_CENTER", "35.6762,139.6503");
    let center = center_raw
        .parse::<LatLng>()
        .map_err(|reason| ConfigError::InvalidEnvVar {
            var: "SHRINEMAP_DEFAULT_CENTER".to_string(),
            reason,
        })?;
    let view = ViewDefaults {
        center,
        zoom: parse_u8("SHRINEMAP_DEFAULT_ZOOM", "13")?,
        language: or_default("SHRINEMAP_PLACES_LANGUAGE", "ja"),
        ..ViewDefaults::default()
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        data_source,
        places_api_key,
        request_timeout_secs,
        lookup_timeout_secs,
        places_max_retries,
        region,
        cluster,
        view,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("unknown"), Environment::Development);
    }

    #[test]
    fn build_app_config_uses_defaults_for_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).expect("defaults are valid");
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.data_source, "./public/export.geojson");
        assert!(cfg.places_api_key.is_none());
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.lookup_timeout_secs, 10);
        assert_eq!(cfg.places_max_retries, 2);
        assert_eq!(cfg.region, RegionBounds::japan());
        assert_eq!(cfg.cluster, ClusterSettings::default());
        assert_eq!(cfg.view.center, LatLng::new(35.6762, 139.6503));
        assert_eq!(cfg.view.zoom, 13);
        assert_eq!(cfg.view.language, "ja");
        assert_eq!(cfg.view.region_code, "JP");
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map = HashMap::new();
        map.insert("SHRINEMAP_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHRINEMAP_BIND_ADDR"),
            "expected InvalidEnvVar(SHRINEMAP_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn blank_places_api_key_is_treated_as_absent() {
        let mut map = HashMap::new();
        map.insert("SHRINEMAP_PLACES_API_KEY", "   ");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.places_api_key.is_none());
    }

    #[test]
    fn places_api_key_is_redacted_in_debug() {
        let mut map = HashMap::new();
        map.insert("SHRINEMAP_PLACES_API_KEY", "AIza-secret");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.places_api_key.as_deref(), Some("AIza-secret"));
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("AIza-secret"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn region_override_is_parsed() {
        let mut map = HashMap::new();
        map.insert("SHRINEMAP_REGION", "30,130,40,140");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.region.min_lat, 30.0);
        assert_eq!(cfg.region.max_lng, 140.0);
    }

    #[test]
    fn region_invalid() {
        let mut map = HashMap::new();
        map.insert("SHRINEMAP_REGION", "north-ish");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHRINEMAP_REGION"),
            "expected InvalidEnvVar(SHRINEMAP_REGION), got: {result:?}"
        );
    }

    #[test]
    fn cluster_overrides_are_parsed() {
        let mut map = HashMap::new();
        map.insert("SHRINEMAP_CLUSTER_GRID_SIZE", "80");
        map.insert("SHRINEMAP_CLUSTER_MAX_ZOOM", "12");
        map.insert("SHRINEMAP_CLUSTER_MIN_SIZE", "3");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.cluster.grid_size_px, 80);
        assert_eq!(cfg.cluster.max_zoom, 12);
        assert_eq!(cfg.cluster.min_cluster_size, 3);
    }

    #[test]
    fn cluster_min_size_below_two_is_rejected() {
        let mut map = HashMap::new();
        map.insert("SHRINEMAP_CLUSTER_MIN_SIZE", "1");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHRINEMAP_CLUSTER_MIN_SIZE"),
            "expected InvalidEnvVar(SHRINEMAP_CLUSTER_MIN_SIZE), got: {result:?}"
        );
    }

    #[test]
    fn lookup_timeout_invalid() {
        let mut map = HashMap::new();
        map.insert("SHRINEMAP_LOOKUP_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHRINEMAP_LOOKUP_TIMEOUT_SECS"),
            "expected InvalidEnvVar(SHRINEMAP_LOOKUP_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn zero_timeouts_are_rejected() {
        for var in [
            "SHRINEMAP_REQUEST_TIMEOUT_SECS",
            "SHRINEMAP_LOOKUP_TIMEOUT_SECS",
        ] {
            let map: HashMap<&str, &str> = HashMap::from([(var, "0")]);
            let result = build_app_config(lookup_from_map(&map));
            assert!(
                matches!(result, Err(ConfigError::InvalidEnvVar { var: ref v, .. }) if v == var),
                "expected InvalidEnvVar({var}), got: {result:?}"
            );
        }
    }

    #[test]
    fn default_center_override_and_invalid() {
        let mut map = HashMap::new();
        map.insert("SHRINEMAP_DEFAULT_CENTER", "34.9671,135.7727");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.view.center, LatLng::new(34.9671, 135.7727));

        map.insert("SHRINEMAP_DEFAULT_CENTER", "kyoto");
        assert!(build_app_config(lookup_from_map(&map)).is_err());
    }
    #[test]
    fn build_app_config_reads_overrides() {
        let map: HashMap<&str, &str> = HashMap::from([
            ("SHRINEMAP_ENV", "production"),
            ("SHRINEMAP_BIND_ADDR", "127.0.0.1:8080"),
            ("SHRINEMAP_DATA_SOURCE", "https://example.test/export.geojson"),
            ("SHRINEMAP_PLACES_API_KEY", "secret-key"),
            ("SHRINEMAP_PLACES_LANGUAGE", "en"),
            ("SHRINEMAP_LOOKUP_TIMEOUT_SECS", "3"),
            ("SHRINEMAP_REGION", "30,130,40,140"),
            ("SHRINEMAP_CLUSTER_GRID_SIZE", "80"),
            ("SHRINEMAP_CLUSTER_MAX_ZOOM", "12"),
            ("SHRINEMAP_DEFAULT_CENTER", "34.9671,135.7727"),
            ("SHRINEMAP_DEFAULT_ZOOM", "11"),
        ]);
        let cfg = build_app_config(lookup_from_map(&map)).expect("overrides are valid");
        assert_eq!(cfg.env, Environment::Production);
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.data_source, "https://example.test/export.geojson");
        assert_eq!(cfg.places_api_key.as_deref(), Some("secret-key"));
        assert_eq!(cfg.view.language, "en");
        assert_eq!(cfg.view.region_code, "JP");
        assert_eq!(cfg.lookup_timeout_secs, 3);
        assert_eq!(cfg.region.min_lat, 30.0);
        assert_eq!(cfg.cluster.grid_size_px, 80);
        assert_eq!(cfg.cluster.max_zoom, 12);
        assert_eq!(cfg.view.center, LatLng::new(34.9671, 135.7727));
        assert_eq!(cfg.view.zoom, 11);
    }

    #[test]
    fn blank_api_key_is_treated_as_absent() {
        let map: HashMap<&str, &str> = HashMap::from([("SHRINEMAP_PLACES_API_KEY", "   ")]);
        let cfg = build_app_config(lookup_from_map(&map)).expect("valid");
        assert!(cfg.places_api_key.is_none());
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let map: HashMap<&str, &str> = HashMap::from([("SHRINEMAP_PLACES_API_KEY", "secret-key")]);
        let cfg = build_app_config(lookup_from_map(&map)).expect("valid");
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn invalid_region_is_rejected() {
        let map: HashMap<&str, &str> = HashMap::from([("SHRINEMAP_REGION", "46,146,24,123")]);
        let err = build_app_config(lookup_from_map(&map)).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SHRINEMAP_REGION")
        );
    }

    #[test]
    fn cluster_min_size_error_names_the_variable() {
        let map: HashMap<&str, &str> = HashMap::from([("SHRINEMAP_CLUSTER_MIN_SIZE", "1")]);
        let err = build_app_config(lookup_from_map(&map)).unwrap_err();
        assert!(err.to_string().contains("SHRINEMAP_CLUSTER_MIN_SIZE"));
    }

    #[test]
    fn malformed_numbers_name_the_variable() {
        for (var, value) in [
            ("SHRINEMAP_BIND_ADDR", "not-an-addr"),
            ("SHRINEMAP_LOOKUP_TIMEOUT_SECS", "-1"),
            ("SHRINEMAP_DEFAULT_ZOOM", "300"),
            ("SHRINEMAP_DEFAULT_CENTER", "35.6"),
        ] {
            let map: HashMap<&str, &str> = HashMap::from([(var, value)]);
            let err = build_app_config(lookup_from_map(&map)).unwrap_err();
            assert!(err.to_string().contains(var), "{var}: {err}");
        }
    }
}
