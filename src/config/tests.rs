use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_swaprec_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("SWAPREC_PORT");
        env::remove_var("SWAPREC_BIND_ADDR");
        env::remove_var("SWAPREC_DATASET_PATH");
        env::remove_var("SWAPREC_QDRANT_URL");
        env::remove_var("SWAPREC_COLLECTION");
        env::remove_var("SWAPREC_ORACLE_MODEL");
        env::remove_var("SWAPREC_BRAND_CAP");
        env::remove_var("SWAPREC_ORACLE_RETRIES");
        env::remove_var("SWAPREC_EXTERNAL_TIMEOUT_SECS");
        env::remove_var("SWAPREC_SESSION_CAPACITY");
        env::remove_var("SWAPREC_SESSION_IDLE_SECS");
        env::remove_var("SWAPREC_MOCK_ORACLE");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.dataset_path, PathBuf::from("./data/replacements.json"));
    assert_eq!(config.qdrant_url, "http://localhost:6334");
    assert_eq!(config.collection, "usa_products");
    assert_eq!(config.oracle_model, "gemini-2.0-flash");
    assert_eq!(config.brand_cap, 2);
    assert_eq!(config.oracle_retries, 3);
    assert!(!config.mock_oracle);
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_swaprec_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
}

#[test]
#[serial]
fn test_from_env_custom_port() {
    clear_swaprec_env();

    with_env_vars(&[("SWAPREC_PORT", "3000")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.port, 3000);
    });
}

#[test]
#[serial]
fn test_from_env_ipv6_bind_addr() {
    clear_swaprec_env();

    with_env_vars(&[("SWAPREC_BIND_ADDR", "::1")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(
            config.bind_addr,
            IpAddr::V6(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
    });
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_swaprec_env();

    with_env_vars(&[("SWAPREC_PORT", "0")], || {
        let result = Config::from_env();
        assert!(result.is_err());

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("invalid port"));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_swaprec_env();

    with_env_vars(&[("SWAPREC_PORT", "not_a_port")], || {
        let result = Config::from_env();
        assert!(result.is_err());

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
        assert!(err.to_string().contains("failed to parse port"));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_swaprec_env();

    with_env_vars(&[("SWAPREC_BIND_ADDR", "not.an.ip.address")], || {
        let result = Config::from_env();
        assert!(result.is_err());

        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
        assert!(err.to_string().contains("failed to parse bind address"));
    });
}

#[test]
#[serial]
fn test_full_config_parse() {
    clear_swaprec_env();

    with_env_vars(
        &[
            ("SWAPREC_PORT", "9090"),
            ("SWAPREC_BIND_ADDR", "0.0.0.0"),
            ("SWAPREC_DATASET_PATH", "/srv/swaprec/replacements.json"),
            ("SWAPREC_QDRANT_URL", "http://qdrant.cluster:6334"),
            ("SWAPREC_COLLECTION", "eu_products"),
            ("SWAPREC_ORACLE_MODEL", "gpt-4o-mini"),
            ("SWAPREC_BRAND_CAP", "3"),
            ("SWAPREC_ORACLE_RETRIES", "5"),
            ("SWAPREC_EXTERNAL_TIMEOUT_SECS", "20"),
            ("SWAPREC_SESSION_CAPACITY", "500"),
            ("SWAPREC_SESSION_IDLE_SECS", "900"),
            ("SWAPREC_MOCK_ORACLE", "true"),
        ],
        || {
            let config = Config::from_env().expect("should parse full config");

            assert_eq!(config.port, 9090);
            assert_eq!(
                config.bind_addr,
                IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0))
            );
            assert_eq!(
                config.dataset_path,
                PathBuf::from("/srv/swaprec/replacements.json")
            );
            assert_eq!(config.qdrant_url, "http://qdrant.cluster:6334");
            assert_eq!(config.collection, "eu_products");
            assert_eq!(config.oracle_model, "gpt-4o-mini");
            assert_eq!(config.brand_cap, 3);
            assert_eq!(config.oracle_retries, 5);
            assert_eq!(config.external_timeout_secs, 20);
            assert_eq!(config.session_capacity, 500);
            assert_eq!(config.session_idle_secs, 900);
            assert!(config.mock_oracle);
            assert_eq!(config.socket_addr(), "0.0.0.0:9090");
        },
    );
}

#[test]
#[serial]
fn test_invalid_numeric_values_use_defaults() {
    clear_swaprec_env();

    with_env_vars(
        &[
            ("SWAPREC_BRAND_CAP", "not_a_number"),
            ("SWAPREC_SESSION_CAPACITY", "-5"),
        ],
        || {
            let config = Config::from_env().expect("should parse with fallback");
            assert_eq!(config.brand_cap, 2);
            assert_eq!(config.session_capacity, 10_000);
        },
    );
}

#[test]
#[serial]
fn test_mock_oracle_flag_parsing() {
    clear_swaprec_env();

    for (value, expected) in [("1", true), ("TRUE", true), ("yes", true), ("0", false), ("off", false)] {
        with_env_vars(&[("SWAPREC_MOCK_ORACLE", value)], || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.mock_oracle, expected, "value {value:?}");
        });
    }
}

#[test]
fn test_validate_nonexistent_dataset_path() {
    let config = Config {
        dataset_path: PathBuf::from("/nonexistent/replacements.json"),
        ..Default::default()
    };

    let result = config.validate();
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, ConfigError::PathNotFound { .. }));
}

#[test]
fn test_validate_dataset_path_is_directory() {
    let config = Config {
        dataset_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src"),
        ..Default::default()
    };

    let result = config.validate();
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, ConfigError::NotAFile { .. }));
}

#[test]
fn test_validate_rejects_zero_brand_cap() {
    let config = Config {
        dataset_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml"),
        brand_cap: 0,
        ..Default::default()
    };

    let result = config.validate();
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, ConfigError::ZeroValue { .. }));
    assert!(err.to_string().contains("brand cap"));
}

#[test]
fn test_validate_success_with_existing_file() {
    let config = Config {
        dataset_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml"),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}

#[test]
fn test_session_policy_derivation() {
    let config = Config {
        brand_cap: 4,
        oracle_retries: 6,
        external_timeout_secs: 25,
        ..Default::default()
    };

    let policy = config.session_policy();
    assert_eq!(policy.brand_cap, 4);
    assert_eq!(policy.oracle_retries, 6);
    assert_eq!(policy.external_timeout, Duration::from_secs(25));
    // Untouched knobs keep their defaults.
    assert_eq!(policy.shortlist_limit, 25);
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = ConfigError::InvalidPort {
        value: "0".to_string(),
    };
    assert!(err.to_string().contains("invalid port"));
    assert!(err.to_string().contains("1 and 65535"));

    let err = ConfigError::PathNotFound {
        path: PathBuf::from("/some/path"),
    };
    assert!(err.to_string().contains("/some/path"));

    let err = ConfigError::ZeroValue {
        name: "oracle retries",
    };
    assert!(err.to_string().contains("oracle retries"));
}
