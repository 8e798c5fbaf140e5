use super::*;

/// Env mutations are process-global; serialize the tests that touch them.
static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

unsafe fn clear_gateway_env() {
    unsafe {
        std::env::remove_var("MS_HOST");
        std::env::remove_var("MS_ACCOUNT");
        std::env::remove_var("MS_PASSWORD");
        std::env::remove_var("PORT");
        std::env::remove_var("MS_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("MS_CONNECT_TIMEOUT_SECS");
    }
}

#[test]
fn from_env_applies_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_gateway_env();
        std::env::set_var("MS_ACCOUNT", "player@example.com");
        std::env::set_var("MS_PASSWORD", "hunter2");
    }

    let cfg = Config::from_env().unwrap();
    assert_eq!(cfg.base_host, DEFAULT_BASE_HOST);
    assert_eq!(cfg.account, "player@example.com");
    assert_eq!(cfg.secret, "hunter2");
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(
        cfg.timeouts,
        Timeouts {
            request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS
        }
    );

    unsafe { clear_gateway_env() };
}

#[test]
fn from_env_parses_overrides_and_trims_host() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_gateway_env();
        std::env::set_var("MS_HOST", "https://backend.test/");
        std::env::set_var("MS_ACCOUNT", "a");
        std::env::set_var("MS_PASSWORD", "b");
        std::env::set_var("PORT", "8080");
        std::env::set_var("MS_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("MS_CONNECT_TIMEOUT_SECS", "2");
    }

    let cfg = Config::from_env().unwrap();
    assert_eq!(cfg.base_host, "https://backend.test");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 5, connect_secs: 2 });

    unsafe { clear_gateway_env() };
}

#[test]
fn from_env_missing_account_errors() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_gateway_env();
        std::env::set_var("MS_PASSWORD", "b");
    }

    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::MissingVar("MS_ACCOUNT")));

    unsafe { clear_gateway_env() };
}

#[test]
fn from_env_invalid_port_errors() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_gateway_env();
        std::env::set_var("MS_ACCOUNT", "a");
        std::env::set_var("MS_PASSWORD", "b");
        std::env::set_var("PORT", "not-a-port");
    }

    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { var: "PORT", .. }));

    unsafe { clear_gateway_env() };
}
