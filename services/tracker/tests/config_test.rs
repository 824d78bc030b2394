use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use tracing::Level;
use tracker_lib::config::{Config, ConfigError};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn unset_variables_take_their_defaults() {
    let config = Config::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.data_dir, PathBuf::from("./data"));
    assert_eq!(config.namespace, "fitnesspro");
    assert_eq!(config.log_level, Level::INFO);
    assert_eq!(config.default_rest_secs, 90);
    assert_eq!(config.tick_interval, Duration::from_secs(1));
    assert_eq!(config.utc_offset.local_minus_utc(), 0);
    assert!(config.export_path.is_none());
}

#[test]
fn set_variables_are_parsed() {
    let config = Config::from_lookup(lookup(&[
        ("DATA_DIR", "/var/lib/fitness"),
        ("RUST_LOG", "debug"),
        ("DEFAULT_REST_SECONDS", "120"),
        ("TICK_INTERVAL_MS", "250"),
        ("CHAT_REPLY_DELAY_MS", "0"),
        ("UTC_OFFSET_MINUTES", "-300"),
        ("EXPORT_PATH", "out.json"),
    ]))
    .unwrap();
    assert_eq!(config.data_dir, PathBuf::from("/var/lib/fitness"));
    assert_eq!(config.log_level, Level::DEBUG);
    assert_eq!(config.default_rest_secs, 120);
    assert_eq!(config.tick_interval, Duration::from_millis(250));
    assert_eq!(config.chat_reply_delay, Duration::ZERO);
    assert_eq!(config.utc_offset.local_minus_utc(), -300 * 60);
    assert_eq!(config.export_path, Some(PathBuf::from("out.json")));
}

#[test]
fn bad_values_name_the_offending_variable() {
    let cases = [
        ("RUST_LOG", "loud"),
        ("DEFAULT_REST_SECONDS", "-5"),
        ("TICK_INTERVAL_MS", "0"),
        ("UTC_OFFSET_MINUTES", "100000"),
        ("STORAGE_NAMESPACE", " "),
    ];
    for (name, value) in cases {
        match Config::from_lookup(lookup(&[(name, value)])) {
            Err(ConfigError::InvalidValue(var, _)) => assert_eq!(var, name),
            other => panic!("{name}={value} gave {other:?}"),
        }
    }
}
