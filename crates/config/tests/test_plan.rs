//! Test plan for the `courier-config` crate.
//!
//! These tests exercise the configuration loader across default handling,
//! file discovery, and environment overrides.

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;

use courier_config::load;

const ENV_VARS_TO_RESET: &[&str] = &[
    "COURIER_CONFIG",
    "COURIER__HTTP__ADDRESS",
    "COURIER__HTTP__PORT",
    "COURIER__DATABASE__URL",
    "COURIER__DATABASE__MAX_CONNECTIONS",
    "COURIER__MEDIA__UPLOAD_DIR",
    "COURIER__MEDIA__PUBLIC_BASE_URL",
];

struct TestContext {
    vars: Vec<(String, Option<String>)>,
    original_dir: Option<PathBuf>,
}

impl TestContext {
    fn new() -> Self {
        let vars = ENV_VARS_TO_RESET
            .iter()
            .map(|name| {
                let previous = std::env::var(name).ok();
                std::env::remove_var(name);
                (name.to_string(), previous)
            })
            .collect();

        Self {
            vars,
            original_dir: std::env::current_dir().ok(),
        }
    }

    fn change_dir(&self, dir: &TempDir) {
        std::env::set_current_dir(dir.path()).expect("failed to enter temp dir");
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(dir) = self.original_dir.take() {
            let _ = std::env::set_current_dir(dir);
        }
        for (name, previous) in self.vars.drain(..) {
            match previous {
                Some(value) => std::env::set_var(&name, value),
                None => std::env::remove_var(&name),
            }
        }
    }
}

#[test]
#[serial]
fn defaults_apply_without_file_or_env() {
    let _ctx = TestContext::new();

    let config = load().expect("defaults should load");
    assert_eq!(config.http.address, "127.0.0.1");
    assert_eq!(config.http.port, 5000);
    assert_eq!(config.database.url, "sqlite://courier.db");
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(config.media.upload_dir, "uploads");
}

#[test]
#[serial]
fn config_file_is_discovered_in_cwd() {
    let ctx = TestContext::new();
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("courier.toml"),
        r#"
[http]
address = "0.0.0.0"
port = 8080

[database]
url = "sqlite://custom.db"
max_connections = 3
"#,
    )
    .unwrap();
    ctx.change_dir(&dir);

    let config = load().expect("file-backed config should load");
    assert_eq!(config.http.address, "0.0.0.0");
    assert_eq!(config.http.port, 8080);
    assert_eq!(config.database.url, "sqlite://custom.db");
    assert_eq!(config.database.max_connections, 3);
}

#[test]
#[serial]
fn explicit_config_path_wins_over_discovery() {
    let ctx = TestContext::new();
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("courier.toml"),
        "[http]\naddress = \"10.0.0.1\"\nport = 1111\n",
    )
    .unwrap();
    let explicit = dir.path().join("explicit.toml");
    fs::write(&explicit, "[http]\naddress = \"10.0.0.2\"\nport = 2222\n").unwrap();
    ctx.change_dir(&dir);
    std::env::set_var("COURIER_CONFIG", &explicit);

    let config = load().expect("explicit config should load");
    assert_eq!(config.http.address, "10.0.0.2");
    assert_eq!(config.http.port, 2222);
}

#[test]
#[serial]
fn environment_overrides_take_precedence() {
    let _ctx = TestContext::new();
    std::env::set_var("COURIER__HTTP__PORT", "9999");
    std::env::set_var("COURIER__MEDIA__UPLOAD_DIR", "/tmp/courier-media");

    let config = load().expect("env-overridden config should load");
    assert_eq!(config.http.port, 9999);
    assert_eq!(config.media.upload_dir, "/tmp/courier-media");
}
