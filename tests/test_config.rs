use hearth::config::{Config, LISTEN_ENV};
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:4221");
    assert_eq!(cfg.idle_timeout(), Duration::from_secs(5));
    assert_eq!(cfg.files.directory, PathBuf::from("."));
}

#[test]
fn test_config_listen_from_env() {
    // Only test in this binary that touches the environment.
    unsafe {
        std::env::set_var(LISTEN_ENV, "0.0.0.0:3000");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:3000");
    unsafe {
        std::env::remove_var(LISTEN_ENV);
    }
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml(
        "server:\n  listen_addr: 0.0.0.0:8080\n  idle_timeout_secs: 30\nfiles:\n  directory: /tmp/data\n",
    )
    .unwrap();

    assert_eq!(cfg.server.listen_addr, "0.0.0.0:8080");
    assert_eq!(cfg.idle_timeout(), Duration::from_secs(30));
    assert_eq!(cfg.files.directory, PathBuf::from("/tmp/data"));
}

#[test]
fn test_config_partial_yaml_keeps_defaults() {
    let cfg = Config::from_yaml("files:\n  directory: srv\n").unwrap();

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:4221");
    assert_eq!(cfg.server.idle_timeout_secs, 5);
    assert_eq!(cfg.files.directory, PathBuf::from("srv"));
}

#[test]
fn test_config_invalid_yaml() {
    assert!(Config::from_yaml("server: [not, a, map]").is_err());
}

#[test]
fn test_config_from_missing_file() {
    assert!(Config::from_file("/definitely/not/here.yaml").is_err());
}

#[test]
fn test_config_directory_flag() {
    let mut cfg = Config::default();
    cfg.apply_args(["--verbose", "--directory", "/tmp/files"].map(String::from))
        .unwrap();
    assert_eq!(cfg.files.directory, PathBuf::from("/tmp/files"));
}

#[test]
fn test_config_directory_flag_without_value() {
    let mut cfg = Config::default();
    assert!(cfg.apply_args(["--directory".to_string()]).is_err());
    assert_eq!(cfg.files.directory, PathBuf::from("."));
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1.server.listen_addr, cfg2.server.listen_addr);
}
