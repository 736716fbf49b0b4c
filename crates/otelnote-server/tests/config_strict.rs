#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use otelnote_server::config::{self, ServiceConfig, StorageBackend};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
telemetry:
  endpiont: "collector:4317" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.server.listen, "0.0.0.0:5000");
    assert_eq!(cfg.storage.backend, StorageBackend::Memory);
    assert_eq!(cfg.storage.max_content_chars, 500);
    assert_eq!(cfg.telemetry.endpoint, "localhost:4317");
    assert!(cfg.telemetry.insecure);
    assert!(cfg.telemetry.enabled);
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
server:
  listen: "127.0.0.1:8080"
storage:
  backend: sqlite
  path: "/var/lib/otelnote/notes.db"
  max_content_chars: 1000
telemetry:
  endpoint: "otel-collector:4317"
  insecure: false
  export_interval_ms: 5000
  service_name: "notes-api"
  meter_name: "notes"
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.storage.backend, StorageBackend::Sqlite);
    assert_eq!(cfg.storage.path, "/var/lib/otelnote/notes.db");
    assert_eq!(cfg.telemetry.export_interval_ms, 5000);
    assert!(!cfg.telemetry.insecure);
}

#[test]
fn rejects_out_of_range_values() {
    for bad in [
        "version: 2\n",
        "version: 1\nserver: { listen: \"not-an-addr\" }\n",
        "version: 1\nstorage: { max_content_chars: 0 }\n",
        "version: 1\ntelemetry: { export_interval_ms: 10 }\n",
        "version: 1\nstorage: { backend: postgres }\n",
    ] {
        assert!(config::load_from_str(bad).is_err(), "accepted: {bad}");
    }
}

#[test]
fn endpoint_override_wins_unless_blank() {
    let mut cfg = ServiceConfig::default();
    config::apply_endpoint_override(&mut cfg, Some("   ".into()));
    assert_eq!(cfg.telemetry.endpoint, "localhost:4317");

    config::apply_endpoint_override(&mut cfg, Some("otel-collector:4317".into()));
    assert_eq!(cfg.telemetry.endpoint, "otel-collector:4317");

    config::apply_endpoint_override(&mut cfg, None);
    assert_eq!(cfg.telemetry.endpoint, "otel-collector:4317");
}
