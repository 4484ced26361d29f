use std::sync::Arc;
use toolbelt_fs::MemFs;
use toolbelt_logging::{
    init_logging_with_console, Destination, LogConfig, LogError, RenderMode, Severity,
    SharedBuffer,
};

// Installing a global subscriber is once per process, so this file holds a
// single test.
#[test]
fn install_tracing_routes_events_once() {
    std::env::remove_var("RUST_LOG");

    let console = SharedBuffer::new();
    let config = LogConfig::builder(Arc::new(MemFs::new()))
        .persist_to_disk(false)
        .min_severity(Severity::Info)
        .render_mode(RenderMode::Plain)
        .build();
    let logger =
        init_logging_with_console(&config, Destination::writer("console", console.clone()))
            .unwrap();

    logger.install_tracing().unwrap();
    tracing::info!(k = 1, "via tracing");
    tracing::debug!("hidden");

    let lines = console.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0], format!("INFO: via tracing k=1 target={}", module_path!()));

    assert!(matches!(logger.install_tracing(), Err(LogError::Subscriber(_))));
}
