use tracing::Level;

/// Installs the global subscriber: `tracing-wasm` in the browser, a plain fmt
/// subscriber on stderr elsewhere. Later calls are ignored.
#[cfg(target_arch = "wasm32")]
pub fn init(level: &str) {
    static INIT: std::sync::Once = std::sync::Once::new();
    let level = parse_level(level);
    INIT.call_once(|| {
        let config = tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .build();
        tracing_wasm::set_as_global_default_with_config(config);
    });
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: &str) {
    // Already installed by the host or another engine.
    let _ = tracing::subscriber::set_global_default(subscriber(level));
}

/// The native subscriber, without timestamps or colors.
#[cfg(not(target_arch = "wasm32"))]
pub fn subscriber(level: &str) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish()
}

pub fn parse_level(level: &str) -> Level {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
