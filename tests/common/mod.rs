//! Common test utilities shared across integration tests.

use knizk::{Knizk, KnizkConfig, ScryptParams};

/// Initialize test tracing (call once at the beginning of tests).
///
/// Logs at DEBUG level from the library go to the test writer.
/// Subsequent calls are safe and will be ignored.
#[allow(dead_code)]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("knizk=debug");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

/// A context with cheap scrypt parameters so tests stay fast.
#[allow(dead_code)]
pub fn fast_knizk() -> Knizk {
    Knizk::new(KnizkConfig {
        scrypt: ScryptParams::new(1024, 8, 1, 32).expect("valid scrypt parameters"),
        ..KnizkConfig::default()
    })
    .expect("valid configuration")
}
