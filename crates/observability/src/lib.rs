//! Process-wide tracing/logging setup.

pub mod subscriber;

pub use subscriber::LogFormat;

/// Initialize tracing/logging from `RUST_LOG` and `LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init(LogFormat::from_env());
}
