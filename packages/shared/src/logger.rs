//! Logger setup based on `tracing-subscriber`.

use tracing_subscriber::{EnvFilter, fmt};

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// The binary itself, the server library and request traces from tower-http
/// are enabled at the given level.
pub fn default_filter(bin_name: &str, level: &str) -> String {
    let bin_target = bin_name.replace('-', "_");
    format!("{bin_target}={level},roomcast_server={level},tower_http={level}")
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. Calling this more than
/// once is harmless: the second registration is ignored.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(bin_name, default_level)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_normalizes_bin_name() {
        // テスト項目: バイナリ名のハイフンがアンダースコアに変換される
        // when (操作):
        let filter = default_filter("roomcast-bench", "debug");

        // then (期待する結果):
        assert_eq!(
            filter,
            "roomcast_bench=debug,roomcast_server=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_setup_logger_twice_does_not_panic() {
        // テスト項目: setup_logger を複数回呼んでも panic しない
        setup_logger("roomcast-server", "info");
        setup_logger("roomcast-server", "info");
    }
}
