//! QuickNote 日志
//! RUST_LOG 优先；否则本服务按配置级别输出，依赖库只保留警告

use crate::{config::AppConfig, error::AppError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 未设置 RUST_LOG 时的过滤规则
fn default_directives(level: &str) -> String {
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level.to_lowercase())
}

/// 安装全局 subscriber，进程内只能调用一次
pub fn init_telemetry(config: &AppConfig) -> Result<(), AppError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(&config.logging.level))
            .map_err(|e| AppError::Config(format!("Invalid log level: {}", e)))?,
    };

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let log_layer = if config.logging.format.eq_ignore_ascii_case("json") {
        fmt_layer.json().with_current_span(true).boxed()
    } else {
        fmt_layer.pretty().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(log_layer)
        .try_init()
        .map_err(|e| AppError::Internal(format!("Tracing subscriber already set: {}", e)))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.database.backend,
        format = %config.logging.format,
        "QuickNote telemetry initialized"
    );

    Ok(())
}
