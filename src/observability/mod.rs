//! 可观测性

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 日志初始化：默认 info，可通过 RUST_LOG 覆盖。
/// 日志走 stderr，stdout 留给请求/响应通道。
pub fn init() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
