use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// RUST_LOG 優先；否則只開本 crate 的 info（verbose 時 debug）
fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        "carrier_bridge=debug,info"
    } else {
        "carrier_bridge=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// 日誌寫到 stderr，stdout 留給費率與標籤輸出
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn json_subscriber(verbose: bool) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .with_current_span(false)
        .finish()
}

/// 批次處理時使用 JSON 格式，方便集中收集日誌
pub fn init_json_logger(verbose: bool) {
    json_subscriber(verbose).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_subscriber_accepts_events() {
        tracing::subscriber::with_default(json_subscriber(true), || {
            tracing::info!(carrier = "usps", "📊 json logging works");
        });
    }
}
