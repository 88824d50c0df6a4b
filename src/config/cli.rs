use crate::domain::model::Rate;
use crate::utils::error::{BridgeError, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "carrier-bridge")]
#[command(about = "Build carrier requests and normalize recorded carrier responses")]
pub struct Cli {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 詢價
    Rates(RatesArgs),
    /// 產生包裹標籤
    Label(LabelArgs),
    /// 零擔貨運託運
    Ship(LabelArgs),
    /// 作廢標籤
    Void(VoidArgs),
}

/// 每個子命令共用：設定檔、承運商與要重播的回應
#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    #[arg(long, default_value = "carrier-bridge.toml")]
    pub config: PathBuf,

    #[arg(long)]
    pub carrier: String,

    #[arg(long, help = "Recorded carrier response to replay")]
    pub response: PathBuf,

    #[arg(long, default_value = "200")]
    pub status: u16,
}

#[derive(Debug, Clone, Args)]
pub struct RatesArgs {
    #[command(flatten)]
    pub replay: ReplayArgs,

    #[arg(long)]
    pub shipment: PathBuf,

    #[arg(long, help = "RateOptions JSON; defaults apply when omitted")]
    pub options: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct LabelArgs {
    #[command(flatten)]
    pub replay: ReplayArgs,

    #[arg(long)]
    pub shipment: PathBuf,

    #[arg(long, help = "LabelOptions JSON (shipping_method is required)")]
    pub options: PathBuf,

    #[arg(long, help = "Directory for decoded label and document files")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct VoidArgs {
    #[command(flatten)]
    pub replay: ReplayArgs,

    #[arg(long)]
    pub label_id: String,

    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

/// 讀取 CLI 的 JSON 輸入檔；讀不到或格式不對都算呼叫端輸入錯誤
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let invalid = |message: String| BridgeError::InvalidInputError {
        path: path.display().to_string(),
        message,
    };
    let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))
}

#[derive(Debug, Serialize)]
struct RateRow<'a> {
    carrier_id: &'a str,
    service_code: &'a str,
    service_name: &'a str,
    total: Option<String>,
    currency: Option<String>,
    days_to_delivery: Option<u64>,
    delivery_date: Option<String>,
    remote_service_id: Option<&'a str>,
    warnings: String,
}

/// 費率表輸出為 CSV（每個費率一列）
pub fn rates_to_csv(rates: &[Rate]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for rate in rates {
        let total = rate.total_amount();
        writer
            .serialize(RateRow {
                carrier_id: &rate.shipping_method.carrier_id,
                service_code: &rate.shipping_method.service_code,
                service_name: &rate.shipping_method.name,
                total: total.as_ref().map(|money| money.amount()),
                currency: total.map(|money| money.currency),
                days_to_delivery: rate
                    .data
                    .get("days_to_delivery")
                    .or_else(|| rate.data.get("days_in_transit"))
                    .and_then(|days| days.as_u64()),
                delivery_date: rate.delivery_date.map(|date| date.format("%Y-%m-%d").to_string()),
                remote_service_id: rate.remote_service_id.as_deref(),
                warnings: rate.warnings.join("; "),
            })
            .map_err(csv_error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| BridgeError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| BridgeError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn csv_error(e: csv::Error) -> BridgeError {
    BridgeError::IoError(std::io::Error::other(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Money, ShippingMethod};
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_parse_rates_command() {
        let cli = Cli::parse_from([
            "carrier-bridge",
            "rates",
            "--carrier",
            "usps",
            "--response",
            "recorded.xml",
            "--shipment",
            "shipment.json",
            "--format",
            "csv",
            "--verbose",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Command::Rates(args) => {
                assert_eq!(args.replay.carrier, "usps");
                assert_eq!(args.replay.status, 200);
                assert_eq!(args.replay.config, PathBuf::from("carrier-bridge.toml"));
                assert_eq!(args.format, OutputFormat::Csv);
                assert!(args.options.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_label_requires_options() {
        let result = Cli::try_parse_from([
            "carrier-bridge",
            "label",
            "--carrier",
            "ship_engine",
            "--response",
            "label.json",
            "--shipment",
            "shipment.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_malformed_input_is_a_contract_error() {
        use crate::domain::model::Shipment;
        use crate::utils::error::ErrorCategory;
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"origin\": ").unwrap();
        let err = load_json::<Shipment>(file.path()).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidInputError { .. }));
        assert_eq!(err.category(), ErrorCategory::Contract);

        let err = load_json::<Shipment>(Path::new("/nonexistent/shipment.json")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Contract);
    }

    #[test]
    fn test_rates_to_csv() {
        let mut amounts = BTreeMap::new();
        amounts.insert("price".to_string(), Money::new(1650, "USD"));
        let mut rate = Rate::new(ShippingMethod::new("usps", "PRIORITY", "Priority Mail", &["US"]), amounts);
        rate.data.insert("days_to_delivery".to_string(), json!(3));

        let csv = rates_to_csv(&[rate]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("carrier_id,service_code,service_name,total,currency,days_to_delivery,delivery_date,remote_service_id,warnings")
        );
        assert_eq!(lines.next(), Some("usps,PRIORITY,Priority Mail,16.50,USD,3,,,"));
    }
}
