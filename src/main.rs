use anyhow::Context;
use carrier_bridge::config::cli::{load_json, rates_to_csv, Cli, Command, LabelArgs, OutputFormat, RatesArgs, ReplayArgs, VoidArgs};
use carrier_bridge::utils::error::{BridgeError, ErrorCategory};
use carrier_bridge::utils::{logger, validation::Validate};
use carrier_bridge::{
    ApiFailure, BridgeConfig, Label, LabelOptions, RateOptions, ReplayTransport, Shipment, ShippingEngine,
};
use clap::Parser;
use serde::Serialize;
use std::path::Path;

/// 承運商回應層級的失敗（非使用錯誤）
const CARRIER_FAILURE_EXIT: i32 = 4;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting carrier-bridge CLI");
    if cli.verbose {
        tracing::debug!("CLI command: {:?}", cli.command);
    }

    let result = match cli.command {
        Command::Rates(args) => rates(args).await,
        Command::Label(args) => label(args).await,
        Command::Ship(args) => ship(args).await,
        Command::Void(args) => void(args).await,
    };

    match result {
        Ok(None) => Ok(()),
        Ok(Some(failure)) => {
            tracing::error!("❌ Carrier failure ({:?}): {}", failure.kind, failure.message);
            println!("{}", serde_json::to_string_pretty(&failure)?);
            std::process::exit(CARRIER_FAILURE_EXIT);
        }
        Err(e) => {
            match e.downcast_ref::<BridgeError>() {
                Some(bridge_error) => {
                    tracing::error!("❌ {} (Category: {:?})", bridge_error, bridge_error.category());
                    eprintln!("❌ {}", bridge_error.user_friendly_message());
                    std::process::exit(exit_code(bridge_error.category()));
                }
                None => {
                    tracing::error!("❌ {:#}", e);
                    eprintln!("❌ {:#}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn exit_code(category: ErrorCategory) -> i32 {
    match category {
        ErrorCategory::Contract => 2,
        ErrorCategory::Configuration => 3,
        ErrorCategory::Transport | ErrorCategory::System => 1,
    }
}

fn engine(replay: &ReplayArgs) -> anyhow::Result<(BridgeConfig, ShippingEngine<ReplayTransport>)> {
    let config = BridgeConfig::from_file(&replay.config)?;
    let registry = config.registry()?;
    tracing::info!("⚙️ Loaded {} with carriers {:?}", config.bridge.name, registry.ids());
    let transport = ReplayTransport::from_file(&replay.response, replay.status);
    Ok((config, ShippingEngine::new(registry, transport)))
}

fn load_shipment(path: &Path) -> anyhow::Result<Shipment> {
    let shipment: Shipment = load_json(path)?;
    shipment.validate()?;
    Ok(shipment)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn write_output(dir: &Path, file_name: &str, bytes: &[u8]) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("write {}", path.display()))?;
    tracing::info!("📁 Saved {}", path.display());
    Ok(())
}

async fn rates(args: RatesArgs) -> anyhow::Result<Option<ApiFailure>> {
    let (config, engine) = engine(&args.replay)?;
    let shipment = load_shipment(&args.shipment)?;
    let mut options: RateOptions = match &args.options {
        Some(path) => load_json(path)?,
        None => RateOptions::default(),
    };
    options.debug |= config.bridge.debug;

    let result = match engine.rates(&args.replay.carrier, &shipment, &options).await? {
        Ok(result) => result,
        Err(failure) => return Ok(Some(failure)),
    };
    match args.format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Csv => print!("{}", rates_to_csv(&result.data)?),
    }
    Ok(None)
}

async fn label(args: LabelArgs) -> anyhow::Result<Option<ApiFailure>> {
    let (config, engine) = engine(&args.replay)?;
    let shipment = load_shipment(&args.shipment)?;
    let mut options: LabelOptions = load_json(&args.options)?;
    options.debug |= config.bridge.debug;

    let result = match engine.label(&args.replay.carrier, &shipment, &options).await? {
        Ok(result) => result,
        Err(failure) => return Ok(Some(failure)),
    };
    if let Some(dir) = &args.output_dir {
        for (index, label) in result.data.iter().enumerate() {
            if let Some(data) = &label.label_data {
                let stem = label.id.clone().unwrap_or_else(|| format!("label-{}", index + 1));
                write_output(dir, &format!("{}.{}", stem, label.label_format), data).await?;
            }
        }
    }
    print_json(&result)?;
    Ok(None)
}

async fn ship(args: LabelArgs) -> anyhow::Result<Option<ApiFailure>> {
    let (config, engine) = engine(&args.replay)?;
    let shipment = load_shipment(&args.shipment)?;
    let mut options: LabelOptions = load_json(&args.options)?;
    options.debug |= config.bridge.debug;

    let result = match engine.ship(&args.replay.carrier, &shipment, &options).await? {
        Ok(result) => result,
        Err(failure) => return Ok(Some(failure)),
    };
    if let Some(dir) = &args.output_dir {
        for (index, document) in result.data.documents.iter().enumerate() {
            let name = format!("{}-{}.{}", document.document_type, index + 1, document.format);
            write_output(dir, &name, &document.binary).await?;
        }
    }
    print_json(&result)?;
    Ok(None)
}

async fn void(args: VoidArgs) -> anyhow::Result<Option<ApiFailure>> {
    let (config, engine) = engine(&args.replay)?;
    let label = Label::from_id(args.label_id.trim());

    match engine
        .void(&args.replay.carrier, &label, args.debug || config.bridge.debug)
        .await?
    {
        Ok(result) => {
            print_json(&result)?;
            Ok(None)
        }
        Err(failure) => Ok(Some(failure)),
    }
}
