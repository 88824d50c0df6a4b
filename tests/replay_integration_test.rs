use base64::Engine;
use carrier_bridge::carriers::usps::codes::{shipping_method, PRIORITY};
use carrier_bridge::carriers::ups_freight::codes::shipping_methods as freight_methods;
use carrier_bridge::{
    BridgeConfig, BridgeError, Carrier, FailureKind, HttpMethod, Item, LabelDownloadType, LabelFormat, LabelOptions,
    Location, Money, Package, PackageOptions, PackageOptionsMap, RateOptions, ReplayTransport, Shipment,
    ShippingEngine, ShippingMethod, Weight,
};
use serde_json::{json, Value};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const CONFIG: &str = r#"
[bridge]
name = "integration"

[ups_freight]
base_url = "https://freight.test"
shipper_number = "AB1234"

[usps]
base_url = "https://usps.test/ShippingAPI.dll"
login = "LOGIN1"

[ship_engine]
base_url = "https://engine.test"
"#;

fn location(postal_code: &str) -> Location {
    Location {
        name: Some("Jane Shipper".into()),
        company_name: Some("Acme Widgets".into()),
        address1: Some("1 Warehouse Way".into()),
        city: Some("Richmond".into()),
        region: Some("VA".into()),
        postal_code: Some(postal_code.into()),
        country: "US".into(),
        phone: Some("555-0100".into()),
        ..Default::default()
    }
}

fn package(id: &str, pounds: f64) -> Package {
    Package::new(
        id,
        vec![Item {
            id: format!("{}-item", id),
            weight: Weight::pounds(pounds),
            description: Some("Widgets".into()),
            declared_value: None,
        }],
    )
}

fn shipment(packages: Vec<Package>) -> Shipment {
    Shipment {
        origin: location("23224"),
        destination: location("20008"),
        packages,
    }
}

fn engine(transport: ReplayTransport) -> ShippingEngine<ReplayTransport> {
    let registry = BridgeConfig::from_toml_str(CONFIG).unwrap().registry().unwrap();
    ShippingEngine::new(registry, transport)
}

fn recorded(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_config_registers_every_configured_carrier() {
    let engine = engine(ReplayTransport::from_bytes("{}", 200));
    assert_eq!(engine.registry().ids(), vec!["ship_engine", "ups_freight", "usps"]);
}

#[tokio::test]
async fn test_ups_freight_rates_from_recorded_file() {
    let fixture = recorded(
        &json!({
            "FreightRateResponse": {
                "Response": {"ResponseStatus": {"Code": "1"}},
                "Service": {"Code": "308"},
                "TotalShipmentCharge": {"CurrencyCode": "USD", "MonetaryValue": "2.76"},
                "BillableShipmentWeight": {"UnitOfMeasurement": {"Code": "LBS"}, "Value": "500"}
            }
        })
        .to_string(),
    );
    let engine = engine(ReplayTransport::from_file(fixture.path(), 200));
    let options = RateOptions {
        shipping_method: Some(freight_methods().remove(0)),
        ..Default::default()
    };

    let result = engine
        .rates("ups_freight", &shipment(vec![package("p1", 500.0)]), &options)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.data.len(), 1);
    assert_eq!(result.data[0].total_amount(), Some(Money::new(276, "USD")));
    assert!(result.original_request.is_none());
    assert!(result.original_response.is_none());

    let sent = engine.transport().sent_requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].http_method, HttpMethod::Post);
    assert_eq!(sent[0].url, "https://freight.test/ship/v1/freight/rating/ground");
    let body: Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
    let commodity = &body["FreightRateRequest"]["Commodity"][0];
    assert_eq!(commodity["Weight"]["Value"], "500.0");
    assert_eq!(commodity["Weight"]["UnitOfMeasurement"]["Code"], "LBS");
    assert_eq!(commodity["NumberOfPieces"], "1");
    assert_eq!(commodity["PackagingType"]["Code"], "PLT");
}

#[tokio::test]
async fn test_debug_keeps_payloads_on_failure() {
    let engine = engine(ReplayTransport::from_bytes("", 401));
    let options = RateOptions {
        shipping_method: Some(freight_methods().remove(0)),
        debug: true,
        ..Default::default()
    };
    let failure = engine
        .rates("ups_freight", &shipment(vec![package("p1", 10.0)]), &options)
        .await
        .unwrap()
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Carrier);
    assert_eq!(failure.message, "401 Unauthorized");
    assert!(failure.original_request.is_some());
    assert_eq!(failure.original_response.unwrap().status, 401);
}

#[tokio::test]
async fn test_usps_combines_packages_into_one_rate() {
    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<RateV4Response>
  <Package ID="0">
    <Postage CLASSID="1"><MailService>Priority Mail 2-Day&amp;lt;sup&amp;gt;&amp;#8482;&amp;lt;/sup&amp;gt;</MailService><Rate>7.35</Rate></Postage>
  </Package>
  <Package ID="1">
    <Postage CLASSID="1"><MailService>Priority Mail 3-Day&amp;lt;sup&amp;gt;&amp;#8482;&amp;lt;/sup&amp;gt;</MailService><Rate>9.15</Rate></Postage>
  </Package>
</RateV4Response>"#;
    let engine = engine(ReplayTransport::from_bytes(body, 200).with_header("Content-Type", "text/xml"));
    let options = RateOptions {
        shipping_method: shipping_method(PRIORITY),
        ..Default::default()
    };

    let rates = engine
        .rates("usps", &shipment(vec![package("p1", 1.0), package("p2", 2.0)]), &options)
        .await
        .unwrap()
        .unwrap()
        .data;

    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0].total_amount(), Some(Money::new(1650, "USD")));
    assert_eq!(rates[0].data["days_to_delivery"], json!(3));

    let sent = engine.transport().sent_requests();
    assert_eq!(sent[0].http_method, HttpMethod::Get);
    let url = url::Url::parse(&sent[0].url).unwrap();
    let document = url
        .query_pairs()
        .find(|(key, _)| key == "XML")
        .map(|(_, value)| value.into_owned())
        .unwrap();
    assert!(document.starts_with(r#"<RateV4Request USERID="LOGIN1">"#));
    assert!(document.contains(r#"<Package ID="1">"#));
    assert!(document.contains("<Ounces>32.00</Ounces>"));
}

#[tokio::test]
async fn test_usps_rejects_unknown_box_name_before_sending() {
    let engine = engine(ReplayTransport::from_bytes("", 200));
    let options = RateOptions {
        shipping_method: shipping_method(PRIORITY),
        packages: PackageOptionsMap::default().with(
            "p1",
            PackageOptions {
                box_name: Some("shoebox".into()),
                ..Default::default()
            },
        ),
        ..Default::default()
    };
    let err = engine
        .rates("usps", &shipment(vec![package("p1", 1.0)]), &options)
        .await
        .unwrap_err();

    match err {
        BridgeError::BuildError(inner) => {
            assert_eq!(inner.to_string(), "Unknown box name 'shoebox' for package p1")
        }
        other => panic!("expected a build error, got {other}"),
    }
    assert!(engine.transport().sent_requests().is_empty());
}

#[tokio::test]
async fn test_ship_engine_inline_label_written_to_disk() {
    let zpl = "^XA^FO50,50^FDHello^FS^XZ";
    let href = format!(
        "data:application/zpl;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(zpl)
    );
    let fixture = recorded(
        &json!({
            "label_id": "se-28529731",
            "status": "completed",
            "shipment_id": "se-28529731",
            "shipment_cost": {"currency": "usd", "amount": 7.35},
            "insurance_cost": {"currency": "usd", "amount": 1.25},
            "tracking_number": "9400111899561704681189",
            "label_format": "zpl",
            "service_code": "usps_priority_mail",
            "label_download": {"href": href}
        })
        .to_string(),
    );
    let engine = engine(ReplayTransport::from_file(fixture.path(), 200));
    let mut options = LabelOptions::new(ShippingMethod::new(
        "ship_engine",
        "usps_priority_mail",
        "USPS Priority Mail",
        &["US"],
    ));
    options.label_format = LabelFormat::Zpl;
    options.download_type = LabelDownloadType::Inline;

    let label = engine
        .label("ship_engine", &shipment(vec![package("p1", 1.0)]), &options)
        .await
        .unwrap()
        .unwrap()
        .data
        .remove(0);

    assert_eq!(label.label_data_str(), Some(zpl));
    assert_eq!(label.cost, Some(Money::new(860, "USD")));

    let out = TempDir::new().unwrap();
    let path = out.path().join(format!("{}.{}", label.id.as_deref().unwrap(), label.label_format));
    tokio::fs::write(&path, label.label_data.as_deref().unwrap()).await.unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), zpl);
}

#[tokio::test]
async fn test_ship_engine_rates_require_carriers() {
    let engine = engine(ReplayTransport::from_bytes("[]", 200));
    let err = engine
        .rates("ship_engine", &shipment(vec![package("p1", 1.0)]), &RateOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::BuildError(_)));

    let options = RateOptions {
        carriers: vec![Carrier {
            id: "se-123890".into(),
            name: "Stamps.com".into(),
            code: "stamps_com".into(),
            balance: None,
            shipping_methods: Vec::new(),
        }],
        ..Default::default()
    };
    let rates = engine
        .rates("ship_engine", &shipment(vec![package("p1", 1.0)]), &options)
        .await
        .unwrap()
        .unwrap()
        .data;
    assert!(rates.is_empty());
}

#[tokio::test]
async fn test_missing_recording_is_a_transport_error() {
    let dir = TempDir::new().unwrap();
    let engine = engine(ReplayTransport::from_file(dir.path().join("missing.json"), 200));
    let options = RateOptions {
        shipping_method: Some(freight_methods().remove(0)),
        ..Default::default()
    };
    let err = engine
        .rates("ups_freight", &shipment(vec![package("p1", 10.0)]), &options)
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::TransportError { .. }));
}
