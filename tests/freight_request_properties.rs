use carrier_bridge::carriers::ups_freight::codes::shipping_methods;
use carrier_bridge::carriers::ups_freight::request::rate_request_body;
use carrier_bridge::{Item, Location, Package, PackageOptions, PackageOptionsMap, RateOptions, Shipment, Weight};
use proptest::prelude::*;
use serde_json::Value;

fn location() -> Location {
    Location {
        company_name: Some("Acme Widgets".into()),
        address1: Some("1 Warehouse Way".into()),
        city: Some("Richmond".into()),
        region: Some("VA".into()),
        postal_code: Some("23224".into()),
        country: "US".into(),
        ..Default::default()
    }
}

fn build(units: &[&str], pounds: f64) -> (Shipment, RateOptions) {
    let packages: Vec<Package> = (0..units.len())
        .map(|i| {
            Package::new(
                format!("p{}", i + 1),
                vec![Item {
                    id: format!("i{}", i + 1),
                    weight: Weight::pounds(pounds),
                    description: Some("Widgets".into()),
                    declared_value: None,
                }],
            )
        })
        .collect();
    let map = units
        .iter()
        .enumerate()
        .fold(PackageOptionsMap::default(), |map, (i, unit)| {
            map.with(
                format!("p{}", i + 1),
                PackageOptions {
                    handling_unit: Some(unit.to_string()),
                    ..Default::default()
                },
            )
        });
    let shipment = Shipment {
        origin: location(),
        destination: location(),
        packages,
    };
    let options = RateOptions {
        shipping_method: Some(shipping_methods().remove(0)),
        packages: map,
        ..Default::default()
    };
    (shipment, options)
}

proptest! {
    #[test]
    fn handling_unit_slot_follows_first_seen_group(
        units in Just(vec!["pallet", "pallet", "skid"]).prop_shuffle()
    ) {
        let (shipment, options) = build(&units, 100.0);
        let body = rate_request_body(&shipment, &options, "AB1234").unwrap();
        let request = &body["FreightRateRequest"];

        let (code, quantity) = if units[0] == "pallet" { ("PLT", "2") } else { ("SKD", "1") };
        prop_assert_eq!(&request["HandlingUnitOne"]["Type"]["Code"], code);
        prop_assert_eq!(&request["HandlingUnitOne"]["Quantity"], quantity);
        prop_assert_eq!(&request["HandlingUnitTwo"], &Value::Null);
        prop_assert_eq!(request["Commodity"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn rate_request_is_deterministic(
        units in Just(vec!["pallet", "skid", "loose", "pallet"]).prop_shuffle(),
        pounds in 1.0f64..2000.0,
    ) {
        let (shipment, options) = build(&units, pounds);
        let first = serde_json::to_string(&rate_request_body(&shipment, &options, "AB1234").unwrap()).unwrap();
        let second = serde_json::to_string(&rate_request_body(&shipment, &options, "AB1234").unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn commodity_weight_has_one_decimal(pounds in 0.1f64..5000.0) {
        let (shipment, options) = build(&["pallet"], pounds);
        let body = rate_request_body(&shipment, &options, "AB1234").unwrap();
        let weight = &body["FreightRateRequest"]["Commodity"][0]["Weight"];
        prop_assert_eq!(&weight["Value"], &Value::String(format!("{:.1}", pounds)));
        prop_assert_eq!(&weight["UnitOfMeasurement"]["Code"], "LBS");
    }
}

#[test]
fn test_loose_goes_to_second_slot_regardless_of_order() {
    let (shipment, options) = build(&["loose", "pallet"], 50.0);
    let body = rate_request_body(&shipment, &options, "AB1234").unwrap();
    let request = &body["FreightRateRequest"];
    assert_eq!(request["HandlingUnitOne"]["Type"]["Code"], "PLT");
    assert_eq!(request["HandlingUnitTwo"]["Type"]["Code"], "LOO");
    assert_eq!(request["HandlingUnitTwo"]["Quantity"], "1");
}
