use super::codes::PACKAGE_CODES;
use crate::domain::model::{Dimensions, Location, Package, Shipment};
use crate::domain::options::{LabelOptions, PackageOptions, RateOptions};
use crate::utils::error::BuildError;
use serde_json::{json, Map, Value};

fn residential_indicator(location: &Location) -> &'static str {
    match location.residential {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    }
}

fn weight_hash(package: &Package) -> Value {
    json!({"value": package.total_weight().to_ounces(), "unit": "ounce"})
}

fn dimensions_hash(dimensions: &Dimensions) -> Value {
    json!({
        "unit": "inch",
        "length": dimensions.length.to_inches(),
        "width": dimensions.width.to_inches(),
        "height": dimensions.height.to_inches(),
    })
}

fn address_hash(location: &Location) -> Value {
    let mut address = Map::new();
    address.insert("name".into(), json!(location.name.as_deref().unwrap_or_default()));
    address.insert("phone".into(), json!(location.phone.as_deref().unwrap_or_default()));
    if let Some(company) = &location.company_name {
        address.insert("company_name".into(), json!(company));
    }
    address.insert("address_line1".into(), json!(location.address1.as_deref().unwrap_or_default()));
    if let Some(line) = &location.address2 {
        address.insert("address_line2".into(), json!(line));
    }
    if let Some(line) = &location.address3 {
        address.insert("address_line3".into(), json!(line));
    }
    address.insert("city_locality".into(), json!(location.city.as_deref().unwrap_or_default()));
    address.insert("state_province".into(), json!(location.region.as_deref().unwrap_or_default()));
    address.insert("postal_code".into(), json!(location.postal_code.as_deref().unwrap_or_default()));
    address.insert("country_code".into(), json!(location.country));
    address.insert(
        "address_residential_indicator".into(),
        json!(residential_indicator(location)),
    );
    Value::Object(address)
}

/// 最多三行參考訊息
fn label_messages(options: &PackageOptions) -> Map<String, Value> {
    options
        .reference_messages
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, message)| (format!("reference{}", i + 1), json!(message)))
        .collect()
}

/// `/v1/rates/estimate`：估價只看第一個包裹
pub fn rate_estimate_body(shipment: &Shipment, options: &RateOptions) -> Result<Value, BuildError> {
    options.packages.check_against(shipment)?;
    if options.carriers.is_empty() {
        return Err(BuildError::NoCarriers);
    }
    let package = shipment
        .packages
        .first()
        .ok_or(BuildError::MissingOption { field: "packages" })?;

    let origin = &shipment.origin;
    let destination = &shipment.destination;
    let mut body = Map::new();
    body.insert(
        "carrier_ids".into(),
        json!(options.carriers.iter().map(|c| c.id.as_str()).collect::<Vec<_>>()),
    );
    body.insert("from_country_code".into(), json!(origin.country));
    body.insert("from_postal_code".into(), json!(origin.postal_code.as_deref().unwrap_or_default()));
    body.insert("from_city_locality".into(), json!(origin.city.as_deref().unwrap_or_default()));
    body.insert("from_state_province".into(), json!(origin.region.as_deref().unwrap_or_default()));
    body.insert("to_country_code".into(), json!(destination.country));
    body.insert("to_postal_code".into(), json!(destination.postal_code.as_deref().unwrap_or_default()));
    body.insert("to_city_locality".into(), json!(destination.city.as_deref().unwrap_or_default()));
    body.insert("to_state_province".into(), json!(destination.region.as_deref().unwrap_or_default()));
    body.insert("weight".into(), weight_hash(package));
    body.insert("dimensions".into(), dimensions_hash(&package.dimensions()));
    body.insert("confirmation".into(), json!("none"));
    body.insert(
        "address_residential_indicator".into(),
        json!(residential_indicator(destination)),
    );
    if let Some(ship_date) = options.ship_date {
        body.insert("ship_date".into(), json!(ship_date.format("%Y-%m-%d").to_string()));
    }
    Ok(Value::Object(body))
}

/// `/v1/labels`
pub fn label_body(shipment: &Shipment, options: &LabelOptions) -> Result<Value, BuildError> {
    options.packages.check_against(shipment)?;

    let packages = shipment
        .packages
        .iter()
        .map(|package| {
            let package_options = options.packages.options_for(&package.id);
            let mut hash = Map::new();
            hash.insert("weight".into(), weight_hash(package));
            hash.insert("dimensions".into(), dimensions_hash(&package.dimensions()));
            if let Some(symbol) = &package_options.packaging {
                let entry = PACKAGE_CODES.resolve(symbol, &package.id)?;
                hash.insert("package_code".into(), json!(entry.code));
            }
            let messages = label_messages(package_options);
            if !messages.is_empty() {
                hash.insert("label_messages".into(), Value::Object(messages));
            }
            Ok(Value::Object(hash))
        })
        .collect::<Result<Vec<Value>, BuildError>>()?;

    let mut inner = Map::new();
    inner.insert("service_code".into(), json!(options.shipping_method.service_code));
    inner.insert("ship_to".into(), address_hash(&shipment.destination));
    inner.insert("ship_from".into(), address_hash(&shipment.origin));
    if let Some(ship_date) = options.ship_date {
        inner.insert("ship_date".into(), json!(ship_date.format("%Y-%m-%d").to_string()));
    }
    inner.insert("packages".into(), Value::Array(packages));

    Ok(json!({
        "label_format": options.label_format.as_str(),
        "label_download_type": options.download_type.as_str(),
        "shipment": inner,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Carrier, Item, ShippingMethod, Weight};
    use crate::domain::options::{LabelDownloadType, LabelFormat, PackageOptionsMap};

    fn shipment() -> Shipment {
        let mut package = Package::new(
            "p1",
            vec![Item {
                id: "i1".into(),
                weight: Weight::pounds(2.0),
                description: None,
                declared_value: None,
            }],
        );
        package.dimensions = Some(Dimensions::inches(6.0, 8.0, 4.0));
        Shipment {
            origin: Location {
                name: Some("Jane Shipper".into()),
                company_name: Some("Acme".into()),
                address1: Some("4009 Marathon Blvd".into()),
                city: Some("Austin".into()),
                region: Some("TX".into()),
                postal_code: Some("78756".into()),
                country: "US".into(),
                phone: Some("512-555-0100".into()),
                residential: Some(false),
                ..Default::default()
            },
            destination: Location {
                name: Some("John Receiver".into()),
                address1: Some("500 S Buena Vista St".into()),
                city: Some("Burbank".into()),
                region: Some("CA".into()),
                postal_code: Some("91521".into()),
                country: "US".into(),
                residential: Some(true),
                ..Default::default()
            },
            packages: vec![package],
        }
    }

    fn carrier(id: &str) -> Carrier {
        Carrier {
            id: id.into(),
            name: "Stamps.com".into(),
            code: "stamps_com".into(),
            balance: None,
            shipping_methods: Vec::new(),
        }
    }

    #[test]
    fn test_rate_estimate_requires_carriers() {
        let err = rate_estimate_body(&shipment(), &RateOptions::default()).unwrap_err();
        assert!(matches!(err, BuildError::NoCarriers));
    }

    #[test]
    fn test_rate_estimate_body() {
        let options = RateOptions {
            carriers: vec![carrier("se-123890")],
            ..Default::default()
        };
        let body = rate_estimate_body(&shipment(), &options).unwrap();
        assert_eq!(body["carrier_ids"], json!(["se-123890"]));
        assert_eq!(body["from_postal_code"], "78756");
        assert_eq!(body["to_state_province"], "CA");
        assert_eq!(body["weight"], json!({"value": 32.0, "unit": "ounce"}));
        assert_eq!(body["dimensions"]["length"], json!(8.0));
        assert_eq!(body["confirmation"], "none");
        assert_eq!(body["address_residential_indicator"], "yes");
        assert!(body.get("ship_date").is_none());
    }

    #[test]
    fn test_label_body() {
        let mut options = LabelOptions::new(ShippingMethod::new("ship_engine", "usps_priority_mail", "Priority", &["US"]));
        options.label_format = LabelFormat::Zpl;
        options.download_type = LabelDownloadType::Inline;
        options.packages = PackageOptionsMap::default().with(
            "p1",
            PackageOptions {
                packaging: Some("package".into()),
                reference_messages: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                ..Default::default()
            },
        );

        let body = label_body(&shipment(), &options).unwrap();
        assert_eq!(body["label_format"], "zpl");
        assert_eq!(body["label_download_type"], "inline");
        let inner = &body["shipment"];
        assert_eq!(inner["service_code"], "usps_priority_mail");
        assert_eq!(inner["ship_from"]["company_name"], "Acme");
        assert_eq!(inner["ship_from"]["address_residential_indicator"], "no");
        assert!(inner["ship_to"].get("company_name").is_none());
        let package = &inner["packages"][0];
        assert_eq!(package["package_code"], "package");
        assert_eq!(package["label_messages"]["reference3"], "C");
        assert!(package["label_messages"].get("reference4").is_none());
    }

    #[test]
    fn test_unknown_package_code_fails() {
        let mut options = LabelOptions::new(ShippingMethod::new("ship_engine", "usps_priority_mail", "Priority", &["US"]));
        options.packages = PackageOptionsMap::default().with(
            "p1",
            PackageOptions {
                packaging: Some("pallet".into()),
                ..Default::default()
            },
        );
        let err = label_body(&shipment(), &options).unwrap_err();
        assert_eq!(err.to_string(), "Unknown package code 'pallet' for package p1");
    }
}
