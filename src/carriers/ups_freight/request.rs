use super::codes::{
    handling_unit_slot, BILLING_OPTIONS, DEFAULT_HANDLING_UNIT, DEFAULT_PACKAGING, DOCUMENT_FORMATS, DOCUMENT_TYPES,
    HANDLING_UNITS, PACKAGING_TYPES, PRINT_FORMATS, PRINT_SIZES,
};
use crate::carriers::codes::CodeEntry;
use crate::domain::model::{Location, Shipment, ShippingMethod};
use crate::domain::options::{BillingOption, DocumentOptions, LabelOptions, PackageOptionsMap, RateOptions};
use crate::utils::error::BuildError;
use serde_json::{json, Map, Value};

/// FreightRateRequest 主體
pub fn rate_request_body(
    shipment: &Shipment,
    options: &RateOptions,
    shipper_number: &str,
) -> Result<Value, BuildError> {
    options.packages.check_against(shipment)?;
    let shipping_method = options
        .shipping_method
        .as_ref()
        .ok_or(BuildError::MissingOption { field: "shipping_method" })?;

    let mut request = Map::new();
    if let Some(context) = &options.customer_context {
        request.insert(
            "Request".into(),
            json!({"TransactionReference": {"CustomerContext": context}}),
        );
    }
    request.insert("ShipperNumber".into(), json!(shipper_number));
    request.insert("ShipFrom".into(), location_hash(&shipment.origin));
    request.insert("ShipTo".into(), location_hash(&shipment.destination));
    request.insert(
        "PaymentInformation".into(),
        payment_information(&options.billing, shipment, shipper_number)?,
    );
    request.insert("Service".into(), service_hash(shipping_method));
    request.extend(handling_units(shipment, &options.packages)?);
    request.insert("Commodity".into(), Value::Array(commodities(shipment, &options.packages)?));
    request.insert("TimeInTransitIndicator".into(), json!(""));

    Ok(json!({ "FreightRateRequest": request }))
}

/// FreightShipRequest 主體
pub fn ship_request_body(
    shipment: &Shipment,
    options: &LabelOptions,
    shipper_number: &str,
) -> Result<Value, BuildError> {
    options.packages.check_against(shipment)?;

    let mut ship_from = location_hash(&shipment.origin);
    if let Some(name) = &shipment.origin.name {
        ship_from["AttentionName"] = json!(name);
    }

    let mut body = Map::new();
    body.insert("ShipFrom".into(), ship_from);
    body.insert("ShipperNumber".into(), json!(shipper_number));
    body.insert("ShipTo".into(), location_hash(&shipment.destination));
    body.insert(
        "PaymentInformation".into(),
        payment_information(&options.billing, shipment, shipper_number)?,
    );
    body.insert("Service".into(), service_hash(&options.shipping_method));
    body.extend(handling_units(shipment, &options.packages)?);
    body.insert("Commodity".into(), Value::Array(commodities(shipment, &options.packages)?));

    let references = references(shipment, &options.packages);
    if !references.is_empty() {
        body.insert("Reference".into(), Value::Array(references));
    }
    if !options.documents.is_empty() {
        body.insert("Documents".into(), documents(&options.documents)?);
    }
    for (key, instructions) in [
        ("PickupInstructions", &options.pickup_instructions),
        ("DeliveryInstructions", &options.delivery_instructions),
        ("HandlingInstructions", &options.handling_instructions),
    ] {
        if let Some(text) = instructions {
            body.insert(key.into(), json!(text));
        }
    }

    Ok(json!({ "FreightShipRequest": { "Shipment": body } }))
}

fn service_hash(shipping_method: &ShippingMethod) -> Value {
    json!({"Code": shipping_method.service_code, "Description": shipping_method.name})
}

fn address_hash(location: &Location) -> Value {
    json!({
        "AddressLine": location.address_lines(),
        "City": location.city.as_deref().unwrap_or_default(),
        "StateProvinceCode": location.region.as_deref().unwrap_or_default(),
        "PostalCode": location.postal_code.as_deref().unwrap_or_default(),
        "CountryCode": location.country,
    })
}

/// ShipFrom / ShipTo：公司名稱優先
pub(crate) fn location_hash(location: &Location) -> Value {
    let mut hash = Map::new();
    hash.insert("Name".into(), json!(location.display_name().unwrap_or_default()));
    hash.insert("Address".into(), address_hash(location));
    if let Some(phone) = &location.phone {
        hash.insert("Phone".into(), json!({"Number": phone}));
    }
    Value::Object(hash)
}

/// 付款方：公司名稱放 Name，個人姓名放 AttentionName
fn payer_hash(location: &Location, shipper_number: &str) -> Value {
    let mut payer = Map::new();
    payer.insert("Name".into(), json!(location.display_name().unwrap_or_default()));
    if let Some(name) = &location.name {
        payer.insert("AttentionName".into(), json!(name));
    }
    payer.insert("Address".into(), address_hash(location));
    payer.insert("ShipperNumber".into(), json!(shipper_number));
    Value::Object(payer)
}

fn payment_information(
    billing: &BillingOption,
    shipment: &Shipment,
    shipper_number: &str,
) -> Result<Value, BuildError> {
    let (symbol, payer) = match billing {
        BillingOption::Prepaid => ("prepaid", &shipment.origin),
        BillingOption::ThirdParty { payer } => ("third_party", payer),
        BillingOption::FreightCollect => ("freight_collect", &shipment.destination),
    };
    let billing_code = BILLING_OPTIONS.resolve_setting(symbol)?;
    Ok(json!({
        "Payer": payer_hash(payer, shipper_number),
        "ShipmentBillingOption": {"Code": billing_code.code, "Description": billing_code.description},
    }))
}

/// 依代碼分組計數；同一個 slot 只保留最先出現的那組
pub(crate) fn handling_units(
    shipment: &Shipment,
    packages: &PackageOptionsMap,
) -> Result<Map<String, Value>, BuildError> {
    let mut groups: Vec<(&'static CodeEntry, usize)> = Vec::new();
    for package in &shipment.packages {
        let symbol = packages
            .options_for(&package.id)
            .handling_unit
            .as_deref()
            .unwrap_or(DEFAULT_HANDLING_UNIT);
        let entry = HANDLING_UNITS.resolve(symbol, &package.id)?;
        match groups.iter_mut().find(|(seen, _)| seen.code == entry.code) {
            Some((_, quantity)) => *quantity += 1,
            None => groups.push((entry, 1)),
        }
    }

    let mut slots = Map::new();
    for (entry, quantity) in groups {
        let slot = handling_unit_slot(entry.code);
        if slots.contains_key(slot) {
            tracing::warn!(
                "{} already holds another handling unit; dropping {} x{}",
                slot,
                entry.code,
                quantity
            );
            continue;
        }
        slots.insert(
            slot.to_string(),
            json!({
                "Quantity": quantity.to_string(),
                "Type": {"Code": entry.code, "Description": entry.description},
            }),
        );
    }
    Ok(slots)
}

/// 每個包裹一筆 Commodity
pub(crate) fn commodities(shipment: &Shipment, packages: &PackageOptionsMap) -> Result<Vec<Value>, BuildError> {
    shipment
        .packages
        .iter()
        .map(|package| {
            let options = packages.options_for(&package.id);
            let packaging = PACKAGING_TYPES.resolve(
                options.packaging.as_deref().unwrap_or(DEFAULT_PACKAGING),
                &package.id,
            )?;
            let description = package
                .items
                .first()
                .and_then(|item| item.description.as_deref())
                .or(package.description.as_deref())
                .unwrap_or("Commodities");

            let mut commodity = Map::new();
            commodity.insert("Description".into(), json!(description));
            commodity.insert(
                "Weight".into(),
                json!({
                    "UnitOfMeasurement": {"Code": "LBS", "Description": "Pounds"},
                    "Value": format!("{:.1}", package.total_weight().to_pounds()),
                }),
            );
            commodity.insert(
                "NumberOfPieces".into(),
                json!(package.items.len().max(1).to_string()),
            );
            commodity.insert(
                "PackagingType".into(),
                json!({"Code": packaging.code, "Description": packaging.description}),
            );
            if let Some(freight_class) = &options.freight_class {
                commodity.insert("FreightClass".into(), json!(freight_class));
            }
            if let Some(prime_code) = &options.nmfc_primary_code {
                let mut nmfc = Map::new();
                nmfc.insert("PrimeCode".into(), json!(prime_code));
                if let Some(sub_code) = &options.nmfc_sub_code {
                    nmfc.insert("SubCode".into(), json!(sub_code));
                }
                commodity.insert("NMFCCommodity".into(), Value::Object(nmfc));
            }
            Ok(Value::Object(commodity))
        })
        .collect()
}

fn references(shipment: &Shipment, packages: &PackageOptionsMap) -> Vec<Value> {
    shipment
        .packages
        .iter()
        .flat_map(|package| packages.options_for(&package.id).reference_messages.iter())
        .map(|message| json!({"Number": {"Code": "PM", "Value": message}}))
        .collect()
}

fn documents(documents: &[DocumentOptions]) -> Result<Value, BuildError> {
    let images = documents
        .iter()
        .map(|document| {
            let document_type = DOCUMENT_TYPES.resolve_setting(&document.document_type)?;
            let format = DOCUMENT_FORMATS.resolve_setting(&document.format)?;
            let print_format = PRINT_FORMATS.resolve_setting(&document.print_format)?;
            let (_, width, length) = PRINT_SIZES
                .iter()
                .find(|(symbol, _, _)| *symbol == document.print_size.trim())
                .ok_or_else(|| BuildError::UnknownSetting {
                    field: "print size",
                    value: document.print_size.clone(),
                })?;
            Ok(json!({
                "Type": {"Code": document_type.code},
                "LabelsPerPage": document.labels_per_page.to_string(),
                "Format": {"Code": format.code},
                "PrintFormat": {"Code": print_format.code},
                "PrintSize": {"Length": length, "Width": width},
            }))
        })
        .collect::<Result<Vec<_>, BuildError>>()?;
    Ok(json!({ "Image": images }))
}
