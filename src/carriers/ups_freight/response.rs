use super::codes::{shipping_methods, DOCUMENT_FORMATS, DOCUMENT_TYPES};
use crate::carriers::{json_list, json_text};
use crate::domain::model::{Money, Rate, Shipment, ShipmentDocument, ShipmentInformation, Weight, WeightUnit};
use crate::domain::options::RateOptions;
use crate::domain::result::{ApiFailure, ApiOutcome, Exchange};
use base64::Engine;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// 擷取錯誤訊息：新版 `response.errors[]`，或舊版 SOAP 風格的 Fault
fn error_message(body: &Value) -> Option<String> {
    let errors = json_list(body.pointer("/response/errors"));
    if !errors.is_empty() {
        let messages: Vec<String> = errors
            .iter()
            .map(|error| {
                let code = error.get("code").and_then(json_text).unwrap_or_default();
                let message = error.get("message").and_then(json_text).unwrap_or_default();
                if code.is_empty() {
                    message
                } else {
                    format!("{}: {}", code, message)
                }
            })
            .collect();
        return Some(messages.join(", "));
    }

    json_list(body.pointer("/Fault/detail/Errors/ErrorDetail"))
        .into_iter()
        .next()
        .and_then(|detail| detail.pointer("/PrimaryErrorCode/Description"))
        .and_then(json_text)
}

/// 非 2xx 或 200 但內含錯誤的回應都視為承運商錯誤
fn check_for_errors(exchange: &Exchange<'_>) -> Result<Value, ApiFailure> {
    let body = exchange.json();
    if exchange.response.is_success() {
        let body = body?;
        if let Some(message) = error_message(&body) {
            return Err(exchange.carrier_failure(message));
        }
        return Ok(body);
    }
    let message = body
        .ok()
        .as_ref()
        .and_then(error_message)
        .unwrap_or_else(|| exchange.response.status_line());
    Err(exchange.carrier_failure(message))
}

fn money(value: Option<&Value>) -> Option<Money> {
    let value = value?;
    let currency = value.get("CurrencyCode").and_then(json_text)?;
    let amount = value.get("MonetaryValue").and_then(json_text)?;
    Money::parse(&amount, &currency)
}

fn billable_weight(value: Option<&Value>) -> Option<Weight> {
    let value = value?;
    let amount: f64 = value.get("Value").and_then(json_text)?.parse().ok()?;
    let unit = match value.pointer("/UnitOfMeasurement/Code").and_then(json_text).as_deref() {
        Some("KGS") => WeightUnit::Kilogram,
        _ => WeightUnit::Pound,
    };
    Some(Weight::new(amount, unit))
}

fn alert_warnings(response: &Value) -> Vec<String> {
    json_list(response.pointer("/Response/Alert"))
        .iter()
        .filter_map(|alert| alert.get("Description").and_then(json_text))
        .collect()
}

pub fn parse_rates(exchange: Exchange<'_>, shipment: &Shipment, options: &RateOptions) -> ApiOutcome<Vec<Rate>> {
    let body = check_for_errors(&exchange)?;
    let response = body
        .get("FreightRateResponse")
        .ok_or_else(|| exchange.parse_failure("Missing FreightRateResponse in carrier response"))?;

    let service_code = response.pointer("/Service/Code").and_then(json_text);
    let shipping_method = match service_code {
        Some(code) => shipping_methods().into_iter().find(|m| m.service_code == code),
        None => options.shipping_method.clone(),
    };
    let Some(shipping_method) = shipping_method.filter(|m| m.ships_from(&shipment.origin.country)) else {
        tracing::debug!(
            "No UPS Freight service matches origin {}; returning no rates",
            shipment.origin.country
        );
        return exchange.success(Vec::new());
    };

    let total = money(response.get("TotalShipmentCharge"))
        .ok_or_else(|| exchange.parse_failure("Missing TotalShipmentCharge in FreightRateResponse"))?;

    let mut amounts = BTreeMap::new();
    amounts.insert("total".to_string(), total);

    let mut rate = Rate::new(shipping_method, amounts);
    rate.warnings = alert_warnings(response);

    let charges: serde_json::Map<String, Value> = json_list(response.get("Rate"))
        .iter()
        .filter_map(|charge| {
            let code = charge.pointer("/Type/Code").and_then(json_text)?;
            let value = charge.pointer("/Factor/Value").and_then(json_text)?;
            Some((code.to_lowercase(), json!(value)))
        })
        .collect();
    if !charges.is_empty() {
        rate.data.insert("charges".to_string(), Value::Object(charges));
    }
    if let Some(days) = response
        .pointer("/TimeInTransit/DaysInTransit")
        .and_then(json_text)
        .and_then(|days| days.parse::<u32>().ok())
    {
        rate.data.insert("days_in_transit".to_string(), json!(days));
    }
    if let Some(weight) = billable_weight(response.get("BillableShipmentWeight")) {
        rate.data.insert("billable_weight".to_string(), json!(weight.to_pounds()));
    }

    exchange.success(vec![rate])
}

fn document(exchange: &Exchange<'_>, image: &Value) -> Result<ShipmentDocument, ApiFailure> {
    let type_code = image.pointer("/Type/Code").and_then(json_text).unwrap_or_default();
    let format_code = image.pointer("/Format/Code").and_then(json_text).unwrap_or_default();
    let encoded = image
        .get("GraphicImage")
        .and_then(json_text)
        .ok_or_else(|| exchange.parse_failure("Missing GraphicImage in shipment document"))?;
    let binary = base64::engine::general_purpose::STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| exchange.parse_failure(format!("Invalid document image encoding: {}", e)))?;

    Ok(ShipmentDocument {
        document_type: DOCUMENT_TYPES
            .by_code(&type_code)
            .map(|entry| entry.symbol.to_string())
            .unwrap_or(type_code),
        format: DOCUMENT_FORMATS
            .by_code(&format_code)
            .map(|entry| entry.symbol.to_string())
            .unwrap_or(format_code),
        binary,
    })
}

pub fn parse_shipment(exchange: Exchange<'_>) -> ApiOutcome<ShipmentInformation> {
    let body = check_for_errors(&exchange)?;
    let results = body
        .pointer("/FreightShipResponse/ShipmentResults")
        .ok_or_else(|| exchange.parse_failure("Missing ShipmentResults in FreightShipResponse"))?;

    let documents = json_list(results.pointer("/Documents/Image"))
        .into_iter()
        .map(|image| document(&exchange, image))
        .collect::<Result<Vec<_>, _>>()?;

    let information = ShipmentInformation {
        number: results.get("ShipmentNumber").and_then(json_text),
        bol_id: results.get("BOLID").and_then(json_text),
        pickup_request_number: results.get("PickupRequestConfirmationNumber").and_then(json_text),
        total_shipment_charge: money(results.get("TotalShipmentCharge")),
        billable_weight: billable_weight(results.get("BillableShipmentWeight")),
        warnings: body
            .get("FreightShipResponse")
            .map(alert_warnings)
            .unwrap_or_default(),
        documents,
    };
    exchange.success(information)
}
