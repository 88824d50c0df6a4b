use crate::carriers::{json_list, json_text};
use crate::domain::model::{Label, Money, Rate, Shipment, VoidOutcome};
use crate::domain::options::{LabelDownloadType, LabelOptions, RateOptions};
use crate::domain::result::{ApiFailure, ApiOutcome, Exchange};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::BTreeMap;

const VALID_STATUSES: [&str; 2] = ["valid", "has_warnings"];

fn error_message(body: &Value) -> Option<String> {
    let messages: Vec<String> = json_list(body.get("errors"))
        .iter()
        .filter_map(|error| error.get("message").and_then(json_text))
        .collect();
    (!messages.is_empty()).then(|| messages.join(", "))
}

fn checked_body(exchange: &Exchange<'_>) -> Result<Value, ApiFailure> {
    if exchange.response.is_success() {
        return exchange.json();
    }
    let message = exchange
        .json()
        .ok()
        .as_ref()
        .and_then(error_message)
        .unwrap_or_else(|| exchange.response.status_line());
    Err(exchange.carrier_failure(message))
}

/// `{"currency": "usd", "amount": 2.76}`
fn money(value: Option<&Value>) -> Option<Money> {
    let value = value?;
    let currency = value.get("currency").and_then(json_text)?;
    let amount = value.get("amount").and_then(json_text)?;
    Money::parse(&amount, &currency)
}

fn messages(value: Option<&Value>) -> Vec<String> {
    json_list(value).into_iter().filter_map(json_text).collect()
}

fn parse_rate(record: &Value, shipment: &Shipment, options: &RateOptions) -> Option<Rate> {
    let carrier_id = record.get("carrier_id").and_then(json_text)?;
    let service_code = record.get("service_code").and_then(json_text)?;
    let status = record.get("validation_status").and_then(json_text).unwrap_or_default();
    if !VALID_STATUSES.contains(&status.as_str()) {
        tracing::debug!("Dropping {} rate with validation status '{}'", service_code, status);
        return None;
    }

    let carrier = options.carriers.iter().find(|carrier| carrier.id == carrier_id)?;
    let Some(method) = carrier
        .shipping_methods
        .iter()
        .find(|method| method.service_code == service_code && method.ships_from(&shipment.origin.country))
    else {
        tracing::debug!("No shipping method for {} {}", carrier_id, service_code);
        return None;
    };

    let mut amounts = BTreeMap::new();
    for (key, field) in [
        ("shipping", "shipping_amount"),
        ("insurance", "insurance_amount"),
        ("confirmation", "confirmation_amount"),
        ("other", "other_amount"),
    ] {
        if let Some(amount) = money(record.get(field)) {
            amounts.insert(key.to_string(), amount);
        }
    }

    let mut rate = Rate::new(method.clone(), amounts);
    rate.remote_service_id = record.get("rate_id").and_then(json_text);
    rate.warnings = messages(record.get("warning_messages"));
    rate.errors = messages(record.get("error_messages"));
    rate.delivery_date = record
        .get("estimated_delivery_date")
        .and_then(json_text)
        .and_then(|date| DateTime::parse_from_rfc3339(&date).ok())
        .map(|date| date.with_timezone(&Utc));
    if let Some(days) = record.get("delivery_days").and_then(Value::as_u64) {
        rate.data.insert("days_to_delivery".to_string(), json!(days));
    }
    Some(rate)
}

pub fn parse_rates(exchange: Exchange<'_>, shipment: &Shipment, options: &RateOptions) -> ApiOutcome<Vec<Rate>> {
    let body = checked_body(&exchange)?;
    let records = body
        .as_array()
        .ok_or_else(|| exchange.parse_failure("Expected an array of rate estimates"))?;
    let rates = records
        .iter()
        .filter_map(|record| parse_rate(record, shipment, options))
        .collect();
    exchange.success(rates)
}

/// `data:<mime>;base64,<payload>`
fn data_uri_payload(href: &str) -> Option<&str> {
    let rest = href.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    meta.ends_with(";base64").then_some(payload)
}

pub fn parse_label(exchange: Exchange<'_>, options: &LabelOptions) -> ApiOutcome<Vec<Label>> {
    let body = checked_body(&exchange)?;
    let href = body
        .pointer("/label_download/href")
        .and_then(json_text)
        .ok_or_else(|| exchange.parse_failure("Missing label_download.href in label response"))?;

    let (label_href, label_data) = match (data_uri_payload(&href), options.download_type) {
        (Some(payload), LabelDownloadType::Inline) => {
            let data = base64::engine::general_purpose::STANDARD
                .decode(payload.trim())
                .map_err(|e| exchange.parse_failure(format!("Invalid inline label encoding: {}", e)))?;
            (None, Some(data))
        }
        (None, LabelDownloadType::Url) => (Some(href.clone()), None),
        (Some(_), LabelDownloadType::Url) => {
            return Err(exchange.parse_failure("Expected a label URL but received inline label data"));
        }
        (None, LabelDownloadType::Inline) => {
            return Err(exchange.parse_failure("Expected inline label data but received a label URL"));
        }
    };

    let shipment_cost = money(body.get("shipment_cost"));
    let insurance_cost = money(body.get("insurance_cost"));
    let cost = match (&shipment_cost, &insurance_cost) {
        (Some(shipping), Some(insurance)) => shipping.checked_add(insurance),
        (Some(shipping), None) => Some(shipping.clone()),
        (None, insurance) => insurance.clone(),
    };

    let mut data = BTreeMap::new();
    for key in ["status", "carrier_id", "ship_date"] {
        if let Some(value) = body.get(key).and_then(json_text) {
            data.insert(key.to_string(), json!(value));
        }
    }

    let label = Label {
        id: body.get("label_id").and_then(json_text),
        shipment_id: body.get("shipment_id").and_then(json_text),
        tracking_number: body.get("tracking_number").and_then(json_text),
        service_code: body.get("service_code").and_then(json_text),
        label_href,
        label_data,
        label_format: options.label_format.as_str().to_string(),
        cost,
        shipment_cost,
        data,
    };
    exchange.success(vec![label])
}

pub fn parse_void(exchange: Exchange<'_>) -> ApiOutcome<VoidOutcome> {
    let body = checked_body(&exchange)?;
    let approved = body
        .get("approved")
        .and_then(Value::as_bool)
        .ok_or_else(|| exchange.parse_failure("Missing approved flag in void response"))?;
    let message = body.get("message").and_then(json_text).unwrap_or_default();
    exchange.success(VoidOutcome { approved, message })
}
