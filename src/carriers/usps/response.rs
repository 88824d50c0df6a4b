use super::choose_rate::choose_package_rate;
use super::codes::{
    service_code_for_class_id, shipping_method, shipping_methods, FIRST_CLASS, MAIL_SERVICE_BOX_NAMES,
    MAIL_SERVICE_MAIL_TYPES,
};
use crate::domain::model::{Money, Rate, Shipment, ShippingMethod};
use crate::domain::options::RateOptions;
use crate::domain::result::{ApiOutcome, Exchange, FailureKind};
use crate::utils::xml::Element;
use regex::Regex;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const CURRENCY: &str = "USD";
pub const NO_RATES_MESSAGE: &str = "No rates available for the package information provided";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static DAYS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)-Day").unwrap());

/// MailService 常帶有二次跳脫的 HTML（`&lt;sup&gt;&#8482;&lt;/sup&gt;`）
pub fn clean_mail_service(raw: &str) -> String {
    let unescaped = quick_xml::escape::unescape(raw)
        .map(|text| text.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    TAG.replace_all(&unescaped, "").trim().to_string()
}

fn box_name(mail_service: &str) -> &'static str {
    MAIL_SERVICE_BOX_NAMES
        .iter()
        .find(|(pattern, _)| mail_service.contains(pattern))
        .map(|(_, symbol)| *symbol)
        .unwrap_or(super::codes::DEFAULT_BOX_NAME)
}

fn first_class_mail_type(mail_service: &str) -> Option<&'static str> {
    let lower = mail_service.to_lowercase();
    MAIL_SERVICE_MAIL_TYPES
        .iter()
        .find(|(pattern, _)| lower.contains(pattern))
        .map(|(_, symbol)| *symbol)
}

fn days_to_delivery(mail_service: &str) -> Option<u32> {
    DAYS.captures(mail_service)
        .and_then(|captures| captures.get(1))
        .and_then(|days| days.as_str().parse().ok())
}

/// 一個 Postage 節點 → 一筆單包裹費率；無法辨識的 CLASSID 回傳 None
fn postage_rate(postage: &Element, package_id: &str, commercial_pricing: bool) -> Option<Rate> {
    let class_id: u32 = postage.attr("CLASSID")?.trim().parse().ok()?;
    let Some(method) = service_code_for_class_id(class_id).and_then(shipping_method) else {
        tracing::debug!("Dropping USPS postage with unknown CLASSID {}", class_id);
        return None;
    };

    let commercial = postage.child_text("CommercialRate").filter(|rate| !rate.is_empty());
    let price = match commercial {
        Some(rate) if commercial_pricing => rate,
        _ => postage.child_text("Rate")?,
    };
    let price = Money::parse(price, CURRENCY)?;

    let mail_service = clean_mail_service(postage.child_text("MailService").unwrap_or_default());
    let mut amounts = BTreeMap::new();
    amounts.insert("price".to_string(), price);

    let mut rate = Rate::new(method, amounts);
    rate.data.insert("package_id".to_string(), json!(package_id));
    rate.data.insert("box_name".to_string(), json!(box_name(&mail_service)));
    if rate.shipping_method.service_code == FIRST_CLASS {
        if let Some(mail_type) = first_class_mail_type(&mail_service) {
            rate.data.insert("first_class_mail_type".to_string(), json!(mail_type));
        }
    }
    rate.data.insert(
        "hold_for_pickup".to_string(),
        json!(mail_service.contains("Hold For Pickup")),
    );
    if let Some(days) = days_to_delivery(&mail_service) {
        rate.data.insert("days_to_delivery".to_string(), json!(days));
    }
    rate.data.insert("full_mail_service".to_string(), json!(mail_service));
    Some(rate)
}

/// 把同一運送方式下各包裹選中的費率合併成一筆
fn combine(method: ShippingMethod, chosen: &[&Rate]) -> Option<Rate> {
    let mut amounts: BTreeMap<String, Money> = BTreeMap::new();
    for rate in chosen {
        for (key, amount) in &rate.amounts {
            let total = match amounts.get(key) {
                Some(existing) => existing.checked_add(amount)?,
                None => amount.clone(),
            };
            amounts.insert(key.clone(), total);
        }
    }

    let mut combined = Rate::new(method, amounts);
    if let Some(first) = chosen.first() {
        combined.data = first.data.clone();
        combined.data.remove("package_id");
    }
    if let Some(days) = chosen
        .iter()
        .filter_map(|rate| rate.data.get("days_to_delivery").and_then(|d| d.as_u64()))
        .max()
    {
        combined.data.insert("days_to_delivery".to_string(), json!(days));
    }
    combined.warnings = chosen.iter().flat_map(|rate| rate.warnings.clone()).collect();
    Some(combined)
}

/// 根節點 `<Error>` 的 Description；USPS 不論狀態碼都可能回這個形狀
fn root_error(root: &Element) -> Option<&str> {
    if root.name != "Error" {
        return None;
    }
    Some(
        root.child_text("Description")
            .filter(|text| !text.is_empty())
            .unwrap_or("USPS returned an error without a description"),
    )
}

pub fn parse_rates(exchange: Exchange<'_>, shipment: &Shipment, options: &RateOptions) -> ApiOutcome<Vec<Rate>> {
    if !exchange.response.is_success() {
        let parsed = exchange.response.body_text().ok().and_then(|body| Element::parse(body).ok());
        let message = parsed
            .as_ref()
            .and_then(root_error)
            .map(str::to_string)
            .unwrap_or_else(|| exchange.response.status_line());
        return Err(exchange.carrier_failure(message));
    }
    let body = exchange.body_text()?;
    let root = Element::parse(body)
        .map_err(|e| exchange.parse_failure(format!("Malformed XML response: {}", e)))?;

    if let Some(description) = root_error(&root) {
        return Err(exchange.carrier_failure(description));
    }
    if root.name != "RateV4Response" {
        return Err(exchange.parse_failure(format!("Unexpected root element <{}>", root.name)));
    }

    let mut package_rates: Vec<Vec<Rate>> = vec![Vec::new(); shipment.packages.len()];
    let mut package_errors: Vec<String> = Vec::new();
    for node in root.children_named("Package") {
        let index = node
            .attr("ID")
            .and_then(|id| id.trim().parse::<usize>().ok())
            .filter(|index| *index < shipment.packages.len())
            .ok_or_else(|| exchange.parse_failure("Package node with missing or unknown ID"))?;

        if let Some(error) = node.child("Error") {
            let text = error.child_text("Description").unwrap_or_default().to_string();
            tracing::debug!("USPS rejected package {}: {}", shipment.packages[index].id, text);
            package_errors.push(text);
            continue;
        }
        let package_id = &shipment.packages[index].id;
        package_rates[index].extend(
            node.children_named("Postage")
                .filter_map(|postage| postage_rate(postage, package_id, options.commercial_pricing)),
        );
    }

    let methods: Vec<ShippingMethod> = match &options.shipping_method {
        Some(method) => vec![method.clone()],
        None => shipping_methods(),
    };

    let mut rates = Vec::new();
    let mut match_error: Option<String> = None;
    for method in methods {
        if !method.ships_from(&shipment.origin.country) {
            continue;
        }
        let chosen: Result<Vec<&Rate>, _> = shipment
            .packages
            .iter()
            .zip(&package_rates)
            .map(|(package, candidates)| {
                choose_package_rate(&method, candidates, options.packages.options_for(&package.id))
            })
            .collect();
        match chosen {
            Ok(chosen) => match combine(method, &chosen) {
                Some(rate) => rates.push(rate),
                None => tracing::debug!("Dropping USPS rate with mixed currencies"),
            },
            Err(e) => {
                tracing::debug!("Dropping USPS method: {}", e);
                match_error.get_or_insert_with(|| e.to_string());
            }
        }
    }

    if rates.is_empty() {
        // 承運商完全沒給費率 → Carrier；有候選但對不上 → Match
        if package_rates.iter().all(Vec::is_empty) {
            let text = package_errors
                .into_iter()
                .find(|text| !text.is_empty())
                .unwrap_or_else(|| NO_RATES_MESSAGE.to_string());
            return Err(exchange.carrier_failure(text));
        }
        return Err(exchange.failure(
            FailureKind::Match,
            match_error.unwrap_or_else(|| NO_RATES_MESSAGE.to_string()),
        ));
    }
    exchange.success(rates)
}
