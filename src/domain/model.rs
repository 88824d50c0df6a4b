use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

const POUNDS_PER_KILOGRAM: f64 = 2.204_622_621_848_776;
const CENTIMETERS_PER_INCH: f64 = 2.54;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    Pound,
    Ounce,
    Kilogram,
    Gram,
}

impl WeightUnit {
    fn pounds_per_unit(self) -> f64 {
        match self {
            WeightUnit::Pound => 1.0,
            WeightUnit::Ounce => 1.0 / 16.0,
            WeightUnit::Kilogram => POUNDS_PER_KILOGRAM,
            WeightUnit::Gram => POUNDS_PER_KILOGRAM / 1000.0,
        }
    }
}

/// 重量（數值 + 單位）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    pub value: f64,
    pub unit: WeightUnit,
}

impl Weight {
    pub fn new(value: f64, unit: WeightUnit) -> Self {
        Self { value, unit }
    }

    pub fn pounds(value: f64) -> Self {
        Self::new(value, WeightUnit::Pound)
    }

    pub fn ounces(value: f64) -> Self {
        Self::new(value, WeightUnit::Ounce)
    }

    pub fn to_pounds(&self) -> f64 {
        self.value * self.unit.pounds_per_unit()
    }

    pub fn to_ounces(&self) -> f64 {
        self.to_pounds() * 16.0
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::pounds(0.0)
    }
}

/// 加總一律以磅為單位
impl std::iter::Sum for Weight {
    fn sum<I: Iterator<Item = Weight>>(iter: I) -> Self {
        Weight::pounds(iter.map(|w| w.to_pounds()).sum())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    Inch,
    Centimeter,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn inches(value: f64) -> Self {
        Self {
            value,
            unit: LengthUnit::Inch,
        }
    }

    pub fn to_inches(&self) -> f64 {
        match self.unit {
            LengthUnit::Inch => self.value,
            LengthUnit::Centimeter => self.value / CENTIMETERS_PER_INCH,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::inches(0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: Length,
    pub length: Length,
    pub height: Length,
}

impl Dimensions {
    pub fn inches(width: f64, length: f64, height: f64) -> Self {
        Self {
            width: Length::inches(width),
            length: Length::inches(length),
            height: Length::inches(height),
        }
    }
}

/// 金額：以最小貨幣單位（分）保存，避免浮點誤差
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub cents: i64,
    pub currency: String,
}

impl Money {
    pub fn new(cents: i64, currency: impl Into<String>) -> Self {
        Self {
            cents,
            currency: currency.into().to_ascii_uppercase(),
        }
    }

    /// 解析十進位字串（例如 "2.76"），超過兩位小數時四捨五入
    pub fn parse(amount: &str, currency: &str) -> Option<Self> {
        let trimmed = amount.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let whole_value: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let mut fraction_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = fraction_digits.next().unwrap_or(0);
        let hundredths = fraction_digits.next().unwrap_or(0);
        let round_up = fraction_digits.next().is_some_and(|d| d >= 5);

        let mut cents = whole_value
            .checked_mul(100)?
            .checked_add(tenths * 10 + hundredths)?;
        if round_up {
            cents = cents.checked_add(1)?;
        }
        if negative {
            cents = -cents;
        }
        Some(Self::new(cents, currency))
    }

    /// 幣別不同時回傳 None
    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Money::new(self.cents.checked_add(other.cents)?, self.currency.clone()))
    }

    /// 十進位字串，例如 "2.76"
    pub fn amount(&self) -> String {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount(), self.currency)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub address3: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub residential: Option<bool>,
}

impl Location {
    pub fn address_lines(&self) -> Vec<&str> {
        [&self.address1, &self.address2, &self.address3]
            .into_iter()
            .filter_map(|line| line.as_deref())
            .filter(|line| !line.trim().is_empty())
            .collect()
    }

    /// 公司名稱優先於個人姓名
    pub fn display_name(&self) -> Option<&str> {
        self.company_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or(self.name.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub weight: Weight,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub declared_value: Option<Money>,
}

/// 包裝容器（紙箱、棧板等）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    pub name: Option<String>,
    pub dimensions: Dimensions,
    pub weight: Weight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub container: Option<Container>,
    #[serde(default)]
    pub description: Option<String>,
    /// 覆寫由品項與容器推算的重量
    #[serde(default)]
    pub weight: Option<Weight>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

impl Package {
    pub fn new(id: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            id: id.into(),
            items,
            container: None,
            description: None,
            weight: None,
            dimensions: None,
        }
    }

    pub fn total_weight(&self) -> Weight {
        if let Some(weight) = self.weight {
            return weight;
        }
        let tare = self.container.as_ref().map(|c| c.weight).unwrap_or_default();
        self.items
            .iter()
            .map(|item| item.weight)
            .chain(std::iter::once(tare))
            .sum()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
            .or_else(|| self.container.as_ref().map(|c| c.dimensions))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub origin: Location,
    pub destination: Location,
    pub packages: Vec<Package>,
}

impl Shipment {
    pub fn package(&self, id: &str) -> Option<&Package> {
        self.packages.iter().find(|package| package.id == id)
    }
}

/// 運送方式；相等性只看 (carrier_id, service_code)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub carrier_id: String,
    pub service_code: String,
    pub name: String,
    #[serde(default)]
    pub origin_countries: Vec<String>,
    #[serde(default)]
    pub domestic: bool,
    #[serde(default)]
    pub international: bool,
    #[serde(default)]
    pub multi_package: bool,
}

impl ShippingMethod {
    pub fn new(carrier_id: &str, service_code: &str, name: &str, origin_countries: &[&str]) -> Self {
        Self {
            carrier_id: carrier_id.to_string(),
            service_code: service_code.to_string(),
            name: name.to_string(),
            origin_countries: origin_countries.iter().map(|c| c.to_string()).collect(),
            domestic: true,
            international: false,
            multi_package: true,
        }
    }

    pub fn ships_from(&self, country: &str) -> bool {
        self.origin_countries
            .iter()
            .any(|c| c.eq_ignore_ascii_case(country.trim()))
    }
}

impl PartialEq for ShippingMethod {
    fn eq(&self, other: &Self) -> bool {
        self.carrier_id == other.carrier_id && self.service_code == other.service_code
    }
}

impl Eq for ShippingMethod {}

impl Hash for ShippingMethod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.carrier_id.hash(state);
        self.service_code.hash(state);
    }
}

/// 多承運商平台（ShipEngine）帳號下的承運商
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carrier {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub balance: Option<Money>,
    #[serde(default)]
    pub shipping_methods: Vec<ShippingMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub shipping_method: ShippingMethod,
    pub amounts: BTreeMap<String, Money>,
    pub remote_service_id: Option<String>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    /// 承運商特有的輔助資料（days_to_delivery、box_name、hold_for_pickup…）
    pub data: BTreeMap<String, serde_json::Value>,
}

impl Rate {
    pub fn new(shipping_method: ShippingMethod, amounts: BTreeMap<String, Money>) -> Self {
        Self {
            shipping_method,
            amounts,
            remote_service_id: None,
            delivery_date: None,
            warnings: Vec::new(),
            errors: Vec::new(),
            data: BTreeMap::new(),
        }
    }

    /// 所有金額加總；沒有金額或幣別混雜時回傳 None
    pub fn total_amount(&self) -> Option<Money> {
        let mut amounts = self.amounts.values();
        let first = amounts.next()?.clone();
        amounts.try_fold(first, |total, amount| total.checked_add(amount))
    }

    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    pub fn data_flag(&self, key: &str) -> bool {
        self.data.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: Option<String>,
    pub shipment_id: Option<String>,
    pub tracking_number: Option<String>,
    pub service_code: Option<String>,
    pub label_href: Option<String>,
    pub label_data: Option<Vec<u8>>,
    pub label_format: String,
    /// 運費加保險費
    pub cost: Option<Money>,
    pub shipment_cost: Option<Money>,
    pub data: BTreeMap<String, serde_json::Value>,
}

impl Label {
    /// 只知道承運商標籤 ID 時（例如作廢）
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            shipment_id: None,
            tracking_number: None,
            service_code: None,
            label_href: None,
            label_data: None,
            label_format: String::new(),
            cost: None,
            shipment_cost: None,
            data: BTreeMap::new(),
        }
    }

    pub fn label_data_str(&self) -> Option<&str> {
        self.label_data
            .as_deref()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentDocument {
    pub document_type: String,
    pub format: String,
    pub binary: Vec<u8>,
}

/// 零擔貨運（freight-ship）回傳的託運資訊
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipmentInformation {
    pub number: Option<String>,
    pub bol_id: Option<String>,
    pub pickup_request_number: Option<String>,
    pub total_shipment_charge: Option<Money>,
    pub billable_weight: Option<Weight>,
    pub warnings: Vec<String>,
    pub documents: Vec<ShipmentDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoidOutcome {
    pub approved: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_parse_is_exact() {
        assert_eq!(Money::parse("2.76", "usd"), Some(Money::new(276, "USD")));
        assert_eq!(Money::parse("1234", "USD").unwrap().cents, 123_400);
        assert_eq!(Money::parse("0.5", "USD").unwrap().cents, 50);
        assert_eq!(Money::parse("-3.10", "USD").unwrap().cents, -310);
        assert_eq!(Money::parse(".99", "USD").unwrap().cents, 99);
    }

    #[test]
    fn test_money_parse_rounds_extra_digits() {
        assert_eq!(Money::parse("12.345", "USD").unwrap().cents, 1235);
        assert_eq!(Money::parse("12.344", "USD").unwrap().cents, 1234);
    }

    #[test]
    fn test_money_parse_rejects_garbage() {
        assert!(Money::parse("", "USD").is_none());
        assert!(Money::parse("abc", "USD").is_none());
        assert!(Money::parse("1e5", "USD").is_none());
        assert!(Money::parse("1.2.3", "USD").is_none());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(276, "usd").to_string(), "2.76 USD");
        assert_eq!(Money::new(-5, "USD").amount(), "-0.05");
    }

    #[test]
    fn test_package_weight_includes_container_tare() {
        let mut package = Package::new(
            "pkg-1",
            vec![
                Item {
                    id: "a".into(),
                    weight: Weight::ounces(8.0),
                    description: None,
                    declared_value: None,
                },
                Item {
                    id: "b".into(),
                    weight: Weight::pounds(1.5),
                    description: None,
                    declared_value: None,
                },
            ],
        );
        assert!((package.total_weight().to_pounds() - 2.0).abs() < 1e-9);

        package.container = Some(Container {
            name: Some("box".into()),
            dimensions: Dimensions::inches(10.0, 12.0, 4.0),
            weight: Weight::pounds(0.25),
        });
        assert!((package.total_weight().to_pounds() - 2.25).abs() < 1e-9);
        assert_eq!(package.dimensions().length.to_inches(), 12.0);
    }

    #[test]
    fn test_shipping_method_equality_ignores_name() {
        let a = ShippingMethod::new("usps", "PRIORITY", "Priority Mail", &["US"]);
        let b = ShippingMethod::new("usps", "PRIORITY", "Priority", &[]);
        assert_eq!(a, b);
        assert!(a.ships_from("us"));
        assert!(!b.ships_from("US"));
    }

    #[test]
    fn test_rate_total_amount() {
        let method = ShippingMethod::new("usps", "PRIORITY", "Priority Mail", &["US"]);
        let mut amounts = BTreeMap::new();
        amounts.insert("shipping".to_string(), Money::new(200, "USD"));
        amounts.insert("insurance".to_string(), Money::new(76, "USD"));
        let rate = Rate::new(method.clone(), amounts);
        assert_eq!(rate.total_amount(), Some(Money::new(276, "USD")));

        let mut mixed = BTreeMap::new();
        mixed.insert("a".to_string(), Money::new(1, "USD"));
        mixed.insert("b".to_string(), Money::new(1, "CAD"));
        assert_eq!(Rate::new(method, mixed).total_amount(), None);
    }
}
