pub mod codes;
pub mod registry;
pub mod ship_engine;
pub mod ups_freight;
pub mod usps;

pub use registry::CarrierRegistry;
pub use ship_engine::ShipEngine;
pub use ups_freight::UpsFreight;
pub use usps::Usps;

use serde_json::Value;

/// 承運商常把單一元素的集合回傳成物件而非陣列，兩者都視為清單
pub(crate) fn json_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other],
    }
}

/// 字串或數字欄位轉為文字
pub(crate) fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_list_normalizes_single_objects() {
        let single = json!({"Code": "1"});
        let many = json!([{"Code": "1"}, {"Code": "2"}]);
        assert_eq!(json_list(Some(&single)).len(), 1);
        assert_eq!(json_list(Some(&many)).len(), 2);
        assert!(json_list(None).is_empty());
        assert!(json_list(Some(&Value::Null)).is_empty());
    }

    #[test]
    fn test_json_text() {
        assert_eq!(json_text(&json!(" 12.50 ")), Some("12.50".to_string()));
        assert_eq!(json_text(&json!(2.76)), Some("2.76".to_string()));
        assert_eq!(json_text(&json!(true)), None);
    }
}
