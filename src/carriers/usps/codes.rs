use crate::carriers::codes::{CodeEntry, CodeTable};
use crate::domain::model::ShippingMethod;

pub const CARRIER_ID: &str = "usps";

pub const FIRST_CLASS: &str = "FIRST CLASS";
pub const PRIORITY: &str = "PRIORITY";
pub const PRIORITY_EXPRESS: &str = "PRIORITY MAIL EXPRESS";
pub const RETAIL_GROUND: &str = "RETAIL GROUND";
pub const MEDIA: &str = "MEDIA";
pub const LIBRARY: &str = "LIBRARY";

pub const ALL_SERVICES: &str = "ALL";

pub const CONTAINERS: CodeTable = CodeTable {
    field: "box name",
    entries: &[
        CodeEntry { symbol: "variable", code: "VARIABLE", description: "Variable" },
        CodeEntry { symbol: "flat_rate_envelope", code: "FLAT RATE ENVELOPE", description: "Flat Rate Envelope" },
        CodeEntry { symbol: "padded_flat_rate_envelope", code: "PADDED FLAT RATE ENVELOPE", description: "Padded Flat Rate Envelope" },
        CodeEntry { symbol: "legal_flat_rate_envelope", code: "LEGAL FLAT RATE ENVELOPE", description: "Legal Flat Rate Envelope" },
        CodeEntry { symbol: "small_flat_rate_envelope", code: "SM FLAT RATE ENVELOPE", description: "Small Flat Rate Envelope" },
        CodeEntry { symbol: "window_flat_rate_envelope", code: "WINDOW FLAT RATE ENVELOPE", description: "Window Flat Rate Envelope" },
        CodeEntry { symbol: "gift_card_flat_rate_envelope", code: "GIFT CARD FLAT RATE ENVELOPE", description: "Gift Card Flat Rate Envelope" },
        CodeEntry { symbol: "small_flat_rate_box", code: "SM FLAT RATE BOX", description: "Small Flat Rate Box" },
        CodeEntry { symbol: "medium_flat_rate_box", code: "MD FLAT RATE BOX", description: "Medium Flat Rate Box" },
        CodeEntry { symbol: "large_flat_rate_box", code: "LG FLAT RATE BOX", description: "Large Flat Rate Box" },
        CodeEntry { symbol: "regional_rate_box_a", code: "REGIONALRATEBOXA", description: "Regional Rate Box A" },
        CodeEntry { symbol: "regional_rate_box_b", code: "REGIONALRATEBOXB", description: "Regional Rate Box B" },
        CodeEntry { symbol: "rectangular", code: "RECTANGULAR", description: "Rectangular" },
        CodeEntry { symbol: "nonrectangular", code: "NONRECTANGULAR", description: "Non-rectangular" },
    ],
};

pub const DEFAULT_BOX_NAME: &str = "variable";

pub const FIRST_CLASS_MAIL_TYPES: CodeTable = CodeTable {
    field: "first class mail type",
    entries: &[
        CodeEntry { symbol: "letter", code: "LETTER", description: "Letter" },
        CodeEntry { symbol: "flat", code: "FLAT", description: "Flat" },
        CodeEntry { symbol: "parcel", code: "PARCEL", description: "Parcel" },
        CodeEntry { symbol: "post_card", code: "POSTCARD", description: "Postcard" },
        CodeEntry { symbol: "package_service", code: "PACKAGE SERVICE", description: "Package Service" },
        CodeEntry { symbol: "package_service_retail", code: "PACKAGE SERVICE RETAIL", description: "Package Service Retail" },
    ],
};

/// MailService 文字 → 容器符號；依序比對，較長（較精確）的名稱在前
pub const MAIL_SERVICE_BOX_NAMES: [(&str, &str); 13] = [
    ("Padded Flat Rate Envelope", "padded_flat_rate_envelope"),
    ("Legal Flat Rate Envelope", "legal_flat_rate_envelope"),
    ("Small Flat Rate Envelope", "small_flat_rate_envelope"),
    ("Window Flat Rate Envelope", "window_flat_rate_envelope"),
    ("Gift Card Flat Rate Envelope", "gift_card_flat_rate_envelope"),
    ("Flat Rate Envelope", "flat_rate_envelope"),
    ("Small Flat Rate Box", "small_flat_rate_box"),
    ("Medium Flat Rate Box", "medium_flat_rate_box"),
    ("Large Flat Rate Box", "large_flat_rate_box"),
    ("Regional Rate Box A", "regional_rate_box_a"),
    ("Regional Rate Box B", "regional_rate_box_b"),
    ("Non-rectangular", "nonrectangular"),
    ("Rectangular", "rectangular"),
];

/// MailService 文字 → First-Class 郵件類型；依序比對（不分大小寫）
pub const MAIL_SERVICE_MAIL_TYPES: [(&str, &str); 6] = [
    ("letter", "letter"),
    ("large envelope", "flat"),
    ("postcard", "post_card"),
    ("package service - retail", "package_service_retail"),
    ("package service", "package_service"),
    ("parcel", "parcel"),
];

/// RateV4 回應中的 CLASSID → 服務代碼
pub fn service_code_for_class_id(class_id: u32) -> Option<&'static str> {
    match class_id {
        0 | 12 | 15 | 19 | 53 | 61 | 78 => Some(FIRST_CLASS),
        1 | 16 | 17 | 22 | 28 | 29 | 38 | 40 | 42 | 44 | 47 | 49 | 58 => Some(PRIORITY),
        2 | 3 | 13 | 23 | 25 | 27 | 30..=35 | 55..=57 | 62..=64 => Some(PRIORITY_EXPRESS),
        4 => Some(RETAIL_GROUND),
        6 => Some(MEDIA),
        7 => Some(LIBRARY),
        _ => None,
    }
}

pub fn shipping_methods() -> Vec<ShippingMethod> {
    vec![
        ShippingMethod::new(CARRIER_ID, FIRST_CLASS, "First-Class Mail", &["US"]),
        ShippingMethod::new(CARRIER_ID, PRIORITY, "Priority Mail", &["US"]),
        ShippingMethod::new(CARRIER_ID, PRIORITY_EXPRESS, "Priority Mail Express", &["US"]),
        ShippingMethod::new(CARRIER_ID, RETAIL_GROUND, "USPS Retail Ground", &["US"]),
        ShippingMethod::new(CARRIER_ID, MEDIA, "Media Mail", &["US"]),
        ShippingMethod::new(CARRIER_ID, LIBRARY, "Library Mail", &["US"]),
    ]
}

pub fn shipping_method(service_code: &str) -> Option<ShippingMethod> {
    shipping_methods()
        .into_iter()
        .find(|method| method.service_code == service_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_ids_map_to_services() {
        assert_eq!(service_code_for_class_id(0), Some(FIRST_CLASS));
        assert_eq!(service_code_for_class_id(1), Some(PRIORITY));
        assert_eq!(service_code_for_class_id(33), Some(PRIORITY_EXPRESS));
        assert_eq!(service_code_for_class_id(4), Some(RETAIL_GROUND));
        assert_eq!(service_code_for_class_id(999), None);
    }

    #[test]
    fn test_every_class_service_is_a_known_method() {
        for class_id in 0..100 {
            if let Some(code) = service_code_for_class_id(class_id) {
                assert!(shipping_method(code).is_some(), "class {} maps to unknown {}", class_id, code);
            }
        }
    }

    #[test]
    fn test_box_name_patterns_resolve() {
        for (_, symbol) in MAIL_SERVICE_BOX_NAMES {
            assert!(CONTAINERS.by_symbol(symbol).is_some(), "{}", symbol);
        }
        for (_, symbol) in MAIL_SERVICE_MAIL_TYPES {
            assert!(FIRST_CLASS_MAIL_TYPES.by_symbol(symbol).is_some(), "{}", symbol);
        }
    }
}
