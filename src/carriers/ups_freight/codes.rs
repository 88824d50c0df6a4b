use crate::carriers::codes::{CodeEntry, CodeTable};
use crate::domain::model::ShippingMethod;

pub const CARRIER_ID: &str = "ups_freight";

/// pallet/skid/carboy/totes 放入 HandlingUnitOne，loose/other 放入 HandlingUnitTwo
pub const HANDLING_UNITS: CodeTable = CodeTable {
    field: "handling unit",
    entries: &[
        CodeEntry { symbol: "pallet", code: "PLT", description: "Pallet" },
        CodeEntry { symbol: "skid", code: "SKD", description: "Skid" },
        CodeEntry { symbol: "carboy", code: "CBY", description: "Carboy" },
        CodeEntry { symbol: "totes", code: "TOT", description: "Totes" },
        CodeEntry { symbol: "loose", code: "LOO", description: "Loose" },
        CodeEntry { symbol: "other", code: "OTH", description: "Other" },
    ],
};

pub const DEFAULT_HANDLING_UNIT: &str = "pallet";

const PRIMARY_HANDLING_UNIT_CODES: [&str; 4] = ["PLT", "SKD", "CBY", "TOT"];

pub fn handling_unit_slot(code: &str) -> &'static str {
    if PRIMARY_HANDLING_UNIT_CODES.contains(&code) {
        "HandlingUnitOne"
    } else {
        "HandlingUnitTwo"
    }
}

pub const PACKAGING_TYPES: CodeTable = CodeTable {
    field: "packaging",
    entries: &[
        CodeEntry { symbol: "bag", code: "BAG", description: "Bag" },
        CodeEntry { symbol: "bale", code: "BAL", description: "Bale" },
        CodeEntry { symbol: "barrel", code: "BAR", description: "Barrel" },
        CodeEntry { symbol: "bundle", code: "BDL", description: "Bundle" },
        CodeEntry { symbol: "bin", code: "BIN", description: "Bin" },
        CodeEntry { symbol: "box", code: "BOX", description: "Box" },
        CodeEntry { symbol: "basket", code: "BSK", description: "Basket" },
        CodeEntry { symbol: "bunch", code: "BUN", description: "Bunch" },
        CodeEntry { symbol: "cabinet", code: "CAB", description: "Cabinet" },
        CodeEntry { symbol: "can", code: "CAN", description: "Can" },
        CodeEntry { symbol: "carrier", code: "CAR", description: "Carrier" },
        CodeEntry { symbol: "case", code: "CAS", description: "Case" },
        CodeEntry { symbol: "carboy", code: "CBY", description: "Carboy" },
        CodeEntry { symbol: "container", code: "CON", description: "Container" },
        CodeEntry { symbol: "crate", code: "CRT", description: "Crate" },
        CodeEntry { symbol: "cask", code: "CSK", description: "Cask" },
        CodeEntry { symbol: "carton", code: "CTN", description: "Carton" },
        CodeEntry { symbol: "cylinder", code: "CYL", description: "Cylinder" },
        CodeEntry { symbol: "drum", code: "DRM", description: "Drum" },
        CodeEntry { symbol: "loose", code: "LOO", description: "Loose" },
        CodeEntry { symbol: "other", code: "OTH", description: "Other" },
        CodeEntry { symbol: "pail", code: "PAL", description: "Pail" },
        CodeEntry { symbol: "pieces", code: "PCS", description: "Pieces" },
        CodeEntry { symbol: "package", code: "PKG", description: "Package" },
        CodeEntry { symbol: "pipe_line", code: "PLN", description: "Pipe Line" },
        CodeEntry { symbol: "pallet", code: "PLT", description: "Pallet" },
        CodeEntry { symbol: "rack", code: "RCK", description: "Rack" },
        CodeEntry { symbol: "reel", code: "REL", description: "Reel" },
        CodeEntry { symbol: "roll", code: "ROL", description: "Roll" },
        CodeEntry { symbol: "skid", code: "SKD", description: "Skid" },
        CodeEntry { symbol: "spool", code: "SPL", description: "Spool" },
        CodeEntry { symbol: "tube", code: "TBE", description: "Tube" },
        CodeEntry { symbol: "tank", code: "TNK", description: "Tank" },
        CodeEntry { symbol: "unit", code: "UNT", description: "Unit" },
        CodeEntry { symbol: "van_pack", code: "VPK", description: "Van Pack" },
        CodeEntry { symbol: "wrapped", code: "WRP", description: "Wrapped" },
    ],
};

pub const DEFAULT_PACKAGING: &str = "pallet";

pub const BILLING_OPTIONS: CodeTable = CodeTable {
    field: "billing option",
    entries: &[
        CodeEntry { symbol: "prepaid", code: "10", description: "Prepaid" },
        CodeEntry { symbol: "third_party", code: "30", description: "Bill to Third Party" },
        CodeEntry { symbol: "freight_collect", code: "40", description: "Freight Collect" },
    ],
};

pub const DOCUMENT_TYPES: CodeTable = CodeTable {
    field: "document type",
    entries: &[
        CodeEntry { symbol: "bill_of_lading", code: "20", description: "Bill of Lading" },
        CodeEntry { symbol: "label", code: "30", description: "Label" },
    ],
};

pub const DOCUMENT_FORMATS: CodeTable = CodeTable {
    field: "document format",
    entries: &[CodeEntry { symbol: "pdf", code: "01", description: "PDF" }],
};

pub const PRINT_FORMATS: CodeTable = CodeTable {
    field: "print format",
    entries: &[
        CodeEntry { symbol: "laser", code: "01", description: "Laser" },
        CodeEntry { symbol: "thermal", code: "02", description: "Thermal" },
    ],
};

/// 列印尺寸：符號 → (寬, 長)，單位英吋
pub const PRINT_SIZES: [(&str, &str, &str); 2] = [("4x6", "4", "6"), ("8x11", "8", "11")];

pub fn shipping_methods() -> Vec<ShippingMethod> {
    vec![
        ShippingMethod::new(CARRIER_ID, "308", "UPS Freight LTL", &["US", "CA", "MX"]),
        ShippingMethod::new(CARRIER_ID, "309", "UPS Freight LTL - Guaranteed", &["US", "CA", "MX"]),
        ShippingMethod::new(CARRIER_ID, "334", "UPS Freight LTL - Guaranteed A.M.", &["US", "CA", "MX"]),
        ShippingMethod::new(CARRIER_ID, "349", "UPS Standard LTL", &["US"]),
    ]
}
