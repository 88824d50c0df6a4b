use crate::carriers::codes::{CodeEntry, CodeTable};

/// ShipEngine 的 package_code；符號與線上代碼相同
pub const PACKAGE_CODES: CodeTable = CodeTable {
    field: "package code",
    entries: &[
        CodeEntry { symbol: "package", code: "package", description: "Package" },
        CodeEntry { symbol: "thick_envelope", code: "thick_envelope", description: "Thick Envelope" },
        CodeEntry { symbol: "letter", code: "letter", description: "Letter" },
        CodeEntry { symbol: "large_envelope_or_flat", code: "large_envelope_or_flat", description: "Large Envelope or Flat" },
        CodeEntry { symbol: "large_package", code: "large_package", description: "Large Package" },
        CodeEntry { symbol: "nonmachinable_package", code: "nonmachinable_package", description: "Nonmachinable Package" },
        CodeEntry { symbol: "cubic", code: "cubic", description: "Cubic" },
        CodeEntry { symbol: "flat_rate_envelope", code: "flat_rate_envelope", description: "Flat Rate Envelope" },
        CodeEntry { symbol: "flat_rate_legal_envelope", code: "flat_rate_legal_envelope", description: "Flat Rate Legal Envelope" },
        CodeEntry { symbol: "flat_rate_padded_envelope", code: "flat_rate_padded_envelope", description: "Flat Rate Padded Envelope" },
        CodeEntry { symbol: "small_flat_rate_box", code: "small_flat_rate_box", description: "Small Flat Rate Box" },
        CodeEntry { symbol: "medium_flat_rate_box", code: "medium_flat_rate_box", description: "Medium Flat Rate Box" },
        CodeEntry { symbol: "large_flat_rate_box", code: "large_flat_rate_box", description: "Large Flat Rate Box" },
        CodeEntry { symbol: "regional_rate_box_a", code: "regional_rate_box_a", description: "Regional Rate Box A" },
        CodeEntry { symbol: "regional_rate_box_b", code: "regional_rate_box_b", description: "Regional Rate Box B" },
    ],
};
