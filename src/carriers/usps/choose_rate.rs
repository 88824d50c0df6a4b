use super::codes::{DEFAULT_BOX_NAME, FIRST_CLASS};
use crate::domain::model::{Rate, ShippingMethod};
use crate::domain::options::PackageOptions;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot determine a {service_code} rate for the package")]
pub struct CannotDetermineRate {
    pub service_code: String,
}

/// 從單一包裹的候選費率中挑出符合運送方式、包裝類型與 HFP 旗標的那一筆
///
/// First-Class 服務比對郵件類型（包裹未指定時不過濾），其他服務比對容器名稱
/// （未指定時為 variable）。多筆符合時取第一筆。
pub fn choose_package_rate<'a>(
    shipping_method: &ShippingMethod,
    rates: &'a [Rate],
    options: &PackageOptions,
) -> Result<&'a Rate, CannotDetermineRate> {
    let first_class = shipping_method.service_code == FIRST_CLASS;
    let wanted_box = options.box_name.as_deref().unwrap_or(DEFAULT_BOX_NAME);

    let mut candidates = rates
        .iter()
        .filter(|rate| rate.shipping_method == *shipping_method)
        .filter(|rate| {
            if first_class {
                match options.first_class_mail_type.as_deref() {
                    Some(mail_type) => rate.data_str("first_class_mail_type") == Some(mail_type),
                    None => true,
                }
            } else {
                rate.data_str("box_name").unwrap_or(DEFAULT_BOX_NAME) == wanted_box
            }
        })
        .filter(|rate| rate.data_flag("hold_for_pickup") == options.hold_for_pickup);

    let chosen = candidates.next().ok_or_else(|| CannotDetermineRate {
        service_code: shipping_method.service_code.clone(),
    })?;
    let remaining = candidates.count();
    if remaining > 0 {
        tracing::debug!(
            "{} more {} rates matched the package; using the first",
            remaining,
            shipping_method.service_code
        );
    }
    Ok(chosen)
}
