use crate::domain::model::{Carrier, Location, Shipment, ShippingMethod};
use crate::utils::error::BuildError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 單一包裹的選項；符號（handling_unit、packaging…）由各承運商的代碼表解析
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageOptions {
    pub handling_unit: Option<String>,
    pub packaging: Option<String>,
    pub freight_class: Option<String>,
    pub nmfc_primary_code: Option<String>,
    pub nmfc_sub_code: Option<String>,
    pub reference_messages: Vec<String>,
    pub box_name: Option<String>,
    pub first_class_mail_type: Option<String>,
    pub hold_for_pickup: bool,
    pub machinable: Option<bool>,
}

/// 包裹 ID → 包裹選項，找不到時使用 default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageOptionsMap {
    pub default: PackageOptions,
    pub by_package: BTreeMap<String, PackageOptions>,
}

impl PackageOptionsMap {
    pub fn with(mut self, package_id: impl Into<String>, options: PackageOptions) -> Self {
        self.by_package.insert(package_id.into(), options);
        self
    }

    pub fn options_for(&self, package_id: &str) -> &PackageOptions {
        self.by_package.get(package_id).unwrap_or(&self.default)
    }

    /// 所有被引用的包裹都必須存在於 Shipment 中
    pub fn check_against(&self, shipment: &Shipment) -> Result<(), BuildError> {
        match self
            .by_package
            .keys()
            .find(|id| shipment.package(id).is_none())
        {
            Some(id) => Err(BuildError::UnknownPackage {
                package_id: id.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BillingOption {
    /// 寄件人預付
    #[default]
    Prepaid,
    ThirdParty {
        payer: Location,
    },
    FreightCollect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelDownloadType {
    #[default]
    Url,
    Inline,
}

impl LabelDownloadType {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelDownloadType::Url => "url",
            LabelDownloadType::Inline => "inline",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFormat {
    #[default]
    Pdf,
    Png,
    Zpl,
}

impl LabelFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelFormat::Pdf => "pdf",
            LabelFormat::Png => "png",
            LabelFormat::Zpl => "zpl",
        }
    }
}

/// 貨運文件（標籤、提單）列印設定，符號由 UPS Freight 代碼表解析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    pub document_type: String,
    pub format: String,
    pub print_format: String,
    pub print_size: String,
    pub labels_per_page: u32,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            document_type: "label".to_string(),
            format: "pdf".to_string(),
            print_format: "laser".to_string(),
            print_size: "4x6".to_string(),
            labels_per_page: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateOptions {
    pub shipping_method: Option<ShippingMethod>,
    /// ShipEngine 帳號下要詢價的承運商
    pub carriers: Vec<Carrier>,
    pub billing: BillingOption,
    pub commercial_pricing: bool,
    pub ship_date: Option<NaiveDate>,
    pub customer_context: Option<String>,
    pub debug: bool,
    pub packages: PackageOptionsMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelOptions {
    pub shipping_method: ShippingMethod,
    #[serde(default)]
    pub label_format: LabelFormat,
    #[serde(default)]
    pub download_type: LabelDownloadType,
    #[serde(default)]
    pub billing: BillingOption,
    #[serde(default)]
    pub documents: Vec<DocumentOptions>,
    #[serde(default)]
    pub pickup_instructions: Option<String>,
    #[serde(default)]
    pub delivery_instructions: Option<String>,
    #[serde(default)]
    pub handling_instructions: Option<String>,
    #[serde(default)]
    pub ship_date: Option<NaiveDate>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub packages: PackageOptionsMap,
}

impl LabelOptions {
    pub fn new(shipping_method: ShippingMethod) -> Self {
        Self {
            shipping_method,
            label_format: LabelFormat::default(),
            download_type: LabelDownloadType::default(),
            billing: BillingOption::default(),
            documents: Vec::new(),
            pickup_instructions: None,
            delivery_instructions: None,
            handling_instructions: None,
            ship_date: None,
            debug: false,
            packages: PackageOptionsMap::default(),
        }
    }
}
