pub mod adapters;
pub mod carriers;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::ReplayTransport;
pub use crate::carriers::usps::{choose_package_rate, CannotDetermineRate};
pub use crate::carriers::{CarrierRegistry, ShipEngine, UpsFreight, Usps};
pub use crate::config::BridgeConfig;
pub use crate::core::ShippingEngine;
pub use crate::domain::model::{
    Carrier, Container, Dimensions, Item, Label, Length, LengthUnit, Location, Money, Package, Rate, Shipment,
    ShipmentDocument, ShipmentInformation, ShippingMethod, VoidOutcome, Weight, WeightUnit,
};
pub use crate::domain::options::{
    BillingOption, DocumentOptions, LabelDownloadType, LabelFormat, LabelOptions, PackageOptions, PackageOptionsMap,
    RateOptions,
};
pub use crate::domain::ports::{CarrierApi, Transport};
pub use crate::domain::result::{ApiFailure, ApiOutcome, ApiResult, Exchange, FailureKind};
pub use crate::domain::wire::{HttpMethod, Request, Response};
pub use crate::utils::error::{BridgeError, BuildError, Result};
