//! ShipEngine 多承運商平台：估價、標籤、作廢
pub mod codes;
pub mod request;
pub mod response;

use crate::domain::model::{Label, Rate, Shipment, ShippingMethod, VoidOutcome};
use crate::domain::options::{LabelOptions, RateOptions};
use crate::domain::ports::CarrierApi;
use crate::domain::result::{ApiOutcome, Exchange};
use crate::domain::wire::{HttpMethod, Request};
use crate::utils::error::BuildError;
use url::Url;

pub const CARRIER_ID: &str = "ship_engine";

#[derive(Debug, Clone)]
pub struct ShipEngine {
    base_url: Url,
}

impl ShipEngine {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    fn endpoint(&self, path: &str) -> Result<String, BuildError> {
        Ok(self.base_url.join(path)?.to_string())
    }
}

impl CarrierApi for ShipEngine {
    fn id(&self) -> &'static str {
        CARRIER_ID
    }

    /// 運送方式隨帳號而異，由呼叫端透過 `RateOptions::carriers` 提供
    fn shipping_methods(&self) -> Vec<ShippingMethod> {
        Vec::new()
    }

    fn build_rate_request(&self, shipment: &Shipment, options: &RateOptions) -> Result<Request, BuildError> {
        let body = request::rate_estimate_body(shipment, options)?;
        Ok(Request::json(
            HttpMethod::Post,
            self.endpoint("v1/rates/estimate")?,
            Some(serde_json::to_string(&body)?),
            options.debug,
        ))
    }

    fn parse_rate_response(
        &self,
        exchange: Exchange<'_>,
        shipment: &Shipment,
        options: &RateOptions,
    ) -> ApiOutcome<Vec<Rate>> {
        response::parse_rates(exchange, shipment, options)
    }

    fn build_label_request(&self, shipment: &Shipment, options: &LabelOptions) -> Result<Request, BuildError> {
        let body = request::label_body(shipment, options)?;
        Ok(Request::json(
            HttpMethod::Post,
            self.endpoint("v1/labels")?,
            Some(serde_json::to_string(&body)?),
            options.debug,
        ))
    }

    fn parse_label_response(
        &self,
        exchange: Exchange<'_>,
        _shipment: &Shipment,
        options: &LabelOptions,
    ) -> ApiOutcome<Vec<Label>> {
        response::parse_label(exchange, options)
    }

    fn build_void_request(&self, label: &Label, debug: bool) -> Result<Request, BuildError> {
        let label_id = label
            .id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(BuildError::MissingOption { field: "label_id" })?;
        let mut url = self.base_url.join("v1/labels/")?;
        url.path_segments_mut()
            .map_err(|_| BuildError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(label_id.trim())
            .push("void");
        Ok(Request::json(HttpMethod::Put, url.to_string(), None, debug))
    }

    fn parse_void_response(&self, exchange: Exchange<'_>) -> ApiOutcome<VoidOutcome> {
        response::parse_void(exchange)
    }
}
