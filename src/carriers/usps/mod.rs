//! USPS Web Tools RateV4（XML）
pub mod choose_rate;
pub mod codes;
pub mod request;
pub mod response;

pub use choose_rate::{choose_package_rate, CannotDetermineRate};

use crate::domain::model::{Rate, Shipment, ShippingMethod};
use crate::domain::options::RateOptions;
use crate::domain::ports::CarrierApi;
use crate::domain::result::{ApiOutcome, Exchange};
use crate::domain::wire::{HttpMethod, Request};
use crate::utils::error::BuildError;
use url::Url;

#[derive(Debug, Clone)]
pub struct Usps {
    base_url: Url,
    login: String,
}

impl Usps {
    pub fn new(base_url: Url, login: impl Into<String>) -> Self {
        Self {
            base_url,
            login: login.into(),
        }
    }
}

impl CarrierApi for Usps {
    fn id(&self) -> &'static str {
        codes::CARRIER_ID
    }

    fn shipping_methods(&self) -> Vec<ShippingMethod> {
        codes::shipping_methods()
    }

    fn build_rate_request(&self, shipment: &Shipment, options: &RateOptions) -> Result<Request, BuildError> {
        let document = request::rate_request_document(shipment, options, &self.login)?;
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("API", "RateV4")
            .append_pair("XML", &document);

        Ok(Request {
            http_method: HttpMethod::Get,
            url: url.to_string(),
            body: None,
            headers: vec![("Accept".to_string(), "application/xml".to_string())],
            debug: options.debug,
        })
    }

    fn parse_rate_response(
        &self,
        exchange: Exchange<'_>,
        shipment: &Shipment,
        options: &RateOptions,
    ) -> ApiOutcome<Vec<Rate>> {
        response::parse_rates(exchange, shipment, options)
    }
}
