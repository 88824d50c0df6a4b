//! UPS Freight（零擔貨運）JSON API：詢價與託運
pub mod codes;
pub mod request;
pub mod response;

use crate::domain::model::{Rate, Shipment, ShipmentInformation, ShippingMethod};
use crate::domain::options::{LabelOptions, RateOptions};
use crate::domain::ports::CarrierApi;
use crate::domain::result::{ApiOutcome, Exchange};
use crate::domain::wire::{HttpMethod, Request};
use crate::utils::error::BuildError;
use url::Url;

const RATE_PATH: &str = "ship/v1/freight/rating/ground";
const SHIP_PATH: &str = "ship/v1/freight/shipments/ground";

#[derive(Debug, Clone)]
pub struct UpsFreight {
    base_url: Url,
    shipper_number: String,
}

impl UpsFreight {
    pub fn new(base_url: Url, shipper_number: impl Into<String>) -> Self {
        Self {
            base_url,
            shipper_number: shipper_number.into(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<String, BuildError> {
        Ok(self.base_url.join(path)?.to_string())
    }
}

impl CarrierApi for UpsFreight {
    fn id(&self) -> &'static str {
        codes::CARRIER_ID
    }

    fn shipping_methods(&self) -> Vec<ShippingMethod> {
        codes::shipping_methods()
    }

    fn build_rate_request(&self, shipment: &Shipment, options: &RateOptions) -> Result<Request, BuildError> {
        let body = request::rate_request_body(shipment, options, &self.shipper_number)?;
        Ok(Request::json(
            HttpMethod::Post,
            self.endpoint(RATE_PATH)?,
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

    fn build_ship_request(&self, shipment: &Shipment, options: &LabelOptions) -> Result<Request, BuildError> {
        let body = request::ship_request_body(shipment, options, &self.shipper_number)?;
        Ok(Request::json(
            HttpMethod::Post,
            self.endpoint(SHIP_PATH)?,
            Some(serde_json::to_string(&body)?),
            options.debug,
        ))
    }

    fn parse_ship_response(
        &self,
        exchange: Exchange<'_>,
        _shipment: &Shipment,
        _options: &LabelOptions,
    ) -> ApiOutcome<ShipmentInformation> {
        response::parse_shipment(exchange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Item, Location, Package, Weight};

    fn carrier() -> UpsFreight {
        UpsFreight::new(Url::parse("https://wwwcie.ups.com/").unwrap(), "AB1234")
    }

    fn shipment() -> Shipment {
        let location = |country: &str| Location {
            name: Some("Dock".into()),
            country: country.into(),
            ..Default::default()
        };
        Shipment {
            origin: location("US"),
            destination: location("US"),
            packages: vec![Package::new(
                "p1",
                vec![Item {
                    id: "i1".into(),
                    weight: Weight::pounds(500.0),
                    description: None,
                    declared_value: None,
                }],
            )],
        }
    }

    #[test]
    fn test_rate_request_envelope() {
        let options = RateOptions {
            shipping_method: Some(codes::shipping_methods().remove(0)),
            debug: true,
            ..Default::default()
        };
        let request = carrier().build_rate_request(&shipment(), &options).unwrap();
        assert_eq!(request.http_method, HttpMethod::Post);
        assert_eq!(request.url, "https://wwwcie.ups.com/ship/v1/freight/rating/ground");
        assert!(request.debug);
        assert!(request.body.unwrap().starts_with("{\"FreightRateRequest\""));
    }

    #[test]
    fn test_ship_request_goes_to_shipments_endpoint() {
        let options = LabelOptions::new(codes::shipping_methods().remove(0));
        let request = carrier().build_ship_request(&shipment(), &options).unwrap();
        assert_eq!(request.url, "https://wwwcie.ups.com/ship/v1/freight/shipments/ground");
    }

    #[test]
    fn test_labels_are_unsupported() {
        let options = LabelOptions::new(codes::shipping_methods().remove(0));
        let err = carrier().build_label_request(&shipment(), &options).unwrap_err();
        assert_eq!(err.to_string(), "ups_freight does not support the label operation");
    }
}
