use crate::carriers::CarrierRegistry;
use crate::domain::model::{Label, Rate, Shipment, ShipmentInformation, VoidOutcome};
use crate::domain::options::{LabelOptions, RateOptions};
use crate::domain::ports::{CarrierApi, Transport};
use crate::domain::result::{ApiOutcome, Exchange};
use crate::domain::wire::{Request, Response};
use crate::utils::error::Result;
use std::sync::Arc;

/// 組請求 → 傳輸 → 解析
///
/// 呼叫端錯誤（未知承運商、選項不合法、不支援的操作、傳輸失敗）以 `Err` 回傳；
/// 承運商回應層級的失敗都在 `ApiOutcome` 裡。
pub struct ShippingEngine<T: Transport> {
    registry: CarrierRegistry,
    transport: T,
}

impl<T: Transport> ShippingEngine<T> {
    pub fn new(registry: CarrierRegistry, transport: T) -> Self {
        Self { registry, transport }
    }

    pub fn registry(&self) -> &CarrierRegistry {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn carrier(&self, carrier_id: &str) -> Result<Arc<dyn CarrierApi>> {
        let carrier = self.registry.get(carrier_id)?;
        tracing::debug!("🚚 Using carrier {}", carrier.id());
        Ok(carrier)
    }

    async fn exchange(&self, request: &Request) -> Result<Response> {
        tracing::debug!("📤 {:?} {}", request.http_method, request.url);
        let response = self.transport.send(request).await?;
        tracing::debug!("📥 Carrier responded with {}", response.status_line());
        Ok(response)
    }

    pub async fn rates(
        &self,
        carrier_id: &str,
        shipment: &Shipment,
        options: &RateOptions,
    ) -> Result<ApiOutcome<Vec<Rate>>> {
        let carrier = self.carrier(carrier_id)?;
        let request = carrier.build_rate_request(shipment, options)?;
        let response = self.exchange(&request).await?;
        let outcome = carrier.parse_rate_response(Exchange::new(&request, &response), shipment, options);
        match &outcome {
            Ok(result) => tracing::info!("📊 {} returned {} rates", carrier_id, result.data.len()),
            Err(failure) => tracing::warn!("⚠️ {} rate request failed: {}", carrier_id, failure),
        }
        Ok(outcome)
    }

    pub async fn label(
        &self,
        carrier_id: &str,
        shipment: &Shipment,
        options: &LabelOptions,
    ) -> Result<ApiOutcome<Vec<Label>>> {
        let carrier = self.carrier(carrier_id)?;
        let request = carrier.build_label_request(shipment, options)?;
        let response = self.exchange(&request).await?;
        let outcome = carrier.parse_label_response(Exchange::new(&request, &response), shipment, options);
        match &outcome {
            Ok(result) => tracing::info!("🏷️ {} created {} labels", carrier_id, result.data.len()),
            Err(failure) => tracing::warn!("⚠️ {} label request failed: {}", carrier_id, failure),
        }
        Ok(outcome)
    }

    /// 零擔貨運託運（BOL、取件預約、文件）
    pub async fn ship(
        &self,
        carrier_id: &str,
        shipment: &Shipment,
        options: &LabelOptions,
    ) -> Result<ApiOutcome<ShipmentInformation>> {
        let carrier = self.carrier(carrier_id)?;
        let request = carrier.build_ship_request(shipment, options)?;
        let response = self.exchange(&request).await?;
        let outcome = carrier.parse_ship_response(Exchange::new(&request, &response), shipment, options);
        match &outcome {
            Ok(result) => tracing::info!(
                "📦 {} booked shipment {}",
                carrier_id,
                result.data.number.as_deref().unwrap_or("(no number)")
            ),
            Err(failure) => tracing::warn!("⚠️ {} shipment request failed: {}", carrier_id, failure),
        }
        Ok(outcome)
    }

    pub async fn void(&self, carrier_id: &str, label: &Label, debug: bool) -> Result<ApiOutcome<VoidOutcome>> {
        let carrier = self.carrier(carrier_id)?;
        let request = carrier.build_void_request(label, debug)?;
        let response = self.exchange(&request).await?;
        let outcome = carrier.parse_void_response(Exchange::new(&request, &response));
        match &outcome {
            Ok(result) if result.data.approved => tracing::info!("✅ {} approved the void", carrier_id),
            Ok(result) => tracing::warn!("❌ {} rejected the void: {}", carrier_id, result.data.message),
            Err(failure) => tracing::warn!("⚠️ {} void request failed: {}", carrier_id, failure),
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carriers::UpsFreight;
    use crate::domain::model::{Location, Package};
    use crate::utils::error::{BridgeError, BuildError};
    use std::sync::Mutex;
    use url::Url;

    struct MockTransport {
        status: u16,
        body: String,
        sent: Mutex<Vec<Request>>,
    }

    impl MockTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: &Request) -> Result<Response> {
            self.sent.lock().unwrap().push(request.clone());
            Ok(Response::new(self.status, self.body.clone()))
        }
    }

    fn engine(transport: MockTransport) -> ShippingEngine<MockTransport> {
        let registry = CarrierRegistry::new().with(UpsFreight::new(
            Url::parse("https://freight.test/").unwrap(),
            "AB1234",
        ));
        ShippingEngine::new(registry, transport)
    }

    fn shipment() -> Shipment {
        let location = Location {
            country: "US".into(),
            ..Default::default()
        };
        Shipment {
            origin: location.clone(),
            destination: location,
            packages: vec![Package::new("p1", vec![])],
        }
    }

    fn rate_options() -> RateOptions {
        RateOptions {
            shipping_method: Some(crate::carriers::ups_freight::codes::shipping_methods().remove(0)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_unknown_carrier_is_a_contract_error() {
        let engine = engine(MockTransport::new(200, "{}"));
        let err = engine.rates("fedex", &shipment(), &rate_options()).await.unwrap_err();
        assert!(matches!(err, BridgeError::UnknownCarrierError { .. }));
        assert!(engine.transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_build_errors_never_reach_transport() {
        let engine = engine(MockTransport::new(200, "{}"));
        let err = engine
            .rates("ups_freight", &shipment(), &RateOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::BuildError(BuildError::MissingOption { field: "shipping_method" })
        ));
        assert!(engine.transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_carrier_failure_is_an_outcome() {
        let engine = engine(MockTransport::new(503, ""));
        let outcome = engine.rates("ups_freight", &shipment(), &rate_options()).await.unwrap();
        let failure = outcome.unwrap_err();
        assert_eq!(failure.message, "503 Service Unavailable");
        assert_eq!(engine.transport.sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unsupported_operation() {
        let engine = engine(MockTransport::new(200, "{}"));
        let label = Label::from_id("x");
        let err = tokio_test::block_on(engine.void("ups_freight", &label, false)).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::BuildError(BuildError::Unsupported { operation: "void", .. })
        ));
    }
}
