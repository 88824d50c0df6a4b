use crate::domain::model::{Label, Rate, Shipment, ShipmentInformation, ShippingMethod, VoidOutcome};
use crate::domain::options::{LabelOptions, RateOptions};
use crate::domain::result::{ApiOutcome, Exchange, FailureKind};
use crate::domain::wire::{Request, Response};
use crate::utils::error::{BuildError, Result};
use async_trait::async_trait;

/// 傳輸層：送出請求並取回原始回應（重試、驗證不在此 crate 範圍內）
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &Request) -> Result<Response>;
}

/// 承運商能力介面：每個操作都是純函式的 build/parse 組合
///
/// 不支援的操作保留預設實作，build 會回傳 `BuildError::Unsupported`。
pub trait CarrierApi: Send + Sync {
    fn id(&self) -> &'static str;

    /// 內建的運送方式表（ShipEngine 由呼叫端提供，回傳空表）
    fn shipping_methods(&self) -> Vec<ShippingMethod>;

    fn build_rate_request(&self, shipment: &Shipment, options: &RateOptions) -> std::result::Result<Request, BuildError>;

    fn parse_rate_response(
        &self,
        exchange: Exchange<'_>,
        shipment: &Shipment,
        options: &RateOptions,
    ) -> ApiOutcome<Vec<Rate>>;

    fn build_label_request(
        &self,
        _shipment: &Shipment,
        _options: &LabelOptions,
    ) -> std::result::Result<Request, BuildError> {
        Err(self.unsupported("label"))
    }

    fn parse_label_response(
        &self,
        exchange: Exchange<'_>,
        _shipment: &Shipment,
        _options: &LabelOptions,
    ) -> ApiOutcome<Vec<Label>> {
        Err(exchange.failure(FailureKind::Parse, self.unsupported("label").to_string()))
    }

    fn build_ship_request(
        &self,
        _shipment: &Shipment,
        _options: &LabelOptions,
    ) -> std::result::Result<Request, BuildError> {
        Err(self.unsupported("freight-ship"))
    }

    fn parse_ship_response(
        &self,
        exchange: Exchange<'_>,
        _shipment: &Shipment,
        _options: &LabelOptions,
    ) -> ApiOutcome<ShipmentInformation> {
        Err(exchange.failure(FailureKind::Parse, self.unsupported("freight-ship").to_string()))
    }

    fn build_void_request(&self, _label: &Label, _debug: bool) -> std::result::Result<Request, BuildError> {
        Err(self.unsupported("void"))
    }

    fn parse_void_response(&self, exchange: Exchange<'_>) -> ApiOutcome<VoidOutcome> {
        Err(exchange.failure(FailureKind::Parse, self.unsupported("void").to_string()))
    }

    fn unsupported(&self, operation: &'static str) -> BuildError {
        BuildError::Unsupported {
            carrier: self.id().to_string(),
            operation,
        }
    }
}
