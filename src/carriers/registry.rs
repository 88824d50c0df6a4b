use crate::domain::ports::CarrierApi;
use crate::utils::error::{BridgeError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 承運商 ID → 實作
#[derive(Clone, Default)]
pub struct CarrierRegistry {
    carriers: BTreeMap<&'static str, Arc<dyn CarrierApi>>,
}

impl CarrierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 相同 ID 重複註冊時以後者為準
    pub fn register(&mut self, carrier: impl CarrierApi + 'static) -> &mut Self {
        let carrier: Arc<dyn CarrierApi> = Arc::new(carrier);
        if self.carriers.insert(carrier.id(), carrier).is_some() {
            tracing::warn!("Replacing previously registered carrier");
        }
        self
    }

    pub fn with(mut self, carrier: impl CarrierApi + 'static) -> Self {
        self.register(carrier);
        self
    }

    pub fn get(&self, carrier_id: &str) -> Result<Arc<dyn CarrierApi>> {
        self.carriers
            .get(carrier_id.trim())
            .cloned()
            .ok_or_else(|| BridgeError::UnknownCarrierError {
                carrier_id: carrier_id.to_string(),
            })
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.carriers.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }
}

impl std::fmt::Debug for CarrierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierRegistry").field("carriers", &self.ids()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carriers::{ShipEngine, UpsFreight};
    use url::Url;

    #[test]
    fn test_lookup_by_id() {
        let registry = CarrierRegistry::new()
            .with(UpsFreight::new(Url::parse("https://freight.test/").unwrap(), "AB1234"))
            .with(ShipEngine::new(Url::parse("https://engine.test/").unwrap()));

        assert_eq!(registry.ids(), vec!["ship_engine", "ups_freight"]);
        assert_eq!(registry.get("ups_freight").unwrap().id(), "ups_freight");
        assert!(matches!(
            registry.get("fedex"),
            Err(BridgeError::UnknownCarrierError { carrier_id }) if carrier_id == "fedex"
        ));
    }
}
