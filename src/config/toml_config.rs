use crate::carriers::{CarrierRegistry, ShipEngine, UpsFreight, Usps};
use crate::utils::error::{BridgeError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub bridge: BridgeSection,
    pub ups_freight: Option<UpsFreightConfig>,
    pub usps: Option<UspsConfig>,
    pub ship_engine: Option<ShipEngineConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeSection {
    #[serde(default = "default_name")]
    pub name: String,
    /// 為 true 時所有操作都保留原始請求與回應
    #[serde(default)]
    pub debug: bool,
}

impl Default for BridgeSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsFreightConfig {
    #[serde(default = "default_ups_freight_url")]
    pub base_url: String,
    pub shipper_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UspsConfig {
    #[serde(default = "default_usps_url")]
    pub base_url: String,
    pub login: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipEngineConfig {
    #[serde(default = "default_ship_engine_url")]
    pub base_url: String,
}

fn default_name() -> String {
    "carrier-bridge".to_string()
}

fn default_ups_freight_url() -> String {
    "https://onlinetools.ups.com/".to_string()
}

fn default_usps_url() -> String {
    "https://secure.shippingapis.com/ShippingAPI.dll".to_string()
}

fn default_ship_engine_url() -> String {
    "https://api.shipengine.com/".to_string()
}

/// 相對路徑以 join 組合，根網址必須以 `/` 結尾
fn directory_url(field: &str, value: &str) -> Result<Url> {
    let mut url = validate_url(field, value)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// 尚未被替換的 `${VAR}` 代表缺少環境變數
fn check_resolved(field: &str, value: &str) -> Result<()> {
    if value.contains("${") {
        return Err(BridgeError::MissingConfigError {
            field: format!("{} (unresolved placeholder {})", field, value),
        });
    }
    Ok(())
}

impl BridgeConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BridgeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BridgeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${USPS_LOGIN})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("bridge.name", &self.bridge.name)?;

        if let Some(ups) = &self.ups_freight {
            directory_url("ups_freight.base_url", &ups.base_url)?;
            check_resolved("ups_freight.shipper_number", &ups.shipper_number)?;
            validate_non_empty_string("ups_freight.shipper_number", &ups.shipper_number)?;
        }
        if let Some(usps) = &self.usps {
            validate_url("usps.base_url", &usps.base_url)?;
            check_resolved("usps.login", &usps.login)?;
            validate_non_empty_string("usps.login", &usps.login)?;
        }
        if let Some(engine) = &self.ship_engine {
            directory_url("ship_engine.base_url", &engine.base_url)?;
        }

        if self.ups_freight.is_none() && self.usps.is_none() && self.ship_engine.is_none() {
            return Err(BridgeError::ConfigError {
                message: "No carrier sections configured ([ups_freight], [usps] or [ship_engine])".to_string(),
            });
        }
        Ok(())
    }

    /// 依已設定的區段建立承運商註冊表
    pub fn registry(&self) -> Result<CarrierRegistry> {
        self.validate_config()?;

        let mut registry = CarrierRegistry::new();
        if let Some(ups) = &self.ups_freight {
            registry.register(UpsFreight::new(
                directory_url("ups_freight.base_url", &ups.base_url)?,
                ups.shipper_number.trim(),
            ));
        }
        if let Some(usps) = &self.usps {
            registry.register(Usps::new(validate_url("usps.base_url", &usps.base_url)?, usps.login.trim()));
        }
        if let Some(engine) = &self.ship_engine {
            registry.register(ShipEngine::new(directory_url("ship_engine.base_url", &engine.base_url)?));
        }
        tracing::debug!("Registered carriers: {:?}", registry.ids());
        Ok(registry)
    }
}

impl Validate for BridgeConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
