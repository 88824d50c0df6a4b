use crate::domain::wire::{Request, Response};
use serde::Serialize;
use thiserror::Error;

/// 失敗分類：解析失敗、承運商拒絕、無法對應費率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Parse,
    Carrier,
    Match,
}

/// 成功結果；原始請求/回應只在 debug 模式下保留
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResult<T> {
    pub data: T,
    pub original_request: Option<Request>,
    pub original_response: Option<Response>,
}

impl<T> ApiResult<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        ApiResult {
            data: f(self.data),
            original_request: self.original_request,
            original_response: self.original_response,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{message}")]
pub struct ApiFailure {
    pub message: String,
    pub kind: FailureKind,
    pub original_request: Option<Request>,
    pub original_response: Option<Response>,
}

impl ApiFailure {
    pub fn without_payloads(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            original_request: None,
            original_response: None,
        }
    }
}

pub type ApiOutcome<T> = Result<ApiResult<T>, ApiFailure>;

/// 一次請求/回應往返，用來建立結果並依 debug 旗標附上原始內容
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub request: &'a Request,
    pub response: &'a Response,
}

impl<'a> Exchange<'a> {
    pub fn new(request: &'a Request, response: &'a Response) -> Self {
        Self { request, response }
    }

    fn payloads(&self) -> (Option<Request>, Option<Response>) {
        if self.request.debug {
            (Some(self.request.clone()), Some(self.response.clone()))
        } else {
            (None, None)
        }
    }

    pub fn success<T>(&self, data: T) -> ApiOutcome<T> {
        let (original_request, original_response) = self.payloads();
        Ok(ApiResult {
            data,
            original_request,
            original_response,
        })
    }

    pub fn failure(&self, kind: FailureKind, message: impl Into<String>) -> ApiFailure {
        let (original_request, original_response) = self.payloads();
        ApiFailure {
            message: message.into(),
            kind,
            original_request,
            original_response,
        }
    }

    pub fn parse_failure(&self, message: impl Into<String>) -> ApiFailure {
        self.failure(FailureKind::Parse, message)
    }

    pub fn carrier_failure(&self, message: impl Into<String>) -> ApiFailure {
        self.failure(FailureKind::Carrier, message)
    }

    /// 回應主體轉為 UTF-8 文字
    pub fn body_text(&self) -> Result<&'a str, ApiFailure> {
        self.response
            .body_text()
            .map_err(|e| self.parse_failure(format!("Response body is not valid UTF-8: {}", e)))
    }

    pub fn json(&self) -> Result<serde_json::Value, ApiFailure> {
        serde_json::from_slice(&self.response.body)
            .map_err(|e| self.parse_failure(format!("Malformed JSON response: {}", e)))
    }
}
