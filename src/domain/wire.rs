use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

/// 已組好的承運商請求，交給 Transport 送出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub http_method: HttpMethod,
    pub url: String,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
    /// 為 true 時結果會保留原始請求與回應
    pub debug: bool,
}

impl Request {
    pub fn json(http_method: HttpMethod, url: String, body: Option<String>, debug: bool) -> Self {
        Self {
            http_method,
            url,
            body,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            debug,
        }
    }
}

/// Transport 回傳的原始回應
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }

    /// 一律是 "<狀態碼> <原因>"，例如 "401 Unauthorized"、"418 Client Error"
    pub fn status_line(&self) -> String {
        let reason = match self.status {
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            100..=199 => "Informational",
            200..=299 => "Success",
            300..=399 => "Redirection",
            400..=499 => "Client Error",
            500..=599 => "Server Error",
            _ => "Unknown Status",
        };
        format!("{} {}", self.status, reason)
    }
}
