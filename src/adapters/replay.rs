use crate::domain::ports::Transport;
use crate::domain::wire::{Request, Response};
use crate::utils::error::{BridgeError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug)]
enum Source {
    File(PathBuf),
    Bytes(Vec<u8>),
}

/// 重播事先錄好的承運商回應；送出的請求會被記錄下來供檢查
#[derive(Debug)]
pub struct ReplayTransport {
    status: u16,
    headers: Vec<(String, String)>,
    source: Source,
    sent: Mutex<Vec<Request>>,
}

impl ReplayTransport {
    /// 每次 send 時才讀檔，錄製檔可在兩次呼叫之間替換
    pub fn from_file(path: impl Into<PathBuf>, status: u16) -> Self {
        Self::with_source(Source::File(path.into()), status)
    }

    pub fn from_bytes(body: impl Into<Vec<u8>>, status: u16) -> Self {
        Self::with_source(Source::Bytes(body.into()), status)
    }

    fn with_source(source: Source, status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            source,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn sent_requests(&self) -> Vec<Request> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Transport for ReplayTransport {
    async fn send(&self, request: &Request) -> Result<Response> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(request.clone());
        }

        let body = match &self.source {
            Source::Bytes(bytes) => bytes.clone(),
            Source::File(path) => tokio::fs::read(path).await.map_err(|e| BridgeError::TransportError {
                message: format!("Cannot read recorded response {}: {}", path.display(), e),
            })?,
        };
        tracing::debug!("🔁 Replaying {} bytes with status {}", body.len(), self.status);

        Ok(Response {
            status: self.status,
            headers: self.headers.clone(),
            body,
        })
    }
}
