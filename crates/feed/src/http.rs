use crate::poll::spawn_poller;
use async_trait::async_trait;
use candela_core::feed::error::FeedError;
use candela_core::feed::port::{BatchStream, RecordSource};
use candela_core::market::entity::RawRecord;
use candela_series::batch::parse_batch;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// # Summary
/// HTTP JSON 数据源，GET 指定地址并期望返回原始记录数组。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯，单次请求 10 秒超时。
#[derive(Clone, Debug)]
pub struct HttpSource {
    // 内部使用的 HTTP 客户端
    client: Client,
    url: String,
}

impl HttpSource {
    /// # Summary
    /// 创建一个新的 HttpSource 实例。
    ///
    /// # Logic
    /// 1. 安装 ring 加密提供者（已安装则忽略）。
    /// 2. 配置 10 秒超时并初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `url`: 数据接口地址。
    ///
    /// # Returns
    /// 客户端构建失败时返回 Network 错误。
    pub fn new(url: impl Into<String>) -> Result<Self, FeedError> {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("crypto provider already installed");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| FeedError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    fn name(&self) -> &str {
        &self.url
    }

    /// # Summary
    /// 请求接口并解析记录。
    ///
    /// # Logic
    /// 1. 发起 GET 请求，非 2xx 状态视为网络错误，404 视为数据缺失。
    /// 2. 将响应体解析为 JSON。
    /// 3. 交给 `parse_batch` 逐条提取，损坏条目被跳过。
    async fn fetch(&self) -> Result<Vec<RawRecord>, FeedError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FeedError::NotFound);
        }
        if !resp.status().is_success() {
            return Err(FeedError::Network(format!("HTTP {}", resp.status())));
        }

        let payload: Value = resp
            .json()
            .await
            .map_err(|e| FeedError::Parse(e.to_string()))?;

        Ok(parse_batch(&payload).records)
    }

    async fn subscribe(&self, interval: Duration) -> Result<BatchStream, FeedError> {
        Ok(spawn_poller(self.clone(), interval))
    }
}
