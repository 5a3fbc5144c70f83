//! 集成测试共用的假数据源和记录渠道

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bestbuy_tracker::{Catalog, NotificationChannel, NotificationMessage, Product, SendResult};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::Instant;

pub fn product(name: &str, online: bool) -> Product {
    Product {
        name: name.to_string(),
        online_availability: online,
        in_store_availability: false,
        orderable: online,
        url: format!("https://www.bestbuy.com/site/{}", name.to_lowercase().replace(' ', "-")),
    }
}

/// 记录所有消息的渠道
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<NotificationMessage>>,
    fail: bool,
}

impl RecordingChannel {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count_exiting(&self) -> usize {
        let exiting = NotificationMessage::exiting();
        self.sent().iter().filter(|m| **m == exiting).count()
    }

    pub fn count_alerts(&self) -> usize {
        self.sent().iter().filter(|m| m.subject == "ALERT").count()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, message: &NotificationMessage) -> Result<SendResult> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail {
            Err(anyhow!("connection refused"))
        } else {
            Ok(SendResult::Sent)
        }
    }
}

/// 假商品目录，按顺序返回预设结果，用完后重复最后一个
pub struct FakeCatalog {
    responses: Mutex<VecDeque<Result<Vec<Product>, String>>>,
    last: Mutex<Result<Vec<Product>, String>>,
    fetched_at: Mutex<Vec<Instant>>,
    panic_on_fetch: bool,
}

impl FakeCatalog {
    pub fn always(products: Vec<Product>) -> Self {
        Self::sequence(vec![Ok(products)])
    }

    pub fn failing(error: &str) -> Self {
        Self::sequence(vec![Err(error.to_string())])
    }

    pub fn sequence(responses: Vec<Result<Vec<Product>, String>>) -> Self {
        let last = responses
            .last()
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()));
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(last),
            fetched_at: Mutex::new(Vec::new()),
            panic_on_fetch: false,
        }
    }

    pub fn panicking() -> Self {
        Self {
            panic_on_fetch: true,
            ..Self::always(Vec::new())
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched_at.lock().unwrap().len()
    }

    /// 每次拉取相对 `start` 的秒数
    pub fn fetch_offsets(&self, start: Instant) -> Vec<u64> {
        self.fetched_at
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.duration_since(start).as_secs())
            .collect()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        self.fetched_at.lock().unwrap().push(Instant::now());
        if self.panic_on_fetch {
            panic!("catalog exploded");
        }

        let next = self.responses.lock().unwrap().pop_front();
        let response = match next {
            Some(response) => response,
            None => self.last.lock().unwrap().clone(),
        };
        response.map_err(|e| anyhow!(e))
    }
}

/// 避免系统代理拦截本地请求
fn bypass_proxy() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    std::env::set_var("no_proxy", "127.0.0.1,localhost");
}

/// 只处理一个请求的本地 HTTP 服务，返回 base URL 和收到的原始请求
pub async fn serve_once(status: &str, body: &str) -> (String, oneshot::Receiver<String>) {
    bypass_proxy();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 16 * 1024];
        let n = socket.read(&mut buf).await.unwrap();
        let _ = tx.send(String::from_utf8_lossy(&buf[..n]).into_owned());
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
    });

    (format!("http://{}/v1/products", addr), rx)
}

/// 一个没有监听的本地端口
pub async fn closed_port_url() -> String {
    bypass_proxy();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1/products", addr)
}
