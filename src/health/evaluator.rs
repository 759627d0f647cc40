//! 健康检测执行器
//!
//! 一次调用 = 一次 GET + 一次短信。所有失败只记录日志，不向调用方传播。

use crate::config::{CheckTarget, NotificationTarget};
use crate::error::error_chain;
use crate::health::checker::{classify_status, HealthChecker, ProbeResponse};
use crate::health::result::{CheckOutcome, DeliveryStatus, EvaluationReport};
use crate::notification::template::{render_or_default, DefaultTemplate, MessageTemplate};
use crate::notification::NotificationSender;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// 健康检测执行器
pub struct HealthCheckEvaluator {
    /// 检测目标
    target: CheckTarget,
    /// 通知目标
    notification: NotificationTarget,
    /// HTTP检测器
    checker: Arc<dyn HealthChecker>,
    /// 短信发送器
    sender: Arc<dyn NotificationSender>,
    /// 短信模板
    template: Arc<dyn MessageTemplate>,
}

impl HealthCheckEvaluator {
    /// 创建新的执行器，使用内置短信文案
    ///
    /// # 参数
    /// * `target` - 检测目标
    /// * `notification` - 通知目标
    /// * `checker` - HTTP检测器
    /// * `sender` - 短信发送器
    pub fn new(
        target: CheckTarget,
        notification: NotificationTarget,
        checker: Arc<dyn HealthChecker>,
        sender: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            target,
            notification,
            checker,
            sender,
            template: Arc::new(DefaultTemplate),
        }
    }

    /// 替换短信模板
    pub fn with_template(mut self, template: Arc<dyn MessageTemplate>) -> Self {
        self.template = template;
        self
    }

    /// 检测目标
    pub fn target(&self) -> &CheckTarget {
        &self.target
    }

    /// 执行一次检测并发送一条短信
    ///
    /// 总会返回报告；传输失败、状态码不符、短信发送失败都只体现在报告和日志里
    pub async fn run(&self) -> EvaluationReport {
        let id = Uuid::new_v4();
        let span = info_span!("health_check", invocation_id = %id, url = %self.target.url);
        self.run_inner(id).instrument(span).await
    }

    async fn run_inner(&self, id: Uuid) -> EvaluationReport {
        let timestamp = Utc::now();
        info!("开始健康检测: {}", self.target.url);

        let start = Instant::now();
        let probe = self.checker.probe(&self.target).await;
        let response_time = start.elapsed();

        let (outcome, response) = match probe {
            Ok(response) => {
                let status_code = response.status_code();
                info!(
                    "收到HTTP响应: {} {}",
                    status_code,
                    response.canonical_reason()
                );
                (classify_status(&self.target, status_code), Some(response))
            }
            Err(e) => {
                let error = error_chain(&e);
                warn!("HTTP请求失败: {}", error);
                (CheckOutcome::TransportFailure { error }, None)
            }
        };

        let message = render_or_default(self.template.as_ref(), &outcome, &self.target);
        info!(outcome = outcome.label(), "检测结果: {}", outcome);

        let delivery = self.notify(&message).await;

        // 仅在检测成功且短信已发出时读取响应体
        let body_length = match (outcome.is_healthy(), response) {
            (true, Some(response)) if delivery.is_delivered() => log_body(response).await,
            (true, Some(_)) => {
                debug!("短信发送失败，跳过响应体读取");
                None
            }
            _ => None,
        };

        EvaluationReport {
            id,
            timestamp,
            url: self.target.url.clone(),
            expected_status: self.target.expected_status,
            response_time,
            outcome,
            message,
            delivery,
            body_length,
        }
    }

    /// 发送短信，错误只记录不返回
    async fn notify(&self, message: &str) -> DeliveryStatus {
        info!(
            "发送短信: sender={} to={}",
            self.sender.name(),
            self.notification.phone_number
        );

        match self.sender.send_message(message, &self.notification).await {
            Ok(receipt) => {
                info!("短信发送成功: message_id={:?}", receipt.message_id);
                DeliveryStatus::Delivered {
                    message_id: receipt.message_id,
                }
            }
            Err(e) => {
                match e.provider_code() {
                    Some(code) => error!("短信服务商返回错误: code={} {}", code, e),
                    None => error!("短信发送失败: {}", e),
                }
                DeliveryStatus::Failed {
                    code: e.provider_code().map(str::to_string),
                    error: e.to_string(),
                }
            }
        }
    }
}

/// 读取并记录响应体，失败只记录日志
async fn log_body(response: ProbeResponse) -> Option<usize> {
    match response.read_body().await {
        Ok(body) => {
            info!("HTTP响应体: {}", body);
            Some(body.len())
        }
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemplateConfig;
    use crate::error::NotificationError;
    use crate::health::HttpHealthChecker;
    use crate::notification::{DeliveryReceipt, HandlebarsTemplate};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 记录所有发送请求的假发送器
    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<(String, String)>>,
        fail_with: Option<fn() -> NotificationError>,
    }

    impl RecordingSender {
        fn failing(f: fn() -> NotificationError) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_with: Some(f),
            }
        }

        fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationSender for RecordingSender {
        async fn send_message(
            &self,
            message: &str,
            target: &NotificationTarget,
        ) -> Result<DeliveryReceipt, NotificationError> {
            self.sent
                .lock()
                .unwrap()
                .push((message.to_string(), target.phone_number.clone()));
            match self.fail_with {
                Some(f) => Err(f()),
                None => Ok(DeliveryReceipt {
                    message_id: Some("msg-1".to_string()),
                }),
            }
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn evaluator(target: CheckTarget, sender: Arc<RecordingSender>) -> HealthCheckEvaluator {
        HealthCheckEvaluator::new(
            target,
            NotificationTarget::new("+15555550100"),
            Arc::new(HttpHealthChecker::new().unwrap()),
            sender,
        )
    }

    #[tokio::test]
    async fn test_unexpected_status_notifies_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(503)
            .create_async()
            .await;

        let url = format!("{}/", server.url());
        let sender = Arc::new(RecordingSender::default());
        let report = evaluator(CheckTarget::new(&url, None), sender.clone())
            .run()
            .await;

        assert_eq!(
            report.outcome,
            CheckOutcome::UnexpectedStatus {
                status_code: 503,
                url: url.clone()
            }
        );
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].0.contains("503"));
        assert!(sent[0].0.contains(&url));
        assert_eq!(sent[0].1, "+15555550100");
        assert_eq!(report.body_length, None);
        assert!(report.delivery.is_delivered());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_success_reads_body_after_notify() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_body("all good")
            .create_async()
            .await;

        let url = format!("{}/health", server.url());
        let sender = Arc::new(RecordingSender::default());
        let report = evaluator(CheckTarget::new(&url, None), sender.clone())
            .run()
            .await;

        assert!(report.outcome.is_healthy());
        assert_eq!(
            report.message,
            format!("Health check successfully completed for {}", url)
        );
        assert_eq!(sender.sent().len(), 1);
        assert_eq!(report.body_length, Some("all good".len()));
        assert_eq!(
            report.delivery,
            DeliveryStatus::Delivered {
                message_id: Some("msg-1".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_custom_expected_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(201)
            .create_async()
            .await;

        let url = format!("{}/", server.url());
        let sender = Arc::new(RecordingSender::default());
        let report = evaluator(CheckTarget::new(&url, Some("201")), sender.clone())
            .run()
            .await;

        assert!(report.outcome.is_healthy());
        assert_eq!(report.expected_status, 201);
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_message_is_error_text() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sender = Arc::new(RecordingSender::default());
        let report = evaluator(
            CheckTarget::new(format!("http://{}/", addr), None),
            sender.clone(),
        )
        .run()
        .await;

        let error = match &report.outcome {
            CheckOutcome::TransportFailure { error } => error.clone(),
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert!(!error.is_empty());
        // 底层原因随错误文本一起发出
        assert!(error.to_lowercase().contains("refused"), "{error}");
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, error);
        assert_eq!(report.message, error);
    }

    #[tokio::test]
    async fn test_provider_error_does_not_fail_run() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .create_async()
            .await;

        let sender = Arc::new(RecordingSender::failing(|| NotificationError::Provider {
            code: "InvalidParameter".to_string(),
            message: "Invalid parameter: PhoneNumber".to_string(),
        }));
        let report = evaluator(
            CheckTarget::new(format!("{}/", server.url()), None),
            sender.clone(),
        )
        .run()
        .await;

        assert!(report.outcome.is_healthy());
        assert_eq!(sender.sent().len(), 1);
        match report.delivery {
            DeliveryStatus::Failed { code, .. } => {
                assert_eq!(code.as_deref(), Some("InvalidParameter"))
            }
            other => panic!("unexpected delivery: {other:?}"),
        }
        // 发送失败后不再读取响应体
        assert_eq!(report.body_length, None);
    }

    #[tokio::test]
    async fn test_out_of_range_expected_status_never_matches() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .create_async()
            .await;

        let url = format!("{}/", server.url());
        let sender = Arc::new(RecordingSender::default());
        let report = evaluator(CheckTarget::new(&url, Some("70000")), sender.clone())
            .run()
            .await;

        assert_eq!(report.expected_status, 70000);
        assert_eq!(
            report.outcome,
            CheckOutcome::UnexpectedStatus {
                status_code: 200,
                url: url.clone()
            }
        );
        assert_eq!(
            sender.sent()[0].0,
            format!("Incorrect status code received from {}: 200", url)
        );
    }

    #[tokio::test]
    async fn test_truncated_body_keeps_success() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // 声明 100 字节但只写 5 字节后断开
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nhello")
                .await
                .unwrap();
            socket.flush().await.unwrap();
        });

        let url = format!("http://{}/", addr);
        let sender = Arc::new(RecordingSender::default());
        let report = evaluator(CheckTarget::new(&url, None), sender.clone())
            .run()
            .await;
        server.await.unwrap();

        assert_eq!(report.outcome, CheckOutcome::Success { url: url.clone() });
        assert_eq!(report.body_length, None);
        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].0,
            format!("Health check successfully completed for {}", url)
        );
        assert!(report.delivery.is_delivered());
    }

    #[tokio::test]
    async fn test_custom_template_is_used() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(500)
            .create_async()
            .await;

        let template = HandlebarsTemplate::new(&TemplateConfig {
            unexpected_status: Some("ALERT {{status_code}}".to_string()),
            ..Default::default()
        })
        .unwrap();

        let sender = Arc::new(RecordingSender::default());
        let report = evaluator(
            CheckTarget::new(format!("{}/", server.url()), None),
            sender.clone(),
        )
        .with_template(Arc::new(template))
        .run()
        .await;

        assert_eq!(report.message, "ALERT 500");
        assert_eq!(sender.sent()[0].0, "ALERT 500");
    }
}
