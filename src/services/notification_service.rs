//! Fraud alert notifications.
//!
//! When a transaction is flagged, the card holder is alerted through:
//! - SMS carrying the single-use approval link (logged, no gateway is contacted)
//! - Email with the transaction details and no approval link (logged)
//! - Optionally, a signed webhook to an operator endpoint
//!
//! Delivery failures are logged and never affect the transaction.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use uuid::Uuid;

use crate::{
    config::Config,
    fraud::money::format_cents,
    models::{
        transaction::{Transaction, TransactionResponse},
        user::User,
    },
};

type HmacSha256 = Hmac<Sha256>;

/// Errors raised while delivering the alert webhook.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("invalid webhook URL: {0}")]
    InvalidUrl(String),

    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid signing key: {0}")]
    Key(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
struct AlertWebhook {
    url: String,
    secret: String,
}

/// Sends fraud alerts for flagged transactions.
#[derive(Debug, Clone)]
pub struct Notifier {
    public_base_url: String,
    webhook: Option<AlertWebhook>,
    http: reqwest::Client,
}

/// Webhook payload sent to the operator endpoint.
///
/// # Example
///
/// ```json
/// {
///   "event_type": "transaction.flagged",
///   "event_id": "550e8400-e29b-41d4-a716-446655440000",
///   "created_at": "2025-01-15T10:30:00Z",
///   "data": { "transaction": { "id": "...", "fraud_flags": ["..."], "status": "pending" } }
/// }
/// ```
///
/// The `X-Webhook-Signature` header carries `sha256=<hex(HMAC-SHA256(secret, body))>`.
#[derive(Debug, Serialize)]
pub struct FraudAlertPayload {
    pub event_type: &'static str,
    pub event_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub data: FraudAlertData,
}

#[derive(Debug, Serialize)]
pub struct FraudAlertData {
    pub transaction: TransactionResponse,
}

impl Notifier {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        let webhook = match (&config.alert_webhook_url, &config.alert_webhook_secret) {
            (Some(url), Some(secret)) => Some(AlertWebhook {
                url: url.clone(),
                secret: secret.clone(),
            }),
            (Some(_), None) => {
                tracing::warn!("ALERT_WEBHOOK_URL is set without ALERT_WEBHOOK_SECRET, webhook disabled");
                None
            }
            _ => None,
        };

        Self {
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
            webhook,
            http,
        }
    }

    /// Link the card holder follows to approve a flagged transaction.
    pub fn approval_link(&self, token: &str) -> String {
        format!("{}/approve/{}", self.public_base_url, token)
    }

    /// Send the alert in the background so the submitting request is not delayed.
    pub fn dispatch(&self, user: User, transaction: Transaction, approval_token: String) {
        let notifier = self.clone();
        tokio::spawn(async move {
            notifier
                .send_fraud_alert(&user, &transaction, &approval_token)
                .await;
        });
    }

    /// Send SMS and email alerts, then the webhook when configured.
    pub async fn send_fraud_alert(&self, user: &User, transaction: &Transaction, approval_token: &str) {
        let sms = render_sms(transaction, &self.approval_link(approval_token));
        tracing::info!(phone = %user.phone, transaction_id = %transaction.id, "[SMS alert]\n{}", sms);

        let email = render_email(user, transaction);
        tracing::info!(email = %user.email, transaction_id = %transaction.id, "[Email alert]\n{}", email);

        if let Some(webhook) = &self.webhook {
            if let Err(e) = self.send_webhook(webhook, transaction).await {
                tracing::error!(url = %webhook.url, error = %e, "Failed to deliver fraud alert webhook");
            }
        }
    }

    async fn send_webhook(
        &self,
        webhook: &AlertWebhook,
        transaction: &Transaction,
    ) -> Result<(), AlertError> {
        let event_id = Uuid::new_v4();
        let payload = FraudAlertPayload {
            event_type: "transaction.flagged",
            event_id,
            created_at: Utc::now(),
            data: FraudAlertData {
                transaction: transaction.clone().into(),
            },
        };
        let body = serde_json::to_string(&payload)?;
        let signature = generate_signature(&webhook.secret, &body)?;

        let response = self
            .http
            .post(&webhook.url)
            .header("Content-Type", "application/json")
            .header("X-Webhook-Signature", &signature)
            .header("X-Webhook-Event-Id", event_id.to_string())
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        tracing::info!(
            url = %webhook.url,
            status = response.status().as_u16(),
            %event_id,
            "Fraud alert webhook delivered"
        );
        Ok(())
    }
}

/// SMS text with the approval link.
pub fn render_sms(transaction: &Transaction, approval_link: &str) -> String {
    format!(
        "FraudGuard Alert!\nAmount: {}\nLocation: {}\nApprove: {}",
        format_cents(transaction.amount_cents),
        transaction.location.as_deref().unwrap_or("Unknown"),
        approval_link
    )
}

/// Email body with transaction details. Approval happens only through the SMS link.
pub fn render_email(user: &User, transaction: &Transaction) -> String {
    format!(
        "Dear {},\n\n\
         We detected a suspicious transaction on your account.\n\n\
         Transaction Details:\n\
         - Amount: {}\n\
         - Location: {}\n\
         - Time: {}\n\
         - Device ID: {}\n\n\
         This transaction has been flagged for your security.\n\
         Please check your phone for an SMS containing the approval link.\n\n\
         If you did not initiate this transaction, please contact our support team immediately.\n\n\
         FraudGuard Security Team",
        user.username,
        format_cents(transaction.amount_cents),
        transaction.location.as_deref().unwrap_or("Unknown"),
        transaction.created_at.format("%Y-%m-%d %H:%M:%S"),
        transaction.device_id.as_deref().unwrap_or("Unknown"),
    )
}

/// HMAC-SHA256 signature in `sha256=<hex>` form.
pub fn generate_signature(secret: &str, payload: &str) -> Result<String, AlertError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AlertError::Key(e.to_string()))?;
    mac.update(payload.as_bytes());
    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

/// Validate the alert webhook URL at startup.
///
/// # Rules
///
/// - Must be valid URL
/// - Must be HTTPS (HTTP localhost allowed for development)
/// - Maximum 2048 characters
pub fn validate_webhook_url(url: &str) -> Result<(), AlertError> {
    if url.len() > 2048 {
        return Err(AlertError::InvalidUrl(
            "URL exceeds 2048 characters".to_string(),
        ));
    }

    let parsed = url::Url::parse(url)
        .map_err(|_| AlertError::InvalidUrl("Invalid URL format".to_string()))?;

    match parsed.scheme() {
        "https" => Ok(()),
        "http" => match parsed.host_str() {
            Some("localhost") | Some("127.0.0.1") | Some("0.0.0.0") => Ok(()),
            _ => Err(AlertError::InvalidUrl(
                "HTTP is only allowed for localhost. Use HTTPS for production.".to_string(),
            )),
        },
        _ => Err(AlertError::InvalidUrl(
            "URL must use HTTP or HTTPS".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, header_exists, method, path},
    };

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            userid: "user1".to_string(),
            email: "alice@example.com".to_string(),
            phone: "+15550001".to_string(),
            created_at: Utc::now(),
        }
    }

    fn transaction() -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            userid: "user1".to_string(),
            amount_cents: 1_500_000,
            device_id: Some("device1".to_string()),
            location: Some("Los Angeles".to_string()),
            created_at: Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap(),
            is_fraudulent: true,
            fraud_flags: None,
            model_confidence: None,
            status: "pending".to_string(),
            approval_token_hash: None,
            reviewed_by: None,
            reviewed_at: None,
        }
    }

    fn config(base_url: &str) -> Config {
        envy::from_iter(vec![
            ("DATABASE_URL".to_string(), "postgres://localhost/fraud".to_string()),
            ("PUBLIC_BASE_URL".to_string(), base_url.to_string()),
        ])
        .unwrap()
    }

    #[test]
    fn approval_link_strips_trailing_slash() {
        let notifier = Notifier::new(&config("https://fraud.example.com/"), reqwest::Client::new());
        assert_eq!(
            notifier.approval_link("abc"),
            "https://fraud.example.com/approve/abc"
        );
    }

    #[test]
    fn sms_carries_amount_location_and_link() {
        let sms = render_sms(&transaction(), "https://fraud.example.com/approve/abc");
        assert!(sms.contains("Amount: $15,000.00"));
        assert!(sms.contains("Location: Los Angeles"));
        assert!(sms.ends_with("Approve: https://fraud.example.com/approve/abc"));
    }

    #[test]
    fn email_has_details_but_no_link() {
        let email = render_email(&user(), &transaction());
        assert!(email.starts_with("Dear alice,"));
        assert!(email.contains("- Time: 2025-01-15 10:30:00"));
        assert!(email.contains("- Device ID: device1"));
        assert!(!email.contains("/approve/"));
    }

    #[test]
    fn signature_matches_known_hmac() {
        // RFC 4231 test case 2
        let signature = generate_signature("Jefe", "what do ya want for nothing?").unwrap();
        assert_eq!(
            signature,
            "sha256=5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    fn webhook_config(url: &str) -> Config {
        envy::from_iter(vec![
            ("DATABASE_URL".to_string(), "postgres://localhost/fraud".to_string()),
            ("ALERT_WEBHOOK_URL".to_string(), url.to_string()),
            ("ALERT_WEBHOOK_SECRET".to_string(), "whsec_test".to_string()),
        ])
        .unwrap()
    }

    #[test]
    fn webhook_requires_secret() {
        let config: Config = envy::from_iter(vec![
            ("DATABASE_URL".to_string(), "postgres://localhost/fraud".to_string()),
            ("ALERT_WEBHOOK_URL".to_string(), "https://ops.example.com/hooks".to_string()),
        ])
        .unwrap();

        assert!(Notifier::new(&config, reqwest::Client::new()).webhook.is_none());
    }

    #[tokio::test]
    async fn webhook_body_is_signed_with_shared_secret() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hooks"))
            .and(header("Content-Type", "application/json"))
            .and(header_exists("X-Webhook-Signature"))
            .and(header_exists("X-Webhook-Event-Id"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = Notifier::new(
            &webhook_config(&format!("{}/hooks", server.uri())),
            reqwest::Client::new(),
        );
        let webhook = notifier.webhook.clone().unwrap();
        let transaction = transaction();

        notifier.send_webhook(&webhook, &transaction).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = std::str::from_utf8(&requests[0].body).unwrap();
        let signature = requests[0].headers["X-Webhook-Signature"].to_str().unwrap();
        assert_eq!(signature, generate_signature("whsec_test", body).unwrap());

        let payload: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(payload["event_type"], "transaction.flagged");
        assert_eq!(payload["data"]["transaction"]["id"], transaction.id.to_string());
        assert_eq!(
            payload["event_id"],
            requests[0].headers["X-Webhook-Event-Id"].to_str().unwrap()
        );
    }

    #[tokio::test]
    async fn webhook_error_status_is_a_failed_delivery() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = Notifier::new(
            &webhook_config(&format!("{}/hooks", server.uri())),
            reqwest::Client::new(),
        );
        let webhook = notifier.webhook.clone().unwrap();

        let result = notifier.send_webhook(&webhook, &transaction()).await;

        assert!(matches!(result, Err(AlertError::Http(e)) if e.status() == Some(reqwest::StatusCode::SERVICE_UNAVAILABLE)));
    }

    #[test]
    fn webhook_url_rules() {
        assert!(validate_webhook_url("https://ops.example.com/hooks").is_ok());
        assert!(validate_webhook_url("http://localhost:8080/hooks").is_ok());
        assert!(validate_webhook_url("http://ops.example.com/hooks").is_err());
        assert!(validate_webhook_url("ftp://ops.example.com").is_err());
        assert!(validate_webhook_url("not a url").is_err());
    }
}
