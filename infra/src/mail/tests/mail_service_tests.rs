//! Unit tests for mail service selection and the mock provider

use gm_core::services::mail::{MailMessage, MailServiceTrait};
use gm_shared::MailConfig;

use crate::mail::{create_mail_service, MockMailService, ResendMailService};
use crate::InfrastructureError;

fn message(to: &str) -> MailMessage {
    MailMessage {
        to: to.to_string(),
        subject: "Your sign-in code".to_string(),
        html: "<p>123456</p>".to_string(),
        text: "123456".to_string(),
    }
}

#[tokio::test]
async fn test_mock_records_messages() {
    let service = MockMailService::new();

    let id = service.send_mail(&message("ana@example.com")).await.unwrap();
    service.send_mail(&message("bo@example.com")).await.unwrap();

    assert!(id.starts_with("mock_"));
    assert_eq!(service.sent().len(), 2);
    assert_eq!(service.count_to("ana@example.com"), 1);
    assert_eq!(service.last_to("bo@example.com").unwrap().text, "123456");
}

#[tokio::test]
async fn test_mock_simulated_failure() {
    let service = MockMailService::new();
    service.set_simulate_failure(true);

    assert!(service.send_mail(&message("ana@example.com")).await.is_err());
    assert!(service.sent().is_empty());
}

#[test]
fn test_create_mock_service() {
    assert!(create_mail_service(&MailConfig::default()).is_ok());
}

#[test]
fn test_resend_requires_api_key() {
    let config = MailConfig {
        provider: "resend".to_string(),
        ..MailConfig::default()
    };

    assert!(matches!(
        ResendMailService::new(config),
        Err(InfrastructureError::Config(_))
    ));
}

#[test]
fn test_unknown_provider_rejected() {
    let config = MailConfig {
        provider: "carrier-pigeon".to_string(),
        ..MailConfig::default()
    };

    assert!(matches!(
        create_mail_service(&config),
        Err(InfrastructureError::Config(_))
    ));
}

#[tokio::test]
async fn test_resend_unreachable_api_fails() {
    let config = MailConfig {
        provider: "resend".to_string(),
        api_key: Some("re_test".to_string()),
        api_base_url: "http://127.0.0.1:9".to_string(),
        max_retries: 0,
        request_timeout_secs: 2,
        ..MailConfig::default()
    };
    let service = ResendMailService::new(config).unwrap();

    assert!(service.send_mail(&message("ana@example.com")).await.is_err());
}
