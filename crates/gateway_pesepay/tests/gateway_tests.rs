//! Gateway client tests against a mock PesePay server

use rust_decimal_macros::dec;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gateway_pesepay::{
    compute_signature, GatewayError, InitiatePaymentRequest, PesepayClient, PesepayConfig,
    TransactionStatus, WebhookPayload,
};

fn config_for(server: &MockServer) -> PesepayConfig {
    PesepayConfig {
        base_url: server.uri(),
        integration_key: "int_key_test".to_string(),
        webhook_secret: "whsec_test".to_string(),
        result_url: "https://connect.zifa.example/payments/webhook/pesepay".to_string(),
        return_url: "https://connect.zifa.example/payments/return".to_string(),
        timeout_secs: 5,
    }
}

fn initiate_request() -> InitiatePaymentRequest {
    InitiatePaymentRequest {
        amount: dec!(150.00),
        currency_code: "USD".to_string(),
        reason: "Transfer Fee - TRF-20260115-00001".to_string(),
        payment_reference: "PAY-20260115-AB12CD34".to_string(),
    }
}

#[tokio::test]
async fn test_initiate_payment_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments/initiate"))
        .and(header("Authorization", "int_key_test"))
        .and(body_partial_json(serde_json::json!({
            "amountDetails": { "currencyCode": "USD" },
            "reasonForPayment": "Transfer Fee - TRF-20260115-00001"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "referenceNumber": "PSP-0001",
            "redirectUrl": "https://pay.pesepay.com/checkout/PSP-0001",
            "pollUrl": "https://api.pesepay.com/poll/PSP-0001"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = PesepayClient::new(config_for(&server)).unwrap();
    let initiated = client.initiate_payment(initiate_request()).await.unwrap();

    assert_eq!(initiated.reference_number, "PSP-0001");
    assert_eq!(
        initiated.redirect_url,
        "https://pay.pesepay.com/checkout/PSP-0001"
    );
    assert!(initiated.poll_url.is_some());
}

#[tokio::test]
async fn test_initiate_payment_non_2xx_fails_closed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments/initiate"))
        .respond_with(
            ResponseTemplate::new(502).set_body_string("upstream unavailable"),
        )
        .mount(&server)
        .await;

    let client = PesepayClient::new(config_for(&server)).unwrap();
    let result = client.initiate_payment(initiate_request()).await;

    match result {
        Err(GatewayError::UnexpectedStatus { status, body }) => {
            assert_eq!(status, 502);
            assert!(body.contains("upstream unavailable"));
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_initiate_without_credentials_is_rejected() {
    let client = PesepayClient::new(PesepayConfig::default()).unwrap();
    let result = client.initiate_payment(initiate_request()).await;
    assert!(matches!(result, Err(GatewayError::NotConfigured)));
}

#[tokio::test]
async fn test_check_status_maps_gateway_strings() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/payments/check-payment"))
        .and(query_param("referenceNumber", "PSP-0002"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "transactionStatus": "SUCCESS"
        })))
        .mount(&server)
        .await;

    let client = PesepayClient::new(config_for(&server)).unwrap();
    let status = client.check_status("PSP-0002").await.unwrap();

    assert_eq!(status, TransactionStatus::Success);
}

#[tokio::test]
async fn test_check_status_unknown_string_is_preserved() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/payments/check-payment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "transactionStatus": "ON_HOLD"
        })))
        .mount(&server)
        .await;

    let client = PesepayClient::new(config_for(&server)).unwrap();
    let status = client.check_status("PSP-0003").await.unwrap();

    assert_eq!(status, TransactionStatus::Other("ON_HOLD".to_string()));
}

#[tokio::test]
async fn test_webhook_signature_round_trip() {
    let server = MockServer::start().await;
    let client = PesepayClient::new(config_for(&server)).unwrap();

    let body = serde_json::json!({
        "referenceNumber": "PSP-0004",
        "transactionStatus": "SUCCESS",
        "transactionId": "TXN-1"
    })
    .to_string();

    let signature = compute_signature(body.as_bytes(), "whsec_test");
    assert!(client.verify_webhook_signature(body.as_bytes(), &signature));

    // A signature from a different secret must not verify
    let forged = compute_signature(body.as_bytes(), "whsec_other");
    assert!(!client.verify_webhook_signature(body.as_bytes(), &forged));

    // And the verified body still parses into the payload type
    let payload: WebhookPayload = serde_json::from_str(&body).unwrap();
    assert_eq!(payload.status(), TransactionStatus::Success);
}
