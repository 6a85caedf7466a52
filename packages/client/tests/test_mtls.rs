mod support;

use std::path::PathBuf;
use std::time::Duration;

use httpsink_client::{
    CredentialError, KeyEncoding, RequestEntry, SinkClientConfig, SinkHttpClient,
};
use support::{Behavior, STORE_PASSWORD, TestPki, TestServer};

fn mtls_config(pki: &TestPki) -> SinkClientConfig {
    SinkClientConfig {
        server_trusted_cert: Some(pki.path("ca.crt")),
        request_timeout: Duration::from_secs(5),
        ..SinkClientConfig::default()
    }
}

async fn deliver_one(client: &SinkHttpClient, server: &TestServer) -> httpsink_client::BatchResult {
    client
        .dispatch(vec![RequestEntry::post(r#"{"event":"mtls"}"#)], &server.url())
        .await
        .expect("batch")
}

#[tokio::test]
async fn pem_client_key_authenticates() {
    let pki = TestPki::new();
    let server = TestServer::https(pki.mtls_server_config(), Behavior::default()).await;
    let client = SinkHttpClient::new(SinkClientConfig {
        client_cert: Some(pki.path("client.crt")),
        client_private_key: Some(pki.path("client.key")),
        ..mtls_config(&pki)
    })
    .expect("client");

    let result = deliver_one(&client, &server).await;
    assert_eq!(result.successful_requests().len(), 1, "{result:?}");
    assert!(client.transport().presents_client_certificate());
}

#[tokio::test]
async fn der_client_key_authenticates() {
    let pki = TestPki::new();
    let server = TestServer::https(pki.mtls_server_config(), Behavior::default()).await;
    let client = SinkHttpClient::new(SinkClientConfig {
        client_cert: Some(pki.path("client.crt")),
        client_private_key: Some(pki.path("client.der")),
        ..mtls_config(&pki)
    })
    .expect("client");

    let result = deliver_one(&client, &server).await;
    assert_eq!(result.successful_requests().len(), 1, "{result:?}");
}

#[tokio::test]
async fn declared_der_encoding_authenticates() {
    let pki = TestPki::new();
    let server = TestServer::https(pki.mtls_server_config(), Behavior::default()).await;
    let client = SinkHttpClient::new(SinkClientConfig {
        client_cert: Some(pki.path("client.crt")),
        client_private_key: Some(pki.path("client.der")),
        client_private_key_encoding: Some(KeyEncoding::Der),
        ..mtls_config(&pki)
    })
    .expect("client");

    let result = deliver_one(&client, &server).await;
    assert_eq!(result.successful_requests().len(), 1, "{result:?}");
}

#[tokio::test]
async fn key_store_authenticates() {
    let pki = TestPki::new();
    let server = TestServer::https(pki.mtls_server_config(), Behavior::default()).await;
    let client = SinkHttpClient::new(SinkClientConfig {
        key_store_path: Some(pki.path("client.p12")),
        key_store_password: Some(STORE_PASSWORD.into()),
        ..mtls_config(&pki)
    })
    .expect("client");

    assert_eq!(client.transport().identity_policy(), "key-store");
    let result = deliver_one(&client, &server).await;
    assert_eq!(result.successful_requests().len(), 1, "{result:?}");
}

#[tokio::test]
async fn missing_client_certificate_fails_the_entry() {
    let pki = TestPki::new();
    let server = TestServer::https(pki.mtls_server_config(), Behavior::default()).await;
    let client = SinkHttpClient::new(mtls_config(&pki)).expect("client");

    let result = tokio::time::timeout(Duration::from_secs(10), deliver_one(&client, &server))
        .await
        .expect("batch resolves without hanging");

    assert!(result.successful_requests().is_empty());
    assert_eq!(result.failed_requests().len(), 1);
    assert_eq!(server.hits(), 0);
}

#[test]
fn missing_client_key_file_fails_construction() {
    let pki = TestPki::new();
    let err = SinkHttpClient::new(SinkClientConfig {
        client_cert: Some(pki.path("client.crt")),
        client_private_key: Some(PathBuf::from("/nonexistent/clientPrivateKey.pem")),
        ..mtls_config(&pki)
    })
    .unwrap_err();

    assert!(err.is_credential());
    assert_eq!(err.option(), Some("client-private-key"));
    assert!(err.to_string().contains("clientPrivateKey.pem"));
}

#[test]
fn malformed_client_cert_fails_construction() {
    let pki = TestPki::new();
    let cert = pki.write("client-broken.crt", b"not a certificate at all");
    let err = SinkHttpClient::new(SinkClientConfig {
        client_cert: Some(cert),
        client_private_key: Some(pki.path("client.key")),
        ..mtls_config(&pki)
    })
    .unwrap_err();

    assert!(err.is_credential());
    assert_eq!(err.option(), Some("client-cert"));
    assert!(matches!(
        err.credential_error(),
        Some(CredentialError::NoCertificates { .. })
    ));
}

#[test]
fn key_that_does_not_match_certificate_fails_construction() {
    let pki = TestPki::new();
    let other = TestPki::new();
    let err = SinkHttpClient::new(SinkClientConfig {
        client_cert: Some(pki.path("client.crt")),
        client_private_key: Some(other.path("client.key")),
        ..mtls_config(&pki)
    })
    .unwrap_err();

    assert!(err.is_transport(), "{err:?}");
}

#[test]
fn wrong_key_store_password_fails_construction() {
    let pki = TestPki::new();
    let err = SinkHttpClient::new(SinkClientConfig {
        key_store_path: Some(pki.path("client.p12")),
        key_store_password: Some("not-the-password".into()),
        ..mtls_config(&pki)
    })
    .unwrap_err();

    assert!(err.is_credential());
    assert_eq!(err.option(), Some("key-store-path"));
}

#[test]
fn key_store_with_cert_and_key_fails_construction() {
    let pki = TestPki::new();
    let err = SinkHttpClient::new(SinkClientConfig {
        client_cert: Some(pki.path("client.crt")),
        client_private_key: Some(pki.path("client.key")),
        key_store_path: Some(pki.path("client.p12")),
        key_store_password: Some(STORE_PASSWORD.into()),
        ..mtls_config(&pki)
    })
    .unwrap_err();

    assert!(err.is_configuration());
}

#[test]
fn key_store_without_password_fails_construction() {
    let pki = TestPki::new();
    let err = SinkHttpClient::new(SinkClientConfig {
        key_store_path: Some(pki.path("client.p12")),
        ..mtls_config(&pki)
    })
    .unwrap_err();

    assert!(err.is_configuration());
    assert_eq!(err.option(), Some("key-store-password"));
}
