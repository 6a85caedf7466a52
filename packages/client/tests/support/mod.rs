//! Test PKI and in-process HTTP(S) servers

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use p12_keystore::{Certificate, KeyStore, KeyStoreEntry, PrivateKeyChain};
use rcgen::{
    BasicConstraints, Certificate as IssuedCertificate, CertificateParams, DnType, ExtendedKeyUsagePurpose, IsCa,
    Issuer, KeyPair,
};
use rustls::RootCertStore;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::server::{ServerConfig, WebPkiClientVerifier};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

pub const STORE_PASSWORD: &str = "changeit";

/// A CA with one server and one client certificate, written to a temp dir.
pub struct TestPki {
    pub dir: tempfile::TempDir,
    pub ca: IssuedCertificate,
    pub server_cert: IssuedCertificate,
    pub server_key: KeyPair,
    pub client_cert: IssuedCertificate,
    pub client_key: KeyPair,
}

fn ca(name: &str) -> (IssuedCertificate, Issuer<'static, KeyPair>) {
    let key = KeyPair::generate().expect("ca key");
    let mut params = CertificateParams::new(Vec::<String>::new()).expect("ca params");
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.distinguished_name.push(DnType::CommonName, name);
    let cert = params.self_signed(&key).expect("ca cert");
    (cert, Issuer::new(params, key))
}

fn leaf(
    names: &[&str],
    common_name: &str,
    usage: ExtendedKeyUsagePurpose,
    issuer: &Issuer<'static, KeyPair>,
) -> (IssuedCertificate, KeyPair) {
    let key = KeyPair::generate().expect("leaf key");
    let mut params =
        CertificateParams::new(names.iter().map(|n| (*n).to_string()).collect::<Vec<_>>())
            .expect("leaf params");
    params.distinguished_name.push(DnType::CommonName, common_name);
    params.extended_key_usages = vec![usage];
    let cert = params.signed_by(&key, issuer).expect("leaf cert");
    (cert, key)
}

impl TestPki {
    /// Server certificate valid for `127.0.0.1` and `localhost`.
    pub fn new() -> Self {
        Self::with_server_names(&["127.0.0.1", "localhost"])
    }

    pub fn with_server_names(names: &[&str]) -> Self {
        let (ca, issuer) = ca("httpsink test CA");
        let (server_cert, server_key) =
            leaf(names, "server", ExtendedKeyUsagePurpose::ServerAuth, &issuer);
        let (client_cert, client_key) = leaf(
            &["client.httpsink.test"],
            "client",
            ExtendedKeyUsagePurpose::ClientAuth,
            &issuer,
        );

        let pki = Self {
            dir: tempfile::tempdir().expect("temp dir"),
            ca,
            server_cert,
            server_key,
            client_cert,
            client_key,
        };

        pki.write("ca.crt", pki.ca.pem().as_bytes());
        pki.write("server.crt", pki.server_cert.pem().as_bytes());
        pki.write("client.crt", pki.client_cert.pem().as_bytes());
        pki.write("client.key", pki.client_key.serialize_pem().as_bytes());
        pki.write("client.der", &pki.client_key.serialize_der());

        let (other_ca, _) = self::ca("unrelated CA");
        pki.write(
            "bundle.crt",
            format!("{}{}", other_ca.pem(), pki.ca.pem()).as_bytes(),
        );

        let ca_entry = Certificate::from_der(pki.ca.der()).expect("ca entry");
        let client_entry = Certificate::from_der(pki.client_cert.der()).expect("client entry");

        // Writers default to PBES2/AES-256 with an HMAC-SHA256 MAC.
        let mut key_store = KeyStore::new();
        key_store.add_entry(
            "client",
            KeyStoreEntry::PrivateKeyChain(PrivateKeyChain::new(
                pki.client_key.serialize_der(),
                b"client",
                [client_entry, ca_entry.clone()],
            )),
        );
        pki.write(
            "client.p12",
            &key_store.writer(STORE_PASSWORD).write().expect("key store"),
        );

        let mut trust_store = KeyStore::new();
        trust_store.add_entry("ca", KeyStoreEntry::Certificate(ca_entry));
        pki.write(
            "trust.p12",
            &trust_store.writer(STORE_PASSWORD).write().expect("trust store"),
        );

        pki
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("write test credential");
        path
    }

    fn server_chain(&self) -> (Vec<CertificateDer<'static>>, PrivateKeyDer<'static>) {
        (
            vec![self.server_cert.der().clone(), self.ca.der().clone()],
            PrivatePkcs8KeyDer::from(self.server_key.serialize_der()).into(),
        )
    }

    /// Server config presenting the CA-signed server certificate.
    pub fn server_config(&self) -> Arc<ServerConfig> {
        let (chain, key) = self.server_chain();
        let config = ServerConfig::builder_with_provider(provider())
            .with_safe_default_protocol_versions()
            .expect("protocol versions")
            .with_no_client_auth()
            .with_single_cert(chain, key)
            .expect("server config");
        Arc::new(config)
    }

    /// Server config that requires a client certificate issued by the CA.
    pub fn mtls_server_config(&self) -> Arc<ServerConfig> {
        let mut roots = RootCertStore::empty();
        roots.add(self.ca.der().clone()).expect("ca root");
        let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider())
            .build()
            .expect("client verifier");

        let (chain, key) = self.server_chain();
        let config = ServerConfig::builder_with_provider(provider())
            .with_safe_default_protocol_versions()
            .expect("protocol versions")
            .with_client_cert_verifier(verifier)
            .with_single_cert(chain, key)
            .expect("mtls server config");
        Arc::new(config)
    }
}

fn provider() -> Arc<rustls::crypto::CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}

/// Server config with a self-signed certificate for `127.0.0.1`.
pub fn self_signed_server_config() -> Arc<ServerConfig> {
    let key = KeyPair::generate().expect("key");
    let cert = CertificateParams::new(vec!["127.0.0.1".to_string(), "localhost".to_string()])
        .expect("params")
        .self_signed(&key)
        .expect("self signed");
    let config = ServerConfig::builder_with_provider(provider())
        .with_safe_default_protocol_versions()
        .expect("protocol versions")
        .with_no_client_auth()
        .with_single_cert(
            vec![cert.der().clone()],
            PrivatePkcs8KeyDer::from(key.serialize_der()).into(),
        )
        .expect("server config");
    Arc::new(config)
}

/// How the test server answers.
#[derive(Debug, Clone, Copy)]
pub struct Behavior {
    pub status: StatusCode,
    pub delay: Duration,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            delay: Duration::ZERO,
        }
    }
}

/// Requests being answered right now and the most seen at once.
#[derive(Debug, Default)]
struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Echo server: answers with the request body and copies `x-*` request
/// headers onto the response.
pub struct TestServer {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
    gauge: Arc<Gauge>,
    tls: bool,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn http(behavior: Behavior) -> Self {
        Self::spawn(None, behavior).await
    }

    pub async fn https(config: Arc<ServerConfig>, behavior: Behavior) -> Self {
        Self::spawn(Some(TlsAcceptor::from(config)), behavior).await
    }

    async fn spawn(acceptor: Option<TlsAcceptor>, behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let hits = Arc::new(AtomicUsize::new(0));
        let gauge = Arc::new(Gauge::default());
        let tls = acceptor.is_some();

        let counter = Arc::clone(&hits);
        let server_gauge = Arc::clone(&gauge);
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let acceptor = acceptor.clone();
                let counter = Arc::clone(&counter);
                let gauge = Arc::clone(&server_gauge);
                tokio::spawn(async move {
                    let service = service_fn(move |request: Request<Incoming>| {
                        let counter = Arc::clone(&counter);
                        let gauge = Arc::clone(&gauge);
                        async move {
                            gauge.enter();
                            let response = answer(request, behavior, &counter).await;
                            gauge.leave();
                            Ok::<_, Infallible>(response)
                        }
                    });
                    match acceptor {
                        Some(acceptor) => {
                            let Ok(tls) = acceptor.accept(stream).await else {
                                return;
                            };
                            let _ = http1::Builder::new()
                                .serve_connection(TokioIo::new(tls), service)
                                .await;
                        }
                        None => {
                            let _ = http1::Builder::new()
                                .serve_connection(TokioIo::new(stream), service)
                                .await;
                        }
                    }
                });
            }
        });

        Self {
            addr,
            hits,
            gauge,
            tls,
            task,
        }
    }

    pub fn url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{scheme}://{}/ingest", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Most requests the server was answering at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.gauge.peak.load(Ordering::SeqCst)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn answer(
    request: Request<Incoming>,
    behavior: Behavior,
    counter: &AtomicUsize,
) -> Response<Full<Bytes>> {
    counter.fetch_add(1, Ordering::SeqCst);
    let (parts, body) = request.into_parts();
    let body = body
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .unwrap_or_default();

    if !behavior.delay.is_zero() {
        tokio::time::sleep(behavior.delay).await;
    }

    let mut response = Response::new(Full::new(body));
    *response.status_mut() = behavior.status;
    for (name, value) in &parts.headers {
        if name.as_str().starts_with("x-") {
            response.headers_mut().insert(name.clone(), value.clone());
        }
    }
    response
        .headers_mut()
        .insert("x-method", parts.method.as_str().parse().expect("method header"));
    response
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr
}
