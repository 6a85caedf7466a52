//! Concurrent batch dispatch
//!
//! Each batch gets one coordinator task. The coordinator issues a request
//! task per entry, at most `max_concurrent_requests` at a time across the
//! whole client, and is the only owner of the batch's [`BatchResult`].
//! Request tasks report back over a channel.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Request, Uri};
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tokio::sync::{Semaphore, mpsc, oneshot};
use tracing::Instrument;

use super::batch::BatchResult;
use super::handle::BatchHandle;
use super::outcome::{RequestFailure, RequestOutcome};
use super::pool::WorkerPool;
use crate::client::{ClientStats, RequestCallback};
use crate::http::{RequestEntry, ResponseSummary};
use crate::tls::TransportConfig;

type HttpsClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Limits and static headers applied to every request.
#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_concurrent_requests: usize,
    pub headers: HeaderMap,
}

/// Issues batches of requests over one shared transport.
pub struct RequestDispatcher {
    shared: Arc<Shared>,
    pool: WorkerPool,
}

struct Shared {
    client: HttpsClient,
    settings: DispatchSettings,
    limiter: Arc<Semaphore>,
    callback: Arc<dyn RequestCallback>,
    stats: Arc<ClientStats>,
}

impl fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("settings", &self.shared.settings)
            .field("available_permits", &self.shared.limiter.available_permits())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl RequestDispatcher {
    pub(crate) fn new(
        transport: &TransportConfig,
        settings: DispatchSettings,
        callback: Arc<dyn RequestCallback>,
        stats: Arc<ClientStats>,
        pool: WorkerPool,
    ) -> Self {
        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_nodelay(true);
        http.set_connect_timeout(Some(settings.connect_timeout));

        let connector = HttpsConnectorBuilder::new()
            .with_tls_config((*transport.tls()).clone())
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);

        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .build(connector);

        let limiter = Arc::new(Semaphore::new(settings.max_concurrent_requests));

        Self {
            shared: Arc::new(Shared {
                client,
                settings,
                limiter,
                callback,
                stats,
            }),
            pool,
        }
    }

    /// Send every entry to `endpoint` and collect the outcomes.
    ///
    /// Returns immediately. The handle resolves once each entry has either
    /// been answered by the server or failed. An endpoint that is not an
    /// absolute `http` or `https` URL fails every entry without sending.
    pub fn dispatch(&self, entries: Vec<RequestEntry>, endpoint: &str) -> BatchHandle {
        let (result_tx, result_rx) = oneshot::channel();
        let span = tracing::debug_span!("batch", endpoint = %endpoint, size = entries.len());
        self.pool.spawn(
            coordinate(Arc::clone(&self.shared), entries, endpoint.to_owned(), result_tx)
                .instrument(span),
        );
        BatchHandle::new(result_rx)
    }

    pub(crate) fn settings(&self) -> &DispatchSettings {
        &self.shared.settings
    }
}

async fn coordinate(
    shared: Arc<Shared>,
    entries: Vec<RequestEntry>,
    endpoint: String,
    mut result_tx: oneshot::Sender<BatchResult>,
) {
    let total = entries.len();
    shared.stats.record_batch();
    let mut result = BatchResult::with_capacity(total);
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<RequestOutcome>();

    match parse_endpoint(&endpoint) {
        Err(failure) => {
            tracing::warn!("Failing batch of {} without sending: {}", total, failure);
            for entry in entries {
                shared.record(&endpoint, &mut result, RequestOutcome::failure(entry, failure.clone()));
            }
        }
        Ok(uri) => {
            for (issued, entry) in entries.into_iter().enumerate() {
                let permit = tokio::select! {
                    biased;
                    () = result_tx.closed() => {
                        tracing::debug!("Batch cancelled after issuing {} of {} requests", issued, total);
                        return;
                    }
                    permit = Arc::clone(&shared.limiter).acquire_owned() => permit,
                };
                // The semaphore is never closed
                let Ok(permit) = permit else {
                    return;
                };

                let worker = Arc::clone(&shared);
                let uri = uri.clone();
                let outcome_tx = outcome_tx.clone();
                tokio::spawn(
                    async move {
                        let outcome = worker.execute(entry, uri).await;
                        drop(permit);
                        if outcome_tx.send(outcome).is_err() {
                            tracing::trace!("Batch coordinator gone, dropping outcome");
                        }
                    }
                    .in_current_span(),
                );
            }
        }
    }
    drop(outcome_tx);

    loop {
        let outcome = tokio::select! {
            biased;
            () = result_tx.closed() => {
                tracing::debug!(
                    "Batch cancelled with {} request(s) still in flight",
                    total - result.len()
                );
                return;
            }
            outcome = outcome_rx.recv() => outcome,
        };
        let Some(outcome) = outcome else {
            break;
        };
        shared.record(&endpoint, &mut result, outcome);
    }

    shared.stats.record_batch_completed();
    tracing::debug!(
        successful = result.successful_requests().len(),
        failed = result.failed_requests().len(),
        "Batch complete"
    );
    if result_tx.send(result).is_err() {
        tracing::debug!("Batch handle dropped before the result was delivered");
    }
}

impl Shared {
    fn record(&self, endpoint: &str, result: &mut BatchResult, outcome: RequestOutcome) {
        self.callback.on_complete(endpoint, &outcome);
        match outcome.result() {
            Ok(response) => self
                .stats
                .record_success(outcome.entry().body().len(), response.body().len()),
            Err(_) => self.stats.record_failure(),
        }
        result.record(outcome);
    }

    async fn execute(&self, entry: RequestEntry, uri: Uri) -> RequestOutcome {
        let method = match entry.http_method() {
            Ok(method) => method,
            Err(e) => {
                let failure =
                    RequestFailure::InvalidRequest(format!("method '{}': {e}", entry.method()));
                return RequestOutcome::failure(entry, failure);
            }
        };

        let mut request = match Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(entry.body().clone()))
        {
            Ok(request) => request,
            Err(e) => return RequestOutcome::failure(entry, RequestFailure::InvalidRequest(e.to_string())),
        };
        request.headers_mut().extend(self.settings.headers.clone());

        let DispatchSettings {
            connect_timeout,
            request_timeout,
            ..
        } = self.settings;

        let exchange = async {
            let response = self.client.request(request).await.map_err(|e| {
                if e.is_connect() {
                    RequestFailure::classify(&e, true, connect_timeout)
                } else {
                    RequestFailure::classify(&e, false, request_timeout)
                }
            })?;
            let (parts, body) = response.into_parts();
            let body = body
                .collect()
                .await
                .map_err(|e| RequestFailure::classify(&e, false, request_timeout))?
                .to_bytes();
            Ok::<_, RequestFailure>(ResponseSummary::new(parts.status, parts.headers, body))
        };

        match tokio::time::timeout(request_timeout, exchange).await {
            Ok(Ok(response)) => {
                tracing::trace!(status = response.status().as_u16(), "Response received");
                RequestOutcome::success(entry, response)
            }
            Ok(Err(failure)) => RequestOutcome::failure(entry, failure),
            Err(_) => RequestOutcome::failure(entry, RequestFailure::Timeout(request_timeout)),
        }
    }
}

/// Accept only absolute `http`/`https` URLs with a host.
fn parse_endpoint(endpoint: &str) -> Result<Uri, RequestFailure> {
    let invalid = |reason: String| RequestFailure::InvalidRequest(format!("endpoint '{endpoint}': {reason}"));

    let url = url::Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{other}'"))),
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    url.as_str()
        .parse::<Uri>()
        .map_err(|e| invalid(e.to_string()))
}
