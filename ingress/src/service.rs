use crate::alert::{AlertKind, AlertReport, format_message};
use crate::errors::IngressError;
use crate::metrics_defs::{ALERTS_RECEIVED, ALERTS_REJECTED, DELIVERY_FAILURES};
use crate::psk::keys_match;
use http_body_util::{BodyExt, Full, combinators::BoxBody};
use hyper::body::{Bytes, Incoming};
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use notifier::Notify;
use serde::Serialize;
use shared::counter;
use shared::http::make_error_response;
use std::future::Future;
use std::net::IpAddr;
use std::pin::Pin;
use std::sync::Arc;

pub type HandlerBody = BoxBody<Bytes, IngressError>;

#[derive(Serialize)]
struct StatusBody<'a> {
    status: &'a str,
}

/// Routes the two ingress endpoints and owns the per-request alert flow.
pub struct AlertRouter {
    preshared_key: Option<String>,
    notifier: Arc<dyn Notify>,
}

impl AlertRouter {
    pub fn new(preshared_key: Option<String>, notifier: Arc<dyn Notify>) -> Self {
        Self {
            preshared_key,
            notifier,
        }
    }

    /// Routes an incoming request to the matching endpoint
    pub async fn route<B>(
        &self,
        req: Request<B>,
        client_ip: IpAddr,
    ) -> Result<Response<HandlerBody>, IngressError>
    where
        B: hyper::body::Body + Send + 'static,
        B::Data: Send,
        B::Error: std::error::Error,
    {
        match (req.method(), req.uri().path()) {
            (&Method::GET, "/status") => {
                json_response(StatusCode::OK, &StatusBody { status: "healthy" })
            }
            (&Method::POST, "/alert") => self.handle_alert(req, client_ip).await,
            _ => {
                tracing::warn!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    "No route matched"
                );
                Ok(make_error_response(StatusCode::NOT_FOUND))
            }
        }
    }

    async fn handle_alert<B>(
        &self,
        req: Request<B>,
        client_ip: IpAddr,
    ) -> Result<Response<HandlerBody>, IngressError>
    where
        B: hyper::body::Body + Send + 'static,
        B::Data: Send,
        B::Error: std::error::Error,
    {
        let bytes = req
            .into_body()
            .collect()
            .await
            .map_err(|e| IngressError::RequestBodyError(e.to_string()))?
            .to_bytes();

        let report: AlertReport = match serde_json::from_slice(&bytes) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(client_ip = %client_ip, error = %e, "Rejected malformed alert body");
                return Ok(make_error_response(StatusCode::BAD_REQUEST));
            }
        };

        tracing::info!(
            client_ip = %client_ip,
            alert_type = ?report.alert_type,
            "Received an alert"
        );

        if let Some(expected) = self.preshared_key.as_deref()
            && !keys_match(expected, &report.psk)
        {
            tracing::warn!(client_ip = %client_ip, "Alert did not include the correct pre-shared key");
            counter!(ALERTS_REJECTED).increment(1);
            return json_response(
                StatusCode::BAD_REQUEST,
                &StatusBody {
                    status: "Incorrect PSK",
                },
            );
        }

        if report.alert_type == AlertKind::Unknown {
            tracing::error!(client_ip = %client_ip, "Invalid alert type");
        }

        counter!(ALERTS_RECEIVED).increment(1);

        let message = format_message(&report, client_ip);
        tracing::info!(alert = %message, "Forwarding alert");

        match self.notifier.notify(&message).await {
            Ok(()) => json_response(
                StatusCode::OK,
                &StatusBody {
                    status: "alert success",
                },
            ),
            Err(e) => {
                tracing::error!(error = %e, "Could not deliver alert");
                counter!(DELIVERY_FAILURES).increment(1);
                json_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &StatusBody {
                        status: "Couldn't send slack alert",
                    },
                )
            }
        }
    }
}

fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<Response<HandlerBody>, IngressError> {
    let bytes = serde_json::to_vec(body).map(Bytes::from)?;

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .body(Full::new(bytes).map_err(|e| match e {}).boxed())
        .map_err(|e| IngressError::ResponseBuildError(e.to_string()))
}

/// Hyper service for one connection. Holds shared router state plus the
/// connection's peer IP so messages can carry the request's source address.
#[derive(Clone)]
pub struct IngressService {
    router: Arc<AlertRouter>,
    peer_ip: IpAddr,
}

impl IngressService {
    pub fn new(router: Arc<AlertRouter>, peer_ip: IpAddr) -> Self {
        Self { router, peer_ip }
    }
}

impl Service<Request<Incoming>> for IngressService {
    type Response = Response<HandlerBody>;
    type Error = IngressError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let router = self.router.clone();
        let client_ip = self.peer_ip;
        Box::pin(async move { router.route(req, client_ip).await })
    }
}
