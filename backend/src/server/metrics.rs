//! Prometheus request metrics that can be switched off at start-up.
//!
//! `App::wrap` needs one concrete middleware type whether or not metrics
//! were configured, so both arms box the wrapped service.

use std::sync::Arc;

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::PrometheusMetrics;
use futures_util::future::LocalBoxFuture;

type BoxedPageService = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;

/// Records request counts and latencies when built with a registry.
#[derive(Clone, Default)]
pub(crate) struct MetricsLayer {
    prometheus: Option<Arc<PrometheusMetrics>>,
}

impl MetricsLayer {
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        Self {
            prometheus: metrics.map(Arc::new),
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.prometheus.is_some()
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxedPageService;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let Some(prometheus) = self.prometheus.clone() else {
            let service = service.map(ServiceResponse::map_into_boxed_body);
            return Box::pin(async move { Ok(boxed::service(service)) });
        };
        let transform = Compat::new(PrometheusMetrics::clone(&prometheus)).new_transform(service);
        Box::pin(async move { Ok(boxed::service(transform.await?)) })
    }
}
