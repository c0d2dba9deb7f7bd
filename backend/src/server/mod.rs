//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use quill::Trace;
use quill::inbound::http::health::{HealthState, live, ready};
use quill::inbound::http::routes::{configure, not_found};
use quill::inbound::http::session::SESSION_COOKIE_NAME;
use quill::inbound::http::state::HttpState;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .configure(configure)
        .default_service(web::to(not_found))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing session, binding, storage and optional metrics settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when opening the media root, binding the
/// socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        #[cfg(feature = "metrics")]
        prometheus,
        ..
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);
    #[cfg(feature = "metrics")]
    tracing::info!(enabled = metrics_layer.is_enabled(), "request metrics");

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Tests for server bootstrap and app wiring.

    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::{fixture, rstest};
    use std::net::SocketAddr;

    #[fixture]
    fn health_state() -> web::Data<HealthState> {
        web::Data::new(HealthState::new())
    }

    #[fixture]
    fn media_root() -> tempfile::TempDir {
        tempfile::tempdir().expect("temporary media root")
    }

    fn config(media_root: &tempfile::TempDir) -> ServerConfig {
        ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            SocketAddr::from(([127, 0, 0, 1], 0)),
        )
        .with_media_root(media_root.path().to_path_buf())
    }

    #[rstest]
    #[actix_web::test]
    async fn create_server_marks_ready(
        health_state: web::Data<HealthState>,
        media_root: tempfile::TempDir,
    ) {
        let config = config(&media_root);
        assert_eq!(config.bind_addr().port(), 0);
        assert!(!health_state.is_ready(), "state should start unready");

        let _server = create_server(health_state.clone(), config).expect("server should bind");
        assert!(health_state.is_ready(), "state should be ready after bind");
    }

    #[rstest]
    #[actix_web::test]
    async fn app_serves_pages_probes_and_not_found(
        health_state: web::Data<HealthState>,
        media_root: tempfile::TempDir,
    ) {
        let config = config(&media_root);
        let http_state = web::Data::new(build_http_state(&config).expect("http state"));
        let app = test::init_service(build_app(AppDependencies {
            health_state: health_state.clone(),
            http_state,
            key: config.key.clone(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }))
        .await;

        let index = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(index.status(), StatusCode::OK);
        assert!(index.headers().contains_key("trace-id"));

        let probe = test::call_service(
            &app,
            test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;
        assert_eq!(probe.status(), StatusCode::OK);

        let missing = test::call_service(
            &app,
            test::TestRequest::get().uri("/nowhere/").to_request(),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
