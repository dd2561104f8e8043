//! Mock HTTP server for integration tests.
//!
//! Serves a calendar page and quote pages, and records webhook posts:
//! - `GET /calendar`: the configured calendar HTML
//! - `GET /quote/usdjpy`: a page carrying the USD/JPY price element
//! - `GET /quote/us10y`: always 503
//! - `POST /{file}`: webhook; the form is recorded

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Form, Path};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use parking_lot::Mutex;
use tokio::net::TcpListener;

/// One recorded webhook post.
#[derive(Debug, Clone)]
pub struct WebhookPost {
    /// Last path segment, e.g. `SCTKEY.send`.
    pub file: String,
    pub form: HashMap<String, String>,
}

/// A mock HTTP server for testing.
pub struct MockHttpServer {
    addr: SocketAddr,
    posts: Arc<Mutex<Vec<WebhookPost>>>,
}

impl MockHttpServer {
    /// Start a server on an available port serving `calendar_html`.
    pub async fn start(calendar_html: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let posts: Arc<Mutex<Vec<WebhookPost>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = posts.clone();
        let router = Router::new()
            .route("/calendar", get(move || async move { calendar_html }))
            .route(
                "/quote/usdjpy",
                get(|| async { r#"<html><body><div data-test="instrument-price-last">157.32</div></body></html>"# }),
            )
            .route(
                "/quote/us10y",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
            )
            .route(
                "/{file}",
                post(
                    move |Path(file): Path<String>, Form(form): Form<HashMap<String, String>>| {
                        let sink = sink.clone();
                        async move {
                            sink.lock().push(WebhookPost { file, form });
                            r#"{"code":0,"message":""}"#
                        }
                    },
                ),
            );

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { addr, posts }
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Webhook URL template pointing at this server.
    pub fn webhook_template(&self) -> String {
        self.url("/{key}.send")
    }

    /// Webhook posts received so far.
    pub fn posts(&self) -> Vec<WebhookPost> {
        self.posts.lock().clone()
    }
}
