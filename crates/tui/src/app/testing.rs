use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use providers::algolia::SearchConfig;
use stories_core::store::MemoryStore;

use super::App;

/// Answers with a 500.
pub const FAILING_TERM: &str = "boom";
/// Answers with zero hits.
pub const EMPTY_TERM: &str = "nothing";
/// Answers with three hits on a single page.
pub const SHORT_TERM: &str = "few";

/// Hits per page for every other term; two pages are advertised.
pub const PAGE_LEN: usize = 20;

/// Local search endpoint on its own runtime. Stops when dropped.
pub struct StubServer {
    pub endpoint: String,
    _rt: tokio::runtime::Runtime,
}

impl StubServer {
    pub fn start() -> Self {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let listener = rt
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route("/api/v1/search", get(search));
        rt.spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Self {
            endpoint: format!("http://{addr}/api/v1/search"),
            _rt: rt,
        }
    }
}

async fn search(Query(q): Query<HashMap<String, String>>) -> Response {
    let query = q.get("query").cloned().unwrap_or_default();
    let page: u32 = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let (count, nb_pages) = match query.as_str() {
        FAILING_TERM => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        EMPTY_TERM => (0, 0),
        SHORT_TERM => (3, 1),
        _ => (PAGE_LEN, 2),
    };
    let hits: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "objectID": format!("{query}-{page}-{i}"),
                "title": format!("{query} story {page}-{i:02}"),
                "url": format!("https://news.example/{query}/{page}/{i}"),
                "author": "pg",
                "num_comments": i,
                "points": count - i
            })
        })
        .collect();
    Json(serde_json::json!({ "hits": hits, "page": page, "nbPages": nb_pages })).into_response()
}

pub fn app_at(endpoint: String, store: MemoryStore) -> App {
    let cfg = SearchConfig {
        endpoint,
        timeout: Duration::from_secs(5),
        ..SearchConfig::default()
    };
    App::new(cfg, Box::new(store)).unwrap()
}

/// App wired to a fresh stub server. Keep the server alive for the whole test.
pub fn app_with(store: MemoryStore) -> (StubServer, App) {
    let server = StubServer::start();
    let app = app_at(server.endpoint.clone(), store);
    (server, app)
}

/// Endpoint on a port nobody listens on.
pub fn refused_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v1/search")
}

impl App {
    /// Blocks until the latest issued fetch has been applied.
    pub fn settle(&mut self) {
        while self.pending.is_some() {
            match self.rx.recv_timeout(Duration::from_secs(10)) {
                Ok((ticket, result)) => self.deliver(ticket, result),
                Err(e) => panic!("fetch never finished: {e}"),
            }
        }
    }
}
