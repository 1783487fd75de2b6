use crate::algolia::config::SearchConfig;
use anyhow::Context;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use stories_core::stories::{FetchError, StoryPage, StorySource};
use tracing::{debug, error, info};
use url::Url;

#[derive(Clone)]
pub struct AlgoliaClient {
    http: Client,
    endpoint: Url,
}

impl AlgoliaClient {
    pub fn new(cfg: SearchConfig) -> anyhow::Result<Self> {
        let endpoint = Url::parse(&cfg.endpoint)
            .with_context(|| format!("invalid search endpoint: {}", cfg.endpoint))?;
        let mut builder = Client::builder()
            .use_rustls_tls()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(2)
            .timeout(cfg.timeout);
        // Proxy env vars are already folded into the config.
        builder = match &cfg.proxy {
            Some(p) => builder.proxy(reqwest::Proxy::all(p)?),
            None => builder.no_proxy(),
        };
        let http = builder.build()?;
        Ok(Self { http, endpoint })
    }

    /// `<endpoint>?query=<term>&page=<n>`, keeping any fixed parameters of the endpoint.
    pub fn page_url(&self, term: &str, page: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("query", term)
            .append_pair("page", &page.to_string());
        url
    }
}

impl StorySource for AlgoliaClient {
    async fn fetch_page(&self, term: &str, page: u32) -> Result<StoryPage, FetchError> {
        let url = self.page_url(term, page);
        info!(target: "providers::algolia", "fetch query={} page={}", term, page);
        let resp = self.http.get(url).send().await.map_err(map_reqwest_err)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.ok();
            error!(target: "providers::algolia", "non-2xx status={} body={:?}", status, body);
            return Err(map_status_err(status));
        }
        let out: StoryPage = resp.json().await.map_err(map_reqwest_err)?;
        debug!(target: "providers::algolia", "decoded hits={} nb_pages={:?}", out.hits.len(), out.nb_pages);
        Ok(out)
    }
}

fn map_reqwest_err(e: reqwest::Error) -> FetchError {
    if e.is_decode() {
        FetchError::Decode(e.to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}

fn map_status_err(status: StatusCode) -> FetchError {
    FetchError::Server {
        status: status.as_u16(),
    }
}
