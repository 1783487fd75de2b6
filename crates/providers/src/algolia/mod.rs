pub mod client;
pub mod config;

pub use client::AlgoliaClient;
pub use config::SearchConfig;
