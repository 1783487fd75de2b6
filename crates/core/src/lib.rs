pub mod stories {
    use serde::{Deserialize, Deserializer, Serialize};
    use thiserror::Error;

    /// One search hit as returned by the story API.
    #[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
    pub struct Story {
        #[serde(rename = "objectID", default, deserialize_with = "null_default")]
        pub object_id: String,
        #[serde(default, deserialize_with = "null_default")]
        pub title: String,
        #[serde(default)]
        pub url: Option<String>,
        #[serde(default, deserialize_with = "null_default")]
        pub author: String,
        #[serde(default, deserialize_with = "null_default")]
        pub num_comments: u32,
        #[serde(default, deserialize_with = "null_default")]
        pub points: u32,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
    pub struct StoryPage {
        #[serde(default)]
        pub hits: Vec<Story>,
        #[serde(default)]
        pub page: u32,
        #[serde(rename = "nbPages", default)]
        pub nb_pages: Option<u32>,
    }

    // The API sends explicit nulls for missing titles, authors and counts.
    fn null_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
    }

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum FetchError {
        #[error("server error: status {status}")] Server { status: u16 },
        #[error("network: {0}")] Network(String),
        #[error("decode: {0}")] Decode(String),
    }

    #[allow(async_fn_in_trait)]
    pub trait StorySource: Send + Sync {
        async fn fetch_page(&self, term: &str, page: u32) -> Result<StoryPage, FetchError>;
    }
}

pub mod controller;
pub mod history;
pub mod sort;
pub mod store;
