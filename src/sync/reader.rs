use async_trait::async_trait;
use reqwest::Client;

pub mod rss;

pub use self::rss::RssReader;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("failed to fetch feed: {msg}")]
    Network { msg: String },
    #[error("malformed feed: {msg}")]
    Malformed { msg: String },
}

/// One `<item>` as it appeared in the document. Text fields are already entity-decoded.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FetchedFeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub pub_date: String,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FetchedFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub items: Vec<FetchedFeedItem>,
}

#[async_trait]
pub trait ReadFeed: Send + Sync {
    async fn read(&self, url: &str) -> Result<FetchedFeed, FetchError>;
}

pub async fn read_url(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|error| FetchError::Network {
            msg: format!("{error}"),
        })?;

    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Network {
            msg: format!("{url} responded with {status}"),
        });
    }

    let body = response.bytes().await.map_err(|error| FetchError::Network {
        msg: format!("failed to read response body: {error}"),
    })?;

    Ok(body.to_vec())
}
