use crate::http_client;
use crate::sync::reader;
use crate::sync::reader::{FetchError, FetchedFeed, FetchedFeedItem, ReadFeed};
use async_trait::async_trait;
use htmlescape::decode_html;
use reqwest::Client;
use rss::{Channel, Item};
use std::time::Duration;

pub struct RssReader {
    client: Client,
}

impl RssReader {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = http_client::build_client(timeout).map_err(|error| FetchError::Network {
            msg: format!("failed to build http client: {error}"),
        })?;

        Ok(Self { client })
    }

    pub fn read_from_bytes(data: &[u8]) -> Result<FetchedFeed, FetchError> {
        match Channel::read_from(data) {
            Ok(channel) => Ok(FetchedFeed::from(channel)),
            Err(err) => Err(FetchError::Malformed {
                msg: format!("{err}"),
            }),
        }
    }
}

#[async_trait]
impl ReadFeed for RssReader {
    async fn read(&self, url: &str) -> Result<FetchedFeed, FetchError> {
        let body = reader::read_url(&self.client, url).await?;

        Self::read_from_bytes(&body)
    }
}

impl From<Channel> for FetchedFeed {
    fn from(channel: Channel) -> Self {
        let items = channel.items().iter().map(FetchedFeedItem::from).collect();

        FetchedFeed {
            title: decode(channel.title()),
            link: channel.link().trim().to_string(),
            description: decode(channel.description()),
            items,
        }
    }
}

impl From<&Item> for FetchedFeedItem {
    fn from(item: &Item) -> Self {
        FetchedFeedItem {
            title: decode(item.title().unwrap_or_default()),
            link: item.link().unwrap_or_default().trim().to_string(),
            description: decode(item.description().unwrap_or_default()),
            pub_date: item.pub_date().unwrap_or_default().to_string(),
        }
    }
}

// The XML parser has already resolved XML escapes; feeds commonly escape HTML
// on top of that, so one more pass runs here and never more than one.
fn decode(text: &str) -> String {
    match decode_html(text) {
        Ok(decoded) => decoded,
        Err(_) => text.to_string(),
    }
}
