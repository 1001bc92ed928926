//! Item-level operations: search, bulk contents, stream contents.

use crate::client::{decode_json, ReaderClient};
use crate::constants::{
    SEARCH_ITEMS_IDS_PATH, SOURCE, STREAM_CONTENTS_FEED_PREFIX, STREAM_CONTENTS_PREFIX,
    STREAM_ITEMS_CONTENTS_PATH,
};
use crate::signer::quote_plus;
use crate::types::{FeedId, ItemId, Tag};
use greader_core::time::unix_timestamp;
use greader_core::Result;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct SearchReply {
    results: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    id: String,
}

impl ReaderClient {
    /// Search for articles matching a text query.
    ///
    /// Returns short item ids in service order. The service also uses a
    /// long `tag:...` id form elsewhere; every operation consuming item
    /// ids accepts both.
    pub async fn search_for_articles(
        &self,
        query: &str,
        count: u32,
        scope: Option<&Tag>,
    ) -> Result<Vec<String>> {
        let mut args = form_urlencoded::Serializer::new(String::new());
        args.append_pair("q", query);
        args.append_pair("num", &count.to_string());
        args.append_pair("output", "json");
        args.append_pair("ck", &unix_timestamp().to_string());
        args.append_pair("client", SOURCE);
        if let Some(tag) = scope {
            args.append_pair("s", &self.tag_id(tag).await?);
        }
        let url = format!(
            "{}{}?{}",
            self.service_root,
            SEARCH_ITEMS_IDS_PATH,
            args.finish()
        );

        let body = self.call_text(&url).await?;
        let reply: SearchReply = serde_json::from_str(&body).map_err(|e| {
            greader_core::Error::operation_failed("search reply is not valid JSON")
                .with_body(body.clone())
                .with_source(e)
        })?;
        Ok(reply.results.into_iter().map(|hit| hit.id).collect())
    }

    /// Full contents of the given articles, as the decoded JSON document
    /// the service returned. The `items` list is usually the interesting
    /// part; no reshaping is done.
    pub async fn article_contents(&self, ids: &[ItemId]) -> Result<Value> {
        let url = format!(
            "{}{}?{}",
            self.service_root,
            STREAM_ITEMS_CONTENTS_PATH,
            cache_buster_query()
        );
        let token = self.action_token().await?;
        let mut params: Vec<(&str, &str)> = ids.iter().map(|id| ("i", id.as_str())).collect();
        params.push(("T", &token));

        let body = self.call_form_text(&url, &params).await?;
        decode_json(&body)
    }

    /// Articles carrying the given tag, as the service's JSON stream.
    pub async fn contents(&self, tag: &Tag, count: u32, older_first: bool) -> Result<Value> {
        let tag_id = self.tag_id(tag).await?;
        let url = format!(
            "{}{}{}?{}",
            self.service_root,
            STREAM_CONTENTS_PREFIX,
            quote_plus(&tag_id),
            stream_query(count, older_first)
        );
        let body = self.call_text(&url).await?;
        decode_json(&body)
    }

    /// Articles belonging to the given feed, as the service's JSON stream.
    pub async fn feed_contents(
        &self,
        feed: &FeedId,
        count: u32,
        older_first: bool,
    ) -> Result<Value> {
        let url = format!(
            "{}{}{}?{}",
            self.service_root,
            STREAM_CONTENTS_FEED_PREFIX,
            quote_plus(feed.url()),
            stream_query(count, older_first)
        );
        let body = self.call_text(&url).await?;
        decode_json(&body)
    }
}

/// `ck` + `client` query pair, the minimum the service expects.
pub(crate) fn cache_buster_query() -> String {
    let mut args = form_urlencoded::Serializer::new(String::new());
    args.append_pair("ck", &unix_timestamp().to_string());
    args.append_pair("client", SOURCE);
    args.finish()
}

fn stream_query(count: u32, older_first: bool) -> String {
    let mut args = form_urlencoded::Serializer::new(String::new());
    args.append_pair("ck", &unix_timestamp().to_string());
    args.append_pair("n", &count.to_string());
    args.append_pair("r", if older_first { "o" } else { "d" });
    args.append_pair("client", SOURCE);
    args.finish()
}
