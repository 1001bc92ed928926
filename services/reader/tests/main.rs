mod mock;

use greader::{
    Context, ErrorKind, FeedId, Format, ItemId, ListFormat, ReaderClient, StreamOptions, Tag,
};
use http::StatusCode;
use mock::MockHttpSend;
use pretty_assertions::assert_eq;
use std::time::Duration;

const LOGIN_REPLY: &str = "SID=abc\nLSID=def\nAuth=XYZ123\n";

const TAG_LIST_REPLY: &str = r#"{"tags":[
    {"id": "user/-/state/com.google/starred", "sortid": "A1"},
    {"id": "user/04686467480557924617/label/News", "sortid": "A2"},
    {"id": "user/04686467480557924617/label/Life: Politics", "sortid": "A3"}
]}"#;

const FEED_REPLY: &str = r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:gr="http://www.google.com/schemas/reader/atom/">
  <id>tag:google.com,2005:reader/feed/http://x.com/rss</id>
  <title>Example feed</title>
  <gr:continuation>CArF-rvhypsC</gr:continuation>
  <entry>
    <id>tag:google.com,2005:reader/item/5d0cfa30041d4348</id>
    <title>First article</title>
  </entry>
  <entry>
    <id>tag:google.com,2005:reader/item/1234567890abcdef</id>
    <title>Second article</title>
  </entry>
</feed>"#;

fn init() -> (MockHttpSend, Context) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mock = MockHttpSend::new();
    let ctx = Context::new().with_http_send(mock.clone());
    (mock, ctx)
}

async fn logged_in(mock: &MockHttpSend, ctx: Context) -> ReaderClient {
    mock.push_ok(LOGIN_REPLY);
    ReaderClient::login(ctx, "joe@example.com", "secret")
        .await
        .expect("login must succeed")
}

#[tokio::test]
async fn test_login_extracts_credential_and_signs_calls() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    let login = &mock.requests_to("/accounts/ClientLogin")[0];
    assert_eq!(login.method, "POST");
    assert_eq!(login.user_agent.as_deref(), Some("mekk.reader_client"));
    assert!(login.body.contains("Email=joe%40example.com"));
    assert!(login.body.contains("service=reader"));
    assert!(login.authorization.is_none());

    mock.push_ok(TAG_LIST_REPLY);
    client.tag_list(ListFormat::Parsed).await.unwrap();

    let call = &mock.requests_to("/reader/api/0/tag/list")[0];
    assert_eq!(call.method, "GET");
    assert_eq!(call.authorization.as_deref(), Some("GoogleLogin auth=XYZ123"));
    assert_eq!(call.user_agent.as_deref(), Some("mekk.reader_client"));
    assert!(call.uri.contains("output=json"));
}

#[tokio::test]
async fn test_login_rejection_is_authentication_error() {
    let (mock, ctx) = init();
    mock.push(StatusCode::FORBIDDEN, "Error=BadAuthentication");
    let err = ReaderClient::login(ctx, "joe@example.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
}

#[tokio::test]
async fn test_login_server_error_is_transport_error() {
    let (mock, ctx) = init();
    mock.push(StatusCode::INTERNAL_SERVER_ERROR, "boom");
    let err = ReaderClient::login(ctx, "joe@example.com", "secret")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFailed);
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.body(), Some("boom"));
}

#[tokio::test]
async fn test_login_reply_without_auth_field_fails() {
    let (mock, ctx) = init();
    mock.push_ok("SID=abc\nLSID=def\n");
    let err = ReaderClient::login(ctx, "joe@example.com", "secret")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
}

#[tokio::test]
async fn test_tag_name_resolves_against_account_id() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok(TAG_LIST_REPLY);
    let id = client.tag_id(&Tag::new("Life: Politics")).await.unwrap();
    assert_eq!(id, "user/04686467480557924617/label/Life: Politics");

    // second resolution is served from the cached account id
    let id = client.tag_id(&Tag::new("News")).await.unwrap();
    assert_eq!(id, "user/04686467480557924617/label/News");
    assert_eq!(mock.requests_to("/reader/api/0/tag/list").len(), 1);
}

#[tokio::test]
async fn test_qualified_tag_id_passes_through_without_any_call() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    let id = client
        .tag_id(&Tag::new("user/12345/label/Whatever"))
        .await
        .unwrap();
    assert_eq!(id, "user/12345/label/Whatever");
    assert_eq!(mock.requests_to("/reader/api/0/tag/list").len(), 0);
}

#[tokio::test]
async fn test_account_id_missing_from_tag_list_fails_loudly() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok(r#"{"tags":[{"id":"user/-/state/com.google/starred"}]}"#);
    let err = client.account_id().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationFailed);
}

#[tokio::test]
async fn test_action_token_fetched_once_inside_validity_window() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok("LONGTOKEN123");
    mock.push_ok("OK");
    mock.push_ok("OK");
    client
        .subscribe_feed(&FeedId::new("http://x.com/rss"), None)
        .await
        .unwrap();
    client
        .unsubscribe_feed(&FeedId::new("http://y.com/rss"))
        .await
        .unwrap();

    assert_eq!(mock.requests_to("/reader/api/0/token").len(), 1);
    let edits = mock.requests_to("/reader/api/0/subscription/edit");
    assert_eq!(edits.len(), 2);
    assert!(edits[0].body.contains("T=LONGTOKEN123"));
    assert!(edits[1].body.contains("T=LONGTOKEN123"));
}

#[tokio::test]
async fn test_concurrent_edits_share_one_token_refresh() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    // Token slot is empty; only the first caller may hit the token
    // endpoint, the other must wait for it and reuse the result.
    mock.push_ok("LONGTOKEN123");
    mock.push_ok("OK");
    mock.push_ok("OK");
    let feed_x = FeedId::new("http://x.com/rss");
    let feed_y = FeedId::new("http://y.com/rss");
    let (first, second) = tokio::join!(
        client.subscribe_feed(&feed_x, None),
        client.unsubscribe_feed(&feed_y),
    );
    first.unwrap();
    second.unwrap();

    assert_eq!(mock.requests_to("/reader/api/0/token").len(), 1);
    let edits = mock.requests_to("/reader/api/0/subscription/edit");
    assert_eq!(edits.len(), 2);
    assert!(edits.iter().all(|edit| edit.body.contains("T=LONGTOKEN123")));
}

#[tokio::test]
async fn test_action_token_refetched_after_expiry() {
    let (mock, ctx) = init();
    mock.push_ok(LOGIN_REPLY);
    let client = ReaderClient::builder()
        .with_token_validity(Duration::from_millis(20))
        .login(ctx, "joe@example.com", "secret")
        .await
        .unwrap();

    mock.push_ok("TOKEN-ONE-0001");
    mock.push_ok("OK");
    client
        .subscribe_feed(&FeedId::new("http://x.com/rss"), None)
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(40)).await;

    mock.push_ok("TOKEN-TWO-0002");
    mock.push_ok("OK");
    client
        .unsubscribe_feed(&FeedId::new("http://x.com/rss"))
        .await
        .unwrap();

    assert_eq!(mock.requests_to("/reader/api/0/token").len(), 2);
    let edits = mock.requests_to("/reader/api/0/subscription/edit");
    assert!(edits[0].body.contains("T=TOKEN-ONE-0001"));
    assert!(edits[1].body.contains("T=TOKEN-TWO-0002"));
}

#[tokio::test]
async fn test_subscribe_sends_canonical_feed_id_and_title() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok("LONGTOKEN123");
    mock.push_ok("OK");
    client
        .subscribe_feed(&FeedId::new("http://x.com/rss"), Some("My feed"))
        .await
        .unwrap();

    let edit = &mock.requests_to("/reader/api/0/subscription/edit")[0];
    assert_eq!(edit.method, "POST");
    assert!(edit.uri.contains("client=mekk.reader_client"));
    assert!(edit.body.contains("ac=subscribe"));
    assert!(edit.body.contains("s=feed%2Fhttp%3A%2F%2Fx.com%2Frss"));
    assert!(edit.body.contains("t=My+feed"));
}

#[tokio::test]
async fn test_edit_rejections_are_operation_failures() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok("LONGTOKEN123");
    mock.push_ok("something went wrong");
    let err = client
        .rename_feed(&FeedId::new("http://x.com/rss"), "New title")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationFailed);
    assert_eq!(err.body(), Some("something went wrong"));

    // exact "OK" goes through
    mock.push_ok("OK");
    client
        .rename_feed(&FeedId::new("http://x.com/rss"), "New title")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_feed_tagging_resolves_tags_in_params() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok("LONGTOKEN123");
    mock.push_ok(TAG_LIST_REPLY);
    mock.push_ok("OK");
    client
        .add_feed_tag(&FeedId::new("http://x.com/rss"), "My feed", &Tag::new("News"))
        .await
        .unwrap();

    let edit = &mock.requests_to("/reader/api/0/subscription/edit")[0];
    assert!(edit.body.contains("ac=edit"));
    assert!(edit
        .body
        .contains("a=user%2F04686467480557924617%2Flabel%2FNews"));

    mock.push_ok("OK");
    client
        .remove_feed_tag(
            &FeedId::new("feed/http://x.com/rss"),
            "My feed",
            &Tag::new("user/04686467480557924617/label/News"),
        )
        .await
        .unwrap();
    let edit = &mock.requests_to("/reader/api/0/subscription/edit")[1];
    assert!(edit
        .body
        .contains("r=user%2F04686467480557924617%2Flabel%2FNews"));
}

#[tokio::test]
async fn test_disable_tag_sends_disable_action() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok(TAG_LIST_REPLY);
    mock.push_ok("LONGTOKEN123");
    mock.push_ok("OK");
    client.disable_tag(&Tag::new("News")).await.unwrap();

    let call = &mock.requests_to("/reader/api/0/disable-tag")[0];
    assert!(call.body.contains("ac=disable-tags"));
    assert!(call
        .body
        .contains("s=user%2F04686467480557924617%2Flabel%2FNews"));
}

#[tokio::test]
async fn test_search_preserves_service_order() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok(r#"{"results":[{"id":"111"},{"id":"-222"}]}"#);
    let ids = client
        .search_for_articles("rust", 1000, None)
        .await
        .unwrap();
    assert_eq!(ids, vec!["111".to_string(), "-222".to_string()]);

    let call = &mock.requests_to("/reader/api/0/search/items/ids")[0];
    assert!(call.uri.contains("q=rust"));
    assert!(call.uri.contains("num=1000"));
    assert!(call.uri.contains("output=json"));
    assert!(call.uri.contains("client=mekk.reader_client"));
}

#[tokio::test]
async fn test_search_scoped_by_tag() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok(TAG_LIST_REPLY);
    mock.push_ok(r#"{"results":[]}"#);
    let ids = client
        .search_for_articles("rust", 50, Some(&Tag::new("News")))
        .await
        .unwrap();
    assert!(ids.is_empty());

    let call = &mock.requests_to("/reader/api/0/search/items/ids")[0];
    assert!(call.uri.contains("s=user%2F04686467480557924617%2Flabel%2FNews"));
}

#[tokio::test]
async fn test_article_contents_accepts_both_id_forms() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok("LONGTOKEN123");
    mock.push_ok(r#"{"items":[{"id":"111"},{"id":"tag:google.com,2005:reader/item/5d0cfa30041d4348"}]}"#);
    let doc = client
        .article_contents(&[
            ItemId::new("111"),
            ItemId::new("tag:google.com,2005:reader/item/5d0cfa30041d4348"),
        ])
        .await
        .unwrap();

    // decoded verbatim, no reshaping
    assert_eq!(doc["items"][0]["id"], "111");

    let call = &mock.requests_to("/reader/api/0/stream/items/contents")[0];
    assert_eq!(call.method, "POST");
    assert!(call.body.contains("i=111"));
    assert!(call
        .body
        .contains("i=tag%3Agoogle.com%2C2005%3Areader%2Fitem%2F5d0cfa30041d4348"));
    assert!(call.body.contains("T=LONGTOKEN123"));
}

#[tokio::test]
async fn test_feed_item_id_cached_across_both_feed_spellings() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok(FEED_REPLY);
    let first = client
        .feed_item_id(&FeedId::new("feed/http://x.com/rss"))
        .await
        .unwrap();
    assert_eq!(first, "tag:google.com,2005:reader/item/5d0cfa30041d4348");

    // the bare spelling maps to the same cache entry, no second fetch
    let second = client
        .feed_item_id(&FeedId::new("http://x.com/rss"))
        .await
        .unwrap();
    assert_eq!(first, second);

    let fetches = mock.requests_to("/reader/atom/feed/");
    assert_eq!(fetches.len(), 1);
    assert!(fetches[0].uri.contains("http%3A%2F%2Fx.com%2Frss"));
    assert!(fetches[0].uri.contains("n=2"));
}

#[tokio::test]
async fn test_stream_options_drive_query_params() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok(FEED_REPLY);
    client
        .reading_list_atom(
            &StreamOptions::new()
                .with_count(10)
                .with_older_first(true)
                .with_continue_from("CArF-rvhypsC"),
        )
        .await
        .unwrap();

    let call = &mock.requests_to("/reader/atom/user/-/state/com.google/reading-list")[0];
    assert!(call.uri.contains("n=10"));
    assert!(call.uri.contains("r=o"));
    assert!(call.uri.contains("c=CArF-rvhypsC"));
}

#[tokio::test]
async fn test_atom_formats_decode_the_same_reply() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok(FEED_REPLY);
    let raw = client
        .starred_atom(&StreamOptions::new().with_format(Format::Raw))
        .await
        .unwrap();
    assert_eq!(raw.as_raw(), Some(FEED_REPLY));

    mock.push_ok(FEED_REPLY);
    let parsed = client.fresh_atom(&StreamOptions::new()).await.unwrap();
    assert_eq!(parsed.as_feed().unwrap().entries.len(), 2);

    mock.push_ok(FEED_REPLY);
    let tree = client
        .broadcast_atom(&StreamOptions::new().with_format(Format::Tree))
        .await
        .unwrap();
    assert!(tree.as_tree().unwrap().get("entry").is_some());
}

#[tokio::test]
async fn test_unparseable_atom_reply_carries_raw_body() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok("<feed>half a reply");
    let err = client
        .read_atom(&StreamOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationFailed);
    assert_eq!(err.body(), Some("<feed>half a reply"));
}

#[tokio::test]
async fn test_list_ops_support_raw_xml_output() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok("<object><list name=\"subscriptions\"/></object>");
    let reply = client.subscription_list(ListFormat::Xml).await.unwrap();
    assert_eq!(
        reply.as_raw(),
        Some("<object><list name=\"subscriptions\"/></object>")
    );
    let call = &mock.requests_to("/reader/api/0/subscription/list")[0];
    assert!(call.uri.contains("output=xml"));

    mock.push_ok(r#"{"max":1000}"#);
    let reply = client.unread_count(ListFormat::Parsed).await.unwrap();
    assert_eq!(reply.as_value().unwrap()["max"], 1000);
}

#[tokio::test]
async fn test_typed_subscription_list() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok(
        r#"{"subscriptions":[{"id":"feed/http://x.com/rss","title":"Example feed","categories":[]}]}"#,
    );
    let subs = client.subscriptions().await.unwrap();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].id, "feed/http://x.com/rss");
    assert_eq!(subs[0].title.as_deref(), Some("Example feed"));
}

#[tokio::test]
async fn test_quickadd_returns_reply_document() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok("LONGTOKEN123");
    mock.push_ok(r#"{"numResults":1,"query":"http://sport.pl","streamId":"feed/http://rss.gazeta.pl/pub/rss/sport.xml"}"#);
    let reply = client.subscribe_quickadd("http://sport.pl").await.unwrap();
    assert_eq!(reply["numResults"], 1);
    assert_eq!(
        reply["streamId"],
        "feed/http://rss.gazeta.pl/pub/rss/sport.xml"
    );

    let call = &mock.requests_to("/reader/api/0/subscription/quickadd")[0];
    assert!(call.body.contains("quickadd=http%3A%2F%2Fsport.pl"));
    assert!(call.body.contains("T=LONGTOKEN123"));
}

#[tokio::test]
async fn test_contents_by_tag_and_feed() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push_ok(TAG_LIST_REPLY);
    mock.push_ok(r#"{"items":[{"id":"111"}]}"#);
    let doc = client.contents(&Tag::new("News"), 20, false).await.unwrap();
    assert_eq!(doc["items"][0]["id"], "111");
    let call = &mock.requests_to("/reader/api/0/stream/contents/user")[0];
    assert!(call.uri.contains("n=20"));
    assert!(call.uri.contains("r=d"));

    mock.push_ok(r#"{"items":[]}"#);
    client
        .feed_contents(&FeedId::new("http://x.com/rss"), 5, true)
        .await
        .unwrap();
    let call = &mock.requests_to("/reader/api/0/stream/contents/feed/")[0];
    assert!(call.uri.contains("r=o"));
    assert!(call.uri.contains("n=5"));
}

#[tokio::test]
async fn test_non_success_status_surfaces_as_transport_error() {
    let (mock, ctx) = init();
    let client = logged_in(&mock, ctx).await;

    mock.push(StatusCode::BAD_GATEWAY, "upstream gone");
    let err = client.tag_list(ListFormat::Parsed).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFailed);
    assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    assert_eq!(err.body(), Some("upstream gone"));
}
