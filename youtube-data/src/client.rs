//! The typed facade over the kernel.

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::kind::{ListEndpoint, ResourceKind};
use crate::resource::{
    Channel, Comment, Playlist, Resource, Subscription, Video, VideoAbuseReportReason,
    VideoCategory,
};
use crate::transport::{HttpTransport, Transport};
use crate::{fetch, paginate, resolve, search};
use std::sync::Arc;
use tracing::instrument;

/// YouTube Data API client.
///
/// Accessors that take an `input` accept an ID, a YouTube URL, or search terms, and resolve it
/// with [`Self::resolve_id`] first. Accessors that take an `id` use it as given.
///
/// Listing accessors take `max_results`: a positive value returns at most that many items from
/// the first page, anything else fetches every page.
///
/// Clones share the transport and the cache.
pub struct YouTubeClient<T = HttpTransport> {
    transport: Arc<T>,
    cache: Arc<Cache>,
}

impl<T> Clone for YouTubeClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<T> std::fmt::Debug for YouTubeClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl YouTubeClient<HttpTransport> {
    /// Creates a client that talks HTTPS to the API described by `config`.
    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        let transport = HttpTransport::new(config)?;
        let cache = if config.cache {
            Cache::new(config.cache_ttl())
        } else {
            Cache::disabled()
        };
        Ok(Self::new(transport, Arc::new(cache)))
    }
}

impl<T: Transport> YouTubeClient<T> {
    pub fn new(transport: T, cache: Arc<Cache>) -> Self {
        Self {
            transport: Arc::new(transport),
            cache,
        }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolves `input` (an ID, URL or search terms) to the ID of a `kind` resource.
    #[instrument(skip(self))]
    pub async fn resolve_id(&self, input: &str, kind: ResourceKind) -> Result<String> {
        resolve::resolve_id(&*self.transport, &self.cache, input, kind).await
    }

    /// Fetches one resource by `id`, or the caller's own with `mine`.
    #[instrument(skip(self))]
    pub async fn get_item(
        &self,
        kind: ResourceKind,
        mine: bool,
        id: Option<&str>,
    ) -> Result<Resource> {
        fetch::get_item(&*self.transport, &self.cache, kind, mine, id).await
    }

    /// Lists `endpoint` for `id`, or for the caller with `mine`.
    #[instrument(skip(self))]
    pub async fn get_paginated_items(
        &self,
        endpoint: ListEndpoint,
        mine: bool,
        id: Option<&str>,
        max_results: i64,
    ) -> Result<Vec<Resource>> {
        paginate::get_paginated_items(
            &*self.transport,
            &self.cache,
            endpoint,
            mine,
            id,
            max_results,
        )
        .await
    }

    /// Searches for `kind` resources matching `term`, with at most `max_results` hits
    /// (10 when `None`).
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        kind: ResourceKind,
        term: &str,
        max_results: Option<u32>,
    ) -> Result<Vec<Resource>> {
        search::search(&*self.transport, kind, term, max_results).await
    }

    async fn search_typed<R>(
        &self,
        kind: ResourceKind,
        term: &str,
        max_results: Option<u32>,
    ) -> Result<Vec<R>>
    where
        R: TryFrom<Resource, Error = Resource>,
    {
        self.search(kind, term, max_results)
            .await?
            .into_iter()
            .map(|resource| typed(resource, kind))
            .collect()
    }

    async fn resolve_and_get<R>(&self, input: &str, kind: ResourceKind) -> Result<R>
    where
        R: TryFrom<Resource, Error = Resource>,
    {
        let id = self.resolve_id(input, kind).await?;
        typed(self.get_item(kind, false, Some(&id)).await?, kind)
    }

    async fn get_by_id<R>(&self, id: &str, kind: ResourceKind) -> Result<R>
    where
        R: TryFrom<Resource, Error = Resource>,
    {
        typed(self.get_item(kind, false, Some(id)).await?, kind)
    }

    async fn list<R>(
        &self,
        endpoint: ListEndpoint,
        mine: bool,
        id: Option<&str>,
        max_results: i64,
    ) -> Result<Vec<R>>
    where
        R: TryFrom<Resource, Error = Resource>,
    {
        self.get_paginated_items(endpoint, mine, id, max_results)
            .await?
            .into_iter()
            .map(|resource| typed(resource, endpoint.item_kind()))
            .collect()
    }

    fn check_token(&self) -> Result<()> {
        if self.transport.has_access_token() {
            Ok(())
        } else {
            Err(Error::validation(
                "Must have an access token for OAuth related methods",
            ))
        }
    }

    /// Searches for videos.
    ///
    /// # Arguments
    ///
    /// * `term` - Free-text search terms
    /// * `max_results` - Between 1 and 50 hits; `None` returns 10
    ///
    /// # Returns
    ///
    /// * `Ok(videos)` - Hits in ranking order, carrying only their search snippet
    /// * `Err(_)` - [`Error::Validation`] for an out-of-range `max_results`, otherwise the
    ///   transport's failure
    pub async fn search_videos(&self, term: &str, max_results: Option<u32>) -> Result<Vec<Video>> {
        self.search_typed(ResourceKind::Video, term, max_results)
            .await
    }

    /// Searches for channels. See [`Self::search_videos`] for the arguments.
    pub async fn search_channels(
        &self,
        term: &str,
        max_results: Option<u32>,
    ) -> Result<Vec<Channel>> {
        self.search_typed(ResourceKind::Channel, term, max_results)
            .await
    }

    /// Searches for playlists. See [`Self::search_videos`] for the arguments.
    pub async fn search_playlists(
        &self,
        term: &str,
        max_results: Option<u32>,
    ) -> Result<Vec<Playlist>> {
        self.search_typed(ResourceKind::Playlist, term, max_results)
            .await
    }

    /// Fetches a video with its snippet, content details and statistics.
    ///
    /// # Arguments
    ///
    /// * `input` - A video ID, a watch/short/embed URL, or search terms
    ///
    /// # Returns
    ///
    /// * `Ok(video)` - The resolved video
    /// * `Err(_)` - [`Error::NotFound`] with "Item not found" if the resolved ID does not
    ///   exist, otherwise the transport's failure
    pub async fn get_video(&self, input: &str) -> Result<Video> {
        self.resolve_and_get(input, ResourceKind::Video).await
    }

    /// Fetches a channel. `input` may be a `UC...` ID, a channel, custom or handle URL, or
    /// search terms.
    pub async fn get_channel(&self, input: &str) -> Result<Channel> {
        self.resolve_and_get(input, ResourceKind::Channel).await
    }

    pub async fn get_playlist(&self, input: &str) -> Result<Playlist> {
        self.resolve_and_get(input, ResourceKind::Playlist).await
    }

    /// Fetches a single comment by ID. The comment is classified as a channel comment when
    /// its snippet names a channel.
    pub async fn get_comment(&self, id: &str) -> Result<Comment> {
        self.get_by_id(id, ResourceKind::Comment).await
    }

    pub async fn get_subscription(&self, id: &str) -> Result<Subscription> {
        self.get_by_id(id, ResourceKind::Subscription).await
    }

    pub async fn get_video_category(&self, id: &str) -> Result<VideoCategory> {
        self.get_by_id(id, ResourceKind::VideoCategory).await
    }

    /// The videos of a playlist, in playlist order.
    pub async fn get_playlist_items(&self, input: &str, max_results: i64) -> Result<Vec<Video>> {
        let id = self.resolve_id(input, ResourceKind::Playlist).await?;
        self.list(ListEndpoint::PlaylistItems, false, Some(&id), max_results)
            .await
    }

    /// Top-level comments on a video, each with the replies the API included.
    pub async fn get_video_comments(&self, input: &str, max_results: i64) -> Result<Vec<Comment>> {
        let id = self.resolve_id(input, ResourceKind::Video).await?;
        self.list(ListEndpoint::VideoCommentThreads, false, Some(&id), max_results)
            .await
    }

    /// Top-level comments in a channel's discussion, each with the replies the API included.
    pub async fn get_channel_comments(
        &self,
        input: &str,
        max_results: i64,
    ) -> Result<Vec<Comment>> {
        let id = self.resolve_id(input, ResourceKind::Channel).await?;
        self.list(ListEndpoint::ChannelCommentThreads, false, Some(&id), max_results)
            .await
    }

    /// Replies to the comment `id`.
    ///
    /// # Arguments
    ///
    /// * `id` - ID of the top-level comment
    /// * `max_results` - At most 100; zero or negative fetches every page
    pub async fn get_comment_replies(&self, id: &str, max_results: i64) -> Result<Vec<Comment>> {
        self.list(ListEndpoint::CommentReplies, false, Some(id), max_results)
            .await
    }

    pub async fn get_channel_playlists(
        &self,
        input: &str,
        max_results: i64,
    ) -> Result<Vec<Playlist>> {
        let id = self.resolve_id(input, ResourceKind::Channel).await?;
        self.list(ListEndpoint::ChannelPlaylists, false, Some(&id), max_results)
            .await
    }

    /// Channels that the channel `input` subscribes to, if its subscriptions are public.
    pub async fn get_channel_subscriptions(
        &self,
        input: &str,
        max_results: i64,
    ) -> Result<Vec<Subscription>> {
        let id = self.resolve_id(input, ResourceKind::Channel).await?;
        self.list(ListEndpoint::Subscriptions, false, Some(&id), max_results)
            .await
    }

    /// Video categories available in `region_code` (ISO 3166-1 alpha-2).
    pub async fn get_categories(&self, region_code: &str) -> Result<Vec<VideoCategory>> {
        self.list(ListEndpoint::VideoCategories, false, Some(region_code), 0)
            .await
    }

    /// Reasons that can be given when reporting a video.
    pub async fn get_video_abuse_report_reasons(&self) -> Result<Vec<VideoAbuseReportReason>> {
        self.list(ListEndpoint::VideoAbuseReportReasons, false, None, 0)
            .await
    }

    /// The authenticated user's channel.
    #[instrument(skip(self), ret)]
    pub async fn get_me(&self) -> Result<Channel> {
        self.check_token()?;
        typed(
            self.get_item(ResourceKind::Channel, true, None).await?,
            ResourceKind::Channel,
        )
    }

    /// Channels the authenticated user subscribes to.
    #[instrument(skip(self))]
    pub async fn get_my_subscriptions(&self, max_results: i64) -> Result<Vec<Subscription>> {
        self.check_token()?;
        self.list(ListEndpoint::Subscriptions, true, None, max_results)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_my_playlists(&self, max_results: i64) -> Result<Vec<Playlist>> {
        self.check_token()?;
        self.list(ListEndpoint::ChannelPlaylists, true, None, max_results)
            .await
    }
}

fn typed<R>(resource: Resource, expected: ResourceKind) -> Result<R>
where
    R: TryFrom<Resource, Error = Resource>,
{
    R::try_from(resource).map_err(|other| {
        Error::from(eyre::eyre!(
            "expected {expected} resource, got {}",
            other.kind()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::{FakeTransport, page, search_hits};
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn client(transport: FakeTransport) -> YouTubeClient<FakeTransport> {
        YouTubeClient::new(transport, Arc::new(Cache::default()))
    }

    fn one(item: serde_json::Value) -> serde_json::Value {
        json!({ "items": [item] })
    }

    #[tokio::test]
    async fn video_by_url() {
        let transport = FakeTransport::new();
        transport.respond(
            "videos",
            one(json!({
                "id": "dQw4w9WgXcQ",
                "snippet": { "title": "Never Gonna Give You Up", "channelTitle": "Rick Astley" },
                "statistics": { "viewCount": "1500000000" }
            })),
        );
        let yt = client(transport);

        let video = yt
            .get_video("https://youtu.be/dQw4w9WgXcQ")
            .await
            .unwrap();
        assert_eq!(video.id, "dQw4w9WgXcQ");
        assert_eq!(
            video.statistics.unwrap().view_count.as_deref(),
            Some("1500000000")
        );
        assert!(yt.transport().calls_to("search").is_empty());
    }

    #[tokio::test]
    async fn channel_by_name_searches_then_fetches() {
        let transport = FakeTransport::new();
        transport
            .respond("search", search_hits("channelId", &["UCuAXFkgsw1L7xaCfnd5JJOw"]))
            .respond(
                "channels",
                one(json!({ "id": "UCuAXFkgsw1L7xaCfnd5JJOw", "snippet": { "title": "Rick Astley" } })),
            );
        let yt = client(transport);

        let channel = yt.get_channel("rick astley").await.unwrap();
        assert_eq!(channel.snippet.unwrap().title, "Rick Astley");

        let endpoints: Vec<_> = yt
            .transport()
            .calls()
            .into_iter()
            .map(|c| c.endpoint)
            .collect();
        assert_eq!(endpoints, ["search", "channels"]);
        assert_eq!(
            yt.transport().calls_to("channels")[0].param("id"),
            Some("UCuAXFkgsw1L7xaCfnd5JJOw")
        );
    }

    #[tokio::test]
    async fn oauth_accessors_need_a_token() {
        let yt = client(FakeTransport::new());

        let err = yt.get_me().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_snapshot!(err.to_string(), @"Must have an access token for OAuth related methods");
        assert!(yt.get_my_subscriptions(5).await.is_err());
        assert!(yt.get_my_playlists(5).await.is_err());
        assert!(yt.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn authorized_client_reads_its_own_resources() {
        let transport = FakeTransport::authorized();
        transport
            .respond("channels", one(json!({ "id": "UCme" })))
            .respond(
                "playlists",
                page(vec![json!({ "id": "PL1" }), json!({ "id": "PL2" })], Some(2), None),
            );
        let yt = client(transport);

        assert_eq!(yt.get_me().await.unwrap().id, "UCme");
        let playlists = yt.get_my_playlists(-1).await.unwrap();
        let ids: Vec<_> = playlists.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["PL1", "PL2"]);

        for call in yt.transport().calls() {
            assert_eq!(call.param("mine"), Some("true"), "{}", call.endpoint);
        }
    }

    #[tokio::test]
    async fn video_comments_resolve_the_video_first() {
        let transport = FakeTransport::new();
        transport.respond(
            "commentThreads",
            page(
                vec![json!({
                    "id": "t1",
                    "snippet": { "topLevelComment": { "id": "c1", "snippet": { "textDisplay": "first" } } },
                    "replies": { "comments": [{ "id": "c1.r1", "snippet": { "textDisplay": "reply" } }] }
                })],
                Some(1),
                None,
            ),
        );
        let yt = client(transport);

        let comments = yt
            .get_video_comments("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42", 10)
            .await
            .unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text(), "first");
        assert_eq!(comments[0].replies[0].text(), "reply");
        assert_eq!(
            yt.transport().calls()[0].param("videoId"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[tokio::test]
    async fn search_accessors_return_typed_hits() {
        let transport = FakeTransport::new();
        transport
            .respond(
                "search",
                json!({ "items": [
                    { "id": { "videoId": "dQw4w9WgXcQ" }, "snippet": { "title": "Never Gonna Give You Up" } }
                ] }),
            )
            .respond("search", search_hits("channelId", &["UCuAXFkgsw1L7xaCfnd5JJOw"]))
            .respond("search", search_hits("playlistId", &["PL1", "PL2"]));
        let yt = client(transport);

        let videos = yt.search_videos("never gonna give you up", None).await.unwrap();
        assert_eq!(videos[0].snippet.as_ref().unwrap().title, "Never Gonna Give You Up");
        let channels = yt.search_channels("rick astley", Some(1)).await.unwrap();
        assert_eq!(channels[0].id, "UCuAXFkgsw1L7xaCfnd5JJOw");
        let playlists = yt.search_playlists("music", Some(2)).await.unwrap();
        assert_eq!(playlists.len(), 2);

        let sent: Vec<_> = yt
            .transport()
            .calls()
            .iter()
            .map(|c| {
                (
                    c.param("type").unwrap_or_default().to_string(),
                    c.param("maxResults").unwrap_or_default().to_string(),
                )
            })
            .collect();
        assert_eq!(
            sent,
            [
                ("video".to_string(), "10".to_string()),
                ("channel".to_string(), "1".to_string()),
                ("playlist".to_string(), "2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn search_rejects_out_of_range_maximum() {
        let yt = client(FakeTransport::new());
        let err = yt.search_channels("rick astley", Some(0)).await.unwrap_err();
        assert_snapshot!(err.to_string(), @"Max results must be greater than 0 and less than or equal to 50");
        assert!(yt.search_videos("rick astley", Some(51)).await.is_err());
        assert!(yt.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn categories_fetch_every_page_for_a_region() {
        let transport = FakeTransport::new();
        transport.respond(
            "videoCategories",
            page(
                vec![
                    json!({ "id": "1", "snippet": { "title": "Film & Animation", "assignable": true } }),
                    json!({ "id": "10", "snippet": { "title": "Music", "assignable": true } }),
                ],
                None,
                None,
            ),
        );
        let yt = client(transport);

        let categories = yt.get_categories("GB").await.unwrap();
        assert_eq!(categories[1].snippet.as_ref().unwrap().title, "Music");
        assert_eq!(yt.transport().calls()[0].param("regionCode"), Some("GB"));
    }

    #[tokio::test]
    async fn clones_share_the_cache() {
        let transport = FakeTransport::new();
        transport.respond("playlists", one(json!({ "id": "PLMC9KNkIncKvYin_USF1qoJQnIyMAfRxl" })));
        let yt = client(transport);
        let other = yt.clone();

        yt.get_playlist("PLMC9KNkIncKvYin_USF1qoJQnIyMAfRxl")
            .await
            .unwrap();
        other
            .get_playlist("PLMC9KNkIncKvYin_USF1qoJQnIyMAfRxl")
            .await
            .unwrap();
        assert_eq!(other.transport().calls().len(), 1);
    }

    #[test]
    fn mismatched_resource_is_a_transport_error() {
        let resource = Resource::from(Playlist {
            id: "PL1".into(),
            snippet: None,
            content_details: None,
        });
        let err = typed::<Video>(resource, ResourceKind::Video).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_snapshot!(err.to_string(), @"expected videos resource, got playlists");
    }

    #[test]
    fn from_config_honours_the_cache_switch() {
        let config = Config {
            cache: false,
            ..Config::with_api_key("key")
        };
        let yt = YouTubeClient::from_config(&config).unwrap();
        assert!(!yt.cache().is_enabled());

        let config = Config {
            cache_ttl_secs: Some(60),
            ..Config::default()
        };
        let yt = YouTubeClient::from_config(&config).unwrap();
        assert!(yt.cache().is_enabled());
        assert_eq!(yt.cache().ttl(), Some(std::time::Duration::from_secs(60)));
    }
}
