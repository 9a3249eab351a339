//! Typed resources built from YouTube Data API items.
//!
//! Only the subset of each resource that callers currently need is modelled; unknown fields
//! are ignored during deserialization.

use crate::kind::{CommentKind, ResourceKind};
use eyre::Context;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response envelope shared by every `*.list` call.
///
/// Items are kept as raw JSON because their shape depends on the endpoint (a comment thread
/// wraps its comments, a playlist item wraps a video reference).
///
/// See: <https://developers.google.com/youtube/v3/docs/videos/list#response>
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(rename = "pageInfo")]
    pub page_info: Option<PageInfo>,
    /// Token that can be used as the value of the pageToken parameter to retrieve the next page.
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// Paging details for lists of resources.
///
/// See: <https://developers.google.com/youtube/v3/docs/pageInfo>
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageInfo {
    /// The total number of results in the result set.
    #[serde(rename = "totalResults")]
    pub total_results: Option<u32>,
    /// The number of results included in the API response.
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: Option<u32>,
}

impl PageInfo {
    /// Estimated number of pages in the full result set, if the API reported enough to tell.
    pub fn page_estimate(&self) -> Option<f64> {
        match (self.total_results, self.results_per_page) {
            (Some(total), Some(per_page)) if per_page > 0 => Some(total as f64 / per_page as f64),
            _ => None,
        }
    }
}

/// A `video` resource.
///
/// Also built from `playlistItem` resources, in which case [`Video::id`] is the ID of the
/// referenced video rather than of the playlist entry.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
    #[serde(rename = "contentDetails", default)]
    pub content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
    #[serde(rename = "channelTitle")]
    pub channel_title: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<Timestamp>,
    /// Only present on playlist items.
    #[serde(rename = "resourceId", skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<ResourceId>,
}

/// Statistics about the video.
///
/// See: <https://developers.google.com/youtube/v3/docs/videos#statistics>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStatistics {
    #[serde(rename = "viewCount")]
    pub view_count: Option<String>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<String>,
    #[serde(rename = "commentCount")]
    pub comment_count: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoContentDetails {
    /// ISO 8601 duration, e.g. `PT3M33S`.
    pub duration: Option<String>,
    /// Only present on playlist items.
    #[serde(rename = "videoId", skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

/// Reference from one resource to another, as found in playlist items and subscriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceId {
    pub kind: Option<String>,
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
}

impl Video {
    fn from_item(item: Value) -> eyre::Result<Self> {
        let is_playlist_item = item.get("kind").and_then(Value::as_str) == Some("youtube#playlistItem");
        let mut video: Video = serde_json::from_value(item).context("parse video resource")?;
        if is_playlist_item {
            let video_id = video
                .snippet
                .as_ref()
                .and_then(|s| s.resource_id.as_ref())
                .and_then(|r| r.video_id.clone())
                .or_else(|| video.content_details.as_ref().and_then(|c| c.video_id.clone()));
            match video_id {
                Some(id) => video.id = id,
                None => eyre::bail!("playlist item {} does not reference a video", video.id),
            }
        }
        Ok(video)
    }
}

/// A `channel` resource.
///
/// See: <https://developers.google.com/youtube/v3/docs/channels#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<ChannelSnippet>,
    #[serde(default)]
    pub statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "customUrl")]
    pub custom_url: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStatistics {
    #[serde(rename = "viewCount")]
    pub view_count: Option<String>,
    #[serde(rename = "subscriberCount")]
    pub subscriber_count: Option<String>,
    #[serde(rename = "videoCount")]
    pub video_count: Option<String>,
}

/// A `playlist` resource.
///
/// See: <https://developers.google.com/youtube/v3/docs/playlists#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<PlaylistSnippet>,
    #[serde(rename = "contentDetails", default)]
    pub content_details: Option<PlaylistContentDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
    #[serde(rename = "channelTitle")]
    pub channel_title: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistContentDetails {
    #[serde(rename = "itemCount")]
    pub item_count: Option<u32>,
}

/// A `comment` resource, with any replies that arrived alongside it.
///
/// See: <https://developers.google.com/youtube/v3/docs/comments#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub snippet: CommentSnippet,
    #[serde(skip_deserializing, default)]
    pub kind: CommentKind,
    #[serde(skip_deserializing, default)]
    pub replies: Vec<Comment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentSnippet {
    #[serde(rename = "authorDisplayName")]
    pub author_display_name: Option<String>,
    #[serde(rename = "authorChannelId")]
    pub author_channel_id: Option<AuthorChannelId>,
    #[serde(rename = "textDisplay")]
    pub text_display: Option<String>,
    #[serde(rename = "textOriginal")]
    pub text_original: Option<String>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<u64>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<Timestamp>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<Timestamp>,
    #[serde(rename = "parentId")]
    pub parent_id: Option<String>,
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorChannelId {
    pub value: String,
}

impl Comment {
    /// Builds a bare comment. Without an explicit kind, a comment whose snippet names a
    /// channel is treated as a channel discussion comment.
    fn from_item(item: Value, kind: Option<CommentKind>) -> eyre::Result<Self> {
        let mut comment: Comment = serde_json::from_value(item).context("parse comment resource")?;
        comment.kind = kind.unwrap_or(if comment.snippet.channel_id.is_some() {
            CommentKind::Channel
        } else {
            CommentKind::Video
        });
        Ok(comment)
    }

    /// Builds the top-level comment of a `commentThread` item with its replies attached.
    fn from_thread(thread: Value, kind: Option<CommentKind>) -> eyre::Result<Self> {
        let Value::Object(mut thread) = thread else {
            eyre::bail!("comment thread is not a JSON object");
        };
        let top_level = thread
            .get_mut("snippet")
            .and_then(|s| s.get_mut("topLevelComment"))
            .map(Value::take)
            .ok_or_else(|| eyre::eyre!("comment thread has no top-level comment"))?;
        let mut comment = Self::from_item(top_level, kind)?;
        let kind = Some(comment.kind);

        if let Some(Value::Array(replies)) = thread
            .get_mut("replies")
            .and_then(|r| r.get_mut("comments"))
            .map(Value::take)
        {
            for reply in replies {
                comment.replies.push(Self::from_item(reply, kind)?);
            }
        }
        Ok(comment)
    }

    /// This comment followed by its replies, in the order the API returned them.
    pub fn flatten(&self) -> impl Iterator<Item = &Comment> {
        std::iter::once(self).chain(self.replies.iter())
    }

    pub fn text(&self) -> &str {
        self.snippet
            .text_display
            .as_deref()
            .or(self.snippet.text_original.as_deref())
            .unwrap_or_default()
    }
}

/// A `subscription` resource.
///
/// See: <https://developers.google.com/youtube/v3/docs/subscriptions#resource>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<SubscriptionSnippet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// The subscriber's channel.
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
    /// The channel subscribed to.
    #[serde(rename = "resourceId")]
    pub resource_id: Option<ResourceId>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<Timestamp>,
}

/// A `videoCategory` resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoCategory {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<VideoCategorySnippet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoCategorySnippet {
    #[serde(default)]
    pub title: String,
    pub assignable: Option<bool>,
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
}

/// A `videoAbuseReportReason` resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoAbuseReportReason {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<AbuseReportReasonSnippet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbuseReportReasonSnippet {
    #[serde(default)]
    pub label: String,
    #[serde(rename = "secondaryReasons", default)]
    pub secondary_reasons: Vec<SecondaryReason>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryReason {
    pub id: String,
    pub label: String,
}

/// Any resource the kernel can return.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Resource {
    Video(Video),
    Channel(Channel),
    Playlist(Playlist),
    Comment(Comment),
    Subscription(Subscription),
    VideoCategory(VideoCategory),
    AbuseReportReason(VideoAbuseReportReason),
}

impl Resource {
    /// Builds the typed resource of `kind` from one API item.
    ///
    /// `comment_kind` overrides the snippet-based classification of comments.
    pub(crate) fn from_item(
        kind: ResourceKind,
        item: Value,
        comment_kind: Option<CommentKind>,
    ) -> eyre::Result<Self> {
        Ok(match kind {
            ResourceKind::Video => Self::Video(Video::from_item(item)?),
            ResourceKind::Comment => Self::Comment(Comment::from_item(item, comment_kind)?),
            ResourceKind::Channel => {
                Self::Channel(serde_json::from_value(item).context("parse channel resource")?)
            }
            ResourceKind::Playlist => {
                Self::Playlist(serde_json::from_value(item).context("parse playlist resource")?)
            }
            ResourceKind::Subscription => Self::Subscription(
                serde_json::from_value(item).context("parse subscription resource")?,
            ),
            ResourceKind::VideoCategory => Self::VideoCategory(
                serde_json::from_value(item).context("parse video category resource")?,
            ),
            ResourceKind::AbuseReportReason => Self::AbuseReportReason(
                serde_json::from_value(item).context("parse abuse report reason resource")?,
            ),
        })
    }

    /// Builds the typed resource a `searchResult` item points at.
    ///
    /// Search hits nest the ID as `id.{videoId,channelId,playlistId}`; the snippet has the
    /// same shape as the resource's own.
    ///
    /// See: <https://developers.google.com/youtube/v3/docs/search#resource>
    pub(crate) fn from_search_hit(kind: ResourceKind, mut hit: Value) -> eyre::Result<Self> {
        let Some(field) = kind.search_id_field() else {
            eyre::bail!("{kind} resources do not appear in search results");
        };
        let id = hit
            .get("id")
            .and_then(|id| id.get(field))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| eyre::eyre!("search result has no {field}"))?;
        if let Some(object) = hit.as_object_mut() {
            object.insert("id".to_string(), Value::String(id));
        }
        Self::from_item(kind, hit, None)
    }

    /// Builds a comment (with replies) from one `commentThread` item.
    pub(crate) fn from_thread(item: Value, comment_kind: Option<CommentKind>) -> eyre::Result<Self> {
        Comment::from_thread(item, comment_kind).map(Self::Comment)
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Video(v) => &v.id,
            Self::Channel(c) => &c.id,
            Self::Playlist(p) => &p.id,
            Self::Comment(c) => &c.id,
            Self::Subscription(s) => &s.id,
            Self::VideoCategory(c) => &c.id,
            Self::AbuseReportReason(r) => &r.id,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Video(_) => ResourceKind::Video,
            Self::Channel(_) => ResourceKind::Channel,
            Self::Playlist(_) => ResourceKind::Playlist,
            Self::Comment(_) => ResourceKind::Comment,
            Self::Subscription(_) => ResourceKind::Subscription,
            Self::VideoCategory(_) => ResourceKind::VideoCategory,
            Self::AbuseReportReason(_) => ResourceKind::AbuseReportReason,
        }
    }
}

macro_rules! resource_conversions {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Resource {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl TryFrom<Resource> for $ty {
                type Error = Resource;

                fn try_from(resource: Resource) -> Result<Self, Self::Error> {
                    match resource {
                        Resource::$variant(value) => Ok(value),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

resource_conversions! {
    Video => Video,
    Channel => Channel,
    Playlist => Playlist,
    Comment => Comment,
    Subscription => Subscription,
    VideoCategory => VideoCategory,
    AbuseReportReason => VideoAbuseReportReason,
}
