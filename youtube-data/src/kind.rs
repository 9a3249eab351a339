//! Static per-resource and per-endpoint configuration.
//!
//! Every request the kernel makes is shaped by one of two closed enumerations:
//! [`ResourceKind`] for single-item lookups and [`ListEndpoint`] for paginated listings.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// The fetchable entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Video,
    Channel,
    Playlist,
    Comment,
    Subscription,
    VideoCategory,
    AbuseReportReason,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        Self::Video,
        Self::Channel,
        Self::Playlist,
        Self::Comment,
        Self::Subscription,
        Self::VideoCategory,
        Self::AbuseReportReason,
    ];

    /// The API collection this kind is fetched from.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Video => "videos",
            Self::Channel => "channels",
            Self::Playlist => "playlists",
            Self::Comment => "comments",
            Self::Subscription => "subscriptions",
            Self::VideoCategory => "videoCategories",
            Self::AbuseReportReason => "videoAbuseReportReasons",
        }
    }

    /// Default `fields` projection for single-item requests.
    pub fn fields(self) -> &'static str {
        match self {
            Self::Video => "items(kind,id,snippet,contentDetails,statistics,status)",
            Self::Channel => "items(kind,id,snippet,contentDetails,statistics,status)",
            Self::Playlist => "items(kind,id,snippet,contentDetails,status)",
            Self::Comment => "items(kind,id,snippet)",
            Self::Subscription => "items(kind,id,snippet,contentDetails,subscriberSnippet)",
            Self::VideoCategory => "items(kind,id,snippet)",
            Self::AbuseReportReason => "items(kind,id,snippet)",
        }
    }

    /// Default `part` projection for single-item requests.
    pub fn part(self) -> &'static str {
        match self {
            Self::Video => "snippet,contentDetails,statistics,status",
            Self::Channel => "snippet,contentDetails,statistics,status",
            Self::Playlist => "snippet,contentDetails,status",
            Self::Comment => "id",
            Self::Subscription => "snippet,contentDetails,subscriberSnippet",
            Self::VideoCategory => "snippet",
            Self::AbuseReportReason => "snippet",
        }
    }

    /// The `part` actually sent; comments cannot be classified without their snippet.
    pub fn request_part(self) -> String {
        let part = self.part();
        match self {
            Self::Comment if !part.split(',').any(|p| p == "snippet") => {
                format!("{part},snippet")
            }
            _ => part.to_string(),
        }
    }

    /// Whether single-item lookups of this kind accept `mine=true`.
    pub fn supports_mine(self) -> bool {
        !matches!(self, Self::Comment | Self::Video)
    }

    /// The `type` value used when searching for this kind, if it is searchable at all.
    pub(crate) fn search_type(self) -> Option<&'static str> {
        match self {
            Self::Video => Some("video"),
            Self::Channel => Some("channel"),
            Self::Playlist => Some("playlist"),
            _ => None,
        }
    }

    /// The field of a search hit's `id` object that holds this kind's ID.
    pub(crate) fn search_id_field(self) -> Option<&'static str> {
        match self {
            Self::Video => Some("videoId"),
            Self::Channel => Some("channelId"),
            Self::Playlist => Some("playlistId"),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_lowercase().as_str() {
            "video" | "videos" => Self::Video,
            "channel" | "channels" => Self::Channel,
            "playlist" | "playlists" => Self::Playlist,
            "comment" | "comments" => Self::Comment,
            "subscription" | "subscriptions" => Self::Subscription,
            "category" | "videocategory" | "videocategories" => Self::VideoCategory,
            "abusereportreason" | "videoabusereportreasons" => Self::AbuseReportReason,
            _ => {
                return Err(Error::validation(
                    "Type must be a video, channel, playlist, comment, subscription, or video category.",
                ));
            }
        };
        Ok(kind)
    }
}

/// Which discussion a comment belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    #[default]
    Video,
    Channel,
}

/// The list endpoints the paginator knows how to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListEndpoint {
    PlaylistItems,
    ChannelPlaylists,
    CommentThreads,
    VideoCommentThreads,
    ChannelCommentThreads,
    CommentReplies,
    Subscriptions,
    VideoCategories,
    VideoAbuseReportReasons,
}

impl ListEndpoint {
    pub const ALL: [ListEndpoint; 9] = [
        Self::PlaylistItems,
        Self::ChannelPlaylists,
        Self::CommentThreads,
        Self::VideoCommentThreads,
        Self::ChannelCommentThreads,
        Self::CommentReplies,
        Self::Subscriptions,
        Self::VideoCategories,
        Self::VideoAbuseReportReasons,
    ];

    /// The spelling used for parsing and in cache keys.
    ///
    /// This differs from [`Self::api_endpoint`] where several listings share one collection.
    pub fn name(self) -> &'static str {
        match self {
            Self::PlaylistItems => "playlistItems",
            Self::ChannelPlaylists => "playlists:channel",
            Self::CommentThreads => "commentThreads",
            Self::VideoCommentThreads => "commentThreads:video",
            Self::ChannelCommentThreads => "commentThreads:channel",
            Self::CommentReplies => "comments",
            Self::Subscriptions => "subscriptions",
            Self::VideoCategories => "videoCategories",
            Self::VideoAbuseReportReasons => "videoAbuseReportReasons",
        }
    }

    pub fn api_endpoint(self) -> &'static str {
        match self {
            Self::ChannelPlaylists => "playlists",
            Self::CommentThreads | Self::VideoCommentThreads | Self::ChannelCommentThreads => {
                "commentThreads"
            }
            other => other.name(),
        }
    }

    /// Hard per-page ceiling on `maxResults`, if the endpoint pages at all.
    pub fn max_page_size(self) -> Option<u32> {
        match self {
            Self::PlaylistItems | Self::ChannelPlaylists | Self::Subscriptions => Some(50),
            Self::CommentThreads
            | Self::VideoCommentThreads
            | Self::ChannelCommentThreads
            | Self::CommentReplies => Some(100),
            Self::VideoCategories | Self::VideoAbuseReportReasons => None,
        }
    }

    /// The kind of resource each listed item is turned into.
    pub fn item_kind(self) -> ResourceKind {
        match self {
            Self::PlaylistItems => ResourceKind::Video,
            Self::ChannelPlaylists => ResourceKind::Playlist,
            Self::CommentThreads
            | Self::VideoCommentThreads
            | Self::ChannelCommentThreads
            | Self::CommentReplies => ResourceKind::Comment,
            Self::Subscriptions => ResourceKind::Subscription,
            Self::VideoCategories => ResourceKind::VideoCategory,
            Self::VideoAbuseReportReasons => ResourceKind::AbuseReportReason,
        }
    }

    /// The query parameter that carries the caller's identifier.
    pub fn id_param(self) -> Option<&'static str> {
        match self {
            Self::PlaylistItems => Some("playlistId"),
            Self::ChannelPlaylists | Self::Subscriptions | Self::ChannelCommentThreads => {
                Some("channelId")
            }
            Self::CommentThreads | Self::VideoCommentThreads => Some("videoId"),
            Self::CommentReplies => Some("parentId"),
            Self::VideoCategories => Some("regionCode"),
            Self::VideoAbuseReportReasons => None,
        }
    }

    pub fn supports_mine(self) -> bool {
        matches!(self, Self::ChannelPlaylists | Self::Subscriptions)
    }

    /// Whether the endpoint can be listed without an ID or `mine`.
    pub fn requires_id(self) -> bool {
        !matches!(self, Self::VideoAbuseReportReasons)
    }

    pub fn is_comment_thread(self) -> bool {
        matches!(
            self,
            Self::CommentThreads | Self::VideoCommentThreads | Self::ChannelCommentThreads
        )
    }

    /// The discussion comments on this listing belong to, when the endpoint says so.
    pub fn comment_kind(self) -> Option<CommentKind> {
        match self {
            Self::CommentThreads | Self::VideoCommentThreads => Some(CommentKind::Video),
            Self::ChannelCommentThreads => Some(CommentKind::Channel),
            _ => None,
        }
    }

    /// `part` sent on every page request.
    pub fn part(self) -> &'static str {
        if self.is_comment_thread() {
            "snippet,replies"
        } else {
            "snippet"
        }
    }
}

impl fmt::Display for ListEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ListEndpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let endpoint = match s {
            "playlistItems" => Self::PlaylistItems,
            "playlists:channel" => Self::ChannelPlaylists,
            "commentThreads" => Self::CommentThreads,
            "commentThreads:video" => Self::VideoCommentThreads,
            "commentThreads:channel" => Self::ChannelCommentThreads,
            "comments" => Self::CommentReplies,
            "subscriptions" => Self::Subscriptions,
            "videoCategories" => Self::VideoCategories,
            "videoAbuseReportReasons" => Self::VideoAbuseReportReasons,
            other => return Err(Error::validation(format!("Unknown item type {other}"))),
        };
        Ok(endpoint)
    }
}
