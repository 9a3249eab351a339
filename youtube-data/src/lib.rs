//! A client for the read side of the YouTube Data API v3.
//!
//! Every typed accessor on [`YouTubeClient`] funnels through the same three operations:
//!
//! - [`resolve::resolve_id`] turns an ID, a YouTube URL, or free-text search terms into a
//!   canonical resource ID;
//! - [`fetch::get_item`] fetches a single resource by ID or by `mine`;
//! - [`paginate::get_paginated_items`] follows a list endpoint across pages.
//!
//! [`search::search`] exposes free-text search for videos, channels and playlists directly.
//!
//! All of them memoize through a shared [`Cache`], and all network access goes through a
//! [`Transport`] so the kernel can be driven without a network.
//!
//! ```no_run
//! # async fn run() -> eyre::Result<()> {
//! use youtube_data::{Config, YouTubeClient};
//!
//! let yt = YouTubeClient::from_config(&Config::from_env()?)?;
//! let video = yt.get_video("https://www.youtube.com/watch?v=dQw4w9WgXcQ").await?;
//! for comment in yt.get_video_comments(&video.id, 20).await? {
//!     println!("{}", comment.text());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod kind;
pub mod paginate;
pub mod resolve;
pub mod resource;
pub mod search;
pub mod transport;
pub mod url_parser;

#[cfg(test)]
mod testing;

pub use cache::{Cache, Cached};
pub use client::YouTubeClient;
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use kind::{CommentKind, ListEndpoint, ResourceKind};
pub use resource::{
    Channel, Comment, PageInfo, Playlist, Resource, Subscription, Video, VideoAbuseReportReason,
    VideoCategory,
};
pub use transport::{HttpTransport, Transport};
