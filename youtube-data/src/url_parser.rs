//! Extraction of resource IDs from YouTube web URLs.

use crate::kind::ResourceKind;
use ::url::Url;

/// IDs found in a URL. Fields are `None` when the URL does not mention that kind of resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUrl {
    pub video: Option<String>,
    pub channel: Option<String>,
    pub playlist: Option<String>,
}

impl ParsedUrl {
    /// The ID for `kind`, if the URL carried one.
    pub fn get(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Video => self.video.as_deref(),
            ResourceKind::Channel => self.channel.as_deref(),
            ResourceKind::Playlist => self.playlist.as_deref(),
            _ => None,
        }
    }
}

/// Cheap test for whether `input` should be run through [`parse`] at all.
pub fn looks_like_url(input: &str) -> bool {
    input.contains("youtube.com") || input.contains("youtu.be")
}

/// Extracts resource IDs from a YouTube URL.
///
/// Never fails: anything unrecognised yields an empty [`ParsedUrl`]. IDs are not checked for
/// existence, and custom channel names (`/c/NAME`, `/user/NAME`, `/@handle`) are returned as-is.
pub fn parse(input: &str) -> ParsedUrl {
    let input = input.trim();
    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(::url::ParseError::RelativeUrlWithoutBase) => {
            match Url::parse(&format!("https://{input}")) {
                Ok(url) => url,
                Err(_) => return ParsedUrl::default(),
            }
        }
        Err(_) => return ParsedUrl::default(),
    };

    let Some(host) = url.host_str() else {
        return ParsedUrl::default();
    };
    let host = host.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    let query = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty())
    };

    let mut parsed = ParsedUrl {
        playlist: query("list"),
        ..ParsedUrl::default()
    };

    match host {
        "youtu.be" => {
            parsed.video = segments.first().map(|s| s.to_string());
        }
        "youtube.com" | "m.youtube.com" | "music.youtube.com" => match segments.as_slice() {
            ["watch", ..] => parsed.video = query("v"),
            ["embed" | "shorts" | "live" | "v", id, ..] => parsed.video = Some(id.to_string()),
            ["channel" | "c" | "user", name, ..] => parsed.channel = Some(name.to_string()),
            [handle, ..] if handle.starts_with('@') && handle.len() > 1 => {
                parsed.channel = Some(handle.to_string());
            }
            _ => {}
        },
        _ => return ParsedUrl::default(),
    }

    parsed
}
