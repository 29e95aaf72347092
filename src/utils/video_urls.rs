// marley-service/src/utils/video_urls.rs
use crate::models::VideoSourceType;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref YOUTUBE_RE: Regex = Regex::new(
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([a-zA-Z0-9_-]{11})"
    )
    .unwrap();
    static ref VIMEO_RE: Regex =
        Regex::new(r"(?:player\.vimeo\.com/video/|vimeo\.com/)(\d+)").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedVideoUrl {
    pub source_type: VideoSourceType,
    pub external_id: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Classify an external video URL into youtube/vimeo/external and pull
/// out the provider id where there is one.
pub fn parse_video_url(url: &str) -> ParsedVideoUrl {
    if let Some(captures) = YOUTUBE_RE.captures(url) {
        let video_id = captures[1].to_string();
        let thumbnail_url = format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id);
        return ParsedVideoUrl {
            source_type: VideoSourceType::Youtube,
            external_id: Some(video_id),
            thumbnail_url: Some(thumbnail_url),
        };
    }

    if let Some(captures) = VIMEO_RE.captures(url) {
        return ParsedVideoUrl {
            source_type: VideoSourceType::Vimeo,
            external_id: Some(captures[1].to_string()),
            // Vimeo thumbnails require an API call
            thumbnail_url: None,
        };
    }

    ParsedVideoUrl {
        source_type: VideoSourceType::External,
        external_id: None,
        thumbnail_url: None,
    }
}

/// Linked sources must at least be http(s) URLs.
pub fn is_valid_video_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_youtube_watch_and_short_urls() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
        ] {
            let parsed = parse_video_url(url);
            assert_eq!(parsed.source_type, VideoSourceType::Youtube);
            assert_eq!(parsed.external_id.as_deref(), Some("dQw4w9WgXcQ"));
            assert!(parsed.thumbnail_url.unwrap().contains("dQw4w9WgXcQ"));
        }
    }

    #[test]
    fn recognizes_vimeo_urls() {
        let parsed = parse_video_url("https://vimeo.com/76979871");
        assert_eq!(parsed.source_type, VideoSourceType::Vimeo);
        assert_eq!(parsed.external_id.as_deref(), Some("76979871"));
        assert!(parsed.thumbnail_url.is_none());

        let parsed = parse_video_url("https://player.vimeo.com/video/76979871");
        assert_eq!(parsed.external_id.as_deref(), Some("76979871"));
    }

    #[test]
    fn other_urls_fall_back_to_external() {
        let parsed = parse_video_url("https://example.com/rehearsal.mp4");
        assert_eq!(parsed.source_type, VideoSourceType::External);
        assert!(parsed.external_id.is_none());
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(!is_valid_video_url("ftp://example.com/clip.mp4"));
        assert!(!is_valid_video_url("not a url"));
        assert!(is_valid_video_url("https://example.com/clip.mp4"));
    }
}
