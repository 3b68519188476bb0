use url::Url;

use super::traits::PlatformCapabilities;
use super::types::StreamingClassification;
use crate::constants::HLS_MIME_TYPE;
use crate::utils::errors::PlaybackError;

/// Parses a source URL, accepting only absolute URIs.
pub fn parse_source_url(raw: &str) -> Result<Url, PlaybackError> {
    let url = Url::parse(raw.trim()).map_err(|_| PlaybackError::invalid_url())?;

    // `foo:bar` parses, but is not something an element can fetch.
    if url.cannot_be_a_base() && !matches!(url.scheme(), "blob" | "data") {
        return Err(PlaybackError::invalid_url());
    }

    Ok(url)
}

/// Manifest extension, an `/hls/` path segment or a "manifest" keyword in the
/// path or query.
pub fn is_hls_url(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    let query = url.query().unwrap_or_default().to_ascii_lowercase();

    path.contains(".m3u8")
        || path.contains("/hls/")
        || path.contains("manifest")
        || query.contains(".m3u8")
        || query.contains("manifest")
}

/// MIME type of a recognised progressive container, from the file extension.
pub fn container_mime(url: &Url) -> Option<&'static str> {
    let file_name = url.path_segments()?.next_back()?;
    let (_, extension) = file_name.rsplit_once('.')?;

    match extension.to_ascii_lowercase().as_str() {
        "mp4" | "m4v" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        "ogg" | "ogv" => Some("video/ogg"),
        "mov" => Some("video/quicktime"),
        "avi" => Some("video/x-msvideo"),
        _ => None,
    }
}

/// Ordered, first match wins: native HLS, library HLS, then direct playback.
pub fn classify(url: &Url, capabilities: &dyn PlatformCapabilities) -> StreamingClassification {
    let hls = is_hls_url(url);

    if hls && capabilities.supports_container(HLS_MIME_TYPE).is_supported() {
        return StreamingClassification::NativeHls;
    }

    if hls && capabilities.supports_adaptive_streaming() {
        return StreamingClassification::LibraryHls;
    }

    match container_mime(url) {
        Some(mime) => StreamingClassification::Progressive { mime },
        None => StreamingClassification::UnknownFormat,
    }
}
