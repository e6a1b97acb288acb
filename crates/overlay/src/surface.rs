//! The 2-D overlay element.

/// Element hosting the embedded site, positioned with CSS transforms.
pub trait OverlaySurface {
    /// Make the overlay visible.
    fn show(&mut self);
    /// Hide the overlay.
    fn hide(&mut self);
    /// Whether the overlay is currently shown.
    fn is_visible(&self) -> bool;
    /// Replace the element's CSS `transform`.
    fn set_transform(&mut self, css: &str);
    /// Point the embedded document at `url`.
    fn set_source(&mut self, url: &str);
}

/// Rewrite plain-HTTP URLs to HTTPS so the embed loads inside a secure context.
///
/// Only the scheme is rewritten; `http://` inside query strings is left alone.
pub fn normalize_secure_url(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_is_upgraded() {
        assert_eq!(
            normalize_secure_url("http://www.infocus1.co.kr/"),
            "https://www.infocus1.co.kr/"
        );
    }

    #[test]
    fn https_is_untouched() {
        assert_eq!(
            normalize_secure_url("https://example.com/?next=http://x"),
            "https://example.com/?next=http://x"
        );
    }
}
