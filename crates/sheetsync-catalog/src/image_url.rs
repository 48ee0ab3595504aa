//! Image URL repair as an ordered list of rewrite rules.
//!
//! Editors paste whatever link their image host shows them: album pages,
//! share pages, drive viewer links, bare file names. Each [`ImageRule`]
//! recognizes one of those shapes and either produces the final URL or
//! passes. Rules run in priority order and the first match wins; a URL no
//! rule claims is used unchanged.

use regex::Regex;

pub const NO_IMAGE_PLACEHOLDER: &str =
    "https://via.placeholder.com/400x300/ff6b35/ffffff?text=Sem+Imagem";
pub const ALBUM_PLACEHOLDER: &str =
    "https://via.placeholder.com/400x300/ff6b35/ffffff?text=Album+Imgur";
pub const INVALID_URL_PLACEHOLDER: &str =
    "https://via.placeholder.com/400x300/ff6b35/ffffff?text=Imagem+N%C3%A3o+Dispon%C3%ADvel";

/// Hosts the rewrite rules recognize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHosts {
    /// Share-page host, e.g. `imgur.com`.
    pub image_host: String,
    /// Host serving raw image bytes, e.g. `i.imgur.com`.
    pub direct_image_host: String,
    /// Extension appended when rewriting a share page to a direct link.
    pub image_extension: String,
    pub drive_host: String,
}

impl ImageHosts {
    /// Hosts for an image service whose direct form is `i.<host>`.
    #[must_use]
    pub fn for_image_host(host: &str) -> Self {
        Self {
            image_host: host.to_owned(),
            direct_image_host: format!("i.{host}"),
            ..Self::default()
        }
    }
}

impl Default for ImageHosts {
    fn default() -> Self {
        Self {
            image_host: "imgur.com".to_owned(),
            direct_image_host: "i.imgur.com".to_owned(),
            image_extension: ".jpg".to_owned(),
            drive_host: "drive.google.com".to_owned(),
        }
    }
}

/// One recognizer in the rewrite chain.
pub trait ImageRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the replacement URL when this rule claims `url` (already
    /// trimmed), or `None` to defer to the next rule.
    fn apply(&self, url: &str) -> Option<String>;
}

pub struct BlankSource;

impl ImageRule for BlankSource {
    fn name(&self) -> &'static str {
        "blank"
    }

    fn apply(&self, url: &str) -> Option<String> {
        url.is_empty().then(|| NO_IMAGE_PLACEHOLDER.to_owned())
    }
}

/// Album and gallery pages list several images and cannot be turned into a
/// single direct link without an API call.
pub struct AlbumUnsupported {
    host: String,
}

impl ImageRule for AlbumUnsupported {
    fn name(&self) -> &'static str {
        "album"
    }

    fn apply(&self, url: &str) -> Option<String> {
        let is_album = url.contains(&self.host) && (url.contains("/a/") || url.contains("/gallery/"));
        is_album.then(|| ALBUM_PLACEHOLDER.to_owned())
    }
}

pub struct DirectImage {
    direct_host: String,
}

impl ImageRule for DirectImage {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn apply(&self, url: &str) -> Option<String> {
        url.contains(&self.direct_host).then(|| url.to_owned())
    }
}

/// `https://imgur.com/p8jsjyx` → `https://i.imgur.com/p8jsjyx.jpg`.
pub struct SharePageRewrite {
    host: String,
    direct_host: String,
    extension: String,
}

impl ImageRule for SharePageRewrite {
    fn name(&self) -> &'static str {
        "share-page"
    }

    fn apply(&self, url: &str) -> Option<String> {
        if !url.contains(&self.host) {
            return None;
        }
        let id = trailing_segment(url)?;
        if id.contains('.') {
            return Some(format!("https://{}/{id}", self.direct_host));
        }
        Some(format!("https://{}/{id}{}", self.direct_host, self.extension))
    }
}

/// Drive viewer links (`.../file/d/<id>/view`) → direct-content links.
pub struct DriveRewrite {
    host: String,
    file_id: Regex,
}

impl DriveRewrite {
    fn new(host: &str) -> Self {
        Self {
            host: host.to_owned(),
            file_id: Regex::new(r"/d/([a-zA-Z0-9_-]+)").expect("valid drive id regex"),
        }
    }
}

impl ImageRule for DriveRewrite {
    fn name(&self) -> &'static str {
        "drive"
    }

    fn apply(&self, url: &str) -> Option<String> {
        if !url.contains(&self.host) {
            return None;
        }
        let id = self.file_id.captures(url)?.get(1)?.as_str();
        Some(format!("https://{}/uc?id={id}", self.host))
    }
}

pub struct MissingScheme;

impl ImageRule for MissingScheme {
    fn name(&self) -> &'static str {
        "missing-scheme"
    }

    fn apply(&self, url: &str) -> Option<String> {
        let has_scheme = url.starts_with("http://") || url.starts_with("https://");
        (!has_scheme).then(|| INVALID_URL_PLACEHOLDER.to_owned())
    }
}

/// Last non-empty path segment; query string and fragment never count.
///
/// Works on scheme-less links (`imgur.com/abc`) as well as absolute ones.
/// Returns `None` when the link has no path after the host.
fn trailing_segment(url: &str) -> Option<String> {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let without_query = without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let (_host, path) = without_query.split_once('/')?;
    path.split('/')
        .rfind(|s| !s.is_empty())
        .map(str::to_owned)
}

/// The rule chain, built once per normalizer.
pub struct ImageUrlRewriter {
    rules: Vec<Box<dyn ImageRule>>,
}

impl ImageUrlRewriter {
    #[must_use]
    pub fn new(hosts: &ImageHosts) -> Self {
        Self {
            rules: vec![
                Box::new(BlankSource),
                Box::new(AlbumUnsupported {
                    host: hosts.image_host.clone(),
                }),
                Box::new(DirectImage {
                    direct_host: hosts.direct_image_host.clone(),
                }),
                Box::new(SharePageRewrite {
                    host: hosts.image_host.clone(),
                    direct_host: hosts.direct_image_host.clone(),
                    extension: hosts.image_extension.clone(),
                }),
                Box::new(DriveRewrite::new(&hosts.drive_host)),
                Box::new(MissingScheme),
            ],
        }
    }

    /// Returns a usable image URL for a raw cell. Never empty.
    #[must_use]
    pub fn rewrite(&self, raw: Option<&str>) -> String {
        let url = raw.unwrap_or_default().trim();
        for rule in &self.rules {
            if let Some(rewritten) = rule.apply(url) {
                if rewritten != url {
                    tracing::debug!(rule = rule.name(), from = url, to = %rewritten, "rewrote image URL");
                }
                return rewritten;
            }
        }
        url.to_owned()
    }
}

impl Default for ImageUrlRewriter {
    fn default() -> Self {
        Self::new(&ImageHosts::default())
    }
}
