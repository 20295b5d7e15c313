//! URL patterns that mark low-quality or high-quality images.
//!
//! All patterns run against the lowercased URL.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Serialize;

/// Word-ish boundary inside a URL: any non-alphanumeric character or an end.
macro_rules! token {
    ($alts:literal) => {
        concat!("(?:^|[^a-z0-9])(?:", $alts, ")(?:[^a-z0-9]|$)")
    };
}

static NOT_FOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(token!(
        "placeholders?|default|not[-_]?found|missing|no[-_]?image|image[-_]?unavailable"
    ))
    .unwrap()
});

static LOW_RESOLUTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(token!("low[-_]?res(?:olution)?|low[-_]?quality|lq")).unwrap()
});

static COMPRESSED: Lazy<Regex> = Lazy::new(|| Regex::new(token!("compressed")).unwrap());

static PREVIEW: Lazy<Regex> = Lazy::new(|| Regex::new(token!("previews?")).unwrap());

static THUMBNAIL: Lazy<Regex> = Lazy::new(|| Regex::new(token!("thumb(?:nail)?s?")).unwrap());

static SMALL: Lazy<Regex> = Lazy::new(|| Regex::new(token!("small|tiny")).unwrap());

static GRAINY: Lazy<Regex> =
    Lazy::new(|| Regex::new(token!("grainy|pixelated|pixellated")).unwrap());

/// Resize query parameters asking for three digits or fewer.
static TINY_PARAMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[?&](?:w|h|width|height|size|resize)=\d{1,3}(?:[&#]|$)").unwrap()
});

/// CDN size suffixes like `_640.jpg` or `-150x150.png`.
static TINY_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[_-]\d{2,3}(?:x\d{2,3})?\.(?:jpe?g|png|webp|gif)(?:[?#]|$)").unwrap()
});

static QUALITY_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(token!(
        "hd|fhd|qhd|uhd|4k|5k|8k|high[-_]?res(?:olution)?|hi[-_]?res|original|raw|full[-_]?(?:size|res)|large"
    ))
    .unwrap()
});

static QUALITY_DIMENSIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\d{4,5}x\d{4,5}|(?:19[2-9]\d|[2-9]\d{3})px|[?&](?:w|width)=(?:19[2-9]\d|[2-9]\d{3}|\d{5,})(?:[&#]|$)",
    )
    .unwrap()
});

/// A class of URL markers that indicate an unusable image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlacklistMarker {
    NotFound,
    LowResolution,
    Compressed,
    Preview,
    Thumbnail,
    Small,
    Grainy,
    TinyParams,
    TinySuffix,
}

impl BlacklistMarker {
    /// Every marker, checked by the strict profile.
    pub const STRICT: &'static [BlacklistMarker] = &[
        BlacklistMarker::NotFound,
        BlacklistMarker::LowResolution,
        BlacklistMarker::Compressed,
        BlacklistMarker::Preview,
        BlacklistMarker::Thumbnail,
        BlacklistMarker::Small,
        BlacklistMarker::Grainy,
        BlacklistMarker::TinyParams,
        BlacklistMarker::TinySuffix,
    ];

    /// The egregious subset checked by the relaxed profile.
    pub const RELAXED: &'static [BlacklistMarker] = &[
        BlacklistMarker::NotFound,
        BlacklistMarker::Grainy,
        BlacklistMarker::TinyParams,
        BlacklistMarker::TinySuffix,
    ];

    fn pattern(&self) -> &'static Regex {
        match self {
            BlacklistMarker::NotFound => &NOT_FOUND,
            BlacklistMarker::LowResolution => &LOW_RESOLUTION,
            BlacklistMarker::Compressed => &COMPRESSED,
            BlacklistMarker::Preview => &PREVIEW,
            BlacklistMarker::Thumbnail => &THUMBNAIL,
            BlacklistMarker::Small => &SMALL,
            BlacklistMarker::Grainy => &GRAINY,
            BlacklistMarker::TinyParams => &TINY_PARAMS,
            BlacklistMarker::TinySuffix => &TINY_SUFFIX,
        }
    }

    /// `url` must already be lowercased.
    pub fn matches(&self, url: &str) -> bool {
        self.pattern().is_match(url)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlacklistMarker::NotFound => "not_found",
            BlacklistMarker::LowResolution => "low_resolution",
            BlacklistMarker::Compressed => "compressed",
            BlacklistMarker::Preview => "preview",
            BlacklistMarker::Thumbnail => "thumbnail",
            BlacklistMarker::Small => "small",
            BlacklistMarker::Grainy => "grainy",
            BlacklistMarker::TinyParams => "tiny_params",
            BlacklistMarker::TinySuffix => "tiny_suffix",
        }
    }
}

/// Whether a lowercased URL advertises a large or original rendition.
pub fn has_quality_indicator(url: &str) -> bool {
    QUALITY_WORDS.is_match(url) || QUALITY_DIMENSIONS.is_match(url)
}
