//! Types for image queries and resolution results.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Subject classification of a query, drives provider priority.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FamousPerson,
    StockImage,
    #[default]
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::FamousPerson => "famous_person",
            Category::StockImage => "stock_image",
            Category::General => "general",
        }
    }
}

/// Output resolution tier requested by the video compositor.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ResolutionTarget {
    #[default]
    #[serde(rename = "1080p")]
    Hd1080,
    #[serde(rename = "4k")]
    Uhd4k,
}

impl ResolutionTarget {
    /// Pixel envelope to request for this tier.
    ///
    /// The envelope is larger than the render resolution so a slow pan/zoom
    /// still has source pixels to spare.
    pub fn envelope(&self) -> Dimensions {
        match self {
            ResolutionTarget::Hd1080 => Dimensions::new(2560, 1440),
            ResolutionTarget::Uhd4k => Dimensions::new(5120, 2880),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionTarget::Hd1080 => "1080p",
            ResolutionTarget::Uhd4k => "4k",
        }
    }
}

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Width divided by height. Callers must not pass a zero height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Scale to the given width, keeping the aspect ratio.
    pub fn scaled_to_width(&self, width: u32) -> Self {
        if self.width <= width || self.width == 0 {
            return *self;
        }
        let height = (self.height as u64 * width as u64 / self.width as u64) as u32;
        Self::new(width, height.max(1))
    }
}

/// Search request for one narrative segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageQuery {
    /// Free-text search query.
    pub text: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub resolution_target: ResolutionTarget,
    /// Number of images wanted (default: 1).
    #[serde(default = "default_count")]
    pub count: u32,
}

/// Largest number of images one query may ask for.
pub const MAX_IMAGE_COUNT: u32 = 50;

fn default_count() -> u32 {
    1
}

impl ImageQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: Category::default(),
            resolution_target: ResolutionTarget::default(),
            count: default_count(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_resolution(mut self, target: ResolutionTarget) -> Self {
        self.resolution_target = target;
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Requested count, clamped to `1..=MAX_IMAGE_COUNT`.
    pub fn effective_count(&self) -> u32 {
        self.count.clamp(1, MAX_IMAGE_COUNT)
    }
}

/// A single image candidate returned by a provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageResult {
    /// Provider that returned this image.
    pub provider_name: String,
    /// URL suitable for display/rendering.
    pub url: String,
    /// URL for fetching the full-size asset.
    pub download_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    /// Provider-specific extras (ids, license, landing page).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub provider_metadata: HashMap<String, String>,
}

impl ImageResult {
    pub fn new(provider_name: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            provider_name: provider_name.into(),
            download_url: url.clone(),
            url,
            width: None,
            height: None,
            description: None,
            attribution: None,
            provider_metadata: HashMap::new(),
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Known, positive dimensions. A missing or zero side counts as unknown.
    pub fn dimensions(&self) -> Option<Dimensions> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(Dimensions::new(w, h)),
            _ => None,
        }
    }
}

/// Images from a single provider that passed one quality profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultGroup {
    pub provider_name: String,
    pub query: ImageQuery,
    pub images: Vec<ImageResult>,
}

impl ResultGroup {
    pub fn new(provider_name: impl Into<String>, query: ImageQuery, images: Vec<ImageResult>) -> Self {
        Self {
            provider_name: provider_name.into(),
            query,
            images,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Result of one `resolve` call: zero or one group in practice.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResolutionOutcome {
    pub groups: Vec<ResultGroup>,
}

impl ResolutionOutcome {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(group: ResultGroup) -> Self {
        Self {
            groups: vec![group],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.is_empty())
    }

    pub fn first_group(&self) -> Option<&ResultGroup> {
        self.groups.first()
    }

    pub fn into_first_group(self) -> Option<ResultGroup> {
        self.groups.into_iter().next()
    }
}
