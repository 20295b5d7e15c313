//! Rule sets and the shared predicate engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::imagery::{Dimensions, ImageResult};

use super::markers::{has_quality_indicator, BlacklistMarker};

/// Named quality profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QualityProfile {
    Strict,
    Relaxed,
}

impl QualityProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityProfile::Strict => "strict",
            QualityProfile::Relaxed => "relaxed",
        }
    }
}

impl fmt::Display for QualityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single acceptance predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Reject URLs matching any of these markers.
    Blacklist(&'static [BlacklistMarker]),
    /// Without known dimensions, the URL must advertise a large rendition.
    QualityIndicatorWhenDimensionless,
    MinWidth(u32),
    MinHeight(u32),
    MinPixels(u64),
    AspectRatio { min: f64, max: f64 },
}

/// Why a candidate was dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Blacklisted(BlacklistMarker),
    NoQualityIndicator,
    TooNarrow { width: u32, min: u32 },
    TooShort { height: u32, min: u32 },
    TooFewPixels { pixels: u64, min: u64 },
    AspectRatio { ratio: f64, min: f64, max: f64 },
}

impl Rejection {
    /// Short label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::Blacklisted(marker) => marker.as_str(),
            Rejection::NoQualityIndicator => "no_quality_indicator",
            Rejection::TooNarrow { .. } => "min_width",
            Rejection::TooShort { .. } => "min_height",
            Rejection::TooFewPixels { .. } => "min_pixels",
            Rejection::AspectRatio { .. } => "aspect_ratio",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Blacklisted(marker) => write!(f, "url matches {} marker", marker.as_str()),
            Rejection::NoQualityIndicator => {
                write!(f, "no dimensions and no quality indicator in url")
            }
            Rejection::TooNarrow { width, min } => write!(f, "width {} < {}", width, min),
            Rejection::TooShort { height, min } => write!(f, "height {} < {}", height, min),
            Rejection::TooFewPixels { pixels, min } => write!(f, "{} pixels < {}", pixels, min),
            Rejection::AspectRatio { ratio, min, max } => {
                write!(f, "aspect ratio {:.2} outside [{}, {}]", ratio, min, max)
            }
        }
    }
}

impl Rule {
    fn check(&self, url: &str, dims: Option<Dimensions>) -> Result<(), Rejection> {
        match (self, dims) {
            (Rule::Blacklist(markers), _) => match markers.iter().find(|m| m.matches(url)) {
                Some(marker) => Err(Rejection::Blacklisted(*marker)),
                None => Ok(()),
            },
            (Rule::QualityIndicatorWhenDimensionless, None) => {
                if has_quality_indicator(url) {
                    Ok(())
                } else {
                    Err(Rejection::NoQualityIndicator)
                }
            }
            (Rule::MinWidth(min), Some(d)) if d.width < *min => Err(Rejection::TooNarrow {
                width: d.width,
                min: *min,
            }),
            (Rule::MinHeight(min), Some(d)) if d.height < *min => Err(Rejection::TooShort {
                height: d.height,
                min: *min,
            }),
            (Rule::MinPixels(min), Some(d)) if d.pixels() < *min => {
                Err(Rejection::TooFewPixels {
                    pixels: d.pixels(),
                    min: *min,
                })
            }
            (Rule::AspectRatio { min, max }, Some(d)) => {
                let ratio = d.aspect_ratio();
                if ratio < *min || ratio > *max {
                    Err(Rejection::AspectRatio {
                        ratio,
                        min: *min,
                        max: *max,
                    })
                } else {
                    Ok(())
                }
            }
            // Dimension rules pass when dimensions are unknown and vice versa.
            _ => Ok(()),
        }
    }
}

/// Stateless evaluator for one profile.
#[derive(Debug, Clone)]
pub struct QualityGate {
    profile: QualityProfile,
    rules: Vec<Rule>,
}

impl QualityGate {
    pub fn new(profile: QualityProfile) -> Self {
        let rules = match profile {
            QualityProfile::Strict => vec![
                Rule::Blacklist(BlacklistMarker::STRICT),
                Rule::QualityIndicatorWhenDimensionless,
                Rule::MinWidth(2560),
                Rule::MinHeight(1440),
                Rule::MinPixels(3_686_400),
                Rule::AspectRatio { min: 0.5, max: 3.0 },
            ],
            QualityProfile::Relaxed => vec![
                Rule::Blacklist(BlacklistMarker::RELAXED),
                Rule::MinWidth(1920),
                Rule::MinHeight(1080),
                Rule::MinPixels(2_073_600),
                Rule::AspectRatio { min: 0.3, max: 4.0 },
            ],
        };
        Self { profile, rules }
    }

    pub fn strict() -> Self {
        Self::new(QualityProfile::Strict)
    }

    pub fn relaxed() -> Self {
        Self::new(QualityProfile::Relaxed)
    }

    pub fn profile(&self) -> QualityProfile {
        self.profile
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run the rules in order, stopping at the first failure.
    pub fn evaluate(&self, image: &ImageResult) -> Result<(), Rejection> {
        let url = image.url.to_lowercase();
        let dims = image.dimensions();
        self.rules
            .iter()
            .try_for_each(|rule| rule.check(&url, dims))
    }

    pub fn passes(&self, image: &ImageResult) -> bool {
        self.evaluate(image).is_ok()
    }

    /// Split candidates into accepted images and rejections.
    pub fn partition(&self, images: Vec<ImageResult>) -> (Vec<ImageResult>, Vec<Rejection>) {
        let mut accepted = Vec::with_capacity(images.len());
        let mut rejected = Vec::new();
        for image in images {
            match self.evaluate(&image) {
                Ok(()) => accepted.push(image),
                Err(rejection) => rejected.push(rejection),
            }
        }
        (accepted, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(url: &str, width: u32, height: u32) -> ImageResult {
        ImageResult::new("test", url).with_dimensions(width, height)
    }

    #[test]
    fn test_strict_rejects_below_minimums_regardless_of_url() {
        let gate = QualityGate::strict();
        let url = "https://x.org/original/uhd-4k.jpg";

        assert!(matches!(
            gate.evaluate(&image(url, 2559, 2000)),
            Err(Rejection::TooNarrow { .. })
        ));
        assert!(matches!(
            gate.evaluate(&image(url, 4000, 1439)),
            Err(Rejection::TooShort { .. })
        ));
        assert!(gate.passes(&image(url, 2560, 1440)));
    }

    #[test]
    fn test_strict_rejects_extreme_aspect_ratio() {
        let gate = QualityGate::strict();
        assert!(!gate.passes(&image("https://x.org/wide.jpg", 5000, 100)));

        // Tall enough but ratio 3.2
        let result = gate.evaluate(&image("https://x.org/pano.jpg", 9600, 3000));
        assert!(matches!(result, Err(Rejection::AspectRatio { .. })));
    }

    #[test]
    fn test_thumb_url_strict_rejects_relaxed_accepts() {
        let candidate = image("https://cdn.example.com/thumb/rome.jpg", 1920, 1080);

        assert_eq!(
            QualityGate::strict().evaluate(&candidate),
            Err(Rejection::Blacklisted(BlacklistMarker::Thumbnail))
        );
        assert!(QualityGate::relaxed().passes(&candidate));
    }

    #[test]
    fn test_800x600_fails_both_profiles() {
        let candidate = image("https://x.org/a.jpg", 800, 600);
        assert!(!QualityGate::strict().passes(&candidate));
        assert!(!QualityGate::relaxed().passes(&candidate));
    }

    #[test]
    fn test_relaxed_aspect_ratio_bounds() {
        let gate = QualityGate::relaxed();
        assert!(gate.passes(&image("https://x.org/pano.jpg", 9600, 3000)));
        assert!(!gate.passes(&image("https://x.org/pano.jpg", 9000, 2000)));
    }

    #[test]
    fn test_dimensionless_strict_needs_quality_indicator() {
        let gate = QualityGate::strict();
        let plain = ImageResult::new("test", "https://x.org/photos/rome.jpg");
        let original = ImageResult::new("test", "https://x.org/photos/original/rome.jpg");

        assert_eq!(gate.evaluate(&plain), Err(Rejection::NoQualityIndicator));
        assert!(gate.passes(&original));
    }

    #[test]
    fn test_dimensionless_relaxed_only_checks_blacklist() {
        let gate = QualityGate::relaxed();
        assert!(gate.passes(&ImageResult::new("test", "https://x.org/photos/rome.jpg")));
        assert!(gate.passes(&ImageResult::new("test", "https://x.org/thumb/rome.jpg")));
        assert!(!gate.passes(&ImageResult::new("test", "https://x.org/placeholder.png")));
        assert!(!gate.passes(&ImageResult::new("test", "https://x.org/a.jpg?w=200")));
    }

    #[test]
    fn test_blacklist_runs_before_dimensions() {
        let gate = QualityGate::relaxed();
        let result = gate.evaluate(&image("https://x.org/grainy-scan.jpg", 6000, 4000));
        assert_eq!(result, Err(Rejection::Blacklisted(BlacklistMarker::Grainy)));
    }

    #[test]
    fn test_partition() {
        let gate = QualityGate::strict();
        let (accepted, rejected) = gate.partition(vec![
            image("https://x.org/a.jpg", 3000, 2000),
            image("https://x.org/b.jpg", 800, 600),
            image("https://x.org/small/c.jpg", 3000, 2000),
        ]);

        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].url, "https://x.org/a.jpg");
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].reason(), "min_width");
        assert_eq!(rejected[1].reason(), "small");
    }

    #[test]
    fn test_gate_is_deterministic() {
        let gate = QualityGate::strict();
        let candidate = image("https://x.org/a.jpg", 3000, 2000);
        let first = gate.evaluate(&candidate);
        for _ in 0..10 {
            assert_eq!(gate.evaluate(&candidate), first);
        }
    }
}
