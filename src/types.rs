//! Image descriptors and the manifest document shape.
//!
//! The same JSON shape is accepted from every source (inline data element and
//! fetched manifest alike):
//!
//! ```json
//! [{ "src": "a.webp", "title": "Dawn" }]
//! ```
//!
//! or
//!
//! ```json
//! { "images": [{ "src": "a.webp", "title": "Dawn" }] }
//! ```

use serde::{Deserialize, Serialize};

/// Alt text used in the grid when a descriptor has neither `alt` nor `title`.
pub const DEFAULT_ALT: &str = "Memory photo";

/// One entry of the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Display URL, used when `thumb` or `full` are absent.
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Intrinsic width hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    /// Intrinsic height hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
}

impl ImageDescriptor {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            thumb: None,
            full: None,
            title: None,
            alt: None,
            w: None,
            h: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// URL for the grid thumbnail: `thumb`, else `src`.
    pub fn thumb_url(&self) -> &str {
        self.thumb.as_deref().unwrap_or(&self.src)
    }

    /// URL for the lightbox and the link target: `full`, else `src`.
    pub fn full_url(&self) -> &str {
        self.full.as_deref().unwrap_or(&self.src)
    }

    /// Caption text, empty when untitled.
    pub fn caption(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Alt text for grid thumbnails: `alt`, then `title`, then [`DEFAULT_ALT`].
    pub fn grid_alt(&self) -> &str {
        self.alt
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or(DEFAULT_ALT)
    }

    /// Alt text for the lightbox image: `alt` or empty.
    pub fn lightbox_alt(&self) -> &str {
        self.alt.as_deref().unwrap_or("")
    }

    /// Width and height in whole pixels, only when both hints are present
    /// and positive.
    pub fn size_hint(&self) -> Option<(u32, u32)> {
        match (self.w, self.h) {
            (Some(w), Some(h)) if w >= 1.0 && h >= 1.0 => {
                Some((w.round() as u32, h.round() as u32))
            }
            _ => None,
        }
    }
}

/// The two accepted manifest shapes.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ManifestDocument {
    List(Vec<ImageDescriptor>),
    Wrapped {
        #[serde(default)]
        images: Option<Vec<ImageDescriptor>>,
    },
}

impl ManifestDocument {
    /// Parse either shape from JSON text.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn into_images(self) -> Vec<ImageDescriptor> {
        match self {
            ManifestDocument::List(images) => images,
            ManifestDocument::Wrapped { images } => images.unwrap_or_default(),
        }
    }
}
