//! Markup for the grid container and the standalone page.
//!
//! The structure mirrors the host page contract the stylesheet expects:
//!
//! ```text
//! div#memories-grid                      masonry
//! └── a.masonry-item[href][data-index] > img
//!
//! div#memories-grid.memories-carousel    carousel
//! ├── div.row > div.carousel-track.dir-rtl[style=--scroll-duration]
//! │   └── a.item[href][data-index] > img   (subset, then the same subset again)
//! └── div.row > div.carousel-track.dir-ltr[style=--scroll-duration;--scroll-offset]
//!     └── a.item[href][data-index] > img
//! ```
//!
//! Presentation lives entirely in the external stylesheet; this module only
//! emits classes, attributes and the two animation custom properties.

use crate::grid::{GridView, Thumb, Track};
use maud::{DOCTYPE, Markup, html};

/// Renders the grid container with its thumbnails.
pub fn render_container(id: &str, classes: &[String], view: &GridView) -> Markup {
    let class = (!classes.is_empty()).then(|| classes.join(" "));
    html! {
        div id=(id) class=[class] {
            @match view {
                GridView::Masonry(thumbs) => {
                    @for thumb in thumbs {
                        (thumb_link(thumb, "masonry-item"))
                    }
                }
                GridView::Carousel(tracks) => {
                    @for track in tracks {
                        div.row {
                            (render_track(track))
                        }
                    }
                }
            }
        }
    }
}

fn render_track(track: &Track) -> Markup {
    html! {
        div class={ "carousel-track " (track.direction.class()) } style=(track_style(track)) {
            @for thumb in &track.items {
                (thumb_link(thumb, "item"))
            }
        }
    }
}

/// `--scroll-duration` and, for the second row, `--scroll-offset`.
pub fn track_style(track: &Track) -> String {
    match track.offset {
        Some(offset) => format!(
            "--scroll-duration: {}s; --scroll-offset: {}s",
            track.duration, offset
        ),
        None => format!("--scroll-duration: {}s", track.duration),
    }
}

/// A thumbnail anchor. `data-index` is the image's position in the manifest.
fn thumb_link(thumb: &Thumb, class: &str) -> Markup {
    let (width, height) = match thumb.size {
        Some((w, h)) => (Some(w), Some(h)),
        None => (None, None),
    };
    html! {
        a class=(class) href=(thumb.href) data-index=(thumb.index) {
            img src=(thumb.src) alt=(thumb.alt) loading="lazy" decoding="async"
                width=[width] height=[height];
        }
    }
}

/// Renders a complete HTML document around the widget markup.
pub fn base_document(title: &str, stylesheet: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href=(stylesheet);
            }
            body {
                (content)
            }
        }
    }
}
