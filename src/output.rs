//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.
//!
//! ## Mount summary
//!
//! ```text
//! Manifest: remote (3 images)
//! Layout: masonry
//!     000 Dawn → dawn.webp
//!     001 dawn-2.webp
//! ```
//!
//! Carousel layouts list each row with its timing:
//!
//! ```text
//! Layout: carousel
//!     Row 1 (dir-rtl, 2 images, 44s)
//!         001 Harbour
//!         000 Dawn
//!     Row 2 (dir-ltr, 1 image, 40s, offset 13s)
//!         002 Fields
//! ```
//!
//! ## Lightbox state
//!
//! ```text
//! click:1     open 2/3 b.webp "Harbour"
//! right       open 3/3 c.webp
//! escape      closed
//! ```

use crate::gallery::Gallery;
use crate::grid::{GridView, Thumb};
use crate::lightbox::Lightbox;
use crate::types::ImageDescriptor;

fn plural(n: usize) -> &'static str {
    if n == 1 { "image" } else { "images" }
}

fn thumb_line(thumb: &Thumb, images: &[ImageDescriptor]) -> String {
    match images.get(thumb.index).and_then(|i| i.title.as_deref()) {
        Some(title) => format!("{:03} {} → {}", thumb.index, title, thumb.href),
        None => format!("{:03} {}", thumb.index, thumb.href),
    }
}

/// Manifest source and grid layout of a mounted gallery.
pub fn format_mount(gallery: &Gallery) -> Vec<String> {
    let images = gallery.images();
    let mut lines = vec![format!(
        "Manifest: {} ({} {})",
        gallery.source().unwrap_or("none"),
        images.len(),
        plural(images.len())
    )];

    match gallery.grid() {
        GridView::Masonry(thumbs) => {
            lines.push("Layout: masonry".to_string());
            for thumb in thumbs {
                lines.push(format!("    {}", thumb_line(thumb, images)));
            }
        }
        GridView::Carousel(tracks) => {
            lines.push("Layout: carousel".to_string());
            for (row, track) in tracks.iter().enumerate() {
                let subset = track.subset();
                let mut header = format!(
                    "    Row {} ({}, {} {}, {}s",
                    row + 1,
                    track.direction.class(),
                    subset.len(),
                    plural(subset.len()),
                    track.duration
                );
                if let Some(offset) = track.offset {
                    header.push_str(&format!(", offset {offset}s"));
                }
                header.push(')');
                lines.push(header);
                for thumb in subset {
                    lines.push(format!("        {}", thumb_line(thumb, images)));
                }
            }
        }
    }
    lines
}

pub fn print_mount(gallery: &Gallery) {
    for line in format_mount(gallery) {
        println!("{}", line);
    }
}

/// One-line lightbox state, e.g. `open 2/3 b.webp "Harbour"`.
pub fn format_lightbox(lightbox: &Lightbox) -> String {
    match lightbox.current_image() {
        Some(image) => {
            let mut line = format!(
                "open {}/{} {}",
                lightbox.current_index() + 1,
                lightbox.len(),
                image.full_url()
            );
            if !image.caption().is_empty() {
                line.push_str(&format!(" {:?}", image.caption()));
            }
            line
        }
        None => "closed".to_string(),
    }
}

/// State after each replayed event, labelled with the event as typed.
pub fn format_step(event: &str, lightbox: &Lightbox) -> String {
    format!("{:<11} {}", event, format_lightbox(lightbox))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use crate::gallery::{HostDocument, HostElement};
    use crate::manifest::{Loader, Offline};
    use crate::test_helpers::ZeroRng;

    fn mount(inline: &str, carousel: bool) -> Gallery {
        let config = WidgetConfig::default();
        let mut container = HostElement::new("memories-grid");
        if carousel {
            container = container.with_class("memories-carousel");
        }
        let host = HostDocument::default()
            .with_element(container)
            .with_element(HostElement::new("memories-data").with_text(inline));
        let loader = Loader::standard(&config, host.inline_data(&config.inline_data_id), Offline);
        Gallery::mount(&host, &config, &loader, &mut ZeroRng).unwrap()
    }

    const MANIFEST: &str = r#"[
        {"src":"a.webp","title":"Dawn"},
        {"src":"b.webp","full":"b-full.webp","title":"Harbour"},
        {"src":"c.webp"}
    ]"#;

    #[test]
    fn masonry_summary() {
        let lines = format_mount(&mount(MANIFEST, false));
        assert_eq!(
            lines,
            [
                "Manifest: inline (3 images)",
                "Layout: masonry",
                "    000 Dawn → a.webp",
                "    001 Harbour → b-full.webp",
                "    002 c.webp",
            ]
        );
    }

    #[test]
    fn carousel_summary() {
        // Zero source rotates [0, 1, 2] to [1, 2, 0]
        let lines = format_mount(&mount(MANIFEST, true));
        assert_eq!(
            lines,
            [
                "Manifest: inline (3 images)",
                "Layout: carousel",
                "    Row 1 (dir-rtl, 2 images, 44s)",
                "        001 Harbour → b-full.webp",
                "        000 Dawn → a.webp",
                "    Row 2 (dir-ltr, 1 image, 40s, offset 13s)",
                "        002 c.webp",
            ]
        );
    }

    #[test]
    fn lightbox_lines() {
        let mut gallery = mount(MANIFEST, false);
        assert_eq!(format_lightbox(gallery.lightbox()), "closed");
        gallery.click(1);
        assert_eq!(
            format_lightbox(gallery.lightbox()),
            r#"open 2/3 b-full.webp "Harbour""#
        );
        gallery.key("ArrowRight");
        assert_eq!(format_lightbox(gallery.lightbox()), "open 3/3 c.webp");
        assert_eq!(
            format_step("right", gallery.lightbox()),
            "right       open 3/3 c.webp"
        );
    }
}
