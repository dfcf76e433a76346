//! Grid layout: turns the image list into thumbnails.
//!
//! Two layouts are supported, selected by a class on the container:
//!
//! - **Masonry** (default): one thumbnail per image, manifest order.
//! - **Carousel**: the list is shuffled, split into two disjoint rows by
//!   alternating assignment, and each row's thumbnails are laid out twice in
//!   a row so a CSS scroll animation can loop without a visible seam.
//!
//! Every [`Thumb`] carries the index of its image in the original list. The
//! duplicated carousel copies are plain clones, so a click on any copy still
//! opens the lightbox at the original image.

use crate::config::CarouselConfig;
use crate::types::ImageDescriptor;
use rand::Rng;

/// Layout mode, read from the container's classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Masonry,
    Carousel,
}

impl Mode {
    pub fn from_classes<S: AsRef<str>>(classes: &[S], carousel_class: &str) -> Self {
        if classes.iter().any(|c| c.as_ref() == carousel_class) {
            Mode::Carousel
        } else {
            Mode::Masonry
        }
    }
}

/// A clickable thumbnail: `a[href][data-index] > img`.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumb {
    /// Position of the image in the original list.
    pub index: usize,
    /// Link target, the full-size image.
    pub href: String,
    pub src: String,
    pub alt: String,
    pub size: Option<(u32, u32)>,
}

impl Thumb {
    pub fn new(index: usize, image: &ImageDescriptor) -> Self {
        Self {
            index,
            href: image.full_url().to_string(),
            src: image.thumb_url().to_string(),
            alt: image.grid_alt().to_string(),
            size: image.size_hint(),
        }
    }
}

/// Scroll direction of a carousel track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    RightToLeft,
    LeftToRight,
}

impl Direction {
    pub fn class(self) -> &'static str {
        match self {
            Direction::RightToLeft => "dir-rtl",
            Direction::LeftToRight => "dir-ltr",
        }
    }
}

/// One carousel row.
#[derive(Debug, Clone)]
pub struct Track {
    pub direction: Direction,
    /// The row's subset followed by an identical second copy.
    pub items: Vec<Thumb>,
    /// `--scroll-duration`, seconds.
    pub duration: f64,
    /// `--scroll-offset`, seconds.
    pub offset: Option<f64>,
}

impl Track {
    fn looped(
        direction: Direction,
        subset: Vec<Thumb>,
        duration: f64,
        offset: Option<f64>,
    ) -> Self {
        let mut items = Vec::with_capacity(subset.len() * 2);
        items.extend(subset.iter().cloned());
        items.extend(subset);
        Self {
            direction,
            items,
            duration,
            offset,
        }
    }

    /// The distinct thumbnails of this row (the first copy).
    pub fn subset(&self) -> &[Thumb] {
        &self.items[..self.items.len() / 2]
    }
}

/// Row timings for a carousel of `count` images.
///
/// Row 1 runs `max(min_duration, count * seconds_per_image)` seconds. Row 2 is
/// a little faster and starts partway through its loop so the rows never line
/// up. Row 2 values are rounded to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub first: f64,
    pub second: f64,
    pub second_offset: f64,
}

impl Timing {
    pub fn for_count(count: usize, config: &CarouselConfig) -> Self {
        let base = config
            .min_duration
            .max(count as f64 * config.seconds_per_image);
        Self {
            first: base,
            second: (base * config.second_row_speed).round(),
            second_offset: (base * config.second_row_offset).round(),
        }
    }
}

/// The laid-out grid.
#[derive(Debug, Clone)]
pub enum GridView {
    Masonry(Vec<Thumb>),
    Carousel([Track; 2]),
}

impl GridView {
    pub fn build<R: Rng + ?Sized>(
        images: &[ImageDescriptor],
        mode: Mode,
        config: &CarouselConfig,
        rng: &mut R,
    ) -> Self {
        match mode {
            Mode::Masonry => GridView::masonry(images),
            Mode::Carousel => GridView::carousel(images, config, rng),
        }
    }

    pub fn masonry(images: &[ImageDescriptor]) -> Self {
        GridView::Masonry(
            images
                .iter()
                .enumerate()
                .map(|(i, image)| Thumb::new(i, image))
                .collect(),
        )
    }

    pub fn carousel<R: Rng + ?Sized>(
        images: &[ImageDescriptor],
        config: &CarouselConfig,
        rng: &mut R,
    ) -> Self {
        let mut entries: Vec<Thumb> = images
            .iter()
            .enumerate()
            .map(|(i, image)| Thumb::new(i, image))
            .collect();
        shuffle(&mut entries, rng);
        let (first, second) = alternate(entries);
        let timing = Timing::for_count(images.len(), config);

        GridView::Carousel([
            Track::looped(Direction::RightToLeft, first, timing.first, None),
            Track::looped(
                Direction::LeftToRight,
                second,
                timing.second,
                Some(timing.second_offset),
            ),
        ])
    }

    pub fn mode(&self) -> Mode {
        match self {
            GridView::Masonry(_) => Mode::Masonry,
            GridView::Carousel(_) => Mode::Carousel,
        }
    }

    /// Every rendered thumbnail, in document order (carousel copies included).
    pub fn thumbs(&self) -> Vec<&Thumb> {
        match self {
            GridView::Masonry(thumbs) => thumbs.iter().collect(),
            GridView::Carousel(tracks) => tracks.iter().flat_map(|t| t.items.iter()).collect(),
        }
    }
}

/// Fisher–Yates shuffle: walk from the back, swapping each slot with a
/// uniformly chosen slot at or before it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Split by position: even positions to the first half, odd to the second.
fn alternate<T>(items: Vec<T>) -> (Vec<T>, Vec<T>) {
    let mut first = Vec::with_capacity(items.len().div_ceil(2));
    let mut second = Vec::with_capacity(items.len() / 2);
    for (pos, item) in items.into_iter().enumerate() {
        if pos % 2 == 0 {
            first.push(item);
        } else {
            second.push(item);
        }
    }
    (first, second)
}
