//! # Memories
//!
//! A small image gallery widget. It loads a list of image descriptors, lays
//! them out as a masonry grid or as a dual-row auto-scrolling carousel, and
//! shows a full-screen lightbox with keyboard and click navigation.
//!
//! # Data Flow
//!
//! ```text
//! HostDocument ──► Gallery::mount
//!                   ├── container by id   (absent → no widget)
//!                   ├── Lightbox::new     (always injected once mounted)
//!                   ├── Loader            inline → remote → fallback
//!                   ├── GridView          masonry | carousel
//!                   └── Lightbox::attach  shared Rc<[ImageDescriptor]>
//!
//! click(index) / key(name) / dispatch(event) ──► Lightbox
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `ImageDescriptor` and the two accepted manifest shapes |
//! | [`manifest`] | Source chain (inline, remote, fallback) and fetchers |
//! | [`grid`] | Masonry and carousel layout, Fisher–Yates shuffle, row timing |
//! | [`markup`] | Maud markup for the grid container and standalone page |
//! | [`lightbox`] | Overlay state machine, navigation, preload hints |
//! | [`gallery`] | Bootstrap: host document, mounting, event routing |
//! | [`config`] | `memories.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Clones Carry Data, Not Handlers
//!
//! The carousel lays each row out twice for a seamless scroll loop. Every
//! copy is a plain clone of a [`grid::Thumb`], which carries the image's
//! original index. Clicks are dispatched by that index, so a copy behaves
//! exactly like the thumbnail it was cloned from.
//!
//! ## Never Fail Visibly
//!
//! Every loading failure degrades to the next source, and the last source is
//! a fixed placeholder set. The worst outcome of a broken manifest is a grid
//! of placeholders; the worst outcome of an empty one is an empty grid and a
//! lightbox that never opens.
//!
//! ## Injectable Randomness
//!
//! The carousel shuffle takes any [`rand::Rng`], so a seeded generator
//! reproduces a layout exactly.

pub mod config;
pub mod gallery;
pub mod grid;
pub mod lightbox;
pub mod manifest;
pub mod markup;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
