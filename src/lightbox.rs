//! Full-screen lightbox viewer.
//!
//! A small state machine over the shared image list: open or closed, plus the
//! index of the image on display. Navigation wraps in both directions, so
//! `next()` from the last image shows the first.
//!
//! Opening an image also records its two neighbours as preload targets; the
//! overlay markup carries them as hidden `img.preload` elements so the browser
//! fetches them in the background without displaying them.

use crate::types::ImageDescriptor;
use maud::{Markup, html};
use std::rc::Rc;

/// Keyboard input, named as in `KeyboardEvent.key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            other => Key::Other(other.to_string()),
        }
    }
}

/// User input directed at the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightboxEvent {
    CloseButton,
    PrevButton,
    NextButton,
    /// Click on the overlay background, outside the image area.
    Backdrop,
    /// Click inside the image area.
    Figure,
    Key(Key),
}

#[derive(Debug)]
pub struct Lightbox {
    images: Rc<[ImageDescriptor]>,
    is_open: bool,
    current: usize,
}

impl Default for Lightbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lightbox {
    /// A closed lightbox with no images yet.
    pub fn new() -> Self {
        Self {
            images: Rc::from(Vec::new()),
            is_open: false,
            current: 0,
        }
    }

    /// Hand over the resolved list. Called once, after loading.
    pub fn attach(&mut self, images: Rc<[ImageDescriptor]>) {
        self.images = images;
        self.current = 0;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// The image on display, if open.
    pub fn current_image(&self) -> Option<&ImageDescriptor> {
        if self.is_open {
            self.images.get(self.current)
        } else {
            None
        }
    }

    /// Show the image at `index`, wrapping out-of-range and negative values.
    ///
    /// Returns `false` (and stays closed) when there are no images.
    pub fn open(&mut self, index: i64) -> bool {
        let Some(current) = wrap(index, self.images.len()) else {
            return false;
        };
        self.current = current;
        self.is_open = true;
        true
    }

    /// Hide the overlay. The current index is kept.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn next(&mut self) -> bool {
        self.open(self.current as i64 + 1)
    }

    pub fn prev(&mut self) -> bool {
        self.open(self.current as i64 - 1)
    }

    /// URLs of the previous and next images, to fetch ahead of navigation.
    pub fn preload_targets(&self) -> Vec<&str> {
        if !self.is_open {
            return Vec::new();
        }
        let current = self.current as i64;
        [current - 1, current + 1]
            .into_iter()
            .filter_map(|i| wrap(i, self.images.len()))
            .map(|i| self.images[i].full_url())
            .collect()
    }

    /// Apply user input. Everything is ignored while the overlay is closed.
    pub fn handle(&mut self, event: &LightboxEvent) {
        if !self.is_open {
            return;
        }
        match event {
            LightboxEvent::CloseButton | LightboxEvent::Backdrop => self.close(),
            LightboxEvent::PrevButton => {
                self.prev();
            }
            LightboxEvent::NextButton => {
                self.next();
            }
            LightboxEvent::Figure => {}
            LightboxEvent::Key(key) => match key {
                Key::Escape => self.close(),
                Key::ArrowRight => {
                    self.next();
                }
                Key::ArrowLeft => {
                    self.prev();
                }
                Key::Other(_) => {}
            },
        }
    }

    /// Overlay markup. Always present in the page; `is-open` toggles it.
    pub fn render(&self) -> Markup {
        let image = self.current_image();
        html! {
            div.lightbox.is-open[self.is_open] id="lightbox" {
                div.lightbox-inner {
                    button.close-btn type="button" title="Close" { "x" }
                    button.nav-btn.prev type="button" title="Previous" { "<" }
                    button.nav-btn.next type="button" title="Next" { ">" }
                    figure {
                        @if let Some(image) = image {
                            img src=(image.full_url()) alt=(image.lightbox_alt());
                            figcaption { (image.caption()) }
                        } @else {
                            img alt="";
                            figcaption {}
                        }
                    }
                }
                @for href in self.preload_targets() {
                    img.preload src=(href) alt="" decoding="async" hidden;
                }
            }
        }
    }
}

/// `((i % n) + n) % n`, or `None` for an empty list.
fn wrap(index: i64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(index.rem_euclid(len as i64) as usize)
}
