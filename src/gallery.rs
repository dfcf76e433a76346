//! Widget bootstrap.
//!
//! Mounting runs the whole widget once against a host document:
//!
//! 1. Find the grid container by id. Missing container → no widget at all.
//! 2. Read the layout mode from the container's classes.
//! 3. Construct the lightbox (always present once mounted, even if no image
//!    ever loads).
//! 4. Resolve the manifest through the [`Loader`] chain.
//! 5. Lay out the grid and hand the list to the lightbox.
//!
//! After mounting, host events are routed through [`Gallery::click`],
//! [`Gallery::key`] and [`Gallery::dispatch`].

use crate::config::WidgetConfig;
use crate::grid::{GridView, Mode};
use crate::lightbox::{Key, Lightbox, LightboxEvent};
use crate::manifest::Loader;
use crate::markup;
use crate::types::ImageDescriptor;
use maud::{Markup, html};
use rand::Rng;
use std::rc::Rc;

/// An element of the host page.
#[derive(Debug, Clone, Default)]
pub struct HostElement {
    pub id: String,
    pub classes: Vec<String>,
    /// Text content, e.g. the JSON inside an embedded data script.
    pub text: Option<String>,
}

impl HostElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// The parts of the hosting page the widget reads.
#[derive(Debug, Clone, Default)]
pub struct HostDocument {
    pub elements: Vec<HostElement>,
}

impl HostDocument {
    pub fn with_element(mut self, element: HostElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<&HostElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Text of the embedded data element with the given id, if the page has one.
    pub fn inline_data(&self, id: &str) -> Option<String> {
        self.get_element_by_id(id).and_then(|e| e.text.clone())
    }
}

/// A mounted widget.
#[derive(Debug)]
pub struct Gallery {
    container: HostElement,
    images: Rc<[ImageDescriptor]>,
    grid: GridView,
    lightbox: Lightbox,
    source: Option<&'static str>,
    stylesheet: String,
}

impl Gallery {
    /// Mount the widget. Returns `None`, silently, when the page has no
    /// container.
    pub fn mount<R: Rng + ?Sized>(
        host: &HostDocument,
        config: &WidgetConfig,
        loader: &Loader,
        rng: &mut R,
    ) -> Option<Self> {
        let container = host.get_element_by_id(&config.container_id)?.clone();
        let mode = Mode::from_classes(&container.classes, &config.carousel_class);
        let mut lightbox = Lightbox::new();

        let loaded = loader.load();
        let images: Rc<[ImageDescriptor]> = Rc::from(loaded.images);
        let grid = GridView::build(&images, mode, &config.carousel, rng);
        lightbox.attach(Rc::clone(&images));
        log::debug!(
            "mounted #{} as {:?} with {} images",
            container.id,
            mode,
            images.len()
        );

        Some(Self {
            container,
            images,
            grid,
            lightbox,
            source: loaded.source,
            stylesheet: config.stylesheet.clone(),
        })
    }

    pub fn images(&self) -> &[ImageDescriptor] {
        &self.images
    }

    pub fn grid(&self) -> &GridView {
        &self.grid
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn mode(&self) -> Mode {
        self.grid.mode()
    }

    /// Which manifest source produced the images.
    pub fn source(&self) -> Option<&'static str> {
        self.source
    }

    /// A thumbnail was activated. Link navigation is suppressed and the
    /// lightbox opens at the thumbnail's recorded index.
    pub fn click(&mut self, index: usize) -> bool {
        self.lightbox.open(index as i64)
    }

    /// Global `keydown`, by `KeyboardEvent.key` name.
    pub fn key(&mut self, name: &str) {
        self.lightbox.handle(&LightboxEvent::Key(Key::from_name(name)));
    }

    pub fn dispatch(&mut self, event: &LightboxEvent) {
        self.lightbox.handle(event);
    }

    /// Container markup followed by the lightbox overlay.
    pub fn render(&self) -> Markup {
        html! {
            (markup::render_container(&self.container.id, &self.container.classes, &self.grid))
            (self.lightbox.render())
        }
    }

    /// A full HTML document around [`Gallery::render`].
    pub fn render_page(&self, title: &str) -> Markup {
        markup::base_document(title, &self.stylesheet, self.render())
    }
}
