//! Shared test utilities for the memories test suite.
//!
//! Provides manifest fixtures, a recording [`Fetch`] double and a
//! deterministic random source.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let fetcher = CountingFetcher::ok(200, &three_images_json());
//! let requests = fetcher.requests();
//! let loaded = Loader::standard(&WidgetConfig::default(), None, fetcher).load();
//! assert_eq!(requests.borrow().len(), 1);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use rand::RngCore;

use crate::manifest::{Fetch, FetchError, FetchResponse};
use crate::types::ImageDescriptor;

// =========================================================================
// Manifest fixtures
// =========================================================================

/// `[{src: "a.jpg"}, {src: "b.jpg"}, {src: "c.jpg"}]`
pub fn three_images_json() -> String {
    r#"[{"src":"a.jpg"},{"src":"b.jpg"},{"src":"c.jpg"}]"#.to_string()
}

/// `n` descriptors `img/0.jpg`, `img/1.jpg`, ... titled by position.
pub fn numbered_images(n: usize) -> Vec<ImageDescriptor> {
    (0..n)
        .map(|i| ImageDescriptor::new(format!("img/{i}.jpg")).with_title(format!("Image {i}")))
        .collect()
}

// =========================================================================
// Fetch double
// =========================================================================

/// Answers every request the same way and records the requested URLs.
pub struct CountingFetcher {
    response: Option<FetchResponse>,
    requests: Rc<RefCell<Vec<String>>>,
}

impl CountingFetcher {
    pub fn ok(status: u16, body: &str) -> Self {
        Self {
            response: Some(FetchResponse {
                status,
                body: body.to_string(),
            }),
            requests: Rc::default(),
        }
    }

    /// Every request fails at the transport level.
    pub fn failing() -> Self {
        Self {
            response: None,
            requests: Rc::default(),
        }
    }

    /// Handle on the request log, usable after the fetcher is moved.
    pub fn requests(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.requests)
    }
}

impl Fetch for CountingFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        self.response.clone().ok_or_else(|| {
            FetchError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))
        })
    }
}

// =========================================================================
// Random source
// =========================================================================

/// A random source that always yields zero. Every range sample picks its
/// lower bound.
pub struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}
