//! `IntersectionObserver` as the shared [`ViewportWatcher`].

use js_sys::{Array, Reflect};
use lottie_activation::{IntersectionEntry, ViewportWatcher};
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

pub(crate) type ObserverClosure = Closure<dyn FnMut(Array, JsValue)>;

/// Whether the host exposes `IntersectionObserver` at all.
pub fn intersection_supported() -> bool {
    Reflect::has(&js_sys::global(), &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

#[derive(Debug)]
pub struct DomWatcher {
    observer: IntersectionObserver,
}

impl DomWatcher {
    /// Build an observer with `root_margin` (CSS margin string) that forwards
    /// every batch of entries to `callback`.
    pub(crate) fn new(callback: &ObserverClosure, root_margin: &str) -> Result<Self, JsValue> {
        let options = IntersectionObserverInit::new();
        options.set_root_margin(root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        Ok(Self { observer })
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl ViewportWatcher<Element> for DomWatcher {
    fn observe(&mut self, node: &Element) {
        self.observer.observe(node);
    }

    fn unobserve(&mut self, node: &Element) {
        self.observer.unobserve(node);
    }
}

/// Convert the observer's entry array into core entries.
pub(crate) fn entries_from_js(entries: &Array) -> Vec<IntersectionEntry<Element>> {
    entries
        .iter()
        .filter_map(|raw| raw.dyn_into::<IntersectionObserverEntry>().ok())
        .map(|entry| IntersectionEntry {
            target: entry.target(),
            is_intersecting: entry.is_intersecting(),
        })
        .collect()
}
