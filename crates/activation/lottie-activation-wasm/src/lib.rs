//! wasm-bindgen interface for lazy Lottie activation.
//!
//! [`LottieActivator`] wires the core [`Controller`] to the browser:
//! markers are DOM elements, the runtime is the global `lottie` object,
//! deferred markers are watched by a shared `IntersectionObserver`, and
//! retries while `lottie` is still loading run on `setTimeout`.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use js_sys::Array;
use lottie_activation::{Controller, ControllerConfig, InitStatus};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Window};

mod console;
mod dom;
mod navigation;
mod runtime;
mod watcher;

pub use console::init_logging;
pub use dom::WebDocument;
pub use navigation::{install_back_link, BACK_LINK_CLASS, DEFAULT_BACK_HREF};
pub use runtime::{LottieRuntime, LOTTIE_GLOBAL};
pub use watcher::{intersection_supported, DomWatcher};

use watcher::ObserverClosure;

type WebController = Controller<WebDocument, LottieRuntime, DomWatcher>;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

struct Inner {
    window: Window,
    /// Set right after the `Rc` exists so the observer callback can hold a `Weak`.
    controller: RefCell<Option<WebController>>,
    /// The JS closure registered with the `IntersectionObserver`.
    observer_callback: RefCell<Option<ObserverClosure>>,
    /// Handle of the pending `setTimeout` retry, if any. At most one exists.
    retry_timer: Cell<Option<i32>>,
    /// Roots waiting to be scanned, in request order.
    pending_roots: RefCell<Vec<Element>>,
}

impl Inner {
    fn with_controller<T>(&self, f: impl FnOnce(&mut WebController) -> T) -> Option<T> {
        self.controller.borrow_mut().as_mut().map(f)
    }

    /// Queue `root` for scanning. While a retry is pending the root just
    /// joins the queue; the running timer scans it.
    fn request_scan(inner: &Rc<Inner>, root: Element) {
        {
            let mut roots = inner.pending_roots.borrow_mut();
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        if inner.retry_timer.get().is_none() {
            Inner::flush(inner);
        }
    }

    fn flush(inner: &Rc<Inner>) {
        inner.retry_timer.set(None);
        loop {
            let Some(root) = inner.pending_roots.borrow().first().cloned() else {
                return;
            };
            let Some(status) = inner.with_controller(|c| c.initialize(&root)) else {
                return;
            };
            match status {
                Ok(InitStatus::Ready(summary)) => {
                    log::debug!(
                        "lottie markers ready: {} activated, {} deferred",
                        summary.activated,
                        summary.observed
                    );
                    inner.pending_roots.borrow_mut().retain(|r| r != &root);
                }
                Ok(InitStatus::Waiting { retry_after, .. }) => {
                    Inner::schedule_retry(inner, retry_after.as_millis());
                    return;
                }
                Err(err) => {
                    log::error!("lottie activation stopped: {err}");
                    inner.pending_roots.borrow_mut().clear();
                    return;
                }
            }
        }
    }

    fn schedule_retry(inner: &Rc<Inner>, delay_ms: u128) {
        let weak: Weak<Inner> = Rc::downgrade(inner);
        let retry = Closure::once_into_js(move || {
            if let Some(inner) = weak.upgrade() {
                Inner::flush(&inner);
            }
        });
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match inner
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(retry.unchecked_ref(), delay)
        {
            Ok(id) => inner.retry_timer.set(Some(id)),
            Err(err) => log::error!("could not schedule lottie retry: {err:?}"),
        }
    }

    /// Cancel the pending retry and drop every queued root.
    fn cancel_retry(&self) {
        if let Some(id) = self.retry_timer.take() {
            self.window.clear_timeout_with_handle(id);
        }
        self.pending_roots.borrow_mut().clear();
    }
}

/// Browser-side activation controller.
///
/// # Example (JavaScript)
/// ```js
/// const activator = new LottieActivator({ root_margin_px: 50 });
/// activator.init();              // whole document
/// activator.init(someSection);   // newly inserted content; known markers are skipped
/// ```
#[wasm_bindgen]
pub struct LottieActivator {
    inner: Rc<Inner>,
}

#[wasm_bindgen]
impl LottieActivator {
    /// Create an activator. Pass a config object (see `ControllerConfig`) or
    /// undefined/null for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<LottieActivator, JsError> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let cfg: ControllerConfig = if jsvalue_is_undefined_or_null(&config) {
            ControllerConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;

        let inner = Rc::new(Inner {
            window,
            controller: RefCell::new(None),
            observer_callback: RefCell::new(None),
            retry_timer: Cell::new(None),
            pending_roots: RefCell::new(Vec::new()),
        });

        let watcher = if intersection_supported() {
            let weak = Rc::downgrade(&inner);
            let callback: ObserverClosure =
                Closure::wrap(Box::new(move |entries: Array, _observer: JsValue| {
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    let entries = watcher::entries_from_js(&entries);
                    inner.with_controller(|c| c.handle_intersections(entries));
                }) as Box<dyn FnMut(Array, JsValue)>);
            match DomWatcher::new(&callback, &cfg.root_margin()) {
                Ok(watcher) => {
                    *inner.observer_callback.borrow_mut() = Some(callback);
                    Some(watcher)
                }
                Err(err) => {
                    log::warn!("IntersectionObserver unusable, activating eagerly: {err:?}");
                    None
                }
            }
        } else {
            None
        };

        let controller = Controller::new(cfg, WebDocument, LottieRuntime::default(), watcher)
            .map_err(|e| JsError::new(&e.to_string()))?;
        *inner.controller.borrow_mut() = Some(controller);
        Ok(LottieActivator { inner })
    }

    /// Scan `root` (default: the whole document) once the page has parsed.
    /// Retries on a backoff while `lottie` has not loaded yet. Calls made
    /// while a retry is pending share that retry instead of starting another.
    #[wasm_bindgen]
    pub fn init(&self, root: Option<Element>) -> Result<(), JsError> {
        let document = self
            .inner
            .window
            .document()
            .ok_or_else(|| JsError::new("no document"))?;
        let root = match root {
            Some(root) => root,
            None => document
                .document_element()
                .ok_or_else(|| JsError::new("document has no root element"))?,
        };

        if navigation::document_is_loading(&document) {
            let weak = Rc::downgrade(&self.inner);
            let on_ready = Closure::once_into_js(move || {
                if let Some(inner) = weak.upgrade() {
                    Inner::request_scan(&inner, root);
                }
            });
            document
                .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
                .map_err(|e| JsError::new(&format!("DOMContentLoaded listener: {e:?}")))?;
        } else {
            Inner::request_scan(&self.inner, root);
        }
        Ok(())
    }

    /// Render a marker now, bypassing the viewport. Returns false if it was
    /// already rendered, has no source, or was never scanned.
    #[wasm_bindgen]
    pub fn activate(&self, element: &Element) -> bool {
        self.inner
            .with_controller(|c| c.marker_for(element).is_some_and(|id| c.activate(id)))
            .unwrap_or(false)
    }

    /// Tell the activator an element left the page; its pending observation is dropped.
    #[wasm_bindgen]
    pub fn forget(&self, element: &Element) -> bool {
        self.inner
            .with_controller(|c| c.forget(element).is_some())
            .unwrap_or(false)
    }

    /// Stop watching all pending markers and cancel any scheduled retry,
    /// together with the roots it was going to scan.
    #[wasm_bindgen]
    pub fn release(&self) {
        self.inner.cancel_retry();
        self.inner.with_controller(|c| c.release());
    }

    #[wasm_bindgen(js_name = pending_count)]
    pub fn pending_count(&self) -> usize {
        self.inner
            .with_controller(|c| c.pending_count())
            .unwrap_or(0)
    }

    #[wasm_bindgen(js_name = activated_count)]
    pub fn activated_count(&self) -> usize {
        self.inner
            .with_controller(|c| c.activated_count())
            .unwrap_or(0)
    }

    #[wasm_bindgen(js_name = observed_count)]
    pub fn observed_count(&self) -> usize {
        self.inner
            .with_controller(|c| c.observed_count())
            .unwrap_or(0)
    }

    /// Number of markers scanned so far.
    #[wasm_bindgen(js_name = marker_count)]
    pub fn marker_count(&self) -> usize {
        self.inner.with_controller(|c| c.len()).unwrap_or(0)
    }

    /// Whether deferred markers are watched (false = eager fallback).
    #[wasm_bindgen(js_name = lazy_enabled)]
    pub fn lazy_enabled(&self) -> bool {
        self.inner
            .with_controller(|c| c.has_watcher())
            .unwrap_or(false)
    }

    /// Failed runtime checks since the last completed scan.
    #[wasm_bindgen(js_name = retry_attempts)]
    pub fn retry_attempts(&self) -> u32 {
        self.inner
            .with_controller(|c| c.retry_attempts())
            .unwrap_or(0)
    }
}

impl Drop for LottieActivator {
    fn drop(&mut self) {
        self.inner.cancel_retry();
        if let Ok(mut slot) = self.inner.controller.try_borrow_mut() {
            if let Some(controller) = slot.as_mut() {
                controller.release();
                if let Some(watcher) = controller.watcher() {
                    watcher.disconnect();
                }
            }
        }
        // Drop the JS closure so it doesn't leak.
        self.inner.observer_callback.borrow_mut().take();
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
