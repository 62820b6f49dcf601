//! lottie-activation
//!
//! Host-agnostic lazy activation of embedded Lottie animations.
//!
//! A page carries zero or more *markers*: elements tagged with
//! `data-lottie-src` and a few optional attributes. The [`Controller`]
//! scans for them, renders `immediate` markers right away, and defers the
//! rest until they approach the viewport. The document, the animation
//! runtime, and the viewport watcher are supplied by the host through the
//! traits in [`host`]; `lottie-activation-wasm` implements them for the
//! browser.

pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod ids;
pub mod marker;

pub use crate::config::{ControllerConfig, RetryPolicy, DEFAULT_ASPECT_FIT, DEFAULT_SELECTOR};
pub use crate::controller::{Controller, InitStatus, ScanSummary};
pub use crate::error::ActivationError;
pub use crate::host::{AnimationRuntime, IntersectionEntry, MarkerDocument, ViewportWatcher};
pub use crate::ids::{IdAllocator, MarkerId};
pub use crate::marker::{
    MarkerConfig, MarkerState, RenderRequest, RendererKind, RendererSettings, ATTR_AUTOPLAY,
    ATTR_IMMEDIATE, ATTR_LOOP, ATTR_MARKER_ID, ATTR_RENDERER, ATTR_SRC,
};
