//! Host seams. The controller reaches the document, the animation runtime,
//! and the viewport watcher only through these traits.

use crate::marker::RenderRequest;

/// The tree of displayable elements the markers live in.
pub trait MarkerDocument {
    /// Equality must be node identity: two distinct elements with identical
    /// attributes compare unequal.
    type Node: Clone + PartialEq;

    /// Descendants of `root` matching `selector`, in document order.
    fn find_markers(&self, root: &Self::Node, selector: &str) -> Vec<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);
}

/// The external animation-playback library.
pub trait AnimationRuntime<N> {
    /// Whether the library has finished loading.
    fn is_available(&self) -> bool;

    /// Start rendering into `target`. Returns as soon as loading has begun.
    fn load_animation(&mut self, target: &N, request: &RenderRequest);
}

/// Notifies the host when tracked nodes enter the (expanded) viewport.
///
/// A single watcher is shared by every deferred marker.
pub trait ViewportWatcher<N> {
    fn observe(&mut self, node: &N);

    fn unobserve(&mut self, node: &N);
}

/// One notification delivered by a [`ViewportWatcher`].
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEntry<N> {
    pub target: N,
    pub is_intersecting: bool,
}

impl<N> IntersectionEntry<N> {
    pub fn entering(target: N) -> Self {
        Self {
            target,
            is_intersecting: true,
        }
    }

    pub fn leaving(target: N) -> Self {
        Self {
            target,
            is_intersecting: false,
        }
    }
}
