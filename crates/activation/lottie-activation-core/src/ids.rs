//! Identifiers for registered markers.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MarkerId(pub u32);

impl MarkerId {
    /// Parse the value of a `data-lottie-marker-id` attribute.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u32>().ok().map(MarkerId)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic allocator for MarkerId.
/// Ids are dense so the controller can keep markers in a Vec; they never wrap.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_marker: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` once the id space is exhausted.
    #[inline]
    pub fn alloc_marker(&mut self) -> Option<MarkerId> {
        let id = MarkerId(self.next_marker);
        self.next_marker = self.next_marker.checked_add(1)?;
        Some(id)
    }

    #[inline]
    pub fn allocated(&self) -> u32 {
        self.next_marker
    }
}
