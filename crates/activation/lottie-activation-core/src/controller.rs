//! Lazy activation controller.
//!
//! Scans a document for animation markers and makes sure each eligible
//! marker is rendered exactly once: synchronously for `immediate` markers,
//! or when the marker nears the viewport for everything else.
//!
//! The controller never blocks on the animation runtime. When the runtime
//! has not loaded yet, [`Controller::initialize`] returns
//! [`InitStatus::Waiting`] with the delay the host should wait before
//! calling it again; the delay grows with [`RetryPolicy`](crate::RetryPolicy)
//! until the policy is exhausted.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ControllerConfig;
use crate::error::ActivationError;
use crate::host::{AnimationRuntime, IntersectionEntry, MarkerDocument, ViewportWatcher};
use crate::ids::{IdAllocator, MarkerId};
use crate::marker::{MarkerConfig, MarkerState, ATTR_MARKER_ID};

/// Outcome of a single [`Controller::initialize`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitStatus {
    /// The runtime is not loaded yet. Call `initialize` again after `retry_after`.
    Waiting { attempt: u32, retry_after: Duration },
    /// The scan ran.
    Ready(ScanSummary),
}

/// Counters for one completed scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Markers registered by this scan.
    pub discovered: usize,
    /// Markers already registered by an earlier scan.
    pub skipped: usize,
    /// Registered markers without a source.
    pub inert: usize,
    /// Markers rendered synchronously during the scan.
    pub activated: usize,
    /// Markers handed to the viewport watcher.
    pub observed: usize,
}

#[derive(Debug)]
struct MarkerEntry<N> {
    node: N,
    /// Set once the host reports the node removed.
    removed: bool,
    config: MarkerConfig,
    state: MarkerState,
    observed: bool,
}

pub struct Controller<D, R, W>
where
    D: MarkerDocument,
    R: AnimationRuntime<D::Node>,
    W: ViewportWatcher<D::Node>,
{
    config: ControllerConfig,
    document: D,
    runtime: R,
    /// `None` when the host has no intersection support.
    watcher: Option<W>,
    ids: IdAllocator,
    markers: Vec<MarkerEntry<D::Node>>,
    retry_attempts: u32,
}

impl<D, R, W> std::fmt::Debug for Controller<D, R, W>
where
    D: MarkerDocument,
    R: AnimationRuntime<D::Node>,
    W: ViewportWatcher<D::Node>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("config", &self.config)
            .field("has_watcher", &self.watcher.is_some())
            .field("markers", &self.markers.len())
            .field("retry_attempts", &self.retry_attempts)
            .finish()
    }
}

impl<D, R, W> Controller<D, R, W>
where
    D: MarkerDocument,
    R: AnimationRuntime<D::Node>,
    W: ViewportWatcher<D::Node>,
{
    /// Create a controller. Pass `None` for `watcher` when the host cannot
    /// report viewport intersections; every marker then activates at scan time.
    pub fn new(
        config: ControllerConfig,
        document: D,
        runtime: R,
        watcher: Option<W>,
    ) -> Result<Self, ActivationError> {
        config.validate()?;
        Ok(Self {
            config,
            document,
            runtime,
            watcher,
            ids: IdAllocator::new(),
            markers: Vec::new(),
            retry_attempts: 0,
        })
    }

    /// Scan `root` and activate or defer every marker found under it.
    ///
    /// Markers registered by an earlier call carry [`ATTR_MARKER_ID`] and are
    /// skipped, so scanning the same root twice is harmless. A node whose tag
    /// does not resolve back to itself (a cloned element, or one tagged by
    /// another controller) is registered as new and re-tagged.
    ///
    /// Giving up resets the attempt counter, so a later call starts a fresh
    /// retry cycle.
    pub fn initialize(&mut self, root: &D::Node) -> Result<InitStatus, ActivationError> {
        if !self.runtime.is_available() {
            self.retry_attempts = self.retry_attempts.saturating_add(1);
            let attempt = self.retry_attempts;
            if self.config.retry.is_exhausted(attempt) {
                log::error!("animation runtime unavailable after {attempt} attempts; giving up");
                self.retry_attempts = 0;
                return Err(ActivationError::RuntimeUnavailable { attempts: attempt });
            }
            let retry_after = self.config.retry.delay_for(attempt);
            log::trace!("animation runtime not loaded (attempt {attempt}); retry in {retry_after:?}");
            return Ok(InitStatus::Waiting {
                attempt,
                retry_after,
            });
        }
        self.retry_attempts = 0;

        let mut summary = ScanSummary::default();
        let nodes = self.document.find_markers(root, &self.config.selector);
        for node in nodes {
            if self.marker_for(&node).is_some() {
                summary.skipped += 1;
                continue;
            }
            let Some(id) = self.register(node) else {
                log::warn!("marker id space exhausted; remaining markers left unregistered");
                break;
            };
            summary.discovered += 1;

            let entry = &self.markers[id.index()];
            if entry.config.is_inert() {
                log::trace!("marker {id} has no source; leaving it inert");
                summary.inert += 1;
                continue;
            }

            if entry.config.immediate || self.watcher.is_none() {
                if self.activate(id) {
                    summary.activated += 1;
                }
            } else {
                self.observe(id);
                summary.observed += 1;
            }
        }

        log::debug!(
            "lottie scan: {} new, {} skipped, {} inert, {} activated, {} deferred",
            summary.discovered,
            summary.skipped,
            summary.inert,
            summary.activated,
            summary.observed
        );
        Ok(InitStatus::Ready(summary))
    }

    fn register(&mut self, node: D::Node) -> Option<MarkerId> {
        let id = self.ids.alloc_marker()?;
        let config = MarkerConfig::from_attributes(|name| self.document.attribute(&node, name));
        self.document
            .set_attribute(&node, ATTR_MARKER_ID, &id.to_string());
        self.markers.push(MarkerEntry {
            node,
            removed: false,
            config,
            state: MarkerState::Pending,
            observed: false,
        });
        Some(id)
    }

    fn observe(&mut self, id: MarkerId) {
        let Some(watcher) = self.watcher.as_mut() else {
            return;
        };
        let entry = &mut self.markers[id.index()];
        if !entry.removed {
            watcher.observe(&entry.node);
            entry.observed = true;
        }
    }

    fn unobserve(&mut self, id: MarkerId) {
        let entry = &mut self.markers[id.index()];
        if !entry.observed {
            return;
        }
        entry.observed = false;
        if let Some(watcher) = self.watcher.as_mut() {
            watcher.unobserve(&entry.node);
        }
    }

    /// Dispatch the render call for `id` if it is still pending.
    ///
    /// Returns `true` when the runtime was called. Inert, removed, unknown and
    /// already-activated markers return `false`.
    pub fn activate(&mut self, id: MarkerId) -> bool {
        let Some(entry) = self.markers.get(id.index()) else {
            return false;
        };
        if entry.state == MarkerState::Activated || entry.config.is_inert() || entry.removed {
            return false;
        }
        let node = entry.node.clone();

        self.unobserve(id);
        let entry = &mut self.markers[id.index()];
        entry.state = MarkerState::Activated;
        let request = entry.config.render_request(&self.config);
        log::debug!(
            "activating marker {id}: {} ({})",
            request.path,
            request.renderer.as_str()
        );
        self.runtime.load_animation(&node, &request);
        true
    }

    /// Feed watcher notifications. Each intersecting marker is activated and
    /// stops being watched. Returns the number of render calls made.
    pub fn handle_intersections<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = IntersectionEntry<D::Node>>,
    {
        let mut activated = 0;
        for entry in entries {
            if !entry.is_intersecting {
                continue;
            }
            match self.marker_for(&entry.target) {
                Some(id) => {
                    if self.activate(id) {
                        activated += 1;
                    }
                }
                None => log::trace!("intersection for an unregistered node ignored"),
            }
        }
        activated
    }

    /// Resolve a node to the marker it was registered as.
    ///
    /// The tag alone is not trusted: the entry must still hold this exact
    /// node. Copies of a tagged element and foreign tags resolve to `None`.
    pub fn marker_for(&self, node: &D::Node) -> Option<MarkerId> {
        let id = MarkerId::parse(&self.document.attribute(node, ATTR_MARKER_ID)?)?;
        let entry = self.markers.get(id.index())?;
        (entry.node == *node).then_some(id)
    }

    /// Drop a marker whose node left the document. A pending observation is
    /// released and the marker can no longer activate. The node keeps its tag,
    /// so re-inserting it and rescanning does not register it again.
    pub fn forget(&mut self, node: &D::Node) -> Option<MarkerId> {
        let id = self.marker_for(node)?;
        self.unobserve(id);
        self.markers[id.index()].removed = true;
        Some(id)
    }

    /// Stop watching every marker that is still waiting for the viewport.
    pub fn release(&mut self) {
        for idx in 0..self.markers.len() {
            self.unobserve(MarkerId(idx as u32));
        }
    }

    pub fn state(&self, id: MarkerId) -> Option<MarkerState> {
        self.markers.get(id.index()).map(|m| m.state)
    }

    pub fn config(&self, id: MarkerId) -> Option<&MarkerConfig> {
        self.markers.get(id.index()).map(|m| &m.config)
    }

    pub fn is_observed(&self, id: MarkerId) -> bool {
        self.markers.get(id.index()).is_some_and(|m| m.observed)
    }

    /// Pending markers that can still activate (have a source and a node).
    pub fn pending_count(&self) -> usize {
        self.markers
            .iter()
            .filter(|m| {
                m.state == MarkerState::Pending && !m.config.is_inert() && !m.removed
            })
            .count()
    }

    pub fn activated_count(&self) -> usize {
        self.markers
            .iter()
            .filter(|m| m.state == MarkerState::Activated)
            .count()
    }

    pub fn observed_count(&self) -> usize {
        self.markers.iter().filter(|m| m.observed).count()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Consecutive failed availability checks since the last successful scan.
    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    pub fn has_watcher(&self) -> bool {
        self.watcher.is_some()
    }

    pub fn settings(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    pub fn watcher(&self) -> Option<&W> {
        self.watcher.as_ref()
    }
}
