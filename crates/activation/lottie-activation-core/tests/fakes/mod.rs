#![allow(dead_code)]
//! In-memory host used by the integration tests.

use std::collections::{BTreeSet, HashMap};

use lottie_activation::{
    AnimationRuntime, Controller, ControllerConfig, MarkerDocument, RenderRequest,
    ViewportWatcher, ATTR_IMMEDIATE, ATTR_SRC,
};

pub type Node = usize;

#[derive(Debug, Default)]
struct FakeNode {
    parent: Option<Node>,
    attrs: HashMap<String, String>,
}

/// Flat arena of nodes; node 0 is the document root.
#[derive(Debug)]
pub struct FakeDocument {
    nodes: Vec<FakeNode>,
}

impl Default for FakeDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDocument {
    pub const ROOT: Node = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![FakeNode::default()],
        }
    }

    pub fn add_node(&mut self, parent: Node, attrs: &[(&str, &str)]) -> Node {
        let id = self.nodes.len();
        self.nodes.push(FakeNode {
            parent: Some(parent),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        id
    }

    pub fn add_marker(&mut self, src: &str) -> Node {
        self.add_node(Self::ROOT, &[(ATTR_SRC, src)])
    }

    pub fn add_immediate(&mut self, src: &str) -> Node {
        self.add_node(Self::ROOT, &[(ATTR_SRC, src), (ATTR_IMMEDIATE, "true")])
    }

    /// Copy `node` with all its attributes (seen tag included) under the same parent.
    pub fn clone_node(&mut self, node: Node) -> Node {
        let copy = FakeNode {
            parent: self.nodes[node].parent,
            attrs: self.nodes[node].attrs.clone(),
        };
        self.nodes.push(copy);
        self.nodes.len() - 1
    }

    fn is_descendant(&self, node: Node, root: Node) -> bool {
        let mut cur = self.nodes[node].parent;
        while let Some(p) = cur {
            if p == root {
                return true;
            }
            cur = self.nodes[p].parent;
        }
        false
    }

    pub fn attr(&self, node: Node, name: &str) -> Option<&str> {
        self.nodes[node].attrs.get(name).map(String::as_str)
    }
}

impl MarkerDocument for FakeDocument {
    type Node = Node;

    // Only attribute-presence selectors (`[name]`) are understood.
    fn find_markers(&self, root: &Node, selector: &str) -> Vec<Node> {
        let attr = selector.trim_start_matches('[').trim_end_matches(']');
        (0..self.nodes.len())
            .filter(|&n| self.is_descendant(n, *root) && self.nodes[n].attrs.contains_key(attr))
            .collect()
    }

    fn attribute(&self, node: &Node, name: &str) -> Option<String> {
        self.nodes.get(*node)?.attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &Node, name: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(*node) {
            n.attrs.insert(name.to_string(), value.to_string());
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeRuntime {
    pub available: bool,
    pub calls: Vec<(Node, RenderRequest)>,
}

impl FakeRuntime {
    pub fn ready() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }

    pub fn loaded_paths(&self) -> Vec<&str> {
        self.calls.iter().map(|(_, r)| r.path.as_str()).collect()
    }
}

impl AnimationRuntime<Node> for FakeRuntime {
    fn is_available(&self) -> bool {
        self.available
    }

    fn load_animation(&mut self, target: &Node, request: &RenderRequest) {
        self.calls.push((*target, request.clone()));
    }
}

#[derive(Debug, Default)]
pub struct FakeWatcher {
    pub watching: BTreeSet<Node>,
    pub observe_calls: usize,
    pub unobserve_calls: usize,
}

impl ViewportWatcher<Node> for FakeWatcher {
    fn observe(&mut self, node: &Node) {
        self.observe_calls += 1;
        self.watching.insert(*node);
    }

    fn unobserve(&mut self, node: &Node) {
        self.unobserve_calls += 1;
        self.watching.remove(node);
    }
}

pub type FakeController = Controller<FakeDocument, FakeRuntime, FakeWatcher>;

pub fn controller(doc: FakeDocument, runtime: FakeRuntime) -> FakeController {
    Controller::new(
        ControllerConfig::default(),
        doc,
        runtime,
        Some(FakeWatcher::default()),
    )
    .unwrap()
}

pub fn controller_without_watcher(doc: FakeDocument, runtime: FakeRuntime) -> FakeController {
    Controller::new(ControllerConfig::default(), doc, runtime, None).unwrap()
}
