use rustc_hash::FxHashMap;

use crate::node::Node;

/// Named keyframe data for a set of channels, plus its duration.
///
/// An animation is shared between skeletons through an `Arc` and is not
/// changed once playback starts; [`add_node`](Self::add_node) is meant for
/// construction.
#[derive(Debug, Clone, Default)]
pub struct Animation {
    name: String,
    duration: f32,
    nodes: Vec<Node>,
    node_index: FxHashMap<String, usize>,
}

impl Animation {
    #[must_use]
    pub fn new(name: &str, duration: f32) -> Self {
        Self {
            name: name.to_string(),
            duration,
            nodes: Vec::new(),
            node_index: FxHashMap::default(),
        }
    }

    /// Appends a channel. A later channel with the same name shadows the
    /// earlier one in [`get_node`](Self::get_node).
    pub fn add_node(&mut self, node: Node) {
        self.node_index.insert(node.name().to_string(), self.nodes.len());
        self.nodes.push(node);
    }

    /// Builder form of [`add_node`](Self::add_node).
    #[must_use]
    pub fn with_node(mut self, node: Node) -> Self {
        self.add_node(node);
        self
    }

    #[must_use]
    pub fn get_node(&self, name: &str) -> Option<&Node> {
        self.node_index.get(name).and_then(|&i| self.nodes.get(i))
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn set_duration(&mut self, duration: f32) {
        self.duration = duration;
    }
}
