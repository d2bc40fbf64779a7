//! Intermediate script tree: the validated, symbol-resolved shape that the
//! bytecode emitter walks. Nesting mirrors the compiled layout
//! (CR → CO/RS → TR/RE → AC → OB).

use serde::Serialize;

use crate::processor::ast::RawNode;
use crate::processor::catalog::{FunctionDescriptor, ParamDescriptor, Signatures};
use crate::processor::symbols::IdsTables;
use crate::processor::transform::Transformed;

/// Marker for `code` and `param_index` values that were never set.
pub const UNSET: i32 = -1;

/// Probability given to a response entry without an explicit one.
pub const DEFAULT_PROBABILITY: i32 = 100;

/// Region value meaning "no rectangle".
pub const NO_REGION: [i32; 4] = [-1, -1, -1, -1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Script,
    TriggerSequence,
    ActionSequence,
    ConditionResponse,
    Condition,
    ResponseSet,
    ResponseEntry,
    Trigger,
    Action,
    Object,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptNode {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Function id for triggers/actions, probability for response entries.
    pub code: i32,
    pub param_index: i32,
    pub negated: bool,
    pub function: Option<FunctionDescriptor>,
    /// Formal slot an object node fills.
    pub parameter: Option<ParamDescriptor>,
    pub numbers: Vec<i32>,
    /// Object identifier codes, resolved against the object table.
    pub numbers2: Vec<i32>,
    pub strings: Vec<String>,
    pub point: Point,
    /// x, y, width, height; all -1 when absent.
    pub region: [i32; 4],
}

impl ScriptNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            code: UNSET,
            param_index: UNSET,
            negated: false,
            function: None,
            parameter: None,
            numbers: Vec::new(),
            numbers2: Vec::new(),
            strings: Vec::new(),
            point: Point::default(),
            region: NO_REGION,
        }
    }

    pub fn has_region(&self) -> bool {
        self.region != NO_REGION
    }
}

/// Arena holding every node; `root` is always the first one allocated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptTree {
    nodes: Vec<ScriptNode>,
    root: NodeId,
}

impl ScriptTree {
    pub fn new(root_kind: NodeKind) -> Self {
        Self {
            nodes: vec![ScriptNode::new(root_kind)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocated nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &ScriptNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ScriptNode {
        &mut self.nodes[id.0]
    }

    /// Allocate a node with no parent yet.
    pub fn detached(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(ScriptNode::new(kind));
        NodeId(self.nodes.len() - 1)
    }

    /// Allocate a node and append it to `parent`'s children.
    pub fn add_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.detached(kind);
        self.attach(parent, id);
        id
    }

    /// Move `child` under `parent`, detaching it from any previous parent.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.nodes[child.0].parent {
            self.nodes[old.0].children.retain(|&c| c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &ScriptNode> + '_ {
        self.nodes[id.0].children.iter().map(|&c| &self.nodes[c.0])
    }

    /// Children of `id` with the given kind, in source order.
    pub fn children_of_kind(&self, id: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.nodes[id.0]
            .children
            .iter()
            .copied()
            .filter(|&c| self.nodes[c.0].kind == kind)
            .collect()
    }

    /// Pre-order walk from the root, yielding each node with its depth.
    pub fn walk(&self) -> Vec<(usize, NodeId)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(0usize, self.root)];
        while let Some((depth, id)) = stack.pop() {
            out.push((depth, id));
            for &c in self.nodes[id.0].children.iter().rev() {
                stack.push((depth + 1, c));
            }
        }
        out
    }
}

/// Everything the loaders produce, still in raw form.
#[derive(Debug, Clone)]
pub struct RawProject {
    /// Script name, taken from the input file stem.
    pub name: String,
    pub tree: RawNode,
    pub signatures: Signatures,
    pub ids: IdsTables,
}

/// Fully processed output handed to `writer`.
#[derive(Debug, Clone)]
pub struct ProcessedProject {
    pub name: String,
    pub result: Transformed,
}
