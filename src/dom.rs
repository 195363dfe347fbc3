use indextree::{Arena, NodeId};

use crate::factory::FactoryTable;
use crate::options::Options;
use crate::value::Value;

pub(crate) struct NodeData {
    pub(crate) value: Value,
    // None only for document nodes, which own themselves
    pub(crate) owner: Option<Node>,
}

pub(crate) type DomArena = Arena<NodeData>;

/// A node in the tree.
/// This is a lightweight value and can be copied.
///
/// A node stays valid after it's detached from its parent; it just isn't
/// in any tree position anymore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node(NodeId);

impl Node {
    #[inline]
    pub(crate) fn new(node_id: NodeId) -> Self {
        Node(node_id)
    }

    #[inline]
    pub(crate) fn get(&self) -> NodeId {
        self.0
    }
}

/// The `Dom` struct manages all node data in your program. It lets you
/// access and manipulate one or more documents and their fragments.
///
/// `Dom` is implemented in several sections focusing on different aspects:
/// access, creation, manipulation, the DOM action primitives, adjacent
/// insertion, equality, dynamic dispatch, parsing and serialization.
pub struct Dom {
    pub(crate) arena: DomArena,
    pub(crate) options: Options,
    pub(crate) factories: FactoryTable,
}

impl Dom {
    /// Create a new `Dom` with default options.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Create a new `Dom` with the given options.
    pub fn with_options(options: Options) -> Self {
        Dom {
            arena: DomArena::new(),
            options,
            factories: FactoryTable::standard(),
        }
    }

    /// The options this `Dom` was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[inline]
    pub(crate) fn arena(&self) -> &DomArena {
        &self.arena
    }

    #[inline]
    pub(crate) fn arena_mut(&mut self) -> &mut DomArena {
        &mut self.arena
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
