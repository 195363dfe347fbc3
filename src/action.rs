use std::fmt;

use crate::dom::{Dom, Node};
use crate::error::{Dependency, Error};
use crate::value::NodeKind;

/// One of the five DOM actions a dynamic call can perform.
///
/// Its `Display` form is the DOM method name (`after`, `replaceWith`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    After,
    Append,
    Before,
    Prepend,
    ReplaceWith,
}

impl Action {
    /// All actions, longest name first, so that a call name is always
    /// split on the longest matching prefix.
    pub const LONGEST_FIRST: [Action; 5] = [
        Action::ReplaceWith,
        Action::Prepend,
        Action::Append,
        Action::Before,
        Action::After,
    ];

    /// The DOM method name.
    pub fn name(self) -> &'static str {
        match self {
            Action::After => "after",
            Action::Append => "append",
            Action::Before => "before",
            Action::Prepend => "prepend",
            Action::ReplaceWith => "replaceWith",
        }
    }

    /// The mixin that provides this action.
    pub fn mixin(self) -> Mixin {
        match self {
            Action::Append | Action::Prepend => Mixin::ParentNode,
            Action::After | Action::Before | Action::ReplaceWith => Mixin::ChildNode,
        }
    }

    /// Split a call name into its action and the rest, ignoring case.
    ///
    /// ```rust
    /// use sugardom::Action;
    ///
    /// assert_eq!(Action::split("appendXslIf"), Some((Action::Append, "XslIf")));
    /// assert_eq!(Action::split("REPLACEWITHText"), Some((Action::ReplaceWith, "Text")));
    /// assert_eq!(Action::split("removeElement"), None);
    /// ```
    pub fn split(call: &str) -> Option<(Action, &str)> {
        Action::LONGEST_FIRST.into_iter().find_map(|action| {
            let name = action.name();
            let head = call.get(..name.len())?;
            if head.eq_ignore_ascii_case(name) {
                Some((action, &call[name.len()..]))
            } else {
                None
            }
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bundle of actions that some node kinds support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mixin {
    /// `append` and `prepend`: nodes that can hold children.
    ParentNode,
    /// `after`, `before` and `replaceWith`: nodes that can be a child.
    ChildNode,
}

impl NodeKind {
    /// The mixins this node kind implements.
    pub fn mixins(self) -> &'static [Mixin] {
        match self {
            NodeKind::Element => &[Mixin::ParentNode, Mixin::ChildNode],
            NodeKind::Document | NodeKind::DocumentFragment => &[Mixin::ParentNode],
            NodeKind::Text
            | NodeKind::CdataSection
            | NodeKind::Comment
            | NodeKind::ProcessingInstruction
            | NodeKind::DocumentType => &[Mixin::ChildNode],
            NodeKind::Attribute
            | NodeKind::EntityReference
            | NodeKind::Entity
            | NodeKind::Notation => &[],
        }
    }

    /// Whether this node kind supports an action.
    pub fn supports(self, action: Action) -> bool {
        self.mixins().contains(&action.mixin())
    }
}

/// ## Actions
///
/// The DOM `ParentNode` and `ChildNode` methods. Each takes any number of
/// nodes; more than one is gathered into a document fragment first, so
/// they're inserted together and in order.
///
/// `after`, `before` and `replace_with` do nothing if the node has no
/// parent.
impl Dom {
    /// Insert nodes after the last child of a node.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.parse("<p><a/></p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// let b = dom.create_element(doc, "b").unwrap();
    /// let c = dom.create_text_node(doc, "c");
    /// dom.append(p, [b, c]).unwrap();
    /// assert_eq!(dom.to_string(p).unwrap(), "<p><a/><b/>c</p>");
    /// ```
    pub fn append(&mut self, node: Node, nodes: impl IntoIterator<Item = Node>) -> Result<(), Error> {
        self.check_action(node, Action::Append)?;
        let new = self.convert_nodes(node, nodes.into_iter().collect())?;
        self.pre_insert(node, new, None)?;
        Ok(())
    }

    /// Insert nodes before the first child of a node.
    pub fn prepend(
        &mut self,
        node: Node,
        nodes: impl IntoIterator<Item = Node>,
    ) -> Result<(), Error> {
        self.check_action(node, Action::Prepend)?;
        let new = self.convert_nodes(node, nodes.into_iter().collect())?;
        let first_child = self.first_child(node);
        self.pre_insert(node, new, first_child)?;
        Ok(())
    }

    /// Insert nodes just before a node, in its parent.
    pub fn before(&mut self, node: Node, nodes: impl IntoIterator<Item = Node>) -> Result<(), Error> {
        self.check_action(node, Action::Before)?;
        let parent = match self.parent(node) {
            Some(parent) => parent,
            None => return Ok(()),
        };
        let nodes = nodes.into_iter().collect::<Vec<_>>();
        // the reference may itself be one of the inserted nodes
        let viable_previous = std::iter::successors(self.previous_sibling(node), |&n| {
            self.previous_sibling(n)
        })
        .find(|n| !nodes.contains(n));
        let new = self.convert_nodes(node, nodes)?;
        let reference = match viable_previous {
            Some(previous) => self.next_sibling(previous),
            None => self.first_child(parent),
        };
        self.pre_insert(parent, new, reference)?;
        Ok(())
    }

    /// Insert nodes just after a node, in its parent.
    pub fn after(&mut self, node: Node, nodes: impl IntoIterator<Item = Node>) -> Result<(), Error> {
        self.check_action(node, Action::After)?;
        let parent = match self.parent(node) {
            Some(parent) => parent,
            None => return Ok(()),
        };
        let nodes = nodes.into_iter().collect::<Vec<_>>();
        let viable_next = self.viable_next_sibling(node, &nodes);
        let new = self.convert_nodes(node, nodes)?;
        self.pre_insert(parent, new, viable_next)?;
        Ok(())
    }

    /// Replace a node with other nodes. The replaced node is detached.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.parse("<p><a/></p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// let a = dom.first_child(p).unwrap();
    /// let b = dom.create_element(doc, "b").unwrap();
    /// dom.replace_with(a, [b]).unwrap();
    /// assert_eq!(dom.to_string(p).unwrap(), "<p><b/></p>");
    /// assert_eq!(dom.parent(a), None);
    /// ```
    pub fn replace_with(
        &mut self,
        node: Node,
        nodes: impl IntoIterator<Item = Node>,
    ) -> Result<(), Error> {
        self.check_action(node, Action::ReplaceWith)?;
        let parent = match self.parent(node) {
            Some(parent) => parent,
            None => return Ok(()),
        };
        let nodes = nodes.into_iter().collect::<Vec<_>>();
        let viable_next = self.viable_next_sibling(node, &nodes);
        let new = self.convert_nodes(node, nodes)?;
        if self.parent(node) != Some(parent) {
            // the node was one of the replacements and has moved already
            self.pre_insert(parent, new, viable_next)?;
            return Ok(());
        }
        let reference = self.next_sibling(node);
        self.detach(node);
        if let Err(e) = self.pre_insert(parent, new, reference) {
            // put the node back where it was
            match reference {
                Some(reference) => reference
                    .get()
                    .checked_insert_before(node.get(), self.arena_mut())?,
                None => parent.get().checked_append(node.get(), self.arena_mut())?,
            }
            return Err(e);
        }
        Ok(())
    }

    /// Remove a node from its parent, if it has one.
    pub fn remove(&mut self, node: Node) {
        if self.parent(node).is_some() {
            self.detach(node);
        }
    }

    /// Perform an action with a single node.
    pub fn apply(&mut self, action: Action, node: Node, new: Node) -> Result<(), Error> {
        match action {
            Action::After => self.after(node, [new]),
            Action::Append => self.append(node, [new]),
            Action::Before => self.before(node, [new]),
            Action::Prepend => self.prepend(node, [new]),
            Action::ReplaceWith => self.replace_with(node, [new]),
        }
    }

    fn check_action(&self, node: Node, action: Action) -> Result<(), Error> {
        let kind = self.kind(node);
        if kind.supports(action) {
            Ok(())
        } else {
            Err(Error::UnsupportedMethod {
                kind,
                call: action.name().to_string(),
                dependency: Dependency::Action { kind, action },
            })
        }
    }

    fn viable_next_sibling(&self, node: Node, nodes: &[Node]) -> Option<Node> {
        std::iter::successors(self.next_sibling(node), |&n| self.next_sibling(n))
            .find(|n| !nodes.contains(n))
    }

    // a single node is used as-is; anything else goes into a fragment
    fn convert_nodes(&mut self, context: Node, nodes: Vec<Node>) -> Result<Node, Error> {
        if let [node] = nodes.as_slice() {
            return Ok(*node);
        }
        let fragment = self.create_document_fragment(context);
        for node in nodes {
            self.append_child(fragment, node)?;
        }
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_prefers_longest_action() {
        assert_eq!(
            Action::split("replaceWithElement"),
            Some((Action::ReplaceWith, "Element"))
        );
        assert_eq!(Action::split("prependText"), Some((Action::Prepend, "Text")));
        assert_eq!(Action::split("after"), Some((Action::After, "")));
        assert_eq!(Action::split("af"), None);
    }

    #[test]
    fn test_split_multibyte_call() {
        assert_eq!(Action::split("é"), None);
        assert_eq!(Action::split("appendé"), Some((Action::Append, "é")));
    }

    #[test]
    fn test_mixins() {
        assert!(NodeKind::Element.supports(Action::Append));
        assert!(NodeKind::Element.supports(Action::After));
        assert!(NodeKind::Document.supports(Action::Prepend));
        assert!(!NodeKind::Document.supports(Action::Before));
        assert!(!NodeKind::Comment.supports(Action::Append));
        assert!(NodeKind::Comment.supports(Action::ReplaceWith));
        assert!(NodeKind::Attribute.mixins().is_empty());
    }
}
