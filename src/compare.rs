use ahash::HashMap;

use crate::dom::{Dom, Node};
use crate::value::Value;

/// ## Equality
impl Dom {
    /// Structural equality of two nodes, as the DOM `isEqualNode` defines
    /// it.
    ///
    /// Nodes of different kinds are never equal, so text and a CDATA
    /// section with the same content differ. The nodes may live in
    /// different documents. Missing nodes are never equal to anything.
    ///
    /// Elements compare their namespace, qualified name, attributes
    /// (in any order), children (in order), and the namespace
    /// declarations made on the element itself.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc1 = dom.parse(r#"<x a="" b=""/>"#).unwrap();
    /// let doc2 = dom.parse(r#"<x b="" a=""/>"#).unwrap();
    /// let doc3 = dom.parse(r#"<x a="0" b=""/>"#).unwrap();
    /// assert!(dom.is_equal_node(doc1, doc2));
    /// assert!(!dom.is_equal_node(doc1, doc3));
    /// assert!(!dom.is_equal_node(doc1, None));
    /// ```
    pub fn is_equal_node(&self, node: impl Into<Option<Node>>, other: impl Into<Option<Node>>) -> bool {
        match (node.into(), other.into()) {
            (Some(node), Some(other)) => self.equal_nodes(node, other),
            _ => false,
        }
    }

    fn equal_nodes(&self, node: Node, other: Node) -> bool {
        match (self.value(node), self.value(other)) {
            (Value::Element(_), Value::Element(_)) => self.equal_elements(node, other),
            (Value::Text(a), Value::Text(b)) | (Value::CdataSection(a), Value::CdataSection(b)) => {
                a.get() == b.get()
            }
            (Value::Comment(a), Value::Comment(b)) => a.get() == b.get(),
            (Value::ProcessingInstruction(a), Value::ProcessingInstruction(b)) => {
                a.target() == b.target() && a.data() == b.data()
            }
            (Value::Attribute(a), Value::Attribute(b)) => {
                a.name().namespace_uri() == b.name().namespace_uri()
                    && a.name().local_name() == b.name().local_name()
                    && a.value() == b.value()
            }
            (Value::Document, Value::Document)
            | (Value::DocumentFragment, Value::DocumentFragment) => {
                self.equal_node_lists(node, other)
            }
            (Value::DocumentType(a), Value::DocumentType(b)) => {
                a.name() == b.name() && a.public_id() == b.public_id() && a.system_id() == b.system_id()
            }
            (Value::EntityReference(a), Value::EntityReference(b)) => a.name() == b.name(),
            (Value::Entity(a), Value::Entity(b)) | (Value::Notation(a), Value::Notation(b)) => {
                a.name() == b.name() && a.public_id() == b.public_id() && a.system_id() == b.system_id()
            }
            _ => false,
        }
    }

    fn equal_elements(&self, node: Node, other: Node) -> bool {
        let (element, other_element) = match (self.element(node), self.element(other)) {
            (Some(element), Some(other_element)) => (element, other_element),
            _ => return false,
        };
        if element.name().namespace_uri() != other_element.name().namespace_uri()
            || element.name().qualified() != other_element.name().qualified()
            || self.attribute_count(node) != self.attribute_count(other)
            || self.child_count(node) != self.child_count(other)
        {
            return false;
        }
        let attributes_equal = self.attributes(node).all(|attribute| {
            self.attribute_value(attribute)
                .map(|a| self.attribute(other, &a.name().qualified()) == Some(a.value()))
                .unwrap_or(false)
        });
        attributes_equal
            && self.equal_node_lists(node, other)
            && self.declared_namespaces(node) == self.declared_namespaces(other)
    }

    fn declared_namespaces(&self, node: Node) -> HashMap<&str, &str> {
        self.namespace_declarations(node).collect()
    }

    // children are compared in order
    fn equal_node_lists(&self, node: Node, other: Node) -> bool {
        let mut children = self.children(node);
        let mut other_children = self.children(other);
        loop {
            match (children.next(), other_children.next()) {
                (None, None) => return true,
                (Some(child), Some(other_child)) => {
                    if !self.equal_nodes(child, other_child) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}
