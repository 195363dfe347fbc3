use crate::access::XMLNS_NAMESPACE;
use crate::creation::checked_qname;
use crate::dom::{Dom, Node};
use crate::error::Error;
use crate::value::{Attribute, NodeKind, QName, Text, Value};

/// ## Manipulation
///
/// The primitive mutations the rest of the crate builds on. They follow
/// the DOM rules for what may go where:
/// - Only elements, documents and document fragments have children.
/// - A node can't be inserted into itself or one of its descendants.
/// - A document holds at most one element, no text, and a document type
///   can only live directly under a document.
/// - A document holds at most one document type, before its element.
///
/// Inserting a node that is already in the tree moves it. Inserting a
/// document fragment moves its children and leaves it empty. Inserting a
/// node from another document adopts it.
impl Dom {
    /// Append a child at the end of the children of a parent.
    ///
    /// Returns the inserted node.
    pub fn append_child(&mut self, parent: Node, node: Node) -> Result<Node, Error> {
        self.pre_insert(parent, node, None)
    }

    /// Insert a node before a reference child of a parent. Without a
    /// reference child this appends.
    pub fn insert_before(
        &mut self,
        parent: Node,
        node: Node,
        reference: Option<Node>,
    ) -> Result<Node, Error> {
        self.pre_insert(parent, node, reference)
    }

    /// Remove a child from its parent. The child stays usable as a
    /// detached node.
    pub fn remove_child(&mut self, parent: Node, child: Node) -> Result<Node, Error> {
        if self.parent(child) != Some(parent) {
            return Err(Error::NotFound(child));
        }
        child.get().detach(self.arena_mut());
        Ok(child)
    }

    /// Detach a node (and its descendants) from wherever it is.
    ///
    /// An attribute is detached from its owner element. Detaching an
    /// unattached node does nothing.
    pub fn detach(&mut self, node: Node) {
        node.get().detach(self.arena_mut());
    }

    pub(crate) fn pre_insert(
        &mut self,
        parent: Node,
        node: Node,
        reference: Option<Node>,
    ) -> Result<Node, Error> {
        self.insert_check(parent, node, reference)?;
        // inserting a node before itself means inserting before its next sibling
        let reference = if reference == Some(node) {
            self.next_sibling(node)
        } else {
            reference
        };
        let document = self.document_of(parent);
        if self.kind(node) == NodeKind::DocumentFragment {
            let children = self.children(node).collect::<Vec<_>>();
            for child in children {
                self.insert_one(parent, child, reference, document)?;
            }
        } else {
            self.insert_one(parent, node, reference, document)?;
        }
        Ok(node)
    }

    fn insert_one(
        &mut self,
        parent: Node,
        node: Node,
        reference: Option<Node>,
        document: Node,
    ) -> Result<(), Error> {
        node.get().detach(self.arena_mut());
        self.adopt(node, document);
        match reference {
            Some(reference) => reference
                .get()
                .checked_insert_before(node.get(), self.arena_mut())?,
            None => parent.get().checked_append(node.get(), self.arena_mut())?,
        }
        Ok(())
    }

    // change the owner document of a subtree, including its attributes
    fn adopt(&mut self, node: Node, document: Node) {
        if self.document_of(node) == document {
            return;
        }
        let subtree = node.get().descendants(self.arena()).collect::<Vec<_>>();
        for id in subtree {
            self.arena_mut()[id].get_mut().owner = Some(document);
        }
    }

    fn insert_check(
        &self,
        parent: Node,
        node: Node,
        reference: Option<Node>,
    ) -> Result<(), Error> {
        let parent_kind = self.kind(parent);
        if !parent_kind.can_have_children() {
            return Err(Error::HierarchyRequest(format!(
                "Cannot add children to {}",
                parent_kind
            )));
        }
        if self.ancestors(parent).any(|ancestor| ancestor == node) {
            return Err(Error::HierarchyRequest(
                "Cannot insert a node into itself or one of its descendants".into(),
            ));
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(Error::NotFound(reference));
            }
        }
        let node_kind = self.kind(node);
        match node_kind {
            NodeKind::Attribute | NodeKind::Document | NodeKind::Entity | NodeKind::Notation => {
                return Err(Error::HierarchyRequest(format!(
                    "Cannot insert {} as a child",
                    node_kind
                )));
            }
            NodeKind::DocumentType if parent_kind != NodeKind::Document => {
                return Err(Error::HierarchyRequest(
                    "A document type can only be a child of a document".into(),
                ));
            }
            _ => {}
        }
        if parent_kind == NodeKind::Document {
            self.document_insert_check(parent, node, reference)?;
        }
        Ok(())
    }

    fn document_insert_check(
        &self,
        document: Node,
        node: Node,
        reference: Option<Node>,
    ) -> Result<(), Error> {
        let inserted = if self.kind(node) == NodeKind::DocumentFragment {
            self.children(node).collect::<Vec<_>>()
        } else {
            vec![node]
        };
        if inserted
            .iter()
            .any(|&n| matches!(self.kind(n), NodeKind::Text | NodeKind::CdataSection))
        {
            return Err(Error::HierarchyRequest(
                "Cannot insert text directly under a document".into(),
            ));
        }
        let new_elements = inserted.iter().filter(|&&n| self.is_element(n)).count();
        let existing = self
            .children(document)
            .filter(|&child| self.is_element(child) && child != node)
            .count();
        if new_elements + existing > 1 {
            return Err(Error::HierarchyRequest(
                "A document can only have one document element".into(),
            ));
        }
        // the document type comes before the document element
        if new_elements > 0 {
            let mut following = std::iter::successors(reference, |&n| self.next_sibling(n));
            if following.any(|n| self.kind(n) == NodeKind::DocumentType) {
                return Err(Error::HierarchyRequest(
                    "Cannot insert an element before the document type".into(),
                ));
            }
        }
        if self.kind(node) == NodeKind::DocumentType {
            if self
                .children(document)
                .any(|child| child != node && self.kind(child) == NodeKind::DocumentType)
            {
                return Err(Error::HierarchyRequest(
                    "A document can only have one document type".into(),
                ));
            }
            let element_before = match reference {
                Some(reference) => {
                    std::iter::successors(self.previous_sibling(reference), |&n| {
                        self.previous_sibling(n)
                    })
                    .any(|n| n != node && self.is_element(n))
                }
                None => self
                    .children(document)
                    .any(|child| child != node && self.is_element(child)),
            };
            if element_before {
                return Err(Error::HierarchyRequest(
                    "Cannot insert the document type after the document element".into(),
                ));
            }
        }
        Ok(())
    }

    /// Set an attribute by qualified name, creating it if needed.
    ///
    /// `xmlns` and `xmlns:prefix` declare a namespace instead, as they would
    /// in markup.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.parse("<doc/>").unwrap();
    /// let doc_el = dom.document_element(doc).unwrap();
    /// dom.set_attribute(doc_el, "a", "A").unwrap();
    /// dom.set_attribute(doc_el, "xmlns:x", "urn:x").unwrap();
    /// assert_eq!(dom.to_string(doc).unwrap(), r#"<doc xmlns:x="urn:x" a="A"/>"#);
    /// ```
    pub fn set_attribute(
        &mut self,
        element: Node,
        qualified_name: &str,
        value: &str,
    ) -> Result<(), Error> {
        match QName::split(qualified_name) {
            (None, "xmlns") => return self.declare_namespace(element, "", value),
            (Some("xmlns"), prefix) => return self.declare_namespace(element, prefix, value),
            _ => {}
        }
        if let Some(existing) = self.attribute_node(element, qualified_name) {
            if let Value::Attribute(attribute) = self.value_mut(existing) {
                attribute.set(value);
            }
            return Ok(());
        }
        let attribute = Attribute {
            name: QName::new(None, None, qualified_name),
            value: value.to_string(),
        };
        self.add_attribute(element, attribute)
    }

    /// Set an attribute by namespace and qualified name, creating it if
    /// needed. An existing attribute with the same namespace and local
    /// name takes on the new prefix and value.
    pub fn set_attribute_ns(
        &mut self,
        element: Node,
        namespace_uri: Option<&str>,
        qualified_name: &str,
        value: &str,
    ) -> Result<(), Error> {
        let name = checked_qname(namespace_uri, qualified_name)?;
        if name.namespace_uri() == Some(XMLNS_NAMESPACE) {
            let prefix = match name.prefix() {
                Some(_) => name.local_name.clone(),
                None => String::new(),
            };
            return self.declare_namespace(element, &prefix, value);
        }
        if let Some(existing) =
            self.attribute_node_ns(element, name.namespace_uri(), name.local_name())
        {
            if let Value::Attribute(attribute) = self.value_mut(existing) {
                attribute.name = name;
                attribute.set(value);
            }
            return Ok(());
        }
        self.add_attribute(
            element,
            Attribute {
                name,
                value: value.to_string(),
            },
        )
    }

    pub(crate) fn add_attribute(&mut self, element: Node, attribute: Attribute) -> Result<(), Error> {
        if !self.is_element(element) {
            return Err(Error::NotElement(element));
        }
        let owner = self.document_of(element);
        let node = self.new_node(Value::Attribute(attribute), Some(owner));
        self.attach_attribute(element, node)
    }

    // attributes come before the normal children, in insertion order
    fn attach_attribute(&mut self, element: Node, attribute: Node) -> Result<(), Error> {
        match self.attributes(element).last() {
            Some(last) => last
                .get()
                .checked_insert_after(attribute.get(), self.arena_mut())?,
            None => element
                .get()
                .checked_prepend(attribute.get(), self.arena_mut())?,
        }
        Ok(())
    }

    /// Attach an attribute node to an element, replacing any attribute
    /// with the same namespace and local name. Returns the replaced
    /// attribute.
    pub fn set_attribute_node(
        &mut self,
        element: Node,
        attribute: Node,
    ) -> Result<Option<Node>, Error> {
        if !self.is_element(element) {
            return Err(Error::NotElement(element));
        }
        let name = match self.value(attribute) {
            Value::Attribute(a) => a.name.clone(),
            _ => {
                return Err(Error::HierarchyRequest(
                    "Only attributes can be set as attribute nodes".into(),
                ))
            }
        };
        if self.owner_element(attribute) == Some(element) {
            return Ok(None);
        }
        let replaced = self.attribute_node_ns(element, name.namespace_uri(), name.local_name());
        if let Some(replaced) = replaced {
            self.detach(replaced);
        }
        attribute.get().detach(self.arena_mut());
        let document = self.document_of(element);
        self.adopt(attribute, document);
        self.attach_attribute(element, attribute)?;
        Ok(replaced)
    }

    /// Remove an attribute by qualified name. Returns true if it existed.
    ///
    /// `xmlns` and `xmlns:prefix` remove a namespace declaration.
    pub fn remove_attribute(&mut self, element: Node, qualified_name: &str) -> bool {
        let declared_prefix = match QName::split(qualified_name) {
            (None, "xmlns") => Some(""),
            (Some("xmlns"), prefix) => Some(prefix),
            _ => None,
        };
        if let Some(prefix) = declared_prefix {
            if let Some(element) = self.element_mut(element) {
                let had = element.get_namespace(prefix).is_some();
                element.remove_prefix(prefix);
                return had;
            }
            return false;
        }
        match self.attribute_node(element, qualified_name) {
            Some(attribute) => {
                self.detach(attribute);
                true
            }
            None => false,
        }
    }

    /// Declare a namespace prefix on an element. The empty prefix declares
    /// the default namespace.
    pub fn declare_namespace(
        &mut self,
        element: Node,
        prefix: &str,
        namespace_uri: &str,
    ) -> Result<(), Error> {
        let element_value = self.element_mut(element).ok_or(Error::NotElement(element))?;
        element_value.set_prefix(prefix, namespace_uri);
        Ok(())
    }

    /// Replace all children of a node with a single text node, or set the
    /// data of a character data node.
    ///
    /// Empty text leaves an element without children.
    pub fn set_text_content(&mut self, node: Node, text: &str) -> Result<(), Error> {
        match self.value_mut(node) {
            Value::Text(t) | Value::CdataSection(t) => {
                t.set(text);
                return Ok(());
            }
            Value::Comment(comment) => return comment.set(text),
            Value::Attribute(attribute) => {
                attribute.set(text);
                return Ok(());
            }
            Value::ProcessingInstruction(pi) => {
                pi.data = text.to_string();
                return Ok(());
            }
            Value::Element(_) | Value::DocumentFragment => {}
            _ => return Ok(()),
        }
        let children = self.children(node).collect::<Vec<_>>();
        for child in children {
            self.detach(child);
        }
        if !text.is_empty() {
            let owner = self.document_of(node);
            let text_node = self.new_node(Value::Text(Text::new(text.to_string())), Some(owner));
            self.append_child(node, text_node)?;
        }
        Ok(())
    }
}
