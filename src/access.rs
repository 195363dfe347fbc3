use crate::dom::{Dom, Node};
use crate::value::{NodeKind, QName, Value};

pub(crate) const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
pub(crate) const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// ## Read-only access
impl Dom {
    pub(crate) fn all_children(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get().children(self.arena()).map(Node::new)
    }

    #[inline]
    fn is_normal(&self, node: Node) -> bool {
        self.value(node).is_normal()
    }

    /// Get parent node.
    ///
    /// Returns [`None`] for a document, for a detached node, and for
    /// attributes, which have an owner element instead.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.parse("<p>Example</p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// let text = dom.first_child(p).unwrap();
    /// assert_eq!(dom.parent(text), Some(p));
    /// assert_eq!(dom.parent(p), Some(doc));
    /// assert_eq!(dom.parent(doc), None);
    /// ```
    pub fn parent(&self, node: Node) -> Option<Node> {
        if !self.is_normal(node) {
            return None;
        }
        self.arena()[node.get()].parent().map(Node::new)
    }

    /// The element an attribute belongs to.
    pub fn owner_element(&self, attribute: Node) -> Option<Node> {
        if self.kind(attribute) != NodeKind::Attribute {
            return None;
        }
        self.arena()[attribute.get()].parent().map(Node::new)
    }

    /// The document this node belongs to.
    ///
    /// Like the DOM `ownerDocument`, this is [`None`] for a document itself.
    pub fn owner_document(&self, node: Node) -> Option<Node> {
        self.arena()[node.get()].get().owner
    }

    // the document a node belongs to, which is the node itself for documents
    pub(crate) fn document_of(&self, node: Node) -> Node {
        self.owner_document(node).unwrap_or(node)
    }

    /// Obtain the document element from a document.
    ///
    /// Returns [`None`] if this isn't a document, or the document has no
    /// element yet.
    pub fn document_element(&self, document: Node) -> Option<Node> {
        if !self.is_document(document) {
            return None;
        }
        self.children(document).find(|&child| self.is_element(child))
    }

    /// Iterator over the child nodes of this node.
    ///
    /// Attributes aren't children even though they belong to an element.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.parse(r#"<p x="1"><a/><b/></p>"#).unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// assert_eq!(dom.children(p).count(), 2);
    /// ```
    pub fn children(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get()
            .children(self.arena())
            .skip_while(|id| !self.arena()[*id].get().value.is_normal())
            .map(Node::new)
    }

    /// Number of children.
    pub fn child_count(&self, node: Node) -> usize {
        self.children(node).count()
    }

    /// Get first child.
    ///
    /// Returns [`None`] if there are no children.
    pub fn first_child(&self, node: Node) -> Option<Node> {
        self.children(node).next()
    }

    /// Get last child.
    ///
    /// Returns [`None`] if there are no children.
    pub fn last_child(&self, node: Node) -> Option<Node> {
        let last_child = Node::new(self.arena()[node.get()].last_child()?);
        if self.is_normal(last_child) {
            Some(last_child)
        } else {
            None
        }
    }

    /// Get next sibling.
    ///
    /// Returns [`None`] if there is no next sibling, and always for
    /// attributes.
    pub fn next_sibling(&self, node: Node) -> Option<Node> {
        if !self.is_normal(node) {
            return None;
        }
        self.arena()[node.get()].next_sibling().map(Node::new)
    }

    /// Get previous sibling.
    ///
    /// Returns [`None`] if there is no previous sibling, and always for
    /// attributes.
    pub fn previous_sibling(&self, node: Node) -> Option<Node> {
        if !self.is_normal(node) {
            return None;
        }
        let previous = Node::new(self.arena()[node.get()].previous_sibling()?);
        if self.is_normal(previous) {
            Some(previous)
        } else {
            None
        }
    }

    /// Iterator over ancestor nodes, including this one.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    ///
    /// let doc = dom.parse("<a><b><c/></b></a>").unwrap();
    /// let a = dom.document_element(doc).unwrap();
    /// let b = dom.first_child(a).unwrap();
    /// let c = dom.first_child(b).unwrap();
    ///
    /// let ancestors = dom.ancestors(c).collect::<Vec<_>>();
    /// assert_eq!(ancestors, vec![c, b, a, doc]);
    /// ```
    pub fn ancestors(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        std::iter::successors(Some(node), move |&n| self.parent(n))
    }

    /// Iterator over the descendants of this node, including this one,
    /// in document order. Attributes aren't included.
    pub fn descendants(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        node.get()
            .descendants(self.arena())
            .map(Node::new)
            .filter(move |&n| n == node || self.is_normal(n))
    }

    /// Attribute nodes of an element, in insertion order.
    ///
    /// Namespace declarations are not attribute nodes; see
    /// [`Dom::namespace_declarations`].
    pub fn attributes(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        self.all_children(node)
            .take_while(move |&child| self.kind(child) == NodeKind::Attribute)
    }

    /// Number of attributes on an element.
    pub fn attribute_count(&self, node: Node) -> usize {
        self.attributes(node).count()
    }

    /// Find an attribute node by qualified name.
    pub fn attribute_node(&self, node: Node, qualified_name: &str) -> Option<Node> {
        self.attributes(node).find(|&attribute| {
            self.attribute_value(attribute)
                .map(|a| a.name.qualified() == qualified_name)
                .unwrap_or(false)
        })
    }

    /// Find an attribute node by namespace and local name.
    pub fn attribute_node_ns(
        &self,
        node: Node,
        namespace_uri: Option<&str>,
        local_name: &str,
    ) -> Option<Node> {
        let namespace_uri = namespace_uri.filter(|uri| !uri.is_empty());
        self.attributes(node).find(|&attribute| {
            self.attribute_value(attribute)
                .map(|a| {
                    a.name.namespace_uri() == namespace_uri && a.name.local_name == local_name
                })
                .unwrap_or(false)
        })
    }

    /// Get an attribute value by qualified name.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.parse(r#"<doc a="A"/>"#).unwrap();
    /// let doc_el = dom.document_element(doc).unwrap();
    /// assert_eq!(dom.attribute(doc_el, "a"), Some("A"));
    /// assert_eq!(dom.attribute(doc_el, "b"), None);
    /// ```
    pub fn attribute(&self, node: Node, qualified_name: &str) -> Option<&str> {
        let attribute = self.attribute_node(node, qualified_name)?;
        self.attribute_value(attribute).map(|a| a.value())
    }

    /// Whether the element has an attribute with this qualified name.
    ///
    /// Like the DOM, this also reports namespace declarations, so
    /// `xmlns:x` is present when the element declares prefix `x`.
    pub fn has_attribute(&self, node: Node, qualified_name: &str) -> bool {
        if self.attribute_node(node, qualified_name).is_some() {
            return true;
        }
        let declared_prefix = match QName::split(qualified_name) {
            (None, "xmlns") => "",
            (Some("xmlns"), prefix) => prefix,
            _ => return false,
        };
        self.element(node)
            .map(|element| element.get_namespace(declared_prefix).is_some())
            .unwrap_or(false)
    }

    /// Namespace declarations made on this element itself.
    ///
    /// Declarations that undeclare the default namespace (`xmlns=""`) don't
    /// bind anything and are left out.
    pub fn namespace_declarations(&self, node: Node) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.element(node)
            .into_iter()
            .flat_map(|element| element.prefixes.iter())
            .filter(|(_, uri)| !uri.is_empty())
            .map(|(prefix, uri)| (prefix.as_str(), uri.as_str()))
    }

    /// Look up the namespace URI bound to a prefix at this node.
    ///
    /// Use `None` (or the empty string) to look up the default namespace.
    /// This follows the DOM "locate a namespace" algorithm: a document
    /// delegates to its document element, an attribute to its owner
    /// element, and everything else to its parent element.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.parse(r#"<a xmlns:x="urn:x"><b/></a>"#).unwrap();
    /// let a = dom.document_element(doc).unwrap();
    /// let b = dom.first_child(a).unwrap();
    /// assert_eq!(dom.lookup_namespace_uri(b, Some("x")), Some("urn:x"));
    /// assert_eq!(dom.lookup_namespace_uri(doc, Some("x")), Some("urn:x"));
    /// assert_eq!(dom.lookup_namespace_uri(b, Some("y")), None);
    /// ```
    pub fn lookup_namespace_uri(&self, node: Node, prefix: Option<&str>) -> Option<&str> {
        let prefix = prefix.unwrap_or("");
        match prefix {
            "xml" => return Some(XML_NAMESPACE),
            "xmlns" => return Some(XMLNS_NAMESPACE),
            _ => {}
        }
        let start = match self.kind(node) {
            NodeKind::Element => Some(node),
            NodeKind::Document => self.document_element(node),
            NodeKind::Attribute => self.owner_element(node),
            NodeKind::DocumentType
            | NodeKind::DocumentFragment
            | NodeKind::Entity
            | NodeKind::Notation => None,
            _ => self.parent(node).filter(|&p| self.is_element(p)),
        }?;
        for ancestor in self.ancestors(start) {
            let element = match self.element(ancestor) {
                Some(element) => element,
                None => break,
            };
            if element.name.namespace_uri.is_some()
                && element.name.prefix.as_deref().unwrap_or("") == prefix
            {
                return element.name.namespace_uri();
            }
            if let Some(uri) = element.get_namespace(prefix) {
                return if uri.is_empty() { None } else { Some(uri) };
            }
        }
        None
    }

    /// Concatenated text of this node.
    ///
    /// For elements, fragments and documents this joins all descendant
    /// text and CDATA; for other kinds it's the node's own data.
    pub fn text_content(&self, node: Node) -> String {
        match self.value(node) {
            Value::Element(_) | Value::DocumentFragment | Value::Document => self
                .descendants(node)
                .filter_map(|n| self.text_str(n))
                .collect(),
            Value::Text(text) | Value::CdataSection(text) => text.get().to_string(),
            Value::Comment(comment) => comment.get().to_string(),
            Value::Attribute(attribute) => attribute.value.clone(),
            Value::ProcessingInstruction(pi) => pi.data.clone(),
            _ => String::new(),
        }
    }
}
