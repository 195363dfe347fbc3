use crate::access::{XMLNS_NAMESPACE, XML_NAMESPACE};
use crate::dom::{Dom, Node, NodeData};
use crate::error::Error;
use crate::value::{
    Attribute, Comment, DocumentType, Element, EntityReference, External, ProcessingInstruction,
    QName, Text, Value,
};

/// ## Creation
///
/// Every creation function takes the document the new node belongs to. You
/// can pass any node; its owner document is used. New nodes are detached:
/// place them in the tree with [`Dom::append_child`], the action primitives
/// such as [`Dom::append`], or [`Dom::insert_adjacent`].
impl Dom {
    pub(crate) fn new_node(&mut self, value: Value, owner: Option<Node>) -> Node {
        Node::new(self.arena_mut().new_node(NodeData { value, owner }))
    }

    fn new_owned(&mut self, document: Node, value: Value) -> Node {
        let owner = self.document_of(document);
        self.new_node(value, Some(owner))
    }

    /// Create a new, empty document.
    pub fn create_document(&mut self) -> Node {
        self.new_node(Value::Document, None)
    }

    /// Create an empty document fragment.
    pub fn create_document_fragment(&mut self, document: Node) -> Node {
        self.new_owned(document, Value::DocumentFragment)
    }

    /// Create an element that isn't in any namespace.
    pub fn create_element(&mut self, document: Node, name: &str) -> Result<Node, Error> {
        if name.is_empty() {
            return Err(Error::InvalidQualifiedName(name.to_string()));
        }
        let element = Element::new(QName::new(None, None, name));
        Ok(self.new_owned(document, Value::Element(element)))
    }

    /// Create an element with a namespace and a qualified name.
    ///
    /// A prefix requires a namespace URI.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.create_document();
    /// let el = dom.create_element_ns(doc, Some("urn:foo"), "foo:bar").unwrap();
    /// assert_eq!(dom.to_string(el).unwrap(), r#"<foo:bar xmlns:foo="urn:foo"/>"#);
    /// ```
    pub fn create_element_ns(
        &mut self,
        document: Node,
        namespace_uri: Option<&str>,
        qualified_name: &str,
    ) -> Result<Node, Error> {
        let name = checked_qname(namespace_uri, qualified_name)?;
        Ok(self.new_owned(document, Value::Element(Element::new(name))))
    }

    /// Create a text node. The text is taken literally.
    pub fn create_text_node(&mut self, document: Node, text: &str) -> Node {
        self.new_owned(document, Value::Text(Text::new(text.to_string())))
    }

    /// Create a CDATA section.
    pub fn create_cdata_section(&mut self, document: Node, text: &str) -> Node {
        self.new_owned(document, Value::CdataSection(Text::new(text.to_string())))
    }

    /// Create a comment.
    ///
    /// Like the DOM, this doesn't validate the text; use
    /// [`NodeCreator::create_comment`](crate::NodeCreator::create_comment)
    /// for a checked variant.
    pub fn create_comment(&mut self, document: Node, text: &str) -> Node {
        self.new_owned(document, Value::Comment(Comment::new(text.to_string())))
    }

    /// Create a processing instruction.
    pub fn create_processing_instruction(
        &mut self,
        document: Node,
        target: &str,
        data: &str,
    ) -> Node {
        let pi = ProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        };
        self.new_owned(document, Value::ProcessingInstruction(pi))
    }

    /// Create a detached attribute without a namespace.
    pub fn create_attribute(
        &mut self,
        document: Node,
        name: &str,
        value: &str,
    ) -> Result<Node, Error> {
        self.create_attribute_ns(document, None, name, value)
    }

    /// Create a detached attribute with a namespace.
    pub fn create_attribute_ns(
        &mut self,
        document: Node,
        namespace_uri: Option<&str>,
        qualified_name: &str,
        value: &str,
    ) -> Result<Node, Error> {
        let name = checked_qname(namespace_uri, qualified_name)?;
        let attribute = Attribute {
            name,
            value: value.to_string(),
        };
        Ok(self.new_owned(document, Value::Attribute(attribute)))
    }

    /// Create a document type node.
    pub fn create_document_type(
        &mut self,
        document: Node,
        name: &str,
        public_id: &str,
        system_id: &str,
    ) -> Node {
        let doctype = DocumentType {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        };
        self.new_owned(document, Value::DocumentType(doctype))
    }

    /// Create a reference to a named entity.
    pub fn create_entity_reference(&mut self, document: Node, name: &str) -> Node {
        let reference = EntityReference {
            name: name.to_string(),
        };
        self.new_owned(document, Value::EntityReference(reference))
    }

    /// Declare an entity on a document type.
    pub fn create_entity(
        &mut self,
        doctype: Node,
        name: &str,
        public_id: &str,
        system_id: &str,
    ) -> Result<Node, Error> {
        let entity = external(name, public_id, system_id);
        self.declare_on_doctype(doctype, Value::Entity(entity))
    }

    /// Declare a notation on a document type.
    pub fn create_notation(
        &mut self,
        doctype: Node,
        name: &str,
        public_id: &str,
        system_id: &str,
    ) -> Result<Node, Error> {
        let notation = external(name, public_id, system_id);
        self.declare_on_doctype(doctype, Value::Notation(notation))
    }

    /// Entities declared on a document type.
    pub fn entities(&self, doctype: Node) -> impl Iterator<Item = Node> + '_ {
        self.all_children(doctype)
            .filter(move |&n| matches!(self.value(n), Value::Entity(_)))
    }

    /// Notations declared on a document type.
    pub fn notations(&self, doctype: Node) -> impl Iterator<Item = Node> + '_ {
        self.all_children(doctype)
            .filter(move |&n| matches!(self.value(n), Value::Notation(_)))
    }

    fn declare_on_doctype(&mut self, doctype: Node, value: Value) -> Result<Node, Error> {
        if self.document_type(doctype).is_none() {
            return Err(Error::HierarchyRequest(
                "Entities and notations can only be declared on a document type".into(),
            ));
        }
        let node = self.new_owned(doctype, value);
        doctype.get().checked_append(node.get(), self.arena_mut())?;
        Ok(node)
    }
}

fn external(name: &str, public_id: &str, system_id: &str) -> External {
    External {
        name: name.to_string(),
        public_id: public_id.to_string(),
        system_id: system_id.to_string(),
    }
}

pub(crate) fn checked_qname(
    namespace_uri: Option<&str>,
    qualified_name: &str,
) -> Result<QName, Error> {
    let invalid = || Error::InvalidQualifiedName(qualified_name.to_string());
    let namespace_uri = namespace_uri.filter(|uri| !uri.is_empty());
    let (prefix, local_name) = QName::split(qualified_name);
    if local_name.is_empty() || local_name.contains(':') {
        return Err(invalid());
    }
    if let Some(prefix) = prefix {
        if prefix.is_empty() || namespace_uri.is_none() {
            return Err(invalid());
        }
    }
    // the reserved prefixes are bound to their own namespaces only
    if prefix == Some("xml") && namespace_uri != Some(XML_NAMESPACE) {
        return Err(invalid());
    }
    let is_xmlns = prefix.unwrap_or(local_name) == "xmlns";
    if is_xmlns != (namespace_uri == Some(XMLNS_NAMESPACE)) {
        return Err(invalid());
    }
    Ok(QName::new(namespace_uri, prefix, local_name))
}
