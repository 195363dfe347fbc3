use crate::dom::{Dom, Node};
use crate::value::{
    Attribute, Comment, DocumentType, Element, NodeKind, ProcessingInstruction, Text, Value,
};

/// Obtain node values and their kinds.
///
/// These are handy if you only need to match against a single value or know
/// the node kind already. If you want to handle all kinds, use a
/// `match` statement on [`Value`](crate::Value) instead.
impl Dom {
    /// Access to the value for this node.
    ///
    /// ```rust
    /// use sugardom::{Dom, Value};
    ///
    /// let mut dom = Dom::new();
    /// let doc = dom.parse("<doc>Example</doc>").unwrap();
    /// let doc_el = dom.document_element(doc).unwrap();
    ///
    /// match dom.value(doc_el) {
    ///     Value::Element(element) => {
    ///         assert_eq!(element.name().local_name(), "doc");
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// ```
    #[inline]
    pub fn value(&self, node: Node) -> &Value {
        &self.arena[node.get()].get().value
    }

    /// Mutable access to the value for this node.
    #[inline]
    pub fn value_mut(&mut self, node: Node) -> &mut Value {
        &mut self.arena[node.get()].get_mut().value
    }

    /// Get the [`NodeKind`] of a node.
    pub fn kind(&self, node: Node) -> NodeKind {
        self.value(node).kind()
    }

    /// Return true if node is an element.
    pub fn is_element(&self, node: Node) -> bool {
        self.kind(node) == NodeKind::Element
    }

    /// Return true if node is a document.
    pub fn is_document(&self, node: Node) -> bool {
        self.kind(node) == NodeKind::Document
    }

    /// Return true if node is text. CDATA sections are not text.
    pub fn is_text(&self, node: Node) -> bool {
        self.kind(node) == NodeKind::Text
    }

    /// Return true if node is a comment.
    pub fn is_comment(&self, node: Node) -> bool {
        self.kind(node) == NodeKind::Comment
    }

    /// If this node's value is an element, return a reference to it.
    pub fn element(&self, node: Node) -> Option<&Element> {
        if let Value::Element(element) = self.value(node) {
            Some(element)
        } else {
            None
        }
    }

    /// If this node's value is an element, return a mutable reference to it.
    pub fn element_mut(&mut self, node: Node) -> Option<&mut Element> {
        if let Value::Element(element) = self.value_mut(node) {
            Some(element)
        } else {
            None
        }
    }

    /// If this node is an attribute, return a reference to it.
    pub fn attribute_value(&self, node: Node) -> Option<&Attribute> {
        if let Value::Attribute(attribute) = self.value(node) {
            Some(attribute)
        } else {
            None
        }
    }

    /// If this node is text or a CDATA section, return a reference to it.
    pub fn text(&self, node: Node) -> Option<&Text> {
        match self.value(node) {
            Value::Text(text) | Value::CdataSection(text) => Some(text),
            _ => None,
        }
    }

    /// If this node is text or a CDATA section, return a reference to the string.
    pub fn text_str(&self, node: Node) -> Option<&str> {
        self.text(node).map(|t| t.get())
    }

    /// If this node is text or a CDATA section, return a mutable reference to it.
    pub fn text_mut(&mut self, node: Node) -> Option<&mut Text> {
        match self.value_mut(node) {
            Value::Text(text) | Value::CdataSection(text) => Some(text),
            _ => None,
        }
    }

    /// If this node's value is a comment, return a reference to it.
    pub fn comment(&self, node: Node) -> Option<&Comment> {
        if let Value::Comment(comment) = self.value(node) {
            Some(comment)
        } else {
            None
        }
    }

    /// If this node's value is a comment, return a reference to the string.
    pub fn comment_str(&self, node: Node) -> Option<&str> {
        self.comment(node).map(|c| c.get())
    }

    /// If this node's value is a processing instruction, return a reference to it.
    pub fn processing_instruction(&self, node: Node) -> Option<&ProcessingInstruction> {
        if let Value::ProcessingInstruction(pi) = self.value(node) {
            Some(pi)
        } else {
            None
        }
    }

    /// If this node is a document type, return a reference to it.
    pub fn document_type(&self, node: Node) -> Option<&DocumentType> {
        if let Value::DocumentType(doctype) = self.value(node) {
            Some(doctype)
        } else {
            None
        }
    }

    /// The DOM `nodeName` of a node.
    ///
    /// Elements and attributes give their qualified name; other kinds give
    /// their target or name, or a fixed `#kind` string.
    pub fn node_name(&self, node: Node) -> String {
        match self.value(node) {
            Value::Element(element) => element.name.qualified(),
            Value::Attribute(attribute) => attribute.name.qualified(),
            Value::Text(_) => "#text".to_string(),
            Value::CdataSection(_) => "#cdata-section".to_string(),
            Value::Comment(_) => "#comment".to_string(),
            Value::Document => "#document".to_string(),
            Value::DocumentFragment => "#document-fragment".to_string(),
            Value::DocumentType(doctype) => doctype.name.clone(),
            Value::ProcessingInstruction(pi) => pi.target.clone(),
            Value::EntityReference(reference) => reference.name.clone(),
            Value::Entity(entity) => entity.name.clone(),
            Value::Notation(notation) => notation.name.clone(),
        }
    }
}
