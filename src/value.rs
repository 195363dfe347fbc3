use std::fmt;

/// The kind of a node.
///
/// Access it using [`Value::kind`] or
/// [`Dom::kind`](crate::Dom::kind).
///
/// The `NodeKind` can be used if you are interested in the kind of the
/// value without needing to match on it. Its `Display` form is the DOM
/// interface name, which is also what error messages use.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Element,
    Attribute,
    Text,
    CdataSection,
    EntityReference,
    Entity,
    ProcessingInstruction,
    Comment,
    Document,
    DocumentType,
    DocumentFragment,
    Notation,
}

impl NodeKind {
    /// Character data kinds: text, CDATA sections and comments.
    pub fn is_character_data(self) -> bool {
        matches!(
            self,
            NodeKind::Text | NodeKind::CdataSection | NodeKind::Comment
        )
    }

    /// Kinds that may hold child nodes.
    pub fn can_have_children(self) -> bool {
        matches!(
            self,
            NodeKind::Element | NodeKind::Document | NodeKind::DocumentFragment
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Element => "Element",
            NodeKind::Attribute => "Attr",
            NodeKind::Text => "Text",
            NodeKind::CdataSection => "CdataSection",
            NodeKind::EntityReference => "EntityReference",
            NodeKind::Entity => "Entity",
            NodeKind::ProcessingInstruction => "ProcessingInstruction",
            NodeKind::Comment => "Comment",
            NodeKind::Document => "Document",
            NodeKind::DocumentType => "DocumentType",
            NodeKind::DocumentFragment => "DocumentFragment",
            NodeKind::Notation => "Notation",
        };
        f.write_str(name)
    }
}

/// A node value.
///
/// Access it using [`Dom::value`](crate::Dom::value) or
/// mutably using [`Dom::value_mut`](crate::Dom::value_mut).
#[derive(Debug, Clone)]
pub enum Value {
    /// Document node. This is not the same as the document element.
    Document,
    /// Holds nodes temporarily; inserting it moves its children.
    DocumentFragment,
    DocumentType(DocumentType),
    Element(Element),
    /// An attribute. It is owned by an element but isn't one of its
    /// children.
    Attribute(Attribute),
    Text(Text),
    CdataSection(Text),
    Comment(Comment),
    ProcessingInstruction(ProcessingInstruction),
    EntityReference(EntityReference),
    /// An entity declared in a document type.
    Entity(External),
    /// A notation declared in a document type.
    Notation(External),
}

impl Value {
    /// Returns the kind of the value.
    pub fn kind(&self) -> NodeKind {
        match self {
            Value::Document => NodeKind::Document,
            Value::DocumentFragment => NodeKind::DocumentFragment,
            Value::DocumentType(_) => NodeKind::DocumentType,
            Value::Element(_) => NodeKind::Element,
            Value::Attribute(_) => NodeKind::Attribute,
            Value::Text(_) => NodeKind::Text,
            Value::CdataSection(_) => NodeKind::CdataSection,
            Value::Comment(_) => NodeKind::Comment,
            Value::ProcessingInstruction(_) => NodeKind::ProcessingInstruction,
            Value::EntityReference(_) => NodeKind::EntityReference,
            Value::Entity(_) => NodeKind::Entity,
            Value::Notation(_) => NodeKind::Notation,
        }
    }

    // attributes, entities and notations hang off their owner in the arena
    // without being its children
    pub(crate) fn is_normal(&self) -> bool {
        !matches!(
            self,
            Value::Attribute(_) | Value::Entity(_) | Value::Notation(_)
        )
    }
}

/// A namespace-qualified name as the DOM sees it: the prefix is part of
/// the name, not just a serialization detail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub(crate) namespace_uri: Option<String>,
    pub(crate) prefix: Option<String>,
    pub(crate) local_name: String,
}

impl QName {
    pub(crate) fn new(namespace_uri: Option<&str>, prefix: Option<&str>, local_name: &str) -> Self {
        QName {
            namespace_uri: namespace_uri.filter(|uri| !uri.is_empty()).map(String::from),
            prefix: prefix.filter(|p| !p.is_empty()).map(String::from),
            local_name: local_name.to_string(),
        }
    }

    /// Split `prefix:local` into its prefix (if any) and local name.
    pub(crate) fn split(qualified_name: &str) -> (Option<&str>, &str) {
        match qualified_name.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, qualified_name),
        }
    }

    pub fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// The qualified name, `prefix:local` or just `local`.
    pub fn qualified(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.local_name),
            None => self.local_name.clone(),
        }
    }
}

/// A list of namespace declarations, prefix to namespace URI. The empty
/// prefix stands for the default namespace.
pub type Prefixes = Vec<(String, String)>;

/// Element value.
///
/// Example: `<foo/>` or `<xsl:if test="@bar"/>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) name: QName,
    pub(crate) prefixes: Prefixes,
}

impl Element {
    pub(crate) fn new(name: QName) -> Self {
        Element {
            name,
            prefixes: Prefixes::new(),
        }
    }

    /// The name of the element.
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// Namespace declarations made on this element, in document order.
    ///
    /// This does not include declarations made on ancestors.
    pub fn prefixes(&self) -> &Prefixes {
        &self.prefixes
    }

    /// Get the namespace for a prefix, if declared on this element.
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Declare a prefix on this element, replacing an earlier declaration
    /// of the same prefix.
    pub fn set_prefix<S: Into<String>>(&mut self, prefix: &str, namespace_uri: S) {
        let namespace_uri = namespace_uri.into();
        if let Some(entry) = self.prefixes.iter_mut().find(|(p, _)| p == prefix) {
            entry.1 = namespace_uri;
        } else {
            self.prefixes.push((prefix.to_string(), namespace_uri));
        }
    }

    /// Remove a prefix declaration.
    pub fn remove_prefix(&mut self, prefix: &str) {
        self.prefixes.retain(|(p, _)| p != prefix);
    }
}

/// Attribute value.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub(crate) name: QName,
    pub(crate) value: String,
}

impl Attribute {
    pub fn name(&self) -> &QName {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set<S: Into<String>>(&mut self, value: S) {
        self.value = value.into();
    }
}

/// Text value, also used for CDATA sections.
///
/// The string is stored unescaped; escaping happens on serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub(crate) text: String,
}

impl Text {
    pub(crate) fn new(text: String) -> Self {
        Text { text }
    }

    pub fn get(&self) -> &str {
        &self.text
    }

    pub fn set<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
    }
}

/// Comment.
///
/// Example: `<!-- foo -->`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub(crate) text: String,
}

impl Comment {
    pub(crate) fn new(text: String) -> Self {
        Comment { text }
    }

    /// Get the comment text.
    pub fn get(&self) -> &str {
        &self.text
    }

    // `<!--a--->` doesn't parse
    pub(crate) fn is_valid(text: &str) -> bool {
        !text.contains("--") && !text.ends_with('-')
    }

    /// Set the comment text.
    ///
    /// Rejects text that contains `--` or ends with `-` as illegal.
    pub fn set<S: Into<String>>(&mut self, text: S) -> Result<(), crate::Error> {
        let text = text.into();
        if !Comment::is_valid(&text) {
            return Err(crate::Error::InvalidComment(text));
        }
        self.text = text;
        Ok(())
    }
}

/// Processing instruction.
///
/// Example: `<?foo?>` or `<?foo bar?>`. Missing data is the empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingInstruction {
    pub(crate) target: String,
    pub(crate) data: String,
}

impl ProcessingInstruction {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}

/// Reference to a non-predefined entity, such as `&nbsp;`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityReference {
    pub(crate) name: String,
}

impl EntityReference {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Document type declaration.
///
/// Example: `<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "xhtml1-strict.dtd">`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentType {
    pub(crate) name: String,
    pub(crate) public_id: String,
    pub(crate) system_id: String,
}

impl DocumentType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn public_id(&self) -> &str {
        &self.public_id
    }

    pub fn system_id(&self) -> &str {
        &self.system_id
    }
}

/// Entity or notation declared in a document type: a name plus optional
/// external identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct External {
    pub(crate) name: String,
    pub(crate) public_id: String,
    pub(crate) system_id: String,
}

impl External {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn public_id(&self) -> &str {
        &self.public_id
    }

    pub fn system_id(&self) -> &str {
        &self.system_id
    }
}
