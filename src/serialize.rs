use std::io::{self, Write};

use indextree::NodeEdge;

use crate::access::XML_NAMESPACE;
use crate::dom::{Dom, Node};
use crate::entity::{serialize_attribute, serialize_text};
use crate::error::Error;
use crate::value::{External, Prefixes, QName, Value};

pub(crate) struct Serializer<'a, W: Write> {
    dom: &'a Dom,
    writer: &'a mut W,
    // bindings made by the ancestors of the serialized node
    base: Prefixes,
    scopes: Vec<Prefixes>,
}

impl<'a, W: Write> Serializer<'a, W> {
    pub(crate) fn new(dom: &'a Dom, writer: &'a mut W) -> Self {
        Serializer {
            dom,
            writer,
            base: Prefixes::new(),
            scopes: Vec::new(),
        }
    }

    fn seed(&mut self, node: Node) {
        let dom = self.dom;
        let ancestors = dom.ancestors(node).skip(1).collect::<Vec<_>>();
        for ancestor in ancestors.into_iter().rev() {
            if let Some(element) = dom.element(ancestor) {
                for (prefix, uri) in element.prefixes() {
                    bind(&mut self.base, prefix, uri);
                }
                bind_name(&mut self.base, element.name());
                for attribute in dom.attributes(ancestor) {
                    if let Some(attribute) = dom.attribute_value(attribute) {
                        if attribute.name().prefix().is_some() {
                            bind_name(&mut self.base, attribute.name());
                        }
                    }
                }
            }
        }
    }

    fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }
        self.scopes
            .iter()
            .rev()
            .chain(std::iter::once(&self.base))
            .find_map(|prefixes| {
                prefixes
                    .iter()
                    .find(|(p, _)| p == prefix)
                    .map(|(_, uri)| uri.as_str())
            })
            .filter(|uri| !uri.is_empty())
    }

    /// Serialize a node and all its descendants.
    pub(crate) fn serialize_node(&mut self, node: Node) -> Result<(), Error> {
        let dom = self.dom;
        match dom.value(node) {
            Value::Attribute(attribute) => {
                let name = attribute.name().qualified();
                return self.write_attribute(&name, attribute.value());
            }
            Value::Entity(entity) => return self.write_external("ENTITY", entity),
            Value::Notation(notation) => return self.write_external("NOTATION", notation),
            _ => {}
        }
        self.seed(node);
        for edge in node.get().traverse(dom.arena()) {
            match edge {
                NodeEdge::Start(id) => self.handle_edge_start(Node::new(id))?,
                NodeEdge::End(id) => self.handle_edge_end(Node::new(id))?,
            }
        }
        Ok(())
    }

    fn handle_edge_start(&mut self, node: Node) -> Result<(), Error> {
        let dom = self.dom;
        match dom.value(node) {
            Value::Document | Value::DocumentFragment => {}
            Value::Element(element) => {
                let mut declarations = element.prefixes().clone();
                self.scopes.push(element.prefixes().clone());
                self.declare(element.name(), &mut declarations, true);
                let mut attributes = Vec::new();
                for attribute in dom.attributes(node) {
                    if let Some(attribute) = dom.attribute_value(attribute) {
                        let name = attribute.name();
                        let qualified = match (name.prefix(), name.namespace_uri()) {
                            (None, Some(uri)) => {
                                let prefix = self.attribute_prefix(uri, &mut declarations);
                                format!("{}:{}", prefix, name.local_name())
                            }
                            _ => {
                                self.declare(name, &mut declarations, false);
                                name.qualified()
                            }
                        };
                        attributes.push((qualified, attribute.value()));
                    }
                }
                write!(self.writer, "<{}", element.name().qualified())?;
                for (prefix, uri) in &declarations {
                    if prefix.is_empty() {
                        write!(self.writer, " xmlns=\"{}\"", serialize_attribute(uri))?;
                    } else {
                        write!(self.writer, " xmlns:{}=\"{}\"", prefix, serialize_attribute(uri))?;
                    }
                }
                for (name, value) in attributes {
                    self.writer.write_all(b" ")?;
                    self.write_attribute(&name, value)?;
                }
                if dom.first_child(node).is_some() {
                    self.writer.write_all(b">")?;
                } else {
                    self.writer.write_all(b"/>")?;
                }
            }
            Value::Text(text) => {
                self.writer.write_all(serialize_text(text.get()).as_bytes())?;
            }
            Value::CdataSection(text) => {
                // `]]>` can't occur inside a section, so split it over two
                let text = text.get().replace("]]>", "]]]]><![CDATA[>");
                write!(self.writer, "<![CDATA[{}]]>", text)?;
            }
            Value::Comment(comment) => {
                write!(self.writer, "<!--{}-->", comment.get())?;
            }
            Value::ProcessingInstruction(pi) => {
                if pi.data().is_empty() {
                    write!(self.writer, "<?{}?>", pi.target())?;
                } else {
                    write!(self.writer, "<?{} {}?>", pi.target(), pi.data())?;
                }
            }
            Value::EntityReference(reference) => {
                write!(self.writer, "&{};", reference.name())?;
            }
            Value::DocumentType(doctype) => {
                write!(self.writer, "<!DOCTYPE {}", doctype.name())?;
                self.write_ids(doctype.public_id(), doctype.system_id())?;
                self.writer.write_all(b">")?;
            }
            // written with their element, or not at all
            Value::Attribute(_) | Value::Entity(_) | Value::Notation(_) => {}
        }
        Ok(())
    }

    fn handle_edge_end(&mut self, node: Node) -> Result<(), Error> {
        let dom = self.dom;
        if let Value::Element(element) = dom.value(node) {
            if dom.first_child(node).is_some() {
                write!(self.writer, "</{}>", element.name().qualified())?;
            }
            self.scopes.pop();
        }
        Ok(())
    }

    // add a declaration when a name's prefix isn't bound to its namespace
    // in the current scope
    fn declare(&mut self, name: &QName, declarations: &mut Prefixes, is_element: bool) {
        let prefix = name.prefix().unwrap_or("");
        if prefix.is_empty() && !is_element {
            return;
        }
        let uri = name.namespace_uri().unwrap_or("");
        if self.resolve(prefix).unwrap_or("") == uri {
            return;
        }
        bind(declarations, prefix, uri);
        if let Some(scope) = self.scopes.last_mut() {
            bind(scope, prefix, uri);
        }
    }

    // an attribute in a namespace needs a prefix; use one that's already
    // bound to it, or make one up
    fn attribute_prefix(&mut self, uri: &str, declarations: &mut Prefixes) -> String {
        if uri == XML_NAMESPACE {
            return "xml".to_string();
        }
        let candidates = self
            .scopes
            .iter()
            .rev()
            .chain(std::iter::once(&self.base))
            .flat_map(|prefixes| prefixes.iter())
            .filter(|(prefix, bound)| !prefix.is_empty() && bound == uri)
            .map(|(prefix, _)| prefix.clone())
            .collect::<Vec<_>>();
        if let Some(prefix) = candidates
            .into_iter()
            .find(|prefix| self.resolve(prefix) == Some(uri))
        {
            return prefix;
        }
        let prefix = (1..)
            .map(|n| format!("ns{}", n))
            .find(|prefix| self.resolve(prefix).is_none())
            .unwrap_or_default();
        bind(declarations, &prefix, uri);
        if let Some(scope) = self.scopes.last_mut() {
            bind(scope, &prefix, uri);
        }
        prefix
    }

    fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), Error> {
        write!(self.writer, "{}=\"{}\"", name, serialize_attribute(value))?;
        Ok(())
    }

    fn write_ids(&mut self, public_id: &str, system_id: &str) -> Result<(), Error> {
        if !public_id.is_empty() {
            write!(self.writer, " PUBLIC \"{}\"", public_id)?;
            if !system_id.is_empty() {
                write!(self.writer, " \"{}\"", system_id)?;
            }
        } else if !system_id.is_empty() {
            write!(self.writer, " SYSTEM \"{}\"", system_id)?;
        }
        Ok(())
    }

    fn write_external(&mut self, keyword: &str, external: &External) -> Result<(), Error> {
        write!(self.writer, "<!{} {}", keyword, external.name())?;
        self.write_ids(external.public_id(), external.system_id())?;
        self.writer.write_all(b">")?;
        Ok(())
    }
}

fn bind(prefixes: &mut Prefixes, prefix: &str, uri: &str) {
    if let Some(entry) = prefixes.iter_mut().find(|(p, _)| p == prefix) {
        entry.1 = uri.to_string();
    } else {
        prefixes.push((prefix.to_string(), uri.to_string()));
    }
}

fn bind_name(prefixes: &mut Prefixes, name: &QName) {
    if let Some(uri) = name.namespace_uri() {
        bind(prefixes, name.prefix().unwrap_or(""), uri);
    }
}

/// ## Serialization
impl Dom {
    /// Serialize a node and its descendants as XML to a writer.
    ///
    /// Namespace prefixes used by the output that aren't declared by the
    /// node or its ancestors are declared where they're first used, so
    /// the output of a detached node is well-formed on its own. An
    /// attribute in a namespace but without a prefix is written with a
    /// prefix already bound to its namespace, or a generated `nsN` one.
    pub fn serialize(&self, node: Node, writer: &mut impl Write) -> Result<(), Error> {
        let mut serializer = Serializer::new(self, writer);
        serializer.serialize_node(node)
    }

    /// Serialize a node and its descendants to a string.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.parse("<p>A &amp; B</p>").unwrap();
    /// assert_eq!(dom.to_string(doc).unwrap(), "<p>A &amp; B</p>");
    /// ```
    pub fn to_string(&self, node: Node) -> Result<String, Error> {
        let mut buf = Vec::new();
        self.serialize(node, &mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}
