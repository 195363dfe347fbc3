use xmlparser::{ElementEnd, EntityDefinition, ExternalId, StrSpan, Token, Tokenizer};

use crate::access::{XMLNS_NAMESPACE, XML_NAMESPACE};
use crate::dom::{Dom, Node};
use crate::entity::{parse_attribute, parse_text, Chunk};
use crate::error::Error;
use crate::value::{Attribute, Element, Prefixes, QName, Value};

// an element whose start tag we're still reading
struct PendingElement<'x> {
    prefix: &'x str,
    local: &'x str,
    attributes: Vec<(&'x str, &'x str, &'x str)>,
    prefixes: Prefixes,
}

struct DocumentBuilder<'d, 'x> {
    dom: &'d mut Dom,
    xml: &'x str,
    root: Node,
    // undeclared prefixes are looked up here when parsing a fragment
    context: Option<Node>,
    open: Vec<Node>,
    pending: Option<PendingElement<'x>>,
    doctype: Option<Node>,
    subset_start: Option<usize>,
}

impl<'d, 'x> DocumentBuilder<'d, 'x> {
    fn new(dom: &'d mut Dom, xml: &'x str, root: Node, context: Option<Node>) -> Self {
        DocumentBuilder {
            dom,
            xml,
            root,
            context,
            open: Vec::new(),
            pending: None,
            doctype: None,
            subset_start: None,
        }
    }

    fn parent(&self) -> Node {
        self.open.last().copied().unwrap_or(self.root)
    }

    fn in_dtd(&self) -> bool {
        self.subset_start.is_some()
    }

    fn add(&mut self, node: Node) -> Result<(), Error> {
        let parent = self.parent();
        self.dom.append_child(parent, node)?;
        Ok(())
    }

    fn resolve(&self, declared: &Prefixes, prefix: &str) -> Result<Option<String>, Error> {
        match prefix {
            "xml" => return Ok(Some(XML_NAMESPACE.to_string())),
            "xmlns" => return Ok(Some(XMLNS_NAMESPACE.to_string())),
            _ => {}
        }
        let declarations = std::iter::once(declared).chain(
            self.open
                .iter()
                .rev()
                .filter_map(|&n| self.dom.element(n).map(|element| element.prefixes())),
        );
        for prefixes in declarations {
            if let Some((_, uri)) = prefixes.iter().find(|(p, _)| p == prefix) {
                return Ok(if uri.is_empty() { None } else { Some(uri.clone()) });
            }
        }
        let in_context = self.context.and_then(|context| {
            self.dom
                .lookup_namespace_uri(context, Some(prefix))
                .map(String::from)
        });
        match in_context {
            Some(uri) => Ok(Some(uri)),
            None if prefix.is_empty() => Ok(None),
            None => Err(Error::UnknownPrefix(prefix.to_string())),
        }
    }

    fn element_start(&mut self, prefix: StrSpan<'x>, local: StrSpan<'x>) {
        self.pending = Some(PendingElement {
            prefix: prefix.as_str(),
            local: local.as_str(),
            attributes: Vec::new(),
            prefixes: Prefixes::new(),
        });
    }

    fn attribute(&mut self, prefix: &'x str, local: &'x str, value: &'x str) -> Result<(), Error> {
        let pending = self.pending.as_mut().ok_or(Error::UnclosedTag)?;
        match (prefix, local) {
            ("", "xmlns") => pending.prefixes.push((String::new(), parse_attribute(value)?.into())),
            ("xmlns", prefix) => pending
                .prefixes
                .push((prefix.to_string(), parse_attribute(value)?.into())),
            _ => pending.attributes.push((prefix, local, value)),
        }
        Ok(())
    }

    fn open_element(&mut self) -> Result<Node, Error> {
        let pending = self.pending.take().ok_or(Error::UnclosedTag)?;
        let namespace_uri = self.resolve(&pending.prefixes, pending.prefix)?;
        let name = QName::new(namespace_uri.as_deref(), Some(pending.prefix), pending.local);
        let mut attributes = Vec::with_capacity(pending.attributes.len());
        for &(prefix, local, value) in &pending.attributes {
            // unprefixed attributes are in no namespace
            let namespace_uri = if prefix.is_empty() {
                None
            } else {
                self.resolve(&pending.prefixes, prefix)?
            };
            attributes.push(Attribute {
                name: QName::new(namespace_uri.as_deref(), Some(prefix), local),
                value: parse_attribute(value)?.into_owned(),
            });
        }
        let element = Element {
            name,
            prefixes: pending.prefixes,
        };
        let owner = self.dom.document_of(self.root);
        let node = self.dom.new_node(Value::Element(element), Some(owner));
        for attribute in attributes {
            self.dom.add_attribute(node, attribute)?;
        }
        self.add(node)?;
        Ok(node)
    }

    fn close_element(&mut self, prefix: &str, local: &str) -> Result<(), Error> {
        let node = self.open.pop().ok_or(Error::UnclosedTag)?;
        let expected = self.dom.node_name(node);
        let found = if prefix.is_empty() {
            local.to_string()
        } else {
            format!("{}:{}", prefix, local)
        };
        if expected != found {
            return Err(Error::InvalidCloseTag(expected, found));
        }
        Ok(())
    }

    fn text(&mut self, text: &'x str) -> Result<(), Error> {
        let parent = self.parent();
        // whitespace between top-level markup isn't content
        if self.dom.is_document(parent) && text.trim().is_empty() {
            return Ok(());
        }
        for chunk in parse_text(text)? {
            let node = match chunk {
                Chunk::Text(text) => self.dom.create_text_node(parent, &text),
                Chunk::Reference(name) => self.dom.create_entity_reference(parent, name),
            };
            self.add(node)?;
        }
        Ok(())
    }

    fn doctype(&mut self, name: &str, external_id: Option<ExternalId>) -> Result<(), Error> {
        let (public_id, system_id) = external_ids(external_id);
        let doctype = self
            .dom
            .create_document_type(self.root, name, public_id, system_id);
        self.add(doctype)?;
        self.doctype = Some(doctype);
        Ok(())
    }

    fn entity(&mut self, name: &str, definition: EntityDefinition) -> Result<(), Error> {
        let doctype = match self.doctype {
            Some(doctype) => doctype,
            None => return Ok(()),
        };
        let (public_id, system_id) = match definition {
            EntityDefinition::EntityValue(_) => ("", ""),
            EntityDefinition::ExternalId(external_id) => external_ids(Some(external_id)),
        };
        self.dom.create_entity(doctype, name, public_id, system_id)?;
        Ok(())
    }

    // the tokenizer skips notation declarations, so we read them from the
    // internal subset ourselves
    fn end_dtd(&mut self, end: usize) -> Result<(), Error> {
        let start = match self.subset_start.take() {
            Some(start) => start,
            None => return Ok(()),
        };
        let doctype = match self.doctype {
            Some(doctype) => doctype,
            None => return Ok(()),
        };
        let subset = self.xml.get(start..end).unwrap_or_default();
        for (name, public_id, system_id) in notations(subset) {
            self.dom
                .create_notation(doctype, name, public_id, system_id)?;
        }
        Ok(())
    }

    fn token(&mut self, token: Token<'x>) -> Result<(), Error> {
        match token {
            Token::Declaration { .. } => {}
            Token::DtdStart {
                name,
                external_id,
                span,
            } => {
                self.doctype(name.as_str(), external_id)?;
                self.subset_start = Some(span.end());
            }
            Token::EmptyDtd {
                name, external_id, ..
            } => {
                self.doctype(name.as_str(), external_id)?;
            }
            Token::EntityDeclaration {
                name, definition, ..
            } => {
                self.entity(name.as_str(), definition)?;
            }
            Token::DtdEnd { span } => {
                self.end_dtd(span.start())?;
            }
            // comments and processing instructions in the internal subset
            // aren't part of the tree
            Token::Comment { .. } | Token::ProcessingInstruction { .. } if self.in_dtd() => {}
            Token::Comment { text, .. } => {
                let comment = self.dom.create_comment(self.root, text.as_str());
                self.add(comment)?;
            }
            Token::ProcessingInstruction {
                target, content, ..
            } => {
                let data = content.map(|c| c.as_str()).unwrap_or_default();
                let pi = self
                    .dom
                    .create_processing_instruction(self.root, target.as_str(), data);
                self.add(pi)?;
            }
            Token::ElementStart { prefix, local, .. } => {
                self.element_start(prefix, local);
            }
            Token::Attribute {
                prefix,
                local,
                value,
                ..
            } => {
                self.attribute(prefix.as_str(), local.as_str(), value.as_str())?;
            }
            Token::ElementEnd { end, .. } => match end {
                ElementEnd::Open => {
                    let node = self.open_element()?;
                    self.open.push(node);
                }
                ElementEnd::Empty => {
                    self.open_element()?;
                }
                ElementEnd::Close(prefix, local) => {
                    self.close_element(prefix.as_str(), local.as_str())?;
                }
            },
            Token::Text { text } => {
                self.text(text.as_str())?;
            }
            Token::Cdata { text, .. } => {
                let parent = self.parent();
                let cdata = self.dom.create_cdata_section(parent, text.as_str());
                self.add(cdata)?;
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Node, Error> {
        if !self.open.is_empty() || self.pending.is_some() {
            return Err(Error::UnclosedTag);
        }
        Ok(self.root)
    }
}

fn external_ids<'a>(external_id: Option<ExternalId<'a>>) -> (&'a str, &'a str) {
    match external_id {
        Some(ExternalId::System(system_id)) => ("", system_id.as_str()),
        Some(ExternalId::Public(public_id, system_id)) => (public_id.as_str(), system_id.as_str()),
        None => ("", ""),
    }
}

// `<!NOTATION name SYSTEM "s">` or `<!NOTATION name PUBLIC "p" ["s"]>`
fn notations(subset: &str) -> Vec<(&str, &str, &str)> {
    let mut result = Vec::new();
    for declaration in subset.split("<!NOTATION").skip(1) {
        let declaration = match declaration.split_once('>') {
            Some((declaration, _)) => declaration.trim_start(),
            None => continue,
        };
        let (name, rest) = match declaration.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim_start()),
            None => continue,
        };
        let (public_id, system_id) = match (rest.split_whitespace().next(), quoted(rest).as_slice()) {
            (Some("SYSTEM"), [system_id, ..]) => ("", *system_id),
            (Some("PUBLIC"), [public_id]) => (*public_id, ""),
            (Some("PUBLIC"), [public_id, system_id, ..]) => (*public_id, *system_id),
            _ => continue,
        };
        result.push((name, public_id, system_id));
    }
    result
}

fn quoted(s: &str) -> Vec<&str> {
    let mut literals = Vec::new();
    let mut rest = s;
    while let Some(start) = rest.find(|c: char| c == '"' || c == '\'') {
        let quote = &rest[start..start + 1];
        let after = &rest[start + 1..];
        match after.find(quote) {
            Some(end) => {
                literals.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    literals
}

/// ## Parsing
impl Dom {
    /// Parse a string containing XML into a document node.
    ///
    /// Whitespace outside the document element is dropped. Predefined and
    /// character references are decoded; other entity references become
    /// [`EntityReference`](crate::EntityReference) nodes.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.parse("<p>Example</p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// assert_eq!(dom.text_content(p), "Example");
    /// ```
    pub fn parse(&mut self, xml: &str) -> Result<Node, Error> {
        let document = self.create_document();
        let mut builder = DocumentBuilder::new(self, xml, document, None);
        for token in Tokenizer::from(xml) {
            builder.token(token?)?;
        }
        builder.finish()
    }

    /// Parse well-balanced XML content into a document fragment.
    ///
    /// The fragment belongs to the document of `context`, and prefixes the
    /// content doesn't declare itself are looked up on `context`.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.parse(r#"<x xmlns:x="urn:x"/>"#).unwrap();
    /// let x = dom.document_element(doc).unwrap();
    /// let fragment = dom.parse_fragment("<x:y/>text", x).unwrap();
    /// let y = dom.first_child(fragment).unwrap();
    /// assert_eq!(dom.lookup_namespace_uri(y, Some("x")), Some("urn:x"));
    /// assert_eq!(dom.child_count(fragment), 2);
    /// ```
    pub fn parse_fragment(&mut self, xml: &str, context: Node) -> Result<Node, Error> {
        let fragment = self.create_document_fragment(context);
        let mut builder = DocumentBuilder::new(self, xml, fragment, Some(context));
        for token in Tokenizer::from_fragment(xml, 0..xml.len()) {
            builder.token(token?)?;
        }
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notations() {
        let subset = r#"
            <!ENTITY foo '<foo/>'>
            <!NOTATION a SYSTEM "a.dtd">
            <!NOTATION b PUBLIC 'pub'>
            <!NOTATION c PUBLIC "pub" "c.dtd">
        "#;
        assert_eq!(
            notations(subset),
            vec![("a", "", "a.dtd"), ("b", "pub", ""), ("c", "pub", "c.dtd")]
        );
    }

    #[test]
    fn test_quoted() {
        assert_eq!(quoted(r#"PUBLIC "a b" 'c'"#), vec!["a b", "c"]);
        assert_eq!(quoted(r#"SYSTEM "unclosed"#), Vec::<&str>::new());
    }
}
