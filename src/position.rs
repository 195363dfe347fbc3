use std::fmt;
use std::str::FromStr;

use crate::dom::{Dom, Node};
use crate::error::Error;
use crate::options::ParentlessInsertion;

/// Where to insert a node relative to another, as in the DOM
/// `insertAdjacentElement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Position {
    /// Just before the node, in its parent.
    BeforeBegin,
    /// Before the first child of the node.
    AfterBegin,
    /// After the last child of the node.
    BeforeEnd,
    /// Just after the node, in its parent.
    AfterEnd,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::BeforeBegin => "beforebegin",
            Position::AfterBegin => "afterbegin",
            Position::BeforeEnd => "beforeend",
            Position::AfterEnd => "afterend",
        }
    }

    /// Positions outside the node need a parent to insert into.
    pub fn is_sibling(self) -> bool {
        matches!(self, Position::BeforeBegin | Position::AfterEnd)
    }
}

impl FromStr for Position {
    type Err = Error;

    /// Parse a position, ignoring case.
    ///
    /// ```rust
    /// use sugardom::Position;
    ///
    /// assert_eq!("afterEnd".parse::<Position>().unwrap(), Position::AfterEnd);
    /// assert!("inside".parse::<Position>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beforebegin" => Ok(Position::BeforeBegin),
            "afterbegin" => Ok(Position::AfterBegin),
            "beforeend" => Ok(Position::BeforeEnd),
            "afterend" => Ok(Position::AfterEnd),
            _ => Err(Error::InvalidPosition(s.to_string())),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ## Adjacent insertion
///
/// `beforebegin` and `afterend` on a node without a parent follow
/// [`Options::parentless_insertion`](crate::Options): by default nothing
/// is inserted.
impl Dom {
    /// Insert a node at a position given as a string.
    ///
    /// Returns true if the node was inserted.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.parse("<p><b/></p>").unwrap();
    /// let p = dom.document_element(doc).unwrap();
    /// let b = dom.first_child(p).unwrap();
    /// let a = dom.create_element(doc, "a").unwrap();
    /// let c = dom.create_element(doc, "c").unwrap();
    /// dom.insert_adjacent(b, "beforebegin", a).unwrap();
    /// dom.insert_adjacent(b, "AfterEnd", c).unwrap();
    /// assert_eq!(dom.to_string(p).unwrap(), "<p><a/><b/><c/></p>");
    /// ```
    pub fn insert_adjacent(&mut self, node: Node, position: &str, new: Node) -> Result<bool, Error> {
        let position = position.parse()?;
        self.insert_adjacent_at(node, position, new)
    }

    /// Insert a node at a position.
    ///
    /// Returns true if the node was inserted.
    pub fn insert_adjacent_at(
        &mut self,
        node: Node,
        position: Position,
        new: Node,
    ) -> Result<bool, Error> {
        match position {
            Position::AfterBegin => {
                let first_child = self.first_child(node);
                self.pre_insert(node, new, first_child)?;
            }
            Position::BeforeEnd => {
                self.pre_insert(node, new, None)?;
            }
            Position::BeforeBegin | Position::AfterEnd => {
                let parent = match self.parent(node) {
                    Some(parent) => parent,
                    None => return self.parentless(node, position),
                };
                let reference = if position == Position::BeforeBegin {
                    Some(node)
                } else {
                    self.next_sibling(node)
                };
                self.pre_insert(parent, new, reference)?;
            }
        }
        Ok(true)
    }

    fn parentless(&self, node: Node, position: Position) -> Result<bool, Error> {
        match self.options.parentless_insertion {
            ParentlessInsertion::Ignore => Ok(false),
            ParentlessInsertion::Error => Err(Error::NoParent { node, position }),
        }
    }

    /// Insert an element at a position.
    ///
    /// Returns the element, or [`None`] if nothing was inserted.
    pub fn insert_adjacent_element(
        &mut self,
        node: Node,
        position: &str,
        element: Node,
    ) -> Result<Option<Node>, Error> {
        let position = position.parse()?;
        if !self.is_element(element) {
            return Err(Error::NotElement(element));
        }
        let inserted = self.insert_adjacent_at(node, position, element)?;
        Ok(inserted.then_some(element))
    }

    /// Insert text at a position.
    ///
    /// Returns the new text node, or [`None`] if nothing was inserted.
    pub fn insert_adjacent_text(
        &mut self,
        node: Node,
        position: &str,
        text: &str,
    ) -> Result<Option<Node>, Error> {
        let position = position.parse()?;
        let text_node = self.create_text_node(node, text);
        let inserted = self.insert_adjacent_at(node, position, text_node)?;
        Ok(inserted.then_some(text_node))
    }

    /// Parse XML content and insert it at a position.
    ///
    /// Prefixes the markup doesn't declare are looked up on `node`.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.parse(r#"<x xmlns:x="urn:x"><y/></x>"#).unwrap();
    /// let x = dom.document_element(doc).unwrap();
    /// let y = dom.first_child(x).unwrap();
    /// dom.insert_adjacent_xml(y, "afterbegin", "<x:z/>text").unwrap();
    /// assert_eq!(dom.to_string(x).unwrap(), r#"<x xmlns:x="urn:x"><y><x:z/>text</y></x>"#);
    /// ```
    pub fn insert_adjacent_xml(
        &mut self,
        node: Node,
        position: &str,
        xml: &str,
    ) -> Result<(), Error> {
        let position = position.parse()?;
        let fragment = self.parse_fragment(xml, node)?;
        self.insert_adjacent_at(node, position, fragment)?;
        Ok(())
    }
}
