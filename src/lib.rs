//! An XML DOM with conveniences for building trees, XSL templates in
//! particular.
//!
//! All nodes live in a [`Dom`] and are addressed with lightweight
//! [`Node`] handles. On top of the usual DOM operations this offers:
//!
//! - [`Dom::is_equal_node`], structural node equality.
//! - [`NodeCreator`], which creates XSL elements and checked elements and
//!   comments.
//! - [`Dom::call`], which resolves a call name like `appendXslIf` into
//!   creating a node and inserting it.
//! - [`Dom::insert_adjacent`] and friends, for inserting relative to a node.
//!
//! ```rust
//! use sugardom::{Arguments, Dom};
//!
//! let mut dom = Dom::new();
//! let doc = dom.parse(r#"<xsl:template xmlns:xsl="http://www.w3.org/1999/XSL/Transform"/>"#)?;
//! let template = dom.document_element(doc).unwrap();
//!
//! let choose = dom.call(template, "appendXslChoose", Arguments::new())?.unwrap();
//! dom.call(choose, "appendXslWhen", ["@foo", "foo"])?;
//! dom.call(choose, "appendXslOtherwise", ["bar"])?;
//!
//! assert_eq!(
//!     dom.to_string(choose)?,
//!     r#"<xsl:choose><xsl:when test="@foo">foo</xsl:when><xsl:otherwise>bar</xsl:otherwise></xsl:choose>"#
//! );
//! # Ok::<(), sugardom::Error>(())
//! ```
#![forbid(unsafe_code)]

mod access;
mod action;
mod compare;
mod creation;
mod creator;
mod dispatch;
mod dom;
mod entity;
mod error;
mod factory;
mod manipulation;
mod options;
mod parse;
mod position;
mod serialize;
mod value;
mod valueaccess;

pub use action::{Action, Mixin};
pub use creator::{NodeCreator, XSL_NAMESPACE};
pub use dom::{Dom, Node};
pub use error::{Dependency, Error};
pub use factory::{Arguments, Build, Factory, FactoryTable, Parameter};
pub use options::{Options, ParentlessInsertion};
pub use position::Position;
pub use value::{
    Attribute, Comment, DocumentType, Element, EntityReference, External, NodeKind,
    ProcessingInstruction, Prefixes, QName, Text, Value,
};
