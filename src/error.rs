use std::fmt;

use crate::action::Action;
use crate::dom::Node;
use crate::position::Position;
use crate::value::NodeKind;

/// The prerequisite a dynamic call depends on.
///
/// A call such as `appendXslIf` needs two things: the `append` action on
/// the calling node, and a `createXslIf` factory. When either is missing
/// the dispatcher reports which one through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    /// The action primitive isn't available on this node kind.
    Action {
        /// The kind of the calling node.
        kind: NodeKind,
        /// The action it was asked to perform.
        action: Action,
    },
    /// No factory is registered under this creatable name.
    Factory {
        /// The creatable name, as it appeared in the call.
        name: String,
    },
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::Action { kind, action } => write!(f, "{}::{}()", kind, action),
            Dependency::Factory { name } => write!(f, "NodeCreator::create{}()", name),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    /// The call name doesn't correspond to any capability at all.
    UnknownMethod { kind: NodeKind, call: String },
    /// The call name parses, but one of its prerequisites is missing.
    UnsupportedMethod {
        kind: NodeKind,
        call: String,
        dependency: Dependency,
    },
    /// More positional arguments than the factory has parameters.
    TooManyArguments {
        call: String,
        expected: usize,
        given: usize,
    },
    /// A required factory parameter got no (or a null) argument.
    MissingArgument { call: String, parameter: String },
    /// A named argument matched no factory parameter.
    UnknownParameter { call: String, parameter: String },
    /// No factory is registered under this creatable name.
    UnknownFactory(String),
    /// A parameter received both a positional and a named argument.
    DuplicateArgument { call: String, parameter: String },
    /// The prefix has no namespace bound to it.
    UnknownPrefix(String),
    /// The qualified name is malformed, or a prefix is used without a
    /// namespace URI.
    InvalidQualifiedName(String),
    /// Comments cannot contain `--` or end with `-`.
    InvalidComment(String),
    /// Not one of `beforebegin`, `afterbegin`, `beforeend` or `afterend`.
    InvalidPosition(String),
    /// A sibling position was requested on a node without a parent.
    NoParent { node: Node, position: Position },
    /// The insertion would produce a tree that isn't allowed.
    HierarchyRequest(String),
    /// The reference node isn't a child of the given parent.
    NotFound(Node),
    /// The operation requires an element.
    NotElement(Node),
    /// The operation requires a document node.
    NotDocument(Node),
    UnclosedEntity(String),
    InvalidEntity(String),
    InvalidCloseTag(String, String),
    UnclosedTag,
    Parser(xmlparser::Error),
    Tree(indextree::NodeError),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownMethod { kind, call } => {
                write!(f, "Call to undefined method {}::{}()", kind, call)
            }
            Error::UnsupportedMethod {
                kind,
                call,
                dependency,
            } => write!(
                f,
                "Call to unsupported method {}::{}() dependent of {}",
                kind, call, dependency
            ),
            Error::TooManyArguments {
                call,
                expected,
                given,
            } => write!(
                f,
                "Too many arguments to {}(): expected at most {}, {} given",
                call, expected, given
            ),
            Error::MissingArgument { call, parameter } => {
                write!(f, "Missing argument ${} for {}()", parameter, call)
            }
            Error::UnknownParameter { call, parameter } => {
                write!(f, "Unknown named parameter ${} for {}()", parameter, call)
            }
            Error::UnknownFactory(name) => {
                write!(f, "Call to undefined method NodeCreator::create{}()", name)
            }
            Error::DuplicateArgument { call, parameter } => write!(
                f,
                "Named parameter ${} overwrites previous argument for {}()",
                parameter, call
            ),
            Error::UnknownPrefix(prefix) => write!(f, "Undefined namespace prefix '{}'", prefix),
            Error::InvalidQualifiedName(name) => write!(f, "Invalid qualified name '{}'", name),
            Error::InvalidComment(text) => {
                write!(f, "Comment text cannot contain '--' or end with '-': {:?}", text)
            }
            Error::InvalidPosition(position) => write!(
                f,
                "'{}' is not one of 'beforebegin', 'afterbegin', 'beforeend', or 'afterend'",
                position
            ),
            Error::NoParent { position, .. } => {
                write!(f, "Cannot insert at '{}' of a node without a parent", position)
            }
            Error::HierarchyRequest(message) => write!(f, "Hierarchy request error: {}", message),
            Error::NotFound(_) => write!(f, "Reference node is not a child of this node"),
            Error::NotElement(_) => write!(f, "Node is not an element"),
            Error::NotDocument(_) => write!(f, "Node is not a document"),
            Error::UnclosedEntity(entity) => write!(f, "Unclosed entity '&{}'", entity),
            Error::InvalidEntity(entity) => write!(f, "Invalid entity '&{};'", entity),
            Error::InvalidCloseTag(expected, found) => {
                write!(f, "Expected closing tag </{}>, found </{}>", expected, found)
            }
            Error::UnclosedTag => write!(f, "Unclosed tag at end of input"),
            Error::Parser(e) => write!(f, "Parser error: {}", e),
            Error::Tree(e) => write!(f, "Tree error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parser(e) => Some(e),
            Error::Tree(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<xmlparser::Error> for Error {
    #[inline]
    fn from(e: xmlparser::Error) -> Self {
        Error::Parser(e)
    }
}

impl From<indextree::NodeError> for Error {
    #[inline]
    fn from(e: indextree::NodeError) -> Self {
        Error::Tree(e)
    }
}

impl From<std::io::Error> for Error {
    #[inline]
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
