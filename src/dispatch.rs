use tracing::{debug, warn};

use crate::action::Action;
use crate::dom::{Dom, Node};
use crate::error::{Dependency, Error};
use crate::factory::Arguments;

// a call name split into its action and creatable name
#[derive(Debug, PartialEq, Eq)]
struct Call<'a> {
    action: Action,
    creatable: &'a str,
}

impl<'a> Call<'a> {
    fn parse(name: &'a str) -> Option<Self> {
        let (action, creatable) = Action::split(name)?;
        if creatable.is_empty() || !creatable.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return None;
        }
        Some(Call { action, creatable })
    }

    // `appendXSibling` and `prependXSibling` are the old spellings of
    // `afterX` and `beforeX`
    fn legacy(&self) -> Option<Call<'a>> {
        let action = match self.action {
            Action::Append => Action::After,
            Action::Prepend => Action::Before,
            _ => return None,
        };
        let split = self.creatable.len().checked_sub("Sibling".len())?;
        let (creatable, suffix) = (self.creatable.get(..split)?, self.creatable.get(split..)?);
        if creatable.is_empty() || !suffix.eq_ignore_ascii_case("Sibling") {
            return None;
        }
        Some(Call { action, creatable })
    }
}

/// ## Dynamic calls
impl Dom {
    /// Create a node and insert it relative to `node`, by call name.
    ///
    /// The name is an action (`after`, `append`, `before`, `prepend` or
    /// `replaceWith`) followed by a creatable name from
    /// [`Dom::factories`]; case doesn't matter. The arguments go to the
    /// factory.
    ///
    /// Returns the node the action leaves in the relevant spot: the next
    /// sibling for `after`, the last child for `append`, the previous
    /// sibling for `before`, the first child for `prepend`, and the new
    /// node for `replaceWith`.
    ///
    /// ```rust
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.parse(r#"<x xmlns:xsl="http://www.w3.org/1999/XSL/Transform"><y/></x>"#).unwrap();
    /// let x = dom.document_element(doc).unwrap();
    /// let text = dom.call(x, "prependXslText", ["hello"]).unwrap().unwrap();
    /// assert_eq!(dom.first_child(x), Some(text));
    /// assert_eq!(
    ///     dom.to_string(x).unwrap(),
    ///     r#"<x xmlns:xsl="http://www.w3.org/1999/XSL/Transform"><xsl:text>hello</xsl:text><y/></x>"#
    /// );
    ///
    /// let comment = dom.call(x, "appendComment", ["note"]).unwrap().unwrap();
    /// let err = dom.call(comment, "appendXslChoose", sugardom::Arguments::new()).unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Call to unsupported method Comment::appendXslChoose() dependent of Comment::append()"
    /// );
    /// ```
    pub fn call(
        &mut self,
        node: Node,
        name: &str,
        arguments: impl Into<Arguments>,
    ) -> Result<Option<Node>, Error> {
        let kind = self.kind(node);
        let parsed = Call::parse(name).ok_or_else(|| Error::UnknownMethod {
            kind,
            call: name.to_string(),
        })?;
        let call = match parsed.legacy() {
            Some(legacy) => {
                warn!(
                    call = name,
                    replacement = %format!("{}{}", legacy.action, legacy.creatable),
                    "deprecated call name"
                );
                legacy
            }
            None => parsed,
        };

        let unsupported = |dependency| Error::UnsupportedMethod {
            kind,
            call: name.to_string(),
            dependency,
        };
        let factory = self.factories.get(call.creatable).ok_or_else(|| {
            unsupported(Dependency::Factory {
                name: call.creatable.to_string(),
            })
        })?;
        if !kind.supports(call.action) {
            return Err(unsupported(Dependency::Action {
                kind,
                action: call.action,
            }));
        }

        let values = factory.bind(name, arguments.into())?;
        let new = (factory.build)(&mut self.node_creator(node), &values)?;
        self.apply(call.action, node, new)?;
        debug!(call = name, action = %call.action, factory = factory.name, "resolved dynamic call");

        Ok(match call.action {
            Action::After => self.next_sibling(node),
            Action::Append => self.last_child(node),
            Action::Before => self.previous_sibling(node),
            Action::Prepend => self.first_child(node),
            Action::ReplaceWith => Some(new),
        })
    }
}
