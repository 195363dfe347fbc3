use crate::dom::{Dom, Node};
use crate::error::Error;
use crate::factory::{Arguments, Factory, Parameter};
use crate::value::Comment;

/// The XSLT namespace. XSL elements are created with the `xsl` prefix.
pub const XSL_NAMESPACE: &str = "http://www.w3.org/1999/XSL/Transform";

/// Creates detached nodes for a document.
///
/// Text arguments are taken literally and escaped when serialized, so
/// `<AT&T>` ends up as `&lt;AT&amp;T&gt;`. Optional attributes that aren't
/// given are left out rather than set to an empty value.
///
/// ```rust
/// let mut dom = sugardom::Dom::new();
/// let doc = dom.parse(r#"<x xmlns:xsl="http://www.w3.org/1999/XSL/Transform"/>"#).unwrap();
/// let mut creator = dom.node_creator(doc);
/// let if_ = creator.create_xsl_if("@foo", "<X>").unwrap();
/// assert_eq!(
///     dom.to_string(if_).unwrap(),
///     r#"<xsl:if xmlns:xsl="http://www.w3.org/1999/XSL/Transform" test="@foo">&lt;X&gt;</xsl:if>"#
/// );
/// ```
pub struct NodeCreator<'a> {
    dom: &'a mut Dom,
    document: Node,
}

impl Dom {
    /// A node creator for the document a node belongs to.
    pub fn node_creator(&mut self, document: Node) -> NodeCreator<'_> {
        let document = self.document_of(document);
        NodeCreator {
            dom: self,
            document,
        }
    }
}

impl<'a> NodeCreator<'a> {
    /// The owner document of the nodes this creates.
    pub fn document(&self) -> Node {
        self.document
    }

    pub fn dom(&self) -> &Dom {
        &*self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut *self.dom
    }

    /// Create a node through the factory registered under a creatable
    /// name.
    ///
    /// ```rust
    /// use sugardom::Arguments;
    ///
    /// let mut dom = sugardom::Dom::new();
    /// let doc = dom.create_document();
    /// let node = dom
    ///     .node_creator(doc)
    ///     .create("XslApplyTemplates", Arguments::new().named("mode", "text"))
    ///     .unwrap();
    /// assert_eq!(dom.attribute(node, "mode"), Some("text"));
    /// ```
    pub fn create(&mut self, name: &str, arguments: impl Into<Arguments>) -> Result<Node, Error> {
        let factory = self
            .dom
            .factories()
            .get(name)
            .ok_or_else(|| Error::UnknownFactory(name.to_string()))?;
        let call = format!("create{}", factory.name);
        let values = factory.bind(&call, arguments.into())?;
        (factory.build)(self, &values)
    }

    fn create_xsl(&mut self, local_name: &str, text: &str) -> Result<Node, Error> {
        let qualified_name = format!("xsl:{}", local_name);
        let element = self
            .dom
            .create_element_ns(self.document, Some(XSL_NAMESPACE), &qualified_name)?;
        self.dom.set_text_content(element, text)?;
        Ok(element)
    }

    fn set_optional(&mut self, element: Node, name: &str, value: Option<&str>) -> Result<(), Error> {
        match value {
            Some(value) => self.dom.set_attribute(element, name, value),
            None => Ok(()),
        }
    }

    /// `<xsl:apply-templates/>` with optional `mode` and `select`.
    pub fn create_xsl_apply_templates(
        &mut self,
        select: Option<&str>,
        mode: Option<&str>,
    ) -> Result<Node, Error> {
        let element = self.create_xsl("apply-templates", "")?;
        self.set_optional(element, "mode", mode)?;
        self.set_optional(element, "select", select)?;
        Ok(element)
    }

    /// `<xsl:attribute name="..."/>`, optionally with a namespace.
    pub fn create_xsl_attribute(
        &mut self,
        name: &str,
        text: &str,
        namespace: Option<&str>,
    ) -> Result<Node, Error> {
        let element = self.create_xsl("attribute", text)?;
        self.dom.set_attribute(element, "name", name)?;
        self.set_optional(element, "namespace", namespace)?;
        Ok(element)
    }

    pub fn create_xsl_choose(&mut self) -> Result<Node, Error> {
        self.create_xsl("choose", "")
    }

    pub fn create_xsl_comment(&mut self, text: &str) -> Result<Node, Error> {
        self.create_xsl("comment", text)
    }

    pub fn create_xsl_copy_of(&mut self, select: &str) -> Result<Node, Error> {
        let element = self.create_xsl("copy-of", "")?;
        self.dom.set_attribute(element, "select", select)?;
        Ok(element)
    }

    /// `<xsl:element name="..."/>`, optionally with a namespace.
    pub fn create_xsl_element(
        &mut self,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<Node, Error> {
        let element = self.create_xsl("element", "")?;
        self.dom.set_attribute(element, "name", name)?;
        self.set_optional(element, "namespace", namespace)?;
        Ok(element)
    }

    pub fn create_xsl_if(&mut self, test: &str, text: &str) -> Result<Node, Error> {
        let element = self.create_xsl("if", text)?;
        self.dom.set_attribute(element, "test", test)?;
        Ok(element)
    }

    pub fn create_xsl_otherwise(&mut self, text: &str) -> Result<Node, Error> {
        self.create_xsl("otherwise", text)
    }

    pub fn create_xsl_param(&mut self, name: &str, select: Option<&str>) -> Result<Node, Error> {
        let element = self.create_xsl("param", "")?;
        self.dom.set_attribute(element, "name", name)?;
        self.set_optional(element, "select", select)?;
        Ok(element)
    }

    /// `<xsl:text>`. Pass `Some("yes")` to disable output escaping.
    pub fn create_xsl_text(
        &mut self,
        text: &str,
        disable_output_escaping: Option<&str>,
    ) -> Result<Node, Error> {
        let element = self.create_xsl("text", text)?;
        self.set_optional(element, "disable-output-escaping", disable_output_escaping)?;
        Ok(element)
    }

    pub fn create_xsl_value_of(
        &mut self,
        select: &str,
        disable_output_escaping: Option<&str>,
    ) -> Result<Node, Error> {
        let element = self.create_xsl("value-of", "")?;
        self.dom.set_attribute(element, "select", select)?;
        self.set_optional(element, "disable-output-escaping", disable_output_escaping)?;
        Ok(element)
    }

    pub fn create_xsl_variable(
        &mut self,
        name: &str,
        select: Option<&str>,
    ) -> Result<Node, Error> {
        let element = self.create_xsl("variable", "")?;
        self.dom.set_attribute(element, "name", name)?;
        self.set_optional(element, "select", select)?;
        Ok(element)
    }

    pub fn create_xsl_when(&mut self, test: &str, text: &str) -> Result<Node, Error> {
        let element = self.create_xsl("when", text)?;
        self.dom.set_attribute(element, "test", test)?;
        Ok(element)
    }

    /// Create an element by qualified name.
    ///
    /// A prefix is resolved against the namespaces declared in the
    /// document; an undeclared prefix is an error.
    pub fn create_element(&mut self, name: &str, text: &str) -> Result<Node, Error> {
        let element = match name.split_once(':') {
            Some((prefix, _)) => {
                let namespace_uri = self
                    .dom
                    .lookup_namespace_uri(self.document, Some(prefix))
                    .map(String::from)
                    .ok_or_else(|| Error::UnknownPrefix(prefix.to_string()))?;
                self.dom
                    .create_element_ns(self.document, Some(&namespace_uri), name)?
            }
            None => self.dom.create_element(self.document, name)?,
        };
        self.dom.set_text_content(element, text)?;
        Ok(element)
    }

    /// Create an element with an explicit namespace.
    pub fn create_element_ns(
        &mut self,
        namespace_uri: Option<&str>,
        qualified_name: &str,
        text: &str,
    ) -> Result<Node, Error> {
        let element = self
            .dom
            .create_element_ns(self.document, namespace_uri, qualified_name)?;
        self.dom.set_text_content(element, text)?;
        Ok(element)
    }

    /// Create a comment, rejecting text that contains `--` or ends with
    /// `-`.
    pub fn create_comment(&mut self, data: &str) -> Result<Node, Error> {
        if !Comment::is_valid(data) {
            return Err(Error::InvalidComment(data.to_string()));
        }
        Ok(self.dom.create_comment(self.document, data))
    }

    pub fn create_text(&mut self, data: &str) -> Node {
        self.dom.create_text_node(self.document, data)
    }
}

fn arg(values: &[Option<String>], index: usize) -> Option<&str> {
    values.get(index).and_then(|value| value.as_deref())
}

// binding already rejected missing required arguments
fn text(values: &[Option<String>], index: usize) -> &str {
    arg(values, index).unwrap_or_default()
}

pub(crate) const STANDARD_FACTORIES: &[Factory] = &[
    Factory {
        name: "XslApplyTemplates",
        parameters: &[Parameter::optional("select"), Parameter::optional("mode")],
        build: |c, v| c.create_xsl_apply_templates(arg(v, 0), arg(v, 1)),
    },
    Factory {
        name: "XslAttribute",
        parameters: &[
            Parameter::required("name"),
            Parameter::with_default("text", ""),
            Parameter::optional("namespace"),
        ],
        build: |c, v| c.create_xsl_attribute(text(v, 0), text(v, 1), arg(v, 2)),
    },
    Factory {
        name: "XslChoose",
        parameters: &[],
        build: |c, _| c.create_xsl_choose(),
    },
    Factory {
        name: "XslComment",
        parameters: &[Parameter::with_default("text", "")],
        build: |c, v| c.create_xsl_comment(text(v, 0)),
    },
    Factory {
        name: "XslCopyOf",
        parameters: &[Parameter::required("select")],
        build: |c, v| c.create_xsl_copy_of(text(v, 0)),
    },
    Factory {
        name: "XslElement",
        parameters: &[Parameter::required("name"), Parameter::optional("namespace")],
        build: |c, v| c.create_xsl_element(text(v, 0), arg(v, 1)),
    },
    Factory {
        name: "XslIf",
        parameters: &[Parameter::required("test"), Parameter::with_default("text", "")],
        build: |c, v| c.create_xsl_if(text(v, 0), text(v, 1)),
    },
    Factory {
        name: "XslOtherwise",
        parameters: &[Parameter::with_default("text", "")],
        build: |c, v| c.create_xsl_otherwise(text(v, 0)),
    },
    Factory {
        name: "XslParam",
        parameters: &[Parameter::required("name"), Parameter::optional("select")],
        build: |c, v| c.create_xsl_param(text(v, 0), arg(v, 1)),
    },
    Factory {
        name: "XslText",
        parameters: &[
            Parameter::with_default("textContent", ""),
            Parameter::optional("disableOutputEscaping"),
        ],
        build: |c, v| c.create_xsl_text(text(v, 0), arg(v, 1)),
    },
    Factory {
        name: "XslValueOf",
        parameters: &[
            Parameter::required("select"),
            Parameter::optional("disableOutputEscaping"),
        ],
        build: |c, v| c.create_xsl_value_of(text(v, 0), arg(v, 1)),
    },
    Factory {
        name: "XslVariable",
        parameters: &[Parameter::required("name"), Parameter::optional("select")],
        build: |c, v| c.create_xsl_variable(text(v, 0), arg(v, 1)),
    },
    Factory {
        name: "XslWhen",
        parameters: &[Parameter::required("test"), Parameter::with_default("text", "")],
        build: |c, v| c.create_xsl_when(text(v, 0), text(v, 1)),
    },
    Factory {
        name: "Element",
        parameters: &[
            Parameter::required("nodeName"),
            Parameter::with_default("textContent", ""),
        ],
        build: |c, v| c.create_element(text(v, 0), text(v, 1)),
    },
    Factory {
        name: "ElementNS",
        parameters: &[
            Parameter::optional("namespaceURI"),
            Parameter::required("qualifiedName"),
            Parameter::with_default("textContent", ""),
        ],
        build: |c, v| c.create_element_ns(arg(v, 0), text(v, 1), text(v, 2)),
    },
    Factory {
        name: "Comment",
        parameters: &[Parameter::required("data")],
        build: |c, v| c.create_comment(text(v, 0)),
    },
    Factory {
        name: "Text",
        parameters: &[Parameter::required("data")],
        build: |c, v| Ok(c.create_text(text(v, 0))),
    },
];
