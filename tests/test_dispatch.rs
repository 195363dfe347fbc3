use rstest::rstest;
use sugardom::{
    Action, Arguments, Dependency, Dom, Error, Factory, Node, NodeCreator, NodeKind, Parameter,
};

const XSL: &str = r#"xmlns:xsl="http://www.w3.org/1999/XSL/Transform""#;

fn xsl_document(dom: &mut Dom, content: &str) -> (Node, Node) {
    let doc = dom.parse(&format!("<x {}>{}</x>", XSL, content)).unwrap();
    let doc_el = dom.document_element(doc).unwrap();
    (doc, doc_el)
}

// the content of the document element
fn inner(dom: &Dom, doc_el: Node) -> String {
    dom.children(doc_el)
        .map(|child| dom.to_string(child).unwrap())
        .collect()
}

#[rstest]
#[case("afterElement", "<y/><z/>")]
#[case("appendElement", "<y><z/></y>")]
#[case("beforeElement", "<z/><y/>")]
#[case("prependElement", "<y><z/></y>")]
#[case("replaceWithElement", "<z/>")]
fn test_call_actions(#[case] call: &str, #[case] expected: &str) {
    let mut dom = Dom::new();
    let (_, doc_el) = xsl_document(&mut dom, "<y/>");
    let y = dom.first_child(doc_el).unwrap();
    let returned = dom.call(y, call, ["z"]).unwrap().unwrap();
    assert_eq!(dom.node_name(returned), "z");
    assert_eq!(inner(&dom, doc_el), expected);
}

#[test]
fn test_call_returns_node_in_position() {
    let mut dom = Dom::new();
    let (_, doc_el) = xsl_document(&mut dom, "<a/><y><b/></y><c/>");
    let y = dom.children(doc_el).nth(1).unwrap();

    let after = dom.call(y, "afterText", ["after"]).unwrap();
    assert_eq!(after, dom.next_sibling(y));
    let before = dom.call(y, "beforeText", ["before"]).unwrap();
    assert_eq!(before, dom.previous_sibling(y));
    let append = dom.call(y, "appendText", ["append"]).unwrap();
    assert_eq!(append, dom.last_child(y));
    let prepend = dom.call(y, "prependText", ["prepend"]).unwrap();
    assert_eq!(prepend, dom.first_child(y));

    assert_eq!(
        inner(&dom, doc_el),
        "<a/>before<y>prepend<b/>append</y>after<c/>"
    );
}

#[test]
fn test_call_xsl() {
    let mut dom = Dom::new();
    let (_, doc_el) = xsl_document(&mut dom, "");
    let choose = dom
        .call(doc_el, "appendXslChoose", Arguments::new())
        .unwrap()
        .unwrap();
    dom.call(choose, "appendXslWhen", ["@foo", "foo"]).unwrap();
    dom.call(choose, "appendXslOtherwise", ["bar"]).unwrap();
    dom.call(choose, "beforeXslVariable", Arguments::new().named("name", "v"))
        .unwrap();
    assert_eq!(
        inner(&dom, doc_el),
        r#"<xsl:variable name="v"/><xsl:choose><xsl:when test="@foo">foo</xsl:when><xsl:otherwise>bar</xsl:otherwise></xsl:choose>"#
    );
}

#[test]
fn test_call_prepend_xsl_text_returns_first_child() {
    let mut dom = Dom::new();
    let (_, doc_el) = xsl_document(&mut dom, "<y/>");
    let text = dom
        .call(doc_el, "prependXslText", ["hello"])
        .unwrap()
        .unwrap();
    assert_eq!(dom.first_child(doc_el), Some(text));
    assert_eq!(
        dom.to_string(text).unwrap(),
        "<xsl:text>hello</xsl:text>"
    );
}

#[test]
fn test_call_replace_with_returns_new_node() {
    let mut dom = Dom::new();
    let (_, doc_el) = xsl_document(&mut dom, "<y/>");
    let y = dom.first_child(doc_el).unwrap();
    let new = dom
        .call(y, "replaceWithXslValueOf", ["@foo"])
        .unwrap()
        .unwrap();
    assert_eq!(dom.parent(y), None);
    assert_eq!(dom.first_child(doc_el), Some(new));
    assert_eq!(inner(&dom, doc_el), r#"<xsl:value-of select="@foo"/>"#);
}

#[rstest]
fn test_call_ignores_case(
    #[values("appendxslif", "APPENDXSLIF", "AppendXslIf", "appendXSLIf")] call: &str,
) {
    let mut dom = Dom::new();
    let (_, doc_el) = xsl_document(&mut dom, "");
    dom.call(doc_el, call, ["@foo"]).unwrap();
    assert_eq!(inner(&dom, doc_el), r#"<xsl:if test="@foo"/>"#);
}

#[rstest]
#[case("appendXslTextSibling", "<y/><xsl:text>t</xsl:text>")]
#[case("prependXslTextSibling", "<xsl:text>t</xsl:text><y/>")]
#[case("appendxsltextsibling", "<y/><xsl:text>t</xsl:text>")]
fn test_call_sibling_alias(#[case] call: &str, #[case] expected: &str) {
    let mut dom = Dom::new();
    let (_, doc_el) = xsl_document(&mut dom, "<y/>");
    let y = dom.first_child(doc_el).unwrap();
    let returned = dom.call(y, call, ["t"]).unwrap().unwrap();
    assert_eq!(dom.node_name(returned), "xsl:text");
    assert_eq!(inner(&dom, doc_el), expected);
}

#[test]
fn test_call_on_text_node() {
    let mut dom = Dom::new();
    let (_, doc_el) = xsl_document(&mut dom, "text");
    let text = dom.first_child(doc_el).unwrap();
    dom.call(text, "afterElement", ["b"]).unwrap();
    dom.call(text, "replaceWithXslText", ["text"]).unwrap();
    assert_eq!(inner(&dom, doc_el), "<xsl:text>text</xsl:text><b/>");
}

#[test]
fn test_call_on_document() {
    let mut dom = Dom::new();
    let doc = dom.create_document();
    let doc_el = dom.call(doc, "appendElement", ["root"]).unwrap().unwrap();
    let comment = dom.call(doc, "prependComment", ["c"]).unwrap().unwrap();
    assert_eq!(dom.document_element(doc), Some(doc_el));
    assert_eq!(dom.first_child(doc), Some(comment));
    assert_eq!(dom.to_string(doc).unwrap(), "<!--c--><root/>");
}

#[test]
fn test_call_on_detached_node_sibling_action_does_nothing() {
    let mut dom = Dom::new();
    let doc = dom.create_document();
    let detached = dom.create_element(doc, "x").unwrap();
    assert_eq!(dom.call(detached, "afterElement", ["y"]).unwrap(), None);
    assert_eq!(dom.call(detached, "beforeElement", ["y"]).unwrap(), None);
    assert_eq!(dom.to_string(detached).unwrap(), "<x/>");
}

#[test]
fn test_call_unsupported_action() {
    let mut dom = Dom::new();
    let (_, doc_el) = xsl_document(&mut dom, "<!--c-->");
    let comment = dom.first_child(doc_el).unwrap();
    let err = dom
        .call(comment, "appendXslChoose", Arguments::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Call to unsupported method Comment::appendXslChoose() dependent of Comment::append()"
    );
    assert!(matches!(
        err,
        Error::UnsupportedMethod {
            kind: NodeKind::Comment,
            dependency: Dependency::Action {
                kind: NodeKind::Comment,
                action: Action::Append,
            },
            ..
        }
    ));
}

#[test]
fn test_call_unsupported_action_on_document() {
    let mut dom = Dom::new();
    let doc = dom.create_document();
    let err = dom.call(doc, "beforeComment", ["c"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Call to unsupported method Document::beforeComment() dependent of Document::before()"
    );
}

#[test]
fn test_call_unsupported_factory() {
    let mut dom = Dom::new();
    let (_, doc_el) = xsl_document(&mut dom, "");
    let err = dom
        .call(doc_el, "afterSomething", Arguments::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Call to unsupported method Element::afterSomething() dependent of NodeCreator::createSomething()"
    );
}

#[test]
fn test_call_missing_factory_reported_before_action() {
    let mut dom = Dom::new();
    let (_, doc_el) = xsl_document(&mut dom, "<!--c-->");
    let comment = dom.first_child(doc_el).unwrap();
    let err = dom
        .call(comment, "appendSomething", Arguments::new())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnsupportedMethod {
            dependency: Dependency::Factory { ref name },
            ..
        } if name == "Something"
    ));
}

#[rstest]
fn test_call_unknown_method(
    #[values("foo", "append", "replaceWith", "append-Foo", "insertElement", "")] call: &str,
) {
    let mut dom = Dom::new();
    let (_, doc_el) = xsl_document(&mut dom, "");
    let err = dom.call(doc_el, call, Arguments::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Call to undefined method Element::{}()", call)
    );
}

#[test]
fn test_call_argument_errors() {
    let mut dom = Dom::new();
    let (_, doc_el) = xsl_document(&mut dom, "");

    let err = dom.call(doc_el, "appendXslIf", Arguments::new()).unwrap_err();
    assert_eq!(err.to_string(), "Missing argument $test for appendXslIf()");

    let err = dom
        .call(doc_el, "appendXslIf", ["a", "b", "c"])
        .unwrap_err();
    assert!(matches!(err, Error::TooManyArguments { given: 3, .. }));

    let err = dom
        .call(
            doc_el,
            "appendXslIf",
            Arguments::new().arg("@a").named("test", "@b"),
        )
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Named parameter $test overwrites previous argument for appendXslIf()"
    );

    // nothing was inserted along the way
    assert_eq!(dom.child_count(doc_el), 0);
}

#[test]
fn test_call_factory_error_inserts_nothing() {
    let mut dom = Dom::new();
    let (_, doc_el) = xsl_document(&mut dom, "");
    let err = dom.call(doc_el, "appendComment", ["a--b"]).unwrap_err();
    assert!(matches!(err, Error::InvalidComment(_)));
    let err = dom.call(doc_el, "appendComment", ["a-"]).unwrap_err();
    assert!(matches!(err, Error::InvalidComment(_)));
    let err = dom.call(doc_el, "appendElement", ["p:q"]).unwrap_err();
    assert!(matches!(err, Error::UnknownPrefix(_)));
    assert_eq!(dom.child_count(doc_el), 0);
}

#[test]
fn test_call_hierarchy_error() {
    let mut dom = Dom::new();
    let doc = dom.parse("<x/>").unwrap();
    let err = dom.call(doc, "appendElement", ["y"]).unwrap_err();
    assert!(matches!(err, Error::HierarchyRequest(_)));
}

const HR_PARAMETERS: &[Parameter] = &[Parameter::optional("class")];
const DATA_PARAMETERS: &[Parameter] = &[Parameter::required("data")];

fn create_hr(creator: &mut NodeCreator<'_>, values: &[Option<String>]) -> Result<Node, Error> {
    let hr = creator.create_element("hr", "")?;
    if let Some(Some(class)) = values.first() {
        creator.dom_mut().set_attribute(hr, "class", class)?;
    }
    Ok(hr)
}

#[test]
fn test_call_registered_factory() {
    let mut dom = Dom::new();
    let previous = dom.register_factory(Factory {
        name: "Hr",
        parameters: HR_PARAMETERS,
        build: create_hr,
    });
    assert!(previous.is_none());
    assert!(dom.factories().names().contains(&"Hr"));

    let (_, doc_el) = xsl_document(&mut dom, "");
    dom.call(doc_el, "appendHr", Arguments::new()).unwrap();
    dom.call(doc_el, "appendHR", Arguments::new().named("class", "wide"))
        .unwrap();
    assert_eq!(inner(&dom, doc_el), r#"<hr/><hr class="wide"/>"#);
}

#[test]
fn test_register_factory_replaces_standard() {
    let mut dom = Dom::new();
    let previous = dom.register_factory(Factory {
        name: "Comment",
        parameters: DATA_PARAMETERS,
        build: |creator, _| Ok(creator.create_text("replaced")),
    });
    assert_eq!(previous.map(|factory| factory.name), Some("Comment"));
    let (_, doc_el) = xsl_document(&mut dom, "");
    dom.call(doc_el, "appendComment", ["c"]).unwrap();
    assert_eq!(inner(&dom, doc_el), "replaced");
}
