use sugardom::{Dom, Error, NodeKind};

#[test]
fn test_parse_element() {
    let mut dom = Dom::new();
    let doc = dom.parse("<a/>").unwrap();
    let a = dom.document_element(doc).unwrap();
    assert_eq!(dom.kind(a), NodeKind::Element);
    assert_eq!(dom.node_name(a), "a");
    assert_eq!(dom.parent(a), Some(doc));
    assert_eq!(dom.owner_document(a), Some(doc));
    assert_eq!(dom.owner_document(doc), None);
}

#[test]
fn test_parse_nested() {
    let mut dom = Dom::new();
    let doc = dom.parse("<a><b>text</b><c/></a>").unwrap();
    let a = dom.document_element(doc).unwrap();
    let names = dom
        .descendants(a)
        .map(|n| dom.node_name(n))
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["a", "b", "#text", "c"]);
}

#[test]
fn test_parse_attributes() {
    let mut dom = Dom::new();
    let doc = dom.parse(r#"<a x="1" y='&lt;2&gt;'/>"#).unwrap();
    let a = dom.document_element(doc).unwrap();
    assert_eq!(dom.attribute(a, "x"), Some("1"));
    assert_eq!(dom.attribute(a, "y"), Some("<2>"));
    assert_eq!(dom.attribute_count(a), 2);
    assert_eq!(dom.child_count(a), 0);
}

#[test]
fn test_parse_namespaces() {
    let mut dom = Dom::new();
    let doc = dom
        .parse(r#"<a xmlns="urn:default" xmlns:x="urn:x"><x:b x:attr="1" attr="2"/></a>"#)
        .unwrap();
    let a = dom.document_element(doc).unwrap();
    let b = dom.first_child(a).unwrap();
    let a_name = dom.element(a).unwrap().name();
    assert_eq!(a_name.namespace_uri(), Some("urn:default"));
    let b_name = dom.element(b).unwrap().name();
    assert_eq!(b_name.namespace_uri(), Some("urn:x"));
    assert_eq!(b_name.prefix(), Some("x"));
    assert_eq!(b_name.local_name(), "b");

    let prefixed = dom.attribute_node_ns(b, Some("urn:x"), "attr").unwrap();
    assert_eq!(dom.text_content(prefixed), "1");
    // unprefixed attributes aren't in the default namespace
    let plain = dom.attribute_node_ns(b, None, "attr").unwrap();
    assert_eq!(dom.text_content(plain), "2");

    let declarations = dom.namespace_declarations(a).collect::<Vec<_>>();
    assert_eq!(declarations, vec![("", "urn:default"), ("x", "urn:x")]);
    assert_eq!(dom.namespace_declarations(b).count(), 0);
}

#[test]
fn test_parse_undeclared_default_namespace() {
    let mut dom = Dom::new();
    let doc = dom.parse(r#"<a xmlns="urn:a"><b xmlns=""/></a>"#).unwrap();
    let a = dom.document_element(doc).unwrap();
    let b = dom.first_child(a).unwrap();
    assert_eq!(dom.element(b).unwrap().name().namespace_uri(), None);
}

#[test]
fn test_parse_xml_prefix() {
    let mut dom = Dom::new();
    let doc = dom.parse(r#"<a xml:lang="en"/>"#).unwrap();
    let a = dom.document_element(doc).unwrap();
    let lang = dom
        .attribute_node_ns(a, Some("http://www.w3.org/XML/1998/namespace"), "lang")
        .unwrap();
    assert_eq!(dom.text_content(lang), "en");
}

#[test]
fn test_parse_unknown_prefix() {
    let mut dom = Dom::new();
    let err = dom.parse("<x:a/>").unwrap_err();
    assert!(matches!(err, Error::UnknownPrefix(ref prefix) if prefix == "x"));
    let err = dom.parse(r#"<a x:b="1"/>"#).unwrap_err();
    assert!(matches!(err, Error::UnknownPrefix(_)));
}

#[test]
fn test_parse_mismatched_close_tag() {
    let mut dom = Dom::new();
    let err = dom.parse("<a></b>").unwrap_err();
    assert!(matches!(err, Error::InvalidCloseTag(ref a, ref b) if a == "a" && b == "b"));
}

#[test]
fn test_parse_unclosed() {
    let mut dom = Dom::new();
    assert!(matches!(dom.parse("<a><b/>"), Err(Error::UnclosedTag)));
}

#[test]
fn test_parse_malformed() {
    let mut dom = Dom::new();
    assert!(matches!(dom.parse("<a b/>"), Err(Error::Parser(_))));
}

#[test]
fn test_parse_truncated_start_tag() {
    let mut dom = Dom::new();
    assert!(matches!(dom.parse("<a"), Err(Error::UnclosedTag)));
}

#[test]
fn test_parse_text_entities() {
    let mut dom = Dom::new();
    let doc = dom.parse("<a>&lt;&amp;&gt;&#65;&#x42;</a>").unwrap();
    let a = dom.document_element(doc).unwrap();
    assert_eq!(dom.child_count(a), 1);
    assert_eq!(dom.text_content(a), "<&>AB");
}

#[test]
fn test_parse_entity_reference() {
    let mut dom = Dom::new();
    let doc = dom.parse("<a>x&custom;y</a>").unwrap();
    let a = dom.document_element(doc).unwrap();
    let kinds = dom.children(a).map(|n| dom.kind(n)).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![NodeKind::Text, NodeKind::EntityReference, NodeKind::Text]
    );
    let reference = dom.children(a).nth(1).unwrap();
    assert_eq!(dom.node_name(reference), "custom");
}

#[test]
fn test_parse_unclosed_entity() {
    let mut dom = Dom::new();
    assert!(matches!(
        dom.parse("<a>&amp</a>"),
        Err(Error::UnclosedEntity(_))
    ));
}

#[test]
fn test_parse_cdata_comment_pi() {
    let mut dom = Dom::new();
    let doc = dom
        .parse(r#"<?xml version="1.0"?><!--top--><a><![CDATA[<x>]]><?target data?><!--c--></a>"#)
        .unwrap();
    let kinds = dom.children(doc).map(|n| dom.kind(n)).collect::<Vec<_>>();
    assert_eq!(kinds, vec![NodeKind::Comment, NodeKind::Element]);
    let a = dom.document_element(doc).unwrap();
    let kinds = dom.children(a).map(|n| dom.kind(n)).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            NodeKind::CdataSection,
            NodeKind::ProcessingInstruction,
            NodeKind::Comment
        ]
    );
    let pi = dom.children(a).nth(1).unwrap();
    let pi = dom.processing_instruction(pi).unwrap();
    assert_eq!(pi.target(), "target");
    assert_eq!(pi.data(), "data");
}

#[test]
fn test_parse_top_level_whitespace_dropped() {
    let mut dom = Dom::new();
    let doc = dom.parse("\n<a> <b/> </a>\n").unwrap();
    assert_eq!(dom.child_count(doc), 1);
    let a = dom.document_element(doc).unwrap();
    assert_eq!(dom.child_count(a), 3);
}

#[test]
fn test_parse_doctype() {
    let mut dom = Dom::new();
    let doc = dom
        .parse(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd" [
    <!ENTITY internal "value">
    <!ENTITY external SYSTEM "external.xml">
    <!-- ignored -->
    <!NOTATION gif PUBLIC "image/gif">
    <!NOTATION png SYSTEM "png.exe">
]>
<html/>"#,
        )
        .unwrap();
    let doctype = dom.first_child(doc).unwrap();
    let value = dom.document_type(doctype).unwrap();
    assert_eq!(value.name(), "html");
    assert_eq!(value.public_id(), "-//W3C//DTD XHTML 1.0 Strict//EN");
    assert_eq!(
        value.system_id(),
        "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd"
    );

    let entities = dom
        .entities(doctype)
        .map(|n| dom.node_name(n))
        .collect::<Vec<_>>();
    assert_eq!(entities, vec!["internal", "external"]);
    let notations = dom
        .notations(doctype)
        .map(|n| dom.node_name(n))
        .collect::<Vec<_>>();
    assert_eq!(notations, vec!["gif", "png"]);

    // declarations aren't children
    assert_eq!(dom.child_count(doctype), 0);
    assert_eq!(dom.child_count(doc), 2);
}

#[test]
fn test_parse_empty_doctype() {
    let mut dom = Dom::new();
    let doc = dom.parse(r#"<!DOCTYPE a SYSTEM "a.dtd"><a/>"#).unwrap();
    let doctype = dom.first_child(doc).unwrap();
    let value = dom.document_type(doctype).unwrap();
    assert_eq!(value.name(), "a");
    assert_eq!(value.public_id(), "");
    assert_eq!(value.system_id(), "a.dtd");
}

#[test]
fn test_parse_fragment() {
    let mut dom = Dom::new();
    let doc = dom.parse(r#"<a xmlns:x="urn:x"/>"#).unwrap();
    let a = dom.document_element(doc).unwrap();
    let fragment = dom.parse_fragment("text<x:b/><c>d</c>", a).unwrap();
    assert_eq!(dom.kind(fragment), NodeKind::DocumentFragment);
    assert_eq!(dom.owner_document(fragment), Some(doc));
    assert_eq!(dom.parent(fragment), None);
    assert_eq!(dom.child_count(fragment), 3);
    let b = dom.children(fragment).nth(1).unwrap();
    assert_eq!(dom.element(b).unwrap().name().namespace_uri(), Some("urn:x"));
}

#[test]
fn test_parse_fragment_keeps_whitespace() {
    let mut dom = Dom::new();
    let doc = dom.create_document();
    let fragment = dom.parse_fragment(" <a/> ", doc).unwrap();
    assert_eq!(dom.child_count(fragment), 3);
}
