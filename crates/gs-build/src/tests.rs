use super::*;

use gs_event::{BodyType, Escaping, LogicalHandler, SpecialType};
use gs_format::{SerializeOptions, SerializerPipeline, StringWriter, build_serializer};
use gs_parse::Parser;
use gs_testhelpers::{Recorded, Recorder, init_tracing};

/// Build with `f` and serialize minified.
fn minified<F>(f: F) -> String
where
    F: FnOnce(&mut Builder<SerializerPipeline<StringWriter>>) -> Result<(), BuildError>,
{
    init_tracing();
    let mut b = Builder::new(build_serializer(StringWriter::new(), &SerializeOptions::minified()));
    f(&mut b).unwrap();
    b.finish().unwrap().into_writer().into_string()
}

fn recorded<F>(f: F) -> Vec<Recorded>
where
    F: FnOnce(&mut Builder<Recorder>) -> Result<(), BuildError>,
{
    let mut b = Builder::new(Recorder::new());
    f(&mut b).unwrap();
    b.finish().unwrap().events
}

fn html(b: &mut Builder<impl LogicalHandler>) -> Result<(), BuildError> {
    b.node("html")?
        .attribute("lang")?
        .value("en")?
        .list_with(|b| {
            b.node("head")?
                .list_with(|b| {
                    b.node("title")?.mixed(false)?.text("my title")?.end()?;
                    Ok(())
                })?
                .end()?;
            b.node("body")?
                .list_with(|b| {
                    b.node("p")?
                        .attribute("class")?
                        .value("a b")?
                        .mixed(false)?
                        .text("a")?
                        .node("em")?
                        .mixed(false)?
                        .text("1")?
                        .end()?
                        .text("b c ")?
                        .end()?;
                    Ok(())
                })?
                .end()?;
            Ok(())
        })?
        .end()?;
    Ok(())
}

fn json_like(b: &mut Builder<impl LogicalHandler>) -> Result<(), BuildError> {
    b.map_with(|b| {
        b.property("str")?.text_with("string", Some(Escaping::Quoted), false)?;
        b.property("num")?.text("12")?;
        b.property("null")?.text("null")?;
        b.property("array")?
            .list_with(|b| {
                b.text("raw")?
                    .text(r#"escape "quote""#)?
                    .text_with(r#"escape "quote" by bound"#, Some(Escaping::Bounded(String::new())), false)?;
                Ok(())
            })?
            .end()?;
        b.property("object")?
            .map_with(|b| {
                b.property("boolean true")?.text("true")?;
                b.property("boolean false")?.text("false")?;
                Ok(())
            })?
            .end()?;
        Ok(())
    })?
    .end()?;
    Ok(())
}

#[test]
fn test_html_document() {
    let out = minified(|b| html(b));
    insta::assert_snapshot!(out, @"<html lang=en[<head[<title`my title`>]><body[<p class='a b'`a<em`1`>b c `>]>]>");
}

#[test]
fn test_json_like_document() {
    let out = minified(|b| json_like(b));
    insta::assert_snapshot!(out, @r#"{str="string"num=12 null=null array=[raw"escape \"quote\""!"escape "quote" by bound!"]object={'boolean true'=true'boolean false'=false}}"#);
}

#[test]
fn test_parsing_the_output_gives_the_same_events() {
    let cases = [
        (recorded(|b| html(b)), minified(|b| html(b))),
        (recorded(|b| json_like(b)), minified(|b| json_like(b))),
    ];
    for (built, text) in cases {
        let mut parser = Parser::new(Recorder::new());
        parser.parse(&text).unwrap();
        assert_eq!(parser.into_handler().events, built, "{text}");
    }
}

#[test]
fn test_comment_node() {
    let out = minified(|b| {
        b.node_special(SpecialType::Comment, "TODO")?
            .attribute("by")?
            .value("sys")?
            .text("...")?
            .end()?;
        Ok(())
    });
    assert_eq!(out, r#"<#TODO by=sys"...">"#);
}

#[test]
fn test_tail_attributes() {
    let out = minified(|b| {
        b.node("1")?.text("xx")?.attribute("hash")?.value("12")?.end()?;
        b.node("2")?.list()?.text("xx")?.attribute("hash")?.value("12")?.end()?;
        b.node("3")?.attribute("before")?.map()?.attribute("h1")?.attribute("h2")?.end()?;
        Ok(())
    });
    assert_eq!(out, r#"<1"xx"hash=12><2[xx]hash=12><3 before{}h1 h2>"#);
}

#[test]
fn test_root_texts() {
    let out = minified(|b| {
        b.text_with("text1", Some(Escaping::Raw), false)?
            .text_with("text2", Some(Escaping::Raw), false)?
            .text_with(r#"text: "\."#, Some(Escaping::Quoted), false)?
            .text_with(r#"text: "\."#, Some(Escaping::Bounded(String::new())), false)?
            .text_with(r#"text: !"\."#, Some(Escaping::Bounded("x".into())), true)?;
        Ok(())
    });
    assert_eq!(out, r#"text1 text2"text: \"\\."!"text: "\.!"~!x"text: !"\.!x""#);
}

#[test]
fn test_mixed_bodies() {
    let out = minified(|b| {
        b.mixed(false)?.text("my title")?.end()?;
        b.mixed(true)?.text("ab")?.end()?;
        b.mixed(true)?
            .text("c")?
            .mixed(false)?
            .text("d")?
            .end()?
            .mixed(true)?
            .text("e")?
            .end()?
            .end()?;
        Ok(())
    });
    assert_eq!(out, "`my title`~`ab`~`c<`d`><~`e`>`");

    let out = minified(|b| {
        b.node("title")?.mixed(true)?.text("my title")?.end()?;
        Ok(())
    });
    assert_eq!(out, "<title~`my title`>");
}

#[test]
fn test_texts_pick_their_escaping() {
    let out = minified(|b| {
        b.text("text")?.text("my text")?;
        Ok(())
    });
    assert_eq!(out, r#"text"my text""#);
}

#[test]
fn test_formattable_value_is_quoted() {
    let out = minified(|b| {
        b.node("a")?.attribute("v")?.value_with("word", None, true)?.end()?;
        Ok(())
    });
    assert_eq!(out, "<a v=~'word'>");
}

#[test]
fn test_property_opens_map() {
    let out = minified(|b| {
        b.node("n")?.property("a")?.text("1")?.end()?;
        Ok(())
    });
    assert_eq!(out, "<n{a=1}>");
}

#[test]
fn test_property_on_pending_key_nests_a_map() {
    let out = minified(|b| {
        b.map()?.property("a")?.property("b")?.text("1")?.end()?.end()?;
        Ok(())
    });
    assert_eq!(out, "{a={b=1}}");

    let out = minified(|b| {
        b.node("n")?.property("a")?.property("b")?.text("1")?.end()?.null_property("c")?.end()?;
        Ok(())
    });
    assert_eq!(out, "<n{a={b=1}c}>");
}

#[test]
fn test_null_property() {
    let out = minified(|b| {
        b.map()?.null_property("a")?.property("b")?.text("1")?.null_property("c")?.end()?;
        Ok(())
    });
    assert_eq!(out, "{a b=1 c}");

    // Ending a map on a pending key leaves that key without value.
    let out = minified(|b| {
        b.map()?.property("k")?.end()?;
        Ok(())
    });
    assert_eq!(out, "{k}");
}

fn tail_attributes(b: &mut Builder<impl LogicalHandler>) -> Result<(), BuildError> {
    b.node("n")?
        .attribute("a")?
        .value("1")?
        .list()?
        .text("x")?
        .attribute("c")?
        .value("3")?
        .attribute("d")?
        .attribute("e")?
        .value("x y")?
        .end()?;
    Ok(())
}

#[test]
fn test_several_tail_attributes() {
    assert_eq!(minified(|b| tail_attributes(b)), "<n a=1[x]c=3 d e='x y'>");

    let events = recorded(|b| tail_attributes(b));
    let end = events.last().unwrap().node();
    let head: Vec<_> = end.head.iter().map(|a| (a.name.text.as_str(), a.offset, a.in_tail)).collect();
    assert_eq!(head, [("a", 0, false)]);
    let tail: Vec<_> = end.tail.iter().map(|a| (a.name.text.as_str(), a.offset, a.in_tail)).collect();
    assert_eq!(tail, [("c", 0, true), ("d", 1, true), ("e", 2, true)]);
    assert_eq!(end.tail[1].value.text, None);
}

#[test]
fn test_property_holding_a_node() {
    let events = recorded(|b| {
        b.map()?.property("k")?.node("v")?.end()?.property("l")?.list()?.end()?.end()?;
        Ok(())
    });
    let holders: Vec<_> = events
        .iter()
        .filter(|e| e.is_start())
        .map(|e| e.node().holder.as_ref().map(|h| h.text.clone()))
        .collect();
    assert_eq!(holders, [None, Some("k".to_owned()), Some("l".to_owned())]);
}

#[test]
fn test_start_is_reported_once_head_is_complete() {
    let events = recorded(|b| {
        b.node("a")?.attribute("x")?.value("1")?.attribute("y")?.end()?;
        Ok(())
    });
    assert_eq!(events.len(), 2);
    let start = events[0].node();
    assert_eq!(start.head.len(), 2);
    assert_eq!(start.head[0].value.as_str(), "1");
    assert_eq!(start.head[1].value.text, None);
}

#[test]
fn test_event_outline() {
    let events = recorded(|b| {
        b.node("a")?.list()?.node("b")?.end()?.text("t")?.end()?;
        Ok(())
    });
    let rec = Recorder { events };
    assert_eq!(rec.outline(), ["+0 a List", "+1 b Empty", "-1 b Empty", "+1 _ Text", "-1 _ Text", "-0 a List"]);
}

#[test]
fn test_mixed_text_follows_body_formattable() {
    let events = recorded(|b| {
        b.mixed(true)?.text_with("x", Some(Escaping::Raw), false)?.end()?;
        b.mixed(false)?.text_with("y", None, true)?.end()?;
        Ok(())
    });
    let texts: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Recorded::Start(n) if n.body == BodyType::Text => n.text.clone(),
            _ => None,
        })
        .collect();
    assert_eq!(texts.len(), 2);
    assert!(texts[0].formattable);
    assert_eq!(texts[0].escaping, Escaping::Quoted);
    assert!(!texts[1].formattable);
}

#[test]
fn test_value_outside_attribute_is_rejected() {
    let mut b = Builder::new(Recorder::new());
    b.node("a").unwrap();
    let err = b.value("x").unwrap_err();
    assert!(matches!(
        err,
        BuildError::IllegalState {
            operation: "value",
            state: BuilderState::InHeadNode
        }
    ));
    assert_eq!(err.to_string(), "value not allowed in 'head node' state");
}

#[test]
fn test_illegal_operations() {
    let mut b = Builder::new(Recorder::new());
    assert!(matches!(b.end(), Err(BuildError::IllegalState { operation: "end", .. })));
    assert!(b.attribute("x").is_err());

    let mut b = Builder::new(Recorder::new());
    b.map().unwrap();
    assert!(matches!(b.text("t"), Err(BuildError::IllegalState { state: BuilderState::InMap, .. })));

    // A simple list has no node to carry attributes.
    let mut b = Builder::new(Recorder::new());
    b.list().unwrap();
    assert!(b.attribute("x").is_err());

    let mut b = Builder::new(Recorder::new());
    b.node("a").unwrap().text("t").unwrap();
    assert!(matches!(b.list(), Err(BuildError::IllegalState { state: BuilderState::InTailNode, .. })));
}

#[test]
fn test_finish_with_open_node() {
    let mut b = Builder::new(Recorder::new());
    b.node("a").unwrap().list().unwrap();
    assert_eq!(b.depth(), 2);
    let err = b.finish().unwrap_err();
    assert!(matches!(err, BuildError::UnclosedConstruct { expected: 0, actual: 2 }));
}

#[test]
fn test_closure_must_stay_balanced() {
    let mut b = Builder::new(Recorder::new());
    let err = b
        .list_with(|b| {
            b.end()?;
            Ok(())
        })
        .map(|_| ())
        .unwrap_err();
    assert!(matches!(err, BuildError::UnbalancedEnd { expected: 1, actual: 0 }));

    let mut b = Builder::new(Recorder::new());
    let err = b
        .map_with(|b| {
            b.property("k")?.node("n")?;
            Ok(())
        })
        .map(|_| ())
        .unwrap_err();
    assert!(matches!(err, BuildError::UnclosedConstruct { expected: 1, actual: 2 }));
}

#[test]
fn test_node_ends_previous_sibling() {
    let out = minified(|b| {
        b.list()?.node("a")?.node("b")?.attribute("x")?.node("c")?.end()?.end()?;
        Ok(())
    });
    assert_eq!(out, "[<a><b x><c>]");
}
