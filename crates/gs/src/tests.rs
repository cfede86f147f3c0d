use super::*;

use gs_testhelpers::{Recorder, init_tracing};
use proptest::prelude::*;

#[test]
fn test_reformat_indented() {
    init_tracing();
    let out = reformat(r#"<a[<b{c=1 noVal d="x"}>]>"#, &SerializeOptions::indented(Indent::Space2)).unwrap();
    assert_eq!(
        out,
        r#"<a [
  <b {
    c= 1
    noVal
    d= "x"
  }>
]>
"#
    );
    let back = reformat(&out, &SerializeOptions::minified()).unwrap();
    assert_eq!(back, r#"<a[<b{c=1 noVal d="x"}>]>"#);
}

#[test]
fn test_build_string_canonical_example() {
    let out = build_string(&SerializeOptions::minified(), |b| {
        b.map()?;
        b.property("str")?.text_with("string", Some(Escaping::Quoted), false)?;
        b.property("num")?.text("12")?;
        b.property("null")?.text("null")?;
        b.property("array")?.list()?;
        b.text("raw")?
            .text(r#"escape "quote""#)?
            .text_with(r#"escape "quote" by bound"#, Some(Escaping::Bounded(String::new())), false)?
            .end()?;
        b.property("object")?.map()?;
        b.property("boolean true")?.text("true")?;
        b.property("boolean false")?.text("false")?.end()?;
        b.end()?;
        Ok(())
    })
    .unwrap();
    insta::assert_snapshot!(out, @r#"{str="string"num=12 null=null array=[raw"escape \"quote\""!"escape "quote" by bound!"]object={'boolean true'=true'boolean false'=false}}"#);
}

#[test]
fn test_key_without_value_reports_events() {
    let mut parser = Parser::new(Recorder::new());
    parser.parse("{key}").unwrap();
    assert_eq!(parser.handler().events.len(), 4);
}

#[test]
fn test_build_string_rejects_misuse() {
    let err = build_string(&SerializeOptions::minified(), |b| {
        b.node("a")?.value("v")?;
        Ok(())
    })
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Build(BuildError::IllegalState {
            operation: "value",
            state: BuilderState::InHeadNode
        })
    ));

    let err = build_string(&SerializeOptions::minified(), |b| {
        b.node("a")?;
        Ok(())
    })
    .unwrap_err();
    assert_eq!(err.to_string(), "build error: not enough end() calls: depth 1, expected 0");
}

#[test]
fn test_reformat_reports_parse_errors() {
    let err = reformat("<a[", &SerializeOptions::minified()).unwrap_err();
    assert_eq!(err.to_string(), "parse error: list body not ended [3]");
    assert!(err.handler_error().is_none());
    assert!(check("<a[").is_err());
    assert!(check("<a[]>").is_ok());
}

#[test]
fn test_reformat_to_io() {
    let out = reformat_to("[a  b]", &SerializeOptions::pretty(), Vec::new()).unwrap();
    assert_eq!(out, b"[a b]");
}

#[test]
fn test_unsupported_width_is_a_handler_error() {
    let err = reformat("~\"0123456789\"", &SerializeOptions::formatted(Indent::Tab, 4)).unwrap_err();
    assert!(matches!(err.handler_error(), Some(HandlerError::Unsupported(_))));
}

/// Document shape used to drive the builder.
#[derive(Debug, Clone)]
enum Item {
    Text(String),
    List(Vec<Item>),
    Map(Vec<(String, Option<Item>)>),
    Node {
        name: String,
        atts: Vec<(String, Option<String>)>,
        body: Option<Box<Item>>,
    },
}

fn build<H: LogicalHandler>(b: &mut Builder<H>, item: &Item) -> Result<(), BuildError> {
    match item {
        Item::Text(t) => {
            b.text(t)?;
        }
        Item::List(items) => {
            b.list()?;
            for i in items {
                build(b, i)?;
            }
            b.end()?;
        }
        Item::Map(entries) => {
            b.map()?;
            for (k, v) in entries {
                match v {
                    Some(v) => {
                        b.property(k)?;
                        build(b, v)?;
                    }
                    None => {
                        b.null_property(k)?;
                    }
                }
            }
            b.end()?;
        }
        Item::Node { name, atts, body } => {
            b.node(name)?;
            for (n, v) in atts {
                b.attribute(n)?;
                if let Some(v) = v {
                    b.value(v)?;
                }
            }
            match body.as_deref() {
                None => {
                    b.end()?;
                }
                Some(text @ Item::Text(_)) => {
                    build(b, text)?;
                    b.end()?;
                }
                // Closing a list or map body also ends its node.
                Some(container) => build(b, container)?,
            }
        }
    }
    Ok(())
}

fn text() -> impl Strategy<Value = String> {
    "[a-z0-9 \"'<`\\\\!]{0,6}"
}

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9 ]{0,4}"
}

fn item() -> impl Strategy<Value = Item> {
    text().prop_map(Item::Text).prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Item::List),
            prop::collection::vec((name(), prop::option::of(inner.clone())), 0..4).prop_map(Item::Map),
            (
                name(),
                prop::collection::vec((name(), prop::option::of(text())), 0..3),
                prop::option::of(inner),
            )
                .prop_map(|(name, atts, body)| Item::Node {
                    name,
                    atts,
                    body: body.map(|b| match b {
                        node @ Item::Node { .. } => Box::new(Item::List(vec![node])),
                        other => Box::new(other),
                    }),
                }),
        ]
    })
}

fn built_text(items: &[Item], options: &SerializeOptions) -> String {
    build_string(options, |b| {
        for i in items {
            build(b, i)?;
        }
        Ok(())
    })
    .unwrap()
}

proptest! {
    #[test]
    fn parsing_built_text_gives_the_built_events(items in prop::collection::vec(item(), 0..4)) {
        let mut builder = Builder::new(Recorder::new());
        for i in &items {
            build(&mut builder, i).unwrap();
        }
        let built = builder.finish().unwrap().events;

        for options in [SerializeOptions::minified(), SerializeOptions::pretty(), SerializeOptions::indented(Indent::Tab)] {
            let text = built_text(&items, &options);
            let mut parser = Parser::new(Recorder::new());
            parser.parse(&text).unwrap();
            prop_assert_eq!(&parser.into_handler().events, &built, "{}", text);
        }
    }

    #[test]
    fn minified_output_is_stable(items in prop::collection::vec(item(), 0..4)) {
        let minified = built_text(&items, &SerializeOptions::minified());
        let indented = built_text(&items, &SerializeOptions::indented(Indent::Space3));
        prop_assert_eq!(reformat(&minified, &SerializeOptions::minified()).unwrap(), minified.clone());
        prop_assert_eq!(reformat(&indented, &SerializeOptions::minified()).unwrap(), minified);
    }
}
