//! Wire round-trip through the facade: packed maps in, packed maps out.

use formgraph::prelude::*;
use formgraph::{Container, Error, GraphError, pack_all, unpack_all};
use serde_json::{Value, json};

fn handle(controller: &Controller, packed: &[formgraph::Map], event: Event) -> Result<Vec<Value>> {
    let views = unpack_all(packed)?;
    let views = controller.list(views, event)?;
    Ok(pack_all(&views).into_iter().map(Value::Object).collect())
}

fn app() -> Result<Controller> {
    let region = Control::select(["EU", "US"]).with_id("region").with_container("side");
    let greeting = Control::markdown("")
        .with_id("greeting")
        .with_container("main")
        .depends_on(&region)
        .on_update(|this, parents| {
            let region = parents[0].value();
            let name = region.as_item().and_then(Value::as_str).unwrap_or("nowhere");
            this.as_markdown_mut()
                .ok_or("not markdown")?
                .set_text(format!("Hello from {name}"));
            Ok(())
        });
    Ok(Controller::builder()
        .containers([Container::new("side"), Container::new("main").with_columns(2)])
        .controls([region, greeting])
        .build()?)
}

#[test]
fn packed_round_trip_tracks_selection() {
    let controller = app().unwrap();
    let first = handle(&controller, &[], Event::Refresh).unwrap();
    assert_eq!(first[1]["data"], json!({"markdown": "Hello from EU"}));
    assert_eq!(first[0]["container"], "side");

    let mut edited = first[0].as_object().unwrap().clone();
    edited.insert("selected".into(), json!(1));
    let second = handle(&controller, &[edited], Event::Refresh).unwrap();
    assert_eq!(second[0]["selected"], 1);
    assert_eq!(second[1]["data"], json!({"markdown": "Hello from US"}));
}

#[test]
fn errors_convert_into_facade_error() {
    let controller = app().unwrap();
    let mut bogus = formgraph::Map::new();
    bogus.insert("id".into(), json!("region"));
    bogus.insert("type".into(), json!("GaugeView"));
    let err = handle(&controller, &[bogus], Event::Refresh).unwrap_err();
    assert!(matches!(err, Error::View(_)));

    let dup: Result<Controller> = Controller::new(vec![
        Control::input("").with_id("x"),
        Control::input("").with_id("x"),
    ])
    .map_err(Error::from);
    assert!(matches!(dup, Err(Error::Graph(GraphError::DuplicateId(_)))));
}
