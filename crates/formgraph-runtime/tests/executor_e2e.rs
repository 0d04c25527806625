//! End-to-end command execution: JSON in, execution record out.
//!
//! Covers the refresh/apply status machine, output encoding, upload
//! resolution from a handler, and handler memoization across commands.

use std::sync::Arc;

use formgraph_controls::Control;
use formgraph_runtime::{
    Controller, Executor, ExecutionStatus, HandlerCache, MemoryUploads, UploadResolver,
    parents_key,
};
use formgraph_view::EncodedOutput;
use serde_json::{Value, json};
use time::macros::date;

#[test]
fn upload_line_count_round_trip() {
    let store = MemoryUploads::new();
    let upload = store.store("rows.csv", b"a\nb\nc\n", date!(2021 - 05 - 04));
    let cache: Arc<HandlerCache<u64, usize>> = Arc::new(HandlerCache::new(8));

    let uploader = Control::uploader().with_id("files").with_label("Files");
    let resolver = store.clone();
    let memo = Arc::clone(&cache);
    let lines = Control::output()
        .with_id("lines")
        .with_label("Line count")
        .depends_on(&uploader)
        .with_require_apply(true)
        .on_update(move |this, parents| {
            let uploads = parents[0].value();
            let uploads = uploads.as_uploads().unwrap_or_default();
            let count = memo.try_get_or_insert_with(parents_key(parents), || {
                let mut total = 0;
                for upload in uploads {
                    total += resolver.read(upload)?.iter().filter(|&&b| b == b'\n').count();
                }
                Ok::<_, std::io::Error>(total)
            })?;
            this.as_output_mut()
                .ok_or("not an output")?
                .set_data(Value::from(count));
            Ok(())
        });
    let executor = Executor::new(Arc::new(Controller::new(vec![uploader, lines]).unwrap()));

    let ready = executor
        .execute_json(r#"{"id": "r1", "views": null, "apply": false}"#)
        .unwrap();
    assert_eq!(ready.status, ExecutionStatus::Ready);
    let mut views = ready.views.unwrap();
    assert_eq!(views.len(), 3);
    assert!(views[2].enabled, "apply is enabled while the output waits");

    views[0].as_uploader_mut().unwrap().uploads = vec![upload];
    let command = json!({"id": "r2", "views": views, "apply": true}).to_string();
    for _ in 0..2 {
        let finished = executor.execute_json(&command).unwrap();
        assert_eq!(finished.status, ExecutionStatus::Finished);
        let outputs = finished.outputs.unwrap();
        assert_eq!(outputs.len(), 1);
        let encoded = EncodedOutput {
            application: outputs[0].application.clone(),
            content_type: outputs[0].content_type.clone(),
            data: outputs[0].data.clone(),
        };
        assert_eq!(encoded.bytes().unwrap(), b"3");
    }
    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
}

#[test]
fn missing_upload_fails_the_execution() {
    let store = MemoryUploads::new();
    let uploader = Control::uploader().with_id("files");
    let resolver = store.clone();
    let out = Control::output()
        .with_id("out")
        .depends_on(&uploader)
        .on_update(move |this, parents| {
            let mut size = 0;
            for upload in parents[0].value().as_uploads().unwrap_or_default() {
                size += resolver.read(upload)?.len();
            }
            this.as_output_mut()
                .ok_or("not an output")?
                .set_data(Value::from(size));
            Ok(())
        });
    let executor = Executor::new(Arc::new(Controller::new(vec![uploader, out]).unwrap()));

    let line = json!({
        "id": "m1",
        "apply": true,
        "views": [{
            "id": "files",
            "type": "UploaderView",
            "uploads": [{"id": "nope", "file_name": "x", "length": 1, "created_date": "2021-01-01"}]
        }]
    })
    .to_string();
    let failed = executor.execute_json(&line).unwrap();
    assert_eq!(failed.status, ExecutionStatus::Failed);
    assert!(failed.logs.as_ref().unwrap().contains("upload nope (2021-01-01) not found"));

    let packed: Value = serde_json::from_str(&failed.to_json().unwrap()).unwrap();
    assert_eq!(packed["status"], "FAILED");
    assert_eq!(packed["views"][0]["type"], "UploaderView");
}

#[test]
fn markdown_outputs_carry_renderer_hint() {
    let md = Control::markdown("**bold**").with_id("doc").with_label("Doc");
    let executor = Executor::new(Arc::new(Controller::new(vec![md]).unwrap()));
    let finished = executor.execute_json(r#"{"id": "d1", "apply": true}"#).unwrap();
    let packed: Value = serde_json::from_str(&finished.to_json().unwrap()).unwrap();
    assert_eq!(
        packed["outputs"][0],
        json!({
            "id": "doc",
            "label": "Doc",
            "application": "markdown",
            "content_type": "text/markdown",
            "data": "Kipib2xkKio="
        })
    );
}

#[test]
fn malformed_command_is_a_parse_error() {
    let executor = Executor::new(Arc::new(Controller::new(Vec::new()).unwrap()));
    assert!(executor.execute_json("{\"apply\": true}").is_err());
    assert!(
        executor
            .execute_json(r#"{"id": "x", "views": [{"id": "a", "type": "NopeView"}]}"#)
            .is_err()
    );
}
