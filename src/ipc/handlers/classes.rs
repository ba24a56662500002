use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{opt_param_str, param_str, parse_params, require_store};
use crate::ipc::types::{AppState, Request};
use crate::model::ClassInput;
use serde_json::json;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let school_id = opt_param_str(req, "schoolId");

    // Include the block count so the dashboard can show schedule coverage
    // without a request per class.
    let db = match store.snapshot() {
        Ok(db) => db,
        Err(e) => return store_err(&req.id, e),
    };
    let mut rows = Vec::new();
    for class in db
        .classes
        .iter()
        .filter(|c| school_id.map(|id| c.school_id == id).unwrap_or(true))
    {
        let block_count = db
            .time_blocks
            .iter()
            .filter(|tb| tb.class_id == class.id)
            .count();
        let mut row = match serde_json::to_value(class) {
            Ok(v) => v,
            Err(e) => return err(&req.id, "storage_failed", e.to_string(), None),
        };
        row["timeBlockCount"] = json!(block_count);
        rows.push(row);
    }
    ok(&req.id, json!({ "classes": rows }))
}

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let id = match param_str(req, "id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.get_class(id) {
        Ok(class) => ok(&req.id, json!({ "class": class })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let input: ClassInput = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.create_class(input) {
        Ok(class) => ok(&req.id, json!({ "class": class })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let id = match param_str(req, "id") {
        Ok(v) => v.to_string(),
        Err(resp) => return resp,
    };
    let input: ClassInput = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.update_class(&id, input) {
        Ok(class) => ok(&req.id, json!({ "class": class })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let id = match param_str(req, "id") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.delete_class(id) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "classes.list" => Some(handle_list(state, req)),
        "classes.get" => Some(handle_get(state, req)),
        "classes.create" => Some(handle_create(state, req)),
        "classes.update" => Some(handle_update(state, req)),
        "classes.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
