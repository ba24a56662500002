use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{opt_param_str, param_str, parse_params, require_store};
use crate::ipc::types::{AppState, Request};
use crate::model::{DayType, TimeBlockInput};
use serde_json::json;

fn parse_day_type(req: &Request) -> Result<Option<DayType>, serde_json::Value> {
    match req.params.get("dayType") {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(v) => serde_json::from_value::<DayType>(v.clone())
            .map(Some)
            .map_err(|e| err(&req.id, "bad_params", e.to_string(), None)),
    }
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let class_id = opt_param_str(req, "classId");
    let day_type = match parse_day_type(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.list_time_blocks(class_id, day_type) {
        Ok(blocks) => ok(&req.id, json!({ "timeBlocks": blocks })),
        Err(e) => store_err(&req.id, e),
    }
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
    match store.get_time_block(id) {
        Ok(block) => ok(&req.id, json!({ "timeBlock": block })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let input: TimeBlockInput = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.create_time_block(input) {
        Ok(block) => ok(&req.id, json!({ "timeBlock": block })),
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
    let input: TimeBlockInput = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.update_time_block(&id, input) {
        Ok(block) => ok(&req.id, json!({ "timeBlock": block })),
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
    match store.delete_time_block(id) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "timeBlocks.list" => Some(handle_list(state, req)),
        "timeBlocks.get" => Some(handle_get(state, req)),
        "timeBlocks.create" => Some(handle_create(state, req)),
        "timeBlocks.update" => Some(handle_update(state, req)),
        "timeBlocks.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
