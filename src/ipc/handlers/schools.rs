use crate::ipc::error::{ok, store_err};
use crate::ipc::helpers::{opt_param_str, param_str, parse_params, require_store};
use crate::ipc::types::{AppState, Request};
use crate::model::SchoolInput;
use serde_json::json;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let community_id = opt_param_str(req, "communityId");
    match store.list_schools(community_id) {
        Ok(schools) => ok(&req.id, json!({ "schools": schools })),
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
    match store.get_school(id) {
        Ok(school) => ok(&req.id, json!({ "school": school })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let input: SchoolInput = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.create_school(input) {
        Ok(school) => ok(&req.id, json!({ "school": school })),
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
    let input: SchoolInput = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.update_school(&id, input) {
        Ok(school) => ok(&req.id, json!({ "school": school })),
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
    match store.delete_school(id) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "schools.list" => Some(handle_list(state, req)),
        "schools.get" => Some(handle_get(state, req)),
        "schools.create" => Some(handle_create(state, req)),
        "schools.update" => Some(handle_update(state, req)),
        "schools.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
