use crate::ipc::error::{ok, store_err};
use crate::ipc::helpers::{opt_param_str, param_str, parse_params, require_store};
use crate::ipc::types::{AppState, Request};
use crate::model::CommunityInput;
use serde_json::json;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let city_id = opt_param_str(req, "cityId");
    match store.list_communities(city_id) {
        Ok(communities) => ok(&req.id, json!({ "communities": communities })),
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
    match store.get_community(id) {
        Ok(community) => ok(&req.id, json!({ "community": community })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let input: CommunityInput = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.create_community(input) {
        Ok(community) => ok(&req.id, json!({ "community": community })),
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
    let input: CommunityInput = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.update_community(&id, input) {
        Ok(community) => ok(&req.id, json!({ "community": community })),
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
    match store.delete_community(id) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "communities.list" => Some(handle_list(state, req)),
        "communities.get" => Some(handle_get(state, req)),
        "communities.create" => Some(handle_create(state, req)),
        "communities.update" => Some(handle_update(state, req)),
        "communities.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
