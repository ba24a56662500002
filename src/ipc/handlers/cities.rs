use crate::ipc::error::{ok, store_err};
use crate::ipc::helpers::{param_str, parse_params, require_store};
use crate::ipc::types::{AppState, Request};
use crate::model::CityInput;
use serde_json::json;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match store.list_cities() {
        Ok(cities) => ok(&req.id, json!({ "cities": cities })),
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
    match store.get_city(id) {
        Ok(city) => ok(&req.id, json!({ "city": city })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let input: CityInput = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.create_city(input) {
        Ok(city) => ok(&req.id, json!({ "city": city })),
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
    let input: CityInput = match parse_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.update_city(&id, input) {
        Ok(city) => ok(&req.id, json!({ "city": city })),
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
    match store.delete_city(id) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "cities.list" => Some(handle_list(state, req)),
        "cities.get" => Some(handle_get(state, req)),
        "cities.create" => Some(handle_create(state, req)),
        "cities.update" => Some(handle_update(state, req)),
        "cities.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
