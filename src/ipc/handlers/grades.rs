use crate::grades;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::param_str;
use crate::ipc::types::{AppState, Request};
use crate::model::SchoolType;
use serde_json::json;

fn parse_school_type(req: &Request) -> Result<SchoolType, serde_json::Value> {
    let v = req
        .params
        .get("schoolType")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    serde_json::from_value(v)
        .map_err(|_| err(&req.id, "bad_params", "missing or invalid params.schoolType", None))
}

fn handle_list(req: &Request) -> serde_json::Value {
    let school_type = match parse_school_type(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let (min, max) = grades::grade_range(school_type);
    ok(
        &req.id,
        json!({
            "schoolType": school_type,
            "grades": grades::grade_set(school_type),
            "range": { "min": min, "max": max },
            "labels": {
                "en": grades::school_type_label(school_type, "en"),
                "he": grades::school_type_label(school_type, "he"),
            }
        }),
    )
}

fn handle_default_name(req: &Request) -> serde_json::Value {
    let school_type = match parse_school_type(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(grade_level) = req.params.get("gradeLevel").and_then(|v| v.as_i64()) else {
        return err(&req.id, "bad_params", "missing params.gradeLevel", None);
    };
    ok(
        &req.id,
        json!({
            "valid": grades::is_valid_grade(school_type, grade_level),
            "name": grades::default_class_name(school_type, grade_level),
        }),
    )
}

fn handle_grade_for_name(req: &Request) -> serde_json::Value {
    let school_type = match parse_school_type(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let name = match param_str(req, "name") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(
        &req.id,
        json!({ "gradeLevel": grades::grade_value_for_name(school_type, name) }),
    )
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    // Pure table lookups; no workspace required.
    match req.method.as_str() {
        "grades.list" => Some(handle_list(req)),
        "grades.defaultName" => Some(handle_default_name(req)),
        "grades.gradeForName" => Some(handle_grade_for_name(req)),
        _ => None,
    }
}
