use crate::calc;
use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{param_str, require_store};
use crate::ipc::types::{AppState, Request};
use crate::model::{Class, DayType, SubjectType, TimeBlock};
use crate::store::Database;
use serde_json::json;

fn class_blocks(db: &Database, class_id: &str, day_type: DayType) -> Vec<TimeBlock> {
    let mut blocks: Vec<TimeBlock> = db
        .time_blocks
        .iter()
        .filter(|tb| tb.class_id == class_id && tb.day_type == day_type)
        .cloned()
        .collect();
    blocks.sort_by_key(|tb| tb.sort_order);
    blocks
}

fn weekly_for_class(db: &Database, class_id: &str) -> calc::WeeklyTotals {
    calc::weekly_totals(
        &class_blocks(db, class_id, DayType::Sunday),
        &class_blocks(db, class_id, DayType::Weekday),
        &class_blocks(db, class_id, DayType::Friday),
    )
}

fn find_class<'a>(db: &'a Database, class_id: &str) -> Option<&'a Class> {
    db.classes.iter().find(|c| c.id == class_id)
}

fn handle_day_totals(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let class_id = match param_str(req, "classId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let day_type: DayType = match req
        .params
        .get("dayType")
        .cloned()
        .map(serde_json::from_value)
    {
        Some(Ok(v)) => v,
        _ => return err(&req.id, "bad_params", "missing or invalid params.dayType", None),
    };

    let db = match store.snapshot() {
        Ok(db) => db,
        Err(e) => return store_err(&req.id, e),
    };
    if find_class(&db, class_id).is_none() {
        return err(&req.id, "not_found", "class not found", None);
    }
    let totals = calc::day_totals(&class_blocks(&db, class_id, day_type));
    ok(
        &req.id,
        json!({
            "classId": class_id,
            "dayType": day_type,
            "totals": totals,
        }),
    )
}

fn handle_weekly_totals(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let class_id = match param_str(req, "classId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let db = match store.snapshot() {
        Ok(db) => db,
        Err(e) => return store_err(&req.id, e),
    };
    if find_class(&db, class_id).is_none() {
        return err(&req.id, "not_found", "class not found", None);
    }
    let weekly = weekly_for_class(&db, class_id);
    ok(
        &req.id,
        json!({
            "classId": class_id,
            "totals": weekly,
            "totalShort": calc::format_hours(weekly.total, true),
            "totalLong": calc::format_hours(weekly.total, false),
        }),
    )
}

fn handle_compare_baseline(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let class_id = match param_str(req, "classId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let db = match store.snapshot() {
        Ok(db) => db,
        Err(e) => return store_err(&req.id, e),
    };
    let Some(class) = find_class(&db, class_id) else {
        return err(&req.id, "not_found", "class not found", None);
    };

    // First flagged school wins; the store allows more than one per
    // community, so the pick must be deterministic.
    let Some(baseline_school) = db.schools.iter().find(|s| s.is_baseline()) else {
        return err(&req.id, "not_found", "no baseline school configured", None);
    };
    let Some(baseline_class) = db
        .classes
        .iter()
        .find(|c| c.school_id == baseline_school.id && c.grade_level == class.grade_level)
    else {
        return err(
            &req.id,
            "not_found",
            format!(
                "baseline school has no class at grade level {}",
                class.grade_level
            ),
            None,
        );
    };

    let class_weekly = weekly_for_class(&db, &class.id);
    let baseline_weekly = weekly_for_class(&db, &baseline_class.id);
    let comparison = calc::compare_with_baseline(&class_weekly, &baseline_weekly);

    ok(
        &req.id,
        json!({
            "class": { "id": class.id, "name": class.name, "gradeLevel": class.grade_level },
            "baselineSchool": { "id": baseline_school.id, "nameEn": baseline_school.name_en },
            "baselineClass": { "id": baseline_class.id, "name": baseline_class.name },
            "classWeekly": class_weekly,
            "baselineWeekly": baseline_weekly,
            "comparison": comparison,
        }),
    )
}

fn handle_validate_block(req: &Request) -> serde_json::Value {
    let start_time = match param_str(req, "startTime") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let end_time = match param_str(req, "endTime") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    // An unknown subject tag is a validation failure, not a protocol error.
    let subject_type: Option<SubjectType> = req
        .params
        .get("subjectType")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok());

    let valid = subject_type
        .map(|st| calc::validate_time_block(start_time, end_time, st))
        .unwrap_or(false);
    ok(&req.id, json!({ "valid": valid }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "schedule.dayTotals" => Some(handle_day_totals(state, req)),
        "schedule.weeklyTotals" => Some(handle_weekly_totals(state, req)),
        "schedule.compareBaseline" => Some(handle_compare_baseline(state, req)),
        "schedule.validateBlock" => Some(handle_validate_block(req)),
        _ => None,
    }
}
