
use serde_json::json;
use std::io::BufReader;
use std::process::{ChildStdin, ChildStdout};
use test_support::{request_ok, select_workspace, spawn_sidecar};

struct Tree {
    city_id: String,
    community_id: String,
    school_id: String,
    class_id: String,
}

fn grab(v: &serde_json::Value, pointer: &str) -> String {
    v.pointer(pointer)
        .and_then(|f| f.as_str())
        .unwrap_or_else(|| panic!("missing {} in {}", pointer, v))
        .to_string()
}

fn seed_tree(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    tag: &str,
) -> Tree {
    let city = request_ok(
        stdin,
        reader,
        &format!("{}-city", tag),
        "cities.create",
        json!({ "nameEn": format!("{} City", tag), "country": "Canada" }),
    );
    let city_id = grab(&city, "/city/id");

    let community = request_ok(
        stdin,
        reader,
        &format!("{}-community", tag),
        "communities.create",
        json!({ "cityId": city_id, "nameEn": format!("{} Community", tag) }),
    );
    let community_id = grab(&community, "/community/id");

    let school = request_ok(
        stdin,
        reader,
        &format!("{}-school", tag),
        "schools.create",
        json!({
            "communityId": community_id,
            "schoolType": "boys",
            "nameEn": format!("{} School", tag)
        }),
    );
    let school_id = grab(&school, "/school/id");

    let class = request_ok(
        stdin,
        reader,
        &format!("{}-class", tag),
        "classes.create",
        json!({ "schoolId": school_id, "name": "כיתה א", "gradeLevel": 1 }),
    );
    let class_id = grab(&class, "/class/id");

    let _ = request_ok(
        stdin,
        reader,
        &format!("{}-block", tag),
        "timeBlocks.create",
        json!({
            "classId": class_id,
            "dayType": "weekday",
            "startTime": "08:00",
            "endTime": "09:00",
            "subjectType": "hebrew"
        }),
    );

    Tree {
        city_id,
        community_id,
        school_id,
        class_id,
    }
}

fn count(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    key: &str,
) -> usize {
    let res = request_ok(stdin, reader, id, method, json!({}));
    res.get(key)
        .and_then(|v| v.as_array())
        .map(Vec::len)
        .unwrap_or_else(|| panic!("missing {} in {}", key, res))
}

#[test]
fn city_delete_cascades_four_levels() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _workspace = select_workspace(&mut stdin, &mut reader, "lehavdil-cascade-city");

    let doomed = seed_tree(&mut stdin, &mut reader, "doomed");
    let kept = seed_tree(&mut stdin, &mut reader, "kept");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "del",
        "cities.delete",
        json!({ "id": doomed.city_id }),
    );

    assert_eq!(count(&mut stdin, &mut reader, "c1", "cities.list", "cities"), 1);
    assert_eq!(
        count(&mut stdin, &mut reader, "c2", "communities.list", "communities"),
        1
    );
    assert_eq!(count(&mut stdin, &mut reader, "c3", "schools.list", "schools"), 1);
    assert_eq!(count(&mut stdin, &mut reader, "c4", "classes.list", "classes"), 1);
    assert_eq!(
        count(&mut stdin, &mut reader, "c5", "timeBlocks.list", "timeBlocks"),
        1
    );

    // The surviving tree is the unrelated one.
    let schools = request_ok(&mut stdin, &mut reader, "c6", "schools.list", json!({}));
    assert_eq!(
        schools.pointer("/schools/0/id").and_then(|v| v.as_str()),
        Some(kept.school_id.as_str())
    );
    let classes = request_ok(&mut stdin, &mut reader, "c7", "classes.list", json!({}));
    assert_eq!(
        classes.pointer("/classes/0/id").and_then(|v| v.as_str()),
        Some(kept.class_id.as_str())
    );
    let _ = (kept.city_id, kept.community_id, doomed.community_id);
}

#[test]
fn community_and_school_deletes_cascade_partially() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _workspace = select_workspace(&mut stdin, &mut reader, "lehavdil-cascade-partial");

    let tree = seed_tree(&mut stdin, &mut reader, "a");

    // School delete: classes and blocks go, community and city stay.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "del-school",
        "schools.delete",
        json!({ "id": tree.school_id }),
    );
    assert_eq!(count(&mut stdin, &mut reader, "s1", "schools.list", "schools"), 0);
    assert_eq!(count(&mut stdin, &mut reader, "s2", "classes.list", "classes"), 0);
    assert_eq!(
        count(&mut stdin, &mut reader, "s3", "timeBlocks.list", "timeBlocks"),
        0
    );
    assert_eq!(
        count(&mut stdin, &mut reader, "s4", "communities.list", "communities"),
        1
    );

    // Community delete: city stays.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "del-community",
        "communities.delete",
        json!({ "id": tree.community_id }),
    );
    assert_eq!(
        count(&mut stdin, &mut reader, "p1", "communities.list", "communities"),
        0
    );
    assert_eq!(count(&mut stdin, &mut reader, "p2", "cities.list", "cities"), 1);
    let _ = (tree.city_id, tree.class_id);
}

#[test]
fn class_delete_cascades_one_level() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _workspace = select_workspace(&mut stdin, &mut reader, "lehavdil-cascade-class");

    let tree = seed_tree(&mut stdin, &mut reader, "a");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "del-class",
        "classes.delete",
        json!({ "id": tree.class_id }),
    );
    assert_eq!(count(&mut stdin, &mut reader, "k1", "classes.list", "classes"), 0);
    assert_eq!(
        count(&mut stdin, &mut reader, "k2", "timeBlocks.list", "timeBlocks"),
        0
    );
    assert_eq!(count(&mut stdin, &mut reader, "k3", "schools.list", "schools"), 1);
}
