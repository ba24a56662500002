
use serde_json::json;
use test_support::{request_err, request_ok, select_workspace, spawn_sidecar, temp_dir};

fn str_field(v: &serde_json::Value, pointer: &str) -> String {
    v.pointer(pointer)
        .and_then(|f| f.as_str())
        .unwrap_or_else(|| panic!("missing {} in {}", pointer, v))
        .to_string()
}

#[test]
fn export_then_import_restores_the_document() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _source = select_workspace(&mut stdin, &mut reader, "lehavdil-export-src");

    let city = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "cities.create",
        json!({ "nameEn": "Montreal", "nameHe": "מונטריאול", "country": "Canada" }),
    );
    let city_id = str_field(&city, "/city/id");

    let out_path = temp_dir("lehavdil-bundles").join("backup.lhvz");
    let exported = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "backup.export",
        json!({ "outPath": out_path.to_string_lossy() }),
    );
    assert_eq!(
        exported.get("bundleFormat").and_then(|v| v.as_str()),
        Some("lehavdil-workspace-v1")
    );
    assert_eq!(exported.get("entryCount").and_then(|v| v.as_i64()), Some(3));

    // Switch to a fresh workspace and restore the bundle into it.
    let _target = select_workspace(&mut stdin, &mut reader, "lehavdil-export-dst");
    let empty = request_ok(&mut stdin, &mut reader, "3", "cities.list", json!({}));
    assert_eq!(
        empty.get("cities").and_then(|v| v.as_array()).map(Vec::len),
        Some(0)
    );

    let imported = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "backup.import",
        json!({ "inPath": out_path.to_string_lossy() }),
    );
    assert_eq!(
        imported
            .get("bundleFormatDetected")
            .and_then(|v| v.as_str()),
        Some("lehavdil-workspace-v1")
    );

    let restored = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "cities.get",
        json!({ "id": city_id }),
    );
    assert_eq!(str_field(&restored, "/city/nameHe"), "מונטריאול");
}

#[test]
fn bare_database_files_import_as_legacy_json() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let source = select_workspace(&mut stdin, &mut reader, "lehavdil-legacy-src");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "cities.create",
        json!({ "nameEn": "Toronto", "country": "Canada" }),
    );

    // The workspace document itself is a valid legacy input.
    let db_copy = temp_dir("lehavdil-legacy").join("old-export.json");
    std::fs::copy(source.join("lehavdil.json"), &db_copy).expect("copy database");

    let _target = select_workspace(&mut stdin, &mut reader, "lehavdil-legacy-dst");
    let imported = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "backup.import",
        json!({ "inPath": db_copy.to_string_lossy() }),
    );
    assert_eq!(
        imported
            .get("bundleFormatDetected")
            .and_then(|v| v.as_str()),
        Some("legacy-json")
    );

    let listed = request_ok(&mut stdin, &mut reader, "3", "cities.list", json!({}));
    assert_eq!(
        listed.get("cities").and_then(|v| v.as_array()).map(Vec::len),
        Some(1)
    );
}

#[test]
fn import_rejects_garbage_and_export_needs_a_workspace() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let code = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "backup.export",
        json!({ "outPath": "/tmp/never-written.lhvz" }),
    );
    assert_eq!(code, "no_workspace");

    let _workspace = select_workspace(&mut stdin, &mut reader, "lehavdil-garbage");
    let garbage = temp_dir("lehavdil-garbage-in").join("not-a-bundle.bin");
    std::fs::write(&garbage, b"definitely not a bundle").expect("write garbage");

    let code = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "backup.import",
        json!({ "inPath": garbage.to_string_lossy() }),
    );
    assert_eq!(code, "import_failed");

    // A failed import leaves the selected workspace usable.
    let listed = request_ok(&mut stdin, &mut reader, "3", "cities.list", json!({}));
    assert_eq!(
        listed.get("cities").and_then(|v| v.as_array()).map(Vec::len),
        Some(0)
    );
}
