
use serde_json::json;
use std::io::BufReader;
use std::process::{ChildStdin, ChildStdout};
use test_support::{request_err, request_ok, select_workspace, spawn_sidecar};

fn str_field(v: &serde_json::Value, pointer: &str) -> String {
    v.pointer(pointer)
        .and_then(|f| f.as_str())
        .unwrap_or_else(|| panic!("missing {} in {}", pointer, v))
        .to_string()
}

fn num_field(v: &serde_json::Value, pointer: &str) -> f64 {
    v.pointer(pointer)
        .and_then(|f| f.as_f64())
        .unwrap_or_else(|| panic!("missing {} in {}", pointer, v))
}

fn add_block(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    class_id: &str,
    day_type: &str,
    start: &str,
    end: &str,
    subject: &str,
) {
    let _ = request_ok(
        stdin,
        reader,
        id,
        "timeBlocks.create",
        json!({
            "classId": class_id,
            "dayType": day_type,
            "startTime": start,
            "endTime": end,
            "subjectType": subject
        }),
    );
}

/// Builds two schools in one community: the class under test and a flagged
/// baseline school with a class at the same grade level. Returns both class
/// ids.
fn seed_schedule(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
) -> (String, String) {
    let city = request_ok(
        stdin,
        reader,
        "city",
        "cities.create",
        json!({ "nameEn": "Montreal", "country": "Canada" }),
    );
    let city_id = str_field(&city, "/city/id");
    let community = request_ok(
        stdin,
        reader,
        "community",
        "communities.create",
        json!({ "cityId": city_id, "nameEn": "Belz" }),
    );
    let community_id = str_field(&community, "/community/id");

    let school = request_ok(
        stdin,
        reader,
        "school",
        "schools.create",
        json!({ "communityId": community_id, "schoolType": "boys", "nameEn": "Boys" }),
    );
    let school_id = str_field(&school, "/school/id");
    let class = request_ok(
        stdin,
        reader,
        "class",
        "classes.create",
        json!({ "schoolId": school_id, "name": "כיתה ג", "gradeLevel": 3 }),
    );
    let class_id = str_field(&class, "/class/id");

    let baseline = request_ok(
        stdin,
        reader,
        "baseline-school",
        "schools.create",
        json!({
            "communityId": community_id,
            "schoolType": "boys",
            "nameEn": "Baseline Boys",
            "isBaseline": true
        }),
    );
    let baseline_school_id = str_field(&baseline, "/school/id");
    let baseline_class = request_ok(
        stdin,
        reader,
        "baseline-class",
        "classes.create",
        json!({ "schoolId": baseline_school_id, "name": "כיתה ג", "gradeLevel": 3 }),
    );
    let baseline_class_id = str_field(&baseline_class, "/class/id");

    // Sunday: a bus leg then one long Hebrew session.
    add_block(stdin, reader, "b1", &class_id, "sunday", "07:30", "08:00", "bus-start");
    add_block(stdin, reader, "b2", &class_id, "sunday", "08:00", "12:00", "hebrew");
    // Weekday: Hebrew morning, recess, English afternoon.
    add_block(stdin, reader, "b3", &class_id, "weekday", "08:00", "10:00", "hebrew");
    add_block(stdin, reader, "b4", &class_id, "weekday", "10:00", "10:15", "break");
    add_block(stdin, reader, "b5", &class_id, "weekday", "10:15", "12:15", "english");
    // Friday: short Hebrew-only day.
    add_block(stdin, reader, "b6", &class_id, "friday", "08:00", "11:00", "hebrew");

    // Baseline class: one five-hour weekday block.
    add_block(
        stdin,
        reader,
        "b7",
        &baseline_class_id,
        "weekday",
        "08:00",
        "13:00",
        "hebrew",
    );

    (class_id, baseline_class_id)
}

#[test]
fn day_totals_bucket_by_subject() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _workspace = select_workspace(&mut stdin, &mut reader, "lehavdil-daytotals");
    let (class_id, _) = seed_schedule(&mut stdin, &mut reader);

    let weekday = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.dayTotals",
        json!({ "classId": class_id, "dayType": "weekday" }),
    );
    assert_eq!(num_field(&weekday, "/totals/hebrew"), 2.0);
    assert_eq!(num_field(&weekday, "/totals/english"), 2.0);
    assert_eq!(num_field(&weekday, "/totals/break"), 0.25);
    assert_eq!(num_field(&weekday, "/totals/other"), 0.0);
    assert_eq!(num_field(&weekday, "/totals/total"), 4.25);

    // The bus leg counts toward the day total but no subject bucket.
    let sunday = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "schedule.dayTotals",
        json!({ "classId": class_id, "dayType": "sunday" }),
    );
    assert_eq!(num_field(&sunday, "/totals/hebrew"), 4.0);
    assert_eq!(num_field(&sunday, "/totals/total"), 4.5);

    let code = request_err(
        &mut stdin,
        &mut reader,
        "3",
        "schedule.dayTotals",
        json!({ "classId": "missing", "dayType": "sunday" }),
    );
    assert_eq!(code, "not_found");
}

#[test]
fn weekly_totals_weight_the_weekday_by_four() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _workspace = select_workspace(&mut stdin, &mut reader, "lehavdil-weekly");
    let (class_id, _) = seed_schedule(&mut stdin, &mut reader);

    let weekly = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.weeklyTotals",
        json!({ "classId": class_id }),
    );
    // 4.5 sunday + 4.25 x 4 weekdays + 3 friday
    assert_eq!(num_field(&weekly, "/totals/total"), 24.5);
    assert_eq!(num_field(&weekly, "/totals/hebrew"), 15.0);
    assert_eq!(num_field(&weekly, "/totals/english"), 8.0);
    assert_eq!(num_field(&weekly, "/totals/break"), 1.0);
    assert_eq!(num_field(&weekly, "/totals/breakdown/weekday/total"), 4.25);
    assert_eq!(num_field(&weekly, "/totals/breakdown/friday/hebrew"), 3.0);
    assert_eq!(str_field(&weekly, "/totalShort"), "24h 30m");
    assert_eq!(str_field(&weekly, "/totalLong"), "24.50 hours");
}

#[test]
fn baseline_comparison_matches_grade_level() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _workspace = select_workspace(&mut stdin, &mut reader, "lehavdil-baseline");
    let (class_id, baseline_class_id) = seed_schedule(&mut stdin, &mut reader);

    let cmp = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "schedule.compareBaseline",
        json!({ "classId": class_id }),
    );
    assert_eq!(str_field(&cmp, "/baselineClass/id"), baseline_class_id);
    assert_eq!(num_field(&cmp, "/baselineWeekly/total"), 20.0);
    assert_eq!(num_field(&cmp, "/comparison/totalDiff"), 4.5);
    assert_eq!(num_field(&cmp, "/comparison/percentDiff"), 22.5);
    assert_eq!(num_field(&cmp, "/comparison/hebrewDiff"), -5.0);
    assert_eq!(num_field(&cmp, "/comparison/englishDiff"), 8.0);

    // Comparing the baseline class with itself is a flat line.
    let self_cmp = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "schedule.compareBaseline",
        json!({ "classId": baseline_class_id }),
    );
    assert_eq!(num_field(&self_cmp, "/comparison/totalDiff"), 0.0);
    assert_eq!(num_field(&self_cmp, "/comparison/percentDiff"), 0.0);
}

#[test]
fn baseline_comparison_requires_a_flagged_school() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _workspace = select_workspace(&mut stdin, &mut reader, "lehavdil-nobaseline");

    let city = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "cities.create",
        json!({ "nameEn": "Montreal", "country": "Canada" }),
    );
    let city_id = str_field(&city, "/city/id");
    let community = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "communities.create",
        json!({ "cityId": city_id, "nameEn": "Belz" }),
    );
    let community_id = str_field(&community, "/community/id");
    let school = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "schools.create",
        json!({ "communityId": community_id, "schoolType": "boys", "nameEn": "Boys" }),
    );
    let school_id = str_field(&school, "/school/id");
    let class = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "classes.create",
        json!({ "schoolId": school_id, "name": "כיתה א", "gradeLevel": 1 }),
    );
    let class_id = str_field(&class, "/class/id");

    let code = request_err(
        &mut stdin,
        &mut reader,
        "5",
        "schedule.compareBaseline",
        json!({ "classId": class_id }),
    );
    assert_eq!(code, "not_found");
}

#[test]
fn validate_block_is_the_strict_gate() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let cases = [
        ("08:00", "09:30", "hebrew", true),
        ("10:00", "10:15", "break", true),
        ("23:30", "00:15", "hebrew", false), // no wraparound here
        ("09:00", "09:00", "english", false),
        ("07:30", "08:00", "bus-start", false), // operational tags excluded
        ("08:00", "09:00", "recess", false),
    ];
    for (i, (start, end, subject, expected)) in cases.iter().enumerate() {
        let res = request_ok(
            &mut stdin,
            &mut reader,
            &format!("v{}", i),
            "schedule.validateBlock",
            json!({ "startTime": start, "endTime": end, "subjectType": subject }),
        );
        assert_eq!(
            res.get("valid").and_then(|v| v.as_bool()),
            Some(*expected),
            "{} {}-{}",
            subject,
            start,
            end
        );
    }
}
