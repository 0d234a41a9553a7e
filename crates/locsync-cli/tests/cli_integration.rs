mod helpers;

use assert_cmd::Command;
use helpers::{assert_contains_with_context, read_catalog_lines, scaffold_project};
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const NO_RULES: &str = r#"{ "rules": [] }"#;

const COLLECTED: &str = r#"[
  { "namespace": "UI", "key": "Confirm", "source": "确定" },
  { "namespace": "UI", "key": "Cancel", "source": "取消" },
  { "namespace": "", "key": "Title", "source": "标题" },
  { "namespace": "Debug", "key": "Marker", "source": "DEBUG_ONLY" }
]"#;

fn locsync(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("locsync").expect("binary built");
    cmd.arg("--root").arg(root).arg("--no-color");
    cmd.env("NO_ICONS", "1");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8_lossy(&out).into_owned()
}

#[test]
fn help_lists_commands() {
    let mut cmd = Command::cargo_bin("locsync").expect("binary built");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("pending"))
        .stdout(predicate::str::contains("diff"));
}

#[test]
fn sync_creates_catalogs_for_every_language() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    scaffold_project(root, &["vi", "en"], NO_RULES, COLLECTED);

    let out = stdout_of(locsync(root).arg("sync").arg(root.join("collected.json")));
    assert_contains_with_context(&out, "[vi] Catalog changes: added 4.", "first sync adds rows");
    assert_contains_with_context(&out, "[en] Catalog changes: added 4.", "every language synced");
    assert_contains_with_context(&out, "Pending translations: 4.", "all rows pending");

    let rows = read_catalog_lines(&root.join("translations/vi.ndjson"));
    assert_eq!(rows.len(), 4);
    // sorted by namespace, then key
    assert_eq!(rows[0]["namespace"], "");
    assert_eq!(rows[0]["key"], "Title");
    assert!(rows.iter().all(|r| r["translated"].is_null()));
    assert!(root.join("translations/en.ndjson").exists());
}

#[test]
fn second_sync_is_a_no_op() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    scaffold_project(root, &["vi"], NO_RULES, COLLECTED);
    let collected = root.join("collected.json");

    locsync(root).arg("sync").arg(&collected).assert().success();
    let before = fs::read_to_string(root.join("translations/vi.ndjson")).unwrap();

    let out = stdout_of(locsync(root).arg("sync").arg(&collected));
    assert_contains_with_context(&out, "[vi] Catalog is already in sync.", "unchanged input");
    assert_contains_with_context(&out, "Lines written this run: 0.", "nothing rewritten");
    let after = fs::read_to_string(root.join("translations/vi.ndjson")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn skip_rules_keep_entries_out_of_pending() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let rules = r#"{ "rules": [ { "namespace": "Debug" } ] }"#;
    scaffold_project(root, &["vi"], rules, COLLECTED);

    let out = stdout_of(locsync(root).arg("sync").arg(root.join("collected.json")));
    assert_contains_with_context(&out, "Total entries: 4. Pending translations: 3.", "skipped row not pending");

    locsync(root)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("total 4, translated 0, pending 3"));
}

#[test]
fn missing_skip_rules_file_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    scaffold_project(root, &["vi"], NO_RULES, COLLECTED);
    fs::remove_file(root.join("config/translation-skip.json")).unwrap();

    locsync(root)
        .arg("sync")
        .arg(root.join("collected.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("translation-skip.json"));
    assert!(!root.join("translations/vi.ndjson").exists());
}

#[test]
fn empty_collected_input_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    scaffold_project(root, &["vi"], NO_RULES, "[]");

    locsync(root)
        .arg("sync")
        .arg(root.join("collected.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no collected entries"));
}

#[test]
fn pending_export_then_apply_fills_catalog() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let collected = r#"[
      { "namespace": "UI", "key": "Ok", "source": "确定" },
      { "namespace": "Dialog", "key": "Ok", "source": "确定" },
      { "namespace": "UI", "key": "Cancel", "source": "取消" }
    ]"#;
    scaffold_project(root, &["vi"], NO_RULES, collected);
    locsync(root).arg("sync").arg(root.join("collected.json")).assert().success();

    let pending_path = root.join("pending.json");
    let out = stdout_of(locsync(root).arg("pending").arg("--out").arg(&pending_path));
    assert_contains_with_context(&out, "Wrote 2 pending groups (3 rows)", "grouped by source");

    let mut items: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&pending_path).unwrap()).unwrap();
    for item in &mut items {
        let answer = match item["source"].as_str().unwrap() {
            "确定" => "Đồng ý",
            _ => "",
        };
        item["translated"] = serde_json::Value::String(answer.to_string());
    }
    fs::write(&pending_path, serde_json::to_string_pretty(&items).unwrap()).unwrap();

    let out = stdout_of(locsync(root).arg("apply").arg(&pending_path));
    assert_contains_with_context(&out, "Applied 1 translations to 2 entries", "one group filled");
    assert_contains_with_context(&out, "[vi] Pending translations: 1.", "cancel still pending");

    let rows = read_catalog_lines(&root.join("translations/vi.ndjson"));
    let done: Vec<_> = rows.iter().filter(|r| r["translated"] == "Đồng ý").collect();
    assert_eq!(done.len(), 2);
    assert!(rows
        .iter()
        .any(|r| r["key"] == "Cancel" && r["translated"].is_null()));
}

#[test]
fn pending_preview_reports_nothing_when_done() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    scaffold_project(root, &["vi"], NO_RULES, "[]");
    fs::create_dir_all(root.join("translations")).unwrap();
    fs::write(
        root.join("translations/vi.ndjson"),
        "{\"namespace\":\"UI\",\"key\":\"Ok\",\"source\":\"确定\",\"translated\":\"Đồng ý\"}\n",
    )
    .unwrap();

    locsync(root)
        .arg("pending")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to translate."));
}

#[test]
fn reconcile_invalidates_tampered_import() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    scaffold_project(root, &["vi"], NO_RULES, "[]");
    fs::create_dir_all(root.join("translations")).unwrap();
    let catalog = root.join("translations/vi.ndjson");
    fs::write(
        &catalog,
        "{\"namespace\":\"UI\",\"key\":\"Title\",\"source\":\"新文本\",\"translated\":null,\"locresImport\":\"Văn bản cũ\",\"importedHash\":1}\n",
    )
    .unwrap();

    let out = stdout_of(locsync(root).arg("reconcile"));
    assert_contains_with_context(&out, "Invalidated 1 stale imported translations.", "hash mismatch");
    let rows = read_catalog_lines(&catalog);
    assert!(rows[0].get("locresImport").is_none());
    assert!(rows[0].get("importedHash").is_none());

    let out = stdout_of(locsync(root).arg("reconcile"));
    assert_contains_with_context(&out, "Imported translations are consistent.", "idempotent");
}

#[test]
fn import_adds_unknown_identities_and_skips_mismatches() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    scaffold_project(root, &["vi"], NO_RULES, COLLECTED);
    locsync(root).arg("sync").arg(root.join("collected.json")).assert().success();

    let records = root.join("records.ndjson");
    fs::write(
        &records,
        concat!(
            "{\"namespace\":\"UI\",\"key\":\"Confirm\",\"text\":\"Đồng ý\",\"sourceHash\":1}\n",
            "{\"namespace\":\"UI\",\"key\":\"Brand\",\"text\":\"Thương hiệu\",\"sourceHash\":42}\n",
        ),
    )
    .unwrap();

    let out = stdout_of(locsync(root).arg("import").arg(&records));
    assert_contains_with_context(&out, "Imported 2 records: updated 0, added 1, skipped 1.", "import summary");

    let rows = read_catalog_lines(&root.join("translations/vi.ndjson"));
    let brand = rows.iter().find(|r| r["key"] == "Brand").expect("brand row");
    assert!(brand["source"].is_null());
    assert_eq!(brand["locresImport"], "Thương hiệu");
    assert_eq!(brand["importedHash"], 42);

    locsync(root)
        .arg("status")
        .arg("--language")
        .arg("VI")
        .assert()
        .success()
        .stdout(predicate::str::contains("total 5, translated 0"));
}

#[test]
fn unknown_language_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    scaffold_project(root, &["vi"], NO_RULES, COLLECTED);

    locsync(root)
        .arg("pending")
        .arg("--language")
        .arg("fr")
        .assert()
        .failure();
}

#[test]
fn export_pack_writes_only_translated_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    scaffold_project(root, &["vi"], NO_RULES, "[]");
    fs::create_dir_all(root.join("translations")).unwrap();
    fs::write(
        root.join("translations/vi.ndjson"),
        concat!(
            "{\"namespace\":\"UI\",\"key\":\"Ok\",\"source\":\"确定\",\"translated\":\"Đồng ý\"}\n",
            "{\"namespace\":\"UI\",\"key\":\"Cancel\",\"source\":\"取消\",\"translated\":\"  \"}\n",
            "{\"namespace\":\"UI\",\"key\":\"Save\",\"source\":\"保存\",\"translated\":null}\n",
        ),
    )
    .unwrap();

    let out_path = root.join("pack.ndjson");
    let out = stdout_of(locsync(root).arg("export-pack").arg("--out").arg(&out_path));
    assert_contains_with_context(&out, "Exported 1 of 3 entries", "blank rows left out");

    let lines = read_catalog_lines(&out_path);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["key"], "Ok");
    assert_eq!(lines[0]["text"], "Đồng ý");
}

#[test]
fn schema_dumps_report_types() {
    let tmp = tempfile::tempdir().unwrap();
    let out_dir = tmp.path().join("schemas");

    let mut cmd = Command::cargo_bin("locsync").expect("binary built");
    cmd.arg("--root")
        .arg(tmp.path())
        .arg("schema")
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success();

    for name in [
        "catalog_entry.schema.json",
        "sync_summary.schema.json",
        "diff_report.schema.json",
        "pending_item.schema.json",
    ] {
        let raw = fs::read_to_string(out_dir.join(name)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(v.is_object(), "{name} is a JSON object");
    }
}

#[test]
fn diff_against_head_reports_changed_translation() {
    if !helpers::git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    scaffold_project(root, &["vi"], NO_RULES, "[]");
    fs::create_dir_all(root.join("translations")).unwrap();
    let catalog = root.join("translations/vi.ndjson");
    fs::write(
        &catalog,
        "{\"namespace\":\"UI\",\"key\":\"Greeting\",\"source\":\"你好\",\"translated\":\"Xin chào\"}\n",
    )
    .unwrap();

    helpers::init_repo(root);
    helpers::git(root, &["add", "translations/vi.ndjson"]);
    helpers::git(root, &["commit", "-q", "-m", "baseline"]);

    locsync(root)
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("No differences"));

    fs::write(
        &catalog,
        concat!(
            "{\"namespace\":\"UI\",\"key\":\"Greeting\",\"source\":\"你好\",\"translated\":\"Chào bạn\"}\n",
            "{\"namespace\":\"UI\",\"key\":\"Bye\",\"source\":\"再见\",\"translated\":null}\n",
        ),
    )
    .unwrap();

    let report = root.join("diff.json");
    let assert = locsync(root)
        .arg("diff")
        .arg("--ref")
        .arg("HEAD")
        .arg("--output")
        .arg(&report)
        .assert()
        .code(1);
    let out = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert_contains_with_context(&out, "added 1, removed 0, changed 1", "summary line");
    assert_contains_with_context(&out, r#"translated: "Xin chào" -> "Chào bạn""#, "field change");

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(doc["metadata"]["counts"]["changed"], 1);
    assert_eq!(doc["metadata"]["counts"]["added"], 1);
}
