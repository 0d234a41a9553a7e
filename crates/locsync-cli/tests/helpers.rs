#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Lay out a project: languages, skip rules and a collector dump.
pub fn scaffold_project(root: &Path, languages: &[&str], rules: &str, collected: &str) {
    fs::create_dir_all(root.join("config")).expect("config dir");
    let langs = serde_json::to_string(languages).expect("languages json");
    fs::write(root.join("languages.json"), langs).expect("languages.json");
    fs::write(root.join("config/translation-skip.json"), rules).expect("skip rules");
    fs::write(root.join("collected.json"), collected).expect("collected.json");
}

pub fn read_catalog_lines(path: &Path) -> Vec<serde_json::Value> {
    fs::read_to_string(path)
        .expect("catalog readable")
        .lines()
        .map(|l| serde_json::from_str(l).expect("catalog line is JSON"))
        .collect()
}

/// Assert `haystack` contains `needle`, printing the start of the output otherwise.
pub fn assert_contains_with_context(haystack: &str, needle: &str, context_msg: &str) {
    if haystack.contains(needle) {
        return;
    }
    let head = haystack.lines().take(10).collect::<Vec<_>>().join("\n");
    panic!(
        "{}\n--- needle ---\n{}\n--- head(10) ---\n{}",
        context_msg, needle, head
    );
}

pub fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

pub fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("spawn git")
        .status;
    assert!(status.success(), "git {:?} failed", args);
}

pub fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "test"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}
