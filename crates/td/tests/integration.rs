//! End-to-end tests for the `td` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

fn td() -> Command {
    let mut cmd = Command::cargo_bin("td").unwrap();
    cmd.env_remove("TD_USER")
        .env_remove("TODOS_DIR")
        .env("NO_COLOR", "1");
    cmd
}

struct Project {
    _tmp: TempDir,
    dir: PathBuf,
}

impl Project {
    /// A `td` invocation bound to this project's `.todos` directory.
    fn td(&self) -> Command {
        let mut cmd = td();
        cmd.arg("--db").arg(&self.dir);
        cmd
    }

    /// Runs `args` as user 1 with `--json` and parses stdout.
    fn json(&self, args: &[&str]) -> Value {
        self.json_as(1, args)
    }

    fn json_as(&self, user: i64, args: &[&str]) -> Value {
        let output = self
            .td()
            .args(args)
            .args(["--json", "--user", &user.to_string()])
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "td {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    fn create(&self, args: &[&str]) -> i64 {
        let mut full = vec!["create"];
        full.extend_from_slice(args);
        self.json(&full)["id"].as_i64().unwrap()
    }

    fn ids(&self, args: &[&str]) -> Vec<i64> {
        self.json(args)
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["id"].as_i64().unwrap())
            .collect()
    }
}

fn init_project() -> Project {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join(".todos");
    td().arg("--db").arg(&dir).arg("init").assert().success();
    Project { _tmp: tmp, dir }
}

fn seed_issue(p: &Project, id: i64, iid: i64, title: &str) {
    p.td()
        .args(["issue", "add", "--id", &id.to_string(), "--iid", &iid.to_string()])
        .args(["-p", "1", "--path", "group/app", "--title", title])
        .assert()
        .success();
}

fn seed_label(p: &Project, title: &str, priority: Option<i32>) -> i64 {
    let mut args = vec!["label".to_string(), "add".into(), "-p".into(), "1".into()];
    args.extend(["--title".to_string(), title.to_string()]);
    if let Some(prio) = priority {
        args.extend(["--priority".to_string(), prio.to_string()]);
    }
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    p.json(&refs)["id"].as_i64().unwrap()
}

fn exists(dir: &Path, name: &str) -> bool {
    dir.join(name).exists()
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_layout() {
    let p = init_project();
    assert!(exists(&p.dir, "config.yaml"));
    assert!(exists(&p.dir, "todos.db"));
    assert!(exists(&p.dir, ".gitignore"));
    assert!(p.dir.join("repositories").is_dir());
}

#[test]
fn init_twice_needs_force() {
    let p = init_project();
    p.td()
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));

    p.create(&["-a", "assigned", "-p", "1", "--issue", "10"]);
    p.td().args(["init", "--force"]).assert().success();
    assert_eq!(p.ids(&["list"]), Vec::<i64>::new());
}

#[test]
fn discovers_todo_dir_from_cwd() {
    let tmp = TempDir::new().unwrap();
    td().current_dir(tmp.path()).arg("init").assert().success();
    assert!(tmp.path().join(".todos").join("todos.db").exists());

    let nested = tmp.path().join("src").join("deep");
    std::fs::create_dir_all(&nested).unwrap();
    td().current_dir(&nested)
        .args(["count", "--user", "1", "--state", "pending"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn commands_fail_without_init() {
    let tmp = TempDir::new().unwrap();
    td().arg("--db")
        .arg(tmp.path().join(".todos"))
        .args(["list", "--user", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("td init"));
}

// ---------------------------------------------------------------------------
// create / list
// ---------------------------------------------------------------------------

#[test]
fn create_requires_user() {
    let p = init_project();
    p.td()
        .args(["create", "-a", "assigned", "-p", "1", "--issue", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TD_USER"));

    p.td()
        .env("TD_USER", "1")
        .args(["create", "-a", "assigned", "-p", "1", "--issue", "10"])
        .assert()
        .success();
}

#[test]
fn create_rejects_incomplete_input() {
    let p = init_project();
    p.td()
        .args(["create", "--user", "1", "-a", "assigned", "-p", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("target type is required"));

    p.td()
        .args(["create", "--user", "1", "-a", "assigned", "--issue", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("project is required"));

    p.td()
        .args(["create", "--user", "1", "-a", "shouted", "-p", "1", "--issue", "10"])
        .assert()
        .failure();

    p.td()
        .args(["create", "--user", "1", "-a", "assigned", "-p", "1"])
        .args(["--target-type", "commit", "--target-id", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("commit id is required"));
}

#[test]
fn list_is_newest_first_and_scoped_to_user() {
    let p = init_project();
    let a = p.create(&["-a", "assigned", "-p", "1", "--issue", "10"]);
    let b = p.create(&["-a", "mentioned", "-p", "1", "--mr", "5"]);
    let c = p.create(&["-a", "marked", "-p", "2", "--issue", "11"]);
    p.json_as(2, &["create", "-a", "assigned", "-p", "1", "--issue", "10"]);

    assert_eq!(p.ids(&["list"]), vec![c, b, a]);
    assert_eq!(p.ids(&["list", "-p", "1"]), vec![b, a]);
    assert_eq!(p.ids(&["list", "-t", "mr"]), vec![b]);
    assert_eq!(p.ids(&["list", "-a", "marked"]), vec![c]);
    assert_eq!(p.ids(&["list", "-n", "1"]), vec![c]);
    assert_eq!(p.ids(&["list", "--state", "done"]), Vec::<i64>::new());
}

#[test]
fn priority_order_follows_labels() {
    let p = init_project();
    seed_issue(&p, 10, 1, "Login broken");
    seed_issue(&p, 11, 2, "Crash on save");
    p.td()
        .args(["mr", "add", "--id", "5", "--iid", "3", "-p", "1", "--title", "Refactor"])
        .assert()
        .success();

    let p2 = seed_label(&p, "bug", Some(2));
    let p1 = seed_label(&p, "critical", Some(1));
    let plain = seed_label(&p, "docs", None);
    for (label, flag, target) in [(p2, "--issue", "10"), (p1, "--issue", "11"), (plain, "--mr", "5")] {
        p.td()
            .args(["label", "apply", "--label", &label.to_string(), flag, target])
            .assert()
            .success();
    }

    let a = p.create(&["-a", "assigned", "-p", "1", "--issue", "10"]);
    let b = p.create(&["-a", "assigned", "-p", "1", "--issue", "11"]);
    let c = p.create(&["-a", "assigned", "-p", "1", "--mr", "5"]);

    assert_eq!(p.ids(&["list", "--sort", "priority"]), vec![b, a, c]);
    assert_eq!(p.ids(&["list", "--sort", "recency"]), vec![c, b, a]);

    // Raising the docs label above everything moves the merge request first.
    p.td()
        .args(["label", "priority", &plain.to_string(), "--priority", "0"])
        .assert()
        .success();
    assert_eq!(p.ids(&["list", "--sort", "priority"]), vec![c, b, a]);
}

#[test]
fn list_table_output() {
    let p = init_project();
    seed_issue(&p, 10, 4, "Login broken");
    p.create(&["-a", "build_failed", "-p", "1", "--issue", "10"]);

    p.td()
        .args(["list", "--user", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ID"))
        .stdout(predicate::str::contains("#4"))
        .stdout(predicate::str::contains("build_failed"))
        .stdout(predicate::str::contains("Login broken"));

    p.td()
        .args(["list", "--user", "1", "--state", "done"])
        .assert()
        .success()
        .stdout("No done todos.\n");
}

// ---------------------------------------------------------------------------
// done / done-all / count
// ---------------------------------------------------------------------------

#[test]
fn done_only_once() {
    let p = init_project();
    let id = p.create(&["-a", "assigned", "-p", "1", "--issue", "10"]);

    let done = p.json(&["done", &id.to_string()]);
    assert_eq!(done["state"], "done");

    p.td()
        .args(["done", &id.to_string(), "--user", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already done"));

    assert_eq!(p.ids(&["list", "--state", "done"]), vec![id]);
}

#[test]
fn done_on_missing_or_foreign_todo_fails() {
    let p = init_project();
    let id = p.create(&["-a", "assigned", "-p", "1", "--issue", "10"]);

    p.td()
        .args(["done", "999", "--user", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    p.td()
        .args(["done", &id.to_string(), "--user", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    let count = p.json(&["count", "--state", "pending"]);
    assert_eq!(count["count"], 1);
}

#[test]
fn done_all_and_count() {
    let p = init_project();
    let a = p.create(&["-a", "assigned", "-p", "1", "--issue", "10"]);
    let b = p.create(&["-a", "assigned", "-p", "1", "--issue", "11"]);
    let c = p.create(&["-a", "assigned", "-p", "1", "--issue", "12"]);

    let res = p.json(&["done-all", &a.to_string(), &b.to_string()]);
    assert_eq!(res["count"], 2);

    let counts = p.json(&["count"]);
    assert_eq!(counts["pending"], 1);
    assert_eq!(counts["done"], 2);

    let res = p.json(&["done-all"]);
    assert_eq!(res["done"], serde_json::json!([c]));

    p.td()
        .args(["count", "--user", "1", "--state", "done"])
        .assert()
        .success()
        .stdout("3\n");
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

#[test]
fn show_prefers_note_body() {
    let p = init_project();
    seed_issue(&p, 10, 4, "Login broken");
    p.td()
        .args(["note", "add", "--id", "77", "-p", "1", "--author", "3"])
        .args(["--body", "@alice can you look at this?"])
        .assert()
        .success();

    let with_note = p.create(&["-a", "mentioned", "-p", "1", "--issue", "10", "--note", "77"]);
    let without = p.create(&["-a", "assigned", "-p", "1", "--issue", "10"]);

    let view = p.json(&["show", &with_note.to_string()]);
    assert_eq!(view["body"], "@alice can you look at this?");
    assert_eq!(view["reference"], "#4");
    assert_eq!(view["action_name"], "mentioned");
    assert_eq!(view["note_id"], 77);

    let view = p.json(&["show", &without.to_string()]);
    assert_eq!(view["body"], "Login broken");
}

#[test]
fn show_lists_labels_most_urgent_first() {
    let p = init_project();
    seed_issue(&p, 10, 4, "Login broken");
    let low = seed_label(&p, "bug", Some(3));
    let high = seed_label(&p, "critical", Some(1));
    for label in [low, high] {
        p.td()
            .args(["label", "apply", "--label", &label.to_string(), "--issue", "10"])
            .assert()
            .success();
    }
    let id = p.create(&["-a", "assigned", "-p", "1", "--issue", "10"]);

    let view = p.json(&["show", &id.to_string()]);
    assert_eq!(view["labels"], serde_json::json!(["critical (P1)", "bug (P3)"]));

    p.td()
        .args(["show", &id.to_string(), "--user", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Todo"))
        .stdout(predicate::str::contains("Login broken"))
        .stdout(predicate::str::contains("critical (P1)"));
}

#[test]
fn commit_todo_without_repository_resolves_to_nothing() {
    let p = init_project();
    let id = p.create(&["-a", "build_failed", "-p", "1", "--commit", "deadbeefcafe"]);

    let view = p.json(&["show", &id.to_string()]);
    assert_eq!(view["target_type"], "Commit");
    assert_eq!(view["commit_id"], "deadbeefcafe");
    assert!(view.get("reference").is_none());
    assert!(view.get("body").is_none());
    assert!(view.get("target_id").is_none());
}

#[test]
fn deleted_target_shows_without_body() {
    let p = init_project();
    let id = p.create(&["-a", "assigned", "-p", "1", "--issue", "404"]);
    let view = p.json(&["show", &id.to_string()]);
    assert!(view.get("body").is_none());
    assert_eq!(view["target_id"], 404);
}
