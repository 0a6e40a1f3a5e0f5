use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

fn sf_cmd() -> Command {
    Command::cargo_bin("sf").expect("Failed to find sf binary")
}

/// Creates a template with one step and returns nothing; template gets ID 1
/// in a fresh database.
fn seed_template(db_arg: &str) {
    sf_cmd()
        .args([
            "--database-file",
            db_arg,
            "template",
            "create",
            "Box-3step",
        ])
        .assert()
        .success();
    for step in ["Cutting", "Gluing", "Packing"] {
        sf_cmd()
            .args([
                "--database-file",
                db_arg,
                "template",
                "add-step",
                "1",
                step,
            ])
            .assert()
            .success();
    }
}

#[test]
fn test_cli_create_template() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    sf_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "template",
            "create",
            "Box-3step",
            "--description",
            "Standard box production",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Box-3step"))
        .stdout(predicate::str::contains("Standard box production"));
}

#[test]
fn test_cli_template_show_lists_steps_in_order() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    seed_template(db_arg);

    sf_cmd()
        .args(["--database-file", db_arg, "template", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Cutting"))
        .stdout(predicate::str::contains("2. Gluing"))
        .stdout(predicate::str::contains("3. Packing"));
}

#[test]
fn test_cli_list_empty_plans() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    sf_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "plan",
            "list",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plans found."));
}

#[test]
fn test_cli_create_plan_from_template() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    seed_template(db_arg);

    sf_cmd()
        .args([
            "--database-file",
            db_arg,
            "plan",
            "create",
            "1",
            "Box run, 500 pcs",
            "--order-ref",
            "ORD-42",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Box run, 500 pcs"))
        .stdout(predicate::str::contains("ORD-42"))
        .stdout(predicate::str::contains("Cutting"))
        .stdout(predicate::str::contains("○ Waiting"));
}

#[test]
fn test_cli_create_plan_unknown_template_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    sf_cmd()
        .args([
            "--database-file",
            db_path.to_str().unwrap(),
            "plan",
            "create",
            "99",
            "Doomed",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("99"));
}

#[test]
fn test_cli_stage_lifecycle_and_history() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    seed_template(db_arg);

    sf_cmd()
        .args(["--database-file", db_arg, "plan", "create", "1", "Run"])
        .assert()
        .success();

    // Stage 1 is Cutting at queue position 1
    sf_cmd()
        .args([
            "--database-file",
            db_arg,
            "--actor",
            "operator-1",
            "stage",
            "start",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("➤ In Progress"));

    sf_cmd()
        .args(["--database-file", db_arg, "stage", "complete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Completed"));

    sf_cmd()
        .args(["--database-file", db_arg, "stage", "history", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("started"))
        .stdout(predicate::str::contains("operator-1"))
        .stdout(predicate::str::contains("completed"));
}

#[test]
fn test_cli_invalid_transition_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    seed_template(db_arg);

    sf_cmd()
        .args(["--database-file", db_arg, "plan", "create", "1", "Run"])
        .assert()
        .success();

    // Pausing a waiting stage is not a legal transition
    sf_cmd()
        .args(["--database-file", db_arg, "stage", "pause", "1"])
        .assert()
        .failure();
}

#[test]
fn test_cli_move_stage_prints_new_queue() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    seed_template(db_arg);

    sf_cmd()
        .args(["--database-file", db_arg, "plan", "create", "1", "Run"])
        .assert()
        .success();

    // Move Packing (stage 3) to the front
    sf_cmd()
        .args(["--database-file", db_arg, "stage", "move", "3", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("### 1. Packing"))
        .stdout(predicate::str::contains("### 2. Cutting"))
        .stdout(predicate::str::contains("### 3. Gluing"));
}

#[test]
fn test_cli_plan_delete_requires_confirm() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    seed_template(db_arg);

    sf_cmd()
        .args(["--database-file", db_arg, "plan", "create", "1", "Run"])
        .assert()
        .success();

    sf_cmd()
        .args(["--database-file", db_arg, "plan", "delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--confirm"));

    sf_cmd()
        .args([
            "--database-file",
            db_arg,
            "plan",
            "delete",
            "1",
            "--confirm",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted plan 1"));
}

#[test]
fn test_cli_task_add_and_list() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    seed_template(db_arg);

    sf_cmd()
        .args(["--database-file", db_arg, "plan", "create", "1", "Run"])
        .assert()
        .success();

    sf_cmd()
        .args([
            "--database-file",
            db_arg,
            "task",
            "add",
            "1",
            "Cut sheets",
            "--quantity",
            "500",
            "--unit",
            "sheets",
            "--required",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cut sheets"));

    sf_cmd()
        .args(["--database-file", db_arg, "task", "list", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cut sheets"))
        .stdout(predicate::str::contains("[required]"));
}

#[test]
fn test_cli_plan_list_filters_by_order_ref() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    seed_template(db_arg);

    for (title, order_ref) in [("First run", "ORD-1"), ("Second run", "ORD-2")] {
        sf_cmd()
            .args([
                "--database-file",
                db_arg,
                "plan",
                "create",
                "1",
                title,
                "--order-ref",
                order_ref,
            ])
            .assert()
            .success();
    }

    sf_cmd()
        .args([
            "--database-file",
            db_arg,
            "plan",
            "list",
            "--order-ref",
            "ORD-2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Second run"))
        .stdout(predicate::str::contains("First run").not());

    sf_cmd()
        .args(["--database-file", db_arg, "plan", "list", "--status", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plans found."));
}

#[test]
fn test_cli_template_list_aliases() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();
    seed_template(db_arg);

    sf_cmd()
        .args(["--database-file", db_arg, "tpl", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Box-3step"));
}
