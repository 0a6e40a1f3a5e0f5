use shopfloor_core::{
    CompletionPolicy, Database, EngineError, PlanFilter, PlanStatus, Priority, Subject,
    TransitionKind, WorkStatus,
};
use tempfile::NamedTempFile;

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

/// Creates a template with the given step names and returns its ID.
fn create_template_with_steps(db: &mut Database, name: &str, steps: &[&str]) -> u64 {
    let template = db
        .create_template(name, None)
        .expect("Failed to create template");
    for step in steps {
        db.add_template_step(template.id, step, None, None, None, None, false)
            .expect("Failed to add template step");
    }
    template.id
}

/// Creates a plan from the template and returns (plan_id, stage_ids in
/// queue order).
fn create_plan(db: &mut Database, template_id: u64, title: &str) -> (u64, Vec<u64>) {
    let plan = db
        .create_plan_from_template(template_id, title, None, Priority::Normal, None, None)
        .expect("Failed to create plan");
    let stages = db.get_stages(plan.id).expect("Failed to get stages");
    (plan.id, stages.iter().map(|s| s.id).collect())
}

fn queue_positions(db: &Database, plan_id: u64) -> Vec<(u64, u32)> {
    db.get_stages(plan_id)
        .expect("Failed to get stages")
        .iter()
        .map(|s| (s.id, s.order_in_queue))
        .collect()
}

/// Asserts the queue is a dense 1..N permutation.
fn assert_dense_queue(db: &Database, plan_id: u64) {
    let stages = db.get_stages(plan_id).expect("Failed to get stages");
    let mut positions: Vec<u32> = stages.iter().map(|s| s.order_in_queue).collect();
    positions.sort_unstable();
    let expected: Vec<u32> = (1..=stages.len() as u32).collect();
    assert_eq!(positions, expected, "queue positions must be dense 1..N");
}

#[test]
fn test_database_initialization() {
    let (_temp_file, _db) = create_test_db();

    assert!(_temp_file.path().exists());
}

#[test]
fn test_template_steps_are_numbered_contiguously() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-3step", &["Cut", "Glue", "Pack"]);

    let template = db
        .get_template(template_id)
        .expect("Failed to get template")
        .expect("Template should exist");

    assert_eq!(template.steps.len(), 3);
    let numbers: Vec<u32> = template.steps.iter().map(|s| s.step_no).collect();
    assert_eq!(numbers, [1, 2, 3]);
    assert_eq!(template.steps[0].name, "Cut");
}

#[test]
fn test_plan_materialization_copies_step_order() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-3step", &["Cut", "Glue", "Pack"]);
    let (plan_id, _) = create_plan(&mut db, template_id, "Box run");

    let stages = db.get_stages(plan_id).expect("Failed to get stages");
    assert_eq!(stages.len(), 3);
    for (i, stage) in stages.iter().enumerate() {
        assert_eq!(stage.order_in_queue, i as u32 + 1);
        assert_eq!(stage.step_no, i as u32 + 1);
        assert_eq!(stage.status, WorkStatus::Waiting);
        assert!(stage.template_step_id.is_some());
    }
    assert_dense_queue(&db, plan_id);
}

#[test]
fn test_zero_step_template_yields_empty_plan() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Empty", &[]);
    let (plan_id, stage_ids) = create_plan(&mut db, template_id, "Empty plan");

    assert!(stage_ids.is_empty());
    assert!(db
        .get_plan(plan_id)
        .expect("Failed to get plan")
        .expect("Plan should exist")
        .stages
        .is_empty());
}

#[test]
fn test_move_stage_back_shifts_displaced_range() {
    let (_temp_file, mut db) = create_test_db();
    let template_id =
        create_template_with_steps(&mut db, "Wide", &["A", "B", "C", "D", "E"]);
    let (plan_id, stage_ids) = create_plan(&mut db, template_id, "Move test");

    // Move the stage at position 4 to position 2; 2 and 3 shift down
    db.move_stage(stage_ids[3], 2).expect("Failed to move stage");

    let stages = db.get_stages(plan_id).expect("Failed to get stages");
    let names: Vec<&str> = stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["A", "D", "B", "C", "E"]);
    assert_dense_queue(&db, plan_id);
}

#[test]
fn test_move_stage_forward_shifts_displaced_range() {
    let (_temp_file, mut db) = create_test_db();
    let template_id =
        create_template_with_steps(&mut db, "Wide", &["A", "B", "C", "D", "E"]);
    let (plan_id, stage_ids) = create_plan(&mut db, template_id, "Move test");

    db.move_stage(stage_ids[1], 4).expect("Failed to move stage");

    let stages = db.get_stages(plan_id).expect("Failed to get stages");
    let names: Vec<&str> = stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["A", "C", "D", "B", "E"]);
    assert_dense_queue(&db, plan_id);
}

#[test]
fn test_move_stage_to_current_position_is_noop() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-3step", &["Cut", "Glue", "Pack"]);
    let (plan_id, stage_ids) = create_plan(&mut db, template_id, "Noop test");

    let before = queue_positions(&db, plan_id);
    let stage_before = db
        .get_stage(stage_ids[1])
        .expect("Failed to get stage")
        .expect("Stage should exist");

    db.move_stage(stage_ids[1], 2).expect("Failed to move stage");

    assert_eq!(queue_positions(&db, plan_id), before);

    // A no-op move writes nothing: no timestamp bump, no audit rows
    let stage_after = db
        .get_stage(stage_ids[1])
        .expect("Failed to get stage")
        .expect("Stage should exist");
    assert_eq!(stage_after.updated_at, stage_before.updated_at);
    assert!(db
        .get_history(Subject::Stage, stage_ids[1])
        .expect("Failed to get history")
        .is_empty());
}

#[test]
fn test_move_stage_clamps_to_last_position() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-3step", &["Cut", "Glue", "Pack"]);
    let (plan_id, stage_ids) = create_plan(&mut db, template_id, "Clamp test");

    db.move_stage(stage_ids[0], 42).expect("Failed to move stage");

    let stages = db.get_stages(plan_id).expect("Failed to get stages");
    let names: Vec<&str> = stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Glue", "Pack", "Cut"]);
    assert_dense_queue(&db, plan_id);
}

#[test]
fn test_move_stage_rejects_position_zero() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-3step", &["Cut", "Glue", "Pack"]);
    let (_plan_id, stage_ids) = create_plan(&mut db, template_id, "Zero test");

    let result = db.move_stage(stage_ids[0], 0);
    assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
}

#[test]
fn test_move_unknown_stage() {
    let (_temp_file, mut db) = create_test_db();

    let result = db.move_stage(999, 1);
    assert!(matches!(
        result,
        Err(EngineError::StageNotFound { id: 999 })
    ));
}

#[test]
fn test_queue_stays_dense_across_move_sequence() {
    let (_temp_file, mut db) = create_test_db();
    let template_id =
        create_template_with_steps(&mut db, "Wide", &["A", "B", "C", "D", "E"]);
    let (plan_id, stage_ids) = create_plan(&mut db, template_id, "Sequence test");

    for (stage, target) in [(4, 1), (0, 5), (2, 2), (1, 3)] {
        db.move_stage(stage_ids[stage], target)
            .expect("Failed to move stage");
        assert_dense_queue(&db, plan_id);
    }
}

#[test]
fn test_transition_writes_exactly_one_log_row() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-1step", &["Cut"]);
    let (_plan_id, stage_ids) = create_plan(&mut db, template_id, "Audit test");
    let stage_id = stage_ids[0];

    db.apply_transition(
        Subject::Stage,
        stage_id,
        TransitionKind::Start,
        "operator-1",
        None,
        CompletionPolicy::Unchecked,
    )
    .expect("Failed to start stage");

    let history = db
        .get_history(Subject::Stage, stage_id)
        .expect("Failed to get history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].before_status, WorkStatus::Waiting);
    assert_eq!(history[0].after_status, WorkStatus::InProgress);
    assert_eq!(history[0].actor, "operator-1");
}

#[test]
fn test_rejected_transition_writes_no_log_row() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-1step", &["Cut"]);
    let (_plan_id, stage_ids) = create_plan(&mut db, template_id, "Audit test");
    let stage_id = stage_ids[0];

    let result = db.apply_transition(
        Subject::Stage,
        stage_id,
        TransitionKind::Pause,
        "operator-1",
        None,
        CompletionPolicy::Unchecked,
    );
    assert!(matches!(result, Err(EngineError::InvalidTransition { .. })));

    let history = db
        .get_history(Subject::Stage, stage_id)
        .expect("Failed to get history");
    assert!(history.is_empty());
}

#[test]
fn test_history_replay_matches_current_status() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-1step", &["Cut"]);
    let (_plan_id, stage_ids) = create_plan(&mut db, template_id, "Replay test");
    let stage_id = stage_ids[0];

    for kind in [
        TransitionKind::Start,
        TransitionKind::Pause,
        TransitionKind::Start,
        TransitionKind::FlagProblem,
        TransitionKind::Cancel,
    ] {
        db.apply_transition(
            Subject::Stage,
            stage_id,
            kind,
            "operator-1",
            None,
            CompletionPolicy::Unchecked,
        )
        .expect("Transition should be allowed");
    }

    let history = db
        .get_history(Subject::Stage, stage_id)
        .expect("Failed to get history");
    assert_eq!(history.len(), 5);

    // Entries chain: each before equals the previous after
    for pair in history.windows(2) {
        assert_eq!(pair[0].after_status, pair[1].before_status);
    }

    let stage = db
        .get_stage(stage_id)
        .expect("Failed to get stage")
        .expect("Stage should exist");
    assert_eq!(
        stage.status,
        history.last().expect("history not empty").after_status
    );
}

#[test]
fn test_problem_stage_cannot_be_started() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-1step", &["Cut"]);
    let (_plan_id, stage_ids) = create_plan(&mut db, template_id, "Problem test");
    let stage_id = stage_ids[0];

    db.apply_transition(
        Subject::Stage,
        stage_id,
        TransitionKind::FlagProblem,
        "operator-1",
        None,
        CompletionPolicy::Unchecked,
    )
    .expect("Failed to flag problem");

    let result = db.apply_transition(
        Subject::Stage,
        stage_id,
        TransitionKind::Start,
        "operator-1",
        None,
        CompletionPolicy::Unchecked,
    );
    assert!(matches!(result, Err(EngineError::InvalidTransition { .. })));

    let stage = db
        .get_stage(stage_id)
        .expect("Failed to get stage")
        .expect("Stage should exist");
    assert_eq!(stage.status, WorkStatus::Problem);
}

#[test]
fn test_note_recorded_on_problem() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-1step", &["Cut"]);
    let (_plan_id, stage_ids) = create_plan(&mut db, template_id, "Note test");
    let stage_id = stage_ids[0];

    db.apply_transition(
        Subject::Stage,
        stage_id,
        TransitionKind::FlagProblem,
        "operator-1",
        Some("blade jammed"),
        CompletionPolicy::Unchecked,
    )
    .expect("Failed to flag problem");

    let history = db
        .get_history(Subject::Stage, stage_id)
        .expect("Failed to get history");
    assert_eq!(history[0].note, Some("blade jammed".to_string()));
    assert_eq!(history[0].after_status, WorkStatus::Problem);
}

#[test]
fn test_task_lifecycle_and_log_are_separate_from_stage() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-1step", &["Cut"]);
    let (_plan_id, stage_ids) = create_plan(&mut db, template_id, "Task test");
    let stage_id = stage_ids[0];

    let task = db
        .add_task(stage_id, "Cut sheets", None, Some(500.0), Some("sheets"), true)
        .expect("Failed to add task");
    assert_eq!(task.status, WorkStatus::Waiting);

    db.apply_transition(
        Subject::Task,
        task.id,
        TransitionKind::Start,
        "operator-2",
        None,
        CompletionPolicy::Unchecked,
    )
    .expect("Failed to start task");

    assert_eq!(
        db.get_history(Subject::Task, task.id)
            .expect("Failed to get task history")
            .len(),
        1
    );
    assert!(db
        .get_history(Subject::Stage, stage_id)
        .expect("Failed to get stage history")
        .is_empty());
}

#[test]
fn test_get_plan_nests_stage_tasks() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-2step", &["Cut", "Glue"]);
    let (plan_id, stage_ids) = create_plan(&mut db, template_id, "Nesting test");

    db.add_task(stage_ids[0], "Cut sheets", None, Some(500.0), Some("sheets"), true)
        .expect("Failed to add task");
    db.add_task(stage_ids[0], "Stack offcuts", None, None, None, false)
        .expect("Failed to add task");

    let plan = db
        .get_plan(plan_id)
        .expect("Failed to get plan")
        .expect("Plan should exist");
    assert_eq!(plan.stages.len(), 2);
    assert_eq!(plan.stages[0].tasks.len(), 2);
    assert_eq!(plan.stages[0].tasks[0].name, "Cut sheets");
    assert!(plan.stages[1].tasks.is_empty());

    let by_ref = db
        .create_plan_from_template(template_id, "Ref test", Some("ORD-7"), Priority::Normal, None, None)
        .expect("Failed to create plan");
    let ref_stages = db.get_stages(by_ref.id).expect("Failed to get stages");
    db.add_task(ref_stages[0].id, "Check blade", None, None, None, false)
        .expect("Failed to add task");
    let fetched = db
        .get_plan_by_order_ref("ORD-7")
        .expect("Failed to get plan")
        .expect("Plan should exist");
    assert_eq!(fetched.stages[0].tasks.len(), 1);
}

#[test]
fn test_add_task_to_unknown_stage() {
    let (_temp_file, mut db) = create_test_db();

    let result = db.add_task(999, "Orphan", None, None, None, false);
    assert!(matches!(
        result,
        Err(EngineError::StageNotFound { id: 999 })
    ));
}

#[test]
fn test_completion_policy_counts_only_required_open_tasks() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-1step", &["Cut"]);
    let (_plan_id, stage_ids) = create_plan(&mut db, template_id, "Policy test");
    let stage_id = stage_ids[0];

    // One optional open task, one required cancelled task
    db.add_task(stage_id, "Optional extra", None, None, None, false)
        .expect("Failed to add task");
    let required = db
        .add_task(stage_id, "Required check", None, None, None, true)
        .expect("Failed to add task");
    db.apply_transition(
        Subject::Task,
        required.id,
        TransitionKind::Cancel,
        "operator-1",
        None,
        CompletionPolicy::Unchecked,
    )
    .expect("Failed to cancel task");

    db.apply_transition(
        Subject::Stage,
        stage_id,
        TransitionKind::Start,
        "operator-1",
        None,
        CompletionPolicy::RequireTasks,
    )
    .expect("Failed to start stage");

    // Neither blocks: optional is ignored, required is cancelled
    db.apply_transition(
        Subject::Stage,
        stage_id,
        TransitionKind::Complete,
        "operator-1",
        None,
        CompletionPolicy::RequireTasks,
    )
    .expect("Stage should complete");
}

#[test]
fn test_completed_stage_has_duration() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-1step", &["Cut"]);
    let (_plan_id, stage_ids) = create_plan(&mut db, template_id, "Duration test");
    let stage_id = stage_ids[0];

    for kind in [TransitionKind::Start, TransitionKind::Complete] {
        db.apply_transition(
            Subject::Stage,
            stage_id,
            kind,
            "operator-1",
            None,
            CompletionPolicy::Unchecked,
        )
        .expect("Transition should be allowed");
    }

    let stage = db
        .get_stage(stage_id)
        .expect("Failed to get stage")
        .expect("Stage should exist");
    assert!(stage.started_at.is_some());
    assert!(stage.finished_at.is_some());
    let secs = stage.actual_duration_secs.expect("duration should be set");
    assert!(secs >= 0);
}

#[test]
fn test_delete_plan_cascades_to_stages_tasks_and_logs() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-1step", &["Cut"]);
    let (plan_id, stage_ids) = create_plan(&mut db, template_id, "Cascade test");
    let stage_id = stage_ids[0];

    let task = db
        .add_task(stage_id, "Cut sheets", None, None, None, false)
        .expect("Failed to add task");
    db.apply_transition(
        Subject::Stage,
        stage_id,
        TransitionKind::Start,
        "operator-1",
        None,
        CompletionPolicy::Unchecked,
    )
    .expect("Failed to start stage");

    db.delete_plan(plan_id).expect("Failed to delete plan");

    assert!(db.get_stage(stage_id).expect("query ok").is_none());
    assert!(db.get_task(task.id).expect("query ok").is_none());
    assert!(db
        .get_history(Subject::Stage, stage_id)
        .expect("query ok")
        .is_empty());
}

#[test]
fn test_delete_template_keeps_plan_but_clears_link() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-1step", &["Cut"]);
    let (plan_id, stage_ids) = create_plan(&mut db, template_id, "Unlink test");

    db.delete_template(template_id)
        .expect("Failed to delete template");

    let plan = db
        .get_plan(plan_id)
        .expect("Failed to get plan")
        .expect("Plan should survive template deletion");
    assert_eq!(plan.template_id, None);

    let stage = db
        .get_stage(stage_ids[0])
        .expect("Failed to get stage")
        .expect("Stage should survive template deletion");
    assert_eq!(stage.template_step_id, None);
}

#[test]
fn test_list_plans_filters_by_status_and_order_ref() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-1step", &["Cut"]);

    db.create_plan_from_template(template_id, "First run", Some("ORD-1"), Priority::Normal, None, None)
        .expect("Failed to create plan");
    db.create_plan_from_template(template_id, "Second run", Some("ORD-2"), Priority::Normal, None, None)
        .expect("Failed to create plan");

    let by_ref = db
        .list_plan_summaries(Some(&PlanFilter {
            order_ref: Some("ORD-2".to_string()),
            ..Default::default()
        }))
        .expect("Failed to list plans");
    assert_eq!(by_ref.len(), 1);
    assert_eq!(by_ref[0].title, "Second run");

    let active = db
        .list_plan_summaries(Some(&PlanFilter {
            status: Some(PlanStatus::Active),
            ..Default::default()
        }))
        .expect("Failed to list plans");
    assert_eq!(active.len(), 2);

    let done = db
        .list_plan_summaries(Some(&PlanFilter {
            status: Some(PlanStatus::Done),
            ..Default::default()
        }))
        .expect("Failed to list plans");
    assert!(done.is_empty());
}

#[test]
fn test_archive_unknown_plan() {
    let (_temp_file, mut db) = create_test_db();

    let result = db.archive_plan(999);
    assert!(matches!(result, Err(EngineError::PlanNotFound { .. })));
}

#[test]
fn test_stage_assignment_partial_update() {
    let (_temp_file, mut db) = create_test_db();
    let template_id = create_template_with_steps(&mut db, "Box-1step", &["Cut"]);
    let (_plan_id, stage_ids) = create_plan(&mut db, template_id, "Assign test");
    let stage_id = stage_ids[0];

    db.set_stage_assignment(
        stage_id,
        Some("cutter-1".to_string()),
        Some("cutter".to_string()),
        None,
    )
    .expect("Failed to assign");
    db.set_stage_assignment(stage_id, None, None, Some("ivanov".to_string()))
        .expect("Failed to assign");

    let stage = db
        .get_stage(stage_id)
        .expect("Failed to get stage")
        .expect("Stage should exist");
    assert_eq!(stage.workplace, Some("cutter-1".to_string()));
    assert_eq!(stage.required_position, Some("cutter".to_string()));
    assert_eq!(stage.assignee, Some("ivanov".to_string()));
}
