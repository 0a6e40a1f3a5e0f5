//! Tests for the data models and the lifecycle table.

use std::str::FromStr;

use super::*;
use crate::models::transition::TransitionKind;

#[test]
fn test_work_status_string_round_trip() {
    let all = [
        WorkStatus::Waiting,
        WorkStatus::InProgress,
        WorkStatus::Paused,
        WorkStatus::Completed,
        WorkStatus::Problem,
        WorkStatus::Cancelled,
    ];

    for status in all {
        let parsed = WorkStatus::from_str(status.as_str()).expect("Failed to parse status");
        assert_eq!(parsed, status);
    }
}

#[test]
fn test_work_status_accepts_legacy_spelling() {
    assert_eq!(
        WorkStatus::from_str("inprogress").unwrap(),
        WorkStatus::InProgress
    );
    assert_eq!(
        WorkStatus::from_str("in_progress").unwrap(),
        WorkStatus::InProgress
    );
    assert!(WorkStatus::from_str("unknown").is_err());
}

#[test]
fn test_work_status_icons() {
    assert_eq!(WorkStatus::Waiting.with_icon(), "○ Waiting");
    assert_eq!(WorkStatus::InProgress.with_icon(), "➤ In Progress");
    assert_eq!(WorkStatus::Paused.with_icon(), "⏸ Paused");
    assert_eq!(WorkStatus::Completed.with_icon(), "✓ Completed");
    assert_eq!(WorkStatus::Problem.with_icon(), "⚠ Problem");
    assert_eq!(WorkStatus::Cancelled.with_icon(), "✗ Cancelled");
}

#[test]
fn test_terminal_statuses() {
    assert!(WorkStatus::Completed.is_terminal());
    assert!(WorkStatus::Cancelled.is_terminal());
    assert!(!WorkStatus::Waiting.is_terminal());
    assert!(!WorkStatus::InProgress.is_terminal());
    assert!(!WorkStatus::Paused.is_terminal());
    assert!(!WorkStatus::Problem.is_terminal());
}

#[test]
fn test_plan_status_round_trip() {
    for status in [
        PlanStatus::Draft,
        PlanStatus::Active,
        PlanStatus::Done,
        PlanStatus::Cancelled,
    ] {
        assert_eq!(PlanStatus::from_str(status.as_str()).unwrap(), status);
    }
}

#[test]
fn test_priority_ordering() {
    assert!(Priority::Low < Priority::Normal);
    assert!(Priority::Normal < Priority::High);
    assert!(Priority::High < Priority::Urgent);
    assert_eq!(Priority::default(), Priority::Normal);
}

/// The full (status, operation) table. Every pair is either allowed
/// with a defined target, or rejected; there is no third outcome.
#[test]
fn test_lifecycle_table_is_total() {
    let statuses = [
        WorkStatus::Waiting,
        WorkStatus::InProgress,
        WorkStatus::Paused,
        WorkStatus::Completed,
        WorkStatus::Problem,
        WorkStatus::Cancelled,
    ];

    for from in statuses {
        for kind in TransitionKind::ALL {
            let allowed = kind.allowed_from(from);
            let expected = match (kind, from) {
                (TransitionKind::Start, WorkStatus::Waiting | WorkStatus::Paused) => true,
                (TransitionKind::Start, _) => false,
                (TransitionKind::Pause, WorkStatus::InProgress) => true,
                (TransitionKind::Pause, _) => false,
                (TransitionKind::Complete, WorkStatus::InProgress | WorkStatus::Paused) => true,
                (TransitionKind::Complete, _) => false,
                (TransitionKind::FlagProblem | TransitionKind::Cancel, s) => !s.is_terminal(),
            };
            assert_eq!(
                allowed, expected,
                "{kind:?} from {from:?} should be allowed={expected}"
            );

            if allowed {
                // Targets never land back in waiting
                assert_ne!(kind.target(), WorkStatus::Waiting);
            }
        }
    }
}

#[test]
fn test_terminal_states_admit_nothing() {
    for from in [WorkStatus::Completed, WorkStatus::Cancelled] {
        for kind in TransitionKind::ALL {
            assert!(
                !kind.allowed_from(from),
                "{kind:?} must be rejected from terminal {from:?}"
            );
        }
    }
}

#[test]
fn test_resume_is_logged_distinctly_from_start() {
    assert_eq!(
        TransitionKind::Start.event(WorkStatus::Waiting),
        LogEvent::Started
    );
    assert_eq!(
        TransitionKind::Start.event(WorkStatus::Paused),
        LogEvent::Resumed
    );
}

#[test]
fn test_log_event_round_trip() {
    for event in [
        LogEvent::Started,
        LogEvent::Resumed,
        LogEvent::Paused,
        LogEvent::Completed,
        LogEvent::Problem,
        LogEvent::Cancelled,
    ] {
        assert_eq!(LogEvent::from_str(event.as_str()).unwrap(), event);
    }
}

#[test]
fn test_problem_status_admits_only_reflag_and_cancel() {
    // A problem stage cannot be started, paused or completed; it can
    // only be re-flagged or cancelled.
    assert!(!TransitionKind::Start.allowed_from(WorkStatus::Problem));
    assert!(!TransitionKind::Pause.allowed_from(WorkStatus::Problem));
    assert!(!TransitionKind::Complete.allowed_from(WorkStatus::Problem));
    assert!(TransitionKind::FlagProblem.allowed_from(WorkStatus::Problem));
    assert!(TransitionKind::Cancel.allowed_from(WorkStatus::Problem));
}
