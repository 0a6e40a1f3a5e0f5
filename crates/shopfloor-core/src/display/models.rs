//! Display implementations for domain models.
//!
//! Markdown-formatted output for terminal display, kept separate from
//! the model definitions. Status icons come from the models themselves.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    Plan, PlanStatus, PlanSummary, Priority, Stage, StageTemplate, StatusLogEntry, Task,
    TemplateStep, WorkStatus,
};

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.title)?;
        writeln!(f)?;

        // Metadata section
        writeln!(f, "- Status: {}", self.status.as_str())?;
        writeln!(f, "- Priority: {}", self.priority.as_str())?;
        if let Some(order_ref) = &self.order_ref {
            writeln!(f, "- Order: {order_ref}")?;
        }
        if let Some(planned_start) = &self.planned_start {
            writeln!(f, "- Planned start: {}", LocalDateTime(planned_start))?;
        }
        if let Some(due_at) = &self.due_at {
            writeln!(f, "- Due: {}", LocalDateTime(due_at))?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(notes) = &self.notes {
            writeln!(f)?;
            writeln!(f, "{notes}")?;
        }

        if !self.stages.is_empty() {
            writeln!(f, "\n## Queue")?;
            writeln!(f)?;
            for stage in &self.stages {
                write!(f, "{}", stage)?;
            }
        } else {
            writeln!(f, "\nNo stages in this plan.")?;
        }

        Ok(())
    }
}

impl Stage {
    /// Format the stage using the compact queue-entry format, the same
    /// whether it is shown standalone or inside a plan.
    fn fmt_stage(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({})",
            self.order_in_queue,
            self.name,
            self.status.with_icon()
        )?;
        writeln!(f)?;

        writeln!(f, "- ID: {}", self.id)?;
        if let Some(workplace) = &self.workplace {
            writeln!(f, "- Workplace: {workplace}")?;
        }
        if let Some(position) = &self.required_position {
            writeln!(f, "- Position: {position}")?;
        }
        if let Some(assignee) = &self.assignee {
            writeln!(f, "- Assignee: {assignee}")?;
        }
        if let Some(started_at) = &self.started_at {
            writeln!(f, "- Started: {}", LocalDateTime(started_at))?;
        }
        if let Some(finished_at) = &self.finished_at {
            writeln!(f, "- Finished: {}", LocalDateTime(finished_at))?;
        }
        if let Some(secs) = self.actual_duration_secs {
            writeln!(f, "- Took: {}m {}s", secs / 60, secs % 60)?;
        }

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        if !self.tasks.is_empty() {
            writeln!(f)?;
            for task in &self.tasks {
                write!(f, "{}", task)?;
            }
        }

        writeln!(f)?;
        Ok(())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_stage(f)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- [{}] {}. {}", self.status.as_str(), self.id, self.name)?;
        if let Some(quantity) = self.quantity {
            write!(f, " ({quantity}")?;
            if let Some(unit) = &self.unit {
                write!(f, " {unit}")?;
            }
            write!(f, ")")?;
        }
        if self.required {
            write!(f, " [required]")?;
        }
        if let Some(assignee) = &self.assignee {
            write!(f, " ({assignee})")?;
        }
        writeln!(f)?;
        Ok(())
    }
}

impl fmt::Display for StageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.active { "" } else { " (inactive)" };
        writeln!(f, "# {}. {}{marker}", self.id, self.name)?;
        writeln!(f)?;

        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        if !self.steps.is_empty() {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            for step in &self.steps {
                write!(f, "{}", step)?;
            }
        } else {
            writeln!(f, "\nNo steps in this template.")?;
        }

        Ok(())
    }
}

impl fmt::Display for TemplateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.step_no, self.name)?;
        if let Some(minutes) = self.expected_duration_minutes {
            write!(f, " (~{minutes}m)")?;
        }
        if let Some(workplace) = &self.default_workplace {
            write!(f, " @ {workplace}")?;
        }
        if let Some(position) = &self.required_position {
            write!(f, " [{position}]")?;
        }
        if self.required {
            write!(f, " [required]")?;
        }
        writeln!(f)?;
        Ok(())
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.total_stages > 0 {
            format!(" ({}/{})", self.completed_stages, self.total_stages)
        } else {
            String::new()
        };

        writeln!(f, "## {} (ID: {}){progress}", self.title, self.id)?;
        writeln!(f)?;

        if let Some(order_ref) = &self.order_ref {
            writeln!(f, "- **Order**: {order_ref}")?;
        }
        writeln!(f, "- **Priority**: {}", self.priority.as_str())?;
        writeln!(f, "- **Status**: {}", self.status.as_str())?;
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;

        Ok(())
    }
}

impl fmt::Display for StatusLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} → {} ({}) by {}",
            LocalDateTime(&self.logged_at),
            self.before_status.as_str(),
            self.after_status.as_str(),
            self.event.as_str(),
            self.actor
        )?;
        if let Some(note) = &self.note {
            write!(f, ": {note}")?;
        }
        writeln!(f)?;
        Ok(())
    }
}
