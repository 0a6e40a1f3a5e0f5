//! Collection wrapper types for displaying groups of domain objects.
//!
//! Newtype wrappers give collections a Display implementation with
//! consistent empty-collection handling.

use std::{fmt, ops::Index};

use crate::models::{PlanSummary, Stage, StageTemplate, StatusLogEntry, Task};

macro_rules! collection_accessors {
    ($wrapper:ident, $item:ty) => {
        impl $wrapper {
            /// Check if the collection is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Get the number of items in the collection.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// Get a reference to the item at the given index.
            pub fn get(&self, index: usize) -> Option<&$item> {
                self.0.get(index)
            }

            /// Get an iterator over the items.
            pub fn iter(&self) -> std::slice::Iter<'_, $item> {
                self.0.iter()
            }
        }

        impl Index<usize> for $wrapper {
            type Output = $item;

            fn index(&self, index: usize) -> &Self::Output {
                &self.0[index]
            }
        }

        impl IntoIterator for $wrapper {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<Self::Item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $wrapper {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

/// Newtype wrapper for displaying collections of plan summaries.
pub struct PlanSummaries(pub Vec<PlanSummary>);

collection_accessors!(PlanSummaries, PlanSummary);

impl fmt::Display for PlanSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No plans found.")
        } else {
            for plan in &self.0 {
                write!(f, "{}", plan)?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying a plan's stage queue in order.
pub struct Stages(pub Vec<Stage>);

collection_accessors!(Stages, Stage);

impl fmt::Display for Stages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No stages in this plan.")
        } else {
            for stage in &self.0 {
                write!(f, "{}", stage)?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying a stage's tasks.
pub struct Tasks(pub Vec<Task>);

collection_accessors!(Tasks, Task);

impl fmt::Display for Tasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No tasks in this stage.")
        } else {
            for task in &self.0 {
                write!(f, "{}", task)?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying collections of templates.
pub struct Templates(pub Vec<StageTemplate>);

collection_accessors!(Templates, StageTemplate);

impl fmt::Display for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No templates found.")
        } else {
            for template in &self.0 {
                let marker = if template.active { "" } else { " (inactive)" };
                writeln!(f, "- {} (ID: {}){marker}", template.name, template.id)?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying a subject's status history.
pub struct History(pub Vec<StatusLogEntry>);

collection_accessors!(History, StatusLogEntry);

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No status history.")
        } else {
            for entry in &self.0 {
                write!(f, "{}", entry)?;
            }
            Ok(())
        }
    }
}
