use crate::error::GridError;
use crate::serialization::Data;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle of a scheduled task as far as addressing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Scheduled,
    Cancelled,
}

/// What the store keeps for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Serialized task body; run by whoever executes the schedule.
    pub definition: Data,
    pub initial_delay_ms: u64,
    pub created_at: u64,
    pub state: TaskState,
}

/// Tasks of one scheduler held by one partition or one member.
#[derive(Debug)]
pub struct ScheduledTaskStore {
    scheduler_name: String,
    tasks: HashMap<String, TaskDescriptor>,
}

impl ScheduledTaskStore {
    pub fn new(scheduler_name: impl Into<String>) -> Self {
        Self {
            scheduler_name: scheduler_name.into(),
            tasks: HashMap::new(),
        }
    }

    pub fn scheduler_name(&self) -> &str {
        &self.scheduler_name
    }

    pub fn schedule(
        &mut self,
        task_name: &str,
        definition: Data,
        initial_delay_ms: u64,
        now: u64,
    ) -> Result<(), GridError> {
        if self.tasks.contains_key(task_name) {
            return Err(GridError::DuplicateTask {
                scheduler_name: self.scheduler_name.clone(),
                task_name: task_name.to_string(),
            });
        }

        self.tasks.insert(
            task_name.to_string(),
            TaskDescriptor {
                definition,
                initial_delay_ms,
                created_at: now,
                state: TaskState::Scheduled,
            },
        );

        tracing::debug!(
            "Scheduled task '{}' on '{}' (delay {}ms)",
            task_name,
            self.scheduler_name,
            initial_delay_ms
        );
        Ok(())
    }

    pub fn state(&self, task_name: &str) -> Result<TaskState, GridError> {
        self.descriptor(task_name).map(|task| task.state)
    }

    pub fn descriptor(&self, task_name: &str) -> Result<&TaskDescriptor, GridError> {
        self.tasks
            .get(task_name)
            .ok_or_else(|| self.not_found(task_name))
    }

    /// Returns `false` when the task was already cancelled.
    pub fn cancel(&mut self, task_name: &str) -> Result<bool, GridError> {
        let not_found = self.not_found(task_name);
        let task = self.tasks.get_mut(task_name).ok_or(not_found)?;
        if task.state == TaskState::Cancelled {
            return Ok(false);
        }
        task.state = TaskState::Cancelled;
        Ok(true)
    }

    pub fn dispose(&mut self, task_name: &str) -> Result<(), GridError> {
        match self.tasks.remove(task_name) {
            Some(_) => Ok(()),
            None => Err(self.not_found(task_name)),
        }
    }

    pub fn task_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tasks.keys().cloned().collect();
        names.sort();
        names
    }

    fn not_found(&self, task_name: &str) -> GridError {
        GridError::NotFound {
            what: "scheduled task",
            name: format!("{}/{}", self.scheduler_name, task_name),
        }
    }
}
