use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::core::time::Date;
use crate::port::{RemoteFetchError, StatusSource};

use super::{HabitDefinition, HabitId, HabitStatus, StatusRecord};

#[derive(Debug, Default)]
struct FakeState {
    habits: Option<Vec<HabitDefinition>>,
    statuses: HashMap<(HabitId, Date), HabitStatus>,
    calls: Vec<(HabitId, Date)>,
}

/// In-memory upstream. Dates without a configured status fail like an HTTP error would.
#[derive(Debug, Clone, Default)]
pub struct FakeSource {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSource {
    pub fn with_habits(habits: &[(&str, &str)]) -> Self {
        let source = Self::default();
        source.state.lock().unwrap().habits = Some(
            habits
                .iter()
                .map(|(id, name)| HabitDefinition {
                    id: HabitId::new(*id),
                    name: name.to_string(),
                })
                .collect(),
        );
        source
    }

    pub fn without_definitions() -> Self {
        Self::default()
    }

    pub fn set_status(&self, habit_id: &str, date: Date, status: HabitStatus) {
        self.state
            .lock()
            .unwrap()
            .statuses
            .insert((HabitId::new(habit_id), date), status);
    }

    pub fn calls(&self) -> Vec<(HabitId, Date)> {
        self.state.lock().unwrap().calls.clone()
    }
}

impl StatusSource for FakeSource {
    async fn fetch_habits(&self) -> Result<Vec<HabitDefinition>, RemoteFetchError> {
        self.state
            .lock()
            .unwrap()
            .habits
            .clone()
            .ok_or_else(|| RemoteFetchError::Habits {
                cause: anyhow::anyhow!("HTTP 401"),
            })
    }

    async fn fetch_status(&self, habit_id: &HabitId, date: Date) -> Result<StatusRecord, RemoteFetchError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((habit_id.clone(), date));

        match state.statuses.get(&(habit_id.clone(), date)) {
            Some(status) => Ok(StatusRecord::new(date, *status)),
            None => Err(RemoteFetchError::Status {
                habit_id: habit_id.clone(),
                date,
                cause: anyhow::anyhow!("HTTP 500"),
            }),
        }
    }
}
