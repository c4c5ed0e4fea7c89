use crate::errors::ActivityError;
use crate::models::{Activity, ActivityId};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct ActivityStore {
    activities: Vec<Activity>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, activity: Activity) -> Result<(), ActivityError> {
        if self.contains(activity.id()) {
            return Err(ActivityError::DuplicateId(activity.id().to_string()));
        }
        self.activities.push(activity);
        Ok(())
    }

    /// Returns the removed activity. Absent ids are a no-op.
    pub fn remove_by_id(&mut self, id: &ActivityId) -> Option<Activity> {
        let index = self.activities.iter().position(|a| a.id() == id)?;
        Some(self.activities.remove(index))
    }

    pub fn clear(&mut self) {
        self.activities.clear();
    }

    /// Installs `records` in place of the current contents. On a duplicate id the store is
    /// left untouched.
    pub fn replace_all(&mut self, records: Vec<Activity>) -> Result<(), ActivityError> {
        let mut seen = HashSet::with_capacity(records.len());
        for activity in &records {
            if !seen.insert(activity.id()) {
                return Err(ActivityError::DuplicateId(activity.id().to_string()));
            }
        }
        self.activities = records;
        Ok(())
    }

    /// Current activities in insertion order. The borrow keeps the store frozen while iterating.
    pub fn list(&self) -> impl Iterator<Item = &Activity> + '_ {
        self.activities.iter()
    }

    pub fn get(&self, id: &ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id() == id)
    }

    pub fn contains(&self, id: &ActivityId) -> bool {
        self.get(id).is_some()
    }

    pub fn first(&self) -> Option<&Activity> {
        self.activities.first()
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}
