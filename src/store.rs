use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::balance;
use crate::errors::StoreError;
use crate::schemas::{Event, Expense, NewExpense, Participant};

/// Session-scoped event storage.
///
/// Events live in memory for the lifetime of the process; there is no
/// persistence layer. Callers always receive snapshots, never live
/// references, so every balance or settlement computation sees a consistent
/// copy of an event.
#[derive(Default)]
pub struct SessionStore {
    events: RwLock<HashMap<String, Event>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an event under the given id, replacing any previous event
    /// stored under it.
    pub fn create_event(&self, id: String, name: String) -> Event {
        let event = Event {
            id: id.clone(),
            name,
            created: Utc::now(),
            participants: Vec::new(),
            expenses: Vec::new(),
        };
        self.events.write().insert(id, event.clone());
        event
    }

    /// All events, newest first.
    pub fn list_events(&self) -> Vec<Event> {
        let mut events: Vec<Event> = self.events.read().values().cloned().collect();
        events.sort_by(|a, b| b.created.cmp(&a.created));
        events
    }

    pub fn get_event(&self, id: &str) -> Result<Event, StoreError> {
        self.events
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::UnknownEvent(id.to_string()))
    }

    pub fn delete_event(&self, id: &str) -> Result<(), StoreError> {
        self.events
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::UnknownEvent(id.to_string()))
    }

    /// Clears an event's participants and expenses but keeps the event.
    pub fn reset_event(&self, id: &str) -> Result<(), StoreError> {
        let mut events = self.events.write();
        let event = events
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownEvent(id.to_string()))?;
        event.participants.clear();
        event.expenses.clear();
        Ok(())
    }

    /// Adds a participant, rejecting blank and duplicate names. Names are
    /// trimmed before they are stored or compared.
    pub fn add_participant(&self, id: &str, participant: Participant) -> Result<(), StoreError> {
        let name = participant.name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyParticipantName);
        }
        let mut events = self.events.write();
        let event = events
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownEvent(id.to_string()))?;
        if event.participants.iter().any(|p| p.name == name) {
            return Err(StoreError::DuplicateParticipant(name.to_string()));
        }
        event.participants.push(Participant {
            name: name.to_string(),
            email: participant.email,
        });
        Ok(())
    }

    /// Validates the expense against the event's current roster before
    /// committing it; an invalid expense is never stored.
    pub fn add_expense(&self, id: &str, new: NewExpense) -> Result<Expense, StoreError> {
        let mut events = self.events.write();
        let event = events
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownEvent(id.to_string()))?;

        let expense = Expense {
            id: Uuid::new_v4(),
            created: Utc::now(),
            description: new.description,
            amount: new.amount,
            payer: new.payer,
            beneficiaries: new.beneficiaries,
            split: new.split,
        };
        balance::expense_shares(&event.participants, &expense)?;

        event.expenses.push(expense.clone());
        Ok(expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use crate::money::Money;
    use crate::schemas::SplitRule;

    fn participant(name: &str) -> Participant {
        Participant {
            name: name.to_string(),
            email: None,
        }
    }

    fn dinner(payer: &str, beneficiaries: &[&str]) -> NewExpense {
        NewExpense {
            description: "dinner".to_string(),
            amount: Money::from_cents(3000),
            payer: payer.to_string(),
            beneficiaries: beneficiaries.iter().map(|b| b.to_string()).collect(),
            split: SplitRule::Equal,
        }
    }

    #[test]
    fn created_event_can_be_fetched() {
        let store = SessionStore::new();
        store.create_event("trip".to_string(), "Weekend trip".to_string());

        let event = store.get_event("trip").unwrap();
        assert_eq!(event.name, "Weekend trip");
        assert!(event.participants.is_empty());
    }

    #[test]
    fn unknown_event_is_reported() {
        let store = SessionStore::new();
        assert_eq!(
            store.get_event("nope").unwrap_err(),
            StoreError::UnknownEvent("nope".to_string())
        );
    }

    #[test]
    fn duplicate_participant_is_rejected() {
        let store = SessionStore::new();
        store.create_event("trip".to_string(), "Trip".to_string());
        store.add_participant("trip", participant("ana")).unwrap();

        assert_eq!(
            store.add_participant("trip", participant("ana")).unwrap_err(),
            StoreError::DuplicateParticipant("ana".to_string())
        );
    }

    #[test]
    fn participant_names_are_trimmed() {
        let store = SessionStore::new();
        store.create_event("trip".to_string(), "Trip".to_string());
        store.add_participant("trip", participant("  ana ")).unwrap();

        assert_eq!(
            store.add_participant("trip", participant("ana")).unwrap_err(),
            StoreError::DuplicateParticipant("ana".to_string())
        );
        assert_eq!(
            store.add_participant("trip", participant("   ")).unwrap_err(),
            StoreError::EmptyParticipantName
        );
    }

    #[test]
    fn invalid_expense_is_not_stored() {
        let store = SessionStore::new();
        store.create_event("trip".to_string(), "Trip".to_string());
        store.add_participant("trip", participant("ana")).unwrap();

        let err = store.add_expense("trip", dinner("zoe", &["ana"])).unwrap_err();
        assert_eq!(
            err,
            StoreError::InvalidExpense(ValidationError::UnknownParticipant("zoe".to_string()))
        );
        assert!(store.get_event("trip").unwrap().expenses.is_empty());
    }

    #[test]
    fn stored_expense_is_stamped() {
        let store = SessionStore::new();
        store.create_event("trip".to_string(), "Trip".to_string());
        store.add_participant("trip", participant("ana")).unwrap();
        store.add_participant("trip", participant("bruno")).unwrap();

        let expense = store.add_expense("trip", dinner("ana", &["ana", "bruno"])).unwrap();
        let event = store.get_event("trip").unwrap();
        assert_eq!(event.expenses, vec![expense]);
    }

    #[test]
    fn reset_clears_roster_and_expenses() {
        let store = SessionStore::new();
        store.create_event("trip".to_string(), "Trip".to_string());
        store.add_participant("trip", participant("ana")).unwrap();
        store.add_expense("trip", dinner("ana", &["ana"])).unwrap();

        store.reset_event("trip").unwrap();
        let event = store.get_event("trip").unwrap();
        assert!(event.participants.is_empty());
        assert!(event.expenses.is_empty());
    }

    #[test]
    fn deleted_event_is_gone() {
        let store = SessionStore::new();
        store.create_event("trip".to_string(), "Trip".to_string());
        store.delete_event("trip").unwrap();

        assert!(store.get_event("trip").is_err());
        assert_eq!(
            store.delete_event("trip").unwrap_err(),
            StoreError::UnknownEvent("trip".to_string())
        );
    }
}
