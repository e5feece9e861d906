//! Allies present at the session.

use super::{DraftError, ItemKind, SessionDraft};

/// Present allies, tracked as paired id and name lists.
///
/// Both lists always have the same length and index `i` of each refers to
/// the same ally. The note payload carries both shapes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresentAllies {
    ids: Vec<i64>,
    names: Vec<String>,
}

impl PresentAllies {
    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, ally_id: i64) -> bool {
        self.ids.contains(&ally_id)
    }

    /// `(id, name)` pairs in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.ids
            .iter()
            .copied()
            .zip(self.names.iter().map(String::as_str))
    }

    fn add(&mut self, ally_id: i64, name: &str) -> Result<(), DraftError> {
        if self.contains(ally_id) {
            return Err(DraftError::already_selected(ItemKind::Ally, name));
        }
        self.ids.push(ally_id);
        self.names.push(name.to_string());
        Ok(())
    }

    fn remove(&mut self, ally_id: i64) -> Result<String, DraftError> {
        let pos = self
            .ids
            .iter()
            .position(|id| *id == ally_id)
            .ok_or_else(|| DraftError::NotFound {
                kind: ItemKind::Ally,
                key: ally_id.to_string(),
            })?;
        self.ids.remove(pos);
        Ok(self.names.remove(pos))
    }
}

impl SessionDraft {
    /// Record an ally as present.
    ///
    /// # Errors
    ///
    /// `AlreadySelected` if the ally is already recorded.
    pub fn add_present_ally(&mut self, ally_id: i64, name: &str) -> Result<(), DraftError> {
        self.note.attendees.add(ally_id, name)
    }

    /// Remove a present ally by id, returning their name.
    ///
    /// # Errors
    ///
    /// `NotFound` if the ally is not recorded as present.
    pub fn remove_present_ally(&mut self, ally_id: i64) -> Result<String, DraftError> {
        self.note.attendees.remove(ally_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::ReasonCode;

    #[test]
    fn test_ids_and_names_stay_paired() {
        let mut draft = SessionDraft::for_client(1);
        draft.add_present_ally(3, "Dana").unwrap();
        draft.add_present_ally(8, "Sam").unwrap();
        draft.add_present_ally(5, "Dana").unwrap();

        let err = draft.add_present_ally(8, "Sam").unwrap_err();
        assert_eq!(err.code(), ReasonCode::AlreadySelected);

        assert_eq!(draft.remove_present_ally(8).unwrap(), "Sam");
        let attendees = draft.note.attendees();
        assert_eq!(attendees.ids().len(), attendees.names().len());
        assert_eq!(
            attendees.iter().collect::<Vec<_>>(),
            vec![(3, "Dana"), (5, "Dana")]
        );
    }

    #[test]
    fn test_remove_missing_ally() {
        let mut draft = SessionDraft::for_client(1);
        let err = draft.remove_present_ally(42).unwrap_err();
        assert_eq!(err.code(), ReasonCode::NotFound);
        assert!(draft.note.attendees().is_empty());
    }
}
