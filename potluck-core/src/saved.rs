//! A user's saved community recipes.
//!
//! Saved recipes behave as a set even though they are kept in the order
//! they were saved. Official recipes are saved through their community
//! twin, so "is this official recipe saved" is answered by mapping saved
//! twins back through their source recipe id.

use std::collections::HashSet;

use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedSet {
    ids: Vec<Uuid>,
}

impl SavedSet {
    /// Build from stored ids, dropping duplicates but keeping first-saved order.
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = Uuid>,
    {
        let mut set = Self::default();
        for id in ids {
            set.save(id);
        }
        set
    }

    /// Returns `true` if the id was not already saved.
    pub fn save(&mut self, id: Uuid) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Returns `true` if the id was saved and has been removed.
    pub fn unsave(&mut self, id: Uuid) -> bool {
        let before = self.ids.len();
        self.ids.retain(|saved| *saved != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Official recipe ids that count as saved for this user.
///
/// `twins` yields `(community_id, source_recipe_id)` for community recipes;
/// user-authored recipes have no source and never map to an official id.
pub fn saved_official_ids<I>(saved: &SavedSet, twins: I) -> HashSet<Uuid>
where
    I: IntoIterator<Item = (Uuid, Option<Uuid>)>,
{
    twins
        .into_iter()
        .filter(|(community_id, _)| saved.contains(*community_id))
        .filter_map(|(_, source)| source)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_is_idempotent() {
        let id = Uuid::new_v4();
        let mut set = SavedSet::default();
        assert!(set.save(id));
        assert!(!set.save(id));
        assert_eq!(set.ids(), &[id]);
    }

    #[test]
    fn test_unsave_missing_is_noop() {
        let mut set = SavedSet::from_ids(vec![Uuid::new_v4()]);
        assert!(!set.unsave(Uuid::new_v4()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_from_ids_dedups_keeping_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let set = SavedSet::from_ids(vec![a, b, a, b, a]);
        assert_eq!(set.ids(), &[a, b]);
    }

    #[test]
    fn test_saved_official_ids_maps_through_twin() {
        let official = Uuid::new_v4();
        let twin = Uuid::new_v4();
        let authored = Uuid::new_v4();
        let unsaved_twin = Uuid::new_v4();

        let saved = SavedSet::from_ids(vec![twin, authored]);
        let ids = saved_official_ids(
            &saved,
            vec![
                (twin, Some(official)),
                (authored, None),
                (unsaved_twin, Some(Uuid::new_v4())),
            ],
        );

        assert_eq!(ids.len(), 1);
        assert!(ids.contains(&official));
    }
}
