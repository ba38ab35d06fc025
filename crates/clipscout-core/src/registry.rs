// crates/clipscout-core/src/registry.rs
//
// MediaRegistry: the set of loaded files, their per-file timestamp lists,
// and the current selection. All mutation goes through the methods here —
// nothing else writes this state.
//
// File and timestamps live in one record per entry, so the pairing between
// a file and its timestamp list cannot drift: there is no second collection
// to fall out of sync with.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::media_types::MediaFile;

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("timestamp index {index} out of bounds (registry has {len} files)")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("file {0} is not in the registry")]
    NotInRegistry(Uuid),
}

/// One loaded file together with its detected timestamps.
///
/// Timestamps are empty until a detection result arrives, then replaced
/// wholesale on every re-run — never merged.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MediaEntry {
    pub file:       MediaFile,
    pub timestamps: Vec<f64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MediaRegistry {
    entries:  Vec<MediaEntry>,
    selected: Option<Uuid>,
}

impl MediaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mutations ─────────────────────────────────────────────────────────

    /// Append files to the registry, each with an empty timestamp list.
    /// If nothing is selected yet, the first newly added file becomes the
    /// selection.
    pub fn add_files(&mut self, files: impl IntoIterator<Item = MediaFile>) {
        let mut first_new: Option<Uuid> = None;
        for file in files {
            first_new.get_or_insert(file.id);
            self.entries.push(MediaEntry { file, timestamps: Vec::new() });
        }
        if self.selected.is_none() {
            self.selected = first_new;
        }
    }

    /// Remove a file and its timestamp list. No-op when the id is absent.
    ///
    /// If the removed file was selected, the selection moves to the entry
    /// now occupying the vacated index, falling back to the preceding
    /// index, falling back to none — evaluated after removal.
    pub fn delete_file(&mut self, id: Uuid) {
        let Some(index) = self.index_of(id) else { return };
        self.entries.remove(index);

        if self.selected == Some(id) {
            self.selected = self
                .entries
                .get(index)
                .or_else(|| index.checked_sub(1).and_then(|i| self.entries.get(i)))
                .map(|e| e.file.id);
        }
    }

    /// Overwrite the timestamp list at `index`.
    pub fn set_timestamps(&mut self, index: usize, list: Vec<f64>) -> Result<(), RegistryError> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(RegistryError::IndexOutOfBounds { index, len })?;
        entry.timestamps = list;
        Ok(())
    }

    /// Overwrite the timestamp list for the file with the given id.
    pub fn set_timestamps_for(&mut self, id: Uuid, list: Vec<f64>) -> Result<(), RegistryError> {
        let index = self.index_of(id).ok_or(RegistryError::NotInRegistry(id))?;
        self.entries[index].timestamps = list;
        Ok(())
    }

    /// Replace every entry's timestamp list from an ordered sequence, in
    /// one pass. A shorter input leaves the remaining entries empty; excess
    /// input is dropped. Entries and lists can never diverge afterwards.
    pub fn replace_all_timestamps(&mut self, lists: Vec<Vec<f64>>) {
        let mut lists = lists.into_iter();
        for entry in &mut self.entries {
            entry.timestamps = lists.next().unwrap_or_default();
        }
    }

    /// Set the selection. `None` clears it; a `Some` id must name a file
    /// currently in the registry — selecting an unknown file is a
    /// programmer error and fails without touching state.
    pub fn select_file(&mut self, id: Option<Uuid>) -> Result<(), RegistryError> {
        if let Some(id) = id {
            if self.index_of(id).is_none() {
                return Err(RegistryError::NotInRegistry(id));
            }
        }
        self.selected = id;
        Ok(())
    }

    // ── Views ─────────────────────────────────────────────────────────────

    pub fn entries(&self) -> &[MediaEntry] {
        &self.entries
    }

    pub fn files(&self) -> impl Iterator<Item = &MediaFile> {
        self.entries.iter().map(|e| &e.file)
    }

    pub fn timestamp_lists(&self) -> impl Iterator<Item = &[f64]> {
        self.entries.iter().map(|e| e.timestamps.as_slice())
    }

    pub fn timestamps_for(&self, id: Uuid) -> Option<&[f64]> {
        self.index_of(id).map(|i| self.entries[i].timestamps.as_slice())
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&MediaEntry> {
        self.selected.and_then(|id| self.index_of(id)).map(|i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index_of(&self, id: Uuid) -> Option<usize> {
        self.entries.iter().position(|e| e.file.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file(name: &str) -> MediaFile {
        MediaFile {
            id:        Uuid::new_v4(),
            name:      name.into(),
            byte_size: 0,
            path:      PathBuf::from(name),
        }
    }

    #[test]
    fn views_stay_same_length_across_adds_and_deletes() {
        let mut reg = MediaRegistry::new();
        let a = file("a.mp4");
        let b = file("b.mp4");
        let c = file("c.mp4");
        let (ida, idb) = (a.id, b.id);

        reg.add_files([a, b]);
        assert_eq!(reg.files().count(), reg.timestamp_lists().count());

        reg.add_files([c]);
        assert_eq!(reg.files().count(), 3);
        assert_eq!(reg.timestamp_lists().count(), 3);

        reg.delete_file(idb);
        assert_eq!(reg.files().count(), reg.timestamp_lists().count());
        reg.delete_file(ida);
        assert_eq!(reg.files().count(), reg.timestamp_lists().count());
    }

    #[test]
    fn add_selects_first_file_when_nothing_selected() {
        let mut reg = MediaRegistry::new();
        let a = file("a.mp4");
        let b = file("b.mp4");
        let ida = a.id;
        reg.add_files([a, b]);
        assert_eq!(reg.selected(), Some(ida));

        // A later add must not steal the selection.
        let c = file("c.mp4");
        reg.add_files([c]);
        assert_eq!(reg.selected(), Some(ida));
    }

    #[test]
    fn delete_unknown_id_is_a_noop() {
        let mut reg = MediaRegistry::new();
        let a = file("a.mp4");
        let ida = a.id;
        reg.add_files([a]);
        reg.delete_file(Uuid::new_v4());
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.selected(), Some(ida));
    }

    #[test]
    fn deleting_selected_middle_file_selects_successor() {
        // files = [A, B, C], selected = B. Delete B → files = [A, C],
        // selection = element now at index 1 = C.
        let mut reg = MediaRegistry::new();
        let (a, b, c) = (file("a.mp4"), file("b.mp4"), file("c.mp4"));
        let (idb, idc) = (b.id, c.id);
        reg.add_files([a, b, c]);
        reg.select_file(Some(idb)).unwrap();

        reg.delete_file(idb);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.selected(), Some(idc));
    }

    #[test]
    fn deleting_selected_last_file_falls_back_to_predecessor() {
        let mut reg = MediaRegistry::new();
        let (a, b) = (file("a.mp4"), file("b.mp4"));
        let (ida, idb) = (a.id, b.id);
        reg.add_files([a, b]);
        reg.select_file(Some(idb)).unwrap();

        reg.delete_file(idb);
        assert_eq!(reg.selected(), Some(ida));
    }

    #[test]
    fn deleting_only_file_clears_selection() {
        let mut reg = MediaRegistry::new();
        let a = file("a.mp4");
        let ida = a.id;
        reg.add_files([a]);

        reg.delete_file(ida);
        assert!(reg.is_empty());
        assert_eq!(reg.selected(), None);
    }

    #[test]
    fn deleting_unselected_file_keeps_selection() {
        let mut reg = MediaRegistry::new();
        let (a, b) = (file("a.mp4"), file("b.mp4"));
        let (ida, idb) = (a.id, b.id);
        reg.add_files([a, b]);

        reg.delete_file(idb);
        assert_eq!(reg.selected(), Some(ida));
    }

    #[test]
    fn add_then_delete_restores_pre_add_state() {
        let mut reg = MediaRegistry::new();
        let a = file("a.mp4");
        let ida = a.id;

        reg.add_files([a]);
        reg.delete_file(ida);

        assert!(reg.is_empty());
        assert_eq!(reg.timestamp_lists().count(), 0);
        assert_eq!(reg.selected(), None);
    }

    #[test]
    fn detection_result_replaces_prior_timestamps() {
        let mut reg = MediaRegistry::new();
        let a = file("a.mp4");
        let ida = a.id;
        reg.add_files([a]);

        reg.set_timestamps_for(ida, vec![1.0, 9.5]).unwrap();
        reg.set_timestamps_for(ida, vec![2.0, 4.0]).unwrap();
        assert_eq!(reg.timestamps_for(ida), Some(&[2.0, 4.0][..]));
    }

    #[test]
    fn set_timestamps_out_of_bounds_errors() {
        let mut reg = MediaRegistry::new();
        reg.add_files([file("a.mp4")]);

        let err = reg.set_timestamps(1, vec![1.0]).unwrap_err();
        assert_eq!(err, RegistryError::IndexOutOfBounds { index: 1, len: 1 });
        // The in-bounds entry is untouched.
        assert_eq!(reg.entries()[0].timestamps, Vec::<f64>::new());
    }

    #[test]
    fn replace_all_pads_and_truncates() {
        let mut reg = MediaRegistry::new();
        reg.add_files([file("a.mp4"), file("b.mp4")]);

        // Longer input: excess dropped.
        reg.replace_all_timestamps(vec![vec![1.0], vec![2.0], vec![3.0]]);
        let lists: Vec<_> = reg.timestamp_lists().collect();
        assert_eq!(lists, vec![&[1.0][..], &[2.0][..]]);

        // Shorter input: the rest become empty.
        reg.replace_all_timestamps(vec![vec![5.0]]);
        let lists: Vec<_> = reg.timestamp_lists().collect();
        assert_eq!(lists, vec![&[5.0][..], &[][..]]);
    }

    #[test]
    fn select_unknown_file_fails_without_touching_state() {
        let mut reg = MediaRegistry::new();
        let a = file("a.mp4");
        let ida = a.id;
        reg.add_files([a]);

        let ghost = Uuid::new_v4();
        assert_eq!(reg.select_file(Some(ghost)), Err(RegistryError::NotInRegistry(ghost)));
        assert_eq!(reg.selected(), Some(ida));

        reg.select_file(None).unwrap();
        assert_eq!(reg.selected(), None);
    }

    #[test]
    fn snapshot_round_trips_through_serde() {
        let mut reg = MediaRegistry::new();
        let a = file("a.mp4");
        let ida = a.id;
        reg.add_files([a]);
        reg.set_timestamps_for(ida, vec![2.0, 4.0]).unwrap();

        let json = serde_json::to_string(&reg).unwrap();
        let restored: MediaRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.selected(), Some(ida));
        assert_eq!(restored.timestamps_for(ida), Some(&[2.0, 4.0][..]));
    }
}
