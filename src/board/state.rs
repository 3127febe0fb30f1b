use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::models::{Category, PrItem, PrStatus};

/// Reconciliation state of one board entry with respect to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// A mutation has been applied locally and its confirming request is
    /// in flight.
    Pending,
    /// Local copy matches the last server response.
    Confirmed,
    /// The confirming request failed; the entry is local-only until the
    /// next successful refresh or retry.
    Failed,
}

/// One card on the board together with its sync status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardEntry {
    pub pr: PrItem,
    pub sync: SyncState,
}

/// Snapshot taken before an optimistic mutation, used to revert when the
/// confirming request fails.
#[derive(Debug, Clone)]
pub struct MutationTicket {
    pub id: i32,
    snapshot: PrItem,
}

/// The locally held working copy of the board. Mutations are applied here
/// first for responsiveness, then confirmed or reverted once the server
/// answers. Persisted as a JSON snapshot between runs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BoardState {
    pub entries: Vec<BoardEntry>,
    /// Counter for ids handed to optimistic creates before the server
    /// assigns a real one. Always negative so it can never collide.
    next_placeholder: i32,
}

impl BoardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the working copy with a fresh server listing. Everything
    /// becomes confirmed; local-only entries are dropped.
    pub fn hydrate(&mut self, prs: Vec<PrItem>) {
        self.entries = prs
            .into_iter()
            .map(|pr| BoardEntry {
                pr,
                sync: SyncState::Confirmed,
            })
            .collect();
    }

    #[must_use]
    pub fn get(&self, id: i32) -> Option<&BoardEntry> {
        self.entries.iter().find(|e| e.pr.id == id)
    }

    fn get_mut(&mut self, id: i32) -> Option<&mut BoardEntry> {
        self.entries.iter_mut().find(|e| e.pr.id == id)
    }

    // ------------------------------------------------------------------
    // Optimistic mutations
    // ------------------------------------------------------------------

    /// Move a card to another column locally and mark it pending. Returns
    /// a ticket holding the pre-move snapshot for `revert`.
    pub fn begin_move(&mut self, id: i32, status: PrStatus) -> Option<MutationTicket> {
        let entry = self.get_mut(id)?;
        let snapshot = entry.pr.clone();

        entry.pr.status = status;
        entry.sync = SyncState::Pending;

        Some(MutationTicket { id, snapshot })
    }

    /// Apply an edited card locally and mark it pending.
    pub fn begin_edit(&mut self, edited: PrItem) -> Option<MutationTicket> {
        let entry = self.get_mut(edited.id)?;
        let snapshot = entry.pr.clone();

        entry.pr = edited;
        entry.sync = SyncState::Pending;

        Some(MutationTicket {
            id: snapshot.id,
            snapshot,
        })
    }

    /// Prepend a locally constructed card with a placeholder id. The
    /// returned id is negative until `confirm_create` swaps in the
    /// server-assigned record.
    pub fn begin_create(&mut self, mut pr: PrItem) -> i32 {
        self.next_placeholder -= 1;
        pr.id = self.next_placeholder;

        self.entries.insert(
            0,
            BoardEntry {
                pr,
                sync: SyncState::Pending,
            },
        );

        self.next_placeholder
    }

    /// The server accepted the mutation; its returned record is
    /// authoritative and overwrites the local copy.
    pub fn confirm(&mut self, id: i32, canonical: PrItem) {
        if let Some(entry) = self.get_mut(id) {
            entry.pr = canonical;
            entry.sync = SyncState::Confirmed;
        }
    }

    /// A move failed: restore the pre-move snapshot so local state never
    /// silently stays ahead of the server.
    pub fn revert(&mut self, ticket: MutationTicket) {
        if let Some(entry) = self.get_mut(ticket.id) {
            entry.pr = ticket.snapshot;
            entry.sync = SyncState::Failed;
        }
    }

    /// An edit failed: keep the edited copy but flag it as local-only so
    /// the caller can surface a "saved locally" warning.
    pub fn keep_local(&mut self, id: i32) {
        if let Some(entry) = self.get_mut(id) {
            entry.sync = SyncState::Failed;
        }
    }

    pub fn remove(&mut self, id: i32) -> Option<BoardEntry> {
        let pos = self.entries.iter().position(|e| e.pr.id == id)?;
        Some(self.entries.remove(pos))
    }

    // ------------------------------------------------------------------
    // Derived projections
    // ------------------------------------------------------------------

    /// Cards grouped into the five columns, in column order. Recomputed
    /// from the current snapshot on every call.
    #[must_use]
    pub fn columns(&self) -> Vec<(PrStatus, Vec<&PrItem>)> {
        PrStatus::ALL
            .into_iter()
            .map(|status| {
                let cards: Vec<&PrItem> = self
                    .entries
                    .iter()
                    .filter(|e| e.pr.status == status)
                    .map(|e| &e.pr)
                    .collect();
                (status, cards)
            })
            .collect()
    }

    /// Distinct workspace names of one category, drawn from both the
    /// cards and any explicitly configured workspace names, de-duplicated
    /// and sorted.
    #[must_use]
    pub fn workspace_names<'a, I>(&'a self, category: Category, configured: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut names: BTreeSet<&str> = configured.into_iter().collect();

        for entry in &self.entries {
            if entry.pr.category == category
                && let Some(name) = entry.pr.workspace_name()
            {
                names.insert(name);
            }
        }

        names.into_iter().map(str::to_string).collect()
    }

    /// Entries whose last mutation failed and are local-only.
    #[must_use]
    pub fn unsynced(&self) -> Vec<&BoardEntry> {
        self.entries
            .iter()
            .filter(|e| e.sync == SyncState::Failed)
            .collect()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn card(id: i32, title: &str, status: PrStatus) -> PrItem {
        PrItem {
            id,
            title: title.to_string(),
            category: Category::Project,
            project: Some("Core".to_string()),
            service: None,
            author: "A".to_string(),
            description: None,
            status,
            priority: Priority::Medium,
            links: vec![],
            scheduled_date: None,
            scheduled_time: None,
            email_reminder: false,
            calendar_event: false,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn failed_move_reverts_to_snapshot() {
        let mut board = BoardState::new();
        board.hydrate(vec![card(1, "Fix bug", PrStatus::Initial)]);

        let ticket = board.begin_move(1, PrStatus::Approved).unwrap();
        assert_eq!(board.get(1).unwrap().pr.status, PrStatus::Approved);
        assert_eq!(board.get(1).unwrap().sync, SyncState::Pending);

        board.revert(ticket);
        assert_eq!(board.get(1).unwrap().pr.status, PrStatus::Initial);
        assert_eq!(board.get(1).unwrap().sync, SyncState::Failed);
    }

    #[test]
    fn confirmed_move_takes_server_record() {
        let mut board = BoardState::new();
        board.hydrate(vec![card(1, "Fix bug", PrStatus::Initial)]);

        board.begin_move(1, PrStatus::Merged).unwrap();
        let mut canonical = card(1, "Fix bug", PrStatus::Merged);
        canonical.updated_at = "2025-09-01T00:00:00Z".to_string();
        board.confirm(1, canonical);

        let entry = board.get(1).unwrap();
        assert_eq!(entry.sync, SyncState::Confirmed);
        assert_eq!(entry.pr.updated_at, "2025-09-01T00:00:00Z");
    }

    #[test]
    fn create_uses_placeholder_until_confirmed() {
        let mut board = BoardState::new();
        let placeholder = board.begin_create(card(0, "New", PrStatus::Initial));

        assert!(placeholder < 0);
        assert_eq!(board.entries[0].pr.id, placeholder);

        board.confirm(placeholder, card(42, "New", PrStatus::Initial));
        assert_eq!(board.entries[0].pr.id, 42);
        assert_eq!(board.entries[0].sync, SyncState::Confirmed);
    }

    #[test]
    fn failed_edit_keeps_local_copy() {
        let mut board = BoardState::new();
        board.hydrate(vec![card(1, "Fix bug", PrStatus::Initial)]);

        let mut edited = card(1, "Fix bug properly", PrStatus::Initial);
        edited.priority = Priority::High;
        board.begin_edit(edited).unwrap();
        board.keep_local(1);

        let entry = board.get(1).unwrap();
        assert_eq!(entry.pr.title, "Fix bug properly");
        assert_eq!(entry.sync, SyncState::Failed);
        assert_eq!(board.unsynced().len(), 1);
    }

    #[test]
    fn columns_cover_all_statuses_in_order() {
        let mut board = BoardState::new();
        board.hydrate(vec![
            card(1, "a", PrStatus::Initial),
            card(2, "b", PrStatus::Merged),
            card(3, "c", PrStatus::Initial),
        ]);

        let columns = board.columns();
        assert_eq!(columns.len(), 5);
        assert_eq!(columns[0].0, PrStatus::Initial);
        assert_eq!(columns[0].1.len(), 2);
        assert_eq!(columns[3].1.len(), 1);
        assert!(columns[4].1.is_empty());
    }

    #[test]
    fn workspace_names_merge_and_dedupe() {
        let mut board = BoardState::new();
        board.hydrate(vec![card(1, "a", PrStatus::Initial)]);

        let names = board.workspace_names(Category::Project, ["Billing", "Core"]);
        assert_eq!(names, vec!["Billing".to_string(), "Core".to_string()]);
    }
}
