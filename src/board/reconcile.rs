use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::warn;

use super::state::BoardState;
use crate::api::{CreatePrRequest, UpdatePrRequest};
use crate::client::ApiClient;
use crate::db::PrFilter;
use crate::models::{PrItem, PrStatus};

/// Result of an optimistic edit or create: either the server's canonical
/// record, or the local copy kept after a failed confirmation.
#[derive(Debug, Clone)]
pub enum Outcome {
    Synced(PrItem),
    LocalOnly(PrItem),
}

impl Outcome {
    #[must_use]
    pub fn pr(&self) -> &PrItem {
        match self {
            Self::Synced(pr) | Self::LocalOnly(pr) => pr,
        }
    }

    #[must_use]
    pub const fn is_synced(&self) -> bool {
        matches!(self, Self::Synced(_))
    }
}

/// Applies board mutations locally first, then confirms them against the
/// server, reverting or flagging entries when the confirming request
/// fails. The board snapshot is persisted after every operation.
pub struct Reconciler {
    client: ApiClient,
    board: BoardState,
    snapshot_path: PathBuf,
}

impl Reconciler {
    pub async fn load(client: ApiClient, snapshot_path: PathBuf) -> Result<Self> {
        let board = BoardState::load(&snapshot_path)
            .await
            .context("Failed to load board snapshot")?;

        Ok(Self {
            client,
            board,
            snapshot_path,
        })
    }

    #[must_use]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    async fn persist(&self) -> Result<()> {
        self.board.save(&self.snapshot_path).await
    }

    /// Replace the local snapshot with the server's current listing.
    pub async fn refresh(&mut self) -> Result<()> {
        let listing = self.client.list_prs(&PrFilter::default()).await?;
        self.board.hydrate(listing.prs);
        self.persist().await
    }

    /// Drag a card to another column. The move is visible locally right
    /// away; if the server rejects it, the card snaps back to its
    /// previous column and the error is returned.
    pub async fn move_pr(&mut self, id: i32, status: PrStatus) -> Result<PrItem> {
        let ticket = self
            .board
            .begin_move(id, status)
            .with_context(|| format!("No PR with id {id} on the board"))?;

        match self
            .client
            .update_pr(&UpdatePrRequest {
                id,
                status: Some(status),
                ..Default::default()
            })
            .await
        {
            Ok(response) => {
                self.board.confirm(id, response.pr.clone());
                self.persist().await?;
                Ok(response.pr)
            }
            Err(e) => {
                warn!(pr_id = id, "Move rejected, reverting: {e}");
                self.board.revert(ticket);
                self.persist().await?;
                Err(e)
            }
        }
    }

    /// Apply an edit. On confirmation the server's record overwrites the
    /// local one; on failure the edited copy is kept and flagged so the
    /// caller can warn that it is saved locally only.
    pub async fn edit_pr(&mut self, edited: PrItem, request: UpdatePrRequest) -> Result<Outcome> {
        let id = edited.id;
        self.board
            .begin_edit(edited)
            .with_context(|| format!("No PR with id {id} on the board"))?;

        let outcome = match self.client.update_pr(&request).await {
            Ok(response) => {
                self.board.confirm(id, response.pr.clone());
                Outcome::Synced(response.pr)
            }
            Err(e) => {
                warn!(pr_id = id, "Edit not confirmed, keeping local copy: {e}");
                self.board.keep_local(id);
                Outcome::LocalOnly(
                    self.board
                        .get(id)
                        .map(|entry| entry.pr.clone())
                        .with_context(|| format!("PR {id} vanished during edit"))?,
                )
            }
        };

        self.persist().await?;
        Ok(outcome)
    }

    /// Create a card. It appears on the board immediately under a
    /// placeholder id; the server-assigned record replaces it on
    /// confirmation, and a failed create stays as a local-only card.
    pub async fn create_pr(&mut self, local: PrItem, request: CreatePrRequest) -> Result<Outcome> {
        let placeholder = self.board.begin_create(local);

        let outcome = match self.client.create_pr(&request).await {
            Ok(response) => {
                self.board.confirm(placeholder, response.pr.clone());
                Outcome::Synced(response.pr)
            }
            Err(e) => {
                warn!("Create not confirmed, keeping local card: {e}");
                self.board.keep_local(placeholder);
                Outcome::LocalOnly(
                    self.board
                        .get(placeholder)
                        .map(|entry| entry.pr.clone())
                        .context("Placeholder card vanished during create")?,
                )
            }
        };

        self.persist().await?;
        Ok(outcome)
    }

    /// Delete is server-first: the card only leaves the board once the
    /// server has acknowledged the removal.
    pub async fn delete_pr(&mut self, id: i32) -> Result<()> {
        if id > 0 {
            self.client.delete_pr(id).await?;
        }
        self.board.remove(id);
        self.persist().await
    }
}
