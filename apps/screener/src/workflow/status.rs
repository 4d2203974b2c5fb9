//! Per-operation status tracking.
//!
//! Each tracked operation runs `Idle -> InFlight -> {Succeeded, Failed}` and
//! returns to a terminal state before the same operation is invoked again.
//! Two things the table enforces:
//!
//! 1. The aggregate loading indicator is DERIVED (`any_in_flight`), never
//!    stored. Each operation owns its own status; conflating them into one
//!    boolean is exactly the hazard this replaces.
//! 2. Stale-response suppression: every invocation gets a monotonically
//!    increasing sequence number, and a completion only lands if it carries
//!    the latest number issued for that operation. A slow first call that
//!    resolves after a newer one has started is discarded, so the visible
//!    result is always the latest *issued* invocation's, not whichever
//!    happened to resolve last.

use tracing::debug;

/// The tracked operations. Auth calls (login, signup, logout) are not
/// tracked and never touch the loading indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Upload,
    Rank,
    Notify,
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

impl OpStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OpStatus::Succeeded | OpStatus::Failed)
    }
}

#[derive(Debug, Default)]
struct OpCell {
    issued: u64,
    status: OpStatus,
}

/// Status and sequence bookkeeping for all tracked operations.
#[derive(Debug, Default)]
pub struct OpTable {
    upload: OpCell,
    rank: OpCell,
    notify: OpCell,
    refresh: OpCell,
}

impl OpTable {
    fn cell(&self, kind: OpKind) -> &OpCell {
        match kind {
            OpKind::Upload => &self.upload,
            OpKind::Rank => &self.rank,
            OpKind::Notify => &self.notify,
            OpKind::Refresh => &self.refresh,
        }
    }

    fn cell_mut(&mut self, kind: OpKind) -> &mut OpCell {
        match kind {
            OpKind::Upload => &mut self.upload,
            OpKind::Rank => &mut self.rank,
            OpKind::Notify => &mut self.notify,
            OpKind::Refresh => &mut self.refresh,
        }
    }

    /// Starts a new invocation of `kind` and returns its sequence number.
    /// Starting does not cancel an earlier in-flight invocation; it only
    /// supersedes it, so the earlier completion will be discarded.
    pub fn begin(&mut self, kind: OpKind) -> u64 {
        let cell = self.cell_mut(kind);
        cell.issued += 1;
        cell.status = OpStatus::InFlight;
        cell.issued
    }

    /// Records a terminal outcome for invocation `seq` of `kind`. Returns
    /// whether the completion was applied; a completion carrying anything but
    /// the latest issued sequence number is discarded and the caller must not
    /// publish its result.
    pub fn try_complete(&mut self, kind: OpKind, seq: u64, outcome: OpStatus) -> bool {
        debug_assert!(outcome.is_terminal());
        let cell = self.cell_mut(kind);
        if seq != cell.issued {
            debug!(?kind, seq, latest = cell.issued, "discarding stale completion");
            return false;
        }
        cell.status = outcome;
        true
    }

    pub fn status(&self, kind: OpKind) -> OpStatus {
        self.cell(kind).status
    }

    /// The derived loading aggregate: true while anything is in flight.
    pub fn any_in_flight(&self) -> bool {
        [OpKind::Upload, OpKind::Rank, OpKind::Notify, OpKind::Refresh]
            .into_iter()
            .any(|kind| self.status(kind) == OpStatus::InFlight)
    }
}
