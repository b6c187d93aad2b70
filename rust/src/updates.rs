use crate::link::GroupLinkState;
use crate::state::{CloseReason, SheetNotice, SheetState};
use crate::SheetAction;

#[derive(uniffi::Enum, Clone, Debug, PartialEq, Eq)]
pub enum SheetUpdate {
    /// Full snapshot after every phase or controls change.
    FullState(SheetState),
    /// One-shot toast. Not part of the snapshot so a reconnecting listener never replays it.
    Notice { rev: u64, notice: SheetNotice },
    /// Terminal; the host tears down its modal surface.
    Closed { rev: u64, reason: CloseReason },
}

impl SheetUpdate {
    pub fn rev(&self) -> u64 {
        match self {
            SheetUpdate::FullState(s) => s.rev,
            SheetUpdate::Notice { rev, .. } => *rev,
            SheetUpdate::Closed { rev, .. } => *rev,
        }
    }
}

#[derive(Debug)]
pub enum CoreMsg {
    Action(SheetAction),
    Internal(Box<InternalEvent>),
}

#[derive(Debug)]
pub enum InternalEvent {
    // Emission from the group link source. `token` identifies the subscription it came from.
    LinkStateChanged { token: u64, state: GroupLinkState },
}
