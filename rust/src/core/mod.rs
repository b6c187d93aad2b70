mod config;

use std::sync::{Arc, RwLock};

use flume::Sender;

pub use config::SheetConfig;
pub(crate) use config::load_sheet_config;

use crate::actions::SheetAction;
use crate::group_id::GroupIdV2;
use crate::link::{GroupLinkSource, GroupLinkState, LinkSubscription};
use crate::sharing::{SharePayload, SharingSurface};
use crate::state::{CloseReason, SheetControls, SheetNotice, SheetPhase, SheetState};
use crate::updates::{CoreMsg, InternalEvent, SheetUpdate};

/// Single-threaded state machine behind one group link sheet.
///
/// Every input (user actions and link emissions) arrives as a `CoreMsg` on the owning thread,
/// so no locking is needed beyond publishing snapshots to `shared_state`.
pub(crate) struct SheetCore {
    state: SheetState,
    rev: u64,
    group_id: GroupIdV2,
    config: SheetConfig,

    // Last observed link while Active. Actions always read the latest emission.
    link: Option<GroupLinkState>,
    subscription: Option<LinkSubscription>,

    surface: Arc<dyn SharingSurface>,
    update_sender: Sender<SheetUpdate>,
    shared_state: Arc<RwLock<SheetState>>,
}

impl SheetCore {
    pub fn new(
        group_id: GroupIdV2,
        config: SheetConfig,
        source: Arc<dyn GroupLinkSource>,
        surface: Arc<dyn SharingSurface>,
        update_sender: Sender<SheetUpdate>,
        core_sender: Sender<CoreMsg>,
        shared_state: Arc<RwLock<SheetState>>,
    ) -> Self {
        let mut this = Self {
            state: SheetState::opening(group_id.to_string()),
            rev: 0,
            group_id,
            config,
            link: None,
            subscription: None,
            surface,
            update_sender,
            shared_state,
        };

        this.subscription = Some(LinkSubscription::start(
            source,
            &this.group_id,
            core_sender,
        ));
        this.state.phase = SheetPhase::Waiting;
        tracing::info!(group_id = %this.group_id, "group link sheet waiting for link state");
        this.emit_state();
        this
    }

    pub fn phase(&self) -> SheetPhase {
        self.state.phase
    }

    pub fn is_closed(&self) -> bool {
        self.state.phase == SheetPhase::Closed
    }

    pub fn handle_message(&mut self, msg: CoreMsg) {
        match msg {
            CoreMsg::Action(action) => self.handle_action(action),
            CoreMsg::Internal(internal) => self.handle_internal(*internal),
        }
    }

    fn handle_internal(&mut self, internal: InternalEvent) {
        match internal {
            InternalEvent::LinkStateChanged { token, state } => {
                self.handle_link_state(token, state)
            }
        }
    }

    fn handle_link_state(&mut self, token: u64, link: GroupLinkState) {
        let current = self.subscription.as_ref().map(LinkSubscription::token);
        if current != Some(token) || self.state.phase.is_terminal() {
            tracing::debug!(token, ?current, phase = ?self.state.phase, "ignoring stale link state");
            return;
        }

        if !link.enabled {
            self.reject();
            return;
        }

        self.link = Some(link);
        match self.state.phase {
            SheetPhase::Waiting => {
                self.state.phase = SheetPhase::Active;
                self.state.controls = SheetControls::active(&self.config);
                tracing::info!(group_id = %self.group_id, "group link active");
                self.emit_state();
            }
            // Buttons stay as they are; only the bound url changes.
            SheetPhase::Active => tracing::debug!("group link url refreshed"),
            SheetPhase::Opening | SheetPhase::Rejected | SheetPhase::Closed => {}
        }
    }

    fn handle_action(&mut self, action: SheetAction) {
        tracing::info!(action = action.tag(), phase = ?self.state.phase, "sheet action");

        if action == SheetAction::Dismiss {
            if !self.state.phase.is_terminal() {
                self.close(CloseReason::Dismissed);
            }
            return;
        }

        let Some(url) = self.active_url() else {
            tracing::warn!(
                action = action.tag(),
                phase = ?self.state.phase,
                "sheet action ignored outside Active"
            );
            return;
        };

        match action {
            SheetAction::CopyLink => {
                self.surface.copy_to_clipboard(url);
                self.emit_notice(SheetNotice::CopiedToClipboard);
                self.close(CloseReason::CopiedLink);
            }
            SheetAction::ShareExternally => {
                SharePayload::plain_text(url).open_with(self.surface.as_ref());
                self.close(CloseReason::SharedExternally);
            }
            // Not implemented yet; the buttons only dismiss, and only when shown.
            SheetAction::ShareInApp | SheetAction::ShowQrCode => {
                if !self.reserved_control_visible(action) {
                    tracing::warn!(action = action.tag(), "hidden sheet control ignored");
                    return;
                }
                self.close(CloseReason::Dismissed);
            }
            SheetAction::Dismiss => {}
        }
    }

    fn reserved_control_visible(&self, action: SheetAction) -> bool {
        match action {
            SheetAction::ShareInApp => self.state.controls.share_in_app,
            SheetAction::ShowQrCode => self.state.controls.show_qr_code,
            SheetAction::CopyLink | SheetAction::ShareExternally | SheetAction::Dismiss => true,
        }
    }

    fn active_url(&self) -> Option<String> {
        if self.state.phase != SheetPhase::Active {
            return None;
        }
        self.link.as_ref().map(|l| l.url.clone())
    }

    fn reject(&mut self) {
        tracing::info!(group_id = %self.group_id, "group link not active; closing sheet");
        self.cancel_subscription();
        self.state.phase = SheetPhase::Rejected;
        self.state.controls = SheetControls::hidden();
        self.emit_state();
        self.emit_notice(SheetNotice::LinkNotActive);
        self.close(CloseReason::LinkDisabled);
    }

    fn close(&mut self, reason: CloseReason) {
        self.cancel_subscription();
        self.link = None;
        self.state.phase = SheetPhase::Closed;
        self.state.controls = SheetControls::hidden();
        tracing::info!(group_id = %self.group_id, ?reason, "group link sheet closed");
        self.emit_state();
        let rev = self.next_rev();
        self.commit_state_snapshot();
        let _ = self.update_sender.send(SheetUpdate::Closed { rev, reason });
    }

    fn cancel_subscription(&mut self) {
        if let Some(mut sub) = self.subscription.take() {
            sub.cancel();
        }
    }

    fn next_rev(&mut self) -> u64 {
        self.rev += 1;
        self.state.rev = self.rev;
        self.rev
    }

    fn commit_state_snapshot(&self) {
        match self.shared_state.write() {
            Ok(mut g) => *g = self.state.clone(),
            Err(poison) => *poison.into_inner() = self.state.clone(),
        }
    }

    fn emit_state(&mut self) {
        self.next_rev();
        self.commit_state_snapshot();
        let _ = self
            .update_sender
            .send(SheetUpdate::FullState(self.state.clone()));
    }

    fn emit_notice(&mut self, notice: SheetNotice) {
        let rev = self.next_rev();
        self.commit_state_snapshot();
        let _ = self.update_sender.send(SheetUpdate::Notice { rev, notice });
    }
}

impl Drop for SheetCore {
    fn drop(&mut self) {
        self.cancel_subscription();
    }
}
