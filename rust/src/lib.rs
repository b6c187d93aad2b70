mod actions;
mod core;
mod group_id;
mod link;
mod logging;
mod sharing;
mod state;
mod updates;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::thread;

use flume::{Receiver, Sender};

pub use actions::SheetAction;
pub use group_id::*;
pub use link::{GroupLinkSink, GroupLinkSource, GroupLinkState};
pub use sharing::{SharePayload, SharingSurface, TEXT_PLAIN};
pub use state::*;
pub use updates::SheetUpdate;

use crate::updates::CoreMsg;

uniffi::setup_scaffolding!();

#[uniffi::export(callback_interface)]
pub trait SheetReconciler: Send + Sync + 'static {
    fn reconcile(&self, update: SheetUpdate);
}

#[uniffi::export]
pub fn notice_text(notice: SheetNotice) -> String {
    notice.default_text().to_string()
}

/// One open group link sheet. Drop (or `Dismiss`) tears down the link subscription.
#[derive(uniffi::Object)]
pub struct FfiGroupLinkSheet {
    core_tx: Sender<CoreMsg>,
    update_rx: Receiver<SheetUpdate>,
    listening: AtomicBool,
    shared_state: Arc<RwLock<SheetState>>,
}

#[uniffi::export]
impl FfiGroupLinkSheet {
    /// Fails before any subscription exists if `group_id` is malformed or not a v2 group.
    #[uniffi::constructor]
    pub fn open(
        group_id: String,
        data_dir: String,
        source: Box<dyn GroupLinkSource>,
        surface: Box<dyn SharingSurface>,
    ) -> Result<Arc<Self>, InvalidGroupIdError> {
        let loaded = crate::core::load_sheet_config(&data_dir);
        logging::init_logging(loaded.as_ref().ok().and_then(|c| c.log_filter.as_deref()));
        let config = loaded.unwrap_or_else(|e| {
            tracing::warn!(err = %format!("{e:#}"), "failed to load sheet config; using defaults");
            crate::core::SheetConfig::default()
        });

        let group_id = GroupIdV2::parse(&group_id).map_err(|e| {
            tracing::warn!(%e, "refusing to open group link sheet");
            e
        })?;
        tracing::info!(group_id = %group_id, "FfiGroupLinkSheet::open()");

        let (update_tx, update_rx) = flume::unbounded();
        let (core_tx, core_rx) = flume::unbounded::<CoreMsg>();
        let shared_state = Arc::new(RwLock::new(SheetState::opening(group_id.to_string())));
        let source: Arc<dyn GroupLinkSource> = Arc::from(source);
        let surface: Arc<dyn SharingSurface> = Arc::from(surface);

        // Actor thread: the sheet's single "UI thread". Actions and link emissions are
        // serialized through `core_rx`.
        let core_tx_for_core = core_tx.clone();
        let shared_for_core = shared_state.clone();
        thread::spawn(move || {
            let mut core = crate::core::SheetCore::new(
                group_id,
                config,
                source,
                surface,
                update_tx,
                core_tx_for_core,
                shared_for_core,
            );
            while let Ok(msg) = core_rx.recv() {
                core.handle_message(msg);
                if core.is_closed() {
                    break;
                }
            }
            tracing::debug!(phase = ?core.phase(), "group link sheet actor exiting");
        });

        Ok(Arc::new(Self {
            core_tx,
            update_rx,
            listening: AtomicBool::new(false),
            shared_state,
        }))
    }

    pub fn state(&self) -> SheetState {
        match self.shared_state.read() {
            Ok(g) => g.clone(),
            Err(poison) => poison.into_inner().clone(),
        }
    }

    pub fn dispatch(&self, action: SheetAction) {
        // Contract: never block caller. After close the actor is gone and this is a no-op.
        let _ = self.core_tx.send(CoreMsg::Action(action));
    }

    pub fn listen_for_updates(&self, reconciler: Box<dyn SheetReconciler>) {
        if self
            .listening
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            // Avoid multiple listeners that would split updates.
            return;
        }

        let rx = self.update_rx.clone();
        thread::spawn(move || {
            while let Ok(update) = rx.recv() {
                reconciler.reconcile(update);
            }
        });
    }
}

impl Drop for FfiGroupLinkSheet {
    fn drop(&mut self) {
        let _ = self.core_tx.send(CoreMsg::Action(SheetAction::Dismiss));
    }
}
