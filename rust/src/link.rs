use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use flume::Sender;

use crate::group_id::GroupIdV2;
use crate::updates::{CoreMsg, InternalEvent};

#[derive(uniffi::Record, Clone, PartialEq, Eq)]
pub struct GroupLinkState {
    pub url: String,
    pub enabled: bool,
}

// Invite urls grant join access; keep them out of logs.
impl std::fmt::Debug for GroupLinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupLinkState")
            .field("url", &"<redacted>")
            .field("enabled", &self.enabled)
            .finish()
    }
}

// Process-wide so two sheets on the same group never share a subscription id.
static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

fn next_subscription_id() -> u64 {
    NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed)
}

/// Host-side provider of live group link state.
///
/// `observe` must keep emitting into `sink` until `cancel` is called with that sink's
/// `subscription_id()`. Several subscriptions for the same group may be live at once; `cancel`
/// tears down only the one it names. Emitting synchronously from inside `observe` is allowed.
#[uniffi::export(callback_interface)]
pub trait GroupLinkSource: Send + Sync + 'static {
    fn observe(&self, group_id: String, sink: Arc<GroupLinkSink>);
    fn cancel(&self, group_id: String, subscription_id: u64);
}

/// Write end of one link subscription. Emissions after the subscription is cancelled are
/// dropped here and never reach the sheet core.
#[derive(uniffi::Object)]
pub struct GroupLinkSink {
    core_tx: Sender<CoreMsg>,
    token: u64,
    closed: AtomicBool,
}

impl GroupLinkSink {
    pub(crate) fn new(core_tx: Sender<CoreMsg>, token: u64) -> Self {
        Self {
            core_tx,
            token,
            closed: AtomicBool::new(false),
        }
    }

    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[uniffi::export]
impl GroupLinkSink {
    pub fn emit(&self, state: GroupLinkState) {
        if self.is_closed() {
            tracing::debug!(token = self.token, "link emission after cancel; dropped");
            return;
        }
        // Contract: never block the source. A dropped core means the sheet is gone.
        let _ = self
            .core_tx
            .send(CoreMsg::Internal(Box::new(InternalEvent::LinkStateChanged {
                token: self.token,
                state,
            })));
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn subscription_id(&self) -> u64 {
        self.token
    }
}

/// Owned handle for an active `observe` call. Cancels on drop.
pub(crate) struct LinkSubscription {
    group_id: String,
    sink: Arc<GroupLinkSink>,
    source: Arc<dyn GroupLinkSource>,
    cancelled: bool,
}

impl LinkSubscription {
    pub(crate) fn start(
        source: Arc<dyn GroupLinkSource>,
        group_id: &GroupIdV2,
        core_tx: Sender<CoreMsg>,
    ) -> Self {
        let group_id = group_id.to_string();
        let token = next_subscription_id();
        let sink = Arc::new(GroupLinkSink::new(core_tx, token));
        tracing::debug!(group_id = %group_id, token, "observing group link");
        source.observe(group_id.clone(), sink.clone());
        Self {
            group_id,
            sink,
            source,
            cancelled: false,
        }
    }

    pub(crate) fn token(&self) -> u64 {
        self.sink.token
    }

    pub(crate) fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.sink.close();
        tracing::debug!(group_id = %self.group_id, token = self.sink.token, "cancelling group link subscription");
        self.source
            .cancel(self.group_id.clone(), self.sink.subscription_id());
    }
}

impl Drop for LinkSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
