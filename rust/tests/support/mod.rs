//! Shared fakes for driving `FfiGroupLinkSheet` the way a native host would.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use grouplink_core::{
    GroupLinkSink, GroupLinkSource, GroupLinkState, SharingSurface, SheetReconciler, SheetUpdate,
};

pub fn wait_until(what: &str, timeout: Duration, mut f: impl FnMut() -> bool) {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if f() {
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!("{what}: condition not met within {timeout:?}");
}

pub fn v2_group_id(byte: u8) -> String {
    format!("__textsecure_group__!{}", format!("{byte:02x}").repeat(32))
}

#[derive(Clone, Default)]
pub struct LiveLink {
    pub observed: Arc<Mutex<Vec<String>>>,
    pub cancelled: Arc<Mutex<Vec<(String, u64)>>>,
    sink: Arc<Mutex<Option<Arc<GroupLinkSink>>>>,
    initial: Arc<Mutex<Option<GroupLinkState>>>,
}

impl LiveLink {
    /// A source that emits `state` synchronously from `observe`, like a cached live value.
    pub fn with_initial(url: &str, enabled: bool) -> Self {
        let this = Self::default();
        *this.initial.lock().unwrap() = Some(GroupLinkState {
            url: url.to_string(),
            enabled,
        });
        this
    }

    pub fn emit(&self, url: &str, enabled: bool) {
        let sink = self.sink.lock().unwrap().clone().expect("not observed yet");
        sink.emit(GroupLinkState {
            url: url.to_string(),
            enabled,
        });
    }

    pub fn is_observed(&self) -> bool {
        self.sink.lock().unwrap().is_some()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancelled.lock().unwrap().len()
    }
}

impl GroupLinkSource for LiveLink {
    fn observe(&self, group_id: String, sink: Arc<GroupLinkSink>) {
        self.observed.lock().unwrap().push(group_id);
        if let Some(initial) = self.initial.lock().unwrap().clone() {
            sink.emit(initial);
        }
        *self.sink.lock().unwrap() = Some(sink);
    }

    fn cancel(&self, group_id: String, subscription_id: u64) {
        self.cancelled
            .lock()
            .unwrap()
            .push((group_id, subscription_id));
    }
}

/// Host that fans one live value out to every sheet observing a group, the way a shared
/// group repository would, and tears down only the subscription named in `cancel`.
#[derive(Clone, Default)]
pub struct SharedGroupHost {
    sinks: Arc<Mutex<HashMap<String, Vec<Arc<GroupLinkSink>>>>>,
}

impl SharedGroupHost {
    pub fn emit_all(&self, group_id: &str, url: &str, enabled: bool) {
        let sinks = self
            .sinks
            .lock()
            .unwrap()
            .get(group_id)
            .cloned()
            .unwrap_or_default();
        for sink in sinks {
            sink.emit(GroupLinkState {
                url: url.to_string(),
                enabled,
            });
        }
    }

    pub fn live_count(&self, group_id: &str) -> usize {
        self.sinks
            .lock()
            .unwrap()
            .get(group_id)
            .map_or(0, Vec::len)
    }
}

impl GroupLinkSource for SharedGroupHost {
    fn observe(&self, group_id: String, sink: Arc<GroupLinkSink>) {
        self.sinks
            .lock()
            .unwrap()
            .entry(group_id)
            .or_default()
            .push(sink);
    }

    fn cancel(&self, group_id: String, subscription_id: u64) {
        if let Some(sinks) = self.sinks.lock().unwrap().get_mut(&group_id) {
            sinks.retain(|s| s.subscription_id() != subscription_id);
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingSurface {
    pub clipboard: Arc<Mutex<Vec<String>>>,
    pub chooser: Arc<Mutex<Vec<(String, String)>>>,
}

impl SharingSurface for RecordingSurface {
    fn copy_to_clipboard(&self, text: String) {
        self.clipboard.lock().unwrap().push(text);
    }

    fn open_share_chooser(&self, mime_type: String, text: String) {
        self.chooser.lock().unwrap().push((mime_type, text));
    }
}

#[derive(Clone, Default)]
pub struct Collector {
    pub updates: Arc<Mutex<Vec<SheetUpdate>>>,
}

impl Collector {
    pub fn snapshot(&self) -> Vec<SheetUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn saw_close(&self) -> bool {
        self.updates
            .lock()
            .unwrap()
            .iter()
            .any(|u| matches!(u, SheetUpdate::Closed { .. }))
    }
}

impl SheetReconciler for Collector {
    fn reconcile(&self, update: SheetUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}
