pub const TEXT_PLAIN: &str = "text/plain";

/// Platform clipboard and share chooser. Calls are best effort; failures stay on the
/// platform side.
#[uniffi::export(callback_interface)]
pub trait SharingSurface: Send + Sync + 'static {
    fn copy_to_clipboard(&self, text: String);
    fn open_share_chooser(&self, mime_type: String, text: String);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharePayload {
    pub mime_type: &'static str,
    pub text: String,
}

impl SharePayload {
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self {
            mime_type: TEXT_PLAIN,
            text: text.into(),
        }
    }

    pub(crate) fn open_with(self, surface: &dyn SharingSurface) {
        surface.open_share_chooser(self.mime_type.to_string(), self.text);
    }
}
