use crate::core::SheetConfig;

#[derive(uniffi::Enum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SheetPhase {
    /// Group id parsed, subscription not yet established.
    Opening,
    /// Subscribed; no link state observed yet. No controls are shown.
    Waiting,
    Active,
    /// The link was observed disabled. Always followed by `Closed`.
    Rejected,
    Closed,
}

impl SheetPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Closed)
    }
}

/// Which sheet buttons are visible and interactive.
#[derive(uniffi::Record, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SheetControls {
    pub copy_link: bool,
    pub share_externally: bool,
    pub share_in_app: bool,
    pub show_qr_code: bool,
}

impl SheetControls {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub(crate) fn active(config: &SheetConfig) -> Self {
        Self {
            copy_link: true,
            share_externally: true,
            share_in_app: config.share_in_app_enabled,
            show_qr_code: config.show_qr_code_enabled,
        }
    }

    pub fn any(&self) -> bool {
        self.copy_link || self.share_externally || self.share_in_app || self.show_qr_code
    }
}

#[derive(uniffi::Record, Clone, Debug, PartialEq, Eq)]
pub struct SheetState {
    pub rev: u64,
    pub group_id: String,
    pub phase: SheetPhase,
    pub controls: SheetControls,
}

impl SheetState {
    pub fn opening(group_id: String) -> Self {
        Self {
            rev: 0,
            group_id,
            phase: SheetPhase::Opening,
            controls: SheetControls::hidden(),
        }
    }
}

/// Short transient messages the host shows as a toast.
#[derive(uniffi::Enum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SheetNotice {
    LinkNotActive,
    CopiedToClipboard,
}

impl SheetNotice {
    pub fn default_text(self) -> &'static str {
        match self {
            Self::LinkNotActive => "The link is not currently active",
            Self::CopiedToClipboard => "Copied to clipboard",
        }
    }
}

#[derive(uniffi::Enum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseReason {
    LinkDisabled,
    CopiedLink,
    SharedExternally,
    Dismissed,
}
