#[derive(uniffi::Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetAction {
    CopyLink,
    ShareExternally,

    // Reserved affordances, hidden unless enabled in config. Both only dismiss.
    ShareInApp,
    ShowQrCode,

    // Swipe-away, back press, or host-side cancellation.
    Dismiss,
}

impl SheetAction {
    pub fn tag(&self) -> &'static str {
        match self {
            SheetAction::CopyLink => "CopyLink",
            SheetAction::ShareExternally => "ShareExternally",
            SheetAction::ShareInApp => "ShareInApp",
            SheetAction::ShowQrCode => "ShowQrCode",
            SheetAction::Dismiss => "Dismiss",
        }
    }
}
