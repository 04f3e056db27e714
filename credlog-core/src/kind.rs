use colored::Color;

/// Appended to every line of a [`LogKind::ValidLoginSpecial`] event.
pub const SPECIAL_SUFFIX: &str = "  --  Account is Members";

const ACCT_TAG: &str = "[ACCT]";
const INFO_TAG: &str = "[INFO]";

/// Kind of a logged event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    /// The credential pair logs in.
    ValidLogin,
    /// The credential pair logs in and the account has special status.
    ValidLoginSpecial,
    /// The credential pair is correct but the account is locked.
    LockedLogin,
    /// The credential pair is rejected.
    InvalidLogin,
    /// Freeform diagnostic.
    GeneralInfo,
    /// Freeform diagnostic, only shown in verbose mode.
    DebugInfo,
}

/// Display attributes of a [`LogKind`].
#[derive(Debug)]
pub struct KindStyle {
    pub color: Color,
    pub tag: &'static str,
    /// Phrase placed before the message on the terminal.
    pub phrase: Option<&'static str>,
    /// Label used on the plain stream. `None` for diagnostics.
    pub plain_label: Option<&'static str>,
    /// Whether [`SPECIAL_SUFFIX`] is appended.
    pub special: bool,
}

// Indexed by `LogKind as usize`.
static STYLES: [KindStyle; 6] = [
    KindStyle {
        color: Color::Green,
        tag: ACCT_TAG,
        phrase: Some("Login works"),
        plain_label: Some("Works"),
        special: false,
    },
    KindStyle {
        color: Color::Green,
        tag: ACCT_TAG,
        phrase: Some("Login works"),
        plain_label: Some("Works"),
        special: true,
    },
    KindStyle {
        color: Color::Yellow,
        tag: ACCT_TAG,
        phrase: Some("Login works, however it is locked"),
        plain_label: Some("Locked"),
        special: false,
    },
    KindStyle {
        color: Color::Red,
        tag: ACCT_TAG,
        phrase: Some("Login doesn't work"),
        plain_label: Some("Invalid"),
        special: false,
    },
    KindStyle {
        color: Color::Black,
        tag: INFO_TAG,
        phrase: None,
        plain_label: None,
        special: false,
    },
    KindStyle {
        color: Color::Black,
        tag: INFO_TAG,
        phrase: None,
        plain_label: None,
        special: false,
    },
];

impl LogKind {
    pub const ALL: [LogKind; 6] = [
        LogKind::ValidLogin,
        LogKind::ValidLoginSpecial,
        LogKind::LockedLogin,
        LogKind::InvalidLogin,
        LogKind::GeneralInfo,
        LogKind::DebugInfo,
    ];

    pub fn style(self) -> &'static KindStyle {
        &STYLES[self as usize]
    }

    /// True for the four credential outcomes.
    pub fn is_outcome(self) -> bool {
        !matches!(self, LogKind::GeneralInfo | LogKind::DebugInfo)
    }

    /// True for outcomes that pass the valid-only filter.
    pub fn is_valid(self) -> bool {
        matches!(self, LogKind::ValidLogin | LogKind::ValidLoginSpecial)
    }

    /// Numeric event code, as sent by producers that do not link this crate's types.
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }
}
