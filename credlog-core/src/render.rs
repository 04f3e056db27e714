use crate::kind::{KindStyle, LogKind, SPECIAL_SUFFIX};

const RESET: &str = "\x1b[0m";

/// Class of output a line is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Interactive, colorized stream.
    Terminal,
    /// Uncolored stream meant for scripts.
    Plain,
    /// Per-outcome append-only files.
    File,
}

/// Turns events into the exact text written to each destination.
///
/// Rendering is pure: the timestamp is passed in and an empty string means the
/// destination receives nothing for that event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Renderer {
    colors: bool,
}

impl Renderer {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> bool {
        self.colors
    }

    pub fn render(
        &self,
        kind: LogKind,
        message: &str,
        destination: Destination,
        timestamp: i64,
    ) -> String {
        let style = kind.style();
        match destination {
            Destination::Terminal => self.tagged(style, message, timestamp),
            Destination::Plain => match (kind, style.plain_label) {
                (LogKind::GeneralInfo, _) => self.tagged(style, message, timestamp),
                (_, Some(label)) => format!("{label}: {message}{}\n", suffix(style)),
                (_, None) => String::new(),
            },
            Destination::File if kind.is_outcome() => format!("{message}{}\n", suffix(style)),
            Destination::File => String::new(),
        }
    }

    /// Fallback for event codes outside [`LogKind`].
    pub fn render_unknown(&self, destination: Destination) -> String {
        match destination {
            Destination::Terminal | Destination::Plain => "\n".into(),
            Destination::File => String::new(),
        }
    }

    fn tagged(&self, style: &KindStyle, message: &str, timestamp: i64) -> String {
        let (open, close) = if self.colors {
            (format!("\x1b[{};1m", style.color.to_fg_str()), RESET)
        } else {
            (String::new(), "")
        };
        let phrase = style.phrase.map(|p| format!("{p}: ")).unwrap_or_default();
        format!(
            "{open}{tag}[TS:{timestamp}] {phrase}{message}{suffix}{close}\n",
            tag = style.tag,
            suffix = suffix(style),
        )
    }
}

fn suffix(style: &KindStyle) -> &'static str {
    if style.special { SPECIAL_SUFFIX } else { "" }
}

/// Recovers the message from a line read back from an outcome file.
///
/// Returns `None` for diagnostic kinds, which never reach files, and for a
/// special-status line missing its suffix.
pub fn parse_file_line(kind: LogKind, line: &str) -> Option<&str> {
    if !kind.is_outcome() {
        return None;
    }
    let body = line.strip_suffix('\n').unwrap_or(line);
    if kind.style().special {
        body.strip_suffix(SPECIAL_SUFFIX)
    } else {
        Some(body)
    }
}
