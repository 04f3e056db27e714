use std::io::{self, IsTerminal};

use derive_from_env::FromEnv;

use crate::error::LogError;

#[derive(FromEnv)]
#[from_env(prefix = "CREDLOG")]
#[allow(non_snake_case)]
struct EnvConfig {
    #[from_env(default = "false")]
    VERBOSE: bool,
    #[from_env(default = "false")]
    PLAIN_OUTPUT: bool,
    #[from_env(default = "false")]
    VALID_ONLY: bool,
}

/// Output settings shared by every logging call. Fixed once the dispatcher is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Emit debug events on the terminal.
    pub verbose: bool,
    /// Send human-facing events to the plain stream instead of the terminal.
    pub plain_output: bool,
    /// Keep only valid outcomes on the human-facing streams.
    pub valid_only: bool,
    /// Wrap tagged lines in ANSI color escapes.
    pub colors: bool,
}

impl OutputConfig {
    /// Reads `CREDLOG_VERBOSE`, `CREDLOG_PLAIN_OUTPUT` and `CREDLOG_VALID_ONLY`.
    /// Colors follow [`OutputConfig::detect_colors`] for stderr, the terminal stream.
    pub fn from_env() -> Result<Self, LogError> {
        let env = EnvConfig::from_env().map_err(|err| LogError::Config(format!("{err:?}")))?;
        Ok(Self {
            verbose: env.VERBOSE,
            plain_output: env.PLAIN_OUTPUT,
            valid_only: env.VALID_ONLY,
            colors: Self::detect_colors(&io::stderr()),
        })
    }

    /// Whether lines written to `stream` should be colored.
    ///
    /// Same rules as `colored`: `CLICOLOR_FORCE` (not `0`) forces colors,
    /// `NO_COLOR` disables them, `CLICOLOR=0` disables them, otherwise colors
    /// are on when `stream` is a terminal.
    pub fn detect_colors<S: IsTerminal>(stream: &S) -> bool {
        colors_enabled(stream.is_terminal(), |name| std::env::var(name).ok())
    }
}

fn colors_enabled(is_terminal: bool, var: impl Fn(&str) -> Option<String>) -> bool {
    if var("CLICOLOR_FORCE").is_some_and(|v| v != "0") {
        return true;
    }
    if var("NO_COLOR").is_some() {
        return false;
    }
    var("CLICOLOR").is_none_or(|v| v != "0") && is_terminal
}
