use std::str::FromStr;

use crate::error::Error;

/// Baseline recognition language used when the caller does not pick one.
pub const DEFAULT_LANG: &str = "eng";

/// Detection level requested from the engine.
///
/// `Line` groups words into a text line, `Word` isolates individual tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Line,
    Word,
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "line" | "textline" => Ok(Self::Line),
            "word" => Ok(Self::Word),
            other => Err(Error::Config(format!(
                "unknown granularity `{other}`, expected `line` or `word`"
            ))),
        }
    }
}
