//! Watch selector matching.
//!
//! Selectors come in two shapes: anchored wildcard selectors for callsign
//! and aircraft-type watches, and keyword selectors searched across free
//! text. All comparisons are case-insensitive; both sides are uppercased
//! before comparison. An empty candidate never matches anything.

mod keyword;
mod selector;

pub use keyword::*;
pub use selector::*;

#[cfg(test)]
mod selector_test;

use regex::Regex;
use regex::RegexBuilder;

use crate::PatternError;
use crate::Result;

/// Expands `*` to "zero or more of any character" over the regex-escaped
/// pattern. Everything else in the pattern is literal.
pub(crate) fn expand_wildcards(pattern: &str) -> String {
    regex::escape(pattern).replace(r"\*", ".*")
}

pub(crate) fn compile_case_insensitive(
    pattern: &str,
    expr: &str,
) -> Result<Regex> {
    RegexBuilder::new(expr)
        .case_insensitive(true)
        .build()
        .map_err(|source| {
            PatternError::Invalid {
                pattern: pattern.to_string(),
                source,
            }
            .into()
        })
}
