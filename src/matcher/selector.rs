use regex::Regex;

use super::compile_case_insensitive;
use super::expand_wildcards;
use crate::Result;

/// An anchored watch selector: either an exact (case-insensitive) string,
/// or a wildcard pattern where `*` matches any run of characters.
///
/// Matching is whole-string; `"CXK*"` matches `"CXK123"` but `"*CXK*"` is
/// required to match `"ACXK1"`.
#[derive(Debug, Clone)]
pub enum Selector {
    Exact(String),
    Wildcard(Regex),
}

impl Selector {
    pub fn compile(pattern: &str) -> Result<Self> {
        if !pattern.contains('*') {
            return Ok(Selector::Exact(pattern.to_uppercase()));
        }
        let expr = format!("^{}$", expand_wildcards(pattern));
        Ok(Selector::Wildcard(compile_case_insensitive(pattern, &expr)?))
    }

    pub fn matches(
        &self,
        candidate: &str,
    ) -> bool {
        if candidate.is_empty() {
            return false;
        }
        match self {
            Selector::Exact(pattern) => pattern == &candidate.to_uppercase(),
            Selector::Wildcard(regex) => regex.is_match(candidate),
        }
    }
}
