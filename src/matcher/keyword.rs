use regex::Regex;

use super::compile_case_insensitive;
use super::expand_wildcards;
use crate::Result;

/// A keyword selector searched across broadcast text, remarks and routes.
///
/// Without a wildcard the keyword only matches on word boundaries, so
/// `"FAKE"` does not match `"FAKENAME"`. With a wildcard the expanded
/// pattern may match anywhere in the text.
#[derive(Debug, Clone)]
pub struct Keyword {
    regex: Regex,
}

impl Keyword {
    pub fn compile(keyword: &str) -> Result<Self> {
        let expr = if keyword.contains('*') {
            expand_wildcards(keyword)
        } else {
            format!(r"\b{}\b", regex::escape(keyword))
        };
        Ok(Self {
            regex: compile_case_insensitive(keyword, &expr)?,
        })
    }

    pub fn matches(
        &self,
        text: &str,
    ) -> bool {
        if text.is_empty() {
            return false;
        }
        self.regex.is_match(text)
    }
}
