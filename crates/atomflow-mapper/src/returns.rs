//! Return-value usage tracking

use atomflow_atom::{Atom, CallSite};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Why a return value was judged used or unused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnUsageReason {
    /// Callee produces no return output
    NoReturn,
    /// Caller has no source text to inspect
    NoSource,
    /// Result is bound to a variable
    Assigned,
    /// Callee name appears in the caller without an assignment
    DirectUsage,
    Unused,
}

/// A later line that reads the bound result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSite {
    pub line: u32,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnUsage {
    pub is_used: bool,
    pub reason: ReturnUsageReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub usages: Vec<UsageSite>,
}

impl ReturnUsage {
    fn unused(reason: ReturnUsageReason) -> Self {
        Self {
            is_used: false,
            reason,
            assigned_to: None,
            usages: Vec::new(),
        }
    }

    /// Number of distinct later reads of the bound result
    pub fn usage_count(&self) -> usize {
        self.usages.len()
    }
}

/// Decides whether a caller consumes a callee's return value
pub trait ReturnUsageHeuristic: Send + Sync {
    fn track(&self, caller: &Atom, callee: &Atom, call: &CallSite) -> ReturnUsage;
}

/// Text scan over the caller's source
///
/// Looks for `const|let|var NAME = [await] callee` and then for later lines
/// mentioning `NAME`. Lines are numbered from the caller's start line so
/// they compare against the call site's line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceText;

impl ReturnUsageHeuristic for SourceText {
    fn track(&self, caller: &Atom, callee: &Atom, call: &CallSite) -> ReturnUsage {
        if !callee.has_return() {
            return ReturnUsage::unused(ReturnUsageReason::NoReturn);
        }
        let Some(source) = caller.source.as_deref() else {
            return ReturnUsage::unused(ReturnUsageReason::NoSource);
        };

        let assignment = match assignment_pattern(&callee.name) {
            Ok(re) => re,
            Err(err) => {
                warn!(callee = %callee.name, error = %err, "could not build assignment pattern");
                return ReturnUsage::unused(ReturnUsageReason::Unused);
            }
        };

        let lines: Vec<(u32, &str)> = source
            .lines()
            .enumerate()
            .map(|(idx, text)| {
                let offset = u32::try_from(idx).unwrap_or(u32::MAX);
                (caller.line.saturating_add(offset), text)
            })
            .collect();

        let bound = lines
            .iter()
            .filter_map(|(line, text)| {
                let caps = assignment.captures(text)?;
                Some((*line, caps.get(1)?.as_str()))
            })
            .min_by_key(|(line, _)| (*line != call.line, *line));

        match bound {
            Some((line, variable)) => {
                let after = line.max(call.line);
                ReturnUsage {
                    is_used: true,
                    reason: ReturnUsageReason::Assigned,
                    assigned_to: Some(variable.to_string()),
                    usages: later_reads(&lines, variable, after),
                }
            }
            None if source.contains(callee.name.as_str()) => ReturnUsage {
                is_used: true,
                reason: ReturnUsageReason::DirectUsage,
                assigned_to: None,
                usages: Vec::new(),
            },
            None => ReturnUsage::unused(ReturnUsageReason::Unused),
        }
    }
}

fn assignment_pattern(callee: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:await\s+)?{}\b",
        regex::escape(callee)
    ))
}

/// Lines after `after` that mention `variable` as a whole word
fn later_reads(lines: &[(u32, &str)], variable: &str, after: u32) -> Vec<UsageSite> {
    lines
        .iter()
        .filter(|(line, text)| *line > after && mentions(text, variable))
        .map(|(line, text)| UsageSite {
            line: *line,
            context: text.trim().to_string(),
        })
        .collect()
}

fn mentions(text: &str, word: &str) -> bool {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
    text.match_indices(word).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + word.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}
