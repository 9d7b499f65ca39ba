// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Severity-tagged outcome type.
//!
//! Every operation in the daemon — lifecycle transitions, jobs, publish
//! calls, workflow steps — reports its result as a [`Status`] so that
//! clients branch on severity rather than on the absence of a value.

use serde::{Deserialize, Serialize};

/// Outcome severity. Serializes as its fixed wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Severity {
    Ok,
    Info,
    Warning,
    Error,
    Cancel,
}

impl From<Severity> for i32 {
    fn from(severity: Severity) -> i32 {
        severity.code()
    }
}

impl TryFrom<i32> for Severity {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, String> {
        Severity::from_code(code).ok_or_else(|| format!("invalid severity code {code}"))
    }
}

impl Severity {
    /// Fixed wire code for this severity.
    pub fn code(self) -> i32 {
        match self {
            Severity::Ok => 0,
            Severity::Info => 1,
            Severity::Warning => 2,
            Severity::Error => 4,
            Severity::Cancel => 8,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Severity::Ok),
            1 => Some(Severity::Info),
            2 => Some(Severity::Warning),
            4 => Some(Severity::Error),
            8 => Some(Severity::Cancel),
            _ => None,
        }
    }
}

crate::simple_display! {
    Severity {
        Ok => "ok",
        Info => "info",
        Warning => "warning",
        Error => "error",
        Cancel => "cancel",
    }
}

/// A severity plus a human-readable message.
///
/// Invariants: an `Error` carries a non-empty message; a `Cancel` may carry
/// an empty one (and a cancel workflow response carries no items).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub severity: Severity,
    pub message: String,
}

impl Status {
    pub fn ok() -> Self {
        Status { severity: Severity::Ok, message: "ok".to_string() }
    }

    pub fn ok_with(message: impl Into<String>) -> Self {
        Status { severity: Severity::Ok, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Status { severity: Severity::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Status { severity: Severity::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Status { severity: Severity::Error, message: message.into() }
    }

    pub fn cancel() -> Self {
        Status { severity: Severity::Cancel, message: String::new() }
    }

    pub fn is_ok(&self) -> bool {
        self.severity == Severity::Ok
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.severity)
        } else {
            write!(f, "{}: {}", self.severity, self.message)
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
