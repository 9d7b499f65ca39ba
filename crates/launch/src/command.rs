// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launch command description.

use std::path::{Path, PathBuf};

/// A fully resolved command line: program, arguments, working directory,
/// and extra environment entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDetails {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub env: Vec<(String, String)>,
}

impl CommandDetails {
    pub fn new(program: impl Into<String>) -> Self {
        CommandDetails {
            program: program.into(),
            args: Vec::new(),
            working_dir: PathBuf::from("."),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Program plus arguments as one vector, for display to clients.
    pub fn cmd_line(&self) -> Vec<String> {
        let mut line = Vec::with_capacity(1 + self.args.len());
        line.push(self.program.clone());
        line.extend(self.args.iter().cloned());
        line
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
