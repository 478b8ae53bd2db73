// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error handling for the SYMLS interpreter
//!
//! Every fatal condition belongs to a small closed taxonomy. Errors are
//! built at the point of failure with the line counter and the resolved
//! (possibly reconfigured) message text, so rendering one is exactly the
//! report the interpreter prints.

use thiserror::Error;

/// The closed set of fatal interpreter error kinds.
///
/// `RecursionLimit` backs the explicit statement-recursion bound; unlike
/// the other kinds its message text cannot be rebound from the
/// configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSyntax,
    InvalidDataType,
    InvalidOperator,
    VariableNotFound,
    IndexOutOfBounds,
    InvalidName,
    RecursionLimit,
}

impl ErrorKind {
    /// Kinds whose message text can be rebound via `errorMessages.*`.
    pub const CONFIGURABLE: [ErrorKind; 6] = [
        ErrorKind::InvalidSyntax,
        ErrorKind::InvalidDataType,
        ErrorKind::InvalidOperator,
        ErrorKind::VariableNotFound,
        ErrorKind::IndexOutOfBounds,
        ErrorKind::InvalidName,
    ];

    /// Message used when the configuration does not override it.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::InvalidSyntax => "Invalid syntax",
            ErrorKind::InvalidDataType => "Invalid data type",
            ErrorKind::InvalidOperator => "Invalid operator",
            ErrorKind::VariableNotFound => "Variable not found",
            ErrorKind::IndexOutOfBounds => "Index out of bounds",
            ErrorKind::InvalidName => "Invalid name",
            ErrorKind::RecursionLimit => "Recursion limit exceeded",
        }
    }
}

/// A fatal interpreter error.
///
/// The `Display` form is the exact two-line report the interpreter
/// emits before giving up on the program (or, in the REPL, on the
/// current line).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error at line : {line}\n{message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub line: usize,
    pub message: String,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format() {
        let error = RuntimeError::new(ErrorKind::InvalidSyntax, 7, "Invalid syntax");
        assert_eq!(error.to_string(), "Error at line : 7\nInvalid syntax");
    }

    #[test]
    fn test_default_messages_cover_taxonomy() {
        for kind in ErrorKind::CONFIGURABLE {
            assert!(!kind.default_message().is_empty());
        }
        assert_eq!(
            ErrorKind::RecursionLimit.default_message(),
            "Recursion limit exceeded"
        );
    }
}
