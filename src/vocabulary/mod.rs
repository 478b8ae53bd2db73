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

//! Keyword, operator, and data-type vocabulary
//!
//! SYMLS has no fixed token set baked into the interpreter: every
//! keyword, operator, data type, and error message has a single active
//! spelling that the startup configuration may rebind. The rest of the
//! interpreter only ever consults this table, never literal strings.

use crate::error::ErrorKind;
use std::collections::HashMap;

/// Statement and structure keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Let,
    Is,
    If,
    Else,
    Then,
    Skip,
    Stop,
    Do,
    While,
    Escape,
    Recheck,
    TillHere,
    And,
    Goto,
    Read,
    Print,
    Newline,
    Leave,
    End,
    Subroutine,
}

impl Keyword {
    pub const ALL: [Keyword; 20] = [
        Keyword::Let,
        Keyword::Is,
        Keyword::If,
        Keyword::Else,
        Keyword::Then,
        Keyword::Skip,
        Keyword::Stop,
        Keyword::Do,
        Keyword::While,
        Keyword::Escape,
        Keyword::Recheck,
        Keyword::TillHere,
        Keyword::And,
        Keyword::Goto,
        Keyword::Read,
        Keyword::Print,
        Keyword::Newline,
        Keyword::Leave,
        Keyword::End,
        Keyword::Subroutine,
    ];

    fn default_spelling(&self) -> &'static str {
        match self {
            Keyword::Let => "let",
            Keyword::Is => "is",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::Then => "then",
            Keyword::Skip => "skip",
            Keyword::Stop => "stop",
            Keyword::Do => "do",
            Keyword::While => "while",
            Keyword::Escape => "escape",
            Keyword::Recheck => "recheck",
            Keyword::TillHere => "till-here",
            Keyword::And => "and",
            Keyword::Goto => "goto",
            Keyword::Read => "read",
            Keyword::Print => "print",
            Keyword::Newline => "newline",
            Keyword::Leave => "leave",
            Keyword::End => "end",
            Keyword::Subroutine => "subroutine",
        }
    }
}

/// Declarable data types; the array variants size a dense sequence of
/// the corresponding scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Integer,
    Text,
    Real,
    IntegerArray,
    TextArray,
    RealArray,
}

impl DataType {
    pub const ALL: [DataType; 6] = [
        DataType::Integer,
        DataType::Text,
        DataType::Real,
        DataType::IntegerArray,
        DataType::TextArray,
        DataType::RealArray,
    ];

    pub fn is_array(&self) -> bool {
        matches!(
            self,
            DataType::IntegerArray | DataType::TextArray | DataType::RealArray
        )
    }

    fn default_spelling(&self) -> &'static str {
        match self {
            DataType::Integer => "integer",
            DataType::Text => "text",
            DataType::Real => "real",
            DataType::IntegerArray => "integer-array",
            DataType::TextArray => "text-array",
            DataType::RealArray => "real-array",
        }
    }
}

/// Arithmetic operators. `upon` divides, `into` multiplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathOp {
    Plus,
    Minus,
    Upon,
    Into,
    Modulo,
    Exponent,
}

impl MathOp {
    pub const ALL: [MathOp; 6] = [
        MathOp::Plus,
        MathOp::Minus,
        MathOp::Upon,
        MathOp::Into,
        MathOp::Modulo,
        MathOp::Exponent,
    ];

    fn default_spelling(&self) -> &'static str {
        match self {
            MathOp::Plus => "plus",
            MathOp::Minus => "minus",
            MathOp::Upon => "upon",
            MathOp::Into => "into",
            MathOp::Modulo => "modulo",
            MathOp::Exponent => "exponent",
        }
    }
}

/// Comparison operators of the `<lhs> is <op> <rhs>` condition form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOp {
    LessThan,
    GreaterThan,
    EqualTo,
    NotEqualTo,
}

impl LogicOp {
    pub const ALL: [LogicOp; 4] = [
        LogicOp::LessThan,
        LogicOp::GreaterThan,
        LogicOp::EqualTo,
        LogicOp::NotEqualTo,
    ];

    fn default_spelling(&self) -> &'static str {
        match self {
            LogicOp::LessThan => "less-than",
            LogicOp::GreaterThan => "greater-than",
            LogicOp::EqualTo => "equal-to",
            LogicOp::NotEqualTo => "not-equal-to",
        }
    }
}

/// Active spellings for the whole language plus the configurable error
/// messages. Spellings are fixed once startup configuration has run.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    keywords: HashMap<Keyword, String>,
    data_types: HashMap<DataType, String>,
    math_ops: HashMap<MathOp, String>,
    logic_ops: HashMap<LogicOp, String>,
    messages: HashMap<ErrorKind, String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            keywords: Keyword::ALL
                .iter()
                .map(|&k| (k, k.default_spelling().to_string()))
                .collect(),
            data_types: DataType::ALL
                .iter()
                .map(|&t| (t, t.default_spelling().to_string()))
                .collect(),
            math_ops: MathOp::ALL
                .iter()
                .map(|&o| (o, o.default_spelling().to_string()))
                .collect(),
            logic_ops: LogicOp::ALL
                .iter()
                .map(|&o| (o, o.default_spelling().to_string()))
                .collect(),
            messages: HashMap::new(),
        }
    }
}

impl Vocabulary {
    pub fn keyword(&self, keyword: Keyword) -> &str {
        &self.keywords[&keyword]
    }

    pub fn keyword_of(&self, token: &str) -> Option<Keyword> {
        Keyword::ALL
            .iter()
            .copied()
            .find(|&k| self.keywords[&k] == token)
    }

    pub fn data_type_name(&self, data_type: DataType) -> &str {
        &self.data_types[&data_type]
    }

    pub fn data_type_of(&self, token: &str) -> Option<DataType> {
        DataType::ALL
            .iter()
            .copied()
            .find(|&t| self.data_types[&t] == token)
    }

    pub fn math_op_of(&self, token: &str) -> Option<MathOp> {
        MathOp::ALL
            .iter()
            .copied()
            .find(|&o| self.math_ops[&o] == token)
    }

    pub fn logic_op_of(&self, token: &str) -> Option<LogicOp> {
        LogicOp::ALL
            .iter()
            .copied()
            .find(|&o| self.logic_ops[&o] == token)
    }

    /// Message text for an error kind, configured or built-in.
    pub fn message(&self, kind: ErrorKind) -> &str {
        self.messages
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_message())
    }

    pub fn rebind_keyword(&mut self, keyword: Keyword, spelling: impl Into<String>) {
        self.keywords.insert(keyword, spelling.into());
    }

    pub fn rebind_data_type(&mut self, data_type: DataType, spelling: impl Into<String>) {
        self.data_types.insert(data_type, spelling.into());
    }

    pub fn rebind_math_op(&mut self, op: MathOp, spelling: impl Into<String>) {
        self.math_ops.insert(op, spelling.into());
    }

    pub fn rebind_logic_op(&mut self, op: LogicOp, spelling: impl Into<String>) {
        self.logic_ops.insert(op, spelling.into());
    }

    pub fn rebind_message(&mut self, kind: ErrorKind, text: impl Into<String>) {
        self.messages.insert(kind, text.into());
    }

    /// Every spelling of every keyword, data type, and operator is
    /// reserved and unavailable as a variable name.
    pub fn is_reserved(&self, word: &str) -> bool {
        self.keywords.values().any(|s| s == word)
            || self.data_types.values().any(|s| s == word)
            || self.math_ops.values().any(|s| s == word)
            || self.logic_ops.values().any(|s| s == word)
    }

    /// Identifier rule: an ASCII letter followed by ASCII letters and
    /// digits, and not a reserved word. The hyphen is rejected here
    /// because it is the array-index separator.
    pub fn validate_name(&self, name: &str) -> bool {
        let mut chars = name.chars();
        let Some(head) = chars.next() else {
            return false;
        };
        if !head.is_ascii_alphabetic() {
            return false;
        }
        if !chars.all(|c| c.is_ascii_alphanumeric()) {
            return false;
        }
        !self.is_reserved(name)
    }
}
