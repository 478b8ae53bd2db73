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

//! Startup configuration
//!
//! `symlsConfig.json` can rebind every spelling in the language, point
//! the standard streams at files, and change declaration defaults. All
//! fields are optional: a partial file rebinds only what it names, and
//! a missing file leaves the language untouched.

use crate::error::ErrorKind;
use crate::vocabulary::{DataType, Keyword, LogicOp, MathOp, Vocabulary};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Failure to load the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read configuration file: {0}")]
    Io(#[from] io::Error),

    #[error("malformed configuration file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub io: IoConfig,
    pub keywords: KeywordSpellings,
    pub datatypes: DataTypeSpellings,
    pub operators: OperatorSpellings,
    pub error_messages: ErrorMessageSpellings,
    pub defaults: Defaults,
}

impl Config {
    /// Load the configuration, or `None` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Config>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Build the vocabulary with every configured rebinding applied.
    pub fn vocabulary(&self) -> Vocabulary {
        let mut vocabulary = Vocabulary::default();
        self.keywords.apply(&mut vocabulary);
        self.datatypes.apply(&mut vocabulary);
        self.operators.math.apply(&mut vocabulary);
        self.operators.logic.apply(&mut vocabulary);
        self.error_messages.apply(&mut vocabulary);
        vocabulary
    }
}

/// Stream redirection and the preprocessed-program file name. The
/// literal values `stdin` / `stdout` / `stderr` keep the process
/// streams; anything else names a file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IoConfig {
    pub input_file: String,
    pub output_file: String,
    pub error_file: String,
    pub pre_processed_file: String,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            input_file: "stdin".to_string(),
            output_file: "stdout".to_string(),
            error_file: "stderr".to_string(),
            pre_processed_file: "processed_program.symls".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct KeywordSpellings {
    #[serde(rename = "let")]
    pub let_: Option<String>,
    pub is: Option<String>,
    #[serde(rename = "if")]
    pub if_: Option<String>,
    #[serde(rename = "else")]
    pub else_: Option<String>,
    pub then: Option<String>,
    pub skip: Option<String>,
    pub stop: Option<String>,
    #[serde(rename = "do")]
    pub do_: Option<String>,
    #[serde(rename = "while")]
    pub while_: Option<String>,
    pub escape: Option<String>,
    pub recheck: Option<String>,
    pub tillhere: Option<String>,
    pub and: Option<String>,
    pub goto: Option<String>,
    pub read: Option<String>,
    pub print: Option<String>,
    pub newline: Option<String>,
    pub leave: Option<String>,
    pub end: Option<String>,
    pub subroutine: Option<String>,
}

impl KeywordSpellings {
    fn apply(&self, vocabulary: &mut Vocabulary) {
        let entries = [
            (Keyword::Let, &self.let_),
            (Keyword::Is, &self.is),
            (Keyword::If, &self.if_),
            (Keyword::Else, &self.else_),
            (Keyword::Then, &self.then),
            (Keyword::Skip, &self.skip),
            (Keyword::Stop, &self.stop),
            (Keyword::Do, &self.do_),
            (Keyword::While, &self.while_),
            (Keyword::Escape, &self.escape),
            (Keyword::Recheck, &self.recheck),
            (Keyword::TillHere, &self.tillhere),
            (Keyword::And, &self.and),
            (Keyword::Goto, &self.goto),
            (Keyword::Read, &self.read),
            (Keyword::Print, &self.print),
            (Keyword::Newline, &self.newline),
            (Keyword::Leave, &self.leave),
            (Keyword::End, &self.end),
            (Keyword::Subroutine, &self.subroutine),
        ];
        for (keyword, spelling) in entries {
            if let Some(spelling) = spelling {
                vocabulary.rebind_keyword(keyword, spelling.clone());
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct DataTypeSpellings {
    pub integer: Option<String>,
    pub text: Option<String>,
    pub real: Option<String>,
    pub integer_array: Option<String>,
    pub text_array: Option<String>,
    pub real_array: Option<String>,
}

impl DataTypeSpellings {
    fn apply(&self, vocabulary: &mut Vocabulary) {
        let entries = [
            (DataType::Integer, &self.integer),
            (DataType::Text, &self.text),
            (DataType::Real, &self.real),
            (DataType::IntegerArray, &self.integer_array),
            (DataType::TextArray, &self.text_array),
            (DataType::RealArray, &self.real_array),
        ];
        for (data_type, spelling) in entries {
            if let Some(spelling) = spelling {
                vocabulary.rebind_data_type(data_type, spelling.clone());
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct OperatorSpellings {
    pub math: MathSpellings,
    pub logic: LogicSpellings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct MathSpellings {
    pub plus: Option<String>,
    pub minus: Option<String>,
    pub into: Option<String>,
    pub upon: Option<String>,
    pub modulo: Option<String>,
    pub exponent: Option<String>,
}

impl MathSpellings {
    fn apply(&self, vocabulary: &mut Vocabulary) {
        let entries = [
            (MathOp::Plus, &self.plus),
            (MathOp::Minus, &self.minus),
            (MathOp::Into, &self.into),
            (MathOp::Upon, &self.upon),
            (MathOp::Modulo, &self.modulo),
            (MathOp::Exponent, &self.exponent),
        ];
        for (op, spelling) in entries {
            if let Some(spelling) = spelling {
                vocabulary.rebind_math_op(op, spelling.clone());
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct LogicSpellings {
    pub equals: Option<String>,
    pub not_equals: Option<String>,
    pub greater_than: Option<String>,
    pub less_than: Option<String>,
}

impl LogicSpellings {
    fn apply(&self, vocabulary: &mut Vocabulary) {
        let entries = [
            (LogicOp::EqualTo, &self.equals),
            (LogicOp::NotEqualTo, &self.not_equals),
            (LogicOp::GreaterThan, &self.greater_than),
            (LogicOp::LessThan, &self.less_than),
        ];
        for (op, spelling) in entries {
            if let Some(spelling) = spelling {
                vocabulary.rebind_logic_op(op, spelling.clone());
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorMessageSpellings {
    pub invalid_syntax: Option<String>,
    pub invalid_datatype: Option<String>,
    pub invalid_operator: Option<String>,
    pub index_out_of_bounds: Option<String>,
    pub invalid_variable_name: Option<String>,
    pub variable_not_found: Option<String>,
}

impl ErrorMessageSpellings {
    fn apply(&self, vocabulary: &mut Vocabulary) {
        let entries = [
            (ErrorKind::InvalidSyntax, &self.invalid_syntax),
            (ErrorKind::InvalidDataType, &self.invalid_datatype),
            (ErrorKind::InvalidOperator, &self.invalid_operator),
            (ErrorKind::IndexOutOfBounds, &self.index_out_of_bounds),
            (ErrorKind::InvalidName, &self.invalid_variable_name),
            (ErrorKind::VariableNotFound, &self.variable_not_found),
        ];
        for (kind, text) in entries {
            if let Some(text) = text {
                vocabulary.rebind_message(kind, text.clone());
            }
        }
    }
}

/// Declaration defaults: array length when `-SIZE` is omitted, and the
/// initial value of each scalar kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Defaults {
    pub array_size: usize,
    pub integer_value: i64,
    pub real_value: f64,
    pub text_value: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            array_size: 64,
            integer_value: 0,
            real_value: 0.0,
            text_value: String::new(),
        }
    }
}
