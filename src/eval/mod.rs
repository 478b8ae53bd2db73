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

//! Expression and condition evaluation
//!
//! Three mutually recursive, right-associative evaluators plus the
//! token resolver. They live on [`Interpreter`] so that evaluating an
//! array index can re-enter the resolver with the same state; every
//! call advances the caller's cursor over the tokens it consumed.
//!
//! There is no precedence: `2 minus 3 minus 4` is `2 - (3 - 4)`.

use crate::error::{ErrorKind, RuntimeError};
use crate::interpreter::Interpreter;
use crate::scanner;
use crate::store::{ArrayLookup, ScalarKind, Slot, Value};
use crate::vocabulary::{Keyword, LogicOp, MathOp};

impl Interpreter {
    /// Resolve a token to a storage slot. A token containing `-` is an
    /// array access: the part after the first `-` is evaluated as an
    /// integer expression at access time. `None` means no variable of
    /// that name exists in any partition.
    pub(crate) fn resolve(&mut self, token: &str) -> Result<Option<Slot>, RuntimeError> {
        if let Some((name, index_expr)) = token.split_once('-') {
            let index = self.solve_integer(index_expr, &mut 0)?;
            return match self.store.lookup_element(name, index) {
                ArrayLookup::Found(slot) => Ok(Some(slot)),
                ArrayLookup::OutOfBounds => Err(self.error(ErrorKind::IndexOutOfBounds)),
                ArrayLookup::Missing => Ok(None),
            };
        }
        Ok(self.store.lookup_scalar(token))
    }

    /// Resolve a token that must name an existing variable.
    pub(crate) fn resolve_existing(&mut self, token: &str) -> Result<Slot, RuntimeError> {
        self.resolve(token)?
            .ok_or_else(|| self.error(ErrorKind::VariableNotFound))
    }

    /// Resolve a token and read its current value.
    pub(crate) fn read_variable(&mut self, token: &str) -> Result<Value, RuntimeError> {
        let slot = self.resolve_existing(token)?;
        self.store
            .read(&slot)
            .ok_or_else(|| self.error(ErrorKind::VariableNotFound))
    }

    /// Integer expression: a number or variable, then optionally an
    /// operator and a right-recursive rest.
    pub(crate) fn solve_integer(
        &mut self,
        expr: &str,
        pos: &mut usize,
    ) -> Result<i64, RuntimeError> {
        scanner::skip_spaces(expr, pos);
        if *pos >= expr.len() {
            return Ok(0);
        }

        let token = scanner::next_token(expr, pos);
        let result = if scanner::is_number(token) {
            scanner::parse_integer(token).ok_or_else(|| self.error(ErrorKind::InvalidSyntax))?
        } else {
            match self.read_variable(token)? {
                Value::Integer(value) => value,
                Value::Real(value) => value as i64,
                Value::Text(_) => return Err(self.error(ErrorKind::VariableNotFound)),
            }
        };

        scanner::skip_spaces(expr, pos);
        if *pos >= expr.len() {
            return Ok(result);
        }

        let op_token = scanner::next_token(expr, pos);
        let op = self
            .vocabulary
            .math_op_of(op_token)
            .ok_or_else(|| self.error(ErrorKind::InvalidSyntax))?;
        let rest = self.solve_integer(expr, pos)?;
        Ok(match op {
            MathOp::Plus => result + rest,
            MathOp::Minus => result - rest,
            MathOp::Upon => result / rest,
            MathOp::Into => result * rest,
            MathOp::Modulo => result % rest,
            MathOp::Exponent => integer_power(result, rest),
        })
    }

    /// Real expression; integer variables widen to real.
    pub(crate) fn solve_real(&mut self, expr: &str, pos: &mut usize) -> Result<f64, RuntimeError> {
        scanner::skip_spaces(expr, pos);
        if *pos >= expr.len() {
            return Ok(0.0);
        }

        let token = scanner::next_token(expr, pos);
        let result = if scanner::is_number(token) {
            scanner::parse_real(token).ok_or_else(|| self.error(ErrorKind::InvalidSyntax))?
        } else {
            match self.read_variable(token)? {
                Value::Real(value) => value,
                Value::Integer(value) => value as f64,
                Value::Text(_) => return Err(self.error(ErrorKind::VariableNotFound)),
            }
        };

        scanner::skip_spaces(expr, pos);
        if *pos >= expr.len() {
            return Ok(result);
        }

        let op_token = scanner::next_token(expr, pos);
        let op = self
            .vocabulary
            .math_op_of(op_token)
            .ok_or_else(|| self.error(ErrorKind::InvalidSyntax))?;
        let rest = self.solve_real(expr, pos)?;
        Ok(match op {
            MathOp::Plus => result + rest,
            MathOp::Minus => result - rest,
            MathOp::Upon => result / rest,
            MathOp::Into => result * rest,
            MathOp::Modulo => result % rest,
            MathOp::Exponent => result.powf(rest),
        })
    }

    /// Text expression: concatenation is the only operator.
    pub(crate) fn solve_text(
        &mut self,
        expr: &str,
        pos: &mut usize,
    ) -> Result<String, RuntimeError> {
        scanner::skip_spaces(expr, pos);
        if *pos >= expr.len() {
            return Ok(String::new());
        }

        let token = scanner::next_token(expr, pos);
        let result = if scanner::is_string_literal(token) {
            scanner::literal_text(token).to_string()
        } else {
            match self.read_variable(token)? {
                Value::Text(value) => value,
                _ => return Err(self.error(ErrorKind::VariableNotFound)),
            }
        };

        scanner::skip_spaces(expr, pos);
        if *pos >= expr.len() {
            return Ok(result);
        }

        let op_token = scanner::next_token(expr, pos);
        if self.vocabulary.math_op_of(op_token) != Some(MathOp::Plus) {
            return Err(self.error(ErrorKind::InvalidSyntax));
        }
        scanner::skip_spaces(expr, pos);
        let rest = self.solve_text(expr, pos)?;
        Ok(result + &rest)
    }

    /// `<lhs> is <op> <rhs>`, dispatched on the kind of the first
    /// token: a quoted literal compares as text, a number as integer or
    /// real depending on a `.`, and an identifier by its resolved kind.
    pub(crate) fn check_condition(&mut self, expr: &str) -> Result<bool, RuntimeError> {
        let mut cursor = 0;
        scanner::skip_spaces(expr, &mut cursor);
        if cursor >= expr.len() {
            return Ok(false);
        }

        let mut peek = cursor;
        let first = scanner::next_token(expr, &mut peek);
        let kind = if scanner::is_string_literal(first) {
            ScalarKind::Text
        } else if scanner::is_number(first) {
            if scanner::is_real(first) {
                ScalarKind::Real
            } else {
                ScalarKind::Integer
            }
        } else {
            self.resolve_existing(first)?.kind
        };

        let (lhs, op, rhs) = self.split_condition(expr, cursor)?;
        Ok(match kind {
            ScalarKind::Integer => compare(
                self.solve_integer(lhs, &mut 0)?,
                op,
                self.solve_integer(rhs, &mut 0)?,
            ),
            ScalarKind::Text => compare(
                self.solve_text(lhs, &mut 0)?,
                op,
                self.solve_text(rhs, &mut 0)?,
            ),
            ScalarKind::Real => compare(
                self.solve_real(lhs, &mut 0)?,
                op,
                self.solve_real(rhs, &mut 0)?,
            ),
        })
    }

    /// Split a condition at its `is`, read the logical operator, and
    /// hand back the untouched operand texts.
    fn split_condition<'a>(
        &self,
        expr: &'a str,
        start: usize,
    ) -> Result<(&'a str, LogicOp, &'a str), RuntimeError> {
        let mut cursor = start;
        if !scanner::find_keyword(expr, &mut cursor, self.vocabulary.keyword(Keyword::Is)) {
            return Err(self.error(ErrorKind::InvalidSyntax));
        }
        let lhs = &expr[..cursor];
        cursor += self.vocabulary.keyword(Keyword::Is).len();
        scanner::skip_spaces(expr, &mut cursor);

        let op_token = scanner::next_token(expr, &mut cursor);
        let op = self
            .vocabulary
            .logic_op_of(op_token)
            .ok_or_else(|| self.error(ErrorKind::InvalidOperator))?;
        scanner::skip_spaces(expr, &mut cursor);
        Ok((lhs, op, &expr[cursor..]))
    }
}

/// Integer power by repeated multiplication; a non-positive exponent
/// runs zero rounds and yields 1.
fn integer_power(base: i64, exponent: i64) -> i64 {
    let mut result = 1;
    for _ in 0..exponent {
        result *= base;
    }
    result
}

/// Value comparison for one logical operator.
fn compare<T: PartialOrd>(left: T, op: LogicOp, right: T) -> bool {
    match op {
        LogicOp::LessThan => left < right,
        LogicOp::GreaterThan => left > right,
        LogicOp::EqualTo => left == right,
        LogicOp::NotEqualTo => left != right,
    }
}
