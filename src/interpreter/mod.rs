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

//! Statement execution
//!
//! The interpreter walks normalised source one logical line at a time.
//! There is no AST: dispatch reads the first word of a line, block
//! bounds are found by counting keywords, and every value position
//! calls back into the expression evaluators. Statements chain with
//! `and`, so execution is recursive; an explicit depth bound keeps
//! pathological nesting from exhausting the call stack.

use crate::config::Defaults;
use crate::error::{ErrorKind, RuntimeError};
use crate::preprocessor::Preprocessor;
use crate::scanner;
use crate::store::{ScalarKind, Value, VariableStore};
use crate::vocabulary::{DataType, Keyword, Vocabulary};
use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead, Write};

/// Statement-recursion bound.
const MAX_DEPTH: usize = 256;

/// How a statement left the program: keep going, or `end` was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    End,
}

/// All interpreter state: the variable partitions, the subroutine
/// table, the active vocabulary, the loop-control flags, and the
/// program's I/O streams.
pub struct Interpreter {
    pub(crate) vocabulary: Vocabulary,
    pub(crate) defaults: Defaults,
    pub(crate) store: VariableStore,
    subroutines: HashMap<String, Vec<String>>,
    escape: bool,
    recheck: bool,
    current_line: usize,
    depth: usize,
    input: Box<dyn BufRead>,
    pending_input: VecDeque<String>,
    output: Box<dyn Write>,
}

impl Interpreter {
    /// Interpreter wired to the process's standard streams.
    pub fn new(vocabulary: Vocabulary, defaults: Defaults) -> Self {
        Self::with_io(
            vocabulary,
            defaults,
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    /// Interpreter reading program input from `input` and printing to
    /// `output`.
    pub fn with_io(
        vocabulary: Vocabulary,
        defaults: Defaults,
        input: Box<dyn BufRead>,
        output: Box<dyn Write>,
    ) -> Self {
        let mut interpreter = Self {
            vocabulary,
            defaults,
            store: VariableStore::new(),
            subroutines: HashMap::new(),
            escape: false,
            recheck: false,
            current_line: 0,
            depth: 0,
            input,
            pending_input: VecDeque::new(),
            output,
        };
        // The predefined newline variable, under its configured spelling.
        let newline = interpreter.vocabulary.keyword(Keyword::Newline).to_string();
        interpreter.store.declare_text(&newline, "\n".to_string());
        interpreter
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn current_line(&self) -> usize {
        self.current_line
    }

    /// Bump the line counter used in error reports.
    pub fn advance_line(&mut self) {
        self.current_line += 1;
    }

    /// Install harvested subroutines.
    pub fn load_subroutines(&mut self, subroutines: HashMap<String, Vec<String>>) {
        self.subroutines.extend(subroutines);
    }

    pub(crate) fn error(&self, kind: ErrorKind) -> RuntimeError {
        RuntimeError::new(kind, self.current_line, self.vocabulary.message(kind))
    }

    /// Write program output. Stream failures are swallowed the way the
    /// language's `print` always has.
    pub fn emit(&mut self, text: &str) {
        let _ = self.output.write_all(text.as_bytes());
        let _ = self.output.flush();
    }

    /// Newline echo used by the REPL after each interpreted line.
    pub fn emit_newline(&mut self) {
        self.emit("\n");
    }

    /// One raw source line in REPL mode. `None` at end of input.
    pub fn read_source_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Some(line)
            }
        }
    }

    /// One whitespace-delimited token from the program input stream,
    /// refilled a line at a time.
    fn next_input_token(&mut self) -> Result<String, RuntimeError> {
        loop {
            if let Some(token) = self.pending_input.pop_front() {
                return Ok(token);
            }
            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|_| self.error(ErrorKind::InvalidSyntax))?;
            if read == 0 {
                return Err(self.error(ErrorKind::InvalidSyntax));
            }
            self.pending_input
                .extend(line.split_whitespace().map(str::to_string));
        }
    }

    /// Execute a whole normalised program, one logical line at a time.
    pub fn run(&mut self, program: &str) -> Result<Control, RuntimeError> {
        for line in program.lines() {
            self.current_line += 1;
            if self.interpret(line)? == Control::End {
                return Ok(Control::End);
            }
        }
        Ok(Control::Continue)
    }

    /// Normalise raw source, harvest its subroutines, and run it.
    pub fn execute_source(&mut self, source: &str) -> Result<Control, RuntimeError> {
        let (normalized, subroutines) = {
            let preprocessor = Preprocessor::new(&self.vocabulary);
            let normalized = preprocessor.normalize(source);
            let subroutines = preprocessor.harvest_subroutines(&normalized);
            (normalized, subroutines)
        };
        self.subroutines.extend(subroutines);
        self.run(&normalized)
    }

    /// Execute one statement line.
    pub fn interpret(&mut self, expr: &str) -> Result<Control, RuntimeError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(ErrorKind::RecursionLimit));
        }
        self.depth += 1;
        let result = self.dispatch(expr);
        self.depth -= 1;
        result
    }

    fn dispatch(&mut self, expr: &str) -> Result<Control, RuntimeError> {
        let mut cursor = 0;
        scanner::skip_spaces(expr, &mut cursor);
        if cursor >= expr.len() {
            return Ok(Control::Continue);
        }

        let head = scanner::next_token(expr, &mut cursor);
        scanner::skip_spaces(expr, &mut cursor);
        let head_keyword = self.vocabulary.keyword_of(head);

        // Split off a chained statement, unless the head opens a block
        // that owns its own tail, or a comment that swallows the line.
        if !matches!(
            head_keyword,
            Some(Keyword::If | Keyword::While | Keyword::Leave)
        ) {
            let mut split = cursor;
            let (found, and_len) = {
                let and = self.vocabulary.keyword(Keyword::And);
                (scanner::find_keyword(expr, &mut split, and), and.len())
            };
            if found {
                if self.interpret(&expr[..split])? == Control::End {
                    return Ok(Control::End);
                }
                return self.interpret(&expr[split + and_len..]);
            }
        }

        match head_keyword {
            Some(Keyword::Let) => {
                self.initiate(expr, cursor)?;
                Ok(Control::Continue)
            }
            Some(Keyword::Print) => {
                self.print_output(expr, cursor)?;
                Ok(Control::Continue)
            }
            Some(Keyword::Read) => {
                self.read_input(expr, cursor)?;
                Ok(Control::Continue)
            }
            Some(Keyword::If) => self.execute_if(expr, cursor),
            Some(Keyword::While) => self.execute_while(expr, cursor),
            Some(Keyword::Goto) => self.execute_goto(expr, cursor),
            Some(Keyword::Leave) | Some(Keyword::Skip) => Ok(Control::Continue),
            Some(Keyword::End) => Ok(Control::End),
            Some(Keyword::Escape) => {
                self.escape = true;
                Ok(Control::Continue)
            }
            Some(Keyword::Recheck) => {
                self.recheck = true;
                Ok(Control::Continue)
            }
            _ => {
                self.assign(expr, head, cursor)?;
                Ok(Control::Continue)
            }
        }
    }

    /// `let TYPE NAME [is EXPR]` or `let ARRAY-TYPE NAME[-SIZE]`.
    fn initiate(&mut self, expr: &str, mut cursor: usize) -> Result<(), RuntimeError> {
        let type_token = scanner::next_token(expr, &mut cursor);
        let data_type = self
            .vocabulary
            .data_type_of(type_token)
            .ok_or_else(|| self.error(ErrorKind::InvalidDataType))?;

        scanner::skip_spaces(expr, &mut cursor);
        let name_token = scanner::next_token(expr, &mut cursor);

        if data_type.is_array() {
            let (name, size) = match name_token.split_once('-') {
                Some((name, size_expr)) => {
                    if !self.vocabulary.validate_name(name) {
                        return Err(self.error(ErrorKind::InvalidName));
                    }
                    (name, self.solve_integer(size_expr, &mut 0)?)
                }
                None => {
                    if !self.vocabulary.validate_name(name_token) {
                        return Err(self.error(ErrorKind::InvalidName));
                    }
                    (name_token, self.defaults.array_size as i64)
                }
            };
            if size < 0 {
                return Err(self.error(ErrorKind::IndexOutOfBounds));
            }
            let size = size as usize;
            match data_type {
                DataType::IntegerArray => {
                    self.store
                        .declare_integer_array(name, size, self.defaults.integer_value)
                }
                DataType::TextArray => {
                    self.store
                        .declare_text_array(name, size, &self.defaults.text_value)
                }
                DataType::RealArray => {
                    self.store
                        .declare_real_array(name, size, self.defaults.real_value)
                }
                _ => {}
            }
            return Ok(());
        }

        if !self.vocabulary.validate_name(name_token) {
            return Err(self.error(ErrorKind::InvalidName));
        }

        scanner::skip_spaces(expr, &mut cursor);
        if cursor >= expr.len() {
            match data_type {
                DataType::Integer => self
                    .store
                    .declare_integer(name_token, self.defaults.integer_value),
                DataType::Text => self
                    .store
                    .declare_text(name_token, self.defaults.text_value.clone()),
                DataType::Real => self
                    .store
                    .declare_real(name_token, self.defaults.real_value),
                _ => {}
            }
            return Ok(());
        }

        let is_token = scanner::next_token(expr, &mut cursor);
        if is_token != self.vocabulary.keyword(Keyword::Is) {
            return Err(self.error(ErrorKind::InvalidSyntax));
        }
        scanner::skip_spaces(expr, &mut cursor);
        match data_type {
            DataType::Integer => {
                let value = self.solve_integer(expr, &mut cursor)?;
                self.store.declare_integer(name_token, value);
            }
            DataType::Text => {
                let value = self.solve_text(expr, &mut cursor)?;
                self.store.declare_text(name_token, value);
            }
            DataType::Real => {
                let value = self.solve_real(expr, &mut cursor)?;
                self.store.declare_real(name_token, value);
            }
            _ => {}
        }
        Ok(())
    }

    /// `NAME is EXPR`: assignment through the resolved slot.
    fn assign(&mut self, expr: &str, head: &str, mut cursor: usize) -> Result<(), RuntimeError> {
        let slot = match self.resolve(head)? {
            Some(slot) => slot,
            None => return Err(self.error(ErrorKind::VariableNotFound)),
        };

        let is_token = scanner::next_token(expr, &mut cursor);
        if is_token != self.vocabulary.keyword(Keyword::Is) {
            return Err(self.error(ErrorKind::InvalidSyntax));
        }
        scanner::skip_spaces(expr, &mut cursor);

        let value = match slot.kind {
            ScalarKind::Integer => Value::Integer(self.solve_integer(expr, &mut cursor)?),
            ScalarKind::Text => Value::Text(self.solve_text(expr, &mut cursor)?),
            ScalarKind::Real => Value::Real(self.solve_real(expr, &mut cursor)?),
        };
        if self.store.write(&slot, value).is_none() {
            return Err(self.error(ErrorKind::VariableNotFound));
        }
        Ok(())
    }

    /// `print ITEM [then ITEM …]`. Literals print without their
    /// quotes; identifiers print their value. No newline is added.
    fn print_output(&mut self, expr: &str, mut cursor: usize) -> Result<(), RuntimeError> {
        loop {
            scanner::skip_spaces(expr, &mut cursor);
            if cursor >= expr.len() {
                return Ok(());
            }

            let token = scanner::next_token(expr, &mut cursor);
            if scanner::is_string_literal(token) {
                self.emit(scanner::literal_text(token));
            } else {
                let value = self.read_variable(token)?;
                self.emit(&value.to_string());
            }

            scanner::skip_spaces(expr, &mut cursor);
            if cursor >= expr.len() {
                return Ok(());
            }
            let chain = scanner::next_token(expr, &mut cursor);
            if chain != self.vocabulary.keyword(Keyword::Then) {
                return Err(self.error(ErrorKind::InvalidSyntax));
            }
        }
    }

    /// `read NAME [then NAME …]`. One whitespace-delimited input token
    /// per target, parsed by the target's kind.
    fn read_input(&mut self, expr: &str, mut cursor: usize) -> Result<(), RuntimeError> {
        loop {
            scanner::skip_spaces(expr, &mut cursor);
            if cursor >= expr.len() {
                return Ok(());
            }

            let token = scanner::next_token(expr, &mut cursor);
            let slot = self.resolve_existing(token)?;
            let input = self.next_input_token()?;
            let value = match slot.kind {
                ScalarKind::Integer => Value::Integer(
                    input
                        .parse()
                        .map_err(|_| self.error(ErrorKind::InvalidSyntax))?,
                ),
                ScalarKind::Text => Value::Text(input),
                ScalarKind::Real => Value::Real(
                    input
                        .parse()
                        .map_err(|_| self.error(ErrorKind::InvalidSyntax))?,
                ),
            };
            if self.store.write(&slot, value).is_none() {
                return Err(self.error(ErrorKind::VariableNotFound));
            }

            scanner::skip_spaces(expr, &mut cursor);
            if cursor >= expr.len() {
                return Ok(());
            }
            let chain = scanner::next_token(expr, &mut cursor);
            if chain != self.vocabulary.keyword(Keyword::Then) {
                return Err(self.error(ErrorKind::InvalidSyntax));
            }
        }
    }

    /// `if COND then T else F stop [and …]`.
    fn execute_if(&mut self, expr: &str, cursor: usize) -> Result<Control, RuntimeError> {
        let mut then_pos = cursor;
        let (found, then_len) = {
            let then = self.vocabulary.keyword(Keyword::Then);
            (scanner::find_keyword(expr, &mut then_pos, then), then.len())
        };
        if !found {
            return Err(self.error(ErrorKind::InvalidSyntax));
        }
        let condition = &expr[cursor..then_pos];

        let mut body_start = then_pos + then_len;
        scanner::skip_spaces(expr, &mut body_start);
        let (else_pos, stop_pos) = self.match_if_arms(expr, body_start)?;
        let else_len = self.vocabulary.keyword(Keyword::Else).len();
        let when_true = &expr[body_start..else_pos];
        let when_false = &expr[else_pos + else_len..stop_pos];

        let branch = if self.check_condition(condition)? {
            when_true
        } else {
            when_false
        };
        if self.interpret(branch)? == Control::End {
            return Ok(Control::End);
        }

        let stop_len = self.vocabulary.keyword(Keyword::Stop).len();
        self.chain_after_block(expr, stop_pos + stop_len)
    }

    /// Locate the `else` and `stop` closing an `if`: every `if` opens a
    /// nesting level, every `stop` closes one, and the first `else`
    /// seen at depth 1 splits the arms.
    fn match_if_arms(&self, expr: &str, start: usize) -> Result<(usize, usize), RuntimeError> {
        let if_word = self.vocabulary.keyword(Keyword::If);
        let else_word = self.vocabulary.keyword(Keyword::Else);
        let stop_word = self.vocabulary.keyword(Keyword::Stop);

        let mut depth = 1usize;
        let mut first_else = None;
        for (pos, word) in scanner::words(expr, start) {
            if word == if_word {
                depth += 1;
            } else if word == stop_word {
                depth -= 1;
                if depth == 0 {
                    let else_pos = first_else.ok_or_else(|| self.error(ErrorKind::InvalidSyntax))?;
                    return Ok((else_pos, pos));
                }
            } else if word == else_word && depth == 1 && first_else.is_none() {
                first_else = Some(pos);
            }
        }
        Err(self.error(ErrorKind::InvalidSyntax))
    }

    /// `while COND do BODY till-here [and …]`.
    fn execute_while(&mut self, expr: &str, cursor: usize) -> Result<Control, RuntimeError> {
        let mut do_pos = cursor;
        let (found, do_len) = {
            let do_word = self.vocabulary.keyword(Keyword::Do);
            (
                scanner::find_keyword(expr, &mut do_pos, do_word),
                do_word.len(),
            )
        };
        if !found {
            return Err(self.error(ErrorKind::InvalidSyntax));
        }
        let condition = &expr[cursor..do_pos];

        let mut body_start = do_pos + do_len;
        scanner::skip_spaces(expr, &mut body_start);
        let end_pos = self.match_loop_end(expr, body_start)?;
        let body = &expr[body_start..end_pos];

        while self.check_condition(condition)? {
            if self.escape {
                self.escape = false;
                break;
            }
            if self.recheck {
                self.recheck = false;
                continue;
            }
            if self.interpret(body)? == Control::End {
                return Ok(Control::End);
            }
        }

        let till_len = self.vocabulary.keyword(Keyword::TillHere).len();
        self.chain_after_block(expr, end_pos + till_len)
    }

    /// Locate the `till-here` closing a loop body, counting nested
    /// `while` blocks.
    fn match_loop_end(&self, expr: &str, start: usize) -> Result<usize, RuntimeError> {
        let while_word = self.vocabulary.keyword(Keyword::While);
        let till_word = self.vocabulary.keyword(Keyword::TillHere);

        let mut depth = 1usize;
        for (pos, word) in scanner::words(expr, start) {
            if word == while_word {
                depth += 1;
            } else if word == till_word {
                depth -= 1;
                if depth == 0 {
                    return Ok(pos);
                }
            }
        }
        Err(self.error(ErrorKind::InvalidSyntax))
    }

    /// `goto NAME`: run the harvested subroutine body line by line.
    /// An unknown name runs nothing. `escape` returns early from the
    /// body and clears.
    fn execute_goto(&mut self, expr: &str, mut cursor: usize) -> Result<Control, RuntimeError> {
        let name = scanner::next_token(expr, &mut cursor);
        let body = self.subroutines.get(name).cloned().unwrap_or_default();
        for line in &body {
            if self.escape {
                self.escape = false;
                return Ok(Control::Continue);
            }
            if self.interpret(line)? == Control::End {
                return Ok(Control::End);
            }
        }
        Ok(Control::Continue)
    }

    /// Interpret an `and`-chained continuation after a closed block.
    fn chain_after_block(&mut self, expr: &str, from: usize) -> Result<Control, RuntimeError> {
        let mut cursor = from;
        let (found, and_len) = {
            let and = self.vocabulary.keyword(Keyword::And);
            (scanner::find_keyword(expr, &mut cursor, and), and.len())
        };
        if found {
            return self.interpret(&expr[cursor + and_len..]);
        }
        Ok(Control::Continue)
    }
}
