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

//! End-to-end interpreter scenarios: whole programs in, captured
//! program output out.

use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

use symls::config::Config;
use symls::error::ErrorKind;
use symls::{Defaults, Interpreter, RuntimeError, Vocabulary};

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn interpreter_for(vocabulary: Vocabulary, defaults: Defaults, input: &str) -> (Interpreter, Capture) {
    let capture = Capture::default();
    let interpreter = Interpreter::with_io(
        vocabulary,
        defaults,
        Box::new(Cursor::new(input.to_string())),
        Box::new(capture.clone()),
    );
    (interpreter, capture)
}

fn run(source: &str) -> String {
    run_with_input(source, "")
}

fn run_with_input(source: &str, input: &str) -> String {
    let (mut interpreter, capture) = interpreter_for(Vocabulary::default(), Defaults::default(), input);
    interpreter.execute_source(source).unwrap();
    capture.contents()
}

fn run_err(source: &str) -> RuntimeError {
    let (mut interpreter, _) = interpreter_for(Vocabulary::default(), Defaults::default(), "");
    interpreter.execute_source(source).unwrap_err()
}

#[test]
fn test_scenario_hello_world() {
    let source = "let text greeting is \"Hello, world\"\nprint greeting";
    assert_eq!(run(source), "Hello, world");
}

#[test]
fn test_scenario_right_associative_subtraction() {
    let source = "let integer x is 2 minus 3 minus 4\nprint x";
    assert_eq!(run(source), "3");
}

#[test]
fn test_scenario_if_else_with_chained_statement() {
    let source = "let integer n is 5\n\
                  if n is greater-than 3 then print \"big\" else print \"small\" stop and print \"!\"";
    assert_eq!(run(source), "big!");
}

#[test]
fn test_scenario_while_with_escape() {
    let source = "let integer i is 0\n\
                  while i is less-than 10 do i is i plus 1 and \
                  if i is equal-to 3 then escape else skip stop till-here and print i";
    assert_eq!(run(source), "3");
}

#[test]
fn test_scenario_array_element_read_write() {
    let source = "let integer-array A-3\n\
                  A-0 is 7 and A-1 is A-0 plus 1 and print A-1";
    assert_eq!(run(source), "8");
}

#[test]
fn test_scenario_subroutine_via_goto() {
    let source = "let integer x is 0\n\
                  goto bump\n\
                  print x\n\
                  end\n\
                  subroutine bump\n\
                  x is x plus 41\n\
                  end";
    assert_eq!(run(source), "41");
}

#[test]
fn test_multiline_blocks_join_before_execution() {
    let source = "let integer x is 3\n\
                  if x is less-than 5 then\n\
                  print \"lo\" else\n\
                  print \"hi\" stop\n";
    assert_eq!(run(source), "lo");
}

#[test]
fn test_subroutine_loop_counts() {
    let source = "let integer n is 0\n\
                  let integer calls is 0\n\
                  while n is less-than 3 do n is n plus 1 and goto tally till-here\n\
                  print calls\n\
                  end\n\
                  subroutine tally\n\
                  calls is calls plus 1\n\
                  end";
    assert_eq!(run(source), "3");
}

#[test]
fn test_real_and_integer_mix() {
    let source = "let real half is 1 upon 2.0\n\
                  let integer n is 9\n\
                  let real scaled is n into half\n\
                  print scaled";
    // 1 / 2.0 widens the integer literal; 9 * 0.5 = 4.5.
    assert_eq!(run(source), "4.5");
}

#[test]
fn test_text_concatenation_chain() {
    let source = "let text a is \"sym\"\n\
                  let text b is a plus \"ls\"\n\
                  print b then newline";
    assert_eq!(run(source), "symls\n");
}

#[test]
fn test_read_drives_a_loop() {
    let source = "let integer target\n\
                  let integer i is 0\n\
                  read target\n\
                  while i is less-than target do i is i plus 1 till-here and print i";
    assert_eq!(run_with_input(source, "4\n"), "4");
}

#[test]
fn test_rebound_vocabulary_runs_whole_program() {
    let config: Config = serde_json::from_str(
        r#"{
            "keywords": { "print": "say", "while": "solange", "do": "mach",
                          "tillhere": "bis-hier", "and": "und" },
            "operators": { "math": { "plus": "plus" }, "logic": { "lessThan": "kleiner" } }
        }"#,
    )
    .unwrap();
    let (mut interpreter, capture) =
        interpreter_for(config.vocabulary(), config.defaults.clone(), "");
    interpreter
        .execute_source(
            "let integer i is 0\n\
             solange i is kleiner 3 mach i is i plus 1 bis-hier und say i",
        )
        .unwrap();
    assert_eq!(capture.contents(), "3");
}

#[test]
fn test_rebound_newline_variable_spelling() {
    let config: Config =
        serde_json::from_str(r#"{ "keywords": { "newline": "zeile" } }"#).unwrap();
    let (mut interpreter, capture) =
        interpreter_for(config.vocabulary(), config.defaults.clone(), "");
    interpreter
        .execute_source("print \"a\" then zeile then \"b\"")
        .unwrap();
    assert_eq!(capture.contents(), "a\nb");
}

#[test]
fn test_configured_defaults_seed_declarations() {
    let defaults = Defaults {
        array_size: 3,
        integer_value: 7,
        real_value: 0.5,
        text_value: "-".to_string(),
    };
    let (mut interpreter, capture) = interpreter_for(Vocabulary::default(), defaults, "");
    interpreter
        .execute_source(
            "let integer i\nlet real r\nlet text t\nlet integer-array a\n\
             print i then t then r then t then a-2",
        )
        .unwrap();
    assert_eq!(capture.contents(), "7-0.5-7");
}

#[test]
fn test_configured_error_message_text() {
    let config: Config = serde_json::from_str(
        r#"{ "errorMessages": { "variableNotFound": "Unbekannte Variable" } }"#,
    )
    .unwrap();
    let (mut interpreter, _) = interpreter_for(config.vocabulary(), config.defaults.clone(), "");
    let error = interpreter.execute_source("print ghost").unwrap_err();
    assert_eq!(error.kind, ErrorKind::VariableNotFound);
    assert_eq!(error.to_string(), "Error at line : 1\nUnbekannte Variable");
}

#[test]
fn test_error_reports_logical_line_of_failure() {
    let error = run_err(
        "let integer a is 1\n\
         print a\n\
         let integer b is 2\n\
         b is b upon a and ghost is 3",
    );
    assert_eq!(error.kind, ErrorKind::VariableNotFound);
    assert_eq!(error.line, 4);
}

#[test]
fn test_error_taxonomy_round_trip() {
    let cases = [
        ("x is 1", ErrorKind::VariableNotFound),
        ("let number x", ErrorKind::InvalidDataType),
        ("let integer stop", ErrorKind::InvalidName),
        ("let integer x is 1 with 2", ErrorKind::InvalidSyntax),
        ("let integer-array a-2\nprint a-2", ErrorKind::IndexOutOfBounds),
        (
            "let integer x\nif x is around 0 then skip else skip stop",
            ErrorKind::InvalidOperator,
        ),
    ];
    for (source, kind) in cases {
        assert_eq!(run_err(source).kind, kind, "program: {source}");
    }
}

#[test]
fn test_repl_style_line_interpreting_continues_after_error() {
    // The REPL interprets lines one at a time and survives bad ones.
    let (mut interpreter, capture) = interpreter_for(Vocabulary::default(), Defaults::default(), "");
    interpreter.advance_line();
    assert!(interpreter.interpret("print ghost").is_err());
    interpreter.advance_line();
    interpreter.interpret("let integer x is 2").unwrap();
    interpreter.advance_line();
    interpreter.interpret("print x").unwrap();
    assert_eq!(capture.contents(), "2");
}

#[test]
fn test_execute_source_reports_end() {
    let (mut interpreter, _) = interpreter_for(Vocabulary::default(), Defaults::default(), "");
    let control = interpreter.execute_source("end\nprint \"never\"").unwrap();
    assert_eq!(control, symls::Control::End);
}
