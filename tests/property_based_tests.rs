use proptest::prelude::*;
use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

use symls::scanner;
use symls::{Defaults, Interpreter, Preprocessor, Vocabulary};

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

fn capturing_interpreter(defaults: Defaults) -> (Interpreter, Capture) {
    let capture = Capture::default();
    let interpreter = Interpreter::with_io(
        Vocabulary::default(),
        defaults,
        Box::new(Cursor::new(String::new())),
        Box::new(capture.clone()),
    );
    (interpreter, capture)
}

/// Lines built from plain words and balanced quoted literals, with
/// ragged spacing.
fn source_line() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            prop::string::string_regex("[a-z]{1,6}").unwrap(),
            prop::string::string_regex("\"[a-z ]{0,8}\"").unwrap(),
            prop::string::string_regex("-?[0-9]{1,3}").unwrap(),
        ],
        0..6,
    )
    .prop_map(|words| words.join("   "))
}

fn source_program() -> impl Strategy<Value = String> {
    prop::collection::vec(source_line(), 0..8).prop_map(|lines| lines.join("\n"))
}

/// Property: normalisation is idempotent. A second pass over already
/// normalised text changes nothing.
proptest! {
    #[test]
    fn test_preprocess_idempotent(program in source_program()) {
        let vocabulary = Vocabulary::default();
        let preprocessor = Preprocessor::new(&vocabulary);
        let once = preprocessor.normalize(&program);
        let twice = preprocessor.normalize(&once);
        prop_assert_eq!(twice, once);
    }
}

/// Property: every accepted identifier has the documented shape and is
/// not a reserved word.
proptest! {
    #[test]
    fn test_accepted_names_are_well_shaped(candidate in "[ -~]{0,12}") {
        let vocabulary = Vocabulary::default();
        if vocabulary.validate_name(&candidate) {
            let mut chars = candidate.chars();
            prop_assert!(chars.next().unwrap().is_ascii_alphabetic());
            prop_assert!(chars.all(|c| c.is_ascii_alphanumeric()));
            prop_assert!(!vocabulary.is_reserved(&candidate));
        }
    }

    #[test]
    fn test_shaped_unreserved_names_are_accepted(name in "[A-Za-z][A-Za-z0-9]{0,11}") {
        let vocabulary = Vocabulary::default();
        prop_assume!(!vocabulary.is_reserved(&name));
        prop_assert!(vocabulary.validate_name(&name));
    }
}

/// Property: a chain `a OP b OP … OP z` evaluates as the right fold
/// `OP(a, OP(b, …, z))`.
proptest! {
    #[test]
    fn test_arithmetic_right_fold_equivalence(
        values in prop::collection::vec(-50i64..50, 1..6),
        op_index in 0usize..3,
    ) {
        let spelling = ["plus", "minus", "into"][op_index];
        let expr = values
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(&format!(" {spelling} "));

        let (mut interpreter, capture) = capturing_interpreter(Defaults::default());
        interpreter
            .execute_source(&format!("let integer v is {expr}\nprint v"))
            .unwrap();

        let expected = values
            .iter()
            .rev()
            .copied()
            .reduce(|acc, value| match op_index {
                0 => value + acc,
                1 => value - acc,
                _ => value * acc,
            })
            .unwrap();
        prop_assert_eq!(capture.contents(), expected.to_string());
    }
}

/// Property: `find_keyword` never reports a match inside a quoted
/// region, and still finds the first occurrence after one.
proptest! {
    #[test]
    fn test_find_keyword_never_matches_in_quotes(
        left in "[b-z]{1,6}",
        inner1 in "[b-z ]{0,6}",
        inner2 in "[b-z ]{0,6}",
    ) {
        let quoted_only = format!("{left} \"{inner1} and {inner2}\"");
        let mut pos = 0;
        prop_assert!(!scanner::find_keyword(&quoted_only, &mut pos, "and"));

        let with_tail = format!("{left} \"{inner1} and {inner2}\" and tail");
        let mut pos = 0;
        prop_assert!(scanner::find_keyword(&with_tail, &mut pos, "and"));
        prop_assert_eq!(&with_tail[pos..pos + 3], "and");
        // Both quotes lie before the reported match.
        prop_assert_eq!(with_tail[..pos].matches('"').count(), 2);
    }
}

/// Property: after `let TYPE NAME` without an initialiser, the name
/// reads back as the configured default.
proptest! {
    #[test]
    fn test_declaration_defaults(default_value in -1000i64..1000, name in "[a-z]{3,8}") {
        let vocabulary = Vocabulary::default();
        prop_assume!(!vocabulary.is_reserved(&name));

        let defaults = Defaults { integer_value: default_value, ..Defaults::default() };
        let (mut interpreter, capture) = capturing_interpreter(defaults);
        interpreter
            .execute_source(&format!("let integer {name}\nprint {name}"))
            .unwrap();
        prop_assert_eq!(capture.contents(), default_value.to_string());
    }
}

/// Property: writing any in-bounds array element and reading it back
/// yields the written value.
proptest! {
    #[test]
    fn test_array_write_read_back(
        size in 1i64..10,
        index in 0i64..10,
        value in -1000i64..1000,
    ) {
        prop_assume!(index < size);
        let (mut interpreter, capture) = capturing_interpreter(Defaults::default());
        interpreter
            .execute_source(&format!(
                "let integer-array a-{size}\na-{index} is {value}\nprint a-{index}"
            ))
            .unwrap();
        prop_assert_eq!(capture.contents(), value.to_string());
    }
}
