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

//! Source normalisation and subroutine harvesting
//!
//! The executor assumes one logical statement per line with single
//! spaces between tokens. This pass produces that text: it trims and
//! collapses whitespace (quoted literals kept verbatim), discards
//! comment lines, glues a line ending in a chaining word onto the line
//! after it, and collects `subroutine … end` bodies into a table.

use crate::scanner;
use crate::vocabulary::{Keyword, Vocabulary};
use std::collections::HashMap;

/// Line-oriented preprocessor producing the normalised program text the
/// executor walks.
pub struct Preprocessor<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> Preprocessor<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Normalise raw source. Runs of spaces collapse to one, leading
    /// and trailing spaces go away, lines opening with the comment
    /// keyword are dropped, and a line whose last word is `and`,
    /// `then`, `else`, or `do` is continued with the following line.
    pub fn normalize(&self, source: &str) -> String {
        let mut out = String::new();
        for raw in source.lines() {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let mut cursor = 0;
            scanner::skip_spaces(line, &mut cursor);
            if cursor >= line.len() {
                continue;
            }
            if line[cursor..].starts_with(self.vocabulary.keyword(Keyword::Leave)) {
                continue;
            }

            let collapsed = collapse_spaces(&line[cursor..]);
            out.push_str(&collapsed);
            if self.ends_with_joiner(&collapsed) {
                out.push(' ');
            } else {
                out.push('\n');
            }
        }
        out
    }

    /// A logical line continues when its last word is a chaining
    /// keyword.
    fn ends_with_joiner(&self, line: &str) -> bool {
        let last_word = match line.rfind(' ') {
            Some(space) => &line[space + 1..],
            None => line,
        };
        [Keyword::And, Keyword::Then, Keyword::Else, Keyword::Do]
            .iter()
            .any(|&keyword| last_word == self.vocabulary.keyword(keyword))
    }

    /// Collect `subroutine NAME … end` bodies from the normalised
    /// program. Bodies also remain in the top-level stream; the
    /// intended discipline is an `end` before the first definition.
    pub fn harvest_subroutines(&self, normalized: &str) -> HashMap<String, Vec<String>> {
        let subroutine_word = self.vocabulary.keyword(Keyword::Subroutine);
        let end_word = self.vocabulary.keyword(Keyword::End);

        let mut table = HashMap::new();
        let mut lines = normalized.lines();
        while let Some(line) = lines.next() {
            let mut cursor = 0;
            scanner::skip_spaces(line, &mut cursor);
            if scanner::next_token(line, &mut cursor) != subroutine_word {
                continue;
            }
            scanner::skip_spaces(line, &mut cursor);
            let name = scanner::next_token(line, &mut cursor).to_string();

            let mut body = Vec::new();
            for body_line in lines.by_ref() {
                if body_line == end_word {
                    break;
                }
                body.push(body_line.to_string());
            }
            table.insert(name, body);
        }
        table
    }
}

/// Collapse runs of spaces to one, keeping quoted stretches verbatim.
/// Leading and trailing runs disappear entirely.
fn collapse_spaces(line: &str) -> String {
    let bytes = line.as_bytes();
    let mut out = String::with_capacity(line.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b' ' {
            while i < bytes.len() && bytes[i] == b' ' {
                i += 1;
            }
            if !out.is_empty() && i < bytes.len() {
                out.push(' ');
            }
            continue;
        }
        let start = i;
        if bytes[i] == b'"' {
            i += 1;
            while i < bytes.len() && bytes[i] != b'"' {
                i += 1;
            }
            if i < bytes.len() {
                i += 1;
            }
        } else {
            while i < bytes.len() && bytes[i] != b' ' && bytes[i] != b'"' {
                i += 1;
            }
        }
        out.push_str(&line[start..i]);
    }
    out
}
