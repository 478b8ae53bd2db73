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

//! SYMLS interpreter library
//!
//! SYMLS is a small imperative language whose keywords and operators
//! are English words (`let`, `is`, `if … then … else … stop`,
//! `plus`, `upon`, `less-than`). Programs are executed directly from
//! their source text: a line-oriented preprocessor normalises
//! whitespace and harvests `subroutine … end` bodies, and a
//! tree-walking executor dispatches on the first word of each logical
//! line, counting keywords to find block bounds. There is no AST and
//! no bytecode.
//!
//! The usual entry point is [`Interpreter::execute_source`], which
//! preprocesses and runs a program against the interpreter's I/O
//! streams. Spellings of every keyword and operator can be rebound
//! once at startup through [`config::Config`].

pub mod config;
pub mod error;
mod eval;
pub mod interpreter;
pub mod preprocessor;
pub mod scanner;
pub mod store;
pub mod vocabulary;

pub use config::{Config, ConfigError, Defaults};
pub use error::{ErrorKind, RuntimeError};
pub use interpreter::{Control, Interpreter};
pub use preprocessor::Preprocessor;
pub use vocabulary::Vocabulary;
