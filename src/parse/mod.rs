pub mod ast;
mod error;
pub mod lexer;
mod parser;
pub mod visit;

pub use error::{Diagnostic, DiagnosticKind, Diagnostics};
pub use parser::{Parser, DEFAULT_MAX_DEPTH};

/// A parsed program together with everything the parser had to report.
/// Parsing never fails outright; the program is always a best effort.
#[derive(Debug, Clone, PartialEq)]
pub struct Parse<'a> {
    pub program: ast::Program<'a>,
    pub diagnostics: Diagnostics,
}

impl<'a> Parse<'a> {
    /// The program, or the diagnostics if there were any.
    pub fn into_result(self) -> Result<ast::Program<'a>, Diagnostics> {
        if self.diagnostics.is_empty() {
            Ok(self.program)
        } else {
            Err(self.diagnostics)
        }
    }
}

pub fn parse(s: &str) -> Parse<'_> {
    Parser::new(s).parse()
}
