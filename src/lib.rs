//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

pub mod analyzer;
pub mod autobeamer;
pub mod context;
pub mod error;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod registry;
pub mod relations;
pub mod stdout;
pub mod tree;

pub use analyzer::analyse;
pub use error::{Diagnostic, Error, Sink};
pub use model::Model;

/// Lexes, parses and analyses LDP source text. Diagnostics from both the
/// parser and the analyzer go to `sink`; only malformed syntax is an error.
pub fn analyse_source(
	source: &str,
	filename: &str,
	sink: &mut dyn Sink,
) -> Result<Model, Error>
{
	let tokens = lexer::lex(source, filename);
	let tree = parser::parse(tokens, sink)?;
	Ok(analyzer::analyse(&tree, filename, sink))
}

#[cfg(test)]
mod tests
{
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn analyse_minimal_score()
	{
		let source = include_str!("../tests/samples/minimal.lmd");
		let mut diagnostics = String::new();
		let model = analyse_source(source, "minimal.lmd", &mut diagnostics).unwrap();
		assert_eq!(diagnostics, "");
		assert_eq!(model.find_all("score").len(), 1);
		assert_eq!(model.find_all("note").len(), 4);
	}

	#[test]
	fn syntax_errors_are_errors()
	{
		let mut diagnostics = String::new();
		let result = analyse_source("(score (vers 1.6)", "broken.lmd", &mut diagnostics);
		assert!(result.is_err());
	}
}
