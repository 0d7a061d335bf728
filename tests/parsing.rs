//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

use cadenza::lexer;
use cadenza::parser;
use cadenza::tree::Node;
use cadenza::Error;

use pretty_assertions::assert_eq;

fn parse(filename: &str) -> (Result<Node, Error>, String)
{
	let source = std::fs::read_to_string(filename).unwrap();
	let tokens = lexer::lex(&source, filename);
	let mut diagnostics = String::new();
	let result = parser::parse(tokens, &mut diagnostics);
	(result, diagnostics)
}

fn parse_to_fail(code: u16, filename: &str)
{
	match parse(filename)
	{
		(Ok(_), _) => panic!("broken test"),
		(Err(error), _) => assert_eq!(error.code(), code, "unexpected {:?}", error),
	}
}

#[test]
fn parse_minimal()
{
	let (result, diagnostics) = parse("tests/samples/minimal.lmd");
	assert_eq!(diagnostics, "");
	let root = result.unwrap();
	assert_eq!(root.name, "score");
	assert_eq!(root.children.len(), 2);
}

#[test]
fn parse_valid_samples()
{
	for filename in [
		"tests/samples/valid/document.lmd",
		"tests/samples/valid/beams_and_tuplets.lmd",
		"tests/samples/warnings.lmd",
	]
	{
		let (result, diagnostics) = parse(filename);
		assert!(result.is_ok(), "failed to parse {}", filename);
		assert_eq!(diagnostics, "");
	}
}

#[test]
fn reparse_written_tree()
{
	let (result, _) = parse("tests/samples/valid/beams_and_tuplets.lmd");
	let root = result.unwrap();
	let text = root.to_ldp();
	let tokens = lexer::lex(&text, "rewritten.lmd");
	let mut diagnostics = String::new();
	let reparsed = parser::parse(tokens, &mut diagnostics).unwrap();
	assert_eq!(reparsed.to_ldp(), text);
}

#[test]
fn fail_to_parse_missing_parenthesis()
{
	parse_to_fail(300, "tests/samples/invalid/missing_parenthesis.lmd");
}

#[test]
fn fail_to_parse_extra_parenthesis()
{
	parse_to_fail(302, "tests/samples/invalid/extra_parenthesis.lmd");
}

#[test]
fn fail_to_parse_unterminated_string()
{
	parse_to_fail(111, "tests/samples/invalid/unterminated_string.lmd");
}

#[test]
fn fail_to_parse_unexpected_character()
{
	parse_to_fail(110, "tests/samples/invalid/unexpected_character.lmd");
}
