//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The parser takes lexed tokens and builds the generic tree.

use crate::error::{Diagnostic, Error, Sink};
use crate::lexer::{LexedToken, Location, Token};
use crate::model::ImoId;
use crate::tree::Node;

use std::collections::VecDeque;

pub const MAX_PARSE_DEPTH: usize = 255;

pub fn parse(tokens: Vec<LexedToken>, sink: &mut dyn Sink) -> Result<Node, Error>
{
	let mut tokens = Tokens::from(tokens);
	let root = parse_element(&mut tokens, sink, 0)?;
	match tokens.pop_front()
	{
		None => Ok(root),
		Some(LexedToken {
			result: Ok(Token::ParenRight),
			location,
		}) => Err(Error::UnbalancedParenthesis { location }),
		Some(LexedToken {
			result: Ok(_),
			location,
		}) => Err(Error::UnexpectedToken {
			location,
			expectation: "Expected end of file.".to_string(),
		}),
		Some(LexedToken {
			result: Err(error),
			location,
		}) => Err(Error::Lexical {
			error,
			location,
			expectation: "Expected end of file.".to_string(),
		}),
	}
}

struct Tokens
{
	tokens: VecDeque<LexedToken>,
	last_location: Location,
}

impl From<Vec<LexedToken>> for Tokens
{
	fn from(tokens: Vec<LexedToken>) -> Tokens
	{
		let last_location = match tokens.first()
		{
			Some(LexedToken {
				result: _,
				location,
			}) => Location {
				span: location.span.start..location.span.start,
				..location.clone()
			},
			None => Location::default(),
		};
		Tokens {
			tokens: VecDeque::from(tokens),
			last_location,
		}
	}
}

impl Tokens
{
	fn pop_front(&mut self) -> Option<LexedToken>
	{
		let popped = self.tokens.pop_front();
		if let Some(LexedToken {
			result: _,
			location,
		}) = &popped
		{
			self.last_location = location.clone();
		}
		popped
	}
}

fn peek(tokens: &mut Tokens) -> Option<&Token>
{
	match tokens.tokens.front()
	{
		Some(LexedToken {
			result: Ok(token),
			location: _,
		}) => Some(token),
		Some(LexedToken {
			result: Err(_),
			location: _,
		}) => None,
		None => None,
	}
}

fn extract(
	expectation: &str,
	tokens: &mut Tokens,
) -> Result<(Token, Location), Error>
{
	match tokens.pop_front()
	{
		Some(LexedToken {
			result: Ok(token),
			location,
		}) => Ok((token, location)),
		Some(LexedToken {
			result: Err(error),
			location,
		}) => Err(Error::Lexical {
			error,
			expectation: expectation.to_string(),
			location,
		}),
		None => Err(Error::UnexpectedEndOfFile {
			expectation: expectation.to_string(),
			last_location: tokens.last_location.clone(),
		}),
	}
}

fn parse_element(
	tokens: &mut Tokens,
	sink: &mut dyn Sink,
	depth: usize,
) -> Result<Node, Error>
{
	let (token, start) = extract("Expected '('.", tokens)?;
	if token != Token::ParenLeft
	{
		return Err(Error::UnexpectedToken {
			location: start,
			expectation: "Expected '('.".to_string(),
		});
	}
	if depth >= MAX_PARSE_DEPTH
	{
		return Err(Error::MaximumParseDepthExceeded { location: start });
	}

	let (token, location_of_tag) = extract("Expected element name.", tokens)?;
	let tag = match token
	{
		Token::Label(tag) => tag,
		_ =>
		{
			return Err(Error::UnexpectedToken {
				location: location_of_tag,
				expectation: "Expected element name.".to_string(),
			})
		}
	};
	let (name, id) = split_id(&tag, &location_of_tag, sink);

	let mut children = Vec::new();
	loop
	{
		match peek(tokens)
		{
			Some(Token::ParenLeft) =>
			{
				let child = parse_element(tokens, sink, depth + 1)?;
				children.push(child);
			}
			Some(Token::ParenRight) =>
			{
				tokens.pop_front();
				break;
			}
			_ =>
			{
				let (token, location) = extract("Expected ')'.", tokens)?;
				let child = match token
				{
					Token::Label(value) if value == "noVisible" =>
					{
						let no = Node::label("no", location.clone());
						Node::element("visible", None, vec![no], location)
					}
					Token::Label(value) => Node::label(&value, location),
					Token::Number(value) => Node::number(&value, location),
					Token::Text(value) => Node::string(&value, location),
					Token::ParenLeft | Token::ParenRight =>
					{
						return Err(Error::UnexpectedToken {
							location,
							expectation: "Expected ')'.".to_string(),
						})
					}
				};
				children.push(child);
			}
		}
	}

	let location = start.combined_with(&tokens.last_location);
	Ok(Node::element(&name, id, children, location))
}

/// Splits `name#id`; a malformed id is reported and discarded.
fn split_id(
	tag: &str,
	location: &Location,
	sink: &mut dyn Sink,
) -> (String, Option<ImoId>)
{
	match tag.split_once('#')
	{
		Some((name, id)) => match id.parse::<ImoId>()
		{
			Ok(id) if id >= 0 => (name.to_string(), Some(id)),
			_ =>
			{
				let message = format!("Bad id in name '{}'.", tag);
				sink.report(Diagnostic::new(location, message));
				(name.to_string(), None)
			}
		},
		None => (tag.to_string(), None),
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::lexer;
	use crate::registry::ElementKind;
	use pretty_assertions::assert_eq;

	fn parse_source(source: &str) -> (Result<Node, Error>, String)
	{
		let mut diagnostics = String::new();
		let tokens = lexer::lex(source, "test.lmd");
		let result = parse(tokens, &mut diagnostics);
		(result, diagnostics)
	}

	#[test]
	fn parse_nested_elements()
	{
		let (result, diagnostics) =
			parse_source("(score (vers 1.6)\n(instrument (musicData (n c4 q))))");
		let root = result.unwrap();
		assert_eq!(diagnostics, "");
		assert_eq!(root.kind, Some(ElementKind::Score));
		assert_eq!(root.children.len(), 2);
		let note = &root.children[1].children[0].children[0];
		assert_eq!(note.kind, Some(ElementKind::Note));
		assert_eq!(note.line(), 1);
		assert_eq!(note.children[0].value(), "c4");
	}

	#[test]
	fn parse_ids()
	{
		let (result, diagnostics) = parse_source("(n#27 c4 q)");
		let root = result.unwrap();
		assert_eq!(diagnostics, "");
		assert_eq!(root.name, "n");
		assert_eq!(root.id, Some(27));
	}

	#[test]
	fn report_bad_id()
	{
		let (result, diagnostics) = parse_source("(n#2x c4 q)");
		let root = result.unwrap();
		assert_eq!(diagnostics, "Line 0. Bad id in name 'n#2x'.\n");
		assert_eq!(root.name, "n");
		assert_eq!(root.id, None);
	}

	#[test]
	fn rewrite_no_visible()
	{
		let (result, _) = parse_source("(clef G noVisible)");
		let root = result.unwrap();
		assert_eq!(root.to_ldp(), "(clef G (visible no))");
	}

	#[test]
	fn fail_on_missing_parenthesis()
	{
		let (result, _) = parse_source("(score (vers 1.6)");
		assert_eq!(result.map_err(|e| e.code()), Err(300));
	}

	#[test]
	fn fail_on_extra_parenthesis()
	{
		let (result, _) = parse_source("(score (vers 1.6)))");
		assert_eq!(result.map_err(|e| e.code()), Err(302));
	}

	#[test]
	fn fail_on_leaf_root()
	{
		let (result, _) = parse_source("score");
		assert_eq!(result.map_err(|e| e.code()), Err(301));
	}

	#[test]
	fn fail_on_empty_source()
	{
		let (result, _) = parse_source("// nothing here\n");
		assert_eq!(result.map_err(|e| e.code()), Err(300));
	}
}
