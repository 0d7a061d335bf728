//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The lexer turns LDP source text into a flat list of tokens.

use std::iter::{Enumerate, Peekable};
use std::str::Chars;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token
{
	ParenLeft,
	ParenRight,
	Label(String),
	Number(String),
	Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{
	UnexpectedCharacter,
	UnterminatedString,
}

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedToken
{
	pub result: Result<Token, Error>,
	pub location: Location,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Location
{
	pub source_filename: String,
	pub span: std::ops::Range<usize>,
	pub line_number: usize,
	pub line_offset: usize,
}

impl Location
{
	pub fn format(&self) -> String
	{
		format!(
			"at {}:{}:{}",
			self.source_filename,
			self.line_number + 1,
			self.line_offset + 1
		)
	}

	pub fn label(&self) -> ariadne::Label<(String, std::ops::Range<usize>)>
	{
		ariadne::Label::new((self.source_filename.clone(), self.span.clone()))
	}

	pub fn label_after_end(
		&self,
	) -> ariadne::Label<(String, std::ops::Range<usize>)>
	{
		let end = self.span.end;
		ariadne::Label::new((self.source_filename.clone(), end..(end + 1)))
	}

	pub fn combined_with(&self, other: &Location) -> Location
	{
		let end = std::cmp::max(self.span.end, other.span.end);
		Location {
			source_filename: self.source_filename.clone(),
			span: self.span.start..end,
			line_number: self.line_number,
			line_offset: self.line_offset,
		}
	}
}

type Stream<'a> = Peekable<Enumerate<Chars<'a>>>;

pub fn lex(source: &str, source_filename: &str) -> Vec<LexedToken>
{
	let mut tokens = Vec::new();
	let mut line_number = 0;
	let mut last_line_start_offset = 0;
	let source_length = source.chars().count();
	// Set by compact notation `name:value`, which reads as `(name value)`.
	let mut is_closing_after_next = false;

	let mut iter = source.chars().enumerate().peekable();
	while let Some((offset_of_x, x)) = iter.next()
	{
		let line_offset = offset_of_x - last_line_start_offset;
		let start_line_number = line_number;
		let result = match x
		{
			'\n' =>
			{
				line_number += 1;
				last_line_start_offset = offset_of_x + 1;
				continue;
			}
			' ' | '\t' | '\r' => continue,
			'/' if matches!(iter.peek(), Some((_, '/'))) =>
			{
				while let Some((_, y)) = iter.peek()
				{
					if *y == '\n'
					{
						break;
					}
					iter.next();
				}
				continue;
			}
			'(' => Ok(Token::ParenLeft),
			')' => Ok(Token::ParenRight),
			'"' | '\'' => lex_string(
				x,
				&mut iter,
				&mut line_number,
				&mut last_line_start_offset,
			),
			'_' if matches!(iter.peek(), Some((_, '"'))) =>
			{
				iter.next();
				lex_string(
					'"',
					&mut iter,
					&mut line_number,
					&mut last_line_start_offset,
				)
			}
			'0'..='9' => Ok(lex_number(x.to_string(), &mut iter)),
			'+' | '-' | '=' => Ok(lex_signed(x, &mut iter)),
			x if is_label_start(x) =>
			{
				Ok(Token::Label(lex_label(x.to_string(), &mut iter)))
			}
			_ => Err(Error::UnexpectedCharacter),
		};

		let end = match iter.peek()
		{
			Some((offset, _)) => *offset,
			None => source_length,
		};
		let location = Location {
			source_filename: source_filename.to_string(),
			span: offset_of_x..end,
			line_number: start_line_number,
			line_offset,
		};

		let is_compact = match &result
		{
			Ok(Token::Label(_)) => matches!(iter.peek(), Some((_, ':'))),
			_ => false,
		};
		if is_compact
		{
			iter.next();
			tokens.push(LexedToken {
				result: Ok(Token::ParenLeft),
				location: location.clone(),
			});
			tokens.push(LexedToken { result, location });
			is_closing_after_next = true;
			continue;
		}

		let is_value = !matches!(result, Ok(Token::ParenLeft));
		tokens.push(LexedToken {
			result,
			location: location.clone(),
		});
		if is_closing_after_next && is_value
		{
			tokens.push(LexedToken {
				result: Ok(Token::ParenRight),
				location,
			});
			is_closing_after_next = false;
		}
	}
	tokens
}

fn is_label_start(x: char) -> bool
{
	x.is_alphabetic() || matches!(x, '[' | '|' | '*' | '#' | '_')
}

fn is_label_char(x: char) -> bool
{
	x.is_alphanumeric()
		|| matches!(
			x,
			'_' | '.' | '+' | '-' | '#' | '/' | '=' | '\'' | ']' | '|' | '*'
		)
}

fn lex_label(mut label: String, iter: &mut Stream) -> String
{
	while let Some(&(_, x)) = iter.peek()
	{
		if !is_label_char(x)
		{
			break;
		}
		label.push(x);
		iter.next();
	}
	label
}

fn lex_number(mut number: String, iter: &mut Stream) -> Token
{
	let mut has_fraction = false;
	while let Some(&(_, x)) = iter.peek()
	{
		if x.is_ascii_digit()
		{
			number.push(x);
			iter.next();
		}
		else if x == '.' && !has_fraction
		{
			has_fraction = true;
			number.push(x);
			iter.next();
		}
		else if is_label_char(x)
		{
			// Clef names such as `8_G` start with a digit.
			return Token::Label(lex_label(number, iter));
		}
		else
		{
			break;
		}
	}
	Token::Number(number)
}

fn lex_signed(x: char, iter: &mut Stream) -> Token
{
	let mut buffer = x.to_string();
	while let Some(&(_, y)) = iter.peek()
	{
		if !matches!(y, '+' | '-' | '=')
		{
			break;
		}
		buffer.push(y);
		iter.next();
	}
	match iter.peek()
	{
		Some(&(_, y)) if y.is_ascii_digit() && (buffer == "-" || buffer == "+") =>
		{
			lex_number(buffer, iter)
		}
		_ => Token::Label(lex_label(buffer, iter)),
	}
}

fn lex_string(
	delimiter: char,
	iter: &mut Stream,
	line_number: &mut usize,
	last_line_start_offset: &mut usize,
) -> Result<Token, Error>
{
	let mut text = String::new();
	while let Some((offset, x)) = iter.next()
	{
		if x == delimiter
		{
			return Ok(Token::Text(text));
		}
		if x == '\n'
		{
			*line_number += 1;
			*last_line_start_offset = offset + 1;
		}
		text.push(x);
	}
	Err(Error::UnterminatedString)
}
