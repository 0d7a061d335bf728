//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

pub use crate::lexer;
pub use crate::lexer::Location;

use ariadne::{Fmt, Report, ReportKind};

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{
	UnexpectedEndOfFile
	{
		last_location: Location,
		expectation: String,
	},
	Lexical
	{
		error: lexer::Error,
		location: Location,
		expectation: String,
	},
	UnexpectedToken
	{
		location: Location,
		expectation: String,
	},
	UnbalancedParenthesis
	{
		location: Location
	},
	MaximumParseDepthExceeded
	{
		location: Location
	},
}

impl Error
{
	pub fn code(&self) -> u16
	{
		match self
		{
			Error::Lexical {
				error: lexer::Error::UnexpectedCharacter,
				..
			} => 110,
			Error::Lexical {
				error: lexer::Error::UnterminatedString,
				..
			} => 111,
			Error::UnexpectedEndOfFile { .. } => 300,
			Error::UnexpectedToken { .. } => 301,
			Error::UnbalancedParenthesis { .. } => 302,
			Error::MaximumParseDepthExceeded { .. } => 380,
		}
	}

	pub fn report(
		&self,
		config: ariadne::Config,
	) -> Report<(String, std::ops::Range<usize>)>
	{
		let mut colors = ariadne::ColorGenerator::new();
		let a = colors.next();
		let b = colors.next();

		match self
		{
			Error::UnexpectedEndOfFile {
				expectation,
				last_location,
			} => Report::build(
				ReportKind::Error,
				&last_location.source_filename,
				last_location.span.start,
			)
			.with_code(format!("E{}", self.code()))
			.with_message("Unexpected end of file")
			.with_label(
				last_location
					.label_after_end()
					.with_message(expectation)
					.with_order(1)
					.with_color(a),
			)
			.with_label(
				last_location
					.label()
					.with_message("Expected more after this.")
					.with_order(2)
					.with_color(b),
			)
			.with_config(config)
			.finish(),

			Error::Lexical {
				error: lexer::Error::UnexpectedCharacter,
				expectation,
				location,
			} => Report::build(
				ReportKind::Error,
				&location.source_filename,
				location.span.start,
			)
			.with_code(format!("E{}", self.code()))
			.with_message("Unexpected character")
			.with_label(location.label().with_message(expectation).with_color(a))
			.with_config(config)
			.finish(),

			Error::Lexical {
				error: lexer::Error::UnterminatedString,
				expectation,
				location,
			} => Report::build(
				ReportKind::Error,
				&location.source_filename,
				location.span.start,
			)
			.with_code(format!("E{}", self.code()))
			.with_message("Unterminated string")
			.with_label(location.label().with_message(expectation).with_color(a))
			.with_note(format!(
				"Strings are closed by the same quote that opens them, {} or {}.",
				"\"".fg(a),
				"'".fg(a)
			))
			.with_config(config)
			.finish(),

			Error::UnexpectedToken {
				expectation,
				location,
			} => Report::build(
				ReportKind::Error,
				&location.source_filename,
				location.span.start,
			)
			.with_code(format!("E{}", self.code()))
			.with_message("Unexpected token")
			.with_label(location.label().with_message(expectation).with_color(a))
			.with_config(config)
			.finish(),

			Error::UnbalancedParenthesis { location } => Report::build(
				ReportKind::Error,
				&location.source_filename,
				location.span.start,
			)
			.with_code(format!("E{}", self.code()))
			.with_message("Unbalanced parenthesis")
			.with_label(
				location
					.label()
					.with_message("This closes an element that was never opened.")
					.with_color(a),
			)
			.with_config(config)
			.finish(),

			Error::MaximumParseDepthExceeded { location } => Report::build(
				ReportKind::Error,
				&location.source_filename,
				location.span.start,
			)
			.with_code(format!("E{}", self.code()))
			.with_message("Maximum parse depth exceeded")
			.with_label(
				location
					.label()
					.with_message("Elements are nested too deeply here.")
					.with_color(a),
			)
			.with_config(config)
			.finish(),
		}
	}
}

/// A recoverable problem found in well-formed input, rendered as
/// `Line <n>. <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic
{
	pub line: usize,
	pub message: String,
	pub location: Location,
}

impl Diagnostic
{
	pub fn new(location: &Location, message: impl Into<String>) -> Diagnostic
	{
		Diagnostic {
			line: location.line_number,
			message: message.into(),
			location: location.clone(),
		}
	}

	pub fn report(
		&self,
		config: ariadne::Config,
	) -> Report<(String, std::ops::Range<usize>)>
	{
		let mut colors = ariadne::ColorGenerator::new();
		let a = colors.next();

		Report::build(
			ReportKind::Warning,
			&self.location.source_filename,
			self.location.span.start,
		)
		.with_message(&self.message)
		.with_label(
			self.location
				.label()
				.with_message(format!("Line {}.", self.line.fg(a)))
				.with_color(a),
		)
		.with_config(config)
		.finish()
	}
}

impl std::fmt::Display for Diagnostic
{
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result
	{
		write!(f, "Line {}. {}", self.line, self.message)
	}
}

/// Receives diagnostics in the order they are found.
pub trait Sink
{
	fn report(&mut self, diagnostic: Diagnostic);
}

impl Sink for String
{
	fn report(&mut self, diagnostic: Diagnostic)
	{
		self.push_str(&diagnostic.to_string());
		self.push('\n');
	}
}

impl Sink for Vec<Diagnostic>
{
	fn report(&mut self, diagnostic: Diagnostic)
	{
		self.push(diagnostic);
	}
}
