//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The command line interface prints diagnostics as colored reports and
//! dumps intermediate results when run with the _verbose_ flag.

use crate::error::{Diagnostic, Error};
use crate::lexer;
use crate::model::Model;
use crate::tree::Node;

use serde::Deserialize;
use std::io::Write;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

#[derive(Debug, Default, Deserialize, clap::Args)]
#[serde(default, deny_unknown_fields)]
pub struct Options
{
	/// Show the tokens and the element tree of each file
	#[clap(short, long)]
	pub verbose: bool,

	/// When to use ANSI colors in diagnostics and intermediate output
	#[clap(long, value_name("WHEN"))]
	#[clap(value_enum, default_value_t=ColorChoice::Auto)]
	pub color: ColorChoice,

	/// Which character set to use to draw the arrows in diagnostics
	#[clap(long, value_name("CHARSET"))]
	#[clap(value_enum, default_value_t=CharSet::Unicode)]
	pub arrows: CharSet,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice
{
	#[default]
	Auto,
	Always,
	Never,
}

impl From<ColorChoice> for termcolor::ColorChoice
{
	fn from(choice: ColorChoice) -> termcolor::ColorChoice
	{
		match choice
		{
			ColorChoice::Auto => termcolor::ColorChoice::Auto,
			ColorChoice::Always => termcolor::ColorChoice::Always,
			ColorChoice::Never => termcolor::ColorChoice::Never,
		}
	}
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CharSet
{
	#[default]
	Unicode,
	Ascii,
}

impl From<CharSet> for ariadne::CharSet
{
	fn from(choice: CharSet) -> ariadne::CharSet
	{
		match choice
		{
			CharSet::Unicode => ariadne::CharSet::Unicode,
			CharSet::Ascii => ariadne::CharSet::Ascii,
		}
	}
}

pub struct StdOut
{
	stdout: StandardStream,
	is_verbose: bool,
	report_config: ariadne::Config,
}

impl StdOut
{
	pub fn new(options: &Options) -> StdOut
	{
		let stdout = StandardStream::stdout(options.color.into());
		let with_color = match options.color
		{
			ColorChoice::Auto => stdout.supports_color(),
			ColorChoice::Always => true,
			ColorChoice::Never => false,
		};
		let report_config = ariadne::Config::default()
			.with_color(with_color)
			.with_char_set(options.arrows.into());
		StdOut {
			stdout,
			is_verbose: options.verbose,
			report_config,
		}
	}

	pub fn header(
		&mut self,
		preamble: &str,
		filename: &str,
	) -> Result<(), std::io::Error>
	{
		if self.is_verbose
		{
			self.stdout.set_color(&ColorSpec::new())?;
			writeln!(self.stdout, "{} {}...", preamble, filename)?;
		}
		Ok(())
	}

	pub fn dump_tokens(
		&mut self,
		tokens: &[lexer::LexedToken],
	) -> Result<(), std::io::Error>
	{
		if self.is_verbose
		{
			let colorspec_dump = ColorSpec::new().set_dimmed(true).to_owned();
			self.stdout.set_color(&colorspec_dump)?;
			for token in tokens
			{
				match &token.result
				{
					Ok(token) => write!(self.stdout, "{:?}   ", token)?,
					Err(_) => write!(self.stdout, "ERROR   ")?,
				}
			}
			writeln!(self.stdout)?;
			writeln!(self.stdout)?;
		}
		Ok(())
	}

	pub fn dump_tree(&mut self, tree: &Node) -> Result<(), std::io::Error>
	{
		if self.is_verbose
		{
			let colorspec_dump = ColorSpec::new().set_dimmed(true).to_owned();
			self.stdout.set_color(&colorspec_dump)?;
			writeln!(self.stdout, "{}", tree.to_ldp())?;
			writeln!(self.stdout)?;
		}
		Ok(())
	}

	/// Prints the model regardless of verbosity.
	pub fn dump_model(&mut self, model: &Model) -> Result<(), std::io::Error>
	{
		self.stdout.reset()?;
		write!(self.stdout, "{}", model.dump())?;
		Ok(())
	}

	pub fn show_diagnostics(
		&mut self,
		diagnostics: &[Diagnostic],
		mut source_cache: impl ariadne::Cache<String>,
	) -> Result<(), std::io::Error>
	{
		for diagnostic in diagnostics
		{
			let report = diagnostic.report(self.report_config);
			report.eprint(&mut source_cache)?;
		}
		Ok(())
	}

	pub fn show_error(
		&mut self,
		error: &Error,
		mut source_cache: impl ariadne::Cache<String>,
	) -> Result<(), std::io::Error>
	{
		let colorspec_error = ColorSpec::new()
			.set_fg(Some(Color::Red))
			.set_bold(true)
			.to_owned();
		self.stdout.set_color(&colorspec_error)?;
		writeln!(self.stdout)?;
		let report = error.report(self.report_config);
		report.eprint(&mut source_cache)?;
		Ok(())
	}

	pub fn summary(
		&mut self,
		filename: &str,
		count: usize,
	) -> Result<(), std::io::Error>
	{
		if count == 0
		{
			let colorspec_success =
				ColorSpec::new().set_fg(Some(Color::Green)).to_owned();
			self.stdout.set_color(&colorspec_success)?;
			writeln!(self.stdout, "{}: no problems found.", filename)?;
		}
		else
		{
			let colorspec_warning = ColorSpec::new()
				.set_fg(Some(Color::Yellow))
				.set_bold(true)
				.to_owned();
			self.stdout.set_color(&colorspec_warning)?;
			writeln!(self.stdout, "{}: {} problem(s) found.", filename, count)?;
		}
		self.stdout.reset()?;
		Ok(())
	}

	pub fn grammar(&mut self, line: &str) -> Result<(), std::io::Error>
	{
		self.stdout.reset()?;
		writeln!(self.stdout, "{}", line)?;
		Ok(())
	}

	pub fn done(&mut self) -> Result<(), std::io::Error>
	{
		if self.is_verbose
		{
			self.stdout.reset()?;
			writeln!(self.stdout, "Done.")?;
		}
		Ok(())
	}
}
