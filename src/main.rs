//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

use cadenza::analyzer;
use cadenza::lexer;
use cadenza::parser;
use cadenza::registry;
use cadenza::stdout::{CharSet, ColorChoice, Options, StdOut};
use cadenza::Diagnostic;

use anyhow::anyhow;
use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

#[derive(Debug, clap::Parser)]
#[clap(version, propagate_version = true)]
#[clap(args_conflicts_with_subcommands = true)]
struct Cli
{
	#[clap(subcommand)]
	sub: Option<Subcommand>,

	#[clap(flatten)]
	check: CheckArgs,
}

#[derive(Debug, clap::Subcommand)]
enum Subcommand
{
	/// Analyse one or more LDP files and report problems (default)
	Check(CheckArgs),
	/// Analyse LDP files and print the resulting score model
	Dump(CheckArgs),
	/// Print the grammar of one element, or of all known elements
	Grammar(GrammarArgs),
}

#[derive(Debug, Default, clap::Args)]
struct CheckArgs
{
	/// One or more LDP source files
	#[clap(value_parser, required(true))]
	filepaths: Vec<std::path::PathBuf>,

	/// Load additional options from TOML file
	#[clap(long)]
	config: Option<std::path::PathBuf>,

	/// Fail when any problem is reported, not only on syntax errors
	#[clap(long)]
	strict: bool,

	#[clap(flatten)]
	options: Options,
}

#[derive(Debug, Default, clap::Args)]
struct GrammarArgs
{
	/// The name of an LDP element, such as 'n' or 'clef'
	element: Option<String>,
}

/// The contents of a `--config` file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config
{
	strict: bool,
	verbose: bool,
	color: Option<ColorChoice>,
	arrows: Option<CharSet>,
}

fn main() -> Result<(), anyhow::Error>
{
	#[cfg(feature = "logging")]
	env_logger::init();

	let cli = Cli::parse();
	match cli.sub
	{
		None => check(cli.check, false),
		Some(Subcommand::Check(args)) => check(args, false),
		Some(Subcommand::Dump(args)) => check(args, true),
		Some(Subcommand::Grammar(args)) => grammar(args),
	}
}

fn load_config(filename: &std::path::Path) -> Result<Config, anyhow::Error>
{
	let raw = std::fs::read_to_string(filename).with_context(|| {
		format!("failed to read '{}'", filename.to_string_lossy())
	})?;
	let config = toml::from_str(&raw).with_context(|| {
		format!("failed to parse '{}'", filename.to_string_lossy())
	})?;
	Ok(config)
}

fn check(args: CheckArgs, is_dump: bool) -> Result<(), anyhow::Error>
{
	let CheckArgs {
		filepaths,
		config,
		strict,
		mut options,
	} = args;
	let config = match config
	{
		Some(filename) => load_config(&filename)?,
		None => Config::default(),
	};
	let strict = strict || config.strict;
	options.verbose = options.verbose || config.verbose;
	if options.color == ColorChoice::Auto
	{
		options.color = config.color.unwrap_or_default();
	}
	if options.arrows == CharSet::Unicode
	{
		options.arrows = config.arrows.unwrap_or_default();
	}
	let mut stdout = StdOut::new(&options);

	let mut num_failed = 0;
	let mut num_problems = 0;
	for filepath in filepaths
	{
		let filename = filepath.to_string_lossy().to_string();
		let source = std::fs::read_to_string(&filepath)
			.with_context(|| format!("failed to read '{}'", filename))?;
		let sources = || ariadne::sources(vec![(filename.clone(), source.clone())]);

		stdout.header("Lexing", &filename)?;
		let tokens = lexer::lex(&source, &filename);
		stdout.dump_tokens(&tokens)?;

		stdout.header("Parsing", &filename)?;
		let mut diagnostics: Vec<Diagnostic> = Vec::new();
		let tree = match parser::parse(tokens, &mut diagnostics)
		{
			Ok(tree) => tree,
			Err(error) =>
			{
				stdout.show_diagnostics(&diagnostics, sources())?;
				stdout.show_error(&error, sources())?;
				num_failed += 1;
				continue;
			}
		};
		stdout.dump_tree(&tree)?;

		stdout.header("Analysing", &filename)?;
		let model = analyzer::analyse(&tree, &filename, &mut diagnostics);
		stdout.show_diagnostics(&diagnostics, sources())?;
		if is_dump
		{
			stdout.dump_model(&model)?;
		}
		stdout.summary(&filename, diagnostics.len())?;
		num_problems += diagnostics.len();
	}
	stdout.done()?;

	if num_failed > 0
	{
		Err(anyhow!("{} file(s) could not be parsed", num_failed))
	}
	else if strict && num_problems > 0
	{
		Err(anyhow!("{} problem(s) found", num_problems))
	}
	else
	{
		Ok(())
	}
}

fn grammar(args: GrammarArgs) -> Result<(), anyhow::Error>
{
	let mut stdout = StdOut::new(&Options::default());
	match args.element
	{
		Some(name) =>
		{
			let entry = registry::lookup(&name)
				.with_context(|| format!("unknown element '{}'", name))?;
			stdout.grammar(&registry::describe(entry))?;
		}
		None =>
		{
			for entry in registry::entries()
			{
				stdout.grammar(&registry::describe(entry))?;
			}
		}
	}
	Ok(())
}
