//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! Score options. Each known option has one value type; an option that is
//! declared again replaces the earlier value.

use crate::analyzer::values::{leading_integer, leading_real};
use crate::analyzer::{Analysed, Analyzer, Params};
use crate::model::{Handle, ImoKind, OptionValue};
use crate::registry::ElementKind;
use crate::tree::Node;

const BOOL_OPTIONS: [&str; 5] = [
	"Score.FillPageWithEmptyStaves",
	"Score.JustifyFinalBarline",
	"StaffLines.StopAtFinalBarline",
	"StaffLines.Hide",
	"Staff.DrawLeftBarline",
];

const LONG_OPTIONS: [&str; 6] = [
	"Render.SpacingMethod",
	"Render.SpacingOptions",
	"Render.SpacingValue",
	"Score.JustifyLastSystem",
	"Staff.UpperLegerLines.Displacement",
	"StaffLines.Truncate",
];

const FLOAT_OPTIONS: [&str; 2] = ["Render.SpacingFactor", "Render.SpacingFopt"];

/// Deprecated boolean options and the long options that replaced them.
const RENAMED_OPTIONS: [(&str, &str); 2] = [
	("Score.JustifyFinalBarline", "Score.JustifyLastSystem"),
	("StaffLines.StopAtFinalBarline", "StaffLines.Truncate"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionType
{
	Bool,
	Long,
	Float,
}

fn option_type(name: &str) -> Option<OptionType>
{
	if BOOL_OPTIONS.contains(&name)
	{
		Some(OptionType::Bool)
	}
	else if LONG_OPTIONS.contains(&name)
	{
		Some(OptionType::Long)
	}
	else if FLOAT_OPTIONS.contains(&name)
	{
		Some(OptionType::Float)
	}
	else
	{
		None
	}
}

fn parse_option(option_type: OptionType, value: &str) -> Option<OptionValue>
{
	match option_type
	{
		OptionType::Bool => match value
		{
			"true" | "yes" => Some(OptionValue::Bool(true)),
			"false" | "no" => Some(OptionValue::Bool(false)),
			_ => None,
		},
		OptionType::Long => leading_integer(value).map(OptionValue::Long),
		OptionType::Float => leading_real(value).map(OptionValue::Float),
	}
}

/// Maps a deprecated option onto its replacement.
fn modernize(name: String, value: OptionValue) -> (String, OptionValue)
{
	match RENAMED_OPTIONS.iter().find(|(old, _)| *old == name)
	{
		Some((_, new)) =>
		{
			let value = match value
			{
				OptionValue::Bool(true) => OptionValue::Long(1),
				_ => OptionValue::Long(0),
			};
			(new.to_string(), value)
		}
		None => (name, value),
	}
}

pub fn analyse_opt(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let name = analyzer
		.mandatory(&mut params, ElementKind::Label)
		.map(|x| x.value().to_string())
		.unwrap_or_default();

	let value = match params.peek()
	{
		Some(param)
			if param.is(ElementKind::Label)
				|| param.is(ElementKind::Number)
				|| param.is(ElementKind::String) =>
		{
			params.next();
			param
		}
		_ =>
		{
			let message = format!("Missing value for option '{}'. Option ignored.", name);
			analyzer.report(&node.location, message);
			return Analysed::Nothing;
		}
	};

	let option_type = match option_type(&name)
	{
		Some(option_type) => option_type,
		None =>
		{
			let message = format!("Invalid option '{}'. Option ignored.", name);
			analyzer.report(&value.location, message);
			return Analysed::Nothing;
		}
	};
	let option_value = match parse_option(option_type, value.value())
	{
		Some(option_value) => option_value,
		None =>
		{
			let message =
				format!("Invalid value for option '{}'. Option ignored.", name);
			analyzer.report(&value.location, message);
			return Analysed::Nothing;
		}
	};
	analyzer.error_if_more_elements(&params);

	let (name, option_value) = modernize(name, option_value);
	let existing = anchor.and_then(|score| {
		analyzer.model.children(score).iter().copied().find(|child| {
			matches!(
				analyzer.model.kind(*child),
				ImoKind::ScoreOption { name: x, .. } if *x == name
			)
		})
	});
	match existing
	{
		Some(option) =>
		{
			if let ImoKind::ScoreOption { value, .. } =
				&mut analyzer.model.get_mut(option).kind
			{
				*value = option_value;
			}
			Analysed::Object(option)
		}
		None =>
		{
			let option = analyzer.add_to_model(
				node,
				anchor,
				ImoKind::ScoreOption {
					name,
					value: option_value,
				},
			);
			Analysed::Object(option)
		}
	}
}

#[cfg(test)]
mod tests
{
	use crate::analyzer::testing::analyse_ldp;
	use crate::model::OptionValue;
	use pretty_assertions::assert_eq;

	fn score(options: &str) -> String
	{
		format!(
			"(score (vers 1.6) {} (instrument (musicData (n c4 q))))",
			options
		)
	}

	#[test]
	fn typed_options()
	{
		let (model, diagnostics) = analyse_ldp(&score(
			"(opt StaffLines.Hide yes) (opt Render.SpacingFactor 0.35) \
			 (opt Render.SpacingMethod 2)",
		));
		assert_eq!(diagnostics, "");
		let score = model.root().unwrap();
		assert_eq!(
			model.score_option(score, "StaffLines.Hide"),
			Some(&OptionValue::Bool(true))
		);
		assert_eq!(
			model.score_option(score, "Render.SpacingFactor"),
			Some(&OptionValue::Float(0.35))
		);
		assert_eq!(
			model.score_option(score, "Render.SpacingMethod"),
			Some(&OptionValue::Long(2))
		);
	}

	#[test]
	fn last_declaration_wins()
	{
		let (model, diagnostics) = analyse_ldp(&score(
			"(opt Render.SpacingValue 30) (opt Render.SpacingValue 45)",
		));
		assert_eq!(diagnostics, "");
		let score = model.root().unwrap();
		assert_eq!(model.find_all("option").len(), 1);
		assert_eq!(
			model.score_option(score, "Render.SpacingValue"),
			Some(&OptionValue::Long(45))
		);
	}

	#[test]
	fn deprecated_options_are_renamed()
	{
		let (model, diagnostics) = analyse_ldp(&score(
			"(opt Score.JustifyFinalBarline yes) \
			 (opt StaffLines.StopAtFinalBarline no)",
		));
		assert_eq!(diagnostics, "");
		let score = model.root().unwrap();
		assert_eq!(
			model.score_option(score, "Score.JustifyLastSystem"),
			Some(&OptionValue::Long(1))
		);
		assert_eq!(
			model.score_option(score, "StaffLines.Truncate"),
			Some(&OptionValue::Long(0))
		);
		assert_eq!(model.score_option(score, "Score.JustifyFinalBarline"), None);
	}

	#[test]
	fn bad_options_are_dropped()
	{
		let (model, diagnostics) = analyse_ldp(
			"(score (vers 1.6)\n(opt StaffLines.Hide maybe)\n(opt Foo.Bar 3)\n\
			 (opt Render.SpacingMethod)\n(instrument (musicData)))",
		);
		assert_eq!(
			diagnostics,
			"Line 1. Invalid value for option 'StaffLines.Hide'. Option ignored.\n\
			 Line 2. Invalid option 'Foo.Bar'. Option ignored.\n\
			 Line 3. Missing value for option 'Render.SpacingMethod'. Option \
			 ignored.\n"
		);
		assert!(model.find_all("option").is_empty());
	}
}
