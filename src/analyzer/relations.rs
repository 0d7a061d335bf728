//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! Relation elements do not become objects themselves. They produce the
//! descriptors that the note or rest carrying them hands to the builders,
//! so they are only meaningful with that note or rest as anchor.

use crate::analyzer::{Analysed, Analyzer, Params};
use crate::model::{Bezier, Color, DisplayNumber, Handle, TimeModification, YesNo};
use crate::registry::ElementKind;
use crate::relations::{BeamDto, Phase, SlurDto, TieDto, TupletDto};
use crate::tree::Node;

/// Tuplet numbers only distinguish nested tuplets from version 2.0 on.
const NUMBERED_TUPLETS_VERSION: u32 = 107;

pub fn analyse_tie(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let number = match analyzer.mandatory(&mut params, ElementKind::Number)
	{
		Some(number) => analyzer.bounded_value(number, 0),
		None => 0,
	};
	let is_start = match params.optional(ElementKind::Label).map(|x| x.value())
	{
		Some("start") => true,
		Some("stop") => false,
		_ =>
		{
			analyzer.report(&node.location, "Missing or invalid tie type. Tie ignored.");
			return Analysed::Nothing;
		}
	};
	let bezier = optional_bezier(analyzer, &mut params);
	let color = optional_color(analyzer, &mut params);
	match anchor
	{
		Some(note) => Analysed::Tie(TieDto {
			number,
			is_start,
			bezier,
			color,
			note,
			location: node.location.clone(),
		}),
		None => Analysed::Nothing,
	}
}

pub fn analyse_slur(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let number = match analyzer.mandatory(&mut params, ElementKind::Number)
	{
		Some(number) => analyzer.bounded_value(number, 0),
		None => 0,
	};
	let phase = match params.optional(ElementKind::Label).map(|x| x.value())
	{
		Some("start") => Phase::Start,
		Some("continue") => Phase::Continue,
		Some("stop") => Phase::Stop,
		_ =>
		{
			analyzer
				.report(&node.location, "Missing or invalid slur type. Slur ignored.");
			return Analysed::Nothing;
		}
	};
	let bezier = optional_bezier(analyzer, &mut params);
	let color = optional_color(analyzer, &mut params);
	match anchor
	{
		Some(note) => Analysed::Slur(SlurDto {
			number,
			phase,
			bezier,
			color,
			note,
			location: node.location.clone(),
		}),
		None => Analysed::Nothing,
	}
}

fn optional_bezier(analyzer: &mut Analyzer, params: &mut Params) -> Option<Bezier>
{
	let bezier = params.optional(ElementKind::Bezier)?;
	match analyzer.analyse_node(bezier, None)
	{
		Analysed::Bezier(bezier) => Some(bezier),
		_ => None,
	}
}

fn optional_color(analyzer: &mut Analyzer, params: &mut Params) -> Option<Color>
{
	let color = params.optional(ElementKind::Color)?;
	match analyzer.analyse_node(color, None)
	{
		Analysed::Color(color) => Some(color),
		_ => None,
	}
}

pub fn analyse_beam(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let number = match params.optional(ElementKind::Number)
	{
		Some(number) => analyzer.bounded_value(number, 0),
		None =>
		{
			analyzer
				.report(&node.location, "Missing or invalid beam number. Beam ignored.");
			return Analysed::Nothing;
		}
	};
	let types = match params
		.optional(ElementKind::Label)
		.and_then(|x| BeamDto::parse_types(x.value()))
	{
		Some(types) => types,
		None =>
		{
			analyzer
				.report(&node.location, "Missing or invalid beam type. Beam ignored.");
			return Analysed::Nothing;
		}
	};
	match anchor
	{
		Some(note_rest) => Analysed::Beam(BeamDto {
			number,
			types,
			note_rest,
			location: node.location.clone(),
		}),
		None => Analysed::Nothing,
	}
}

pub fn analyse_tuplet(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let (mut show_bracket, mut show_number) = analyzer.context.tuplet_defaults();
	let mut number = 0;
	if let Some(param) = params.optional(ElementKind::Number)
	{
		let value = analyzer.bounded_value(param, 0);
		if analyzer.context.score_version() > NUMBERED_TUPLETS_VERSION
		{
			number = value;
		}
	}

	let phase = match params.optional(ElementKind::Label).map(|x| x.value())
	{
		Some("+") => Phase::Start,
		Some("-") => Phase::Stop,
		_ =>
		{
			analyzer
				.report(&node.location, "Missing or invalid tuplet type. Tuplet ignored.");
			return Analysed::Nothing;
		}
	};

	let (mut actual, mut normal) = (0, 0);
	if phase == Phase::Start
	{
		actual = match params.optional(ElementKind::Number)
		{
			Some(param) => analyzer.bounded_value(param, 0),
			None =>
			{
				analyzer.report(
					&node.location,
					"Tuplet: missing or invalid actual notes number. Tuplet \
					 ignored.",
				);
				return Analysed::Nothing;
			}
		};
		normal = TupletDto::default_normal(actual).unwrap_or(0);
		if let Some(param) = params.optional(ElementKind::Number)
		{
			normal = analyzer.bounded_value(param, 0);
		}
		if normal == 0
		{
			analyzer.report(
				&node.location,
				"Tuplet: Missing or invalid normal notes number. Tuplet ignored.",
			);
			return Analysed::Nothing;
		}
		tuplet_options(analyzer, &mut params, &mut show_bracket, &mut show_number);
	}

	match anchor
	{
		Some(note_rest) => Analysed::Tuplet(TupletDto {
			number,
			phase,
			actual,
			normal,
			show_bracket,
			show_number,
			note_rest,
			location: node.location.clone(),
		}),
		None => Analysed::Nothing,
	}
}

/// Reads the bracket and number display options. The last values given
/// become the defaults for the tuplets that follow.
fn tuplet_options(
	analyzer: &mut Analyzer,
	params: &mut Params,
	show_bracket: &mut YesNo,
	show_number: &mut DisplayNumber,
)
{
	while let Some(param) = params.next()
	{
		match param.kind
		{
			Some(ElementKind::Label) if param.value() == "noBracket" =>
			{
				*show_bracket = YesNo::No;
			}
			Some(ElementKind::DisplayBracket) =>
			{
				if let Some(value) = analyzer.property_value(param, ElementKind::Label)
				{
					*show_bracket = analyzer.yes_no_value(value, YesNo::Default);
				}
			}
			Some(ElementKind::DisplayNumber) =>
			{
				if let Some(value) = analyzer.property_value(param, ElementKind::Label)
				{
					*show_number = match serde_plain::from_str(value.value())
					{
						Ok(show_number) => show_number,
						Err(_) =>
						{
							analyzer.error_invalid_param(value);
							DisplayNumber::Actual
						}
					};
				}
			}
			_ => analyzer.error_invalid_param(param),
		}
	}
	analyzer.context.set_tuplet_defaults(*show_bracket, *show_number);
}

/// Reads `(tm top bottom)`: the note lasts top/bottom of its notated value.
pub fn analyse_time_modification(
	analyzer: &mut Analyzer,
	node: &Node,
	_anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let top = match analyzer.mandatory(&mut params, ElementKind::Number)
	{
		Some(number) => analyzer.bounded_value(number, 1),
		None => return Analysed::Nothing,
	};
	let bottom = match analyzer.mandatory(&mut params, ElementKind::Number)
	{
		Some(number) => analyzer.bounded_value(number, 1),
		None => return Analysed::Nothing,
	};
	analyzer.error_if_more_elements(&params);
	Analysed::TimeModification(TimeModification {
		normal: top,
		actual: bottom,
	})
}

pub fn analyse_color(
	analyzer: &mut Analyzer,
	node: &Node,
	_anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let color = params.next().and_then(|x| Color::parse(x.value()));
	match color
	{
		Some(color) =>
		{
			analyzer.error_if_more_elements(&params);
			Analysed::Color(color)
		}
		None =>
		{
			analyzer.report(
				&node.location,
				"Missing or invalid color value. Must be #rrggbbaa. Color ignored.",
			);
			Analysed::Nothing
		}
	}
}

pub fn analyse_bezier(
	analyzer: &mut Analyzer,
	node: &Node,
	_anchor: Option<Handle>,
) -> Analysed
{
	let mut bezier = Bezier {
		start: (0.0, 0.0),
		end: (0.0, 0.0),
		ctrol1: (0.0, 0.0),
		ctrol2: (0.0, 0.0),
	};
	let mut params = Params::of(node);
	while let Some(param) = params.next()
	{
		let coordinate = match param.kind
		{
			Some(ElementKind::StartX) => &mut bezier.start.0,
			Some(ElementKind::StartY) => &mut bezier.start.1,
			Some(ElementKind::EndX) => &mut bezier.end.0,
			Some(ElementKind::EndY) => &mut bezier.end.1,
			Some(ElementKind::Ctrol1X) => &mut bezier.ctrol1.0,
			Some(ElementKind::Ctrol1Y) => &mut bezier.ctrol1.1,
			Some(ElementKind::Ctrol2X) => &mut bezier.ctrol2.0,
			Some(ElementKind::Ctrol2Y) => &mut bezier.ctrol2.1,
			_ =>
			{
				analyzer.error_invalid_param(param);
				continue;
			}
		};
		*coordinate = match Params::value_of(param)
		{
			Some(value) => analyzer.float_value(value, 0.0),
			None => 0.0,
		};
	}
	Analysed::Bezier(bezier)
}
