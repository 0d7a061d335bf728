//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! Staff objects other than notes and rests: clefs, keys, time signatures,
//! barlines, cursor moves and a few directions.

use crate::analyzer::noterest;
use crate::analyzer::values::parse_duration;
use crate::analyzer::{Analysed, Analyzer, Params};
use crate::model::{BarlineType, ClefType, Handle, ImoKind, KeyType};
use crate::model::{MetronomeMark, ScoreObj, SymbolSize, TimeShift, TimeType};
use crate::model::to_duration;
use crate::registry::ElementKind;
use crate::tree::Node;

use serde::de::DeserializeOwned;

fn named<T: DeserializeOwned>(value: &str) -> Option<T>
{
	serde_plain::from_str(value).ok()
}

/// The first note is analysed as usual; every following note sounds with it.
pub fn analyse_chord(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let mut base = None;
	while let Some(param) = params.next()
	{
		if !param.is(ElementKind::Note)
		{
			analyzer.error_invalid_param(param);
			continue;
		}
		match base
		{
			None =>
			{
				if let Analysed::Object(note) = analyzer.analyse_node(param, anchor)
				{
					base = Some(note);
				}
			}
			Some(_) =>
			{
				noterest::analyse_chord_note(analyzer, param, anchor);
			}
		}
	}
	match base.and_then(|note| analyzer.model.note(note)?.chord)
	{
		Some(chord) => Analysed::Object(chord),
		None => Analysed::Nothing,
	}
}

pub fn analyse_clef(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let mut clef_type = ClefType::G2;
	if let Some(label) = params.optional(ElementKind::Label)
	{
		match named(label.value())
		{
			Some(value) => clef_type = value,
			None =>
			{
				let message =
					format!("Unknown clef type '{}'. Assumed 'G'.", label.value());
				analyzer.report(&label.location, message);
			}
		}
	}

	let mut symbol_size = SymbolSize::Full;
	if let Some(property) = params.optional(ElementKind::SymbolSize)
	{
		let value = Params::value_of(property).map(|x| x.value()).unwrap_or("");
		match named(value)
		{
			Some(size) => symbol_size = size,
			None =>
			{
				let message =
					format!("Invalid symbol size '{}'. 'full' size assumed.", value);
				analyzer.report(&node.location, message);
			}
		}
	}

	let mut so = ScoreObj::default();
	analyzer.staffobj_options(&mut params, &mut so);
	analyzer.context.set_clef(so.staff, clef_type);
	let clef = analyzer.add_to_model(
		node,
		anchor,
		ImoKind::Clef {
			clef_type,
			symbol_size,
			so,
		},
	);
	analyzer.staffobj_attachments(&mut params, clef);
	analyzer.error_if_more_elements(&params);
	Analysed::Object(clef)
}

pub fn analyse_key(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let mut key_type = KeyType::C;
	if let Some(label) = params.optional(ElementKind::Label)
	{
		match named(label.value())
		{
			Some(value) => key_type = value,
			None =>
			{
				let message = format!("Unknown key '{}'. Assumed 'C'.", label.value());
				analyzer.report(&label.location, message);
			}
		}
	}

	let mut so = ScoreObj::default();
	analyzer.staffobj_options(&mut params, &mut so);
	analyzer.context.set_key(key_type);
	let key = analyzer.add_to_model(node, anchor, ImoKind::KeySignature { key_type, so });
	analyzer.staffobj_attachments(&mut params, key);
	analyzer.error_if_more_elements(&params);
	Analysed::Object(key)
}

pub fn analyse_time(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let mut time_type = TimeType::Normal;
	if let Some(label) = params.optional(ElementKind::Label)
	{
		match named(label.value())
		{
			Some(value) => time_type = value,
			None =>
			{
				let message = format!(
					"Time signature: invalid type '{}'. 'normal' assumed.",
					label.value()
				);
				analyzer.report(&node.location, message);
			}
		}
	}

	let (mut top, mut bottom) = match time_type
	{
		TimeType::Common => (4, 4),
		TimeType::Cut => (2, 2),
		_ => (2, 4),
	};
	match time_type
	{
		TimeType::Normal =>
		{
			if let Some(number) = analyzer.mandatory(&mut params, ElementKind::Number)
			{
				top = analyzer.bounded_value(number, 2);
			}
			if let Some(number) = analyzer.mandatory(&mut params, ElementKind::Number)
			{
				bottom = analyzer.bounded_value(number, 4);
			}
		}
		TimeType::SingleNumber =>
		{
			if let Some(number) = analyzer.mandatory(&mut params, ElementKind::Number)
			{
				top = analyzer.bounded_value(number, 2);
			}
			bottom = 0;
		}
		TimeType::Common | TimeType::Cut => (),
	}

	let mut so = ScoreObj::default();
	analyzer.staffobj_options(&mut params, &mut so);
	analyzer.context.set_time_signature(top, bottom);
	let time = analyzer.add_to_model(
		node,
		anchor,
		ImoKind::TimeSignature {
			time_type,
			top,
			bottom,
			so,
		},
	);
	analyzer.staffobj_attachments(&mut params, time);
	analyzer.error_if_more_elements(&params);
	Analysed::Object(time)
}

pub fn analyse_barline(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let mut barline_type = BarlineType::Simple;
	if let Some(label) = params.optional(ElementKind::Label)
	{
		match named(label.value())
		{
			Some(value) => barline_type = value,
			None =>
			{
				let message = format!(
					"Unknown barline type '{}'. 'simple' barline assumed.",
					label.value()
				);
				analyzer.report(&label.location, message);
			}
		}
	}
	let num_repeats = match barline_type
	{
		BarlineType::EndRepetition | BarlineType::DoubleRepetition => 1,
		_ => 0,
	};

	let mut is_middle = false;
	if let Some(label) = params.optional(ElementKind::Label)
	{
		if label.value() == "middle"
		{
			is_middle = true;
		}
		else
		{
			analyzer.error_invalid_param(label);
		}
	}

	let mut so = ScoreObj::default();
	analyzer.staffobj_options(&mut params, &mut so);
	let barline = analyzer.add_to_model(
		node,
		anchor,
		ImoKind::Barline {
			barline_type,
			is_middle,
			num_repeats,
			so,
		},
	);
	analyzer.staffobj_attachments(&mut params, barline);
	analyzer.error_if_more_elements(&params);
	analyzer.context.end_measure();
	Analysed::Object(barline)
}

/// Moves the time cursor of the instrument, either by a duration or to one
/// end of the current measure.
pub fn analyse_go_back_fwd(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let is_forward = node.is(ElementKind::GoFwd);
	let mut params = Params::of(node);
	let shift = if let Some(label) = params.optional(ElementKind::Label)
	{
		match (label.value(), is_forward)
		{
			("start", false) => TimeShift::ToStart,
			("start", true) =>
			{
				analyzer.report(
					&label.location,
					"Element 'goFwd' has an incoherent value: go forward to \
					 start?. Element ignored.",
				);
				return Analysed::Nothing;
			}
			("end", true) => TimeShift::ToEnd,
			("end", false) =>
			{
				analyzer.report(
					&label.location,
					"Element 'goBack' has an incoherent value: go backwards to \
					 end?. Element ignored.",
				);
				return Analysed::Nothing;
			}
			(value, _) => match parse_duration(value)
			{
				Some((note_type, dots)) => TimeShift::By(to_duration(note_type, dots)),
				None =>
				{
					let message =
						format!("Unknown duration '{}'. Element ignored.", value);
					analyzer.report(&label.location, message);
					return Analysed::Nothing;
				}
			},
		}
	}
	else if let Some(number) = params.optional(ElementKind::Number)
	{
		let amount = analyzer.float_value(number, 0.0);
		if amount < 0.0
		{
			analyzer.report(
				&number.location,
				"Negative value for element 'goFwd/goBack'. Element ignored.",
			);
			return Analysed::Nothing;
		}
		TimeShift::By(amount as f64)
	}
	else
	{
		let (name, location) = match params.peek()
		{
			Some(param) => (param.name.as_str(), &param.location),
			None => (node.name.as_str(), &node.location),
		};
		let message = format!("Unknown duration '{}'. Element ignored.", name);
		analyzer.report(location, message);
		return Analysed::Nothing;
	};
	analyzer.error_if_more_elements(&params);

	match (&shift, is_forward)
	{
		(TimeShift::ToStart, _) => analyzer.context.go_to_measure_start(),
		(TimeShift::ToEnd, _) => analyzer.context.go_to_measure_end(),
		(TimeShift::By(amount), true) => analyzer.context.advance(*amount),
		(TimeShift::By(amount), false) => analyzer.context.go_back(*amount),
	}
	let handle =
		analyzer.add_to_model(node, anchor, ImoKind::GoBackFwd { is_forward, shift });
	Analysed::Object(handle)
}

pub fn analyse_spacer(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let width = match params.optional(ElementKind::Number)
	{
		Some(number) => analyzer.float_value(number, 0.0),
		None =>
		{
			analyzer.report(&node.location, "Missing width for spacer. Spacer ignored.");
			return Analysed::Nothing;
		}
	};
	let mut so = ScoreObj::default();
	analyzer.staffobj_options(&mut params, &mut so);
	let spacer = analyzer.add_to_model(node, anchor, ImoKind::Spacer { width, so });
	analyzer.noterest_attachments(&mut params, spacer);
	Analysed::Object(spacer)
}

pub fn analyse_new_system(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let params = Params::of(node);
	analyzer.error_if_more_elements(&params);
	let handle = analyzer.add_to_model(node, anchor, ImoKind::SystemBreak);
	Analysed::Object(handle)
}

pub fn analyse_metronome(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let fallback = MetronomeMark::Value {
		ticks_per_minute: 60,
	};
	let mark = if let Some(label) = params.optional(ElementKind::Label)
	{
		let (note_type, dots) = analyzer.note_type_and_dots(label);
		if let Some(number) = params.optional(ElementKind::Number)
		{
			MetronomeMark::NoteValue {
				note_type,
				dots,
				ticks_per_minute: analyzer.long_value(number, 60),
			}
		}
		else if let Some(right) = params.optional(ElementKind::Label)
		{
			MetronomeMark::NoteNote {
				left: (note_type, dots),
				right: analyzer.note_type_and_dots(right),
			}
		}
		else
		{
			analyzer.report(
				&node.location,
				"Error in metronome parameters. Replaced by '(metronome 60)'.",
			);
			return add_metronome(analyzer, node, anchor, fallback);
		}
	}
	else if let Some(number) = params.optional(ElementKind::Number)
	{
		MetronomeMark::Value {
			ticks_per_minute: analyzer.long_value(number, 60),
		}
	}
	else
	{
		analyzer.report(
			&node.location,
			"Missing metronome parameters. Replaced by '(metronome 60)'.",
		);
		return add_metronome(analyzer, node, anchor, fallback);
	};

	let mut has_parenthesis = false;
	if let Some(label) = params.optional(ElementKind::Label)
	{
		if label.value() == "parenthesis"
		{
			has_parenthesis = true;
		}
		else
		{
			analyzer.error_invalid_param(label);
		}
	}

	let mut so = ScoreObj::default();
	analyzer.scoreobj_options(&mut params, &mut so);
	analyzer.error_if_more_elements(&params);
	let metronome = analyzer.add_to_model(
		node,
		anchor,
		ImoKind::Metronome {
			mark,
			has_parenthesis,
			so,
		},
	);
	Analysed::Object(metronome)
}

fn add_metronome(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
	mark: MetronomeMark,
) -> Analysed
{
	let metronome = analyzer.add_to_model(
		node,
		anchor,
		ImoKind::Metronome {
			mark,
			has_parenthesis: false,
			so: ScoreObj::default(),
		},
	);
	Analysed::Object(metronome)
}
