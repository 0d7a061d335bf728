//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! Marks and texts attached to notes, rests and other staff objects.

use crate::analyzer::{Analysed, Analyzer, Params};
use crate::model::{FermataSymbol, Handle, ImoKind, Placement, ScoreObj};
use crate::registry::ElementKind;
use crate::tree::Node;

const DYNAMICS_MARKS: [&str; 30] = [
	"p", "m", "f", "r", "s", "z", "n", "pppppp", "ppppp", "pppp", "ppp", "pp",
	"mp", "mf", "pf", "ff", "fff", "ffff", "fffff", "ffffff", "fp", "fz", "sf",
	"sfp", "sfpp", "sfz", "sfzp", "sffz", "rf", "rfz",
];

/// Reads an optional placement label, defaulting to above.
fn optional_placement(analyzer: &mut Analyzer, params: &mut Params) -> Placement
{
	match params.optional(ElementKind::Label)
	{
		Some(label) => analyzer.placement_value(label, Placement::Above),
		None => Placement::Default,
	}
}

pub fn analyse_articulation(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let articulation = match node.kind
	{
		Some(kind) => kind,
		None => return Analysed::Nothing,
	};
	let mut params = Params::of(node);
	let placement = optional_placement(analyzer, &mut params);
	let mut so = ScoreObj::default();
	analyzer.scoreobj_options(&mut params, &mut so);
	analyzer.error_if_more_elements(&params);
	let handle = analyzer.add_to_model(
		node,
		anchor,
		ImoKind::Articulation {
			articulation,
			placement,
			so,
		},
	);
	Analysed::Object(handle)
}

pub fn analyse_dynamics(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let mark = match analyzer.mandatory(&mut params, ElementKind::String)
	{
		Some(mark) => mark.value().to_string(),
		None => return Analysed::Nothing,
	};
	if !DYNAMICS_MARKS.contains(&mark.as_str())
	{
		let message =
			format!("Dynamics string '{}' not supported. <dyn> ignored.", mark);
		analyzer.report(&node.location, message);
		return Analysed::Nothing;
	}
	let placement = optional_placement(analyzer, &mut params);
	let mut so = ScoreObj::default();
	analyzer.scoreobj_options(&mut params, &mut so);
	analyzer.error_if_more_elements(&params);
	let handle = analyzer.add_to_model(
		node,
		anchor,
		ImoKind::Dynamics {
			mark,
			placement,
			so,
		},
	);
	Analysed::Object(handle)
}

pub fn analyse_fermata(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let mut symbol = FermataSymbol::Normal;
	let mut placement = Placement::Default;
	if let Some(label) = params.optional(ElementKind::Label)
	{
		let value = label.value();
		if let Ok(x) = serde_plain::from_str::<FermataSymbol>(value)
		{
			symbol = x;
			placement = optional_placement(analyzer, &mut params);
		}
		else if value == "above"
		{
			placement = Placement::Above;
		}
		else if value == "below"
		{
			placement = Placement::Below;
		}
		else if params.peek_is(ElementKind::Label)
		{
			placement = optional_placement(analyzer, &mut params);
			let message = format!("Symbol '{}' not supported. Ignored.", value);
			analyzer.report(&node.location, message);
		}
		else
		{
			let message = format!("Parameter '{}' not supported. Ignored.", value);
			analyzer.report(&node.location, message);
		}
	}
	let mut so = ScoreObj::default();
	analyzer.scoreobj_options(&mut params, &mut so);
	analyzer.error_if_more_elements(&params);
	let handle = analyzer.add_to_model(
		node,
		anchor,
		ImoKind::Fermata {
			symbol,
			placement,
			so,
		},
	);
	Analysed::Object(handle)
}

/// A text attached to whatever object anchors it. Titles, instrument names
/// and paragraphs read their strings through this as well.
pub fn analyse_text(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let text = match analyzer.mandatory(&mut params, ElementKind::String)
	{
		Some(text) => text.value().to_string(),
		None => return Analysed::Nothing,
	};
	let mut so = ScoreObj::default();
	analyzer.text_location(&mut params, &mut so);
	analyzer.error_if_more_elements(&params);
	let handle = analyzer.add_to_model(node, anchor, ImoKind::ScoreText { text, so });
	Analysed::Object(handle)
}

pub fn analyse_lyric(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let note = anchor.filter(|x| analyzer.model.note(*x).is_some());
	let mut params = Params::of(node);

	let number = match params.optional(ElementKind::Number)
	{
		Some(number) => analyzer.long_value(number, 1),
		None => 1,
	};

	let mut syllables = Vec::new();
	while let Some(syllable) = params.optional(ElementKind::String)
	{
		syllables.push(syllable.value().to_string());
	}
	if syllables.is_empty()
	{
		analyzer.report(
			&node.location,
			"<lyric>: Missing syllable text. <lyric> ignored.",
		);
		return Analysed::Nothing;
	}

	let mut has_hyphen = false;
	let mut has_melisma = false;
	let mut placement = None;
	if let Some(label) = params.optional(ElementKind::Label)
	{
		match label.value()
		{
			"-" => has_hyphen = true,
			"above" => placement = Some(Placement::Above),
			"below" => placement = Some(Placement::Below),
			value =>
			{
				let message =
					format!("<lyric>: Unknown parameter '{}'. Ignored.", value);
				analyzer.report(&label.location, message);
			}
		}
	}
	if placement.is_none()
	{
		has_melisma = params.optional(ElementKind::Melisma).is_some();
		if let Some(label) = params.optional(ElementKind::Label)
		{
			placement = Some(analyzer.placement_value(label, Placement::Below));
		}
	}
	let placement = match placement
	{
		Some(placement) =>
		{
			analyzer.context.set_lyric_placement(number, placement);
			placement
		}
		None => analyzer.context.lyric_placement(number),
	};

	let mut so = ScoreObj::default();
	analyzer.scoreobj_options(&mut params, &mut so);
	analyzer.error_if_more_elements(&params);

	match note
	{
		Some(note) =>
		{
			let handle = analyzer.add_to_model(
				node,
				Some(note),
				ImoKind::Lyric {
					number,
					syllables,
					has_hyphen,
					has_melisma,
					placement,
					so,
				},
			);
			Analysed::Object(handle)
		}
		None =>
		{
			analyzer.report(
				&node.location,
				"<lyric> is not attached to a note. It will be ignored.",
			);
			Analysed::Nothing
		}
	}
}

#[cfg(test)]
mod tests
{
	use crate::analyzer::testing::analyse_ldp;
	use crate::model::{FermataSymbol, ImoKind, Model, Placement};
	use crate::registry::ElementKind;
	use pretty_assertions::assert_eq;

	fn attached(source: &str, name: &str) -> (Vec<ImoKind>, String)
	{
		let (model, diagnostics) = analyse_ldp(source);
		(kinds_of(&model, name), diagnostics)
	}

	fn kinds_of(model: &Model, name: &str) -> Vec<ImoKind>
	{
		model
			.find_all(name)
			.into_iter()
			.map(|x| model.kind(x).clone())
			.collect()
	}

	#[test]
	fn articulations_take_their_kind()
	{
		let (marks, diagnostics) = attached(
			"(musicData (n c4 q (staccato below) (accent) (tenuto above (dx 5))))",
			"articulation",
		);
		assert_eq!(diagnostics, "");
		let found: Vec<(ElementKind, Placement)> = marks
			.iter()
			.map(|x| match x
			{
				ImoKind::Articulation {
					articulation,
					placement,
					..
				} => (*articulation, *placement),
				_ => unreachable!(),
			})
			.collect();
		assert_eq!(
			found,
			vec![
				(ElementKind::Staccato, Placement::Below),
				(ElementKind::Accent, Placement::Default),
				(ElementKind::Tenuto, Placement::Above),
			]
		);
		match &marks[2]
		{
			ImoKind::Articulation { so, .. } => assert_eq!(so.dx, 5.0),
			_ => unreachable!(),
		}
	}

	#[test]
	fn unsupported_dynamics_are_dropped()
	{
		let (marks, diagnostics) = attached(
			"(musicData\n(n c4 q (dyn \"sfz\" below))\n(n d4 q (dyn \"xyz\")))",
			"dynamics",
		);
		assert_eq!(
			diagnostics,
			"Line 2. Dynamics string 'xyz' not supported. <dyn> ignored.\n"
		);
		assert_eq!(marks.len(), 1);
		match &marks[0]
		{
			ImoKind::Dynamics {
				mark, placement, ..
			} =>
			{
				assert_eq!(mark, "sfz");
				assert_eq!(*placement, Placement::Below);
			}
			_ => unreachable!(),
		}
	}

	#[test]
	fn fermata_symbols_and_placements()
	{
		let (marks, diagnostics) = attached(
			"(musicData\n(n c4 q (fermata henze-long below))\n\
			 (n d4 q (fermata above))\n(n e4 q (fermata wobbly below))\n\
			 (n f4 q (fermata wobbly)))",
			"fermata",
		);
		assert_eq!(
			diagnostics,
			"Line 3. Symbol 'wobbly' not supported. Ignored.\n\
			 Line 4. Parameter 'wobbly' not supported. Ignored.\n"
		);
		let found: Vec<(FermataSymbol, Placement)> = marks
			.iter()
			.map(|x| match x
			{
				ImoKind::Fermata {
					symbol, placement, ..
				} => (*symbol, *placement),
				_ => unreachable!(),
			})
			.collect();
		assert_eq!(
			found,
			vec![
				(FermataSymbol::HenzeLong, Placement::Below),
				(FermataSymbol::Normal, Placement::Above),
				(FermataSymbol::Normal, Placement::Below),
				(FermataSymbol::Normal, Placement::Default),
			]
		);
	}

	#[test]
	fn texts_on_rests()
	{
		let (texts, diagnostics) = attached(
			"(musicData (r q (text \"tacet\" (dy -10))))",
			"score-text",
		);
		assert_eq!(diagnostics, "");
		match &texts[..]
		{
			[ImoKind::ScoreText { text, so }] =>
			{
				assert_eq!(text, "tacet");
				assert_eq!(so.dy, -10.0);
			}
			_ => panic!("expected one text, got {:?}", texts),
		}
	}

	#[test]
	fn lyric_placement_is_remembered_per_line()
	{
		let (lyrics, diagnostics) = attached(
			"(musicData (n c4 q (lyric \"Hal\" - above)) \
			 (n d4 q (lyric \"le\" (melisma))) \
			 (n e4 q (lyric 2 \"lu\" \"ja\")))",
			"lyric",
		);
		assert_eq!(diagnostics, "");
		let found: Vec<(i64, usize, bool, bool, Placement)> = lyrics
			.iter()
			.map(|x| match x
			{
				ImoKind::Lyric {
					number,
					syllables,
					has_hyphen,
					has_melisma,
					placement,
					..
				} => (
					*number,
					syllables.len(),
					*has_hyphen,
					*has_melisma,
					*placement,
				),
				_ => unreachable!(),
			})
			.collect();
		assert_eq!(
			found,
			vec![
				(1, 1, true, false, Placement::Above),
				(1, 1, false, true, Placement::Above),
				(2, 2, false, false, Placement::Below),
			]
		);
	}

	#[test]
	fn lyric_errors()
	{
		let (lyrics, diagnostics) = attached(
			"(musicData\n(n c4 q (lyric 1))\n(n d4 q (lyric \"la\" up)))",
			"lyric",
		);
		assert_eq!(
			diagnostics,
			"Line 1. <lyric>: Missing syllable text. <lyric> ignored.\n\
			 Line 2. <lyric>: Unknown parameter 'up'. Ignored.\n"
		);
		assert_eq!(lyrics.len(), 1);
	}

	#[test]
	fn detached_lyrics_are_dropped()
	{
		let (lyrics, diagnostics) = attached("(lyric \"no\")", "lyric");
		assert_eq!(
			diagnostics,
			"Line 0. <lyric> is not attached to a note. It will be ignored.\n"
		);
		assert!(lyrics.is_empty());
	}
}
