//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! Notes and rests. Besides building the object, the analyser places it in
//! time, feeds its relation descriptors to the builders and keeps the
//! legacy abbreviations (`l`, `g+`, `g-`, `tN`, `t-`) working.

use crate::analyzer::{Analysed, Analyzer, Params};
use crate::lexer::Location;
use crate::model::{Handle, ImoKind, Note, NoteRest, NoteType, Pitch};
use crate::model::{BeamType, RelationData, Relation, StemDirection};
use crate::model::{TimeModification, TimeUnits, MAX_BEAM_LEVELS};
use crate::model::to_duration;
use crate::registry::ElementKind;
use crate::relations::{BeamDto, Phase, SlurDto, TieDto, TupletDto};
use crate::tree::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor
{
	Note,
	ChordNote,
	Rest,
}

pub fn analyse_note(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	analyse_note_rest(analyzer, node, anchor, Flavor::Note)
}

/// A note that sounds together with the previous note. Without a previous
/// note it is an ordinary note.
pub fn analyse_chord_note(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	analyse_note_rest(analyzer, node, anchor, Flavor::ChordNote)
}

pub fn analyse_rest(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	analyse_note_rest(analyzer, node, anchor, Flavor::Rest)
}

/// The descriptors and legacy markers collected while reading the options.
#[derive(Default)]
struct Decorations<'n>
{
	tie: Option<TieDto>,
	slur: Option<SlurDto>,
	beam: Option<BeamDto>,
	tuplet: Option<TupletDto>,
	time_modification: Option<TimeModification>,
	old_tie: Option<&'n Node>,
	old_beam: Option<&'n Node>,
	old_tuplet: Option<&'n Node>,
}

fn analyse_note_rest(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
	flavor: Flavor,
) -> Analysed
{
	let is_rest = flavor == Flavor::Rest;
	let base = match flavor
	{
		Flavor::ChordNote => analyzer.context.last_note(),
		_ => None,
	};
	let mut params = Params::of(node);

	let mut pitch = None;
	if !is_rest
	{
		if let Some(label) = analyzer.mandatory(&mut params, ElementKind::Label)
		{
			pitch = pitch_value(analyzer, label);
		}
	}
	let (note_type, dots) = match analyzer.mandatory(&mut params, ElementKind::Label)
	{
		Some(label) => analyzer.note_type_and_dots(label),
		None => (NoteType::Quarter, 0),
	};

	let nr = NoteRest::new(note_type, dots);
	let kind = if is_rest
	{
		ImoKind::Rest(nr)
	}
	else
	{
		ImoKind::Note(Note {
			nr,
			pitch,
			stem: StemDirection::Default,
			tie_next: None,
			tie_prev: None,
			chord: None,
		})
	};
	let handle = analyzer.add_to_model(node, anchor, kind);

	let mut decorations = Decorations::default();
	while let Some(label) = params.optional(ElementKind::Label)
	{
		match label.value().chars().next()
		{
			Some('l') if !is_rest => decorations.old_tie = Some(label),
			Some('g') => decorations.old_beam = Some(label),
			Some('t') => decorations.old_tuplet = Some(label),
			Some('v') => analyzer.voice_label(label),
			Some('p') => analyzer.num_staff_label(label),
			_ => analyzer.error_invalid_param(label),
		}
	}

	let staff = analyzer.context.staff();
	let voice = analyzer.context.voice();
	if let Some(nr) = analyzer.model.note_rest_mut(handle)
	{
		nr.so.staff = staff;
		nr.voice = voice;
	}

	if !is_rest
	{
		note_options(analyzer, &mut params, handle, &mut decorations);
	}
	note_rest_options(analyzer, &mut params, handle, &mut decorations);

	let mut so = analyzer
		.model
		.note_rest(handle)
		.map(|nr| nr.so)
		.unwrap_or_default();
	analyzer.staffobj_options(&mut params, &mut so);
	let onset = match base.and_then(|x| analyzer.model.note_rest(x))
	{
		Some(base) => base.onset,
		None => analyzer.context.onset(),
	};
	if let Some(nr) = analyzer.model.note_rest_mut(handle)
	{
		nr.so = so;
		nr.onset = onset;
	}

	analyzer.noterest_attachments(&mut params, handle);

	if !is_rest
	{
		link_ties(analyzer, handle, &mut decorations);
	}

	if let Some(modification) = decorations.time_modification
	{
		if let Some(nr) = analyzer.model.note_rest_mut(handle)
		{
			nr.time_modification = Some(modification);
			nr.is_time_modification_explicit = true;
		}
	}
	let ratio = match decorations.old_tuplet
	{
		Some(label) => old_tuplet(analyzer, label, handle),
		None => tuplet_info(analyzer, decorations.tuplet.take(), handle, node),
	};
	let ratio = match decorations.time_modification
	{
		Some(modification) => modification.ratio(),
		None => ratio,
	};

	link_beams(analyzer, handle, note_type, node, &mut decorations);

	if let Some(dto) = decorations.slur.take()
	{
		analyzer.link(|builders, linker| builders.slurs.add_item_info(dto, linker));
	}

	match base
	{
		Some(base) if !is_rest => add_to_chord(analyzer, base, handle),
		_ => analyzer.context.advance(to_duration(note_type, dots) * ratio),
	}
	if !is_rest
	{
		analyzer.context.set_last_note(handle);
	}
	Analysed::Object(handle)
}

/// Reads the pitch label; `*` means the note has no pitch.
fn pitch_value(analyzer: &mut Analyzer, label: &Node) -> Option<Pitch>
{
	if label.value() == "*"
	{
		return None;
	}
	match Pitch::parse(label.value())
	{
		Some(pitch) => Some(pitch),
		None =>
		{
			let message = format!(
				"Unknown note pitch '{}'. Replaced by 'c4'.",
				label.value()
			);
			analyzer.report(&label.location, message);
			Pitch::parse("c4")
		}
	}
}

fn note_options<'n>(
	analyzer: &mut Analyzer,
	params: &mut Params<'n>,
	note: Handle,
	decorations: &mut Decorations<'n>,
)
{
	while let Some(param) = params.peek()
	{
		match param.kind
		{
			Some(ElementKind::Tie) =>
			{
				if let Analysed::Tie(dto) = analyzer.analyse_node(param, Some(note))
				{
					decorations.tie = Some(dto);
				}
			}
			Some(ElementKind::Slur) =>
			{
				if let Analysed::Slur(dto) = analyzer.analyse_node(param, Some(note))
				{
					decorations.slur = Some(dto);
				}
			}
			Some(ElementKind::Stem) =>
			{
				let stem = stem_value(analyzer, param);
				if let Some(note) = analyzer.model.note_mut(note)
				{
					note.stem = stem;
				}
			}
			Some(ElementKind::Lyric) =>
			{
				analyzer.analyse_node(param, Some(note));
			}
			_ => return,
		}
		params.next();
	}
}

fn stem_value(analyzer: &mut Analyzer, property: &Node) -> StemDirection
{
	let value = match analyzer.property_value(property, ElementKind::Label)
	{
		Some(value) => value,
		None => return StemDirection::Default,
	};
	match value.value()
	{
		"up" => StemDirection::Up,
		"down" => StemDirection::Down,
		other =>
		{
			let message = format!(
				"Invalid value '{}' for stem type. Default stem asigned.",
				other
			);
			analyzer.report(&value.location, message);
			StemDirection::Default
		}
	}
}

fn note_rest_options(
	analyzer: &mut Analyzer,
	params: &mut Params,
	note_rest: Handle,
	decorations: &mut Decorations,
)
{
	while let Some(param) = params.peek()
	{
		match param.kind
		{
			Some(ElementKind::Tuplet) =>
			{
				if let Analysed::Tuplet(dto) =
					analyzer.analyse_node(param, Some(note_rest))
				{
					decorations.tuplet = Some(dto);
				}
			}
			Some(ElementKind::TimeModification) =>
			{
				if let Analysed::TimeModification(modification) =
					analyzer.analyse_node(param, Some(note_rest))
				{
					decorations.time_modification = Some(modification);
				}
			}
			Some(ElementKind::Beam) =>
			{
				if let Analysed::Beam(dto) = analyzer.analyse_node(param, Some(note_rest))
				{
					decorations.beam = Some(dto);
				}
			}
			Some(ElementKind::Voice) =>
			{
				let current = analyzer.context.voice();
				let voice = match analyzer.property_value(param, ElementKind::Number)
				{
					Some(value) => analyzer.bounded_value(value, current),
					None => current,
				};
				analyzer.context.set_voice(voice);
				if let Some(nr) = analyzer.model.note_rest_mut(note_rest)
				{
					nr.voice = voice;
				}
			}
			_ => return,
		}
		params.next();
	}
}

fn link_ties(analyzer: &mut Analyzer, note: Handle, decorations: &mut Decorations)
{
	match decorations.old_tie
	{
		Some(label) =>
		{
			let location = label.location.clone();
			analyzer.link(|builders, linker| {
				builders.old_ties.start_old_tie(note, location, linker)
			});
		}
		None =>
		{
			analyzer.link(|builders, linker| {
				builders.old_ties.create_if_pending(note, linker)
			});
		}
	}
	if let Some(dto) = decorations.tie.take()
	{
		analyzer.link(|builders, linker| builders.ties.add_item_info(dto, linker));
	}
}

/// Handles `tN`, `tN/M` and `t-`. Returns the duration factor of the
/// tuplets open at this note.
fn old_tuplet(analyzer: &mut Analyzer, label: &Node, note_rest: Handle) -> TimeUnits
{
	let value = label.value();
	let chars: Vec<char> = value.chars().collect();
	if chars.len() == 2 && chars[1] == '-'
	{
		let ratio = analyzer.builders.tuplets.open_ratio();
		let number = analyzer.builders.tuplets.innermost_open().unwrap_or(0);
		let dto = legacy_tuplet(analyzer, label, Phase::Stop, number, (0, 0), note_rest);
		analyzer.link(|builders, linker| builders.tuplets.add_item_info(dto, linker));
		return ratio;
	}

	let digits = match chars.as_slice()
	{
		[_, actual] => Some((*actual, None)),
		[_, actual, '/', normal] => Some((*actual, Some(*normal))),
		_ => None,
	};
	let counts = digits.and_then(|(actual, normal)| {
		let actual = actual.to_digit(10)?;
		let normal = match normal
		{
			Some(normal) => normal.to_digit(10)?,
			None => 0,
		};
		Some((actual, normal))
	});
	let (actual, normal) = match counts
	{
		Some(counts) => counts,
		None =>
		{
			let message = format!("Invalid parameter '{}'. Ignored.", value);
			analyzer.report(&label.location, message);
			return analyzer.builders.tuplets.open_ratio();
		}
	};
	if analyzer.builders.tuplets.is_open()
	{
		analyzer.report(
			&label.location,
			"Requesting to start a tuplet but there is already an open tuplet. \
			 Tuplet ignored.",
		);
		return analyzer.builders.tuplets.open_ratio();
	}
	let normal = match normal
	{
		0 => TupletDto::default_normal(actual).unwrap_or(0),
		normal => normal,
	};
	let dto = legacy_tuplet(analyzer, label, Phase::Start, 0, (actual, normal), note_rest);
	analyzer.link(|builders, linker| builders.tuplets.add_item_info(dto, linker));
	analyzer.builders.tuplets.open_ratio()
}

fn legacy_tuplet(
	analyzer: &Analyzer,
	label: &Node,
	phase: Phase,
	number: i32,
	(actual, normal): (u32, u32),
	note_rest: Handle,
) -> TupletDto
{
	let (show_bracket, show_number) = analyzer.context.tuplet_defaults();
	TupletDto {
		number,
		phase,
		actual,
		normal,
		show_bracket,
		show_number,
		note_rest,
		location: label.location.clone(),
	}
}

/// Gives the tuplet descriptor to the builder and makes the note or rest a
/// member of every enclosing open tuplet. Returns the duration factor that
/// applies to it.
fn tuplet_info(
	analyzer: &mut Analyzer,
	dto: Option<TupletDto>,
	note_rest: Handle,
	node: &Node,
) -> TimeUnits
{
	let location = node.location.clone();
	match dto
	{
		Some(dto) if dto.phase == Phase::Stop =>
		{
			let ratio = analyzer.builders.tuplets.open_ratio();
			analyzer.link(|builders, linker| builders.tuplets.add_item_info(dto, linker));
			analyzer
				.builders
				.tuplets
				.add_to_open_tuplets(note_rest, &location);
			ratio
		}
		Some(dto) =>
		{
			analyzer
				.builders
				.tuplets
				.add_to_open_tuplets(note_rest, &location);
			analyzer.link(|builders, linker| builders.tuplets.add_item_info(dto, linker));
			analyzer.builders.tuplets.open_ratio()
		}
		None =>
		{
			analyzer
				.builders
				.tuplets
				.add_to_open_tuplets(note_rest, &location);
			analyzer.builders.tuplets.open_ratio()
		}
	}
}

/// Handles `g+` and `g-`, and keeps notes between them in the legacy beam.
fn link_beams(
	analyzer: &mut Analyzer,
	note_rest: Handle,
	note_type: NoteType,
	node: &Node,
	decorations: &mut Decorations,
)
{
	let legacy = |location: &Location| BeamDto {
		number: 0,
		types: [BeamType::None; MAX_BEAM_LEVELS],
		note_rest,
		location: location.clone(),
	};
	match decorations.old_beam
	{
		Some(label) => match label.value().get(1..)
		{
			Some("+") =>
			{
				if note_type.beam_level().is_none()
				{
					analyzer.report(
						&label.location,
						"Requesting beaming a note longer than eighth. Beam ignored.",
					);
				}
				else
				{
					if analyzer.builders.old_beams.is_open()
					{
						analyzer.report(
							&label.location,
							"Requesting to start a beam (g+) but there is already \
							 an open beam. Beam ignored.",
						);
					}
					analyzer.builders.old_beams.add(legacy(&label.location));
				}
			}
			Some("-") =>
			{
				if analyzer.builders.old_beams.is_open()
				{
					let dto = legacy(&label.location);
					analyzer.link(|builders, linker| builders.old_beams.close(dto, linker));
				}
				else
				{
					analyzer.report(
						&label.location,
						"Requesting to end a beam (g-) but there is no matching g+. \
						 Beam ignored.",
					);
				}
			}
			_ =>
			{
				let message =
					format!("Invalid parameter '{}'. Ignored.", label.value());
				analyzer.report(&label.location, message);
			}
		},
		None =>
		{
			if decorations.beam.is_none() && analyzer.builders.old_beams.is_open()
			{
				analyzer.builders.old_beams.add(legacy(&node.location));
			}
		}
	}
	if let Some(dto) = decorations.beam.take()
	{
		analyzer.link(|builders, linker| builders.beams.add_item_info(dto, linker));
	}
}

/// Puts `note` in the chord of `base`, creating the chord when `base` is not
/// in one yet.
fn add_to_chord(analyzer: &mut Analyzer, base: Handle, note: Handle)
{
	analyzer.link(|_, linker| {
		let chord = match linker.model.note(base).and_then(|x| x.chord)
		{
			Some(chord) => chord,
			None =>
			{
				let chord = linker.create(ImoKind::Chord(Relation::default()));
				linker.include(chord, base, RelationData::Chord);
				if let Some(base) = linker.model.note_mut(base)
				{
					base.chord = Some(chord);
				}
				chord
			}
		};
		linker.include(chord, note, RelationData::Chord);
		if let Some(note) = linker.model.note_mut(note)
		{
			note.chord = Some(chord);
		}
	});
}

#[cfg(test)]
mod tests
{
	use crate::analyzer::testing::analyse_ldp;
	use crate::model::{Accidentals, Handle, Model, StemDirection, Step};
	use pretty_assertions::assert_eq;

	fn onsets(model: &Model) -> Vec<f64>
	{
		model
			.handles()
			.filter_map(|x| model.note_rest(x))
			.map(|x| x.onset)
			.collect()
	}

	fn note_rests(model: &Model) -> Vec<Handle>
	{
		model
			.handles()
			.filter(|x| model.note_rest(*x).is_some())
			.collect()
	}

	#[test]
	fn pitch_and_duration()
	{
		let (model, diagnostics) = analyse_ldp("(musicData (n +f5 q.) (n * e) (n h4 q))");
		assert_eq!(
			diagnostics,
			"Line 0. Unknown note pitch 'h4'. Replaced by 'c4'.\n"
		);
		let notes = model.notes();
		let first = model.note(notes[0]).unwrap();
		let pitch = first.pitch.unwrap();
		assert_eq!((pitch.step, pitch.octave), (Step::F, 5));
		assert_eq!(pitch.accidentals, Accidentals::Sharp);
		assert_eq!(first.nr.dots, 1);
		assert_eq!(model.note(notes[1]).unwrap().pitch, None);
		assert_eq!(model.note(notes[2]).unwrap().pitch.map(|p| p.step), Some(Step::C));
		assert_eq!(onsets(&model), vec![0.0, 96.0, 128.0]);
	}

	#[test]
	fn missing_duration()
	{
		let (model, diagnostics) = analyse_ldp("(musicData (n c4) (r))");
		assert_eq!(
			diagnostics,
			"Line 0. n: missing mandatory element 'label'.\n\
			 Line 0. r: missing mandatory element 'label'.\n"
		);
		assert_eq!(onsets(&model), vec![0.0, 64.0]);
	}

	#[test]
	fn abbreviations_set_staff_and_voice()
	{
		let (model, diagnostics) =
			analyse_ldp("(musicData (n c4 q p2 v3) (r q x) (n e4 q (voice 4)))");
		assert_eq!(
			diagnostics,
			"Line 0. Element 'label:x' unknown or not possible here. Ignored.\n"
		);
		let handles = note_rests(&model);
		let nr: Vec<(usize, i32)> = handles
			.iter()
			.map(|x| model.note_rest(*x).unwrap())
			.map(|x| (x.so.staff, x.voice))
			.collect();
		assert_eq!(nr, vec![(1, 3), (1, 3), (1, 4)]);
	}

	#[test]
	fn stems()
	{
		let (model, diagnostics) =
			analyse_ldp("(musicData (n c4 q (stem down)) (n c4 q (stem sideways)))");
		assert_eq!(
			diagnostics,
			"Line 0. Invalid value 'sideways' for stem type. Default stem asigned.\n"
		);
		let stems: Vec<StemDirection> = model
			.notes()
			.into_iter()
			.map(|x| model.note(x).unwrap().stem)
			.collect();
		assert_eq!(stems, vec![StemDirection::Down, StemDirection::Default]);
	}

	#[test]
	fn legacy_triplet()
	{
		let (model, diagnostics) =
			analyse_ldp("(musicData (n c4 e t3) (n d4 e) (n e4 e t-) (n f4 q))");
		assert_eq!(diagnostics, "");
		let tuplets = model.find_all("tuplet");
		assert_eq!(tuplets.len(), 1);
		assert_eq!(model.relation(tuplets[0]).unwrap().members.len(), 3);
		let found = onsets(&model);
		assert!((found[3] - 64.0).abs() < 1e-9);
		assert!((found[1] - 64.0 / 3.0).abs() < 1e-9);
	}

	#[test]
	fn legacy_tuplet_errors()
	{
		let (_, diagnostics) =
			analyse_ldp("(musicData (n c4 e t3) (n d4 e t3) (n e4 e t-) (n f4 e t12))");
		assert_eq!(
			diagnostics,
			"Line 0. Requesting to start a tuplet but there is already an open \
			 tuplet. Tuplet ignored.\n\
			 Line 0. Invalid parameter 't12'. Ignored.\n"
		);
	}

	#[test]
	fn explicit_time_modification_wins()
	{
		let (model, diagnostics) = analyse_ldp(
			"(musicData (n c4 e (t + 3)) (n d4 e (tm 1 1)) (n e4 e (t -)) (r q))",
		);
		assert_eq!(diagnostics, "");
		let handles = note_rests(&model);
		let nr = model.note_rest(handles[1]).unwrap();
		assert!(nr.is_time_modification_explicit);
		assert_eq!(nr.duration(), 32.0);
		let rest = model.note_rest(handles[3]).unwrap();
		assert!((rest.onset - (32.0 + 2.0 * 64.0 / 3.0)).abs() < 1e-9);
	}

	#[test]
	fn legacy_beams()
	{
		let (model, diagnostics) = analyse_ldp(
			"(musicData (n c4 q g+) (n c4 e g+) (n d4 e) (n e4 e g-) (n f4 e g-) \
			 (n g4 e gx))",
		);
		assert_eq!(
			diagnostics,
			"Line 0. Requesting beaming a note longer than eighth. Beam ignored.\n\
			 Line 0. Requesting to end a beam (g-) but there is no matching g+. \
			 Beam ignored.\n\
			 Line 0. Invalid parameter 'gx'. Ignored.\n"
		);
		let beams = model.find_all("beam");
		assert_eq!(beams.len(), 1);
		assert_eq!(model.relation(beams[0]).unwrap().members.len(), 3);
	}

	#[test]
	fn second_g_plus_keeps_the_note()
	{
		let (model, diagnostics) =
			analyse_ldp("(musicData (n c4 e g+) (n d4 e g+) (n e4 e g-))");
		assert_eq!(
			diagnostics,
			"Line 0. Requesting to start a beam (g+) but there is already an open \
			 beam. Beam ignored.\n"
		);
		let beams = model.find_all("beam");
		assert_eq!(model.relation(beams[0]).unwrap().members.len(), 3);
	}

	#[test]
	fn legacy_tie()
	{
		let (model, diagnostics) =
			analyse_ldp("(musicData (n c4 q l) (n c4 q) (n e4 q l) (n f4 q))");
		assert_eq!(
			diagnostics,
			"Line 0. No note found to match old syntax tie. Tie ignored.\n"
		);
		assert_eq!(model.find_all("tie").len(), 1);
	}

	#[test]
	fn chord_notes_without_a_previous_note()
	{
		let (model, diagnostics) = analyse_ldp("(musicData (na c4 q) (na e4 q) (n g4 q))");
		assert_eq!(diagnostics, "");
		assert_eq!(onsets(&model), vec![0.0, 0.0, 64.0]);
		assert_eq!(model.find_all("chord").len(), 1);
	}

	#[test]
	fn lyrics_are_attached_to_notes()
	{
		let (model, diagnostics) =
			analyse_ldp("(musicData (n c4 q (lyric \"la\")) (n d4 q (dyn \"p\")))");
		assert_eq!(diagnostics, "");
		let notes = model.notes();
		assert_eq!(model.children(notes[0]).len(), 1);
		assert_eq!(model.kind(model.children(notes[1])[0]).name(), "dynamics");
	}
}
