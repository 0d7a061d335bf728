//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

use cadenza::model::{BeamType, ImoKind};
use cadenza::*;

use pretty_assertions::assert_eq;

fn analyse(source: &str) -> (Model, String)
{
	let mut diagnostics = String::new();
	let model = analyse_source(source, "test.lmd", &mut diagnostics).unwrap();
	(model, diagnostics)
}

#[test]
fn tie_equal_notes()
{
	let (model, diagnostics) =
		analyse("(musicData (n c4 q (tie 12 start)) (n c4 e (tie 12 stop)))");
	assert_eq!(diagnostics, "");
	let notes = model.notes();
	let first = model.note(notes[0]).unwrap();
	let second = model.note(notes[1]).unwrap();
	assert!(first.tie_next.is_some());
	assert!(first.tie_prev.is_none());
	assert!(second.tie_prev.is_some());
	assert!(second.tie_next.is_none());
	assert_eq!(first.tie_next, second.tie_prev);

	let tie = first.tie_next.unwrap();
	let relation = model.relation(tie).unwrap();
	assert_eq!(relation.first(), Some(notes[0]));
	assert_eq!(relation.last(), Some(notes[1]));
}

#[test]
fn refuse_to_tie_different_pitches()
{
	let (model, diagnostics) =
		analyse("(musicData (n c4 q (tie 12 start)) (n c3 e (tie 12 stop)))");
	assert_eq!(
		diagnostics,
		"Line 0. Requesting to tie notes of different voice or pitch. Tie \
		 number 12 will be ignored.\n"
	);
	for note in model.notes()
	{
		let note = model.note(note).unwrap();
		assert!(note.tie_next.is_none());
		assert!(note.tie_prev.is_none());
	}
	assert!(model.find_all("tie").is_empty());
}

#[test]
fn refuse_to_tie_different_voices()
{
	let (model, diagnostics) =
		analyse("(musicData (n c4 q v1 (tie 5 start)) (n c4 q v2 (tie 5 stop)))");
	assert_eq!(
		diagnostics,
		"Line 0. Requesting to tie notes of different voice or pitch. Tie \
		 number 5 will be ignored.\n"
	);
	assert!(model.find_all("tie").is_empty());
}

#[test]
fn unterminated_tie()
{
	let (model, diagnostics) = analyse("(n c4 e (tie 12 start))");
	assert_eq!(
		diagnostics,
		"Line 0. No 'end' element for tie number 12. Tie ignored.\n"
	);
	assert!(model.find_all("tie").is_empty());
}

#[test]
fn one_diagnostic_per_open_number()
{
	let (model, diagnostics) = analyse(
		"(musicData\n(n c4 q (tie 1 start))\n(n d4 q (tie 2 start))\n\
		 (n e4 q (slur 3 start))\n(n f4 q (slur 3 continue)))",
	);
	assert_eq!(
		diagnostics,
		"Line 1. No 'end' element for tie number 1. Tie ignored.\n\
		 Line 2. No 'end' element for tie number 2. Tie ignored.\n\
		 Line 3. No 'end' element for slur number 3. Slur ignored.\n"
	);
	assert!(model.find_all("tie").is_empty());
	assert!(model.find_all("slur").is_empty());
}

#[test]
fn relations_do_not_cross_instruments()
{
	let (model, diagnostics) = analyse(
		"(score (vers 1.6)\n\
		 (instrument (musicData (n c4 q (tie 1 start))))\n\
		 (instrument (musicData (n c4 q (tie 1 stop)))))",
	);
	assert_eq!(
		diagnostics,
		"Line 1. No 'end' element for tie number 1. Tie ignored.\n\
		 Line 2. No 'start/continue' elements for tie number 1. Tie ignored.\n"
	);
	assert!(model.find_all("tie").is_empty());
}

#[test]
fn slur_with_continuation()
{
	let (model, diagnostics) = analyse(
		"(musicData (n c4 q (slur 1 start)) (n d4 q (slur 1 continue)) \
		 (n e4 q (slur 1 stop)))",
	);
	assert_eq!(diagnostics, "");
	let slurs = model.find_all("slur");
	assert_eq!(slurs.len(), 1);
	let relation = model.relation(slurs[0]).unwrap();
	let notes = model.notes();
	assert_eq!(relation.first(), Some(notes[0]));
	assert_eq!(relation.last(), Some(notes[2]));
	assert!(!relation.contains(notes[1]));
}

#[test]
fn duplicate_start_is_ignored()
{
	let (model, diagnostics) = analyse(
		"(musicData\n(n c4 q (slur 1 start))\n(n d4 q (slur 1 start))\n\
		 (n e4 q (slur 1 stop)))",
	);
	assert_eq!(
		diagnostics,
		"Line 2. This slur has the same number than that defined in line 1. \
		 This slur will be ignored.\n"
	);
	assert_eq!(model.find_all("slur").len(), 1);
}

#[test]
fn beams_and_tuplets_sample()
{
	let source =
		std::fs::read_to_string("tests/samples/valid/beams_and_tuplets.lmd")
			.unwrap();
	let mut diagnostics = String::new();
	let model = analyse_source(&source, "beams_and_tuplets.lmd", &mut diagnostics)
		.unwrap();
	assert_eq!(diagnostics, "");
	assert_eq!(model.find_all("beam").len(), 3);
	assert_eq!(model.find_all("tuplet").len(), 1);

	let notes = model.notes();
	let levels: Vec<[BeamType; 2]> = notes[5..9]
		.iter()
		.map(|x| {
			let types = model.beam_types(*x).unwrap();
			[types[0], types[1]]
		})
		.collect();
	assert_eq!(
		levels,
		vec![
			[BeamType::Begin, BeamType::Begin],
			[BeamType::Continue, BeamType::Continue],
			[BeamType::Continue, BeamType::Continue],
			[BeamType::End, BeamType::End],
		]
	);

	let tuplet = model.find_all("tuplet")[0];
	match model.kind(tuplet)
	{
		ImoKind::Tuplet(tuplet) =>
		{
			assert_eq!((tuplet.actual, tuplet.normal), (3, 2));
			assert_eq!(tuplet.relation.members.len(), 3);
		}
		kind => panic!("expected a tuplet, got {:?}", kind),
	}
	let onsets: Vec<i64> = notes[2..7]
		.iter()
		.map(|x| (model.note(*x).unwrap().nr.onset * 1000.0).round() as i64)
		.collect();
	assert_eq!(onsets, vec![64000, 85333, 106667, 128000, 144000]);
}

#[test]
fn legacy_beam_is_autobeamed()
{
	let (model, diagnostics) = analyse("(musicData (n c4 e g+) (n d4 s) (n e4 s g-))");
	assert_eq!(diagnostics, "");
	let types: Vec<[BeamType; 2]> = model
		.notes()
		.into_iter()
		.map(|x| {
			let types = model.beam_types(x).unwrap();
			[types[0], types[1]]
		})
		.collect();
	assert_eq!(
		types,
		vec![
			[BeamType::Begin, BeamType::None],
			[BeamType::Continue, BeamType::Begin],
			[BeamType::End, BeamType::End],
		]
	);
}

#[test]
fn huge_nested_tuplets()
{
	let (model, diagnostics) = analyse(
		"(score (vers 2.0) (instrument (musicData \
		 (n c4 e (t 1 + 70000 2)) (n d4 e (t 2 + 70000 2)) \
		 (n e4 e (t 2 -)) (n f4 e (t 1 -)))))",
	);
	assert_eq!(diagnostics, "");
	assert_eq!(model.find_all("tuplet").len(), 2);
	for note in model.notes()
	{
		let duration = model.note(note).unwrap().nr.duration();
		assert!(duration.is_finite() && duration > 0.0);
	}
}

#[test]
fn out_of_range_tie_numbers_do_not_pair()
{
	let (model, diagnostics) = analyse(
		"(musicData\n(n c4 q (tie 4294967308 start))\n(n c4 e (tie 12 stop)))",
	);
	assert_eq!(
		diagnostics,
		"Line 1. Invalid integer number '4294967308'. Replaced by '0'.\n\
		 Line 2. No 'start/continue' elements for tie number 12. Tie ignored.\n\
		 Line 1. No 'end' element for tie number 0. Tie ignored.\n"
	);
	assert!(model.find_all("tie").is_empty());
}

#[test]
fn out_of_range_voices_are_replaced()
{
	let (model, diagnostics) = analyse(
		"(musicData\n(n c4 q v4294967297)\n(n d4 q (voice 4294967298)))",
	);
	assert_eq!(
		diagnostics,
		"Line 1. Invalid voice 'v4294967297'. Replaced by 'v1'.\n\
		 Line 2. Invalid integer number '4294967298'. Replaced by '1'.\n"
	);
	for note in model.notes()
	{
		assert_eq!(model.note(note).unwrap().nr.voice, 1);
	}
}
