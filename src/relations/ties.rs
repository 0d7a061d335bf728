//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

use crate::lexer::Location;
use crate::model::{Bezier, Color, Handle, ImoKind, Note, Relation};
use crate::model::{RelationData, Tie};
use crate::relations::{Descriptor, Linker, Phase, RelationBuilder};

#[derive(Debug, Clone, PartialEq)]
pub struct TieDto
{
	pub number: i32,
	pub is_start: bool,
	pub bezier: Option<Bezier>,
	pub color: Option<Color>,
	pub note: Handle,
	pub location: Location,
}

impl Descriptor for TieDto
{
	fn number(&self) -> i32
	{
		self.number
	}

	fn phase(&self) -> Phase
	{
		if self.is_start
		{
			Phase::Start
		}
		else
		{
			Phase::Stop
		}
	}

	fn member(&self) -> Handle
	{
		self.note
	}

	fn location(&self) -> &Location
	{
		&self.location
	}
}

fn notes_can_be_tied(start: &Note, end: &Note) -> bool
{
	start.nr.voice == end.nr.voice
		&& start.nr.so.staff == end.nr.so.staff
		&& start.pitch == end.pitch
}

struct TieEnd
{
	note: Handle,
	bezier: Option<Bezier>,
}

/// Creates the tie and points both notes at it. Without a number the tie is
/// numbered after its own id.
fn tie_notes(
	linker: &mut Linker,
	start: TieEnd,
	end: TieEnd,
	number: Option<i32>,
	color: Option<Color>,
) -> Handle
{
	let tie = linker.create(ImoKind::Tie(Tie {
		number: number.unwrap_or_default(),
		color,
		relation: Relation::default(),
	}));
	if number.is_none()
	{
		let id = i32::try_from(linker.model.id(tie)).unwrap_or(i32::MAX);
		if let ImoKind::Tie(x) = &mut linker.model.get_mut(tie).kind
		{
			x.number = id;
		}
	}
	linker.include(
		tie,
		start.note,
		RelationData::Tie {
			is_start: true,
			bezier: start.bezier,
		},
	);
	linker.include(
		tie,
		end.note,
		RelationData::Tie {
			is_start: false,
			bezier: end.bezier,
		},
	);
	if let Some(note) = linker.model.note_mut(start.note)
	{
		note.tie_next = Some(tie);
	}
	if let Some(note) = linker.model.note_mut(end.note)
	{
		note.tie_prev = Some(tie);
	}
	tie
}

#[derive(Debug)]
pub struct TiesBuilder
{
	builder: RelationBuilder<TieDto>,
}

impl Default for TiesBuilder
{
	fn default() -> TiesBuilder
	{
		TiesBuilder {
			builder: RelationBuilder::new("tie", "Tie"),
		}
	}
}

impl TiesBuilder
{
	pub fn add_item_info(&mut self, dto: TieDto, linker: &mut Linker)
	{
		if let Some(chain) = self.builder.add_item_info(dto, linker)
		{
			link(chain, linker);
		}
	}

	pub fn clear_pending_items(&mut self, linker: &mut Linker)
	{
		self.builder.clear_pending_items(linker);
	}
}

fn link(chain: Vec<TieDto>, linker: &mut Linker)
{
	let mut chain = chain.into_iter();
	let (start, end) = match (chain.next(), chain.last())
	{
		(Some(start), Some(end)) => (start, end),
		_ => return,
	};
	let compatible = match (linker.model.note(start.note), linker.model.note(end.note))
	{
		(Some(a), Some(b)) => notes_can_be_tied(a, b),
		_ => false,
	};
	if !compatible
	{
		let message = format!(
			"Requesting to tie notes of different voice or pitch. Tie number \
			 {} will be ignored.",
			end.number
		);
		linker.report(&end.location, message);
		return;
	}
	tie_notes(
		linker,
		TieEnd {
			note: start.note,
			bezier: start.bezier,
		},
		TieEnd {
			note: end.note,
			bezier: end.bezier,
		},
		Some(start.number),
		start.color,
	);
}

/// The legacy `l` marker ties a note to the next note of the same voice
/// with the same pitch.
#[derive(Debug, Default)]
pub struct OldTiesBuilder
{
	start: Option<(Handle, Location)>,
}

impl OldTiesBuilder
{
	pub fn is_pending(&self) -> bool
	{
		self.start.is_some()
	}

	pub fn start_old_tie(
		&mut self,
		note: Handle,
		location: Location,
		linker: &mut Linker,
	)
	{
		self.create_if_pending(note, linker);
		self.start = Some((note, location));
	}

	/// Offers `note` as the end of the pending legacy tie. Notes of other
	/// voices are skipped; a note of the same voice that cannot be tied
	/// voids the tie.
	pub fn create_if_pending(&mut self, note: Handle, linker: &mut Linker)
	{
		let (start, location) = match &self.start
		{
			Some((start, location)) => (*start, location.clone()),
			None => return,
		};
		let (compatible, same_voice) =
			match (linker.model.note(start), linker.model.note(note))
			{
				(Some(a), Some(b)) =>
				{
					(notes_can_be_tied(a, b), a.nr.voice == b.nr.voice)
				}
				_ => (false, false),
			};
		if compatible
		{
			let start = TieEnd {
				note: start,
				bezier: None,
			};
			let end = TieEnd { note, bezier: None };
			tie_notes(linker, start, end, None, None);
			self.start = None;
		}
		else if same_voice
		{
			linker.report(
				&location,
				"No note found to match old syntax tie. Tie ignored.".to_string(),
			);
			self.start = None;
		}
	}

	pub fn clear(&mut self, linker: &mut Linker)
	{
		if let Some((_, location)) = self.start.take()
		{
			linker.report(
				&location,
				"No note found to match old syntax tie. Tie ignored.".to_string(),
			);
		}
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::context::IdAssigner;
	use crate::model::{Model, NoteRest, NoteType, Pitch, StemDirection};
	use pretty_assertions::assert_eq;

	fn add_note(model: &mut Model, pitch: &str, voice: i32) -> Handle
	{
		let mut nr = NoteRest::new(NoteType::Quarter, 0);
		nr.voice = voice;
		let id = model.len() as i64;
		model.add(
			id,
			ImoKind::Note(Note {
				nr,
				pitch: Pitch::parse(pitch),
				stem: StemDirection::Default,
				tie_next: None,
				tie_prev: None,
				chord: None,
			}),
		)
	}

	fn dto(number: i32, is_start: bool, note: Handle, line: usize) -> TieDto
	{
		TieDto {
			number,
			is_start,
			bezier: None,
			color: None,
			note,
			location: Location {
				line_number: line,
				..Location::default()
			},
		}
	}

	#[test]
	fn tie_equal_pitches()
	{
		let mut model = Model::default();
		let mut ids = IdAssigner::default();
		let mut diagnostics = String::new();
		let a = add_note(&mut model, "c4", 1);
		let b = add_note(&mut model, "c4", 1);
		let _ = ids.assign(Some(1));
		let mut linker = Linker {
			model: &mut model,
			ids: &mut ids,
			sink: &mut diagnostics,
		};
		let mut builder = TiesBuilder::default();
		builder.add_item_info(dto(7, true, a, 0), &mut linker);
		builder.add_item_info(dto(7, false, b, 1), &mut linker);
		assert_eq!(diagnostics, "");
		let tie = model.note(a).unwrap().tie_next.unwrap();
		assert_eq!(model.note(b).unwrap().tie_prev, Some(tie));
		let relation = model.relation(tie).unwrap();
		assert_eq!(relation.first(), Some(a));
		assert_eq!(relation.last(), Some(b));
		match model.kind(tie)
		{
			ImoKind::Tie(tie) => assert_eq!(tie.number, 7),
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn refuse_different_voices()
	{
		let mut model = Model::default();
		let mut ids = IdAssigner::default();
		let mut diagnostics = String::new();
		let a = add_note(&mut model, "c4", 1);
		let b = add_note(&mut model, "c4", 2);
		let mut linker = Linker {
			model: &mut model,
			ids: &mut ids,
			sink: &mut diagnostics,
		};
		let mut builder = TiesBuilder::default();
		builder.add_item_info(dto(1, true, a, 0), &mut linker);
		builder.add_item_info(dto(1, false, b, 3), &mut linker);
		builder.clear_pending_items(&mut linker);
		assert_eq!(
			diagnostics,
			"Line 3. Requesting to tie notes of different voice or pitch. Tie \
			 number 1 will be ignored.\n"
		);
		assert_eq!(model.note(a).unwrap().tie_next, None);
		assert!(model.find_all("tie").is_empty());
	}

	#[test]
	fn old_tie_skips_other_voices()
	{
		let mut model = Model::default();
		let mut ids = IdAssigner::default();
		let mut diagnostics = String::new();
		let a = add_note(&mut model, "e4", 1);
		let b = add_note(&mut model, "g3", 2);
		let c = add_note(&mut model, "e4", 1);
		let _ = ids.assign(Some(2));
		let mut linker = Linker {
			model: &mut model,
			ids: &mut ids,
			sink: &mut diagnostics,
		};
		let mut builder = OldTiesBuilder::default();
		builder.start_old_tie(a, Location::default(), &mut linker);
		builder.create_if_pending(b, &mut linker);
		assert!(builder.is_pending());
		builder.create_if_pending(c, &mut linker);
		assert!(!builder.is_pending());
		assert_eq!(diagnostics, "");
		let tie = model.note(c).unwrap().tie_prev.unwrap();
		match model.kind(tie)
		{
			ImoKind::Tie(x) => assert_eq!(x.number as i64, model.id(tie)),
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn old_tie_fails_on_other_pitch()
	{
		let mut model = Model::default();
		let mut ids = IdAssigner::default();
		let mut diagnostics = String::new();
		let a = add_note(&mut model, "e4", 1);
		let b = add_note(&mut model, "f4", 1);
		let mut linker = Linker {
			model: &mut model,
			ids: &mut ids,
			sink: &mut diagnostics,
		};
		let mut builder = OldTiesBuilder::default();
		let location = Location {
			line_number: 4,
			..Location::default()
		};
		builder.start_old_tie(a, location, &mut linker);
		builder.create_if_pending(b, &mut linker);
		builder.clear(&mut linker);
		assert_eq!(
			diagnostics,
			"Line 4. No note found to match old syntax tie. Tie ignored.\n"
		);
	}
}
