//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The autobeamer derives the per-level beam types of the notes in a beam
//! from their note types. Rests in the beam are left alone.

use crate::model::{BeamType, Handle, Model, RelationData, MAX_BEAM_LEVELS};

/// Recomputes the beam types of every note in `beam`. A beam with fewer
/// than two notes is left untouched.
pub fn autobeam(model: &mut Model, beam: Handle)
{
	let notes: Vec<Handle> = match model.relation(beam)
	{
		Some(relation) => relation
			.members
			.iter()
			.map(|(member, _)| *member)
			.filter(|member| model.note(*member).is_some())
			.collect(),
		None => return,
	};
	if notes.len() < 2
	{
		return;
	}

	let levels: Vec<i32> = notes
		.iter()
		.map(|note| {
			model
				.note(*note)
				.and_then(|x| x.nr.note_type.beam_level())
				.map_or(-1, |x| x as i32)
		})
		.collect();

	let last = notes.len() - 1;
	for (i, note) in notes.iter().enumerate()
	{
		let position = if i == 0
		{
			Position::First
		}
		else if i == last
		{
			Position::Last
		}
		else
		{
			Position::Middle
		};
		let triad = Triad {
			position,
			previous: if i == 0 { -1 } else { levels[i - 1] },
			current: levels[i],
			next: if i == last { -1 } else { levels[i + 1] },
		};
		let types = compute_types(&triad);
		set_types(model, beam, *note, types);
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position
{
	First,
	Middle,
	Last,
}

/// The deepest beam levels of a note and its neighbours; -1 when there is
/// no neighbour or the note cannot be beamed.
struct Triad
{
	position: Position,
	previous: i32,
	current: i32,
	next: i32,
}

fn compute_types(triad: &Triad) -> [BeamType; MAX_BEAM_LEVELS]
{
	let mut types = [BeamType::None; MAX_BEAM_LEVELS];
	for level in 0..MAX_BEAM_LEVELS
	{
		let depth = level as i32;
		types[level] = if depth > triad.current
		{
			BeamType::None
		}
		else
		{
			match triad.position
			{
				Position::First if depth > triad.next => BeamType::Forward,
				Position::First => BeamType::Begin,
				Position::Middle if depth > triad.previous =>
				{
					if depth > triad.next
					{
						hook_direction(&types[..level])
					}
					else
					{
						BeamType::Begin
					}
				}
				Position::Middle if depth > triad.next => BeamType::End,
				Position::Middle => BeamType::Continue,
				Position::Last if depth <= triad.previous => BeamType::End,
				Position::Last => BeamType::Backward,
			}
		};
	}
	types
}

/// A hook points the way of the first shallower level that starts or ends
/// here, and backward otherwise.
fn hook_direction(shallower: &[BeamType]) -> BeamType
{
	for beam_type in shallower
	{
		match beam_type
		{
			BeamType::Begin | BeamType::Forward => return BeamType::Forward,
			BeamType::End | BeamType::Backward => return BeamType::Backward,
			_ => (),
		}
	}
	BeamType::Backward
}

fn set_types(
	model: &mut Model,
	beam: Handle,
	note: Handle,
	types: [BeamType; MAX_BEAM_LEVELS],
)
{
	if let Some(relation) = model.relation_mut(beam)
	{
		for (member, data) in relation.members.iter_mut()
		{
			if *member == note
			{
				*data = RelationData::Beam { types };
			}
		}
	}
}
