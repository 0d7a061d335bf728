//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

use crate::lexer::Location;
use crate::model::{DisplayNumber, Handle, ImoKind, Relation, RelationData};
use crate::model::{TimeModification, TimeUnits, Tuplet, YesNo};
use crate::relations::{Descriptor, Linker, Phase, RelationBuilder};

#[derive(Debug, Clone, PartialEq)]
pub struct TupletDto
{
	pub number: i32,
	pub phase: Phase,
	pub actual: u32,
	pub normal: u32,
	pub show_bracket: YesNo,
	pub show_number: DisplayNumber,
	pub note_rest: Handle,
	pub location: Location,
}

impl TupletDto
{
	/// The normal count implied by an actual count, when there is one.
	pub fn default_normal(actual: u32) -> Option<u32>
	{
		match actual
		{
			2 => Some(3),
			3 => Some(2),
			4 => Some(6),
			5 => Some(6),
			_ => None,
		}
	}

	fn time_modification(&self) -> TimeModification
	{
		TimeModification {
			normal: self.normal,
			actual: self.actual,
		}
	}
}

impl Descriptor for TupletDto
{
	fn number(&self) -> i32
	{
		self.number
	}

	fn phase(&self) -> Phase
	{
		self.phase
	}

	fn member(&self) -> Handle
	{
		self.note_rest
	}

	fn location(&self) -> &Location
	{
		&self.location
	}
}

#[derive(Debug)]
pub struct TupletsBuilder
{
	builder: RelationBuilder<TupletDto>,
}

impl Default for TupletsBuilder
{
	fn default() -> TupletsBuilder
	{
		TupletsBuilder {
			builder: RelationBuilder::new("tuplet", "Tuplet"),
		}
	}
}

impl TupletsBuilder
{
	pub fn add_item_info(&mut self, dto: TupletDto, linker: &mut Linker)
	{
		if let Some(chain) = self.builder.add_item_info(dto, linker)
		{
			link(chain, linker);
		}
	}

	fn open_starts(&self) -> impl Iterator<Item = &TupletDto>
	{
		self.builder
			.pending()
			.iter()
			.filter(|x| x.phase == Phase::Start)
	}

	pub fn is_open(&self) -> bool
	{
		self.open_starts().next().is_some()
	}

	/// The number of the most recently opened tuplet that is still open.
	pub fn innermost_open(&self) -> Option<i32>
	{
		self.open_starts().last().map(|x| x.number)
	}

	/// The duration factor that every open tuplet applies together.
	pub fn open_ratio(&self) -> TimeUnits
	{
		self.open_starts()
			.map(|x| x.time_modification().ratio())
			.product()
	}

	/// Makes `note_rest` a member of every open tuplet.
	pub fn add_to_open_tuplets(&mut self, note_rest: Handle, location: &Location)
	{
		let continues: Vec<TupletDto> = self
			.open_starts()
			.map(|start| TupletDto {
				phase: Phase::Continue,
				note_rest,
				location: location.clone(),
				..start.clone()
			})
			.collect();
		for dto in continues
		{
			self.builder.save(dto);
		}
	}

	pub fn clear_pending_items(&mut self, linker: &mut Linker)
	{
		self.builder.clear_pending_items(linker);
	}
}

/// Creates the tuplet and applies its time modification to every member
/// whose time modification was not given explicitly. Nested tuplets
/// multiply.
fn link(chain: Vec<TupletDto>, linker: &mut Linker)
{
	let start = match chain.first()
	{
		Some(start) => start.clone(),
		None => return,
	};
	let tuplet = linker.create(ImoKind::Tuplet(Tuplet {
		actual: start.actual,
		normal: start.normal,
		show_bracket: start.show_bracket,
		show_number: start.show_number,
		relation: Relation::default(),
	}));
	let modification = start.time_modification();
	for dto in chain
	{
		linker.include(tuplet, dto.note_rest, RelationData::Tuplet);
		if let Some(nr) = linker.model.note_rest_mut(dto.note_rest)
		{
			if !nr.is_time_modification_explicit
			{
				nr.time_modification = Some(match nr.time_modification
				{
					Some(inner) => inner.combined_with(modification),
					None => modification,
				});
			}
		}
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::context::IdAssigner;
	use crate::model::{Model, NoteRest, NoteType};
	use pretty_assertions::assert_eq;

	fn dto(number: i32, phase: Phase, actual: u32, note_rest: Handle) -> TupletDto
	{
		TupletDto {
			number,
			phase,
			actual,
			normal: TupletDto::default_normal(actual).unwrap_or(1),
			show_bracket: YesNo::Default,
			show_number: DisplayNumber::Actual,
			note_rest,
			location: Location::default(),
		}
	}

	#[test]
	fn nested_tuplets_multiply()
	{
		let mut model = Model::default();
		let mut ids = IdAssigner::default();
		let mut diagnostics = String::new();
		let r: Vec<Handle> = (0..4)
			.map(|i| model.add(i, ImoKind::Rest(NoteRest::new(NoteType::Eighth, 0))))
			.collect();
		let _ = ids.assign(Some(3));
		let mut linker = Linker {
			model: &mut model,
			ids: &mut ids,
			sink: &mut diagnostics,
		};
		let mut builder = TupletsBuilder::default();
		builder.add_item_info(dto(1, Phase::Start, 3, r[0]), &mut linker);
		builder.add_to_open_tuplets(r[1], &Location::default());
		builder.add_item_info(dto(2, Phase::Start, 3, r[1]), &mut linker);
		assert!((builder.open_ratio() - 4.0 / 9.0).abs() < 1e-9);
		assert_eq!(builder.innermost_open(), Some(2));
		builder.add_item_info(dto(2, Phase::Stop, 3, r[2]), &mut linker);
		builder.add_to_open_tuplets(r[2], &Location::default());
		builder.add_item_info(dto(1, Phase::Stop, 3, r[3]), &mut linker);
		assert!(!builder.is_open());
		assert_eq!(diagnostics, "");

		assert_eq!(model.find_all("tuplet").len(), 2);
		let nested = model.note_rest(r[1]).unwrap().time_modification;
		assert_eq!(
			nested,
			Some(TimeModification {
				normal: 4,
				actual: 9
			})
		);
		let outer = model.note_rest(r[0]).unwrap().time_modification;
		assert_eq!(
			outer,
			Some(TimeModification {
				normal: 2,
				actual: 3
			})
		);
	}
}
