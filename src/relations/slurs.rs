//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

use crate::lexer::Location;
use crate::model::{Bezier, Color, Handle, ImoKind, Relation, RelationData, Slur};
use crate::relations::{Descriptor, Linker, Phase, RelationBuilder};

#[derive(Debug, Clone, PartialEq)]
pub struct SlurDto
{
	pub number: i32,
	pub phase: Phase,
	pub bezier: Option<Bezier>,
	pub color: Option<Color>,
	pub note: Handle,
	pub location: Location,
}

impl Descriptor for SlurDto
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
		self.note
	}

	fn location(&self) -> &Location
	{
		&self.location
	}
}

#[derive(Debug)]
pub struct SlursBuilder
{
	builder: RelationBuilder<SlurDto>,
}

impl Default for SlursBuilder
{
	fn default() -> SlursBuilder
	{
		SlursBuilder {
			builder: RelationBuilder::new("slur", "Slur"),
		}
	}
}

impl SlursBuilder
{
	pub fn add_item_info(&mut self, dto: SlurDto, linker: &mut Linker)
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

/// A slur links its start and its stop; `continue` points only hold the
/// chain open.
fn link(chain: Vec<SlurDto>, linker: &mut Linker)
{
	let (number, color) = match (chain.first(), chain.last())
	{
		(Some(start), Some(end)) => (end.number, start.color),
		_ => return,
	};
	let slur = linker.create(ImoKind::Slur(Slur {
		number,
		color,
		relation: Relation::default(),
	}));
	for dto in chain
	{
		if dto.phase == Phase::Continue
		{
			continue;
		}
		let data = RelationData::Slur {
			is_start: dto.phase == Phase::Start,
			bezier: dto.bezier,
		};
		linker.include(slur, dto.note, data);
	}
}
