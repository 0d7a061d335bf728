//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

use crate::autobeamer;
use crate::lexer::Location;
use crate::model::{BeamType, Handle, ImoKind, Relation, RelationData};
use crate::model::MAX_BEAM_LEVELS;
use crate::relations::{Descriptor, Linker, Phase, RelationBuilder};

#[derive(Debug, Clone, PartialEq)]
pub struct BeamDto
{
	pub number: i32,
	pub types: [BeamType; MAX_BEAM_LEVELS],
	pub note_rest: Handle,
	pub location: Location,
}

impl BeamDto
{
	/// Reads up to six level characters: `+` begin, `=` continue, `-` end,
	/// `f` forward hook and `b` backward hook.
	pub fn parse_types(value: &str) -> Option<[BeamType; MAX_BEAM_LEVELS]>
	{
		let mut types = [BeamType::None; MAX_BEAM_LEVELS];
		if value.is_empty() || value.chars().count() > MAX_BEAM_LEVELS
		{
			return None;
		}
		for (level, c) in value.chars().enumerate()
		{
			types[level] = match c
			{
				'+' => BeamType::Begin,
				'=' => BeamType::Continue,
				'-' => BeamType::End,
				'f' => BeamType::Forward,
				'b' => BeamType::Backward,
				_ => return None,
			};
		}
		Some(types)
	}

	fn has_only_main_level(&self) -> bool
	{
		self.types[1..].iter().all(|x| *x == BeamType::None)
	}
}

impl Descriptor for BeamDto
{
	fn number(&self) -> i32
	{
		self.number
	}

	fn phase(&self) -> Phase
	{
		match self.types[0]
		{
			BeamType::Begin => Phase::Start,
			BeamType::End => Phase::Stop,
			_ => Phase::Continue,
		}
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

fn create_beam(chain: Vec<BeamDto>, linker: &mut Linker) -> Handle
{
	let beam = linker.create(ImoKind::Beam(Relation::default()));
	for dto in chain
	{
		let data = RelationData::Beam { types: dto.types };
		linker.include(beam, dto.note_rest, data);
	}
	beam
}

#[derive(Debug)]
pub struct BeamsBuilder
{
	builder: RelationBuilder<BeamDto>,
}

impl Default for BeamsBuilder
{
	fn default() -> BeamsBuilder
	{
		BeamsBuilder {
			builder: RelationBuilder::new("beam", "Beam"),
		}
	}
}

impl BeamsBuilder
{
	pub fn add_item_info(&mut self, dto: BeamDto, linker: &mut Linker)
	{
		if let Some(chain) = self.builder.add_item_info(dto, linker)
		{
			let is_main_level_only = chain.iter().all(|x| x.has_only_main_level());
			let beam = create_beam(chain, linker);
			if is_main_level_only
			{
				autobeamer::autobeam(linker.model, beam);
			}
		}
	}

	pub fn clear_pending_items(&mut self, linker: &mut Linker)
	{
		self.builder.clear_pending_items(linker);
	}
}

/// Collects the notes between a legacy `g+` and `g-`.
#[derive(Debug, Default)]
pub struct OldBeamsBuilder
{
	pending: Vec<BeamDto>,
}

impl OldBeamsBuilder
{
	pub fn is_open(&self) -> bool
	{
		!self.pending.is_empty()
	}

	pub fn add(&mut self, dto: BeamDto)
	{
		self.pending.push(dto);
	}

	pub fn close(&mut self, dto: BeamDto, linker: &mut Linker)
	{
		self.pending.push(dto);
		let chain = std::mem::take(&mut self.pending);
		let beam = create_beam(chain, linker);
		autobeamer::autobeam(linker.model, beam);
	}

	pub fn clear(&mut self, linker: &mut Linker)
	{
		if let Some(start) = self.pending.first()
		{
			linker.report(
				&start.location,
				"No matching 'g-' element for 'g+'. Beam ignored.".to_string(),
			);
		}
		self.pending.clear();
	}
}
