//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! Relation builders collect the descriptors that notes and rests carry and
//! link them into relation objects once a chain is complete.

pub mod beams;
pub mod slurs;
pub mod ties;
pub mod tuplets;

pub use beams::{BeamDto, BeamsBuilder, OldBeamsBuilder};
pub use slurs::{SlurDto, SlursBuilder};
pub use ties::{OldTiesBuilder, TieDto, TiesBuilder};
pub use tuplets::{TupletDto, TupletsBuilder};

use crate::context::IdAssigner;
use crate::error::{Diagnostic, Sink};
use crate::lexer::Location;
use crate::model::{Handle, ImoKind, Model, RelationData};

use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase
{
	Start,
	Continue,
	Stop,
}

/// One endpoint of a relation that is not linked yet.
pub trait Descriptor
{
	fn number(&self) -> i32;
	fn phase(&self) -> Phase;
	fn member(&self) -> Handle;
	fn location(&self) -> &Location;

	fn line(&self) -> usize
	{
		self.location().line_number
	}
}

/// What a builder needs to create relations and report pairing failures.
pub struct Linker<'w>
{
	pub model: &'w mut Model,
	pub ids: &'w mut IdAssigner,
	pub sink: &'w mut dyn Sink,
}

impl Linker<'_>
{
	pub fn report(&mut self, location: &Location, message: String)
	{
		let diagnostic = Diagnostic::new(location, message);
		warn!("{}", diagnostic);
		self.sink.report(diagnostic);
	}

	pub fn create(&mut self, kind: ImoKind) -> Handle
	{
		let id = self.ids.next_id();
		debug!("Creating {} #{}", kind.name(), id);
		self.model.add(id, kind)
	}

	pub fn include(&mut self, relation: Handle, member: Handle, data: RelationData)
	{
		self.model.include_in_relation(relation, member, data);
	}
}

/// The pairing state machine shared by ties, slurs, numbered beams and
/// tuplets. Descriptors wait in `pending` until a stop with the same number
/// arrives; the stop then takes every pending descriptor with that number.
#[derive(Debug)]
pub struct RelationBuilder<D>
{
	name: &'static str,
	title: &'static str,
	pending: Vec<D>,
}

impl<D: Descriptor> RelationBuilder<D>
{
	pub fn new(name: &'static str, title: &'static str) -> RelationBuilder<D>
	{
		RelationBuilder {
			name,
			title,
			pending: Vec::new(),
		}
	}

	pub fn pending(&self) -> &[D]
	{
		&self.pending
	}

	pub fn save(&mut self, dto: D)
	{
		self.pending.push(dto);
	}

	/// Returns the complete chain, start first, when `dto` closes one.
	pub fn add_item_info(
		&mut self,
		dto: D,
		linker: &mut Linker,
	) -> Option<Vec<D>>
	{
		if let Some(existing) = self.pending.iter().find(|x| {
			x.member() == dto.member() && x.number() == dto.number()
		})
		{
			let message = format!(
				"A {name} with the same number is already defined for this \
				 element in line {line}. This {name} will be ignored.",
				name = self.name,
				line = existing.line(),
			);
			linker.report(dto.location(), message);
			return None;
		}

		match dto.phase()
		{
			Phase::Start =>
			{
				if let Some(existing) = self.pending.iter().find(|x| {
					x.phase() == Phase::Start && x.number() == dto.number()
				})
				{
					let message = format!(
						"This {name} has the same number than that defined in \
						 line {line}. This {name} will be ignored.",
						name = self.name,
						line = existing.line(),
					);
					linker.report(dto.location(), message);
					return None;
				}
				self.pending.push(dto);
				None
			}
			Phase::Continue =>
			{
				self.pending.push(dto);
				None
			}
			Phase::Stop =>
			{
				let number = dto.number();
				if !self.pending.iter().any(|x| x.number() == number)
				{
					let message = format!(
						"No 'start/continue' elements for {} number {}. {} \
						 ignored.",
						self.name, number, self.title
					);
					linker.report(dto.location(), message);
					return None;
				}
				let (mut matches, remaining): (Vec<D>, Vec<D>) = self
					.pending
					.drain(..)
					.partition(|x| x.number() == number);
				self.pending = remaining;
				matches.push(dto);
				Some(matches)
			}
		}
	}

	/// Reports every correlation number that is still open and forgets it.
	pub fn clear_pending_items(&mut self, linker: &mut Linker)
	{
		let mut reported: Vec<i32> = Vec::new();
		for dto in self.pending.drain(..)
		{
			if reported.contains(&dto.number())
			{
				continue;
			}
			reported.push(dto.number());
			let message = format!(
				"No 'end' element for {} number {}. {} ignored.",
				self.name,
				dto.number(),
				self.title
			);
			linker.report(dto.location(), message);
		}
	}
}

/// Every builder of one analysis.
#[derive(Debug, Default)]
pub struct Builders
{
	pub ties: TiesBuilder,
	pub old_ties: OldTiesBuilder,
	pub slurs: SlursBuilder,
	pub beams: BeamsBuilder,
	pub old_beams: OldBeamsBuilder,
	pub tuplets: TupletsBuilder,
}

impl Builders
{
	pub fn clear_pending(&mut self, linker: &mut Linker)
	{
		self.ties.clear_pending_items(linker);
		self.old_ties.clear(linker);
		self.slurs.clear_pending_items(linker);
		self.beams.clear_pending_items(linker);
		self.old_beams.clear(linker);
		self.tuplets.clear_pending_items(linker);
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::model::{ImoKind, NoteRest, NoteType};
	use pretty_assertions::assert_eq;

	#[derive(Debug)]
	struct Marker
	{
		number: i32,
		phase: Phase,
		member: Handle,
		location: Location,
	}

	impl Descriptor for Marker
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
			self.member
		}

		fn location(&self) -> &Location
		{
			&self.location
		}
	}

	fn marker(number: i32, phase: Phase, member: Handle, line: usize) -> Marker
	{
		Marker {
			number,
			phase,
			member,
			location: Location {
				line_number: line,
				..Location::default()
			},
		}
	}

	fn rests(model: &mut Model, count: usize) -> Vec<Handle>
	{
		(0..count)
			.map(|i| {
				model.add(i as i64, ImoKind::Rest(NoteRest::new(NoteType::Eighth, 0)))
			})
			.collect()
	}

	#[test]
	fn interleaved_numbers_close_independently()
	{
		let mut model = Model::default();
		let mut ids = IdAssigner::default();
		let mut diagnostics = String::new();
		let mut linker = Linker {
			model: &mut model,
			ids: &mut ids,
			sink: &mut diagnostics,
		};
		let r = rests(linker.model, 4);
		let mut builder = RelationBuilder::new("slur", "Slur");
		assert!(builder
			.add_item_info(marker(1, Phase::Start, r[0], 0), &mut linker)
			.is_none());
		assert!(builder
			.add_item_info(marker(2, Phase::Start, r[1], 1), &mut linker)
			.is_none());
		let chain = builder
			.add_item_info(marker(1, Phase::Stop, r[2], 2), &mut linker)
			.unwrap();
		assert_eq!(chain.len(), 2);
		assert_eq!(chain[0].member, r[0]);
		assert_eq!(chain[1].member, r[2]);
		assert_eq!(builder.pending().len(), 1);
		builder.clear_pending_items(&mut linker);
		assert_eq!(
			diagnostics,
			"Line 1. No 'end' element for slur number 2. Slur ignored.\n"
		);
	}

	#[test]
	fn duplicate_starts_are_rejected()
	{
		let mut model = Model::default();
		let mut ids = IdAssigner::default();
		let mut diagnostics = String::new();
		let mut linker = Linker {
			model: &mut model,
			ids: &mut ids,
			sink: &mut diagnostics,
		};
		let r = rests(linker.model, 2);
		let mut builder = RelationBuilder::new("tie", "Tie");
		let _ = builder.add_item_info(marker(3, Phase::Start, r[0], 0), &mut linker);
		let _ = builder.add_item_info(marker(3, Phase::Start, r[0], 1), &mut linker);
		let _ = builder.add_item_info(marker(3, Phase::Start, r[1], 2), &mut linker);
		let _ = builder.add_item_info(marker(4, Phase::Stop, r[1], 3), &mut linker);
		assert_eq!(
			diagnostics,
			"Line 1. A tie with the same number is already defined for this \
			 element in line 0. This tie will be ignored.\n\
			 Line 2. This tie has the same number than that defined in line 0. \
			 This tie will be ignored.\n\
			 Line 3. No 'start/continue' elements for tie number 4. Tie \
			 ignored.\n"
		);
		assert_eq!(builder.pending().len(), 1);
	}

	#[test]
	fn flush_reports_each_number_once()
	{
		let mut model = Model::default();
		let mut ids = IdAssigner::default();
		let mut diagnostics = String::new();
		let mut linker = Linker {
			model: &mut model,
			ids: &mut ids,
			sink: &mut diagnostics,
		};
		let r = rests(linker.model, 3);
		let mut builder = RelationBuilder::new("beam", "Beam");
		let _ = builder.add_item_info(marker(1, Phase::Start, r[0], 0), &mut linker);
		let _ = builder.add_item_info(marker(1, Phase::Continue, r[1], 1), &mut linker);
		let _ = builder.add_item_info(marker(5, Phase::Start, r[2], 2), &mut linker);
		builder.clear_pending_items(&mut linker);
		assert_eq!(
			diagnostics,
			"Line 0. No 'end' element for beam number 1. Beam ignored.\n\
			 Line 2. No 'end' element for beam number 5. Beam ignored.\n"
		);
		assert!(builder.pending().is_empty());
	}
}
