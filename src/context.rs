//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The score context is the mutable state that one analysis carries from
//! element to element.

use crate::model::{ClefType, DisplayNumber, Handle, ImoId, KeyType};
use crate::model::{Placement, TimeUnits, YesNo};

use std::collections::{HashMap, HashSet};

/// Hands out object ids. Explicit ids are honored once; the counter always
/// stays at or above every id seen so that generated ids never collide.
/// Once it reaches `ImoId::MAX` the unused ids below it are handed out.
#[derive(Debug, Default)]
pub struct IdAssigner
{
	counter: Option<ImoId>,
	used: HashSet<ImoId>,
}

impl IdAssigner
{
	pub fn next_id(&mut self) -> ImoId
	{
		let id = match self.counter.map_or(Some(0), |x| x.checked_add(1))
		{
			Some(id) =>
			{
				self.counter = Some(id);
				id
			}
			// The counter is exhausted, so reuse the lowest free id.
			None => (0..).find(|x| !self.used.contains(x)).unwrap_or(0),
		};
		self.used.insert(id);
		id
	}

	/// Returns `Err` with a fresh id if `id` was already assigned.
	pub fn assign(&mut self, id: Option<ImoId>) -> Result<ImoId, ImoId>
	{
		match id
		{
			Some(id) if self.used.contains(&id) => Err(self.next_id()),
			Some(id) =>
			{
				self.counter = Some(self.counter.map_or(id, |x| x.max(id)));
				self.used.insert(id);
				Ok(id)
			}
			None => Ok(self.next_id()),
		}
	}
}

pub const DEFAULT_SCORE_VERSION: u32 = 106;

#[derive(Debug)]
pub struct ScoreContext
{
	pub ids: IdAssigner,
	score_version: u32,
	staff: usize,
	staves: usize,
	voice: i32,
	clefs: HashMap<usize, ClefType>,
	key: Option<KeyType>,
	time: Option<(u32, u32)>,
	instruments: usize,
	cursor: TimeUnits,
	measure_start: TimeUnits,
	measure_end: TimeUnits,
	last_note: Option<Handle>,
	tuplet_bracket: YesNo,
	tuplet_number: DisplayNumber,
	lyric_placements: HashMap<i64, Placement>,
}

impl Default for ScoreContext
{
	fn default() -> ScoreContext
	{
		ScoreContext {
			ids: IdAssigner::default(),
			score_version: DEFAULT_SCORE_VERSION,
			staff: 0,
			staves: 1,
			voice: 1,
			clefs: HashMap::new(),
			key: None,
			time: None,
			instruments: 0,
			cursor: 0.0,
			measure_start: 0.0,
			measure_end: 0.0,
			last_note: None,
			tuplet_bracket: YesNo::Default,
			tuplet_number: DisplayNumber::Actual,
			lyric_placements: HashMap::new(),
		}
	}
}

impl ScoreContext
{
	/// Resets the per-instrument state and returns the new instrument index.
	pub fn start_instrument(&mut self) -> usize
	{
		self.staff = 0;
		self.staves = 1;
		self.voice = 1;
		self.clefs.clear();
		self.key = None;
		self.time = None;
		self.cursor = 0.0;
		self.measure_start = 0.0;
		self.measure_end = 0.0;
		self.last_note = None;
		self.lyric_placements.clear();
		let index = self.instruments;
		self.instruments += 1;
		index
	}

	pub fn current_instrument(&self) -> Option<usize>
	{
		self.instruments.checked_sub(1)
	}

	pub fn score_version(&self) -> u32
	{
		self.score_version
	}

	pub fn set_score_version(&mut self, version: u32)
	{
		self.score_version = version;
	}

	pub fn staff(&self) -> usize
	{
		self.staff
	}

	pub fn set_staff(&mut self, staff: usize)
	{
		self.staff = staff;
	}

	pub fn staves(&self) -> usize
	{
		self.staves
	}

	pub fn set_staves(&mut self, staves: usize)
	{
		self.staves = staves;
	}

	pub fn voice(&self) -> i32
	{
		self.voice
	}

	pub fn set_voice(&mut self, voice: i32)
	{
		self.voice = voice;
	}

	pub fn clef(&self, staff: usize) -> Option<ClefType>
	{
		self.clefs.get(&staff).copied()
	}

	pub fn set_clef(&mut self, staff: usize, clef: ClefType)
	{
		self.clefs.insert(staff, clef);
	}

	pub fn key(&self, staff: usize) -> Option<KeyType>
	{
		self.key.filter(|_| staff < self.staves)
	}

	/// A key signature applies to every staff of the instrument.
	pub fn set_key(&mut self, key: KeyType)
	{
		self.key = Some(key);
	}

	pub fn time_signature(&self) -> Option<(u32, u32)>
	{
		self.time
	}

	pub fn set_time_signature(&mut self, top: u32, bottom: u32)
	{
		self.time = Some((top, bottom));
	}

	pub fn onset(&self) -> TimeUnits
	{
		self.cursor
	}

	pub fn advance(&mut self, duration: TimeUnits)
	{
		self.cursor += duration;
		if self.cursor > self.measure_end
		{
			self.measure_end = self.cursor;
		}
	}

	pub fn go_back(&mut self, duration: TimeUnits)
	{
		self.cursor = (self.cursor - duration).max(self.measure_start);
	}

	pub fn go_to_measure_start(&mut self)
	{
		self.cursor = self.measure_start;
	}

	pub fn go_to_measure_end(&mut self)
	{
		self.cursor = self.measure_end;
	}

	/// A barline closes the measure at the furthest time reached in it.
	pub fn end_measure(&mut self)
	{
		self.cursor = self.measure_end;
		self.measure_start = self.cursor;
	}

	pub fn last_note(&self) -> Option<Handle>
	{
		self.last_note
	}

	pub fn set_last_note(&mut self, note: Handle)
	{
		self.last_note = Some(note);
	}

	pub fn tuplet_defaults(&self) -> (YesNo, DisplayNumber)
	{
		(self.tuplet_bracket, self.tuplet_number)
	}

	pub fn set_tuplet_defaults(&mut self, bracket: YesNo, number: DisplayNumber)
	{
		self.tuplet_bracket = bracket;
		self.tuplet_number = number;
	}

	pub fn lyric_placement(&self, line: i64) -> Placement
	{
		self.lyric_placements
			.get(&line)
			.copied()
			.unwrap_or(Placement::Below)
	}

	pub fn set_lyric_placement(&mut self, line: i64, placement: Placement)
	{
		self.lyric_placements.insert(line, placement);
	}
}
