//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The model is an arena of typed objects addressed by handles. Tree objects
//! have at most one parent; relation objects have none and list their members
//! instead, while every member lists the relations it belongs to.

use crate::registry::ElementKind;

use serde::Deserialize;

pub type ImoId = i64;

/// Durations are measured in time units; a quarter note is 64.
pub type TimeUnits = f64;

pub const TIME_UNITS_PER_QUARTER: TimeUnits = 64.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(usize);

impl Handle
{
	pub fn index(self) -> usize
	{
		self.0
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color
{
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: u8,
}

impl Color
{
	/// Reads `#rrggbb` or `#rrggbbaa`.
	pub fn parse(value: &str) -> Option<Color>
	{
		let hex = value.strip_prefix('#')?;
		if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii()
		{
			return None;
		}
		let component = |i: usize| u8::from_str_radix(&hex[i..(i + 2)], 16).ok();
		let a = if hex.len() == 8 { component(6)? } else { 255 };
		Some(Color {
			r: component(0)?,
			g: component(2)?,
			b: component(4)?,
			a,
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreObj
{
	pub staff: usize,
	pub visible: bool,
	pub color: Option<Color>,
	pub dx: f32,
	pub dy: f32,
}

impl Default for ScoreObj
{
	fn default() -> ScoreObj
	{
		ScoreObj {
			staff: 0,
			visible: true,
			color: None,
			dx: 0.0,
			dy: 0.0,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ClefType
{
	#[serde(rename = "G", alias = "trebble")]
	G2,
	#[serde(alias = "F", alias = "bass")]
	F4,
	F3,
	F5,
	C1,
	C2,
	C3,
	C4,
	C5,
	G1,
	#[serde(rename = "percussion")]
	Percussion,
	#[serde(rename = "8_G")]
	G2OctaveUp,
	#[serde(rename = "G_8")]
	G2OctaveDown,
	#[serde(rename = "8_F4")]
	F4OctaveUp,
	#[serde(rename = "F4_8")]
	F4OctaveDown,
	#[serde(rename = "15_G")]
	G2TwoOctavesUp,
	#[serde(rename = "G_15")]
	G2TwoOctavesDown,
	#[serde(rename = "15_F4")]
	F4TwoOctavesUp,
	#[serde(rename = "F4_15")]
	F4TwoOctavesDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum KeyType
{
	C,
	G,
	D,
	A,
	E,
	B,
	#[serde(rename = "F+")]
	FSharp,
	#[serde(rename = "C+")]
	CSharp,
	#[serde(rename = "C-")]
	CFlat,
	#[serde(rename = "G-")]
	GFlat,
	#[serde(rename = "D-")]
	DFlat,
	#[serde(rename = "A-")]
	AFlat,
	#[serde(rename = "E-")]
	EFlat,
	#[serde(rename = "B-")]
	BFlat,
	F,
	#[serde(rename = "a")]
	AMinor,
	#[serde(rename = "e")]
	EMinor,
	#[serde(rename = "b")]
	BMinor,
	#[serde(rename = "f+")]
	FSharpMinor,
	#[serde(rename = "c+")]
	CSharpMinor,
	#[serde(rename = "g+")]
	GSharpMinor,
	#[serde(rename = "d+")]
	DSharpMinor,
	#[serde(rename = "a+")]
	ASharpMinor,
	#[serde(rename = "a-")]
	AFlatMinor,
	#[serde(rename = "e-")]
	EFlatMinor,
	#[serde(rename = "b-")]
	BFlatMinor,
	#[serde(rename = "f")]
	FMinor,
	#[serde(rename = "c")]
	CMinor,
	#[serde(rename = "g")]
	GMinor,
	#[serde(rename = "d")]
	DMinor,
}

impl KeyType
{
	/// Positive for sharps, negative for flats.
	pub fn fifths(self) -> i8
	{
		match self
		{
			KeyType::C | KeyType::AMinor => 0,
			KeyType::G | KeyType::EMinor => 1,
			KeyType::D | KeyType::BMinor => 2,
			KeyType::A | KeyType::FSharpMinor => 3,
			KeyType::E | KeyType::CSharpMinor => 4,
			KeyType::B | KeyType::GSharpMinor => 5,
			KeyType::FSharp | KeyType::DSharpMinor => 6,
			KeyType::CSharp | KeyType::ASharpMinor => 7,
			KeyType::F | KeyType::DMinor => -1,
			KeyType::BFlat | KeyType::GMinor => -2,
			KeyType::EFlat | KeyType::CMinor => -3,
			KeyType::AFlat | KeyType::FMinor => -4,
			KeyType::DFlat | KeyType::BFlatMinor => -5,
			KeyType::GFlat | KeyType::EFlatMinor => -6,
			KeyType::CFlat | KeyType::AFlatMinor => -7,
		}
	}

	pub fn is_major(self) -> bool
	{
		matches!(
			self,
			KeyType::C
				| KeyType::G | KeyType::D
				| KeyType::A | KeyType::E
				| KeyType::B | KeyType::FSharp
				| KeyType::CSharp
				| KeyType::CFlat
				| KeyType::GFlat
				| KeyType::DFlat
				| KeyType::AFlat
				| KeyType::EFlat
				| KeyType::BFlat
				| KeyType::F
		)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BarlineType
{
	Simple,
	Double,
	Start,
	End,
	EndRepetition,
	StartRepetition,
	DoubleRepetition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeType
{
	Normal,
	Common,
	Cut,
	SingleNumber,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolSize
{
	Cue,
	#[default]
	Full,
	Large,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemDirection
{
	#[default]
	Default,
	Up,
	Down,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement
{
	#[default]
	Default,
	Above,
	Below,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign
{
	Left,
	#[default]
	Center,
	Right,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum YesNo
{
	#[default]
	Default,
	Yes,
	No,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayNumber
{
	#[default]
	Actual,
	Both,
	None,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FermataSymbol
{
	#[default]
	Normal,
	Short,
	Long,
	VeryShort,
	VeryLong,
	HenzeShort,
	HenzeLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoteType
{
	Longa,
	Breve,
	Whole,
	Half,
	Quarter,
	Eighth,
	N16th,
	N32nd,
	N64th,
	N128th,
	N256th,
}

impl NoteType
{
	pub fn from_letter(letter: char) -> Option<NoteType>
	{
		match letter
		{
			'l' => Some(NoteType::Longa),
			'b' => Some(NoteType::Breve),
			'w' => Some(NoteType::Whole),
			'h' => Some(NoteType::Half),
			'q' => Some(NoteType::Quarter),
			'e' => Some(NoteType::Eighth),
			's' => Some(NoteType::N16th),
			't' => Some(NoteType::N32nd),
			'i' => Some(NoteType::N64th),
			'o' => Some(NoteType::N128th),
			'f' => Some(NoteType::N256th),
			_ => None,
		}
	}

	pub fn letter(self) -> char
	{
		match self
		{
			NoteType::Longa => 'l',
			NoteType::Breve => 'b',
			NoteType::Whole => 'w',
			NoteType::Half => 'h',
			NoteType::Quarter => 'q',
			NoteType::Eighth => 'e',
			NoteType::N16th => 's',
			NoteType::N32nd => 't',
			NoteType::N64th => 'i',
			NoteType::N128th => 'o',
			NoteType::N256th => 'f',
		}
	}

	/// The duration of an undotted note of this type.
	pub fn duration(self) -> TimeUnits
	{
		match self
		{
			NoteType::Longa => 1024.0,
			NoteType::Breve => 512.0,
			NoteType::Whole => 256.0,
			NoteType::Half => 128.0,
			NoteType::Quarter => 64.0,
			NoteType::Eighth => 32.0,
			NoteType::N16th => 16.0,
			NoteType::N32nd => 8.0,
			NoteType::N64th => 4.0,
			NoteType::N128th => 2.0,
			NoteType::N256th => 1.0,
		}
	}

	/// Beaming depth: eighths are level 0, 256ths level 5.
	pub fn beam_level(self) -> Option<usize>
	{
		match self
		{
			NoteType::Eighth => Some(0),
			NoteType::N16th => Some(1),
			NoteType::N32nd => Some(2),
			NoteType::N64th => Some(3),
			NoteType::N128th => Some(4),
			NoteType::N256th => Some(5),
			_ => None,
		}
	}
}

pub fn to_duration(note_type: NoteType, dots: u8) -> TimeUnits
{
	let mut duration = note_type.duration();
	let mut extra = duration;
	for _ in 0..dots
	{
		extra /= 2.0;
		duration += extra;
	}
	duration
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step
{
	C,
	D,
	E,
	F,
	G,
	A,
	B,
}

impl Step
{
	pub fn from_letter(letter: char) -> Option<Step>
	{
		match letter
		{
			'c' => Some(Step::C),
			'd' => Some(Step::D),
			'e' => Some(Step::E),
			'f' => Some(Step::F),
			'g' => Some(Step::G),
			'a' => Some(Step::A),
			'b' => Some(Step::B),
			_ => None,
		}
	}
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Accidentals
{
	#[default]
	None,
	Sharp,
	Flat,
	Natural,
	DoubleSharp,
	SharpSharp,
	FlatFlat,
	NaturalFlat,
	NaturalSharp,
}

impl Accidentals
{
	pub fn from_prefix(prefix: &str) -> Option<Accidentals>
	{
		match prefix
		{
			"" => Some(Accidentals::None),
			"+" => Some(Accidentals::Sharp),
			"-" => Some(Accidentals::Flat),
			"=" => Some(Accidentals::Natural),
			"x" => Some(Accidentals::DoubleSharp),
			"++" => Some(Accidentals::SharpSharp),
			"--" => Some(Accidentals::FlatFlat),
			"=-" => Some(Accidentals::NaturalFlat),
			"=+" => Some(Accidentals::NaturalSharp),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch
{
	pub step: Step,
	pub octave: u8,
	pub accidentals: Accidentals,
}

impl Pitch
{
	/// Reads LDP pitch names such as `c4`, `+f5` or `=-b3`.
	pub fn parse(value: &str) -> Option<Pitch>
	{
		let mut chars: Vec<char> = value.chars().collect();
		let octave = chars.pop()?.to_digit(10)?;
		let step = Step::from_letter(chars.pop()?)?;
		let prefix: String = chars.into_iter().collect();
		let accidentals = Accidentals::from_prefix(&prefix)?;
		Some(Pitch {
			step,
			octave: octave as u8,
			accidentals,
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeModification
{
	pub normal: u32,
	pub actual: u32,
}

impl TimeModification
{
	/// The modification of a note inside both tuplets. Counts saturate
	/// rather than wrap when nested tuplets are absurdly large.
	pub fn combined_with(self, other: TimeModification) -> TimeModification
	{
		TimeModification {
			normal: self.normal.saturating_mul(other.normal),
			actual: self.actual.saturating_mul(other.actual),
		}
	}

	pub fn ratio(self) -> TimeUnits
	{
		if self.actual == 0 || self.normal == 0
		{
			1.0
		}
		else
		{
			(self.normal as TimeUnits) / (self.actual as TimeUnits)
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteRest
{
	pub note_type: NoteType,
	pub dots: u8,
	pub voice: i32,
	pub onset: TimeUnits,
	pub time_modification: Option<TimeModification>,
	pub is_time_modification_explicit: bool,
	pub so: ScoreObj,
}

impl NoteRest
{
	pub fn new(note_type: NoteType, dots: u8) -> NoteRest
	{
		NoteRest {
			note_type,
			dots,
			voice: 1,
			onset: 0.0,
			time_modification: None,
			is_time_modification_explicit: false,
			so: ScoreObj::default(),
		}
	}

	pub fn duration(&self) -> TimeUnits
	{
		let ratio = self.time_modification.map(|x| x.ratio()).unwrap_or(1.0);
		to_duration(self.note_type, self.dots) * ratio
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note
{
	pub nr: NoteRest,
	pub pitch: Option<Pitch>,
	pub stem: StemDirection,
	pub tie_next: Option<Handle>,
	pub tie_prev: Option<Handle>,
	pub chord: Option<Handle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bezier
{
	pub start: (f32, f32),
	pub end: (f32, f32),
	pub ctrol1: (f32, f32),
	pub ctrol2: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeamType
{
	None,
	Begin,
	Continue,
	End,
	Forward,
	Backward,
}

pub const MAX_BEAM_LEVELS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub enum RelationData
{
	Tie
	{
		is_start: bool,
		bezier: Option<Bezier>,
	},
	Slur
	{
		is_start: bool,
		bezier: Option<Bezier>,
	},
	Beam
	{
		types: [BeamType; MAX_BEAM_LEVELS],
	},
	Tuplet,
	Chord,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Relation
{
	pub members: Vec<(Handle, RelationData)>,
}

impl Relation
{
	pub fn first(&self) -> Option<Handle>
	{
		self.members.first().map(|(member, _)| *member)
	}

	pub fn last(&self) -> Option<Handle>
	{
		self.members.last().map(|(member, _)| *member)
	}

	pub fn contains(&self, handle: Handle) -> bool
	{
		self.members.iter().any(|(member, _)| *member == handle)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tie
{
	pub number: i32,
	pub color: Option<Color>,
	pub relation: Relation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slur
{
	pub number: i32,
	pub color: Option<Color>,
	pub relation: Relation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tuplet
{
	pub actual: u32,
	pub normal: u32,
	pub show_bracket: YesNo,
	pub show_number: DisplayNumber,
	pub relation: Relation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue
{
	Bool(bool),
	Long(i64),
	Float(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimeShift
{
	ToStart,
	ToEnd,
	By(TimeUnits),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetronomeMark
{
	Value
	{
		ticks_per_minute: i64,
	},
	NoteValue
	{
		note_type: NoteType,
		dots: u8,
		ticks_per_minute: i64,
	},
	NoteNote
	{
		left: (NoteType, u8),
		right: (NoteType, u8),
	},
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImoKind
{
	Document
	{
		version: String,
		language: Option<String>,
	},
	Content,
	Paragraph,
	Heading
	{
		level: i64,
	},
	TextItem
	{
		text: String,
	},
	Score
	{
		version: String,
		language: Option<String>,
	},
	Title
	{
		text: String,
		alignment: HAlign,
		so: ScoreObj,
	},
	ScoreOption
	{
		name: String,
		value: OptionValue,
	},
	Instrument
	{
		name: Option<String>,
		abbrev: Option<String>,
		staves: usize,
	},
	MusicData,
	Note(Note),
	Rest(NoteRest),
	Clef
	{
		clef_type: ClefType,
		symbol_size: SymbolSize,
		so: ScoreObj,
	},
	KeySignature
	{
		key_type: KeyType,
		so: ScoreObj,
	},
	TimeSignature
	{
		time_type: TimeType,
		top: u32,
		bottom: u32,
		so: ScoreObj,
	},
	Barline
	{
		barline_type: BarlineType,
		is_middle: bool,
		num_repeats: u32,
		so: ScoreObj,
	},
	GoBackFwd
	{
		is_forward: bool,
		shift: TimeShift,
	},
	Spacer
	{
		width: f32,
		so: ScoreObj,
	},
	SystemBreak,
	Metronome
	{
		mark: MetronomeMark,
		has_parenthesis: bool,
		so: ScoreObj,
	},
	Articulation
	{
		articulation: ElementKind,
		placement: Placement,
		so: ScoreObj,
	},
	Fermata
	{
		symbol: FermataSymbol,
		placement: Placement,
		so: ScoreObj,
	},
	Dynamics
	{
		mark: String,
		placement: Placement,
		so: ScoreObj,
	},
	ScoreText
	{
		text: String,
		so: ScoreObj,
	},
	Lyric
	{
		number: i64,
		syllables: Vec<String>,
		has_hyphen: bool,
		has_melisma: bool,
		placement: Placement,
		so: ScoreObj,
	},
	Chord(Relation),
	Tie(Tie),
	Slur(Slur),
	Beam(Relation),
	Tuplet(Tuplet),
}

impl ImoKind
{
	pub fn name(&self) -> &'static str
	{
		match self
		{
			ImoKind::Document { .. } => "document",
			ImoKind::Content => "content",
			ImoKind::Paragraph => "paragraph",
			ImoKind::Heading { .. } => "heading",
			ImoKind::TextItem { .. } => "text-item",
			ImoKind::Score { .. } => "score",
			ImoKind::Title { .. } => "title",
			ImoKind::ScoreOption { .. } => "option",
			ImoKind::Instrument { .. } => "instrument",
			ImoKind::MusicData => "music-data",
			ImoKind::Note(_) => "note",
			ImoKind::Rest(_) => "rest",
			ImoKind::Clef { .. } => "clef",
			ImoKind::KeySignature { .. } => "key-signature",
			ImoKind::TimeSignature { .. } => "time-signature",
			ImoKind::Barline { .. } => "barline",
			ImoKind::GoBackFwd { .. } => "go-back-fwd",
			ImoKind::Spacer { .. } => "spacer",
			ImoKind::SystemBreak => "system-break",
			ImoKind::Metronome { .. } => "metronome",
			ImoKind::Articulation { .. } => "articulation",
			ImoKind::Fermata { .. } => "fermata",
			ImoKind::Dynamics { .. } => "dynamics",
			ImoKind::ScoreText { .. } => "score-text",
			ImoKind::Lyric { .. } => "lyric",
			ImoKind::Chord(_) => "chord",
			ImoKind::Tie(_) => "tie",
			ImoKind::Slur(_) => "slur",
			ImoKind::Beam(_) => "beam",
			ImoKind::Tuplet(_) => "tuplet",
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Imo
{
	pub id: ImoId,
	pub kind: ImoKind,
	pub parent: Option<Handle>,
	pub children: Vec<Handle>,
	pub relations: Vec<Handle>,
}

#[derive(Debug, Default, Clone)]
pub struct Model
{
	objects: Vec<Imo>,
	root: Option<Handle>,
}

impl Model
{
	pub fn add(&mut self, id: ImoId, kind: ImoKind) -> Handle
	{
		let handle = Handle(self.objects.len());
		self.objects.push(Imo {
			id,
			kind,
			parent: None,
			children: Vec::new(),
			relations: Vec::new(),
		});
		handle
	}

	pub fn len(&self) -> usize
	{
		self.objects.len()
	}

	pub fn is_empty(&self) -> bool
	{
		self.objects.is_empty()
	}

	pub fn root(&self) -> Option<Handle>
	{
		self.root
	}

	pub fn set_root(&mut self, root: Handle)
	{
		self.root = Some(root);
	}

	pub fn get(&self, handle: Handle) -> &Imo
	{
		&self.objects[handle.0]
	}

	pub fn get_mut(&mut self, handle: Handle) -> &mut Imo
	{
		&mut self.objects[handle.0]
	}

	pub fn kind(&self, handle: Handle) -> &ImoKind
	{
		&self.get(handle).kind
	}

	pub fn id(&self, handle: Handle) -> ImoId
	{
		self.get(handle).id
	}

	pub fn parent(&self, handle: Handle) -> Option<Handle>
	{
		self.get(handle).parent
	}

	pub fn children(&self, handle: Handle) -> &[Handle]
	{
		&self.get(handle).children
	}

	pub fn relations_of(&self, handle: Handle) -> &[Handle]
	{
		&self.get(handle).relations
	}

	pub fn handles(&self) -> impl Iterator<Item = Handle>
	{
		(0..self.objects.len()).map(Handle)
	}

	pub fn find(&self, id: ImoId) -> Option<Handle>
	{
		self.handles().find(|handle| self.id(*handle) == id)
	}

	/// Moves `child` under `parent`, detaching it from any previous parent.
	pub fn append_child(&mut self, parent: Handle, child: Handle)
	{
		if let Some(previous) = self.get(child).parent
		{
			self.get_mut(previous).children.retain(|x| *x != child);
		}
		self.get_mut(child).parent = Some(parent);
		self.get_mut(parent).children.push(child);
	}

	/// All objects below `handle`, in document order.
	pub fn descendants(&self, handle: Handle) -> Vec<Handle>
	{
		let mut found = Vec::new();
		let mut stack: Vec<Handle> =
			self.children(handle).iter().rev().copied().collect();
		while let Some(current) = stack.pop()
		{
			found.push(current);
			stack.extend(self.children(current).iter().rev().copied());
		}
		found
	}

	pub fn notes(&self) -> Vec<Handle>
	{
		self.handles()
			.filter(|handle| self.note(*handle).is_some())
			.collect()
	}

	pub fn find_all(&self, name: &str) -> Vec<Handle>
	{
		self.handles()
			.filter(|handle| self.kind(*handle).name() == name)
			.collect()
	}

	pub fn note(&self, handle: Handle) -> Option<&Note>
	{
		match self.kind(handle)
		{
			ImoKind::Note(note) => Some(note),
			_ => None,
		}
	}

	pub fn note_mut(&mut self, handle: Handle) -> Option<&mut Note>
	{
		match &mut self.get_mut(handle).kind
		{
			ImoKind::Note(note) => Some(note),
			_ => None,
		}
	}

	pub fn note_rest(&self, handle: Handle) -> Option<&NoteRest>
	{
		match self.kind(handle)
		{
			ImoKind::Note(note) => Some(&note.nr),
			ImoKind::Rest(rest) => Some(rest),
			_ => None,
		}
	}

	pub fn note_rest_mut(&mut self, handle: Handle) -> Option<&mut NoteRest>
	{
		match &mut self.get_mut(handle).kind
		{
			ImoKind::Note(note) => Some(&mut note.nr),
			ImoKind::Rest(rest) => Some(rest),
			_ => None,
		}
	}

	pub fn score_obj_mut(&mut self, handle: Handle) -> Option<&mut ScoreObj>
	{
		match &mut self.get_mut(handle).kind
		{
			ImoKind::Note(note) => Some(&mut note.nr.so),
			ImoKind::Rest(rest) => Some(&mut rest.so),
			ImoKind::Title { so, .. }
			| ImoKind::Clef { so, .. }
			| ImoKind::KeySignature { so, .. }
			| ImoKind::TimeSignature { so, .. }
			| ImoKind::Barline { so, .. }
			| ImoKind::Spacer { so, .. }
			| ImoKind::Metronome { so, .. }
			| ImoKind::Articulation { so, .. }
			| ImoKind::Fermata { so, .. }
			| ImoKind::Dynamics { so, .. }
			| ImoKind::ScoreText { so, .. }
			| ImoKind::Lyric { so, .. } => Some(so),
			_ => None,
		}
	}

	pub fn score_obj(&self, handle: Handle) -> Option<&ScoreObj>
	{
		match self.kind(handle)
		{
			ImoKind::Note(note) => Some(&note.nr.so),
			ImoKind::Rest(rest) => Some(&rest.so),
			ImoKind::Title { so, .. }
			| ImoKind::Clef { so, .. }
			| ImoKind::KeySignature { so, .. }
			| ImoKind::TimeSignature { so, .. }
			| ImoKind::Barline { so, .. }
			| ImoKind::Spacer { so, .. }
			| ImoKind::Metronome { so, .. }
			| ImoKind::Articulation { so, .. }
			| ImoKind::Fermata { so, .. }
			| ImoKind::Dynamics { so, .. }
			| ImoKind::ScoreText { so, .. }
			| ImoKind::Lyric { so, .. } => Some(so),
			_ => None,
		}
	}

	pub fn relation(&self, handle: Handle) -> Option<&Relation>
	{
		match self.kind(handle)
		{
			ImoKind::Chord(relation) | ImoKind::Beam(relation) => Some(relation),
			ImoKind::Tie(tie) => Some(&tie.relation),
			ImoKind::Slur(slur) => Some(&slur.relation),
			ImoKind::Tuplet(tuplet) => Some(&tuplet.relation),
			_ => None,
		}
	}

	pub fn relation_mut(&mut self, handle: Handle) -> Option<&mut Relation>
	{
		match &mut self.get_mut(handle).kind
		{
			ImoKind::Chord(relation) | ImoKind::Beam(relation) => Some(relation),
			ImoKind::Tie(tie) => Some(&mut tie.relation),
			ImoKind::Slur(slur) => Some(&mut slur.relation),
			ImoKind::Tuplet(tuplet) => Some(&mut tuplet.relation),
			_ => None,
		}
	}

	/// Adds `member` to `relation` and records the membership on both sides.
	pub fn include_in_relation(
		&mut self,
		relation: Handle,
		member: Handle,
		data: RelationData,
	)
	{
		if let Some(target) = self.relation_mut(relation)
		{
			target.members.push((member, data));
			self.get_mut(member).relations.push(relation);
		}
	}

	/// The first relation of the given kind name that `member` belongs to.
	pub fn find_relation(&self, member: Handle, name: &str) -> Option<Handle>
	{
		self.relations_of(member)
			.iter()
			.copied()
			.find(|relation| self.kind(*relation).name() == name)
	}

	pub fn beam_types(&self, member: Handle) -> Option<[BeamType; MAX_BEAM_LEVELS]>
	{
		let beam = self.find_relation(member, "beam")?;
		let relation = self.relation(beam)?;
		relation.members.iter().find_map(|(x, data)| match data
		{
			RelationData::Beam { types } if *x == member => Some(*types),
			_ => None,
		})
	}

	pub fn score_option(&self, score: Handle, name: &str) -> Option<&OptionValue>
	{
		self.children(score).iter().find_map(|child| match self.kind(*child)
		{
			ImoKind::ScoreOption {
				name: option_name,
				value,
			} if option_name == name => Some(value),
			_ => None,
		})
	}

	/// Writes the object tree as indented text, one object per line.
	pub fn dump(&self) -> String
	{
		let mut buffer = String::new();
		if let Some(root) = self.root
		{
			self.dump_into(root, 0, &mut buffer);
		}
		buffer
	}

	fn dump_into(&self, handle: Handle, depth: usize, buffer: &mut String)
	{
		let imo = self.get(handle);
		buffer.push_str(&"    ".repeat(depth));
		buffer.push_str(&format!("{}#{}", imo.kind.name(), imo.id));
		match &imo.kind
		{
			ImoKind::Note(note) =>
			{
				match &note.pitch
				{
					Some(pitch) => buffer.push_str(&format!(
						" {:?}{} {:?}",
						pitch.step, pitch.octave, pitch.accidentals
					)),
					None => buffer.push_str(" unpitched"),
				}
				buffer.push_str(&format!(
					" {}{} @{}",
					note.nr.note_type.letter(),
					".".repeat(note.nr.dots as usize),
					note.nr.onset
				));
			}
			ImoKind::Rest(rest) =>
			{
				buffer.push_str(&format!(
					" {}{} @{}",
					rest.note_type.letter(),
					".".repeat(rest.dots as usize),
					rest.onset
				));
			}
			ImoKind::Score { version, .. } =>
			{
				buffer.push_str(&format!(" {}", version));
			}
			ImoKind::Clef { clef_type, .. } =>
			{
				buffer.push_str(&format!(" {:?}", clef_type));
			}
			ImoKind::KeySignature { key_type, .. } =>
			{
				buffer.push_str(&format!(" {:?}", key_type));
			}
			ImoKind::TimeSignature { top, bottom, .. } =>
			{
				buffer.push_str(&format!(" {}/{}", top, bottom));
			}
			ImoKind::ScoreOption { name, value } =>
			{
				buffer.push_str(&format!(" {} = {:?}", name, value));
			}
			_ => (),
		}
		let relations: Vec<String> = imo
			.relations
			.iter()
			.map(|x| format!("{}#{}", self.kind(*x).name(), self.id(*x)))
			.collect();
		if !relations.is_empty()
		{
			buffer.push_str(&format!(" [{}]", relations.join(", ")));
		}
		buffer.push('\n');
		for child in &imo.children
		{
			self.dump_into(*child, depth + 1, buffer);
		}
	}
}
