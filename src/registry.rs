//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The registry maps every LDP element name to its grammar descriptor and to
//! the function that analyses it. It is immutable static data.

use crate::analyzer::{attachments, document, noterest, options};
use crate::analyzer::{relations, staffobjs, Analysed, Analyzer};
use crate::model::Handle;
use crate::tree::Node;

use enumset::{enum_set, EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Hash, Serialize, Deserialize, EnumSetType)]
pub enum ElementKind
{
	#[serde(rename = "label")]
	Label,
	#[serde(rename = "number")]
	Number,
	#[serde(rename = "string")]
	String,

	#[serde(rename = "lenmusdoc")]
	Lenmusdoc,
	#[serde(rename = "vers")]
	Vers,
	#[serde(rename = "language")]
	Language,
	#[serde(rename = "content")]
	Content,
	#[serde(rename = "para")]
	Para,
	#[serde(rename = "heading")]
	Heading,
	#[serde(rename = "txt")]
	Txt,

	#[serde(rename = "score")]
	Score,
	#[serde(rename = "title")]
	Title,
	#[serde(rename = "opt")]
	Opt,
	#[serde(rename = "cursor")]
	Cursor,
	#[serde(rename = "instrument")]
	Instrument,
	#[serde(rename = "name")]
	Name,
	#[serde(rename = "abbrev")]
	Abbrev,
	#[serde(rename = "staves")]
	Staves,
	#[serde(rename = "musicData")]
	MusicData,

	#[serde(rename = "n")]
	Note,
	#[serde(rename = "na")]
	ChordNote,
	#[serde(rename = "r")]
	Rest,
	#[serde(rename = "chord")]
	Chord,
	#[serde(rename = "clef")]
	Clef,
	#[serde(rename = "key")]
	Key,
	#[serde(rename = "time")]
	Time,
	#[serde(rename = "barline")]
	Barline,
	#[serde(rename = "goBack")]
	GoBack,
	#[serde(rename = "goFwd")]
	GoFwd,
	#[serde(rename = "spacer")]
	Spacer,
	#[serde(rename = "newSystem")]
	NewSystem,
	#[serde(rename = "metronome")]
	Metronome,

	#[serde(rename = "tie")]
	Tie,
	#[serde(rename = "slur")]
	Slur,
	#[serde(rename = "beam")]
	Beam,
	#[serde(rename = "t")]
	Tuplet,
	#[serde(rename = "tm")]
	TimeModification,
	#[serde(rename = "stem")]
	Stem,
	#[serde(rename = "voice")]
	Voice,
	#[serde(rename = "staffNum")]
	StaffNum,
	#[serde(rename = "visible")]
	Visible,
	#[serde(rename = "color")]
	Color,
	#[serde(rename = "dx")]
	Dx,
	#[serde(rename = "dy")]
	Dy,
	#[serde(rename = "symbolSize")]
	SymbolSize,
	#[serde(rename = "displayBracket")]
	DisplayBracket,
	#[serde(rename = "displayNumber")]
	DisplayNumber,
	#[serde(rename = "bezier")]
	Bezier,
	#[serde(rename = "start-x")]
	StartX,
	#[serde(rename = "start-y")]
	StartY,
	#[serde(rename = "end-x")]
	EndX,
	#[serde(rename = "end-y")]
	EndY,
	#[serde(rename = "ctrol1-x")]
	Ctrol1X,
	#[serde(rename = "ctrol1-y")]
	Ctrol1Y,
	#[serde(rename = "ctrol2-x")]
	Ctrol2X,
	#[serde(rename = "ctrol2-y")]
	Ctrol2Y,

	#[serde(rename = "fermata")]
	Fermata,
	#[serde(rename = "dyn")]
	Dynamics,
	#[serde(rename = "text")]
	Text,
	#[serde(rename = "lyric")]
	Lyric,
	#[serde(rename = "melisma")]
	Melisma,

	#[serde(rename = "accent")]
	Accent,
	#[serde(rename = "legato-duro")]
	LegatoDuro,
	#[serde(rename = "marccato")]
	Marccato,
	#[serde(rename = "marccato-legato")]
	MarccatoLegato,
	#[serde(rename = "marccato-staccato")]
	MarccatoStaccato,
	#[serde(rename = "marccato-staccatissimo")]
	MarccatoStaccatissimo,
	#[serde(rename = "mezzo-staccato")]
	MezzoStaccato,
	#[serde(rename = "mezzo-staccatissimo")]
	MezzoStaccatissimo,
	#[serde(rename = "staccato")]
	Staccato,
	#[serde(rename = "staccato-duro")]
	StaccatoDuro,
	#[serde(rename = "staccatissimo-duro")]
	StaccatissimoDuro,
	#[serde(rename = "staccatissimo")]
	Staccatissimo,
	#[serde(rename = "tenuto")]
	Tenuto,
	#[serde(rename = "stress")]
	Stress,
	#[serde(rename = "unstress")]
	Unstress,
}

impl ElementKind
{
	pub fn from_name(name: &str) -> Option<ElementKind>
	{
		serde_plain::from_str(name).ok()
	}
}

impl std::fmt::Display for ElementKind
{
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result
	{
		let name = serde_plain::to_string(self).map_err(|_| std::fmt::Error)?;
		write!(f, "{}", name)
	}
}

pub const ARTICULATIONS: EnumSet<ElementKind> = enum_set!(
	ElementKind::Accent
		| ElementKind::LegatoDuro
		| ElementKind::Marccato
		| ElementKind::MarccatoLegato
		| ElementKind::MarccatoStaccato
		| ElementKind::MarccatoStaccatissimo
		| ElementKind::MezzoStaccato
		| ElementKind::MezzoStaccatissimo
		| ElementKind::Staccato
		| ElementKind::StaccatoDuro
		| ElementKind::StaccatissimoDuro
		| ElementKind::Staccatissimo
		| ElementKind::Tenuto
		| ElementKind::Stress
		| ElementKind::Unstress
);

pub const ATTACHMENTS: EnumSet<ElementKind> = enum_set!(
	ElementKind::Fermata
		| ElementKind::Dynamics
		| ElementKind::Text
		| ElementKind::Accent
		| ElementKind::LegatoDuro
		| ElementKind::Marccato
		| ElementKind::MarccatoLegato
		| ElementKind::MarccatoStaccato
		| ElementKind::MarccatoStaccatissimo
		| ElementKind::MezzoStaccato
		| ElementKind::MezzoStaccatissimo
		| ElementKind::Staccato
		| ElementKind::StaccatoDuro
		| ElementKind::StaccatissimoDuro
		| ElementKind::Staccatissimo
		| ElementKind::Tenuto
		| ElementKind::Stress
		| ElementKind::Unstress
);

pub const MUSIC_DATA_CONTENT: EnumSet<ElementKind> = enum_set!(
	ElementKind::Note
		| ElementKind::ChordNote
		| ElementKind::Rest
		| ElementKind::Chord
		| ElementKind::Clef
		| ElementKind::Key
		| ElementKind::Time
		| ElementKind::Barline
		| ElementKind::GoBack
		| ElementKind::GoFwd
		| ElementKind::Spacer
		| ElementKind::NewSystem
		| ElementKind::Metronome
		| ElementKind::Text
);

pub const BLOCKS: EnumSet<ElementKind> = enum_set!(
	ElementKind::Score
		| ElementKind::Para
		| ElementKind::Heading
		| ElementKind::Txt
);

const PRINT_OPTIONS: EnumSet<ElementKind> = enum_set!(
	ElementKind::Visible
		| ElementKind::Color
		| ElementKind::Dx
		| ElementKind::Dy
);

const NOTE_OPTIONS: EnumSet<ElementKind> = enum_set!(
	ElementKind::Tie | ElementKind::Stem | ElementKind::Slur | ElementKind::Lyric
);

const NOTE_REST_OPTIONS: EnumSet<ElementKind> = enum_set!(
	ElementKind::Tuplet
		| ElementKind::TimeModification
		| ElementKind::Beam
		| ElementKind::Voice
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect
{
	Label,
	Number,
	String,
	Color,
	YesNo,
	Element(ElementKind),
	OneOf(EnumSet<ElementKind>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality
{
	One,
	ZeroOrOne,
	OneOrMore,
	ZeroOrMore,
}

/// One parameter position of an element. A repeated `OneOf` slot consumes
/// every remaining child, reporting those that are not among its
/// alternatives; a repeated `Element` slot stops at the first other child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot
{
	pub name: &'static str,
	pub expect: Expect,
	pub cardinality: Cardinality,
}

const fn slot(
	name: &'static str,
	expect: Expect,
	cardinality: Cardinality,
) -> Slot
{
	Slot {
		name,
		expect,
		cardinality,
	}
}

pub type Grammar = &'static [Slot];

pub type Analyser = fn(&mut Analyzer<'_>, &Node, Option<Handle>) -> Analysed;

pub struct Entry
{
	pub kind: ElementKind,
	pub grammar: Grammar,
	/// Property elements have no analyser of their own; their parent
	/// reads them in place.
	pub analyser: Option<Analyser>,
}

const fn analysed(
	kind: ElementKind,
	grammar: Grammar,
	analyser: Analyser,
) -> Entry
{
	Entry {
		kind,
		grammar,
		analyser: Some(analyser),
	}
}

const fn property(kind: ElementKind, grammar: Grammar) -> Entry
{
	Entry {
		kind,
		grammar,
		analyser: None,
	}
}

use Cardinality::*;
use Expect::Element;

pub const LENMUSDOC: Grammar = &[
	slot("vers", Element(ElementKind::Vers), One),
	slot("language", Element(ElementKind::Language), ZeroOrOne),
	slot("content", Element(ElementKind::Content), One),
];
pub const CONTENT: Grammar = &[slot("block", Expect::OneOf(BLOCKS), ZeroOrMore)];
const PARA: Grammar = &[slot(
	"text",
	Expect::OneOf(enum_set!(ElementKind::Txt | ElementKind::String)),
	ZeroOrMore,
)];
const HEADING: Grammar = &[
	slot("level", Expect::Number, One),
	slot(
		"text",
		Expect::OneOf(enum_set!(ElementKind::Txt | ElementKind::String)),
		ZeroOrMore,
	),
];
const SINGLE_STRING: Grammar = &[slot("text", Expect::String, One)];
const SINGLE_LABEL: Grammar = &[slot("value", Expect::Label, One)];
const SINGLE_NUMBER: Grammar = &[slot("number", Expect::Number, One)];
const YES_NO: Grammar = &[slot("value", Expect::YesNo, One)];
const NOTHING: Grammar = &[];

pub const SCORE: Grammar = &[
	slot("vers", Element(ElementKind::Vers), One),
	slot("language", Element(ElementKind::Language), ZeroOrOne),
	slot("title", Element(ElementKind::Title), ZeroOrMore),
	slot("cursor", Element(ElementKind::Cursor), ZeroOrOne),
	slot("opt", Element(ElementKind::Opt), ZeroOrMore),
	slot(
		"instrument",
		Expect::OneOf(enum_set!(ElementKind::Instrument)),
		OneOrMore,
	),
];
const TITLE: Grammar = &[
	slot("alignment", Expect::Label, ZeroOrOne),
	slot("text", Expect::String, One),
	slot("dx", Element(ElementKind::Dx), ZeroOrOne),
	slot("dy", Element(ElementKind::Dy), ZeroOrOne),
];
const OPT: Grammar = &[
	slot("name", Expect::Label, One),
	slot(
		"value",
		Expect::OneOf(enum_set!(
			ElementKind::Label | ElementKind::Number | ElementKind::String
		)),
		One,
	),
];
pub const INSTRUMENT: Grammar = &[
	slot("name", Element(ElementKind::Name), ZeroOrOne),
	slot("abbrev", Element(ElementKind::Abbrev), ZeroOrOne),
	slot("staves", Element(ElementKind::Staves), ZeroOrOne),
	slot("musicData", Element(ElementKind::MusicData), One),
];
pub const MUSIC_DATA: Grammar =
	&[slot("staffobj", Expect::OneOf(MUSIC_DATA_CONTENT), ZeroOrMore)];

const STAFFOBJ_ATTACHMENTS: Slot = slot(
	"attachments",
	Expect::OneOf(enum_set!(ElementKind::Text)),
	ZeroOrMore,
);
const STAFFOBJ_OPTIONS: [Slot; 3] = [
	slot("staff", Expect::Label, ZeroOrOne),
	slot("staffNum", Element(ElementKind::StaffNum), ZeroOrOne),
	slot("printOptions", Expect::OneOf(PRINT_OPTIONS), ZeroOrMore),
];
const NOTE: Grammar = &[
	slot("pitch", Expect::Label, One),
	slot("duration", Expect::Label, One),
	slot("abbreviation", Expect::Label, ZeroOrMore),
	slot("noteOptions", Expect::OneOf(NOTE_OPTIONS), ZeroOrMore),
	slot("noteRestOptions", Expect::OneOf(NOTE_REST_OPTIONS), ZeroOrMore),
	STAFFOBJ_OPTIONS[1],
	STAFFOBJ_OPTIONS[2],
	slot("attachments", Expect::OneOf(ATTACHMENTS), ZeroOrMore),
];
const REST: Grammar = &[
	slot("duration", Expect::Label, One),
	slot("abbreviation", Expect::Label, ZeroOrMore),
	slot("noteRestOptions", Expect::OneOf(NOTE_REST_OPTIONS), ZeroOrMore),
	STAFFOBJ_OPTIONS[1],
	STAFFOBJ_OPTIONS[2],
	slot("attachments", Expect::OneOf(ATTACHMENTS), ZeroOrMore),
];
pub const CHORD: Grammar =
	&[slot("note", Expect::OneOf(enum_set!(ElementKind::Note)), OneOrMore)];
const CLEF: Grammar = &[
	slot("type", Expect::Label, ZeroOrOne),
	slot("symbolSize", Element(ElementKind::SymbolSize), ZeroOrOne),
	STAFFOBJ_OPTIONS[0],
	STAFFOBJ_OPTIONS[1],
	STAFFOBJ_OPTIONS[2],
	STAFFOBJ_ATTACHMENTS,
];
const KEY: Grammar = &[
	slot("type", Expect::Label, ZeroOrOne),
	STAFFOBJ_OPTIONS[0],
	STAFFOBJ_OPTIONS[1],
	STAFFOBJ_OPTIONS[2],
	STAFFOBJ_ATTACHMENTS,
];
const TIME: Grammar = &[
	slot("type", Expect::Label, ZeroOrOne),
	slot("top", Expect::Number, One),
	slot("bottom", Expect::Number, One),
	STAFFOBJ_OPTIONS[0],
	STAFFOBJ_OPTIONS[1],
	STAFFOBJ_OPTIONS[2],
	STAFFOBJ_ATTACHMENTS,
];
const BARLINE: Grammar = &[
	slot("type", Expect::Label, ZeroOrOne),
	slot("middle", Expect::Label, ZeroOrOne),
	STAFFOBJ_OPTIONS[0],
	STAFFOBJ_OPTIONS[1],
	STAFFOBJ_OPTIONS[2],
	STAFFOBJ_ATTACHMENTS,
];
const GO_BACK_FWD: Grammar = &[slot(
	"shift",
	Expect::OneOf(enum_set!(ElementKind::Label | ElementKind::Number)),
	One,
)];
const SPACER: Grammar = &[
	slot("width", Expect::Number, One),
	STAFFOBJ_OPTIONS[0],
	STAFFOBJ_OPTIONS[1],
	STAFFOBJ_OPTIONS[2],
	slot("attachments", Expect::OneOf(ATTACHMENTS), ZeroOrMore),
];
const METRONOME: Grammar = &[
	slot("noteType", Expect::Label, ZeroOrOne),
	slot(
		"value",
		Expect::OneOf(enum_set!(ElementKind::Label | ElementKind::Number)),
		One,
	),
	slot("parenthesis", Expect::Label, ZeroOrOne),
	slot("printOptions", Expect::OneOf(PRINT_OPTIONS), ZeroOrMore),
];

const TIE: Grammar = &[
	slot("number", Expect::Number, One),
	slot("type", Expect::Label, One),
	slot("bezier", Element(ElementKind::Bezier), ZeroOrOne),
	slot("color", Element(ElementKind::Color), ZeroOrOne),
];
const BEAM: Grammar = &[
	slot("number", Expect::Number, One),
	slot("type", Expect::Label, One),
];
const TUPLET: Grammar = &[
	slot("number", Expect::Number, ZeroOrOne),
	slot("type", Expect::Label, One),
	slot("actual", Expect::Number, ZeroOrOne),
	slot("normal", Expect::Number, ZeroOrOne),
	slot(
		"tupletOptions",
		Expect::OneOf(enum_set!(
			ElementKind::Label
				| ElementKind::DisplayBracket
				| ElementKind::DisplayNumber
		)),
		ZeroOrMore,
	),
];
const TIME_MODIFICATION: Grammar = &[
	slot("top", Expect::Number, One),
	slot("bottom", Expect::Number, One),
];
const COLOR: Grammar = &[slot("value", Expect::Color, One)];
const BEZIER: Grammar = &[slot(
	"point",
	Expect::OneOf(enum_set!(
		ElementKind::StartX
			| ElementKind::StartY
			| ElementKind::EndX
			| ElementKind::EndY
			| ElementKind::Ctrol1X
			| ElementKind::Ctrol1Y
			| ElementKind::Ctrol2X
			| ElementKind::Ctrol2Y
	)),
	ZeroOrMore,
)];

const PLACED: Grammar = &[
	slot("placement", Expect::Label, ZeroOrOne),
	slot("printOptions", Expect::OneOf(PRINT_OPTIONS), ZeroOrMore),
];
const FERMATA: Grammar = &[
	slot("symbol", Expect::Label, ZeroOrOne),
	slot("placement", Expect::Label, ZeroOrOne),
	slot("printOptions", Expect::OneOf(PRINT_OPTIONS), ZeroOrMore),
];
const DYNAMICS: Grammar = &[
	slot("mark", Expect::String, One),
	slot("placement", Expect::Label, ZeroOrOne),
	slot("printOptions", Expect::OneOf(PRINT_OPTIONS), ZeroOrMore),
];
const TEXT: Grammar = &[
	slot("text", Expect::String, One),
	slot(
		"location",
		Expect::OneOf(enum_set!(ElementKind::Dx | ElementKind::Dy)),
		ZeroOrMore,
	),
];
const LYRIC: Grammar = &[
	slot("line", Expect::Number, ZeroOrOne),
	slot("syllable", Expect::String, OneOrMore),
	slot("hyphen", Expect::Label, ZeroOrOne),
	slot("melisma", Element(ElementKind::Melisma), ZeroOrOne),
	slot("placement", Expect::Label, ZeroOrOne),
	slot("printOptions", Expect::OneOf(PRINT_OPTIONS), ZeroOrMore),
];

static ENTRIES: &[Entry] = &[
	analysed(ElementKind::Lenmusdoc, LENMUSDOC, document::analyse_lenmusdoc),
	analysed(ElementKind::Vers, SINGLE_NUMBER, document::analyse_vers),
	analysed(ElementKind::Language, SINGLE_LABEL, document::analyse_language),
	analysed(ElementKind::Content, CONTENT, document::analyse_content),
	analysed(ElementKind::Para, PARA, document::analyse_para),
	analysed(ElementKind::Heading, HEADING, document::analyse_heading),
	analysed(ElementKind::Txt, SINGLE_STRING, document::analyse_txt),
	analysed(ElementKind::Score, SCORE, document::analyse_score),
	analysed(ElementKind::Title, TITLE, document::analyse_title),
	analysed(ElementKind::Opt, OPT, options::analyse_opt),
	analysed(ElementKind::Cursor, NOTHING, document::analyse_cursor),
	analysed(ElementKind::Instrument, INSTRUMENT, document::analyse_instrument),
	analysed(ElementKind::Name, SINGLE_STRING, document::analyse_name),
	analysed(ElementKind::Abbrev, SINGLE_STRING, document::analyse_name),
	analysed(ElementKind::Staves, SINGLE_NUMBER, document::analyse_staves),
	analysed(ElementKind::MusicData, MUSIC_DATA, document::analyse_music_data),
	analysed(ElementKind::Note, NOTE, noterest::analyse_note),
	analysed(ElementKind::ChordNote, NOTE, noterest::analyse_chord_note),
	analysed(ElementKind::Rest, REST, noterest::analyse_rest),
	analysed(ElementKind::Chord, CHORD, staffobjs::analyse_chord),
	analysed(ElementKind::Clef, CLEF, staffobjs::analyse_clef),
	analysed(ElementKind::Key, KEY, staffobjs::analyse_key),
	analysed(ElementKind::Time, TIME, staffobjs::analyse_time),
	analysed(ElementKind::Barline, BARLINE, staffobjs::analyse_barline),
	analysed(ElementKind::GoBack, GO_BACK_FWD, staffobjs::analyse_go_back_fwd),
	analysed(ElementKind::GoFwd, GO_BACK_FWD, staffobjs::analyse_go_back_fwd),
	analysed(ElementKind::Spacer, SPACER, staffobjs::analyse_spacer),
	analysed(ElementKind::NewSystem, NOTHING, staffobjs::analyse_new_system),
	analysed(ElementKind::Metronome, METRONOME, staffobjs::analyse_metronome),
	analysed(ElementKind::Tie, TIE, relations::analyse_tie),
	analysed(ElementKind::Slur, TIE, relations::analyse_slur),
	analysed(ElementKind::Beam, BEAM, relations::analyse_beam),
	analysed(ElementKind::Tuplet, TUPLET, relations::analyse_tuplet),
	analysed(
		ElementKind::TimeModification,
		TIME_MODIFICATION,
		relations::analyse_time_modification,
	),
	analysed(ElementKind::Color, COLOR, relations::analyse_color),
	analysed(ElementKind::Bezier, BEZIER, relations::analyse_bezier),
	property(ElementKind::Stem, SINGLE_LABEL),
	property(ElementKind::Voice, SINGLE_NUMBER),
	property(ElementKind::StaffNum, SINGLE_NUMBER),
	property(ElementKind::Visible, YES_NO),
	property(ElementKind::Dx, SINGLE_NUMBER),
	property(ElementKind::Dy, SINGLE_NUMBER),
	property(ElementKind::SymbolSize, SINGLE_LABEL),
	property(ElementKind::DisplayBracket, YES_NO),
	property(ElementKind::DisplayNumber, SINGLE_LABEL),
	property(ElementKind::StartX, SINGLE_NUMBER),
	property(ElementKind::StartY, SINGLE_NUMBER),
	property(ElementKind::EndX, SINGLE_NUMBER),
	property(ElementKind::EndY, SINGLE_NUMBER),
	property(ElementKind::Ctrol1X, SINGLE_NUMBER),
	property(ElementKind::Ctrol1Y, SINGLE_NUMBER),
	property(ElementKind::Ctrol2X, SINGLE_NUMBER),
	property(ElementKind::Ctrol2Y, SINGLE_NUMBER),
	property(ElementKind::Melisma, NOTHING),
	analysed(ElementKind::Fermata, FERMATA, attachments::analyse_fermata),
	analysed(ElementKind::Dynamics, DYNAMICS, attachments::analyse_dynamics),
	analysed(ElementKind::Text, TEXT, attachments::analyse_text),
	analysed(ElementKind::Lyric, LYRIC, attachments::analyse_lyric),
	analysed(ElementKind::Accent, PLACED, attachments::analyse_articulation),
	analysed(ElementKind::LegatoDuro, PLACED, attachments::analyse_articulation),
	analysed(ElementKind::Marccato, PLACED, attachments::analyse_articulation),
	analysed(
		ElementKind::MarccatoLegato,
		PLACED,
		attachments::analyse_articulation,
	),
	analysed(
		ElementKind::MarccatoStaccato,
		PLACED,
		attachments::analyse_articulation,
	),
	analysed(
		ElementKind::MarccatoStaccatissimo,
		PLACED,
		attachments::analyse_articulation,
	),
	analysed(
		ElementKind::MezzoStaccato,
		PLACED,
		attachments::analyse_articulation,
	),
	analysed(
		ElementKind::MezzoStaccatissimo,
		PLACED,
		attachments::analyse_articulation,
	),
	analysed(ElementKind::Staccato, PLACED, attachments::analyse_articulation),
	analysed(
		ElementKind::StaccatoDuro,
		PLACED,
		attachments::analyse_articulation,
	),
	analysed(
		ElementKind::StaccatissimoDuro,
		PLACED,
		attachments::analyse_articulation,
	),
	analysed(
		ElementKind::Staccatissimo,
		PLACED,
		attachments::analyse_articulation,
	),
	analysed(ElementKind::Tenuto, PLACED, attachments::analyse_articulation),
	analysed(ElementKind::Stress, PLACED, attachments::analyse_articulation),
	analysed(ElementKind::Unstress, PLACED, attachments::analyse_articulation),
];

/// The entry of an element kind. Leaves have none.
pub fn entry(kind: ElementKind) -> Option<&'static Entry>
{
	ENTRIES.iter().find(|entry| entry.kind == kind)
}

pub fn lookup(name: &str) -> Option<&'static Entry>
{
	ElementKind::from_name(name).and_then(entry)
}

pub fn entries() -> impl Iterator<Item = &'static Entry>
{
	ENTRIES.iter()
}

/// Renders a grammar descriptor as a one-line LDP production.
pub fn describe(entry: &Entry) -> String
{
	let mut buffer = format!("({}", entry.kind);
	for slot in entry.grammar
	{
		let inner = match slot.expect
		{
			Expect::Label => format!("{}:label", slot.name),
			Expect::Number => format!("{}:number", slot.name),
			Expect::String => format!("{}:string", slot.name),
			Expect::Color => format!("{}:#rrggbbaa", slot.name),
			Expect::YesNo => format!("{}:yes|no", slot.name),
			Expect::Element(kind) => format!("({})", kind),
			Expect::OneOf(kinds) =>
			{
				let names: Vec<String> =
					kinds.iter().map(|kind| kind.to_string()).collect();
				format!("{{{}}}", names.join("|"))
			}
		};
		let suffix = match slot.cardinality
		{
			Cardinality::One => "",
			Cardinality::ZeroOrOne => "?",
			Cardinality::OneOrMore => "+",
			Cardinality::ZeroOrMore => "*",
		};
		buffer.push_str(&format!(" {}{}", inner, suffix));
	}
	buffer.push(')');
	buffer
}
