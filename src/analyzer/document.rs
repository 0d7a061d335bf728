//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! Documents, scores and instruments: everything above the music data.

use crate::analyzer::{Analysed, Analyzer, Params};
use crate::context::DEFAULT_SCORE_VERSION;
use crate::model::{HAlign, Handle, ImoKind, ScoreObj};
use crate::registry::{ElementKind, BLOCKS, MUSIC_DATA_CONTENT};
use crate::tree::Node;

use enumset::enum_set;

const VALID_VERSIONS: [&str; 5] = ["1.5", "1.6", "1.7", "2.0", "2.1"];

/// Reads `major.minor` as `100 * major + minor`.
pub fn version_number(version: &str) -> Option<u32>
{
	if !VALID_VERSIONS.contains(&version)
	{
		return None;
	}
	let (major, minor) = version.split_once('.')?;
	let major: u32 = major.parse().ok()?;
	let minor: u32 = minor.parse().ok()?;
	Some(100 * major + minor)
}

pub fn version_string(version: u32) -> String
{
	format!("{}.{}", version / 100, version % 100)
}

fn first_value(node: &Node) -> String
{
	Params::value_of(node)
		.map(|x| x.value().to_string())
		.unwrap_or_default()
}

pub fn analyse_lenmusdoc(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let version = match analyzer.mandatory(&mut params, ElementKind::Vers)
	{
		Some(vers) => first_value(vers),
		None => return Analysed::Nothing,
	};
	let language = params
		.optional(ElementKind::Language)
		.map(first_value);
	let document = analyzer.add_to_model(
		node,
		anchor,
		ImoKind::Document { version, language },
	);
	if let Some(content) = analyzer.mandatory(&mut params, ElementKind::Content)
	{
		analyzer.analyse_node(content, Some(document));
	}
	analyzer.error_if_more_elements(&params);
	Analysed::Object(document)
}

/// Validates a score version and makes it the version of the score being
/// analysed.
pub fn analyse_vers(
	analyzer: &mut Analyzer,
	node: &Node,
	_anchor: Option<Handle>,
) -> Analysed
{
	let version = first_value(node);
	let number = match version_number(&version)
	{
		Some(number) => number,
		None =>
		{
			let message =
				format!("Invalid score version '{}'. Version 1.6 assumed.", version);
			analyzer.report(&node.location, message);
			DEFAULT_SCORE_VERSION
		}
	};
	analyzer.context.set_score_version(number);
	Analysed::Nothing
}

/// The language is read by the element that contains it.
pub fn analyse_language(
	_analyzer: &mut Analyzer,
	_node: &Node,
	_anchor: Option<Handle>,
) -> Analysed
{
	Analysed::Nothing
}

pub fn analyse_content(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let content = analyzer.add_to_model(node, anchor, ImoKind::Content);
	let mut params = Params::of(node);
	analyzer.analyse_one_or_more(&mut params, BLOCKS, Some(content));
	Analysed::Object(content)
}

fn analyse_inline_objects(
	analyzer: &mut Analyzer,
	params: &mut Params,
	parent: Handle,
)
{
	while let Some(param) = params.next()
	{
		match param.kind
		{
			Some(ElementKind::Txt) =>
			{
				analyzer.analyse_node(param, Some(parent));
			}
			Some(ElementKind::String) =>
			{
				let text = param.value().to_string();
				analyzer.add_to_model(param, Some(parent), ImoKind::TextItem { text });
			}
			_ => analyzer.error_invalid_param(param),
		}
	}
}

pub fn analyse_para(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let paragraph = analyzer.add_to_model(node, anchor, ImoKind::Paragraph);
	let mut params = Params::of(node);
	analyse_inline_objects(analyzer, &mut params, paragraph);
	Analysed::Object(paragraph)
}

pub fn analyse_heading(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let level = match analyzer.mandatory(&mut params, ElementKind::Number)
	{
		Some(level) => analyzer.long_value(level, 1),
		None => 1,
	};
	let heading = analyzer.add_to_model(node, anchor, ImoKind::Heading { level });
	analyse_inline_objects(analyzer, &mut params, heading);
	Analysed::Object(heading)
}

pub fn analyse_txt(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let text = match analyzer.mandatory(&mut params, ElementKind::String)
	{
		Some(text) => text.value().to_string(),
		None => return Analysed::Nothing,
	};
	analyzer.error_if_more_elements(&params);
	let item = analyzer.add_to_model(node, anchor, ImoKind::TextItem { text });
	Analysed::Object(item)
}

pub fn analyse_score(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	analyzer.context.set_score_version(DEFAULT_SCORE_VERSION);
	let score = analyzer.add_to_model(
		node,
		anchor,
		ImoKind::Score {
			version: String::new(),
			language: None,
		},
	);
	let mut params = Params::of(node);

	if let Some(vers) = analyzer.mandatory(&mut params, ElementKind::Vers)
	{
		analyzer.analyse_node(vers, Some(score));
	}
	let version = version_string(analyzer.context.score_version());

	let language = params.optional(ElementKind::Language).map(first_value);
	if let ImoKind::Score {
		version: x,
		language: y,
	} = &mut analyzer.model.get_mut(score).kind
	{
		*x = version;
		*y = language;
	}

	while let Some(title) = params.optional(ElementKind::Title)
	{
		analyzer.analyse_node(title, Some(score));
	}
	if let Some(cursor) = params.optional(ElementKind::Cursor)
	{
		analyzer.report(
			&cursor.location,
			"'cursor' in score is obsolete. Now must be in 'lenmusdoc' element. \
			 Ignored.",
		);
	}
	while let Some(opt) = params.optional(ElementKind::Opt)
	{
		analyzer.analyse_node(opt, Some(score));
	}

	if !params.more()
	{
		analyzer.error_missing_element(node, ElementKind::Instrument);
	}
	let instruments = enum_set!(ElementKind::Instrument);
	analyzer.analyse_one_or_more(&mut params, instruments, Some(score));
	analyzer.error_if_more_elements(&params);
	Analysed::Object(score)
}

pub fn analyse_title(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let mut params = Params::of(node);
	let alignment = match params.optional(ElementKind::Label)
	{
		Some(label) => analyzer.alignment_value(label, HAlign::Center),
		None => HAlign::Left,
	};
	let text = match analyzer.mandatory(&mut params, ElementKind::String)
	{
		Some(text) => text.value().to_string(),
		None => return Analysed::Nothing,
	};
	let mut so = ScoreObj::default();
	analyzer.text_location(&mut params, &mut so);
	analyzer.error_if_more_elements(&params);
	let title = analyzer.add_to_model(
		node,
		anchor,
		ImoKind::Title {
			text,
			alignment,
			so,
		},
	);
	Analysed::Object(title)
}

/// The cursor is editing state; the model does not keep it.
pub fn analyse_cursor(
	_analyzer: &mut Analyzer,
	_node: &Node,
	_anchor: Option<Handle>,
) -> Analysed
{
	Analysed::Nothing
}

pub fn analyse_instrument(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	analyzer.clear_pending_relations();
	analyzer.context.start_instrument();

	let instrument = analyzer.add_to_model(
		node,
		anchor,
		ImoKind::Instrument {
			name: None,
			abbrev: None,
			staves: 1,
		},
	);
	let mut params = Params::of(node);

	let name = params
		.optional(ElementKind::Name)
		.and_then(|x| text_of(analyzer, x, instrument));
	let abbrev = params
		.optional(ElementKind::Abbrev)
		.and_then(|x| text_of(analyzer, x, instrument));
	if let Some(staves) = params.optional(ElementKind::Staves)
	{
		analyzer.analyse_node(staves, Some(instrument));
	}
	let staves = analyzer.context.staves();
	if let ImoKind::Instrument {
		name: x,
		abbrev: y,
		staves: z,
	} = &mut analyzer.model.get_mut(instrument).kind
	{
		*x = name;
		*y = abbrev;
		*z = staves;
	}

	if let Some(music_data) =
		analyzer.mandatory(&mut params, ElementKind::MusicData)
	{
		analyzer.analyse_node(music_data, Some(instrument));
	}
	analyzer.error_if_more_elements(&params);
	Analysed::Object(instrument)
}

fn text_of(analyzer: &mut Analyzer, node: &Node, parent: Handle) -> Option<String>
{
	match analyzer.analyse_node(node, Some(parent))
	{
		Analysed::Object(handle) => match analyzer.model.kind(handle)
		{
			ImoKind::ScoreText { text, .. } => Some(text.clone()),
			_ => None,
		},
		_ => None,
	}
}

/// Instrument names and abbreviations are score texts of the instrument.
pub fn analyse_name(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	super::attachments::analyse_text(analyzer, node, anchor)
}

pub fn analyse_staves(
	analyzer: &mut Analyzer,
	node: &Node,
	_anchor: Option<Handle>,
) -> Analysed
{
	let value = first_value(node);
	let staves = match super::values::leading_integer(&value)
	{
		Some(staves) if staves >= 1 => staves as usize,
		_ =>
		{
			let message =
				format!("Invalid value '{}' for staves. Replaced by 1.", value);
			analyzer.report(&node.location, message);
			1
		}
	};
	analyzer.context.set_staves(staves);
	Analysed::Nothing
}

pub fn analyse_music_data(
	analyzer: &mut Analyzer,
	node: &Node,
	anchor: Option<Handle>,
) -> Analysed
{
	let music_data = analyzer.add_to_model(node, anchor, ImoKind::MusicData);
	let mut params = Params::of(node);
	analyzer.analyse_one_or_more(&mut params, MUSIC_DATA_CONTENT, Some(music_data));
	Analysed::Object(music_data)
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::analyzer::testing::analyse_ldp;
	use pretty_assertions::assert_eq;

	#[test]
	fn versions()
	{
		assert_eq!(version_number("1.6"), Some(106));
		assert_eq!(version_number("2.0"), Some(200));
		assert_eq!(version_number("2.1"), Some(201));
		assert_eq!(version_number("1.8"), None);
		assert_eq!(version_number(""), None);
		assert_eq!(version_string(107), "1.7");
	}

	#[test]
	fn empty_version_falls_back()
	{
		let (model, diagnostics) = analyse_ldp("(score (vers ))");
		assert_eq!(
			diagnostics,
			"Line 0. Invalid score version ''. Version 1.6 assumed.\n\
			 Line 0. score: missing mandatory element 'instrument'.\n"
		);
		let score = model.root().unwrap();
		match model.kind(score)
		{
			ImoKind::Score { version, .. } => assert_eq!(version, "1.6"),
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn score_grammar_order()
	{
		let (model, diagnostics) = analyse_ldp(
			"(score (vers 2.0) (language en) (title center \"Minuet\")\n\
			 (cursor 1 2 3) (opt StaffLines.Hide yes)\n\
			 (instrument (name \"Piano\") (staves 2) (musicData))\n\
			 (clef G))",
		);
		assert_eq!(
			diagnostics,
			"Line 1. 'cursor' in score is obsolete. Now must be in 'lenmusdoc' \
			 element. Ignored.\n\
			 Line 3. Element 'clef' unknown or not possible here. Ignored.\n"
		);
		let score = model.root().unwrap();
		match model.kind(score)
		{
			ImoKind::Score { version, language } =>
			{
				assert_eq!(version, "2.0");
				assert_eq!(language.as_deref(), Some("en"));
			}
			other => panic!("unexpected {:?}", other),
		}
		let instrument = model.find_all("instrument")[0];
		match model.kind(instrument)
		{
			ImoKind::Instrument { name, staves, .. } =>
			{
				assert_eq!(name.as_deref(), Some("Piano"));
				assert_eq!(*staves, 2);
			}
			other => panic!("unexpected {:?}", other),
		}
		let title = model.find_all("title")[0];
		assert_eq!(model.parent(title), Some(score));
	}

	#[test]
	fn bad_staves()
	{
		let (model, diagnostics) =
			analyse_ldp("(instrument (staves two) (musicData))");
		assert_eq!(
			diagnostics,
			"Line 0. Invalid value 'two' for staves. Replaced by 1.\n"
		);
		match model.kind(model.root().unwrap())
		{
			ImoKind::Instrument { staves, .. } => assert_eq!(*staves, 1),
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn document_with_blocks()
	{
		let (model, diagnostics) = analyse_ldp(
			"(lenmusdoc (vers 0.0) (content (heading 1 \"Study\") \
			 (para (txt \"First\") \"second\") (score (vers 1.6) \
			 (instrument (musicData (r q)))) (clef G)))",
		);
		assert_eq!(
			diagnostics,
			"Line 0. Element 'clef' unknown or not possible here. Ignored.\n"
		);
		let root = model.root().unwrap();
		match model.kind(root)
		{
			ImoKind::Document { version, .. } => assert_eq!(version, "0.0"),
			other => panic!("unexpected {:?}", other),
		}
		assert_eq!(model.find_all("text-item").len(), 3);
		assert_eq!(model.find_all("paragraph").len(), 1);
		let content = model.children(root)[0];
		assert_eq!(model.children(content).len(), 3);
	}

	#[test]
	fn document_without_version()
	{
		let (model, diagnostics) = analyse_ldp("(lenmusdoc (content))");
		assert_eq!(
			diagnostics,
			"Line 0. lenmusdoc: missing mandatory element 'vers'.\n"
		);
		assert!(model.is_empty());
	}
}
