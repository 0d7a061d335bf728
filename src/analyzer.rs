//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The analyzer walks the generic tree depth first, validates every element
//! against its grammar and builds the model. Problems never abort the walk:
//! each one is reported to the sink as a single line and the analysis goes
//! on with a default value, without the offending child, or without the
//! element.

pub mod attachments;
pub mod document;
pub mod noterest;
pub mod options;
pub mod relations;
pub mod staffobjs;

mod values;

use crate::context::ScoreContext;
use crate::error::{Diagnostic, Sink};
use crate::lexer::Location;
use crate::model::{Bezier, Color, Handle, ImoKind, Model, TimeModification};
use crate::registry;
use crate::registry::ElementKind;
use crate::relations::{BeamDto, SlurDto, TieDto, TupletDto};
use crate::relations::{Builders, Linker};
use crate::tree::Node;

use log::{trace, warn};

/// What analysing one element produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysed
{
	Object(Handle),
	Tie(TieDto),
	Slur(SlurDto),
	Beam(BeamDto),
	Tuplet(TupletDto),
	TimeModification(TimeModification),
	Color(Color),
	Bezier(Bezier),
	Nothing,
}

/// Analyses the tree below `root` and returns the model. The root object of
/// the model is the object built for `root`, if any. The locator names the
/// source; it is only carried along for logging.
pub fn analyse(root: &Node, locator: &str, sink: &mut dyn Sink) -> Model
{
	let mut analyzer = Analyzer::new(locator, sink);
	if let Analysed::Object(handle) = analyzer.analyse_node(root, None)
	{
		analyzer.model.set_root(handle);
	}
	analyzer.finish()
}

pub struct Analyzer<'a>
{
	pub model: Model,
	pub context: ScoreContext,
	pub builders: Builders,
	sink: &'a mut dyn Sink,
	locator: String,
}

impl<'a> Analyzer<'a>
{
	pub fn new(locator: &str, sink: &'a mut dyn Sink) -> Analyzer<'a>
	{
		Analyzer {
			model: Model::default(),
			context: ScoreContext::default(),
			builders: Builders::default(),
			sink,
			locator: locator.to_string(),
		}
	}

	/// Reports every relation that is still open and hands over the model.
	pub fn finish(mut self) -> Model
	{
		self.clear_pending_relations();
		std::mem::take(&mut self.model)
	}

	pub fn clear_pending_relations(&mut self)
	{
		self.link(|builders, linker| builders.clear_pending(linker));
	}

	pub fn analyse_node(&mut self, node: &Node, anchor: Option<Handle>)
		-> Analysed
	{
		trace!("Analysing '{}' in {} line {}", node.name, self.locator, node.line());
		let analyser = node
			.kind
			.and_then(registry::entry)
			.and_then(|entry| entry.analyser);
		match analyser
		{
			Some(analyser) => analyser(self, node, anchor),
			None =>
			{
				let message =
					format!("Missing analyser for element '{}'. Node ignored.", node.name);
				self.report(&node.location, message);
				Analysed::Nothing
			}
		}
	}

	pub fn report(&mut self, location: &Location, message: impl Into<String>)
	{
		let diagnostic = Diagnostic::new(location, message);
		warn!("{}", diagnostic);
		self.sink.report(diagnostic);
	}

	/// Runs `f` with the builders and a linker over the rest of the state.
	pub fn link<F>(&mut self, f: F)
	where
		F: FnOnce(&mut Builders, &mut Linker),
	{
		let mut linker = Linker {
			model: &mut self.model,
			ids: &mut self.context.ids,
			sink: &mut *self.sink,
		};
		f(&mut self.builders, &mut linker);
	}

	/// Adds the object built for `node` to the model, below `anchor` when
	/// there is one. Explicit ids are kept unless they are taken.
	pub fn add_to_model(
		&mut self,
		node: &Node,
		anchor: Option<Handle>,
		kind: ImoKind,
	) -> Handle
	{
		let id = match self.context.ids.assign(node.id)
		{
			Ok(id) => id,
			Err(fresh) =>
			{
				self.report(&node.location, "Value for id already exists. Ignored.");
				fresh
			}
		};
		let handle = self.model.add(id, kind);
		if let Some(parent) = anchor
		{
			self.model.append_child(parent, handle);
		}
		handle
	}

	/// Takes the next child if it is of the given kind, reporting it missing
	/// otherwise. The child is not consumed when it is of another kind.
	pub fn mandatory<'n>(
		&mut self,
		params: &mut Params<'n>,
		kind: ElementKind,
	) -> Option<&'n Node>
	{
		let found = params.optional(kind);
		if found.is_none()
		{
			self.error_missing_element(params.node, kind);
		}
		found
	}

	pub fn error_missing_element(&mut self, node: &Node, kind: ElementKind)
	{
		let message =
			format!("{}: missing mandatory element '{}'.", node.name, kind);
		self.report(&node.location, message);
	}

	pub fn error_invalid_param(&mut self, param: &Node)
	{
		let message = format!(
			"Element '{}' unknown or not possible here. Ignored.",
			param.describe()
		);
		self.report(&param.location, message);
	}

	pub fn error_if_more_elements(&mut self, params: &Params)
	{
		if let Some(extra) = params.peek()
		{
			let message = format!(
				"Element '{}': too many parameters. Extra parameters from '{}' \
				 have been ignored.",
				params.node.name,
				extra.describe()
			);
			self.report(&params.node.location, message);
		}
	}

	/// Analyses every remaining child that is among `valid` and reports the
	/// others.
	pub fn analyse_one_or_more(
		&mut self,
		params: &mut Params,
		valid: enumset::EnumSet<ElementKind>,
		anchor: Option<Handle>,
	)
	{
		while let Some(param) = params.next()
		{
			match param.kind
			{
				Some(kind) if valid.contains(kind) =>
				{
					self.analyse_node(param, anchor);
				}
				_ => self.error_invalid_param(param),
			}
		}
	}
}

impl Drop for Analyzer<'_>
{
	fn drop(&mut self)
	{
		self.clear_pending_relations();
	}
}

/// A cursor over the children of the element being analysed.
#[derive(Debug, Clone)]
pub struct Params<'n>
{
	node: &'n Node,
	index: usize,
}

impl<'n> Params<'n>
{
	pub fn of(node: &'n Node) -> Params<'n>
	{
		Params { node, index: 0 }
	}

	pub fn node(&self) -> &'n Node
	{
		self.node
	}

	pub fn more(&self) -> bool
	{
		self.index < self.node.children.len()
	}

	pub fn peek(&self) -> Option<&'n Node>
	{
		self.node.children.get(self.index)
	}

	pub fn peek_is(&self, kind: ElementKind) -> bool
	{
		self.peek().map_or(false, |x| x.is(kind))
	}

	pub fn next(&mut self) -> Option<&'n Node>
	{
		let param = self.peek()?;
		self.index += 1;
		Some(param)
	}

	pub fn optional(&mut self, kind: ElementKind) -> Option<&'n Node>
	{
		if self.peek_is(kind)
		{
			self.next()
		}
		else
		{
			None
		}
	}

	/// The first child of a property element such as `(dx 5)`.
	pub fn value_of(property: &'n Node) -> Option<&'n Node>
	{
		property.children.first()
	}
}

#[cfg(test)]
pub mod testing
{
	use crate::model::Model;

	/// Analyses LDP text and returns the model with the diagnostics.
	pub fn analyse_ldp(source: &str) -> (Model, String)
	{
		let mut diagnostics = String::new();
		let model = crate::analyse_source(source, "test.lmd", &mut diagnostics)
			.unwrap();
		(model, diagnostics)
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::lexer;
	use crate::parser;
	use pretty_assertions::assert_eq;

	fn tree(source: &str) -> Node
	{
		let mut diagnostics = String::new();
		let tokens = lexer::lex(source, "test.lmd");
		let node = parser::parse(tokens, &mut diagnostics).unwrap();
		assert_eq!(diagnostics, "");
		node
	}

	#[test]
	fn unknown_elements_are_reported_and_skipped()
	{
		let node = tree("(musicData (n c4 q) (unknownThing 3) (r q))");
		let mut diagnostics = String::new();
		let model = analyse(&node, "", &mut diagnostics);
		assert_eq!(
			diagnostics,
			"Line 0. Element 'unknownThing' unknown or not possible here. \
			 Ignored.\n"
		);
		assert_eq!(model.find_all("note").len(), 1);
		assert_eq!(model.find_all("rest").len(), 1);
	}

	#[test]
	fn root_without_analyser()
	{
		let node = tree("(dx 5)");
		let mut diagnostics = String::new();
		let model = analyse(&node, "", &mut diagnostics);
		assert_eq!(
			diagnostics,
			"Line 0. Missing analyser for element 'dx'. Node ignored.\n"
		);
		assert_eq!(model.root(), None);
	}

	#[test]
	fn dropping_the_analyzer_flushes_builders()
	{
		let node = tree("(n c4 e (tie 12 start))");
		let mut diagnostics = String::new();
		{
			let mut analyzer = Analyzer::new("", &mut diagnostics);
			analyzer.analyse_node(&node, None);
		}
		assert_eq!(
			diagnostics,
			"Line 0. No 'end' element for tie number 12. Tie ignored.\n"
		);
	}

	#[test]
	fn duplicate_ids_are_replaced()
	{
		let node = tree("(musicData#5 (n#5 c4 q) (r#9 q) (r q))");
		let mut diagnostics = String::new();
		let model = analyse(&node, "", &mut diagnostics);
		assert_eq!(diagnostics, "Line 0. Value for id already exists. Ignored.\n");
		let mut ids: Vec<i64> = model.handles().map(|x| model.id(x)).collect();
		ids.sort();
		assert_eq!(ids, vec![5, 6, 9, 10]);
	}
}
