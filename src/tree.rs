//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! The generic tree is the shared representation between the parser and the
//! analyzer: every element is a named node with ordered children, and every
//! leaf is a node named after its kind.

use crate::lexer::Location;
use crate::model::ImoId;
use crate::registry::ElementKind;

#[derive(Debug, Clone, PartialEq)]
pub struct Node
{
	pub name: String,
	pub kind: Option<ElementKind>,
	pub id: Option<ImoId>,
	pub value: Option<String>,
	pub children: Vec<Node>,
	pub location: Location,
}

impl Node
{
	pub fn element(
		name: &str,
		id: Option<ImoId>,
		children: Vec<Node>,
		location: Location,
	) -> Node
	{
		Node {
			name: name.to_string(),
			kind: ElementKind::from_name(name),
			id,
			value: None,
			children,
			location,
		}
	}

	pub fn label(value: &str, location: Location) -> Node
	{
		Node::leaf(ElementKind::Label, value, location)
	}

	pub fn number(value: &str, location: Location) -> Node
	{
		Node::leaf(ElementKind::Number, value, location)
	}

	pub fn string(value: &str, location: Location) -> Node
	{
		Node::leaf(ElementKind::String, value, location)
	}

	fn leaf(kind: ElementKind, value: &str, location: Location) -> Node
	{
		Node {
			name: kind.to_string(),
			kind: Some(kind),
			id: None,
			value: Some(value.to_string()),
			children: Vec::new(),
			location,
		}
	}

	pub fn line(&self) -> usize
	{
		self.location.line_number
	}

	pub fn is(&self, kind: ElementKind) -> bool
	{
		self.kind == Some(kind)
	}

	pub fn is_leaf(&self) -> bool
	{
		self.value.is_some()
	}

	pub fn value(&self) -> &str
	{
		self.value.as_deref().unwrap_or("")
	}

	/// The name used in diagnostics: labels read as `label:<value>`.
	pub fn describe(&self) -> String
	{
		if self.is(ElementKind::Label)
		{
			format!("label:{}", self.value())
		}
		else
		{
			self.name.clone()
		}
	}

	/// Writes the node back as LDP text.
	pub fn to_ldp(&self) -> String
	{
		let mut buffer = String::new();
		self.write_ldp(&mut buffer);
		buffer
	}

	fn write_ldp(&self, buffer: &mut String)
	{
		match (&self.kind, &self.value)
		{
			(Some(ElementKind::String), Some(value)) =>
			{
				buffer.push('"');
				buffer.push_str(value);
				buffer.push('"');
			}
			(_, Some(value)) => buffer.push_str(value),
			(_, None) =>
			{
				buffer.push('(');
				buffer.push_str(&self.name);
				if let Some(id) = self.id
				{
					buffer.push('#');
					buffer.push_str(&id.to_string());
				}
				for child in &self.children
				{
					buffer.push(' ');
					child.write_ldp(buffer);
				}
				buffer.push(')');
			}
		}
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn element_names_are_classified()
	{
		let node = Node::element("n", None, Vec::new(), Location::default());
		assert_eq!(node.kind, Some(ElementKind::Note));
		let node = Node::element("musicData", None, Vec::new(), Location::default());
		assert_eq!(node.kind, Some(ElementKind::MusicData));
		let node = Node::element("unknown", None, Vec::new(), Location::default());
		assert_eq!(node.kind, None);
	}

	#[test]
	fn leaves_are_named_after_their_kind()
	{
		let node = Node::label("c4", Location::default());
		assert_eq!(node.name, "label");
		assert_eq!(node.describe(), "label:c4");
		let node = Node::string("Minuet", Location::default());
		assert_eq!(node.name, "string");
		assert_eq!(node.describe(), "string");
	}

	#[test]
	fn write_back_as_ldp()
	{
		let location = Location::default();
		let node = Node::element(
			"n",
			Some(12),
			vec![
				Node::label("c4", location.clone()),
				Node::label("q", location.clone()),
				Node::element(
					"text",
					None,
					vec![Node::string("dolce", location.clone())],
					location.clone(),
				),
			],
			location,
		);
		assert_eq!(node.to_ldp(), "(n#12 c4 q (text \"dolce\"))");
	}
}
