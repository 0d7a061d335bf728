//
// Part of cadenza
// Copyright (c) 2020 Sander in 't Veld
// License: MIT
//

//! Readers for leaf values and the option blocks shared by many elements.
//! Each reader reports a bad value once and falls back to a default.

use crate::analyzer::{Analysed, Analyzer, Params};
use crate::model::{Handle, HAlign, NoteType, Placement, ScoreObj, YesNo};
use crate::registry::{ElementKind, ATTACHMENTS};
use crate::tree::Node;

/// The longest prefix of `value` that reads as a signed integer, the way a
/// stream extraction would read it.
pub fn leading_integer(value: &str) -> Option<i64>
{
	let bytes = value.as_bytes();
	let mut end = 0;
	if matches!(bytes.first(), Some(b'+') | Some(b'-'))
	{
		end += 1;
	}
	let digits_start = end;
	while end < bytes.len() && bytes[end].is_ascii_digit()
	{
		end += 1;
	}
	if end == digits_start
	{
		return None;
	}
	value[..end].parse().ok()
}

/// The longest prefix of `value` that reads as a real number.
pub fn leading_real(value: &str) -> Option<f32>
{
	let bytes = value.as_bytes();
	let mut end = 0;
	if matches!(bytes.first(), Some(b'+') | Some(b'-'))
	{
		end += 1;
	}
	let mut digits = 0;
	while end < bytes.len() && bytes[end].is_ascii_digit()
	{
		end += 1;
		digits += 1;
	}
	if end < bytes.len() && bytes[end] == b'.'
	{
		end += 1;
		while end < bytes.len() && bytes[end].is_ascii_digit()
		{
			end += 1;
			digits += 1;
		}
	}
	if digits == 0
	{
		return None;
	}
	value[..end].parse().ok()
}

/// Splits an LDP duration such as `q..` into its note type and dots.
pub fn parse_duration(value: &str) -> Option<(NoteType, u8)>
{
	let mut chars = value.chars();
	let note_type = NoteType::from_letter(chars.next()?)?;
	let rest = chars.as_str();
	if rest.chars().all(|c| c == '.') && rest.len() < 256
	{
		Some((note_type, rest.len() as u8))
	}
	else
	{
		None
	}
}

impl Analyzer<'_>
{
	pub fn long_value(&mut self, node: &Node, default: i64) -> i64
	{
		match leading_integer(node.value())
		{
			Some(number) => number,
			None =>
			{
				let message = format!(
					"Invalid integer number '{}'. Replaced by '{}'.",
					node.value(),
					default
				);
				self.report(&node.location, message);
				default
			}
		}
	}

	/// Like `long_value`, but numbers that do not fit in `T` are invalid too.
	pub fn bounded_value<T>(&mut self, node: &Node, default: T) -> T
	where
		T: TryFrom<i64> + std::fmt::Display,
	{
		match leading_integer(node.value()).and_then(|x| T::try_from(x).ok())
		{
			Some(number) => number,
			None =>
			{
				let message = format!(
					"Invalid integer number '{}'. Replaced by '{}'.",
					node.value(),
					default
				);
				self.report(&node.location, message);
				default
			}
		}
	}

	pub fn float_value(&mut self, node: &Node, default: f32) -> f32
	{
		match leading_real(node.value())
		{
			Some(number) => number,
			None =>
			{
				let message = format!(
					"Invalid real number '{}'. Replaced by '{}'.",
					node.value(),
					default
				);
				self.report(&node.location, message);
				default
			}
		}
	}

	pub fn bool_value(&mut self, node: &Node, default: bool) -> bool
	{
		match node.value()
		{
			"true" | "yes" => true,
			"false" | "no" => false,
			value =>
			{
				let message = format!(
					"Invalid boolean value '{}'. Replaced by '{}'.",
					value,
					if default { 1 } else { 0 }
				);
				self.report(&node.location, message);
				default
			}
		}
	}

	pub fn yes_no_value(&mut self, node: &Node, default: YesNo) -> YesNo
	{
		match node.value()
		{
			"yes" => YesNo::Yes,
			"no" => YesNo::No,
			value =>
			{
				let message =
					format!("Invalid yes/no value '{}'. Replaced by default.", value);
				self.report(&node.location, message);
				default
			}
		}
	}

	pub fn placement_value(&mut self, node: &Node, default: Placement) -> Placement
	{
		match node.value()
		{
			"above" => Placement::Above,
			"below" => Placement::Below,
			value =>
			{
				let replacement = match default
				{
					Placement::Above => "above",
					_ => "below",
				};
				let message = format!(
					"Unknown value '{}' for <placement>. Replaced by '{}'.",
					value, replacement
				);
				self.report(&node.location, message);
				default
			}
		}
	}

	pub fn alignment_value(&mut self, node: &Node, default: HAlign) -> HAlign
	{
		match serde_plain::from_str(node.value())
		{
			Ok(alignment) => alignment,
			Err(_) =>
			{
				let message = format!(
					"Invalid alignment value '{}'. Assumed 'center'.",
					node.value()
				);
				self.report(&node.location, message);
				default
			}
		}
	}

	pub fn note_type_and_dots(&mut self, node: &Node) -> (NoteType, u8)
	{
		match parse_duration(node.value())
		{
			Some(duration) => duration,
			None =>
			{
				let message = format!(
					"Unknown note/rest duration '{}'. Replaced by 'q'.",
					node.value()
				);
				self.report(&node.location, message);
				(NoteType::Quarter, 0)
			}
		}
	}

	/// Reads a `pN` label and makes staff N the current staff.
	pub fn num_staff_label(&mut self, node: &Node)
	{
		let rest = node.value().get(1..).unwrap_or("");
		match leading_integer(rest).filter(|x| *x >= 1)
		{
			Some(number) => self.context.set_staff((number - 1) as usize),
			None =>
			{
				let message = format!("Invalid staff 'p{}'. Replaced by 'p1'.", rest);
				self.report(&node.location, message);
				self.context.set_staff(0);
			}
		}
	}

	/// Reads a `vN` label and makes voice N the current voice.
	pub fn voice_label(&mut self, node: &Node)
	{
		let rest = node.value().get(1..).unwrap_or("");
		match leading_integer(rest).and_then(|x| i32::try_from(x).ok())
		{
			Some(number) => self.context.set_voice(number),
			None =>
			{
				let message = format!("Invalid voice 'v{}'. Replaced by 'v1'.", rest);
				self.report(&node.location, message);
				self.context.set_voice(1);
			}
		}
	}

	/// The value child of a property element, reported missing when absent.
	pub fn property_value<'n>(
		&mut self,
		property: &'n Node,
		kind: ElementKind,
	) -> Option<&'n Node>
	{
		let value = Params::value_of(property);
		if value.is_none()
		{
			self.error_missing_element(property, kind);
		}
		value
	}

	/// Reads `pN` or `(staffNum n)` followed by the print options.
	pub fn staffobj_options(&mut self, params: &mut Params, so: &mut ScoreObj)
	{
		if let Some(label) = params.optional(ElementKind::Label)
		{
			if label.value().starts_with('p')
			{
				self.num_staff_label(label);
			}
			else
			{
				self.error_invalid_param(label);
			}
		}
		else if let Some(property) = params.optional(ElementKind::StaffNum)
		{
			if let Some(value) = self.property_value(property, ElementKind::Number)
			{
				match leading_integer(value.value()).filter(|x| *x >= 1)
				{
					Some(number) => self.context.set_staff((number - 1) as usize),
					None =>
					{
						let message = format!(
							"Invalid staff '{}'. Replaced by 'p1'.",
							value.value()
						);
						self.report(&value.location, message);
						self.context.set_staff(0);
					}
				}
			}
			else
			{
				self.context.set_staff(0);
			}
		}
		so.staff = self.context.staff();
		self.scoreobj_options(params, so);
	}

	/// Reads visibility, color and location until the first other child.
	pub fn scoreobj_options(&mut self, params: &mut Params, so: &mut ScoreObj)
	{
		while let Some(param) = params.peek()
		{
			match param.kind
			{
				Some(ElementKind::Visible) =>
				{
					if let Some(value) =
						self.property_value(param, ElementKind::Label)
					{
						so.visible = self.bool_value(value, true);
					}
				}
				Some(ElementKind::Color) =>
				{
					so.color = match self.analyse_node(param, None)
					{
						Analysed::Color(color) => Some(color),
						_ => None,
					};
				}
				Some(ElementKind::Dx) =>
				{
					so.dx = self.location_value(param);
				}
				Some(ElementKind::Dy) =>
				{
					so.dy = self.location_value(param);
				}
				_ => return,
			}
			params.next();
		}
	}

	/// Reads the number of a `(dx n)` or `(dy n)` element.
	pub fn location_value(&mut self, property: &Node) -> f32
	{
		match self.property_value(property, ElementKind::Number)
		{
			Some(value) => self.float_value(value, 0.0),
			None => 0.0,
		}
	}

	/// Reads every remaining child as `(dx n)` or `(dy n)`.
	pub fn text_location(&mut self, params: &mut Params, so: &mut ScoreObj)
	{
		while let Some(param) = params.next()
		{
			match param.kind
			{
				Some(ElementKind::Dx) => so.dx = self.location_value(param),
				Some(ElementKind::Dy) => so.dy = self.location_value(param),
				_ => self.error_invalid_param(param),
			}
		}
	}

	/// Analyses the remaining children as attachments of a note or rest.
	pub fn noterest_attachments(&mut self, params: &mut Params, anchor: Handle)
	{
		while let Some(param) = params.next()
		{
			match param.kind
			{
				Some(kind) if ATTACHMENTS.contains(kind) =>
				{
					self.analyse_node(param, Some(anchor));
				}
				_ => self.error_invalid_param(param),
			}
		}
	}

	/// Analyses the remaining children as attachments of another staff
	/// object; only texts can be attached there.
	pub fn staffobj_attachments(&mut self, params: &mut Params, anchor: Handle)
	{
		while let Some(param) = params.next()
		{
			if param.is(ElementKind::Text)
			{
				self.analyse_node(param, Some(anchor));
			}
			else
			{
				self.error_invalid_param(param);
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
	fn integers_read_a_leading_prefix()
	{
		assert_eq!(leading_integer("12"), Some(12));
		assert_eq!(leading_integer("-3"), Some(-3));
		assert_eq!(leading_integer("+7"), Some(7));
		assert_eq!(leading_integer("3.5"), Some(3));
		assert_eq!(leading_integer("4x"), Some(4));
		assert_eq!(leading_integer("x4"), None);
		assert_eq!(leading_integer("-"), None);
		assert_eq!(leading_integer(""), None);
	}

	#[test]
	fn reals_read_a_leading_prefix()
	{
		assert_eq!(leading_real("2.5"), Some(2.5));
		assert_eq!(leading_real("-.5"), Some(-0.5));
		assert_eq!(leading_real("7"), Some(7.0));
		assert_eq!(leading_real("1.5mm"), Some(1.5));
		assert_eq!(leading_real("."), None);
		assert_eq!(leading_real("abc"), None);
	}

	#[test]
	fn durations_with_dots()
	{
		assert_eq!(parse_duration("q"), Some((NoteType::Quarter, 0)));
		assert_eq!(parse_duration("h.."), Some((NoteType::Half, 2)));
		assert_eq!(parse_duration("s."), Some((NoteType::N16th, 1)));
		assert_eq!(parse_duration("x"), None);
		assert_eq!(parse_duration("q.x"), None);
		assert_eq!(parse_duration(""), None);
	}
}
