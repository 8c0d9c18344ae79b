//! # Structured Errors
//!
//! One boolean flag per violated rule. Serialized, a clean flag is omitted,
//! so the JSON form lists only what failed:
//!
//! ```json
//! {"contents": {"list": {"items": [{"contents": {"b": {"minlength": true}}}, null]}}}
//! ```
//!
//! `contents` (groups) and `items` (lists) are present only when a child
//! reports errors. `items` then has one entry per item, `null` for clean
//! ones.

use std::collections::BTreeMap;

use serde::Serialize;

fn is_false(flag: &bool) -> bool {
    !*flag
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupErrors {
    #[serde(skip_serializing_if = "is_false")]
    pub r#type: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub value: bool,
    /// The value carries keys the group does not declare.
    #[serde(skip_serializing_if = "is_false")]
    pub keys: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub invalid: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<BTreeMap<String, Errors>>,
}

impl GroupErrors {
    pub fn any(&self) -> bool {
        self.r#type || self.value || self.keys || self.invalid || self.required || self.contents.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListErrors {
    #[serde(skip_serializing_if = "is_false")]
    pub r#type: bool,
    /// The value's length differs from the item count.
    #[serde(skip_serializing_if = "is_false")]
    pub length: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub invalid: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub minitems: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub maxitems: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub fixeditems: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Option<Errors>>>,
}

impl ListErrors {
    pub fn any(&self) -> bool {
        self.r#type
            || self.length
            || self.invalid
            || self.required
            || self.minitems
            || self.maxitems
            || self.fixeditems
            || self.items.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextErrors {
    #[serde(skip_serializing_if = "is_false")]
    pub r#type: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub invalid: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub minlength: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub maxlength: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub fixedlength: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub pattern: bool,
}

impl TextErrors {
    pub fn any(&self) -> bool {
        self.r#type
            || self.invalid
            || self.required
            || self.minlength
            || self.maxlength
            || self.fixedlength
            || self.pattern
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NumberErrors {
    #[serde(skip_serializing_if = "is_false")]
    pub r#type: bool,
    /// The stored number is `NaN`.
    #[serde(skip_serializing_if = "is_false")]
    pub value: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub invalid: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub min: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub max: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub step: bool,
}

impl NumberErrors {
    pub fn any(&self) -> bool {
        self.r#type || self.value || self.invalid || self.required || self.min || self.max || self.step
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectErrors {
    /// Some selected element is not one of the declared options.
    #[serde(skip_serializing_if = "is_false")]
    pub r#type: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub invalid: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub minselected: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub maxselected: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub fixedselected: bool,
}

impl SelectErrors {
    pub fn any(&self) -> bool {
        self.r#type
            || self.invalid
            || self.required
            || self.minselected
            || self.maxselected
            || self.fixedselected
    }
}

/// Errors of any entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Errors {
    Group(GroupErrors),
    List(ListErrors),
    Text(TextErrors),
    Number(NumberErrors),
    Select(SelectErrors),
}

impl Errors {
    pub fn as_group(&self) -> Option<&GroupErrors> {
        match self {
            Errors::Group(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListErrors> {
        match self {
            Errors::List(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextErrors> {
        match self {
            Errors::Text(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&NumberErrors> {
        match self {
            Errors::Number(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn as_select(&self) -> Option<&SelectErrors> {
        match self {
            Errors::Select(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_flags_are_omitted() {
        let errors = Errors::Text(TextErrors { minlength: true, pattern: true, ..Default::default() });
        assert_eq!(
            serde_json::to_value(&errors).expect("serializes"),
            serde_json::json!({"minlength": true, "pattern": true})
        );
    }

    #[test]
    fn nested_shape_keeps_item_positions() {
        let item = Errors::Group(GroupErrors {
            contents: Some(BTreeMap::from([(
                "b".to_owned(),
                Errors::Text(TextErrors { minlength: true, ..Default::default() }),
            )])),
            ..Default::default()
        });
        let list = Errors::List(ListErrors { items: Some(vec![None, Some(item)]), ..Default::default() });
        assert_eq!(
            serde_json::to_value(&list).expect("serializes"),
            serde_json::json!({"items": [null, {"contents": {"b": {"minlength": true}}}]})
        );
    }

    #[test]
    fn type_flag_serializes_as_type() {
        let errors = SelectErrors { r#type: true, ..Default::default() };
        assert!(errors.any());
        assert_eq!(
            serde_json::to_value(&errors).expect("serializes"),
            serde_json::json!({"type": true})
        );
    }
}
