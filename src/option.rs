use std::collections::HashSet;

use crate::error::{Result, VelvetError};

/// A selectable entry. Disabled items stay visible but cannot be chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

impl OptionItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Option whose label doubles as its value.
    pub fn simple(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            label: text,
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Options with unique values, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    items: Vec<OptionItem>,
}

impl OptionList {
    pub fn new(items: Vec<OptionItem>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.value.as_str()) {
                return Err(VelvetError::DuplicateOptionValue(item.value.clone()));
            }
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&OptionItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionItem> {
        self.items.iter()
    }

    pub fn position(&self, value: &str) -> Option<usize> {
        self.items.iter().position(|item| item.value == value)
    }

    pub fn find(&self, value: &str) -> Option<&OptionItem> {
        self.items.iter().find(|item| item.value == value)
    }

    /// Look up `value`, failing when the list does not contain it.
    pub fn require(&self, value: &str) -> Result<&OptionItem> {
        self.find(value)
            .ok_or_else(|| VelvetError::UnknownOptionValue(value.to_string()))
    }

    pub fn as_slice(&self) -> &[OptionItem] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a OptionList {
    type Item = &'a OptionItem;
    type IntoIter = std::slice::Iter<'a, OptionItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
