//! Index-based editing of a draft's ordered lists.
//!
//! Parameters, tags, and runners are all edited the same way: append,
//! replace at an index, remove at an index. Order is insertion order and
//! duplicates are allowed. Indices come from the rendered rows, so an
//! out-of-range index is a caller bug and panics.

use crate::script::{Parameter, ParameterType};

/// Mutable view over one of a draft's lists.
pub struct ListEditor<'a, T> {
    items: &'a mut Vec<T>,
}

impl<'a, T> ListEditor<'a, T> {
    pub(crate) fn new(items: &'a mut Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item to the end of the list.
    pub fn add(&mut self, item: T) {
        self.items.push(item);
    }

    /// Replace the item at `index`.
    pub fn update(&mut self, index: usize, item: T) {
        self.check_index(index);
        self.items[index] = item;
    }

    /// Remove the item at `index`, shifting later items down by one.
    pub fn remove(&mut self, index: usize) -> T {
        self.check_index(index);
        self.items.remove(index)
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.items.len(),
            "list index {index} out of range for length {}",
            self.items.len()
        );
    }
}

impl<T: Default> ListEditor<'_, T> {
    /// Append the blank row a form shows for a new entry.
    pub fn add_blank(&mut self) {
        self.items.push(T::default());
    }
}

/// One sub-field of a parameter record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterField {
    Name(String),
    Type(ParameterType),
    Required(bool),
    Description(String),
}

impl ListEditor<'_, Parameter> {
    /// Replace a single sub-field of the parameter at `index`, leaving its
    /// other fields as they were.
    pub fn update_field(&mut self, index: usize, field: ParameterField) {
        self.check_index(index);
        let param = &mut self.items[index];
        match field {
            ParameterField::Name(v) => param.name = v,
            ParameterField::Type(v) => param.kind = v,
            ParameterField::Required(v) => param.required = v,
            ParameterField::Description(v) => param.description = v,
        }
    }
}
