use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};
use thiserror::Error;

/// Why [`SList::item`] could not produce a single element.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SingleItemError {
    #[error("list is empty")]
    Empty,

    #[error("list of '{type_name}' objects has more than one element")]
    MoreThanOne { type_name: &'static str },
}

/// A list that often holds only a single element, e.g. the result of a search by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SList<T> {
    items: Vec<T>,
}

impl<T> SList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Returns the only element, failing if the list is empty or longer than one.
    pub fn item(self) -> Result<T, SingleItemError> {
        if self.items.len() > 1 {
            return Err(SingleItemError::MoreThanOne {
                type_name: short_type_name::<T>(),
            });
        }
        self.items.into_iter().next().ok_or(SingleItemError::Empty)
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

/// `ultimate_notion::model::Database` -> `Database`
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl<T> Default for SList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Deref for SList<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> DerefMut for SList<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.items
    }
}

impl<T> From<Vec<T>> for SList<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for SList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for SList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a SList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
