//! The obligatory-attribute table.

use std::collections::{HashMap, HashSet};

use super::model::OBLIGATORY;

/// Which base elements an obligatory base attribute applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applicability {
    /// Obligatory for every base element.
    All,
    /// Obligatory for the listed base elements only.
    Elements(HashSet<&'static str>),
}

impl Applicability {
    /// Returns `true` if the attribute is obligatory for `base_element`.
    ///
    /// Element names are matched exactly.
    #[must_use]
    pub fn applies_to(&self, base_element: &str) -> bool {
        match self {
            Self::All => true,
            Self::Elements(elements) => elements.contains(base_element),
        }
    }
}

/// Base attribute name → [`Applicability`].
///
/// An attribute derived from a base attribute listed here can never be made
/// non-obligatory in the elements the entry applies to.
#[derive(Debug, Clone)]
pub struct ObligatoryTable {
    entries: HashMap<&'static str, Applicability>,
}

impl ObligatoryTable {
    /// Build the standard table.
    #[must_use]
    pub fn standard() -> Self {
        let entries = OBLIGATORY
            .iter()
            .map(|(name, elements)| {
                let applicability = match elements {
                    None => Applicability::All,
                    Some(list) => Applicability::Elements(list.iter().copied().collect()),
                };
                (*name, applicability)
            })
            .collect();
        Self { entries }
    }

    /// Look up the entry for a base attribute name (exact match).
    #[must_use]
    pub fn get(&self, base_attribute: &str) -> Option<&Applicability> {
        self.entries.get(base_attribute)
    }

    /// Returns `true` if `base_attribute` is forced obligatory in `base_element`.
    #[must_use]
    pub fn is_obligatory(&self, base_attribute: &str, base_element: &str) -> bool {
        self.get(base_attribute).is_some_and(|a| a.applies_to(base_element))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
