//! Filter criteria for dish searches.
//!
//! A [`Query`] is the full set of active filters. It carries no page
//! number; the page cursor belongs to the list controller. Equality is
//! field by field, so an absent name and an empty one compare unequal even
//! though both match every dish, and ingredient order matters.
//!
//! Individual selector widgets never build a `Query` themselves. They emit a
//! [`FilterEdit`] and the owner folds it into the current query with
//! [`Query::apply`].

use crate::domain::error::DishlistError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Campus canteens a dish can be served in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Canteen {
    XueYi,
    JiaYuan1,
    JiaYuan2,
    JiaYuan3,
    JiaYuan4,
    NongYuan1,
    NongYuan2,
    NongYuan3,
}

impl Canteen {
    pub const ALL: [Self; 8] = [
        Self::XueYi,
        Self::JiaYuan1,
        Self::JiaYuan2,
        Self::JiaYuan3,
        Self::JiaYuan4,
        Self::NongYuan1,
        Self::NongYuan2,
        Self::NongYuan3,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::XueYi => "XueYi",
            Self::JiaYuan1 => "JiaYuan1",
            Self::JiaYuan2 => "JiaYuan2",
            Self::JiaYuan3 => "JiaYuan3",
            Self::JiaYuan4 => "JiaYuan4",
            Self::NongYuan1 => "NongYuan1",
            Self::NongYuan2 => "NongYuan2",
            Self::NongYuan3 => "NongYuan3",
        }
    }
}

impl fmt::Display for Canteen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Canteen {
    type Err = DishlistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DishlistError::UnknownValue {
                kind: "canteen",
                value: s.to_string(),
            })
    }
}

/// Dominant taste of a dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flavor {
    Spicy,
    Sour,
    Sweet,
    Bitter,
}

impl Flavor {
    pub const ALL: [Self; 4] = [Self::Spicy, Self::Sour, Self::Sweet, Self::Bitter];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spicy => "Spicy",
            Self::Sour => "Sour",
            Self::Sweet => "Sweet",
            Self::Bitter => "Bitter",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Flavor {
    type Err = DishlistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DishlistError::UnknownValue {
                kind: "flavor",
                value: s.to_string(),
            })
    }
}

/// Opaque identifier of a dish category (noodles, rice, soup, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive price bounds in whole yuan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u32,
    pub max: u32,
}

impl PriceRange {
    /// Builds a range, swapping the bounds if they arrive reversed.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    #[must_use]
    pub const fn contains(&self, price: u32) -> bool {
        self.min <= price && price <= self.max
    }
}

/// The active filter criteria of a dish search.
///
/// Every field is optional; the default query matches every dish. An empty
/// `name` behaves like an absent one.
///
/// # Examples
///
/// ```
/// use dishlist::{Canteen, Query};
///
/// let query = Query::for_canteen(Canteen::NongYuan2);
/// assert_eq!(query.canteen, Some(Canteen::NongYuan2));
/// assert_ne!(query, Query::default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canteen: Option<Canteen>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<Flavor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_calorie: Option<u32>,
    /// Longest acceptable queueing time, in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wait_time: Option<u32>,
    /// Ingredients a dish must all contain.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<String>,
}

impl Query {
    /// A query that only narrows by canteen, as handed over from another screen.
    #[must_use]
    pub fn for_canteen(canteen: Canteen) -> Self {
        Self {
            canteen: Some(canteen),
            ..Self::default()
        }
    }

    /// Returns the free-text filter, treating an empty string as absent.
    #[must_use]
    pub fn name_filter(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }

    /// Folds a single selector edit into a copy of this query.
    ///
    /// `ToggleCategory` clears the category when the same one is picked
    /// again, matching how the category strip behaves on screen.
    ///
    /// # Examples
    ///
    /// ```
    /// use dishlist::{CategoryId, FilterEdit, Query};
    ///
    /// let noodles = CategoryId::new("noodles");
    /// let q = Query::default().apply(FilterEdit::ToggleCategory(noodles.clone()));
    /// assert_eq!(q.category, Some(noodles.clone()));
    ///
    /// let q = q.apply(FilterEdit::ToggleCategory(noodles));
    /// assert_eq!(q.category, None);
    /// ```
    #[must_use]
    pub fn apply(&self, edit: FilterEdit) -> Self {
        let mut next = self.clone();
        match edit {
            FilterEdit::Name(text) => next.name = Some(text),
            FilterEdit::ClearName => next.name = Some(String::new()),
            FilterEdit::ToggleCategory(id) => {
                next.category = if self.category.as_ref() == Some(&id) {
                    None
                } else {
                    Some(id)
                };
            }
            FilterEdit::Canteen(canteen) => next.canteen = canteen,
            FilterEdit::Flavor(flavor) => next.flavor = flavor,
            FilterEdit::Price(range) => next.price = range,
            FilterEdit::MaxCalorie(limit) => next.max_calorie = limit,
            FilterEdit::MaxWaitTime(limit) => next.max_wait_time = limit,
            FilterEdit::Ingredients(list) => next.ingredients = list,
        }
        next
    }
}

/// A change reported by one filter selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEdit {
    /// Search box input.
    Name(String),
    /// Search box clear button.
    ClearName,
    /// Category strip tap; tapping the selected category deselects it.
    ToggleCategory(CategoryId),
    Canteen(Option<Canteen>),
    Flavor(Option<Flavor>),
    Price(Option<PriceRange>),
    MaxCalorie(Option<u32>),
    MaxWaitTime(Option<u32>),
    Ingredients(Vec<String>),
}
