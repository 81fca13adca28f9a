//! The closed set of expense categories.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Classifies an expense. Serialized by variant name (`"Food"`, `"Bills"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Food,
    Travel,
    Shopping,
    Bills,
    #[default]
    Other,
}

impl Category {
    /// Every category in enumeration order.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Travel,
        Category::Shopping,
        Category::Bills,
        Category::Other,
    ];

    pub fn iter() -> impl Iterator<Item = Category> {
        Self::ALL.into_iter()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category `{}`", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Self::iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownCategory(needle.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("food".parse::<Category>(), Ok(Category::Food));
        assert_eq!(" BILLS ".parse::<Category>(), Ok(Category::Bills));
        assert!("groceries".parse::<Category>().is_err());
    }

    #[test]
    fn serializes_by_variant_name() {
        let json = serde_json::to_string(&Category::Shopping).unwrap();
        assert_eq!(json, "\"Shopping\"");
    }
}
