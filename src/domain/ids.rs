//! Identifier types with validation
//!
//! Table and column names end up spliced into SQL text, so they are wrapped in
//! newtypes that only accept plain identifier characters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fully qualified table reference
///
/// A dotted path such as `project.dataset.table` (BigQuery) or
/// `schema.table` (PostgreSQL). Each segment may contain ASCII letters,
/// digits, `_` and `-` (BigQuery project IDs use dashes) and must not start
/// with `-`.
///
/// # Examples
///
/// ```
/// use quarry::domain::ids::TableRef;
/// use std::str::FromStr;
///
/// let table = TableRef::from_str("basedosdados.br_ibge_censo_2022.cadastro_enderecos").unwrap();
/// assert_eq!(table.segments().count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableRef(String);

impl TableRef {
    /// Creates a new TableRef from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(TableRef)` if every segment is a valid identifier, `Err` otherwise
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Table name cannot be empty".to_string());
        }

        for segment in name.split('.') {
            if segment.is_empty() {
                return Err(format!("Table name '{name}' contains an empty segment"));
            }
            if segment.starts_with('-') {
                return Err(format!(
                    "Table name segment '{segment}' cannot start with '-'"
                ));
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(format!(
                    "Table name segment '{segment}' may only contain letters, digits, '_' and '-'"
                ));
            }
        }

        Ok(Self(name))
    }

    /// Returns the table reference as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the dotted segments
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TableRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TableRef {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TableRef> for String {
    fn from(value: TableRef) -> Self {
        value.0
    }
}

/// Column name newtype wrapper
///
/// Accepts `[A-Za-z_][A-Za-z0-9_]*`.
///
/// # Examples
///
/// ```
/// use quarry::domain::ids::ColumnName;
///
/// assert!(ColumnName::new("cep").is_ok());
/// assert!(ColumnName::new("cep; DROP TABLE x").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnName(String);

impl ColumnName {
    /// Creates a new ColumnName from a string
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        let mut chars = name.chars();

        match chars.next() {
            None => return Err("Column name cannot be empty".to_string()),
            Some(first) if !(first.is_ascii_alphabetic() || first == '_') => {
                return Err(format!(
                    "Column name '{name}' must start with a letter or '_'"
                ))
            }
            Some(_) => {}
        }

        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!(
                "Column name '{name}' may only contain letters, digits and '_'"
            ));
        }

        Ok(Self(name))
    }

    /// Returns the column name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ColumnName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ColumnName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ColumnName> for String {
    fn from(value: ColumnName) -> Self {
        value.0
    }
}

impl AsRef<str> for ColumnName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
