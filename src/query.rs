use std::fmt;

use serde::Serialize;

use crate::types::RowValues;

/// A SQL string and the arguments meant to be bound to it.
///
/// The text is not validated; that is left to the driver. `Display` renders
/// the pair for logs:
/// ```rust
/// use sql_handle::prelude::*;
///
/// let q = Query::new("SELECT name FROM users WHERE id = ?", vec![RowValues::Int(7)]);
/// assert_eq!(q.to_string(), "[SELECT name FROM users WHERE id = ?, [7]]");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    text: String,
    args: Vec<RowValues>,
}

impl Query {
    /// Create a query from its text and arguments.
    pub fn new(text: impl Into<String>, args: Vec<RowValues>) -> Self {
        Self {
            text: text.into(),
            args,
        }
    }

    /// Create a query with no arguments.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn args(&self) -> &[RowValues] {
        &self.args
    }

    /// Split into text and arguments.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<RowValues>) {
        (self.text, self.args)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, [", self.text)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str("]]")
    }
}

/// Build a [`Query`] from text and any number of arguments convertible into
/// [`RowValues`].
///
/// ```rust
/// use sql_handle::query;
///
/// let q = query!("INSERT INTO t(a, b) VALUES (?, ?)", 1, "x");
/// assert_eq!(q.args().len(), 2);
/// ```
#[macro_export]
macro_rules! query {
    ($text:expr $(,)?) => {
        $crate::Query::text_only($text)
    };
    ($text:expr, $($arg:expr),+ $(,)?) => {
        $crate::Query::new($text, vec![$($crate::RowValues::from($arg)),+])
    };
}
