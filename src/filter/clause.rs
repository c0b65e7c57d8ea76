use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FilterError;

// ---------------------------------------------------------------------------
// Logic operator
// ---------------------------------------------------------------------------

/// How a clause joins the clause before it. Ignored on the first clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl Logic {
    pub const ALL: [Logic; 2] = [Logic::And, Logic::Or];

    pub fn as_str(&self) -> &'static str {
        match self {
            Logic::And => "AND",
            Logic::Or => "OR",
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Logic {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AND" => Ok(Logic::And),
            "OR" => Ok(Logic::Or),
            _ => Err(FilterError::UnknownLogic(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterClause
// ---------------------------------------------------------------------------

/// One keyword rule: does `column` contain `keyword` (case-insensitive)?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    pub column: String,
    pub keyword: String,
    /// `false` turns the rule into "does not contain".
    pub include: bool,
    pub logic: Logic,
    /// Zero or more `(` opened before this clause.
    #[serde(default)]
    pub prefix: String,
    /// Zero or more `)` closed after this clause.
    #[serde(default)]
    pub suffix: String,
}

fn check_brackets(side: &'static str, text: &str, allowed: char) -> Result<String, FilterError> {
    let text = text.trim();
    if text.chars().all(|c| c == allowed) {
        Ok(text.to_string())
    } else {
        Err(FilterError::InvalidBrackets {
            side,
            text: text.to_string(),
            allowed,
        })
    }
}

impl FilterClause {
    /// Build a validated clause. Bracket strings are trimmed and may only
    /// hold `(` (prefix) or `)` (suffix).
    pub fn new(
        column: impl Into<String>,
        keyword: impl Into<String>,
        include: bool,
        logic: Logic,
        prefix: &str,
        suffix: &str,
    ) -> Result<Self, FilterError> {
        let keyword = keyword.into();
        if keyword.is_empty() {
            return Err(FilterError::EmptyKeyword);
        }
        Ok(Self {
            column: column.into(),
            keyword,
            include,
            logic,
            prefix: check_brackets("prefix", prefix, '(')?,
            suffix: check_brackets("suffix", suffix, ')')?,
        })
    }

    /// Re-run the constructor checks on a clause from outside (e.g. a preset).
    pub fn validated(self) -> Result<Self, FilterError> {
        Self::new(
            self.column,
            self.keyword,
            self.include,
            self.logic,
            &self.prefix,
            &self.suffix,
        )
    }

    pub fn opens(&self) -> usize {
        self.prefix.matches('(').count()
    }

    pub fn closes(&self) -> usize {
        self.suffix.matches(')').count()
    }
}

// ---------------------------------------------------------------------------
// FilterList + reducer
// ---------------------------------------------------------------------------

/// A user edit to the filter list.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    AddClause(FilterClause),
    PushOpen(usize),
    PopOpen(usize),
    PushClose(usize),
    PopClose(usize),
    Remove(usize),
    Clear,
    /// Swap in a whole list (preset load).
    Replace(Vec<FilterClause>),
}

/// Ordered clauses; order defines left-to-right composition.
///
/// Values are never edited in place: [`FilterList::reduce`] returns the
/// next revision and leaves `self` untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterList {
    clauses: Vec<FilterClause>,
    revision: u64,
}

impl FilterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Apply `action`, producing the next revision.
    pub fn reduce(&self, action: &FilterAction) -> Result<FilterList, FilterError> {
        let mut clauses = self.clauses.clone();

        match action {
            FilterAction::AddClause(clause) => clauses.push(clause.clone()),
            FilterAction::PushOpen(i) => Self::slot(&mut clauses, *i)?.prefix.push('('),
            FilterAction::PopOpen(i) => {
                let clause = Self::slot(&mut clauses, *i)?;
                if clause.prefix.ends_with('(') {
                    clause.prefix.pop();
                }
            }
            FilterAction::PushClose(i) => Self::slot(&mut clauses, *i)?.suffix.push(')'),
            FilterAction::PopClose(i) => {
                let clause = Self::slot(&mut clauses, *i)?;
                if clause.suffix.ends_with(')') {
                    clause.suffix.pop();
                }
            }
            FilterAction::Remove(i) => {
                Self::slot(&mut clauses, *i)?;
                clauses.remove(*i);
            }
            FilterAction::Clear => clauses.clear(),
            FilterAction::Replace(next) => clauses = next.clone(),
        }

        Ok(FilterList {
            clauses,
            revision: self.revision + 1,
        })
    }

    fn slot(clauses: &mut [FilterClause], index: usize) -> Result<&mut FilterClause, FilterError> {
        let len = clauses.len();
        clauses
            .get_mut(index)
            .ok_or(FilterError::NoSuchClause { index, len })
    }
}

impl From<Vec<FilterClause>> for FilterList {
    fn from(clauses: Vec<FilterClause>) -> Self {
        Self {
            clauses,
            revision: 0,
        }
    }
}
