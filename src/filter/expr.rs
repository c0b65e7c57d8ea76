//! Compile a filter list into an expression tree and evaluate it as a
//! row mask.
//!
//! Each clause contributes `prefix MASK suffix`; clauses after the first
//! are joined by their logic operator. AND binds tighter than OR and the
//! user's parentheses override that.

use std::fmt;

use super::brackets::check_nesting;
use super::clause::{FilterClause, Logic};
use super::error::FilterError;
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Expression tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Raw containment mask of clause `i`.
    Mask(usize),
    Not(Box<Expr>),
    /// A run of operands joined by AND, folded left to right.
    And(Vec<Expr>),
    /// A run of operands joined by OR, folded left to right.
    Or(Vec<Expr>),
    /// A parenthesised group written by the user.
    Group(Box<Expr>),
}

impl Expr {
    /// Evaluate against per-clause masks, all of the same length.
    pub fn eval(&self, masks: &[Vec<bool>]) -> Result<Vec<bool>, FilterError> {
        match self {
            Expr::Mask(i) => masks.get(*i).cloned().ok_or(FilterError::UnknownMask(*i)),
            Expr::Not(inner) => Ok(inner.eval(masks)?.into_iter().map(|b| !b).collect()),
            Expr::And(terms) => fold(terms, masks, |a, b| a && b),
            Expr::Or(terms) => fold(terms, masks, |a, b| a || b),
            Expr::Group(inner) => inner.eval(masks),
        }
    }
}

fn fold(
    terms: &[Expr],
    masks: &[Vec<bool>],
    op: fn(bool, bool) -> bool,
) -> Result<Vec<bool>, FilterError> {
    let mut acc: Option<Vec<bool>> = None;
    for term in terms {
        let next = term.eval(masks)?;
        acc = Some(match acc {
            None => next,
            Some(lhs) => lhs.into_iter().zip(next).map(|(a, b)| op(a, b)).collect(),
        });
    }
    acc.ok_or(FilterError::EmptyFilter)
}

fn write_joined(f: &mut fmt::Formatter<'_>, terms: &[Expr], sep: &str) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{term}")?;
    }
    Ok(())
}

/// Debug form, e.g. `mask_0 & (mask_1 | ~mask_2)`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Mask(i) => write!(f, "mask_{i}"),
            Expr::Not(inner) => write!(f, "~{inner}"),
            Expr::And(terms) => write_joined(f, terms, " & "),
            Expr::Or(terms) => write_joined(f, terms, " | "),
            Expr::Group(inner) => write!(f, "({inner})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Token {
    Open { clause: usize },
    Close { clause: usize },
    Clause { index: usize, include: bool },
    Op { clause: usize, logic: Logic },
}

fn tokenize(clauses: &[FilterClause]) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (index, clause) in clauses.iter().enumerate() {
        if index > 0 {
            tokens.push(Token::Op {
                clause: index,
                logic: clause.logic,
            });
        }
        tokens.extend((0..clause.opens()).map(|_| Token::Open { clause: index }));
        tokens.push(Token::Clause {
            index,
            include: clause.include,
        });
        tokens.extend((0..clause.closes()).map(|_| Token::Close { clause: index }));
    }
    tokens
}

/// Deepest bracket nesting accepted; the parser recurses once per level.
pub const MAX_GROUP_DEPTH: usize = 256;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek_logic(&self) -> Option<Logic> {
        match self.tokens.get(self.pos) {
            Some(Token::Op { logic, .. }) => Some(*logic),
            _ => None,
        }
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).copied();
        self.pos += 1;
        token
    }

    fn parse_or(&mut self) -> Result<Expr, FilterError> {
        let mut terms = vec![self.parse_and()?];
        while self.peek_logic() == Some(Logic::Or) {
            self.pos += 1;
            terms.push(self.parse_and()?);
        }
        Ok(chain(terms, Expr::Or))
    }

    fn parse_and(&mut self) -> Result<Expr, FilterError> {
        let mut terms = vec![self.parse_atom()?];
        while self.peek_logic() == Some(Logic::And) {
            self.pos += 1;
            terms.push(self.parse_atom()?);
        }
        Ok(chain(terms, Expr::And))
    }

    fn parse_atom(&mut self) -> Result<Expr, FilterError> {
        match self.next() {
            Some(Token::Open { clause }) => {
                if self.depth == MAX_GROUP_DEPTH {
                    return Err(FilterError::NestingTooDeep {
                        clause: clause + 1,
                        limit: MAX_GROUP_DEPTH,
                    });
                }
                self.depth += 1;
                let inner = self.parse_or()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::Close { .. }) => Ok(Expr::Group(Box::new(inner))),
                    _ => Err(FilterError::UnclosedGroup {
                        clause: clause + 1,
                        count: 1,
                    }),
                }
            }
            Some(Token::Clause { index, include }) => {
                let mask = Expr::Mask(index);
                Ok(if include {
                    mask
                } else {
                    Expr::Not(Box::new(mask))
                })
            }
            Some(Token::Close { clause }) => Err(FilterError::UnexpectedClose { clause: clause + 1 }),
            Some(Token::Op { clause, .. }) => Err(FilterError::MissingOperand { clause: clause + 1 }),
            None => Err(FilterError::MissingOperand {
                clause: self.tokens.len(),
            }),
        }
    }
}

fn chain(mut terms: Vec<Expr>, join: fn(Vec<Expr>) -> Expr) -> Expr {
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        join(terms)
    }
}

/// Build the expression tree for `clauses`.
///
/// Re-checks the bracket count and nesting rather than trusting the caller.
pub fn compile(clauses: &[FilterClause]) -> Result<Expr, FilterError> {
    if clauses.is_empty() {
        return Err(FilterError::EmptyFilter);
    }

    let open: usize = clauses.iter().map(FilterClause::opens).sum();
    let close: usize = clauses.iter().map(FilterClause::closes).sum();
    if open != close {
        return Err(FilterError::Unbalanced { open, close });
    }
    check_nesting(clauses)?;

    let tokens = tokenize(clauses);
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_or()?;

    match parser.next() {
        None => Ok(expr),
        Some(Token::Close { clause }) => Err(FilterError::UnexpectedClose { clause: clause + 1 }),
        Some(Token::Open { clause } | Token::Clause { index: clause, .. } | Token::Op { clause, .. }) => {
            Err(FilterError::MissingOperand { clause: clause + 1 })
        }
    }
}

// ---------------------------------------------------------------------------
// Masks
// ---------------------------------------------------------------------------

/// Case-insensitive "column contains keyword" per row; missing cells read
/// as empty text. Exclusion is applied by the expression tree, not here.
pub fn clause_mask(table: &Table, clause: &FilterClause) -> Result<Vec<bool>, FilterError> {
    let column = table
        .column_index(&clause.column)
        .ok_or_else(|| FilterError::UnknownColumn(clause.column.clone()))?;
    let needle = clause.keyword.to_lowercase();

    Ok((0..table.len())
        .map(|row| table.cell_text(row, column).to_lowercase().contains(&needle))
        .collect())
}

/// Result of evaluating a filter list: never fails, but may carry the
/// error that forced an all-false mask.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskOutcome {
    pub mask: Vec<bool>,
    pub error: Option<FilterError>,
}

/// Evaluate `clauses` over `table`. Any failure yields an all-false mask
/// together with the error for display.
pub fn build_mask(table: &Table, clauses: &[FilterClause]) -> MaskOutcome {
    match try_build_mask(table, clauses) {
        Ok(mask) => MaskOutcome { mask, error: None },
        Err(e) => {
            log::warn!("Filter expression failed: {e}");
            MaskOutcome {
                mask: vec![false; table.len()],
                error: Some(e),
            }
        }
    }
}

fn try_build_mask(table: &Table, clauses: &[FilterClause]) -> Result<Vec<bool>, FilterError> {
    let expr = compile(clauses)?;
    log::debug!("Compiled filter: {expr}");

    let masks = clauses
        .iter()
        .map(|c| clause_mask(table, c))
        .collect::<Result<Vec<_>, _>>()?;
    expr.eval(&masks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| CellValue::from_text(v)).collect())
                .collect(),
        )
    }

    fn clause(column: &str, keyword: &str, include: bool, logic: Logic) -> FilterClause {
        FilterClause::new(column, keyword, include, logic, "", "").unwrap()
    }

    fn bracketed(
        column: &str,
        keyword: &str,
        logic: Logic,
        prefix: &str,
        suffix: &str,
    ) -> FilterClause {
        FilterClause::new(column, keyword, true, logic, prefix, suffix).unwrap()
    }

    #[test]
    fn test_single_clause_is_case_insensitive() {
        let t = table(&["Name"], &[&["Alice"], &["bob"], &["ALICE"]]);
        let outcome = build_mask(&t, &[clause("Name", "alice", true, Logic::And)]);
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.mask, vec![true, false, true]);
    }

    #[test]
    fn test_exclude_inverts_and_missing_reads_as_empty() {
        let t = table(&["Name"], &[&["Alice"], &[""], &["bob"]]);
        let outcome = build_mask(&t, &[clause("Name", "ali", false, Logic::And)]);
        assert_eq!(outcome.mask, vec![false, true, true]);
    }

    #[test]
    fn test_numbers_match_by_text_form() {
        let t = table(&["Code"], &[&["1200"], &["34"], &["120.5"]]);
        let outcome = build_mask(&t, &[clause("Code", "120", true, Logic::And)]);
        assert_eq!(outcome.mask, vec![true, false, true]);
    }

    #[test]
    fn test_space_keyword_matches_cells_with_a_space() {
        let t = table(&["Name"], &[&["Ann Lee"], &["bob"], &[""]]);
        let outcome = build_mask(&t, &[clause("Name", " ", true, Logic::And)]);
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.mask, vec![true, false, false]);
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        // a | b & c  ==  a | (b & c)
        let t = table(
            &["A", "B", "C"],
            &[
                &["x", "", ""],
                &["", "x", ""],
                &["", "x", "x"],
                &["", "", "x"],
            ],
        );
        let clauses = [
            clause("A", "x", true, Logic::And),
            clause("B", "x", true, Logic::Or),
            clause("C", "x", true, Logic::And),
        ];
        assert_eq!(
            compile(&clauses).unwrap().to_string(),
            "mask_0 | mask_1 & mask_2"
        );
        assert_eq!(build_mask(&t, &clauses).mask, vec![true, false, true, false]);
    }

    #[test]
    fn test_parentheses_override_precedence() {
        // (a | b) & c
        let t = table(
            &["A", "B", "C"],
            &[
                &["x", "", ""],
                &["", "x", ""],
                &["", "x", "x"],
                &["x", "", "x"],
            ],
        );
        let clauses = [
            bracketed("A", "x", Logic::And, "(", ""),
            bracketed("B", "x", Logic::Or, "", ")"),
            bracketed("C", "x", Logic::And, "", ""),
        ];
        assert_eq!(
            compile(&clauses).unwrap().to_string(),
            "(mask_0 | mask_1) & mask_2"
        );
        assert_eq!(build_mask(&t, &clauses).mask, vec![false, false, true, true]);
    }

    #[test]
    fn test_nested_groups_and_not() {
        let clauses = [
            bracketed("A", "x", Logic::And, "((", ""),
            FilterClause::new("B", "y", false, Logic::Or, "", ")").unwrap(),
            bracketed("C", "z", Logic::And, "", ")"),
        ];
        assert_eq!(
            compile(&clauses).unwrap(),
            Expr::Group(Box::new(Expr::And(vec![
                Expr::Group(Box::new(Expr::Or(vec![
                    Expr::Mask(0),
                    Expr::Not(Box::new(Expr::Mask(1))),
                ]))),
                Expr::Mask(2),
            ])))
        );
    }

    #[test]
    fn test_long_chains_are_flat() {
        let t = table(&["A"], &[&["x"], &["y"]]);
        let mut clauses = vec![clause("A", "x", true, Logic::And)];
        for i in 1..50_000 {
            let logic = if i % 2 == 0 { Logic::And } else { Logic::Or };
            clauses.push(clause("A", "x", true, logic));
        }

        let expr = compile(&clauses).unwrap();
        match &expr {
            Expr::Or(terms) => assert_eq!(terms.len(), 25_001),
            other => panic!("expected an OR chain, got {other:?}"),
        }

        let outcome = build_mask(&t, &clauses);
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.mask, vec![true, false]);
    }

    #[test]
    fn test_nesting_beyond_limit_fails_closed() {
        let t = table(&["A"], &[&["x"]]);
        let deep = "(".repeat(MAX_GROUP_DEPTH + 1);
        let close = ")".repeat(MAX_GROUP_DEPTH + 1);
        let outcome = build_mask(&t, &[bracketed("A", "x", Logic::And, &deep, &close)]);
        assert_eq!(outcome.mask, vec![false]);
        assert_eq!(
            outcome.error,
            Some(FilterError::NestingTooDeep {
                clause: 1,
                limit: MAX_GROUP_DEPTH
            })
        );

        let ok = "(".repeat(MAX_GROUP_DEPTH);
        let ok_close = ")".repeat(MAX_GROUP_DEPTH);
        let outcome = build_mask(&t, &[bracketed("A", "x", Logic::And, &ok, &ok_close)]);
        assert_eq!(outcome.mask, vec![true]);
    }

    #[test]
    fn test_unbalanced_fails_closed() {
        let t = table(&["A"], &[&["x"], &["x"]]);
        let outcome = build_mask(&t, &[bracketed("A", "x", Logic::And, "(", "")]);
        assert_eq!(outcome.mask, vec![false, false]);
        assert_eq!(
            outcome.error,
            Some(FilterError::Unbalanced { open: 1, close: 0 })
        );
    }

    #[test]
    fn test_balanced_but_misnested_fails_closed() {
        let t = table(&["A", "B"], &[&["x", "y"]]);
        let clauses = [
            bracketed("A", "x", Logic::And, "", ")"),
            bracketed("B", "y", Logic::And, "(", ""),
        ];
        let outcome = build_mask(&t, &clauses);
        assert_eq!(outcome.mask, vec![false]);
        assert_eq!(
            outcome.error,
            Some(FilterError::UnexpectedClose { clause: 1 })
        );
    }

    #[test]
    fn test_unknown_column_fails_closed() {
        let t = table(&["A"], &[&["x"]]);
        let outcome = build_mask(&t, &[clause("Missing", "x", true, Logic::And)]);
        assert_eq!(outcome.mask, vec![false]);
        assert_eq!(
            outcome.error,
            Some(FilterError::UnknownColumn("Missing".to_string()))
        );
    }

    #[test]
    fn test_unknown_mask_is_reported() {
        assert_eq!(
            Expr::Mask(2).eval(&[vec![true]]),
            Err(FilterError::UnknownMask(2))
        );
    }

    #[test]
    fn test_empty_list_is_error() {
        let t = table(&["A"], &[&["x"]]);
        assert_eq!(build_mask(&t, &[]).error, Some(FilterError::EmptyFilter));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let t = table(&["A", "B"], &[&["ax", "by"], &["a", "b"], &["x", "y"]]);
        let clauses = [
            bracketed("A", "x", Logic::And, "(", ""),
            FilterClause::new("B", "y", false, Logic::Or, "", ")").unwrap(),
        ];
        let first = build_mask(&t, &clauses);
        for _ in 0..5 {
            assert_eq!(build_mask(&t, &clauses), first);
        }
    }
}
