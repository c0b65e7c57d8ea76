//! Keyword filter expressions over a [`Table`](crate::data::model::Table).
//!
//! A filter is an ordered list of clauses. Each clause tests whether a
//! column contains a keyword (case-insensitive), optionally negated, and
//! joins the previous clause with AND or OR. Clauses may open groups with
//! `(` prefixes and close them with `)` suffixes.
//!
//! ```text
//!   FilterList ──reduce(action)──▶ FilterList'      (clause)
//!        │
//!        ├── brackets_balanced / check_nesting      (brackets)
//!        ├── readable_expression                    (render)
//!        ▼
//!   compile ─▶ Expr ─eval(masks)─▶ row mask          (expr)
//!        │
//!        ▼
//!   apply_filter ─▶ FilterOutcome                    (apply)
//! ```

pub mod apply;
pub mod brackets;
pub mod clause;
pub mod error;
pub mod expr;
pub mod preset;
pub mod render;

pub use apply::{FilterOutcome, apply_filter};
pub use brackets::{bracket_balance, brackets_balanced, check_nesting};
pub use clause::{FilterAction, FilterClause, FilterList, Logic};
pub use error::FilterError;
pub use expr::{Expr, MAX_GROUP_DEPTH, MaskOutcome, build_mask, compile};
pub use render::readable_expression;
