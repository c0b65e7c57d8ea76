use super::clause::FilterClause;
use super::error::FilterError;

/// Net bracket count: `(` in all prefixes minus `)` in all suffixes.
/// Positive means unclosed groups, negative means stray closers.
pub fn bracket_balance(clauses: &[FilterClause]) -> i64 {
    clauses
        .iter()
        .map(|c| c.opens() as i64 - c.closes() as i64)
        .sum()
}

/// Count-only check gating execution: every `(` has a `)` somewhere.
///
/// Positions are not considered, so a close-before-open arrangement still
/// passes; [`check_nesting`] catches those.
pub fn brackets_balanced(clauses: &[FilterClause]) -> bool {
    bracket_balance(clauses) == 0
}

/// Stack check over the clause sequence: no group is closed before it is
/// opened and every group is closed by the end.
pub fn check_nesting(clauses: &[FilterClause]) -> Result<(), FilterError> {
    let mut depth = 0usize;
    let mut unclosed_from = None;

    for (i, clause) in clauses.iter().enumerate() {
        if clause.opens() > 0 && depth == 0 {
            unclosed_from = Some(i);
        }
        depth += clause.opens();
        depth = depth
            .checked_sub(clause.closes())
            .ok_or(FilterError::UnexpectedClose { clause: i + 1 })?;
    }

    match (depth, unclosed_from) {
        (0, _) => Ok(()),
        (count, first) => Err(FilterError::UnclosedGroup {
            clause: first.unwrap_or(0) + 1,
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::clause::Logic;

    fn clause(prefix: &str, suffix: &str) -> FilterClause {
        FilterClause::new("A", "x", true, Logic::And, prefix, suffix).unwrap()
    }

    #[test]
    fn test_empty_list_is_balanced() {
        assert!(brackets_balanced(&[]));
        assert!(check_nesting(&[]).is_ok());
    }

    #[test]
    fn test_balance_counts_across_clauses() {
        let clauses = [clause("((", ""), clause("", ""), clause("", "))")];
        assert!(brackets_balanced(&clauses));
        assert!(check_nesting(&clauses).is_ok());
    }

    #[test]
    fn test_unbalanced_reports_net_count() {
        let clauses = [clause("((", ""), clause("", ")")];
        assert!(!brackets_balanced(&clauses));
        assert_eq!(bracket_balance(&clauses), 1);
        assert_eq!(bracket_balance(&[clause("", ")")]), -1);
    }

    #[test]
    fn test_close_before_open_passes_count_but_fails_nesting() {
        let clauses = [clause("", ")"), clause("(", "")];
        assert!(brackets_balanced(&clauses));
        assert_eq!(
            check_nesting(&clauses),
            Err(FilterError::UnexpectedClose { clause: 1 })
        );
    }

    #[test]
    fn test_unclosed_group_names_first_opener() {
        let clauses = [clause("", ""), clause("(", ""), clause("(", ")")];
        assert_eq!(
            check_nesting(&clauses),
            Err(FilterError::UnclosedGroup {
                clause: 2,
                count: 1
            })
        );
    }

    #[test]
    fn test_count_check_matches_totals() {
        let cases: &[&[(&str, &str)]] = &[
            &[("(", ")")],
            &[("((", ")"), ("", ")")],
            &[("(", ""), ("(", "))"), ("", ")")],
            &[("", ""), ("(((", ")"), ("", "")],
        ];
        for case in cases {
            let clauses: Vec<_> = case.iter().map(|(p, s)| clause(p, s)).collect();
            let opens: usize = case.iter().map(|(p, _)| p.len()).sum();
            let closes: usize = case.iter().map(|(_, s)| s.len()).sum();
            assert_eq!(brackets_balanced(&clauses), opens == closes, "{case:?}");
        }
    }
}
