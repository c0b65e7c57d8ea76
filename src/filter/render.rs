use super::clause::FilterClause;

fn describe(clause: &FilterClause) -> String {
    let op = if clause.include { "like" } else { "not like" };
    format!(
        "{}{} {op} '*{}*'{}",
        clause.prefix, clause.column, clause.keyword, clause.suffix
    )
}

/// SQL-flavoured text of the filter logic, e.g.
/// `(A like '*x*' OR B not like '*y*') AND C like '*z*'`.
///
/// Pure formatting: the brackets are shown as entered, balanced or not.
pub fn readable_expression(clauses: &[FilterClause]) -> String {
    let mut out = String::new();
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            out.push(' ');
            out.push_str(clause.logic.as_str());
            out.push(' ');
        }
        out.push_str(&describe(clause));
    }
    out
}
