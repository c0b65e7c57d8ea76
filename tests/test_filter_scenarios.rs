use sheet_sieve::data::header::{HeaderSpec, build_table, fix_header};
use sheet_sieve::data::model::{CellValue, RawSheet, Table};
use sheet_sieve::filter::{
    FilterAction, FilterClause, FilterList, Logic, apply_filter, brackets_balanced, build_mask,
    readable_expression,
};

fn text(s: &str) -> CellValue {
    CellValue::String(s.to_string())
}

fn names_table() -> Table {
    Table::new(
        vec!["Name".to_string()],
        vec![vec![text("Alice")], vec![text("bob")], vec![text("ALICE")]],
    )
}

#[test]
fn test_keyword_match_ignores_case() {
    let clauses = [FilterClause::new("Name", "alice", true, Logic::And, "", "").unwrap()];
    let outcome = build_mask(&names_table(), &clauses);
    assert_eq!(outcome.mask, vec![true, false, true]);
    assert!(outcome.error.is_none());
}

#[test]
fn test_readable_expression_skips_first_logic() {
    let clauses = [
        FilterClause::new("A", "x", true, Logic::And, "", "").unwrap(),
        FilterClause::new("B", "y", false, Logic::Or, "", "").unwrap(),
    ];
    assert_eq!(
        readable_expression(&clauses),
        "A like '*x*' OR B not like '*y*'"
    );
}

#[test]
fn test_bracket_check_counts_without_nesting() {
    let clauses = [
        FilterClause::new("A", "x", true, Logic::And, "((", "").unwrap(),
        FilterClause::new("B", "y", true, Logic::And, "", "").unwrap(),
        FilterClause::new("C", "z", true, Logic::Or, "", "))").unwrap(),
    ];
    assert!(brackets_balanced(&clauses));
}

#[test]
fn test_removing_middle_clause_shifts_the_last_one() {
    let last = FilterClause::new("C", "z", false, Logic::Or, "(", ")").unwrap();
    let list = FilterList::from(vec![
        FilterClause::new("A", "x", true, Logic::And, "", "").unwrap(),
        FilterClause::new("B", "y", true, Logic::And, "", "").unwrap(),
        last.clone(),
    ]);

    let next = list.reduce(&FilterAction::Remove(1)).unwrap();
    assert_eq!(next.len(), 2);
    assert_eq!(next.clauses()[1], last);
    assert_eq!(list.len(), 3);
}

#[test]
fn test_empty_filter_is_identity() {
    let table = names_table();
    let outcome = apply_filter(&table, &[]);
    assert_eq!(outcome.table, table);
}

#[test]
fn test_merged_header_sheet_end_to_end() {
    let sheet = RawSheet::new(
        "Orders",
        vec![
            vec![text("Export"), CellValue::Null, CellValue::Null],
            vec![text("Customer"), text("Customer"), text("nan")],
            vec![text("Name"), text("City"), CellValue::Null],
            vec![text("Alice 1"), text("Oslo"), text("urgent")],
            vec![text("bob 2"), text("Bergen"), CellValue::Null],
            vec![text("ALICE 3"), text("Bergen"), text("gift wrap")],
        ],
    );
    assert_eq!(fix_header(&sheet.rows[1]), vec!["Customer", "Customer_2", "Unnamed: 3"]);

    let table = build_table(&sheet, HeaderSpec::Merged { upper: 1, lower: 2 }).unwrap();
    assert_eq!(table.columns, vec!["Name", "City", "Unnamed: 3"]);

    // (Name ~ alice AND City ~ bergen) OR Unnamed: 3 ~ urgent
    let clauses = [
        FilterClause::new("Name", "alice", true, Logic::And, "(", "").unwrap(),
        FilterClause::new("City", "bergen", true, Logic::And, "", ")").unwrap(),
        FilterClause::new("Unnamed: 3", "urgent", true, Logic::Or, "", "").unwrap(),
    ];
    let outcome = apply_filter(&table, &clauses);
    assert!(outcome.error.is_none());
    assert_eq!(outcome.row_count(), 2);
    assert_eq!(outcome.table.cell_text(0, 0), "Alice 1");
    assert_eq!(outcome.table.cell_text(1, 0), "ALICE 3");
}

#[test]
fn test_every_deduplicated_column_is_filterable() {
    let sheet = RawSheet::new(
        "Sheet1",
        vec![
            vec![text("A"), text("A"), text("A_2")],
            vec![text("x"), text("y"), text("z")],
        ],
    );
    let table = build_table(&sheet, HeaderSpec::Single { row: 0 }).unwrap();
    assert_eq!(table.columns, vec!["A", "A_3", "A_2"]);

    let clauses = [FilterClause::new("A_2", "z", true, Logic::And, "", "").unwrap()];
    let outcome = apply_filter(&table, &clauses);
    assert!(outcome.error.is_none());
    assert_eq!(outcome.row_count(), 1);

    let clauses = [FilterClause::new("A_3", "y", true, Logic::And, "", "").unwrap()];
    assert_eq!(apply_filter(&table, &clauses).row_count(), 1);
}
