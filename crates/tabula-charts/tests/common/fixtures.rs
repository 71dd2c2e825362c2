//! Shared row fixtures

use tabula_charts::{ChartCounts, GroupValue, GroupedRow, MeasureRow, VariableRoles};

/// Sparse rows where series 2 never saw category 2
#[allow(dead_code)]
pub fn sparse_rows() -> Vec<GroupedRow> {
    vec![
        GroupedRow::new(1, 1, 1, 56.0),
        GroupedRow::new(1, 1, 2, 103.0),
        GroupedRow::new(1, 2, 1, 13.0),
    ]
}

/// Record count for the single chart in [`sparse_rows`]
#[allow(dead_code)]
pub fn sparse_counts() -> ChartCounts {
    ChartCounts::from([(GroupValue::PLACEHOLDER, 533)])
}

/// Two charts, two series and three categories with gaps in each
#[allow(dead_code)]
pub fn two_chart_rows() -> (Vec<GroupedRow>, ChartCounts) {
    let rows = vec![
        GroupedRow::new("North", "Female", "Arts", 4.0),
        GroupedRow::new("North", "Female", "Science", 7.0),
        GroupedRow::new("North", "Male", "Law", 2.0),
        GroupedRow::new("South", "Female", "Law", 9.0),
        GroupedRow::new("South", "Male", "Arts", 1.0),
    ];
    let counts = ChartCounts::from([
        (GroupValue::from("North"), 13),
        (GroupValue::from("South"), 10),
    ]);
    (rows, counts)
}

#[allow(dead_code)]
pub fn roles() -> VariableRoles {
    VariableRoles::default()
        .with_category("Faculty")
        .with_series("Gender")
        .with_chart("Region")
}

/// Ages per (gender, country) for boxplots; Male in NZ is empty
#[allow(dead_code)]
pub fn age_rows() -> Vec<MeasureRow> {
    let mut rows = Vec::new();
    for age in [21.0, 25.0, 30.0, 34.0, 41.0] {
        rows.push(MeasureRow::new("Female", "NZ", age));
    }
    for age in [19.0, 22.0, 28.0, 33.0] {
        rows.push(MeasureRow::new("Female", "UK", age));
    }
    for age in [40.0, 45.0, 47.0, 52.0, 58.0, 60.0] {
        rows.push(MeasureRow::new("Male", "UK", age));
    }
    rows
}
