use location_core::Row;

/// Lay rows out as two columns, labels padded to the widest one.
pub fn table(rows: &[Row]) -> String {
    let width = rows
        .iter()
        .map(|row| row.label.chars().count())
        .max()
        .unwrap_or(0);

    rows.iter()
        .map(|row| format!("{:<width$}  {}\n", row.label, row.value))
        .collect()
}
