use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DietError, Result};
use crate::models::{RawFoodRow, RawTable};
use crate::planner::constants::{
    DEFAULT_COST_COLUMN, DEFAULT_FOOD_COLUMN, DEFAULT_SERVING_COLUMN, MAXIMUM_ROW_LABEL,
    MINIMUM_ROW_LABEL,
};

/// Names of the non-nutrient columns. Every other column is a nutrient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    pub food_column: String,
    pub cost_column: String,
    pub serving_column: String,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            food_column: DEFAULT_FOOD_COLUMN.to_string(),
            cost_column: DEFAULT_COST_COLUMN.to_string(),
            serving_column: DEFAULT_SERVING_COLUMN.to_string(),
        }
    }
}

/// Load a diet table from a CSV file.
pub fn load_table<P: AsRef<Path>>(path: P, layout: &TableLayout) -> Result<RawTable> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    read_records(reader, layout)
}

/// Parse a diet table from any CSV source.
///
/// Bound rows are the ones whose food cell starts with "Minimum"/"Maximum".
/// Without such labels the last two rows with an empty food cell are taken,
/// minimum first. Blank lines are ignored.
pub fn read_table<R: io::Read>(source: R, layout: &TableLayout) -> Result<RawTable> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    read_records(reader, layout)
}

fn read_records<R: io::Read>(mut reader: csv::Reader<R>, layout: &TableLayout) -> Result<RawTable> {
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let find = |name: &str| headers.iter().position(|h| h == name);
    let food_idx = find(&layout.food_column)
        .ok_or_else(|| DietError::invalid_data("header", format!("missing column '{}'", layout.food_column)))?;
    let cost_idx = find(&layout.cost_column)
        .ok_or_else(|| DietError::invalid_data("header", format!("missing column '{}'", layout.cost_column)))?;
    let serving_idx = find(&layout.serving_column);

    let nutrient_idx: Vec<usize> = (0..headers.len())
        .filter(|i| *i != food_idx && *i != cost_idx && Some(*i) != serving_idx)
        .filter(|i| !headers[*i].is_empty())
        .collect();

    let mut rows = Vec::new();
    let mut minimum = None;
    let mut maximum = None;

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
        let name = cell(food_idx);
        let nutrients: Vec<String> = nutrient_idx.iter().map(|idx| cell(*idx)).collect();

        let label = name.to_lowercase();
        if label.starts_with(MINIMUM_ROW_LABEL) {
            minimum = Some(nutrients);
        } else if label.starts_with(MAXIMUM_ROW_LABEL) {
            maximum = Some(nutrients);
        } else {
            rows.push(RawFoodRow {
                row: i + 1,
                name,
                cost: cell(cost_idx),
                serving_size: serving_idx.map(cell).unwrap_or_default(),
                nutrients,
            });
        }
    }

    if minimum.is_none() && maximum.is_none() {
        let unnamed: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.name.is_empty())
            .map(|(i, _)| i)
            .collect();
        if let [.., min_pos, max_pos] = unnamed[..] {
            debug!("Using unlabelled rows {} and {} as bounds", rows[min_pos].row, rows[max_pos].row);
            maximum = Some(rows.remove(max_pos).nutrients);
            minimum = Some(rows.remove(min_pos).nutrients);
        }
    }

    let minimum = minimum.ok_or_else(|| DietError::invalid_data("table", "missing Minimum bound row"))?;
    let maximum = maximum.ok_or_else(|| DietError::invalid_data("table", "missing Maximum bound row"))?;

    debug!("Read {} food rows, {} nutrient columns", rows.len(), nutrient_idx.len());
    Ok(RawTable {
        cost_column: layout.cost_column.clone(),
        nutrient_columns: nutrient_idx.iter().map(|i| headers[*i].clone()).collect(),
        rows,
        minimum,
        maximum,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const TABLE: &str = "\
Foods,Price/ Serving,Serving Size,Calories,Protein g
Frozen Broccoli,0.16,10 Oz Pkg,73.8,8
\"Celery, Raw\",0.04,1 Stalk,6.4,0.3
,,,,
Minimum daily intake,,,1500,60
Maximum daily intake,,,2500,100
";

    #[test]
    fn test_read_labelled_bounds() {
        let table = read_table(TABLE.as_bytes(), &TableLayout::default()).unwrap();
        assert_eq!(table.nutrient_columns, vec!["Calories", "Protein g"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].name, "Celery, Raw");
        assert_eq!(table.rows[1].serving_size, "1 Stalk");
        assert_eq!(table.rows[1].row, 2);
        assert_eq!(table.minimum, vec!["1500", "60"]);
        assert_eq!(table.maximum, vec!["2500", "100"]);
    }

    #[test]
    fn test_read_unlabelled_bounds() {
        let csv = "\
 Foods ,Price/ Serving,Iron mg
Tofu,0.3,2
,,10
,,40
";
        let table = read_table(csv.as_bytes(), &TableLayout::default()).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.minimum, vec!["10"]);
        assert_eq!(table.maximum, vec!["40"]);
    }

    #[test]
    fn test_missing_columns_and_rows() {
        let err = read_table("Name,Price\nTofu,1\n".as_bytes(), &TableLayout::default()).unwrap_err();
        assert!(err.to_string().contains("Foods"));

        let err = read_table("Foods,Price/ Serving,X\nTofu,1,2\n".as_bytes(), &TableLayout::default())
            .unwrap_err();
        assert!(err.to_string().contains("Minimum"));
    }

    #[test]
    fn test_custom_layout() {
        let csv = "Item,Cost,Fiber\nOats,0.2,4\nMinimum,,25\nMaximum,,\n";
        let layout = TableLayout {
            food_column: "Item".to_string(),
            cost_column: "Cost".to_string(),
            serving_column: "Portion".to_string(),
        };
        let table = read_table(csv.as_bytes(), &layout).unwrap();
        assert_eq!(table.cost_column, "Cost");
        assert_eq!(table.nutrient_columns, vec!["Fiber"]);
        assert_eq!(table.rows[0].serving_size, "");
        assert_eq!(table.maximum, vec![""]);
    }

    #[test]
    fn test_load_table_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();
        let table = load_table(file.path(), &TableLayout::default()).unwrap();
        assert_eq!(table.rows.len(), 2);
    }
}
