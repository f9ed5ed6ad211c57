use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use indexmap::{IndexMap, IndexSet};

use crate::structs::PredictionRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Peptide,
    Length,
    TightestAffinity,
    /// An affinity column; the index into [`WideResultTable::alleles`]
    Allele(usize),
}

/// A single value in a [`WideResultTable`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Count(usize),
    Affinity(Option<f64>),
}

impl Display for Cell<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(text) => write!(f, "{text}"),
            Cell::Count(count) => write!(f, "{count}"),
            Cell::Affinity(Some(affinity)) => write!(f, "{affinity:.2}"),
            Cell::Affinity(None) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub peptide: String,
    pub length: usize,
    /// Only present when the table has more than one allele column
    pub tightest_affinity: Option<f64>,
    /// One entry per allele column, `None` where the pair wasn't predicted
    pub affinities: Vec<Option<f64>>,
}

impl WideRow {
    /// The lowest affinity across every allele, ignoring missing cells.
    pub fn best_affinity(&self) -> Option<f64> {
        self.affinities
            .iter()
            .flatten()
            .copied()
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn cell(&self, column: &Column) -> Cell<'_> {
        match column {
            Column::Peptide => Cell::Text(&self.peptide),
            Column::Length => Cell::Count(self.length),
            Column::TightestAffinity => Cell::Affinity(self.tightest_affinity),
            Column::Allele(idx) => Cell::Affinity(self.affinities.get(*idx).copied().flatten()),
        }
    }
}

/// Predictions pivoted to one row per peptide and one column per allele.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WideResultTable {
    pub alleles: Vec<String>,
    pub rows: Vec<WideRow>,
}

impl WideResultTable {
    pub fn has_tightest_affinity(&self) -> bool {
        self.alleles.len() > 1
    }

    pub fn columns(&self) -> Vec<Column> {
        let mut columns = vec![Column::Peptide, Column::Length];
        if self.has_tightest_affinity() {
            columns.push(Column::TightestAffinity);
        }
        columns.extend((0..self.alleles.len()).map(Column::Allele));
        columns
    }

    pub fn column_label(&self, column: &Column) -> &str {
        match column {
            Column::Peptide => "peptide",
            Column::Length => "length",
            Column::TightestAffinity => "tightest_affinity",
            Column::Allele(idx) => self.alleles.get(*idx).map_or("", String::as_str),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Pivot long-format predictions into a [`WideResultTable`].
///
/// Repeated peptide/allele pairs keep their first affinity. Rows and
/// allele columns follow first-seen order before rows are sorted
/// (stably) by their best affinity; rows with no affinity go last.
pub fn tabulate(records: &[PredictionRecord]) -> WideResultTable {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut alleles: IndexSet<&str> = IndexSet::new();
    let mut affinities_by_peptide: IndexMap<&str, Vec<Option<f64>>> = IndexMap::new();

    records
        .iter()
        .filter(|r| seen.insert((r.peptide.as_str(), r.allele.as_str())))
        .for_each(|r| {
            let (allele_idx, _) = alleles.insert_full(r.allele.as_str());
            let affinities = affinities_by_peptide.entry(r.peptide.as_str()).or_default();
            if affinities.len() <= allele_idx {
                affinities.resize(allele_idx + 1, None);
            }
            affinities[allele_idx] = Some(r.affinity);
        });

    let multiple_alleles = alleles.len() > 1;

    let mut rows: Vec<WideRow> = affinities_by_peptide
        .into_iter()
        .map(|(peptide, mut affinities)| {
            affinities.resize(alleles.len(), None);
            let mut row = WideRow {
                peptide: peptide.to_string(),
                length: peptide.chars().count(),
                tightest_affinity: None,
                affinities,
            };
            if multiple_alleles {
                row.tightest_affinity = row.best_affinity();
            }
            row
        })
        .collect();

    rows.sort_by(|a, b| match (a.best_affinity(), b.best_affinity()) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    WideResultTable {
        alleles: alleles.into_iter().map(str::to_string).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    fn record(peptide: &str, allele: &str, affinity: f64) -> PredictionRecord {
        PredictionRecord::new(peptide, allele, affinity)
    }

    fn peptides(table: &WideResultTable) -> Vec<&str> {
        table.rows.iter().map(|r| r.peptide.as_str()).collect()
    }

    #[test]
    fn test_single_allele() {
        let table = tabulate(&[
            record("SIINFEKL", "H-2-Kb", 300.0),
            record("GILGFVFTL", "H-2-Kb", 20.0),
        ]);

        check!(!table.has_tightest_affinity());
        check!(table.columns() == vec![Column::Peptide, Column::Length, Column::Allele(0)]);
        check!(peptides(&table) == vec!["GILGFVFTL", "SIINFEKL"]);
        check!(table.rows.iter().all(|r| r.tightest_affinity.is_none()));
        check!(table.rows[0].length == 9);
    }

    #[test]
    fn test_multiple_alleles() {
        let table = tabulate(&[
            record("SIINFEKL", "HLA-A*02:01", 300.0),
            record("SIINFEKL", "HLA-B*07:02", 5.0),
            record("GILGFVFTL", "HLA-A*02:01", 20.0),
            record("GILGFVFTL", "HLA-B*07:02", 800.0),
        ]);

        check!(table.has_tightest_affinity());
        check!(
            table.columns()
                == vec![
                    Column::Peptide,
                    Column::Length,
                    Column::TightestAffinity,
                    Column::Allele(0),
                    Column::Allele(1)
                ]
        );
        check!(table.alleles == vec!["HLA-A*02:01", "HLA-B*07:02"]);
        check!(peptides(&table) == vec!["SIINFEKL", "GILGFVFTL"]);
        check!(table.rows[0].tightest_affinity == Some(5.0));
        check!(table.rows[1].tightest_affinity == Some(20.0));
        check!(table.rows[1].affinities == vec![Some(20.0), Some(800.0)]);
    }

    #[test]
    fn test_duplicates_keep_first() {
        let table = tabulate(&[
            record("SIINFEKL", "H-2-Kb", 300.0),
            record("SIINFEKL", "H-2-Kb", 1.0),
        ]);

        check!(table.len() == 1);
        check!(table.rows[0].affinities == vec![Some(300.0)]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let table = tabulate(&[
            record("CCCCCCCC", "A", 10.0),
            record("AAAAAAAA", "A", 10.0),
            record("BBBBBBBB", "A", 10.0),
            record("CCCCCCCC", "B", 50.0),
        ]);

        check!(peptides(&table) == vec!["CCCCCCCC", "AAAAAAAA", "BBBBBBBB"]);
    }

    #[test]
    fn test_missing_cells() {
        let table = tabulate(&[
            record("SIINFEKL", "A", 300.0),
            record("GILGFVFTL", "B", 40.0),
        ]);

        check!(peptides(&table) == vec!["GILGFVFTL", "SIINFEKL"]);
        check!(table.rows[0].affinities == vec![None, Some(40.0)]);
        check!(table.rows[1].affinities == vec![Some(300.0), None]);
        check!(table.rows[1].tightest_affinity == Some(300.0));
        check!(table.rows[0].cell(&Column::Allele(0)) == Cell::Affinity(None));
        check!(table.rows[0].cell(&Column::Allele(0)).to_string() == "");
    }

    #[test]
    fn test_reordering_input_gives_same_rows() {
        let records = vec![
            record("SIINFEKL", "A", 300.0),
            record("GILGFVFTL", "A", 20.0),
            record("NLVPMVATV", "A", 90.0),
            record("SIINFEKL", "B", 2.0),
            record("GILGFVFTL", "B", 700.0),
            record("NLVPMVATV", "B", 91.0),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let forward = tabulate(&records);
        let backward = tabulate(&reversed);

        check!(peptides(&forward) == peptides(&backward));
        check!(
            forward
                .rows
                .iter()
                .map(|r| r.tightest_affinity)
                .collect::<Vec<_>>()
                == backward
                    .rows
                    .iter()
                    .map(|r| r.tightest_affinity)
                    .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_labels_and_cells() {
        let table = tabulate(&[record("SIINFEKL", "H-2-Kb", 12.3456)]);
        let labels: Vec<_> = table
            .columns()
            .iter()
            .map(|c| table.column_label(c).to_string())
            .collect();
        let cells: Vec<_> = table
            .columns()
            .iter()
            .map(|c| table.rows[0].cell(c).to_string())
            .collect();

        check!(labels == vec!["peptide", "length", "H-2-Kb"]);
        check!(cells == vec!["SIINFEKL", "8", "12.35"]);
    }

    #[test]
    fn test_out_of_range_allele_column() {
        let table = tabulate(&[record("SIINFEKL", "H-2-Kb", 12.0)]);
        check!(table.column_label(&Column::Allele(0)) == "H-2-Kb");
        check!(table.column_label(&Column::Allele(5)) == "");
        check!(table.rows[0].cell(&Column::Allele(5)) == Cell::Affinity(None));
    }

    #[test]
    fn test_empty() {
        let table = tabulate(&[]);
        check!(table.is_empty());
        check!(table.columns() == vec![Column::Peptide, Column::Length]);
    }
}
