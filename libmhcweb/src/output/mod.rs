pub mod output_tabular;
pub mod output_tsv;

pub use output_tabular::{tabulate, Cell, Column, WideResultTable, WideRow};
pub use output_tsv::{allele_listing, predictions_tsv};
