mod dispatch;
pub use dispatch::*;

mod fasta;
pub use fasta::*;

mod peptides;
pub use peptides::*;
