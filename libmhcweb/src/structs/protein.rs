use seq_io::fasta::{Reader, Record};
use std::fmt::{Display, Formatter};

use crate::alphabet::{UTF8_GT, UTF8_SPACE};
use crate::error::InputError;

/// A named protein sequence read from FASTA text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protein {
    /// The sequence id: the header text up to the first space
    pub name: String,
    /// Whatever follows the id in the header
    pub details: Option<String>,
    /// The residues, with line breaks and whitespace removed
    pub sequence: String,
}

impl Protein {
    /// Parse every record in `text`.
    ///
    /// Anything before the first header line is ignored,
    /// so a stray line of residues doesn't sink the whole input.
    pub fn from_fasta_str(text: &str) -> Result<Vec<Self>, InputError> {
        let bytes = text.as_bytes();

        let start = match first_header_offset(bytes) {
            Some(offset) => offset,
            None => return Ok(vec![]),
        };

        let mut proteins = vec![];
        let mut reader = Reader::new(&bytes[start..]);

        while let Some(record) = reader.next() {
            let record = record.map_err(|e| InputError::MalformedFasta(e.to_string()))?;
            let mut header_bytes = record.head().to_vec();
            let first_space_idx = header_bytes
                .iter()
                .position(|&b| b == UTF8_SPACE || b == b'\t');

            let (name, details) = match first_space_idx {
                Some(idx) => {
                    let details_bytes = header_bytes.split_off(idx + 1);
                    header_bytes.pop();
                    (
                        utf8_string(header_bytes)?,
                        Some(utf8_string(details_bytes)?.trim().to_string()),
                    )
                }
                None => (utf8_string(header_bytes)?, None),
            };

            let mut sequence_bytes = vec![];
            for line in record.seq_lines() {
                sequence_bytes.extend(line.iter().filter(|b| !b.is_ascii_whitespace()));
            }

            proteins.push(Protein {
                name: name.trim_end().to_string(),
                details,
                sequence: utf8_string(sequence_bytes)?,
            });
        }

        Ok(proteins)
    }

    pub fn length(&self) -> usize {
        self.sequence.chars().count()
    }
}

fn first_header_offset(bytes: &[u8]) -> Option<usize> {
    if bytes.first() == Some(&UTF8_GT) {
        return Some(0);
    }
    bytes
        .windows(2)
        .position(|w| w[0] == b'\n' && w[1] == UTF8_GT)
        .map(|pos| pos + 1)
}

fn utf8_string(bytes: Vec<u8>) -> Result<String, InputError> {
    String::from_utf8(bytes)
        .map_err(|_| InputError::MalformedFasta("header or sequence is not UTF-8".to_string()))
}

impl Display for Protein {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, ">{}", self.name)?;

        if let Some(ref details) = self.details {
            write!(f, " {details}")?
        };

        writeln!(f)?;

        let mut iter = self.sequence.as_bytes().chunks(80).peekable();

        while let Some(chunk) = iter.next() {
            match std::str::from_utf8(chunk) {
                Ok(seq_line) => {
                    write!(f, "{}", seq_line)?;
                    if iter.peek().is_some() {
                        writeln!(f)?;
                    }
                }
                Err(_) => return Err(std::fmt::Error),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_parse_records() -> anyhow::Result<()> {
        let text = ">sp|P01308 Insulin precursor\nMALWMRLLPL\nLALLALWGPD\n>second\nSIINFEKL\n";
        let proteins = Protein::from_fasta_str(text)?;

        check!(proteins.len() == 2);
        check!(proteins[0].name == "sp|P01308");
        check!(proteins[0].details.as_deref() == Some("Insulin precursor"));
        check!(proteins[0].sequence == "MALWMRLLPLLALLALWGPD");
        check!(proteins[1].name == "second");
        check!(proteins[1].details == None);
        check!(proteins[1].sequence == "SIINFEKL");
        Ok(())
    }

    #[test]
    fn test_crlf_and_blank_lines() -> anyhow::Result<()> {
        let text = ">a\r\nSIIN\r\nFEKL\r\n\r\n>b\r\nGILGFVFTL\r\n";
        let proteins = Protein::from_fasta_str(text)?;

        check!(proteins.len() == 2);
        check!(proteins[0].name == "a");
        check!(proteins[0].sequence == "SIINFEKL");
        check!(proteins[1].sequence == "GILGFVFTL");
        Ok(())
    }

    #[test]
    fn test_leading_text_is_ignored() -> anyhow::Result<()> {
        let proteins = Protein::from_fasta_str("junk line\n>a\nSIINFEKL")?;
        check!(proteins.len() == 1);
        check!(proteins[0].sequence == "SIINFEKL");
        Ok(())
    }

    #[test]
    fn test_no_header_line() {
        let_assert!(Ok(proteins) = Protein::from_fasta_str("SIIN>FEKL"));
        check!(proteins.is_empty());
    }

    #[test]
    fn test_display() -> anyhow::Result<()> {
        let protein = Protein {
            name: "a".to_string(),
            details: Some("desc".to_string()),
            sequence: "A".repeat(100),
        };
        let text = protein.to_string();
        check!(text.lines().count() == 3);
        check!(Protein::from_fasta_str(&text)? == vec![protein]);
        Ok(())
    }
}
