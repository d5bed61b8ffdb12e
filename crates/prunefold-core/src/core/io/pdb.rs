use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Shortest line that still holds the three coordinate fields.
const MIN_ATOM_LINE_LEN: usize = 54;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for an ATOM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_coordinate(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Left-justifies single-letter-element names from column 14, as PDB files do.
fn format_atom_name(name: &str) -> String {
    if name.len() >= 4 {
        name.to_string()
    } else {
        format!(" {:<3}", name)
    }
}

/// Fixed-column Protein Data Bank coordinate files.
///
/// Only `ATOM` records of the first model are read; `HETATM`, connectivity and header
/// records are skipped. Atoms are numbered from 1 in file order, regardless of the serial
/// numbers written in the file.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Atom>, Self::Error> {
        let mut atoms = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "ATOM" => {
                    if line.len() < MIN_ATOM_LINE_LEN {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let name = slice_and_trim(&line, 12, 16);
                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    let x = parse_coordinate(&line, line_num, 30, 38)?;
                    let y = parse_coordinate(&line, line_num, 38, 46)?;
                    let z = parse_coordinate(&line, line_num, 46, 54)?;

                    atoms.push(Atom::new(name, atoms.len() + 1, Point3::new(x, y, z)));
                }
                "ENDMDL" => break,
                _ => {}
            }
        }

        if atoms.is_empty() {
            return Err(PdbError::MissingRecord("ATOM records".into()));
        }
        Ok(atoms)
    }

    fn write_to(atoms: &[Atom], writer: &mut impl Write) -> Result<(), Self::Error> {
        for atom in atoms {
            let residue_number = (atom.index().saturating_sub(1)) / 3 + 1;
            let element = atom
                .name()
                .chars()
                .find(|c| c.is_ascii_alphabetic())
                .unwrap_or('X');
            let position = atom.position();
            writeln!(
                writer,
                "{:<6}{:>5} {:<4} {:>3} {:1}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                "ATOM",
                atom.index(),
                format_atom_name(atom.name()),
                "UNK",
                'A',
                residue_number,
                position.x,
                position.y,
                position.z,
                1.0,
                0.0,
                element
            )?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}
