use crate::core::models::atom::Atom;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing atom coordinate files.
///
/// Implementors handle the format-specific parsing and serialization of an ordered
/// list of labeled positions; indices are assigned by the reader in file order.
pub trait StructureFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads the atoms of a structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<Atom>, Self::Error>;

    /// Writes an ordered chain of atoms to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(atoms: &[Atom], writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads the atoms of a structure from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Atom>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes an ordered chain of atoms to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(atoms: &[Atom], path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(atoms, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
