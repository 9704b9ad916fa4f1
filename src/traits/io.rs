//! Matrix input/output
use crate::types::Result;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub trait SparseIO: Sized {
    //! Sparse matrix persistence in a binary and a text format

    /// Write in the binary format
    fn write_binary<W: Write>(&self, writer: W) -> Result<()>;

    /// Read from the binary format
    fn read_binary<R: Read>(reader: R) -> Result<Self>;

    /// Generate the text format
    fn to_ascii_string(&self) -> String;

    /// Parse the text format
    fn from_ascii_str(text: &str) -> Result<Self>;

    /// Save in the binary format
    fn save_binary<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_binary(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Load from the binary format
    fn load_binary<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read_binary(BufReader::new(File::open(path)?))
    }

    /// Save in the text format
    fn save_ascii<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_ascii_string())?;
        Ok(())
    }

    /// Load from the text format
    fn load_ascii<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_ascii_str(&fs::read_to_string(path)?)
    }
}
