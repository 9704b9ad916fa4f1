//! Binary and text persistence of sparse matrices
//!
//! The binary format is a little-endian `u32` row count and `u32` column count followed by
//! `(u32 row, u32 column, f64 value)` triplets until the end of the stream. The text format
//! has a `rows cols` header line followed by one `row col value` line per entry, with indices
//! starting at one.
use crate::linalg::SparseMatrix;
use crate::traits::SparseIO;
use crate::types::{Error, Result};
use std::io::{ErrorKind, Read, Write};

fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| Error::Unsupported(format!("index {value} does not fit the binary format")))
}

/// Fill `buffer`; returns false if the stream ended before the first byte
fn read_record<R: Read>(reader: &mut R, buffer: &mut [u8]) -> Result<bool> {
    let len = buffer.len();
    let (first, rest) = buffer.split_at_mut(1);
    match reader.read_exact(first) {
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(false),
        other => other?,
    }
    reader.read_exact(rest).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => Error::Parse(format!("truncated record of {len} bytes")),
        _ => Error::Io(e),
    })?;
    Ok(true)
}

fn u32_at(bytes: &[u8], offset: usize) -> usize {
    let mut word = [0; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word) as usize
}

fn check_index(row: usize, col: usize, shape: [usize; 2]) -> Result<()> {
    if row < shape[0] && col < shape[1] {
        Ok(())
    } else {
        Err(Error::Parse(format!(
            "entry ({row}, {col}) outside a {}x{} matrix",
            shape[0], shape[1]
        )))
    }
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, line: usize) -> Result<T> {
    field
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| Error::Parse(format!("malformed line {line}")))
}

impl SparseIO for SparseMatrix {
    fn write_binary<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&to_u32(self.shape[0])?.to_le_bytes())?;
        writer.write_all(&to_u32(self.shape[1])?.to_le_bytes())?;
        for (row, col, value) in self.triplets() {
            writer.write_all(&to_u32(row)?.to_le_bytes())?;
            writer.write_all(&to_u32(col)?.to_le_bytes())?;
            writer.write_all(&value.to_le_bytes())?;
        }
        Ok(())
    }

    fn read_binary<R: Read>(mut reader: R) -> Result<Self> {
        let mut header = [0; 8];
        if !read_record(&mut reader, &mut header)? {
            return Err(Error::Parse("missing header".to_string()));
        }
        let shape = [u32_at(&header, 0), u32_at(&header, 4)];
        let mut out = SparseMatrix::new(shape);
        let mut record = [0; 16];
        while read_record(&mut reader, &mut record)? {
            let (row, col) = (u32_at(&record, 0), u32_at(&record, 4));
            check_index(row, col, shape)?;
            let mut value = [0; 8];
            value.copy_from_slice(&record[8..]);
            out.push(row, col, f64::from_le_bytes(value));
        }
        Ok(out)
    }

    fn to_ascii_string(&self) -> String {
        let mut out = format!("{} {}\n", self.shape[0], self.shape[1]);
        for (row, col, value) in self.triplets() {
            out.push_str(&format!("{} {} {:.16e}\n", row + 1, col + 1, value));
        }
        out
    }

    fn from_ascii_str(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(n, l)| (n + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());
        let (n, header) = lines
            .next()
            .ok_or_else(|| Error::Parse("missing header".to_string()))?;
        let mut fields = header.split_whitespace();
        let shape = [
            parse_field::<usize>(fields.next(), n)?,
            parse_field::<usize>(fields.next(), n)?,
        ];
        let mut out = SparseMatrix::new(shape);
        for (n, line) in lines {
            let mut fields = line.split_whitespace();
            let row = parse_field::<usize>(fields.next(), n)?;
            let col = parse_field::<usize>(fields.next(), n)?;
            let value = parse_field::<f64>(fields.next(), n)?;
            if row == 0 || col == 0 {
                return Err(Error::Parse(format!("index 0 on line {n}")));
            }
            check_index(row - 1, col - 1, shape)?;
            out.push(row - 1, col - 1, value);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::*;

    fn example() -> SparseMatrix {
        let mut m = SparseMatrix::new([4, 3]);
        m.push(0, 0, 1.0);
        m.push(3, 2, -2.5e-7);
        m.push(1, 2, std::f64::consts::PI);
        m
    }

    #[test]
    fn test_binary_round_trip() {
        let m = example();
        let mut bytes = vec![];
        m.write_binary(&mut bytes).unwrap();
        assert_eq!(bytes.len(), 8 + 3 * 16);
        let back = SparseMatrix::read_binary(bytes.as_slice()).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_truncated_binary() {
        let mut bytes = vec![];
        example().write_binary(&mut bytes).unwrap();
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(
            SparseMatrix::read_binary(bytes.as_slice()),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_empty_binary() {
        assert!(matches!(
            SparseMatrix::read_binary(std::io::empty()),
            Err(Error::Parse(_))
        ));
        let mut bytes = vec![];
        SparseMatrix::new([2, 5]).write_binary(&mut bytes).unwrap();
        let back = SparseMatrix::read_binary(bytes.as_slice()).unwrap();
        assert_eq!(back.shape, [2, 5]);
        assert_eq!(back.nnz(), 0);
        bytes.truncate(5);
        assert!(matches!(
            SparseMatrix::read_binary(bytes.as_slice()),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_ascii_round_trip() {
        let m = example();
        let text = m.to_ascii_string();
        assert!(text.starts_with("4 3\n1 1 "));
        let back = SparseMatrix::from_ascii_str(&text).unwrap();
        assert_eq!(back.shape, m.shape);
        assert_eq!(back.rows, m.rows);
        assert_eq!(back.cols, m.cols);
        for (a, b) in back.data.iter().zip(&m.data) {
            assert_relative_eq!(a, b, max_relative = 1e-15);
        }
    }

    #[test]
    fn test_malformed_ascii() {
        assert!(matches!(
            SparseMatrix::from_ascii_str("2 2\n0 1 1.0\n"),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            SparseMatrix::from_ascii_str("2 2\n3 1 1.0\n"),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            SparseMatrix::from_ascii_str("2 2\n1 x 1.0\n"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_files() {
        let m = example();
        let dir = std::env::temp_dir();
        let binary = dir.join("_test_headmat_sparse.bin");
        let ascii = dir.join("_test_headmat_sparse.txt");
        m.save_binary(&binary).unwrap();
        m.save_ascii(&ascii).unwrap();
        assert_eq!(SparseMatrix::load_binary(&binary).unwrap(), m);
        assert_eq!(SparseMatrix::load_ascii(&ascii).unwrap().nnz(), 3);
    }
}
