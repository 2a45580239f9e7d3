//! Binary lineitem column file.
//!
//! ```text
//! [0..4)    magic  b"MSCF"
//! [4..8)    u32    version (1)
//! [8..16)   u64    row count N
//! then      i32*N  ship_date
//!           i32*N  discount
//!           i32*N  quantity
//! ```
//!
//! All integers little-endian.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use log::{debug, info};
use memmap2::Mmap;

use crate::{
    core::columns::{LineItemColumns, OwnedColumns},
    error::{FilterError, Result},
};

pub const MAGIC: &[u8; 4] = b"MSCF";
pub const VERSION: u32 = 1;
pub const HEADER_LEN: usize = 16;

const COLUMN_COUNT: usize = 3;
const VALUE_LEN: usize = std::mem::size_of::<i32>();

/// Writes the first `columns.len()` rows of every column.
pub fn write_column_file(path: impl AsRef<Path>, columns: &LineItemColumns<'_>) -> Result<()> {
    let path = path.as_ref();
    let rows = columns.len();
    let (ship_date, discount, quantity) = columns.head(rows);

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(MAGIC)?;
    writer.write_u32::<LittleEndian>(VERSION)?;
    writer.write_u64::<LittleEndian>(rows as u64)?;

    for column in [ship_date, discount, quantity] {
        for &value in column {
            writer.write_i32::<LittleEndian>(value)?;
        }
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", rows, path.display());
    Ok(())
}

/// Memory-maps a column file and decodes it into owned columns.
pub fn read_column_file(path: impl AsRef<Path>) -> Result<OwnedColumns> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let file_len = file.metadata()?.len();
    if file_len < HEADER_LEN as u64 {
        return Err(FilterError::CorruptFile(format!(
            "{}: {} bytes is shorter than the header",
            path.display(),
            file_len
        )));
    }

    // Safety: the map is read-only and dropped before returning; the file must
    // not be truncated concurrently.
    let mmap = unsafe { Mmap::map(&file)? };
    let bytes: &[u8] = &mmap;

    if &bytes[0..4] != MAGIC {
        return Err(FilterError::CorruptFile(format!("{}: bad magic", path.display())));
    }

    let version = LittleEndian::read_u32(&bytes[4..8]);
    if version != VERSION {
        return Err(FilterError::CorruptFile(format!(
            "{}: unsupported version {}",
            path.display(),
            version
        )));
    }

    let rows = usize::try_from(LittleEndian::read_u64(&bytes[8..16]))
        .map_err(|_| FilterError::CorruptFile(format!("{}: row count overflows", path.display())))?;

    let column_len = rows
        .checked_mul(VALUE_LEN)
        .ok_or_else(|| FilterError::CorruptFile(format!("{}: row count overflows", path.display())))?;

    let expected = column_len
        .checked_mul(COLUMN_COUNT)
        .and_then(|body| body.checked_add(HEADER_LEN))
        .ok_or_else(|| FilterError::CorruptFile(format!("{}: row count overflows", path.display())))?;

    if bytes.len() != expected {
        return Err(FilterError::CorruptFile(format!(
            "{}: expected {} bytes for {} rows, found {}",
            path.display(),
            expected,
            rows,
            bytes.len()
        )));
    }

    let mut columns = OwnedColumns {
        ship_date: vec![0; rows],
        discount: vec![0; rows],
        quantity: vec![0; rows],
    };

    let body = &bytes[HEADER_LEN..];
    LittleEndian::read_i32_into(&body[..column_len], &mut columns.ship_date);
    LittleEndian::read_i32_into(&body[column_len..2 * column_len], &mut columns.discount);
    LittleEndian::read_i32_into(&body[2 * column_len..], &mut columns.quantity);

    debug!("Loaded {} rows from {}", rows, path.display());
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use temp_testdir::TempDir;

    use super::*;

    fn file_in(temp: &TempDir, name: &str) -> PathBuf {
        let dir: &Path = temp.as_ref();
        dir.join(name)
    }

    #[test]
    fn written_file_reads_back() {
        let temp = TempDir::default();
        let path = file_in(&temp, "lineitem.mscf");

        let mut owned = OwnedColumns::default();
        owned.push(8766, 5, 100);
        owned.push(-1, i32::MIN, i32::MAX);
        owned.push(9130, 6, 2399);

        write_column_file(&path, &owned.as_columns()).unwrap();
        assert_eq!(read_column_file(&path).unwrap(), owned);
    }

    #[test]
    fn truncated_file_is_corrupt() {
        let temp = TempDir::default();
        let path = file_in(&temp, "short.mscf");

        let mut owned = OwnedColumns::default();
        owned.push(1, 2, 3);
        owned.push(4, 5, 6);
        write_column_file(&path, &owned.as_columns()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();

        assert!(matches!(read_column_file(&path), Err(FilterError::CorruptFile(_))));
    }

    #[test]
    fn foreign_file_is_corrupt() {
        let temp = TempDir::default();
        let path = file_in(&temp, "foreign.bin");

        std::fs::write(&path, b"not a column file at all").unwrap();
        assert!(matches!(read_column_file(&path), Err(FilterError::CorruptFile(_))));

        std::fs::write(&path, b"tiny").unwrap();
        assert!(matches!(read_column_file(&path), Err(FilterError::CorruptFile(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let temp = TempDir::default();
        let path = file_in(&temp, "missing.mscf");
        assert!(matches!(read_column_file(&path), Err(FilterError::Io(_))));
    }
}
