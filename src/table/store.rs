//! CSV persistence of the hotel table.
//!
//! Writes go to a temp file in the target's directory that is then
//! persisted over the target, so a reader never observes a half-written
//! table while the detail stage rewrites it after every page.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::domain::{Column, HotelRecord, ListingRow};

#[derive(Debug, Error)]
pub enum TableError {
    #[error("results file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("results file is empty: {}", path.display())]
    Empty { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Rows read back from disk, with the header columns that were present.
#[derive(Debug, Clone, Default)]
pub struct LoadedTable {
    pub columns: Vec<Column>,
    pub records: Vec<HotelRecord>,
}

/// Write the listing-stage table: listing columns only.
pub fn write_listing_table(path: &Path, records: &[HotelRecord]) -> Result<(), TableError> {
    write_atomic(path, |writer| {
        if records.is_empty() {
            writer.write_record(Column::LISTING.iter().map(|c| c.as_str()))?;
        }
        for record in records {
            writer.serialize(ListingRow::from(record))?;
        }
        Ok(())
    })
}

/// Write the enriched table: listing columns plus the detail columns.
pub fn write_enriched_table(path: &Path, records: &[HotelRecord]) -> Result<(), TableError> {
    write_atomic(path, |writer| {
        if records.is_empty() {
            writer.write_record(
                Column::LISTING
                    .iter()
                    .chain(Column::DETAIL.iter())
                    .map(|c| c.as_str()),
            )?;
        }
        for record in records {
            writer.serialize(record)?;
        }
        Ok(())
    })
}

pub fn read_table(path: &Path) -> Result<LoadedTable, TableError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TableError::Missing {
            path: path.to_path_buf(),
        },
        _ => TableError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let csv_err = |source: csv::Error| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers().map_err(csv_err)?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(TableError::Empty {
            path: path.to_path_buf(),
        });
    }

    let columns = headers.iter().filter_map(Column::from_header).collect();
    let records = reader
        .deserialize::<HotelRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;

    Ok(LoadedTable { columns, records })
}

fn write_atomic<F>(path: &Path, fill: F) -> Result<(), TableError>
where
    F: FnOnce(&mut csv::Writer<&mut File>) -> Result<(), csv::Error>,
{
    let io_err = |source: io::Error| TableError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source: csv::Error| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(io_err)?;
            parent
        }
        None => Path::new("."),
    };

    // Dropped, and so removed, if anything below fails.
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        fill(&mut writer).map_err(csv_err)?;
        writer.flush().map_err(io_err)?;
    }

    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
