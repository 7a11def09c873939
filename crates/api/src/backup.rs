//! Project backup archive.
//!
//! A backup is a zip with one JSON Lines file per table. Each line is the
//! full row as the API returns it, so a backup can be inspected with
//! ordinary text tools.

use std::io::{Cursor, Write};

use serde::Serialize;
use wr_db::models::port::Port;
use wr_db::models::sfp::Sfp;
use wr_db::models::switch::Switch;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const SWITCHES_FILE: &str = "switches.jsonl";
pub const SFPS_FILE: &str = "sfps.jsonl";
pub const PORTS_FILE: &str = "ports.jsonl";

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("Failed to serialize row: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to write archive: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the archive bytes. Rows are written in the order given.
pub fn build_backup_archive(
    switches: &[Switch],
    sfps: &[Sfp],
    ports: &[Port],
) -> Result<Vec<u8>, BackupError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    write_jsonl(&mut zip, options, SWITCHES_FILE, switches)?;
    write_jsonl(&mut zip, options, SFPS_FILE, sfps)?;
    write_jsonl(&mut zip, options, PORTS_FILE, ports)?;

    Ok(zip.finish()?.into_inner())
}

fn write_jsonl<T: Serialize>(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    name: &str,
    rows: &[T],
) -> Result<(), BackupError> {
    zip.start_file(name, options)?;
    for row in rows {
        serde_json::to_writer(&mut *zip, row)?;
        zip.write_all(b"\n")?;
    }
    Ok(())
}
