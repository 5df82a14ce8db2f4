//! Spreadsheet conversion (feature `xlsx`).
//!
//! Everything is written as text cells; the CSV table is the typed source
//! of truth and the spreadsheet is a viewing convenience.

use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::output::table::{AGG_COLUMNS, AggregatedRow};

/// Converts a written CSV table into an `.xlsx` workbook, one sheet,
/// header row included.
pub fn convert_csv(csv_path: &Path, xlsx_path: &Path) -> Result<()> {
    let mut reader = csv::Reader::from_path(csv_path)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in reader.headers()?.clone().iter().enumerate() {
        worksheet.write_string(0, u16::try_from(col).unwrap_or(u16::MAX), name)?;
    }

    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = u32::try_from(row_idx + 1).unwrap_or(u32::MAX);
        for (col, field) in record.iter().enumerate() {
            worksheet.write_string(row, u16::try_from(col).unwrap_or(u16::MAX), field)?;
        }
    }

    workbook.save(xlsx_path)?;
    Ok(())
}

/// Writes aggregated rows to an `.xlsx` workbook.
pub(crate) fn write_rows(rows: &[AggregatedRow], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in AGG_COLUMNS.iter().enumerate() {
        worksheet.write_string(0, u16::try_from(col).unwrap_or(u16::MAX), *name)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let fields = [
            &row.time,
            &row.sender,
            &row.link,
            &row.link_type,
            &row.video_id,
            &row.bili_title,
            &row.bili_uploader,
            &row.context,
        ];
        let out_row = u32::try_from(row_idx + 1).unwrap_or(u32::MAX);
        for (col, field) in fields.iter().enumerate() {
            worksheet.write_string(out_row, u16::try_from(col).unwrap_or(u16::MAX), *field)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}
