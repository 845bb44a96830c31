//! Combine a folder of workbooks into a single multi-sheet workbook.
//!
//! Every `.xlsx` file in the input folder contributes its active sheet to the
//! output, under a new sheet named after the file. Values, formatting and
//! hyperlinks are copied cell by cell.

use crate::format::copy_cell;
use shared::DataPaths;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use umya_spreadsheet::{Spreadsheet, XlsxError};

/// Sheet kept in the output when no input workbook was found
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Errors raised while merging workbooks
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("failed to list input folder {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read workbook {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },

    #[error("failed to create sheet `{name}`: {reason}")]
    Sheet { name: String, reason: String },

    #[error("failed to write workbook {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },
}

/// List the workbooks of `input_folder`, sorted by file name
pub fn list_workbooks(input_folder: &Path) -> Result<Vec<PathBuf>, MergeError> {
    let read_dir_error = |source| MergeError::ReadDir {
        path: input_folder.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_folder).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if path.is_file() && DataPaths::is_workbook(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Name of the sheet created for an input workbook: its file name without extension
pub fn sheet_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Build the merged workbook in memory
pub fn combine_workbooks(input_folder: impl AsRef<Path>) -> Result<Spreadsheet, MergeError> {
    let input_folder = input_folder.as_ref();
    let files = list_workbooks(input_folder)?;

    info!(
        input_folder = %input_folder.display(),
        workbooks = files.len(),
        "Combining workbooks"
    );

    let mut book = umya_spreadsheet::new_file_empty_worksheet();

    for path in &files {
        let source_book = umya_spreadsheet::reader::xlsx::read(path).map_err(|source| {
            MergeError::Read {
                path: path.clone(),
                source,
            }
        })?;
        let source_sheet = source_book.get_active_sheet();

        let name = sheet_name_for(path);
        let target_sheet = book.new_sheet(name.as_str()).map_err(|reason| MergeError::Sheet {
            name: name.clone(),
            reason: reason.to_string(),
        })?;

        let cells = source_sheet.get_cell_collection();
        for cell in &cells {
            let coordinate = cell.get_coordinate().get_coordinate();
            copy_cell(cell, target_sheet.get_cell_mut(coordinate.as_str()));
        }

        debug!(
            path = %path.display(),
            source_sheet = source_sheet.get_name(),
            sheet = %name,
            cells = cells.len(),
            "Copied sheet"
        );
    }

    if files.is_empty() {
        book.new_sheet(DEFAULT_SHEET_NAME)
            .map_err(|reason| MergeError::Sheet {
                name: DEFAULT_SHEET_NAME.to_string(),
                reason: reason.to_string(),
            })?;
    }

    Ok(book)
}

/// Combine every workbook in `input_folder` into `output_file`, keeping formats.
///
/// The output file is overwritten. Errors are returned as soon as they occur;
/// nothing is retried.
pub fn combine_sheets_keeping_format(
    input_folder: impl AsRef<Path>,
    output_file: impl AsRef<Path>,
) -> Result<(), MergeError> {
    let output_file = output_file.as_ref();
    let book = combine_workbooks(input_folder)?;

    umya_spreadsheet::writer::xlsx::write(&book, output_file).map_err(|source| {
        MergeError::Write {
            path: output_file.to_path_buf(),
            source,
        }
    })?;

    info!(
        output_file = %output_file.display(),
        sheets = book.get_sheet_count(),
        "Merged workbook saved"
    );

    Ok(())
}
