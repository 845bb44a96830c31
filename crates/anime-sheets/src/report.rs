//! Anime list workbook: one row per scored anime.
//!
//! Columns are title (linked to the MyAnimeList page), the user's rating and
//! the MyAnimeList mean score. Next to the table sit the entry count and the
//! correlation between the two scores.

use anyhow::{Context, Result};
use shared::{ScoredEntry, ScoredRecord};
use std::path::Path;
use tracing::{debug, info, warn};
use umya_spreadsheet::{
    Alignment, Coordinate, HorizontalAlignmentValues, Hyperlink, Pane, PaneStateValues,
    PaneValues, SheetView, Spreadsheet, Worksheet,
};

pub const SHEET_TITLE: &str = "Anime List";

pub const HEADERS: [&str; 6] = ["Title", "User Rating", "MAL Score", "", "n", "Correlation"];

const TITLE: u32 = 1;
const USER_RATING: u32 = 2;
const MAL_SCORE: u32 = 3;
const N: u32 = 5;
const CORRELATION: u32 = 6;

pub const CORRELATION_FORMULA: &str = "CORREL(B:B, C:C)";

/// First cell outside the frozen header row and title column
pub const FREEZE_AT: &str = "B2";

fn centered() -> Alignment {
    let mut alignment = Alignment::default();
    alignment.set_horizontal(HorizontalAlignmentValues::Center);
    alignment
}

/// Keep the header row and title column in view while scrolling
fn freeze_header(sheet: &mut Worksheet) {
    let mut top_left = Coordinate::default();
    top_left.set_coordinate(FREEZE_AT);

    let mut pane = Pane::default();
    pane.set_horizontal_split(1.0);
    pane.set_vertical_split(1.0);
    pane.set_top_left_cell(top_left);
    pane.set_active_pane(PaneValues::BottomRight);
    pane.set_state(PaneStateValues::Frozen);

    let views = sheet.get_sheet_views_mut();
    if views.get_sheet_view_list().is_empty() {
        views.add_sheet_view_list_mut(SheetView::default());
    }
    if let Some(view) = views.get_sheet_view_list_mut().first_mut() {
        view.set_pane(pane);
    }
}

/// Fill `sheet` with the header row and one row per entry
pub fn write_anime_list(sheet: &mut Worksheet, entries: &[ScoredEntry]) {
    for (i, header) in HEADERS.iter().enumerate() {
        let cell = sheet.get_cell_mut((i as u32 + 1, 1));
        cell.set_value(*header);
        cell.get_style_mut().set_alignment(centered());
        cell.get_style_mut().get_font_mut().set_bold(true);
    }

    for (j, anime) in entries.iter().enumerate() {
        let row = j as u32 + 2;

        let title = sheet.get_cell_mut((TITLE, row));
        title.set_value(anime.title());
        let mut link = Hyperlink::default();
        link.set_url(anime.mal_link());
        title.set_hyperlink(link);

        let user_rating = sheet.get_cell_mut((USER_RATING, row));
        user_rating.set_value_number(anime.user_rating());
        user_rating.get_style_mut().set_alignment(centered());

        let mal_score = sheet.get_cell_mut((MAL_SCORE, row));
        if let Some(score) = anime.entry().rating() {
            mal_score.set_value_number(score);
        }
        mal_score.get_style_mut().set_alignment(centered());
    }

    sheet
        .get_cell_mut((N, 2))
        .set_value_number(entries.len() as u32);
    sheet
        .get_cell_mut((CORRELATION, 2))
        .set_formula(CORRELATION_FORMULA);

    freeze_header(sheet);

    debug!(rows = entries.len(), "Anime list written");
}

/// Build a workbook holding only the anime list sheet
pub fn build_anime_list(entries: &[ScoredEntry]) -> Result<Spreadsheet> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    let sheet = book
        .new_sheet(SHEET_TITLE)
        .map_err(|reason| anyhow::anyhow!("Failed to create sheet {}: {}", SHEET_TITLE, reason))?;

    write_anime_list(sheet, entries);
    Ok(book)
}

/// Load pre-fetched records and the user's scores from a JSON file.
///
/// Unscored entries (a rating of 0) are left out of the list.
pub fn load_scored_entries(path: impl AsRef<Path>) -> Result<Vec<ScoredEntry>> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file: {}", path.display()))?;

    let records: Vec<ScoredRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse records file: {}", path.display()))?;

    let mut entries = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        if record.user_rating == 0 {
            debug!(index = idx, "Skipping unscored record");
            continue;
        }

        let entry = ScoredEntry::try_from(record)
            .with_context(|| format!("Invalid record at index {}", idx))?;
        entries.push(entry);
    }

    if entries.is_empty() {
        warn!(path = %path.display(), "No scored records found");
    }

    info!(
        path = %path.display(),
        records = records.len(),
        scored = entries.len(),
        "Loaded records"
    );

    Ok(entries)
}

/// Write the workbook to disk, overwriting any existing file
pub fn save(book: &Spreadsheet, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    umya_spreadsheet::writer::xlsx::write(book, path)
        .with_context(|| format!("Failed to write workbook: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn entries() -> Vec<ScoredEntry> {
        vec![
            ScoredEntry::from_record(
                &json!({"id": 5114, "title": "Fullmetal Alchemist: Brotherhood", "mean": 9.1}),
                10,
            )
            .unwrap(),
            ScoredEntry::from_record(&json!({"id": 30, "title": "Neon Genesis Evangelion", "mean": 8.35}), 7)
                .unwrap(),
        ]
    }

    #[test]
    fn test_header_row() -> Result<()> {
        let book = build_anime_list(&entries())?;
        let sheet = book.get_sheet_by_name(SHEET_TITLE).unwrap();

        assert_eq!(sheet.get_value("A1"), "Title");
        assert_eq!(sheet.get_value("B1"), "User Rating");
        assert_eq!(sheet.get_value("C1"), "MAL Score");
        assert_eq!(sheet.get_value("E1"), "n");
        assert_eq!(sheet.get_value("F1"), "Correlation");

        let header = sheet.get_cell("A1").unwrap();
        assert_eq!(header.get_style().get_alignment(), Some(&centered()));

        let pane = sheet
            .get_sheets_views()
            .get_sheet_view_list()
            .first()
            .and_then(|view| view.get_pane())
            .expect("header pane");
        assert_eq!(pane.get_top_left_cell().get_coordinate(), FREEZE_AT);
        assert!(matches!(pane.get_state(), PaneStateValues::Frozen));
        assert_eq!(pane.get_horizontal_split().to_owned(), 1.0);
        assert_eq!(pane.get_vertical_split().to_owned(), 1.0);

        Ok(())
    }

    #[test]
    fn test_entry_rows() -> Result<()> {
        let book = build_anime_list(&entries())?;
        let sheet = book.get_sheet_by_name(SHEET_TITLE).unwrap();

        assert_eq!(sheet.get_value("A2"), "Fullmetal Alchemist: Brotherhood");
        assert_eq!(sheet.get_value("B2"), "10");
        assert_eq!(sheet.get_value("C2"), "9.1");
        assert_eq!(sheet.get_value("A3"), "Neon Genesis Evangelion");
        assert_eq!(sheet.get_value("B3"), "7");

        let link = sheet
            .get_cell("A3")
            .and_then(|cell| cell.get_hyperlink())
            .map(|link| link.get_url().to_string());
        assert_eq!(link.as_deref(), Some("https://myanimelist.net/anime/30"));

        let score = sheet.get_cell("C3").unwrap();
        assert_eq!(score.get_style().get_alignment(), Some(&centered()));

        Ok(())
    }

    #[test]
    fn test_summary_cells() -> Result<()> {
        let book = build_anime_list(&entries())?;
        let sheet = book.get_sheet_by_name(SHEET_TITLE).unwrap();

        assert_eq!(sheet.get_value("E2"), "2");
        let correlation = sheet.get_cell("F2").unwrap();
        assert_eq!(correlation.get_formula(), CORRELATION_FORMULA);

        Ok(())
    }

    #[test]
    fn test_load_scored_entries_skips_unscored() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("records.json");
        std::fs::write(
            &path,
            serde_json::to_string(&json!([
                {"record": {"id": 1, "title": "Cowboy Bebop", "mean": 8.75}, "user_rating": 9},
                {"record": {"id": 6, "title": "Trigun", "mean": 8.22}, "user_rating": 0},
                {"record": {"id": 19, "title": "Monster", "mean": 8.88}}
            ]))?,
        )?;

        let entries = load_scored_entries(&path)?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title(), "Cowboy Bebop");

        Ok(())
    }

    #[test]
    fn test_load_scored_entries_rejects_incomplete_record() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("records.json");
        std::fs::write(
            &path,
            r#"[{"record": {"id": 1, "mean": 8.75}, "user_rating": 9}]"#,
        )?;

        let err = load_scored_entries(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("missing required field `title`"));

        Ok(())
    }

    #[test]
    fn test_save_and_reload() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("yuc_anime_list.xlsx");

        save(&build_anime_list(&entries())?, &path)?;

        let book = umya_spreadsheet::reader::xlsx::read(&path)?;
        let sheet = book.get_sheet_by_name(SHEET_TITLE).unwrap();
        assert_eq!(sheet.get_value("A2"), "Fullmetal Alchemist: Brotherhood");

        let pane = sheet
            .get_sheets_views()
            .get_sheet_view_list()
            .first()
            .and_then(|view| view.get_pane())
            .expect("pane after reload");
        assert_eq!(pane.get_top_left_cell().get_coordinate(), FREEZE_AT);

        Ok(())
    }
}
