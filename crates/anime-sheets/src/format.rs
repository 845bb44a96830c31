//! Cell-level copying of values and formatting.

use umya_spreadsheet::Cell;

/// Copy every formatting facet of `source` onto `target`.
///
/// Font, alignment, number format, protection, fill and borders are copied
/// independently; a facet the source does not carry is left untouched on
/// the target. A hyperlink is copied verbatim when present.
pub fn copy_format(source: &Cell, target: &mut Cell) {
    let from = source.get_style();
    let to = target.get_style_mut();

    if let Some(font) = from.get_font() {
        to.set_font(font.clone());
    }
    if let Some(alignment) = from.get_alignment() {
        to.set_alignment(alignment.clone());
    }
    if let Some(number_format) = from.get_number_format() {
        to.set_number_format(number_format.clone());
    }
    if let Some(protection) = from.get_protection() {
        to.set_protection(protection.clone());
    }
    if let Some(fill) = from.get_fill() {
        to.set_fill(fill.clone());
    }
    if let Some(borders) = from.get_borders() {
        to.set_borders(borders.clone());
    }

    if let Some(hyperlink) = source.get_hyperlink() {
        target.set_hyperlink(hyperlink.clone());
    }
}

/// Copy the value of `source` and then its formatting
pub fn copy_cell(source: &Cell, target: &mut Cell) {
    target.set_cell_value(source.get_cell_value().clone());
    copy_format(source, target);
}
