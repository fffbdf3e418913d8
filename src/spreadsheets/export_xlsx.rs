use crate::domain::{Column, HotelRecord};
use crate::errors::ServerError;
use crate::table::Dataset;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

const DERIVED_HEADERS: [&str; 2] = ["price_per_night", "price_range"];

enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Blank,
}

impl<'a> Cell<'a> {
    fn text(v: Option<&'a str>) -> Self {
        v.map_or(Cell::Blank, Cell::Text)
    }

    fn number(v: Option<f64>) -> Self {
        v.map_or(Cell::Blank, Cell::Number)
    }
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: Cell<'_>) -> Result<(), XlsxError> {
    match cell {
        Cell::Text(s) => sheet.write_string(row, col, s).map(|_| ()),
        Cell::Number(n) => sheet.write_number(row, col, n).map(|_| ()),
        Cell::Blank => Ok(()),
    }
}

fn row_cells<'a>(data: &Dataset, r: &'a HotelRecord) -> Vec<Cell<'a>> {
    vec![
        Cell::text(r.name.as_deref()),
        Cell::text(r.address.as_deref()),
        Cell::number(r.price),
        Cell::number(r.distance),
        Cell::number(r.rate_review),
        Cell::number(r.num_review.map(f64::from)),
        Cell::Number(f64::from(r.rating_stars)),
        Cell::Text(&r.link),
        Cell::Text(&r.source_url),
        Cell::number(r.latitude),
        Cell::number(r.longitude),
        Cell::text(r.hotel_type.as_deref()),
        Cell::number(data.price_per_night(r)),
        Cell::text(data.price_range(r).map(|p| p.as_str())),
    ]
}

/// The whole table plus the derived price columns, one hotel per row.
pub fn hotels_workbook(data: &Dataset) -> Result<Vec<u8>, ServerError> {
    let xlsx_err = |what: &str, e: XlsxError| ServerError::XlsxError(format!("Failed to write {what}: {e}"));

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name("hotels")
        .map_err(|e| xlsx_err("sheet name", e))?;

    let headers = Column::LISTING
        .iter()
        .chain(Column::DETAIL.iter())
        .map(|c| c.as_str())
        .chain(DERIVED_HEADERS);

    for (col, header) in headers.enumerate() {
        sheet
            .write_string(0, col as u16, header)
            .map_err(|e| xlsx_err(header, e))?;
    }

    for (i, record) in data.records.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, cell) in row_cells(data, record).into_iter().enumerate() {
            write_cell(sheet, row, col as u16, cell).map_err(|e| xlsx_err(&record.link, e))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}
