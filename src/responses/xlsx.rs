use crate::errors::{ResultResp, ServerError};
use astra::{Body, ResponseBuilder};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Spreadsheet download. The table changes while a scrape runs, so it is
/// never cached.
pub fn xlsx_response(workbook: Vec<u8>, filename: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", XLSX_CONTENT_TYPE)
        .header("Content-Disposition", format!("attachment; filename=\"{filename}\""))
        .header("Cache-Control", "no-store")
        .body(Body::from(workbook))
        .map_err(|_| ServerError::InternalError)
}
