pub mod export_xlsx;

pub use export_xlsx::hotels_workbook;
