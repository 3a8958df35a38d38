mod csv_import;
mod mapping;

pub(crate) use csv_import::{parse_date, CsvImporter};
pub(crate) use mapping::{ColumnMap, ColumnMapper, ColumnRule};
