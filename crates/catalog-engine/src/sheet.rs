//! Product sheet loading
//!
//! Sheets are either workbooks (`.xlsx`, `.xls`, `.ods`), of which the first
//! worksheet is read, or CSV exports of the product spreadsheet. Headers may
//! be the Portuguese export names (`codigo`, `nome`, `ativo`, ...) or their
//! English equivalents. Semicolon-separated CSV files (common with comma
//! decimals) are detected from the header line.

use crate::types::*;
use calamine::{Data, Reader, open_workbook_auto};
use serde::Deserialize;
use std::path::Path;

/// Input format of a product sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Workbook,
}

impl SheetFormat {
    /// Format from the file extension; anything that is not a workbook is read as CSV
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => SheetFormat::Workbook,
            _ => SheetFormat::Csv,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SheetRow {
    #[serde(alias = "codigo", alias = "código", default)]
    code: String,
    #[serde(alias = "nome", default)]
    name: String,
    #[serde(alias = "ativo", default)]
    active: String,
    #[serde(alias = "observacoes", alias = "observações", default)]
    notes: String,
    #[serde(alias = "imagem_principal", alias = "image_ref", default)]
    image: String,
    #[serde(alias = "saldo_estoque", alias = "stock_balance", default)]
    stock: String,
    #[serde(alias = "categoria", default)]
    category: String,
}

/// Interpret a sheet cell as a boolean; blank cells count as active
pub fn parse_active(value: &str) -> bool {
    match value.trim().to_lowercase().as_str() {
        "" | "true" | "1" | "sim" | "s" | "yes" | "y" | "verdadeiro" => true,
        _ => false,
    }
}

/// Parse a stock balance, accepting `,` as decimal separator.
///
/// Values that do not parse count as zero.
pub fn parse_stock(value: &str) -> f64 {
    let value = value.trim();
    if value.is_empty() {
        return 0.0;
    }

    let normalized = if value.contains(',') {
        // 1.234,5 -> 1234.5
        value.replace('.', "").replace(',', ".")
    } else {
        value.to_string()
    };
    normalized.parse().unwrap_or(0.0)
}

fn detect_delimiter(contents: &str) -> u8 {
    let header = contents.lines().next().unwrap_or_default();
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

impl SheetRow {
    fn into_item(self) -> Option<CatalogItem> {
        let code = self.code.trim();
        if code.is_empty() {
            return None;
        }
        Some(CatalogItem {
            code: code.to_string(),
            name: self.name.trim().to_string(),
            active: parse_active(&self.active),
            stock_balance: parse_stock(&self.stock),
            category: self.category.trim().to_string(),
            image_ref: self.image.trim().to_string(),
            notes: self.notes,
        })
    }
}

fn collect_items(rows: impl Iterator<Item = Result<SheetRow>>) -> Result<Vec<CatalogItem>> {
    let mut items = Vec::new();
    let mut skipped = 0;
    for row in rows {
        match row?.into_item() {
            Some(item) => items.push(item),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} sheet rows without a product code", skipped);
    }
    Ok(items)
}

/// Parse CSV sheet contents into items, skipping rows without a code
pub fn parse_sheet(contents: &str) -> Result<Vec<CatalogItem>> {
    let contents = contents.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(contents))
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(contents.as_bytes());

    // Header names are matched case-insensitively
    let headers = reader.headers()?.clone();
    let lowered: csv::StringRecord = headers.iter().map(|h| h.to_lowercase()).collect();
    reader.set_headers(lowered);

    collect_items(reader.deserialize::<SheetRow>().map(|row| row.map_err(CatalogError::from)))
}

/// Text of a workbook cell as it would appear in a CSV export
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::Bool(true) => "true".to_string(),
        Data::Bool(false) => "false".to_string(),
        other => other.to_string(),
    }
}

/// Parse the first worksheet of a workbook file into items
pub fn parse_workbook(path: &Path) -> Result<Vec<CatalogItem>> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CatalogError::Sheet("workbook has no worksheets".to_string()))??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: csv::StringRecord = header_row
        .iter()
        .map(|cell| cell_text(cell).trim().to_lowercase())
        .collect();

    collect_items(rows.map(|cells| {
        let record: csv::StringRecord = cells.iter().map(cell_text).collect();
        record
            .deserialize::<SheetRow>(Some(&headers))
            .map_err(CatalogError::from)
    }))
}

/// Load items from a product sheet, picking the reader from the file extension
pub async fn load_sheet(path: impl AsRef<Path>) -> Result<Vec<CatalogItem>> {
    let path = path.as_ref().to_owned();

    let items = match SheetFormat::from_path(&path) {
        SheetFormat::Csv => {
            let contents = tokio::fs::read_to_string(&path).await?;
            // CSV parsing is CPU-bound, spawn blocking
            tokio::task::spawn_blocking(move || parse_sheet(&contents)).await??
        }
        SheetFormat::Workbook => {
            let workbook_path = path.clone();
            tokio::task::spawn_blocking(move || parse_workbook(&workbook_path)).await??
        }
    };

    log::info!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_active_values() {
        for value in ["True", "true", "1", "Sim", " TRUE ", ""] {
            assert!(parse_active(value), "{value:?}");
        }
        for value in ["False", "0", "nao", "inactive"] {
            assert!(!parse_active(value), "{value:?}");
        }
    }

    #[test]
    fn test_parse_stock_decimal_separators() {
        assert_eq!(parse_stock("12"), 12.0);
        assert_eq!(parse_stock("3.5"), 3.5);
        assert_eq!(parse_stock("3,5"), 3.5);
        assert_eq!(parse_stock("1.234,5"), 1234.5);
        assert_eq!(parse_stock("-1"), -1.0);
        assert_eq!(parse_stock("n/a"), 0.0);
        assert_eq!(parse_stock(""), 0.0);
    }

    #[test]
    fn test_portuguese_headers() {
        let csv = "codigo,nome,ativo,observacoes,imagem_principal,saldo_estoque,categoria\n\
                   A1,Selim Pro,True,,a1.jpg,4,Selins\n\
                   A2,Corrente,False,obs,,0,\n";
        let items = parse_sheet(csv).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].code, "A1");
        assert_eq!(items[0].image_ref, "a1.jpg");
        assert_eq!(items[0].stock_balance, 4.0);
        assert_eq!(items[0].category_name(), "Selins");
        assert!(!items[1].active);
        assert_eq!(items[1].notes, "obs");
        assert_eq!(items[1].category_name(), UNCATEGORIZED);
    }

    #[test]
    fn test_english_headers_with_semicolons() {
        let csv = "Code;Name;Stock;Category\nX-9;Pump;2,5;Tools\n;No code;1;Tools\n";
        let items = parse_sheet(csv).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Pump");
        assert_eq!(items[0].stock_balance, 2.5);
        assert!(items[0].active);
        assert!(!items[0].has_image());
    }

    #[tokio::test]
    async fn test_load_sheet_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("produtos.csv");
        tokio::fs::write(&path, "\u{feff}codigo,nome\n1,Aro\n2,Bomba\n")
            .await
            .unwrap();

        let items = load_sheet(&path).await.unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Aro", "Bomba"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = load_sheet("/nonexistent/produtos.csv").await;
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SheetFormat::from_path(Path::new("a.XLSX")), SheetFormat::Workbook);
        assert_eq!(SheetFormat::from_path(Path::new("a.xls")), SheetFormat::Workbook);
        assert_eq!(SheetFormat::from_path(Path::new("a.csv")), SheetFormat::Csv);
        assert_eq!(SheetFormat::from_path(Path::new("produtos")), SheetFormat::Csv);
    }

    #[test]
    fn test_cell_text_matches_csv_export() {
        assert_eq!(cell_text(&Data::Float(101.0)), "101");
        assert_eq!(cell_text(&Data::Float(3.5)), "3.5");
        assert_eq!(cell_text(&Data::Bool(false)), "false");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[tokio::test]
    async fn test_load_sheet_reads_first_worksheet() {
        let items = load_sheet(fixture("produtos.xlsx")).await.unwrap();

        let codes: Vec<&str> = items.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["101", "A-2", "S-3"]);

        assert_eq!(items[0].name, "Aro 29");
        assert!(items[0].active);
        assert_eq!(items[0].image_ref, "aro.png");
        assert_eq!(items[0].stock_balance, 3.5);
        assert_eq!(items[0].category_name(), "Rodas");

        assert!(!items[1].active);
        assert_eq!(items[2].stock_balance, -1.0);
        assert!(!items[2].has_image());
        assert_eq!(items[2].category_name(), UNCATEGORIZED);
    }

    #[tokio::test]
    async fn test_unreadable_workbook_is_workbook_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("produtos.xlsx");
        tokio::fs::write(&path, "codigo,nome\n1,Aro\n").await.unwrap();

        let result = load_sheet(&path).await;
        assert!(matches!(result, Err(CatalogError::Workbook(_))));
    }
}
