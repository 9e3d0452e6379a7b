//! Worker roster ingestion from medical-exam (EMO) exports.
//!
//! The exports arrive as semicolon-delimited CSV with `DNI`, `Nombre`, and
//! `Fecha_EMO` columns. Rows are validated individually: a blank DNI skips
//! the row, everything else is repaired with documented fallbacks.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::warn;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Worker registration row ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerRecord {
    pub dni_ce_pas: String,
    pub apellidos_nombre: String,
    pub empresa: String,
    pub fecha_registro: NaiveDate,
}

/// Row rejected during import, with its 1-based position and reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

/// Import outcome: accepted workers plus every skipped row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterReport {
    pub workers: Vec<WorkerRecord>,
    pub skipped: Vec<SkippedRow>,
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        empresa: &str,
        today: NaiveDate,
    ) -> Result<RosterReport, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, empresa, today)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        empresa: &str,
        today: NaiveDate,
    ) -> Result<RosterReport, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut workers = Vec::new();
        let mut skipped = Vec::new();

        for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
            let row_number = index + 1;
            let row = record?;

            let Some(dni) = row.dni.as_deref().map(str::trim).filter(|dni| !dni.is_empty())
            else {
                skipped.push(SkippedRow {
                    row: row_number,
                    reason: "DNI vacío".to_string(),
                });
                continue;
            };

            let fecha_registro = match row.fecha_emo.as_deref().map(normalize_date) {
                Some(Some(fecha)) => fecha,
                _ => {
                    warn!(row = row_number, "unusable exam date, falling back to today");
                    today
                }
            };

            workers.push(WorkerRecord {
                dni_ce_pas: dni.to_string(),
                apellidos_nombre: row
                    .nombre
                    .as_deref()
                    .map(str::trim)
                    .filter(|nombre| !nombre.is_empty())
                    .unwrap_or("Sin nombre")
                    .to_string(),
                empresa: empresa.to_string(),
                fecha_registro,
            });
        }

        Ok(RosterReport { workers, skipped })
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "DNI", default, deserialize_with = "empty_string_as_none")]
    dni: Option<String>,
    #[serde(rename = "Nombre", default, deserialize_with = "empty_string_as_none")]
    nombre: Option<String>,
    #[serde(
        rename = "Fecha_EMO",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    fecha_emo: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts the date shapes seen in the exports: ISO, day-first with `-` or
/// `/`, and year-first with `/`.
fn normalize_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"];
    FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
    }

    #[test]
    fn normalize_date_accepts_the_export_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 23).unwrap();
        assert_eq!(normalize_date("2025-12-23"), Some(expected));
        assert_eq!(normalize_date("23-12-2025"), Some(expected));
        assert_eq!(normalize_date("23/12/2025"), Some(expected));
        assert_eq!(normalize_date("2025/12/23"), Some(expected));
        assert_eq!(normalize_date("  "), None);
        assert_eq!(normalize_date("mañana"), None);
    }

    #[test]
    fn importer_reads_semicolon_delimited_rows() {
        let csv = "DNI;Nombre;Fecha_EMO\n12345678;Quispe Mamani, Rosa;23-12-2025\n";
        let report = RosterImporter::from_reader(Cursor::new(csv), "Minera Andina SAC", today())
            .expect("import succeeds");

        assert_eq!(report.workers.len(), 1);
        assert!(report.skipped.is_empty());
        let worker = &report.workers[0];
        assert_eq!(worker.dni_ce_pas, "12345678");
        assert_eq!(worker.apellidos_nombre, "Quispe Mamani, Rosa");
        assert_eq!(worker.empresa, "Minera Andina SAC");
        assert_eq!(
            worker.fecha_registro,
            NaiveDate::from_ymd_opt(2025, 12, 23).unwrap()
        );
    }

    #[test]
    fn blank_dni_rows_are_skipped_with_a_reason() {
        let csv = "DNI;Nombre;Fecha_EMO\n;Pérez, Juan;2025-01-15\n87654321;Rojas, Ana;2025-01-16\n";
        let report = RosterImporter::from_reader(Cursor::new(csv), "Empresa", today())
            .expect("import succeeds");

        assert_eq!(report.workers.len(), 1);
        assert_eq!(report.workers[0].dni_ce_pas, "87654321");
        assert_eq!(
            report.skipped,
            vec![SkippedRow {
                row: 1,
                reason: "DNI vacío".to_string(),
            }]
        );
    }

    #[test]
    fn missing_name_defaults_and_bad_dates_fall_back_to_today() {
        let csv = "DNI;Nombre;Fecha_EMO\n12345678;;no-es-fecha\n";
        let report = RosterImporter::from_reader(Cursor::new(csv), "Empresa", today())
            .expect("import succeeds");

        let worker = &report.workers[0];
        assert_eq!(worker.apellidos_nombre, "Sin nombre");
        assert_eq!(worker.fecha_registro, today());
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = RosterImporter::from_path("./does-not-exist.csv", "Empresa", today())
            .expect_err("expected io error");

        match error {
            RosterImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
