//! Per-process CSV and JSON export.
//!
//! Each resolved process becomes one CSV file and one JSON file, named
//! after its process number and document/instance codes. The CSV carries
//! the Portuguese column headers of the upstream court's records and is
//! BOM-prefixed so spreadsheet applications detect UTF-8; the JSON is the
//! full record, pretty-printed, parties and movements nested.

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use consilium_core::Process;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write failed: {0}")]
    Json(#[from] serde_json::Error),
}

const CSV_HEADERS: [&str; 15] = [
    "Número do Processo",
    "Classe",
    "Assunto",
    "Jurisdição",
    "Competência",
    "Instância",
    "Situação",
    "Órgão Julgador",
    "Inquérito Policial",
    "Valor da Causa",
    "Data da Autuação",
    "Segredo de Justiça",
    "Data de Distribuição",
    "Partes",
    "Movimentações",
];

/// Writes one CSV and one JSON file per process under the configured
/// directories, creating them on demand.
pub struct Exporter {
    csv_dir: PathBuf,
    json_dir: PathBuf,
}

impl Exporter {
    pub fn new(csv_dir: impl Into<PathBuf>, json_dir: impl Into<PathBuf>) -> Self {
        Self {
            csv_dir: csv_dir.into(),
            json_dir: json_dir.into(),
        }
    }

    /// Export both formats for one process.
    pub fn export(&self, process: &Process) -> Result<(), ExportError> {
        self.export_csv(process)?;
        self.export_json(process)?;
        Ok(())
    }

    /// Export the CSV form; returns the written path.
    pub fn export_csv(&self, process: &Process) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.csv_dir)?;
        let path = self.csv_dir.join(format!("{}.csv", file_stem(process)));

        let mut file = File::create(&path)?;
        // UTF-8 BOM so spreadsheet applications pick the right encoding.
        file.write_all(b"\xef\xbb\xbf")?;

        let parties = joined(&process.parties);
        let movements = joined(&process.movements);
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(CSV_HEADERS)?;
        writer.write_record([
            process.formatted_number.as_str(),
            process.class.as_str(),
            process.topic.as_str(),
            process.jurisdiction.as_str(),
            process.competence.as_str(),
            process.instance.as_str(),
            process.situation.as_str(),
            process.court.as_str(),
            process.police_inquiry.as_str(),
            process.cause_value.as_str(),
            process.citation_date.as_str(),
            process.justice_secret.as_str(),
            process.distribution_date.as_str(),
            parties.as_str(),
            movements.as_str(),
        ])?;
        writer.flush()?;

        info!(path = %path.display(), "wrote CSV export");
        Ok(path)
    }

    /// Export the JSON form; returns the written path.
    pub fn export_json(&self, process: &Process) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.json_dir)?;
        let path = self.json_dir.join(format!("{}.json", file_stem(process)));

        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, process)?;

        info!(path = %path.display(), "wrote JSON export");
        Ok(path)
    }
}

fn file_stem(process: &Process) -> String {
    format!(
        "process_{}_doc_{}_instance_{}",
        process.number, process.cd_doc_process, process.cd_instance
    )
}

fn joined<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
