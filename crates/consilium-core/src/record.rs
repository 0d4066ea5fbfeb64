//! Resolved process, party, and movement records.
//!
//! The search API returns loosely-typed JSON mappings; these models are the
//! typed form a record takes once resolved. Raw field names are the
//! upstream Portuguese ones (`numero`, `partes`, ...); serialized output
//! uses the snake_case names of the export format.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A party (person or entity) in a legal process.
#[derive(Debug, Clone, Serialize)]
pub struct Party {
    pub name: String,
    /// Role in the process, e.g. "Autor", "Réu", "Advogado".
    #[serde(rename = "type")]
    pub role: String,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.role)
    }
}

/// A single movement/event in a process timeline.
#[derive(Debug, Clone, Serialize)]
pub struct Movement {
    /// Formatted date string as the API reports it, e.g. "01/02/2026".
    pub date: String,
    pub description: String,
}

impl Movement {
    /// Map a raw movement mapping (`dataFormatada`/`descricao`).
    pub fn from_value(value: &Value) -> Self {
        Self {
            date: text_field(value, "dataFormatada"),
            description: text_field(value, "descricao"),
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.date, self.description)
    }
}

/// A resolved legal process with its metadata.
///
/// `movements` starts empty; it is filled by a separate movement-timeline
/// pass once the process itself is resolved.
#[derive(Debug, Clone, Serialize)]
pub struct Process {
    pub number: String,
    pub formatted_number: String,
    pub class: String,
    pub topic: String,
    pub jurisdiction: String,
    pub competence: String,
    /// Document code, needed to address the movement timeline.
    pub cd_doc_process: String,
    pub instance: String,
    /// Instance code, needed to address the movement timeline.
    pub cd_instance: String,
    pub situation: String,
    pub court: String,
    pub police_inquiry: String,
    pub cause_value: String,
    pub citation_date: String,
    pub justice_secret: String,
    pub distribution_date: String,
    pub parties: Vec<Party>,
    pub movements: Vec<Movement>,
}

impl Process {
    /// Map a raw process mapping as returned by the search API.
    ///
    /// Missing or null fields become empty strings; numeric values are
    /// rendered as text since the export format is entirely textual.
    pub fn from_value(value: &Value) -> Self {
        let parties = value
            .get("partes")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|p| Party {
                        name: text_field(p, "nome"),
                        role: text_field(p, "tipo"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            number: text_field(value, "numero"),
            formatted_number: text_field(value, "numeroFormatado"),
            class: text_field(value, "classe"),
            topic: text_field(value, "assunto"),
            jurisdiction: text_field(value, "comarca"),
            competence: text_field(value, "competencia"),
            cd_doc_process: text_field(value, "cdDocProcesso"),
            instance: text_field(value, "instancia"),
            cd_instance: text_field(value, "cdInstancia"),
            situation: text_field(value, "situacao"),
            court: text_field(value, "vara"),
            police_inquiry: text_field(value, "numeroInqueritoPolicial"),
            cause_value: text_field(value, "valorCausaFormatado"),
            citation_date: text_field(value, "dataAutuacaoFormatada"),
            justice_secret: text_field(value, "segredoJustica"),
            distribution_date: text_field(value, "dataDistribuicaoFormatada"),
            parties,
            movements: Vec::new(),
        }
    }
}

fn text_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
