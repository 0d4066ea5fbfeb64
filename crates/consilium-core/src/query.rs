//! Search query classification and request path construction.
//!
//! A raw search string maps to exactly one [`QueryKind`]; each kind owns a
//! fixed API route and a URL-building rule. Classification is a pure,
//! deterministic function of the input text.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::QueryError;

static CNJ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{7}-[0-9]{2}\.[0-9]{4}\.[0-9]\.[0-9]{2}\.[0-9]{4}$|^[0-9]{20}$")
        .expect("valid regex")
});

static CPF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{11}$|^[0-9]{3}\.[0-9]{3}\.[0-9]{3}-[0-9]{2}$").expect("valid regex")
});

static CNPJ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{14}$|^[0-9]{2}\.[0-9]{3}\.[0-9]{3}/[0-9]{4}-[0-9]{2}$")
        .expect("valid regex")
});

static OAB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^oab:*[0-9]+[a-z]{2}$").expect("valid regex"));

static PARTY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-zçáâãéêíóôõú-]+(?:\s+[a-zçáâãéêíóôõú-]+)+$").expect("valid regex")
});

static EXACT_PARTY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^"[a-zçáâãéêíóôõú-]+(?:\s+[a-zçáâãéêíóôõú-]+)+"$"#).expect("valid regex")
});

static POLICE_INQUIRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^inq:[0-9]{4}\.[0-9]+$").expect("valid regex"));

/// One name token with no surname. Tested only after every kind has failed,
/// to produce a more specific error than "format not recognised".
static SINGLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^"?[a-zçáâãéêíóôõú-]+"?$"#).expect("valid regex")
});

/// Extracts registration number and state code from the tail of an OAB query.
static OAB_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)([a-z]{2})$").expect("valid regex"));

/// The seven identifier kinds a search query can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Unified process number, formatted (`NNNNNNN-NN.NNNN.N.NN.NNNN`) or 20 bare digits.
    Cnj,
    /// Party name, fuzzy match. At least a first name and one surname token.
    PartyName,
    /// Party name in double quotes, exact match.
    ExactPartyName,
    /// Bar association registration: `OAB:` prefix, digits, two-letter state code.
    Oab,
    /// Natural-person tax id, 11 digits bare or `NNN.NNN.NNN-NN`.
    Cpf,
    /// Legal-entity tax id, 14 digits bare or `NN.NNN.NNN/NNNN-NN`.
    Cnpj,
    /// Police inquiry reference, `INQ:YYYY.<digits>`.
    PoliceInquiry,
}

impl QueryKind {
    /// Identify the kind of a raw search string.
    ///
    /// The input is trimmed, then tested against the shape patterns in a
    /// fixed order; the first match wins. Single-token names are rejected
    /// with [`QueryError::MissingSurname`] so the caller can tell "needs a
    /// surname" apart from "format not recognised".
    pub fn classify(query: &str) -> Result<Self, QueryError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(QueryError::Empty);
        }

        let candidates = [
            (&CNJ, Self::Cnj),
            (&CPF, Self::Cpf),
            (&CNPJ, Self::Cnpj),
            (&OAB, Self::Oab),
            (&PARTY_NAME, Self::PartyName),
            (&EXACT_PARTY_NAME, Self::ExactPartyName),
            (&POLICE_INQUIRY, Self::PoliceInquiry),
        ];
        for (pattern, kind) in candidates {
            if pattern.is_match(query) {
                debug!(?kind, query, "classified search query");
                return Ok(kind);
            }
        }

        if SINGLE_NAME.is_match(query) {
            return Err(QueryError::MissingSurname);
        }
        Err(QueryError::Unrecognized(query.to_string()))
    }

    /// API route for this kind. Pure lookup; every kind maps to one route.
    pub fn route(&self) -> &'static str {
        match self {
            Self::Cnj => "/processobycnj/",
            Self::PartyName => "/processobynomeparte/",
            Self::ExactPartyName => "/processobynomeparteexato/",
            Self::Oab => "/processobyoab/",
            Self::Cpf => "/processobycpf/",
            Self::Cnpj => "/processobycnpj/",
            Self::PoliceInquiry => "/processobyinquerito/",
        }
    }

    /// Build the request path for this kind.
    ///
    /// Party-name data is URL-encoded; other kinds pass through verbatim.
    /// Every kind except CNJ and the fuzzy party-name search returns a
    /// bounded result set upstream, so their pagination is pinned to page 1
    /// / size 1000 no matter what the caller supplied. OAB input is split
    /// back into registration number and state code, so `OAB:12345pa`
    /// becomes `12345/OAB-PA`. Trailing segments are appended in order:
    /// system name, page number, page size, each only when present.
    pub fn request_url(
        &self,
        data: &str,
        system_name: Option<&str>,
        page_number: Option<u32>,
        page_size: Option<u32>,
    ) -> String {
        let route = self.route();
        let data = match self {
            Self::PartyName | Self::ExactPartyName => urlencoding::encode(data).into_owned(),
            _ => data.to_string(),
        };
        let (page_number, page_size) = match self {
            Self::Cnj | Self::PartyName => (page_number, page_size),
            _ => (Some(1), Some(1000)),
        };

        let mut url = format!("{route}{data}");
        if *self == Self::Oab {
            if let Some(caps) = OAB_TAIL.captures(&data) {
                url = format!("{route}{}/OAB-{}", &caps[1], caps[2].to_uppercase());
            }
        }
        if let Some(system) = system_name {
            url.push('/');
            url.push_str(system);
        }
        if let Some(page) = page_number {
            url.push('/');
            url.push_str(&page.to_string());
        }
        if let Some(size) = page_size {
            url.push('/');
            url.push_str(&size.to_string());
        }
        url
    }
}
