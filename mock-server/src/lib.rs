//! In-memory stand-in for the Open Legislation service.
//!
//! Serves a fixed docket of bills under the same paths as the real service:
//! `/legislation/api/1.0/{format}/{type}/{id}` and
//! `/legislation/search/?term=…&pageIdx=…&pageSize=…&format=…`.
//! Search understands the subset of the term syntax the client emits:
//! `sponsor:`/`committee:` filters, an `(otype:… OR …)` group, and a
//! parenthesised free-text clause whose `OR`ed words match titles and
//! summaries.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub year: String,
    pub title: String,
    pub sponsor: String,
    pub law_section: String,
    pub summary: Option<String>,
    pub committee: Option<String>,
    pub cosponsors: Vec<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub term: String,
    #[serde(rename = "pageIdx", default = "first_page")]
    pub page_idx: usize,
    #[serde(rename = "pageSize", default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_format")]
    pub format: String,
}

fn first_page() -> usize {
    1
}

fn default_page_size() -> usize {
    20
}

fn default_format() -> String {
    "xml".to_string()
}

pub type Docket = Arc<Vec<Bill>>;

/// Bills served by [`app`].
pub fn fixture_bills() -> Vec<Bill> {
    let bill = |id: &str, title: &str, sponsor: &str, committee: &str, cosponsors: &[&str]| Bill {
        id: id.to_string(),
        year: "2010".to_string(),
        title: title.to_string(),
        sponsor: sponsor.to_string(),
        law_section: "Tax Law".to_string(),
        summary: Some(format!("Summary of {title}")),
        committee: Some(committee.to_string()),
        cosponsors: cosponsors.iter().map(|c| c.to_string()).collect(),
    };
    vec![
        bill("S66002", "Healthcare access act", "ALESI", "Health", &["LARKIN", "LIBOUS"]),
        bill("S1234", "School bus safety", "ALESI", "Transportation", &[]),
        bill("S2020", "Rural healthcare grants", "SMITH", "Health", &["ALESI"]),
        bill("A555", "Bridge repair bond act", "JONES", "Rules and Ethics", &["SMITH"]),
    ]
}

pub fn app() -> Router {
    app_with(fixture_bills())
}

pub fn app_with(bills: Vec<Bill>) -> Router {
    let docket: Docket = Arc::new(bills);
    Router::new()
        .route("/legislation/api/{version}/{format}/{doc_type}/{id}", get(get_document))
        .route("/legislation/search/", get(search))
        .with_state(docket)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn get_document(
    State(docket): State<Docket>,
    Path((version, format, doc_type, id)): Path<(String, String, String, String)>,
) -> Response {
    tracing::debug!(%version, %format, %doc_type, %id, "get");
    if version != "1.0" {
        return StatusCode::BAD_REQUEST.into_response();
    }
    if doc_type != "bill" {
        return StatusCode::NOT_FOUND.into_response();
    }
    match docket.iter().find(|bill| bill.id == id) {
        Some(bill) => render(&format, std::slice::from_ref(bill)),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn search(State(docket): State<Docket>, Query(params): Query<SearchParams>) -> Response {
    tracing::debug!(term = %params.term, page = params.page_idx, size = params.page_size, "search");
    if params.page_idx == 0 || params.page_size == 0 || params.page_size >= 100 {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let filter = TermFilter::parse(&params.term);
    let hits: Vec<Bill> = docket
        .iter()
        .filter(|bill| filter.matches(bill))
        .skip((params.page_idx - 1) * params.page_size)
        .take(params.page_size)
        .cloned()
        .collect();
    render(&params.format, &hits)
}

fn render(format: &str, bills: &[Bill]) -> Response {
    match format {
        "xml" => (
            [(header::CONTENT_TYPE, "application/xml")],
            docket_xml(bills),
        )
            .into_response(),
        "json" => Json(bills.to_vec()).into_response(),
        _ => StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response(),
    }
}

/// `<docket>` document with one `<bill>` element per bill.
pub fn docket_xml(bills: &[Bill]) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<docket>\n");
    for bill in bills {
        out.push_str(&format!(
            "  <bill billId=\"{}\" year=\"{}\" title=\"{}\" sponsor=\"{}\" lawSection=\"{}\">\n",
            escape(&bill.id),
            escape(&bill.year),
            escape(&bill.title),
            escape(&bill.sponsor),
            escape(&bill.law_section),
        ));
        if let Some(summary) = &bill.summary {
            out.push_str(&format!("    <summary>{}</summary>\n", escape(summary)));
        }
        if let Some(committee) = &bill.committee {
            out.push_str(&format!("    <committee>{}</committee>\n", escape(committee)));
        }
        out.push_str("    <cosponsors>\n");
        for cosponsor in &bill.cosponsors {
            out.push_str(&format!("      <cosponsor>{}</cosponsor>\n", escape(cosponsor)));
        }
        out.push_str("    </cosponsors>\n  </bill>\n");
    }
    out.push_str("</docket>\n");
    out
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Filters extracted from a search term.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TermFilter {
    pub sponsor: Option<String>,
    pub committee: Option<String>,
    pub otypes: Vec<String>,
    pub words: Vec<String>,
}

impl TermFilter {
    pub fn parse(term: &str) -> Self {
        let mut filter = TermFilter::default();
        for clause in split_top_level(term, " AND ") {
            let clause = clause.trim();
            if let Some(value) = clause.strip_prefix("sponsor:") {
                filter.sponsor = Some(unquote(value));
            } else if let Some(value) = clause.strip_prefix("committee:") {
                filter.committee = Some(unquote(value));
            } else {
                let inner = clause
                    .strip_prefix('(')
                    .and_then(|c| c.strip_suffix(')'))
                    .unwrap_or(clause);
                for part in inner.split(" OR ") {
                    let part = part.trim();
                    match part.strip_prefix("otype:") {
                        Some(otype) => filter.otypes.push(otype.to_string()),
                        None if !part.is_empty() => filter.words.push(part.to_lowercase()),
                        None => {}
                    }
                }
            }
        }
        filter
    }

    pub fn matches(&self, bill: &Bill) -> bool {
        let same = |wanted: &Option<String>, actual: Option<&str>| {
            wanted
                .as_deref()
                .is_none_or(|w| actual.is_some_and(|a| a.eq_ignore_ascii_case(w)))
        };
        let type_ok = self.otypes.is_empty() || self.otypes.iter().any(|t| t == "bill");
        let text_ok = self.words.is_empty()
            || self.words.iter().any(|word| {
                bill.title.to_lowercase().contains(word)
                    || bill
                        .summary
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(word))
            });
        type_ok
            && text_ok
            && same(&self.sponsor, Some(bill.sponsor.as_str()))
            && same(&self.committee, bill.committee.as_deref())
    }
}

/// Split on `separator` where it is outside quotes and parentheses.
fn split_top_level<'a>(term: &'a str, separator: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut start = 0;
    let mut i = 0;
    let bytes = term.as_bytes();
    while i < bytes.len() {
        match bytes[i] {
            b'"' if i == 0 || bytes[i - 1] != b'\\' => quoted = !quoted,
            b'(' if !quoted => depth += 1,
            b')' if !quoted => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 && !quoted && bytes[i..].starts_with(separator.as_bytes()) {
            parts.push(&term[start..i]);
            i += separator.len();
            start = i;
            continue;
        }
        i += 1;
    }
    parts.push(&term[start..]);
    parts
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .map(|v| v.replace("\\\"", "\""))
        .unwrap_or_else(|| value.to_string())
}
