//! Get and search queries, and their rendering into request URLs.
//!
//! # Design
//! A query is validated once, when it is built, and is immutable afterwards.
//! Rendering a URL is a pure function of the query and the base URL, so the
//! same query always yields the same string.
//!
//! Search terms use the server's boolean syntax. The filter clause
//! (`sponsor:` / `committee:`), the type clause (`(otype:a OR otype:b)`), and
//! the free-text clause are joined with `AND`, skipping empty ones. The whole
//! term is percent-encoded once as the `term` query parameter.

use std::collections::BTreeSet;

use crate::error::ConfigError;
use crate::types::{ApiVersion, Format, GetType, Page, PageSize, SearchType};

/// Request for one document of a known type by its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetQuery {
    doc_type: GetType,
    id: String,
    format: Format,
    version: ApiVersion,
}

impl GetQuery {
    pub fn new(doc_type: GetType, id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ConfigError::EmptyId);
        }
        Ok(Self {
            doc_type,
            id,
            format: Format::default(),
            version: ApiVersion::default(),
        })
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    pub fn doc_type(&self) -> GetType {
        self.doc_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    /// `{base}/api/{version}/{format}/{type}/{id}` with the id percent-encoded.
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/api/{}/{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.version,
            self.format.wire_format(),
            self.doc_type,
            urlencoding::encode(&self.id)
        )
    }
}

/// Request for one page of documents matching a boolean term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    types: BTreeSet<SearchType>,
    text: Option<String>,
    sponsor: Option<String>,
    committee: Option<String>,
    page: Page,
    page_size: PageSize,
    format: Format,
}

impl SearchQuery {
    pub fn builder() -> SearchQueryBuilder {
        SearchQueryBuilder::default()
    }

    /// Requested document types in canonical order.
    pub fn types(&self) -> impl Iterator<Item = SearchType> + '_ {
        self.types.iter().copied()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn sponsor(&self) -> Option<&str> {
        self.sponsor.as_deref()
    }

    pub fn committee(&self) -> Option<&str> {
        self.committee.as_deref()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// The boolean search term, before percent-encoding.
    pub fn term(&self) -> String {
        let mut clauses = Vec::with_capacity(3);

        let filters: Vec<String> = [("sponsor", &self.sponsor), ("committee", &self.committee)]
            .into_iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| field_clause(key, v)))
            .collect();
        if !filters.is_empty() {
            clauses.push(filters.join(" AND "));
        }

        if !self.types.is_empty() {
            let otypes: Vec<String> = self.types.iter().map(|t| format!("otype:{t}")).collect();
            clauses.push(format!("({})", otypes.join(" OR ")));
        }

        if let Some(text) = &self.text {
            clauses.push(format!("({text})"));
        }

        clauses.join(" AND ")
    }

    /// `{base}/search/?term=…&pageIdx=…&pageSize=…&format=…`
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/search/?term={}&pageIdx={}&pageSize={}&format={}",
            base_url.trim_end_matches('/'),
            urlencoding::encode(&self.term()),
            self.page.get(),
            self.page_size.get(),
            self.format.wire_format()
        )
    }
}

/// `key:value`, quoting values that contain whitespace or term syntax.
fn field_clause(key: &str, value: &str) -> String {
    let needs_quotes =
        value.contains(|c: char| c.is_whitespace() || matches!(c, '"' | '(' | ')' | ':'));
    if needs_quotes {
        format!("{key}:\"{}\"", value.replace('"', "\\\""))
    } else {
        format!("{key}:{value}")
    }
}

/// Collects search parameters; range checks happen in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    types: BTreeSet<SearchType>,
    text: Option<String>,
    sponsor: Option<String>,
    committee: Option<String>,
    page: i64,
    page_size: i64,
    format: Format,
}

impl Default for SearchQueryBuilder {
    fn default() -> Self {
        Self {
            types: BTreeSet::new(),
            text: None,
            sponsor: None,
            committee: None,
            page: i64::from(Page::FIRST),
            page_size: i64::from(PageSize::DEFAULT),
            format: Format::default(),
        }
    }
}

impl SearchQueryBuilder {
    pub fn search_type(mut self, search_type: SearchType) -> Self {
        self.types.insert(search_type);
        self
    }

    pub fn search_types(mut self, types: impl IntoIterator<Item = SearchType>) -> Self {
        self.types.extend(types);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = non_blank(text.into());
        self
    }

    pub fn sponsor(mut self, sponsor: impl Into<String>) -> Self {
        self.sponsor = non_blank(sponsor.into());
        self
    }

    pub fn committee(mut self, committee: impl Into<String>) -> Self {
        self.committee = non_blank(committee.into());
        self
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn build(self) -> Result<SearchQuery, ConfigError> {
        let page_size = PageSize::new(self.page_size)?;
        let page = Page::new(self.page)?;
        if self.types.is_empty()
            && self.text.is_none()
            && self.sponsor.is_none()
            && self.committee.is_none()
        {
            return Err(ConfigError::EmptySearch);
        }
        Ok(SearchQuery {
            types: self.types,
            text: self.text,
            sponsor: self.sponsor,
            committee: self.committee,
            page,
            page_size,
            format: self.format,
        })
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Either kind of request, as accepted by `OpenLegClient::fetch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Get(GetQuery),
    Search(SearchQuery),
}

impl Query {
    pub fn url(&self, base_url: &str) -> String {
        match self {
            Query::Get(query) => query.url(base_url),
            Query::Search(query) => query.url(base_url),
        }
    }

    pub fn format(&self) -> Format {
        match self {
            Query::Get(query) => query.format(),
            Query::Search(query) => query.format(),
        }
    }
}

impl From<GetQuery> for Query {
    fn from(query: GetQuery) -> Self {
        Query::Get(query)
    }
}

impl From<SearchQuery> for Query {
    fn from(query: SearchQuery) -> Self {
        Query::Search(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://open.nysenate.gov/legislation";

    fn decoded_term(url: &str) -> String {
        let raw = url
            .split("term=")
            .nth(1)
            .and_then(|rest| rest.split('&').next())
            .unwrap();
        urlencoding::decode(raw).unwrap().into_owned()
    }

    #[test]
    fn get_url_has_all_segments() {
        let query = GetQuery::new(GetType::Bill, "S66002").unwrap();
        assert_eq!(query.url(BASE), format!("{BASE}/api/1.0/xml/bill/S66002"));
    }

    #[test]
    fn get_url_encodes_the_id() {
        let query = GetQuery::new(GetType::Transcript, "09-13-2010 a/b")
            .unwrap()
            .with_format(Format::Json);
        assert_eq!(
            query.url(BASE),
            format!("{BASE}/api/1.0/json/transcript/09-13-2010%20a%2Fb")
        );
    }

    #[test]
    fn get_url_contains_type_segment_once() {
        for doc_type in GetType::ALL {
            let url = GetQuery::new(*doc_type, "X1").unwrap().url(BASE);
            let segment = format!("/{doc_type}/");
            assert_eq!(url.matches(&segment).count(), 1, "{url}");
            assert!(url.ends_with("/X1"));
        }
    }

    #[test]
    fn get_rejects_blank_id() {
        assert_eq!(GetQuery::new(GetType::Bill, "  "), Err(ConfigError::EmptyId));
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let query = GetQuery::new(GetType::Meeting, "m1").unwrap();
        assert_eq!(query.url(&format!("{BASE}/")), query.url(BASE));
    }

    #[test]
    fn search_url_parameter_order_is_fixed() {
        let query = SearchQuery::builder()
            .search_type(SearchType::Bill)
            .text("healthcare")
            .page(2)
            .page_size(10)
            .build()
            .unwrap();
        assert_eq!(
            query.url(BASE),
            format!(
                "{BASE}/search/?term=%28otype%3Abill%29%20AND%20%28healthcare%29&pageIdx=2&pageSize=10&format=xml"
            )
        );
    }

    #[test]
    fn search_term_joins_filters_types_and_text() {
        let query = SearchQuery::builder()
            .sponsor("alesi")
            .committee("Health")
            .search_types([SearchType::Vote, SearchType::Bill])
            .text("tax OR levy")
            .build()
            .unwrap();
        assert_eq!(
            query.term(),
            "sponsor:alesi AND committee:Health AND (otype:bill OR otype:vote) AND (tax OR levy)"
        );
        assert_eq!(decoded_term(&query.url(BASE)), query.term());
    }

    #[test]
    fn search_term_omits_empty_clauses() {
        let only_sponsor = SearchQuery::builder().sponsor("smith").build().unwrap();
        assert_eq!(only_sponsor.term(), "sponsor:smith");

        let only_types = SearchQuery::builder()
            .search_type(SearchType::Calendar)
            .build()
            .unwrap();
        assert_eq!(only_types.term(), "(otype:calendar)");

        let blank_text = SearchQuery::builder()
            .search_type(SearchType::Action)
            .text("   ")
            .build()
            .unwrap();
        assert_eq!(blank_text.term(), "(otype:action)");
    }

    #[test]
    fn filter_values_with_spaces_are_quoted() {
        let query = SearchQuery::builder()
            .committee("Rules and Ethics")
            .build()
            .unwrap();
        assert_eq!(query.term(), "committee:\"Rules and Ethics\"");
    }

    #[test]
    fn type_clause_is_order_independent() {
        let forward = SearchQuery::builder()
            .search_types([SearchType::Bill, SearchType::Meeting, SearchType::Vote])
            .build()
            .unwrap();
        let backward = SearchQuery::builder()
            .search_types([SearchType::Vote, SearchType::Meeting, SearchType::Bill])
            .build()
            .unwrap();
        assert_eq!(forward.term(), backward.term());
        assert_eq!(forward.url(BASE), backward.url(BASE));
    }

    #[test]
    fn every_type_subset_gets_one_otype_per_member() {
        let all = SearchType::ALL;
        for mask in 1u32..(1 << all.len()) {
            let members: Vec<SearchType> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, t)| *t)
                .collect();
            let term = SearchQuery::builder()
                .search_types(members.iter().rev().copied())
                .build()
                .unwrap()
                .term();

            assert!(term.starts_with('(') && term.ends_with(')'), "{term}");
            assert_eq!(term.matches('(').count(), 1, "{term}");
            assert_eq!(term.matches("otype:").count(), members.len(), "{term}");
            assert_eq!(term.matches(" OR ").count(), members.len() - 1, "{term}");
            for member in &members {
                assert!(term.contains(&format!("otype:{member}")), "{term}");
            }
        }
    }

    #[test]
    fn duplicate_types_collapse() {
        let query = SearchQuery::builder()
            .search_types([SearchType::Bill, SearchType::Bill])
            .build()
            .unwrap();
        assert_eq!(query.term(), "(otype:bill)");
    }

    #[test]
    fn filter_values_with_term_syntax_are_quoted() {
        let term = |sponsor: &str| {
            SearchQuery::builder().sponsor(sponsor).build().unwrap().term()
        };
        assert_eq!(term("O\"Mara"), r#"sponsor:"O\"Mara""#);
        assert_eq!(term("SMITH(R)"), r#"sponsor:"SMITH(R)""#);
        assert_eq!(term("a:b"), r#"sponsor:"a:b""#);
        assert_eq!(term("O'Mara"), "sponsor:O'Mara");
    }

    #[test]
    fn pages_beyond_u32_are_accepted() {
        let query = SearchQuery::builder().text("x").page(5_000_000_000).build().unwrap();
        assert_eq!(query.page().get(), 5_000_000_000);
        assert!(query.url(BASE).contains("&pageIdx=5000000000&"));
    }

    #[test]
    fn search_validates_page_and_size() {
        let base = || SearchQuery::builder().text("x");
        assert_eq!(base().page_size(0).build(), Err(ConfigError::PageSize(0)));
        assert_eq!(base().page_size(100).build(), Err(ConfigError::PageSize(100)));
        assert_eq!(base().page_size(-3).build(), Err(ConfigError::PageSize(-3)));
        assert_eq!(base().page(0).build(), Err(ConfigError::Page(0)));
        assert!(base().page_size(1).build().is_ok());
        assert!(base().page_size(99).build().is_ok());
    }

    #[test]
    fn empty_search_is_rejected() {
        assert_eq!(SearchQuery::builder().build(), Err(ConfigError::EmptySearch));
        assert_eq!(
            SearchQuery::builder().text("").sponsor(" ").build(),
            Err(ConfigError::EmptySearch)
        );
    }

    #[test]
    fn object_format_requests_xml() {
        let query = SearchQuery::builder()
            .text("x")
            .format(Format::Object)
            .build()
            .unwrap();
        assert!(query.url(BASE).ends_with("&format=xml"));
        assert_eq!(query.format(), Format::Object);
    }

    #[test]
    fn building_twice_is_byte_identical() {
        let build = || {
            SearchQuery::builder()
                .sponsor("O'Mara")
                .search_types([SearchType::Transcript, SearchType::Bill])
                .text("école & co")
                .page(3)
                .build()
                .unwrap()
        };
        assert_eq!(build().url(BASE), build().url(BASE));
        let query = build();
        assert_eq!(query.url(BASE), query.url(BASE));
    }

    #[test]
    fn query_enum_dispatches() {
        let get: Query = GetQuery::new(GetType::Bill, "S1").unwrap().into();
        let search: Query = SearchQuery::builder()
            .text("x")
            .format(Format::Csv)
            .build()
            .unwrap()
            .into();
        assert!(get.url(BASE).contains("/api/"));
        assert_eq!(search.format(), Format::Csv);
        assert!(search.url(BASE).contains("/search/?"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Page sizes strictly between 0 and 100 build, everything else is rejected
        #[test]
        fn page_size_range(size in -1_000i64..1_000) {
            let result = SearchQuery::builder().text("x").page_size(size).build();
            if 0 < size && size < 100 {
                prop_assert_eq!(i64::from(result.unwrap().page_size()), size);
            } else {
                prop_assert_eq!(result, Err(ConfigError::PageSize(size)));
            }
        }

        /// The term decodes back out of the URL unchanged
        #[test]
        fn term_survives_encoding(text in "[a-zA-Z0-9 &/?#%()=+]{1,40}", page in 1i64..500) {
            let query = SearchQuery::builder()
                .search_type(SearchType::Bill)
                .text(text)
                .page(page)
                .build()
                .unwrap();
            let url = query.url("http://localhost");
            let raw = url
                .split("term=")
                .nth(1)
                .and_then(|rest| rest.split('&').next())
                .unwrap();
            prop_assert_eq!(urlencoding::decode(raw).unwrap().into_owned(), query.term());
            prop_assert_eq!(url, query.url("http://localhost"));
        }
    }
}
