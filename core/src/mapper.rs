//! Maps an XML document-collection body into [`Bill`] records.
//!
//! # Design
//! Only the top level is strict: a body that is not XML is an
//! [`ApiError::Parse`]. Inside a matched `<bill>` element nothing fails.
//! Missing attributes become empty strings, missing child elements become
//! `None`, and a `<cosponsors>` list that does not have the expected shape
//! becomes an empty list. The upstream schema drifts, and one odd bill
//! should not hide the rest of the page.

use roxmltree::{Document, Node, ParsingOptions};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::types::Bill;

const BILL_TAG: &str = "bill";

/// Parse every `<bill>` element in `body`, in document order.
pub fn parse_bills(body: &str) -> Result<Vec<Bill>, ApiError> {
    // Dockets may open with a DOCTYPE declaration; it is read but never loaded.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(body, options)
        .map_err(|e| ApiError::Parse(e.to_string()))?;

    let bills: Vec<Bill> = doc
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == BILL_TAG)
        .map(bill_from_element)
        .collect();

    debug!(count = bills.len(), "mapped bills from response body");
    Ok(bills)
}

fn bill_from_element(element: Node<'_, '_>) -> Bill {
    let attr = |name: &str| element.attribute(name).unwrap_or_default().to_string();

    let mut bill = Bill {
        id: attr("billId"),
        year: attr("year"),
        title: attr("title"),
        sponsor: attr("sponsor"),
        law_section: attr("lawSection"),
        ..Bill::default()
    };

    let mut seen_cosponsors = false;
    for child in element.children().filter(Node::is_element) {
        match child.tag_name().name().to_ascii_lowercase().as_str() {
            "summary" => bill.summary = Some(first_text(child)),
            "committee" => bill.committee = Some(first_text(child)),
            "text" => bill.text = Some(first_text(child)),
            "cosponsors" if !seen_cosponsors => {
                seen_cosponsors = true;
                bill.cosponsors = cosponsor_names(child).unwrap_or_else(|| {
                    warn!(bill = %bill.id, "cosponsors element is malformed, ignoring it");
                    Vec::new()
                });
            }
            _ => {}
        }
    }

    bill
}

/// Value of the first text node under `element`, or `""` when there is none.
fn first_text(element: Node<'_, '_>) -> String {
    element
        .children()
        .find(Node::is_text)
        .and_then(|node| node.text())
        .unwrap_or_default()
        .to_string()
}

/// Text of each element child, in order. `None` if any entry carries no text.
fn cosponsor_names(list: Node<'_, '_>) -> Option<Vec<String>> {
    list.children()
        .filter(Node::is_element)
        .map(|entry| {
            entry
                .children()
                .find(Node::is_text)
                .and_then(|node| node.text())
                .map(str::to_string)
        })
        .collect()
}
