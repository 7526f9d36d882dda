//! Listing-card parsing.
//!
//! The crawl stage captures one markup snippet per job card on the listing
//! page. This module turns those snippets into structured posting rows —
//! the input dataset for the capture and extraction stages downstream.
//!
//! Card layouts drift, so every selector has a fallback and every field a
//! placeholder; a snippet that matches nothing still yields a row.

use std::io::{Read, Write};

use scraper::{ElementRef, Html, Selector};

use crate::errors::AppError;

/// Placeholder for a field the card did not carry.
pub const FIELD_MISSING: &str = "N/A";

/// Output column order for the listing dataset.
pub const LISTING_HEADERS: [&str; 7] = [
    "company",
    "title",
    "experience",
    "employment_type",
    "education",
    "location",
    "link",
];

/// One parsed listing card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub company: String,
    pub title: String,
    pub experience: String,
    pub employment_type: String,
    pub education: String,
    pub location: String,
    pub link: String,
}

/// Parses one captured card snippet. Never fails — unmatched fields come
/// back as `N/A`.
pub fn parse_listing_card(snippet: &str) -> ListingEntry {
    let fragment = Html::parse_fragment(snippet);

    let link = select_first(&fragment, "a[href]")
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
        .unwrap_or_else(|| FIELD_MISSING.to_string());

    // company sits in the summary header; older cards nest it differently
    let company = select_first(&fragment, "div section span")
        .map(element_text)
        .or_else(|| {
            select_first(&fragment, "div.ds-web-summary")
                .and_then(|container| first_span_text(container))
        })
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| FIELD_MISSING.to_string());

    let title = select_first(&fragment, "div div p")
        .map(element_text)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| FIELD_MISSING.to_string());

    // the last summary container lists the detail spans positionally
    let details = last_summary_details(&fragment);
    let detail = |i: usize| {
        details
            .get(i)
            .cloned()
            .unwrap_or_else(|| FIELD_MISSING.to_string())
    };

    ListingEntry {
        company,
        title,
        experience: detail(0),
        employment_type: detail(1),
        education: detail(2),
        location: detail(3),
        link,
    }
}

/// Reads captured snippets (headerless CSV, one snippet in the first
/// column) and parses each into a listing row. Blank snippets are skipped.
pub fn parse_captured<R: Read>(reader: R) -> Result<Vec<ListingEntry>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut entries = Vec::new();
    for row in reader.records() {
        let row = row?;
        let snippet = row.get(0).unwrap_or_default();
        if snippet.trim().is_empty() {
            continue;
        }
        entries.push(parse_listing_card(snippet));
    }
    Ok(entries)
}

pub fn write_listing<W: Write>(writer: W, entries: &[ListingEntry]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(LISTING_HEADERS)?;
    for entry in entries {
        writer.write_record([
            &entry.company,
            &entry.title,
            &entry.experience,
            &entry.employment_type,
            &entry.education,
            &entry.location,
            &entry.link,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn select_first<'a>(fragment: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    fragment.select(&selector).next()
}

fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_span_text(container: ElementRef) -> Option<String> {
    let selector = Selector::parse("span").ok()?;
    container.select(&selector).next().map(element_text)
}

/// Direct-child span texts of the last `.ds-web-summary` container, with
/// separator dots and blanks dropped.
fn last_summary_details(fragment: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("div.ds-web-summary") else {
        return Vec::new();
    };
    let Some(container) = fragment.select(&selector).last() else {
        return Vec::new();
    };

    container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "span")
        .map(|element| element_text(element))
        .filter(|text| !text.is_empty() && text != "·")
        .collect()
}
