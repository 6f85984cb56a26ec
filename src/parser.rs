use arrayvec::ArrayVec;
use bbref_leaders_utils::selector;
use log::{debug, error};
use scraper::{ElementRef, Html};
use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::schema::{LeaderRecord, LeaderSet, StatValue, MAX_LEADERS};

/// How much structure to pull out of each row.
///
/// The defaults split the team code off the player name and parse values as numbers.
/// Turning both off gives the plain two-column view of the table.
#[derive(Clone, Copy, PartialEq, Eq, Debug, TypedBuilder, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    #[builder(default = true)]
    pub split_affiliation: bool,
    #[builder(default = true)]
    pub coerce_numeric: bool,
}
impl Default for ExtractOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}
impl ExtractOptions {
    pub fn raw() -> Self {
        Self::builder()
            .split_affiliation(false)
            .coerce_numeric(false)
            .build()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Value cell of data row {row} is not a number: {text:?}")]
    MalformedValue { row: usize, text: String },
}

pub fn parse_document(markup: &str) -> Html {
    Html::parse_document(markup)
}

/// Parses `markup` and extracts the table wrapped by `div#table_id`.
pub fn extract_from_str(
    markup: &str,
    table_id: &str,
    options: ExtractOptions,
) -> Result<Option<LeaderSet>, ExtractError> {
    extract(&parse_document(markup), table_id, options)
}

/// Extracts up to [`MAX_LEADERS`] records from the table wrapped by `div#table_id`.
///
/// Returns `Ok(None)` if the page has no such table.
/// The first `tr` is the header and is skipped.
/// Rows without a `td.who` cell are skipped but still count toward the limit.
pub fn extract(
    html: &Html,
    table_id: &str,
    options: ExtractOptions,
) -> Result<Option<LeaderSet>, ExtractError> {
    let Some(container) = find_by_id(html, table_id) else {
        error!("Could not find table with ID: {table_id}");
        return Ok(None);
    };

    let mut records = ArrayVec::<_, MAX_LEADERS>::new();
    for (row, tr) in (1..).zip(
        container
            .select(selector!("tr"))
            .skip(1)
            .take(MAX_LEADERS),
    ) {
        match parse_row(tr, row, options)? {
            Some(record) => records.push(record),
            None => debug!("Data row {row} of {table_id} has no player cell; skipped"),
        }
    }
    Ok(Some(LeaderSet::new(records)))
}

fn parse_row(
    tr: ElementRef,
    row: usize,
    options: ExtractOptions,
) -> Result<Option<LeaderRecord>, ExtractError> {
    let Some(who) = tr.select(selector!("td.who")).next() else {
        return Ok(None);
    };

    let (name, affiliation) = if options.split_affiliation {
        let name = who
            .select(selector!("a"))
            .next()
            .map(text_of)
            .unwrap_or_default();
        let affiliation = who
            .select(selector!("span.desc"))
            .next()
            .map(|span| strip_parens(&text_of(span)).to_owned())
            .unwrap_or_default();
        (name, affiliation)
    } else {
        (text_of(who), String::new())
    };

    let value = match tr.select(selector!("td.value")).next().map(text_of) {
        None => None,
        Some(text) if text.is_empty() => None,
        Some(text) if options.coerce_numeric => match text.parse::<f64>() {
            Ok(x) => Some(StatValue::Number(x)),
            Err(_) => return Err(ExtractError::MalformedValue { row, text }),
        },
        Some(text) => Some(StatValue::Text(text)),
    };

    Ok(Some(
        LeaderRecord::builder()
            .name(name)
            .affiliation(affiliation)
            .value(value)
            .build(),
    ))
}

/// The first `div` whose `id` is exactly `id`.
fn find_by_id<'a>(html: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    html.select(selector!("div[id]"))
        .find(|div| div.value().id() == Some(id))
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// `"(PHO)"` -> `"PHO"`
fn strip_parens(text: &str) -> &str {
    text.trim_matches(|c: char| c == '(' || c == ')' || c.is_whitespace())
}
