use anyhow::{bail, Context, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use super::Row;

const USER_AGENT: &str = concat!(
    "advisory-watch/",
    env!("CARGO_PKG_VERSION"),
    " (weather advisory monitor)"
);

/// Fetch the advisory page and extract its table rows.
pub async fn fetch_rows(client: &Client, url: &str) -> Result<Vec<Row>> {
    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await
        .with_context(|| format!("requesting {}", url))?;

    let status = response.status();
    if !status.is_success() {
        bail!("{} returned HTTP {}", url, status);
    }

    let html = response.text().await?;
    let rows = parse_rows(&html)?;
    tracing::debug!(url, rows = rows.len(), "fetched advisory table");
    Ok(rows)
}

/// Extract `table tbody tr` rows, one string per `td` with whitespace collapsed.
///
/// A page without `table tbody` (maintenance page, changed layout, table
/// filled in by script) is an error, not an empty advisory list. An existing
/// but empty `tbody` means no advisories. Rows without any `td` come back
/// empty; the normalizer skips them.
pub fn parse_rows(html: &str) -> Result<Vec<Row>> {
    let document = Html::parse_document(html);
    let body_selector = Selector::parse("table tbody")
        .map_err(|e| anyhow::anyhow!("invalid table selector: {e}"))?;
    let row_selector =
        Selector::parse("tr").map_err(|e| anyhow::anyhow!("invalid row selector: {e}"))?;
    let cell_selector =
        Selector::parse("td").map_err(|e| anyhow::anyhow!("invalid cell selector: {e}"))?;

    let Some(tbody) = document.select(&body_selector).next() else {
        bail!("advisory table not found on page");
    };

    let rows = tbody
        .select(&row_selector)
        .map(|tr| tr.select(&cell_selector).map(cell_text).collect::<Row>())
        .collect();

    Ok(rows)
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
