//! Output formatting for lookup results (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::shop::models::{Availability, ScrapeResult};
use serde::Serialize;

/// One query with its lookup result, the unit everything here renders.
#[derive(Serialize)]
struct Row<'a> {
    query: &'a str,
    #[serde(flatten)]
    result: &'a ScrapeResult,
}

/// Formats lookup results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single lookup result.
    pub fn format_row(&self, query: &str, result: &ScrapeResult) -> String {
        match self.format {
            OutputFormat::Json => self.json_single(query, result),
            OutputFormat::Table => self.table_single(query, result),
            OutputFormat::Markdown => {
                self.markdown_rows(&[(query.to_string(), result.clone())])
            }
            OutputFormat::Csv => self.csv_rows(&[(query.to_string(), result.clone())]),
        }
    }

    /// Formats multiple lookup results.
    pub fn format_rows(&self, rows: &[(String, ScrapeResult)]) -> String {
        if rows.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No results.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_rows(rows),
            OutputFormat::Table => self.table_rows(rows),
            OutputFormat::Markdown => self.markdown_rows(rows),
            OutputFormat::Csv => self.csv_rows(rows),
        }
    }

    // JSON formatting

    fn json_single(&self, query: &str, result: &ScrapeResult) -> String {
        serde_json::to_string_pretty(&Row { query, result })
            .unwrap_or_else(|_| "{}".to_string())
    }

    fn json_rows(&self, rows: &[(String, ScrapeResult)]) -> String {
        let rows: Vec<Row<'_>> =
            rows.iter().map(|(query, result)| Row { query, result }).collect();
        serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn status_label(result: &ScrapeResult) -> String {
        match result.availability {
            Some(status) => match &result.availability_label {
                Some(label) => format!("{} ({})", status, label),
                None => status.to_string(),
            },
            None => "Brak informacji".to_string(),
        }
    }

    fn table_single(&self, query: &str, result: &ScrapeResult) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Query:   {}", query));
        lines.push(format!("Status:  {}", Self::status_label(result)));

        if let Some(image) = &result.image_url {
            lines.push(format!("Image:   {}", image));
        } else {
            lines.push("Image:   N/A".to_string());
        }

        if let Some(url) = &result.product_url {
            lines.push(format!("Product: {}", url));
        }

        if let Some(error) = &result.error {
            lines.push(format!("Error:   {}", error));
        }

        lines.join("\n")
    }

    fn table_rows(&self, rows: &[(String, ScrapeResult)]) -> String {
        let query_width = 20;
        let status_width = 24;
        let ok_width = 3;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<query_width$}  {:<status_width$}  {:<ok_width$}  {}",
            "Query", "Status", "OK", "Product URL"
        ));
        lines.push(format!(
            "{:-<query_width$}  {:-<status_width$}  {:-<ok_width$}  {:-<40}",
            "", "", "", ""
        ));

        for (query, result) in rows {
            let ok = if result.success { "yes" } else { "no" };
            let url = result.product_url.as_deref().unwrap_or("N/A");

            lines.push(format!(
                "{:<query_width$}  {:<status_width$}  {:<ok_width$}  {}",
                query,
                Self::status_label(result),
                ok,
                url
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} lookups", rows.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_rows(&self, rows: &[(String, ScrapeResult)]) -> String {
        let mut lines = Vec::new();

        lines.push("| Query | Status | Image | Product |".to_string());
        lines.push("|-------|--------|-------|---------|".to_string());

        for (query, result) in rows {
            let image = match &result.image_url {
                Some(url) => format!("[image]({})", url),
                None => String::new(),
            };
            let product = match &result.product_url {
                Some(url) => format!("[link]({})", url),
                None => String::new(),
            };

            lines.push(format!(
                "| {} | {} | {} | {} |",
                query,
                Self::status_label(result),
                image,
                product
            ));
        }

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "query,success,availability,availability_label,image_url,product_url,error".to_string()
    }

    fn csv_rows(&self, rows: &[(String, ScrapeResult)]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for (query, result) in rows {
            let availability = result
                .availability
                .map(|status| match status {
                    Availability::Available => "available",
                    Availability::Unavailable => "unavailable",
                    Availability::OnOrder => "on_order",
                    Availability::CheckOnSite => "check_on_site",
                })
                .unwrap_or_default();

            lines.push(format!(
                "{},{},{},{},{},{},{}",
                Self::csv_escape(query),
                result.success,
                availability,
                result.availability_label.as_deref().map(Self::csv_escape).unwrap_or_default(),
                result.image_url.as_deref().unwrap_or_default(),
                result.product_url.as_deref().unwrap_or_default(),
                result.error.as_deref().map(Self::csv_escape).unwrap_or_default(),
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}
