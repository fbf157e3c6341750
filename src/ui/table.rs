use tabled::{settings::Style, Table, Tabled};

use crate::context::ResolvedDocument;
use crate::coverage::Report;
use crate::ui::output::status_badge;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

#[derive(Tabled)]
struct CoverageRow {
    #[tabled(rename = "Section")]
    title: String,
    #[tabled(rename = "Statements")]
    total: usize,
    #[tabled(rename = "Uncovered")]
    uncovered: usize,
    #[tabled(rename = "Coverage")]
    coverage: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// One row per section plus a document total
pub fn coverage_table(report: &Report) -> String {
    let mut rows: Vec<CoverageRow> = report
        .partials
        .iter()
        .map(|p| CoverageRow {
            title: p.title.clone(),
            total: p.total,
            uncovered: p.uncovered,
            coverage: format!("{}%", p.coverage),
            status: status_badge(p.status),
        })
        .collect();

    rows.push(CoverageRow {
        title: "Total".to_string(),
        total: report.total,
        uncovered: report.uncovered,
        coverage: format!("{}%", report.coverage),
        status: status_badge(report.status()),
    });

    Table::new(&rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct BibRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Marker")]
    marker: String,
    #[tabled(rename = "Cited")]
    cited: usize,
}

/// Bibliography listing with final markers and citation counts
pub fn bibliography_table(doc: &ResolvedDocument) -> String {
    let rows: Vec<BibRow> = doc
        .bibliography()
        .items()
        .map(|item| BibRow {
            key: item.key.clone(),
            marker: doc
                .marker(&item.key)
                .map(str::to_string)
                .unwrap_or_else(|| item.own_marker()),
            cited: doc.cited_by(&item.key).len(),
        })
        .collect();

    if rows.is_empty() {
        return String::new();
    }
    Table::new(&rows).with(Style::rounded()).to_string()
}
