//! Fixed-width table rendering of the report tables and the data-quality
//! summary.

use lift_core::types::{AnalysisReport, CpaEntry, CpluEntry, MetricValue};

pub struct ReportRenderer;

impl ReportRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Renders every report table plus the data-quality summary.
    pub fn render(&self, report: &AnalysisReport) -> String {
        let mut out = String::new();

        out.push_str("--- Spend by Market ---\n");
        out.push_str(&table(
            &["Market", "Spend_USD"],
            report
                .spend_by_market
                .iter()
                .map(|row| vec![row.market.clone(), money(row.spend_usd)])
                .collect(),
        ));

        out.push_str("\n--- CPA by Market and Channel ---\n");
        out.push_str(&table(
            &["Market", "Channel", "Spend_USD", "Conversions", "CPA"],
            report.cpa.iter().map(cpa_row).collect(),
        ));
        if !report.cpa_undefined.is_empty() {
            out.push_str("\nUndefined CPA (no conversions):\n");
            out.push_str(&table(
                &["Market", "Channel", "Spend_USD", "Conversions", "CPA"],
                report.cpa_undefined.iter().map(cpa_row).collect(),
            ));
        }

        out.push_str("\n--- Cost Per Lifted User (CPLU) by Campaign, Market & Channel ---\n");
        out.push_str(&table(
            &["Campaign_Name", "Market", "Channel", "CPLU", "Lifted_Users"],
            report.cplu.iter().map(cplu_row).collect(),
        ));
        if !report.cplu_undefined.is_empty() {
            out.push_str("\nUndefined CPLU (no positive lift):\n");
            out.push_str(&table(
                &["Campaign_Name", "Market", "Channel", "CPLU", "Lifted_Users"],
                report.cplu_undefined.iter().map(cplu_row).collect(),
            ));
        }

        out.push_str("\n--- Brand Lift Study Results with Statistical Significance ---\n");
        out.push_str(&table(
            &["Campaign_Name", "Market", "Channel", "Relative_Lift", "P_value", "Significant"],
            report
                .significance
                .iter()
                .map(|row| {
                    vec![
                        row.campaign_name.clone(),
                        row.market.clone(),
                        row.channel.clone(),
                        format!("{:.4}", row.relative_lift),
                        format!("{:.4}", row.p_value),
                        row.significant.to_string(),
                    ]
                })
                .collect(),
        ));

        out.push_str("\n--- Data Quality ---\n");
        let quality = &report.quality;
        if quality.join_empty {
            out.push_str("WARNING: the historic/lift join produced zero rows\n");
        }
        out.push_str(&format!(
            "Dropped brand-lift rows (no historic match): {}\n",
            quality.dropped_lift_rows
        ));
        out.push_str(&format!(
            "Dropped historic keys (no brand-lift match): {}\n",
            quality.dropped_historic_keys
        ));
        out.push_str(&format!("Undefined CPA rows: {}\n", quality.undefined_cpa_rows));
        out.push_str(&format!("Undefined CPLU rows: {}\n", quality.undefined_cplu_rows));
        out.push_str(&format!(
            "Skipped significance rows: {}\n",
            quality.skipped_significance_rows
        ));

        out
    }
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn cpa_row(entry: &CpaEntry) -> Vec<String> {
    vec![
        entry.market.clone(),
        entry.channel.clone(),
        money(entry.spend_usd),
        entry.conversions.to_string(),
        metric(&entry.cpa),
    ]
}

fn cplu_row(entry: &CpluEntry) -> Vec<String> {
    vec![
        entry.campaign_name.clone(),
        entry.market.clone(),
        entry.channel.clone(),
        metric(&entry.cplu),
        format!("{:.1}", entry.lifted_users),
    ]
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn metric(value: &MetricValue) -> String {
    match value {
        MetricValue::Defined(v) => format!("{v:.2}"),
        MetricValue::Undefined(_) => "undefined".to_string(),
    }
}

/// Left-aligned fixed-width table with a header row.
fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let mut out = String::new();
    for (i, header) in headers.iter().enumerate() {
        out.push_str(&format!("{:<width$}  ", header, width = widths[i]));
    }
    out.push('\n');
    if rows.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            out.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lift_core::types::{DataQualitySummary, SignificanceRow, SpendByMarketRow, UndefinedReason};
    use uuid::Uuid;

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            run_id: Uuid::nil(),
            generated_at: Utc::now(),
            spend_by_market: vec![SpendByMarketRow {
                market: "UK".to_string(),
                spend_usd: 1500.0,
            }],
            cpa: vec![CpaEntry {
                market: "UK".to_string(),
                channel: "Search".to_string(),
                spend_usd: 1000.0,
                conversions: 100,
                cpa: MetricValue::Defined(10.0),
            }],
            cpa_undefined: vec![CpaEntry {
                market: "DE".to_string(),
                channel: "Social".to_string(),
                spend_usd: 250.0,
                conversions: 0,
                cpa: MetricValue::Undefined(UndefinedReason::ZeroConversions),
            }],
            cplu: vec![],
            cplu_undefined: vec![],
            significance: vec![SignificanceRow {
                campaign_name: "Spring Push".to_string(),
                market: "UK".to_string(),
                channel: "Search".to_string(),
                relative_lift: 0.5,
                p_value: 0.0008,
                significant: true,
            }],
            quality: DataQualitySummary {
                undefined_cpa_rows: 1,
                ..DataQualitySummary::default()
            },
        }
    }

    #[test]
    fn test_render_includes_every_section() {
        let text = ReportRenderer::new().render(&sample_report());
        assert!(text.contains("--- Spend by Market ---"));
        assert!(text.contains("--- CPA by Market and Channel ---"));
        assert!(text.contains("Undefined CPA (no conversions):"));
        assert!(text.contains("--- Cost Per Lifted User (CPLU) by Campaign, Market & Channel ---"));
        assert!(text.contains("--- Brand Lift Study Results with Statistical Significance ---"));
        assert!(text.contains("--- Data Quality ---"));
    }

    #[test]
    fn test_undefined_metric_rendered_as_undefined_not_zero() {
        let text = ReportRenderer::new().render(&sample_report());
        let row = text
            .lines()
            .find(|line| line.starts_with("DE"))
            .unwrap();
        assert!(row.contains("undefined"));
        assert!(row.trim_end().ends_with("undefined"));
    }

    #[test]
    fn test_empty_table_renders_placeholder() {
        let text = ReportRenderer::new().render(&sample_report());
        assert!(text.contains("(no rows)"));
    }
}
