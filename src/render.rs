//! Text and JSON rendering of a trial balance

use trialbal_config::{Config, OutputFormat};
use trialbal_core::{BalanceRecord, ReportRow, TrialBalanceReport};
use trialbal_utils::{format_amount, AmountStyle};

const HEADERS: [&str; 7] = [
    "Account",
    "Opening (Dr)",
    "Opening (Cr)",
    "Debit",
    "Credit",
    "Closing (Dr)",
    "Closing (Cr)",
];

/// Render the report in the configured format
pub fn render(report: &TrialBalanceReport, config: &Config) -> anyhow::Result<String> {
    match config.output.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(render_text(report, &amount_style(config))),
    }
}

fn amount_style(config: &Config) -> AmountStyle {
    AmountStyle {
        decimal_places: config.currency.decimal_places,
        thousands_separator: config.currency.thousands_separator.clone(),
        decimal_separator: config.currency.decimal_separator.clone(),
    }
}

/// Indented table, one line per row
pub fn render_text(report: &TrialBalanceReport, style: &AmountStyle) -> String {
    let mut lines: Vec<[String; 7]> = Vec::with_capacity(report.rows.len());
    for row in &report.rows {
        match row {
            ReportRow::Account(account) => {
                let label = format!("{}{}", "  ".repeat(account.indent), account.account_name);
                lines.push(cells(label, &account.balance, style));
            }
            ReportRow::Separator => lines.push(Default::default()),
            ReportRow::Total(total) => {
                lines.push(cells(total.account_name.clone(), &total.balance, style));
            }
        }
    }

    let mut widths = HEADERS.map(str::len);
    for line in &lines {
        for (width, cell) in widths.iter_mut().zip(line.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = format!(
        "Trial Balance{} ({} to {}, {})\n",
        report
            .company
            .as_deref()
            .map(|c| format!(" - {}", c))
            .unwrap_or_default(),
        report.period.from_date,
        report.period.to_date,
        report.currency
    );
    for warning in &report.warnings {
        out.push_str(&format!("warning: {}\n", warning));
    }
    out.push('\n');

    let header: [String; 7] = HEADERS.map(str::to_string);
    out.push_str(&format_line(&header, &widths));
    out.push_str(&format_line(&widths.map(|w| "-".repeat(w)), &widths));
    for line in &lines {
        out.push_str(&format_line(line, &widths));
    }
    out
}

fn cells(label: String, balance: &BalanceRecord, style: &AmountStyle) -> [String; 7] {
    let v = balance.values();
    [
        label,
        format_amount(v[0], style),
        format_amount(v[1], style),
        format_amount(v[2], style),
        format_amount(v[3], style),
        format_amount(v[4], style),
        format_amount(v[5], style),
    ]
}

fn format_line(cells: &[String; 7], widths: &[usize; 7]) -> String {
    let mut line = format!("{:<width$}", cells[0], width = widths[0]);
    for (cell, width) in cells.iter().zip(widths.iter()).skip(1) {
        line.push_str(&format!("  {:>width$}", cell, width = *width));
    }
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use trialbal_core::{AccountRow, ReportPeriod, TotalRow};

    fn report() -> TrialBalanceReport {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let balance = BalanceRecord {
            debit: Decimal::from(1234),
            closing_debit: Decimal::from(1234),
            ..BalanceRecord::default()
        };
        TrialBalanceReport {
            company: Some("Acme".to_string()),
            currency: "USD".to_string(),
            period: ReportPeriod {
                fiscal_year: "2024".to_string(),
                year_start_date: date,
                year_end_date: date,
                from_date: date,
                to_date: date,
                warnings: Vec::new(),
            },
            rows: vec![
                ReportRow::Account(AccountRow {
                    account: "Cash".to_string(),
                    parent_account: Some("Assets".to_string()),
                    indent: 1,
                    account_name: "Cash".to_string(),
                    currency: "USD".to_string(),
                    from_date: date,
                    to_date: date,
                    balance,
                    has_value: true,
                }),
                ReportRow::Separator,
                ReportRow::Total(TotalRow {
                    account: "Total".to_string(),
                    account_name: "Total".to_string(),
                    currency: "USD".to_string(),
                    balance,
                    warn_if_negative: true,
                    has_value: true,
                }),
            ],
            warnings: vec!["From Date should be within the Fiscal Year".to_string()],
        }
    }

    #[test]
    fn test_text_table() {
        let text = render_text(&report(), &AmountStyle::default());
        assert!(text.starts_with("Trial Balance - Acme"));
        assert!(text.contains("warning: From Date"));
        assert!(text.contains("  Cash"));
        assert!(text.contains("1,234.00"));
        assert!(text.lines().any(|l| l.starts_with("Total")));
        assert!(text.lines().any(|l| l.is_empty()));
    }

    #[test]
    fn test_json_output() {
        let mut config = Config::default();
        config.output.format = OutputFormat::Json;
        let json = render(&report(), &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"][0]["row_type"], "account");
        assert_eq!(value["rows"][2]["account"], "Total");
    }
}
