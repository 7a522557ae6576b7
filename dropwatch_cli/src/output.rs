use dropwatch_lib::detector::{AlertResult, Evaluation};
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled)]
struct EvaluationRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Date")]
    as_of: String,
    #[tabled(rename = "Close")]
    close: String,
    #[tabled(rename = "Peak")]
    peak: String,
    #[tabled(rename = "Drop %")]
    drop_percent: String,
    #[tabled(rename = "Trend")]
    trend: String,
    #[tabled(rename = "Alert")]
    alert: String,
}

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Drop %")]
    drop_percent: String,
    #[tabled(rename = "Message")]
    message: String,
}

// -- Row builders --

fn build_evaluation_rows(evaluations: &[Evaluation]) -> Vec<EvaluationRow> {
    evaluations
        .iter()
        .map(|e| EvaluationRow {
            ticker: e.ticker.clone(),
            as_of: e.as_of.to_string(),
            close: format!("{:.2}", e.close),
            peak: format!("{:.2}", e.recent_peak),
            drop_percent: format!("{:.2}", e.drop_percent),
            trend: e.trend.to_string(),
            alert: if e.triggered {
                "yes".to_string()
            } else {
                String::new()
            },
        })
        .collect()
}

fn build_alert_rows(alerts: &[AlertResult]) -> Vec<AlertRow> {
    alerts
        .iter()
        .map(|a| AlertRow {
            ticker: a.ticker.clone(),
            drop_percent: format!("{:.2}", a.drop_percent),
            message: a.message(),
        })
        .collect()
}

// -- Table output --

pub fn print_evaluations_table(evaluations: &[Evaluation]) {
    println!("{}", Table::new(build_evaluation_rows(evaluations)));
}

pub fn print_alerts_table(alerts: &[AlertResult]) {
    println!("{}", Table::new(build_alert_rows(alerts)));
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
