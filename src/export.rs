use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::model::Transfer;
use crate::summary::Summary;

pub const CSV_HEADERS: [&str; 9] = [
    "Player Name",
    "Age",
    "Position",
    "Nationality",
    "From Club",
    "To Club",
    "Transfer Fee",
    "Date",
    "Season",
];

/// Serialize the given view as CSV with the fixed dashboard column order.
/// String cells are double-quoted; embedded quotes pass through unescaped,
/// matching the format existing consumers already parse.
pub fn csv_document(transfers: &[Transfer]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_HEADERS.join(","));
    out.push('\n');
    for t in transfers {
        out.push_str(&csv_row(t).join(","));
        out.push('\n');
    }
    out
}

pub fn write_csv(path: &Path, transfers: &[Transfer]) -> Result<()> {
    fs::write(path, csv_document(transfers))
        .with_context(|| format!("failed writing csv to {}", path.display()))
}

fn csv_row(t: &Transfer) -> Vec<String> {
    vec![
        quoted(&t.player_name),
        t.player_age.to_string(),
        quoted(&t.player_position),
        quoted(&t.player_nationality),
        quoted(&t.from_club_name),
        quoted(&t.to_club_name),
        format_fee(t.transfer_fee),
        quoted(&t.transfer_date),
        quoted(&t.season),
    ]
}

fn quoted(value: &str) -> String {
    format!("\"{value}\"")
}

fn format_fee(fee: f64) -> String {
    if fee == fee.trunc() {
        format!("{fee:.0}")
    } else {
        format!("{fee:.2}")
    }
}

/// Workbook export: the current view plus its summary and club rankings, one
/// sheet each.
pub fn write_workbook(path: &Path, transfers: &[Transfer], summary: &Summary) -> Result<()> {
    let mut transfers_rows = vec![CSV_HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>()];
    for t in transfers {
        transfers_rows.push(vec![
            t.player_name.clone(),
            t.player_age.to_string(),
            t.player_position.clone(),
            t.player_nationality.clone(),
            t.from_club_name.clone(),
            t.to_club_name.clone(),
            format_fee(t.transfer_fee),
            t.transfer_date.clone(),
            t.season.clone(),
        ]);
    }

    let mut summary_rows = vec![
        vec!["Metric".to_string(), "Value".to_string()],
        vec![
            "Total transfers".to_string(),
            summary.total_transfers.to_string(),
        ],
        vec![
            "Total spending (m)".to_string(),
            format_fee(summary.total_spending),
        ],
        vec!["Average fee (m)".to_string(), format!("{:.2}", summary.average_fee)],
        vec!["Median fee (m)".to_string(), format!("{:.2}", summary.median_fee)],
    ];
    if let Some(top) = summary.most_expensive_transfer.as_ref() {
        summary_rows.push(vec![
            "Most expensive".to_string(),
            format!("{} ({} -> {}, {}m)", top.player, top.from_club, top.to_club, format_fee(top.fee)),
        ]);
    }
    for (position, count) in &summary.transfers_by_position {
        summary_rows.push(vec![format!("Transfers: {position}"), count.to_string()]);
    }
    for (month, spend) in &summary.transfers_by_month {
        summary_rows.push(vec![
            format!("Spending month {month:02}"),
            format_fee(*spend),
        ]);
    }

    let mut clubs_rows = vec![vec![
        "Side".to_string(),
        "Club".to_string(),
        "Total (m)".to_string(),
    ]];
    for entry in &summary.top_spending_clubs {
        clubs_rows.push(vec![
            "Buying".to_string(),
            entry.club.clone(),
            format_fee(entry.total),
        ]);
    }
    for entry in &summary.top_selling_clubs {
        clubs_rows.push(vec![
            "Selling".to_string(),
            entry.club.clone(),
            format_fee(entry.total),
        ]);
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Transfers")?;
        write_rows(sheet, &transfers_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        write_rows(sheet, &summary_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Clubs")?;
        write_rows(sheet, &clubs_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
