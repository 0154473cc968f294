use transfer_terminal::export::{CSV_HEADERS, csv_document, write_csv, write_workbook};
use transfer_terminal::model::Transfer;
use transfer_terminal::persist::{read_snapshot, write_snapshot};
use transfer_terminal::summary::summarize;

fn transfer(name: &str, fee: f64) -> Transfer {
    Transfer {
        player_id: name.to_lowercase(),
        player_name: name.to_string(),
        player_age: 27,
        player_position: "Forward".to_string(),
        player_nationality: "France".to_string(),
        from_club_id: "f1".to_string(),
        from_club_name: "Seller FC".to_string(),
        from_club_league: "Ligue 1".to_string(),
        to_club_id: "t1".to_string(),
        to_club_name: "Buyer FC".to_string(),
        to_club_league: "Premier League".to_string(),
        transfer_fee: fee,
        transfer_fee_currency: "EUR".to_string(),
        transfer_date: "2025-07-15".to_string(),
        transfer_type: "Permanent".to_string(),
        season: "2025".to_string(),
        market_value: fee,
    }
}

#[test]
fn csv_has_fixed_header_and_quoted_strings() {
    let doc = csv_document(&[transfer("R. Vega", 32.5), transfer("A. Stone", 8.0)]);
    let mut lines = doc.lines();

    assert_eq!(lines.next(), Some(CSV_HEADERS.join(",").as_str()));
    let first = lines.next().expect("one row per transfer");
    assert_eq!(
        first,
        "\"R. Vega\",27,\"Forward\",\"France\",\"Seller FC\",\"Buyer FC\",32.50,\"2025-07-15\",\"2025\""
    );
    let second = lines.next().expect("second row");
    assert!(second.starts_with("\"A. Stone\",27,"));
    assert!(second.contains(",8,"));
    assert_eq!(lines.next(), None);
}

#[test]
fn csv_empty_view_is_header_only() {
    let doc = csv_document(&[]);
    assert_eq!(doc.trim_end(), CSV_HEADERS.join(","));
}

#[test]
fn csv_writes_to_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.csv");
    write_csv(&path, &[transfer("E. Pike", 18.0)]).expect("write should succeed");
    let raw = std::fs::read_to_string(&path).expect("file exists");
    assert!(raw.contains("\"E. Pike\""));
}

#[test]
fn workbook_writes_to_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.xlsx");
    let transfers = vec![transfer("L. Park", 41.0), transfer("I. Noor", 0.0)];
    let summary = summarize(&transfers);
    write_workbook(&path, &transfers, &summary).expect("write should succeed");
    assert!(path.metadata().expect("file exists").len() > 0);
}

#[test]
fn snapshot_round_trips_through_the_normalizer() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("snapshot.json");
    let transfers = vec![transfer("T. Vale", 48.0), transfer("D. Moss", 0.0)];

    write_snapshot(&path, "GB1", "2025", &transfers).expect("write should succeed");
    let (metadata, loaded) = read_snapshot(&path).expect("read should succeed");

    assert_eq!(metadata.league, "GB1");
    assert_eq!(metadata.season, "2025");
    assert_eq!(metadata.total_records, 2);
    assert_eq!(loaded, transfers);
}
