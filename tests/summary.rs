use transfer_terminal::model::Transfer;
use transfer_terminal::summary::{TOP_CLUBS, summarize};

fn transfer(name: &str, fee: f64) -> Transfer {
    Transfer {
        player_id: name.to_lowercase(),
        player_name: name.to_string(),
        player_age: 25,
        player_position: "Midfielder".to_string(),
        player_nationality: "Spain".to_string(),
        from_club_id: "f1".to_string(),
        from_club_name: "Seller FC".to_string(),
        from_club_league: "La Liga".to_string(),
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
fn empty_collection_yields_zero_summary() {
    let summary = summarize(&[]);
    assert_eq!(summary.total_transfers, 0);
    assert_eq!(summary.total_spending, 0.0);
    assert_eq!(summary.average_fee, 0.0);
    assert_eq!(summary.median_fee, 0.0);
    assert!(summary.most_expensive_transfer.is_none());
    assert!(summary.transfers_by_position.is_empty());
    assert!(summary.transfers_by_month.is_empty());
    assert!(summary.top_spending_clubs.is_empty());
    assert!(summary.top_selling_clubs.is_empty());
}

#[test]
fn median_takes_upper_middle_of_positive_fees() {
    let transfers: Vec<Transfer> = [10.0, 20.0, 30.0, 40.0]
        .iter()
        .map(|fee| transfer("P", *fee))
        .collect();
    let summary = summarize(&transfers);
    assert_eq!(summary.median_fee, 30.0);
}

#[test]
fn free_transfers_count_toward_spending_but_not_median() {
    let transfers = vec![
        transfer("A", 100.0),
        transfer("B", 50.0),
        transfer("C", 0.0),
    ];
    let summary = summarize(&transfers);
    assert_eq!(summary.total_transfers, 3);
    assert_eq!(summary.total_spending, 150.0);
    assert_eq!(summary.average_fee, 50.0);
    // Positive fees sorted are [50, 100]; index 2/2 = 1 picks the upper value.
    assert_eq!(summary.median_fee, 100.0);
}

#[test]
fn all_free_window_has_zero_median() {
    let transfers = vec![transfer("A", 0.0), transfer("B", 0.0)];
    assert_eq!(summarize(&transfers).median_fee, 0.0);
}

#[test]
fn most_expensive_keeps_first_occurrence_on_tie() {
    let mut first = transfer("First", 60.0);
    first.from_club_name = "Origin A".to_string();
    let second = transfer("Second", 60.0);
    let summary = summarize(&[first, second, transfer("Third", 10.0)]);
    let top = summary.most_expensive_transfer.expect("non-empty view");
    assert_eq!(top.player, "First");
    assert_eq!(top.fee, 60.0);
    assert_eq!(top.from_club, "Origin A");
}

#[test]
fn club_rankings_are_bounded_and_descending() {
    let mut transfers = Vec::new();
    for i in 0..13 {
        let mut t = transfer(&format!("P{i}"), (i + 1) as f64);
        t.to_club_name = format!("Buyer {i}");
        t.from_club_name = format!("Seller {i}");
        transfers.push(t);
    }
    let summary = summarize(&transfers);

    assert_eq!(summary.top_spending_clubs.len(), TOP_CLUBS);
    assert_eq!(summary.top_spending_clubs[0].club, "Buyer 12");
    assert_eq!(summary.top_spending_clubs[0].total, 13.0);
    for pair in summary.top_spending_clubs.windows(2) {
        assert!(pair[0].total >= pair[1].total);
    }
    assert_eq!(summary.top_selling_clubs.len(), TOP_CLUBS);
}

#[test]
fn monthly_buckets_sum_fees_by_calendar_month() {
    let mut july_a = transfer("A", 10.0);
    july_a.transfer_date = "2025-07-01".to_string();
    let mut july_b = transfer("B", 5.0);
    july_b.transfer_date = "2025-07-30".to_string();
    let mut january = transfer("C", 2.0);
    january.transfer_date = "2025-01-15".to_string();
    let mut undated = transfer("D", 99.0);
    undated.transfer_date = "window tbc".to_string();

    let summary = summarize(&[july_a, july_b, january, undated]);
    assert_eq!(summary.transfers_by_month.get(&7), Some(&15.0));
    assert_eq!(summary.transfers_by_month.get(&1), Some(&2.0));
    // Unparsable dates land in no bucket but still count toward spending.
    assert_eq!(summary.transfers_by_month.len(), 2);
    assert_eq!(summary.total_spending, 116.0);
}

#[test]
fn position_counts_cover_every_record() {
    let mut keeper = transfer("K", 1.0);
    keeper.player_position = "Goalkeeper".to_string();
    let summary = summarize(&[keeper, transfer("M1", 2.0), transfer("M2", 3.0)]);
    assert_eq!(summary.transfers_by_position.get("Goalkeeper"), Some(&1));
    assert_eq!(summary.transfers_by_position.get("Midfielder"), Some(&2));
}
