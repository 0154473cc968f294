use chrono::NaiveDate;

use transfer_terminal::filters::{
    Facet, FilterCriteria, SortField, SortOrder, SortSpec, distinct_values, filter_transfers,
    search_transfers, sort_transfers,
};
use transfer_terminal::model::Transfer;

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

fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("valid test date")
}

#[test]
fn default_criteria_keep_everything() {
    let transfers = vec![transfer("A", 10.0), transfer("B", 0.0)];
    let out = filter_transfers(&transfers, &FilterCriteria::default());
    assert_eq!(out, transfers);
}

#[test]
fn fee_ceiling_keeps_free_transfers() {
    let transfers = vec![
        transfer("A", 100.0),
        transfer("B", 50.0),
        transfer("C", 0.0),
    ];
    let criteria = FilterCriteria {
        max_fee: Some(60.0),
        ..Default::default()
    };
    let out = filter_transfers(&transfers, &criteria);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].player_name, "B");
    assert_eq!(out[1].player_name, "C");
}

#[test]
fn league_matches_either_side_of_the_move() {
    let mut incoming = transfer("In", 5.0);
    incoming.from_club_league = "Serie A".to_string();
    incoming.to_club_league = "Premier League".to_string();
    let mut outgoing = transfer("Out", 5.0);
    outgoing.from_club_league = "Premier League".to_string();
    outgoing.to_club_league = "Serie A".to_string();
    let mut unrelated = transfer("Other", 5.0);
    unrelated.from_club_league = "Ligue 1".to_string();
    unrelated.to_club_league = "Bundesliga".to_string();

    let criteria = FilterCriteria {
        league: Some("Premier League".to_string()),
        ..Default::default()
    };
    let out = filter_transfers(&[incoming, outgoing, unrelated], &criteria);
    assert_eq!(out.len(), 2);
}

#[test]
fn filtering_is_idempotent() {
    let transfers = vec![
        transfer("A", 100.0),
        transfer("B", 50.0),
        transfer("C", 0.0),
    ];
    let criteria = FilterCriteria {
        max_fee: Some(60.0),
        position: Some("Midfielder".to_string()),
        ..Default::default()
    };
    let once = filter_transfers(&transfers, &criteria);
    let twice = filter_transfers(&once, &criteria);
    assert_eq!(once, twice);
}

#[test]
fn date_bounds_exclude_outside_and_pass_unparsable() {
    let mut june = transfer("June", 5.0);
    june.transfer_date = "2025-06-10".to_string();
    let mut august = transfer("August", 5.0);
    august.transfer_date = "2025-08-20".to_string();
    let mut undated = transfer("Undated", 5.0);
    undated.transfer_date = "window tbc".to_string();

    let criteria = FilterCriteria {
        start_date: Some(date("2025-07-01")),
        end_date: Some(date("2025-07-31")),
        ..Default::default()
    };
    let out = filter_transfers(&[june, august, undated, transfer("July", 5.0)], &criteria);
    let names: Vec<&str> = out.iter().map(|t| t.player_name.as_str()).collect();
    assert_eq!(names, ["Undated", "July"]);
}

#[test]
fn search_is_case_insensitive_across_fields() {
    let mut brazilian = transfer("Neymar", 80.0);
    brazilian.player_nationality = "Brazil".to_string();
    let transfers = vec![brazilian, transfer("A", 10.0), transfer("B", 5.0)];

    let out = search_transfers(&transfers, "brazil");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].player_name, "Neymar");

    let by_club = search_transfers(&transfers, "BUYER");
    assert_eq!(by_club.len(), 3);

    assert_eq!(search_transfers(&transfers, "  ").len(), 3);
    assert!(search_transfers(&transfers, "zzz").is_empty());
}

#[test]
fn filter_then_search_never_grows_the_result() {
    let mut brazilian = transfer("Neymar", 80.0);
    brazilian.player_nationality = "Brazil".to_string();
    let transfers = vec![brazilian, transfer("A", 10.0), transfer("B", 5.0)];

    let criteria = FilterCriteria {
        max_fee: Some(60.0),
        ..Default::default()
    };
    let filtered = filter_transfers(&transfers, &criteria);
    let both = search_transfers(&filtered, "b");
    assert!(both.len() <= filtered.len());
    assert!(both.len() <= search_transfers(&transfers, "b").len());
}

#[test]
fn sort_descending_by_fee() {
    let transfers = vec![transfer("A", 5.0), transfer("B", 50.0), transfer("C", 1.0)];
    let out = sort_transfers(
        &transfers,
        SortSpec {
            field: SortField::Fee,
            order: SortOrder::Desc,
        },
    );
    let fees: Vec<f64> = out.iter().map(|t| t.transfer_fee).collect();
    assert_eq!(fees, [50.0, 5.0, 1.0]);
}

#[test]
fn sort_by_name_ignores_case_and_keeps_ties_stable() {
    let transfers = vec![
        transfer("beta", 1.0),
        transfer("Alpha", 2.0),
        transfer("BETA", 3.0),
    ];
    let out = sort_transfers(
        &transfers,
        SortSpec {
            field: SortField::PlayerName,
            order: SortOrder::Asc,
        },
    );
    let names: Vec<&str> = out.iter().map(|t| t.player_name.as_str()).collect();
    assert_eq!(names, ["Alpha", "beta", "BETA"]);
}

#[test]
fn sort_does_not_mutate_its_input() {
    let transfers = vec![transfer("A", 5.0), transfer("B", 50.0)];
    let _ = sort_transfers(
        &transfers,
        SortSpec {
            field: SortField::Fee,
            order: SortOrder::Desc,
        },
    );
    assert_eq!(transfers[0].player_name, "A");
}

#[test]
fn distinct_league_values_union_both_sides() {
    let mut t = transfer("A", 5.0);
    t.from_club_league = "Serie A".to_string();
    t.to_club_league = "Premier League".to_string();
    let leagues = distinct_values(&[t, transfer("B", 1.0)], Facet::League);
    assert_eq!(leagues, ["La Liga", "Premier League", "Serie A"]);

    let positions = distinct_values(&[transfer("C", 1.0)], Facet::Position);
    assert_eq!(positions, ["Midfielder"]);
}
