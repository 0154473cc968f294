use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::Transfer;

/// Club rankings are capped at this many entries.
pub const TOP_CLUBS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MostExpensive {
    pub player: String,
    pub fee: f64,
    pub from_club: String,
    pub to_club: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubTotal {
    pub club: String,
    pub total: f64,
}

/// Aggregate statistics over one view of the collection. Recomputed from
/// scratch on every view change, never updated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Summary {
    pub total_transfers: usize,
    pub total_spending: f64,
    pub average_fee: f64,
    pub median_fee: f64,
    pub most_expensive_transfer: Option<MostExpensive>,
    pub transfers_by_position: BTreeMap<String, usize>,
    pub transfers_by_month: BTreeMap<u32, f64>,
    pub top_spending_clubs: Vec<ClubTotal>,
    pub top_selling_clubs: Vec<ClubTotal>,
}

/// Pure aggregation over a slice of transfers. An empty slice yields the
/// all-zero summary with empty maps.
pub fn summarize(transfers: &[Transfer]) -> Summary {
    if transfers.is_empty() {
        return Summary::default();
    }

    let total_transfers = transfers.len();
    let total_spending: f64 = transfers.iter().map(|t| t.transfer_fee).sum();
    let average_fee = total_spending / total_transfers as f64;

    let mut by_position: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_month: BTreeMap<u32, f64> = BTreeMap::new();
    let mut spending: HashMap<String, f64> = HashMap::new();
    let mut selling: HashMap<String, f64> = HashMap::new();
    let mut most_expensive: Option<&Transfer> = None;

    for t in transfers {
        *by_position.entry(t.player_position.clone()).or_default() += 1;
        if let Some(date) = t.date() {
            use chrono::Datelike;
            *by_month.entry(date.month()).or_default() += t.transfer_fee;
        }
        *spending.entry(t.to_club_name.clone()).or_default() += t.transfer_fee;
        *selling.entry(t.from_club_name.clone()).or_default() += t.transfer_fee;

        // Strict comparison keeps the first occurrence on ties.
        let beats = most_expensive.is_none_or(|best| t.transfer_fee > best.transfer_fee);
        if beats {
            most_expensive = Some(t);
        }
    }

    Summary {
        total_transfers,
        total_spending,
        average_fee,
        median_fee: positive_fee_median(transfers),
        most_expensive_transfer: most_expensive.map(|t| MostExpensive {
            player: t.player_name.clone(),
            fee: t.transfer_fee,
            from_club: t.from_club_name.clone(),
            to_club: t.to_club_name.clone(),
        }),
        transfers_by_position: by_position,
        transfers_by_month: by_month,
        top_spending_clubs: ranked_clubs(spending),
        top_selling_clubs: ranked_clubs(selling),
    }
}

/// Median over the strictly positive fees only, taking index `n / 2` of the
/// ascending list. For even counts that is the upper of the two middle values,
/// which is what the historical exporter published; kept for compatibility
/// with existing snapshots.
fn positive_fee_median(transfers: &[Transfer]) -> f64 {
    let mut fees: Vec<f64> = transfers
        .iter()
        .map(|t| t.transfer_fee)
        .filter(|fee| *fee > 0.0)
        .collect();
    if fees.is_empty() {
        return 0.0;
    }
    fees.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    fees[fees.len() / 2]
}

fn ranked_clubs(totals: HashMap<String, f64>) -> Vec<ClubTotal> {
    let mut ranked: Vec<ClubTotal> = totals
        .into_iter()
        .map(|(club, total)| ClubTotal { club, total })
        .collect();
    ranked.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.club.cmp(&b.club))
    });
    ranked.truncate(TOP_CLUBS);
    ranked
}
