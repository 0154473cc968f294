use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::model::Transfer;

/// Active constraints for the derived view. `None` on any dimension means
/// that dimension never excludes a record; all active dimensions must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub league: Option<String>,
    pub position: Option<String>,
    pub season: Option<String>,
    pub max_fee: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn is_unrestricted(&self) -> bool {
        self.league.is_none()
            && self.position.is_none()
            && self.season.is_none()
            && self.max_fee.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    PlayerName,
    Age,
    Position,
    Nationality,
    FromClub,
    ToClub,
    Fee,
    Date,
    Season,
    MarketValue,
}

impl SortField {
    pub const ALL: [SortField; 10] = [
        SortField::Date,
        SortField::Fee,
        SortField::PlayerName,
        SortField::Age,
        SortField::Position,
        SortField::Nationality,
        SortField::FromClub,
        SortField::ToClub,
        SortField::Season,
        SortField::MarketValue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortField::PlayerName => "Player",
            SortField::Age => "Age",
            SortField::Position => "Position",
            SortField::Nationality => "Nationality",
            SortField::FromClub => "From",
            SortField::ToClub => "To",
            SortField::Fee => "Fee",
            SortField::Date => "Date",
            SortField::Season => "Season",
            SortField::MarketValue => "Value",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Date,
            order: SortOrder::Desc,
        }
    }
}

/// Keep the records satisfying every active constraint. The league dimension
/// matches either side of the move; a record whose date does not parse passes
/// both date bounds.
pub fn filter_transfers(transfers: &[Transfer], criteria: &FilterCriteria) -> Vec<Transfer> {
    transfers
        .iter()
        .filter(|t| matches_criteria(t, criteria))
        .cloned()
        .collect()
}

fn matches_criteria(t: &Transfer, criteria: &FilterCriteria) -> bool {
    if let Some(league) = criteria.league.as_deref() {
        if t.from_club_league != league && t.to_club_league != league {
            return false;
        }
    }
    if let Some(position) = criteria.position.as_deref() {
        if t.player_position != position {
            return false;
        }
    }
    if let Some(season) = criteria.season.as_deref() {
        if t.season != season {
            return false;
        }
    }
    if let Some(max_fee) = criteria.max_fee {
        if t.transfer_fee > max_fee {
            return false;
        }
    }
    if criteria.start_date.is_some() || criteria.end_date.is_some() {
        if let Some(date) = t.date() {
            if criteria.start_date.is_some_and(|start| date < start) {
                return false;
            }
            if criteria.end_date.is_some_and(|end| date > end) {
                return false;
            }
        }
    }
    true
}

/// Case-insensitive substring match over player name, both club names,
/// position and nationality. A blank term keeps everything.
pub fn search_transfers(transfers: &[Transfer], term: &str) -> Vec<Transfer> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return transfers.to_vec();
    }
    transfers
        .iter()
        .filter(|t| {
            [
                &t.player_name,
                &t.from_club_name,
                &t.to_club_name,
                &t.player_position,
                &t.player_nationality,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Stable sort into a new sequence; equal keys keep their first-occurrence
/// order. String fields compare case-insensitively.
pub fn sort_transfers(transfers: &[Transfer], spec: SortSpec) -> Vec<Transfer> {
    let mut sorted = transfers.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_by_field(a, b, spec.field);
        match spec.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

fn compare_by_field(a: &Transfer, b: &Transfer, field: SortField) -> Ordering {
    match field {
        SortField::PlayerName => text_cmp(&a.player_name, &b.player_name),
        SortField::Age => a.player_age.cmp(&b.player_age),
        SortField::Position => text_cmp(&a.player_position, &b.player_position),
        SortField::Nationality => text_cmp(&a.player_nationality, &b.player_nationality),
        SortField::FromClub => text_cmp(&a.from_club_name, &b.from_club_name),
        SortField::ToClub => text_cmp(&a.to_club_name, &b.to_club_name),
        SortField::Fee => number_cmp(a.transfer_fee, b.transfer_fee),
        SortField::Season => text_cmp(&a.season, &b.season),
        SortField::MarketValue => number_cmp(a.market_value, b.market_value),
        SortField::Date => match (a.date(), b.date()) {
            (Some(left), Some(right)) => left.cmp(&right),
            // Unparsable dates fall back to the raw text.
            _ => text_cmp(&a.transfer_date, &b.transfer_date),
        },
    }
}

fn text_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn number_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Filterable dimensions exposed to selection controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    League,
    Position,
    Season,
    Nationality,
    Club,
}

/// Sorted, de-duplicated values for one facet. League and club union both
/// sides of the move; empty strings are dropped.
pub fn distinct_values(transfers: &[Transfer], facet: Facet) -> Vec<String> {
    let mut values: BTreeSet<String> = BTreeSet::new();
    for t in transfers {
        match facet {
            Facet::League => {
                values.insert(t.from_club_league.clone());
                values.insert(t.to_club_league.clone());
            }
            Facet::Position => {
                values.insert(t.player_position.clone());
            }
            Facet::Season => {
                values.insert(t.season.clone());
            }
            Facet::Nationality => {
                values.insert(t.player_nationality.clone());
            }
            Facet::Club => {
                values.insert(t.from_club_name.clone());
                values.insert(t.to_club_name.clone());
            }
        }
    }
    values.into_iter().filter(|v| !v.is_empty()).collect()
}
