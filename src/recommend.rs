use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use log::{info, debug};

use crate::error::{Result, WetError};
use crate::utils::{format_rating, join_address};
use crate::yelp::{BusinessRecord, ResultSet};

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub business: BusinessRecord,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "I suggest eating a(an) {} restaurant called {} which has a rating of {}/5. The address is {}",
            self.business.category,
            self.business.name,
            format_rating(self.business.rating),
            join_address(&self.business.address_lines),
        )
    }
}

/// Picks uniformly among the businesses whose names are not in `history`.
pub fn select<'a, R: Rng + ?Sized>(
    results: &'a ResultSet,
    history: &[String],
    rng: &mut R,
) -> Result<&'a BusinessRecord> {
    if results.is_empty() {
        return Err(WetError::NoBusinesses);
    }

    let recent: HashSet<&str> = history.iter().map(String::as_str).collect();

    // Sorted so a seeded rng always yields the same pick.
    let mut candidates: Vec<&BusinessRecord> = results
        .values()
        .filter(|b| !recent.contains(b.name.as_str()))
        .collect();
    candidates.sort_by(|a, b| a.name.cmp(&b.name));

    debug!("{} of {} businesses are eligible", candidates.len(), results.len());

    candidates
        .choose(rng)
        .copied()
        .ok_or(WetError::NoEligibleCandidate(results.len()))
}

/// Appends `name` and drops the oldest entries until at most `repeat` remain.
pub fn record(history: &mut Vec<String>, name: &str, repeat: usize) {
    history.push(name.to_string());
    if history.len() > repeat {
        let evicted: Vec<String> = history.drain(..history.len() - repeat).collect();
        info!("Evicted {:?} from history", evicted);
    }
}
