// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tally::application::LedgerService;
use tally::domain::{Clock, SequentialIdGenerator};
use tally::storage::Repository;
use tempfile::TempDir;

/// Clock that advances by one second on every reading
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            next: Mutex::new(start),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + Duration::seconds(1);
        now
    }
}

/// Clock replaying a fixed list of instants
pub struct ScriptedClock {
    instants: Mutex<VecDeque<DateTime<Utc>>>,
}

impl ScriptedClock {
    pub fn new(instants: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        Self {
            instants: Mutex::new(instants.into_iter().collect()),
        }
    }
}

impl Clock for ScriptedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instants
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted clock ran out of instants")
    }
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Helper to create a test service over a temporary ledger file,
/// with sequential ids and a clock ticking one second per transaction
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let clock = SteppingClock::starting_at(parse_date("2024-01-01"));
    test_service_with_clock(Arc::new(clock)).await
}

pub async fn test_service_with_clock(clock: Arc<dyn Clock>) -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let repo = Repository::init(temp_dir.path().join("data.json")).await?;
    let service =
        LedgerService::with_sources(repo, Arc::new(SequentialIdGenerator::new("tx")), clock);
    Ok((service, temp_dir))
}
