// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use nova_app::{ActionError, FieldKind, FieldSpec, FormKind, FormValues, ReportKind, ResultSet};
use nova_db::{Backend, Call};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use time::{Date, Month};

const FIRST_NAMES: [&str; 12] = [
    "Asha", "Ravi", "Meera", "Arjun", "Kavya", "Nikhil", "Priya", "Rohan", "Sneha", "Vikram",
    "Divya", "Karan",
];
const LAST_NAMES: [&str; 10] = [
    "Rao", "Iyer", "Mehta", "Shah", "Nair", "Gupta", "Reddy", "Das", "Kapoor", "Menon",
];
const STREETS: [&str; 8] = [
    "MG Road",
    "Park Street",
    "Station Road",
    "Lake View",
    "Temple Street",
    "Ring Road",
    "Hill Avenue",
    "Market Lane",
];
const COMPANIES: [&str; 8] = [
    "Cipla",
    "Sun Pharma",
    "Lupin",
    "Zydus",
    "Biocon",
    "Glenmark",
    "Torrent",
    "Alkem",
];
const TRADE_NAMES: [&str; 8] = [
    "Crocin", "Dolo", "Azithral", "Pan", "Allegra", "Combiflam", "Augmentin", "Shelcal",
];
const FORMULAS: [&str; 8] = [
    "Paracetamol",
    "Azithromycin",
    "Pantoprazole",
    "Fexofenadine",
    "Ibuprofen",
    "Amoxicillin",
    "Calcium Carbonate",
    "Cetirizine",
];
const SPECIALITIES: [&str; 6] = [
    "Cardiology",
    "Dermatology",
    "General Medicine",
    "Orthopedics",
    "Pediatrics",
    "Neurology",
];

pub const REFERENCE_YEAR: i32 = 2024;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic, well-formed input for any form or report dialog.
#[derive(Debug, Clone)]
pub struct PharmacyFaker {
    rng: DeterministicRng,
}

impl PharmacyFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn form_values(&mut self, kind: FormKind) -> FormValues {
        self.values_for(kind.fields())
    }

    pub fn report_values(&mut self, kind: ReportKind) -> FormValues {
        self.values_for(kind.params())
    }

    fn values_for(&mut self, fields: &'static [FieldSpec]) -> FormValues {
        let mut values = FormValues::new();
        for field in fields {
            let text = self.value_for(field);
            values.insert(field.key, text);
        }
        values
    }

    fn value_for(&mut self, field: &FieldSpec) -> String {
        match field.kind {
            FieldKind::Integer => (1 + self.rng.int_n(60)).to_string(),
            FieldKind::Decimal => format!("{}.{:02}", 1 + self.rng.int_n(500), self.rng.int_n(100)),
            FieldKind::Date => self.date().to_string(),
            FieldKind::Text => self.text_for(field.key),
        }
    }

    fn text_for(&mut self, key: &str) -> String {
        if key.ends_with("_id") {
            return self.aadhar();
        }
        if key.ends_with("date") {
            return self.date().to_string();
        }
        if key.contains("phone") {
            return format!("98{:08}", self.rng.next_u64() % 100_000_000);
        }
        if key.contains("address") {
            return format!("{} {}", 1 + self.rng.int_n(200), self.pick(&STREETS));
        }
        match key {
            "company_name" | "new_company_name" => self.pick(&COMPANIES).to_owned(),
            "trade_name" => self.pick(&TRADE_NAMES).to_owned(),
            "formula" => self.pick(&FORMULAS).to_owned(),
            "d_speciality" => self.pick(&SPECIALITIES).to_owned(),
            "ph_name" => format!("{} Pharmacy", self.pick(&STREETS)),
            "content" => format!(
                "Supply of {} and {}.\nPayment within 30 days.",
                self.pick(&FORMULAS),
                self.pick(&FORMULAS)
            ),
            _ => self.person_name(),
        }
    }

    pub fn aadhar(&mut self) -> String {
        format!("{:012}", self.rng.next_u64() % 1_000_000_000_000)
    }

    pub fn person_name(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    pub fn date(&mut self) -> Date {
        let month = Month::January.nth_next(self.rng.int_n(12) as u8);
        let day = 1 + self.rng.int_n(28) as u8;
        Date::from_calendar_date(REFERENCE_YEAR, month, day).unwrap_or(Date::MIN)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

/// A reply queued on a [`ScriptedBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Sets(Vec<ResultSet>),
    DatabaseError(String),
    ClientError(String),
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Reply>,
    calls: Vec<Call>,
    commits: usize,
    rollbacks: usize,
}

/// In-memory [`Backend`] that records calls and replays queued replies.
/// Clones share one script, so a test can keep a handle after moving a clone into a store.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    script: Rc<RefCell<Script>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, reply: Reply) -> &Self {
        self.script.borrow_mut().replies.push_back(reply);
        self
    }

    pub fn reply_sets(&self, sets: Vec<ResultSet>) -> &Self {
        self.reply(Reply::Sets(sets))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.borrow().calls.clone()
    }

    pub fn commits(&self) -> usize {
        self.script.borrow().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.script.borrow().rollbacks
    }
}

impl Backend for ScriptedBackend {
    fn execute(&mut self, call: &Call) -> Result<Vec<ResultSet>, ActionError> {
        let mut script = self.script.borrow_mut();
        script.calls.push(call.clone());
        match script.replies.pop_front() {
            None => Ok(Vec::new()),
            Some(Reply::Sets(sets)) => Ok(sets),
            Some(Reply::DatabaseError(message)) => Err(ActionError::Database(message)),
            Some(Reply::ClientError(message)) => Err(ActionError::Other(anyhow::anyhow!(message))),
        }
    }

    fn commit(&mut self) -> Result<(), ActionError> {
        self.script.borrow_mut().commits += 1;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), ActionError> {
        self.script.borrow_mut().rollbacks += 1;
        Ok(())
    }
}

fn text_row(cells: &[&str]) -> Vec<Option<String>> {
    cells.iter().map(|cell| Some((*cell).to_owned())).collect()
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

pub fn stock_result() -> ResultSet {
    ResultSet::new(
        columns(&["trade_name", "formula", "stock", "price"]),
        vec![
            text_row(&["Crocin", "Paracetamol", "40", "18.50"]),
            text_row(&["Dolo", "Paracetamol", "12", "21.00"]),
            vec![
                Some("Shelcal".to_owned()),
                Some("Calcium Carbonate".to_owned()),
                Some("0".to_owned()),
                None,
            ],
        ],
    )
}

pub fn contract_result() -> ResultSet {
    ResultSet::new(
        columns(&[
            "Company Name",
            "Company Phone",
            "Pharmacy Name",
            "Pharmacy Address",
            "Pharmacy Phone",
            "Contract Start Date",
            "Contract End Date",
            "Contract Supervisor",
            "Contract Content",
            "Contract Status",
            "Days Remaining",
        ]),
        vec![text_row(&[
            "Cipla",
            "9800000001",
            "Park Street Pharmacy",
            "5 Park Street",
            "9800000002",
            "2024-01-01",
            "2024-12-31",
            "R. Iyer",
            "Supply of generics",
            "Active",
            "120",
        ])],
    )
}

/// A result set with declared columns and no rows.
pub fn empty_result(names: &[&str]) -> ResultSet {
    ResultSet::new(columns(names), Vec::new())
}

/// The trailing status packet a CALL produces; it has no columns.
pub fn status_only_result() -> ResultSet {
    ResultSet::default()
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("config.toml");
    Ok((dir, path))
}
