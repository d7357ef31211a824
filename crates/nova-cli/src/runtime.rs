// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use nova_app::{ActionError, ReportOutcome, ReportRequest, Submission};
use nova_db::Store;

pub struct DbRuntime {
    store: Store,
}

impl DbRuntime {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

impl nova_tui::AppRuntime for DbRuntime {
    fn submit(&mut self, submission: &Submission) -> Result<(), ActionError> {
        self.store.submit(submission)
    }

    fn run_report(&mut self, request: &ReportRequest) -> Result<ReportOutcome, ActionError> {
        self.store.run_report(request)
    }
}
