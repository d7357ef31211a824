// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ActionError, FormValues, ReportKind, ResultSet};

/// Parameters for one canned report. All values are passed through as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRequest {
    PatientPrescriptions {
        patient_id: String,
        start_date: String,
        end_date: String,
    },
    PrescriptionDetails {
        patient_id: String,
        date: String,
    },
    CompanyDrugs {
        company_name: String,
    },
    PharmacyStock {
        pharmacy_address: String,
    },
    PharmacyContact {
        pharmacy_address: String,
    },
    DoctorPatients {
        doctor_id: String,
    },
    DisplayContract {
        pharmacy_name: String,
        pharmacy_address: String,
        company_name: String,
    },
}

impl ReportRequest {
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::PatientPrescriptions { .. } => ReportKind::PatientPrescriptions,
            Self::PrescriptionDetails { .. } => ReportKind::PrescriptionDetails,
            Self::CompanyDrugs { .. } => ReportKind::CompanyDrugs,
            Self::PharmacyStock { .. } => ReportKind::PharmacyStock,
            Self::PharmacyContact { .. } => ReportKind::PharmacyContact,
            Self::DoctorPatients { .. } => ReportKind::DoctorPatients,
            Self::DisplayContract { .. } => ReportKind::DisplayContract,
        }
    }

    pub fn parse(kind: ReportKind, values: &FormValues) -> Result<Self, ActionError> {
        if kind.params().iter().any(|param| values.is_blank(param.key)) {
            return Err(ActionError::Validation(missing_message(kind).to_owned()));
        }

        let text = |key: &str| values.get(key).to_owned();
        let request = match kind {
            ReportKind::PatientPrescriptions => Self::PatientPrescriptions {
                patient_id: text("p_id"),
                start_date: text("start_date"),
                end_date: text("end_date"),
            },
            ReportKind::PrescriptionDetails => Self::PrescriptionDetails {
                patient_id: text("p_id"),
                date: text("pres_date"),
            },
            ReportKind::CompanyDrugs => Self::CompanyDrugs {
                company_name: text("company_name"),
            },
            ReportKind::PharmacyStock => Self::PharmacyStock {
                pharmacy_address: text("ph_address"),
            },
            ReportKind::PharmacyContact => Self::PharmacyContact {
                pharmacy_address: text("ph_address"),
            },
            ReportKind::DoctorPatients => Self::DoctorPatients {
                doctor_id: text("d_id"),
            },
            ReportKind::DisplayContract => Self::DisplayContract {
                pharmacy_name: text("ph_name"),
                pharmacy_address: text("ph_address"),
                company_name: text("company_name"),
            },
        };
        Ok(request)
    }
}

fn missing_message(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::PatientPrescriptions
        | ReportKind::PrescriptionDetails
        | ReportKind::DisplayContract => "All fields are required!",
        ReportKind::CompanyDrugs => "Company name is required!",
        ReportKind::PharmacyStock | ReportKind::PharmacyContact => {
            "Pharmacy address is required!"
        }
        ReportKind::DoctorPatients => "Doctor ID is required!",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Result sets in the order the store produced them.
    ResultSets(Vec<ResultSet>),
    /// Display Contract found no joined row for the requested triple.
    NoContract,
}
