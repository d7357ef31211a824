// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Delete,
    Update,
}

impl Operation {
    pub const ALL: [Self; 3] = [Self::Add, Self::Delete, Self::Update];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Delete => "Delete",
            Self::Update => "Update",
        }
    }

    pub fn rotate(self, delta: isize) -> Self {
        rotate(&Self::ALL, self, delta)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Patient,
    Doctor,
    Pharmacy,
    PharmaceuticalCompany,
    Drug,
    Prescription,
    Contract,
    Sells,
}

impl Entity {
    pub const ALL: [Self; 8] = [
        Self::Patient,
        Self::Doctor,
        Self::Pharmacy,
        Self::PharmaceuticalCompany,
        Self::Drug,
        Self::Prescription,
        Self::Contract,
        Self::Sells,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Doctor => "Doctor",
            Self::Pharmacy => "Pharmacy",
            Self::PharmaceuticalCompany => "PharmaceuticalCompany",
            Self::Drug => "Drug",
            Self::Prescription => "Prescription",
            Self::Contract => "Contract",
            Self::Sells => "Sells",
        }
    }

    pub fn rotate(self, delta: isize) -> Self {
        rotate(&Self::ALL, self, delta)
    }
}

fn rotate<T: Copy + PartialEq>(all: &[T], current: T, delta: isize) -> T {
    let index = all.iter().position(|item| *item == current).unwrap_or(0) as isize;
    let len = all.len() as isize;
    all[(index + delta).rem_euclid(len) as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    pub key: &'static str,
    pub kind: FieldKind,
    pub multiline: bool,
    pub optional: bool,
}

impl FieldSpec {
    pub const fn new(label: &'static str, key: &'static str, kind: FieldKind) -> Self {
        Self {
            label,
            key,
            kind,
            multiline: false,
            optional: false,
        }
    }

    pub const fn text(label: &'static str, key: &'static str) -> Self {
        Self::new(label, key, FieldKind::Text)
    }

    pub const fn optional(self) -> Self {
        Self {
            optional: true,
            ..self
        }
    }

    pub const fn multiline(self) -> Self {
        Self {
            multiline: true,
            ..self
        }
    }

    /// Label without the trailing colon, for messages.
    pub fn name(&self) -> &'static str {
        self.label.trim_end_matches(':')
    }
}

const PATIENT_ID: FieldSpec = FieldSpec::text("Patient ID (Aadhar):", "p_id");
const PATIENT_RECORD: [FieldSpec; 6] = [
    PATIENT_ID,
    FieldSpec::text("Name:", "p_name"),
    FieldSpec::new("Age:", "p_age", FieldKind::Integer),
    FieldSpec::text("Address:", "p_address"),
    FieldSpec::text("Primary Physician ID (Aadhar):", "p_primary_physician_id"),
    FieldSpec::text("Additional Doctor ID (Optional):", "p_additional_doctor_id").optional(),
];

const DOCTOR_ID: FieldSpec = FieldSpec::text("Doctor ID (Aadhar):", "d_id");
const DOCTOR_ADD: [FieldSpec; 4] = [
    DOCTOR_ID,
    FieldSpec::text("Name:", "d_name"),
    FieldSpec::text("Speciality:", "d_speciality"),
    FieldSpec::new("Years of Experience:", "d_years_exp", FieldKind::Integer),
];
const DOCTOR_UPDATE: [FieldSpec; 5] = [
    DOCTOR_ADD[0],
    DOCTOR_ADD[1],
    DOCTOR_ADD[2],
    DOCTOR_ADD[3],
    FieldSpec::text("Patient ID to Add (Optional):", "d_patient_id").optional(),
];

const PHARMACY_RECORD: [FieldSpec; 3] = [
    FieldSpec::text("Pharmacy Name:", "ph_name"),
    FieldSpec::text("Address:", "ph_address"),
    FieldSpec::text("Phone:", "ph_phone"),
];
const PHARMACY_ADDRESS: FieldSpec = FieldSpec::text("Pharmacy Address:", "ph_address");

const COMPANY_NAME: FieldSpec = FieldSpec::text("Company Name:", "company_name");
const COMPANY_ADD: [FieldSpec; 2] = [
    COMPANY_NAME,
    FieldSpec::text("Phone Number:", "company_phone"),
];
const COMPANY_UPDATE: [FieldSpec; 3] = [
    COMPANY_ADD[0],
    COMPANY_ADD[1],
    FieldSpec::text("New Company Name:", "new_company_name"),
];

const DRUG_ADD: [FieldSpec; 3] = [
    FieldSpec::text("Trade Name:", "trade_name"),
    FieldSpec::text("Formula:", "formula"),
    COMPANY_NAME,
];
const DRUG_DELETE: [FieldSpec; 2] = [FieldSpec::text("Trade Name:", "trade_name"), COMPANY_NAME];

const PRESCRIPTION_KEY: [FieldSpec; 3] = [
    FieldSpec::text("Patient ID:", "p_id"),
    FieldSpec::text("Doctor ID:", "d_id"),
    FieldSpec::new(
        "Prescription Date (YYYY-MM-DD):",
        "pres_date",
        FieldKind::Date,
    ),
];
const PRESCRIPTION_ADD: [FieldSpec; 5] = [
    PRESCRIPTION_KEY[0],
    PRESCRIPTION_KEY[1],
    PRESCRIPTION_KEY[2],
    FieldSpec::new("Drug ID:", "drug_id", FieldKind::Integer),
    FieldSpec::new("Quantity:", "quantity", FieldKind::Integer),
];
const PRESCRIPTION_UPDATE: [FieldSpec; 8] = [
    FieldSpec::text("Old Patient ID:", "old_p_id"),
    FieldSpec::text("Old Doctor ID:", "old_d_id"),
    FieldSpec::new(
        "Old Prescription Date (YYYY-MM-DD):",
        "old_pres_date",
        FieldKind::Date,
    ),
    FieldSpec::text("New Patient ID:", "new_p_id"),
    FieldSpec::text("New Doctor ID:", "new_d_id"),
    FieldSpec::new(
        "New Prescription Date (YYYY-MM-DD):",
        "new_pres_date",
        FieldKind::Date,
    ),
    FieldSpec::new("New Drug ID:", "new_drug_id", FieldKind::Integer),
    FieldSpec::new("New Quantity:", "new_quantity", FieldKind::Integer),
];

const SELLS_KEY: [FieldSpec; 2] = [
    PHARMACY_ADDRESS,
    FieldSpec::new("Drug ID:", "drug_id", FieldKind::Integer),
];
const SELLS_ADD: [FieldSpec; 4] = [
    SELLS_KEY[0],
    SELLS_KEY[1],
    FieldSpec::new("Stock:", "stock", FieldKind::Integer),
    FieldSpec::new("Price:", "price", FieldKind::Decimal),
];
const SELLS_UPDATE: [FieldSpec; 4] = [
    SELLS_KEY[0],
    SELLS_KEY[1],
    FieldSpec::new("New Stock:", "stock", FieldKind::Integer),
    FieldSpec::new("New Price:", "price", FieldKind::Decimal),
];

const CONTRACT_KEY: [FieldSpec; 2] = [COMPANY_NAME, PHARMACY_ADDRESS];
const CONTRACT_RECORD: [FieldSpec; 6] = [
    CONTRACT_KEY[0],
    CONTRACT_KEY[1],
    FieldSpec::text("Content:", "content").multiline(),
    FieldSpec::new("Start Date (YYYY-MM-DD):", "start_date", FieldKind::Date),
    FieldSpec::new("End Date (YYYY-MM-DD):", "end_date", FieldKind::Date),
    FieldSpec::text("Supervisor:", "supervisor"),
];

/// Every (operation, entity) pair that has a form and a store call behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    AddPatient,
    DeletePatient,
    UpdatePatient,
    AddDoctor,
    DeleteDoctor,
    UpdateDoctor,
    AddPharmacy,
    DeletePharmacy,
    UpdatePharmacy,
    AddCompany,
    DeleteCompany,
    UpdateCompany,
    AddDrug,
    DeleteDrug,
    AddPrescription,
    DeletePrescription,
    UpdatePrescription,
    AddContract,
    DeleteContract,
    UpdateContract,
    AddSells,
    DeleteSells,
    UpdateSells,
}

impl FormKind {
    pub const ALL: [Self; 23] = [
        Self::AddPatient,
        Self::DeletePatient,
        Self::UpdatePatient,
        Self::AddDoctor,
        Self::DeleteDoctor,
        Self::UpdateDoctor,
        Self::AddPharmacy,
        Self::DeletePharmacy,
        Self::UpdatePharmacy,
        Self::AddCompany,
        Self::DeleteCompany,
        Self::UpdateCompany,
        Self::AddDrug,
        Self::DeleteDrug,
        Self::AddPrescription,
        Self::DeletePrescription,
        Self::UpdatePrescription,
        Self::AddContract,
        Self::DeleteContract,
        Self::UpdateContract,
        Self::AddSells,
        Self::DeleteSells,
        Self::UpdateSells,
    ];

    pub const fn for_selection(operation: Operation, entity: Entity) -> Option<Self> {
        use Entity as E;
        use Operation as O;

        let kind = match (operation, entity) {
            (O::Add, E::Patient) => Self::AddPatient,
            (O::Delete, E::Patient) => Self::DeletePatient,
            (O::Update, E::Patient) => Self::UpdatePatient,
            (O::Add, E::Doctor) => Self::AddDoctor,
            (O::Delete, E::Doctor) => Self::DeleteDoctor,
            (O::Update, E::Doctor) => Self::UpdateDoctor,
            (O::Add, E::Pharmacy) => Self::AddPharmacy,
            (O::Delete, E::Pharmacy) => Self::DeletePharmacy,
            (O::Update, E::Pharmacy) => Self::UpdatePharmacy,
            (O::Add, E::PharmaceuticalCompany) => Self::AddCompany,
            (O::Delete, E::PharmaceuticalCompany) => Self::DeleteCompany,
            (O::Update, E::PharmaceuticalCompany) => Self::UpdateCompany,
            (O::Add, E::Drug) => Self::AddDrug,
            (O::Delete, E::Drug) => Self::DeleteDrug,
            (O::Update, E::Drug) => return None,
            (O::Add, E::Prescription) => Self::AddPrescription,
            (O::Delete, E::Prescription) => Self::DeletePrescription,
            (O::Update, E::Prescription) => Self::UpdatePrescription,
            (O::Add, E::Contract) => Self::AddContract,
            (O::Delete, E::Contract) => Self::DeleteContract,
            (O::Update, E::Contract) => Self::UpdateContract,
            (O::Add, E::Sells) => Self::AddSells,
            (O::Delete, E::Sells) => Self::DeleteSells,
            (O::Update, E::Sells) => Self::UpdateSells,
        };
        Some(kind)
    }

    pub const fn operation(self) -> Operation {
        match self {
            Self::AddPatient
            | Self::AddDoctor
            | Self::AddPharmacy
            | Self::AddCompany
            | Self::AddDrug
            | Self::AddPrescription
            | Self::AddContract
            | Self::AddSells => Operation::Add,
            Self::DeletePatient
            | Self::DeleteDoctor
            | Self::DeletePharmacy
            | Self::DeleteCompany
            | Self::DeleteDrug
            | Self::DeletePrescription
            | Self::DeleteContract
            | Self::DeleteSells => Operation::Delete,
            Self::UpdatePatient
            | Self::UpdateDoctor
            | Self::UpdatePharmacy
            | Self::UpdateCompany
            | Self::UpdatePrescription
            | Self::UpdateContract
            | Self::UpdateSells => Operation::Update,
        }
    }

    pub const fn entity(self) -> Entity {
        match self {
            Self::AddPatient | Self::DeletePatient | Self::UpdatePatient => Entity::Patient,
            Self::AddDoctor | Self::DeleteDoctor | Self::UpdateDoctor => Entity::Doctor,
            Self::AddPharmacy | Self::DeletePharmacy | Self::UpdatePharmacy => Entity::Pharmacy,
            Self::AddCompany | Self::DeleteCompany | Self::UpdateCompany => {
                Entity::PharmaceuticalCompany
            }
            Self::AddDrug | Self::DeleteDrug => Entity::Drug,
            Self::AddPrescription | Self::DeletePrescription | Self::UpdatePrescription => {
                Entity::Prescription
            }
            Self::AddContract | Self::DeleteContract | Self::UpdateContract => Entity::Contract,
            Self::AddSells | Self::DeleteSells | Self::UpdateSells => Entity::Sells,
        }
    }

    pub const fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::AddPatient | Self::UpdatePatient => &PATIENT_RECORD,
            Self::DeletePatient => &[PATIENT_ID],
            Self::AddDoctor => &DOCTOR_ADD,
            Self::UpdateDoctor => &DOCTOR_UPDATE,
            Self::DeleteDoctor => &[DOCTOR_ID],
            Self::AddPharmacy | Self::UpdatePharmacy => &PHARMACY_RECORD,
            Self::DeletePharmacy => &[PHARMACY_ADDRESS],
            Self::AddCompany => &COMPANY_ADD,
            Self::UpdateCompany => &COMPANY_UPDATE,
            Self::DeleteCompany => &[COMPANY_NAME],
            Self::AddDrug => &DRUG_ADD,
            Self::DeleteDrug => &DRUG_DELETE,
            Self::AddPrescription => &PRESCRIPTION_ADD,
            Self::DeletePrescription => &PRESCRIPTION_KEY,
            Self::UpdatePrescription => &PRESCRIPTION_UPDATE,
            Self::AddContract | Self::UpdateContract => &CONTRACT_RECORD,
            Self::DeleteContract => &CONTRACT_KEY,
            Self::AddSells => &SELLS_ADD,
            Self::DeleteSells => &SELLS_KEY,
            Self::UpdateSells => &SELLS_UPDATE,
        }
    }

    pub fn title(self) -> String {
        format!("{} {}", self.operation().label(), self.entity().label())
    }
}

const REPORT_PATIENT_ID: FieldSpec = FieldSpec::text("Patient ID:", "p_id");
const REPORT_PHARMACY_ADDRESS: FieldSpec = FieldSpec::text("Pharmacy Address:", "ph_address");
const REPORT_COMPANY_NAME: FieldSpec = FieldSpec::text("Company Name:", "company_name");
const REPORT_DOCTOR_ID: FieldSpec = FieldSpec::text("Doctor ID:", "d_id");
const PATIENT_PRESCRIPTIONS_PARAMS: [FieldSpec; 3] = [
    REPORT_PATIENT_ID,
    FieldSpec::text("Start Date (YYYY-MM-DD):", "start_date"),
    FieldSpec::text("End Date (YYYY-MM-DD):", "end_date"),
];
const PRESCRIPTION_DETAILS_PARAMS: [FieldSpec; 2] = [
    REPORT_PATIENT_ID,
    FieldSpec::text("Prescription Date (YYYY-MM-DD):", "pres_date"),
];
const DISPLAY_CONTRACT_PARAMS: [FieldSpec; 3] = [
    FieldSpec::text("Pharmacy Name:", "ph_name"),
    REPORT_PHARMACY_ADDRESS,
    REPORT_COMPANY_NAME,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    PatientPrescriptions,
    PrescriptionDetails,
    CompanyDrugs,
    PharmacyStock,
    PharmacyContact,
    DoctorPatients,
    DisplayContract,
}

impl ReportKind {
    pub const ALL: [Self; 7] = [
        Self::PatientPrescriptions,
        Self::PrescriptionDetails,
        Self::CompanyDrugs,
        Self::PharmacyStock,
        Self::PharmacyContact,
        Self::DoctorPatients,
        Self::DisplayContract,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::PatientPrescriptions => "Patient Prescriptions",
            Self::PrescriptionDetails => "Prescription Details",
            Self::CompanyDrugs => "Company Drugs",
            Self::PharmacyStock => "Pharmacy Stock",
            Self::PharmacyContact => "Pharmacy Contact",
            Self::DoctorPatients => "Doctor's Patients",
            Self::DisplayContract => "Display Contract",
        }
    }

    /// Text on the dialog's run action.
    pub const fn action_label(self) -> &'static str {
        match self {
            Self::PatientPrescriptions => "Generate Report",
            Self::PrescriptionDetails => "Get Details",
            Self::CompanyDrugs => "Get Drugs",
            Self::PharmacyStock => "Get Stock",
            Self::PharmacyContact => "Get Contact",
            Self::DoctorPatients => "Get Patients",
            Self::DisplayContract => "Display Contract",
        }
    }

    pub const fn params(self) -> &'static [FieldSpec] {
        match self {
            Self::PatientPrescriptions => &PATIENT_PRESCRIPTIONS_PARAMS,
            Self::PrescriptionDetails => &PRESCRIPTION_DETAILS_PARAMS,
            Self::CompanyDrugs => &[REPORT_COMPANY_NAME],
            Self::PharmacyStock | Self::PharmacyContact => &[REPORT_PHARMACY_ADDRESS],
            Self::DoctorPatients => &[REPORT_DOCTOR_ID],
            Self::DisplayContract => &DISPLAY_CONTRACT_PARAMS,
        }
    }

    /// 1-based position in the reports panel.
    pub fn hotkey(self) -> usize {
        Self::ALL
            .iter()
            .position(|kind| *kind == self)
            .map_or(0, |index| index + 1)
    }

    pub fn from_hotkey(number: usize) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index).copied())
    }
}
