// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use nova_app::{
    ContractRecord, DoctorRecord, PatientRecord, PrescriptionKey, ReportRequest, SellsEntry,
    Submission,
};

use crate::{Arg, Call};

/// Joins a contract to its pharmacy and company. Parameters: address, pharmacy name, company.
pub const DISPLAY_CONTRACT_SQL: &str = "SELECT
    c.company_name AS 'Company Name',
    pc.phone_number AS 'Company Phone',
    p.pname AS 'Pharmacy Name',
    p.address AS 'Pharmacy Address',
    p.phone AS 'Pharmacy Phone',
    c.start_date AS 'Contract Start Date',
    c.end_date AS 'Contract End Date',
    c.supervisor AS 'Contract Supervisor',
    c.content AS 'Contract Content',
    CASE
        WHEN c.end_date < CURDATE() THEN 'Expired'
        WHEN c.start_date > CURDATE() THEN 'Future'
        ELSE 'Active'
    END AS 'Contract Status',
    DATEDIFF(c.end_date, CURDATE()) AS 'Days Remaining'
FROM Contract c
JOIN Pharmacy p ON c.ph_address = p.address
JOIN PharmaceuticalCompany pc ON c.company_name = pc.company_name
WHERE c.ph_address = ?
AND p.pname = ?
AND c.company_name = ?";

/// The store call for one submission, with arguments in the procedure's positional order.
pub fn call_for(submission: &Submission) -> Call {
    match submission {
        Submission::AddPatient(record) => Call::procedure("add_patient", patient_args(record)),
        Submission::DeletePatient { patient_id } => {
            Call::procedure("delete_patient", vec![Arg::text(patient_id)])
        }
        Submission::UpdatePatient(record) => {
            Call::procedure("update_patient", patient_args(record))
        }
        Submission::AddDoctor(record) => Call::procedure("add_doctor", doctor_args(record)),
        Submission::DeleteDoctor { doctor_id } => {
            Call::procedure("delete_doctor", vec![Arg::text(doctor_id)])
        }
        Submission::UpdateDoctor(update) => {
            let mut args = doctor_args(&update.doctor);
            // A blank patient goes out as NULL, not ''. The procedure must treat
            // NULL as "no patient to link".
            args.push(Arg::optional_text(update.add_patient_id.as_deref()));
            Call::procedure("update_doctor", args)
        }
        Submission::AddPharmacy(record) => Call::procedure(
            "add_pharmacy",
            vec![
                Arg::text(&record.name),
                Arg::text(&record.address),
                Arg::text(&record.phone),
            ],
        ),
        Submission::DeletePharmacy { address } => {
            Call::procedure("delete_pharmacy", vec![Arg::text(address)])
        }
        Submission::UpdatePharmacy(record) => Call::procedure(
            "update_pharmacy",
            vec![
                Arg::text(&record.address),
                Arg::text(&record.name),
                Arg::text(&record.phone),
            ],
        ),
        Submission::AddCompany(record) => Call::procedure(
            "add_company",
            vec![Arg::text(&record.name), Arg::text(&record.phone)],
        ),
        Submission::DeleteCompany { name } => {
            Call::procedure("delete_company", vec![Arg::text(name)])
        }
        Submission::UpdateCompany(update) => Call::procedure(
            "update_company",
            vec![
                Arg::text(&update.name),
                Arg::text(&update.new_name),
                Arg::text(&update.phone),
            ],
        ),
        Submission::AddDrug(record) => Call::procedure(
            "add_drug",
            vec![
                Arg::text(&record.trade_name),
                Arg::text(&record.formula),
                Arg::text(&record.company_name),
            ],
        ),
        Submission::DeleteDrug(key) => Call::procedure(
            "delete_drug",
            vec![Arg::text(&key.trade_name), Arg::text(&key.company_name)],
        ),
        Submission::AddPrescription(record) => {
            let mut args = prescription_key_args(&record.key);
            args.extend([Arg::Int(record.drug_id), Arg::Int(record.quantity)]);
            Call::procedure("add_prescription", args)
        }
        Submission::DeletePrescription(key) => {
            Call::procedure("delete_prescription", prescription_key_args(key))
        }
        Submission::UpdatePrescription(update) => {
            let mut args = prescription_key_args(&update.old);
            args.extend(prescription_key_args(&update.new.key));
            args.extend([Arg::Int(update.new.drug_id), Arg::Int(update.new.quantity)]);
            Call::procedure("update_prescription", args)
        }
        Submission::AddContract(record) => Call::procedure("add_contract", contract_args(record)),
        Submission::DeleteContract(key) => Call::procedure(
            "delete_contract",
            vec![
                Arg::text(&key.company_name),
                Arg::text(&key.pharmacy_address),
            ],
        ),
        Submission::UpdateContract(record) => {
            Call::procedure("update_contract", contract_args(record))
        }
        Submission::AddSells(entry) => Call::procedure("add_sells_entry", sells_args(entry)),
        Submission::DeleteSells(key) => Call::procedure(
            "delete_sells_entry",
            vec![Arg::text(&key.pharmacy_address), Arg::Int(key.drug_id)],
        ),
        // The store has no update_sells_entry; its upsert takes the drug first.
        Submission::UpdateSells(entry) => Call::procedure(
            "add_drug_to_pharmacy",
            vec![
                Arg::Int(entry.key.drug_id),
                Arg::text(&entry.key.pharmacy_address),
                Arg::Int(entry.stock),
                Arg::Decimal(entry.price),
            ],
        ),
    }
}

pub fn call_for_report(request: &ReportRequest) -> Call {
    match request {
        ReportRequest::PatientPrescriptions {
            patient_id,
            start_date,
            end_date,
        } => Call::procedure(
            "prescription_report",
            vec![
                Arg::text(patient_id),
                Arg::text(start_date),
                Arg::text(end_date),
            ],
        ),
        ReportRequest::PrescriptionDetails { patient_id, date } => Call::procedure(
            "print_pres_details",
            vec![Arg::text(patient_id), Arg::text(date)],
        ),
        ReportRequest::CompanyDrugs { company_name } => {
            Call::procedure("drug_details", vec![Arg::text(company_name)])
        }
        ReportRequest::PharmacyStock { pharmacy_address } => {
            Call::procedure("print_stock_position", vec![Arg::text(pharmacy_address)])
        }
        ReportRequest::PharmacyContact { pharmacy_address } => {
            Call::procedure("print_pharmacy_contact", vec![Arg::text(pharmacy_address)])
        }
        ReportRequest::DoctorPatients { doctor_id } => {
            Call::procedure("print_patients_for_doctor", vec![Arg::text(doctor_id)])
        }
        ReportRequest::DisplayContract {
            pharmacy_name,
            pharmacy_address,
            company_name,
        } => Call::Query {
            label: "display_contract",
            sql: DISPLAY_CONTRACT_SQL,
            args: vec![
                Arg::text(pharmacy_address),
                Arg::text(pharmacy_name),
                Arg::text(company_name),
            ],
        },
    }
}

fn patient_args(record: &PatientRecord) -> Vec<Arg> {
    vec![
        Arg::text(&record.patient_id),
        Arg::text(&record.name),
        Arg::Int(record.age),
        Arg::text(&record.address),
        Arg::text(&record.primary_doctor_id),
        Arg::optional_text(record.additional_doctor_id.as_deref()),
    ]
}

fn doctor_args(record: &DoctorRecord) -> Vec<Arg> {
    vec![
        Arg::text(&record.doctor_id),
        Arg::text(&record.name),
        Arg::text(&record.speciality),
        Arg::Int(record.years_experience),
    ]
}

fn prescription_key_args(key: &PrescriptionKey) -> Vec<Arg> {
    vec![
        Arg::text(&key.patient_id),
        Arg::text(&key.doctor_id),
        Arg::text(&key.date),
    ]
}

fn contract_args(record: &ContractRecord) -> Vec<Arg> {
    vec![
        Arg::text(&record.key.company_name),
        Arg::text(&record.key.pharmacy_address),
        Arg::text(&record.content),
        Arg::text(&record.start_date),
        Arg::text(&record.end_date),
        Arg::text(&record.supervisor),
    ]
}

fn sells_args(entry: &SellsEntry) -> Vec<Arg> {
    vec![
        Arg::text(&entry.key.pharmacy_address),
        Arg::Int(entry.key.drug_id),
        Arg::Int(entry.stock),
        Arg::Decimal(entry.price),
    ]
}
