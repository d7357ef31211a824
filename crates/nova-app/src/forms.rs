// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use crate::{ActionError, FieldSpec, FormKind};

/// Trimmed text keyed by field key, collected from one rendered form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<&'static str, String>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &'static str, value: impl AsRef<str>) {
        self.values.insert(key, value.as_ref().trim().to_owned());
    }

    pub fn with(mut self, key: &'static str, value: impl AsRef<str>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }

    pub fn is_blank(&self, key: &str) -> bool {
        self.get(key).is_empty()
    }
}

impl<'a> FromIterator<(&'static str, &'a str)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (&'static str, &'a str)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (key, value) in iter {
            values.insert(key, value);
        }
        values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub patient_id: String,
    pub name: String,
    pub age: i64,
    pub address: String,
    pub primary_doctor_id: String,
    pub additional_doctor_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoctorRecord {
    pub doctor_id: String,
    pub name: String,
    pub speciality: String,
    pub years_experience: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoctorUpdate {
    pub doctor: DoctorRecord,
    pub add_patient_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PharmacyRecord {
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRecord {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyUpdate {
    pub name: String,
    pub new_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrugRecord {
    pub trade_name: String,
    pub formula: String,
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrugKey {
    pub trade_name: String,
    pub company_name: String,
}

/// A prescription is identified by patient, doctor and date. The date is
/// sent as typed; the store decides what it accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct PrescriptionKey {
    pub patient_id: String,
    pub doctor_id: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrescriptionRecord {
    pub key: PrescriptionKey,
    pub drug_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrescriptionUpdate {
    pub old: PrescriptionKey,
    pub new: PrescriptionRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContractKey {
    pub company_name: String,
    pub pharmacy_address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContractRecord {
    pub key: ContractKey,
    pub content: String,
    pub start_date: String,
    pub end_date: String,
    pub supervisor: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SellsKey {
    pub pharmacy_address: String,
    pub drug_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SellsEntry {
    pub key: SellsKey,
    pub stock: i64,
    pub price: f64,
}

/// One typed request per supported (operation, entity) pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    AddPatient(PatientRecord),
    DeletePatient { patient_id: String },
    UpdatePatient(PatientRecord),
    AddDoctor(DoctorRecord),
    DeleteDoctor { doctor_id: String },
    UpdateDoctor(DoctorUpdate),
    AddPharmacy(PharmacyRecord),
    DeletePharmacy { address: String },
    UpdatePharmacy(PharmacyRecord),
    AddCompany(CompanyRecord),
    DeleteCompany { name: String },
    UpdateCompany(CompanyUpdate),
    AddDrug(DrugRecord),
    DeleteDrug(DrugKey),
    AddPrescription(PrescriptionRecord),
    DeletePrescription(PrescriptionKey),
    UpdatePrescription(PrescriptionUpdate),
    AddContract(ContractRecord),
    DeleteContract(ContractKey),
    UpdateContract(ContractRecord),
    AddSells(SellsEntry),
    DeleteSells(SellsKey),
    UpdateSells(SellsEntry),
}

impl Submission {
    pub fn kind(&self) -> FormKind {
        match self {
            Self::AddPatient(_) => FormKind::AddPatient,
            Self::DeletePatient { .. } => FormKind::DeletePatient,
            Self::UpdatePatient(_) => FormKind::UpdatePatient,
            Self::AddDoctor(_) => FormKind::AddDoctor,
            Self::DeleteDoctor { .. } => FormKind::DeleteDoctor,
            Self::UpdateDoctor(_) => FormKind::UpdateDoctor,
            Self::AddPharmacy(_) => FormKind::AddPharmacy,
            Self::DeletePharmacy { .. } => FormKind::DeletePharmacy,
            Self::UpdatePharmacy(_) => FormKind::UpdatePharmacy,
            Self::AddCompany(_) => FormKind::AddCompany,
            Self::DeleteCompany { .. } => FormKind::DeleteCompany,
            Self::UpdateCompany(_) => FormKind::UpdateCompany,
            Self::AddDrug(_) => FormKind::AddDrug,
            Self::DeleteDrug(_) => FormKind::DeleteDrug,
            Self::AddPrescription(_) => FormKind::AddPrescription,
            Self::DeletePrescription(_) => FormKind::DeletePrescription,
            Self::UpdatePrescription(_) => FormKind::UpdatePrescription,
            Self::AddContract(_) => FormKind::AddContract,
            Self::DeleteContract(_) => FormKind::DeleteContract,
            Self::UpdateContract(_) => FormKind::UpdateContract,
            Self::AddSells(_) => FormKind::AddSells,
            Self::DeleteSells(_) => FormKind::DeleteSells,
            Self::UpdateSells(_) => FormKind::UpdateSells,
        }
    }

    /// Checks required fields and converts typed fields. Nothing here touches the store.
    pub fn parse(kind: FormKind, values: &FormValues) -> Result<Self, ActionError> {
        let form = FieldReader {
            fields: kind.fields(),
            values,
        };
        form.check_required()?;

        let submission = match kind {
            FormKind::AddPatient => Self::AddPatient(form.patient()?),
            FormKind::DeletePatient => Self::DeletePatient {
                patient_id: form.text("p_id"),
            },
            FormKind::UpdatePatient => Self::UpdatePatient(form.patient()?),
            FormKind::AddDoctor => Self::AddDoctor(form.doctor()?),
            FormKind::DeleteDoctor => Self::DeleteDoctor {
                doctor_id: form.text("d_id"),
            },
            FormKind::UpdateDoctor => Self::UpdateDoctor(DoctorUpdate {
                doctor: form.doctor()?,
                add_patient_id: form.optional_text("d_patient_id"),
            }),
            FormKind::AddPharmacy => Self::AddPharmacy(form.pharmacy()),
            FormKind::DeletePharmacy => Self::DeletePharmacy {
                address: form.text("ph_address"),
            },
            FormKind::UpdatePharmacy => Self::UpdatePharmacy(form.pharmacy()),
            FormKind::AddCompany => Self::AddCompany(CompanyRecord {
                name: form.text("company_name"),
                phone: form.text("company_phone"),
            }),
            FormKind::DeleteCompany => Self::DeleteCompany {
                name: form.text("company_name"),
            },
            FormKind::UpdateCompany => Self::UpdateCompany(CompanyUpdate {
                name: form.text("company_name"),
                new_name: form.text("new_company_name"),
                phone: form.text("company_phone"),
            }),
            FormKind::AddDrug => Self::AddDrug(DrugRecord {
                trade_name: form.text("trade_name"),
                formula: form.text("formula"),
                company_name: form.text("company_name"),
            }),
            FormKind::DeleteDrug => Self::DeleteDrug(DrugKey {
                trade_name: form.text("trade_name"),
                company_name: form.text("company_name"),
            }),
            FormKind::AddPrescription => Self::AddPrescription(PrescriptionRecord {
                key: form.prescription_key("p_id", "d_id", "pres_date")?,
                drug_id: form.integer("drug_id")?,
                quantity: form.integer("quantity")?,
            }),
            FormKind::DeletePrescription => {
                Self::DeletePrescription(form.prescription_key("p_id", "d_id", "pres_date")?)
            }
            FormKind::UpdatePrescription => Self::UpdatePrescription(PrescriptionUpdate {
                old: form.prescription_key("old_p_id", "old_d_id", "old_pres_date")?,
                new: PrescriptionRecord {
                    key: form.prescription_key("new_p_id", "new_d_id", "new_pres_date")?,
                    drug_id: form.integer("new_drug_id")?,
                    quantity: form.integer("new_quantity")?,
                },
            }),
            FormKind::AddContract => Self::AddContract(form.contract()?),
            FormKind::DeleteContract => Self::DeleteContract(form.contract_key()),
            FormKind::UpdateContract => Self::UpdateContract(form.contract()?),
            FormKind::AddSells => Self::AddSells(form.sells_entry()?),
            FormKind::DeleteSells => Self::DeleteSells(form.sells_key()?),
            FormKind::UpdateSells => Self::UpdateSells(form.sells_entry()?),
        };
        Ok(submission)
    }
}

struct FieldReader<'a> {
    fields: &'static [FieldSpec],
    values: &'a FormValues,
}

impl FieldReader<'_> {
    fn check_required(&self) -> Result<(), ActionError> {
        for field in self.fields {
            if !field.optional && self.values.is_blank(field.key) {
                return Err(ActionError::Validation(format!(
                    "{} is required -- fill it in and submit again",
                    field.name()
                )));
            }
        }
        Ok(())
    }

    fn spec(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.key == key)
    }

    fn label(&self, key: &str) -> &'static str {
        self.spec(key).map_or("field", FieldSpec::name)
    }

    fn text(&self, key: &str) -> String {
        self.values.get(key).to_owned()
    }

    fn optional_text(&self, key: &str) -> Option<String> {
        let value = self.values.get(key);
        (!value.is_empty()).then(|| value.to_owned())
    }

    fn integer(&self, key: &str) -> Result<i64, ActionError> {
        let raw = self.values.get(key);
        raw.parse::<i64>().map_err(|_| {
            ActionError::Validation(format!(
                "{} must be a whole number, got {raw:?}",
                self.label(key)
            ))
        })
    }

    fn decimal(&self, key: &str) -> Result<f64, ActionError> {
        let raw = self.values.get(key);
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ActionError::Validation(format!(
                "{} must be a number, got {raw:?}",
                self.label(key)
            ))),
        }
    }

    fn patient(&self) -> Result<PatientRecord, ActionError> {
        Ok(PatientRecord {
            patient_id: self.text("p_id"),
            name: self.text("p_name"),
            age: self.integer("p_age")?,
            address: self.text("p_address"),
            primary_doctor_id: self.text("p_primary_physician_id"),
            additional_doctor_id: self.optional_text("p_additional_doctor_id"),
        })
    }

    fn doctor(&self) -> Result<DoctorRecord, ActionError> {
        Ok(DoctorRecord {
            doctor_id: self.text("d_id"),
            name: self.text("d_name"),
            speciality: self.text("d_speciality"),
            years_experience: self.integer("d_years_exp")?,
        })
    }

    fn pharmacy(&self) -> PharmacyRecord {
        PharmacyRecord {
            name: self.text("ph_name"),
            address: self.text("ph_address"),
            phone: self.text("ph_phone"),
        }
    }

    fn prescription_key(
        &self,
        patient: &str,
        doctor: &str,
        date: &str,
    ) -> Result<PrescriptionKey, ActionError> {
        Ok(PrescriptionKey {
            patient_id: self.text(patient),
            doctor_id: self.text(doctor),
            date: self.text(date),
        })
    }

    fn contract_key(&self) -> ContractKey {
        ContractKey {
            company_name: self.text("company_name"),
            pharmacy_address: self.text("ph_address"),
        }
    }

    fn contract(&self) -> Result<ContractRecord, ActionError> {
        Ok(ContractRecord {
            key: self.contract_key(),
            content: self.text("content"),
            start_date: self.text("start_date"),
            end_date: self.text("end_date"),
            supervisor: self.text("supervisor"),
        })
    }

    fn sells_key(&self) -> Result<SellsKey, ActionError> {
        Ok(SellsKey {
            pharmacy_address: self.text("ph_address"),
            drug_id: self.integer("drug_id")?,
        })
    }

    fn sells_entry(&self) -> Result<SellsEntry, ActionError> {
        Ok(SellsEntry {
            key: self.sells_key()?,
            stock: self.integer("stock")?,
            price: self.decimal("price")?,
        })
    }
}
