//! # API Facade
//!
//! The API layer is a **thin facade** over the overlay store. Each method
//! fixes the namespace and the bundled seed for one entity type and forwards
//! to the generic operation; there is no logic here beyond that.
//!
//! ## Generic Over KeyValueStore
//!
//! `ClinicApi<B: KeyValueStore>` is generic over the backing store:
//! - Production: `ClinicApi<FsBackend>`
//! - Testing: `ClinicApi<MemBackend>`

use crate::error::Result;
use crate::model::{
    Appointment, AppointmentStatus, Entity, Invoice, InvoiceStatus, Namespace, Patient,
};
use crate::overlay::{OverlayState, OverlayStore};
use crate::seeds;
use crate::store::KeyValueStore;
use chrono::NaiveDate;
use serde::Serialize;

/// Field changes for an appointment. `None` fields are left as they are.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `Some(None)` clears the last visit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<Option<NaiveDate>>,
}

/// The entry point UI code talks to.
pub struct ClinicApi<B: KeyValueStore> {
    store: OverlayStore<B>,
}

impl<B: KeyValueStore> ClinicApi<B> {
    pub fn new(store: OverlayStore<B>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &OverlayStore<B> {
        &self.store
    }

    // --- Generic entity operations ---

    pub fn list<T: Entity>(&self, seed: &[T]) -> Vec<T> {
        self.store.list(T::NAMESPACE, seed)
    }

    pub fn create<T: Entity>(&self, seed: &[T], record: T) -> Result<T> {
        self.store.create(T::NAMESPACE, seed, record)
    }

    pub fn update<T: Entity, P: Serialize + ?Sized>(
        &self,
        seed: &[T],
        id: &str,
        patch: &P,
    ) -> Result<Option<T>> {
        self.store.update(T::NAMESPACE, seed, id, patch)
    }

    pub fn delete<T: Entity>(&self, seed: &[T], id: &str) -> Result<bool> {
        self.store.delete(T::NAMESPACE, seed, id)
    }

    pub fn overlay<T: Entity>(&self) -> OverlayState<T> {
        self.store.overlay(T::NAMESPACE)
    }

    pub fn clear(&self, ns: Namespace) -> Result<()> {
        self.store.clear(ns)
    }

    // --- Appointments ---

    pub fn list_appointments(&self) -> Vec<Appointment> {
        self.list(seeds::appointments())
    }

    pub fn create_appointment(&self, appointment: Appointment) -> Result<Appointment> {
        self.create(seeds::appointments(), appointment)
    }

    pub fn update_appointment(
        &self,
        id: &str,
        patch: &AppointmentPatch,
    ) -> Result<Option<Appointment>> {
        self.update(seeds::appointments(), id, patch)
    }

    pub fn delete_appointment(&self, id: &str) -> Result<bool> {
        self.delete(seeds::appointments(), id)
    }

    // --- Invoices ---

    pub fn list_invoices(&self) -> Vec<Invoice> {
        self.list(seeds::invoices())
    }

    pub fn create_invoice(&self, invoice: Invoice) -> Result<Invoice> {
        self.create(seeds::invoices(), invoice)
    }

    pub fn update_invoice(&self, id: &str, patch: &InvoicePatch) -> Result<Option<Invoice>> {
        self.update(seeds::invoices(), id, patch)
    }

    pub fn delete_invoice(&self, id: &str) -> Result<bool> {
        self.delete(seeds::invoices(), id)
    }

    // --- Patients ---

    pub fn list_patients(&self) -> Vec<Patient> {
        self.list(seeds::patients())
    }

    pub fn create_patient(&self, patient: Patient) -> Result<Patient> {
        self.create(seeds::patients(), patient)
    }

    pub fn update_patient(&self, id: &str, patch: &PatientPatch) -> Result<Option<Patient>> {
        self.update(seeds::patients(), id, patch)
    }

    pub fn delete_patient(&self, id: &str) -> Result<bool> {
        self.delete(seeds::patients(), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemBackend;

    fn api() -> ClinicApi<MemBackend> {
        ClinicApi::new(OverlayStore::new(MemBackend::new()))
    }

    #[test]
    fn lists_bundled_seeds() {
        let api = api();
        assert_eq!(api.list_appointments(), seeds::appointments());
        assert_eq!(api.list_invoices(), seeds::invoices());
        assert_eq!(api.list_patients(), seeds::patients());
    }

    #[test]
    fn appointment_patch_changes_only_given_fields() {
        let api = api();
        let patch = AppointmentPatch {
            status: Some(AppointmentStatus::Cancelled),
            ..Default::default()
        };
        let updated = api.update_appointment("apt-1001", &patch).unwrap().unwrap();

        let original = &seeds::appointments()[0];
        assert_eq!(updated.status, AppointmentStatus::Cancelled);
        assert_eq!(updated.patient_name, original.patient_name);
        assert_eq!(updated.date, original.date);
        assert_eq!(api.list_appointments()[0], updated);
    }

    #[test]
    fn invoice_writes_go_to_billing_namespace() {
        let api = api();
        api.delete_invoice("inv-2002").unwrap();

        let raw = api
            .store()
            .backend()
            .raw_get("billing.invoices.local")
            .unwrap();
        assert!(raw.contains("inv-2002"));
        assert_eq!(api.list_invoices().len(), seeds::invoices().len() - 1);
        assert_eq!(api.list_patients().len(), seeds::patients().len());
    }

    #[test]
    fn created_patient_is_appended() {
        let api = api();
        let created = api
            .create_patient(Patient {
                id: String::new(),
                name: "Bob Ferris".into(),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 7, 4).unwrap(),
                phone: String::new(),
                email: String::new(),
                last_visit: None,
            })
            .unwrap();

        let patients = api.list_patients();
        assert_eq!(patients.last(), Some(&created));
        assert_eq!(patients.len(), seeds::patients().len() + 1);
    }

    #[test]
    fn patient_patch_sets_and_clears_last_visit() {
        let api = api();
        let visit = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let patch = PatientPatch {
            last_visit: Some(Some(visit)),
            ..Default::default()
        };
        let updated = api.update_patient("pat-3001", &patch).unwrap().unwrap();
        assert_eq!(updated.last_visit, Some(visit));

        let patch = PatientPatch {
            last_visit: Some(None),
            ..Default::default()
        };
        let updated = api.update_patient("pat-3001", &patch).unwrap().unwrap();
        assert_eq!(updated.last_visit, None);

        let untouched = api
            .update_patient("pat-3002", &PatientPatch::default())
            .unwrap()
            .unwrap();
        assert_eq!(untouched.last_visit, seeds::patients()[1].last_visit);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let api = api();
        assert!(api
            .update_patient("pat-9999", &PatientPatch::default())
            .unwrap()
            .is_none());
        assert!(!api.delete_appointment("apt-9999").unwrap());
    }

    #[test]
    fn clear_resets_one_namespace() {
        let api = api();
        api.delete_patient("pat-3001").unwrap();
        api.delete_invoice("inv-2001").unwrap();

        api.clear(Namespace::Patients).unwrap();
        assert_eq!(api.list_patients(), seeds::patients());
        assert_eq!(api.list_invoices().len(), seeds::invoices().len() - 1);
    }
}
