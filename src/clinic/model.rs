use crate::error::{ClinicError, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage partition for one entity domain.
///
/// Each variant maps to a fixed key in the backing store, so two entity
/// types can never share (and clobber) the same persisted overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Namespace {
    Appointments,
    Invoices,
    Patients,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [
        Namespace::Appointments,
        Namespace::Invoices,
        Namespace::Patients,
    ];

    /// The key the overlay for this namespace is persisted under.
    pub fn key(&self) -> &'static str {
        match self {
            Namespace::Appointments => "appointments.local",
            Namespace::Invoices => "billing.invoices.local",
            Namespace::Patients => "patients.local",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Namespace {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "appointments" | "appointment" | "appointments.local" => Ok(Namespace::Appointments),
            "invoices" | "invoice" | "billing" | "billing.invoices.local" => {
                Ok(Namespace::Invoices)
            }
            "patients" | "patient" | "patients.local" => Ok(Namespace::Patients),
            _ => Err(ClinicError::Api(format!("Unknown entity type: {}", s))),
        }
    }
}

/// Anything the overlay store can hold: a serializable record with a string id.
pub trait Record: Serialize + DeserializeOwned + Clone {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

/// A record type bound to the namespace its overlay lives in.
pub trait Entity: Record {
    const NAMESPACE: Namespace;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default)]
    pub id: String,
    pub patient_name: String,
    pub doctor: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub reason: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default)]
    pub id: String,
    pub patient_name: String,
    /// Amount in cents.
    pub amount: u64,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub last_visit: Option<NaiveDate>,
}

macro_rules! impl_entity {
    ($ty:ty, $ns:expr) => {
        impl Record for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }

        impl Entity for $ty {
            const NAMESPACE: Namespace = $ns;
        }
    };
}

impl_entity!(Appointment, Namespace::Appointments);
impl_entity!(Invoice, Namespace::Invoices);
impl_entity!(Patient, Namespace::Patients);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_keys_are_distinct() {
        let mut keys: Vec<_> = Namespace::ALL.iter().map(|ns| ns.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), Namespace::ALL.len());
    }

    #[test]
    fn parses_namespace_aliases() {
        assert_eq!(
            "appointments".parse::<Namespace>().unwrap(),
            Namespace::Appointments
        );
        assert_eq!(
            "billing.invoices.local".parse::<Namespace>().unwrap(),
            Namespace::Invoices
        );
        assert_eq!(" Patients ".parse::<Namespace>().unwrap(), Namespace::Patients);
        assert!("doctors".parse::<Namespace>().is_err());
    }

    #[test]
    fn missing_id_deserializes_as_empty() {
        let json = r#"{"name":"Bob","dateOfBirth":"1980-02-01","lastVisit":null}"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.id(), "");
        assert_eq!(patient.name, "Bob");
    }

    #[test]
    fn uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(Invoice {
            id: "inv-1".into(),
            patient_name: "Ann".into(),
            amount: 1200,
            issued_on: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            due_on: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
            status: InvoiceStatus::Pending,
        })
        .unwrap();
        assert_eq!(json["patientName"], "Ann");
        assert_eq!(json["issuedOn"], "2024-01-02");
        assert_eq!(json["status"], "pending");
    }
}
