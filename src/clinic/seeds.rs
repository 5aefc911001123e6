//! Bundled mock records shipped with the app.
//!
//! These are the read-only baseline every overlay is layered on. Nothing in
//! the crate mutates them; the overlay store clones what it returns.

use crate::model::{Appointment, AppointmentStatus, Invoice, InvoiceStatus, Patient};
use chrono::NaiveDate;
use once_cell::sync::Lazy;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn appointment(
    id: &str,
    patient_name: &str,
    doctor: &str,
    date: NaiveDate,
    time: &str,
    reason: &str,
    status: AppointmentStatus,
) -> Appointment {
    Appointment {
        id: id.to_string(),
        patient_name: patient_name.to_string(),
        doctor: doctor.to_string(),
        date,
        time: time.to_string(),
        reason: reason.to_string(),
        status,
    }
}

fn invoice(
    id: &str,
    patient_name: &str,
    amount: u64,
    issued_on: NaiveDate,
    due_on: NaiveDate,
    status: InvoiceStatus,
) -> Invoice {
    Invoice {
        id: id.to_string(),
        patient_name: patient_name.to_string(),
        amount,
        issued_on,
        due_on,
        status,
    }
}

fn patient(
    id: &str,
    name: &str,
    date_of_birth: NaiveDate,
    phone: &str,
    email: &str,
    last_visit: Option<NaiveDate>,
) -> Patient {
    Patient {
        id: id.to_string(),
        name: name.to_string(),
        date_of_birth,
        phone: phone.to_string(),
        email: email.to_string(),
        last_visit,
    }
}

static APPOINTMENTS: Lazy<Vec<Appointment>> = Lazy::new(|| {
    use AppointmentStatus::*;
    vec![
        appointment("apt-1001", "Maria Lopez", "Dr. Chen", date(2024, 5, 6), "09:00", "Annual checkup", Confirmed),
        appointment("apt-1002", "James Okafor", "Dr. Patel", date(2024, 5, 6), "10:30", "Follow-up: blood pressure", Scheduled),
        appointment("apt-1003", "Aiko Tanaka", "Dr. Chen", date(2024, 5, 7), "14:15", "Vaccination", Completed),
        appointment("apt-1004", "Samuel Reyes", "Dr. Novak", date(2024, 5, 8), "11:00", "Knee pain", Cancelled),
    ]
});

static INVOICES: Lazy<Vec<Invoice>> = Lazy::new(|| {
    use InvoiceStatus::*;
    vec![
        invoice("inv-2001", "Maria Lopez", 12_000, date(2024, 4, 2), date(2024, 5, 2), Paid),
        invoice("inv-2002", "James Okafor", 8_550, date(2024, 4, 15), date(2024, 5, 15), Pending),
        invoice("inv-2003", "Aiko Tanaka", 4_000, date(2024, 3, 1), date(2024, 3, 31), Overdue),
    ]
});

static PATIENTS: Lazy<Vec<Patient>> = Lazy::new(|| {
    vec![
        patient("pat-3001", "Maria Lopez", date(1985, 9, 14), "555-0101", "maria.lopez@example.com", Some(date(2024, 4, 2))),
        patient("pat-3002", "James Okafor", date(1972, 1, 30), "555-0102", "j.okafor@example.com", Some(date(2024, 4, 15))),
        patient("pat-3003", "Aiko Tanaka", date(1994, 6, 3), "555-0103", "aiko.t@example.com", Some(date(2024, 3, 1))),
        patient("pat-3004", "Samuel Reyes", date(2001, 11, 21), "555-0104", "", None),
    ]
});

pub fn appointments() -> &'static [Appointment] {
    &APPOINTMENTS
}

pub fn invoices() -> &'static [Invoice] {
    &INVOICES
}

pub fn patients() -> &'static [Patient] {
    &PATIENTS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use std::collections::HashSet;

    fn unique_ids<T: Record>(records: &[T]) -> bool {
        let ids: HashSet<&str> = records.iter().map(|r| r.id()).collect();
        ids.len() == records.len() && !ids.contains("")
    }

    #[test]
    fn seed_ids_are_unique_and_present() {
        assert!(unique_ids(appointments()));
        assert!(unique_ids(invoices()));
        assert!(unique_ids(patients()));
    }
}
