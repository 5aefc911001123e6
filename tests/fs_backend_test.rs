use clinic_overlay::model::Namespace;
use clinic_overlay::overlay::OverlayStore;
use clinic_overlay::seeds;
use clinic_overlay::store::fs::FsBackend;
use clinic_overlay::store::KeyValueStore;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("data"));
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_io() {
    let (_dir, backend) = setup();

    assert_eq!(backend.get("patients.local").unwrap(), None);

    backend.set("patients.local", "{}").unwrap();
    assert_eq!(backend.get("patients.local").unwrap(), Some("{}".to_string()));

    backend.remove("patients.local").unwrap();
    assert_eq!(backend.get("patients.local").unwrap(), None);

    // Removing twice is fine
    backend.remove("patients.local").unwrap();
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (_dir, backend) = setup();
    backend.set("appointments.local", "first").unwrap();
    backend.set("appointments.local", "second").unwrap();

    let expected_path = backend.root().join("appointments.local.json");
    assert_eq!(fs::read_to_string(&expected_path).unwrap(), "second");

    for entry in fs::read_dir(backend.root()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_rejects_path_like_keys() {
    let (_dir, backend) = setup();
    assert!(backend.set("../escape", "x").is_err());
    assert!(backend.get("").is_err());
    assert!(backend.set(".hidden", "x").is_err());
}

#[test]
fn test_overlay_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let seed = seeds::patients();

    {
        let store = OverlayStore::new(FsBackend::new(dir.path()));
        store
            .update(Namespace::Patients, seed, "pat-3002", &json!({"phone": "555-9999"}))
            .unwrap();
        store.delete(Namespace::Patients, seed, "pat-3004").unwrap();
    }

    let reopened = OverlayStore::new(FsBackend::new(dir.path()));
    let patients = reopened.list(Namespace::Patients, seed);
    assert_eq!(patients.len(), seed.len() - 1);
    assert_eq!(patients[1].phone, "555-9999");
    assert!(patients.iter().all(|p| p.id != "pat-3004"));
}

#[test]
fn test_corrupt_file_falls_back_to_seed() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("billing.invoices.local.json"), "not json").unwrap();

    let store = OverlayStore::new(FsBackend::new(dir.path()));
    assert_eq!(
        store.list(Namespace::Invoices, seeds::invoices()),
        seeds::invoices()
    );

    // The next write replaces the corrupt payload with valid state
    store
        .delete(Namespace::Invoices, seeds::invoices(), "inv-2001")
        .unwrap();
    let raw = fs::read_to_string(dir.path().join("billing.invoices.local.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["deletedIds"], json!(["inv-2001"]));
}

#[test]
fn test_fs_backend_failed_write_leaves_no_tmp_file() {
    let (_dir, backend) = setup();
    backend.set("patients.local", "seed").unwrap();

    // A directory at the target path makes the rename fail after the tmp
    // file has been written.
    fs::create_dir(backend.root().join("appointments.local.json")).unwrap();
    assert!(backend.set("appointments.local", "payload").is_err());

    let leftovers: Vec<String> = fs::read_dir(backend.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "Found leftover tmp files: {:?}", leftovers);
}
