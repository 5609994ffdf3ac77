use clinicapp::error::ClinicError;
use clinicapp::store::backend::StorageBackend;
use clinicapp::store::fs_backend::FsBackend;
use clinicapp::store::RecordStore;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, RecordStore<FsBackend>) {
    let dir = TempDir::new().unwrap();
    let store = RecordStore::with_backend(FsBackend::new(dir.path().join("data")));
    (dir, store)
}

fn fields(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_insert_assigns_sequential_ids_on_disk() {
    let (dir, store) = setup();

    for expected in 1..=3 {
        let id = store.insert("centros", &fields(&["x", "y"])).unwrap();
        assert_eq!(id, expected);
    }

    let on_disk = fs::read_to_string(dir.path().join("data/centros.dat")).unwrap();
    assert_eq!(on_disk, "1|x|y\n2|x|y\n3|x|y\n");
}

#[test]
fn test_missing_file_reads_as_empty() {
    let (_dir, store) = setup();
    assert!(store.get_all("centros").unwrap().is_empty());
    assert!(store.get_by_id("centros", 1).unwrap().is_none());
    assert!(store.search("centros", 1, "x").unwrap().is_empty());
}

#[test]
fn test_update_rewrites_in_place_without_tmp_leftovers() {
    let (dir, store) = setup();
    store.insert("centros", &fields(&["a"])).unwrap();
    store.insert("centros", &fields(&["b"])).unwrap();
    store.insert("centros", &fields(&["c"])).unwrap();

    assert!(store.update("centros", 2, &fields(&["B", "extra"])).unwrap());

    let data = dir.path().join("data");
    let on_disk = fs::read_to_string(data.join("centros.dat")).unwrap();
    assert_eq!(on_disk, "1|a\n2|B|extra\n3|c\n");

    for entry in fs::read_dir(&data).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_update_of_unknown_id_leaves_file_untouched() {
    let (dir, store) = setup();
    store.insert("centros", &fields(&["a"])).unwrap();
    let path = dir.path().join("data/centros.dat");
    // hand-edited file with odd spacing and a blank line
    fs::write(&path, "1|a\n\n 2|b \n").unwrap();
    let before = fs::read(&path).unwrap();

    assert!(!store.update("centros", 9, &fields(&["z"])).unwrap());
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_non_integer_identifier_aborts_scan() {
    let (dir, store) = setup();
    let data = dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("centros.dat"), "1|a\nabc|b\n").unwrap();

    // get_all does not interpret the identifier column
    assert_eq!(store.get_all("centros").unwrap().len(), 2);
    assert!(matches!(
        store.get_by_id("centros", 5),
        Err(ClinicError::MalformedRecord { .. })
    ));
    assert!(matches!(
        store.insert("centros", &fields(&["c"])),
        Err(ClinicError::MalformedRecord { .. })
    ));
}

#[test]
fn test_custom_extension() {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf()).with_file_ext("txt");
    assert_eq!(backend.file_path("usuarios"), dir.path().join("usuarios.txt"));

    let store = RecordStore::with_backend(backend);
    store.insert("usuarios", &fields(&["Ana"])).unwrap();
    assert!(dir.path().join("usuarios.txt").exists());
}

#[test]
fn test_insert_after_hand_edited_file_without_final_newline() {
    let (dir, store) = setup();
    let data = dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("centros.dat"),
        "1|Sur|Av 1|22334455|True|2024-01-05 10:00:00",
    )
    .unwrap();

    let id = store
        .insert(
            "centros",
            &fields(&["Norte", "Av 2", "33445566", "True", "2024-01-06 10:00:00"]),
        )
        .unwrap();
    assert_eq!(id, 2);

    let rows = store.get_all("centros").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][5], "2024-01-05 10:00:00");
    assert_eq!(rows[1][1], "Norte");
}
