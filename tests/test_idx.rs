use approx::assert_abs_diff_eq;
use digitnet::{load_idx_pair, parse_idx_pair, Error};

fn image_file(n: u32, rows: u32, cols: u32, pixels: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for v in [2051u32, n, rows, cols] {
        bytes.extend_from_slice(&v.to_be_bytes());
    }
    bytes.extend_from_slice(pixels);
    bytes
}

fn label_file(n: u32, labels: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for v in [2049u32, n] {
        bytes.extend_from_slice(&v.to_be_bytes());
    }
    bytes.extend_from_slice(labels);
    bytes
}

#[test]
fn parses_and_normalizes_samples() {
    let images = image_file(2, 2, 2, &[0, 255, 51, 102, 255, 255, 0, 0]);
    let labels = label_file(2, &[7, 3]);
    let data = parse_idx_pair(&images, &labels).unwrap();

    assert_eq!(data.len(), 2);
    assert_eq!(data.labels(), &[7, 3]);

    let (first, label) = data.get(0).unwrap();
    assert_eq!(label, 7);
    assert_eq!(first.shape(), (4, 1));
    let expected = [0.0, 1.0, 0.2, 0.4];
    for (x, e) in first.as_slice().iter().zip(expected) {
        assert_abs_diff_eq!(*x, e, epsilon = 1e-12);
    }
}

#[test]
fn rejects_bad_magic_numbers() {
    let mut images = image_file(1, 1, 1, &[0]);
    images[3] = 0x01;
    assert!(matches!(parse_idx_pair(&images, &label_file(1, &[0])), Err(Error::DataLoad(_))));

    let images = image_file(1, 1, 1, &[0]);
    let mut labels = label_file(1, &[0]);
    labels[3] = 0x03;
    assert!(matches!(parse_idx_pair(&images, &labels), Err(Error::DataLoad(_))));
}

#[test]
fn rejects_count_mismatch() {
    let images = image_file(2, 1, 1, &[0, 0]);
    let labels = label_file(3, &[0, 0, 0]);
    match parse_idx_pair(&images, &labels) {
        Err(Error::DataLoad(msg)) => assert!(msg.contains("don't match"), "{}", msg),
        other => panic!("unexpected result: {:?}", other.map(|d| d.len())),
    }
}

#[test]
fn rejects_truncated_files() {
    assert!(parse_idx_pair(&[0, 0, 8], &label_file(0, &[])).is_err());
    let images = image_file(2, 2, 2, &[0; 5]);
    assert!(parse_idx_pair(&images, &label_file(2, &[0, 1])).is_err());
    let images = image_file(2, 1, 1, &[0, 0]);
    assert!(parse_idx_pair(&images, &label_file(2, &[0])).is_err());
}

#[test]
fn load_reports_missing_files() {
    let missing = std::env::temp_dir().join("digitnet-does-not-exist.idx3-ubyte");
    assert!(matches!(load_idx_pair(&missing, &missing), Err(Error::DataLoad(_))));
}

#[test]
fn load_reads_files_from_disk() {
    let dir = std::env::temp_dir();
    let images_path = dir.join(format!("digitnet-test-{}-images", std::process::id()));
    let labels_path = dir.join(format!("digitnet-test-{}-labels", std::process::id()));
    std::fs::write(&images_path, image_file(1, 1, 2, &[255, 0])).unwrap();
    std::fs::write(&labels_path, label_file(1, &[4])).unwrap();

    let data = load_idx_pair(&images_path, &labels_path).unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data.get(0).map(|(x, y)| (x.to_vec(), y)), Some((vec![1.0, 0.0], 4)));

    let _ = std::fs::remove_file(images_path);
    let _ = std::fs::remove_file(labels_path);
}
