use std::fs;
use tempfile::TempDir;

use nucls2crops::rename::read_slide_names;
use nucls2crops::{rename_slides, OrganizeError, RenameArgs, RenameStats};

fn setup(metadata: &str, raw_files: &[&str]) -> (TempDir, RenameArgs) {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    let args = RenameArgs::new(
        root.join("fold_1_test.csv"),
        root.join("rgb"),
        root.join("data/test/rgb"),
    );
    fs::write(&args.metadata_csv, metadata).unwrap();
    fs::create_dir_all(&args.source_dir).unwrap();
    for name in raw_files {
        fs::write(args.source_dir.join(name), name.as_bytes()).unwrap();
    }
    (temp_dir, args)
}

#[test]
fn test_rename_moves_matching_files() {
    let (_temp_dir, args) = setup(
        "slide_name,fold\nslideA,1\nslideB,1\nslideC,1\n",
        &["slideA_id-1_left-0.png", "slideB_id-7.png", "other_id-3.png"],
    );

    let stats = rename_slides(&args).unwrap();

    assert_eq!(
        stats,
        RenameStats {
            moved: 2,
            not_found: 1,
            duplicates: 0
        }
    );
    assert_eq!(
        fs::read(args.target_dir.join("slideA.png")).unwrap(),
        b"slideA_id-1_left-0.png"
    );
    assert!(args.target_dir.join("slideB.png").is_file());
    assert!(!args.source_dir.join("slideA_id-1_left-0.png").exists());
    assert!(args.source_dir.join("other_id-3.png").is_file());
}

#[test]
fn test_rename_leaves_duplicates_in_place() {
    let (_temp_dir, args) = setup(
        "slide_name\nslideA\n",
        &["slideA_id-2.png", "slideA_id-1.png"],
    );

    let stats = rename_slides(&args).unwrap();

    assert_eq!(stats.moved, 1);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(
        fs::read(args.target_dir.join("slideA.png")).unwrap(),
        b"slideA_id-1.png"
    );
    assert!(args.source_dir.join("slideA_id-2.png").is_file());
}

#[test]
fn test_rename_requires_prefix_match() {
    let (_temp_dir, args) = setup("slide_name\nslide\n", &["slideA_id-1.png", "slide.png"]);

    let stats = rename_slides(&args).unwrap();

    assert_eq!(stats.moved, 0);
    assert_eq!(stats.not_found, 1);
}

#[test]
fn test_read_slide_names_skips_empty_values() {
    let (_temp_dir, args) = setup("fold,slide_name\n1,slideA\n2,\n3,slideB\n", &[]);

    let slides = read_slide_names(&args.metadata_csv, "slide_name").unwrap();

    assert_eq!(slides, vec!["slideA".to_string(), "slideB".to_string()]);
}

#[test]
fn test_missing_column_is_rejected() {
    let (_temp_dir, args) = setup("name\nslideA\n", &["slideA_id-1.png"]);

    assert!(matches!(
        rename_slides(&args),
        Err(OrganizeError::InvalidArgument(_))
    ));
    assert!(args.source_dir.join("slideA_id-1.png").is_file());
}
