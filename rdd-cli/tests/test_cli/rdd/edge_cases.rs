use std::fs;

use crate::add_test;
use crate::common::{Fixture, SAMPLE_IMAGE};
use crate::MB;

// Test that an unknown operand fails on stdout with exit code 1
add_test!(unknown_argument, async {
    let fixture = Fixture::new();

    let output = fixture.run(&["invalid=command"]).await;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        output.stdout,
        "failed to parse args: unknown argument \"invalid=command\"\n"
    );
});

// Test that a lone operand prints the device hint
add_test!(missing_target_prints_hint, async {
    let fixture = Fixture::with_file("disk.img", SAMPLE_IMAGE);

    let output = fixture.run(&[&fixture.path("disk.img")]).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(output
        .stdout
        .starts_with("\nNo target selected, detected the following removable device:\n"));
    assert!(output
        .stdout
        .ends_with("failed to parse args: please select target device\n"));
});

// Test that a destination without a source is rejected
add_test!(missing_source, async {
    let fixture = Fixture::new();
    let output_arg = format!("of={}", fixture.path("copy.img"));

    let output = fixture.run(&[&output_arg]).await;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(output.stdout, "failed to parse args: please select source\n");
    assert!(!fixture.file_exists("copy.img"));
});

// Test malformed operand values
add_test!(bad_operand_values, async {
    let fixture = Fixture::new();

    let output = fixture.run(&["if=a", "of=b", "bs=12x"]).await;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(output.stdout, "failed to parse args: invalid size \"12x\"\n");

    let output = fixture.run(&["if=a", "of=b", "comp=zstd"]).await;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        output.stdout,
        "failed to parse args: unknown compression type \"zstd\"\n"
    );
    assert!(!fixture.file_exists("b"));
});

// Test a source that does not exist
add_test!(missing_source_file, async {
    let fixture = Fixture::new();

    let output = fixture
        .run(&[&fixture.path("absent.img"), &fixture.path("copy.img")])
        .await;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.starts_with("failed to dd: "), "{}", output.stdout);
    assert!(!fixture.file_exists("copy.img"));
});

// Test a `.gz` source that is not gzip data
add_test!(corrupt_compressed_source, async {
    let fixture = Fixture::with_file("disk.img.gz", SAMPLE_IMAGE);

    let output = fixture
        .run(&[&fixture.path("disk.img.gz"), &fixture.path("copy.img")])
        .await;
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.starts_with("failed to dd: "), "{}", output.stdout);
    assert!(!fixture.file_exists("copy.img"));
});

// Test an empty source
add_test!(empty_source, async {
    let fixture = Fixture::with_file("empty.img", b"");

    let output = fixture
        .run(&[&fixture.path("empty.img"), &fixture.path("copy.img")])
        .await;
    assert!(output.status.success(), "{}", output.stdout);
    assert!(fixture.file_exists("copy.img"));
    fixture.assert_file("copy.img", b"");
});

// Test that a sparse source keeps its size and data
add_test!(sparse_source, async {
    let fixture = Fixture::new();
    let source = fixture.root_dir_path().join("sparse.img");
    {
        use std::io::{Seek, SeekFrom, Write};

        let mut file = fs::File::create(&source).unwrap();
        file.write_all(SAMPLE_IMAGE).unwrap();
        file.seek(SeekFrom::Start(2 * MB as u64)).unwrap();
        file.write_all(SAMPLE_IMAGE).unwrap();
        file.set_len(4 * MB as u64).unwrap();
    }

    let output = fixture
        .run(&[&fixture.path("sparse.img"), &fixture.path("copy.img")])
        .await;
    assert!(output.status.success(), "{}", output.stdout);

    let expected = fs::read(&source).unwrap();
    fixture.assert_file("copy.img", &expected);
});
