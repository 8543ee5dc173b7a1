use crate::add_test;
use crate::common::{bzip2_bytes, generate_image, gzip_bytes, xz_bytes, Fixture, SAMPLE_IMAGE};
use crate::MB;

// Test the `SOURCE DEST` shorthand
add_test!(copy_two_operands, async {
    let fixture = Fixture::with_file("disk.img", SAMPLE_IMAGE);

    let output = fixture
        .run(&[&fixture.path("disk.img"), &fixture.path("copy.img")])
        .await;
    assert!(output.status.success(), "{}", output.stdout);
    assert!(output.stdout.is_empty());

    fixture.assert_file("copy.img", SAMPLE_IMAGE);
});

// Test dd-style operands with a block size smaller than the image
add_test!(copy_key_value_operands, async {
    let data = generate_image(3 * MB + 17);
    let fixture = Fixture::with_file("disk.img", &data);

    let input = format!("if={}", fixture.path("disk.img"));
    let output_arg = format!("of={}", fixture.path("copy.img"));
    let output = fixture.run(&[&input, &output_arg, "bs=64K"]).await;
    assert!(output.status.success(), "{}", output.stdout);

    fixture.assert_file("copy.img", &data);
});

// Test that running the same copy twice gives the same result
add_test!(copy_is_repeatable, async {
    let data = generate_image(MB);
    let fixture = Fixture::with_file("disk.img", &data);
    let args = [fixture.path("disk.img"), fixture.path("copy.img")];
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    for _ in 0..2 {
        let output = fixture.run(&args).await;
        assert!(output.status.success());
        fixture.assert_file("copy.img", &data);
    }
});

// Test on-the-fly decompression picked from the file extension
add_test!(decompress_by_extension, async {
    let data = generate_image(MB / 2);
    let fixture = Fixture::new();
    fixture.write("disk.img.gz", &gzip_bytes(&data));
    fixture.write("disk.img.bz2", &bzip2_bytes(&data));
    fixture.write("disk.img.xz", &xz_bytes(&data));

    for ext in ["gz", "bz2", "xz"] {
        let source = fixture.path(&format!("disk.img.{ext}"));
        let target = format!("out.{ext}.img");
        let output = fixture.run(&[&source, &fixture.path(&target)]).await;
        assert!(output.status.success(), "{ext}: {}", output.stdout);
        fixture.assert_file(&target, &data);
    }
});

// Test explicit compression selection overriding the extension
add_test!(explicit_compression_modes, async {
    let fixture = Fixture::new();
    let compressed = gzip_bytes(SAMPLE_IMAGE);
    fixture.write("image.raw", &compressed);

    let input = format!("if={}", fixture.path("image.raw"));
    let output_arg = format!("of={}", fixture.path("decoded.img"));
    let output = fixture.run(&[&input, &output_arg, "comp=gzip"]).await;
    assert!(output.status.success(), "{}", output.stdout);
    fixture.assert_file("decoded.img", SAMPLE_IMAGE);

    fixture.write("image.gz", &compressed);
    let input = format!("if={}", fixture.path("image.gz"));
    let output_arg = format!("of={}", fixture.path("verbatim.gz"));
    let output = fixture.run(&[&input, &output_arg, "comp=none"]).await;
    assert!(output.status.success(), "{}", output.stdout);
    fixture.assert_file("verbatim.gz", &compressed);
});

// Test reading the image from standard input
add_test!(copy_from_stdin, async {
    let fixture = Fixture::new();
    let output_arg = format!("of={}", fixture.path("copy.img"));

    let output = fixture
        .run_with_stdin(&["if=-", &output_arg], Some(SAMPLE_IMAGE))
        .await;
    assert!(output.status.success(), "{}", output.stdout);
    fixture.assert_file("copy.img", SAMPLE_IMAGE);
});

// Test compressed input on standard input with an explicit mode
add_test!(decompress_from_stdin, async {
    let data = generate_image(100_000);
    let fixture = Fixture::new();
    let output_arg = format!("of={}", fixture.path("copy.img"));

    let output = fixture
        .run_with_stdin(&["if=-", &output_arg, "comp=xz"], Some(xz_bytes(&data).as_slice()))
        .await;
    assert!(output.status.success(), "{}", output.stdout);
    fixture.assert_file("copy.img", &data);
});

// Test writing the image to standard output
add_test!(copy_to_stdout, async {
    let fixture = Fixture::with_file("disk.img.gz", &gzip_bytes(SAMPLE_IMAGE));

    let output = fixture.run(&[&fixture.path("disk.img.gz"), "-"]).await;
    assert!(output.status.success());
    assert!(output.stdout_raw == SAMPLE_IMAGE);
});

// Test that logging goes to stderr and leaves stdout to the data
add_test!(verbose_logs_to_stderr, async {
    let fixture = Fixture::with_file("disk.img", SAMPLE_IMAGE);

    let output = fixture
        .run(&["-vv", &fixture.path("disk.img"), "-"])
        .await;
    assert!(output.status.success());
    assert!(output.stdout_raw == SAMPLE_IMAGE);
    assert!(output.stderr.contains("transfer complete"), "{}", output.stderr);
});
