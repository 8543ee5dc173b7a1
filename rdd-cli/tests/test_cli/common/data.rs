/// Text payload shared across integration tests.
pub const SAMPLE_IMAGE: &[u8] = b"boot sector\0partition table\0filesystem blocks\n";

/// Deterministic pseudo-random image contents.
pub fn generate_image(size: usize) -> Vec<u8> {
    let mut seed = 0x5eed_u64;
    let mut data = Vec::with_capacity(size);
    for _ in 0..size {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        data.push((seed >> 33) as u8);
    }
    data
}

/// gzip-compresses `data`.
pub fn gzip_bytes(data: &[u8]) -> Vec<u8> {
    use std::io::Write;

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// bzip2-compresses `data`.
pub fn bzip2_bytes(data: &[u8]) -> Vec<u8> {
    use std::io::Write;

    let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// xz-compresses `data`.
pub fn xz_bytes(data: &[u8]) -> Vec<u8> {
    use std::io::Write;

    let mut encoder = liblzma::write::XzEncoder::new(Vec::new(), 6);
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
