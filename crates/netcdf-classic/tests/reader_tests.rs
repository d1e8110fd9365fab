//! Round-trip and format-edge tests for the classic reader.

use netcdf_classic::{AttrValue, Dataset, Error, FileBuilder, NcType};

fn temp_path(name: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    (dir, path)
}

#[test]
fn reads_header_and_fixed_variable() {
    let (_dir, path) = temp_path("fixed.nc");

    let mut builder = FileBuilder::new();
    let level = builder.add_dimension("level", 3);
    builder.add_global_attribute("title", AttrValue::Text("test dataset".to_string()));
    let var = builder
        .add_variable("altitude", NcType::Float, &[level])
        .unwrap();
    builder.add_text_attribute(var, "units", "m");
    builder.put_values(var, &[0.0, 500.0, 1000.0]);
    builder.write_to(&path).unwrap();

    let mut ds = Dataset::open(&path).unwrap();
    assert_eq!(ds.num_records(), 0);
    assert_eq!(ds.dimension("level").unwrap().length, 3);
    assert_eq!(
        ds.attribute("title").unwrap().value.as_str(),
        Some("test dataset")
    );
    let var = ds.variable("altitude").unwrap();
    assert_eq!(var.attr_str("units"), Some("m"));
    assert_eq!(ds.read_values("altitude").unwrap(), vec![0.0, 500.0, 1000.0]);
}

#[test]
fn record_variables_are_deinterleaved() {
    let (_dir, path) = temp_path("records.nc");

    let mut builder = FileBuilder::new();
    let time = builder.add_unlimited_dimension("time").unwrap();
    let level = builder.add_dimension("level", 2);
    let t = builder.add_variable("time", NcType::Double, &[time]).unwrap();
    let v = builder
        .add_variable("signal", NcType::Short, &[time, level])
        .unwrap();
    builder.put_values(t, &[0.0, 60.0, 120.0]);
    builder.put_values(v, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    builder.write_to(&path).unwrap();

    let mut ds = Dataset::open(&path).unwrap();
    assert_eq!(ds.num_records(), 3);
    let signal = ds.variable("signal").unwrap().clone();
    assert_eq!(ds.shape(&signal), vec![3, 2]);
    assert_eq!(ds.read_values("time").unwrap(), vec![0.0, 60.0, 120.0]);
    assert_eq!(
        ds.read_values("signal").unwrap(),
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
    );
}

#[test]
fn single_record_variable_is_packed() {
    let (_dir, path) = temp_path("packed.nc");

    // One short record variable with an odd per-record byte count exercises
    // the no-padding special case.
    let mut builder = FileBuilder::new();
    let time = builder.add_unlimited_dimension("time").unwrap();
    let v = builder.add_variable("flag", NcType::Short, &[time]).unwrap();
    builder.put_values(v, &[7.0, 8.0, 9.0]);
    builder.write_to(&path).unwrap();

    let mut ds = Dataset::open(&path).unwrap();
    assert_eq!(ds.num_records(), 3);
    assert_eq!(ds.read_values("flag").unwrap(), vec![7.0, 8.0, 9.0]);
}

#[test]
fn read_masked_applies_fill_and_scale() {
    let (_dir, path) = temp_path("masked.nc");

    let mut builder = FileBuilder::new();
    let level = builder.add_dimension("level", 4);
    let v = builder
        .add_variable("beta", NcType::Float, &[level])
        .unwrap();
    builder.add_attribute(v, "_FillValue", AttrValue::Floats(vec![-999.0]));
    builder.add_attribute(v, "scale_factor", AttrValue::Doubles(vec![2.0]));
    builder.put_values(v, &[1.0, -999.0, 3.0, 4.0]);
    builder.write_to(&path).unwrap();

    let mut ds = Dataset::open(&path).unwrap();
    let values = ds.read_masked("beta").unwrap();
    assert_eq!(values[0], 2.0);
    assert!(values[1].is_nan());
    assert_eq!(values[2], 6.0);
    assert_eq!(values[3], 8.0);
}

#[test]
fn reads_cdf2_wide_offsets() {
    let (_dir, path) = temp_path("wide.nc");

    // Hand-assembled CDF-2 file: one 2-element int variable, no attributes.
    let mut bytes: Vec<u8> = Vec::new();
    bytes.extend_from_slice(b"CDF\x02");
    bytes.extend_from_slice(&0u32.to_be_bytes()); // numrecs
    bytes.extend_from_slice(&0x0Au32.to_be_bytes()); // dim list
    bytes.extend_from_slice(&1u32.to_be_bytes());
    bytes.extend_from_slice(&1u32.to_be_bytes()); // name "x"
    bytes.extend_from_slice(b"x\0\0\0");
    bytes.extend_from_slice(&2u32.to_be_bytes()); // length 2
    bytes.extend_from_slice(&[0u8; 8]); // absent gatt list
    bytes.extend_from_slice(&0x0Bu32.to_be_bytes()); // var list
    bytes.extend_from_slice(&1u32.to_be_bytes());
    bytes.extend_from_slice(&1u32.to_be_bytes()); // name "v"
    bytes.extend_from_slice(b"v\0\0\0");
    bytes.extend_from_slice(&1u32.to_be_bytes()); // ndims
    bytes.extend_from_slice(&0u32.to_be_bytes()); // dimid 0
    bytes.extend_from_slice(&[0u8; 8]); // absent vatt list
    bytes.extend_from_slice(&4u32.to_be_bytes()); // NC_INT
    bytes.extend_from_slice(&8u32.to_be_bytes()); // vsize
    let begin = (bytes.len() + 8) as u64;
    bytes.extend_from_slice(&begin.to_be_bytes()); // 64-bit begin
    bytes.extend_from_slice(&41i32.to_be_bytes());
    bytes.extend_from_slice(&42i32.to_be_bytes());
    std::fs::write(&path, bytes).unwrap();

    let mut ds = Dataset::open(&path).unwrap();
    assert_eq!(ds.read_values("v").unwrap(), vec![41.0, 42.0]);
}

#[test]
fn rejects_non_classic_input() {
    let (_dir, path) = temp_path("bogus.nc");
    std::fs::write(&path, b"HDF\x01 definitely not classic").unwrap();
    let err = Dataset::open(&path).map(|_| ()).unwrap_err();
    assert!(matches!(err, Error::BadMagic), "got {err:?}");
}

#[test]
fn missing_variable_is_an_error() {
    let (_dir, path) = temp_path("sparse.nc");

    let mut builder = FileBuilder::new();
    let level = builder.add_dimension("level", 1);
    let v = builder.add_variable("only", NcType::Int, &[level]).unwrap();
    builder.put_values(v, &[1.0]);
    builder.write_to(&path).unwrap();

    let mut ds = Dataset::open(&path).unwrap();
    assert!(matches!(
        ds.read_values("absent"),
        Err(Error::MissingVariable(name)) if name == "absent"
    ));
}
