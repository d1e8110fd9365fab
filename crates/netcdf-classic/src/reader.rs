//! Reader for the NetCDF classic binary format (CDF-1 and CDF-2).
//!
//! The classic header is a single linear structure: magic, record count,
//! dimension list, global attribute list, variable list. All integers are
//! big-endian and all names are padded to four-byte boundaries. Fixed-size
//! variables are stored contiguously at their `begin` offset; record
//! variables are interleaved record by record.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{AttrValue, Attribute, Dimension, NcType, Variable};

const MAGIC: &[u8; 3] = b"CDF";

const TAG_DIMENSION: u32 = 0x0A;
const TAG_VARIABLE: u32 = 0x0B;
const TAG_ATTRIBUTE: u32 = 0x0C;

/// numrecs sentinel written by streaming producers.
const STREAMING: u32 = 0xFFFF_FFFF;

/// An open classic-format dataset.
///
/// The underlying file handle is owned by the dataset and released when it
/// is dropped, so a failed render cannot leave the input locked.
pub struct Dataset {
    reader: BufReader<File>,
    num_records: usize,
    dimensions: Vec<Dimension>,
    attributes: Vec<Attribute>,
    variables: Vec<Variable>,
}

impl Dataset {
    /// Open a classic-format file and parse its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic[..3] != MAGIC {
            return Err(Error::BadMagic);
        }
        let version = magic[3];
        if version != 1 && version != 2 {
            return Err(Error::UnsupportedVersion(version));
        }
        let wide_offsets = version == 2;

        let raw_numrecs = read_u32(&mut reader)?;

        let dimensions = read_dim_list(&mut reader)?;
        let attributes = read_att_list(&mut reader)?;
        let variables = read_var_list(&mut reader, wide_offsets, dimensions.len())?;

        let mut dataset = Dataset {
            reader,
            num_records: 0,
            dimensions,
            attributes,
            variables,
        };
        dataset.num_records = if raw_numrecs == STREAMING {
            dataset.infer_streaming_records()?
        } else {
            raw_numrecs as usize
        };

        debug!(
            path = %path.display(),
            dimensions = dataset.dimensions.len(),
            variables = dataset.variables.len(),
            records = dataset.num_records,
            "opened classic dataset"
        );
        Ok(dataset)
    }

    /// Number of records along the unlimited dimension.
    pub fn num_records(&self) -> usize {
        self.num_records
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Global attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Variable lookup that turns absence into a hard error.
    pub fn require_variable(&self, name: &str) -> Result<&Variable> {
        self.variable(name)
            .ok_or_else(|| Error::MissingVariable(name.to_string()))
    }

    /// Effective shape of a variable, outermost dimension first. The record
    /// dimension reports the file's record count.
    pub fn shape(&self, var: &Variable) -> Vec<usize> {
        var.dim_ids
            .iter()
            .map(|&id| {
                let dim = &self.dimensions[id];
                if dim.is_record {
                    self.num_records
                } else {
                    dim.length
                }
            })
            .collect()
    }

    fn is_record_var(&self, var: &Variable) -> bool {
        var.dim_ids
            .first()
            .is_some_and(|&id| self.dimensions[id].is_record)
    }

    /// Values in one record of a record variable (total values for a fixed
    /// variable).
    fn values_per_record(&self, var: &Variable) -> usize {
        var.dim_ids
            .iter()
            .filter(|&&id| !self.dimensions[id].is_record)
            .map(|&id| self.dimensions[id].length)
            .product()
    }

    /// Byte stride between consecutive records.
    ///
    /// This is the sum of the per-record slab sizes of all record variables,
    /// each padded to four bytes -- except in the classic special case of a
    /// single record variable, where records are packed without padding.
    fn record_stride(&self) -> usize {
        let record_vars: Vec<&Variable> = self
            .variables
            .iter()
            .filter(|v| self.is_record_var(v))
            .collect();
        if record_vars.len() == 1 {
            let v = record_vars[0];
            return self.values_per_record(v) * v.nc_type.size();
        }
        record_vars
            .iter()
            .map(|v| pad4(self.values_per_record(v) * v.nc_type.size()))
            .sum()
    }

    fn infer_streaming_records(&mut self) -> Result<usize> {
        let stride = self.record_stride();
        if stride == 0 {
            return Ok(0);
        }
        let first_begin = self
            .variables
            .iter()
            .filter(|v| {
                v.dim_ids
                    .first()
                    .is_some_and(|&id| self.dimensions[id].is_record)
            })
            .map(|v| v.begin)
            .min();
        let Some(begin) = first_begin else {
            return Ok(0);
        };
        let len = self.reader.seek(SeekFrom::End(0))?;
        Ok(((len.saturating_sub(begin)) / stride as u64) as usize)
    }

    /// Read a whole variable, widening every value to f64. No convention
    /// handling is applied; see [`crate::cf::mask_and_scale`].
    pub fn read_values(&mut self, name: &str) -> Result<Vec<f64>> {
        let var = self.require_variable(name)?.clone();
        let per_record = self.values_per_record(&var);
        let value_size = var.nc_type.size();

        if !self.is_record_var(&var) {
            let mut buf = vec![0u8; per_record * value_size];
            self.reader.seek(SeekFrom::Start(var.begin))?;
            self.reader.read_exact(&mut buf)?;
            return Ok(widen(&buf, var.nc_type));
        }

        let stride = self.record_stride() as u64;
        let mut out = Vec::with_capacity(per_record * self.num_records);
        let mut buf = vec![0u8; per_record * value_size];
        for record in 0..self.num_records {
            self.reader
                .seek(SeekFrom::Start(var.begin + record as u64 * stride))?;
            self.reader.read_exact(&mut buf)?;
            out.extend(widen(&buf, var.nc_type));
        }
        Ok(out)
    }

    /// Read a variable with CF fill-value masking and scale/offset applied,
    /// the equivalent of reading through an auto-masking dataset handle.
    pub fn read_masked(&mut self, name: &str) -> Result<Vec<f64>> {
        let var = self.require_variable(name)?.clone();
        let mut values = self.read_values(name)?;
        crate::cf::mask_and_scale(&mut values, &var);
        Ok(values)
    }
}

fn pad4(n: usize) -> usize {
    (n + 3) & !3
}

fn read_u32<R: Read>(r: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

fn read_u64<R: Read>(r: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_be_bytes(buf))
}

/// Name: u32 length, then bytes padded to a four-byte boundary.
fn read_name<R: Read>(r: &mut R) -> Result<String> {
    let len = read_u32(r)? as usize;
    let mut buf = vec![0u8; pad4(len)];
    r.read_exact(&mut buf)?;
    buf.truncate(len);
    String::from_utf8(buf).map_err(|_| Error::Corrupt("name is not valid UTF-8".to_string()))
}

/// Tagged list header. An absent list is encoded as two zero words.
fn read_list_header<R: Read>(r: &mut R, expected_tag: u32) -> Result<usize> {
    let tag = read_u32(r)?;
    let nelems = read_u32(r)? as usize;
    match tag {
        0 if nelems == 0 => Ok(0),
        t if t == expected_tag => Ok(nelems),
        t => Err(Error::Corrupt(format!(
            "expected list tag {expected_tag:#x}, found {t:#x}"
        ))),
    }
}

fn read_dim_list<R: Read>(r: &mut R) -> Result<Vec<Dimension>> {
    let count = read_list_header(r, TAG_DIMENSION)?;
    let mut dims = Vec::with_capacity(count);
    for _ in 0..count {
        let name = read_name(r)?;
        let length = read_u32(r)? as usize;
        dims.push(Dimension {
            name,
            is_record: length == 0,
            length,
        });
    }
    Ok(dims)
}

fn read_att_list<R: Read>(r: &mut R) -> Result<Vec<Attribute>> {
    let count = read_list_header(r, TAG_ATTRIBUTE)?;
    let mut attrs = Vec::with_capacity(count);
    for _ in 0..count {
        let name = read_name(r)?;
        let nc_type = NcType::from_code(read_u32(r)?)?;
        let nelems = read_u32(r)? as usize;
        let mut buf = vec![0u8; pad4(nelems * nc_type.size())];
        r.read_exact(&mut buf)?;
        buf.truncate(nelems * nc_type.size());
        attrs.push(Attribute {
            name,
            value: decode_attr(&buf, nc_type),
        });
    }
    Ok(attrs)
}

fn read_var_list<R: Read>(
    r: &mut R,
    wide_offsets: bool,
    num_dims: usize,
) -> Result<Vec<Variable>> {
    let count = read_list_header(r, TAG_VARIABLE)?;
    let mut vars = Vec::with_capacity(count);
    for _ in 0..count {
        let name = read_name(r)?;
        let ndims = read_u32(r)? as usize;
        let mut dim_ids = Vec::with_capacity(ndims);
        for _ in 0..ndims {
            let id = read_u32(r)? as usize;
            if id >= num_dims {
                return Err(Error::Corrupt(format!(
                    "variable '{name}' references dimension {id} of {num_dims}"
                )));
            }
            dim_ids.push(id);
        }
        let attributes = read_att_list(r)?;
        let nc_type = NcType::from_code(read_u32(r)?)?;
        let vsize = read_u32(r)? as usize;
        let begin = if wide_offsets {
            read_u64(r)?
        } else {
            read_u32(r)? as u64
        };
        vars.push(Variable {
            name,
            dim_ids,
            attributes,
            nc_type,
            vsize,
            begin,
        });
    }
    Ok(vars)
}

fn decode_attr(bytes: &[u8], nc_type: NcType) -> AttrValue {
    match nc_type {
        NcType::Byte => AttrValue::Bytes(bytes.iter().map(|&b| b as i8).collect()),
        NcType::Char => AttrValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        NcType::Short => AttrValue::Shorts(
            bytes
                .chunks_exact(2)
                .map(|c| i16::from_be_bytes([c[0], c[1]]))
                .collect(),
        ),
        NcType::Int => AttrValue::Ints(
            bytes
                .chunks_exact(4)
                .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        NcType::Float => AttrValue::Floats(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        NcType::Double => AttrValue::Doubles(
            bytes
                .chunks_exact(8)
                .map(|c| f64::from_be_bytes(c.try_into().unwrap()))
                .collect(),
        ),
    }
}

/// Widen big-endian external values to f64.
fn widen(bytes: &[u8], nc_type: NcType) -> Vec<f64> {
    match nc_type {
        NcType::Byte => bytes.iter().map(|&b| b as i8 as f64).collect(),
        NcType::Char => bytes.iter().map(|&b| b as f64).collect(),
        NcType::Short => bytes
            .chunks_exact(2)
            .map(|c| i16::from_be_bytes([c[0], c[1]]) as f64)
            .collect(),
        NcType::Int => bytes
            .chunks_exact(4)
            .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]) as f64)
            .collect(),
        NcType::Float => bytes
            .chunks_exact(4)
            .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]) as f64)
            .collect(),
        NcType::Double => bytes
            .chunks_exact(8)
            .map(|c| f64::from_be_bytes(c.try_into().unwrap()))
            .collect(),
    }
}
