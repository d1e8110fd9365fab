//! Minimal CDF-1 writer.
//!
//! Builds small classic-format files from in-memory definitions. This exists
//! to produce self-contained datasets (synthetic fixtures, reference inputs)
//! without a system NetCDF installation; it is not a general archival writer.
//! Only 32-bit offsets are emitted, which is ample for the file sizes it is
//! meant for.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{AttrValue, Attribute, NcType};

const TAG_DIMENSION: u32 = 0x0A;
const TAG_VARIABLE: u32 = 0x0B;
const TAG_ATTRIBUTE: u32 = 0x0C;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarId(usize);

struct DimDef {
    name: String,
    length: usize,
    unlimited: bool,
}

struct VarDef {
    name: String,
    nc_type: NcType,
    dim_ids: Vec<usize>,
    attributes: Vec<Attribute>,
    data: Option<Vec<f64>>,
}

/// Builder for a classic-format file.
#[derive(Default)]
pub struct FileBuilder {
    dims: Vec<DimDef>,
    global_attributes: Vec<Attribute>,
    vars: Vec<VarDef>,
}

impl FileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dimension(&mut self, name: &str, length: usize) -> DimId {
        self.dims.push(DimDef {
            name: name.to_string(),
            length,
            unlimited: false,
        });
        DimId(self.dims.len() - 1)
    }

    /// The classic format allows at most one unlimited dimension.
    pub fn add_unlimited_dimension(&mut self, name: &str) -> Result<DimId> {
        if self.dims.iter().any(|d| d.unlimited) {
            return Err(Error::InvalidDefinition(
                "only one unlimited dimension is allowed".to_string(),
            ));
        }
        self.dims.push(DimDef {
            name: name.to_string(),
            length: 0,
            unlimited: true,
        });
        Ok(DimId(self.dims.len() - 1))
    }

    pub fn add_global_attribute(&mut self, name: &str, value: AttrValue) {
        self.global_attributes.push(Attribute {
            name: name.to_string(),
            value,
        });
    }

    /// Define a variable. The unlimited dimension, if used, must come first.
    pub fn add_variable(&mut self, name: &str, nc_type: NcType, dims: &[DimId]) -> Result<VarId> {
        for (position, DimId(id)) in dims.iter().enumerate() {
            if self.dims[*id].unlimited && position != 0 {
                return Err(Error::InvalidDefinition(format!(
                    "variable '{name}': unlimited dimension must be outermost"
                )));
            }
        }
        self.vars.push(VarDef {
            name: name.to_string(),
            nc_type,
            dim_ids: dims.iter().map(|d| d.0).collect(),
            attributes: Vec::new(),
            data: None,
        });
        Ok(VarId(self.vars.len() - 1))
    }

    pub fn add_attribute(&mut self, var: VarId, name: &str, value: AttrValue) {
        self.vars[var.0].attributes.push(Attribute {
            name: name.to_string(),
            value,
        });
    }

    pub fn add_text_attribute(&mut self, var: VarId, name: &str, text: &str) {
        self.add_attribute(var, name, AttrValue::Text(text.to_string()));
    }

    /// Provide the variable's values; they are narrowed to the variable's
    /// external type when the file is serialized.
    pub fn put_values(&mut self, var: VarId, values: &[f64]) {
        self.vars[var.0].data = Some(values.to_vec());
    }

    fn is_record_var(&self, var: &VarDef) -> bool {
        var.dim_ids
            .first()
            .is_some_and(|&id| self.dims[id].unlimited)
    }

    fn values_per_record(&self, var: &VarDef) -> usize {
        var.dim_ids
            .iter()
            .filter(|&&id| !self.dims[id].unlimited)
            .map(|&id| self.dims[id].length)
            .product()
    }

    /// Serialize to classic-format bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let num_records = self.validate_and_count_records()?;
        let record_vars: Vec<usize> = (0..self.vars.len())
            .filter(|&i| self.is_record_var(&self.vars[i]))
            .collect();
        let pack_records = record_vars.len() == 1;

        // Per-variable on-disk sizes: fixed variables store their full
        // (padded) slab, record variables one record's worth.
        let slab_size = |i: usize| -> usize {
            let v = &self.vars[i];
            let raw = self.values_per_record(v) * v.nc_type.size();
            if pack_records && self.is_record_var(v) {
                raw
            } else {
                pad4(raw)
            }
        };

        // First pass with zeroed begins fixes the header length, since the
        // begin field width does not depend on its value.
        let begins = vec![0u32; self.vars.len()];
        let header_len = self.serialize(num_records, &begins, &[]).len();

        let mut begins = vec![0u32; self.vars.len()];
        let mut offset = header_len;
        for (i, var) in self.vars.iter().enumerate() {
            if !self.is_record_var(var) {
                begins[i] = offset as u32;
                offset += slab_size(i);
            }
        }
        let mut record_offset = offset;
        for &i in &record_vars {
            begins[i] = record_offset as u32;
            record_offset += slab_size(i);
        }

        let mut data = Vec::new();
        for (i, var) in self.vars.iter().enumerate() {
            if !self.is_record_var(var) {
                let values = var.data.as_deref().unwrap_or(&[]);
                let mut bytes = narrow(values, var.nc_type);
                bytes.resize(slab_size(i), 0);
                data.extend_from_slice(&bytes);
            }
        }
        for record in 0..num_records {
            for &i in &record_vars {
                let var = &self.vars[i];
                let per_record = self.values_per_record(var);
                let values = var.data.as_deref().unwrap_or(&[]);
                let slab = &values[record * per_record..(record + 1) * per_record];
                let mut bytes = narrow(slab, var.nc_type);
                bytes.resize(slab_size(i), 0);
                data.extend_from_slice(&bytes);
            }
        }

        let mut out = self.serialize(num_records, &begins, &record_vars);
        debug_assert_eq!(out.len(), header_len);
        out.extend_from_slice(&data);
        Ok(out)
    }

    /// Serialize to a file, overwriting any existing one.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn validate_and_count_records(&self) -> Result<usize> {
        let mut num_records: Option<usize> = None;
        for var in &self.vars {
            let data = var.data.as_ref().ok_or_else(|| {
                Error::InvalidDefinition(format!("variable '{}' has no data", var.name))
            })?;
            let per_record = self.values_per_record(var);
            if self.is_record_var(var) {
                if per_record == 0 || data.len() % per_record != 0 {
                    return Err(Error::InvalidDefinition(format!(
                        "variable '{}': {} values do not fill whole records",
                        var.name,
                        data.len()
                    )));
                }
                let records = data.len() / per_record;
                match num_records {
                    None => num_records = Some(records),
                    Some(n) if n != records => {
                        return Err(Error::InvalidDefinition(format!(
                            "variable '{}' implies {} records, expected {}",
                            var.name, records, n
                        )));
                    }
                    Some(_) => {}
                }
            } else if data.len() != per_record {
                return Err(Error::InvalidDefinition(format!(
                    "variable '{}': expected {} values, got {}",
                    var.name,
                    per_record,
                    data.len()
                )));
            }
        }
        Ok(num_records.unwrap_or(0))
    }

    fn serialize(&self, num_records: usize, begins: &[u32], record_vars: &[usize]) -> Vec<u8> {
        let pack_records = record_vars.len() == 1;
        let mut buf = Vec::new();
        buf.extend_from_slice(b"CDF\x01");
        push_u32(&mut buf, num_records as u32);

        // dim_list
        push_list_header(&mut buf, TAG_DIMENSION, self.dims.len());
        for dim in &self.dims {
            push_name(&mut buf, &dim.name);
            push_u32(&mut buf, if dim.unlimited { 0 } else { dim.length as u32 });
        }

        push_att_list(&mut buf, &self.global_attributes);

        // var_list
        push_list_header(&mut buf, TAG_VARIABLE, self.vars.len());
        for (i, var) in self.vars.iter().enumerate() {
            push_name(&mut buf, &var.name);
            push_u32(&mut buf, var.dim_ids.len() as u32);
            for &id in &var.dim_ids {
                push_u32(&mut buf, id as u32);
            }
            push_att_list(&mut buf, &var.attributes);
            push_u32(&mut buf, var.nc_type.code());
            let raw = self.values_per_record(var) * var.nc_type.size();
            let vsize = if pack_records && self.is_record_var(var) {
                raw
            } else {
                pad4(raw)
            };
            push_u32(&mut buf, vsize as u32);
            push_u32(&mut buf, begins[i]);
        }
        buf
    }
}

fn pad4(n: usize) -> usize {
    (n + 3) & !3
}

fn push_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

fn push_name(buf: &mut Vec<u8>, name: &str) {
    push_u32(buf, name.len() as u32);
    buf.extend_from_slice(name.as_bytes());
    buf.resize(buf.len() + (pad4(name.len()) - name.len()), 0);
}

fn push_list_header(buf: &mut Vec<u8>, tag: u32, count: usize) {
    if count == 0 {
        push_u32(buf, 0);
        push_u32(buf, 0);
    } else {
        push_u32(buf, tag);
        push_u32(buf, count as u32);
    }
}

fn push_att_list(buf: &mut Vec<u8>, attrs: &[Attribute]) {
    push_list_header(buf, TAG_ATTRIBUTE, attrs.len());
    for attr in attrs {
        push_name(buf, &attr.name);
        let (nc_type, bytes) = encode_attr(&attr.value);
        push_u32(buf, nc_type.code());
        push_u32(buf, (bytes.len() / nc_type.size()) as u32);
        let padded = pad4(bytes.len());
        buf.extend_from_slice(&bytes);
        buf.resize(buf.len() + (padded - bytes.len()), 0);
    }
}

fn encode_attr(value: &AttrValue) -> (NcType, Vec<u8>) {
    match value {
        AttrValue::Bytes(v) => (NcType::Byte, v.iter().map(|&b| b as u8).collect()),
        AttrValue::Text(s) => (NcType::Char, s.as_bytes().to_vec()),
        AttrValue::Shorts(v) => (
            NcType::Short,
            v.iter().flat_map(|x| x.to_be_bytes()).collect(),
        ),
        AttrValue::Ints(v) => (NcType::Int, v.iter().flat_map(|x| x.to_be_bytes()).collect()),
        AttrValue::Floats(v) => (
            NcType::Float,
            v.iter().flat_map(|x| x.to_be_bytes()).collect(),
        ),
        AttrValue::Doubles(v) => (
            NcType::Double,
            v.iter().flat_map(|x| x.to_be_bytes()).collect(),
        ),
    }
}

/// Narrow f64 values to the variable's external type, big-endian.
fn narrow(values: &[f64], nc_type: NcType) -> Vec<u8> {
    match nc_type {
        NcType::Byte => values.iter().map(|&v| v as i8 as u8).collect(),
        NcType::Char => values.iter().map(|&v| v as u8).collect(),
        NcType::Short => values
            .iter()
            .flat_map(|&v| (v as i16).to_be_bytes())
            .collect(),
        NcType::Int => values
            .iter()
            .flat_map(|&v| (v as i32).to_be_bytes())
            .collect(),
        NcType::Float => values
            .iter()
            .flat_map(|&v| (v as f32).to_be_bytes())
            .collect(),
        NcType::Double => values.iter().flat_map(|&v| v.to_be_bytes()).collect(),
    }
}
