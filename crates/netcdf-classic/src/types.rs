//! External types, dimensions, variables and attribute values of the
//! classic file format.

use crate::error::{Error, Result};

/// External data type of a classic-format variable or attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NcType {
    Byte,
    Char,
    Short,
    Int,
    Float,
    Double,
}

impl NcType {
    /// Decode the on-disk type code.
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            1 => Ok(NcType::Byte),
            2 => Ok(NcType::Char),
            3 => Ok(NcType::Short),
            4 => Ok(NcType::Int),
            5 => Ok(NcType::Float),
            6 => Ok(NcType::Double),
            other => Err(Error::UnknownType(other)),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            NcType::Byte => 1,
            NcType::Char => 2,
            NcType::Short => 3,
            NcType::Int => 4,
            NcType::Float => 5,
            NcType::Double => 6,
        }
    }

    /// Size in bytes of one external value.
    pub fn size(&self) -> usize {
        match self {
            NcType::Byte | NcType::Char => 1,
            NcType::Short => 2,
            NcType::Int => 4,
            NcType::Float => 4,
            NcType::Double => 8,
        }
    }

    /// Default fill value used when a variable carries no explicit
    /// `_FillValue` or `missing_value` attribute (netcdf.h NC_FILL_*).
    pub fn default_fill(&self) -> f64 {
        match self {
            NcType::Byte => -127.0,
            NcType::Char => 0.0,
            NcType::Short => -32767.0,
            NcType::Int => -2147483647.0,
            NcType::Float => 9.969_209_968_386_869e36,
            NcType::Double => 9.969_209_968_386_869e36,
        }
    }
}

/// A named dimension. The record dimension has `length == 0` on disk; its
/// effective length is the file's record count.
#[derive(Debug, Clone)]
pub struct Dimension {
    pub name: String,
    pub length: usize,
    pub is_record: bool,
}

/// Typed attribute payload.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Bytes(Vec<i8>),
    Text(String),
    Shorts(Vec<i16>),
    Ints(Vec<i32>),
    Floats(Vec<f32>),
    Doubles(Vec<f64>),
}

impl AttrValue {
    /// Text content, if this is a character attribute.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// First element widened to f64, if numeric and non-empty.
    pub fn first_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Bytes(v) => v.first().map(|&x| x as f64),
            AttrValue::Text(_) => None,
            AttrValue::Shorts(v) => v.first().map(|&x| x as f64),
            AttrValue::Ints(v) => v.first().map(|&x| x as f64),
            AttrValue::Floats(v) => v.first().map(|&x| x as f64),
            AttrValue::Doubles(v) => v.first().copied(),
        }
    }
}

/// A named attribute attached to a variable or to the dataset itself.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

/// Variable metadata from the file header.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    /// Indices into the dataset's dimension list, outermost first.
    pub dim_ids: Vec<usize>,
    pub attributes: Vec<Attribute>,
    pub nc_type: NcType,
    /// Declared per-record (or total, for fixed variables) byte size.
    pub vsize: usize,
    /// Offset of the variable's data from the start of the file.
    pub begin: u64,
}

impl Variable {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Numeric attribute widened to f64.
    pub fn attr_f64(&self, name: &str) -> Option<f64> {
        self.attribute(name).and_then(|a| a.value.first_f64())
    }

    /// Text attribute content.
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(|a| a.value.as_str())
    }
}
