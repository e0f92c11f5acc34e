//! Reader for the legacy VTK format (`# vtk DataFile Version x.y`).
//!
//! Supported: `ASCII` and big-endian `BINARY` encodings, the
//! `UNSTRUCTURED_GRID` dataset with both the classic count-prefixed `CELLS`
//! list and the 5.1 `OFFSETS`/`CONNECTIVITY` layout, and `CELL_DATA` arrays
//! given as `SCALARS` or `FIELD` entries. Point data and the other attribute
//! kinds are read past and dropped.

use std::collections::BTreeMap;

use glam::DVec3;
use gwmesh_core::{GwMeshError, Result};

use crate::grid::{Cell, CellKind, UnstructuredGrid};

/// Upper bound on up-front allocations driven by counts read from the file.
const MAX_PREALLOC: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Ascii,
    Binary,
}

/// Numeric element type of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl DataType {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "unsigned_char" => Self::U8,
            "char" => Self::I8,
            "unsigned_short" => Self::U16,
            "short" => Self::I16,
            "unsigned_int" => Self::U32,
            "int" | "vtkidtype" => Self::I32,
            "unsigned_long" | "vtktypeuint64" => Self::U64,
            "long" | "vtktypeint64" => Self::I64,
            "float" => Self::F32,
            "double" => Self::F64,
            _ => return None,
        })
    }

    fn size(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }
}

/// Which attribute section subsequent arrays belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Cells(usize),
    Points(usize),
}

impl Section {
    fn len(self) -> usize {
        match self {
            Self::Cells(n) | Self::Points(n) => n,
        }
    }
}

/// A keyword line, split into words.
struct Header<'a> {
    origin: &'a str,
    line: usize,
    words: Vec<&'a str>,
}

impl<'a> Header<'a> {
    fn keyword(&self) -> String {
        self.words
            .first()
            .map(|w| w.to_ascii_uppercase())
            .unwrap_or_default()
    }

    fn error(&self, message: impl Into<String>) -> GwMeshError {
        GwMeshError::parse(self.origin, self.line, message)
    }

    fn word(&self, index: usize, what: &str) -> Result<&'a str> {
        self.words
            .get(index)
            .copied()
            .ok_or_else(|| self.error(format!("{} is missing its {what}", self.keyword())))
    }

    fn count(&self, index: usize, what: &str) -> Result<usize> {
        let word = self.word(index, what)?;
        word.parse()
            .map_err(|_| self.error(format!("expected {what}, found '{word}'")))
    }

    fn data_type(&self, index: usize) -> Result<DataType> {
        let word = self.word(index, "data type")?;
        DataType::from_name(word)
            .ok_or_else(|| self.error(format!("unsupported data type '{word}'")))
    }
}

/// Byte cursor over a snapshot, tracking the current line for errors.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
    origin: &'a str,
    encoding: Encoding,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8], origin: &'a str) -> Self {
        Self {
            data,
            pos: 0,
            line: 1,
            origin,
            encoding: Encoding::Ascii,
        }
    }

    fn error(&self, message: impl Into<String>) -> GwMeshError {
        GwMeshError::parse(self.origin, self.line, message)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&b) = self.data.get(self.pos) {
            if !b.is_ascii_whitespace() {
                break;
            }
            if b == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    /// Reads the rest of the current line, without its terminator.
    fn raw_line(&mut self) -> Result<Option<&'a str>> {
        let data = self.data;
        if self.pos >= data.len() {
            return Ok(None);
        }
        let rest = &data[self.pos..];
        let end = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
        let text = std::str::from_utf8(&rest[..end])
            .map_err(|_| self.error("expected a text line"))?;
        if end < rest.len() {
            self.pos += end + 1;
            self.line += 1;
        } else {
            self.pos += end;
        }
        Ok(Some(text.trim_end_matches('\r')))
    }

    /// Reads the next non-blank line as a keyword header.
    fn header(&mut self) -> Result<Option<Header<'a>>> {
        self.skip_whitespace();
        let line = self.line;
        Ok(self.raw_line()?.map(|text| Header {
            origin: self.origin,
            line,
            words: text.split_whitespace().collect(),
        }))
    }

    fn expect_any_header(&mut self) -> Result<Header<'a>> {
        self.header()?
            .ok_or_else(|| self.error("unexpected end of file"))
    }

    fn expect_header(&mut self, keyword: &str) -> Result<Header<'a>> {
        match self.header()? {
            Some(header) if header.keyword() == keyword => Ok(header),
            Some(header) => Err(header.error(format!(
                "expected {keyword}, found '{}'",
                header.words.join(" ")
            ))),
            None => Err(self.error(format!("expected {keyword}, found end of file"))),
        }
    }

    /// Returns true if the next non-blank text starts with `keyword`,
    /// without consuming anything.
    fn peek_keyword(&mut self, keyword: &str) -> bool {
        let (pos, line) = (self.pos, self.line);
        self.skip_whitespace();
        let found = self
            .data
            .get(self.pos..self.pos + keyword.len())
            .is_some_and(|bytes| bytes.eq_ignore_ascii_case(keyword.as_bytes()));
        self.pos = pos;
        self.line = line;
        found
    }

    /// Skips a `METADATA` block, which ends at the first blank line.
    fn skip_metadata(&mut self) -> Result<()> {
        while let Some(text) = self.raw_line()? {
            if text.trim().is_empty() {
                break;
            }
        }
        Ok(())
    }

    fn token(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        let data = self.data;
        let start = self.pos;
        while data.get(self.pos).is_some_and(|b| !b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("unexpected end of file"));
        }
        std::str::from_utf8(&data[start..self.pos]).map_err(|_| self.error("expected a number"))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let data = self.data;
        let bytes = data
            .get(self.pos..)
            .and_then(|rest| rest.get(..len))
            .ok_or_else(|| self.error(format!("binary data ends early (wanted {len} bytes)")))?;
        self.pos += len;
        Ok(bytes)
    }

    fn binary_block(&mut self, count: usize, dtype: DataType) -> Result<&'a [u8]> {
        let len = count
            .checked_mul(dtype.size())
            .ok_or_else(|| self.error("array size overflows"))?;
        self.take(len)
    }

    fn read_floats(&mut self, count: usize, dtype: DataType) -> Result<Vec<f64>> {
        match self.encoding {
            Encoding::Ascii => {
                let mut values = Vec::with_capacity(count.min(MAX_PREALLOC));
                for _ in 0..count {
                    let token = self.token()?;
                    let value = parse_float(token)
                        .ok_or_else(|| self.error(format!("expected a number, found '{token}'")))?;
                    values.push(value);
                }
                Ok(values)
            }
            Encoding::Binary => Ok(decode_floats(self.binary_block(count, dtype)?, dtype)),
        }
    }

    /// Skips a string array: one line per value in ASCII files, length-prefixed
    /// values in binary ones.
    fn skip_strings(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            match self.encoding {
                Encoding::Ascii => {
                    self.raw_line()?
                        .ok_or_else(|| self.error("string array ends early"))?;
                }
                Encoding::Binary => {
                    let len = self.string_length()?;
                    self.take(len)?;
                }
            }
        }
        Ok(())
    }

    /// Decodes a binary string length: the top two bits of the first byte
    /// select a 1, 2, 4 or 8 byte big-endian length.
    fn string_length(&mut self) -> Result<usize> {
        let first = self.take(1)?[0];
        let width = match first >> 6 {
            3 => 1,
            2 => 2,
            1 => 4,
            _ => 8,
        };
        let mut len = u64::from(first & 0x3f);
        for &b in self.take(width - 1)? {
            len = (len << 8) | u64::from(b);
        }
        usize::try_from(len).map_err(|_| self.error("string length overflows"))
    }

    fn read_ints(&mut self, count: usize, dtype: DataType) -> Result<Vec<i64>> {
        if dtype.is_float() {
            return Err(self.error("expected an integer data type"));
        }
        match self.encoding {
            Encoding::Ascii => {
                let mut values = Vec::with_capacity(count.min(MAX_PREALLOC));
                for _ in 0..count {
                    let token = self.token()?;
                    let value = token
                        .parse()
                        .map_err(|_| self.error(format!("expected an integer, found '{token}'")))?;
                    values.push(value);
                }
                Ok(values)
            }
            Encoding::Binary => Ok(decode_ints(self.binary_block(count, dtype)?, dtype)),
        }
    }
}

fn be<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

fn decode_floats(bytes: &[u8], dtype: DataType) -> Vec<f64> {
    let chunks = bytes.chunks_exact(dtype.size());
    match dtype {
        DataType::F32 => chunks.map(|c| f64::from(f32::from_be_bytes(be(c)))).collect(),
        DataType::F64 => chunks.map(|c| f64::from_be_bytes(be(c))).collect(),
        _ => decode_ints(bytes, dtype)
            .into_iter()
            .map(|v| v as f64)
            .collect(),
    }
}

fn decode_ints(bytes: &[u8], dtype: DataType) -> Vec<i64> {
    let chunks = bytes.chunks_exact(dtype.size());
    match dtype {
        DataType::U8 => chunks.map(|c| i64::from(c[0])).collect(),
        DataType::I8 => chunks.map(|c| i64::from(i8::from_be_bytes(be(c)))).collect(),
        DataType::U16 => chunks.map(|c| i64::from(u16::from_be_bytes(be(c)))).collect(),
        DataType::I16 => chunks.map(|c| i64::from(i16::from_be_bytes(be(c)))).collect(),
        DataType::U32 => chunks.map(|c| i64::from(u32::from_be_bytes(be(c)))).collect(),
        DataType::I32 => chunks.map(|c| i64::from(i32::from_be_bytes(be(c)))).collect(),
        DataType::U64 => chunks
            .map(|c| i64::try_from(u64::from_be_bytes(be(c))).unwrap_or(i64::MAX))
            .collect(),
        DataType::I64 => chunks.map(|c| i64::from_be_bytes(be(c))).collect(),
        DataType::F32 | DataType::F64 => Vec::new(),
    }
}

/// Parses an ASCII float, including the NaN and infinity spellings C
/// runtimes emit.
fn parse_float(token: &str) -> Option<f64> {
    token.parse().ok().or_else(|| {
        let lower = token.to_ascii_lowercase();
        let negative = lower.starts_with('-');
        let unsigned = lower.trim_start_matches(['+', '-']);
        if unsigned.starts_with("nan") || unsigned.contains("#qnan") || unsigned.contains("#ind") {
            Some(f64::NAN)
        } else if unsigned.starts_with("inf") || unsigned.contains("#inf") {
            Some(if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            })
        } else {
            None
        }
    })
}

fn to_indices(cell: usize, ids: &[i64]) -> Result<Vec<u32>> {
    ids.iter()
        .map(|&idx| {
            u32::try_from(idx).map_err(|_| GwMeshError::InvalidTopology {
                cell,
                reason: format!("point index {idx} out of range"),
            })
        })
        .collect()
}

/// Splits a classic `n i0 .. in-1` cell list.
fn split_counted(header: &Header<'_>, count: usize, list: &[i64]) -> Result<Vec<Vec<u32>>> {
    let mut cells = Vec::with_capacity(count.min(MAX_PREALLOC));
    let mut pos = 0;
    for cell in 0..count {
        let n = *list
            .get(pos)
            .ok_or_else(|| header.error(format!("cell list ends before cell {cell}")))?;
        let n = usize::try_from(n).map_err(|_| GwMeshError::InvalidTopology {
            cell,
            reason: format!("negative point count {n}"),
        })?;
        let ids = list
            .get(pos + 1..)
            .and_then(|rest| rest.get(..n))
            .ok_or_else(|| header.error(format!("cell list ends inside cell {cell}")))?;
        cells.push(to_indices(cell, ids)?);
        pos += 1 + n;
    }
    if pos != list.len() {
        return Err(header.error(format!(
            "cell list has {} entries but its cells use {pos}",
            list.len()
        )));
    }
    Ok(cells)
}

/// Splits a 5.1 `OFFSETS`/`CONNECTIVITY` pair.
fn split_offsets(offsets: &[i64], connectivity: &[i64]) -> Result<Vec<Vec<u32>>> {
    offsets
        .windows(2)
        .enumerate()
        .map(|(cell, window)| {
            let (start, end) = (window[0], window[1]);
            let ids = usize::try_from(start)
                .ok()
                .zip(usize::try_from(end).ok())
                .and_then(|(start, end)| connectivity.get(start..end))
                .ok_or_else(|| GwMeshError::InvalidTopology {
                    cell,
                    reason: format!(
                        "offsets {start}..{end} outside connectivity of {}",
                        connectivity.len()
                    ),
                })?;
            to_indices(cell, ids)
        })
        .collect()
}

/// Parses a legacy VTK unstructured grid held in memory.
///
/// `origin` names the source in error messages.
pub fn parse_vtk(data: &[u8], origin: &str) -> Result<UnstructuredGrid> {
    let mut reader = Reader::new(data, origin);

    let version = reader.raw_line()?.unwrap_or_default();
    if !version
        .trim()
        .to_ascii_lowercase()
        .starts_with("# vtk datafile version")
    {
        return Err(GwMeshError::parse(
            origin,
            1,
            "missing '# vtk DataFile Version' header",
        ));
    }
    if reader.raw_line()?.is_none() {
        return Err(reader.error("missing title line"));
    }

    let format = reader.expect_any_header()?;
    reader.encoding = match format.keyword().as_str() {
        "ASCII" => Encoding::Ascii,
        "BINARY" => Encoding::Binary,
        other => return Err(format.error(format!("unknown file format '{other}'"))),
    };

    let dataset = reader.expect_header("DATASET")?;
    let kind = dataset.word(1, "dataset type")?;
    if !kind.eq_ignore_ascii_case("UNSTRUCTURED_GRID") {
        return Err(dataset.error(format!("unsupported dataset type '{kind}'")));
    }

    let mut points: Option<Vec<DVec3>> = None;
    let mut connectivity: Option<Vec<Vec<u32>>> = None;
    let mut kinds: Option<Vec<CellKind>> = None;
    let mut fields: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut section: Option<Section> = None;

    while let Some(header) = reader.header()? {
        match header.keyword().as_str() {
            "POINTS" => {
                let n = header.count(1, "point count")?;
                let dtype = header.data_type(2)?;
                let count = n
                    .checked_mul(3)
                    .ok_or_else(|| header.error("point count overflows"))?;
                let coords = reader.read_floats(count, dtype)?;
                points = Some(
                    coords
                        .chunks_exact(3)
                        .map(|c| DVec3::new(c[0], c[1], c[2]))
                        .collect(),
                );
            }
            "CELLS" => {
                let first = header.count(1, "cell count")?;
                let second = header.count(2, "cell list size")?;
                let cells = if reader.peek_keyword("OFFSETS") {
                    let offsets_header = reader.expect_header("OFFSETS")?;
                    let offsets = reader.read_ints(first, offsets_header.data_type(1)?)?;
                    let conn_header = reader.expect_header("CONNECTIVITY")?;
                    let conn = reader.read_ints(second, conn_header.data_type(1)?)?;
                    split_offsets(&offsets, &conn)?
                } else {
                    let list = reader.read_ints(second, DataType::I32)?;
                    split_counted(&header, first, &list)?
                };
                if let Some(kinds) = &kinds {
                    check_type_count(&header, kinds.len(), cells.len())?;
                }
                connectivity = Some(cells);
            }
            "CELL_TYPES" => {
                let n = header.count(1, "cell type count")?;
                if let Some(cells) = &connectivity {
                    check_type_count(&header, n, cells.len())?;
                }
                let codes = reader.read_ints(n, DataType::I32)?;
                kinds = Some(
                    codes
                        .iter()
                        .enumerate()
                        .map(|(cell, &code)| {
                            let code = u32::try_from(code).unwrap_or(u32::MAX);
                            CellKind::from_vtk(code)
                                .ok_or(GwMeshError::UnsupportedCellType { cell, code })
                        })
                        .collect::<Result<_>>()?,
                );
            }
            "CELL_DATA" => {
                let n = header.count(1, "cell count")?;
                if let Some(cells) = &connectivity {
                    if n != cells.len() {
                        return Err(header.error(format!(
                            "CELL_DATA covers {n} cells, CELLS has {}",
                            cells.len()
                        )));
                    }
                }
                section = Some(Section::Cells(n));
            }
            "POINT_DATA" => {
                section = Some(Section::Points(header.count(1, "point count")?));
            }
            "FIELD" => {
                let arrays = header.count(2, "array count")?;
                read_field_arrays(&mut reader, section, arrays, &mut fields)?;
            }
            "METADATA" => reader.skip_metadata()?,
            keyword => {
                let current = section.ok_or_else(|| {
                    header.error(format!("{keyword} before CELL_DATA or POINT_DATA"))
                })?;
                read_attribute(&mut reader, &header, current, &mut fields)?;
            }
        }
    }

    let points = points.ok_or_else(|| reader.error("missing POINTS section"))?;
    let connectivity = connectivity.ok_or_else(|| reader.error("missing CELLS section"))?;
    let kinds = kinds.ok_or_else(|| reader.error("missing CELL_TYPES section"))?;

    let cells = kinds
        .into_iter()
        .zip(connectivity)
        .map(|(kind, ids)| Cell::new(kind, ids))
        .collect();

    UnstructuredGrid::new(points, cells, fields)
}

fn check_type_count(header: &Header<'_>, types: usize, cells: usize) -> Result<()> {
    if types == cells {
        Ok(())
    } else {
        Err(header.error(format!(
            "CELL_TYPES has {types} entries, CELLS has {cells}"
        )))
    }
}

/// Keeps a cell array as a field, or drops it with a log line.
fn store_array(
    section: Option<Section>,
    name: &str,
    components: usize,
    values: Vec<f64>,
    fields: &mut BTreeMap<String, Vec<f64>>,
) {
    match section {
        Some(Section::Cells(_)) if components != 1 => {
            log::warn!("skipping cell array '{name}' with {components} components");
        }
        Some(Section::Cells(_)) => {
            if fields.contains_key(name) {
                log::warn!("duplicate cell array '{name}', keeping the first");
            } else {
                fields.insert(name.to_string(), values);
            }
        }
        Some(Section::Points(_)) => log::debug!("skipping point array '{name}'"),
        None => log::debug!("skipping dataset array '{name}'"),
    }
}

fn read_field_arrays(
    reader: &mut Reader<'_>,
    section: Option<Section>,
    arrays: usize,
    fields: &mut BTreeMap<String, Vec<f64>>,
) -> Result<()> {
    for _ in 0..arrays {
        let array = reader.expect_any_header()?;
        if array.keyword() == "NULL_ARRAY" {
            continue;
        }
        let name = decode_name(array.word(0, "name")?);
        let components = array.count(1, "component count")?;
        let tuples = array.count(2, "tuple count")?;
        let count = components
            .checked_mul(tuples)
            .ok_or_else(|| array.error("array size overflows"))?;
        let type_name = array.word(3, "data type")?;
        let values = if is_string_type(type_name) {
            reader.skip_strings(count)?;
            None
        } else {
            let dtype = array.data_type(3)?;
            Some(reader.read_floats(count, dtype)?)
        };
        if reader.peek_keyword("METADATA") {
            reader.expect_header("METADATA")?;
            reader.skip_metadata()?;
        }
        match values {
            Some(values) => store_array(section, &name, components, values, fields),
            None => log::debug!("skipping string array '{name}'"),
        }
    }
    Ok(())
}

fn read_attribute(
    reader: &mut Reader<'_>,
    header: &Header<'_>,
    section: Section,
    fields: &mut BTreeMap<String, Vec<f64>>,
) -> Result<()> {
    let n = section.len();
    let keyword = header.keyword();
    let name = decode_name(header.word(1, "name")?);
    let (components, dtype) = match keyword.as_str() {
        "SCALARS" => {
            let dtype = header.data_type(2)?;
            let components = match header.words.get(3) {
                Some(_) => header.count(3, "component count")?,
                None => 1,
            };
            if reader.peek_keyword("LOOKUP_TABLE") {
                reader.expect_header("LOOKUP_TABLE")?;
            }
            (components, dtype)
        }
        "VECTORS" | "NORMALS" => (3, header.data_type(2)?),
        "TENSORS" => (9, header.data_type(2)?),
        "TENSORS6" => (6, header.data_type(2)?),
        "TEXTURE_COORDINATES" => (header.count(2, "dimension")?, header.data_type(3)?),
        "GLOBAL_IDS" | "PEDIGREE_IDS" => (1, header.data_type(2)?),
        "COLOR_SCALARS" => (header.count(2, "component count")?, color_type(reader)),
        "LOOKUP_TABLE" => {
            // A lookup table's size is its own, not the section's
            let size = header.count(2, "table size")?;
            let count = size
                .checked_mul(4)
                .ok_or_else(|| header.error("table size overflows"))?;
            let dtype = color_type(reader);
            reader.read_floats(count, dtype)?;
            return Ok(());
        }
        other => return Err(header.error(format!("unknown keyword '{other}'"))),
    };

    let count = n
        .checked_mul(components)
        .ok_or_else(|| header.error("array size overflows"))?;
    let values = reader.read_floats(count, dtype)?;
    if reader.peek_keyword("METADATA") {
        reader.expect_header("METADATA")?;
        reader.skip_metadata()?;
    }

    if keyword == "SCALARS" {
        store_array(Some(section), &name, components, values, fields);
    } else {
        log::debug!("skipping {keyword} array '{name}'");
    }
    Ok(())
}

fn is_string_type(name: &str) -> bool {
    name.eq_ignore_ascii_case("string") || name.eq_ignore_ascii_case("utf8_string")
}

/// Decodes the `%XX` escapes writers use for spaces and other unsafe bytes
/// in array names.
fn decode_name(name: &str) -> String {
    if !name.contains('%') {
        return name.to_string();
    }
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escaped = match bytes.get(i..i + 3) {
            Some([b'%', hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            }
            _ => None,
        };
        match escaped {
            Some(byte) => {
                out.push(byte);
                i += 3;
            }
            None => {
                out.push(bytes[i]);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Color arrays are unsigned bytes in binary files and floats in ASCII ones.
fn color_type(reader: &Reader<'_>) -> DataType {
    match reader.encoding {
        Encoding::Ascii => DataType::F32,
        Encoding::Binary => DataType::U8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwmesh_core::ErrorKind;

    fn ascii(body: &str) -> Vec<u8> {
        format!("# vtk DataFile Version 3.0\ntest grid\nASCII\nDATASET UNSTRUCTURED_GRID\n{body}")
            .into_bytes()
    }

    const TWO_TETS: &str = "POINTS 5 double\n\
        0 0 0\n1 0 0\n0 1 0\n0 0 1\n0 0 -1\n\
        CELLS 2 10\n\
        4 0 1 2 3\n\
        4 0 2 1 4\n\
        CELL_TYPES 2\n\
        10\n\
        10\n";

    #[test]
    fn test_ascii_classic_layout() {
        let body = format!(
            "{TWO_TETS}CELL_DATA 2\n\
             SCALARS k double 1\n\
             LOOKUP_TABLE default\n\
             1.5 2.5\n\
             FIELD FieldData 1\n\
             riv_0_cond 1 2 double\n\
             nan 3.0\n"
        );
        let grid = parse_vtk(&ascii(&body), "tets.vtk").unwrap();

        assert_eq!(grid.num_points(), 5);
        assert_eq!(grid.num_cells(), 2);
        assert_eq!(grid.cells()[1].points(), &[0, 2, 1, 4]);
        assert_eq!(grid.cells()[0].kind(), CellKind::Tetra);
        assert_eq!(grid.field("k").unwrap().values(), &[1.5, 2.5]);
        let cond = grid.field("riv_0_cond").unwrap().values();
        assert!(cond[0].is_nan());
        assert_eq!(cond[1], 3.0);
        assert_eq!(grid.field_names().collect::<Vec<_>>(), vec!["k", "riv_0_cond"]);
    }

    #[test]
    fn test_offsets_layout_and_skipped_sections() {
        let data = b"# vtk DataFile Version 5.1\n\
            vtk output\n\
            ASCII\n\
            DATASET UNSTRUCTURED_GRID\n\
            FIELD FieldData 1\n\
            TIME 1 1 double\n\
            0\n\
            POINTS 4 float\n\
            0 0 0 1 0 0 0 1 0 1 1 0\n\
            METADATA\n\
            INFORMATION 0\n\
            \n\
            CELLS 3 6\n\
            OFFSETS vtktypeint64\n\
            0 3 6\n\
            CONNECTIVITY vtktypeint64\n\
            0 1 2 1 3 2\n\
            CELL_TYPES 2\n\
            5\n\
            5\n\
            CELL_DATA 2\n\
            FIELD FieldData 1\n\
            head 1 2 float\n\
            10 20\n\
            POINT_DATA 4\n\
            SCALARS p float\n\
            LOOKUP_TABLE default\n\
            1 2 3 4\n\
            VECTORS v float\n\
            0 0 0 0 0 0 0 0 0 0 0 0\n";
        let grid = parse_vtk(data, "step.vtk").unwrap();

        assert_eq!(grid.num_cells(), 2);
        assert_eq!(grid.cells()[1].points(), &[1, 3, 2]);
        assert_eq!(grid.cells()[1].kind(), CellKind::Triangle);
        assert_eq!(grid.field("head").unwrap().values(), &[10.0, 20.0]);
        assert!(!grid.has_field("TIME"));
        assert!(!grid.has_field("p"));
    }

    #[test]
    fn test_binary_big_endian() {
        let mut data = Vec::new();
        data.extend_from_slice(
            b"# vtk DataFile Version 3.0\nbinary grid\nBINARY\nDATASET UNSTRUCTURED_GRID\nPOINTS 4 float\n",
        );
        for v in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0] {
            data.extend_from_slice(&v.to_be_bytes());
        }
        data.extend_from_slice(b"\nCELLS 1 5\n");
        for v in [4i32, 0, 1, 2, 3] {
            data.extend_from_slice(&v.to_be_bytes());
        }
        data.extend_from_slice(b"\nCELL_TYPES 1\n");
        data.extend_from_slice(&10i32.to_be_bytes());
        data.extend_from_slice(b"\nCELL_DATA 1\nSCALARS riv_0_cond double 1\nLOOKUP_TABLE default\n");
        data.extend_from_slice(&f64::NAN.to_be_bytes());
        data.extend_from_slice(b"\nFIELD FieldData 1\nk 1 1 float\n");
        data.extend_from_slice(&2.5f32.to_be_bytes());
        data.extend_from_slice(b"\n");

        let grid = parse_vtk(&data, "binary.vtk").unwrap();
        assert_eq!(grid.num_points(), 4);
        assert_eq!(grid.points()[3], DVec3::new(0.0, 0.0, 1.0));
        assert_eq!(grid.cells()[0].kind(), CellKind::Tetra);
        assert!(grid.field("riv_0_cond").unwrap().values()[0].is_nan());
        assert_eq!(grid.field("k").unwrap().values(), &[2.5]);
    }

    #[test]
    fn test_multi_component_and_duplicate_arrays() {
        let body = format!(
            "{TWO_TETS}CELL_DATA 2\n\
             SCALARS vel double 3\n\
             LOOKUP_TABLE default\n\
             1 2 3 4 5 6\n\
             SCALARS k double\n\
             LOOKUP_TABLE default\n\
             1 2\n\
             FIELD FieldData 2\n\
             k 1 2 double\n\
             8 9\n\
             NULL_ARRAY\n"
        );
        let grid = parse_vtk(&ascii(&body), "tets.vtk").unwrap();
        assert!(!grid.has_field("vel"));
        assert_eq!(grid.field("k").unwrap().values(), &[1.0, 2.0]);
    }

    #[test]
    fn test_string_arrays_skipped() {
        let data = b"# vtk DataFile Version 5.1\n\
            vtk output\n\
            ASCII\n\
            DATASET UNSTRUCTURED_GRID\n\
            FIELD FieldData 2\n\
            model 1 2 string\n\
            raspad\n\
            \n\
            TIME 1 1 double\n\
            0\n\
            POINTS 3 float\n\
            0 0 0 1 0 0 0 1 0\n\
            CELLS 1 4\n\
            3 0 1 2\n\
            CELL_TYPES 1\n\
            5\n\
            CELL_DATA 1\n\
            FIELD FieldData 2\n\
            zone 1 1 string\n\
            north bank\n\
            head 1 1 double\n\
            4.5\n";
        let grid = parse_vtk(data, "step.vtk").unwrap();
        assert_eq!(grid.num_cells(), 1);
        assert_eq!(grid.field("head").unwrap().values(), &[4.5]);
        assert!(!grid.has_field("zone"));
    }

    #[test]
    fn test_binary_string_array_skipped() {
        let mut data = Vec::new();
        data.extend_from_slice(
            b"# vtk DataFile Version 3.0\nbinary grid\nBINARY\nDATASET UNSTRUCTURED_GRID\n\
              FIELD FieldData 1\nmodel 1 2 string\n",
        );
        // 6-byte value with a one-byte length, 3-byte value with a two-byte length
        data.push(0xc0 | 6);
        data.extend_from_slice(b"raspad");
        data.extend_from_slice(&[0x80, 3]);
        data.extend_from_slice(b"run");
        data.extend_from_slice(b"\nPOINTS 3 float\n");
        for v in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            data.extend_from_slice(&v.to_be_bytes());
        }
        data.extend_from_slice(b"\nCELLS 1 4\n");
        for v in [3i32, 0, 1, 2] {
            data.extend_from_slice(&v.to_be_bytes());
        }
        data.extend_from_slice(b"\nCELL_TYPES 1\n");
        data.extend_from_slice(&5i32.to_be_bytes());
        data.extend_from_slice(b"\n");

        let grid = parse_vtk(&data, "binary.vtk").unwrap();
        assert_eq!(grid.num_points(), 3);
        assert_eq!(grid.cells()[0].kind(), CellKind::Triangle);
    }

    #[test]
    fn test_truncated_string_array() {
        let body = "FIELD FieldData 1\nmodel 1 3 string\nraspad\n";
        let err = parse_vtk(&ascii(body), "short.vtk").unwrap_err();
        assert!(matches!(err, GwMeshError::Parse { .. }));
    }

    #[test]
    fn test_escaped_array_names() {
        let body = format!(
            "{TWO_TETS}CELL_DATA 2\n\
             SCALARS hydraulic%20k double 1\n\
             LOOKUP_TABLE default\n\
             1 2\n\
             FIELD FieldData 1\n\
             riv%200 1 2 double\n\
             3 4\n"
        );
        let grid = parse_vtk(&ascii(&body), "tets.vtk").unwrap();
        assert_eq!(grid.field("riv 0").unwrap().values(), &[3.0, 4.0]);
        assert_eq!(grid.field("hydraulic k").unwrap().values(), &[1.0, 2.0]);

        assert_eq!(decode_name("riv_0_cond"), "riv_0_cond");
        assert_eq!(decode_name("100%"), "100%");
        assert_eq!(decode_name("a%2x"), "a%2x");
        assert_eq!(decode_name("a%25b"), "a%b");
    }

    #[test]
    fn test_nonstandard_float_tokens() {
        assert!(parse_float("nan").unwrap().is_nan());
        assert!(parse_float("-nan").unwrap().is_nan());
        assert!(parse_float("1.#QNAN").unwrap().is_nan());
        assert_eq!(parse_float("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_float("-inf"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_float("1e30"), Some(1e30));
        assert_eq!(parse_float("abc"), None);
    }

    #[test]
    fn test_out_of_range_index() {
        let body = "POINTS 4 double\n0 0 0 1 0 0 0 1 0 0 0 1\n\
            CELLS 1 5\n4 0 1 2 7\nCELL_TYPES 1\n10\n";
        let err = parse_vtk(&ascii(body), "bad.vtk").unwrap_err();
        assert!(matches!(err, GwMeshError::InvalidTopology { cell: 0, .. }));
        assert_eq!(err.kind(), ErrorKind::Load);
    }

    #[test]
    fn test_negative_index() {
        let body = "POINTS 4 double\n0 0 0 1 0 0 0 1 0 0 0 1\n\
            CELLS 1 5\n4 0 1 -2 3\nCELL_TYPES 1\n10\n";
        let err = parse_vtk(&ascii(body), "bad.vtk").unwrap_err();
        assert!(matches!(err, GwMeshError::InvalidTopology { .. }));
    }

    #[test]
    fn test_unsupported_cell_type() {
        let body = "POINTS 4 double\n0 0 0 1 0 0 0 1 0 0 0 1\n\
            CELLS 1 5\n4 0 1 2 3\nCELL_TYPES 1\n42\n";
        let err = parse_vtk(&ascii(body), "bad.vtk").unwrap_err();
        assert!(matches!(
            err,
            GwMeshError::UnsupportedCellType { cell: 0, code: 42 }
        ));
    }

    #[test]
    fn test_bad_header() {
        let err = parse_vtk(b"not a vtk file\n", "bad.vtk").unwrap_err();
        assert!(matches!(err, GwMeshError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_unsupported_dataset() {
        let data = b"# vtk DataFile Version 3.0\nsurface\nASCII\nDATASET POLYDATA\n";
        let err = parse_vtk(data, "poly.vtk").unwrap_err();
        assert!(matches!(err, GwMeshError::Parse { line: 4, .. }));
    }

    #[test]
    fn test_missing_sections() {
        let err = parse_vtk(&ascii("POINTS 1 double\n0 0 0\n"), "bad.vtk").unwrap_err();
        assert!(err.to_string().contains("missing CELLS"));
    }

    #[test]
    fn test_cell_type_count_mismatch() {
        let body = "POINTS 4 double\n0 0 0 1 0 0 0 1 0 0 0 1\n\
            CELLS 1 5\n4 0 1 2 3\nCELL_TYPES 2\n10\n10\n";
        let err = parse_vtk(&ascii(body), "bad.vtk").unwrap_err();
        assert!(matches!(err, GwMeshError::Parse { .. }));
    }

    #[test]
    fn test_truncated_data() {
        let err = parse_vtk(&ascii("POINTS 4 double\n0 0 0 1 0\n"), "short.vtk").unwrap_err();
        assert!(err.to_string().contains("unexpected end of file"));
    }

    #[test]
    fn test_field_length_mismatch() {
        let body = format!("{TWO_TETS}CELL_DATA 2\nFIELD FieldData 1\nk 1 3 double\n1 2 3\n");
        let err = parse_vtk(&ascii(&body), "bad.vtk").unwrap_err();
        assert!(matches!(
            err,
            GwMeshError::FieldLength {
                expected: 2,
                actual: 3,
                ..
            }
        ));
    }
}
