use calamine::Data;

#[derive(Debug, Clone, PartialEq)]
pub enum CellScalar {
    Missing,
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellScalar {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellScalar::Missing)
    }

    /// Unnormalized textual form of the cell, as it appears in the sheet.
    /// Download-URL construction requires this form; `normalize_val` output
    /// is not equivalent for numeric or padded cells.
    pub fn raw_text(&self) -> String {
        match self {
            CellScalar::Missing => String::new(),
            CellScalar::Int(value) => value.to_string(),
            CellScalar::Float(value) => value.to_string(),
            CellScalar::Text(value) => value.clone(),
        }
    }
}

impl From<&Data> for CellScalar {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty | Data::Error(_) => CellScalar::Missing,
            Data::Int(value) => CellScalar::Int(*value),
            Data::Float(value) => CellScalar::Float(*value),
            Data::String(value) => CellScalar::Text(value.clone()),
            Data::Bool(value) => CellScalar::Text(value.to_string()),
            other => CellScalar::Text(other.to_string()),
        }
    }
}

/// Collapse a cell to either `None` (no usable value) or a canonical string.
///
/// Checks run in a fixed order: missing cells first, then numeric types,
/// then the text fallback with its blank-token list. Integral floats render
/// without a fractional suffix (`1024.0` -> `"1024"`). The literal strings
/// "nan"/"none" (any case), lone quote pairs, and cells that are nothing but
/// quotes and whitespace all count as empty; everything else comes back
/// trimmed but otherwise untouched.
pub fn normalize_val(value: &CellScalar) -> Option<String> {
    match value {
        CellScalar::Missing => None,
        CellScalar::Int(n) => Some(n.to_string()),
        CellScalar::Float(x) => {
            if !x.is_finite() {
                return None;
            }
            if x.fract() == 0.0 {
                return Some((*x as i64).to_string());
            }
            let rendered = x.to_string();
            match rendered.strip_suffix(".0") {
                Some(stripped) => Some(stripped.to_string()),
                None => Some(rendered),
            }
        }
        CellScalar::Text(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            let lowered = trimmed.to_lowercase();
            if lowered == "nan" || lowered == "none" {
                return None;
            }
            // Literal quote tokens observed in exported sheets.
            if matches!(trimmed, "\"\"" | "\"" | "''") {
                return None;
            }
            if trimmed.trim_matches('"').trim().is_empty() {
                return None;
            }
            Some(trimmed.to_string())
        }
    }
}
