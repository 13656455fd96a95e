use std::fmt::Display;

/// Failures raised by workbook backends.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{backend}: {message}")]
    Backend { backend: String, message: String },

    #[error("worksheet '{sheet}' not found")]
    SheetNotFound { sheet: String },

    #[error("{context}: {feature} is not supported")]
    Unsupported { feature: String, context: String },

    #[error("{sheet}!R{row}C{col}: {source}")]
    Cell {
        sheet: String,
        row: u32,
        col: u32,
        #[source]
        source: Box<IoError>,
    },
}

impl IoError {
    pub fn from_backend(backend: &str, err: impl Display) -> Self {
        IoError::Backend {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }
}

/// Attach the cell address an operation was working on to its error.
pub fn with_cell_context<T>(
    result: Result<T, IoError>,
    sheet: &str,
    row: u32,
    col: u32,
) -> Result<T, IoError> {
    result.map_err(|source| IoError::Cell {
        sheet: sheet.to_string(),
        row,
        col,
        source: Box::new(source),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_context_prefixes_address() {
        let res: Result<(), IoError> = Err(IoError::SheetNotFound {
            sheet: "Data".into(),
        });
        let err = with_cell_context(res, "Data", 3, 2).unwrap_err();
        assert_eq!(err.to_string(), "Data!R3C2: worksheet 'Data' not found");
    }
}
