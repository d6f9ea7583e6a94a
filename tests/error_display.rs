use clerk_lib::{ClerkError, DocumentError, RowError, TableError};

#[test]
fn config_error_display_includes_message() {
    let err = ClerkError::config("missing template");

    assert_eq!(format!("{}", err), "Configuration error: missing template");
}

#[test]
fn io_error_display_wraps_source() {
    let io_err = std::io::Error::other("disk full");
    let err: ClerkError = io_err.into();
    let rendered = format!("{}", err);

    assert!(rendered.starts_with("IO error: "));
    assert!(rendered.contains("disk full"));
}

#[test]
fn no_models_display_names_directory() {
    let err = ClerkError::NoModels("/usr/share/tessdata/".to_string());

    assert_eq!(
        format!("{}", err),
        "No OCR models found in /usr/share/tessdata/"
    );
}

#[test]
fn document_error_wraps_not_found() {
    let err: ClerkError = DocumentError::NotFound("scan.png".to_string()).into();

    assert_eq!(
        format!("{}", err),
        "Document error: File not found: scan.png"
    );
}

#[test]
fn table_read_error_names_path() {
    let err: ClerkError = TableError::Read {
        path: "rows.json".to_string(),
        source: std::io::Error::other("denied"),
    }
    .into();
    let rendered = format!("{}", err);

    assert!(rendered.starts_with("Table error: Failed to read table rows.json"));
    assert!(rendered.contains("denied"));
}

#[test]
fn row_error_reports_bounds() {
    let err = RowError::RowOutOfRange { row: 4, len: 2 };

    assert_eq!(
        format!("{}", err),
        "Row 4 does not exist (table has 2 rows)"
    );
}
