//! Scan helpers shared by read and read-write transactions.

/// Collect every row whose secondary key equals `value` exactly.
///
/// native_db secondary scans match by prefix, so the scan is followed by an
/// equality filter on the same field. Works with both `RTransaction` and
/// `RwTransaction`.
macro_rules! scan_exact {
    ($tx:expr, $stored:ty, $key:expr, $field:ident, $value:expr) => {{
        let value: &str = $value;
        let scan = $tx.scan().secondary::<$stored>($key)?;
        let iter = scan.start_with(value)?;
        let rows: std::result::Result<Vec<$stored>, _> = iter.collect();
        let rows = rows.map_err(|e| crate::error::Error::Database(e.to_string()))?;
        rows.into_iter()
            .filter(|row| row.$field == value)
            .collect::<Vec<$stored>>()
    }};
}
