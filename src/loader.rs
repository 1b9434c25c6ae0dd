use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};

use crate::config::{ColumnMapping, ContactSource};
use crate::error::LoadError;
use crate::phone;
use crate::store::{ContactRecord, ContactStore, RawRecord};

/// Counters reported after a successful load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Data rows read from the source (header excluded).
    pub rows: usize,
    /// Phone index writes, overwrites of an existing key included.
    pub phone_entries: usize,
}

/// Load the contact source named by `source.path`.
pub fn load_path(source: &ContactSource) -> Result<(ContactStore, LoadStats), LoadError> {
    let file = File::open(&source.path).map_err(|e| LoadError::Open {
        path: source.path.clone(),
        source: e,
    })?;
    load_reader(file, source)
}

/// Stream delimited rows from `reader` into a fresh store.
///
/// The first row is the header. Columns are matched by trimmed name; a
/// configured column that is absent from the header reads as empty on
/// every row. Short rows are tolerated the same way. Bytes that are not
/// valid UTF-8 decode to U+FFFD instead of failing the row. Only an I/O or
/// CSV framing error from the reader aborts the whole load.
pub fn load_reader<R: Read>(
    reader: R,
    source: &ContactSource,
) -> Result<(ContactStore, LoadStats), LoadError> {
    let read_err = |e: csv::Error| LoadError::Read {
        path: source.path.clone(),
        source: e,
    };

    let mut csv_reader = ReaderBuilder::new()
        .delimiter(source.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.byte_headers().map_err(read_err)?.clone();
    let index = ColumnIndex::resolve(&headers, &source.columns, &source.path);

    let mut store = ContactStore::new();
    let mut stats = LoadStats::default();
    let mut row = ByteRecord::new();

    while csv_reader.read_byte_record(&mut row).map_err(read_err)? {
        stats.rows += 1;
        let record = index.record(&row);

        for &col in &index.phones {
            let decoded = field(&row, col);
            let raw_phone = decoded.trim();
            if raw_phone.is_empty() {
                continue;
            }
            let key = phone::normalize(raw_phone);
            if store.insert(key, record.clone()) {
                stats.phone_entries += 1;
            } else {
                tracing::debug!(row = stats.rows, phone = raw_phone, "skipping phone shorter than 10 digits");
            }
        }
    }

    tracing::info!(
        path = %source.path.display(),
        rows = stats.rows,
        phone_entries = stats.phone_entries,
        distinct_keys = store.len(),
        "loaded contacts"
    );

    Ok((store, stats))
}

/// Header positions of the configured columns.
#[derive(Debug)]
struct ColumnIndex {
    name: Option<usize>,
    account: Option<usize>,
    phones: Vec<Option<usize>>,
    full_name_original: Option<usize>,
    raw_account: Option<usize>,
    client_ref: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &ByteRecord, columns: &ColumnMapping, path: &Path) -> Self {
        let decoded: Vec<Cow<'_, str>> = headers.iter().map(String::from_utf8_lossy).collect();
        let names: Vec<&str> = decoded
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();

        // Repeated header names resolve to the rightmost occurrence
        let position = |column: &str| {
            let found = names.iter().rposition(|h| *h == column);
            if found.is_none() {
                tracing::warn!(path = %path.display(), column, "configured column missing from header");
            }
            found
        };

        Self {
            name: position(columns.name.as_str()),
            account: position(columns.account.as_str()),
            phones: columns.phones.iter().map(|c| position(c.as_str())).collect(),
            full_name_original: position(columns.full_name_original.as_str()),
            raw_account: position(columns.raw_account.as_str()),
            client_ref: position(columns.client_ref.as_str()),
        }
    }

    fn record(&self, row: &ByteRecord) -> ContactRecord {
        ContactRecord {
            full_name: text(row, self.name),
            account_ref: text(row, self.account),
            raw: RawRecord {
                full_name_original: text(row, self.full_name_original),
                account: text(row, self.raw_account),
                client_ref: text(row, self.client_ref),
            },
        }
    }
}

/// Lossily decoded field; missing columns and short rows read as empty.
fn field(row: &ByteRecord, col: Option<usize>) -> Cow<'_, str> {
    match col.and_then(|i| row.get(i)) {
        Some(bytes) => String::from_utf8_lossy(bytes),
        None => Cow::Borrowed(""),
    }
}

fn text(row: &ByteRecord, col: Option<usize>) -> String {
    field(row, col).trim().to_string()
}
