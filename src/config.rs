use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default contact source, relative to the working directory.
const DEFAULT_CSV_FILE: &str = "./contacts.csv";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

const DEFAULT_NAME_COLUMN: &str = "FIRSTNAME";
const DEFAULT_ACCOUNT_COLUMN: &str = "MASTERACCT";
const DEFAULT_PHONE_COLUMNS: [&str; 6] = ["PHONE1", "PHONE2", "PHONE3", "PHONE4", "PHONE5", "PHONE6"];

const FULL_NAME_ORIGINAL_COLUMN: &str = "FULL_NAME";
const RAW_ACCOUNT_COLUMN: &str = "ACCOUNT";
const CLIENT_REF_COLUMN: &str = "CLTREFNO";

/// Which source columns feed each contact field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub name: String,
    pub account: String,
    /// Phone-bearing columns, indexed in this order.
    pub phones: Vec<String>,
    pub full_name_original: String,
    pub raw_account: String,
    pub client_ref: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME_COLUMN.to_string(),
            account: DEFAULT_ACCOUNT_COLUMN.to_string(),
            phones: DEFAULT_PHONE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            full_name_original: FULL_NAME_ORIGINAL_COLUMN.to_string(),
            raw_account: RAW_ACCOUNT_COLUMN.to_string(),
            client_ref: CLIENT_REF_COLUMN.to_string(),
        }
    }
}

/// Where contacts come from and how to read them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSource {
    pub path: PathBuf,
    pub delimiter: u8,
    pub columns: ColumnMapping,
}

impl Default for ContactSource {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CSV_FILE),
            delimiter: b',',
            columns: ColumnMapping::default(),
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub source: ContactSource,
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `CSV_FILE` (optional, default `./contacts.csv`): contact source
    /// - `PORT` (optional, default 3000): listening port
    /// - `HOST` (optional, default `0.0.0.0`): listening address
    /// - `CSV_DELIMITER` (optional, default `,`): single ASCII character
    /// - `CONTACT_NAME_COLUMN` (optional, default `FIRSTNAME`)
    /// - `CONTACT_ACCOUNT_COLUMN` (optional, default `MASTERACCT`)
    /// - `CONTACT_PHONE_COLUMNS` (optional, default `PHONE1,...,PHONE6`)
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Variables that are set but blank count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(val) => val
                .trim()
                .parse::<u16>()
                .map_err(|_| format!("PORT must be an integer between 0 and 65535, got {val:?}"))?,
            None => DEFAULT_PORT,
        };

        let host = match var("HOST") {
            Some(val) => val
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| format!("HOST must be an IP address, got {val:?}"))?,
            None => DEFAULT_HOST,
        };

        let delimiter = match var("CSV_DELIMITER") {
            Some(val) => parse_delimiter(&val)?,
            None => b',',
        };

        let mut columns = ColumnMapping::default();
        if let Some(name) = var("CONTACT_NAME_COLUMN") {
            columns.name = name.trim().to_string();
        }
        if let Some(account) = var("CONTACT_ACCOUNT_COLUMN") {
            columns.account = account.trim().to_string();
        }
        if let Some(list) = var("CONTACT_PHONE_COLUMNS") {
            columns.phones = list
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            if columns.phones.is_empty() {
                return Err("CONTACT_PHONE_COLUMNS must name at least one column".to_string());
            }
        }

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            source: ContactSource {
                path: var("CSV_FILE")
                    .map(|val| PathBuf::from(val.trim()))
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_FILE)),
                delimiter,
                columns,
            },
        })
    }
}

fn parse_delimiter(val: &str) -> Result<u8, String> {
    // "\t" is accepted literally since a raw tab is awkward in most env files
    if val == "\\t" {
        return Ok(b'\t');
    }
    match val.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(format!("CSV_DELIMITER must be a single ASCII character, got {val:?}")),
    }
}
