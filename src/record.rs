// Bank Account Manager - Fixed-Width Record Codec
// One 40-byte slot of credit.dat, little-endian with C struct alignment
//
// offset  size  field
//   0      4    acct_num   (u32, 0 = empty slot)
//   4     15    last_name  (NUL padded)
//  19     10    first_name (NUL padded)
//  29      3    alignment padding
//  32      8    balance    (f64)

/// Size of one record on disk
pub const RECORD_SIZE: usize = 40;

/// Width of the last-name field, terminator included
pub const LAST_NAME_LEN: usize = 15;

/// Width of the first-name field, terminator included
pub const FIRST_NAME_LEN: usize = 10;

const ACCT_RANGE: std::ops::Range<usize> = 0..4;
const LAST_RANGE: std::ops::Range<usize> = 4..4 + LAST_NAME_LEN;
const FIRST_RANGE: std::ops::Range<usize> = 19..19 + FIRST_NAME_LEN;
const BALANCE_RANGE: std::ops::Range<usize> = 32..40;

// ============================================================================
// RECORD
// ============================================================================

/// Raw slot contents, before any validation.
///
/// Name fields keep their on-disk bytes so that a decode/encode cycle never
/// rewrites a record the service did not touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub acct_num: u32,
    pub last_name: [u8; LAST_NAME_LEN],
    pub first_name: [u8; FIRST_NAME_LEN],
    pub balance: f64,
}

impl Record {
    /// An empty slot
    pub fn blank() -> Self {
        Record {
            acct_num: 0,
            last_name: [0; LAST_NAME_LEN],
            first_name: [0; FIRST_NAME_LEN],
            balance: 0.0,
        }
    }

    /// Build a record from already-validated parts.
    ///
    /// Names longer than their field are cut so the terminating NUL fits.
    pub fn new(acct_num: u32, last_name: &str, first_name: &str, balance: f64) -> Self {
        let mut record = Record::blank();
        record.acct_num = acct_num;
        pack_name(&mut record.last_name, last_name);
        pack_name(&mut record.first_name, first_name);
        record.balance = balance;
        record
    }

    pub fn is_blank(&self) -> bool {
        self.acct_num == 0
    }

    pub fn decode(bytes: &[u8; RECORD_SIZE]) -> Self {
        let mut acct = [0u8; 4];
        acct.copy_from_slice(&bytes[ACCT_RANGE]);

        let mut last_name = [0u8; LAST_NAME_LEN];
        last_name.copy_from_slice(&bytes[LAST_RANGE]);

        let mut first_name = [0u8; FIRST_NAME_LEN];
        first_name.copy_from_slice(&bytes[FIRST_RANGE]);

        let mut balance = [0u8; 8];
        balance.copy_from_slice(&bytes[BALANCE_RANGE]);

        Record {
            acct_num: u32::from_le_bytes(acct),
            last_name,
            first_name,
            balance: f64::from_le_bytes(balance),
        }
    }

    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];
        bytes[ACCT_RANGE].copy_from_slice(&self.acct_num.to_le_bytes());
        bytes[LAST_RANGE].copy_from_slice(&self.last_name);
        bytes[FIRST_RANGE].copy_from_slice(&self.first_name);
        bytes[BALANCE_RANGE].copy_from_slice(&self.balance.to_le_bytes());
        bytes
    }

    /// Last name with garbage stripped (see [`sanitize_name`])
    pub fn last_name(&self) -> String {
        sanitize_name(&self.last_name)
    }

    /// First name with garbage stripped (see [`sanitize_name`])
    pub fn first_name(&self) -> String {
        sanitize_name(&self.first_name)
    }
}

impl Default for Record {
    fn default() -> Self {
        Record::blank()
    }
}

// ============================================================================
// NAME FIELDS
// ============================================================================

/// Decode a NUL-padded name field.
///
/// Reads up to the first NUL, decodes lossily, drops non-printable
/// characters (replacement chars included) and trims whitespace.
pub fn sanitize_name(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end])
        .chars()
        .filter(|c| !c.is_control() && *c != char::REPLACEMENT_CHARACTER)
        .collect::<String>()
        .trim()
        .to_string()
}

fn pack_name(field: &mut [u8], name: &str) {
    let max = field.len() - 1;
    let mut end = name.len().min(max);
    // never split a UTF-8 sequence
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    field[..end].copy_from_slice(&name.as_bytes()[..end]);
}
