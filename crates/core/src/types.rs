/// All backend primary keys are 64-bit integers.
pub type EntityId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// All scope/billing quantities are fixed-point decimals.
pub type Quantity = rust_decimal::Decimal;
