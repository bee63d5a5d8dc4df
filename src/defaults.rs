//! Default constants for lag construction, fitting and loading.

pub const DEFAULT_LAG_ORDER: usize = 2;
pub const DEFAULT_TARGET_COLUMN: usize = 0;
pub const DEFAULT_RANK_TOL: f64 = 1e-7;
pub const DEFAULT_DELIMITER: u8 = b',';
pub const R2_SS_TOT_FLOOR: f64 = 1e-12;
