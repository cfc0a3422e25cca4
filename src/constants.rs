//! Application constants for guest session reporting
//!
//! Source column names, output table layouts and the fixed values the
//! validation rules are written against.

// =============================================================================
// Validation
// =============================================================================

/// Login shared by every guest session that is counted in the report
pub const GUEST_LOGIN: &str = "invitado-deca";

/// Pattern accepted for day fields and prompted dates.
///
/// Days are not checked against month length, so `2021-02-31` passes.
pub const DATE_SHAPE_PATTERN: &str = r"^(2019|202[0-3])-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$";

/// Pattern accepted for the numeric user identifier
pub const ID_SHAPE_PATTERN: &str = r"^[0-9]{1,7}$";

/// Pattern accepted for byte counters
pub const COUNTER_SHAPE_PATTERN: &str = r"^[0-9]+$";

/// Pattern used on load to pull the calendar day out of a timestamp cell
pub const DAY_EXTRACT_PATTERN: &str = r"([0-9]{4}-[0-9]{2}-[0-9]{2})";

/// Format of every day string in a date set
pub const DAY_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Source columns
// =============================================================================

/// Column names of the connection log as exported by the access controller
pub mod source_columns {
    pub const USERNAME: &str = "Usuario";
    pub const CLIENT_MAC: &str = "MAC_Cliente";
    pub const USER_ID: &str = "ID";
    pub const START_DAY: &str = "Inicio_de_Conexión_Dia";
    pub const END_DAY: &str = "FIN_de_Conexión_Dia";
    pub const INPUT_OCTETS: &str = "Input_Octects";
    pub const OUTPUT_OCTETS: &str = "Output_Octects";
    pub const SESSION_TIME: &str = "Session_Time";
}

/// Default session log file name
pub const DEFAULT_INPUT_FILE: &str = "file.csv";

// =============================================================================
// Output tables
// =============================================================================

/// Sentinel written for text fields missing from a rejected row
pub const MISSING_SENTINEL: &str = "N/A";

/// Separator between rejection reasons in the rejected table
pub const REASON_SEPARATOR: &str = "; ";

/// Base name used when the user leaves the output name empty
pub const DEFAULT_OUTPUT_NAME: &str = "guest_report";

/// Suffix of the validated-clients table
pub const VALIDATED_TABLE: &str = "validated";

/// Suffix of the rejected-records table
pub const REJECTED_TABLE: &str = "rejected";

/// Columns of the validated-clients table
pub mod validated_columns {
    pub const CLIENT_MAC: &str = "client_mac";
    pub const USER_ID: &str = "user_id";
    pub const USERNAME: &str = "username";
    pub const SESSION_TIME: &str = "session_time";
    pub const INPUT_OCTETS: &str = "input_octets";
    pub const OUTPUT_OCTETS: &str = "output_octets";
}

/// Columns of the rejected-records table
pub mod rejected_columns {
    pub const ORIGINAL_INDEX: &str = "original_index";
    pub const CLIENT_MAC: &str = "client_mac";
    pub const USERNAME: &str = "username";
    pub const USER_ID: &str = "user_id";
    pub const START_DAY: &str = "start_day";
    pub const END_DAY: &str = "end_day";
    pub const INPUT_OCTETS: &str = "input_octets";
    pub const OUTPUT_OCTETS: &str = "output_octets";
    pub const SESSION_TIME: &str = "session_time";
    pub const REJECTION_REASONS: &str = "rejection_reasons";
    pub const ERROR_COUNT: &str = "error_count";
}

// =============================================================================
// Progress reporting
// =============================================================================

/// Row count above which the classification pass shows a progress bar
pub const PROGRESS_BAR_THRESHOLD: usize = 50_000;

/// Progress bar refresh interval in rows
pub const PROGRESS_UPDATE_INTERVAL: usize = 10_000;
