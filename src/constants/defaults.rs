/// Value shown (and submitted) for fields that carry no user input
pub const LOCKED_VALUE: &str = "-";

/// Placeholder written when a rule switches to the OS Id + OS App Id descriptor
pub const OS_APP_ID_PLACEHOLDER: &str = "Android/OS_APP_Id";

/// Default S-NSSAI content value
pub const S_NSSAI_TEMPLATE: &str = "SST 1 + SD 1";

/// Connection capabilities value when every box is cleared
pub const NO_CAPABILITY_SELECTED: &str = "None selected";

/// Separator between capability tokens in a traffic descriptor value
pub const CAPABILITY_SEPARATOR: &str = ", ";

/// Smallest count any level of the rule tree may shrink to
pub const MIN_COUNT: usize = 1;

/// Largest count per level unless settings say otherwise
pub const DEFAULT_MAX_COUNT: usize = 5;

pub const DEFAULT_PTI: &str = "151";
pub const DEFAULT_PLMN: &str = "45006F";
pub const DEFAULT_UPSC: &str = "2";
