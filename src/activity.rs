//! Classifies a routine's purpose from the keywords in its name.
//!
//! Rules are ordered; the first matching rule wins. The vocabulary grew
//! out of the warehouse team's naming convention and is intentionally
//! closed - unknown names classify as "Undefined Activity".

const SERVICE_KEYWORDS: &[&str] = &["PARSE", "FN", "BACKUP", "CHANGE", "LOGGING", "ARRAY", "LOG"];

const GETTER_KEYWORDS: &[&str] = &["GET", "EXPORT", "CHECK", "REPORT"];

const SETTER_KEYWORDS: &[&str] = &[
    "PUT", "UPDATE", "INSERT", "DELETE", "SAVE", "CREATE", "COPY", "LOCK", "SET", "INACTIVATE",
    "ADD", "UNLOCK", "EDIT", "DEL", "UPD", "DROP",
];

const MAPPING_KEYWORDS: &[&str] = &["MAP", "UNMAP", "LINK", "UNLINK"];

/// Recognized data-layer suffixes for LOAD/REFRESH names. Preferred over
/// whatever token happens to follow the keyword.
const LAYER_SUFFIXES: &[&str] = &[
    "FCT", "FCTS", "T", "SA", "SRC", "LKP", "WRK", "ML", "MAP", "DIM", "DIMS", "DM", "ALL", "BAD",
    "LANDING", "MTA", "REF", "STAGING", "TMP", "VALIDATE", "VOD", "VV",
];

/// Classify a routine by its file stem, e.g. `SP_LOAD_FCT_DAILY`.
pub fn classify(file_stem: &str) -> String {
    let upper = file_stem.to_uppercase();
    let parts: Vec<&str> = upper.split('_').collect();
    let has = |keyword: &str| parts.iter().any(|p| *p == keyword);
    let has_any = |keywords: &[&str]| keywords.iter().copied().any(|k| has(k));

    if has_any(SERVICE_KEYWORDS) {
        return "Utility - Service area".to_string();
    }
    if has_any(GETTER_KEYWORDS) {
        return "Presenter Layer - Getter API".to_string();
    }
    if has_any(SETTER_KEYWORDS) {
        return "Presenter Layer - Setter API".to_string();
    }
    if has("CLEAR") {
        return "ETL - Clear data area".to_string();
    }
    if has("SSIS") {
        return "Utility - Orchestration layer".to_string();
    }
    if has("RENAME") || has("VALIDATE") {
        return "Utility - Standardization layer".to_string();
    }
    if let Some(index) = parts.iter().position(|p| *p == "LOAD") {
        return format!("ETL - Load {} layer", layer_after(&parts, index));
    }
    if let Some(index) = parts.iter().position(|p| *p == "REFRESH") {
        return format!("ETL - Refresh {} layer", layer_after(&parts, index));
    }
    if has("TRANSFER") {
        return "ETL - Transfer data layer".to_string();
    }
    if has_any(MAPPING_KEYWORDS) {
        return "ETL - Mapping field".to_string();
    }

    "Undefined Activity".to_string()
}

/// The layer named after a LOAD/REFRESH keyword: the first recognized
/// suffix anywhere after it, else the token immediately following it,
/// else nothing.
fn layer_after(parts: &[&str], index: usize) -> String {
    for part in &parts[index + 1..] {
        if LAYER_SUFFIXES.contains(part) {
            return (*part).to_string();
        }
    }
    parts.get(index + 1).copied().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_with_recognized_suffix() {
        assert_eq!(classify("SP_LOAD_FCT_DAILY"), "ETL - Load FCT layer");
    }

    #[test]
    fn load_prefers_suffix_over_next_token() {
        // DAILY is not in the vocabulary but DIM further along is.
        assert_eq!(classify("SP_LOAD_DAILY_DIM"), "ETL - Load DIM layer");
    }

    #[test]
    fn load_falls_back_to_next_token() {
        assert_eq!(classify("SP_LOAD_CUSTOMERS"), "ETL - Load CUSTOMERS layer");
    }

    #[test]
    fn load_with_nothing_after() {
        assert_eq!(classify("SP_LOAD"), "ETL - Load  layer");
    }

    #[test]
    fn refresh_layer() {
        assert_eq!(classify("SP_REFRESH_DIMS"), "ETL - Refresh DIMS layer");
    }

    #[test]
    fn getter_and_setter() {
        assert_eq!(classify("SP_GET_BALANCE"), "Presenter Layer - Getter API");
        assert_eq!(classify("SP_PUT_POSTING_LOG"), "Utility - Service area"); // LOG wins first
        assert_eq!(classify("SP_UPDATE_RATES"), "Presenter Layer - Setter API");
    }

    #[test]
    fn functions_are_service_area() {
        assert_eq!(classify("FN_CALC_RATE"), "Utility - Service area");
    }

    #[test]
    fn validate_is_standardization_even_with_load() {
        assert_eq!(classify("SP_VALIDATE_LOAD"), "Utility - Standardization layer");
    }

    #[test]
    fn unknown_names_are_undefined() {
        assert_eq!(classify("SP_WHATEVER_XYZ"), "Undefined Activity");
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(classify("sp_clear_staging"), "ETL - Clear data area");
    }
}
