//! Area attribute parsing with synonym folding.
//!
//! Attribute values are entered by agents and drift in casing and phrasing,
//! so matching is case-insensitive and folds known synonyms before giving up.

use shiftscope_shared::AreaKey;

/// Known synonym spellings, checked after exact label/slug matching.
const SYNONYMS: &[(&str, AreaKey)] = &[
    ("wallet api", AreaKey::WalletApi),
    ("walletapi", AreaKey::WalletApi),
    ("wallet-api", AreaKey::WalletApi),
    ("api", AreaKey::WalletApi),
    ("portfolio dashboard", AreaKey::Dashboard),
    ("portfolio", AreaKey::Dashboard),
    ("fraud", AreaKey::Security),
    ("phishing", AreaKey::Security),
    ("scam", AreaKey::Security),
    ("dev sdk", AreaKey::Sdk),
    ("developer sdk", AreaKey::Sdk),
    ("mm card", AreaKey::Card),
    ("metamask card", AreaKey::Card),
    ("on-ramp", AreaKey::Ramps),
    ("off-ramp", AreaKey::Ramps),
];

/// Parse a raw area attribute value. Returns `None` for values that match
/// neither a canonical area nor a known synonym.
pub fn parse_area(value: &str) -> Option<AreaKey> {
    let normalized = value.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }

    if let Ok(area) = normalized.parse::<AreaKey>() {
        return Some(area);
    }

    SYNONYMS
        .iter()
        .find(|(syn, _)| *syn == normalized)
        .map(|(_, area)| *area)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_labels_parse_case_insensitively() {
        assert_eq!(parse_area("Swaps"), Some(AreaKey::Swaps));
        assert_eq!(parse_area("swaps"), Some(AreaKey::Swaps));
        assert_eq!(parse_area("  SECURITY "), Some(AreaKey::Security));
        assert_eq!(parse_area("Wallet API"), Some(AreaKey::WalletApi));
    }

    #[test]
    fn synonyms_fold_to_canonical_areas() {
        assert_eq!(parse_area("walletapi"), Some(AreaKey::WalletApi));
        assert_eq!(parse_area("API"), Some(AreaKey::WalletApi));
        assert_eq!(parse_area("Portfolio Dashboard"), Some(AreaKey::Dashboard));
        assert_eq!(parse_area("Phishing"), Some(AreaKey::Security));
        assert_eq!(parse_area("MM Card"), Some(AreaKey::Card));
    }

    #[test]
    fn unknown_values_yield_none() {
        assert_eq!(parse_area("gift cards"), None);
        assert_eq!(parse_area(""), None);
        assert_eq!(parse_area("   "), None);
    }
}
