//! Receipt formatting
//!
//! Renders a voter record as an ESC/POS control-code string ready for
//! chunked transmission. Formatting is pure: the same voter, branding,
//! language, and timestamp always produce the same payload.
//!
//! The Marathi variant passes free-text fields through a static
//! word-substitution table. The transform is best-effort and lossy:
//! unmapped words pass through unchanged, and identifiers (voter id,
//! booth number, phone) are never transliterated.

use crate::config::RECEIPT_FAMILY_LIMIT;
use crate::store::{BrandingConfig, VoterRecord};
use chrono::{DateTime, Utc};

// ESC/POS control sequences
const INIT: &str = "\x1b@";
const ALIGN_LEFT: &str = "\x1ba\x00";
const ALIGN_CENTER: &str = "\x1ba\x01";
const BOLD_ON: &str = "\x1bE\x01";
const BOLD_OFF: &str = "\x1bE\x00";
const DOUBLE_SIZE: &str = "\x1d!\x11";
const NORMAL_SIZE: &str = "\x1d!\x00";
const CUT: &str = "\x1dV\x01";

const RULE: &str = "--------------------------------\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptLanguage {
    English,
    Marathi,
}

struct Labels {
    slip_title: &'static str,
    name: &'static str,
    voter_id: &'static str,
    booth: &'static str,
    station: &'static str,
    voted: &'static str,
    pending: &'static str,
    address: &'static str,
    village: &'static str,
    taluka: &'static str,
    family: &'static str,
    more: &'static str,
    contact: &'static str,
    printed: &'static str,
}

const ENGLISH_LABELS: Labels = Labels {
    slip_title: "VOTER SLIP",
    name: "Name",
    voter_id: "Voter ID",
    booth: "Booth",
    station: "Polling Station",
    voted: "** VOTED **",
    pending: "** VOTE PENDING **",
    address: "Address",
    village: "Village",
    taluka: "Taluka",
    family: "Family",
    more: "more",
    contact: "Contact",
    printed: "Printed",
};

const MARATHI_LABELS: Labels = Labels {
    slip_title: "मतदार चिठ्ठी",
    name: "नाव",
    voter_id: "मतदार ओळखपत्र",
    booth: "बूथ",
    station: "मतदान केंद्र",
    voted: "** मतदान झाले **",
    pending: "** मतदान बाकी **",
    address: "पत्ता",
    village: "गाव",
    taluka: "तालुका",
    family: "कुटुंब",
    more: "अधिक",
    contact: "संपर्क",
    printed: "छापले",
};

/// Word-substitution table for the Marathi rendering. Keys are matched
/// case-insensitively against whole words; anything absent passes
/// through unchanged.
const TRANSLITERATION_TABLE: &[(&str, &str)] = &[
    ("road", "रोड"),
    ("nagar", "नगर"),
    ("colony", "कॉलनी"),
    ("ward", "वॉर्ड"),
    ("chowk", "चौक"),
    ("galli", "गल्ली"),
    ("street", "गल्ली"),
    ("house", "घर"),
    ("near", "जवळ"),
    ("school", "शाळा"),
    ("college", "कॉलेज"),
    ("temple", "मंदिर"),
    ("market", "बाजार"),
    ("station", "स्टेशन"),
    ("hall", "सभागृह"),
    ("office", "कार्यालय"),
    ("east", "पूर्व"),
    ("west", "पश्चिम"),
    ("north", "उत्तर"),
    ("south", "दक्षिण"),
    ("new", "नवीन"),
    ("old", "जुने"),
    ("main", "मुख्य"),
    ("village", "गाव"),
    ("taluka", "तालुका"),
    ("district", "जिल्हा"),
    ("patil", "पाटील"),
    ("deshmukh", "देशमुख"),
    ("jadhav", "जाधव"),
    ("pawar", "पवार"),
    ("kumar", "कुमार"),
    ("singh", "सिंग"),
    ("devi", "देवी"),
    ("bai", "बाई"),
];

/// Best-effort word-by-word transliteration. Lossy by design.
pub fn transliterate(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let key = word.to_lowercase();
            TRANSLITERATION_TABLE
                .iter()
                .find(|(english, _)| *english == key)
                .map(|(_, marathi)| *marathi)
                .unwrap_or(word)
        })
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Render a voter receipt. Pure; never fails on missing optional fields.
pub fn generate_receipt(
    voter: &VoterRecord,
    branding: &BrandingConfig,
    language: ReceiptLanguage,
    printed_at: DateTime<Utc>,
) -> String {
    let labels = match language {
        ReceiptLanguage::English => &ENGLISH_LABELS,
        ReceiptLanguage::Marathi => &MARATHI_LABELS,
    };
    let localize = |text: &str| -> String {
        match language {
            ReceiptLanguage::English => text.to_string(),
            ReceiptLanguage::Marathi => transliterate(text),
        }
    };

    let mut out = String::new();
    out.push_str(INIT);

    // Branding header
    out.push_str(ALIGN_CENTER);
    out.push_str(DOUBLE_SIZE);
    out.push_str(BOLD_ON);
    if !branding.party_name.is_empty() {
        out.push_str(&localize(&branding.party_name));
        out.push('\n');
    }
    out.push_str(NORMAL_SIZE);
    if !branding.leader_name.is_empty() {
        out.push_str(&localize(&branding.leader_name));
        out.push('\n');
    }
    out.push_str(BOLD_OFF);
    if !branding.slogan.is_empty() {
        out.push_str(&localize(&branding.slogan));
        out.push('\n');
    }
    out.push_str(labels.slip_title);
    out.push('\n');
    out.push_str(RULE);

    // Identity block. Voter id and booth number stay verbatim.
    out.push_str(ALIGN_LEFT);
    push_field(&mut out, labels.name, &localize(&voter.name));
    push_field(&mut out, labels.voter_id, &voter.voter_id);
    push_field(&mut out, labels.booth, &voter.booth_number);
    push_field(
        &mut out,
        labels.station,
        &localize(&voter.polling_station_address),
    );

    // Status banner
    out.push_str(ALIGN_CENTER);
    out.push_str(DOUBLE_SIZE);
    out.push_str(BOLD_ON);
    out.push_str(if voter.voted { labels.voted } else { labels.pending });
    out.push('\n');
    out.push_str(BOLD_OFF);
    out.push_str(NORMAL_SIZE);

    // Address block
    out.push_str(ALIGN_LEFT);
    push_field(&mut out, labels.address, &localize(&voter.address));
    push_field(&mut out, labels.village, &localize(&voter.village));
    push_field(&mut out, labels.taluka, &localize(&voter.taluka));

    // Family, capped with an overflow counter
    if !voter.family.is_empty() {
        out.push_str(BOLD_ON);
        out.push_str(labels.family);
        out.push_str(":\n");
        out.push_str(BOLD_OFF);
        for member in voter.family.iter().take(RECEIPT_FAMILY_LIMIT) {
            out.push_str("  ");
            out.push_str(&localize(&member.name));
            out.push('\n');
        }
        let overflow = voter.family.len().saturating_sub(RECEIPT_FAMILY_LIMIT);
        if overflow > 0 {
            out.push_str(&format!("  +{} {}\n", overflow, labels.more));
        }
    }

    // Footer
    out.push_str(RULE);
    out.push_str(ALIGN_CENTER);
    if !branding.call_to_action.is_empty() {
        out.push_str(&localize(&branding.call_to_action));
        out.push('\n');
    }
    if !branding.contact_phone.is_empty() {
        out.push_str(&format!("{}: {}\n", labels.contact, branding.contact_phone));
    }
    out.push_str(&format!(
        "{}: {}\n",
        labels.printed,
        printed_at.format("%d/%m/%Y %H:%M")
    ));

    out.push_str("\n\n\n");
    out.push_str(CUT);
    out
}

fn push_field(out: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    out.push_str(BOLD_ON);
    out.push_str(label);
    out.push_str(BOLD_OFF);
    out.push_str(": ");
    out.push_str(value);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FamilyMember;
    use chrono::TimeZone;

    fn test_voter() -> VoterRecord {
        VoterRecord {
            id: "a".to_string(),
            name: "Rita Patil".to_string(),
            voter_id: "ABC1234567".to_string(),
            booth_number: "5".to_string(),
            polling_station_address: "ZP School Shirpur".to_string(),
            address: "Ganesh Nagar Road".to_string(),
            village: "Shirpur".to_string(),
            taluka: "Shirpur".to_string(),
            voted: false,
            ..Default::default()
        }
    }

    fn test_branding() -> BrandingConfig {
        BrandingConfig {
            leader_name: "A. B. Patil".to_string(),
            party_name: "Jan Seva Party".to_string(),
            slogan: "Forward Together".to_string(),
            contact_phone: "1800-123-456".to_string(),
            ..Default::default()
        }
    }

    fn printed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_both_languages_keep_identity_verbatim() {
        let voter = test_voter();
        let branding = test_branding();

        for language in [ReceiptLanguage::English, ReceiptLanguage::Marathi] {
            let receipt = generate_receipt(&voter, &branding, language, printed_at());
            assert!(receipt.contains("ABC1234567"), "voter id must be verbatim");
            assert!(receipt.contains(": 5\n"), "booth number must be verbatim");
        }
    }

    #[test]
    fn test_missing_optional_fields_do_not_break_formatting() {
        let voter = VoterRecord {
            name: "Rita".to_string(),
            voter_id: "V1".to_string(),
            ..Default::default()
        };
        let branding = BrandingConfig::default();

        for language in [ReceiptLanguage::English, ReceiptLanguage::Marathi] {
            let receipt = generate_receipt(&voter, &branding, language, printed_at());
            assert!(receipt.contains("Rita"));
            assert!(receipt.contains("V1"));
            assert!(receipt.ends_with(CUT));
        }
    }

    #[test]
    fn test_status_banner() {
        let branding = test_branding();
        let mut voter = test_voter();

        let pending = generate_receipt(&voter, &branding, ReceiptLanguage::English, printed_at());
        assert!(pending.contains("** VOTE PENDING **"));

        voter.voted = true;
        let voted = generate_receipt(&voter, &branding, ReceiptLanguage::English, printed_at());
        assert!(voted.contains("** VOTED **"));
        assert!(!voted.contains("** VOTE PENDING **"));
    }

    #[test]
    fn test_family_overflow_counter() {
        let mut voter = test_voter();
        voter.family = (1..=5)
            .map(|i| FamilyMember {
                id: format!("f{}", i),
                name: format!("Member {}", i),
            })
            .collect();

        let receipt =
            generate_receipt(&voter, &test_branding(), ReceiptLanguage::English, printed_at());
        assert!(receipt.contains("Member 1"));
        assert!(receipt.contains("Member 3"));
        assert!(!receipt.contains("Member 4"));
        assert!(receipt.contains("+2 more"));
    }

    #[test]
    fn test_marathi_transliterates_free_text_only() {
        let mut voter = test_voter();
        // "ROAD" inside the voter id must never be transliterated
        voter.voter_id = "ROAD99".to_string();

        let receipt =
            generate_receipt(&voter, &test_branding(), ReceiptLanguage::Marathi, printed_at());

        assert!(receipt.contains("नगर रोड"), "address words map to Devanagari");
        assert!(receipt.contains("पाटील"), "mapped surname is substituted");
        assert!(receipt.contains("ROAD99"), "voter id passes through verbatim");
        assert!(receipt.contains("मतदार चिठ्ठी"));
    }

    #[test]
    fn test_transliteration_is_lossy_passthrough() {
        assert_eq!(transliterate("Ganesh Nagar Road"), "Ganesh नगर रोड");
        assert_eq!(transliterate(""), "");
        assert_eq!(transliterate("unmapped words stay"), "unmapped words stay");
    }

    #[test]
    fn test_generation_is_referentially_transparent() {
        let voter = test_voter();
        let branding = test_branding();

        let first = generate_receipt(&voter, &branding, ReceiptLanguage::Marathi, printed_at());
        let second = generate_receipt(&voter, &branding, ReceiptLanguage::Marathi, printed_at());
        assert_eq!(first, second);
    }
}
