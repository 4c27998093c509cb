//! Structural validation of raw CODECO wire content
//!
//! Cheap substring checks run before parsing or transmitting. Every check
//! runs and reports independently; the validator never fails.

use codeco_types::ValidationReport;

use crate::model::{ELEMENT_SEPARATOR, SEGMENT_TERMINATOR};

/// Envelope, header and trailer markers that must be present
const REQUIRED_SEGMENTS: [(&str, &str); 4] = [
    ("UNB", "interchange header"),
    ("UNH", "message header"),
    ("UNT", "message trailer"),
    ("UNZ", "interchange trailer"),
];

/// Run every structural check on `content`
pub fn validate(content: &str) -> ValidationReport {
    let mut errors = Vec::new();

    if content.trim().is_empty() {
        errors.push("EDI content is empty".to_string());
    }

    for (tag, role) in REQUIRED_SEGMENTS {
        if !content.contains(&format!("{}{}", tag, ELEMENT_SEPARATOR)) {
            errors.push(format!("Missing {} segment ({})", tag, role));
        }
    }

    if !content.contains("CODECO") {
        errors.push("Not a CODECO message type".to_string());
    }

    if !content.contains(SEGMENT_TERMINATOR) {
        errors.push("Missing segment terminators (')".to_string());
    }

    let segments: Vec<&str> = content
        .split(SEGMENT_TERMINATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if let Some(bad) = segments.iter().find(|s| !s.contains(ELEMENT_SEPARATOR)) {
        errors.push(format!("Segment without element separator: '{}'", bad));
    }

    if let Some(error) = check_segment_count(&segments) {
        errors.push(error);
    }

    if let Some(error) = check_control_reference(&segments) {
        errors.push(error);
    }

    if !errors.is_empty() {
        log::warn!("EDI content failed {} structural check(s)", errors.len());
    }

    ValidationReport::from_errors(errors)
}

fn find_segment<'a>(segments: &[&'a str], tag: &str) -> Option<(usize, &'a str)> {
    let prefix = format!("{}{}", tag, ELEMENT_SEPARATOR);
    segments
        .iter()
        .position(|s| s.starts_with(&prefix))
        .map(|i| (i, segments[i]))
}

/// Field `index` of a raw segment, counting the tag as field 0
fn field(segment: &str, index: usize) -> &str {
    segment
        .split(ELEMENT_SEPARATOR)
        .nth(index)
        .map(str::trim)
        .unwrap_or("")
}

/// UNT declared count against the UNH..UNT inclusive span.
/// Skipped when either segment is missing; presence is reported separately.
fn check_segment_count(segments: &[&str]) -> Option<String> {
    let (unh, _) = find_segment(segments, "UNH")?;
    let (unt, trailer) = find_segment(segments, "UNT")?;

    let declared = field(trailer, 1);
    let Ok(declared) = declared.parse::<usize>() else {
        return Some(format!("Invalid segment count in UNT segment: '{}'", declared));
    };

    let actual = if unt >= unh { unt - unh + 1 } else { 0 };
    (declared != actual).then(|| {
        format!(
            "Segment count mismatch: UNT declares {} but message contains {} segments (UNH through UNT)",
            declared, actual
        )
    })
}

/// Interchange reference in UNB (after syntax, sender, receiver, date:time)
/// against the one in UNZ
fn check_control_reference(segments: &[&str]) -> Option<String> {
    let (_, header) = find_segment(segments, "UNB")?;
    let (_, trailer) = find_segment(segments, "UNZ")?;

    let opening = field(header, 5);
    let closing = field(trailer, 2);
    (opening != closing).then(|| {
        format!(
            "Interchange control reference mismatch: UNB has '{}' but UNZ has '{}'",
            opening, closing
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "UNB+UNOA:1+MANTRA+ONEY+260205:1428+MANTRA0205'\
        UNH+COD02051428+CODECO:D:95B:UN:ITG14'\
        BGM+36+TRHU687548302051428+9'\
        FTX+AAI'\
        TDT+1++3+31'\
        NAD+MS+MANTRA'\
        NAD+CF+ONEY:160:20'\
        EQD+CN+TRHU6875483+40EM:102:5+++4'\
        DTM+203:202602050302:203'\
        LOC+165+CIABJ:139:6+CIABJ32:STO:ZZZ'\
        CNT+16:1'\
        UNT+11+COD02051428'\
        UNZ+1+MANTRA0205'";

    #[test]
    fn test_valid_message() {
        let report = validate(VALID);
        assert!(report.is_valid, "{:?}", report.errors);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_empty_content() {
        let report = validate("   ");
        assert!(!report.is_valid);
        assert_eq!(report.errors[0], "EDI content is empty");
        // Remaining checks still run
        assert!(report.errors.iter().any(|e| e.contains("UNB")));
        assert!(report.errors.iter().any(|e| e.contains("CODECO")));
    }

    #[test]
    fn test_truncated_message() {
        let report = validate(
            "UNB+UNOA:1+MANTRA+ONEY+260205:1428+MANTRA0205'\
             UNH+COD02051428+CODECO:D:95B:UN:ITG14'\
             BGM+36+TRHU687548302051428+9'",
        );
        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e.contains("UNT")));
        assert!(report.errors.iter().any(|e| e.contains("UNZ")));
    }

    #[test]
    fn test_count_mismatch() {
        let wire = "UNB+UNOA:1+S+R+260205:1428+S0205'\
            UNH+COD1+CODECO:D:95B:UN:ITG14'\
            BGM+36+X+9'\
            FTX+AAI'\
            TDT+1++3+31'\
            NAD+MS+S'\
            CNT+16:1'\
            UNT+5+COD1'\
            UNZ+1+S0205'";
        let report = validate(wire);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains('5'));
        assert!(report.errors[0].contains('7'));
    }

    #[test]
    fn test_non_numeric_count() {
        let report = validate(&VALID.replace("UNT+11+", "UNT+XI+"));
        assert_eq!(
            report.errors,
            vec!["Invalid segment count in UNT segment: 'XI'".to_string()]
        );
    }

    #[test]
    fn test_reference_mismatch() {
        let report = validate(&VALID.replace("UNZ+1+MANTRA0205", "UNZ+1+MANTRA0206"));
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("MANTRA0205"));
        assert!(report.errors[0].contains("MANTRA0206"));
    }

    #[test]
    fn test_segment_without_separator() {
        let report = validate(&VALID.replace("FTX+AAI'", "FTX'"));
        // The UNT count still matches; only the separator check fails
        assert_eq!(
            report.errors,
            vec!["Segment without element separator: 'FTX'".to_string()]
        );
    }

    #[test]
    fn test_not_codeco() {
        let report = validate(&VALID.replace("CODECO", "COPARN"));
        assert_eq!(report.errors, vec!["Not a CODECO message type".to_string()]);
    }

    #[test]
    fn test_line_broken_content() {
        let report = validate(&VALID.replace('\'', "'\n"));
        assert!(report.is_valid, "{:?}", report.errors);
    }
}
