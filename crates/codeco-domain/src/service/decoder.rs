//! CODECO message decoder
//!
//! Lenient reader for externally sourced wire content. Whitespace and line
//! breaks between segments are tolerated, elements are trimmed, and tags the
//! decoder does not know are skipped.

use std::sync::LazyLock;

use codeco_types::{
    CodecError, DateTimeEntry, Location, Party, ParsedMessage, Reference,
};
use regex::Regex;

use crate::model::{Segment, SegmentModel, ELEMENT_SEPARATOR, SEGMENT_TERMINATOR};

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));
static SPACED_TERMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*'\s*").expect("static terminator pattern"));

/// Collapse whitespace runs to one space and drop spaces around `'`
pub fn normalize(content: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(content.trim(), " ");
    SPACED_TERMINATOR.replace_all(&collapsed, "'").into_owned()
}

/// Split normalized content into segments; blank fragments and fragments
/// without a tag are dropped
pub fn split_segments(content: &str) -> SegmentModel {
    content
        .split(SEGMENT_TERMINATOR)
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .filter_map(|raw| {
            let mut parts = raw.split(ELEMENT_SEPARATOR);
            let tag = parts.next()?.trim();
            if tag.is_empty() {
                return None;
            }
            Some(Segment::new(tag, parts.map(str::trim)))
        })
        .collect::<Vec<_>>()
        .into()
}

/// Decode wire content into a [`ParsedMessage`]
pub fn decode(content: &str) -> Result<ParsedMessage, CodecError> {
    let segments = split_segments(&normalize(content));
    if segments.is_empty() {
        return Err(CodecError::NoSegments);
    }
    log::trace!("Decoding {} segments", segments.len());

    let mut parsed = ParsedMessage::default();
    for segment in segments.segments() {
        match segment.tag.as_str() {
            "UNB" => read_unb(segment, &mut parsed),
            "UNH" => read_unh(segment, &mut parsed),
            "BGM" => {
                let header = &mut parsed.header;
                header.document_code = owned(segment.element(0));
                header.document_number = owned(segment.element(1));
                header.function_code = owned(segment.element(2));
            }
            "DTM" => parsed.dates.push(DateTimeEntry {
                qualifier: segment.component(0, 0).to_string(),
                value: segment.component(0, 1).to_string(),
                format: segment.component(0, 2).to_string(),
            }),
            "NAD" => parsed.parties.push(Party {
                qualifier: segment.element(0).to_string(),
                id: segment.element(1).to_string(),
                name: segment.non_empty_element(3).map(str::to_string),
            }),
            "EQD" => {
                let details = &mut parsed.container_details;
                details.number = owned(segment.element(1));
                let size_type = segment.component(2, 0);
                // "40EM": leading digits are the size, the rest the type
                let split = size_type
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(size_type.len());
                details.size = owned(&size_type[..split]);
                details.equipment_type = owned(&size_type[split..]);
                details.status = owned(segment.element(5));
            }
            // Legacy container segment
            "COD" => {
                let details = &mut parsed.container_details;
                details.number = owned(segment.element(0));
                details.size = owned(segment.element(1));
                details.status = owned(segment.element(2));
            }
            "RFF" => parsed.references.push(Reference {
                qualifier: segment.component(0, 0).to_string(),
                value: segment.component(0, 1).to_string(),
            }),
            "LOC" => parsed.locations.push(Location {
                qualifier: segment.element(0).to_string(),
                id: segment.element(1).to_string(),
                detail: segment.non_empty_element(2).map(str::to_string),
            }),
            "UNT" => {
                let info = &mut parsed.message_info;
                info.segment_count = owned(segment.element(0));
                info.message_reference_trailer = owned(segment.element(1));
            }
            "UNZ" => {
                let info = &mut parsed.message_info;
                info.interchange_control_count = owned(segment.element(0));
                info.interchange_control_ref_trailer = owned(segment.element(1));
            }
            _ => {}
        }
    }

    Ok(parsed)
}

fn owned(value: &str) -> Option<String> {
    Some(value.to_string()).filter(|v| !v.is_empty())
}

/// UNB comes in two layouts: `YYMMDD:HHMM+ref` (date and time as one
/// composite) or `YYMMDD+HHMM+ref`.
fn read_unb(segment: &Segment, parsed: &mut ParsedMessage) {
    let info = &mut parsed.message_info;
    info.syntax_identifier = owned(segment.component(0, 0));
    info.syntax_version = owned(segment.component(0, 1));
    info.sender = owned(segment.element(1));
    info.receiver = owned(segment.element(2));
    if segment.element(3).contains(':') {
        info.date = owned(segment.component(3, 0));
        info.time = owned(segment.component(3, 1));
        info.interchange_control_ref = owned(segment.element(4));
    } else {
        info.date = owned(segment.element(3));
        info.time = owned(segment.element(4));
        info.interchange_control_ref = owned(segment.element(5));
    }
}

fn read_unh(segment: &Segment, parsed: &mut ParsedMessage) {
    let info = &mut parsed.message_info;
    info.message_reference = owned(segment.element(0));
    info.message_type = owned(segment.component(1, 0));
    info.message_version = owned(segment.component(1, 1));
    info.message_release = owned(segment.component(1, 2));
    info.controlling_agency = owned(segment.component(1, 3));
    info.association_code = owned(segment.component(1, 4));
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "UNB+UNOA:1+MANTRA+ONEY+260205:1428+MANTRA0205'\
        UNH+COD02051428+CODECO:D:95B:UN:ITG14'\
        BGM+36+TRHU687548302051428+9'\
        FTX+AAI'\
        TDT+1++3+31'\
        NAD+MS+MANTRA'\
        NAD+CF+ONEY:160:20'\
        EQD+CN+TRHU6875483+40EM:102:5+++4'\
        RFF+BN:BK123456'\
        DTM+203:202602050302:203'\
        LOC+165+CIABJ:139:6+CIABJ32:STO:ZZZ'\
        CNT+16:1'\
        UNT+12+COD02051428'\
        UNZ+1+MANTRA0205'";

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  UNH+1 ' \n\n BGM+36  '\r\n"), "UNH+1'BGM+36'");
        assert_eq!(normalize("FTX+A   B'"), "FTX+A B'");
    }

    #[test]
    fn test_split_keeps_empty_elements() {
        let model = split_segments("TDT+1++3+31'");
        assert_eq!(model.segments()[0].elements, vec!["1", "", "3", "31"]);
    }

    #[test]
    fn test_decode_envelope() {
        let parsed = decode(SAMPLE).unwrap();
        let info = &parsed.message_info;
        assert_eq!(info.syntax_identifier.as_deref(), Some("UNOA"));
        assert_eq!(info.syntax_version.as_deref(), Some("1"));
        assert_eq!(info.sender.as_deref(), Some("MANTRA"));
        assert_eq!(info.receiver.as_deref(), Some("ONEY"));
        assert_eq!(info.date.as_deref(), Some("260205"));
        assert_eq!(info.time.as_deref(), Some("1428"));
        assert_eq!(info.interchange_control_ref.as_deref(), Some("MANTRA0205"));
        assert_eq!(info.message_reference.as_deref(), Some("COD02051428"));
        assert_eq!(info.message_type.as_deref(), Some("CODECO"));
        assert_eq!(info.message_release.as_deref(), Some("95B"));
        assert_eq!(info.association_code.as_deref(), Some("ITG14"));
        assert_eq!(info.segment_count.as_deref(), Some("12"));
        assert_eq!(info.interchange_control_ref_trailer.as_deref(), Some("MANTRA0205"));
    }

    #[test]
    fn test_decode_body() {
        let parsed = decode(SAMPLE).unwrap();
        assert_eq!(parsed.header.document_code.as_deref(), Some("36"));
        assert_eq!(parsed.header.function_code.as_deref(), Some("9"));
        assert_eq!(parsed.container_details.number.as_deref(), Some("TRHU6875483"));
        assert_eq!(parsed.container_details.size.as_deref(), Some("40"));
        assert_eq!(parsed.container_details.equipment_type.as_deref(), Some("EM"));
        assert_eq!(parsed.container_details.status.as_deref(), Some("4"));

        assert_eq!(parsed.parties.len(), 2);
        assert_eq!(parsed.party("CF").unwrap().id, "ONEY:160:20");

        let dtm = parsed.date("203").unwrap();
        assert_eq!(dtm.value, "202602050302");
        assert_eq!(dtm.format, "203");

        let loc = parsed.location("165").unwrap();
        assert_eq!(loc.id, "CIABJ:139:6");
        assert_eq!(loc.detail.as_deref(), Some("CIABJ32:STO:ZZZ"));

        assert_eq!(parsed.references[0].qualifier, "BN");
        assert_eq!(parsed.references[0].value, "BK123456");
        assert!(parsed.measurements.is_empty());
    }

    #[test]
    fn test_decode_split_date_time_layout() {
        let parsed = decode("UNB+UNOC:3+SND+RCV+260205+1428+REF01'UNZ+1+REF01'").unwrap();
        assert_eq!(parsed.message_info.date.as_deref(), Some("260205"));
        assert_eq!(parsed.message_info.time.as_deref(), Some("1428"));
        assert_eq!(parsed.message_info.interchange_control_ref.as_deref(), Some("REF01"));
    }

    #[test]
    fn test_decode_legacy_cod_and_nad_name() {
        let parsed = decode("COD+ABCU1234567+20+FULL'NAD+CA+TRUCKCO++ACME HAULAGE'").unwrap();
        assert_eq!(parsed.container_details.number.as_deref(), Some("ABCU1234567"));
        assert_eq!(parsed.container_details.status.as_deref(), Some("FULL"));
        assert_eq!(parsed.parties[0].name.as_deref(), Some("ACME HAULAGE"));
    }

    #[test]
    fn test_decode_tolerates_line_breaks() {
        let spaced = SAMPLE.replace('\'', "'\r\n  ");
        assert_eq!(decode(&spaced).unwrap(), decode(SAMPLE).unwrap());
    }

    #[test]
    fn test_unknown_tags_skipped() {
        let parsed = decode("XYZ+1+2'MEA+AAE+G+KGM:2000'").unwrap();
        assert_eq!(parsed, ParsedMessage::default());
    }

    #[test]
    fn test_decode_is_repeatable() {
        assert_eq!(decode(SAMPLE).unwrap(), decode(SAMPLE).unwrap());
    }

    #[test]
    fn test_empty_content_fails() {
        assert!(matches!(decode(""), Err(CodecError::NoSegments)));
        assert!(matches!(decode("  ' \n '  "), Err(CodecError::NoSegments)));
    }
}
