//! Document-number series arithmetic.

use crate::models::DocumentKind;

/// Produce the next number in a kind's series from the last issued one.
///
/// Numbers look like `FAC-0012`: a series prefix, a dash, and a numeric
/// suffix zero-padded to 4 digits. The prefix of the last number is kept as
/// is; a missing or unparsable last number starts the series at
/// `<PREFIX>-0001`. Uniqueness against concurrent issuers is not guaranteed
/// here; the store's last issued number is only a starting point.
pub fn next_document_number(kind: DocumentKind, last: Option<&str>) -> String {
    if let Some(last) = last {
        if let Some((prefix, suffix)) = last.rsplit_once('-') {
            if let Ok(n) = suffix.parse::<u32>() {
                return format!("{}-{:04}", prefix, n + 1);
            }
        }
    }
    format!("{}-0001", kind.series_prefix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_numeric_suffix() {
        assert_eq!(
            next_document_number(DocumentKind::Purchase, Some("FAC-0012")),
            "FAC-0013"
        );
        assert_eq!(
            next_document_number(DocumentKind::Receipt, Some("REC-0015")),
            "REC-0016"
        );
    }

    #[test]
    fn pads_to_four_digits() {
        assert_eq!(
            next_document_number(DocumentKind::Order, Some("PED-0009")),
            "PED-0010"
        );
        assert_eq!(
            next_document_number(DocumentKind::Order, Some("PED-0999")),
            "PED-1000"
        );
        assert_eq!(
            next_document_number(DocumentKind::Order, Some("PED-9998")),
            "PED-9999"
        );
    }

    #[test]
    fn starts_series_when_no_last_number() {
        assert_eq!(
            next_document_number(DocumentKind::Return, None),
            "DEV-0001"
        );
    }

    #[test]
    fn falls_back_on_unparsable_suffix() {
        assert_eq!(
            next_document_number(DocumentKind::Purchase, Some("FAC-00XY")),
            "FAC-0001"
        );
        assert_eq!(
            next_document_number(DocumentKind::Purchase, Some("garbage")),
            "FAC-0001"
        );
    }

    #[test]
    fn keeps_the_prefix_of_the_last_number() {
        assert_eq!(
            next_document_number(DocumentKind::Purchase, Some("REC-0001")),
            "REC-0002"
        );
    }
}
