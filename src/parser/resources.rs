use unicode_normalization::UnicodeNormalization;
use url::Url;

use crate::cell::Cell;
use crate::model::{Resource, ResourceKind};

/// Label fragments, matched case-insensitively, in priority order.
const KIND_VOCABULARY: &[(&str, ResourceKind)] = &[
    ("tài liệu", ResourceKind::Document),
    ("bài giảng", ResourceKind::Lecture),
    ("đáp án", ResourceKind::HandwrittenSolution),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub resource: Resource,
    /// Link text that was present but could not be parsed as a URL.
    pub rejected_link: Option<String>,
}

/// Read one resource-slot cell. Returns `None` for an empty slot.
pub fn extract(cell: &Cell) -> Option<Extraction> {
    let label = cell.text().trim();
    let link = cell.link().map(str::trim).filter(|l| !l.is_empty());

    if label.is_empty() && link.is_none() {
        return None;
    }

    let (url, rejected_link) = match link {
        Some(l) if is_valid_url(l) => (Some(l.to_string()), None),
        Some(l) => (None, Some(l.to_string())),
        None => (None, None),
    };

    Some(Extraction {
        resource: Resource {
            kind: kind_of(label),
            label: label.to_string(),
            url,
        },
        rejected_link,
    })
}

/// Labels typed on different systems mix composed and decomposed diacritics,
/// so the label is NFC-composed before matching.
pub fn kind_of(label: &str) -> ResourceKind {
    let lower = label.nfc().collect::<String>().to_lowercase();
    KIND_VOCABULARY
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, kind)| *kind)
        .unwrap_or(ResourceKind::Unknown)
}

/// Syntactic check only; nothing is fetched.
pub fn is_valid_url(link: &str) -> bool {
    Url::parse(link).is_ok_and(|u| !u.cannot_be_a_base() || u.scheme() == "mailto")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(label: &str, hyperlink: Option<&str>, rich_link: Option<&str>) -> Cell {
        Cell {
            text: Some(label.to_string()),
            hyperlink: hyperlink.map(str::to_string),
            rich_link: rich_link.map(str::to_string),
            ..Cell::default()
        }
    }

    #[test]
    fn vocabulary() {
        assert_eq!(kind_of("Tài liệu"), ResourceKind::Document);
        assert_eq!(kind_of("TÀI LIỆU BUỔI 3"), ResourceKind::Document);
        assert_eq!(kind_of("Bài giảng 02"), ResourceKind::Lecture);
        assert_eq!(kind_of("Đáp án viết tay"), ResourceKind::HandwrittenSolution);
        assert_eq!(kind_of("Link Zoom"), ResourceKind::Unknown);
    }

    #[test]
    fn decomposed_diacritics_still_match() {
        assert_eq!(kind_of("Ta\u{300}i lie\u{323}\u{302}u"), ResourceKind::Document);
        assert_eq!(kind_of("BA\u{300}I GIA\u{309}NG 01"), ResourceKind::Lecture);
        assert_eq!(kind_of("\u{110}a\u{301}p a\u{301}n"), ResourceKind::HandwrittenSolution);
    }

    #[test]
    fn document_with_hyperlink() {
        let e = extract(&cell("Tài liệu", Some("https://drive.google.com/file/d/1"), None)).unwrap();
        assert_eq!(e.resource.kind, ResourceKind::Document);
        assert_eq!(e.resource.url.as_deref(), Some("https://drive.google.com/file/d/1"));
        assert!(e.rejected_link.is_none());
    }

    #[test]
    fn placeholder_without_link_is_valid() {
        let e = extract(&cell("Tài liệu", None, None)).unwrap();
        assert_eq!(
            e.resource,
            Resource {
                kind: ResourceKind::Document,
                label: "Tài liệu".into(),
                url: None,
            }
        );
        assert!(e.rejected_link.is_none());
    }

    #[test]
    fn rich_text_link_is_the_fallback() {
        let e = extract(&cell("Bài giảng", None, Some("https://youtu.be/xcJVua5rnb0"))).unwrap();
        assert_eq!(e.resource.url.as_deref(), Some("https://youtu.be/xcJVua5rnb0"));

        let both = extract(&cell("Bài giảng", Some("https://youtu.be/a"), Some("https://youtu.be/b"))).unwrap();
        assert_eq!(both.resource.url.as_deref(), Some("https://youtu.be/a"));
    }

    #[test]
    fn malformed_hyperlink_is_rejected_not_replaced() {
        let e = extract(&cell("Đáp án", Some("drive.google.com/abc"), Some("https://ok.example/x"))).unwrap();
        assert_eq!(e.resource.url, None);
        assert_eq!(e.rejected_link.as_deref(), Some("drive.google.com/abc"));
    }

    #[test]
    fn malformed_run_link_is_rejected() {
        let e = extract(&cell("Bài giảng", None, Some("youtu.be/xcJVua5rnb0"))).unwrap();
        assert_eq!(e.resource.kind, ResourceKind::Lecture);
        assert_eq!(e.resource.url, None);
        assert_eq!(e.rejected_link.as_deref(), Some("youtu.be/xcJVua5rnb0"));
    }

    #[test]
    fn blank_hyperlink_falls_back_to_run_link() {
        let e = extract(&cell("Bài giảng", Some(""), Some("https://youtu.be/a"))).unwrap();
        assert_eq!(e.resource.url.as_deref(), Some("https://youtu.be/a"));
        assert!(e.rejected_link.is_none());
    }

    #[test]
    fn empty_slot_yields_nothing() {
        assert!(extract(&Cell::default()).is_none());
        assert!(extract(&cell("  \n", None, None)).is_none());
    }

    #[test]
    fn bare_link_is_unknown_kind() {
        let e = extract(&cell("", Some("https://example.com/a"), None)).unwrap();
        assert_eq!(e.resource.kind, ResourceKind::Unknown);
        assert_eq!(e.resource.label, "");
    }

    #[test]
    fn url_syntax() {
        assert!(is_valid_url("https://youtu.be/xcJVua5rnb0"));
        assert!(is_valid_url("mailto:giangvien@example.com"));
        assert!(!is_valid_url("youtu.be/xcJVua5rnb0"));
        assert!(!is_valid_url("not a url"));
    }
}
