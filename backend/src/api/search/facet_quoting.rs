//! Quoting of facet values used as `qf` filter terms.

/// Facets sent as dedicated API parameters instead of `qf` terms.
pub const STANDALONE_FACETS: [&str; 4] = ["COLOURPALETTE", "MEDIA", "REUSABILITY", "THUMBNAIL"];

/// Media facets take raw, unquoted values.
pub const MEDIA_FACETS: [&str; 14] = [
    "COLOURPALETTE",
    "IMAGE_ASPECTRATIO",
    "IMAGE_COLOR",
    "IMAGE_COLOUR",
    "IMAGE_GRAYSCALE",
    "IMAGE_GREYSCALE",
    "IMAGE_SIZE",
    "MEDIA",
    "MIME_TYPE",
    "SOUND_DURATION",
    "SOUND_HQ",
    "TEXT_FULLTEXT",
    "VIDEO_DURATION",
    "VIDEO_HD",
];

pub fn is_standalone_facet(field: &str) -> bool {
    STANDALONE_FACETS.contains(&field)
}

pub fn quote_facet_value(field: &str, value: &str) -> String {
    if MEDIA_FACETS.contains(&field) || value.contains('*') {
        return value.to_string();
    }
    format!("\"{}\"", value.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_facet_unquoted() {
        assert_eq!(quote_facet_value("MEDIA", "abc"), "abc");
        assert_eq!(quote_facet_value("MIME_TYPE", "image/jpeg"), "image/jpeg");
    }

    #[test]
    fn test_wildcard_unquoted() {
        assert_eq!(quote_facet_value("TEXT", "a*"), "a*");
        assert_eq!(quote_facet_value("PROVIDER", "*"), "*");
    }

    #[test]
    fn test_quotes_escaped() {
        assert_eq!(quote_facet_value("TEXT", "say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote_facet_value("COUNTRY", "france"), "\"france\"");
        assert_eq!(quote_facet_value("COUNTRY", ""), "\"\"");
    }

    #[test]
    fn test_standalone_set() {
        assert!(is_standalone_facet("REUSABILITY"));
        assert!(!is_standalone_facet("TYPE"));
        assert!(!is_standalone_facet("media"));
    }
}
