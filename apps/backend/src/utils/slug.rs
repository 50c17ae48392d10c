use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const MAX_SLUG_LEN: usize = 80;
const FALLBACK_SLUG: &str = "untitled";

/// Lower-case ASCII slug: accents are stripped, every other run of
/// non-alphanumerics becomes a single `-`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// `base`, or `base-N` for the smallest N >= 2 not in `taken`.
pub fn unique_slug(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|s| s == base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_titles() {
        assert_eq!(slugify("Kajian Rutin Ba'da Maghrib"), "kajian-rutin-ba-da-maghrib");
        assert_eq!(slugify("  Idul Fitri 1446 H  "), "idul-fitri-1446-h");
    }

    #[test]
    fn accents_are_stripped() {
        assert_eq!(slugify("Café Ramaḍān"), "cafe-ramadan");
    }

    #[test]
    fn nothing_usable_falls_back() {
        assert_eq!(slugify("!!!"), "untitled");
        assert_eq!(slugify("مسجد"), "untitled");
    }

    #[test]
    fn long_titles_are_cut_cleanly() {
        let slug = slugify(&"word ".repeat(40));
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn suffixes_skip_taken() {
        assert_eq!(unique_slug("infaq", &[]), "infaq");
        let taken = vec!["infaq".to_string(), "infaq-2".to_string()];
        assert_eq!(unique_slug("infaq", &taken), "infaq-3");
    }
}
