use std::future::Future;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Turns a title into a URL slug: lowercase ASCII letters and digits joined by
/// single hyphens. Diacritics are stripped, and `ł` (which has no Unicode
/// decomposition) is mapped to `l`.
pub fn slugify(title: &str) -> String {
    let folded: String = title
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c == 'ł' { 'l' } else { c })
        .collect();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_hyphen = false;
    for c in folded.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Finds the first free slug for `title`, appending `-1`, `-2`, ... on
/// collision. `is_taken` is consulted again after every attempt.
pub async fn unique_slug<F, Fut, E>(title: &str, fallback: &str, mut is_taken: F) -> Result<String, E>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let mut base = slugify(title);
    if base.is_empty() {
        base = fallback.to_string();
    }

    let mut candidate = base.clone();
    let mut suffix = 0;
    while is_taken(candidate.clone()).await? {
        suffix += 1;
        candidate = format!("{}-{}", base, suffix);
    }
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn strips_polish_diacritics() {
        assert_eq!(slugify("Ważne ogłoszenie"), "wazne-ogloszenie");
        assert_eq!(slugify("ŁÓDŹ, Żółć & Gęś"), "lodz-zolc-ges");
        assert_eq!(slugify("Boże Ciało 2025"), "boze-cialo-2025");
    }

    #[test]
    fn collapses_and_trims_separators() {
        assert_eq!(slugify("  --Hello,   World!!  "), "hello-world");
        assert_eq!(slugify("!!!"), "");
    }

    #[tokio::test]
    async fn appends_incrementing_suffix() {
        let taken: HashSet<&str> = ["wazne-ogloszenie", "wazne-ogloszenie-1"].into_iter().collect();
        let slug = unique_slug::<_, _, ()>("Ważne ogłoszenie", "news", |candidate| {
            let hit = taken.contains(candidate.as_str());
            async move { Ok(hit) }
        })
        .await
        .unwrap();
        assert_eq!(slug, "wazne-ogloszenie-2");
    }

    #[tokio::test]
    async fn empty_titles_use_fallback() {
        let slug = unique_slug::<_, _, ()>("???", "news", |_| async { Ok(false) })
            .await
            .unwrap();
        assert_eq!(slug, "news");
    }
}
