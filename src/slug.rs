//! URL slug generation shared by cars, blogs and locations.
//!
//! Slugs are regenerated from the display name on every save, so whatever
//! the client sends in a `slug` field is ignored by the admin handlers.

/// Lower-cases, turns whitespace runs into single hyphens and strips
/// everything outside `[a-z0-9-]`. Idempotent.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_hyphen = true; // swallow leading hyphens

    for ch in input.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            last_was_hyphen = false;
        } else if ch.is_whitespace() || ch == '-' {
            if !last_was_hyphen {
                out.push('-');
                last_was_hyphen = true;
            }
        }
        // anything else is dropped
    }

    while out.ends_with('-') {
        out.pop();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn strips_punctuation_and_lowercases() {
        assert_eq!(slugify("Hyundai i20!"), "hyundai-i20");
        assert_eq!(slugify("Bandra (West), Mumbai"), "bandra-west-mumbai");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(slugify("Maruti   Suzuki\tSwift"), "maruti-suzuki-swift");
    }

    #[test]
    fn idempotent() {
        for input in ["Hyundai i20!", "  -- already-a-slug --  ", "3 BHK @ Powai"] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn trims_boundary_hyphens() {
        assert_eq!(slugify("  !leading and trailing?  "), "leading-and-trailing");
        assert_eq!(slugify("???"), "");
    }
}
