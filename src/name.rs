//! Conversion between zone-relative and fully-qualified domain names.
//!
//! Record names in this crate are zone-relative (`"www"`, `"@"` for the zone
//! apex), while zones themselves use the trailing-dot FQDN convention
//! (`"example.com."`). These helpers map between the two forms. Both functions
//! are pure and total: edge cases fall back to a documented result instead of
//! returning an error.

/// Converts a fully-qualified domain name into a name relative to `zone`.
///
/// Trailing dots are stripped from both inputs. If the stripped name equals
/// the zone, `"@"` is returned. If `fqdn` is not inside `zone`, it is returned
/// unchanged (minus any trailing dot).
///
/// ```
/// use zonekit::name::relative_name;
///
/// assert_eq!(relative_name("sub.example.com.", "example.com."), "sub");
/// assert_eq!(relative_name("example.com.", "example.com."), "@");
/// ```
pub fn relative_name(fqdn: &str, zone: &str) -> String {
    let name = fqdn.trim_end_matches('.');
    let zone = zone.trim_end_matches('.');

    // Only strip the zone when it sits on a label boundary, so that
    // "www.notexample.com" is not mangled by zone "example.com".
    let rel = if name == zone {
        ""
    } else {
        name.strip_suffix(zone)
            .and_then(|prefix| prefix.strip_suffix('.'))
            .unwrap_or(name)
    };

    if rel.is_empty() && !fqdn.is_empty() && !zone.is_empty() {
        "@".to_string()
    } else {
        rel.to_string()
    }
}

/// Converts a zone-relative name into a fully-qualified domain name.
///
/// If `zone` is empty, `name` is returned with surrounding dots trimmed. An
/// empty name or `"@"` yields the zone verbatim. Otherwise `name` gains a
/// trailing dot (if absent) and is concatenated with `zone`.
///
/// ```
/// use zonekit::name::absolute_name;
///
/// assert_eq!(absolute_name("sub", "example.com."), "sub.example.com.");
/// assert_eq!(absolute_name("@", "example.com."), "example.com.");
/// ```
pub fn absolute_name(name: &str, zone: &str) -> String {
    if zone.is_empty() {
        return name.trim_matches('.').to_string();
    }
    if name.is_empty() || name == "@" {
        return zone.to_string();
    }
    if name.ends_with('.') {
        format!("{name}{zone}")
    } else {
        format!("{name}.{zone}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- relative_name ----

    #[test]
    fn relative_strips_zone_suffix() {
        assert_eq!(relative_name("sub.example.com.", "example.com."), "sub");
    }

    #[test]
    fn relative_apex_is_at() {
        assert_eq!(relative_name("example.com.", "example.com."), "@");
        assert_eq!(relative_name("example.com", "example.com."), "@");
    }

    #[test]
    fn relative_multi_label() {
        assert_eq!(
            relative_name("a.b.example.com.", "example.com."),
            "a.b"
        );
    }

    #[test]
    fn relative_outside_zone_unchanged() {
        assert_eq!(relative_name("other.net.", "example.com."), "other.net");
    }

    #[test]
    fn relative_respects_label_boundary() {
        assert_eq!(
            relative_name("www.notexample.com.", "example.com."),
            "www.notexample.com"
        );
    }

    #[test]
    fn relative_empty_fqdn() {
        assert_eq!(relative_name("", "example.com."), "");
    }

    #[test]
    fn relative_empty_zone() {
        assert_eq!(relative_name("www.example.com.", ""), "www.example.com");
    }

    // ---- absolute_name ----

    #[test]
    fn absolute_appends_zone() {
        assert_eq!(absolute_name("sub", "example.com."), "sub.example.com.");
    }

    #[test]
    fn absolute_at_is_zone() {
        assert_eq!(absolute_name("@", "example.com."), "example.com.");
    }

    #[test]
    fn absolute_empty_name_is_zone() {
        assert_eq!(absolute_name("", "example.com."), "example.com.");
    }

    #[test]
    fn absolute_name_with_trailing_dot() {
        assert_eq!(absolute_name("sub.", "example.com."), "sub.example.com.");
    }

    #[test]
    fn absolute_empty_zone_trims_dots() {
        assert_eq!(absolute_name(".www.", ""), "www");
    }

    // ---- inverse property ----

    #[test]
    fn relative_inverts_absolute() {
        for name in ["www", "sub.deep", "_sip._tcp", "x"] {
            for zone in ["example.com.", "zone.test.", "a.b.c."] {
                assert_eq!(
                    relative_name(&absolute_name(name, zone), zone),
                    name,
                    "round trip failed for {name} in {zone}"
                );
            }
        }
    }
}
