//! Kleine .gir-Dateinamen- und Versions-Helfer.

use std::path::Path;

/// Zerlegt "Name-Version.gir" in Name und Version. Ohne Bindestrich gibt
/// es nur den Namen, ohne ".gir"-Endung gar nichts.
pub fn gir_components(path: &Path) -> Option<(String, Option<String>)> {
    let basename = path.file_name()?.to_str()?;
    let stem = basename.strip_suffix(".gir")?;
    match stem.rfind('-') {
        Some(pos) => Some((stem[..pos].to_owned(), Some(stem[pos + 1..].to_owned()))),
        None => Some((stem.to_owned(), None)),
    }
}

/// Parst bis zu drei punktgetrennte Versions-Komponenten. Jede muss mit
/// mindestens einer Ziffer beginnen und unter 256 liegen; fehlende
/// Komponenten sind 0, Text hinter einer Komponente wird ignoriert
/// ("4-rc1" ist Version 4.0.0).
pub fn parse_version(version: &str) -> Option<(u16, u16, u16)> {
    let (major, rest) = take_component(version)?;
    let Some(rest) = rest.strip_prefix('.') else {
        return Some((major, 0, 0));
    };
    let (minor, rest) = take_component(rest)?;
    let Some(rest) = rest.strip_prefix('.') else {
        return Some((major, minor, 0));
    };
    let (micro, _) = take_component(rest)?;
    Some((major, minor, micro))
}

fn take_component(s: &str) -> Option<(u16, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let value: u64 = s[..end].parse().ok()?;
    if value >= 0x100 {
        return None;
    }
    Some((value as u16, &s[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_of_a_versioned_gir() {
        let got = gir_components(Path::new("/usr/share/gir-1.0/Gtk-4.0.gir"));
        assert_eq!(got, Some(("Gtk".into(), Some("4.0".into()))));
    }

    /// Der letzte Bindestrich trennt, Namen duerfen selbst welche tragen.
    #[test]
    fn components_split_at_the_last_dash() {
        let got = gir_components(Path::new("libxml2-2.0.gir"));
        assert_eq!(got, Some(("libxml2".into(), Some("2.0".into()))));
    }

    #[test]
    fn components_without_version() {
        let got = gir_components(Path::new("Gtk.gir"));
        assert_eq!(got, Some(("Gtk".into(), None)));
        assert_eq!(gir_components(Path::new("Gtk-4.0.xml")), None);
    }

    #[test]
    fn version_with_one_two_or_three_parts() {
        assert_eq!(parse_version("4"), Some((4, 0, 0)));
        assert_eq!(parse_version("4.12"), Some((4, 12, 0)));
        assert_eq!(parse_version("1.2.3"), Some((1, 2, 3)));
    }

    #[test]
    fn version_components_are_bytes() {
        assert_eq!(parse_version("255.255.255"), Some((255, 255, 255)));
        assert_eq!(parse_version("256"), None);
        assert_eq!(parse_version("1.999"), None);
    }

    #[test]
    fn version_tolerates_suffixes_but_not_garbage() {
        assert_eq!(parse_version("4-rc1"), Some((4, 0, 0)));
        assert_eq!(parse_version("1.2pre"), Some((1, 2, 0)));
        assert_eq!(parse_version(""), None);
        assert_eq!(parse_version("abc"), None);
        assert_eq!(parse_version("1."), None);
    }
}
