/// Normalize a raw service image path into just the executable path.
///
/// Service image paths come in two forms: quoted
/// (`"C:\Program Files\Foo\foo.exe" -arg`) and unquoted
/// (`C:\Windows\system32\svchost.exe -k netsvcs`). Quoted paths keep their
/// embedded spaces; unquoted paths end at the first space.
pub fn clean_image_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(rest) = trimmed.strip_prefix('"') {
        let path = match rest.find('"') {
            Some(end) => &rest[..end],
            None => rest,
        };
        if path.is_empty() {
            return None;
        }
        return Some(path.to_string());
    }

    trimmed.split(' ').next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_path_passes_through() {
        assert_eq!(
            clean_image_path(r"C:\Windows\system32\spoolsv.exe").as_deref(),
            Some(r"C:\Windows\system32\spoolsv.exe")
        );
    }

    #[test]
    fn unquoted_arguments_are_dropped() {
        assert_eq!(
            clean_image_path(r"C:\Windows\system32\svchost.exe -k netsvcs -p").as_deref(),
            Some(r"C:\Windows\system32\svchost.exe")
        );
    }

    #[test]
    fn quoted_path_keeps_spaces() {
        assert_eq!(
            clean_image_path(r#""C:\Program Files\Foo Bar\foo.exe" --service"#).as_deref(),
            Some(r"C:\Program Files\Foo Bar\foo.exe")
        );
    }

    #[test]
    fn unterminated_quote_keeps_the_rest() {
        assert_eq!(
            clean_image_path(r#""C:\Program Files\foo.exe"#).as_deref(),
            Some(r"C:\Program Files\foo.exe")
        );
    }

    #[test]
    fn empty_input_is_none() {
        assert_eq!(clean_image_path(""), None);
        assert_eq!(clean_image_path("   "), None);
        assert_eq!(clean_image_path("\"\""), None);
    }
}
