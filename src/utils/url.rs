/// Percent-encode a relative path for use in a URL, keeping `/` separators.
///
/// ```
/// use paleoanthro::utils::encode_path;
///
/// assert_eq!(encode_path("PA2014/my file.pdf"), "PA2014/my%20file.pdf");
/// ```
pub fn encode_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                encoded.push(byte as char);
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path("PA2014/PA20140001.pdf"), "PA2014/PA20140001.pdf");
        assert_eq!(encode_path("my file.pdf"), "my%20file.pdf");
        assert_eq!(encode_path("é.pdf"), "%C3%A9.pdf");
        assert_eq!(encode_path("a#b?c.pdf"), "a%23b%3Fc.pdf");
    }
}
