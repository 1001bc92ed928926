use std::fmt::Debug;

/// Redacts a secret when formatting it for logs or Debug output.
///
/// - Inputs shorter than 12 characters are redacted entirely.
/// - Longer inputs keep their first and last three characters, which is
///   enough to tell two secrets apart without leaking either.
///
/// Passwords, session credentials and action tokens must only ever reach a
/// log line through this wrapper.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use std::fmt::Write;

        // Secrets are not guaranteed to be ASCII, so count and slice by
        // characters, never by bytes.
        let length = self.0.chars().count();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 {
            f.write_str("***")
        } else {
            for c in self.0.chars().take(3) {
                f.write_char(c)?;
            }
            f.write_str("***")?;
            for c in self.0.chars().skip(length - 3) {
                f.write_char(c)?;
            }
            Ok(())
        }
    }
}
