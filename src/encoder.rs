//! Legacy array serialization and SQL string escaping.
//!
//! Forminator stores structured field values as PHP `serialize()` output.
//! Only flat arrays of string keys to string values are produced here:
//!
//! ```text
//! a:2:{s:10:"first-name";s:6:"Lamine";s:9:"last-name";s:5:"Djama";}
//! ─┬─  ──────────┬────────────────────
//!  │             └── s:<byte length>:"<text>"; for every key and value
//!  └── pair count
//! ```

use std::fmt::Write;

/// Serialize ordered pairs into the `a:N:{...}` array format.
///
/// Lengths are UTF-8 byte lengths of the raw text, so `é` counts as 2.
/// Quotes inside keys or values are written as-is; escaping belongs to
/// [`sql_escape`], applied to the whole blob.
///
/// # Example
///
/// ```
/// use forminator_sql::encoder::serialize_array;
///
/// let blob = serialize_array([("calculation-2", "350.00")]);
/// assert_eq!(blob, r#"a:1:{s:13:"calculation-2";s:6:"350.00";}"#);
/// ```
pub fn serialize_array<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut body = String::new();
    let mut count = 0usize;

    for (key, value) in pairs {
        push_string(&mut body, key.as_ref());
        push_string(&mut body, value.as_ref());
        count += 1;
    }

    format!("a:{}:{{{}}}", count, body)
}

/// Append `s:<len>:"<text>";`.
fn push_string(out: &mut String, text: &str) {
    // Writing into a String cannot fail
    let _ = write!(out, "s:{}:\"{}\";", text.len(), text);
}

/// Escape text for a single-quoted SQL literal.
///
/// Backslashes and single quotes get a backslash prefix. Everything else,
/// including `"` and `:`, passes through untouched.
pub fn sql_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
