//! Serialized array reader using nom.
//!
//! Reads back the flat `a:N:{...}` arrays written by
//! [`serialize_array`](crate::encoder::serialize_array). Input is parsed as
//! bytes so the declared `s:<len>` lengths slice exactly as PHP does.

use nom::{
    bytes::complete::{tag, take},
    character::complete::digit1,
    combinator::map_res,
    multi::count,
    sequence::{delimited, pair},
    IResult,
};

use crate::error::{FormError, FormResult};

/// Parse a complete serialized array into its ordered pairs.
///
/// # Example
///
/// ```
/// use forminator_sql::parser::parse_array;
///
/// let pairs = parse_array(r#"a:1:{s:6:"status";s:9:"completed";}"#).unwrap();
/// assert_eq!(pairs, vec![("status".to_string(), "completed".to_string())]);
/// ```
pub fn parse_array(input: &str) -> FormResult<Vec<(String, String)>> {
    let bytes = input.as_bytes();

    match parse_array_bytes(bytes) {
        Ok((b"", pairs)) => Ok(pairs),
        Ok((remaining, _)) => Err(FormError::decode(
            bytes.len() - remaining.len(),
            format!(
                "Unexpected trailing content: '{}'",
                String::from_utf8_lossy(remaining)
            ),
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(FormError::decode(
            bytes.len() - e.input.len(),
            format!("Parse failed: {:?}", e.code),
        )),
        Err(nom::Err::Incomplete(_)) => Err(FormError::decode(bytes.len(), "Unexpected end of input")),
    }
}

/// Parse `a:<count>:{<pairs>}`.
fn parse_array_bytes(input: &[u8]) -> IResult<&[u8], Vec<(String, String)>> {
    let (input, n) = delimited(tag("a:"), parse_length, tag(":{"))(input)?;
    let (input, pairs) = count(pair(parse_string, parse_string), n)(input)?;
    let (input, _) = tag("}")(input)?;
    Ok((input, pairs))
}

/// Parse `s:<len>:"<len bytes>";`.
fn parse_string(input: &[u8]) -> IResult<&[u8], String> {
    let (input, len) = delimited(tag("s:"), parse_length, tag(":\""))(input)?;
    let (input, text) = map_res(take(len), |raw: &[u8]| {
        std::str::from_utf8(raw).map(str::to_string)
    })(input)?;
    let (input, _) = tag("\";")(input)?;
    Ok((input, text))
}

/// Parse a decimal length prefix.
fn parse_length(input: &[u8]) -> IResult<&[u8], usize> {
    map_res(digit1, |digits: &[u8]| {
        std::str::from_utf8(digits)
            .ok()
            .and_then(|d| d.parse::<usize>().ok())
            .ok_or(())
    })(input)
}
