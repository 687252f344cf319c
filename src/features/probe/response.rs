use crate::probe::StatusLine;

/// Parses the leading `HTTP/<d>.<d> <ddd> <reason>\r\n` line. Anything that
/// does not match yields `None`; a malformed response is a reportable
/// outcome, not an error.
pub fn parse_status_line(response: &str) -> Option<StatusLine> {
    let rest = response.strip_prefix("HTTP/")?;
    let rest = skip_version(rest)?;
    let rest = skip_blanks(rest)?;

    let code_digits = rest.get(..3)?;
    if !code_digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let code = code_digits.parse::<u16>().ok()?;
    let rest = skip_blanks(&rest[3..])?;

    let end = rest.find(['\r', '\n'])?;
    let reason = &rest[..end];
    if reason.is_empty() || !rest[end..].starts_with("\r\n") {
        return None;
    }

    Some(StatusLine {
        code,
        reason: reason.to_string(),
    })
}

fn skip_version(input: &str) -> Option<&str> {
    let bytes = input.as_bytes();
    let well_formed = bytes.len() >= 3
        && bytes[0].is_ascii_digit()
        && bytes[1] == b'.'
        && bytes[2].is_ascii_digit();
    if well_formed {
        Some(&input[3..])
    } else {
        None
    }
}

/// Skips one or more spaces or tabs; fails if there are none.
fn skip_blanks(input: &str) -> Option<&str> {
    let trimmed = input.trim_start_matches([' ', '\t']);
    if trimmed.len() == input.len() {
        None
    } else {
        Some(trimmed)
    }
}
