#[derive(PartialEq, Debug, thiserror::Error)]
pub enum EscapeError {
    #[error("no character after `\\`")]
    NoCharAfterBackslash,
    #[error("unrecognized escape `\\{0}`")]
    UnrecognizedChar(char),
}

/// Resolves the escapes allowed in a terminal string: `\\`, `\"`, `\n`, `\t`
/// and `\r`.
pub fn normalize_escapes(input: &str) -> Result<String, EscapeError> {
    let mut s = String::with_capacity(input.len());
    let mut cs = input.chars();
    while let Some(c) = cs.next() {
        if c == '\\' {
            match cs.next() {
                None => return Err(EscapeError::NoCharAfterBackslash),
                Some(c @ '\\') | Some(c @ '"') => { s.push(c); continue }
                Some('n') => { s.push('\n'); continue }
                Some('t') => { s.push('\t'); continue }
                Some('r') => { s.push('\r'); continue }
                Some(c) => return Err(EscapeError::UnrecognizedChar(c)),
           }
        } else {
            s.push(c);
        }
    }
    Ok(s)
}

/// Byte offsets of every scalar in `source`, plus one for the end, so that
/// scalar offsets and byte offsets can be converted both ways.
pub(crate) fn scalar_offsets(source: &str) -> Vec<usize> {
    source.char_indices().map(|(i, _)| i).chain(Some(source.len())).collect()
}
