use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdTokenError {
    #[error("problem ids must be integers or ranges like 1000-1010, got {0:?}")]
    Invalid(String),
}

/// Expand CLI tokens into problem ids, in order.
///
/// `1000` is a single id, `1000-1010` an inclusive range. A token that starts
/// with `-` is read as a plain (negative) number, never as a range.
pub fn parse_id_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<i64>, IdTokenError> {
    let mut ids = Vec::new();
    for token in tokens {
        let token = token.as_ref().trim();
        let invalid = || IdTokenError::Invalid(token.to_string());

        if token.contains('-') && !token.starts_with('-') {
            let mut bounds = token.split('-');
            let (Some(lo), Some(hi), None) = (bounds.next(), bounds.next(), bounds.next()) else {
                return Err(invalid());
            };
            let lo: i64 = lo.parse().map_err(|_| invalid())?;
            let hi: i64 = hi.parse().map_err(|_| invalid())?;
            ids.extend(lo..=hi);
        } else {
            ids.push(token.parse().map_err(|_| invalid())?);
        }
    }
    Ok(ids)
}
