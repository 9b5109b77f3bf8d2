//! Client-side checks run before any transaction is sent.

use votechain_types::{Address, Timestamp, UserDetails};

use crate::ClientError;

/// Start and end must be ordered, in the future, and at least `min_secs` apart.
pub fn campaign_window(
    start: Timestamp,
    end: Timestamp,
    now: Timestamp,
    min_secs: u64,
) -> Result<(), ClientError> {
    if start <= now {
        return Err(ClientError::InvalidDates(
            "start date must be in the future".into(),
        ));
    }
    if end <= start {
        return Err(ClientError::InvalidDates(
            "end date must be after start date".into(),
        ));
    }
    let duration = end.as_secs() - start.as_secs();
    if duration < min_secs {
        return Err(ClientError::InvalidDates(format!(
            "campaign must last at least {min_secs}s (got {duration}s)"
        )));
    }
    Ok(())
}

pub fn required(field: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn address(field: &str, raw: &str) -> Result<Address, ClientError> {
    Address::parse(raw)
        .map_err(|_| ClientError::Validation(format!("{field} is not a valid address: {raw}")))
}

/// A light shape check: one `@`, non-empty local part, dotted domain.
pub fn email(raw: &str) -> Result<(), ClientError> {
    let malformed = || ClientError::Validation(format!("email is malformed: {raw}"));
    let (local, domain) = raw.trim().split_once('@').ok_or_else(malformed)?;
    let domain_ok = domain
        .split('.')
        .all(|label| !label.is_empty())
        && domain.contains('.');
    if local.is_empty() || !domain_ok || domain.contains('@') || raw.contains(char::is_whitespace)
    {
        return Err(malformed());
    }
    Ok(())
}

pub fn profile(details: &UserDetails) -> Result<(), ClientError> {
    required("name", &details.name)?;
    required("email", &details.email)?;
    email(&details.email)?;
    required("identity number", &details.identity_number)?;
    for link in &details.supportive_links {
        if !(link.starts_with("https://") || link.starts_with("http://")) {
            return Err(ClientError::Validation(format!(
                "supportive link must be an http(s) URL: {link}"
            )));
        }
    }
    Ok(())
}

pub fn document(bytes: &[u8], max_bytes: usize) -> Result<(), ClientError> {
    if bytes.is_empty() {
        return Err(ClientError::Validation("document is empty".into()));
    }
    if bytes.len() > max_bytes {
        return Err(ClientError::Validation(format!(
            "document is {} bytes, limit is {max_bytes}",
            bytes.len()
        )));
    }
    Ok(())
}
