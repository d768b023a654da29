//! User Data

use crate::domain::{
    fields::FieldUpdate,
    users::{
        errors::UsersServiceError,
        models::{UserRole, UserUuid},
    },
};

/// New User Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub role: UserRole,
}

/// User Update Data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: FieldUpdate<String>,
}

impl NewUser {
    /// Trim and normalise the user, rejecting values the profile cannot hold.
    pub(crate) fn normalized(self) -> Result<Self, UsersServiceError> {
        Ok(Self {
            uuid: self.uuid,
            name: normalize_name(&self.name)?,
            email: normalize_email(&self.email)?,
            phone: validate_phone(self.phone)?,
            address: self
                .address
                .map(|address| address.trim().to_string())
                .filter(|address| !address.is_empty()),
            role: self.role,
        })
    }
}

pub(crate) fn normalize_name(name: &str) -> Result<String, UsersServiceError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(UsersServiceError::InvalidName);
    }

    Ok(name.to_string())
}

/// Lower-case and sanity check an email address: one `@`, a non-empty local part and
/// a dotted domain.
pub(crate) fn normalize_email(email: &str) -> Result<String, UsersServiceError> {
    let email = email.trim().to_lowercase();

    let Some((local, domain)) = email.split_once('@') else {
        return Err(UsersServiceError::InvalidEmail);
    };

    let domain_ok = domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2);

    if local.is_empty() || domain.contains('@') || !domain_ok || email.contains(char::is_whitespace)
    {
        return Err(UsersServiceError::InvalidEmail);
    }

    Ok(email)
}

/// A phone number must contain ten consecutive digits somewhere in it.
pub(crate) fn validate_phone(phone: String) -> Result<String, UsersServiceError> {
    let mut run = 0_usize;

    for ch in phone.chars() {
        if ch.is_ascii_digit() {
            run += 1;

            if run == 10 {
                return Ok(phone);
            }
        } else {
            run = 0;
        }
    }

    Err(UsersServiceError::InvalidPhone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_lower_cased() {
        assert_eq!(
            normalize_email(" Someone@Example.COM ").ok(),
            Some("someone@example.com".to_string())
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["", "no-at-sign", "@example.com", "a@b", "a@@example.com", "a b@x.io"] {
            assert!(
                matches!(normalize_email(email), Err(UsersServiceError::InvalidEmail)),
                "{email:?} should be rejected"
            );
        }
    }

    #[test]
    fn phone_needs_ten_consecutive_digits() {
        assert!(validate_phone("9876543210".to_string()).is_ok());
        assert!(validate_phone("+91 9876543210".to_string()).is_ok());
        assert!(matches!(
            validate_phone("98765 43210".to_string()),
            Err(UsersServiceError::InvalidPhone)
        ));
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(matches!(
            normalize_name("   "),
            Err(UsersServiceError::InvalidName)
        ));
    }
}
