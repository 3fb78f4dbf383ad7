//! Test-data builders. Emails are uniquified so concurrent runs against a
//! shared deployment never collide on the register endpoint.

use contactlist_client::types::{ContactPatch, NewContact, NewUser};
use uuid::Uuid;

/// `prefix+<uuid>@example.com`
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}+{}@example.com", Uuid::new_v4().simple())
}

pub fn test_user(email_prefix: &str, password: &str) -> NewUser {
    NewUser {
        first_name: "Test".to_owned(),
        last_name: "User".to_owned(),
        email: unique_email(email_prefix),
        password: password.to_owned(),
    }
}

/// A contact with every field populated.
pub fn sample_contact() -> NewContact {
    NewContact {
        birthdate: Some("1970-01-01".to_owned()),
        email: Some("amahiga@example.com".to_owned()),
        phone: Some("8005551234".to_owned()),
        street1: Some("1 Main St.".to_owned()),
        street2: Some("Apartment A".to_owned()),
        city: Some("Anytown".to_owned()),
        state_province: Some("KS".to_owned()),
        postal_code: Some("12345".to_owned()),
        country: Some("USA".to_owned()),
        ..NewContact::named("Amy", "Mahiga")
    }
}

/// A partial update touching city and phone only.
pub fn sample_contact_patch() -> ContactPatch {
    ContactPatch {
        city: Some("Boston".to_owned()),
        phone: Some("8005559999".to_owned()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_emails_do_not_collide() {
        assert_ne!(unique_email("qa"), unique_email("qa"));
    }

    #[test]
    fn unique_email_keeps_prefix() {
        assert!(unique_email("stage").starts_with("stage+"));
    }
}
