use validator::validate_email;

const MIN_LENGTH: usize = 5;
const MAX_LENGTH: usize = 254;

// Disposable email providers we refuse to enroll.
const BLOCKED_DOMAINS: [&str; 3] = ["tempmail.com", "throwaway.com", "mailinator.com"];

const LOCAL_PART_EXTRA_CHARS: [char; 5] = ['.', '_', '%', '+', '-'];

#[derive(Debug, Clone, serde::Serialize)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// Normalizes (trim + lowercase) and validates a raw email address.
    ///
    /// Beyond the RFC-shaped check from `validator`, the address must look like
    /// `local@domain.tld` with a restricted local-part charset, a dotted domain
    /// and an alphabetic TLD of at least two letters, and its domain must not
    /// belong to a disposable provider.
    pub fn parse(email: String) -> Result<SubscriberEmail, String> {
        let normalized = email.trim().to_lowercase();

        if normalized.len() < MIN_LENGTH || normalized.len() > MAX_LENGTH {
            return Err(format!("{} email has an invalid length", normalized));
        }

        if !validate_email(normalized.as_str()) || !has_strict_shape(&normalized) {
            return Err(format!("{} email is not valid", normalized));
        }

        if is_blocked_domain(&normalized) {
            return Err(format!(
                "{} email belongs to a disposable email provider",
                normalized
            ));
        }

        Ok(Self(normalized))
    }
}

fn has_strict_shape(email: &str) -> bool {
    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };

    let local_is_valid = !local.is_empty()
        && local
            .chars()
            .all(|char| char.is_ascii_alphanumeric() || LOCAL_PART_EXTRA_CHARS.contains(&char));

    let (domain_name, tld) = match domain.rsplit_once('.') {
        Some(parts) => parts,
        None => return false,
    };

    let domain_is_valid = !domain_name.is_empty()
        && domain
            .chars()
            .all(|char| char.is_ascii_alphanumeric() || char == '.' || char == '-');
    let tld_is_valid = tld.len() >= 2 && tld.chars().all(|char| char.is_ascii_alphabetic());

    local_is_valid && domain_is_valid && tld_is_valid
}

fn is_blocked_domain(email: &str) -> bool {
    match email.split_once('@') {
        Some((_, domain)) => BLOCKED_DOMAINS.contains(&domain),
        None => false,
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
