//! Placeholder contact data for imported collaborators.
//!
//! The archive only carries names, but a collaborator record needs an email,
//! a phone number and an admission date. Staff correct these afterwards.

use chrono::{Days, NaiveDate, Utc};
use rand::Rng;

/// Admission dates are drawn from this many days before today.
const ADMISSION_WINDOW_DAYS: u64 = 5 * 365;

/// Generated values for the fields an archive does not provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    pub email: String,
    pub phone: String,
    pub admission_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct PlaceholderGenerator {
    email_domain: String,
}

impl PlaceholderGenerator {
    pub fn new(email_domain: impl Into<String>) -> Self {
        Self {
            email_domain: email_domain.into(),
        }
    }

    pub fn generate(&self, name: &str) -> Placeholders {
        self.generate_with(name, Utc::now().date_naive(), &mut rand::rng())
    }

    pub fn generate_with<R: Rng>(
        &self,
        name: &str,
        today: NaiveDate,
        rng: &mut R,
    ) -> Placeholders {
        let email = format!(
            "{}.{:04}@{}",
            slugify(name),
            rng.random_range(0..10_000u32),
            self.email_domain
        );

        let phone = format!(
            "({:02}) 9{:04}-{:04}",
            rng.random_range(11..100u32),
            rng.random_range(0..10_000u32),
            rng.random_range(0..10_000u32)
        );

        let admission_date = today
            .checked_sub_days(Days::new(rng.random_range(0..=ADMISSION_WINDOW_DAYS)))
            .unwrap_or(today);

        Placeholders {
            email,
            phone,
            admission_date,
        }
    }
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Lowercase ASCII local part built from a person's name, words joined by `.`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase).map(fold_diacritic) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('.') {
            slug.push('.');
        }
    }

    let slug = slug.trim_end_matches('.');
    if slug.is_empty() {
        "colaborador".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("João da Silva"), "joao.da.silva");
        assert_eq!(slugify("  MARIA   CONCEIÇÃO "), "maria.conceicao");
        assert_eq!(slugify("Ana-Lúcia O'Neil"), "ana.lucia.o.neil");
        assert_eq!(slugify("???"), "colaborador");
    }

    #[test]
    fn test_placeholder_shapes() {
        let generator = PlaceholderGenerator::new("importado.local");
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let p = generator.generate_with("Ana Souza", today, &mut rng);

            let (local, domain) = p.email.split_once('@').unwrap();
            assert_eq!(domain, "importado.local");
            let (slug, digits) = local.rsplit_once('.').unwrap();
            assert_eq!(slug, "ana.souza");
            assert_eq!(digits.len(), 4);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));

            let phone = p.phone.as_bytes();
            assert_eq!(p.phone.len(), 15, "{}", p.phone);
            assert_eq!(phone[0], b'(');
            assert_eq!(&p.phone[3..6], ") 9");
            assert_eq!(phone[10], b'-');
            let ddd: u32 = p.phone[1..3].parse().unwrap();
            assert!((11..100).contains(&ddd));

            assert!(p.admission_date <= today);
            assert!(today - p.admission_date <= chrono::Duration::days(5 * 365));
        }
    }

    #[test]
    fn test_generate_uses_current_date() {
        let p = PlaceholderGenerator::new("example.com").generate("Bruno");
        assert!(p.email.starts_with("bruno."));
        assert!(p.admission_date <= Utc::now().date_naive());
    }
}
