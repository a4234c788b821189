#![allow(missing_docs)]
#![allow(dead_code)]

use std::sync::Once;

use rstest::fixture;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use vercre_pd_editor::{FieldEntry, Filter, Profile, Settings};

pub const NAMESPACE: &str = "org.iso.18013.5.1";

// initalise tracing once for all tests
static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// # Panics
///
/// Panics if the tracing subscriber cannot be set.
pub fn init_tracer() {
    INIT.call_once(|| {
        let subscriber = FmtSubscriber::builder().with_max_level(Level::ERROR).finish();
        tracing::subscriber::set_global_default(subscriber).expect("subscriber set");
    });
}

/// Settings a user would end up with after picking `profile`.
pub fn settings(profile: Profile) -> Settings {
    match profile {
        Profile::Jwt => Settings::for_profile(profile).type_filter("EmployeeIDCredential"),
        Profile::SdJwt => Settings::for_profile(profile).type_filter("urn:eu.europa.ec.eudi:pid:1"),
        Profile::MsoMdoc => Settings::for_profile(profile).mdoc_prefix(NAMESPACE),
    }
}

#[fixture]
pub fn fields() -> Vec<FieldEntry> {
    vec![
        FieldEntry::new("family_name"),
        FieldEntry::new("given_name, name"),
        FieldEntry::new("birth_date").filter(Filter::StringPattern {
            pattern: "^\\d{4}-\\d{2}-\\d{2}$".into(),
        }),
        FieldEntry::new("age_in_years").filter(Filter::NumberRange {
            minimum: Some(18.into()),
            maximum: Some(120.into()),
        }),
        FieldEntry::new("nationality").filter(Filter::ArrayContainsConst { value: "NZ".into() }),
        FieldEntry::new("iss").prefixed(false),
    ]
}
