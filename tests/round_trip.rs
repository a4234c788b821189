//! Model → JSON → Model tests for each credential profile.

mod utils;

use rstest::rstest;
use vercre_pd_editor::{
    project, project_text, reconcile, Edit, FieldEntry, FieldModel, Profile, Settings,
};

use crate::utils::{fields, settings, NAMESPACE};

// Reconciling the projected text against the same model should give the
// model back.
#[rstest]
#[case::jwt(Profile::Jwt)]
#[case::sd_jwt(Profile::SdJwt)]
#[case::mdoc(Profile::MsoMdoc)]
fn stable(#[case] profile: Profile, fields: Vec<FieldEntry>) {
    utils::init_tracer();

    let model = FieldModel::new(settings(profile)).with_fields(fields);
    let text = project_text(&model);

    let reconciled = reconcile(&text, &model, profile).expect("should reconcile");
    assert_eq!(reconciled, model);

    // and again, from the reconciled model
    assert_eq!(project_text(&reconciled), text);
}

// Path lists are normalized on the way through.
#[test]
fn normalizes_paths() {
    let model = FieldModel::new(settings(Profile::SdJwt))
        .with_fields(vec![FieldEntry::new(" given_name ,name ")]);
    let pd = project(&model);
    assert_eq!(pd.constraints.fields[1].path, vec!["$.given_name", "$.name"]);

    let reconciled = reconcile(&pd.to_json_pretty(), &model, Profile::SdJwt)
        .expect("should reconcile");
    assert_eq!(reconciled.fields()[0].key(), "given_name, name");
}

// Hidden entries never reach the text but survive reconciliation.
#[rstest]
#[case::jwt(Profile::Jwt)]
#[case::sd_jwt(Profile::SdJwt)]
#[case::mdoc(Profile::MsoMdoc)]
fn hidden_persist(#[case] profile: Profile, fields: Vec<FieldEntry>) {
    let model = FieldModel::new(settings(profile))
        .with_fields(fields)
        .apply(Edit::Append { entry: FieldEntry::new("portrait").hidden(true) })
        .apply(Edit::ToggleHidden { index: 0 });

    let text = project_text(&model);
    assert!(!text.contains("portrait"));
    assert!(!text.contains("family_name"));

    let reconciled = reconcile(&text, &model, profile).expect("should reconcile");
    assert_eq!(reconciled, model);

    let hidden: Vec<&str> =
        reconciled.fields().iter().filter(|e| e.is_hidden).map(|e| e.path.as_str()).collect();
    assert_eq!(hidden, vec!["family_name", "portrait"]);
}

// Exactly one type field, always first, for JWT and SD-JWT. None for mdoc.
#[rstest]
#[case::jwt(Profile::Jwt, Some("$.type"))]
#[case::sd_jwt(Profile::SdJwt, Some("$.vct"))]
#[case::mdoc(Profile::MsoMdoc, None)]
fn type_field_singular(
    #[case] profile: Profile, #[case] type_path: Option<&str>, fields: Vec<FieldEntry>,
) {
    let model = FieldModel::new(settings(profile))
        .with_fields(fields)
        .apply(Edit::Append { entry: FieldEntry::new("$.type") })
        .apply(Edit::Append { entry: FieldEntry::new("$.vct").prefixed(false) });
    let pd = project(&model);

    let type_fields: Vec<usize> = pd
        .constraints
        .fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_type_field())
        .map(|(i, _)| i)
        .collect();

    match type_path {
        Some(path) => {
            assert_eq!(type_fields, vec![0]);
            assert_eq!(pd.constraints.fields[0].path, vec![path]);
        }
        None => assert!(type_fields.is_empty()),
    }
}

// `limit_disclosure` follows the profile, not the toggle.
#[rstest]
#[case::jwt(Profile::Jwt, false)]
#[case::sd_jwt(Profile::SdJwt, true)]
#[case::mdoc(Profile::MsoMdoc, true)]
fn limit_disclosure_policy(#[case] profile: Profile, #[case] required: bool) {
    for toggle in [true, false] {
        let model = FieldModel::new(settings(profile))
            .apply(Edit::SetLimitDisclosure { required: toggle });
        let pd = project(&model);
        assert_eq!(pd.limit_disclosure_required(), required);
        assert_eq!(project_text(&model).contains("limit_disclosure"), required);
    }
}

#[test]
fn mdoc_paths() {
    let model = FieldModel::new(Settings::for_profile(Profile::MsoMdoc).mdoc_prefix(NAMESPACE))
        .with_fields(vec![FieldEntry::new("birth_date")]);

    let pd = project(&model);
    assert_eq!(pd.constraints.fields.len(), 1);
    assert_eq!(pd.constraints.fields[0].path, vec!["$['org.iso.18013.5.1']['birth_date']"]);

    let decoded = vercre_pd_editor::path::decode(
        &pd.constraints.fields[0].path[0],
        Profile::MsoMdoc,
        NAMESPACE,
    );
    assert_eq!(decoded.name, "birth_date");
    assert!(decoded.has_prefix);
}

// Switching profile re-encodes every visible entry.
#[test]
fn profile_switch() {
    let model = FieldModel::new(settings(Profile::Jwt))
        .with_fields(vec![FieldEntry::new("email")])
        .apply(Edit::SetProfile { profile: Profile::SdJwt });

    let pd = project(&model);
    assert_eq!(pd.constraints.fields[0].path, vec!["$.vct"]);
    // a filter built for the old profile's type is re-shaped for the new one
    assert_eq!(
        pd.constraints.fields[0].filter,
        Some(serde_json::json!({"type": "string", "const": "EmployeeIDCredential"}))
    );
    assert_eq!(pd.constraints.fields[1].path, vec!["$.email"]);
}
