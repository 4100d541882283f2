//! Authorization formset mounted from page blocks

use adminkit_formset::{parse_submission, FieldKind, FieldSchema, FieldValue, FormsetError};
use adminkit_test_utils::authorization_blocks;
use adminkit_widgets::page::mount_authorizations;
use adminkit_widgets::{Component, WidgetError};
use pretty_assertions::assert_eq;

#[test]
fn mount_drops_scopes_of_other_components() {
    let formset = mount_authorizations(&authorization_blocks()).unwrap();
    let form = formset.form(0).unwrap();

    assert_eq!(form.component(), Some(Component::Zrc));
    assert_eq!(form.selected_scopes(), vec!["zaken.bijwerken", "zaken.lezen"]);
    assert!(form.available_scopes().iter().all(|c| {
        ["audittrails.", "notificaties.", "zaken."]
            .iter()
            .any(|p| c.value.starts_with(p))
    }));
}

#[test]
fn mount_keeps_server_errors() {
    let formset = mount_authorizations(&authorization_blocks()).unwrap();
    let row = formset.row(0).unwrap();

    assert_eq!(row.field_errors("zaaktypen").len(), 1);
    assert_eq!(row.field_errors("zaaktypen")[0].code.as_deref(), Some("required"));
}

#[test]
fn manual_selection_shows_types_and_external_types() {
    let mut formset = mount_authorizations(&authorization_blocks()).unwrap();
    let form = formset.form(0).unwrap();

    assert!(form.shows_type_options());
    assert_eq!(form.selected_types(), vec!["10"]);
    let inputs = form.external_type_inputs();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].id, "id_form-0-externe_typen_0");
    assert_eq!(inputs[0].name, "form-0-externe_typen");

    let options = formset.type_options(0).unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].catalogus, "Gemeente Utrecht (ABC)");
    assert_eq!(options[0].choices.len(), 2);

    assert!(formset.toggle_type(0, "11").unwrap());
    assert!(formset.row(0).unwrap().field_errors("zaaktypen").is_empty());
    assert!(matches!(
        formset.toggle_type(0, "20"),
        Err(WidgetError::InvalidChoice { .. })
    ));

    let methods = formset.method_choices(0).unwrap();
    assert_eq!(methods[2].label, "Selecteer handmatig ZAAKTYPEN");
}

#[test]
fn switching_method_hides_type_inputs() {
    let mut formset = mount_authorizations(&authorization_blocks()).unwrap();
    formset.set_related_type_selection(0, "all_current").unwrap();

    let submission = formset.submission();
    assert_eq!(submission.get("form-0-related_type_selection"), Some("all_current"));
    assert!(!submission.contains("form-0-zaaktypen"));
    assert!(!submission.contains("form-0-externe_typen"));
    assert!(formset.type_options(0).unwrap().is_empty());
    assert!(matches!(
        formset.add_external_type(0),
        Err(WidgetError::FieldNotApplicable { .. })
    ));
}

#[test]
fn component_change_replaces_extra_fields() {
    let mut formset = mount_authorizations(&authorization_blocks()).unwrap();

    let dropped = formset.select_component(0, Some(Component::Ztc)).unwrap();
    assert_eq!(dropped, vec!["zaken.lezen", "zaken.bijwerken"]);

    let form = formset.form(0).unwrap();
    assert!(form.extra_fields().is_empty());
    let submission = formset.submission();
    assert_eq!(submission.get("form-0-component"), Some("ztc"));
    assert!(!submission.contains("form-0-vertrouwelijkheidaanduiding"));
    assert!(!submission.contains("form-0-related_type_selection"));

    assert!(matches!(
        formset.set_vertrouwelijkheidaanduiding(0, "geheim"),
        Err(WidgetError::FieldNotApplicable { .. })
    ));
    assert!(matches!(
        formset.toggle_scope(0, "zaken.lezen"),
        Err(WidgetError::Choice(_))
    ));
    assert!(formset.toggle_scope(0, "catalogi.lezen").unwrap());
}

#[test]
fn back_to_original_component_restores_initial_extras() {
    let mut formset = mount_authorizations(&authorization_blocks()).unwrap();
    formset.select_component(0, Some(Component::Brc)).unwrap();
    formset.select_component(0, Some(Component::Zrc)).unwrap();

    let form = formset.form(0).unwrap();
    assert_eq!(form.related_type_selection(), Some("manual_select"));
    assert_eq!(form.vertrouwelijkheidaanduiding(), Some("openbaar"));
    assert_eq!(form.selected_types(), vec!["10"]);
}

#[test]
fn added_rows_post_the_counter_and_their_fields() {
    let mut formset = mount_authorizations(&authorization_blocks()).unwrap();
    let index = formset.add_form().unwrap();
    formset.select_component(index, Some(Component::Drc)).unwrap();
    formset.toggle_scope(index, "documenten.lezen").unwrap();
    formset.set_related_type_selection(index, "manual_select").unwrap();
    formset.toggle_type(index, "20").unwrap();
    let position = formset.add_external_type(index).unwrap();
    formset
        .set_external_type(index, position, "https://ztc.example.com/iot/1")
        .unwrap();
    formset.set_vertrouwelijkheidaanduiding(index, "geheim").unwrap();
    formset.mark_deleted(0, true).unwrap();

    let submission = formset.submission();
    assert_eq!(submission.get("form-TOTAL_FORMS"), Some("2"));
    assert_eq!(submission.get("form-INITIAL_FORMS"), Some("1"));
    assert_eq!(submission.get("form-0-DELETE"), Some("on"));
    assert_eq!(
        submission.get_all("form-1-externe_typen"),
        vec!["", "https://ztc.example.com/iot/1"]
    );
    assert_eq!(formset.form(1).unwrap().css_class(), "autorisatie-form--odd");

    let schema = FieldSchema::from_iter([
        ("component", FieldKind::Text),
        ("scopes", FieldKind::List),
        ("informatieobjecttypen", FieldKind::List),
        ("vertrouwelijkheidaanduiding", FieldKind::Text),
        ("DELETE", FieldKind::Flag),
    ]);
    let parsed = parse_submission(&submission, "form", &schema).unwrap();
    assert_eq!(parsed.rows.len(), 2);
    assert_eq!(parsed.rows[0]["DELETE"], FieldValue::Flag(true));
    assert_eq!(parsed.rows[1]["component"], FieldValue::text("drc"));
    assert_eq!(
        parsed.rows[1]["informatieobjecttypen"],
        FieldValue::list(["20"])
    );
}

#[test]
fn limit_is_reported_as_input_error() {
    let blocks = authorization_blocks().with(
        "formset-config",
        serde_json::json!({
            "prefix": "form",
            "TOTAL_FORMS": 1,
            "INITIAL_FORMS": 1,
            "MAX_NUM_FORMS": 1,
        }),
    );
    let mut formset = mount_authorizations(&blocks).unwrap();

    assert!(!formset.can_add_form());
    let err = formset.add_form().unwrap_err();
    assert!(matches!(
        err,
        WidgetError::Formset(FormsetError::LimitExceeded { max: 1 })
    ));
    assert!(err.is_input_error());
    assert_eq!(formset.formset().counters().total_forms(), 1);
}
