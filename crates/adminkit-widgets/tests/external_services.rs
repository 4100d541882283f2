//! External service formset mounted from page blocks

use adminkit_test_utils::{service_blocks, NLX_OUTWAY};
use adminkit_widgets::page::mount_external_services;
use adminkit_widgets::{AuthType, WidgetError};
use pretty_assertions::assert_eq;

#[test]
fn saved_nlx_service_preselects_its_organization() {
    let formset = mount_external_services(&service_blocks(Some(NLX_OUTWAY))).unwrap();
    let form = formset.form(0).unwrap();

    assert_eq!(form.auth_type(), Some(AuthType::Zgw));
    assert!(form.nlx_active(formset.constants()));
    assert_eq!(form.nlx().organization.as_deref(), Some("gemeente-utrecht"));
    assert_eq!(
        formset.constants().service_choices("gemeente-utrecht").len(),
        2
    );

    let submission = formset.submission();
    assert_eq!(submission.get("form-0-id"), Some("7"));
    assert_eq!(submission.get("form-0-is_nlx"), Some("on"));
    assert_eq!(submission.get("form-0-nlx_organizations"), Some("gemeente-utrecht"));
    assert_eq!(
        submission.get("form-0-nlx"),
        Some("http://outway.local:8080/gemeente-utrecht/zaken/")
    );
    assert_eq!(submission.get("form-0-secret"), Some("geheim"));
}

#[test]
fn without_outway_nlx_is_not_posted() {
    let mut formset = mount_external_services(&service_blocks(None)).unwrap();

    assert!(!formset.constants().nlx_available());
    let submission = formset.submission();
    assert!(!submission.contains("form-0-is_nlx"));
    assert!(!submission.contains("form-0-nlx"));
    assert!(matches!(
        formset.select_organization(0, "vng"),
        Err(WidgetError::NlxUnavailable)
    ));
}

#[test]
fn switching_auth_type_swaps_credentials_and_back() {
    let mut formset = mount_external_services(&service_blocks(None)).unwrap();

    formset.set_auth_type(0, Some(AuthType::ApiKey)).unwrap();
    formset.set_text(0, "header_key", "Authorization").unwrap();
    let submission = formset.submission();
    assert!(!submission.contains("form-0-client_id"));
    assert_eq!(submission.get("form-0-auth_type"), Some("api_key"));
    assert_eq!(submission.get("form-0-header_key"), Some("Authorization"));

    formset.set_auth_type(0, Some(AuthType::Zgw)).unwrap();
    let submission = formset.submission();
    assert_eq!(submission.get("form-0-client_id"), Some("open-zaak"));
    assert!(!submission.contains("form-0-header_key"));
}

#[test]
fn organization_change_moves_to_its_first_service() {
    let mut formset = mount_external_services(&service_blocks(Some(NLX_OUTWAY))).unwrap();

    formset.select_organization(0, "vng").unwrap();
    assert_eq!(
        formset.row(0).unwrap().text("nlx"),
        Some("http://outway.local:8080/vng/selectielijst/")
    );

    formset.select_organization(0, "gemeente-utrecht").unwrap();
    formset
        .select_service(0, "http://outway.local:8080/gemeente-utrecht/documenten/")
        .unwrap();
    assert_eq!(
        formset.form(0).unwrap().nlx().service.as_deref(),
        Some("http://outway.local:8080/gemeente-utrecht/documenten/")
    );

    assert!(matches!(
        formset.select_organization(0, "unknown"),
        Err(WidgetError::InvalidChoice { .. })
    ));
}

#[test]
fn new_service_toggles_nlx_onto_the_first_service() {
    let mut formset = mount_external_services(&service_blocks(Some(NLX_OUTWAY))).unwrap();
    let index = formset.add_form().unwrap();

    assert!(!formset.form(index).unwrap().nlx().enabled);
    assert!(formset.toggle_nlx(index).unwrap());
    let submission = formset.submission();
    assert_eq!(submission.get("form-1-nlx_organizations"), Some("gemeente-utrecht"));
    assert_eq!(
        submission.get("form-1-nlx"),
        Some("http://outway.local:8080/gemeente-utrecht/zaken/")
    );
    assert_eq!(submission.get("form-TOTAL_FORMS"), Some("2"));
}
