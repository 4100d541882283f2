//! External service formset
//!
//! One row per external API the admin talks to. The auth type decides
//! which credential fields are shown; NLX routing can be switched on only
//! when an outway is configured, and then offers organization and service
//! pickers fed by the NLX catalog.

use crate::error::WidgetError;
use crate::fields;
use adminkit_choices::{Choice, ChoiceList};
use adminkit_formset::{
    FieldValue, FieldValues, Formset, ManagementConfig, Row, RowData, Submission,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Hidden primary key field
pub const ID: &str = "id";
/// Label field
pub const LABEL: &str = "label";
/// API type field
pub const API_TYPE: &str = "api_type";
/// API root URL field
pub const API_ROOT: &str = "api_root";
/// NLX service URL field
pub const NLX: &str = "nlx";
/// OpenAPI specification URL field
pub const OAS: &str = "oas";
/// Auth type field
pub const AUTH_TYPE: &str = "auth_type";
/// NLX toggle checkbox
pub const IS_NLX: &str = "is_nlx";
/// NLX organization select
pub const NLX_ORGANIZATIONS: &str = "nlx_organizations";

const TEXT_FIELDS: [&str; 3] = [LABEL, API_ROOT, OAS];

/// API types an external service can have
pub const API_TYPES: [(&str, &str); 10] = [
    ("ac", "Autorisaties API"),
    ("nrc", "Notificaties API"),
    ("zrc", "Zaken API"),
    ("ztc", "Catalogi API"),
    ("drc", "Documenten API"),
    ("brc", "Besluiten API"),
    ("cmc", "Contactmomenten API"),
    ("kc", "Klanten API"),
    ("vrc", "Verzoeken API"),
    ("orc", "Overige"),
];

/// A credential input shown for an auth type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialField {
    /// Field name
    pub name: &'static str,
    /// Label
    pub label: &'static str,
}

const ZGW_FIELDS: [CredentialField; 4] = [
    CredentialField { name: "client_id", label: "Client ID" },
    CredentialField { name: "secret", label: "Secret" },
    CredentialField { name: "user_id", label: "User ID" },
    CredentialField { name: "user_representation", label: "User representation" },
];

const API_KEY_FIELDS: [CredentialField; 2] = [
    CredentialField { name: "header_key", label: "Header" },
    CredentialField { name: "header_value", label: "Value" },
];

/// How the admin authenticates against a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// No credentials
    NoAuth,
    /// Static header
    ApiKey,
    /// ZGW JWT from client id and secret
    Zgw,
}

impl AuthType {
    /// Every auth type
    pub const ALL: [Self; 3] = [Self::NoAuth, Self::ApiKey, Self::Zgw];

    /// Submitted value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoAuth => "no_auth",
            Self::ApiKey => "api_key",
            Self::Zgw => "zgw",
        }
    }

    /// Human-readable name
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NoAuth => "No authorization",
            Self::ApiKey => "API key",
            Self::Zgw => "ZGW client_id + secret",
        }
    }

    /// Credential inputs shown for this auth type
    #[must_use]
    pub fn credential_fields(self) -> &'static [CredentialField] {
        match self {
            Self::NoAuth => &[],
            Self::ApiKey => &API_KEY_FIELDS,
            Self::Zgw => &ZGW_FIELDS,
        }
    }
}

impl FromStr for AuthType {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| WidgetError::UnknownAuthType(s.to_string()))
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn all_credential_fields() -> impl Iterator<Item = &'static str> {
    AuthType::ALL
        .into_iter()
        .flat_map(|t| t.credential_fields().iter().map(|f| f.name))
}

/// One service published through NLX
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NlxService {
    /// Service name within the organization
    pub service_name: String,
}

/// NLX catalog: organization to service URL to service
pub type NlxChoices = IndexMap<String, IndexMap<String, NlxService>>;

/// Page-wide constants for the external service widgets
#[derive(Debug, Clone)]
pub struct ServiceConstants {
    /// Auth type choices
    pub auth_types: ChoiceList,
    /// API type choices
    pub api_types: ChoiceList,
    /// NLX outway URL; NLX is unavailable without one
    pub nlx_outway: Option<String>,
    /// NLX catalog
    pub nlx_choices: NlxChoices,
}

impl Default for ServiceConstants {
    fn default() -> Self {
        let auth_types = AuthType::ALL.iter().map(|t| (t.as_str(), t.label()));
        Self {
            auth_types: ChoiceList::from_pairs(auth_types).unwrap_or_default(),
            api_types: ChoiceList::from_pairs(API_TYPES).unwrap_or_default(),
            nlx_outway: None,
            nlx_choices: NlxChoices::new(),
        }
    }
}

impl ServiceConstants {
    /// Create with the built-in API types and auth types
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With auth type choices as labelled by the server
    #[inline]
    #[must_use]
    pub fn with_auth_types(mut self, auth_types: ChoiceList) -> Self {
        self.auth_types = auth_types;
        self
    }

    /// With NLX outway and catalog
    #[inline]
    #[must_use]
    pub fn with_nlx(mut self, outway: Option<String>, choices: NlxChoices) -> Self {
        self.nlx_outway = outway.filter(|o| !o.is_empty());
        self.nlx_choices = choices;
        self
    }

    /// Check if NLX can be switched on
    #[inline]
    #[must_use]
    pub fn nlx_available(&self) -> bool {
        self.nlx_outway.is_some()
    }

    /// Organization picker choices
    #[must_use]
    pub fn organization_choices(&self) -> Vec<Choice> {
        self.nlx_choices.keys().map(Choice::same).collect()
    }

    /// Service picker choices for an organization
    #[must_use]
    pub fn service_choices(&self, organization: &str) -> Vec<Choice> {
        self.nlx_choices
            .get(organization)
            .map(|services| {
                services
                    .iter()
                    .map(|(url, service)| Choice::new(url.as_str(), service.service_name.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Organization to preselect for an NLX service URL
///
/// The first path segment after the outway names the organization. Falls
/// back to the first organization when the URL is not routed through the
/// outway. `None` when there are no organizations.
#[must_use]
pub fn initial_organization(
    organizations: &[Choice],
    nlx_url: &str,
    outway: Option<&str>,
) -> Option<String> {
    let first = organizations.first()?;
    let path = outway
        .filter(|o| !o.is_empty() && !nlx_url.is_empty())
        .and_then(|o| nlx_url.strip_prefix(o));
    Some(match path {
        Some(path) => path.split('/').next().unwrap_or_default().to_string(),
        None => first.value.clone(),
    })
}

/// NLX routing state of one row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NlxSelection {
    /// Whether NLX is switched on
    pub enabled: bool,
    /// Picked organization
    pub organization: Option<String>,
    /// Picked service URL
    pub service: Option<String>,
}

/// Widget state of one external service row
#[derive(Debug, Clone)]
pub struct ExternalServiceForm {
    index: usize,
    prefix: String,
    initial: FieldValues,
    auth_type: Option<AuthType>,
    nlx: NlxSelection,
}

impl ExternalServiceForm {
    fn from_row(row: &Row, constants: &ServiceConstants) -> Self {
        let values = row.values().clone();
        let auth_type = fields::text(&values, AUTH_TYPE).and_then(|value| {
            value
                .parse::<AuthType>()
                .map_err(|err| tracing::warn!(row = row.index(), "keeping unrecognized auth type: {err}"))
                .ok()
        });

        let nlx_url = fields::text(&values, NLX).unwrap_or_default();
        let organization = initial_organization(
            &constants.organization_choices(),
            &nlx_url,
            constants.nlx_outway.as_deref(),
        );
        let nlx = NlxSelection {
            enabled: !nlx_url.is_empty(),
            organization,
            service: Some(nlx_url).filter(|url| !url.is_empty()),
        };

        Self {
            index: row.index(),
            prefix: row.prefix().to_string(),
            initial: values,
            auth_type,
            nlx,
        }
    }

    fn sync_row(&self, row: &mut Row, constants: &ServiceConstants) {
        let shown = self.credential_fields();
        for field in all_credential_fields() {
            if shown.iter().any(|f| f.name == field) {
                if row.get(field).is_none() {
                    row.sync(field, fields::text(&self.initial, field).unwrap_or_default());
                }
            } else {
                fields::drop_value(row, field);
            }
        }

        if self.nlx_active(constants) {
            row.sync(IS_NLX, FieldValue::Flag(true));
            row.sync(
                NLX_ORGANIZATIONS,
                self.nlx.organization.clone().unwrap_or_default(),
            );
            row.sync(NLX, self.nlx.service.clone().unwrap_or_default());
        } else {
            fields::drop_value(row, IS_NLX);
            fields::drop_value(row, NLX_ORGANIZATIONS);
            fields::drop_value(row, NLX);
        }
    }

    /// Row index
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Row prefix
    #[inline]
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Picked auth type
    #[inline]
    #[must_use]
    pub fn auth_type(&self) -> Option<AuthType> {
        self.auth_type
    }

    /// Credential inputs shown for the picked auth type
    #[must_use]
    pub fn credential_fields(&self) -> &'static [CredentialField] {
        self.auth_type.map_or(&[], AuthType::credential_fields)
    }

    /// NLX routing state
    #[inline]
    #[must_use]
    pub fn nlx(&self) -> &NlxSelection {
        &self.nlx
    }

    /// Whether the NLX pickers are shown
    #[must_use]
    pub fn nlx_active(&self, constants: &ServiceConstants) -> bool {
        self.nlx.enabled && constants.nlx_available()
    }

    /// Row parity class
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        if self.index % 2 == 0 {
            "external-form--even"
        } else {
            "external-form--odd"
        }
    }
}

/// Formset of external service rows
#[derive(Debug, Clone)]
pub struct ExternalServiceFormset {
    formset: Formset,
    forms: Vec<ExternalServiceForm>,
    constants: Arc<ServiceConstants>,
}

impl ExternalServiceFormset {
    /// Mount from the page's formset configuration and row data
    ///
    /// An unknown auth type is logged and posted back unchanged.
    ///
    /// # Errors
    /// - `WidgetError::Formset` if the counters or row data are inconsistent
    pub fn mount(
        config: &ManagementConfig,
        rows: Vec<RowData>,
        constants: Arc<ServiceConstants>,
    ) -> Result<Self, WidgetError> {
        let mut formset = Formset::mount(config, rows)?;
        let mut forms = Vec::with_capacity(formset.len());
        for index in 0..formset.len() {
            let row = formset.row_mut(index)?;
            let form = ExternalServiceForm::from_row(row, &constants);
            form.sync_row(row, &constants);
            forms.push(form);
        }

        Ok(Self {
            formset,
            forms,
            constants,
        })
    }

    /// Underlying formset
    #[inline]
    #[must_use]
    pub fn formset(&self) -> &Formset {
        &self.formset
    }

    /// Page constants
    #[inline]
    #[must_use]
    pub fn constants(&self) -> &Arc<ServiceConstants> {
        &self.constants
    }

    /// All forms in row order
    #[inline]
    #[must_use]
    pub fn forms(&self) -> &[ExternalServiceForm] {
        &self.forms
    }

    /// Form by row index
    #[inline]
    #[must_use]
    pub fn form(&self, index: usize) -> Option<&ExternalServiceForm> {
        self.forms.get(index)
    }

    /// Row by index
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.formset.row(index)
    }

    /// Whether another service may be added
    #[inline]
    #[must_use]
    pub fn can_add_form(&self) -> bool {
        self.formset.can_add_row()
    }

    /// Append a blank service, returning its index
    ///
    /// # Errors
    /// - `WidgetError::Formset` with `LimitExceeded` at `MAX_NUM_FORMS`
    pub fn add_form(&mut self) -> Result<usize, WidgetError> {
        let index = self.formset.add_row()?.index();
        let row = self.formset.row_mut(index)?;
        for field in [ID, LABEL, API_ROOT, OAS] {
            row.sync(field, "");
        }
        let form = ExternalServiceForm::from_row(row, &self.constants);
        form.sync_row(row, &self.constants);
        self.forms.push(form);
        Ok(index)
    }

    fn parts(
        &mut self,
        index: usize,
    ) -> Result<(&mut ExternalServiceForm, &mut Row), WidgetError> {
        let form = self
            .forms
            .get_mut(index)
            .ok_or(WidgetError::UnknownRow(index))?;
        let row = self.formset.row_mut(index)?;
        Ok((form, row))
    }

    /// Edit a text field or a credential of the current auth type
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    /// - `WidgetError::FieldNotApplicable` if the field is not a free text
    ///   input of this row
    pub fn set_text(
        &mut self,
        index: usize,
        field: &str,
        value: impl Into<String>,
    ) -> Result<(), WidgetError> {
        let (form, row) = self.parts(index)?;
        let is_credential = form.credential_fields().iter().any(|f| f.name == field);
        if !TEXT_FIELDS.contains(&field) && !is_credential {
            let selection = form
                .auth_type
                .map_or_else(|| "no auth type".to_string(), |t| format!("{AUTH_TYPE}={t}"));
            return Err(WidgetError::not_applicable(field, selection));
        }
        row.set(field, value.into());
        Ok(())
    }

    /// Pick the API type
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    /// - `WidgetError::InvalidChoice` if the API type is unknown
    pub fn set_api_type(&mut self, index: usize, api_type: &str) -> Result<(), WidgetError> {
        if !self.constants.api_types.contains(api_type) {
            return Err(WidgetError::invalid_choice(API_TYPE, api_type));
        }
        let (_, row) = self.parts(index)?;
        row.set(API_TYPE, api_type);
        Ok(())
    }

    /// Pick the auth type; the credential inputs follow it
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    pub fn set_auth_type(
        &mut self,
        index: usize,
        auth_type: Option<AuthType>,
    ) -> Result<(), WidgetError> {
        let constants = Arc::clone(&self.constants);
        let (form, row) = self.parts(index)?;
        form.auth_type = auth_type;
        row.set(AUTH_TYPE, auth_type.map_or("", AuthType::as_str));
        form.sync_row(row, &constants);
        Ok(())
    }

    /// Flip the NLX toggle, returning whether NLX is now on
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    /// - `WidgetError::NlxUnavailable` without an outway
    pub fn toggle_nlx(&mut self, index: usize) -> Result<bool, WidgetError> {
        let constants = Arc::clone(&self.constants);
        if !constants.nlx_available() {
            return Err(WidgetError::NlxUnavailable);
        }
        let (form, row) = self.parts(index)?;
        form.nlx.enabled = !form.nlx.enabled;
        if form.nlx.enabled && form.nlx.service.is_none() {
            form.nlx.service = form
                .nlx
                .organization
                .as_deref()
                .and_then(|org| constants.service_choices(org).into_iter().next())
                .map(|choice| choice.value);
        }
        form.sync_row(row, &constants);
        Ok(form.nlx.enabled)
    }

    /// Pick an NLX organization
    ///
    /// Keeps the picked service if the organization offers it, otherwise
    /// moves to the organization's first service.
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    /// - `WidgetError::NlxUnavailable` without an outway
    /// - `WidgetError::InvalidChoice` if the organization is unknown
    pub fn select_organization(
        &mut self,
        index: usize,
        organization: &str,
    ) -> Result<(), WidgetError> {
        let constants = Arc::clone(&self.constants);
        if !constants.nlx_available() {
            return Err(WidgetError::NlxUnavailable);
        }
        if !constants.nlx_choices.contains_key(organization) {
            return Err(WidgetError::invalid_choice(NLX_ORGANIZATIONS, organization));
        }

        let (form, row) = self.parts(index)?;
        let services = constants.service_choices(organization);
        let keep = form
            .nlx
            .service
            .as_deref()
            .is_some_and(|url| services.iter().any(|c| c.value == url));
        if !keep {
            form.nlx.service = services.into_iter().next().map(|choice| choice.value);
        }
        form.nlx.organization = Some(organization.to_string());
        form.sync_row(row, &constants);
        Ok(())
    }

    /// Pick an NLX service of the selected organization
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    /// - `WidgetError::NlxUnavailable` without an outway
    /// - `WidgetError::InvalidChoice` if the organization does not offer it
    pub fn select_service(&mut self, index: usize, url: &str) -> Result<(), WidgetError> {
        let constants = Arc::clone(&self.constants);
        if !constants.nlx_available() {
            return Err(WidgetError::NlxUnavailable);
        }
        let (form, row) = self.parts(index)?;
        let offered = form
            .nlx
            .organization
            .as_deref()
            .is_some_and(|org| constants.service_choices(org).iter().any(|c| c.value == url));
        if !offered {
            return Err(WidgetError::invalid_choice(NLX, url));
        }

        form.nlx.service = Some(url.to_string());
        row.clear_errors(NLX);
        form.sync_row(row, &constants);
        Ok(())
    }

    /// Mark or unmark a service for deletion
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    pub fn mark_deleted(&mut self, index: usize, deleted: bool) -> Result<(), WidgetError> {
        self.formset.mark_deleted(index, deleted)?;
        Ok(())
    }

    /// Encode the formset for posting
    #[must_use]
    pub fn submission(&self) -> Submission {
        self.formset.submission()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const OUTWAY: &str = "http://outway.local/";

    fn constants(outway: Option<&str>) -> Arc<ServiceConstants> {
        let choices: NlxChoices = serde_json::from_value(json!({
            "utrecht": {
                "http://outway.local/utrecht/zaken/": {"service_name": "zaken"},
                "http://outway.local/utrecht/documenten/": {"service_name": "documenten"},
            },
            "vng": {
                "http://outway.local/vng/selectielijst/": {"service_name": "selectielijst"},
            },
        }))
        .unwrap();
        Arc::new(ServiceConstants::new().with_nlx(outway.map(str::to_string), choices))
    }

    fn mounted(values: serde_json::Value, outway: Option<&str>) -> ExternalServiceFormset {
        let row = RowData::from_values(serde_json::from_value(values).unwrap());
        ExternalServiceFormset::mount(&ManagementConfig::new("form", 1, 1), vec![row], constants(outway))
            .unwrap()
    }

    #[test]
    fn initial_organization_from_url() {
        let orgs = vec![Choice::same("utrecht"), Choice::same("vng")];
        assert_eq!(
            initial_organization(&orgs, "http://outway.local/vng/selectielijst/", Some(OUTWAY)),
            Some("vng".to_string())
        );
        assert_eq!(
            initial_organization(&orgs, "https://elsewhere/api/", Some(OUTWAY)),
            Some("utrecht".to_string())
        );
        assert_eq!(initial_organization(&orgs, "", None), Some("utrecht".to_string()));
        assert_eq!(initial_organization(&[], "http://outway.local/vng/", Some(OUTWAY)), None);
    }

    #[test]
    fn auth_type_decides_credentials() {
        let mut formset = mounted(
            json!({"auth_type": "zgw", "client_id": "oz", "header_key": "Authorization"}),
            None,
        );
        let row = formset.row(0).unwrap();
        assert_eq!(row.text("client_id"), Some("oz"));
        assert_eq!(row.text("secret"), Some(""));
        assert!(row.get("header_key").is_none());

        formset.set_auth_type(0, Some(AuthType::ApiKey)).unwrap();
        let row = formset.row(0).unwrap();
        assert!(row.get("client_id").is_none());
        assert_eq!(row.text("header_key"), Some("Authorization"));

        assert!(matches!(
            formset.set_text(0, "secret", "x"),
            Err(WidgetError::FieldNotApplicable { .. })
        ));
        formset.set_text(0, "header_value", "Token abc").unwrap();
        formset.set_auth_type(0, Some(AuthType::NoAuth)).unwrap();
        assert!(formset.form(0).unwrap().credential_fields().is_empty());
    }

    #[test]
    fn nlx_disabled_without_outway() {
        let mut formset = mounted(json!({"nlx": "http://outway.local/utrecht/zaken/"}), None);
        assert!(!formset.submission().contains("form-0-nlx"));
        assert!(matches!(formset.toggle_nlx(0), Err(WidgetError::NlxUnavailable)));
    }

    #[test]
    fn nlx_pickers_follow_the_catalog() {
        let mut formset = mounted(json!({"nlx": "http://outway.local/utrecht/zaken/"}), Some(OUTWAY));
        let form = formset.form(0).unwrap();
        assert!(form.nlx().enabled);
        assert_eq!(form.nlx().organization.as_deref(), Some("utrecht"));

        let submission = formset.submission();
        assert_eq!(submission.get("form-0-is_nlx"), Some("on"));
        assert_eq!(submission.get("form-0-nlx_organizations"), Some("utrecht"));

        formset.select_organization(0, "vng").unwrap();
        assert_eq!(
            formset.row(0).unwrap().text(NLX),
            Some("http://outway.local/vng/selectielijst/")
        );
        assert!(matches!(
            formset.select_service(0, "http://outway.local/utrecht/zaken/"),
            Err(WidgetError::InvalidChoice { .. })
        ));

        assert!(!formset.toggle_nlx(0).unwrap());
        let submission = formset.submission();
        assert!(!submission.contains("form-0-is_nlx"));
        assert!(!submission.contains("form-0-nlx"));
    }

    #[test]
    fn api_type_must_be_known() {
        let mut formset = mounted(json!({"api_type": "zrc"}), None);
        formset.set_api_type(0, "drc").unwrap();
        assert!(matches!(
            formset.set_api_type(0, "xyz"),
            Err(WidgetError::InvalidChoice { .. })
        ));
    }

    #[test]
    fn added_service_posts_empty_text_fields() {
        let mut formset = mounted(json!({"label": "ZRC"}), None);
        let index = formset.add_form().unwrap();
        let submission = formset.submission();

        assert_eq!(index, 1);
        assert_eq!(submission.get("form-1-label"), Some(""));
        assert_eq!(submission.get("form-TOTAL_FORMS"), Some("2"));
        assert_eq!(formset.form(1).unwrap().css_class(), "external-form--odd");
    }

    #[test]
    fn unknown_auth_type_is_posted_back() {
        let mut formset = mounted(
            json!({"auth_type": "oauth2", "client_id": "open-zaak", "label": "ZRC"}),
            None,
        );

        assert_eq!(formset.form(0).unwrap().auth_type(), None);
        let submission = formset.submission();
        assert_eq!(submission.get("form-0-auth_type"), Some("oauth2"));
        assert!(!submission.contains("form-0-client_id"));

        formset.set_auth_type(0, Some(AuthType::NoAuth)).unwrap();
        assert_eq!(formset.submission().get("form-0-auth_type"), Some("no_auth"));
    }
}
