//! Authorization formset
//!
//! One row per authorization: a component, the scopes granted for it and
//! the component's extra fields (related type selection, external types,
//! confidentiality). Picking a component refilters the scopes; fields that
//! do not apply to the picked component are not posted.
//!
//! Every edit goes through [`AutorisatieFormset`], which keeps the widget
//! state and the underlying formset row in agreement.

use crate::component::{Component, ExtraFields, TypeSelection, TypesField};
use crate::error::WidgetError;
use crate::fields;
use adminkit_choices::{Choice, ChoiceCatalog, ChoiceList, DependentChoices};
use adminkit_formset::{FieldValues, Formset, ManagementConfig, Row, RowData, Submission};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Component field
pub const COMPONENT: &str = "component";
/// Scopes field
pub const SCOPES: &str = "scopes";
/// Related type selection method field
pub const RELATED_TYPE_SELECTION: &str = "related_type_selection";
/// External type URLs field
pub const EXTERNE_TYPEN: &str = "externe_typen";
/// Confidentiality field
pub const VERTROUWELIJKHEIDAANDUIDING: &str = "vertrouwelijkheidaanduiding";
/// Method under which types are picked one by one
pub const MANUAL_SELECT: &str = "manual_select";

const VERBOSE_NAME_PLURAL: &str = "{verbose_name_plural}";

/// Primary key as the server serializes it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pk {
    /// Integer key
    Int(i64),
    /// String key
    Str(String),
}

impl fmt::Display for Pk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

/// A type that can be selected explicitly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeOption {
    /// Primary key
    pub id: Pk,
    /// Display name
    #[serde(rename = "str")]
    pub name: String,
}

/// A catalogus with its selectable types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogus {
    /// Primary key
    pub id: Pk,
    /// Display name
    #[serde(rename = "str")]
    pub name: String,
    /// Zaaktypen in this catalogus
    #[serde(default)]
    pub zaaktypen: Vec<TypeOption>,
    /// Informatieobjecttypen in this catalogus
    #[serde(default)]
    pub informatieobjecttypen: Vec<TypeOption>,
    /// Besluittypen in this catalogus
    #[serde(default)]
    pub besluittypen: Vec<TypeOption>,
}

impl Catalogus {
    /// Types listed under a field
    #[must_use]
    pub fn types(&self, field: TypesField) -> &[TypeOption] {
        match field {
            TypesField::Zaaktypen => &self.zaaktypen,
            TypesField::Informatieobjecttypen => &self.informatieobjecttypen,
            TypesField::Besluittypen => &self.besluittypen,
        }
    }

    /// Types as checkbox choices, keyed by stringified id
    #[must_use]
    pub fn type_choices(&self, field: TypesField) -> Vec<Choice> {
        self.types(field)
            .iter()
            .map(|t| Choice::new(t.id.to_string(), t.name.as_str()))
            .collect()
    }
}

/// Checkbox group of one catalogus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogusOptions {
    /// Catalogus display name
    pub catalogus: String,
    /// Selectable types
    pub choices: Vec<Choice>,
}

/// Page-wide constants for the authorization widgets
#[derive(Debug, Clone, Default)]
pub struct AuthorizationConstants {
    /// Scope choices and the component prefix table
    pub scopes: Arc<ChoiceCatalog>,
    /// Related type selection methods; labels may hold `{verbose_name_plural}`
    pub related_type_selection_methods: ChoiceList,
    /// Confidentiality levels
    pub vertrouwelijkheidaanduiding: ChoiceList,
    /// Catalogi with their types
    pub catalogi: Vec<Catalogus>,
}

impl AuthorizationConstants {
    /// Create with scope configuration only
    #[inline]
    #[must_use]
    pub fn new(scopes: Arc<ChoiceCatalog>) -> Self {
        Self {
            scopes,
            ..Self::default()
        }
    }

    /// With related type selection methods
    #[inline]
    #[must_use]
    pub fn with_methods(mut self, methods: ChoiceList) -> Self {
        self.related_type_selection_methods = methods;
        self
    }

    /// With confidentiality levels
    #[inline]
    #[must_use]
    pub fn with_vertrouwelijkheidaanduiding(mut self, choices: ChoiceList) -> Self {
        self.vertrouwelijkheidaanduiding = choices;
        self
    }

    /// With catalogi
    #[inline]
    #[must_use]
    pub fn with_catalogi(mut self, catalogi: Vec<Catalogus>) -> Self {
        self.catalogi = catalogi;
        self
    }

    /// Method choices with the type name filled in
    #[must_use]
    pub fn method_choices(&self, selection: &TypeSelection) -> Vec<Choice> {
        self.related_type_selection_methods
            .iter()
            .map(|c| {
                Choice::new(
                    c.value.as_str(),
                    c.label.replace(VERBOSE_NAME_PLURAL, selection.verbose_name_plural),
                )
            })
            .collect()
    }

    /// Type checkbox groups for a field, one per catalogus
    #[must_use]
    pub fn type_options(&self, field: TypesField) -> Vec<CatalogusOptions> {
        self.catalogi
            .iter()
            .map(|catalogus| CatalogusOptions {
                catalogus: catalogus.name.clone(),
                choices: catalogus.type_choices(field),
            })
            .collect()
    }

    /// Check if a type id exists under a field
    #[must_use]
    pub fn has_type(&self, field: TypesField, id: &str) -> bool {
        self.catalogi
            .iter()
            .flat_map(|c| c.types(field))
            .any(|t| t.id.to_string() == id)
    }
}

/// A text input rendered for one list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    /// Element id
    pub id: String,
    /// Input name
    pub name: String,
    /// Current value
    pub value: String,
}

/// Growable list of external type URLs
///
/// Always shows at least one input. Every input posts under the same name,
/// empty ones included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTypes {
    values: Vec<String>,
}

impl ExternalTypes {
    /// Create from initial values
    #[must_use]
    pub fn new(initial: Vec<String>) -> Self {
        let values = if initial.is_empty() {
            vec![String::new()]
        } else {
            initial
        };
        Self { values }
    }

    /// Append an empty input, returning its position
    pub fn add(&mut self) -> usize {
        self.values.push(String::new());
        self.values.len() - 1
    }

    /// Input values
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of inputs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; at least one input is shown
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Inputs as rendered under a row prefix
    #[must_use]
    pub fn inputs(&self, row_prefix: &str) -> Vec<TextInput> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| TextInput {
                id: external_type_id(row_prefix, i),
                name: format!("{row_prefix}-{EXTERNE_TYPEN}"),
                value: value.clone(),
            })
            .collect()
    }

    fn set(&mut self, position: usize, value: String) -> Option<()> {
        *self.values.get_mut(position)? = value;
        Some(())
    }
}

fn external_type_id(row_prefix: &str, position: usize) -> String {
    format!("id_{row_prefix}-{EXTERNE_TYPEN}_{position}")
}

/// Widget state of one authorization row
#[derive(Debug, Clone)]
pub struct AutorisatieForm {
    index: usize,
    prefix: String,
    initial: FieldValues,
    component: Option<Component>,
    unrecognized_component: Option<String>,
    scopes: DependentChoices,
    related_type_selection: Option<String>,
    selected_types: IndexSet<String>,
    external_types: ExternalTypes,
    vertrouwelijkheidaanduiding: Option<String>,
}

impl AutorisatieForm {
    fn from_row(row: &Row, constants: &AuthorizationConstants) -> Self {
        let mut unrecognized_component = None;
        let component = row.text(COMPONENT).and_then(|value| {
            Component::parse_optional(value)
                .map_err(|err| {
                    tracing::warn!(row = row.index(), "keeping unrecognized component: {err}");
                    unrecognized_component = Some(value.to_string());
                })
                .ok()
                .flatten()
        });
        let scopes = DependentChoices::with_initial(
            Arc::clone(&constants.scopes),
            component.map(Component::as_str),
            row.list(SCOPES),
        );

        let mut form = Self {
            index: row.index(),
            prefix: row.prefix().to_string(),
            initial: row.values().clone(),
            component,
            unrecognized_component,
            scopes,
            related_type_selection: None,
            selected_types: IndexSet::new(),
            external_types: ExternalTypes::new(Vec::new()),
            vertrouwelijkheidaanduiding: None,
        };
        form.reset_extras();
        form
    }

    /// Load the extra fields for the current component from the row's
    /// initial values
    fn reset_extras(&mut self) {
        let extras = self.extra_fields();
        let text = |field: &str| fields::text(&self.initial, field);
        let list = |field: &str| fields::list(&self.initial, field);

        self.related_type_selection = extras.types.and_then(|_| text(RELATED_TYPE_SELECTION));
        self.selected_types = extras
            .types
            .map(|types| list(types.field.as_str()).into_iter().collect())
            .unwrap_or_default();
        self.external_types = ExternalTypes::new(if extras.types.is_some() {
            list(EXTERNE_TYPEN)
        } else {
            Vec::new()
        });
        self.vertrouwelijkheidaanduiding = if extras.confidentiality {
            text(VERTROUWELIJKHEIDAANDUIDING)
        } else {
            None
        };
    }

    /// Write the widget state into the row without touching its errors
    fn sync_row(&self, row: &mut Row) {
        let extras = self.extra_fields();

        let component = match (self.component, &self.unrecognized_component) {
            (Some(component), _) => component.as_str(),
            (None, Some(raw)) => raw.as_str(),
            (None, None) => "",
        };
        row.sync(COMPONENT, component);
        row.sync(SCOPES, self.scopes.selected());

        for field in [
            TypesField::Zaaktypen,
            TypesField::Informatieobjecttypen,
            TypesField::Besluittypen,
        ] {
            if extras.types.map(|t| t.field) != Some(field) {
                fields::drop_value(row, field.as_str());
            }
        }
        match extras.types {
            Some(types) => {
                row.sync(
                    RELATED_TYPE_SELECTION,
                    self.related_type_selection.clone().unwrap_or_default(),
                );
                if self.shows_type_options() {
                    row.sync(
                        types.field.as_str(),
                        self.selected_types.iter().cloned().collect::<Vec<_>>(),
                    );
                    row.sync(EXTERNE_TYPEN, self.external_types.values().to_vec());
                } else {
                    fields::drop_value(row, types.field.as_str());
                    fields::drop_value(row, EXTERNE_TYPEN);
                }
            }
            None => {
                fields::drop_value(row, RELATED_TYPE_SELECTION);
                fields::drop_value(row, EXTERNE_TYPEN);
            }
        }

        if extras.confidentiality {
            if let Some(va) = &self.vertrouwelijkheidaanduiding {
                row.sync(VERTROUWELIJKHEIDAANDUIDING, va.as_str());
            } else {
                fields::drop_value(row, VERTROUWELIJKHEIDAANDUIDING);
            }
        } else {
            fields::drop_value(row, VERTROUWELIJKHEIDAANDUIDING);
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

    /// Picked component
    #[inline]
    #[must_use]
    pub fn component(&self) -> Option<Component> {
        self.component
    }

    /// Scopes offered for the picked component
    #[inline]
    #[must_use]
    pub fn available_scopes(&self) -> &[Choice] {
        self.scopes.available()
    }

    /// Check if any scope is offered; if not, ask to pick a component first
    #[inline]
    #[must_use]
    pub fn has_scope_choices(&self) -> bool {
        self.scopes.has_choices()
    }

    /// Selected scopes in display order
    #[must_use]
    pub fn selected_scopes(&self) -> Vec<String> {
        self.scopes.selected()
    }

    /// Extra fields for the picked component
    #[must_use]
    pub fn extra_fields(&self) -> ExtraFields {
        self.component
            .map_or(ExtraFields::NONE, Component::extra_fields)
    }

    /// Related type selection method
    #[inline]
    #[must_use]
    pub fn related_type_selection(&self) -> Option<&str> {
        self.related_type_selection.as_deref()
    }

    /// Whether the explicit type checkboxes and external types are shown
    #[must_use]
    pub fn shows_type_options(&self) -> bool {
        self.extra_fields().types.is_some()
            && self.related_type_selection.as_deref() == Some(MANUAL_SELECT)
    }

    /// Explicitly selected type ids
    #[must_use]
    pub fn selected_types(&self) -> Vec<&str> {
        self.selected_types.iter().map(String::as_str).collect()
    }

    /// External type URLs
    #[inline]
    #[must_use]
    pub fn external_types(&self) -> &ExternalTypes {
        &self.external_types
    }

    /// External type inputs as rendered
    #[must_use]
    pub fn external_type_inputs(&self) -> Vec<TextInput> {
        self.external_types.inputs(&self.prefix)
    }

    /// Confidentiality level
    #[inline]
    #[must_use]
    pub fn vertrouwelijkheidaanduiding(&self) -> Option<&str> {
        self.vertrouwelijkheidaanduiding.as_deref()
    }

    /// Row parity class
    #[must_use]
    pub fn css_class(&self) -> &'static str {
        if self.index % 2 == 0 {
            "autorisatie-form--even"
        } else {
            "autorisatie-form--odd"
        }
    }

    fn selection(&self) -> String {
        self.component
            .map_or_else(|| "no component".to_string(), |c| c.to_string())
    }

    fn require_types(&self) -> Result<TypeSelection, WidgetError> {
        self.extra_fields()
            .types
            .ok_or_else(|| WidgetError::not_applicable(RELATED_TYPE_SELECTION, self.selection()))
    }

    fn require_type_options(&self, field: &str) -> Result<TypeSelection, WidgetError> {
        let types = self.require_types()?;
        if self.shows_type_options() {
            Ok(types)
        } else {
            Err(WidgetError::not_applicable(
                field,
                format!(
                    "{RELATED_TYPE_SELECTION}={}",
                    self.related_type_selection.as_deref().unwrap_or("")
                ),
            ))
        }
    }
}

/// Formset of authorization rows
#[derive(Debug, Clone)]
pub struct AutorisatieFormset {
    formset: Formset,
    forms: Vec<AutorisatieForm>,
    constants: Arc<AuthorizationConstants>,
}

impl AutorisatieFormset {
    /// Mount from the page's formset configuration and row data
    ///
    /// Unknown component values are logged and posted back unchanged so
    /// the server reports them; scopes not offered for the row's component
    /// are dropped.
    ///
    /// # Errors
    /// - `WidgetError::Formset` if the counters or row data are inconsistent
    pub fn mount(
        config: &ManagementConfig,
        rows: Vec<RowData>,
        constants: Arc<AuthorizationConstants>,
    ) -> Result<Self, WidgetError> {
        let mut formset = Formset::mount(config, rows)?;
        let mut forms = Vec::with_capacity(formset.len());
        for index in 0..formset.len() {
            let row = formset.row_mut(index)?;
            let form = AutorisatieForm::from_row(row, &constants);
            form.sync_row(row);
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
    pub fn constants(&self) -> &Arc<AuthorizationConstants> {
        &self.constants
    }

    /// All forms in row order
    #[inline]
    #[must_use]
    pub fn forms(&self) -> &[AutorisatieForm] {
        &self.forms
    }

    /// Form by row index
    #[inline]
    #[must_use]
    pub fn form(&self, index: usize) -> Option<&AutorisatieForm> {
        self.forms.get(index)
    }

    /// Row by index
    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.formset.row(index)
    }

    /// Whether another authorization may be added
    #[inline]
    #[must_use]
    pub fn can_add_form(&self) -> bool {
        self.formset.can_add_row()
    }

    /// Append a blank authorization, returning its index
    ///
    /// # Errors
    /// - `WidgetError::Formset` with `LimitExceeded` at `MAX_NUM_FORMS`
    pub fn add_form(&mut self) -> Result<usize, WidgetError> {
        let index = self.formset.add_row()?.index();
        let row = self.formset.row_mut(index)?;
        let form = AutorisatieForm::from_row(row, &self.constants);
        form.sync_row(row);
        self.forms.push(form);
        Ok(index)
    }

    fn parts(&mut self, index: usize) -> Result<(&mut AutorisatieForm, &mut Row), WidgetError> {
        let form = self
            .forms
            .get_mut(index)
            .ok_or(WidgetError::UnknownRow(index))?;
        let row = self.formset.row_mut(index)?;
        Ok((form, row))
    }

    /// Pick a component, returning the scopes dropped from the selection
    ///
    /// The extra fields are reloaded for the new component.
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    pub fn select_component(
        &mut self,
        index: usize,
        component: Option<Component>,
    ) -> Result<Vec<String>, WidgetError> {
        let (form, row) = self.parts(index)?;
        form.component = component;
        form.unrecognized_component = None;
        let dropped = form.scopes.set_parent(component.map(Component::as_str));
        form.reset_extras();

        row.clear_errors(COMPONENT);
        form.sync_row(row);

        if !dropped.is_empty() {
            tracing::debug!(row = index, ?dropped, "dropped scopes after component change");
        }
        Ok(dropped)
    }

    /// Flip a scope, returning whether it is now selected
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    /// - `WidgetError::Choice` if the scope is not offered for the component
    pub fn toggle_scope(&mut self, index: usize, scope: &str) -> Result<bool, WidgetError> {
        let (form, row) = self.parts(index)?;
        let selected = form.scopes.toggle(scope)?;
        row.set(SCOPES, form.scopes.selected());
        Ok(selected)
    }

    /// Method choices with the component's type name filled in
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    /// - `WidgetError::FieldNotApplicable` if the component has no type selection
    pub fn method_choices(&self, index: usize) -> Result<Vec<Choice>, WidgetError> {
        let form = self.form(index).ok_or(WidgetError::UnknownRow(index))?;
        let types = form.require_types()?;
        Ok(self.constants.method_choices(&types))
    }

    /// Pick the related type selection method
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    /// - `WidgetError::FieldNotApplicable` if the component has no type selection
    /// - `WidgetError::InvalidChoice` if the method is unknown
    pub fn set_related_type_selection(
        &mut self,
        index: usize,
        method: &str,
    ) -> Result<(), WidgetError> {
        let constants = Arc::clone(&self.constants);
        let (form, row) = self.parts(index)?;
        form.require_types()?;
        if !constants.related_type_selection_methods.contains(method) {
            return Err(WidgetError::invalid_choice(RELATED_TYPE_SELECTION, method));
        }

        form.related_type_selection = Some(method.to_string());
        row.clear_errors(RELATED_TYPE_SELECTION);
        form.sync_row(row);
        Ok(())
    }

    /// Type checkbox groups, empty unless types are picked manually
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    pub fn type_options(&self, index: usize) -> Result<Vec<CatalogusOptions>, WidgetError> {
        let form = self.form(index).ok_or(WidgetError::UnknownRow(index))?;
        Ok(match form.extra_fields().types {
            Some(types) if form.shows_type_options() => self.constants.type_options(types.field),
            _ => Vec::new(),
        })
    }

    /// Flip an explicitly selected type, returning whether it is now selected
    ///
    /// Changing the selection clears the type field's errors.
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    /// - `WidgetError::FieldNotApplicable` unless types are picked manually
    /// - `WidgetError::InvalidChoice` if no catalogus lists the type
    pub fn toggle_type(&mut self, index: usize, id: &str) -> Result<bool, WidgetError> {
        let constants = Arc::clone(&self.constants);
        let (form, row) = self.parts(index)?;
        let field = form
            .extra_fields()
            .types
            .map_or(RELATED_TYPE_SELECTION, |t| t.field.as_str());
        let types = form.require_type_options(field)?;
        if !constants.has_type(types.field, id) {
            return Err(WidgetError::invalid_choice(types.field.as_str(), id));
        }

        let selected = if form.selected_types.shift_remove(id) {
            false
        } else {
            form.selected_types.insert(id.to_string());
            true
        };
        row.set(
            types.field.as_str(),
            form.selected_types.iter().cloned().collect::<Vec<_>>(),
        );
        Ok(selected)
    }

    /// Append an external type input, returning its position
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    /// - `WidgetError::FieldNotApplicable` unless types are picked manually
    pub fn add_external_type(&mut self, index: usize) -> Result<usize, WidgetError> {
        let (form, row) = self.parts(index)?;
        form.require_type_options(EXTERNE_TYPEN)?;
        let position = form.external_types.add();
        row.sync(EXTERNE_TYPEN, form.external_types.values().to_vec());
        Ok(position)
    }

    /// Edit an external type input
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    /// - `WidgetError::FieldNotApplicable` unless types are picked manually
    /// - `WidgetError::UnknownInput` if there is no input at `position`
    pub fn set_external_type(
        &mut self,
        index: usize,
        position: usize,
        url: impl Into<String>,
    ) -> Result<(), WidgetError> {
        let (form, row) = self.parts(index)?;
        form.require_type_options(EXTERNE_TYPEN)?;
        form.external_types
            .set(position, url.into())
            .ok_or_else(|| WidgetError::UnknownInput(external_type_id(&form.prefix, position)))?;
        row.set(EXTERNE_TYPEN, form.external_types.values().to_vec());
        Ok(())
    }

    /// Pick a confidentiality level
    ///
    /// # Errors
    /// - `WidgetError::UnknownRow` if no row has this index
    /// - `WidgetError::FieldNotApplicable` if the component has no confidentiality
    /// - `WidgetError::InvalidChoice` if the level is unknown
    pub fn set_vertrouwelijkheidaanduiding(
        &mut self,
        index: usize,
        level: &str,
    ) -> Result<(), WidgetError> {
        let constants = Arc::clone(&self.constants);
        let (form, row) = self.parts(index)?;
        if !form.extra_fields().confidentiality {
            return Err(WidgetError::not_applicable(
                VERTROUWELIJKHEIDAANDUIDING,
                form.selection(),
            ));
        }
        if !constants.vertrouwelijkheidaanduiding.contains(level) {
            return Err(WidgetError::invalid_choice(VERTROUWELIJKHEIDAANDUIDING, level));
        }

        form.vertrouwelijkheidaanduiding = Some(level.to_string());
        row.set(VERTROUWELIJKHEIDAANDUIDING, level);
        Ok(())
    }

    /// Mark or unmark an authorization for deletion
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
