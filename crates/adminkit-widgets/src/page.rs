//! Mounting widgets from the host page's data blocks

use crate::autorisatie::{AuthorizationConstants, AutorisatieFormset, Catalogus};
use crate::component::default_prefix_table;
use crate::error::WidgetError;
use crate::external_service::{ExternalServiceFormset, NlxChoices, ServiceConstants};
use adminkit_choices::{ChoiceCatalog, ChoiceList, PrefixTable};
use adminkit_formset::{DataBlocks, ManagementConfig, RowData};
use std::sync::Arc;

/// Formset configuration block
pub const FORMSET_CONFIG: &str = "formset-config";
/// Row data block
pub const FORMDATA: &str = "formdata";
/// All scope choices
pub const SCOPE_CHOICES: &str = "scope-choices";
/// Component to scope prefix table
pub const COMPONENT_PREFIXES: &str = "component-prefixes";
/// Related type selection methods
pub const RELATED_TYPE_SELECTION_METHODS: &str = "related-type-selection-methods";
/// Confidentiality levels
pub const VA_CHOICES: &str = "va-choices";
/// Catalogi with their types
pub const CATALOGI: &str = "catalogi";
/// Auth type choices
pub const AUTH_TYPES: &str = "auth-types";
/// NLX outway URL, `null` when not configured
pub const NLX_OUTWAY: &str = "nlx-outway";
/// NLX catalog
pub const NLX_CHOICES: &str = "nlx-choices";

fn formset_parts(blocks: &DataBlocks) -> Result<(ManagementConfig, Vec<RowData>), WidgetError> {
    let config = blocks.get(FORMSET_CONFIG)?;
    let rows = blocks.get(FORMDATA)?;
    Ok((config, rows))
}

/// Authorization constants from the page's blocks
///
/// Only the scope choices are required. Without a prefix table the built-in
/// one is used.
///
/// # Errors
/// - `WidgetError::Formset` if a block is missing or malformed
pub fn authorization_constants(blocks: &DataBlocks) -> Result<AuthorizationConstants, WidgetError> {
    let choices: ChoiceList = blocks.get(SCOPE_CHOICES)?;
    let prefixes = blocks
        .get_optional::<PrefixTable>(COMPONENT_PREFIXES)?
        .unwrap_or_else(default_prefix_table);
    let methods = blocks
        .get_optional(RELATED_TYPE_SELECTION_METHODS)?
        .unwrap_or_default();
    let va_choices = blocks.get_optional(VA_CHOICES)?.unwrap_or_default();
    let catalogi: Vec<Catalogus> = blocks.get_optional(CATALOGI)?.unwrap_or_default();

    Ok(
        AuthorizationConstants::new(Arc::new(ChoiceCatalog::new(choices, prefixes)))
            .with_methods(methods)
            .with_vertrouwelijkheidaanduiding(va_choices)
            .with_catalogi(catalogi),
    )
}

/// Mount the authorizations formset
///
/// # Errors
/// - `WidgetError::Formset` if a block is missing or malformed, or the
///   counters disagree with the rows
pub fn mount_authorizations(blocks: &DataBlocks) -> Result<AutorisatieFormset, WidgetError> {
    let (config, rows) = formset_parts(blocks)?;
    let constants = authorization_constants(blocks)?;
    tracing::debug!(rows = rows.len(), prefix = %config.prefix, "mounting authorizations");
    AutorisatieFormset::mount(&config, rows, Arc::new(constants))
}

/// External service constants from the page's blocks
///
/// # Errors
/// - `WidgetError::Formset` if a block is malformed
pub fn service_constants(blocks: &DataBlocks) -> Result<ServiceConstants, WidgetError> {
    let mut constants = ServiceConstants::new();
    if let Some(auth_types) = blocks.get_optional::<ChoiceList>(AUTH_TYPES)? {
        constants = constants.with_auth_types(auth_types);
    }
    let outway = blocks.get_optional::<String>(NLX_OUTWAY)?;
    let nlx_choices = blocks
        .get_optional::<NlxChoices>(NLX_CHOICES)?
        .unwrap_or_default();
    Ok(constants.with_nlx(outway, nlx_choices))
}

/// Mount the external services formset
///
/// # Errors
/// - `WidgetError::Formset` if a block is missing or malformed, or the
///   counters disagree with the rows
pub fn mount_external_services(blocks: &DataBlocks) -> Result<ExternalServiceFormset, WidgetError> {
    let (config, rows) = formset_parts(blocks)?;
    let constants = service_constants(blocks)?;
    if !constants.nlx_available() {
        tracing::debug!("no nlx outway configured, nlx fields disabled");
    }
    ExternalServiceFormset::mount(&config, rows, Arc::new(constants))
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminkit_formset::FormsetError;
    use serde_json::json;

    fn minimal() -> DataBlocks {
        DataBlocks::new()
            .with(
                FORMSET_CONFIG,
                json!({"prefix": "form", "TOTAL_FORMS": 1, "INITIAL_FORMS": 0}),
            )
            .with(FORMDATA, json!([{"values": {}, "errors": {}}]))
            .with(SCOPE_CHOICES, json!([["zaken.lezen", "Zaken lezen"]]))
    }

    #[test]
    fn missing_prefix_table_uses_builtin() {
        let constants = authorization_constants(&minimal()).unwrap();
        assert_eq!(constants.scopes.prefixes.len(), 6);
        assert!(constants.catalogi.is_empty());
    }

    #[test]
    fn missing_formdata_is_reported() {
        let blocks = DataBlocks::new()
            .with(FORMSET_CONFIG, json!({"prefix": "form", "TOTAL_FORMS": 0, "INITIAL_FORMS": 0}))
            .with(SCOPE_CHOICES, json!([]));
        let err = mount_authorizations(&blocks).unwrap_err();
        assert!(matches!(
            err,
            WidgetError::Formset(FormsetError::MissingBlock(ref id)) if id == FORMDATA
        ));
    }

    #[test]
    fn null_outway_disables_nlx() {
        let blocks = minimal().with(NLX_OUTWAY, json!(null));
        let constants = service_constants(&blocks).unwrap();
        assert!(!constants.nlx_available());
        assert_eq!(constants.api_types.len(), 10);
    }
}
