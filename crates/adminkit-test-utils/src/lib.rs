//! Testing utilities for the adminkit workspace
//!
//! Shared fixtures and controllable option sources.

#![allow(missing_docs)]

use adminkit_choices::{Choice, ChoiceCatalog, ChoiceList, PrefixTable};
use adminkit_formset::DataBlocks;
use adminkit_options::{FetchError, OptionSource};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

pub const NLX_OUTWAY: &str = "http://outway.local:8080/";

pub fn scope_pairs() -> Vec<(&'static str, &'static str)> {
    vec![
        ("audittrails.lezen", "Audittrails lezen"),
        ("autorisaties.bijwerken", "Autorisaties bijwerken"),
        ("autorisaties.lezen", "Autorisaties lezen"),
        ("besluiten.aanmaken", "Besluiten aanmaken"),
        ("besluiten.lezen", "Besluiten lezen"),
        ("catalogi.lezen", "Catalogi lezen"),
        ("catalogi.schrijven", "Catalogi schrijven"),
        ("documenten.aanmaken", "Documenten aanmaken"),
        ("documenten.lezen", "Documenten lezen"),
        ("notificaties.consumeren", "Notificaties consumeren"),
        ("notificaties.publiceren", "Notificaties publiceren"),
        ("zaken.aanmaken", "Zaken aanmaken"),
        ("zaken.bijwerken", "Zaken bijwerken"),
        ("zaken.lezen", "Zaken lezen"),
    ]
}

pub fn scope_choices() -> ChoiceList {
    ChoiceList::from_pairs(scope_pairs()).unwrap()
}

pub fn scope_prefixes() -> PrefixTable {
    PrefixTable::from_iter([
        ("ac", vec!["notificaties", "autorisaties"]),
        ("nrc", vec!["notificaties"]),
        ("zrc", vec!["audittrails", "notificaties", "zaken"]),
        ("ztc", vec!["notificaties", "catalogi"]),
        ("drc", vec!["audittrails", "notificaties", "documenten"]),
        ("brc", vec!["audittrails", "notificaties", "besluiten"]),
    ])
}

pub fn scope_catalog() -> Arc<ChoiceCatalog> {
    Arc::new(ChoiceCatalog::new(scope_choices(), scope_prefixes()))
}

pub fn formset_config(initial: usize, total: usize) -> Value {
    json!({
        "prefix": "form",
        "extra": total - initial,
        "TOTAL_FORMS": total,
        "INITIAL_FORMS": initial,
        "MIN_NUM_FORMS": 0,
        "MAX_NUM_FORMS": 1000,
    })
}

pub fn catalogi() -> Value {
    json!([
        {
            "id": 1,
            "str": "Gemeente Utrecht (ABC)",
            "zaaktypen": [
                {"id": 10, "str": "Melding openbare ruimte"},
                {"id": 11, "str": "Bezwaar"},
            ],
            "informatieobjecttypen": [{"id": 20, "str": "Foto"}],
            "besluittypen": [{"id": 30, "str": "Besluit op bezwaar"}],
        },
        {
            "id": 2,
            "str": "Gemeente Amsterdam (XYZ)",
            "zaaktypen": [{"id": 12, "str": "Parkeervergunning"}],
            "informatieobjecttypen": [],
            "besluittypen": [],
        },
    ])
}

/// Blocks of an authorizations page with one saved `zrc` authorization
pub fn authorization_blocks() -> DataBlocks {
    DataBlocks::new()
        .with("formset-config", formset_config(1, 1))
        .with(
            "formdata",
            json!([{
                "values": {
                    "component": "zrc",
                    "scopes": ["zaken.lezen", "zaken.bijwerken", "besluiten.lezen"],
                    "related_type_selection": "manual_select",
                    "zaaktypen": [10],
                    "externe_typen": ["https://ztc.example.com/zaaktypen/1"],
                    "vertrouwelijkheidaanduiding": "openbaar",
                },
                "errors": {
                    "zaaktypen": [{"msg": "Selecteer minstens één zaaktype.", "code": "required"}],
                },
            }]),
        )
        .with("scope-choices", json!(scope_pairs()))
        .with(
            "component-prefixes",
            json!({
                "ac": ["notificaties", "autorisaties"],
                "nrc": ["notificaties"],
                "zrc": ["audittrails", "notificaties", "zaken"],
                "ztc": ["notificaties", "catalogi"],
                "drc": ["audittrails", "notificaties", "documenten"],
                "brc": ["audittrails", "notificaties", "besluiten"],
            }),
        )
        .with(
            "related-type-selection-methods",
            json!([
                ["all_current", "Alle huidige {verbose_name_plural}"],
                ["all_current_and_future", "Alle huidige en toekomstige {verbose_name_plural}"],
                ["manual_select", "Selecteer handmatig {verbose_name_plural}"],
                ["select_catalogus", "Selecteer catalogus"],
            ]),
        )
        .with(
            "va-choices",
            json!([
                ["openbaar", "Openbaar"],
                ["beperkt_openbaar", "Beperkt openbaar"],
                ["intern", "Intern"],
                ["zaakvertrouwelijk", "Zaakvertrouwelijk"],
                ["vertrouwelijk", "Vertrouwelijk"],
                ["confidentieel", "Confidentieel"],
                ["geheim", "Geheim"],
                ["zeer_geheim", "Zeer geheim"],
            ]),
        )
        .with("catalogi", catalogi())
}

pub fn nlx_choices() -> Value {
    json!({
        "gemeente-utrecht": {
            "http://outway.local:8080/gemeente-utrecht/zaken/": {"service_name": "zaken"},
            "http://outway.local:8080/gemeente-utrecht/documenten/": {"service_name": "documenten"},
        },
        "vng": {
            "http://outway.local:8080/vng/selectielijst/": {"service_name": "selectielijst"},
        },
    })
}

/// Blocks of an external services page with one saved NLX service
pub fn service_blocks(outway: Option<&str>) -> DataBlocks {
    DataBlocks::new()
        .with("formset-config", formset_config(1, 1))
        .with(
            "formdata",
            json!([{
                "values": {
                    "id": 7,
                    "label": "Zaken API Utrecht",
                    "api_type": "zrc",
                    "api_root": "https://zaken.utrecht.local/api/v1/",
                    "nlx": "http://outway.local:8080/gemeente-utrecht/zaken/",
                    "oas": "https://zaken.utrecht.local/api/v1/schema/openapi.yaml",
                    "auth_type": "zgw",
                    "client_id": "open-zaak",
                    "secret": "geheim",
                    "user_id": "open-zaak",
                    "user_representation": "Open Zaak",
                },
                "errors": {},
            }]),
        )
        .with(
            "auth-types",
            json!([
                ["no_auth", "No authorization"],
                ["api_key", "API key"],
                ["zgw", "ZGW client_id + secret"],
            ]),
        )
        .with("nlx-outway", json!(outway))
        .with("nlx-choices", nlx_choices())
}

/// Option source answering from a fixed table and counting calls
#[derive(Debug, Default)]
pub struct StaticOptionSource {
    answers: HashMap<String, Result<Vec<Choice>, FetchError>>,
    calls: Mutex<Vec<String>>,
}

impl StaticOptionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<V: Into<String>, L: Into<String>>(
        mut self,
        key: &str,
        pairs: impl IntoIterator<Item = (V, L)>,
    ) -> Self {
        let choices = pairs.into_iter().map(|(v, l)| Choice::new(v, l)).collect();
        self.answers.insert(key.to_string(), Ok(choices));
        self
    }

    pub fn failing(mut self, key: &str, err: FetchError) -> Self {
        self.answers.insert(key.to_string(), Err(err));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl OptionSource for StaticOptionSource {
    async fn fetch(&self, key: &str) -> Result<Vec<Choice>, FetchError> {
        self.calls.lock().push(key.to_string());
        self.answers
            .get(key)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::status(404, format!("static://{key}"))))
    }
}

type Answer = Result<Vec<Choice>, FetchError>;

#[derive(Default)]
struct Gate {
    tx: Option<oneshot::Sender<Answer>>,
    rx: Option<oneshot::Receiver<Answer>>,
}

impl Gate {
    fn new() -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            tx: Some(tx),
            rx: Some(rx),
        }
    }
}

/// Option source whose answers are released by the test, in any order
///
/// Each key has one gate. `fetch` waits on it; `release` opens it.
/// Either may come first.
#[derive(Default)]
pub struct GatedOptionSource {
    gates: Mutex<HashMap<String, Gate>>,
    started: AtomicUsize,
}

impl GatedOptionSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn release(&self, key: &str, answer: Answer) {
        let tx = self
            .gates
            .lock()
            .entry(key.to_string())
            .or_insert_with(Gate::new)
            .tx
            .take()
            .expect("gate released twice");
        let _ = tx.send(answer);
    }

    pub fn release_ok<V: Into<String>>(&self, key: &str, values: impl IntoIterator<Item = V>) {
        self.release(key, Ok(values.into_iter().map(Choice::same).collect()));
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OptionSource for GatedOptionSource {
    async fn fetch(&self, key: &str) -> Result<Vec<Choice>, FetchError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let rx = self
            .gates
            .lock()
            .entry(key.to_string())
            .or_insert_with(Gate::new)
            .rx
            .take()
            .expect("key fetched twice");
        rx.await
            .unwrap_or_else(|_| Err(FetchError::Transport("gate dropped".into())))
    }
}
