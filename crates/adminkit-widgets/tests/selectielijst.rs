//! Selection list dropdowns over controllable sources

use adminkit_options::{FetchError, LoadStatus};
use adminkit_test_utils::{GatedOptionSource, StaticOptionSource};
use adminkit_widgets::selectielijst::{PROCESTYPE, SELECTIELIJSTKLASSE};
use adminkit_widgets::{AdminkitConfig, ProcestypeSelect, ResultaatSelect, WidgetError};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

const PT_2017_1: &str = "https://selectielijst.local/api/v1/procestypen/1";
const PT_2017_2: &str = "https://selectielijst.local/api/v1/procestypen/2";
const PT_2020_1: &str = "https://selectielijst.local/api/v1/procestypen/101";

fn procestypen() -> Arc<StaticOptionSource> {
    Arc::new(
        StaticOptionSource::new()
            .with(
                "2017",
                [
                    (PT_2017_1, "1 - Instellen en inrichten organisatie"),
                    (PT_2017_2, "2 - Inrichten informatievoorziening"),
                ],
            )
            .with("2020", [(PT_2020_1, "1 - Instellen en inrichten organisatie")]),
    )
}

#[tokio::test]
async fn initial_procestype_stays_selected_when_offered() {
    let mut select = ProcestypeSelect::new(procestypen(), PT_2017_2);
    assert_eq!(select.selected_value(), None);

    let state = select.load_year(2017).await;
    assert_eq!(state.status, LoadStatus::Ready);
    assert_eq!(select.selected_value().as_deref(), Some(PT_2017_2));

    select.load_year(2020).await;
    assert_eq!(select.selected_value().as_deref(), Some(PT_2020_1));
    assert_eq!(select.submission().get(PROCESTYPE), Some(PT_2020_1));
}

#[tokio::test]
async fn user_pick_is_reset_by_a_year_change() {
    let mut select = ProcestypeSelect::new(procestypen(), "");
    select.load_year(2017).await;
    select.select(PT_2017_2).unwrap();
    assert_eq!(select.selected_value().as_deref(), Some(PT_2017_2));

    assert!(matches!(
        select.select(PT_2020_1),
        Err(WidgetError::InvalidChoice { .. })
    ));

    select.load_year(2020).await;
    select.load_year(2017).await;
    assert_eq!(select.selected_value().as_deref(), Some(PT_2017_1));
}

#[tokio::test]
async fn year_must_be_numeric() {
    let source = procestypen();
    let mut select = ProcestypeSelect::new(Arc::clone(&source), "");

    assert!(matches!(
        select.set_year("twenty"),
        Err(WidgetError::InvalidChoice { .. })
    ));
    assert!(source.calls().is_empty());

    let handle = select.set_year(" 2017 ").unwrap().unwrap();
    handle.await.unwrap();
    assert_eq!(source.calls(), vec!["2017"]);
}

#[tokio::test]
async fn clearing_the_year_drops_the_previous_procestypen() {
    let source = procestypen();
    let mut select = ProcestypeSelect::new(Arc::clone(&source), PT_2017_2);
    select.load_year(2017).await;
    select.select(PT_2017_1).unwrap();

    assert!(select.set_year("  ").unwrap().is_none());
    let state = select.state();
    assert_eq!(state.status, LoadStatus::Ready);
    assert!(state.key.is_empty());
    assert!(state.options.is_empty());
    assert_eq!(select.selected_value(), None);
    assert_eq!(select.submission().get(PROCESTYPE), Some(""));
    assert_eq!(source.calls(), vec!["2017"]);
}

#[tokio::test]
async fn non_numeric_year_keeps_the_loaded_year() {
    let mut select = ProcestypeSelect::new(procestypen(), "");
    select.load_year(2017).await;

    assert!(matches!(
        select.set_year("2017a"),
        Err(WidgetError::InvalidChoice { .. })
    ));
    assert_eq!(select.state().key.as_str(), Some("2017"));
    assert_eq!(select.selected_value().as_deref(), Some(PT_2017_1));
}

#[tokio::test]
async fn late_procestypen_for_previous_year_are_ignored() {
    let source = GatedOptionSource::new();
    let mut select = ProcestypeSelect::new(Arc::clone(&source), "");

    let first = select.set_year("2017").unwrap().unwrap();
    let second = select.set_year("2020").unwrap().unwrap();
    assert_eq!(select.choices()[0].label, "Loading...");

    source.release_ok("2020", [PT_2020_1]);
    second.await.unwrap();
    source.release_ok("2017", [PT_2017_1]);
    assert!(first.await.unwrap().is_discarded());

    assert_eq!(select.state().key.as_str(), Some("2020"));
    assert_eq!(select.selected_value().as_deref(), Some(PT_2020_1));
}

#[tokio::test]
async fn empty_zaaktype_shows_no_radios_without_request() {
    let source = Arc::new(StaticOptionSource::new());
    let mut select = ResultaatSelect::new(Arc::clone(&source));

    assert!(select.set_zaaktype("").is_none());
    assert_eq!(select.state().status, LoadStatus::Ready);
    assert!(select.radios().is_empty());
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn resultaat_radios_are_unchecked_until_picked() {
    let source = Arc::new(StaticOptionSource::new().with(
        "42",
        [
            ("https://sl/resultaten/1", "1.1 - Ingericht"),
            ("https://sl/resultaten/2", "1.2 - Niet ingericht"),
        ],
    ));
    let mut select = ResultaatSelect::new(source);
    select.load_zaaktype("42").await;

    let radios = select.radios();
    assert_eq!(radios.len(), 2);
    assert_eq!(radios[1].id, "selectielijst-scroll_1");
    assert_eq!(radios[1].name, SELECTIELIJSTKLASSE);
    assert!(radios.iter().all(|r| !r.checked));
    assert!(select.submission().is_empty());

    select.select("https://sl/resultaten/2").unwrap();
    assert!(select.radios()[1].checked);
    assert_eq!(
        select.submission().get(SELECTIELIJSTKLASSE),
        Some("https://sl/resultaten/2")
    );
}

#[tokio::test]
async fn failed_resultaten_keep_the_error() {
    let source = Arc::new(
        StaticOptionSource::new().failing("42", FetchError::Transport("connection reset".into())),
    );
    let mut select = ResultaatSelect::new(source);
    let state = select.load_zaaktype("42").await;

    assert_eq!(state.status, LoadStatus::Failed);
    assert!(state.error.unwrap().is_retryable());
    assert!(select.radios().is_empty());
}

#[test]
fn config_file_is_loaded_with_env_override() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "base_url = \"https://file.local/\"\ncache_capacity = 8").unwrap();

    let config = AdminkitConfig::load(Some(file.path()), &HashMap::new()).unwrap();
    assert_eq!(config.base_url, "https://file.local/");
    assert_eq!(config.cache_capacity, 8);

    let env = HashMap::from([("ADMINKIT_BASE_URL".to_string(), "https://env.local/".to_string())]);
    let config = AdminkitConfig::load(Some(file.path()), &env).unwrap();
    assert_eq!(config.base_url, "https://env.local/");

    let missing = file.path().with_extension("missing");
    assert!(matches!(
        AdminkitConfig::load(Some(&missing), &env),
        Err(WidgetError::Config(_))
    ));
}
