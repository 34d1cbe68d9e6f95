use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use declina::{
    Case, Declension, Gender, GrammarError, InMemorySource, JsonDirSource, LabelSetLoader,
    LabelSource, Language, LocalizerFactory, NounForm, Number, RenamedNouns, Renameable,
    StartsWith,
};
use rstest::{fixture, rstest};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/labels")
}

fn base_loader() -> Arc<LabelSetLoader> {
    let source = JsonDirSource::new(fixtures_dir()).unwrap();
    Arc::new(LabelSetLoader::new(Arc::new(source), "base", None))
}

#[fixture]
fn factory() -> LocalizerFactory {
    LocalizerFactory::new(base_loader())
}

fn nominative(language: Language, number: Number) -> NounForm {
    language
        .declension()
        .noun_form(number, Case::Nominative)
        .unwrap()
}

fn rename_forms(language: Language, singular: &str, plural: &str) -> HashMap<NounForm, String> {
    let mut forms = HashMap::new();
    forms.insert(nominative(language, Number::Singular), singular.to_string());
    forms.insert(nominative(language, Number::Plural), plural.to_string());
    forms
}

#[rstest]
fn test_strict_label_with_arguments(factory: LocalizerFactory) {
    let localizer = factory.localizer("en_US").unwrap();
    assert_eq!(
        localizer
            .get_label_throw("Page", "step", &[], &["1", "5"])
            .unwrap(),
        "Step 1 of 5"
    );
}

#[rstest]
fn test_absent_label(factory: LocalizerFactory) {
    let localizer = factory.localizer("en_US").unwrap();
    let err = localizer
        .get_label_throw("Page", "missing", &[], &[])
        .unwrap_err();
    assert_eq!(
        err,
        GrammarError::LabelNotFound {
            section: "Page".to_string(),
            key: "missing".to_string()
        }
    );
    assert_eq!(
        localizer.get_label("Page", "missing", &[], &[]),
        "__MISSING LABEL__ PropertyFile - val missing not found in section Page"
    );
}

#[rstest]
#[case("en_US", "Color")]
#[case("en-CA", "Color")]
#[case("en_GB", "Colour")]
#[case("en_IN", "Colour")]
#[case("en-AU", "Colour")]
#[case("en-NZ", "Colour")]
fn test_english_variant_fallback(
    factory: LocalizerFactory,
    #[case] locale: &str,
    #[case] expected: &str,
) {
    let localizer = factory.localizer(locale).unwrap();
    assert_eq!(
        localizer.get_label_throw("Page", "color", &[], &[]).unwrap(),
        expected
    );
    assert_eq!(
        localizer
            .get_label_throw("Page", "step", &[], &["2", "3"])
            .unwrap(),
        "Step 2 of 3"
    );
}

#[rstest]
fn test_entity_labels(factory: LocalizerFactory) {
    let localizer = factory.localizer("en_US").unwrap();
    let entity: &dyn Renameable = &"Account";
    assert_eq!(
        localizer
            .get_label_throw("Page", "new", &[entity], &[])
            .unwrap(),
        "Create an account"
    );
    assert_eq!(
        localizer
            .get_label_throw("Page", "title", &[entity], &[])
            .unwrap(),
        "Accounts"
    );
    assert_eq!(
        localizer
            .get_label_throw("Page", "list", &[&"Opportunity"], &[])
            .unwrap(),
        "All opportunities"
    );
    assert_eq!(
        localizer
            .get_label_throw("Page", "count", &[entity], &["1"])
            .unwrap(),
        "one account"
    );
    assert_eq!(
        localizer
            .get_label_throw("Page", "count", &[entity], &["7"])
            .unwrap(),
        "7 accounts"
    );
}

#[rstest]
fn test_missing_entity_lenient_and_strict(factory: LocalizerFactory) {
    let localizer = factory.localizer("en_US").unwrap();
    assert_eq!(
        localizer.get_label("Page", "list", &[&"Gadget"], &[]),
        "All <Entities>"
    );
    assert!(matches!(
        localizer.get_label_throw("Page", "list", &[&"Gadget"], &[]),
        Err(GrammarError::MissingEntity { .. })
    ));
}

#[rstest]
fn test_rename_flips_article(factory: LocalizerFactory) {
    let base = factory.localizer("en_US").unwrap();
    let renamed = RenamedNouns::new();
    let entity: &dyn Renameable = &"Case";

    let localizer = base.with_renaming(&renamed);
    assert_eq!(
        localizer
            .get_label_throw("Page", "new", &[entity], &[])
            .unwrap(),
        "Create a case"
    );

    renamed
        .rename(
            base.label_set().dictionary(),
            "case",
            Gender::Neuter,
            StartsWith::Vowel,
            rename_forms(Language::English, "Issue", "Issues"),
        )
        .unwrap();
    assert_eq!(
        localizer
            .get_label_throw("Page", "new", &[entity], &[])
            .unwrap(),
        "Create an issue"
    );

    renamed.set_use_renamed_nouns(false);
    assert_eq!(
        localizer
            .get_label_throw("Page", "new", &[entity], &[])
            .unwrap(),
        "Create a case"
    );

    // The canonical dictionary noun is never touched by a rename
    let canonical = base.label_set().dictionary().get_noun("case", false).unwrap();
    assert_eq!(
        canonical
            .get_string(nominative(Language::English, Number::Singular))
            .unwrap(),
        "Case"
    );
}

#[rstest]
#[case("Account", "Erstellen Sie einen neuen Account")]
#[case("Firma", "Erstellen Sie eine neue Firma")]
#[case("Konto", "Erstellen Sie ein neues Konto")]
fn test_german_agreement(
    factory: LocalizerFactory,
    #[case] entity: &str,
    #[case] expected: &str,
) {
    let localizer = factory.localizer("de_DE").unwrap();
    assert_eq!(localizer.language(), Language::German);
    assert_eq!(
        localizer
            .get_label_throw("Page", "new", &[&entity], &[])
            .unwrap(),
        expected
    );
}

#[rstest]
fn test_german_rename_changes_gender(factory: LocalizerFactory) {
    let base = factory.localizer("de").unwrap();
    let entity: &dyn Renameable = &"Firma";
    assert_eq!(
        base.get_label_throw("Page", "who", &[entity], &[]).unwrap(),
        "Sie ist da"
    );

    let renamed = RenamedNouns::new();
    renamed
        .rename(
            base.label_set().dictionary(),
            "Firma",
            Gender::Masculine,
            StartsWith::Consonant,
            rename_forms(Language::German, "Kunde", "Kunden"),
        )
        .unwrap();
    let localizer = base.with_renaming(&renamed);
    assert_eq!(
        localizer
            .get_label_throw("Page", "who", &[entity], &[])
            .unwrap(),
        "Er ist da"
    );
    assert_eq!(
        localizer
            .get_label_throw("Page", "title", &[entity], &[])
            .unwrap(),
        "Kunden"
    );
}

#[rstest]
fn test_german_falls_back_to_english_labels(factory: LocalizerFactory) {
    let localizer = factory.localizer("de-AT").unwrap();
    assert_eq!(localizer.language(), Language::GermanAt);
    assert_eq!(
        localizer
            .get_label_throw("Page", "step", &[], &["1", "5"])
            .unwrap(),
        "Schritt 1 von 5"
    );
    assert_eq!(
        localizer
            .get_label_throw("Page", "list", &[&"Konto"], &[])
            .unwrap(),
        "All Konten"
    );
    assert_eq!(
        localizer
            .get_label_throw("Page", "list", &[&"Opportunity"], &[])
            .unwrap(),
        "All Opportunities"
    );

    let copied = localizer
        .label_set()
        .dictionary()
        .get_noun("opportunity", false)
        .unwrap();
    assert!(copied.is_copied());
    assert_eq!(copied.language(), Language::GermanAt);
}

#[rstest]
fn test_aliases_resolve(factory: LocalizerFactory) {
    let localizer = factory.localizer("en_GB").unwrap();
    let entity: &dyn Renameable = &"Account";
    assert_eq!(
        localizer
            .get_label_throw("Page", "heading", &[entity], &[])
            .unwrap(),
        "Accounts"
    );
    assert_eq!(
        localizer
            .get_label_throw("Search", "results", &[entity], &[])
            .unwrap(),
        "All accounts"
    );
}

#[rstest]
#[case("en_US", "Color")]
#[case("en_GB", "Colour")]
#[case("en_IN", "Colour")]
fn test_alias_follows_locale_override(
    factory: LocalizerFactory,
    #[case] locale: &str,
    #[case] expected: &str,
) {
    let localizer = factory.localizer(locale).unwrap();
    assert_eq!(
        localizer.get_label_throw("Page", "shade", &[], &[]).unwrap(),
        expected
    );
}

#[test]
fn test_override_layer_retargets_aliases() {
    let overrides = InMemorySource::new().with_source(
        Language::English,
        LabelSource::default().with_label("Page", "title", "Customer {{entity:0|plural}}"),
    );
    let loader = LabelSetLoader::new(Arc::new(overrides), "custom", Some(base_loader()));
    let set = loader.get_set(Language::English).unwrap();

    assert_eq!(set.get("Page", "title").unwrap().layer, "custom");
    assert_eq!(set.get("Page", "heading").unwrap().layer, "custom");

    let localizer = LocalizerFactory::new(Arc::new(loader))
        .localizer("en_US")
        .unwrap();
    let entity: &dyn Renameable = &"Account";
    assert_eq!(
        localizer
            .get_label_throw("Page", "title", &[entity], &[])
            .unwrap(),
        "Customer accounts"
    );
    assert_eq!(
        localizer
            .get_label_throw("Page", "heading", &[entity], &[])
            .unwrap(),
        "Customer accounts"
    );
}

#[test]
fn test_allow_other_grammatical_forms() {
    let loader = base_loader();
    assert!(!loader.get_set(Language::English).unwrap().allow_other_grammatical_forms());
    assert!(!loader.get_set(Language::EnglishIn).unwrap().allow_other_grammatical_forms());
    assert!(loader.get_set(Language::German).unwrap().allow_other_grammatical_forms());

    // A layer on top of a set that already mixes languages keeps the flag
    let german_overrides = InMemorySource::new().with_source(
        Language::German,
        LabelSource::default().with_label("Page", "step", "Stufe $1 von $2"),
    );
    let layered = LabelSetLoader::new(Arc::new(german_overrides), "custom", Some(loader));
    let set = layered.get_set(Language::German).unwrap();
    assert!(set.allow_other_grammatical_forms());
    assert_eq!(set.get_string("Page", "step", &["1", "2"]).unwrap(), "Stufe 1 von 2");
}

#[test]
fn test_reset_rereads_sources() {
    let source = Arc::new(InMemorySource::new().with_source(
        Language::English,
        LabelSource::default().with_label("Page", "greeting", "Hello"),
    ));
    let loader = LabelSetLoader::new(source.clone(), "base", None);
    let before = loader.get_set(Language::English).unwrap();

    source.insert(
        Language::English,
        LabelSource::default().with_label("Page", "greeting", "Welcome"),
    );
    assert!(Arc::ptr_eq(&before, &loader.get_set(Language::English).unwrap()));

    loader.reset();
    let after = loader.get_set(Language::English).unwrap();
    assert_eq!(after.get_string("Page", "greeting", &[]).unwrap(), "Welcome");
    assert_eq!(before.get_string("Page", "greeting", &[]).unwrap(), "Hello");
}

#[test]
fn test_unsupported_locale_uses_default_language() {
    let factory = LocalizerFactory::new(base_loader()).with_default_language(Language::German);
    let localizer = factory.localizer("zz").unwrap();
    assert_eq!(localizer.language(), Language::German);
}

#[test]
fn test_sets_are_shared_across_threads() {
    let loader = base_loader();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let loader = Arc::clone(&loader);
            std::thread::spawn(move || loader.get_set(Language::EnglishGb).unwrap())
        })
        .collect();
    let sets: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for set in &sets {
        assert_eq!(set.get_string("Page", "color", &[]).unwrap(), "Colour");
    }
}

#[test]
fn test_reset_during_concurrent_reads() {
    let base_source = Arc::new(InMemorySource::new().with_source(
        Language::English,
        LabelSource::default().with_label("Page", "greeting", "Hello 0"),
    ));
    let base = Arc::new(LabelSetLoader::new(base_source.clone(), "base", None));
    let org = Arc::new(LabelSetLoader::new(
        Arc::new(InMemorySource::new()),
        "org",
        Some(base),
    ));
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let org = Arc::clone(&org);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Acquire) {
                    let set = org.get_set(Language::English).unwrap();
                    assert!(set.contains("Page", "greeting"));
                }
            })
        })
        .collect();

    for round in 1..=50 {
        let greeting = format!("Hello {}", round);
        base_source.insert(
            Language::English,
            LabelSource::default().with_label("Page", "greeting", &greeting),
        );
        org.reset();
        let set = org.get_set(Language::English).unwrap();
        assert_eq!(set.get_string("Page", "greeting", &[]).unwrap(), greeting);
    }

    stop.store(true, Ordering::Release);
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(
        org.get_set(Language::English)
            .unwrap()
            .get_string("Page", "greeting", &[])
            .unwrap(),
        "Hello 50"
    );
}
