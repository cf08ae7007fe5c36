//! 取り込みパイプライン全体の結合テスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(missing_docs)]

use std::collections::HashMap;
use std::fs;
use std::path::{
    Path,
    PathBuf,
};

use i18n_import::bundle::ConfiguredBundles;
use i18n_import::config::ImportSettings;
use i18n_import::import::{
    DocumentStatus,
    ImportOptions,
    ImportService,
};
use i18n_import::input::NameFilter;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write_import_file(workspace: &Path, content: &str) -> PathBuf {
    let path = workspace.join("translations.csv");
    fs::write(&path, content).unwrap();
    path
}

fn service_for(workspace: &Path) -> ImportService<ConfiguredBundles> {
    let settings = ImportSettings {
        app_translations_path: workspace.join("translations"),
        bundles: HashMap::from([("AppBundle".to_string(), workspace.join("src/App"))]),
        ..ImportSettings::default()
    };
    let registry = ConfiguredBundles::new(settings.bundles.clone());
    ImportService::new(settings, registry)
}

fn options(source: PathBuf, locales: &str) -> ImportOptions {
    ImportOptions {
        source,
        bundles: NameFilter::All,
        domains: NameFilter::All,
        locales: NameFilter::parse(locales).unwrap(),
        force: false,
        merge_into_app: false,
    }
}

#[test]
fn import_produces_one_sorted_document_per_locale() {
    let workspace = TempDir::new().unwrap();
    let source = write_import_file(
        workspace.path(),
        "Bundle\tDomain\tKey\ten\tfr\n\
         AppBundle\tmessages\tuser.name\tName\tNom\n\
         AppBundle\tmessages\taccount.title\tAccount\tCompte\n",
    );
    let service = service_for(workspace.path());

    let report = service.run(&options(source, "en,fr")).unwrap();

    assert_eq!(report.written_count(), 2);
    let base = workspace.path().join("src/App/translations");
    let en = fs::read_to_string(base.join("messages.en.yml")).unwrap();
    let fr = fs::read_to_string(base.join("messages.fr.yml")).unwrap();
    assert_eq!(en, "account:\n  title: Account\nuser:\n  name: Name\n");
    assert_eq!(fr, "account:\n  title: Compte\nuser:\n  name: Nom\n");
}

#[test]
fn rerunning_an_identical_import_writes_nothing() {
    let workspace = TempDir::new().unwrap();
    let source = write_import_file(
        workspace.path(),
        "Bundle\tDomain\tKey\ten\tfr\n\
         AppBundle\tmessages\tuser.name\tName\tNom\n",
    );
    let service = service_for(workspace.path());
    let opts = options(source, "en,fr");

    let first = service.run(&opts).unwrap();
    let second = service.run(&opts).unwrap();

    assert_eq!(first.written_count(), 2);
    assert_eq!(second.written_count(), 0);
    assert_eq!(second.unchanged_count(), 2);
}

#[test]
fn keys_missing_a_locale_are_omitted_from_that_document() {
    let workspace = TempDir::new().unwrap();
    let source = write_import_file(
        workspace.path(),
        "Bundle\tDomain\tKey\ten\tfr\n\
         AppBundle\tmessages\tgreeting\tHello\tBonjour\n\
         AppBundle\tmessages\tenglish.only\tJust english\t\n",
    );
    let service = service_for(workspace.path());

    service.run(&options(source, "en,fr")).unwrap();

    let base = workspace.path().join("src/App/translations");
    let en = fs::read_to_string(base.join("messages.en.yml")).unwrap();
    let fr = fs::read_to_string(base.join("messages.fr.yml")).unwrap();
    assert_eq!(en, "english:\n  only: Just english\ngreeting: Hello\n");
    // fr 側にはキー自体が現れない（空文字列にもならない）
    assert_eq!(fr, "greeting: Bonjour\n");
}

#[test]
fn importing_one_locale_preserves_the_other_locales_on_disk() {
    let workspace = TempDir::new().unwrap();
    let base = workspace.path().join("src/App/translations");
    fs::create_dir_all(&base).unwrap();
    fs::write(base.join("messages.fr.yml"), "greeting: Bonjour\n").unwrap();
    let source = write_import_file(
        workspace.path(),
        "Bundle\tDomain\tKey\ten\tfr\n\
         AppBundle\tmessages\tgreeting\tHello\t\n",
    );
    let service = service_for(workspace.path());

    service.run(&options(source, "en,fr")).unwrap();

    let en = fs::read_to_string(base.join("messages.en.yml")).unwrap();
    let fr = fs::read_to_string(base.join("messages.fr.yml")).unwrap();
    assert_eq!(en, "greeting: Hello\n");
    assert_eq!(fr, "greeting: Bonjour\n");
}

#[test]
fn escaped_separators_stay_inside_one_key_segment() {
    let workspace = TempDir::new().unwrap();
    let source = write_import_file(
        workspace.path(),
        "Bundle\tDomain\tKey\ten\n\
         AppBundle\tmessages\tform\\.label.hint\tFill this in\n",
    );
    let service = service_for(workspace.path());

    service.run(&options(source, "en")).unwrap();

    let base = workspace.path().join("src/App/translations");
    let en = fs::read_to_string(base.join("messages.en.yml")).unwrap();
    assert_eq!(en, "form.label:\n  hint: Fill this in\n");
}

#[test]
fn unknown_bundles_abort_before_any_write() {
    let workspace = TempDir::new().unwrap();
    let source = write_import_file(
        workspace.path(),
        "Bundle\tDomain\tKey\ten\n\
         AppBundle\tmessages\ta\tA\n\
         GhostBundle\tmessages\tb\tB\n",
    );
    let service = service_for(workspace.path());

    let result = service.run(&options(source, "en"));

    assert!(result.is_err());
    assert!(!workspace.path().join("src/App/translations/messages.en.yml").exists());
}

#[test]
fn merge_flag_folds_every_bundle_into_the_application_translations() {
    let workspace = TempDir::new().unwrap();
    let source = write_import_file(
        workspace.path(),
        "Bundle\tDomain\tKey\ten\n\
         AppBundle\tmessages\tuser.name\tName\n\
         OtherBundle\tmessages\ttitle\tTitle\n",
    );
    let service = service_for(workspace.path());

    let mut opts = options(source, "en");
    opts.merge_into_app = true;
    let report = service.run(&opts).unwrap();

    assert_eq!(report.written_count(), 1);
    let app = fs::read_to_string(workspace.path().join("translations/messages.en.yml")).unwrap();
    assert_eq!(app, "title: Title\nuser:\n  name: Name\n");
    assert!(!workspace.path().join("src/App/translations").exists());
}

#[test]
fn domain_filter_limits_the_written_documents() {
    let workspace = TempDir::new().unwrap();
    let source = write_import_file(
        workspace.path(),
        "Bundle\tDomain\tKey\ten\n\
         AppBundle\tmessages\ta\tA\n\
         AppBundle\tvalidators\tb\tB\n",
    );
    let service = service_for(workspace.path());

    let mut opts = options(source, "en");
    opts.domains = NameFilter::parse("validators").unwrap();
    let report = service.run(&opts).unwrap();

    assert_eq!(report.written_count(), 1);
    let base = workspace.path().join("src/App/translations");
    assert!(base.join("validators.en.yml").exists());
    assert!(!base.join("messages.en.yml").exists());
}

#[test]
fn existing_documents_are_reordered_canonically() {
    let workspace = TempDir::new().unwrap();
    let base = workspace.path().join("src/App/translations");
    fs::create_dir_all(&base).unwrap();
    // 既存ファイルのキー順は辞書順ではない
    fs::write(base.join("messages.en.yml"), "zebra: Z\napple: A\n").unwrap();
    let source = write_import_file(
        workspace.path(),
        "Bundle\tDomain\tKey\ten\n\
         AppBundle\tmessages\tmango\tM\n",
    );
    let service = service_for(workspace.path());

    let report = service.run(&options(source, "en")).unwrap();

    assert_eq!(report.written_count(), 1);
    let en = fs::read_to_string(base.join("messages.en.yml")).unwrap();
    assert_eq!(en, "apple: A\nmango: M\nzebra: Z\n");
}

#[test]
fn json_extension_switches_the_document_format() {
    let workspace = TempDir::new().unwrap();
    let source = write_import_file(
        workspace.path(),
        "Bundle\tDomain\tKey\ten\n\
         AppBundle\tmessages\tuser.name\tName\n",
    );
    let settings = ImportSettings {
        file_extension: "json".to_string(),
        app_translations_path: workspace.path().join("translations"),
        bundles: HashMap::from([("AppBundle".to_string(), workspace.path().join("src/App"))]),
        ..ImportSettings::default()
    };
    let registry = ConfiguredBundles::new(settings.bundles.clone());
    let service = ImportService::new(settings, registry);

    let report = service.run(&options(source, "en")).unwrap();

    assert_eq!(report.written_count(), 1);
    let json = fs::read_to_string(
        workspace.path().join("src/App/translations/messages.en.json"),
    )
    .unwrap();
    assert_eq!(json, "{\n  \"user\": {\n    \"name\": \"Name\"\n  }\n}\n");
}

#[test]
fn a_touched_file_with_identical_content_is_not_rewritten() {
    let workspace = TempDir::new().unwrap();
    let base = workspace.path().join("src/App/translations");
    fs::create_dir_all(&base).unwrap();
    fs::write(base.join("messages.en.yml"), "greeting: Hello\n").unwrap();
    let source = write_import_file(
        workspace.path(),
        "Bundle\tDomain\tKey\ten\n\
         AppBundle\tmessages\tgreeting\tHello\n",
    );
    let service = service_for(workspace.path());

    let report = service.run(&options(source, "en")).unwrap();

    assert_eq!(report.written_count(), 0);
    assert_eq!(report.unchanged_count(), 1);
    match report.outcomes.first() {
        Some(outcome) => assert_eq!(outcome.status, DocumentStatus::Unchanged),
        None => panic!("expected one outcome"),
    }
}
