//! End-to-end tests for the scaffold workflow
//!
//! A fixture cloner copies a template tree (with a fake `.git`) into the
//! destination so the whole run can be exercised without network or git.

use scaffolder_core::config::{self, Question};
use scaffolder_core::prompt::default_answer;
use scaffolder_core::{
    AnswerSet, CloneResult, DefaultsPrompter, PresetStore, Prompter, RepoCloner, ScaffoldError,
    Scaffolder, Settings,
};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SOURCE: &str = "https://example.com/acme/web-template.git";

const DESCRIPTOR: &str = r#"
prompts:
  - name: name
    message: "Project name"
    default: "{{dir_name}}"
  - name: author
    message: "Author"
  - name: license
    type: select
    choices: [MIT, Apache-2.0]
"#;

/// Copies a template tree into the destination, `.git` included
struct FixtureCloner {
    template: PathBuf,
}

impl RepoCloner for FixtureCloner {
    async fn clone_repo(
        &self,
        source: &str,
        destination: &Path,
    ) -> scaffolder_core::Result<CloneResult> {
        copy_tree(&self.template, destination)?;
        Ok(CloneResult {
            source: source.to_string(),
            destination: destination.to_path_buf(),
        })
    }
}

fn copy_tree(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Answers from a script, falling back to defaults; records what was asked
#[derive(Default)]
struct Scripted {
    answers: AnswerSet,
    asked: Vec<Question>,
}

impl Scripted {
    fn with(answers: Value) -> Self {
        Self {
            answers: answers.as_object().cloned().unwrap_or_default(),
            asked: Vec::new(),
        }
    }

    fn default_for(&self, name: &str) -> Option<&Value> {
        self.asked
            .iter()
            .find(|q| q.name == name)
            .and_then(|q| q.default.as_ref())
    }
}

impl Prompter for Scripted {
    fn ask(&mut self, questions: &[Question]) -> scaffolder_core::Result<AnswerSet> {
        self.asked.extend(questions.iter().cloned());
        Ok(questions
            .iter()
            .map(|q| {
                let value = self
                    .answers
                    .get(&q.name)
                    .cloned()
                    .unwrap_or_else(|| default_answer(q));
                (q.name.clone(), value)
            })
            .collect())
    }
}

struct Fixture {
    _root: TempDir,
    template: PathBuf,
    work: PathBuf,
    settings: Settings,
}

impl Fixture {
    fn new(descriptor: Option<&str>) -> Self {
        let root = TempDir::new().unwrap();
        let template = root.path().join("template");
        let work = root.path().join("work");
        fs::create_dir_all(template.join(".git/refs")).unwrap();
        fs::create_dir_all(template.join("src")).unwrap();
        fs::create_dir_all(&work).unwrap();

        fs::write(template.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
        fs::write(template.join("README.md.hbs"), "# {{name}}\n\nBy {{author}}\n").unwrap();
        fs::write(template.join("LICENSE.hbs"), "{{license}}\n").unwrap();
        fs::write(template.join("_layout.hbs"), "{{{{raw}}}}{{body}}{{{{/raw}}}} for {{name}}").unwrap();
        fs::write(template.join("src/main.rs.hbs"), "// {{name}}\nfn main() {}\n").unwrap();
        fs::write(template.join("static.txt"), "{{untouched}}").unwrap();
        if let Some(descriptor) = descriptor {
            fs::write(template.join("scaffold.config.yaml"), descriptor).unwrap();
        }

        let settings = Settings::new(root.path().join("presets"));
        Self {
            _root: root,
            template,
            work,
            settings,
        }
    }

    fn cloner(&self) -> FixtureCloner {
        FixtureCloner {
            template: self.template.clone(),
        }
    }

    fn store(&self) -> PresetStore {
        PresetStore::from_settings(&self.settings)
    }

    async fn run<P: Prompter>(
        &self,
        dir: &str,
        prompter: P,
        overrides: &AnswerSet,
    ) -> scaffolder_core::Result<AnswerSet> {
        let mut scaffolder = Scaffolder::new(self.settings.clone(), self.cloner(), prompter);
        scaffolder.run(SOURCE, &self.work.join(dir), overrides).await
    }
}

fn hbs_files(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in fs::read_dir(&current).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|e| e == "hbs") {
                found.push(path);
            }
        }
    }
    found
}

fn object(value: Value) -> AnswerSet {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_scaffold_renders_tree() {
    let fixture = Fixture::new(Some(DESCRIPTOR));
    let answers = fixture
        .run("my-app", Scripted::with(json!({ "author": "Ada" })), &AnswerSet::new())
        .await
        .unwrap();

    let project = fixture.work.join("my-app");
    assert_eq!(answers.get("name"), Some(&json!("my-app")));
    assert_eq!(answers.get("license"), Some(&json!("MIT")));

    assert!(!project.join(".git").exists());
    assert!(!project.join("scaffold.config.yaml").exists());
    assert_eq!(
        fs::read_to_string(project.join("README.md")).unwrap(),
        "# my-app\n\nBy Ada\n"
    );
    assert_eq!(fs::read_to_string(project.join("LICENSE")).unwrap(), "MIT\n");
    assert_eq!(
        fs::read_to_string(project.join("src/main.rs")).unwrap(),
        "// my-app\nfn main() {}\n"
    );
    assert_eq!(
        fs::read_to_string(project.join("layout.hbs")).unwrap(),
        "{{body}} for my-app"
    );
    assert_eq!(fs::read_to_string(project.join("static.txt")).unwrap(), "{{untouched}}");

    // Only renamed underscore files keep the suffix
    assert_eq!(hbs_files(&project), vec![project.join("layout.hbs")]);
}

#[tokio::test]
async fn test_answers_saved_and_offered_next_run() {
    let fixture = Fixture::new(Some(DESCRIPTOR));
    fixture
        .run(
            "first",
            Scripted::with(json!({ "author": "Ada", "license": "Apache-2.0" })),
            &AnswerSet::new(),
        )
        .await
        .unwrap();

    let saved = fixture.store().read(SOURCE);
    assert_eq!(saved.get("author"), Some(&json!("Ada")));
    assert_eq!(saved.get("license"), Some(&json!("Apache-2.0")));

    let mut second = Scripted::default();
    fixture
        .run("second", &mut second, &AnswerSet::new())
        .await
        .unwrap();

    // Saved answers fill questions without a default of their own
    assert_eq!(second.default_for("author"), Some(&json!("Ada")));
    assert_eq!(second.default_for("license"), Some(&json!("Apache-2.0")));
    assert_eq!(second.default_for("name"), Some(&json!("second")));
    assert_eq!(
        fs::read_to_string(fixture.work.join("second/README.md")).unwrap(),
        "# second\n\nBy Ada\n"
    );
}

#[tokio::test]
async fn test_listed_keys_only_saved() {
    let descriptor = format!("{}\nsavePreset: [author, missing]\n", DESCRIPTOR);
    let fixture = Fixture::new(Some(&descriptor));
    fixture
        .run("app", Scripted::with(json!({ "author": "Ada" })), &AnswerSet::new())
        .await
        .unwrap();

    let saved = fixture.store().read(SOURCE);
    assert_eq!(saved, object(json!({ "author": "Ada" })));
}

#[tokio::test]
async fn test_presets_disabled() {
    let descriptor = format!("{}\nsave_preset: false\n", DESCRIPTOR);
    let fixture = Fixture::new(Some(&descriptor));
    let path = fixture
        .store()
        .save(SOURCE, &object(json!({ "author": "Stale" })))
        .unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let mut prompter = Scripted::default();
    let answers = fixture
        .run("app", &mut prompter, &AnswerSet::new())
        .await
        .unwrap();

    // Prompts still run, but the stored preset is neither offered nor rewritten
    assert_eq!(prompter.asked.len(), 3);
    assert_eq!(prompter.default_for("author"), None);
    assert_eq!(answers.get("author"), Some(&json!("")));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[tokio::test]
async fn test_presets_disabled_never_write() {
    let descriptor = format!("{}\nsave_preset: false\n", DESCRIPTOR);
    let fixture = Fixture::new(Some(&descriptor));
    fixture
        .run("app", DefaultsPrompter, &AnswerSet::new())
        .await
        .unwrap();

    assert!(!fixture.store().path_for(SOURCE).exists());
}

#[tokio::test]
async fn test_overrides_beat_preset() {
    let fixture = Fixture::new(Some(DESCRIPTOR));
    fixture
        .store()
        .save(SOURCE, &object(json!({ "author": "Old", "ci": "none" })))
        .unwrap();

    let overrides = object(json!({ "ci": "github", "author": "Cli" }));
    let mut prompter = Scripted::default();
    let answers = fixture.run("app", &mut prompter, &overrides).await.unwrap();

    assert_eq!(prompter.default_for("author"), Some(&json!("Cli")));
    assert_eq!(answers.get("ci"), Some(&json!("github")));

    let saved = fixture.store().read(SOURCE);
    assert_eq!(saved.get("ci"), Some(&json!("github")));
    assert_eq!(saved.get("author"), Some(&json!("Cli")));
}

#[tokio::test]
async fn test_no_descriptor_renders_overrides() {
    let fixture = Fixture::new(None);
    let overrides = object(json!({ "name": "bare", "author": "Bo", "license": "ISC" }));
    let mut prompter = Scripted::default();
    fixture.run("bare", &mut prompter, &overrides).await.unwrap();

    assert!(prompter.asked.is_empty());
    let project = fixture.work.join("bare");
    assert_eq!(
        fs::read_to_string(project.join("README.md")).unwrap(),
        "# bare\n\nBy Bo\n"
    );
    // Default policy keeps the answers
    assert_eq!(fixture.store().read(SOURCE).get("license"), Some(&json!("ISC")));
}

#[tokio::test]
async fn test_render_failure_still_removes_descriptor() {
    let fixture = Fixture::new(Some(DESCRIPTOR));
    fs::write(fixture.template.join("README.md.hbs"), "{{invalid").unwrap();

    let err = fixture
        .run("broken", DefaultsPrompter, &AnswerSet::new())
        .await
        .unwrap_err();

    let project = fixture.work.join("broken");
    match err {
        ScaffoldError::Render { path, .. } => assert!(path.ends_with("README.md.hbs")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!project.join("scaffold.config.yaml").exists());
    assert!(project.join("README.md.hbs").exists());
    assert!(!fixture.store().path_for(SOURCE).exists());
}

#[tokio::test]
async fn test_invalid_descriptor_is_reported() {
    let fixture = Fixture::new(Some("prompts:\n  - name: a\n  - name: a\n"));
    let err = fixture
        .run("dup", DefaultsPrompter, &AnswerSet::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ScaffoldError::Descriptor { .. }));
    assert!(!fixture.work.join("dup/scaffold.config.yaml").exists());
}

#[test]
fn test_render_in_place_keeps_overrides_without_presets() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("scaffold.config.yaml"),
        "save_preset: false\nprompts:\n  - name: author\n",
    )
    .unwrap();
    fs::write(dir.path().join("README.md.hbs"), "by [{{author}}]").unwrap();

    let settings = Settings::new(dir.path().join("presets"));
    let overrides = object(json!({ "author": "Bo" }));
    let mut scaffolder = Scaffolder::new(
        settings,
        FixtureCloner {
            template: dir.path().to_path_buf(),
        },
        DefaultsPrompter,
    );
    let answers = scaffolder.render_in_place(dir.path(), &overrides).unwrap();

    assert_eq!(answers.get("author"), Some(&json!("Bo")));
    assert_eq!(
        fs::read_to_string(dir.path().join("README.md")).unwrap(),
        "by [Bo]"
    );
    assert!(!dir.path().join("scaffold.config.yaml").exists());
}

#[test]
fn test_cleanup_missing_descriptor() {
    let dir = TempDir::new().unwrap();
    let settings = Settings::new(dir.path().join("presets"));
    assert!(config::cleanup(dir.path(), &settings).is_ok());
    assert!(config::cleanup(dir.path(), &settings).is_ok());
}
