//! Render catalog entries into a project directory

use crate::config::ProjectConfig;
use crate::error::{Result, ScaffoldError};
use crate::templates::catalog::{Catalog, TemplateEntry};
use crate::templates::fetcher::{contained_path, TemplateBundle};
use crate::templates::render::{render, Variables};
use std::path::Path;
use tokio::fs;

/// A fully rendered file waiting to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Path relative to the project directory, `/`-separated
    pub destination: String,
    pub contents: String,
}

/// Render every applicable entry in memory, in catalog order
///
/// Fails on the first missing or broken template without touching the disk.
pub fn plan_project(
    bundle: &TemplateBundle,
    catalog: &Catalog,
    config: &ProjectConfig,
) -> Result<Vec<RenderedFile>> {
    let mut planned = Vec::new();
    for entry in catalog.applicable(config) {
        planned.extend(render_entry(bundle, entry, config)?);
    }
    Ok(planned)
}

/// Render one entry; directory entries expand to one file per template inside
pub fn render_entry(
    bundle: &TemplateBundle,
    entry: &TemplateEntry,
    config: &ProjectConfig,
) -> Result<Vec<RenderedFile>> {
    let sources: Vec<(String, String, &[u8])> = match bundle.file(entry.source) {
        Some(contents) => vec![(
            entry.source.to_string(),
            entry.destination.to_string(),
            contents,
        )],
        None => {
            let nested = bundle.files_under(entry.source);
            if nested.is_empty() {
                return Err(ScaffoldError::MissingTemplate {
                    path: entry.source.to_string(),
                });
            }
            nested
                .into_iter()
                .map(|(relative, contents)| {
                    (
                        format!("{}/{}", entry.source, relative),
                        format!("{}/{}", entry.destination, relative),
                        contents,
                    )
                })
                .collect()
        }
    };

    let vars = Variables::for_entry(entry.vars, config);
    sources
        .into_iter()
        .map(|(source, destination, contents)| -> Result<RenderedFile> {
            let destination = contained_path(Path::new(&destination))
                .ok_or(ScaffoldError::UnsafePath { path: destination })?;
            let text = std::str::from_utf8(contents).map_err(|_| {
                ScaffoldError::InvalidTemplateEncoding {
                    path: source.clone(),
                }
            })?;
            let contents = render(&source, text, &vars).map_err(|e| ScaffoldError::Render {
                path: source.clone(),
                source: e,
            })?;
            Ok(RenderedFile {
                destination,
                contents,
            })
        })
        .collect()
}

async fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| ScaffoldError::CreateDir {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Write planned files under `target_dir`, creating parent directories
pub async fn write_files(target_dir: &Path, files: &[RenderedFile]) -> Result<()> {
    create_dir(target_dir).await?;

    for file in files {
        let target_path = target_dir.join(&file.destination);
        if let Some(parent) = target_path.parent() {
            create_dir(parent).await?;
        }

        fs::write(&target_path, file.contents.as_bytes())
            .await
            .map_err(|e| ScaffoldError::Write {
                path: target_path.clone(),
                source: e,
            })?;
    }

    Ok(())
}

/// Generate the project into `target_dir`
///
/// Returns the relative paths written, in order. Existing files at those paths
/// are overwritten.
pub async fn render_project(
    bundle: &TemplateBundle,
    catalog: &Catalog,
    config: &ProjectConfig,
    target_dir: &Path,
) -> Result<Vec<String>> {
    let planned = plan_project(bundle, catalog, config)?;
    write_files(target_dir, &planned).await?;

    for dir in catalog.directories {
        create_dir(&target_dir.join(dir)).await?;
    }

    Ok(planned.into_iter().map(|f| f.destination).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Feature, Features};
    use crate::templates::catalog::Var;
    use crate::templates::fetcher::TemplateFetcher;
    use tempfile::tempdir;

    const ENTRIES: &[TemplateEntry] = &[
        TemplateEntry::new("title.txt", "TITLE").vars(&[Var::ProjectName]),
        TemplateEntry::new("store", "src/store").when(Feature::Vuex),
        TemplateEntry::new("deps.txt", "deps.txt").vars(&[Var::Flag(Feature::Axios)]),
    ];

    const CATALOG: Catalog = Catalog {
        entries: ENTRIES,
        directories: &["assets"],
    };

    fn bundle(files: &[(&str, &str)]) -> TemplateBundle {
        let dir = tempdir().unwrap();
        let root = dir.path().join("t");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(
            root.join("template.yaml"),
            "name: t\ndescription: t\nversion: 0.1.0\n",
        )
        .unwrap();
        for (path, contents) in files {
            let path = root.join(path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, contents).unwrap();
        }
        let zip = TemplateFetcher::build_local_zip(dir.path(), "t").unwrap();
        TemplateFetcher::extract_zip(&zip, "t").unwrap()
    }

    fn full_bundle() -> TemplateBundle {
        bundle(&[
            ("title.txt", "{{ projectName }}\n"),
            ("store/index.js", "store\n"),
            ("store/modules/user.js", "user\n"),
            ("deps.txt", "vue\n{%- if includeAxios %}\naxios\n{%- endif %}\n"),
        ])
    }

    #[test]
    fn test_plan_expands_directories_and_skips_false_predicates() {
        let bundle = full_bundle();
        let with_store = ProjectConfig::default();
        let dests: Vec<_> = plan_project(&bundle, &CATALOG, &with_store)
            .unwrap()
            .into_iter()
            .map(|f| f.destination)
            .collect();
        assert_eq!(
            dests,
            vec![
                "TITLE",
                "src/store/index.js",
                "src/store/modules/user.js",
                "deps.txt"
            ]
        );

        let without_store =
            ProjectConfig::new("x", Features::default().without(Feature::Vuex)).unwrap();
        let planned = plan_project(&bundle, &CATALOG, &without_store).unwrap();
        assert!(planned.iter().all(|f| !f.destination.starts_with("src/store")));
    }

    #[test]
    fn test_flags_drive_conditional_lines() {
        let bundle = full_bundle();
        let config = ProjectConfig::new("x", Features::none()).unwrap();
        let planned = plan_project(&bundle, &CATALOG, &config).unwrap();
        let deps = planned.iter().find(|f| f.destination == "deps.txt").unwrap();
        assert_eq!(deps.contents, "vue\n");
    }

    #[test]
    fn test_missing_template_names_source() {
        let bundle = bundle(&[("title.txt", "t"), ("store/index.js", "s")]);
        let err = plan_project(&bundle, &CATALOG, &ProjectConfig::default()).unwrap_err();
        match err {
            ScaffoldError::MissingTemplate { path } => assert_eq!(path, "deps.txt"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_template_skipped_when_predicate_false() {
        let bundle = bundle(&[("title.txt", "t"), ("deps.txt", "d")]);
        let config = ProjectConfig::new("x", Features::none()).unwrap();
        assert!(plan_project(&bundle, &CATALOG, &config).is_ok());
    }

    #[test]
    fn test_render_error_names_source() {
        let bundle = bundle(&[
            ("title.txt", "{{ includeVuex }}"),
            ("store/index.js", "s"),
            ("deps.txt", "d"),
        ]);
        let err = plan_project(&bundle, &CATALOG, &ProjectConfig::default()).unwrap_err();
        assert!(matches!(err, ScaffoldError::Render { ref path, .. } if path == "title.txt"));
    }

    #[test]
    fn test_render_error_keeps_tera_cause() {
        let bundle = bundle(&[
            ("title.txt", "{% if projectName %}unclosed"),
            ("store/index.js", "s"),
            ("deps.txt", "d"),
        ]);
        let err = plan_project(&bundle, &CATALOG, &ProjectConfig::default()).unwrap_err();
        assert!(err.to_string().contains("title.txt"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_nested_path_climbing_out_is_rejected() {
        let manifest = b"name: t\ndescription: t\nversion: 0.1.0\n".to_vec();
        let bundle = TemplateBundle::from_files(
            "t",
            vec![
                ("t/template.yaml".to_string(), manifest),
                ("t/title.txt".to_string(), b"t".to_vec()),
                ("t/store/../../../escaped.txt".to_string(), b"x".to_vec()),
                ("t/deps.txt".to_string(), b"d".to_vec()),
            ],
        )
        .unwrap();
        let out = tempdir().unwrap();
        let target = out.path().join("a/b/project");

        let err = render_project(&bundle, &CATALOG, &ProjectConfig::default(), &target)
            .await
            .unwrap_err();

        assert!(
            matches!(err, ScaffoldError::UnsafePath { ref path } if path == "src/store/../../../escaped.txt")
        );
        assert!(!target.exists());
        assert!(!out.path().join("a/escaped.txt").exists());
    }

    #[tokio::test]
    async fn test_blocked_directory_reports_create_dir() {
        let out = tempdir().unwrap();
        std::fs::write(out.path().join("src"), "a file where a directory belongs").unwrap();

        let err = render_project(&full_bundle(), &CATALOG, &ProjectConfig::default(), out.path())
            .await
            .unwrap_err();

        let expected = out.path().join("src/store");
        match &err {
            ScaffoldError::CreateDir { path, .. } => assert_eq!(path, &expected),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains(&expected.display().to_string()));
        let cause = std::error::Error::source(&err)
            .and_then(|e| e.downcast_ref::<std::io::Error>())
            .expect("io error kept as source");
        assert_ne!(cause.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_unwritable_file_reports_write() {
        let out = tempdir().unwrap();
        std::fs::create_dir_all(out.path().join("TITLE")).unwrap();

        let err = render_project(&full_bundle(), &CATALOG, &ProjectConfig::default(), out.path())
            .await
            .unwrap_err();

        let expected = out.path().join("TITLE");
        assert!(matches!(err, ScaffoldError::Write { ref path, .. } if path == &expected));
        assert!(err.to_string().contains(&expected.display().to_string()));
        assert!(std::error::Error::source(&err)
            .and_then(|e| e.downcast_ref::<std::io::Error>())
            .is_some());
    }

    #[tokio::test]
    async fn test_render_project_writes_tree() {
        let bundle = full_bundle();
        let out = tempdir().unwrap();
        let config = ProjectConfig::new("My App", Features::default()).unwrap();

        let written = render_project(&bundle, &CATALOG, &config, out.path())
            .await
            .unwrap();

        assert_eq!(written.len(), 4);
        assert_eq!(
            std::fs::read_to_string(out.path().join("TITLE")).unwrap(),
            "My App\n"
        );
        assert!(out.path().join("src/store/modules/user.js").is_file());
        assert!(out.path().join("assets").is_dir());
    }

    #[tokio::test]
    async fn test_failed_plan_writes_nothing() {
        let bundle = bundle(&[("title.txt", "t"), ("store/index.js", "s")]);
        let out = tempdir().unwrap();
        let target = out.path().join("project");

        assert!(
            render_project(&bundle, &CATALOG, &ProjectConfig::default(), &target)
                .await
                .is_err()
        );
        assert!(!target.exists());
    }
}
