//! Directory-based template seeding.
//!
//! Populates the template provider from a seed directory at startup:
//! `<dir>/schemas/*.json` and `<dir>/templates/*.j2`. Names that
//! already exist in the provider are left untouched, so operator edits
//! survive restarts.

use std::path::Path;

use tracing::{debug, info};

use rulegen_store::TemplateProvider;

use crate::error::EngineError;

/// Seed schemas and render templates from a directory.
///
/// A missing seed directory (or missing subdirectory) is not an error;
/// seeding is best-effort setup for fresh installations.
pub async fn seed_templates(
    provider: &dyn TemplateProvider,
    seed_dir: &Path,
) -> Result<(), EngineError> {
    seed_kind(provider, &seed_dir.join("schemas"), "json", SeedKind::Schema).await?;
    seed_kind(
        provider,
        &seed_dir.join("templates"),
        "j2",
        SeedKind::Template,
    )
    .await
}

#[derive(Clone, Copy)]
enum SeedKind {
    Schema,
    Template,
}

async fn seed_kind(
    provider: &dyn TemplateProvider,
    dir: &Path,
    extension: &str,
    kind: SeedKind,
) -> Result<(), EngineError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };

        let exists = match kind {
            SeedKind::Schema => provider.get_schema(&name).await.is_ok(),
            SeedKind::Template => provider.get_template(&name).await.is_ok(),
        };
        if exists {
            debug!(name, "already present, skipping seed");
            continue;
        }

        let content = std::fs::read_to_string(&path)?;
        match kind {
            SeedKind::Schema => {
                provider.create_schema(&name, &content).await?;
                info!(name, "seeded schema");
            }
            SeedKind::Template => {
                provider.create_template(&name, &content).await?;
                info!(name, "seeded template");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rulegen_store::MemoryStore;

    fn write_seed_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let schemas = dir.path().join("schemas");
        let templates = dir.path().join("templates");
        std::fs::create_dir_all(&schemas).unwrap();
        std::fs::create_dir_all(&templates).unwrap();

        std::fs::write(schemas.join("k8s.json"), r#"{"type": "object"}"#).unwrap();
        std::fs::write(schemas.join("notes.txt"), "ignored").unwrap();
        std::fs::write(templates.join("k8s.j2"), "alert: x\nexpr: up\n").unwrap();
        dir
    }

    #[tokio::test]
    async fn seeds_schemas_and_templates() {
        let dir = write_seed_dir();
        let store = MemoryStore::new();

        seed_templates(&store, dir.path()).await.unwrap();

        assert_eq!(store.get_schema("k8s").await.unwrap(), r#"{"type": "object"}"#);
        assert_eq!(
            store.get_template("k8s").await.unwrap(),
            "alert: x\nexpr: up\n"
        );
        // Files with other extensions are ignored.
        assert!(store.get_schema("notes").await.is_err());
    }

    #[tokio::test]
    async fn existing_entries_are_not_overwritten() {
        let dir = write_seed_dir();
        let store = MemoryStore::new();
        store.create_schema("k8s", "operator-edited").await.unwrap();

        seed_templates(&store, dir.path()).await.unwrap();

        assert_eq!(store.get_schema("k8s").await.unwrap(), "operator-edited");
        // The template had no prior entry and is seeded normally.
        assert!(store.get_template("k8s").await.is_ok());
    }

    #[tokio::test]
    async fn missing_seed_dir_is_not_an_error() {
        let store = MemoryStore::new();
        seed_templates(&store, Path::new("/nonexistent/seed/dir"))
            .await
            .unwrap();
    }
}
