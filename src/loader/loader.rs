use crate::app_config::AppConfig;
use crate::device_directory::{DeviceDirectory, DirectoryError};
use crate::device_factory::DeviceFactory;
use crate::directive_catalog::{CatalogError, DirectiveCatalog};
use crate::domain::directive::Directive;
use crate::extensions::path_ext::FileName;
use futures::stream::FuturesUnordered;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinError;
use tokio::{fs, task};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReadDirStream;
use tracing::{info, instrument, warn};

#[derive(Debug, Deserialize)]
struct DevicesFile {
    devices: Vec<serde_json::Value>,
}

/// Loads the catalog and every device definition, then builds a complete directory. Nothing is returned unless
/// every directive file and every device is valid.
#[instrument(skip_all)]
pub async fn load_directory(config: &AppConfig) -> Result<DeviceDirectory, LoaderError> {
    let catalog = load_directives_from(config.directives().directory(), config.directives().extension()).await?;
    let definitions = load_devices_from(Path::new(config.devices().file())).await?;

    let factory = DeviceFactory::new(Arc::new(catalog), Arc::new(config.platform_table())).with_certificate_directory(config.certificates().directory());
    let policy = config.devices().duplicate_ids();

    // Hostname resolution blocks
    let directory = task::spawn_blocking(move || DeviceDirectory::build(definitions, &factory, policy)).await??;
    Ok(directory)
}

#[instrument]
pub async fn load_directives_from(directory: &str, extension: &str) -> Result<DirectiveCatalog, LoaderError> {
    info!("📁 Loading directives...");
    let mut files = list_files(directory, extension).await.map_err(|e| LoaderError::Io {
        source: e,
        path: Some(PathBuf::from(directory)),
    })?;
    // Stable catalog order across reloads
    files.sort();

    let results = load_files(files).await;
    let (directives, errors): (Vec<_>, Vec<_>) = results.into_iter().partition(Result::is_ok);

    for error in errors.iter().filter_map(|res| res.as_ref().err()) {
        log_error(error);
    }
    if let Some(Err(error)) = errors.into_iter().next() {
        return Err(error);
    }

    let catalog = DirectiveCatalog::new(directives.into_iter().filter_map(Result::ok).collect())?;
    info!("📁 Loading directives... OK, {} loaded", catalog.len());
    Ok(catalog)
}

#[instrument]
pub async fn load_devices_from(path: &Path) -> Result<Vec<serde_json::Value>, LoaderError> {
    info!("📁 Loading devices...");
    let content = fs::read_to_string(path).await.map_err(|e| LoaderError::Io {
        source: e,
        path: Some(path.to_path_buf()),
    })?;

    let file = serde_json::from_str::<DevicesFile>(&content).map_err(|e| LoaderError::Deserialization {
        source: e,
        path: path.to_path_buf(),
    })?;
    info!("📁 Loading devices... OK, {} definition(s)", file.devices.len());
    Ok(file.devices)
}

#[instrument]
async fn list_files(directory: &str, extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let dir = fs::read_dir(directory).await?;
    let mut entries = ReadDirStream::new(dir);

    while let Some(entry) = entries.next().await {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) {
                    files.push(path);
                }
            }
            Err(err) => warn!("⚠️ Unable to read directory entry: {}", err),
        }
    }

    Ok(files)
}

#[instrument(skip_all)]
async fn load_files(paths: Vec<PathBuf>) -> Vec<Result<Directive, LoaderError>> {
    let mut results: Vec<(PathBuf, Result<Directive, LoaderError>)> = FuturesUnordered::from_iter(paths.into_iter().map(|path| async move {
        let result = match fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<Directive>(&content).map_err(|e| LoaderError::Deserialization {
                source: e,
                path: path.clone(),
            }),
            Err(err) => Err(LoaderError::Io {
                source: err,
                path: Some(path.clone()),
            }),
        };
        (path, result)
    }))
    .collect()
    .await;

    results.sort_by(|(a, _), (b, _)| a.cmp(b));
    results.into_iter().map(|(_, result)| result).collect()
}

#[instrument(skip_all)]
fn log_error(error: &LoaderError) {
    match error {
        LoaderError::Deserialization { source, path } => warn!("⚠️ Failed to load '{}': {}", path.string_file_name(), source),
        LoaderError::Io { source, path } => match path {
            Some(path) => warn!("⚠️ Failed to load '{}': {}", path.string_file_name(), source),
            None => warn!("⚠️ {}", source),
        },
        error => warn!("⚠️ {}", error),
    }
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("{}", source)]
    Deserialization { source: serde_json::Error, path: PathBuf },
    #[error("{}", source)]
    Io { source: io::Error, path: Option<PathBuf> },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    JoinError(#[from] JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::AppConfigBuilder;
    use pretty_assertions::assert_eq;
    use std::env::temp_dir;
    use test_log::test;

    fn resources() -> PathBuf {
        PathBuf::from(format!("{}/tests/resources", env!("CARGO_MANIFEST_DIR")))
    }

    async fn scratch_dir(name: &str) -> io::Result<PathBuf> {
        let dir = temp_dir().join("glasshouse-loader-tests").join(name);
        let _ = fs::remove_dir_all(&dir).await;
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    #[tokio::test]
    async fn list_files_returns_all_relevant_files() -> io::Result<()> {
        let dir = scratch_dir("list_files").await?;

        let file1 = dir.join("ping.json");
        let file2 = dir.join("notes.txt");
        let file3 = dir.join("traceroute.json");

        fs::write(&file1, "{}").await?;
        fs::write(&file2, "text").await?;
        fs::write(&file3, "{}").await?;

        let mut files = list_files(dir.to_string_lossy().as_ref(), "json").await?;
        files.sort();

        assert_eq!(files, vec![file1, file3]);
        Ok(())
    }

    #[test(tokio::test)]
    async fn loads_the_directive_catalog() -> Result<(), LoaderError> {
        let catalog = load_directives_from(resources().join("directives").to_string_lossy().as_ref(), "json").await?;

        assert_eq!(catalog.len(), 4);
        let bgp = catalog.get("show-bgp").expect("show-bgp directive");
        assert_eq!(bgp.plugins(), ["plugins/bgp_community.py".to_string()]);

        let bgp_route = catalog.get("__bgp_route__").expect("__bgp_route__ directive");
        assert_eq!(bgp_route.rules().iter().map(|rule| rule.condition()).collect::<Vec<_>>(), vec![Some("0.0.0.0/0"), Some("::/0")]);
        assert_eq!(catalog.device_builtins("cisco_ios").iter().map(|d| d.id().to_string()).collect::<Vec<_>>(), vec!["__bgp_route__", "__ping__"]);
        Ok(())
    }

    #[test(tokio::test)]
    async fn an_invalid_directive_file_aborts_the_catalog() -> io::Result<()> {
        let dir = scratch_dir("invalid_directive").await?;
        fs::write(dir.join("valid.json"), r#"{ "id": "ping", "name": "Ping", "rules": [{ "commands": ["ping {target}"] }] }"#).await?;
        fs::write(dir.join("invalid.json"), r#"{ "name": "No id" }"#).await?;

        let result = load_directives_from(dir.to_string_lossy().as_ref(), "json").await;
        match result {
            Err(LoaderError::Deserialization { path, .. }) => assert_eq!(path, dir.join("invalid.json")),
            other => panic!("Expected a deserialization error, found {:?}", other.map(|c| c.len())),
        }
        Ok(())
    }

    #[test(tokio::test)]
    async fn duplicate_directive_ids_abort_the_catalog() -> io::Result<()> {
        let dir = scratch_dir("duplicate_directive").await?;
        fs::write(dir.join("a.json"), r#"{ "id": "ping", "name": "Ping" }"#).await?;
        fs::write(dir.join("b.json"), r#"{ "id": "ping", "name": "Ping again" }"#).await?;

        let result = load_directives_from(dir.to_string_lossy().as_ref(), "json").await;
        assert!(matches!(result, Err(LoaderError::Catalog(CatalogError::DuplicateId(id))) if id == "ping"));
        Ok(())
    }

    #[test(tokio::test)]
    async fn a_missing_devices_file_is_an_io_error() {
        let result = load_devices_from(Path::new("/nonexistent/devices.json")).await;
        assert!(matches!(result, Err(LoaderError::Io { path: Some(_), .. })));
    }

    #[test(tokio::test)]
    async fn loads_a_complete_directory() -> Result<(), LoaderError> {
        let config = AppConfigBuilder::new().build();

        let directory = load_directory(&config).await?;

        assert_eq!(directory.ids().collect::<Vec<_>>(), vec!["core_rtr_1", "edge_ams_02", "lab_vyos"]);

        let core = directory.get("core_rtr_1")?;
        assert_eq!(core.platform(), "cisco_ios");
        assert_eq!(core.directive_ids(), vec!["show-bgp", "__bgp_route__", "__ping__"]);

        let edge = directory.get("Edge AMS 02")?;
        assert_eq!(edge.platform(), "juniper");
        assert!(edge.structured_output());
        assert_eq!(edge.directive_ids(), vec!["traceroute"]);

        let plugins = directory.directive_plugins();
        assert_eq!(plugins.get(Path::new("plugins/bgp_community.py")), Some(&vec!["show-bgp".to_string()]));
        Ok(())
    }

    #[test(tokio::test)]
    async fn an_invalid_device_aborts_the_directory() -> io::Result<()> {
        let dir = scratch_dir("invalid_device").await?;
        let devices = dir.join("devices.json");
        fs::write(
            &devices,
            r#"{ "devices": [
                { "name": "rtr1", "address": "192.0.2.1", "network": { "name": "eu", "display_name": "Europe" }, "platform": "ios" },
                { "name": "rtr2", "address": "192.0.2.2", "network": { "name": "eu", "display_name": "Europe" }, "platform": "ios", "directives": ["traceroute"] }
            ] }"#,
        )
        .await?;
        let config = AppConfigBuilder::new().devices_file(devices.to_string_lossy().into_owned()).build();

        let result = load_directory(&config).await;
        assert!(matches!(result, Err(LoaderError::Directory(DirectoryError::Device { index: 1, .. }))));
        Ok(())
    }

    #[test(tokio::test)]
    async fn a_missing_directive_directory_is_an_io_error() {
        let config = AppConfigBuilder::new().directives_directory("/nonexistent/directives".to_string()).build();

        let result = load_directory(&config).await;
        assert!(matches!(result, Err(LoaderError::Io { .. })));
    }
}
