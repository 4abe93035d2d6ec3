//! Ephemeris source descriptors and kernel file resolution.
//!
//! A kernel named by version (`naif:DE440s`) is looked up in the data
//! directory, which defaults to `<user cache>/celestial_cache/jpl_ephem`. When
//! it is missing and the configuration allows it, the file is streamed from
//! the NAIF server with `reqwest` (feature `jpl-download`).
use std::{fmt, fs};

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use tracing::info;

use crate::{celestial_errors::CelestialError, config::CelestialConfig};

use super::naif::naif_version::NaifVersion;

#[derive(Debug, Clone, PartialEq)]
pub enum EphemFileSource {
    /// A published kernel resolved through the data directory.
    Naif(NaifVersion),
    /// A kernel at an explicit location.
    NaifPath(Utf8PathBuf),
    /// Analytical mean elements, no file involved.
    Standish,
}

impl TryFrom<&str> for EphemFileSource {
    type Error = CelestialError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("standish") {
            return Ok(EphemFileSource::Standish);
        }

        let Some((kind, target)) = value.split_once(':') else {
            return Err(CelestialError::InvalidEphemerisSource(value.to_string()));
        };
        if !kind.eq_ignore_ascii_case("naif") || target.is_empty() {
            return Err(CelestialError::InvalidEphemerisSource(value.to_string()));
        }

        let looks_like_path = target.contains('/') || target.contains('\\');
        if !looks_like_path {
            match target.parse::<NaifVersion>() {
                Ok(version) => return Ok(EphemFileSource::Naif(version)),
                Err(err) if !target.ends_with(".bsp") => return Err(err),
                Err(_) => {}
            }
        }
        Ok(EphemFileSource::NaifPath(Utf8PathBuf::from(target)))
    }
}

impl fmt::Display for EphemFileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemFileSource::Naif(version) => write!(f, "naif:{version}"),
            EphemFileSource::NaifPath(path) => write!(f, "naif:{path}"),
            EphemFileSource::Standish => write!(f, "standish"),
        }
    }
}

/// A kernel file known to exist on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum EphemFilePath {
    Naif(Utf8PathBuf, Option<NaifVersion>),
}

impl fmt::Display for EphemFilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl EphemFilePath {
    pub fn path(&self) -> &Utf8Path {
        match self {
            EphemFilePath::Naif(path, _) => path,
        }
    }

    /// Directory holding cached kernels, created on demand.
    pub fn cache_dir(config: &CelestialConfig) -> Result<Utf8PathBuf, CelestialError> {
        let dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => {
                let base_dir = BaseDirs::new().ok_or_else(|| {
                    CelestialError::UnableToCreateBaseDir(
                        "no home directory for the user cache".into(),
                    )
                })?;
                let cache = Utf8Path::from_path(base_dir.cache_dir()).ok_or_else(|| {
                    CelestialError::Utf8PathError(format!(
                        "cache directory {:?} is not valid UTF-8",
                        base_dir.cache_dir()
                    ))
                })?;
                cache.join("celestial_cache").join("jpl_ephem")
            }
        };
        fs::create_dir_all(&dir)
            .map_err(|e| CelestialError::UnableToCreateBaseDir(format!("{dir}: {e}")))?;
        Ok(dir)
    }

    /// Resolve a NAIF source to a file on disk.
    ///
    /// # Errors
    /// [`CelestialError::EphemerisUnavailable`] when the file is absent and
    /// cannot be downloaded, [`CelestialError::InvalidEphemerisSource`] for
    /// the `standish` source which has no file.
    pub fn get_ephemeris_file(
        file_source: &EphemFileSource,
        config: &CelestialConfig,
    ) -> Result<Self, CelestialError> {
        match file_source {
            EphemFileSource::Standish => Err(CelestialError::InvalidEphemerisSource(
                "the standish source has no kernel file".into(),
            )),
            EphemFileSource::NaifPath(path) => {
                if path.exists() {
                    Ok(EphemFilePath::Naif(path.clone(), None))
                } else {
                    Err(CelestialError::EphemerisUnavailable(format!(
                        "kernel file {path} does not exist"
                    )))
                }
            }
            EphemFileSource::Naif(version) => {
                let local_file = EphemFilePath::cache_dir(config)?.join(version.get_filename());
                if local_file.exists() {
                    return Ok(EphemFilePath::Naif(local_file, Some(*version)));
                }
                if !config.auto_download {
                    return Err(CelestialError::EphemerisUnavailable(format!(
                        "{local_file} not found and auto_download is disabled"
                    )));
                }
                download_kernel(version, &local_file)?;
                Ok(EphemFilePath::Naif(local_file, Some(*version)))
            }
        }
    }
}

#[cfg(feature = "jpl-download")]
async fn download_big_file(url: &str, path: &Utf8Path) -> Result<(), CelestialError> {
    use tokio::{fs::File, io::AsyncWriteExt};
    use tokio_stream::StreamExt;

    let mut file = File::create(path).await?;
    let mut stream = reqwest::get(url)
        .await?
        .error_for_status()?
        .bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}

#[cfg(feature = "jpl-download")]
fn download_kernel(version: &NaifVersion, local_file: &Utf8Path) -> Result<(), CelestialError> {
    let url = version.url();
    let partial = local_file.with_extension("bsp.part");
    info!("Downloading {url} to {local_file}");

    let rt = tokio::runtime::Runtime::new()?;
    if let Err(err) = rt.block_on(download_big_file(&url, &partial)) {
        let _ = fs::remove_file(&partial);
        return Err(CelestialError::EphemerisUnavailable(format!(
            "download of {url} failed: {err}"
        )));
    }
    fs::rename(&partial, local_file)?;

    info!("Downloaded {url}");
    Ok(())
}

#[cfg(not(feature = "jpl-download"))]
fn download_kernel(version: &NaifVersion, local_file: &Utf8Path) -> Result<(), CelestialError> {
    info!("Not downloading {version}: feature jpl-download is disabled");
    Err(CelestialError::EphemerisUnavailable(format!(
        "{local_file} not found and the jpl-download feature is disabled"
    )))
}
