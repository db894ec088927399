use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::Mutex;

use crate::api::client::VideoApi;
use crate::api::VideoInfo;
use crate::errors::{AppError, Result};
use crate::ui::{Operation, Presenter, StatusKind};
use crate::utils::{ensure_dir_exists, sanitize_filename};

const FETCH_ERROR_PREFIX: &str = "Error al obtener calidades: ";
const DOWNLOAD_ERROR_PREFIX: &str = "Error al descargar el video: ";

/// Saved name used when no info lookup has succeeded yet.
pub const FALLBACK_FILENAME: &str = "video.mp4";

/// Result of the last successful info lookup, owned by the controller.
struct Session {
    info: Option<VideoInfo>,
    filename: String,
}

/// Drives the two user actions against the remote service: look up the
/// available formats for a URL, and download the payload for a chosen
/// format. Each action owns a busy flag that rejects overlapping calls
/// of the same kind and is always cleared on completion.
pub struct DownloadController {
    api: Arc<dyn VideoApi>,
    presenter: Arc<dyn Presenter>,
    download_dir: PathBuf,
    fetching: AtomicBool,
    downloading: AtomicBool,
    session: Mutex<Session>,
}

impl DownloadController {
    pub fn new(api: Arc<dyn VideoApi>, presenter: Arc<dyn Presenter>, download_dir: PathBuf) -> Self {
        Self {
            api,
            presenter,
            download_dir,
            fetching: AtomicBool::new(false),
            downloading: AtomicBool::new(false),
            session: Mutex::new(Session {
                info: None,
                filename: FALLBACK_FILENAME.to_string(),
            }),
        }
    }

    /// Looks up the formats available for `url` and presents them.
    pub async fn fetch_formats(&self, url: &str) -> Result<VideoInfo> {
        let url = url.trim();
        if url.is_empty() {
            return Err(self.present_error(
                FETCH_ERROR_PREFIX,
                AppError::Validation("Por favor ingresa la URL del video".to_string()),
            ));
        }
        if self.fetching.swap(true, Ordering::SeqCst) {
            return Err(AppError::Busy("info"));
        }
        self.presenter.set_busy(Operation::FetchInfo, true);
        self.presenter
            .show_status(StatusKind::Info, "Obteniendo información del video...");

        let result = self.fetch_formats_inner(url).await;

        self.presenter.set_busy(Operation::FetchInfo, false);
        self.fetching.store(false, Ordering::SeqCst);

        match result {
            Ok(info) => {
                self.presenter.show_formats(&info.title, &info.formats);
                self.presenter.show_status(
                    StatusKind::Success,
                    &format!("Se encontraron {} calidades disponibles", info.formats.len()),
                );
                Ok(info)
            }
            Err(err) => {
                self.presenter.clear_formats();
                Err(self.present_error(FETCH_ERROR_PREFIX, err))
            }
        }
    }

    async fn fetch_formats_inner(&self, url: &str) -> Result<VideoInfo> {
        let info = self.api.fetch_info(url).await?;
        if info.formats.is_empty() {
            return Err(AppError::NoFormats);
        }

        let mut session = self.session.lock().await;
        // The saved name always carries .mp4, whatever format gets
        // picked later.
        session.filename = format!("{}.mp4", sanitize_filename(&info.title));
        session.info = Some(info.clone());
        info!("Session filename set to {}", session.filename);

        Ok(info)
    }

    /// Downloads the payload for `format_id` and saves it in the
    /// configured download directory under the session filename.
    pub async fn download_format(&self, url: &str, format_id: &str) -> Result<PathBuf> {
        let url = url.trim();
        let format_id = format_id.trim();
        if url.is_empty() {
            return Err(self.present_error(
                DOWNLOAD_ERROR_PREFIX,
                AppError::Validation("Por favor ingresa la URL del video".to_string()),
            ));
        }
        if format_id.is_empty() {
            return Err(self.present_error(
                DOWNLOAD_ERROR_PREFIX,
                AppError::Validation("Selecciona una calidad antes de descargar".to_string()),
            ));
        }
        if self.downloading.swap(true, Ordering::SeqCst) {
            return Err(AppError::Busy("descarga"));
        }
        self.presenter.set_busy(Operation::Download, true);
        self.presenter
            .show_status(StatusKind::Info, "Descargando video...");

        let result = self.download_inner(url, format_id).await;

        self.presenter.set_busy(Operation::Download, false);
        self.downloading.store(false, Ordering::SeqCst);

        match result {
            Ok(path) => {
                self.presenter.show_status(
                    StatusKind::Success,
                    &format!("¡Listo! Video guardado en {}", path.display()),
                );
                Ok(path)
            }
            Err(err) => Err(self.present_error(DOWNLOAD_ERROR_PREFIX, err)),
        }
    }

    async fn download_inner(&self, url: &str, format_id: &str) -> Result<PathBuf> {
        let presenter = Arc::clone(&self.presenter);
        let mut on_progress = move |downloaded: u64, total: Option<u64>| {
            presenter.download_progress(downloaded, total)
        };

        let data = self.api.download(url, format_id, &mut on_progress).await?;

        let filename = {
            let session = self.session.lock().await;
            if session.info.is_none() {
                warn!("No prior info lookup; saving as {}", session.filename);
            }
            session.filename.clone()
        };
        ensure_dir_exists(&self.download_dir).await?;
        let path = self.download_dir.join(filename);
        tokio::fs::write(&path, &data).await?;
        info!("Saved {} bytes to {:?}", data.len(), path);

        Ok(path)
    }

    /// Name the next download will be saved under.
    pub async fn download_filename(&self) -> String {
        self.session.lock().await.filename.clone()
    }

    fn present_error(&self, prefix: &str, err: AppError) -> AppError {
        self.presenter
            .show_status(StatusKind::Error, &format!("{prefix}{err}"));
        err
    }
}
