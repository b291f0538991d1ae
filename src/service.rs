use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Url;

use crate::config::process_menu_url;
use crate::error::MenuError;
use crate::intake::SelectedFile;
use crate::model::{ErrorResponse, Menu, ProcessMenuResponse};

/// The remote side of an upload: turns a menu picture into structured data.
#[async_trait]
pub trait MenuService: Send + Sync {
    /// Failures always come back as `MenuError::RemoteFailure`.
    async fn process_menu(&self, file: SelectedFile) -> Result<Menu, MenuError>;
}

/// Talks to the analysis service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMenuService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMenuService {
    pub fn new(base_url: &Url, timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: process_menu_url(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MenuService for HttpMenuService {
    async fn process_menu(&self, file: SelectedFile) -> Result<Menu, MenuError> {
        let (name, mime, bytes) = file.into_parts();
        let size = bytes.len();

        let part = Part::bytes(bytes)
            .file_name(name.clone())
            .mime_str(&mime)
            .map_err(|e| {
                tracing::error!(%mime, error = %e, "cannot build multipart part");
                MenuError::connection_failed()
            })?;
        let form = Form::new().part("file", part);

        tracing::info!(file = %name, size, endpoint = %self.endpoint, "📤 sending menu for analysis");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "analysis service unreachable");
                MenuError::connection_failed()
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::warn!(%status, error = %e, "failed to read analysis response");
            MenuError::connection_failed()
        })?;

        tracing::debug!(
            %status,
            body = %body.chars().take(500).collect::<String>(),
            "analysis response"
        );

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|err| err.detail_message().map(str::to_string));
            tracing::warn!(%status, detail = ?message, "analysis rejected");
            return Err(message
                .map(MenuError::RemoteFailure)
                .unwrap_or_else(MenuError::analysis_failed));
        }

        let parsed: ProcessMenuResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "malformed analysis response");
            MenuError::connection_failed()
        })?;

        tracing::info!(
            dishes = parsed.data.piatti.len(),
            beverages = parsed.data.bevande.len(),
            message = parsed.message.as_deref().unwrap_or(""),
            "✅ menu analysed"
        );

        Ok(parsed.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ANALYSIS_FAILED, CONNECTION_FAILED};
    use axum::{
        extract::Multipart,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::post,
        Json, Router,
    };

    /// Starts a throwaway analysis service and returns its base URL.
    async fn spawn_service(app: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{addr}")).unwrap()
    }

    fn menu_png() -> SelectedFile {
        SelectedFile::new("menu.png", "image/png", vec![7; 1024])
    }

    async fn echo_menu(mut multipart: Multipart) -> Response {
        while let Some(field) = multipart.next_field().await.unwrap() {
            if field.name() != Some("file") {
                continue;
            }
            let name = field.file_name().unwrap_or_default().to_string();
            let mime = field.content_type().unwrap_or_default().to_string();
            let size = field.bytes().await.unwrap().len();
            return Json(serde_json::json!({
                "success": true,
                "message": "Menu analizzato con successo",
                "data": {
                    "piatti": [{
                        "nome": format!("{name}|{mime}|{size}"),
                        "categoria": "Primi",
                        "prezzo": 12.5
                    }],
                    "bevande": [],
                    "prezzo_coperto": 2
                }
            }))
            .into_response();
        }
        StatusCode::UNPROCESSABLE_ENTITY.into_response()
    }

    #[tokio::test]
    async fn test_success_sends_file_field() {
        let base = spawn_service(Router::new().route("/api/process-menu", post(echo_menu))).await;
        let service = HttpMenuService::new(&base, Some(Duration::from_secs(5))).unwrap();

        let menu = service.process_menu(menu_png()).await.unwrap();
        assert_eq!(menu.piatti.len(), 1);
        assert_eq!(menu.piatti[0].nome, "menu.png|image/png|1024");
        assert_eq!(menu.prezzo_coperto, Some(2.0));
        assert!(menu.bevande.is_empty());
    }

    #[tokio::test]
    async fn test_error_detail_is_surfaced() {
        let app = Router::new().route(
            "/api/process-menu",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "detail": "Immagine non leggibile" })),
                )
            }),
        );
        let base = spawn_service(app).await;
        let service = HttpMenuService::new(&base, None).unwrap();

        let err = service.process_menu(menu_png()).await.unwrap_err();
        assert_eq!(err, MenuError::RemoteFailure("Immagine non leggibile".into()));
    }

    #[tokio::test]
    async fn test_error_without_detail_falls_back() {
        let app = Router::new().route(
            "/api/process-menu",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
        );
        let base = spawn_service(app).await;
        let service = HttpMenuService::new(&base, None).unwrap();

        let err = service.process_menu(menu_png()).await.unwrap_err();
        assert_eq!(err.to_string(), ANALYSIS_FAILED);
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let app = Router::new().route(
            "/api/process-menu",
            post(|| async { "definitely not json" }),
        );
        let base = spawn_service(app).await;
        let service = HttpMenuService::new(&base, None).unwrap();

        let err = service.process_menu(menu_png()).await.unwrap_err();
        assert_eq!(err.to_string(), CONNECTION_FAILED);
    }

    #[tokio::test]
    async fn test_hung_service_times_out() {
        let app = Router::new().route(
            "/api/process-menu",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "too late"
            }),
        );
        let base = spawn_service(app).await;
        let service = HttpMenuService::new(&base, Some(Duration::from_millis(100))).unwrap();

        let started = std::time::Instant::now();
        let err = service.process_menu(menu_png()).await.unwrap_err();
        assert_eq!(err, MenuError::connection_failed());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Grab a free port, then close it so nothing is listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let base = Url::parse(&format!("http://{addr}")).unwrap();
        let service = HttpMenuService::new(&base, Some(Duration::from_secs(5))).unwrap();

        let err = service.process_menu(menu_png()).await.unwrap_err();
        assert_eq!(err, MenuError::connection_failed());
    }

    #[test]
    fn test_endpoint() {
        let base = Url::parse("http://localhost:8000/").unwrap();
        let service = HttpMenuService::new(&base, None).unwrap();
        assert_eq!(service.endpoint(), "http://localhost:8000/api/process-menu");
    }
}
