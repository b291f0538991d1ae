use crate::controller::{Controller, FlowState, Panel};
use crate::intake::MAX_FILE_BYTES;
use crate::render::{beverage_card_html, dish_card_html, escape_html, summary_html};
use crate::service::MenuService;

const STYLE: &str = r#"
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            background: linear-gradient(135deg, #f6d365 0%, #fda085 100%);
            min-height: 100vh;
            display: flex;
            align-items: flex-start;
            justify-content: center;
            padding: 40px 20px;
        }

        .container {
            background: white;
            border-radius: 20px;
            box-shadow: 0 20px 60px rgba(0,0,0,0.2);
            max-width: 960px;
            width: 100%;
            padding: 40px;
        }

        h1 { color: #333; margin-bottom: 10px; font-size: 2em; }
        h2 { color: #444; margin: 30px 0 15px; }

        .subtitle { color: #666; margin-bottom: 30px; font-size: 0.9em; }

        [hidden] { display: none !important; }

        .upload-box {
            border: 3px dashed #fda085;
            border-radius: 15px;
            padding: 50px 20px;
            text-align: center;
            background: #fffaf5;
            transition: all 0.3s;
        }

        .upload-box.dragover {
            border-color: #e8743b;
            background: #fff0e3;
            transform: scale(1.02);
        }

        .upload-icon { font-size: 4em; margin-bottom: 20px; }
        .upload-hint { color: #999; font-size: 0.9em; margin-top: 10px; }

        input[type="file"] { display: none; }

        .btn {
            border: none;
            border-radius: 25px;
            padding: 12px 28px;
            font-size: 1em;
            font-weight: 600;
            cursor: pointer;
            background: #e8743b;
            color: white;
        }

        .btn.secondary { background: #eee; color: #555; }

        .preview-image {
            max-width: 100%;
            max-height: 420px;
            border-radius: 10px;
            margin: 10px 0 20px;
            box-shadow: 0 4px 15px rgba(0,0,0,0.1);
        }

        .file-name { color: #666; margin-bottom: 15px; }
        .actions { display: flex; gap: 10px; justify-content: center; }
        .actions form { display: inline; }

        .loading { text-align: center; padding: 40px; }

        .spinner {
            border: 4px solid #f3f3f3;
            border-top: 4px solid #e8743b;
            border-radius: 50%;
            width: 50px;
            height: 50px;
            animation: spin 1s linear infinite;
            margin: 0 auto 20px;
        }

        @keyframes spin {
            0% { transform: rotate(0deg); }
            100% { transform: rotate(360deg); }
        }

        .menu-info {
            background: #fffaf5;
            border-radius: 10px;
            padding: 15px 20px;
            line-height: 1.8;
            color: #444;
        }

        .piatti-grid {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(260px, 1fr));
            gap: 20px;
        }

        .piatto-card {
            border-radius: 12px;
            overflow: hidden;
            box-shadow: 0 4px 15px rgba(0,0,0,0.08);
        }

        .piatto-image {
            height: 180px;
            display: flex;
            align-items: center;
            justify-content: center;
            background: #fff0e3;
            font-size: 4em;
        }

        .piatto-image img { width: 100%; height: 100%; object-fit: cover; }
        .piatto-content { padding: 15px; }

        .piatto-categoria {
            display: inline-block;
            background: #e8743b;
            color: white;
            padding: 3px 10px;
            border-radius: 20px;
            font-size: 0.75em;
            font-weight: 600;
            margin-bottom: 8px;
        }

        .piatto-header, .bevanda-header {
            display: flex;
            justify-content: space-between;
            align-items: baseline;
            gap: 10px;
        }

        .piatto-nome { font-size: 1.1em; color: #333; }
        .piatto-prezzo, .bevanda-prezzo { color: #e8743b; font-weight: 700; white-space: nowrap; }
        .piatto-descrizione, .bevanda-descrizione { color: #777; font-size: 0.9em; margin-top: 8px; }

        .bevanda-card {
            border-bottom: 1px solid #f0f0f0;
            padding: 12px 0;
        }

        .error {
            background: #fee;
            border: 2px solid #fcc;
            color: #c33;
            padding: 20px;
            border-radius: 10px;
            text-align: center;
        }

        .error p { margin-bottom: 15px; }
        .results-actions { margin-top: 30px; text-align: center; }
"#;

const SCRIPT: &str = r#"
        const uploadBox = document.getElementById('uploadBox');
        const fileInput = document.getElementById('fileInput');
        const selectForm = document.getElementById('selectForm');
        const selectFileBtn = document.getElementById('selectFileBtn');

        if (selectFileBtn) {
            selectFileBtn.addEventListener('click', () => fileInput.click());
        }

        fileInput.addEventListener('change', () => {
            if (fileInput.files.length > 0) {
                selectForm.submit();
            }
        });

        uploadBox.addEventListener('dragover', (e) => {
            e.preventDefault();
            uploadBox.classList.add('dragover');
        });

        uploadBox.addEventListener('dragleave', () => {
            uploadBox.classList.remove('dragover');
        });

        uploadBox.addEventListener('drop', (e) => {
            e.preventDefault();
            uploadBox.classList.remove('dragover');
            if (e.dataTransfer.files.length > 0) {
                fileInput.files = e.dataTransfer.files;
                selectForm.submit();
            }
        });
"#;

fn hidden(visible: bool) -> &'static str {
    if visible {
        ""
    } else {
        " hidden"
    }
}

/// Renders the whole page for the controller's current state.
pub fn render_page<S: MenuService + ?Sized>(controller: &Controller<S>) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"it\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    // Poll until the pending upload lands.
    if controller.state() == FlowState::Submitting {
        html.push_str("    <meta http-equiv=\"refresh\" content=\"2\">\n");
    }
    html.push_str("    <title>Menu Lens</title>\n    <style>");
    html.push_str(STYLE);
    html.push_str("    </style>\n</head>\n<body>\n    <div class=\"container\">\n");
    html.push_str("        <h1>📋 Menu Lens</h1>\n");
    html.push_str(
        "        <p class=\"subtitle\">Fotografa un menu e scopri piatti, bevande e prezzi</p>\n",
    );

    // Upload section with picker and preview.
    html.push_str(&format!(
        r#"        <section id="uploadSection"{}>
            <div class="upload-box" id="uploadBox">
                <form id="selectForm" action="/select" method="post" enctype="multipart/form-data">
                    <input type="file" id="fileInput" name="file" accept="image/png,image/jpeg">
                </form>
                <div id="selectFileBtnWrap"{}>
                    <div class="upload-icon">📸</div>
                    <button type="button" class="btn" id="selectFileBtn">Seleziona un'immagine</button>
                    <div class="upload-hint">oppure trascinala qui • PNG o JPG • Max {} MB</div>
                </div>
"#,
        hidden(controller.is_visible(Panel::Upload)),
        hidden(controller.picker_visible()),
        MAX_FILE_BYTES / (1024 * 1024),
    ));

    if let Some(preview) = controller.preview() {
        html.push_str(&format!(
            r#"                <div id="filePreview"{}>
                    <img id="previewImage" class="preview-image" src="{}" alt="Anteprima">
                    <p class="file-name" id="fileName">{}</p>
                    <div class="actions">
                        <form action="/upload" method="post"><button type="submit" class="btn" id="uploadBtn">Analizza menu</button></form>
                        <form action="/cancel" method="post"><button type="submit" class="btn secondary" id="cancelBtn">Annulla</button></form>
                    </div>
                </div>
"#,
            hidden(controller.is_visible(Panel::Preview)),
            escape_html(&preview.data_url),
            escape_html(&preview.file_name),
        ));
    }
    html.push_str("            </div>\n        </section>\n");

    html.push_str(&format!(
        r#"        <section id="loadingSection" class="loading"{}>
            <div class="spinner"></div>
            <p>Analisi del menu in corso...</p>
        </section>
"#,
        hidden(controller.is_visible(Panel::Loading)),
    ));

    html.push_str(&format!(
        "        <section id=\"resultsSection\"{}>\n",
        hidden(controller.is_visible(Panel::Results)),
    ));
    if let Some(view) = controller.results() {
        html.push_str("            <div class=\"menu-info\" id=\"menuInfo\">");
        html.push_str(&summary_html(&view.summary));
        html.push_str("</div>\n            <h2>Piatti</h2>\n");
        html.push_str("            <div class=\"piatti-grid\" id=\"piattiGrid\">\n");
        for card in &view.dishes {
            html.push_str(&dish_card_html(card));
        }
        html.push_str("            </div>\n");
        if view.show_beverages() {
            html.push_str("            <h2 id=\"bevandeHeader\">Bevande</h2>\n");
            html.push_str("            <div id=\"bevandeList\">\n");
            for card in &view.beverages {
                html.push_str(&beverage_card_html(card));
            }
            html.push_str("            </div>\n");
        }
    }
    html.push_str(
        r#"            <div class="results-actions">
                <form action="/reset" method="post"><button type="submit" class="btn" id="newUploadBtn">Nuovo menu</button></form>
            </div>
        </section>
"#,
    );

    html.push_str(&format!(
        r#"        <section id="errorSection" class="error"{}>
            <p id="errorMessage">{}</p>
            <form action="/reset" method="post"><button type="submit" class="btn" id="retryBtn">Riprova</button></form>
        </section>
"#,
        hidden(controller.is_visible(Panel::Error)),
        escape_html(controller.error_message().unwrap_or_default()),
    ));

    html.push_str("    </div>\n    <script>");
    html.push_str(SCRIPT);
    html.push_str("    </script>\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MenuError;
    use crate::intake::SelectedFile;
    use crate::model::Menu;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Fixed(Result<Menu, MenuError>);

    #[async_trait]
    impl MenuService for Fixed {
        async fn process_menu(&self, _file: SelectedFile) -> Result<Menu, MenuError> {
            self.0.clone()
        }
    }

    fn controller(outcome: Result<Menu, MenuError>) -> Controller<Fixed> {
        Controller::new(Arc::new(Fixed(outcome)))
    }

    fn menu(bevande: serde_json::Value) -> Menu {
        serde_json::from_value(serde_json::json!({
            "piatti": [{"nome": "Pasta", "categoria": "Primi", "prezzo": 12.5}],
            "bevande": bevande,
            "prezzo_coperto": 2
        }))
        .unwrap()
    }

    #[test]
    fn test_idle_page() {
        let html = render_page(&controller(Ok(menu(serde_json::json!([])))));
        assert!(html.contains(r#"<section id="uploadSection">"#));
        assert!(html.contains(r#"<div id="selectFileBtnWrap">"#));
        assert!(html.contains(r#"<section id="loadingSection" class="loading" hidden>"#));
        assert!(html.contains(r#"<section id="resultsSection" hidden>"#));
        assert!(html.contains(r#"<section id="errorSection" class="error" hidden>"#));
        assert!(!html.contains("filePreview"));
        assert!(!html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn test_preview_page() {
        let mut c = controller(Ok(menu(serde_json::json!([]))));
        c.select_file(SelectedFile::new("menu.png", "image/png", vec![0; 1024]))
            .unwrap();
        let html = render_page(&c);
        assert!(html.contains(r#"<div id="selectFileBtnWrap" hidden>"#));
        assert!(html.contains(r#"<div id="filePreview">"#));
        assert!(html.contains(r#"src="data:image/png;base64,"#));
        assert!(html.contains(r#"<p class="file-name" id="fileName">menu.png</p>"#));
    }

    #[test]
    fn test_loading_page_refreshes() {
        let mut c = controller(Ok(menu(serde_json::json!([]))));
        c.select_file(SelectedFile::new("menu.png", "image/png", vec![0; 8]))
            .unwrap();
        let _pending = c.begin_submit().unwrap();
        let html = render_page(&c);
        assert!(html.contains("http-equiv=\"refresh\""));
        assert!(html.contains(r#"<section id="loadingSection" class="loading">"#));
        assert!(html.contains(r#"<section id="uploadSection" hidden>"#));
    }

    #[tokio::test]
    async fn test_results_page_without_beverages() {
        let mut c = controller(Ok(menu(serde_json::json!([]))));
        c.select_file(SelectedFile::new("menu.png", "image/png", vec![0; 8]))
            .unwrap();
        c.submit().await;
        let html = render_page(&c);
        assert!(html.contains(r#"<section id="resultsSection">"#));
        assert!(html.contains("<strong>Totale piatti:</strong> 1"));
        assert!(html.contains("<strong>Totale bevande:</strong> 0"));
        assert!(html.contains("<strong>Coperto:</strong> €2.00"));
        assert!(html.contains(r#"<span class="piatto-prezzo">€12.50</span>"#));
        assert_eq!(html.matches(r#"<div class="piatto-card">"#).count(), 1);
        assert!(!html.contains("bevandeHeader"));
    }

    #[tokio::test]
    async fn test_results_page_with_beverages() {
        let mut c = controller(Ok(menu(serde_json::json!([
            {"nome": "Acqua", "prezzo": 1.5},
            {"nome": "Birra", "prezzo": 5, "descrizione": "Alla spina"}
        ]))));
        c.select_file(SelectedFile::new("menu.png", "image/png", vec![0; 8]))
            .unwrap();
        c.submit().await;
        let html = render_page(&c);
        assert!(html.contains("bevandeHeader"));
        assert_eq!(html.matches(r#"<div class="bevanda-card">"#).count(), 2);
        assert!(html.contains("€1.50"));
    }

    #[tokio::test]
    async fn test_error_page() {
        let mut c = controller(Err(MenuError::RemoteFailure(
            "Immagine non leggibile".into(),
        )));
        c.select_file(SelectedFile::new("menu.png", "image/png", vec![0; 8]))
            .unwrap();
        c.submit().await;
        let html = render_page(&c);
        assert!(html.contains(r#"<section id="errorSection" class="error">"#));
        assert!(html.contains(r#"<p id="errorMessage">Immagine non leggibile</p>"#));
    }
}
