use serde::{Deserialize, Serialize};

/// A dish as returned by the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub nome: String,
    pub categoria: String,
    pub prezzo: f64,
    #[serde(default)]
    pub descrizione: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beverage {
    pub nome: String,
    pub prezzo: f64,
    #[serde(default)]
    pub descrizione: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub piatti: Vec<Dish>,
    #[serde(default)]
    pub bevande: Vec<Beverage>,
    #[serde(default)]
    pub prezzo_coperto: Option<f64>,
}

/// Body of a successful `/api/process-menu` call.
#[derive(Debug, Deserialize)]
pub struct ProcessMenuResponse {
    pub data: Menu,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of a failed call. FastAPI sends a string `detail` for handled errors
/// and a list for request validation errors, so keep it loose.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn detail_message(&self) -> Option<&str> {
        self.detail
            .as_ref()
            .and_then(|d| d.as_str())
            .filter(|d| !d.is_empty())
    }
}
