use axum::Json;

use crate::personas::Persona;

/// Advisor picker data: id and display name only, never the voice prompt.
pub async fn list_personas() -> Json<&'static [Persona]> {
    Json(Persona::all())
}
