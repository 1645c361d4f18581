//! Model listing capability trait

use crate::error::LlmError;
use crate::models::MakehubModel;
use async_trait::async_trait;

#[async_trait]
pub trait ModelListing: Send + Sync {
    async fn list_models(&self) -> Result<Vec<MakehubModel>, LlmError>;

    async fn get_model(&self, model_id: &str) -> Result<MakehubModel, LlmError> {
        self.list_models()
            .await?
            .into_iter()
            .find(|model| model.model_id == model_id)
            .ok_or_else(|| LlmError::api_error(404, format!("Model not found: {model_id}")))
    }

    async fn is_model_available(&self, model_id: &str) -> Result<bool, LlmError> {
        match self.get_model(model_id).await {
            Ok(_) => Ok(true),
            Err(LlmError::ApiError { code: 404, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
