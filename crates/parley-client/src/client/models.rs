//! Pass-through model management.

use tracing::{debug, info};

use super::{require_model, to_body, SessionClient};
use crate::streaming::{LineSource, ProgressStream};
use crate::transport::ServiceRequest;
use crate::wire::{
    CreateBody, DeleteBody, PullBody, TagsReply, CREATE_PATH, DELETE_PATH, PULL_PATH, TAGS_PATH,
};
use crate::{ClientError, ModelDescriptor, Progress};

impl SessionClient {
    /// Models installed on the service, in the order it reports them.
    pub async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ClientError> {
        debug!(endpoint = %self.endpoint(), "list models");
        let conn = self.transport.send(ServiceRequest::get(TAGS_PATH)).await?;
        let mut source = LineSource::unattributed(conn);
        let reply = source.next_value::<TagsReply>().await.unwrap_or_else(|| {
            Err(ClientError::ParseError("empty reply from service".into()))
        });
        source.close();
        let reply = reply?;
        debug!(count = reply.models.len(), "listed models");
        Ok(reply.models)
    }

    /// Download `model`, waiting until the service reports success.
    pub async fn pull_model(&self, model: &str) -> Result<Progress, ClientError> {
        let progress = self.start_pull(model, false).await?.finish().await?;
        info!(model, "model pulled");
        Ok(progress)
    }

    /// Download `model`, yielding progress updates as they arrive.
    pub async fn pull_model_stream(&self, model: &str) -> Result<ProgressStream, ClientError> {
        self.start_pull(model, true).await
    }

    /// Create `model` from the installed base model `from`, optionally with
    /// a baked-in system prompt.
    pub async fn create_model(
        &self,
        model: &str,
        from: &str,
        system: Option<&str>,
    ) -> Result<Progress, ClientError> {
        let progress = self
            .start_create(model, from, system, false)
            .await?
            .finish()
            .await?;
        info!(model, from, "model created");
        Ok(progress)
    }

    pub async fn create_model_stream(
        &self,
        model: &str,
        from: &str,
        system: Option<&str>,
    ) -> Result<ProgressStream, ClientError> {
        self.start_create(model, from, system, true).await
    }

    /// Remove `model` from the service.
    pub async fn delete_model(&self, model: &str) -> Result<(), ClientError> {
        require_model(model)?;
        let body = to_body(&DeleteBody { model })?;
        let conn = self
            .open(model, ServiceRequest::delete(DELETE_PATH, body))
            .await?;

        // The reply body is empty on success; drain it so an in-body error
        // still surfaces.
        let mut source = LineSource::new(conn, model);
        let drained = source.next_value::<serde_json::Value>().await;
        source.close();
        if let Some(Err(e)) = drained {
            return Err(e);
        }

        info!(model, "model deleted");
        Ok(())
    }

    async fn start_pull(&self, model: &str, stream: bool) -> Result<ProgressStream, ClientError> {
        require_model(model)?;
        let body = to_body(&PullBody { model, stream })?;
        debug!(model, stream, "pull");
        let conn = self
            .open(model, ServiceRequest::post(PULL_PATH, body))
            .await?;
        Ok(ProgressStream::new(conn, model))
    }

    async fn start_create(
        &self,
        model: &str,
        from: &str,
        system: Option<&str>,
        stream: bool,
    ) -> Result<ProgressStream, ClientError> {
        require_model(model)?;
        require_model(from)?;
        let body = to_body(&CreateBody {
            model,
            from,
            system,
            stream,
        })?;
        debug!(model, from, stream, "create");
        // Not-found errors name the base model.
        let conn = self
            .open(from, ServiceRequest::post(CREATE_PATH, body))
            .await?;
        Ok(ProgressStream::new(conn, from))
    }
}
