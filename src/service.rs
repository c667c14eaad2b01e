//! Scoring service boundary.
//!
//! Transport-agnostic: an HTTP layer hands over the `X-API-Key` header
//! value and the decoded request body, and serializes the response.

use serde::{Deserialize, Serialize};

use crate::error::{LecternError, Result};
use crate::pipeline::CategoryPrediction;
use crate::pipeline::prediction::{PredictionPipeline, PredictionRequest};

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Checks a presented API key against the configured secret.
#[derive(Clone)]
pub struct ApiKeyGuard {
    secret: Vec<u8>,
}

impl std::fmt::Debug for ApiKeyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyGuard").finish_non_exhaustive()
    }
}

impl ApiKeyGuard {
    pub fn new<S: AsRef<str>>(secret: S) -> Result<Self> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(LecternError::invalid_config("API key must not be empty"));
        }
        Ok(ApiKeyGuard {
            secret: secret.as_bytes().to_vec(),
        })
    }

    /// Accept only a key equal to the secret. The comparison time does not
    /// depend on where the first differing byte is.
    pub fn verify(&self, presented: Option<&str>) -> Result<()> {
        let presented = presented
            .ok_or_else(|| LecternError::unauthorized(format!("missing {API_KEY_HEADER}")))?;

        let presented = presented.as_bytes();
        let mut diff = self.secret.len() ^ presented.len();
        for (i, byte) in self.secret.iter().enumerate() {
            diff |= usize::from(byte ^ presented.get(i).copied().unwrap_or(0));
        }

        if diff == 0 {
            Ok(())
        } else {
            Err(LecternError::unauthorized("invalid API key"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predictions: Vec<CategoryPrediction>,
}

/// Authenticated front of a [`PredictionPipeline`].
#[derive(Debug)]
pub struct ScoringService {
    guard: ApiKeyGuard,
    pipeline: PredictionPipeline,
}

impl ScoringService {
    pub fn new(guard: ApiKeyGuard, pipeline: PredictionPipeline) -> Self {
        ScoringService { guard, pipeline }
    }

    /// Build from a pipeline whose config carries the API key.
    pub fn from_pipeline(pipeline: PredictionPipeline) -> Result<Self> {
        let secret = pipeline
            .config()
            .api_key
            .clone()
            .ok_or_else(|| LecternError::invalid_config("no api_key configured"))?;
        Ok(Self::new(ApiKeyGuard::new(secret)?, pipeline))
    }

    pub fn predict(
        &self,
        api_key: Option<&str>,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse> {
        self.guard.verify(api_key)?;
        log::debug!(
            "Scoring request: {} chars, language {}, filename {:?}",
            request.text.chars().count(),
            request.language,
            request.filename
        );
        let predictions = self.pipeline.predict(request)?;
        Ok(PredictionResponse { predictions })
    }

    pub fn pipeline(&self) -> &PredictionPipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::ml::bundle::BundleVariant;
    use tempfile::TempDir;

    #[test]
    fn test_guard() {
        let guard = ApiKeyGuard::new("s3cret").unwrap();
        assert!(guard.verify(Some("s3cret")).is_ok());
        assert!(matches!(guard.verify(Some("s3cre")), Err(LecternError::Unauthorized(_))));
        assert!(matches!(guard.verify(Some("s3cret!")), Err(LecternError::Unauthorized(_))));
        assert!(matches!(guard.verify(Some("")), Err(LecternError::Unauthorized(_))));
        assert!(matches!(guard.verify(None), Err(LecternError::Unauthorized(_))));
        assert!(ApiKeyGuard::new("").is_err());
    }

    #[test]
    fn test_service_checks_key_before_scoring() {
        let temp_dir = TempDir::new().unwrap();
        let config = ClassifierConfig {
            api_key: Some("key".to_string()),
            ..ClassifierConfig::default()
        }
        .with_model_dir(temp_dir.path())
        .with_variant(BundleVariant::TextWithFilename);
        let service =
            ScoringService::from_pipeline(PredictionPipeline::unloaded(config).unwrap()).unwrap();

        let request = PredictionRequest::new("lecture", "en");
        assert!(matches!(
            service.predict(Some("wrong"), &request),
            Err(LecternError::Unauthorized(_))
        ));
        assert!(matches!(
            service.predict(Some("key"), &request),
            Err(LecternError::UntrainedModel(_))
        ));
    }
}
