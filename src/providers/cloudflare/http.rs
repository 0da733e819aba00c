//! Cloudflare HTTP request methods.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{CloudflareProvider, CloudflareResponse, CF_API_BASE, MAX_RETRIES};
use super::types::CloudflareResultInfo;

impl CloudflareProvider {
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("Authorization", format!("Bearer {}", self.api_token))
    }

    /// Checks the envelope's `success` flag, mapping the first reported error
    /// when it is false.
    fn unwrap_envelope<T>(
        &self,
        envelope: CloudflareResponse<T>,
        context: ErrorContext,
    ) -> Result<(Option<T>, Option<CloudflareResultInfo>)> {
        if envelope.success {
            return Ok((envelope.result, envelope.result_info));
        }
        let (code, message) = envelope
            .errors
            .and_then(|errors| {
                errors
                    .first()
                    .map(|e| (e.code.to_string(), e.message.clone()))
            })
            .unwrap_or_else(|| (String::new(), "Unknown error".to_string()));
        Err(self.map_error(RawApiError::with_code(code, message), context))
    }

    /// GET one page of a list endpoint, returning the items and the total
    /// count across all pages.
    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
        context: ErrorContext,
    ) -> Result<(Vec<T>, u32)> {
        let builder = self.authorized(self.client.get(format!("{CF_API_BASE}{path_and_query}")));
        let (_, text) = HttpUtils::execute_request_with_retry(
            builder,
            self.provider_name(),
            "GET",
            path_and_query,
            MAX_RETRIES,
        )
        .await?;
        let envelope: CloudflareResponse<Vec<T>> =
            HttpUtils::parse_json(&text, self.provider_name())?;
        let (result, info) = self.unwrap_envelope(envelope, context)?;
        let total_count = info.map_or(0, |i| i.total_count);
        Ok((result.unwrap_or_default(), total_count))
    }

    /// POST a JSON body.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let builder = self
            .authorized(self.client.post(format!("{CF_API_BASE}{path}")))
            .json(body);
        let (_, text) = HttpUtils::execute_request_with_retry(
            builder,
            self.provider_name(),
            "POST",
            path,
            MAX_RETRIES,
        )
        .await?;
        let envelope: CloudflareResponse<T> = HttpUtils::parse_json(&text, self.provider_name())?;
        let (result, _) = self.unwrap_envelope(envelope, context)?;
        result.ok_or_else(|| self.parse_error("missing result field in response"))
    }

    /// DELETE a resource.
    pub(crate) async fn delete(&self, path: &str, context: ErrorContext) -> Result<()> {
        let builder = self.authorized(self.client.delete(format!("{CF_API_BASE}{path}")));
        let (_, text) = HttpUtils::execute_request_with_retry(
            builder,
            self.provider_name(),
            "DELETE",
            path,
            MAX_RETRIES,
        )
        .await?;
        let envelope: CloudflareResponse<serde_json::Value> =
            HttpUtils::parse_json(&text, self.provider_name())?;
        self.unwrap_envelope(envelope, context)?;
        Ok(())
    }
}
