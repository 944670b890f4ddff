use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use report_core::Credentials;
use tokio::runtime::Runtime;
use tracing::{debug, error, info};

use crate::store::ObjectStore;
use crate::types::{IngestError, Result};

/// S3 (or S3-compatible) backend driven from blocking code.
///
/// Owns a current-thread runtime. Construction fails when called from
/// inside another tokio runtime, where blocking on it would panic.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    runtime: Runtime,
}

impl S3Store {
    pub fn new(credentials: &Credentials, endpoint_url: Option<&str>) -> Result<Self> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(IngestError::Storage(
                "the s3 backend blocks and cannot run inside an async runtime; \
                 call it from a blocking thread"
                    .to_string(),
            ));
        }
        info!(
            region = %credentials.region,
            bucket = %credentials.bucket,
            "configuring s3 access"
        );
        let provider = aws_credential_types::Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            None,
            None,
            "report-secrets",
        );
        let mut builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(credentials.region.clone()))
            .credentials_provider(provider);
        if let Some(endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let client = aws_sdk_s3::Client::from_conf(builder.build());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { client, runtime })
    }
}

impl ObjectStore for S3Store {
    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation = None;
        loop {
            let output = self
                .runtime
                .block_on(
                    self.client
                        .list_objects_v2()
                        .bucket(bucket)
                        .prefix(prefix)
                        .set_continuation_token(continuation.take())
                        .send(),
                )
                .map_err(|err| {
                    error!(bucket, prefix, error = %DisplayErrorContext(&err), "failed to list objects");
                    IngestError::Storage(format!(
                        "list s3://{}/{}: {}",
                        bucket,
                        prefix,
                        DisplayErrorContext(&err)
                    ))
                })?;
            keys.extend(
                output
                    .contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );
            match output.next_continuation_token() {
                Some(token) if output.is_truncated() == Some(true) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }
        debug!(bucket, prefix, count = keys.len(), "listed objects");
        Ok(keys)
    }

    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        debug!(bucket, key, "fetching object");
        let body = self.runtime.block_on(async {
            let output = self
                .client
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|err| {
                    error!(bucket, key, error = %DisplayErrorContext(&err), "failed to fetch object");
                    IngestError::Storage(format!(
                        "get s3://{}/{}: {}",
                        bucket,
                        key,
                        DisplayErrorContext(&err)
                    ))
                })?;
            output.body.collect().await.map_err(|err| {
                IngestError::Storage(format!("read body of s3://{}/{}: {}", bucket, key, err))
            })
        })?;
        Ok(body.to_vec())
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
