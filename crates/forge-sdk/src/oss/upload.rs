//! Single-shot and resumable (chunked) object uploads.

use std::path::Path;

use reqwest::{Method, StatusCode};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::{DataManagementClient, require};
use crate::config::{api, scopes};
use crate::error::{ForgeError, ForgeResult};
use crate::models::Object;
use crate::upload::{ChunkPlan, ChunkRange, new_session_id};

const STREAM_CONTENT_TYPE: &str = "application/stream";

impl DataManagementClient {
    /// Upload an object with a single PUT.
    pub async fn upload_object(
        &self,
        bucket_key: &str,
        object_key: &str,
        data: Vec<u8>,
    ) -> ForgeResult<Object> {
        require("bucket_key", bucket_key)?;
        require("object_key", object_key)?;

        let path = format!("buckets/{bucket_key}/objects/{object_key}");
        let size = data.len();
        let request = self
            .api
            .request(Method::PUT, &path, scopes::DATA_ALL)
            .await?
            .header("Content-Type", STREAM_CONTENT_TYPE)
            .body(data);

        let response = self.api.send(request).await?;
        let bytes = response.bytes().await?;
        let object: Object = serde_json::from_slice(&bytes)?;

        tracing::info!(bucket = bucket_key, object = object_key, size, "Uploaded object");
        Ok(object)
    }

    /// Upload `total_size` bytes from `reader` using the configured chunk size.
    pub async fn upload_stream<R>(
        &self,
        bucket_key: &str,
        object_key: &str,
        reader: R,
        total_size: u64,
    ) -> ForgeResult<Object>
    where
        R: AsyncRead + Unpin + Send,
    {
        self.upload_object_chunked(bucket_key, object_key, reader, total_size, self.chunk_size).await
    }

    /// Upload a local file, chunking it if it exceeds the upload threshold.
    pub async fn upload_file(
        &self,
        bucket_key: &str,
        object_key: &str,
        file: impl AsRef<Path>,
    ) -> ForgeResult<Object> {
        let file = tokio::fs::File::open(file.as_ref()).await?;
        let total_size = file.metadata().await?.len();
        self.upload_stream(bucket_key, object_key, file, total_size).await
    }

    /// Upload `total_size` bytes from `reader`.
    ///
    /// Objects up to the upload threshold go out as one PUT. Larger objects
    /// are sent as `chunk_size` pieces to the resumable endpoint, one at a
    /// time in ascending order, all tagged with one session id. Only the
    /// response to the last chunk describes the finished object. The first
    /// rejected chunk aborts the upload with [`ForgeError::Upload`]; nothing
    /// is retried.
    ///
    /// The stream must hold exactly `total_size` bytes. A shorter stream has
    /// its last partial chunk sent and then fails; a longer one fails before
    /// the final chunk goes out.
    pub async fn upload_object_chunked<R>(
        &self,
        bucket_key: &str,
        object_key: &str,
        mut reader: R,
        total_size: u64,
        chunk_size: u64,
    ) -> ForgeResult<Object>
    where
        R: AsyncRead + Unpin + Send,
    {
        require("bucket_key", bucket_key)?;
        require("object_key", object_key)?;
        let plan = ChunkPlan::new(total_size, chunk_size)?;

        if total_size <= self.upload_threshold {
            let data = read_up_to(&mut reader, total_size).await?;
            if data.len() as u64 != total_size {
                return Err(stream_ended(data.len() as u64, total_size));
            }
            ensure_exhausted(&mut reader, total_size).await?;
            return self.upload_object(bucket_key, object_key, data).await;
        }

        let session_id = new_session_id();
        tracing::info!(
            bucket = bucket_key,
            object = object_key,
            total_size,
            chunks = plan.chunk_count(),
            session_id = %session_id,
            "Starting resumable upload"
        );

        let mut completed = None;

        for planned in plan.ranges() {
            let data = read_up_to(&mut reader, planned.len()).await?;

            // A short chunk means the stream ended; its range still starts at
            // the bytes sent so far.
            let range = planned
                .truncated(data.len() as u64)
                .ok_or_else(|| stream_ended(planned.start, total_size))?;
            let short = range.len() < planned.len();

            if !short && range.end + 1 == total_size {
                ensure_exhausted(&mut reader, total_size).await?;
            }

            completed = self
                .upload_chunk(bucket_key, object_key, data, range, total_size, &session_id)
                .await?;

            if short {
                return Err(stream_ended(range.end + 1, total_size));
            }
        }

        let object = completed.ok_or_else(|| {
            ForgeError::upload(format!("server did not confirm upload of session {session_id}"))
        })?;

        tracing::info!(bucket = bucket_key, object = object_key, total_size, "Resumable upload finished");
        Ok(object)
    }

    /// Send one chunk to the resumable endpoint.
    ///
    /// Returns the finished object on `200 OK` and `None` for any other
    /// success status (the server expects more chunks).
    pub async fn upload_chunk(
        &self,
        bucket_key: &str,
        object_key: &str,
        data: Vec<u8>,
        range: ChunkRange,
        total_size: u64,
        session_id: &str,
    ) -> ForgeResult<Option<Object>> {
        let path = format!("buckets/{bucket_key}/objects/{object_key}/resumable");
        let content_range = range.content_range(total_size);

        tracing::debug!(
            index = range.index,
            range = %content_range,
            session_id,
            "Uploading chunk"
        );

        let response = self
            .api
            .request(Method::PUT, &path, scopes::DATA_ALL)
            .await?
            .header("Content-Type", STREAM_CONTENT_TYPE)
            .header("Content-Length", range.len().to_string())
            .header("Content-Range", content_range.as_str())
            .header("Session-Id", session_id)
            .body(data)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(index = range.index, status = status.as_u16(), "Chunk rejected");
            return Err(ForgeError::upload(format!(
                "chunk {} ({}) rejected with status {}: {}",
                range.index,
                content_range,
                status.as_u16(),
                text
            )));
        }

        if status == StatusCode::OK {
            let bytes = response.bytes().await?;
            return Ok(Some(serde_json::from_slice(&bytes)?));
        }

        Ok(None)
    }
}

/// Read until `limit` bytes or end of stream.
///
/// The buffer starts at most one default chunk large and grows with the data.
async fn read_up_to<R>(reader: &mut R, limit: u64) -> ForgeResult<Vec<u8>>
where
    R: AsyncRead + Unpin + Send,
{
    let mut data = Vec::with_capacity(limit.min(api::CHUNK_SIZE) as usize);
    reader.take(limit).read_to_end(&mut data).await?;
    Ok(data)
}

/// Fail if the stream still has data after `total_size` bytes.
async fn ensure_exhausted<R>(reader: &mut R, total_size: u64) -> ForgeResult<()>
where
    R: AsyncRead + Unpin + Send,
{
    let mut extra = [0u8; 1];
    if reader.read(&mut extra).await? > 0 {
        return Err(ForgeError::upload(format!(
            "stream is longer than the declared {total_size} bytes"
        )));
    }
    Ok(())
}

fn stream_ended(sent: u64, total_size: u64) -> ForgeError {
    ForgeError::upload(format!("stream ended after {sent} of {total_size} bytes"))
}
