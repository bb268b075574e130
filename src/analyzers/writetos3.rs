use crate::analyzers::analyzer::Document;

/// Uploads a prepared [`Document`] to an S3 bucket under its key.
pub async fn write_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    document: Document,
) -> anyhow::Result<()> {
    client
        .put_object()
        .bucket(bucket)
        .key(&document.key)
        .body(document.body.into())
        .content_type(document.content_type)
        .send()
        .await?;

    Ok(())
}
