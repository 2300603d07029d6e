//! Rewrites object-storage URLs to the CDN that fronts the bucket.

use crate::constants::S3_BUCKET_URL;

#[derive(Debug, Clone)]
pub struct CdnUrlRewriter {
    cdn_domain: String,
    bucket_url: String,
}

impl CdnUrlRewriter {
    pub fn new(cdn_domain: impl Into<String>) -> Self {
        Self {
            cdn_domain: cdn_domain.into(),
            bucket_url: S3_BUCKET_URL.to_string(),
        }
    }

    pub fn with_bucket_url(mut self, bucket_url: impl Into<String>) -> Self {
        self.bucket_url = bucket_url.into();
        self
    }

    /// Returns `url` served from the CDN when it points at the bucket, unchanged otherwise.
    ///
    /// Both the virtual-hosted bucket URL and regional `*.s3.<region>.amazonaws.com`
    /// URLs are recognised; the object path is preserved.
    pub fn rewrite(&self, url: &str) -> String {
        if url.is_empty() {
            return String::new();
        }

        if let Some(path) = url.strip_prefix(self.bucket_url.as_str()) {
            return format!("https://{}{}", self.cdn_domain, path);
        }

        if url.contains(".s3.") {
            if let Some((_, path)) = url.split_once(".amazonaws.com") {
                return format!("https://{}{}", self.cdn_domain, path);
            }
        }

        url.to_string()
    }
}
