//! Fixed values shared across the client.

/// Production API gateway used when `LEAKHERE_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "https://pvlzjfze45.execute-api.ap-south-1.amazonaws.com/prod";

/// Public URL of the object-storage bucket that backs uploaded media.
pub const S3_BUCKET_URL: &str = "https://uploadhere-storage-pc.s3.amazonaws.com";

/// CDN domain used when `LEAKHERE_CDN_DOMAIN` is not set.
pub const DEFAULT_CDN_DOMAIN: &str = "d9xyz123abc.cloudfront.net";

pub const MB: u64 = 1024 * 1024;

/// Size cap for images, GIFs and documents.
pub const MAX_STANDARD_FILE_SIZE: u64 = 10 * MB;

/// Size cap for videos.
pub const MAX_VIDEO_FILE_SIZE: u64 = 100 * MB;

/// Gallery page size.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Uploader name used when neither the form nor the session supplies one.
pub const ANONYMOUS_UPLOADER: &str = "Anonymous";

pub const SESSION_DIR_NAME: &str = ".leakhere";
pub const SESSION_FILE_NAME: &str = "session.json";
