use futures::Stream;
use futures::StreamExt;
use rand::Rng;
use sch_core::IMAGE_LIMIT;
use sch_core::IMAGE_PREFIX;
use std::path::Path;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Rejection of an uploaded file or form field.
#[derive(Debug, thiserror::Error)]
pub enum UploadErr {
    #[error("Only image files are allowed!")]
    NotImage,
    #[error("File too large")]
    TooLarge,
    #[error("Field value too long")]
    FieldTooLong,
    /// A file under a field other than `image`, or a second image.
    #[error("Unexpected field")]
    Unexpected,
    #[error("{0}")]
    Malformed(String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Image upload policy and destination directory.
#[derive(Debug, Clone)]
pub struct Uploads {
    dir: PathBuf,
    limit: usize,
}

impl Uploads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            limit: IMAGE_LIMIT,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the destination directory if it does not exist.
    pub fn prepare(&self) -> std::io::Result<()> {
        log::info!("storing uploads in {}", self.dir.display());
        std::fs::create_dir_all(&self.dir)
    }

    /// Streams one file into the uploads directory.
    ///
    /// The MIME type must start with `image/`. The file is written under a
    /// fresh name as chunks arrive; exceeding the size limit or a broken
    /// stream removes whatever was written.
    pub async fn store<S, B, E>(
        &self,
        original: &str,
        mime: Option<&str>,
        chunks: S,
    ) -> Result<Image, UploadErr>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: std::fmt::Display,
    {
        if !mime.is_some_and(|m| m.starts_with("image/")) {
            return Err(UploadErr::NotImage);
        }
        let name = Self::filename(original);
        let path = self.dir.join(&name);
        let mut file = tokio::fs::File::create(&path).await?;
        let image = Image { name, path };
        let mut chunks = std::pin::pin!(chunks);
        let mut size = 0;
        while let Some(chunk) = chunks.next().await {
            let written = match chunk {
                Err(e) => Err(UploadErr::Malformed(e.to_string())),
                Ok(ref bytes) if size + bytes.as_ref().len() > self.limit => {
                    Err(UploadErr::TooLarge)
                }
                Ok(ref bytes) => {
                    size += bytes.as_ref().len();
                    file.write_all(bytes.as_ref()).await.map_err(UploadErr::from)
                }
            };
            if let Err(e) = written {
                drop(file);
                image.discard().await;
                return Err(e);
            }
        }
        if let Err(e) = file.flush().await {
            drop(file);
            image.discard().await;
            return Err(e.into());
        }
        log::debug!("stored upload {} ({} bytes)", image.name, size);
        Ok(image)
    }

    /// `school-<unix millis>-<random>` followed by the original extension.
    pub fn filename(original: &str) -> String {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let noise = rand::rng().random_range(0..=1_000_000_000u32);
        format!("{}{}-{}{}", IMAGE_PREFIX, millis, noise, extension(original))
    }
}

/// Extension of the final path component, dot included; empty if none.
/// Leading-dot names such as `.hidden` have no extension.
pub fn extension(original: &str) -> String {
    Path::new(original)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// An image written to the uploads directory.
#[derive(Debug)]
pub struct Image {
    name: String,
    path: PathBuf,
}

impl Image {
    /// Stored filename, as persisted in the `image` column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Removes the file; used when the request that carried it fails.
    pub async fn discard(self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => log::debug!("discarded upload {}", self.name),
            Err(e) => log::warn!("failed to discard upload {}: {}", self.name, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: Vec<Vec<u8>>) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> {
        futures::stream::iter(parts.into_iter().map(Ok))
    }

    fn files(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn extension_keeps_dot() {
        assert_eq!(extension("photo.png"), ".png");
        assert_eq!(extension("archive.tar.gz"), ".gz");
        assert_eq!(extension("README"), "");
        assert_eq!(extension(".hidden"), "");
        assert_eq!(extension("dir/pic.JPG"), ".JPG");
    }

    #[test]
    fn filename_shape() {
        let name = Uploads::filename("campus.jpeg");
        assert!(name.starts_with("school-"));
        assert!(name.ends_with(".jpeg"));
        let stem = name
            .trim_start_matches("school-")
            .trim_end_matches(".jpeg")
            .split('-')
            .collect::<Vec<_>>();
        assert_eq!(stem.len(), 2);
        assert!(stem[0].parse::<u128>().is_ok());
        assert!(stem[1].parse::<u32>().unwrap() <= 1_000_000_000);
    }

    #[test]
    fn filenames_differ() {
        let a = Uploads::filename("a.png");
        let b = Uploads::filename("a.png");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn image_is_written() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(tmp.path());
        let image = uploads
            .store("logo.png", Some("image/png"), chunks(vec![b"abc".to_vec(), b"def".to_vec()]))
            .await
            .unwrap();
        assert!(image.name().ends_with(".png"));
        assert_eq!(std::fs::read(tmp.path().join(image.name())).unwrap(), b"abcdef");
    }

    #[tokio::test]
    async fn non_image_is_rejected_before_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(tmp.path());
        let result = uploads
            .store("notes.txt", Some("text/plain"), chunks(vec![b"hello".to_vec()]))
            .await;
        assert!(matches!(result, Err(UploadErr::NotImage)));
        let result = uploads.store("blob", None, chunks(vec![])).await;
        assert!(matches!(result, Err(UploadErr::NotImage)));
        assert_eq!(files(tmp.path()), 0);
    }

    #[tokio::test]
    async fn oversized_image_is_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(tmp.path());
        let half = vec![0u8; IMAGE_LIMIT / 2 + 1];
        let result = uploads
            .store("big.png", Some("image/png"), chunks(vec![half.clone(), half]))
            .await;
        assert!(matches!(result, Err(UploadErr::TooLarge)));
        assert_eq!(files(tmp.path()), 0);
    }

    #[tokio::test]
    async fn exact_limit_is_accepted() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(tmp.path());
        let image = uploads
            .store("edge.png", Some("image/png"), chunks(vec![vec![1u8; IMAGE_LIMIT]]))
            .await
            .unwrap();
        assert_eq!(std::fs::metadata(tmp.path().join(image.name())).unwrap().len(), IMAGE_LIMIT as u64);
    }

    #[tokio::test]
    async fn discard_removes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(tmp.path());
        let image = uploads
            .store("x.gif", Some("image/gif"), chunks(vec![b"GIF89a".to_vec()]))
            .await
            .unwrap();
        assert_eq!(files(tmp.path()), 1);
        image.discard().await;
        assert_eq!(files(tmp.path()), 0);
    }
}
